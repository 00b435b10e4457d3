use crate::record::{Algorithm, OtpKind, OtpRecord, PartialRecord};
use log::debug;
use thiserror::Error;
use url::{Url, form_urlencoded};

#[derive(Debug, Error)]
pub enum OtpUriError {
    #[error("invalid otpauth URI: {0}")]
    Malformed(#[from] url::ParseError),
    #[error("invalid otpauth URI scheme '{0}'")]
    Scheme(String),
    #[error("unsupported otpauth type '{0}', expected 'totp' or 'hotp'")]
    UnknownKind(String),
    #[error("otpauth URI missing 'secret' param")]
    MissingSecret,
    #[error("otpauth URI has an empty account label")]
    EmptyLabel,
    #[error("unsupported OTP algorithm '{0}', expected SHA1/SHA256/SHA512")]
    UnknownAlgorithm(String),
}

/// Разобрать текст из QR-кода в частичную запись.
///
/// Scheme, kind and a non-empty secret are mandatory; everything else is
/// optional. Query keys may repeat, the last value wins. Keys we do not
/// model are kept in `extra` as-is so they survive re-encoding.
pub fn decode(raw: &str) -> Result<PartialRecord, OtpUriError> {
    let url = Url::parse(raw)?;

    if url.scheme() != "otpauth" {
        return Err(OtpUriError::Scheme(url.scheme().to_string()));
    }

    let host = url.host_str().unwrap_or("");
    let kind =
        OtpKind::parse(host).ok_or_else(|| OtpUriError::UnknownKind(host.to_string()))?;

    let mut record = PartialRecord {
        kind: Some(kind),
        ..PartialRecord::default()
    };

    for (k, v) in url.query_pairs() {
        match k.as_ref() {
            "secret" => record.secret = Some(v.to_string()),
            "issuer" => record.issuer = Some(v.to_string()),
            "algorithm" => {
                let algo = Algorithm::parse(&v)
                    .ok_or_else(|| OtpUriError::UnknownAlgorithm(v.to_string()))?;
                record.algorithm = Some(algo);
            }
            "digits" => {
                if let Ok(d) = v.parse::<u32>() {
                    record.digits = Some(d);
                }
            }
            "period" => {
                if let Ok(p) = v.parse::<u64>() {
                    record.period = Some(p);
                }
            }
            "counter" => {
                if let Ok(c) = v.parse::<u64>() {
                    record.counter = Some(c);
                }
            }
            _ => {
                record.extra.insert(k.to_string(), v.to_string());
            }
        }
    }

    if record.secret.as_deref().is_none_or(str::is_empty) {
        return Err(OtpUriError::MissingSecret);
    }

    // Лейбл = путь без ведущего слэша; если он начинается с "<issuer>:",
    // этот префикс принадлежит issuer, а не аккаунту.
    let path = url.path();
    let mut account = path.strip_prefix('/').unwrap_or(path).to_string();
    if let Some(issuer) = record.issuer.as_deref() {
        if let Some(rest) = account.strip_prefix(&format!("{issuer}:")) {
            account = rest.to_string();
        }
    }
    record.account = Some(account);

    if !record.is_valid() {
        return Err(OtpUriError::EmptyLabel);
    }

    debug!(
        "decoded otpauth URI: kind={} account={:?} issuer={:?}",
        kind, record.account, record.issuer
    );

    Ok(record)
}

/// Собрать канонический otpauth URI из итоговой записи.
///
/// Key order is fixed (secret, issuer, algorithm, digits, period, counter,
/// then extras in map order), so the same record always yields the same
/// string. `kind` and `account` never show up as query keys.
pub fn encode(record: &OtpRecord) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("secret", &record.secret);
    if let Some(ref issuer) = record.issuer {
        query.append_pair("issuer", issuer);
    }
    if let Some(algo) = record.algorithm {
        query.append_pair("algorithm", algo.as_str());
    }
    if let Some(digits) = record.digits {
        query.append_pair("digits", &digits.to_string());
    }
    if let Some(period) = record.period {
        query.append_pair("period", &period.to_string());
    }
    if let Some(counter) = record.counter {
        query.append_pair("counter", &counter.to_string());
    }
    for (k, v) in &record.extra {
        // Зарезервированы за хостом и лейблом, в query не попадают.
        if k == "type" || k == "account" {
            continue;
        }
        query.append_pair(k, v);
    }

    format!(
        "otpauth://{}/{}?{}",
        record.kind,
        record.account,
        query.finish()
    )
}
