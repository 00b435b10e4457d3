use crate::record::{OtpKind, OtpRecord, PartialRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("no OTP type resolved")]
    MissingKind,
    #[error("account is required")]
    MissingAccount,
    #[error("OTP secret is required")]
    MissingSecret,
}

/// Слить запись из QR-кода с ответами пользователя в итоговую.
///
/// Per-field precedence: an answer beats the decoded value, otherwise
/// whichever side is present wins. Empty strings count as absent and are
/// pruned; `Some(0)` for period or counter is a real value and survives.
/// The issuer prefix is attached to the label here, exactly once, and all
/// whitespace is removed from the secret.
pub fn merge(
    decoded: PartialRecord,
    answers: PartialRecord,
) -> Result<OtpRecord, ReconcileError> {
    let kind = answers
        .kind
        .or(decoded.kind)
        .ok_or(ReconcileError::MissingKind)?;

    let issuer = prune(answers.issuer.or(decoded.issuer));

    let account = prune(answers.account.or(decoded.account))
        .ok_or(ReconcileError::MissingAccount)?;
    let account = match issuer.as_deref() {
        Some(issuer) => format!("{issuer}:{account}"),
        None => account,
    };

    let secret = answers
        .secret
        .or(decoded.secret)
        .map(|s| s.chars().filter(|c| !c.is_whitespace()).collect::<String>())
        .filter(|s| !s.is_empty())
        .ok_or(ReconcileError::MissingSecret)?;

    // period и counter живут каждый только со своим видом OTP.
    let (period, counter) = match kind {
        OtpKind::Totp => (answers.period.or(decoded.period), None),
        OtpKind::Hotp => (None, answers.counter.or(decoded.counter)),
    };

    let mut extra = decoded.extra;
    extra.extend(answers.extra);

    Ok(OtpRecord {
        kind,
        account,
        issuer,
        secret,
        algorithm: answers.algorithm.or(decoded.algorithm),
        digits: answers.digits.or(decoded.digits),
        period,
        counter,
        extra,
    })
}

fn prune(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded_totp() -> PartialRecord {
        PartialRecord {
            kind: Some(OtpKind::Totp),
            account: Some("bob".to_string()),
            secret: Some("JBSWY3DP".to_string()),
            ..PartialRecord::default()
        }
    }

    #[test]
    fn answer_overrides_decoded_field() {
        let answers = PartialRecord {
            account: Some("carol".to_string()),
            ..PartialRecord::default()
        };
        let merged = merge(decoded_totp(), answers).unwrap();
        assert_eq!(merged.account, "carol");
        assert_eq!(merged.secret, "JBSWY3DP");
    }

    #[test]
    fn decoded_field_kept_when_unanswered() {
        let merged = merge(decoded_totp(), PartialRecord::default()).unwrap();
        assert_eq!(merged.kind, OtpKind::Totp);
        assert_eq!(merged.account, "bob");
    }

    #[test]
    fn secret_whitespace_is_removed() {
        let mut decoded = decoded_totp();
        decoded.secret = Some("AB CD EF".to_string());
        let merged = merge(decoded, PartialRecord::default()).unwrap();
        assert_eq!(merged.secret, "ABCDEF");
    }

    #[test]
    fn whitespace_only_secret_counts_as_missing() {
        let mut decoded = decoded_totp();
        decoded.secret = Some("  \t ".to_string());
        let err = merge(decoded, PartialRecord::default()).unwrap_err();
        assert!(matches!(err, ReconcileError::MissingSecret));
    }

    #[test]
    fn empty_issuer_is_pruned_and_label_untouched() {
        let answers = PartialRecord {
            issuer: Some(String::new()),
            ..PartialRecord::default()
        };
        let merged = merge(decoded_totp(), answers).unwrap();
        assert_eq!(merged.issuer, None);
        assert_eq!(merged.account, "bob");
    }

    #[test]
    fn issuer_prefixes_label_and_is_kept_separately() {
        let answers = PartialRecord {
            issuer: Some("Acme".to_string()),
            ..PartialRecord::default()
        };
        let merged = merge(decoded_totp(), answers).unwrap();
        assert_eq!(merged.account, "Acme:bob");
        assert_eq!(merged.issuer.as_deref(), Some("Acme"));
    }

    #[test]
    fn zero_period_is_preserved() {
        let mut decoded = decoded_totp();
        decoded.period = Some(0);
        let merged = merge(decoded, PartialRecord::default()).unwrap();
        assert_eq!(merged.period, Some(0));
    }

    #[test]
    fn zero_counter_is_preserved_for_hotp() {
        let decoded = PartialRecord {
            kind: Some(OtpKind::Hotp),
            account: Some("bob".to_string()),
            secret: Some("JBSWY3DP".to_string()),
            counter: Some(0),
            ..PartialRecord::default()
        };
        let merged = merge(decoded, PartialRecord::default()).unwrap();
        assert_eq!(merged.counter, Some(0));
    }

    #[test]
    fn variant_keeps_only_its_own_counter_field() {
        let mut decoded = decoded_totp();
        decoded.period = Some(30);
        decoded.counter = Some(5);
        let merged = merge(decoded, PartialRecord::default()).unwrap();
        assert_eq!(merged.period, Some(30));
        assert_eq!(merged.counter, None);
    }

    #[test]
    fn missing_account_or_secret_is_an_error() {
        let mut no_account = decoded_totp();
        no_account.account = None;
        assert!(matches!(
            merge(no_account, PartialRecord::default()).unwrap_err(),
            ReconcileError::MissingAccount
        ));

        let mut no_secret = decoded_totp();
        no_secret.secret = None;
        assert!(matches!(
            merge(no_secret, PartialRecord::default()).unwrap_err(),
            ReconcileError::MissingSecret
        ));
    }

    #[test]
    fn extra_params_merge_with_answer_priority() {
        let mut decoded = decoded_totp();
        decoded.extra.insert("image".to_string(), "old.png".to_string());
        let mut answers = PartialRecord::default();
        answers.extra.insert("image".to_string(), "new.png".to_string());
        let merged = merge(decoded, answers).unwrap();
        assert_eq!(merged.extra.get("image").map(String::as_str), Some("new.png"));
    }
}
