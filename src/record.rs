use std::collections::BTreeMap;
use std::fmt;

/// Вид OTP: по времени (totp) или по счётчику (hotp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpKind {
    Totp,
    Hotp,
}

impl OtpKind {
    pub fn parse(s: &str) -> Option<OtpKind> {
        match s.to_lowercase().as_str() {
            "totp" => Some(OtpKind::Totp),
            "hotp" => Some(OtpKind::Hotp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OtpKind::Totp => "totp",
            OtpKind::Hotp => "hotp",
        }
    }
}

impl fmt::Display for OtpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HMAC algorithm of the secret, when the artifact pins one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    pub fn parse(s: &str) -> Option<Algorithm> {
        match s.to_uppercase().as_str() {
            "SHA1" => Some(Algorithm::Sha1),
            "SHA256" => Some(Algorithm::Sha256),
            "SHA512" => Some(Algorithm::Sha512),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha512 => "SHA512",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of the merge: what a decoded artifact or the interactive
/// questions managed to fill in. Absence is always `None`, never an
/// empty string or zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRecord {
    pub kind: Option<OtpKind>,
    pub issuer: Option<String>,
    pub account: Option<String>,
    pub secret: Option<String>,
    pub algorithm: Option<Algorithm>,
    pub digits: Option<u32>,
    pub period: Option<u64>,
    pub counter: Option<u64>,
    /// Query parameters we do not model, carried through untouched.
    pub extra: BTreeMap<String, String>,
}

impl PartialRecord {
    /// Минимум, без которого запись бесполезна: вид, аккаунт и секрет.
    pub fn is_valid(&self) -> bool {
        self.kind.is_some()
            && self.account.as_deref().is_some_and(|a| !a.is_empty())
            && self.secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// The reconciled record, ready for encoding. `account` is the transported
/// label, so it already carries the `issuer:` prefix when `issuer` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpRecord {
    pub kind: OtpKind,
    pub account: String,
    pub issuer: Option<String>,
    pub secret: String,
    pub algorithm: Option<Algorithm>,
    pub digits: Option<u32>,
    pub period: Option<u64>,
    pub counter: Option<u64>,
    pub extra: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(OtpKind::parse("totp"), Some(OtpKind::Totp));
        assert_eq!(OtpKind::parse("HOTP"), Some(OtpKind::Hotp));
        assert_eq!(OtpKind::parse("motp"), None);
    }

    #[test]
    fn algorithm_parse_is_case_insensitive() {
        assert_eq!(Algorithm::parse("sha1"), Some(Algorithm::Sha1));
        assert_eq!(Algorithm::parse("SHA512"), Some(Algorithm::Sha512));
        assert_eq!(Algorithm::parse("MD5"), None);
    }

    #[test]
    fn valid_needs_kind_account_and_secret() {
        let mut r = PartialRecord::default();
        assert!(!r.is_valid());

        r.kind = Some(OtpKind::Totp);
        r.account = Some("bob".to_string());
        r.secret = Some("JBSWY3DP".to_string());
        assert!(r.is_valid());

        r.secret = Some(String::new());
        assert!(!r.is_valid());
    }
}
