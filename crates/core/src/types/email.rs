//! Email addresses entered by admins.
//!
//! The backend does the authoritative validation. This only rejects input
//! that obviously is not an address so forms can answer without a round trip.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as an email address.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email address is required")]
    Blank,
    #[error("email address is longer than {0} characters")]
    TooLong(usize),
    #[error("email address must contain a single @")]
    At,
    #[error("email address cannot contain spaces")]
    Whitespace,
    #[error("email address needs a name before the @")]
    NoMailbox,
    #[error("email address needs a domain such as example.com")]
    BadDomain,
}

/// A trimmed email address with a lowercase domain.
///
/// ```
/// use storedesk_core::Email;
///
/// let email = Email::parse("  Ada.Obi@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "Ada.Obi@example.com");
/// assert!(Email::parse("ada@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Longest address accepted (RFC 5321 path limit).
    pub const MAX_LEN: usize = 254;

    /// Validate and normalise an address.
    ///
    /// # Errors
    ///
    /// Returns the first problem found with the input.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EmailError::Blank);
        }
        if input.len() > Self::MAX_LEN {
            return Err(EmailError::TooLong(Self::MAX_LEN));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (mailbox, domain) = input.split_once('@').ok_or(EmailError::At)?;
        if domain.contains('@') {
            return Err(EmailError::At);
        }
        if mailbox.is_empty() {
            return Err(EmailError::NoMailbox);
        }
        let labels_ok = domain
            .split('.')
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'));
        if !domain.contains('.') || !labels_ok {
            return Err(EmailError::BadDomain);
        }

        Ok(Self(format!("{mailbox}@{}", domain.to_ascii_lowercase())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalises_whitespace_and_domain_case() {
        let email = Email::parse(" Ops+Lagos@Store.Example.NG\n").unwrap();
        assert_eq!(email.as_str(), "Ops+Lagos@store.example.ng");
        assert_eq!(email.domain(), "store.example.ng");
    }

    #[test]
    fn test_rejections() {
        let cases = [
            ("   ", EmailError::Blank),
            ("ops.example.com", EmailError::At),
            ("ops@@example.com", EmailError::At),
            ("ops@team@example.com", EmailError::At),
            ("ada obi@example.com", EmailError::Whitespace),
            ("@example.com", EmailError::NoMailbox),
            ("ops@localhost", EmailError::BadDomain),
            ("ops@example.", EmailError::BadDomain),
            ("ops@-example.com", EmailError::BadDomain),
        ];
        for (input, expected) in cases {
            assert_eq!(Email::parse(input), Err(expected), "{input:?}");
        }

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(Email::parse(&long), Err(EmailError::TooLong(Email::MAX_LEN)));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Email = serde_json::from_str("\"ops@example.com\"").unwrap();
        assert_eq!(ok.to_string(), "ops@example.com");
        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
    }
}
