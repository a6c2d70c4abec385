//! Validated session identifiers

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::error::{Error, Result};

static SESSION_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{10,50}$").expect("session id pattern is valid")
});

/// A client-chosen session id: 10-50 ASCII letters, digits, `_` or `-`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Validate a raw id
    pub fn parse(raw: &str) -> Result<Self> {
        if SESSION_ID_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(Error::InvalidSession(format!(
                "expected 10-50 characters of [A-Za-z0-9_-], got {} characters",
                raw.chars().count()
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        for raw in ["abcdefghij", "session_1234-ABCD", &"x".repeat(50)] {
            let id = SessionId::parse(raw).unwrap();
            assert_eq!(id.as_str(), raw);
        }
    }

    #[test]
    fn test_invalid_ids() {
        for raw in [
            "",
            "short",
            "abcdefghi",
            &"x".repeat(51),
            "has space in it",
            "../../etc/passwd",
            "abcdefghij\n",
            "ünïcödé-session",
        ] {
            assert!(
                matches!(SessionId::parse(raw), Err(Error::InvalidSession(_))),
                "accepted {:?}",
                raw
            );
        }
    }
}
