//! Identifier types for the growth-points ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Maximum accepted length of a user identifier in bytes.
pub const MAX_USER_ID_LEN: usize = 128;

/// An opaque user identifier.
///
/// User ids come from the identity provider (the `sub` claim of a verified
/// token) and are treated as opaque strings. They are validated on
/// construction: non-empty, at most [`MAX_USER_ID_LEN`] bytes, no control
/// characters. The NUL exclusion matters to the store, which uses `0x00` as a
/// key separator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a `UserId` from a raw identifier string.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidUserId`] if the string is empty, too long,
    /// or contains control characters.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdError> {
        let raw = raw.into();
        if raw.is_empty() || raw.len() > MAX_USER_ID_LEN {
            return Err(IdError::InvalidUserId);
        }
        if raw.chars().any(char::is_control) {
            return Err(IdError::InvalidUserId);
        }
        Ok(Self(raw))
    }

    /// Generate a random `UserId` (for testing).
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("user-{}", uuid::Uuid::new_v4()))
    }

    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl AsRef<[u8]> for UserId {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A transaction identifier using ULID for time-ordering.
///
/// ULIDs sort chronologically, so per-account transaction indexes come back
/// in insertion order without a secondary sort key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(Ulid);

impl TransactionId {
    /// Generate a new `TransactionId` with the current timestamp.
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new())
    }

    /// Return the underlying ULID.
    #[must_use]
    pub const fn as_ulid(&self) -> &Ulid {
        &self.0
    }

    /// Return the 16-byte binary form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Reconstruct a `TransactionId` from its binary form.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Ulid::from_bytes(bytes))
    }
}

impl FromStr for TransactionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ulid = Ulid::from_string(s).map_err(|_| IdError::InvalidUlid)?;
        Ok(Self(ulid))
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.0)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TransactionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(id: TransactionId) -> Self {
        id.0.to_string()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not an acceptable user identifier.
    #[error("invalid user id")]
    InvalidUserId,

    /// The input is not a valid ULID.
    #[error("invalid ULID format")]
    InvalidUlid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_roundtrip() {
        let id = UserId::generate();
        let parsed = UserId::from_str(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn user_id_rejects_empty() {
        assert_eq!(UserId::new(""), Err(IdError::InvalidUserId));
    }

    #[test]
    fn user_id_rejects_control_chars() {
        assert_eq!(UserId::new("abc\0def"), Err(IdError::InvalidUserId));
        assert_eq!(UserId::new("abc\ndef"), Err(IdError::InvalidUserId));
    }

    #[test]
    fn user_id_rejects_oversized() {
        let raw = "x".repeat(MAX_USER_ID_LEN + 1);
        assert_eq!(UserId::new(raw), Err(IdError::InvalidUserId));
    }

    #[test]
    fn user_id_serde_json() {
        let id = UserId::new("firebase-uid-42").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"firebase-uid-42\"");
        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn user_id_serde_rejects_invalid() {
        assert!(serde_json::from_str::<UserId>("\"\"").is_err());
    }

    #[test]
    fn transaction_id_roundtrip() {
        let id = TransactionId::generate();
        let parsed = TransactionId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn transaction_id_bytes_roundtrip() {
        let id = TransactionId::generate();
        assert_eq!(TransactionId::from_bytes(id.to_bytes()), id);
    }

    #[test]
    fn transaction_ids_sort_by_generation_time() {
        let a = TransactionId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = TransactionId::generate();
        assert!(a < b);
    }
}
