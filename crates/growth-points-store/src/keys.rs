//! Key encoding for the ledger column families.
//!
//! User ids are variable-length strings, so compound keys use a `0x00`
//! separator between the user id and the suffix. `UserId` validation
//! guarantees the id itself contains no NUL byte, which keeps prefix scans
//! unambiguous.

use growth_points_core::{TransactionId, UserId};

/// Separator between the user id and the suffix in compound keys.
const SEP: u8 = 0x00;

/// Key for an account record.
#[must_use]
pub fn account_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_ref().to_vec()
}

/// Key for a transaction record.
#[must_use]
pub fn transaction_key(transaction_id: &TransactionId) -> Vec<u8> {
    transaction_id.to_bytes().to_vec()
}

/// Key for the per-user transaction index.
///
/// Format: `user_id || 0x00 || transaction_id (16 bytes)`. ULIDs are
/// time-ordered, so a forward scan under the prefix yields the user's
/// transactions in insertion order.
#[must_use]
pub fn user_transaction_key(user_id: &UserId, transaction_id: &TransactionId) -> Vec<u8> {
    let mut key = user_transactions_prefix(user_id);
    key.extend_from_slice(&transaction_id.to_bytes());
    key
}

/// Prefix covering all index entries for one user.
#[must_use]
pub fn user_transactions_prefix(user_id: &UserId) -> Vec<u8> {
    let id = user_id.as_ref();
    let mut prefix = Vec::with_capacity(id.len() + 1);
    prefix.extend_from_slice(id);
    prefix.push(SEP);
    prefix
}

/// Extract the transaction id from the trailing 16 bytes of an index key.
///
/// Returns `None` if the key is too short to carry a ULID.
#[must_use]
pub fn transaction_id_from_user_key(key: &[u8]) -> Option<TransactionId> {
    let start = key.len().checked_sub(16)?;
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[start..]);
    Some(TransactionId::from_bytes(bytes))
}

/// Key for a processed charge request, scoped to the account.
#[must_use]
pub fn charge_request_key(user_id: &UserId, request_id: &str) -> Vec<u8> {
    let mut key = user_transactions_prefix(user_id);
    key.extend_from_slice(request_id.as_bytes());
    key
}
