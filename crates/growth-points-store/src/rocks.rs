//! `RocksDB` storage implementation.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use growth_points_core::{Account, PointsTransaction, TransactionId, UserId};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::locks::AccountLocks;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed ledger store.
///
/// All balance mutations take the owning account's mutex before the
/// read-modify-write, and persist through a single `WriteBatch`, so the
/// transaction record and the balance update land together or not at all.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    locks: AccountLocks,
}

impl RocksStore {
    /// Open or create a ledger database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            locks: AccountLocks::new(),
        })
    }

    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Load the account, or start a fresh one (get-or-create boundary).
    fn load_or_create(&self, user_id: &UserId) -> Result<Account> {
        Ok(self
            .get_account(user_id)?
            .unwrap_or_else(|| Account::new(user_id.clone())))
    }

    /// Look up the transaction id recorded for a processed charge request.
    fn processed_request(&self, user_id: &UserId, request_id: &str) -> Result<Option<TransactionId>> {
        let cf = self.cf(cf::CHARGE_REQUESTS)?;
        let key = keys::charge_request_key(user_id, request_id);

        let value = self
            .db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match value {
            Some(bytes) => {
                let bytes: [u8; 16] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Serialization("charge request value is not a ULID".into())
                })?;
                Ok(Some(TransactionId::from_bytes(bytes)))
            }
            None => Ok(None),
        }
    }

    /// Persist an updated account plus its new transaction in one batch.
    ///
    /// Caller must hold the account lock.
    fn commit(
        &self,
        account: &Account,
        transaction: &PointsTransaction,
        request_key: Option<Vec<u8>>,
    ) -> Result<()> {
        let cf_accounts = self.cf(cf::ACCOUNTS)?;
        let cf_tx = self.cf(cf::TRANSACTIONS)?;
        let cf_tx_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;

        let account_value = Self::serialize(account)?;
        let tx_value = Self::serialize(transaction)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_accounts, keys::account_key(&account.user_id), &account_value);
        batch.put_cf(&cf_tx, keys::transaction_key(&transaction.id), &tx_value);
        batch.put_cf(
            &cf_tx_by_user,
            keys::user_transaction_key(&account.user_id, &transaction.id),
            [],
        );
        if let Some(key) = request_key {
            let cf_requests = self.cf(cf::CHARGE_REQUESTS)?;
            batch.put_cf(&cf_requests, key, transaction.id.to_bytes());
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl Store for RocksStore {
    fn get_account(&self, user_id: &UserId) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn record(
        &self,
        user_id: &UserId,
        amount: i64,
        meta: serde_json::Value,
    ) -> Result<PointsTransaction> {
        if amount == 0 {
            return Err(StoreError::InvalidAmount);
        }

        let lock = self.locks.acquire(user_id);
        let _guard = lock.lock();

        let mut account = self.load_or_create(user_id)?;
        let new_balance = account.points + amount;
        if new_balance < 0 {
            return Err(StoreError::InsufficientPoints {
                balance: account.points,
                required: -amount,
            });
        }

        let transaction = if amount > 0 {
            account.lifetime_earned += amount;
            PointsTransaction::earn(user_id.clone(), amount, new_balance, meta)
        } else {
            account.lifetime_spent += -amount;
            PointsTransaction::spend(user_id.clone(), -amount, new_balance, meta)
        };
        account.points = new_balance;
        account.last_active_at = transaction.created_at;

        self.commit(&account, &transaction, None)?;

        tracing::debug!(
            user_id = %user_id,
            amount = %amount,
            balance = %new_balance,
            "Recorded transaction"
        );

        Ok(transaction)
    }

    fn try_charge(
        &self,
        user_id: &UserId,
        cost: i64,
        meta: serde_json::Value,
        request_id: Option<&str>,
    ) -> Result<PointsTransaction> {
        if cost <= 0 {
            return Err(StoreError::InvalidAmount);
        }

        let lock = self.locks.acquire(user_id);
        let _guard = lock.lock();

        if let Some(request_id) = request_id {
            if let Some(transaction_id) = self.processed_request(user_id, request_id)? {
                return Err(StoreError::DuplicateRequest {
                    request_id: request_id.to_string(),
                    transaction_id,
                });
            }
        }

        let mut account = self.load_or_create(user_id)?;
        if !account.has_sufficient_points(cost) {
            return Err(StoreError::InsufficientPoints {
                balance: account.points,
                required: cost,
            });
        }

        let new_balance = account.points - cost;
        let transaction = PointsTransaction::spend(user_id.clone(), cost, new_balance, meta);
        account.points = new_balance;
        account.lifetime_spent += cost;
        account.last_active_at = transaction.created_at;

        let request_key = request_id.map(|id| keys::charge_request_key(user_id, id));
        self.commit(&account, &transaction, request_key)?;

        tracing::debug!(
            user_id = %user_id,
            cost = %cost,
            balance = %new_balance,
            "Charge recorded"
        );

        Ok(transaction)
    }

    fn get_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<PointsTransaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;
        let key = keys::transaction_key(transaction_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_transactions_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PointsTransaction>> {
        let cf_by_user = self.cf(cf::TRANSACTIONS_BY_USER)?;
        let prefix = keys::user_transactions_prefix(user_id);

        // ULID keys scan oldest-first; collect then reverse for newest-first.
        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            all_keys.push(key.to_vec());
        }
        all_keys.reverse();

        let mut transactions = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if transactions.len() >= limit {
                break;
            }
            let Some(tx_id) = keys::transaction_id_from_user_key(&key) else {
                continue;
            };
            if let Some(tx) = self.get_transaction(&tx_id)? {
                transactions.push(tx);
            }
        }

        Ok(transactions)
    }
}
