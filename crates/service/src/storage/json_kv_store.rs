use std::{marker::PhantomData, sync::Arc};

use models::db::StoreHandle;
use redb::{ReadableTable, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ServiceError;

/// Ordered `u64 -> V` map over one redb table, with `V` stored as JSON bytes.
///
/// Every call is one redb transaction and blocks on disk I/O; async callers
/// should run it on the blocking pool.
pub struct JsonKvStore<V> {
    db: StoreHandle,
    table: TableDefinition<'static, u64, &'static [u8]>,
    _value: PhantomData<fn() -> V>,
}

impl<V> JsonKvStore<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Bind a typed view to `table` of an already opened store.
    pub fn new(db: StoreHandle, table: TableDefinition<'static, u64, &'static [u8]>) -> Arc<Self> {
        Arc::new(Self { db, table, _value: PhantomData })
    }

    /// Get value by key.
    pub fn get(&self, key: u64) -> Result<Option<V>, ServiceError> {
        let txn = self.db.begin_read().map_err(ServiceError::store)?;
        let table = txn.open_table(self.table).map_err(ServiceError::store)?;
        match table.get(key).map_err(ServiceError::store)? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or overwrite the value at `key` and commit.
    pub fn put(&self, key: u64, value: &V) -> Result<(), ServiceError> {
        let bytes = serde_json::to_vec(value).map_err(ServiceError::codec)?;
        let txn = self.db.begin_write().map_err(ServiceError::store)?;
        {
            let mut table = txn.open_table(self.table).map_err(ServiceError::store)?;
            table.insert(key, bytes.as_slice()).map_err(ServiceError::store)?;
        }
        txn.commit().map_err(ServiceError::store)
    }

    /// Remove a key and commit; returns whether it existed.
    pub fn remove(&self, key: u64) -> Result<bool, ServiceError> {
        let txn = self.db.begin_write().map_err(ServiceError::store)?;
        let existed = {
            let mut table = txn.open_table(self.table).map_err(ServiceError::store)?;
            let removed = table.remove(key).map_err(ServiceError::store)?;
            removed.is_some()
        };
        txn.commit().map_err(ServiceError::store)?;
        Ok(existed)
    }

    /// Up to `limit` values in key order, descending when `reverse`.
    pub fn scan(&self, limit: usize, reverse: bool) -> Result<Vec<V>, ServiceError> {
        let txn = self.db.begin_read().map_err(ServiceError::store)?;
        let table = txn.open_table(self.table).map_err(ServiceError::store)?;
        let mut range = table.iter().map_err(ServiceError::store)?;
        let mut out = Vec::new();
        while out.len() < limit {
            let entry = if reverse { range.next_back() } else { range.next() };
            let Some(entry) = entry else { break };
            let (_, value) = entry.map_err(ServiceError::store)?;
            out.push(decode(value.value())?);
        }
        Ok(out)
    }
}

fn decode<V: DeserializeOwned>(bytes: &[u8]) -> Result<V, ServiceError> {
    serde_json::from_slice(bytes).map_err(ServiceError::codec)
}
