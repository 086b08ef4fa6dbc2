#![cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

use models::db::{self, TODOS};
use models::todo::Todo;

use crate::storage::json_kv_store::JsonKvStore;
use crate::todo::repository::KvTodoRepository;

/// A redb-backed repository on a fresh file under the temp dir.
/// Returns the path so the caller can reopen or remove it.
pub fn temp_repo() -> Result<(Arc<KvTodoRepository>, PathBuf), anyhow::Error> {
    let path = std::env::temp_dir().join(format!("svc_todos_{}.redb", uuid::Uuid::new_v4()));
    let store = JsonKvStore::<Todo>::new(db::open(&path)?, TODOS);
    Ok((Arc::new(KvTodoRepository::new(store)), path))
}
