use std::path::Path;
use std::sync::Arc;

use redb::backends::InMemoryBackend;
use redb::{Database, TableDefinition};
use tracing::info;

use crate::errors::ModelError;

/// Todos keyed by creation millis; values are JSON-encoded `Todo` bytes.
pub const TODOS: TableDefinition<u64, &[u8]> = TableDefinition::new("todos");

/// Process-wide handle to the embedded store. Dropping the last clone closes it.
pub type StoreHandle = Arc<Database>;

/// Open (or create) the store file at `path` and make sure its tables exist.
pub fn open<P: AsRef<Path>>(path: P) -> Result<StoreHandle, ModelError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let db = Database::create(path)?;
    ensure_tables(&db)?;
    info!(path = %path.display(), "store opened");
    Ok(Arc::new(db))
}

/// Volatile store for tests and throwaway runs.
pub fn open_in_memory() -> Result<StoreHandle, ModelError> {
    let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
    ensure_tables(&db)?;
    Ok(Arc::new(db))
}

// Read transactions fail on tables that were never created, so create them up front.
fn ensure_tables(db: &Database) -> Result<(), ModelError> {
    let txn = db.begin_write()?;
    txn.open_table(TODOS)?;
    txn.commit()?;
    Ok(())
}
