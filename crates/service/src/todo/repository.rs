use std::sync::Arc;

use async_trait::async_trait;
use models::todo::Todo;

use crate::errors::ServiceError;
use crate::storage::json_kv_store::JsonKvStore;

/// Persistence seam under the todo access layer.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn scan(&self, limit: usize, reverse: bool) -> Result<Vec<Todo>, ServiceError>;
    async fn get(&self, key: u64) -> Result<Option<Todo>, ServiceError>;
    async fn put(&self, todo: Todo) -> Result<(), ServiceError>;
    async fn remove(&self, key: u64) -> Result<bool, ServiceError>;
}

/// Repository over the embedded store. Store calls run on tokio's blocking pool.
pub struct KvTodoRepository {
    store: Arc<JsonKvStore<Todo>>,
}

impl KvTodoRepository {
    pub fn new(store: Arc<JsonKvStore<Todo>>) -> Self { Self { store } }

    async fn blocking<T, F>(&self, f: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&JsonKvStore<Todo>) -> Result<T, ServiceError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&*store))
            .await
            .map_err(ServiceError::store)?
    }
}

#[async_trait]
impl TodoRepository for KvTodoRepository {
    async fn scan(&self, limit: usize, reverse: bool) -> Result<Vec<Todo>, ServiceError> {
        self.blocking(move |s| s.scan(limit, reverse)).await
    }

    async fn get(&self, key: u64) -> Result<Option<Todo>, ServiceError> {
        self.blocking(move |s| s.get(key)).await
    }

    async fn put(&self, todo: Todo) -> Result<(), ServiceError> {
        self.blocking(move |s| s.put(todo.key, &todo)).await
    }

    async fn remove(&self, key: u64) -> Result<bool, ServiceError> {
        self.blocking(move |s| s.remove(key)).await
    }
}

/// In-memory repository for tests and doc examples.
///
/// Not meant for production wiring: nothing is persisted and every call
/// takes one process-wide lock.
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockTodoRepository {
        todos: Mutex<BTreeMap<u64, Todo>>,
        writes: AtomicUsize,
    }

    impl MockTodoRepository {
        /// Number of `put` calls seen so far.
        pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

        fn todos(&self) -> MutexGuard<'_, BTreeMap<u64, Todo>> {
            self.todos.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[async_trait]
    impl TodoRepository for MockTodoRepository {
        async fn scan(&self, limit: usize, reverse: bool) -> Result<Vec<Todo>, ServiceError> {
            let todos = self.todos();
            let values = todos.values().cloned();
            Ok(if reverse { values.rev().take(limit).collect() } else { values.take(limit).collect() })
        }

        async fn get(&self, key: u64) -> Result<Option<Todo>, ServiceError> {
            Ok(self.todos().get(&key).cloned())
        }

        async fn put(&self, todo: Todo) -> Result<(), ServiceError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.todos().insert(todo.key, todo);
            Ok(())
        }

        async fn remove(&self, key: u64) -> Result<bool, ServiceError> {
            Ok(self.todos().remove(&key).is_some())
        }
    }
}
