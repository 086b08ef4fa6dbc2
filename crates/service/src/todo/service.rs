use std::sync::Arc;

use models::todo::{now_millis, Todo, TodoInput};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::pagination::ListOptions;
use crate::todo::repository::TodoRepository;

/// The todo access layer: list, find, insert, update, delete.
///
/// Stateless apart from the repository handle. Every operation is a single
/// repository call and every failure is returned unchanged.
pub struct TodoService<R: TodoRepository + ?Sized> {
    repo: Arc<R>,
    clock: fn() -> u64,
}

impl<R: TodoRepository + ?Sized> TodoService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self::with_clock(repo, now_millis) }

    /// Use `clock` instead of wall-clock millis as the key source for inserts.
    pub fn with_clock(repo: Arc<R>, clock: fn() -> u64) -> Self { Self { repo, clock } }

    pub async fn list(&self, options: ListOptions) -> Result<Vec<Todo>, ServiceError> {
        let (limit, reverse) = options.normalize();
        let todos = self.repo.scan(limit, reverse).await?;
        debug!(limit, reverse, count = todos.len(), "listed todos");
        Ok(todos)
    }

    pub async fn find(&self, key: u64) -> Result<Todo, ServiceError> {
        self.repo
            .get(key)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("todo {}", key)))
    }

    /// Store a new todo under the current epoch millis.
    ///
    /// Two inserts in the same millisecond share a key; the later one wins.
    ///
    /// # Examples
    /// ```
    /// use service::todo::{repository::mock::MockTodoRepository, service::TodoService};
    /// use models::todo::TodoInput;
    /// use std::sync::Arc;
    /// let svc = TodoService::with_clock(Arc::new(MockTodoRepository::default()), || 1_700_000_000_000);
    /// let todo = tokio_test::block_on(svc.insert(TodoInput { message: "hello".into(), done: false })).unwrap();
    /// assert_eq!(todo.key, 1_700_000_000_000);
    /// assert_eq!(todo.message, "hello");
    /// ```
    #[instrument(skip(self, input))]
    pub async fn insert(&self, input: TodoInput) -> Result<Todo, ServiceError> {
        let key = (self.clock)();
        let todo = self.write(key, input).await?;
        info!(key = todo.key, "todo_inserted");
        Ok(todo)
    }

    /// Overwrite the todo at `key`, creating it when absent.
    #[instrument(skip(self, input))]
    pub async fn update(&self, key: u64, input: TodoInput) -> Result<Todo, ServiceError> {
        let todo = self.write(key, input).await?;
        info!(key, done = todo.done, "todo_updated");
        Ok(todo)
    }

    /// Remove the todo at `key`. Absent keys are not an error.
    #[instrument(skip(self))]
    pub async fn delete(&self, key: u64) -> Result<(), ServiceError> {
        let existed = self.repo.remove(key).await?;
        info!(key, existed, "todo_deleted");
        Ok(())
    }

    async fn write(&self, key: u64, input: TodoInput) -> Result<Todo, ServiceError> {
        let todo = Todo::new(key, input);
        self.repo.put(todo.clone()).await?;
        Ok(todo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_repo;
    use crate::todo::repository::mock::MockTodoRepository;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TICK: AtomicU64 = AtomicU64::new(1_000);

    fn ticking() -> u64 { TICK.fetch_add(1, Ordering::SeqCst) }

    fn input(message: &str) -> TodoInput {
        TodoInput { message: message.into(), done: false }
    }

    fn mock_service() -> (Arc<MockTodoRepository>, TodoService<MockTodoRepository>) {
        let repo = Arc::new(MockTodoRepository::default());
        (Arc::clone(&repo), TodoService::with_clock(repo, ticking))
    }

    #[tokio::test]
    async fn insert_then_find_returns_equal_todo() -> Result<(), anyhow::Error> {
        let (_, svc) = mock_service();
        let created = svc.insert(TodoInput { message: "m1".into(), done: true }).await?;
        let found = svc.find(created.key).await?;
        assert_eq!(found, created);
        assert_eq!(found.message, "m1");
        assert!(found.done);
        Ok(())
    }

    #[tokio::test]
    async fn insert_is_a_single_write() -> Result<(), anyhow::Error> {
        let (repo, svc) = mock_service();
        svc.insert(input("hello")).await?;
        assert_eq!(repo.writes(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn hello_scenario_ends_in_not_found() -> Result<(), anyhow::Error> {
        let (_, svc) = mock_service();
        let created = svc.insert(input("hello")).await?;
        let k = created.key;
        assert_eq!(svc.find(k).await?, Todo { key: k, message: "hello".into(), done: false });

        svc.delete(k).await?;
        assert!(matches!(svc.find(k).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_key_is_ok() -> Result<(), anyhow::Error> {
        let (_, svc) = mock_service();
        svc.delete(424242).await?;
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_key() -> Result<(), anyhow::Error> {
        let (repo, svc) = mock_service();
        let created = svc.insert(input("draft")).await?;
        let updated = svc
            .update(created.key, TodoInput { message: "final".into(), done: true })
            .await?;
        assert_eq!(updated.key, created.key);
        assert_eq!(svc.find(created.key).await?, updated);
        assert_eq!(repo.writes(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn update_creates_missing_entry() -> Result<(), anyhow::Error> {
        let (_, svc) = mock_service();
        let todo = svc.update(77, input("upsert")).await?;
        assert_eq!(svc.find(77).await?, todo);
        Ok(())
    }

    #[tokio::test]
    async fn list_defaults_to_newest_first_and_honors_limit() -> Result<(), anyhow::Error> {
        let (_, svc) = mock_service();
        let mut keys = Vec::new();
        for i in 0..5 {
            keys.push(svc.insert(input(&format!("t{i}"))).await?.key);
        }

        let all = svc.list(ListOptions::default()).await?;
        let listed: Vec<u64> = all.iter().map(|t| t.key).collect();
        let mut expected = keys.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(listed, expected);

        let two = svc.list(ListOptions { limit: Some(2), reverse: None }).await?;
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].key, expected[0]);

        let oldest = svc.list(ListOptions { limit: Some(1), reverse: Some(false) }).await?;
        assert_eq!(oldest[0].key, *keys.iter().min().unwrap());
        Ok(())
    }

    #[tokio::test]
    async fn list_on_empty_store_is_empty() -> Result<(), anyhow::Error> {
        let (_, svc) = mock_service();
        assert!(svc.list(ListOptions::default()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn same_millisecond_inserts_collide() -> Result<(), anyhow::Error> {
        let repo = Arc::new(MockTodoRepository::default());
        let svc = TodoService::with_clock(repo, || 5);
        svc.insert(input("first")).await?;
        svc.insert(input("second")).await?;
        let all = svc.list(ListOptions::default()).await?;
        assert_eq!(all, vec![Todo { key: 5, message: "second".into(), done: false }]);
        Ok(())
    }

    #[tokio::test]
    async fn works_over_the_embedded_store() -> Result<(), anyhow::Error> {
        let (repo, path) = temp_repo()?;
        let svc = TodoService::new(Arc::clone(&repo));

        let created = svc.insert(input("persisted")).await?;
        assert_eq!(svc.find(created.key).await?, created);
        assert_eq!(svc.list(ListOptions::default()).await?, vec![created.clone()]);
        svc.delete(created.key).await?;
        assert!(matches!(svc.find(created.key).await, Err(ServiceError::NotFound(_))));

        drop(svc);
        drop(repo);
        let _ = std::fs::remove_file(path);
        Ok(())
    }

    #[tokio::test]
    async fn dyn_repository_is_accepted() -> Result<(), anyhow::Error> {
        let repo: Arc<dyn TodoRepository> = Arc::new(MockTodoRepository::default());
        let svc: TodoService<dyn TodoRepository> = TodoService::with_clock(repo, ticking);
        let created = svc.insert(input("dyn")).await?;
        assert_eq!(svc.find(created.key).await?.message, "dyn");
        Ok(())
    }
}
