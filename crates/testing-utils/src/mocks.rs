//! Mock implementations of the collaborator traits
//!
//! The mocks record every call so tests can assert on what the service did,
//! and can be switched into a failing mode to exercise error paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use allocator_core::errors::{AllocationError, AllocationResult};
use allocator_core::models::{Task, Worker};
use allocator_core::traits::{TaskRepository, UserRepository};
use async_trait::async_trait;
use uuid::Uuid;

/// Mock implementation of UserRepository for testing
#[derive(Debug, Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<HashMap<Uuid, Worker>>>,
    lookups: Arc<Mutex<Vec<Uuid>>>,
    strict: bool,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(workers: Vec<Worker>) -> Self {
        let repo = Self::new();
        {
            let mut users = repo.users.lock().unwrap();
            for worker in workers {
                users.insert(worker.user_id, worker);
            }
        }
        repo
    }

    /// Unknown ids fail with `UserNotFound` instead of creating a record
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Ids passed to `ensure_user_exists`, in call order
    pub fn lookups(&self) -> Vec<Uuid> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn ensure_user_exists(&self, user_id: Uuid) -> AllocationResult<Worker> {
        self.lookups.lock().unwrap().push(user_id);
        let mut users = self.users.lock().unwrap();
        if self.strict && !users.contains_key(&user_id) {
            return Err(AllocationError::UserNotFound { id: user_id });
        }
        Ok(users
            .entry(user_id)
            .or_insert_with(|| Worker::new(user_id, 0))
            .clone())
    }
}

/// Mock implementation of TaskRepository for testing
#[derive(Debug, Clone, Default)]
pub struct MockTaskRepository {
    tasks: Arc<Mutex<HashMap<i64, Vec<Task>>>>,
    persist_calls: Arc<Mutex<usize>>,
    fail_persist: Arc<Mutex<bool>>,
}

impl MockTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let repo = Self::new();
        {
            let mut stored = repo.tasks.lock().unwrap();
            for task in tasks {
                stored.entry(task.job_id).or_default().push(task);
            }
        }
        repo
    }

    /// Make every following `persist_tasks` call fail
    pub fn fail_on_persist(&self) {
        *self.fail_persist.lock().unwrap() = true;
    }

    pub fn persist_calls(&self) -> usize {
        *self.persist_calls.lock().unwrap()
    }

    pub fn tasks_for(&self, job_id: i64) -> Vec<Task> {
        self.tasks
            .lock()
            .unwrap()
            .get(&job_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        self.tasks.lock().unwrap().clear();
        *self.persist_calls.lock().unwrap() = 0;
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn persist_tasks(&self, tasks: &[Task], job_id: i64) -> AllocationResult<()> {
        *self.persist_calls.lock().unwrap() += 1;
        if *self.fail_persist.lock().unwrap() {
            return Err(AllocationError::Persistence(format!(
                "mock persistence failure for job {job_id}"
            )));
        }
        self.tasks
            .lock()
            .unwrap()
            .entry(job_id)
            .or_default()
            .extend(tasks.iter().cloned());
        Ok(())
    }

    async fn find_by_job(&self, job_id: i64) -> AllocationResult<Vec<Task>> {
        Ok(self.tasks_for(job_id))
    }
}
