//! 内存中的协作方实现，供命令行和测试使用

use std::collections::HashMap;

use allocator_core::errors::AllocationResult;
use allocator_core::models::{Task, Worker};
use allocator_core::traits::{TaskRepository, UserRepository};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, Worker>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = Worker>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|w| (w.user_id, w)).collect()),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn ensure_user_exists(&self, user_id: Uuid) -> AllocationResult<Worker> {
        if let Some(worker) = self.users.read().await.get(&user_id) {
            return Ok(worker.clone());
        }

        let mut users = self.users.write().await;
        let worker = users.entry(user_id).or_insert_with(|| {
            debug!("人员 {} 不存在，创建权重为0的记录", user_id);
            Worker::new(user_id, 0)
        });
        Ok(worker.clone())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<i64, Vec<Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all_tasks(&self) -> Vec<Task> {
        self.tasks.read().await.values().flatten().cloned().collect()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    /// 整批写入；已存在的相同任务不会重复保存
    async fn persist_tasks(&self, tasks: &[Task], job_id: i64) -> AllocationResult<()> {
        let mut store = self.tasks.write().await;
        let stored = store.entry(job_id).or_default();
        for task in tasks {
            if !stored.contains(task) {
                stored.push(task.clone());
            }
        }
        Ok(())
    }

    async fn find_by_job(&self, job_id: i64) -> AllocationResult<Vec<Task>> {
        Ok(self
            .tasks
            .read()
            .await
            .get(&job_id)
            .cloned()
            .unwrap_or_default())
    }
}
