//! 协作方接口定义
//!
//! 分配引擎本身不做任何I/O。人员解析和任务持久化属于外部协作方，
//! 这里只定义它们的契约：
//! - `UserRepository` - 解析人员记录，未知人员创建为零负载记录
//! - `TaskRepository` - 事务性地持久化任务，并查询作业已有的任务
//!
//! 所有方法都是异步的，实现必须是 `Send + Sync`。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use allocator_core::traits::{TaskRepository, UserRepository};
//!
//! async fn resolve(users: &dyn UserRepository, ids: &[Uuid]) -> AllocationResult<Vec<Worker>> {
//!     let mut workers = Vec::with_capacity(ids.len());
//!     for id in ids {
//!         workers.push(users.ensure_user_exists(*id).await?);
//!     }
//!     Ok(workers)
//! }
//! ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AllocationResult;
use crate::models::{Task, Worker};

/// 人员仓储接口
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 返回人员记录；人员不存在时创建 `default_load == 0`、`overall_load == 0` 的记录
    async fn ensure_user_exists(&self, user_id: Uuid) -> AllocationResult<Worker>;
}

/// 任务仓储接口
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 持久化一次分配产生的全部任务，要求全部成功或全部失败
    async fn persist_tasks(&self, tasks: &[Task], job_id: i64) -> AllocationResult<()>;

    /// 查询作业已经创建的任务
    async fn find_by_job(&self, job_id: i64) -> AllocationResult<Vec<Task>>;
}
