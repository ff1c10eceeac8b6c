//! 页分配引擎
//!
//! 把作业的文件页分配给标注人员和校验人员，生成不超过单任务页数上限的任务。
//! 引擎部分（`load`、`matcher`、`annotation`、`validation`、`extensive`）是纯同步计算；
//! `service` 通过协作方接口解析人员并保存任务。

pub mod annotation;
pub mod chunker;
pub mod distributor;
pub mod extensive;
pub mod in_memory;
pub mod index;
pub mod load;
pub mod matcher;
pub mod plan;
pub mod service;
pub mod state;
pub mod unassigned;
pub mod validation;

pub use chunker::{TaskChunker, TaskTemplate};
pub use distributor::{distribute, TaskDistributor};
pub use in_memory::{InMemoryTaskRepository, InMemoryUserRepository};
pub use index::PagesIndex;
pub use load::calculate_users_load;
pub use matcher::{find_small_files, WholeFileMatcher};
pub use plan::{CoverageGap, DistributionPlan, UserPages};
pub use service::{DistributionService, JobSpec};
pub use state::{FileSlot, WorkerLoad};
pub use unassigned::{find_unassigned_files, find_unassigned_pages, Activity};
pub use validation::choose_validators_users;
