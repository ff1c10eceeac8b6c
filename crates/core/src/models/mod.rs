//! # 数据模型
//!
//! 定义分页分配系统的核心数据结构：文档文件、工作人员、任务以及作业上下文。
//!
//! ## 核心模型
//!
//! ### File - 待分配的文档
//! 由文件ID、总页数以及可选的"未分配页"集合组成。未分配页缺省时，1..=pages_number 全部可分配。
//!
//! ### Worker - 标注/校验人员
//! 只携带调用方提供的只读负载信息（`default_load`、`overall_load`）。
//! 分配过程中的临时字段由引擎内部的负载记录维护，不会回写到调用方的数据。
//!
//! ### Task - 任务
//! 一个人员、一个文件、不超过单任务页数上限的连续页序列、一种活动类型（标注或校验）。
//!
//! ### JobContext / DistributionRequest - 作业参数
//! 校验类型、覆盖次数以及一次分配调用需要的全部输入。
//!
//! ## 使用示例
//!
//! ```rust
//! use allocator_core::models::{File, Worker};
//! use uuid::Uuid;
//!
//! let file = File::new(1, 12);
//! assert_eq!(file.eligible_count(), 12);
//!
//! let annotator = Worker::new(Uuid::new_v4(), 2);
//! assert!(annotator.is_available());
//! ```

pub mod file;
pub mod job;
pub mod task;
pub mod worker;

pub use file::{File, TrackedFile};
pub use job::{DistributionRequest, JobContext, ValidationType};
pub use task::{Task, TaskStatus};
pub use worker::Worker;
