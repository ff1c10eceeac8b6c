pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

pub use config::{AppConfig, DistributionConfig, ObservabilityConfig};
pub use errors::*;
pub use models::{
    DistributionRequest, File, JobContext, Task, TaskStatus, TrackedFile, ValidationType, Worker,
};
pub use traits::{TaskRepository, UserRepository};
