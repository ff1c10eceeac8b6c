use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 分配结果中的任务
///
/// 一个任务只属于一个文件和一个人员，`pages` 非空且保持原有页序。
/// 任务一经引擎产出即不再修改，持久化由协作方负责。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub file_id: i64,
    pub pages: Vec<u32>,
    pub job_id: i64,
    pub user_id: Uuid,
    pub is_validation: bool,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

impl Task {
    pub fn pages_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_annotation(&self) -> bool {
        !self.is_validation
    }
}

/// 任务状态
///
/// 初始状态由调用方决定，标注任务和校验任务可以使用不同的初始状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Ready,
    InProgress,
    Finished,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Ready => "ready",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Finished => "finished",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::errors::AllocationError;

    fn from_str(status: &str) -> Result<Self, Self::Err> {
        match status.to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "ready" => Ok(TaskStatus::Ready),
            "in_progress" | "in progress" => Ok(TaskStatus::InProgress),
            "finished" => Ok(TaskStatus::Finished),
            _ => Err(crate::errors::AllocationError::Configuration(format!(
                "Invalid task status: {status}"
            ))),
        }
    }
}
