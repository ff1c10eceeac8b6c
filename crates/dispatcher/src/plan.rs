use std::collections::BTreeMap;

use allocator_core::models::Task;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 一个文件中没有任何人员可以接手的页
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    pub file_id: i64,
    pub pages: Vec<u32>,
}

/// 单个人员在本次分配中获得的页数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPages {
    pub annotation: usize,
    pub validation: usize,
}

/// 分配引擎的输出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub annotation_tasks: Vec<Task>,
    pub validation_tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotation_gaps: Vec<CoverageGap>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_gaps: Vec<CoverageGap>,
}

impl DistributionPlan {
    /// 标注任务在前，校验任务在后
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.annotation_tasks.iter().chain(self.validation_tasks.iter())
    }

    pub fn into_tasks(self) -> Vec<Task> {
        let mut tasks = self.annotation_tasks;
        tasks.extend(self.validation_tasks);
        tasks
    }

    pub fn task_count(&self) -> usize {
        self.annotation_tasks.len() + self.validation_tasks.len()
    }

    pub fn annotation_pages(&self) -> usize {
        self.annotation_tasks.iter().map(Task::pages_count).sum()
    }

    pub fn validation_pages(&self) -> usize {
        self.validation_tasks.iter().map(Task::pages_count).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.annotation_gaps.is_empty() && self.validation_gaps.is_empty()
    }

    pub fn user_pages(&self) -> BTreeMap<Uuid, UserPages> {
        let mut summary: BTreeMap<Uuid, UserPages> = BTreeMap::new();
        for task in self.tasks() {
            let entry = summary.entry(task.user_id).or_default();
            if task.is_validation {
                entry.validation += task.pages_count();
            } else {
                entry.annotation += task.pages_count();
            }
        }
        summary
    }
}
