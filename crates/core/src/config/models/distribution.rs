use serde::{Deserialize, Serialize};

use crate::models::TaskStatus;

/// 单个任务默认的最大页数
pub const DEFAULT_MAX_PAGES_PER_TASK: usize = 50;

/// 整文件精确匹配搜索默认的节点预算
pub const DEFAULT_EXACT_MATCH_SEARCH_BUDGET: usize = 100_000;

/// 分配引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// 每个任务最多包含的页数
    pub max_pages_per_task: usize,
    /// 整文件精确匹配深度优先搜索最多访问的节点数，超出后退回贪心匹配
    pub exact_match_search_budget: usize,
    pub annotation_task_status: TaskStatus,
    pub validation_task_status: TaskStatus,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            max_pages_per_task: DEFAULT_MAX_PAGES_PER_TASK,
            exact_match_search_budget: DEFAULT_EXACT_MATCH_SEARCH_BUDGET,
            annotation_task_status: TaskStatus::Pending,
            validation_task_status: TaskStatus::Pending,
        }
    }
}

impl DistributionConfig {
    pub fn with_max_pages_per_task(mut self, max_pages: usize) -> Self {
        self.max_pages_per_task = max_pages;
        self
    }

    pub fn with_exact_match_search_budget(mut self, budget: usize) -> Self {
        self.exact_match_search_budget = budget;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_pages_per_task == 0 {
            return Err(anyhow::anyhow!("单任务最大页数必须大于0"));
        }

        if self.exact_match_search_budget == 0 {
            return Err(anyhow::anyhow!("精确匹配搜索预算必须大于0"));
        }

        Ok(())
    }
}
