use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::{AllocationError, AllocationResult};

/// 待分配的文档文件
///
/// `unassigned_pages` 缺省时，1..=pages_number 全部可分配；否则只有列出的页可分配，
/// 且必须是 1..=pages_number 的子集。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub file_id: i64,
    pub pages_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned_pages: Option<Vec<u32>>,
}

impl File {
    pub fn new(file_id: i64, pages_number: u32) -> Self {
        Self {
            file_id,
            pages_number,
            unassigned_pages: None,
        }
    }

    pub fn with_unassigned_pages(file_id: i64, pages_number: u32, pages: Vec<u32>) -> Self {
        Self {
            file_id,
            pages_number,
            unassigned_pages: Some(pages),
        }
    }

    /// 按顺序返回可分配的页
    pub fn eligible_pages(&self) -> Vec<u32> {
        match &self.unassigned_pages {
            Some(pages) => pages.clone(),
            None => (1..=self.pages_number).collect(),
        }
    }

    pub fn eligible_count(&self) -> u32 {
        match &self.unassigned_pages {
            Some(pages) => pages.len() as u32,
            None => self.pages_number,
        }
    }

    pub fn validate(&self) -> AllocationResult<()> {
        let Some(pages) = &self.unassigned_pages else {
            return Ok(());
        };

        let mut seen = BTreeSet::new();
        for &page in pages {
            if page == 0 || page > self.pages_number {
                return Err(AllocationError::InvalidFile {
                    file_id: self.file_id,
                    message: format!("页码 {page} 超出范围 1..={}", self.pages_number),
                });
            }
            if !seen.insert(page) {
                return Err(AllocationError::InvalidFile {
                    file_id: self.file_id,
                    message: format!("页码 {page} 重复"),
                });
            }
        }
        Ok(())
    }
}

/// 带有已分配页记录的文件
///
/// 两个集合由外部持久化层维护，记录在之前的分配中已经交给标注/校验任务的页，
/// 重新分配时据此计算剩余需要分配的页。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    pub file_id: i64,
    pub pages_number: u32,
    #[serde(default)]
    pub distributed_annotating_pages: Vec<u32>,
    #[serde(default)]
    pub distributed_validating_pages: Vec<u32>,
}

impl TrackedFile {
    pub fn new(file_id: i64, pages_number: u32) -> Self {
        Self {
            file_id,
            pages_number,
            distributed_annotating_pages: Vec::new(),
            distributed_validating_pages: Vec::new(),
        }
    }
}
