//! 单次分配调用内部使用的临时状态
//!
//! 调用方传入的 `Worker`/`File` 记录只读；引擎把需要递减的计数器拷贝到这里，
//! 调用结束后即丢弃。

use std::collections::HashSet;

use allocator_core::models::File;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 人员在本次分配中的负载
///
/// `share_load` 是归一化后的份额，`pages_number` 是剩余目标页数，
/// 随着页被分配而递减；校验的第二轮补齐可能使其变为负数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerLoad {
    pub user_id: Uuid,
    pub share_load: f64,
    pub pages_number: i64,
}

impl WorkerLoad {
    pub fn has_capacity(&self) -> bool {
        self.pages_number > 0
    }
}

/// 文件在本次分配中剩余待分配的页
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSlot {
    pub file_id: i64,
    pages: Vec<u32>,
}

impl FileSlot {
    pub fn new(file_id: i64, pages: Vec<u32>) -> Self {
        Self { file_id, pages }
    }

    pub fn from_file(file: &File) -> Self {
        Self::new(file.file_id, file.eligible_pages())
    }

    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    pub fn remaining(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// 移除已分配的页，保持剩余页的顺序
    pub fn remove_pages(&mut self, taken: &[u32]) {
        if taken.len() >= self.pages.len() && self.pages.iter().all(|p| taken.contains(p)) {
            self.pages.clear();
            return;
        }
        let taken: HashSet<u32> = taken.iter().copied().collect();
        self.pages.retain(|page| !taken.contains(page));
    }
}
