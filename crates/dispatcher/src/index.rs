use std::collections::{HashMap, HashSet};

use allocator_core::models::Task;
use uuid::Uuid;

/// 人员 -> 文件 -> 页 的索引
///
/// 交叉校验用它记录每个人员标注过的页，多重覆盖用它记录每个人员已经看过的页。
/// 首次访问时按空集合处理。
#[derive(Debug, Clone, Default)]
pub struct PagesIndex {
    inner: HashMap<Uuid, HashMap<i64, HashSet<u32>>>,
}

impl PagesIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut index = Self::new();
        for task in tasks {
            index.record_task(task);
        }
        index
    }

    pub fn record(&mut self, user_id: Uuid, file_id: i64, pages: &[u32]) {
        self.inner
            .entry(user_id)
            .or_default()
            .entry(file_id)
            .or_default()
            .extend(pages.iter().copied());
    }

    pub fn record_task(&mut self, task: &Task) {
        self.record(task.user_id, task.file_id, &task.pages);
    }

    pub fn contains(&self, user_id: Uuid, file_id: i64, page: u32) -> bool {
        self.pages(user_id, file_id)
            .is_some_and(|pages| pages.contains(&page))
    }

    pub fn pages(&self, user_id: Uuid, file_id: i64) -> Option<&HashSet<u32>> {
        self.inner.get(&user_id).and_then(|files| files.get(&file_id))
    }

    /// 给定的页中至少有一页人员在该文件上没有记录
    pub fn has_unseen(&self, user_id: Uuid, file_id: i64, pages: &[u32]) -> bool {
        match self.pages(user_id, file_id) {
            Some(recorded) => pages.iter().any(|page| !recorded.contains(page)),
            None => !pages.is_empty(),
        }
    }

    /// 人员在该文件上没有记录任何给定的页
    pub fn is_disjoint(&self, user_id: Uuid, file_id: i64, pages: &[u32]) -> bool {
        match self.pages(user_id, file_id) {
            Some(recorded) => pages.iter().all(|page| !recorded.contains(page)),
            None => true,
        }
    }
}
