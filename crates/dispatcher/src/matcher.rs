//! 整文件匹配
//!
//! 为人员的剩余目标页数挑选一组完整文件。优先寻找页数之和恰好等于目标的组合，
//! 找不到时按文件顺序贪心地挑选不超过剩余目标的文件。
//!
//! 精确匹配是在不同页数上的深度优先搜索，最坏情况是指数级的，
//! 因此用访问节点数预算加以限制；预算耗尽视为没有精确匹配。

use std::collections::HashSet;

use allocator_core::models::Task;
use tracing::{debug, warn};

use crate::chunker::{TaskChunker, TaskTemplate};
use crate::index::PagesIndex;
use crate::state::{FileSlot, WorkerLoad};

/// 候选文件：(在文件列表中的位置, 页数)
pub type Candidate = (usize, u32);

enum SearchOutcome {
    Found,
    NotFound,
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct WholeFileMatcher {
    search_budget: usize,
}

impl WholeFileMatcher {
    pub fn new(search_budget: usize) -> Self {
        Self {
            search_budget: search_budget.max(1),
        }
    }

    /// 先找精确组合，失败后退回贪心挑选；返回选中文件的位置
    pub fn find_files_for_task(&self, candidates: &[Candidate], target: u32) -> Vec<usize> {
        if target == 0 {
            return Vec::new();
        }
        match self.find_equal_files(candidates, target) {
            Some(files) => files,
            None => find_small_files(candidates, target),
        }
    }

    /// 按候选顺序找到的第一个页数之和恰好等于 `target` 的组合
    pub fn find_equal_files(&self, candidates: &[Candidate], target: u32) -> Option<Vec<usize>> {
        if target == 0 {
            return None;
        }

        let mut chosen = Vec::new();
        let mut visited = 0usize;
        match self.search(candidates, 0, target, &mut chosen, &mut visited) {
            SearchOutcome::Found => Some(
                chosen
                    .into_iter()
                    .map(|position| candidates[position].0)
                    .collect(),
            ),
            SearchOutcome::NotFound => None,
            SearchOutcome::Exhausted => {
                warn!(
                    "精确匹配搜索超出预算 {} (候选文件 {} 个, 目标 {} 页)，退回贪心匹配",
                    self.search_budget,
                    candidates.len(),
                    target
                );
                None
            }
        }
    }

    fn search(
        &self,
        candidates: &[Candidate],
        start: usize,
        remaining: u32,
        chosen: &mut Vec<usize>,
        visited: &mut usize,
    ) -> SearchOutcome {
        if remaining == 0 {
            return SearchOutcome::Found;
        }

        // 同一层里相同页数的文件只尝试一次
        let mut tried = HashSet::new();
        for position in start..candidates.len() {
            let size = candidates[position].1;
            if size == 0 || size > remaining || !tried.insert(size) {
                continue;
            }

            *visited += 1;
            if *visited > self.search_budget {
                return SearchOutcome::Exhausted;
            }

            chosen.push(position);
            match self.search(candidates, position + 1, remaining - size, chosen, visited) {
                SearchOutcome::NotFound => {
                    chosen.pop();
                }
                outcome => return outcome,
            }
        }
        SearchOutcome::NotFound
    }
}

/// 按顺序接受所有不超过剩余目标的文件
pub fn find_small_files(candidates: &[Candidate], target: u32) -> Vec<usize> {
    let mut remaining = target;
    let mut files = Vec::new();
    for &(file, size) in candidates {
        if remaining == 0 {
            break;
        }
        if size > 0 && size <= remaining {
            files.push(file);
            remaining -= size;
        }
    }
    files
}

/// 为每个人员分配完整文件
///
/// 人员按给定顺序处理。传入 `annotated` 时（交叉校验），人员标注过其中任意一页的文件不作为候选。
/// 选中的文件整体交给该人员并从后续候选中移除。
pub fn distribute_whole_files(
    workers: &mut [WorkerLoad],
    files: &mut [FileSlot],
    annotated: Option<&PagesIndex>,
    matcher: &WholeFileMatcher,
    chunker: &TaskChunker,
    template: &TaskTemplate,
) -> Vec<Task> {
    let mut tasks = Vec::new();

    for worker in workers.iter_mut() {
        if !worker.has_capacity() {
            continue;
        }

        let candidates: Vec<Candidate> = files
            .iter()
            .enumerate()
            .filter(|(_, file)| !file.is_empty())
            .filter(|(_, file)| {
                annotated.map_or(true, |index| {
                    index.is_disjoint(worker.user_id, file.file_id, file.pages())
                })
            })
            .map(|(position, file)| (position, file.remaining() as u32))
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let target = u32::try_from(worker.pages_number).unwrap_or(u32::MAX);
        for position in matcher.find_files_for_task(&candidates, target) {
            let file = &mut files[position];
            let pages = file.pages().to_vec();
            debug!(
                "整文件分配: 文件 {} ({} 页) -> 人员 {}",
                file.file_id,
                pages.len(),
                worker.user_id
            );
            tasks.extend(chunker.create_tasks(template, worker, file, pages));
        }
    }

    tasks
}
