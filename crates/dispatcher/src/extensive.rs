//! 多重覆盖分配
//!
//! 每个文件（按页数从小到大）重复 `coverage` 轮独立分配，每轮把文件的全部可分配页发完。
//! 每次发放选择剩余目标最大的人员，只发给该人员在该文件上还没看过的页，
//! 这样每一页最终恰好由 `coverage` 个不同的人员各处理一次。

use std::collections::HashSet;

use allocator_core::models::{File, Task};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::chunker::{TaskChunker, TaskTemplate};
use crate::index::PagesIndex;
use crate::plan::CoverageGap;
use crate::state::{FileSlot, WorkerLoad};

pub fn distribute_extensive_coverage(
    files: &[File],
    workers: &mut [WorkerLoad],
    coverage: u32,
    seen: &mut PagesIndex,
    chunker: &TaskChunker,
    template: &TaskTemplate,
) -> (Vec<Task>, Vec<CoverageGap>) {
    let mut tasks = Vec::new();
    let mut gaps = Vec::new();

    let mut ordered: Vec<&File> = files.iter().collect();
    ordered.sort_by_key(|file| file.eligible_count());

    for file in ordered {
        let eligible = file.eligible_pages();
        if eligible.is_empty() {
            continue;
        }

        for pass in 1..=coverage {
            let mut slot = FileSlot::new(file.file_id, eligible.clone());
            tasks.extend(run_pass(&mut slot, workers, seen, chunker, template));

            if !slot.is_empty() {
                warn!(
                    "文件 {} 第 {}/{} 轮覆盖仍有 {} 页无人可分配",
                    file.file_id,
                    pass,
                    coverage,
                    slot.remaining()
                );
                gaps.push(CoverageGap {
                    file_id: file.file_id,
                    pages: slot.pages().to_vec(),
                });
            }
        }
    }

    (tasks, gaps)
}

fn run_pass(
    slot: &mut FileSlot,
    workers: &mut [WorkerLoad],
    seen: &mut PagesIndex,
    chunker: &TaskChunker,
    template: &TaskTemplate,
) -> Vec<Task> {
    let mut tasks = Vec::new();
    let mut skipped: HashSet<Uuid> = HashSet::new();

    while !slot.is_empty() {
        let over_target = match pick_worker(workers, slot, seen, &skipped, true) {
            Some(index) => Some((index, false)),
            // 目标用完但仍有页：交给还有未看过页的人员，覆盖完整优先于目标
            None => pick_worker(workers, slot, seen, &skipped, false).map(|index| (index, true)),
        };
        let Some((index, over_target)) = over_target else {
            break;
        };

        let worker = &mut workers[index];
        let limit = if over_target {
            chunker.max_pages()
        } else {
            usize::try_from(worker.pages_number)
                .unwrap_or(0)
                .min(chunker.max_pages())
        };

        let pages: Vec<u32> = slot
            .pages()
            .iter()
            .copied()
            .filter(|&page| !seen.contains(worker.user_id, slot.file_id, page))
            .take(limit)
            .collect();
        if pages.is_empty() {
            skipped.insert(worker.user_id);
            continue;
        }

        debug!(
            "多重覆盖: 文件 {} 的 {} 页 -> 人员 {} (超出目标: {})",
            slot.file_id,
            pages.len(),
            worker.user_id,
            over_target
        );
        seen.record(worker.user_id, slot.file_id, &pages);
        tasks.extend(chunker.create_tasks(template, worker, slot, pages));
    }

    tasks
}

/// 剩余目标最大、且在剩余页中还有没看过的页的人员，并列时取靠前者
///
/// 只看本轮剩余的页：人员在该文件其它页上的历史记录不影响该人员能否接手这些页。
fn pick_worker(
    workers: &[WorkerLoad],
    slot: &FileSlot,
    seen: &PagesIndex,
    skipped: &HashSet<Uuid>,
    require_capacity: bool,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, worker) in workers.iter().enumerate() {
        if require_capacity && !worker.has_capacity() {
            continue;
        }
        if skipped.contains(&worker.user_id)
            || !seen.has_unseen(worker.user_id, slot.file_id, slot.pages())
        {
            continue;
        }
        if best.map_or(true, |current| worker.pages_number > workers[current].pages_number) {
            best = Some(index);
        }
    }
    best
}
