//! 部分文件标注分配
//!
//! 整文件匹配之后仍有剩余页时，按文件顺序逐页交给当前人员；当前人员的剩余目标用完后
//! 换下一个人员。缓冲区达到单任务页数上限、换人或换文件时生成任务，
//! 所以每个任务的页只属于一个文件。

use allocator_core::models::Task;
use tracing::debug;

use crate::chunker::{TaskChunker, TaskTemplate};
use crate::state::{FileSlot, WorkerLoad};

pub fn distribute_annotation_partial_files(
    workers: &mut [WorkerLoad],
    files: &mut [FileSlot],
    chunker: &TaskChunker,
    template: &TaskTemplate,
) -> Vec<Task> {
    let mut tasks = Vec::new();
    if workers.is_empty() {
        return tasks;
    }

    let mut order: Vec<usize> = (0..workers.len())
        .filter(|&index| workers[index].has_capacity())
        .collect();
    order.sort_by(|&a, &b| workers[b].pages_number.cmp(&workers[a].pages_number));
    if order.is_empty() {
        // 目标已全部用完却仍有剩余页，交给负载最高的人员
        order.push(0);
    }

    let mut cursor = 0;
    for file in files.iter_mut() {
        if file.is_empty() {
            continue;
        }

        let pages = file.pages().to_vec();
        let mut buffer: Vec<u32> = Vec::with_capacity(chunker.max_pages());
        for page in pages {
            let worker = &workers[order[cursor]];
            let exhausted = worker.pages_number - buffer.len() as i64 <= 0;
            if exhausted && cursor + 1 < order.len() {
                flush(&mut buffer, &mut workers[order[cursor]], file, chunker, template, &mut tasks);
                cursor += 1;
            }

            buffer.push(page);
            if buffer.len() == chunker.max_pages() {
                flush(&mut buffer, &mut workers[order[cursor]], file, chunker, template, &mut tasks);
            }
        }
        flush(&mut buffer, &mut workers[order[cursor]], file, chunker, template, &mut tasks);
    }

    tasks
}

fn flush(
    buffer: &mut Vec<u32>,
    worker: &mut WorkerLoad,
    file: &mut FileSlot,
    chunker: &TaskChunker,
    template: &TaskTemplate,
    tasks: &mut Vec<Task>,
) {
    if buffer.is_empty() {
        return;
    }
    debug!(
        "部分文件分配: 文件 {} 的 {} 页 -> 人员 {}",
        file.file_id,
        buffer.len(),
        worker.user_id
    );
    let pages = std::mem::take(buffer);
    tasks.extend(chunker.create_tasks(template, worker, file, pages));
}
