//! 校验覆盖规划
//!
//! 校验人员池由校验类型决定：交叉校验使用标注人员本身，其余类型使用独立的校验人员池。
//! 交叉校验时，人员不能校验自己在同一文件上标注过的页。
//!
//! 部分页分两轮分配，共享同一份"各文件剩余页"：
//! 1. 第一轮只在人员剩余目标大于0时发放页；
//! 2. 第一轮后仍有剩余页时，第二轮按同样的人员顺序发放全部剩余页而不检查目标，
//!    保证每一页都有人校验，即使部分人员因此超出名义目标。

use allocator_core::models::{Task, ValidationType, Worker};
use tracing::debug;

use crate::chunker::{TaskChunker, TaskTemplate};
use crate::index::PagesIndex;
use crate::state::{FileSlot, WorkerLoad};

/// 根据校验类型选择校验人员
pub fn choose_validators_users(
    validation_type: ValidationType,
    annotators: &[Worker],
    validators: &[Worker],
) -> Vec<Worker> {
    if validation_type.uses_validator_pool() {
        validators.to_vec()
    } else {
        annotators.to_vec()
    }
}

pub fn distribute_validation_partial_files(
    validators: &mut [WorkerLoad],
    files: &mut [FileSlot],
    annotated: Option<&PagesIndex>,
    chunker: &TaskChunker,
    template: &TaskTemplate,
) -> Vec<Task> {
    let mut tasks = plan_validation_pass(validators, files, annotated, chunker, template, true);

    if files.iter().any(|file| !file.is_empty()) {
        debug!("第一轮校验分配后仍有剩余页，开始不检查目标的补齐分配");
        tasks.extend(plan_validation_pass(
            validators, files, annotated, chunker, template, false,
        ));
    }

    tasks
}

fn plan_validation_pass(
    validators: &mut [WorkerLoad],
    files: &mut [FileSlot],
    annotated: Option<&PagesIndex>,
    chunker: &TaskChunker,
    template: &TaskTemplate,
    count_annotator_pages: bool,
) -> Vec<Task> {
    let mut tasks = Vec::new();

    for validator in validators.iter_mut() {
        for file in files.iter_mut() {
            if file.is_empty() {
                continue;
            }
            if count_annotator_pages && !validator.has_capacity() {
                break;
            }

            let limit = if count_annotator_pages {
                usize::try_from(validator.pages_number).unwrap_or(0)
            } else {
                file.remaining()
            };

            let user_id = validator.user_id;
            let pages: Vec<u32> = file
                .pages()
                .iter()
                .copied()
                .filter(|&page| {
                    annotated.map_or(true, |index| !index.contains(user_id, file.file_id, page))
                })
                .take(limit)
                .collect();
            if pages.is_empty() {
                continue;
            }

            debug!(
                "校验分配: 文件 {} 的 {} 页 -> 人员 {} (检查目标: {})",
                file.file_id,
                pages.len(),
                user_id,
                count_annotator_pages
            );
            tasks.extend(chunker.create_tasks(template, validator, file, pages));
        }
    }

    tasks
}
