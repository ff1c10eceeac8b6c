use allocator_core::config::DEFAULT_MAX_PAGES_PER_TASK;
use allocator_core::models::{Task, TaskStatus};
use chrono::{DateTime, Utc};

use crate::state::{FileSlot, WorkerLoad};

/// 同一批任务共享的字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTemplate {
    pub job_id: i64,
    pub is_validation: bool,
    pub status: TaskStatus,
    pub deadline: Option<DateTime<Utc>>,
}

impl TaskTemplate {
    pub fn new(
        job_id: i64,
        is_validation: bool,
        status: TaskStatus,
        deadline: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            job_id,
            is_validation,
            status,
            deadline,
        }
    }
}

/// 任务切分器
///
/// 把分配给一个人员的页序列按顺序切成不超过 `max_pages` 页的任务。
/// 标注和校验共用。
#[derive(Debug, Clone)]
pub struct TaskChunker {
    max_pages: usize,
}

impl TaskChunker {
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages: max_pages.max(1),
        }
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// 生成任务，并从人员剩余目标和文件剩余页中扣除这些页
    pub fn create_tasks(
        &self,
        template: &TaskTemplate,
        worker: &mut WorkerLoad,
        file: &mut FileSlot,
        pages: Vec<u32>,
    ) -> Vec<Task> {
        if pages.is_empty() {
            return Vec::new();
        }

        file.remove_pages(&pages);
        worker.pages_number -= pages.len() as i64;

        pages
            .chunks(self.max_pages)
            .map(|chunk| Task {
                file_id: file.file_id,
                pages: chunk.to_vec(),
                job_id: template.job_id,
                user_id: worker.user_id,
                is_validation: template.is_validation,
                status: template.status,
                deadline: template.deadline,
            })
            .collect()
    }
}

impl Default for TaskChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES_PER_TASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn worker(pages_number: i64) -> WorkerLoad {
        WorkerLoad {
            user_id: Uuid::new_v4(),
            share_load: 1.0,
            pages_number,
        }
    }

    #[test]
    fn test_chunks_respect_max_pages() {
        let chunker = TaskChunker::default();
        let template = TaskTemplate::new(9, false, TaskStatus::Ready, None);
        let mut worker = worker(120);
        let mut file = FileSlot::new(3, (1..=120).collect());

        let tasks = chunker.create_tasks(&template, &mut worker, &mut file, (1..=120).collect());

        let sizes: Vec<usize> = tasks.iter().map(Task::pages_count).collect();
        assert_eq!(sizes, vec![50, 50, 20]);
        assert_eq!(tasks[1].pages.first(), Some(&51));
        assert_eq!(tasks[2].pages.last(), Some(&120));
        assert!(tasks.iter().all(|t| t.job_id == 9 && t.status == TaskStatus::Ready));
        assert_eq!(worker.pages_number, 0);
        assert!(file.is_empty());
    }

    #[test]
    fn test_custom_max_pages_and_order_preserved() {
        let chunker = TaskChunker::new(2);
        let template = TaskTemplate::new(1, true, TaskStatus::Pending, None);
        let mut worker = worker(10);
        let mut file = FileSlot::new(3, vec![9, 4, 7, 1, 2]);

        let tasks = chunker.create_tasks(&template, &mut worker, &mut file, vec![9, 7, 1]);

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].pages, vec![9, 7]);
        assert_eq!(tasks[1].pages, vec![1]);
        assert!(tasks.iter().all(|t| t.is_validation));
        assert_eq!(worker.pages_number, 7);
        assert_eq!(file.pages(), &[4, 2]);
    }

    #[test]
    fn test_empty_pages_emit_nothing() {
        let chunker = TaskChunker::new(0);
        assert_eq!(chunker.max_pages(), 1);

        let template = TaskTemplate::new(1, false, TaskStatus::Pending, None);
        let mut worker = worker(3);
        let mut file = FileSlot::new(3, vec![1]);
        assert!(chunker
            .create_tasks(&template, &mut worker, &mut file, Vec::new())
            .is_empty());
        assert_eq!(worker.pages_number, 3);
    }
}
