//! Test data builders for creating test entities
//!
//! This module provides builder patterns for creating test data with
//! sensible defaults and easy customization.

use allocator_core::models::{File, Task, TaskStatus, TrackedFile, Worker};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Builder for creating test Worker records
pub struct WorkerBuilder {
    worker: Worker,
}

impl WorkerBuilder {
    pub fn new() -> Self {
        Self {
            worker: Worker::new(Uuid::new_v4(), 1),
        }
    }

    pub fn with_id(mut self, user_id: Uuid) -> Self {
        self.worker.user_id = user_id;
        self
    }

    pub fn with_default_load(mut self, default_load: u32) -> Self {
        self.worker.default_load = default_load;
        self
    }

    pub fn with_overall_load(mut self, overall_load: u32) -> Self {
        self.worker.overall_load = overall_load;
        self
    }

    pub fn build(self) -> Worker {
        self.worker
    }
}

impl Default for WorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test Task records
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self {
            task: Task {
                file_id: 1,
                pages: vec![1],
                job_id: 1,
                user_id: Uuid::new_v4(),
                is_validation: false,
                status: TaskStatus::Pending,
                deadline: None,
            },
        }
    }

    pub fn with_file_id(mut self, file_id: i64) -> Self {
        self.task.file_id = file_id;
        self
    }

    pub fn with_pages(mut self, pages: Vec<u32>) -> Self {
        self.task.pages = pages;
        self
    }

    pub fn with_job_id(mut self, job_id: i64) -> Self {
        self.task.job_id = job_id;
        self
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.task.user_id = user_id;
        self
    }

    pub fn validation(mut self) -> Self {
        self.task.is_validation = true;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.task.deadline = Some(deadline);
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating test TrackedFile records
pub struct TrackedFileBuilder {
    file: TrackedFile,
}

impl TrackedFileBuilder {
    pub fn new(file_id: i64, pages_number: u32) -> Self {
        Self {
            file: TrackedFile::new(file_id, pages_number),
        }
    }

    pub fn annotated(mut self, pages: impl IntoIterator<Item = u32>) -> Self {
        self.file.distributed_annotating_pages = pages.into_iter().collect();
        self
    }

    pub fn validated(mut self, pages: impl IntoIterator<Item = u32>) -> Self {
        self.file.distributed_validating_pages = pages.into_iter().collect();
        self
    }

    pub fn build(self) -> TrackedFile {
        self.file
    }
}

/// `count` workers with `default_load = 1` and no outstanding work
pub fn workers(count: usize) -> Vec<Worker> {
    (0..count).map(|_| WorkerBuilder::new().build()).collect()
}

/// Files with ids starting at 1 and the given page counts
pub fn files(page_counts: &[u32]) -> Vec<File> {
    page_counts
        .iter()
        .enumerate()
        .map(|(index, &pages)| File::new(index as i64 + 1, pages))
        .collect()
}
