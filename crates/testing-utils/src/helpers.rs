//! Invariant helpers shared by the distribution test suites

use std::collections::{HashMap, HashSet};

use allocator_core::models::{File, Task};
use uuid::Uuid;

/// Sum of eligible pages over all files
pub fn total_pages(files: &[File]) -> usize {
    files.iter().map(|f| f.eligible_count() as usize).sum()
}

pub fn annotation_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| !t.is_validation).collect()
}

pub fn validation_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_validation).collect()
}

pub fn pages_count<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> usize {
    tasks.into_iter().map(Task::pages_count).sum()
}

pub fn pages_by_user<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> HashMap<Uuid, usize> {
    let mut totals = HashMap::new();
    for task in tasks {
        *totals.entry(task.user_id).or_insert(0) += task.pages_count();
    }
    totals
}

/// Distinct users holding each `(file_id, page)`
pub fn coverage_per_page<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
) -> HashMap<(i64, u32), HashSet<Uuid>> {
    let mut coverage: HashMap<(i64, u32), HashSet<Uuid>> = HashMap::new();
    for task in tasks {
        for page in &task.pages {
            coverage
                .entry((task.file_id, *page))
                .or_default()
                .insert(task.user_id);
        }
    }
    coverage
}

/// Every task holds between 1 and `max_pages` pages
pub fn assert_chunk_bound(tasks: &[Task], max_pages: usize) {
    for task in tasks {
        assert!(
            (1..=max_pages).contains(&task.pages_count()),
            "task for file {} has {} pages (limit {})",
            task.file_id,
            task.pages_count(),
            max_pages
        );
    }
}

/// No validator checks a page they annotated in the same file
pub fn assert_cross_exclusivity(tasks: &[Task]) {
    let mut annotated: HashSet<(Uuid, i64, u32)> = HashSet::new();
    for task in tasks.iter().filter(|t| !t.is_validation) {
        for page in &task.pages {
            annotated.insert((task.user_id, task.file_id, *page));
        }
    }
    for task in tasks.iter().filter(|t| t.is_validation) {
        for page in &task.pages {
            assert!(
                !annotated.contains(&(task.user_id, task.file_id, *page)),
                "user {} validates own page {} of file {}",
                task.user_id,
                page,
                task.file_id
            );
        }
    }
}

/// Every eligible page of every file is held by exactly `coverage` distinct users
pub fn assert_exact_coverage<'a>(
    files: &[File],
    tasks: impl IntoIterator<Item = &'a Task>,
    coverage: usize,
) {
    let per_page = coverage_per_page(tasks);
    for file in files {
        for page in file.eligible_pages() {
            let users = per_page.get(&(file.file_id, page)).map_or(0, HashSet::len);
            assert_eq!(
                users, coverage,
                "page {} of file {} covered by {} users",
                page, file.file_id, users
            );
        }
    }
}
