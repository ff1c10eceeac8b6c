use allocator_core::config::DistributionConfig;
use allocator_core::models::{DistributionRequest, File, JobContext, TaskStatus, ValidationType};
use allocator_dispatcher::{find_unassigned_files, Activity, TaskDistributor};
use allocator_testing_utils::{
    annotation_tasks, assert_chunk_bound, assert_cross_exclusivity, assert_exact_coverage, files,
    pages_count, total_pages, validation_tasks, workers, TaskBuilder, TrackedFileBuilder,
    WorkerBuilder,
};

#[test]
fn test_three_files_two_annotators_whole_file_split() {
    let annotators = workers(2);
    let job_files = files(&[5, 3, 3]);
    let request = DistributionRequest::new(JobContext::new(1, ValidationType::Cross), job_files)
        .with_annotators(annotators.clone());

    let plan = TaskDistributor::default().distribute(&request);

    assert_eq!(plan.annotation_pages(), 11);
    assert_eq!(plan.annotation_tasks.len(), 3);
    // 5页的文件整体交给一个人员，另一个人员拿到两个3页的文件
    let five_page_owner = plan
        .annotation_tasks
        .iter()
        .find(|t| t.file_id == 1)
        .map(|t| t.user_id)
        .unwrap();
    let owners_of_small: Vec<_> = plan
        .annotation_tasks
        .iter()
        .filter(|t| t.file_id != 1)
        .map(|t| t.user_id)
        .collect();
    assert_eq!(owners_of_small.len(), 2);
    assert!(owners_of_small.iter().all(|u| *u != five_page_owner));

    let per_user = plan.user_pages();
    let mut annotated: Vec<usize> = per_user.values().map(|p| p.annotation).collect();
    annotated.sort_unstable();
    assert_eq!(annotated, vec![5, 6]);

    assert_eq!(plan.validation_pages(), 11);
    assert!(plan.is_complete());
    let tasks = plan.into_tasks();
    assert_cross_exclusivity(&tasks);
    assert_chunk_bound(&tasks, 50);
}

#[test]
fn test_single_large_file_is_chunked() {
    let request = DistributionRequest::new(
        JobContext::new(1, ValidationType::Hierarchical),
        files(&[120]),
    )
    .with_annotators(workers(1))
    .with_validators(workers(1));

    let plan = TaskDistributor::default().distribute(&request);

    let sizes: Vec<usize> = plan.annotation_tasks.iter().map(|t| t.pages_count()).collect();
    assert_eq!(sizes, vec![50, 50, 20]);
    let sizes: Vec<usize> = plan.validation_tasks.iter().map(|t| t.pages_count()).collect();
    assert_eq!(sizes, vec![50, 50, 20]);
}

#[test]
fn test_page_conservation_for_weighted_pools() {
    let scenarios: Vec<(Vec<u32>, Vec<(u32, u32)>)> = vec![
        (vec![5, 3, 3], vec![(1, 0), (1, 0)]),
        (vec![17, 4, 60, 1, 9, 23], vec![(3, 10), (1, 0), (2, 50)]),
        (vec![2, 2, 2, 2, 2, 2, 2], vec![(1, 0), (1, 0), (1, 0), (5, 0)]),
        (vec![101], vec![(1, 100), (4, 0)]),
        (vec![1], vec![(1, 0), (1, 0), (1, 0)]),
    ];

    for (sizes, pool) in scenarios {
        let job_files = files(&sizes);
        let total = total_pages(&job_files);
        let annotators: Vec<_> = pool
            .iter()
            .map(|&(default_load, overall_load)| {
                WorkerBuilder::new()
                    .with_default_load(default_load)
                    .with_overall_load(overall_load)
                    .build()
            })
            .collect();
        let request = DistributionRequest::new(
            JobContext::new(3, ValidationType::Hierarchical),
            job_files,
        )
        .with_annotators(annotators)
        .with_validators(workers(2));

        let tasks = TaskDistributor::default().distribute(&request).into_tasks();

        assert_eq!(pages_count(annotation_tasks(&tasks)), total, "sizes {sizes:?}");
        assert_eq!(pages_count(validation_tasks(&tasks)), total, "sizes {sizes:?}");
        assert_chunk_bound(&tasks, 50);
        assert!(tasks.iter().all(|t| t.job_id == 3));
    }
}

#[test]
fn test_cross_validation_never_checks_own_pages() {
    let job_files = files(&[7, 4, 9, 2, 12, 30]);
    let total = total_pages(&job_files);
    let request = DistributionRequest::new(JobContext::new(1, ValidationType::Cross), job_files)
        .with_annotators(workers(3));

    let plan = TaskDistributor::new(DistributionConfig::default().with_max_pages_per_task(8))
        .distribute(&request);

    assert!(plan.is_complete());
    assert_eq!(plan.validation_pages(), total);
    let tasks = plan.into_tasks();
    assert_cross_exclusivity(&tasks);
    assert_chunk_bound(&tasks, 8);
}

#[test]
fn test_extensive_coverage_uses_distinct_workers() {
    let job_files = files(&[5, 8, 2]);
    let total = total_pages(&job_files);
    let request = DistributionRequest::new(
        JobContext::new(1, ValidationType::ExtensiveCoverage).with_extensive_coverage(3),
        job_files.clone(),
    )
    .with_annotators(workers(4))
    .with_validators(workers(3));

    let plan = TaskDistributor::default().distribute(&request);

    assert!(plan.is_complete());
    assert_eq!(plan.annotation_pages(), total * 3);
    assert_eq!(plan.validation_pages(), total * 3);
    assert_exact_coverage(&job_files, &plan.annotation_tasks, 3);
    assert_exact_coverage(&job_files, &plan.validation_tasks, 3);
}

#[test]
fn test_extensive_type_with_single_coverage_uses_standard_flow() {
    let job_files = files(&[6, 6]);
    let request = DistributionRequest::new(
        JobContext::new(1, ValidationType::ExtensiveCoverage),
        job_files.clone(),
    )
    .with_annotators(workers(2))
    .with_validators(workers(1));

    let plan = TaskDistributor::default().distribute(&request);

    assert_eq!(plan.annotation_tasks.len(), 2);
    assert_exact_coverage(&job_files, &plan.annotation_tasks, 1);
    assert_exact_coverage(&job_files, &plan.validation_tasks, 1);
}

#[test]
fn test_validation_only_job() {
    let job_files = files(&[10, 3]);
    let request = DistributionRequest::new(
        JobContext::new(1, ValidationType::ValidationOnly),
        job_files.clone(),
    )
    .with_validators(workers(2))
    .with_statuses(TaskStatus::Pending, TaskStatus::Ready);

    let plan = TaskDistributor::default().distribute(&request);

    assert!(plan.annotation_tasks.is_empty());
    assert_eq!(plan.validation_pages(), 13);
    assert!(plan.validation_tasks.iter().all(|t| t.status == TaskStatus::Ready));
    assert_exact_coverage(&job_files, &plan.validation_tasks, 1);
}

#[test]
fn test_separate_validation_files() {
    let request = DistributionRequest::new(
        JobContext::new(1, ValidationType::Hierarchical),
        files(&[4]),
    )
    .with_validation_files(vec![File::with_unassigned_pages(1, 4, vec![2, 3])])
    .with_annotators(workers(1))
    .with_validators(workers(1));

    let plan = TaskDistributor::default().distribute(&request);

    assert_eq!(plan.annotation_pages(), 4);
    assert_eq!(plan.validation_tasks.len(), 1);
    assert_eq!(plan.validation_tasks[0].pages, vec![2, 3]);
}

#[test]
fn test_redistribution_only_covers_unassigned_pages() {
    let tracked = vec![
        TrackedFileBuilder::new(1, 6).annotated(1..=6).validated(1..=6).build(),
        TrackedFileBuilder::new(2, 5).annotated([1, 2]).validated([]).build(),
        TrackedFileBuilder::new(3, 3).build(),
    ];

    let annotation_files = find_unassigned_files(&tracked, Activity::Annotation);
    let validation_files = find_unassigned_files(&tracked, Activity::Validation);
    assert_eq!(annotation_files.len(), 2);
    assert_eq!(validation_files.len(), 2);

    let request = DistributionRequest::new(
        JobContext::new(1, ValidationType::Hierarchical),
        annotation_files,
    )
    .with_validation_files(validation_files)
    .with_annotators(workers(2))
    .with_validators(workers(1));

    let plan = TaskDistributor::default().distribute(&request);

    assert_eq!(plan.annotation_pages(), 3 + 3);
    assert_eq!(plan.validation_pages(), 5 + 3);
    assert!(plan.tasks().all(|t| t.file_id != 1));
    assert!(plan
        .annotation_tasks
        .iter()
        .filter(|t| t.file_id == 2)
        .all(|t| t.pages.iter().all(|p| *p >= 3)));
}

#[test]
fn test_already_created_annotations_exclude_cross_validators() {
    let pool = workers(2);
    let earlier = TaskBuilder::new()
        .with_file_id(1)
        .with_pages(vec![1, 2, 3, 4])
        .with_user(pool[0].user_id)
        .build();

    let request = DistributionRequest::new(JobContext::new(1, ValidationType::Cross), Vec::new())
        .with_validation_files(files(&[4]))
        .with_annotators(pool.clone())
        .with_already_created_tasks(vec![earlier.clone()]);

    let plan = TaskDistributor::default().distribute(&request);

    assert!(plan.annotation_tasks.is_empty());
    assert_eq!(plan.validation_pages(), 4);
    assert!(plan.validation_tasks.iter().all(|t| t.user_id == pool[1].user_id));

    let mut tasks = vec![earlier];
    tasks.extend(plan.validation_tasks);
    assert_cross_exclusivity(&tasks);
}

#[test]
fn test_already_seen_pages_are_not_covered_twice() {
    let pool = workers(3);
    let earlier = TaskBuilder::new()
        .with_file_id(1)
        .with_pages(vec![1, 2])
        .with_user(pool[0].user_id)
        .build();

    let request = DistributionRequest::new(
        JobContext::new(1, ValidationType::ExtensiveCoverage).with_extensive_coverage(2),
        files(&[2]),
    )
    .with_annotators(pool.clone())
    .with_validators(workers(2))
    .with_already_created_tasks(vec![earlier]);

    let plan = TaskDistributor::default().distribute(&request);

    assert!(plan.is_complete());
    assert!(plan.annotation_tasks.iter().all(|t| t.user_id != pool[0].user_id));
    assert_exact_coverage(&files(&[2]), &plan.annotation_tasks, 2);
}

#[test]
fn test_extensive_redistribution_covers_residual_pages() {
    let pool = workers(2);
    let earlier: Vec<_> = pool
        .iter()
        .map(|worker| {
            TaskBuilder::new()
                .with_file_id(1)
                .with_pages((1..=6).collect())
                .with_user(worker.user_id)
                .build()
        })
        .collect();

    let tracked = vec![TrackedFileBuilder::new(1, 12).annotated(1..=6).build()];
    let residual = find_unassigned_files(&tracked, Activity::Annotation);
    assert_eq!(residual, vec![File::with_unassigned_pages(1, 12, (7..=12).collect())]);

    let request = DistributionRequest::new(
        JobContext::new(1, ValidationType::ExtensiveCoverage).with_extensive_coverage(2),
        residual.clone(),
    )
    .with_annotators(pool.clone())
    .with_validators(workers(2))
    .with_already_created_tasks(earlier);

    let plan = TaskDistributor::default().distribute(&request);

    assert!(plan.is_complete());
    assert_eq!(plan.annotation_pages(), 12);
    assert!(plan
        .annotation_tasks
        .iter()
        .all(|t| t.pages.iter().all(|page| (7..=12).contains(page))));
    assert_exact_coverage(&residual, &plan.annotation_tasks, 2);
}
