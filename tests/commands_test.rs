use std::fs;

use allocator_core::config::AppConfig;
use allocator_core::models::{File, Task};
use allocator_dispatcher::Activity;
use page_allocator::commands::{run_distribute, run_unassigned};
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

#[tokio::test]
async fn test_distribute_writes_tasks_to_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("request.json");
    let output = dir.path().join("tasks.json");

    let first = Uuid::new_v4();
    let second = Uuid::new_v4();
    let request = json!({
        "job": { "job_id": 11, "validation_type": "cross" },
        "files": [
            { "file_id": 1, "pages_number": 5 },
            { "file_id": 2, "pages_number": 3 },
            { "file_id": 3, "pages_number": 3 }
        ],
        "annotators": [
            { "user_id": first, "default_load": 1 },
            { "user_id": second, "default_load": 1, "overall_load": 0 }
        ],
        "annotation_task_status": "ready"
    });
    fs::write(&input, request.to_string()).unwrap();

    let created = run_distribute(&AppConfig::default(), &input, Some(&output))
        .await
        .unwrap();

    let written: Vec<Task> = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, created);

    let annotation: usize = written.iter().filter(|t| !t.is_validation).map(Task::pages_count).sum();
    let validation: usize = written.iter().filter(|t| t.is_validation).map(Task::pages_count).sum();
    assert_eq!(annotation, 11);
    assert_eq!(validation, 11);
    assert!(written.iter().all(|t| t.job_id == 11));
    assert!(written
        .iter()
        .filter(|t| !t.is_validation)
        .all(|t| t.status.as_str() == "ready"));
}

#[tokio::test]
async fn test_distribute_rejects_invalid_request() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("request.json");
    let request = json!({
        "job": { "job_id": 1, "validation_type": "hierarchical" },
        "files": [{ "file_id": 1, "pages_number": 2, "unassigned_pages": [3] }],
        "annotators": [{ "user_id": Uuid::new_v4(), "default_load": 1 }],
        "validators": [{ "user_id": Uuid::new_v4(), "default_load": 1 }]
    });
    fs::write(&input, request.to_string()).unwrap();

    let result = run_distribute(&AppConfig::default(), &input, None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_distribute_reports_missing_input() {
    let dir = TempDir::new().unwrap();
    let result =
        run_distribute(&AppConfig::default(), &dir.path().join("missing.json"), None).await;
    assert!(result.is_err());
}

#[test]
fn test_unassigned_lists_residual_files() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("tracked.json");
    let output = dir.path().join("files.json");
    let tracked = json!([
        { "file_id": 1, "pages_number": 3, "distributed_annotating_pages": [1, 2, 3] },
        { "file_id": 2, "pages_number": 4, "distributed_annotating_pages": [2] },
        { "file_id": 3, "pages_number": 2 }
    ]);
    fs::write(&input, tracked.to_string()).unwrap();

    let files = run_unassigned(&input, Activity::Annotation, Some(&output)).unwrap();

    assert_eq!(
        files,
        vec![
            File::with_unassigned_pages(2, 4, vec![1, 3, 4]),
            File::new(3, 2),
        ]
    );
    let written: Vec<File> = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, files);
}

#[tokio::test]
async fn test_distribute_rejects_conflicting_user_records() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("request.json");
    let shared = Uuid::new_v4();
    let request = json!({
        "job": { "job_id": 1, "validation_type": "hierarchical" },
        "files": [{ "file_id": 1, "pages_number": 4 }],
        "annotators": [{ "user_id": shared, "default_load": 1 }],
        "validators": [{ "user_id": shared, "default_load": 3 }]
    });
    fs::write(&input, request.to_string()).unwrap();

    let result = run_distribute(&AppConfig::default(), &input, None).await;
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains(&shared.to_string()));
}

#[tokio::test]
async fn test_distribute_accepts_identical_records_in_both_pools() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("request.json");
    let output = dir.path().join("tasks.json");
    let shared = Uuid::new_v4();
    let other = Uuid::new_v4();
    let request = json!({
        "job": { "job_id": 2, "validation_type": "hierarchical" },
        "files": [{ "file_id": 1, "pages_number": 4 }],
        "annotators": [{ "user_id": shared, "default_load": 1 }],
        "validators": [
            { "user_id": shared, "default_load": 1 },
            { "user_id": other, "default_load": 1 }
        ]
    });
    fs::write(&input, request.to_string()).unwrap();

    let created = run_distribute(&AppConfig::default(), &input, Some(&output))
        .await
        .unwrap();

    let annotation: usize = created.iter().filter(|t| !t.is_validation).map(Task::pages_count).sum();
    let validation: usize = created.iter().filter(|t| t.is_validation).map(Task::pages_count).sum();
    assert_eq!(annotation, 4);
    assert_eq!(validation, 4);
}
