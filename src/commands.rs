//! 命令行子命令的实现
//!
//! 每个命令读取 JSON 输入，在内存协作方上运行分配服务，结果以 JSON 输出。

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use allocator_core::config::AppConfig;
use allocator_core::models::{File, JobContext, Task, TaskStatus, TrackedFile, Worker};
use allocator_dispatcher::{
    find_unassigned_files, Activity, DistributionService, InMemoryTaskRepository,
    InMemoryUserRepository, JobSpec,
};
use allocator_core::traits::TaskRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// `distribute` 命令的输入文件格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionInput {
    pub job: JobContext,
    pub files: Vec<File>,
    #[serde(default)]
    pub annotators: Vec<Worker>,
    #[serde(default)]
    pub validators: Vec<Worker>,
    #[serde(default)]
    pub validation_files: Option<Vec<File>>,
    #[serde(default)]
    pub annotation_task_status: Option<TaskStatus>,
    #[serde(default)]
    pub validation_task_status: Option<TaskStatus>,
    #[serde(default)]
    pub already_created_tasks: Vec<Task>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl DistributionInput {
    fn job_spec(&self) -> JobSpec {
        JobSpec {
            job: self.job.clone(),
            files: self.files.clone(),
            annotator_ids: self.annotators.iter().map(|w| w.user_id).collect(),
            validator_ids: self.validators.iter().map(|w| w.user_id).collect(),
            validation_files: self.validation_files.clone(),
            annotation_task_status: self.annotation_task_status,
            validation_task_status: self.validation_task_status,
            deadline: self.deadline,
        }
    }

    /// 两个人员池合并后的人员记录
    ///
    /// 同一人员可以同时出现在标注和校验列表中，但两处的负载必须一致。
    fn user_records(&self) -> Result<Vec<Worker>> {
        let mut records: HashMap<_, Worker> = HashMap::new();
        for worker in self.annotators.iter().chain(self.validators.iter()) {
            match records.get(&worker.user_id) {
                Some(existing) if existing != worker => bail!(
                    "人员 {} 在标注和校验列表中的负载不一致",
                    worker.user_id
                ),
                Some(_) => {}
                None => {
                    records.insert(worker.user_id, worker.clone());
                }
            }
        }
        Ok(records.into_values().collect())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取输入文件失败: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("解析输入文件失败: {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("序列化输出失败")?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("写入输出文件失败: {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

/// 运行一次分配并输出生成的任务
pub async fn run_distribute(
    config: &AppConfig,
    input: &Path,
    output: Option<&Path>,
) -> Result<Vec<Task>> {
    let input: DistributionInput = read_json(input)?;
    let job_id = input.job.job_id;

    let users = Arc::new(InMemoryUserRepository::with_users(input.user_records()?));
    let tasks = Arc::new(InMemoryTaskRepository::new());
    if !input.already_created_tasks.is_empty() {
        tasks
            .persist_tasks(&input.already_created_tasks, job_id)
            .await
            .context("载入已有任务失败")?;
    }

    let service = DistributionService::new(users, tasks, config);
    let created = service
        .distribute_job(input.job_spec())
        .await
        .with_context(|| format!("作业 {job_id} 分配失败"))?;

    info!("作业 {} 生成 {} 个任务", job_id, created.len());
    write_json(&created, output)?;
    Ok(created)
}

/// 输出指定活动上仍需分配的文件
pub fn run_unassigned(input: &Path, activity: Activity, output: Option<&Path>) -> Result<Vec<File>> {
    let tracked: Vec<TrackedFile> = read_json(input)?;
    let files = find_unassigned_files(&tracked, activity);

    info!(
        "{} 个文件中有 {} 个仍需{}分配",
        tracked.len(),
        files.len(),
        activity
    );
    write_json(&files, output)?;
    Ok(files)
}

/// 输出生效的配置
pub fn run_validate_config(config: &AppConfig) -> Result<()> {
    config.validate()?;
    let toml = config.to_toml()?;
    println!("{toml}");
    info!("配置验证通过");
    Ok(())
}
