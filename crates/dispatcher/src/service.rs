use std::collections::HashSet;
use std::sync::Arc;

use allocator_core::config::AppConfig;
use allocator_core::errors::{AllocationError, AllocationResult};
use allocator_core::models::{
    DistributionRequest, File, JobContext, Task, TaskStatus, TrackedFile, Worker,
};
use allocator_core::traits::{TaskRepository, UserRepository};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::distributor::TaskDistributor;
use crate::plan::DistributionPlan;
use crate::unassigned::{find_unassigned_files, Activity};

/// 以人员ID描述的分配请求，人员记录由 `UserRepository` 解析
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub job: JobContext,
    pub files: Vec<File>,
    #[serde(default)]
    pub annotator_ids: Vec<Uuid>,
    #[serde(default)]
    pub validator_ids: Vec<Uuid>,
    #[serde(default)]
    pub validation_files: Option<Vec<File>>,
    #[serde(default)]
    pub annotation_task_status: Option<TaskStatus>,
    #[serde(default)]
    pub validation_task_status: Option<TaskStatus>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl JobSpec {
    pub fn new(job: JobContext, files: Vec<File>) -> Self {
        Self {
            job,
            files,
            annotator_ids: Vec::new(),
            validator_ids: Vec::new(),
            validation_files: None,
            annotation_task_status: None,
            validation_task_status: None,
            deadline: None,
        }
    }

    pub fn with_annotators(mut self, ids: Vec<Uuid>) -> Self {
        self.annotator_ids = ids;
        self
    }

    pub fn with_validators(mut self, ids: Vec<Uuid>) -> Self {
        self.validator_ids = ids;
        self
    }
}

/// 分配服务
///
/// 解析人员、检查前置条件、调用分配引擎并持久化生成的任务。
/// 同一个作业的分配请求需要由调用方串行化。
pub struct DistributionService {
    users: Arc<dyn UserRepository>,
    tasks: Arc<dyn TaskRepository>,
    distributor: TaskDistributor,
    config: AppConfig,
}

impl DistributionService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        config: &AppConfig,
    ) -> Self {
        Self {
            users,
            tasks,
            distributor: TaskDistributor::new(config.distribution.clone()),
            config: config.clone(),
        }
    }

    pub fn distributor(&self) -> &TaskDistributor {
        &self.distributor
    }

    /// 为作业生成并保存任务
    #[instrument(skip(self, spec), fields(job_id = spec.job.job_id))]
    pub async fn distribute_job(&self, spec: JobSpec) -> AllocationResult<Vec<Task>> {
        let request = self.build_request(spec).await?;
        let plan = self.run(request).await?;
        Ok(plan.into_tasks())
    }

    /// 人员变化后只为尚未分配的页重新生成任务
    #[instrument(skip(self, spec, tracked), fields(job_id = spec.job.job_id))]
    pub async fn redistribute_job(
        &self,
        mut spec: JobSpec,
        tracked: &[TrackedFile],
    ) -> AllocationResult<Vec<Task>> {
        let annotation_files = if spec.job.validation_type.requires_annotation() {
            find_unassigned_files(tracked, Activity::Annotation)
        } else {
            Vec::new()
        };
        let validation_files = find_unassigned_files(tracked, Activity::Validation);

        if annotation_files.is_empty() && validation_files.is_empty() {
            info!("作业 {} 的所有页都已分配，无需重新分配", spec.job.job_id);
            return Ok(Vec::new());
        }

        info!(
            "作业 {} 重新分配: 标注剩余 {} 个文件, 校验剩余 {} 个文件",
            spec.job.job_id,
            annotation_files.len(),
            validation_files.len()
        );
        spec.files = annotation_files;
        spec.validation_files = Some(validation_files);
        self.distribute_job(spec).await
    }

    /// 对已解析好人员的请求执行分配并保存结果
    pub async fn run(&self, mut request: DistributionRequest) -> AllocationResult<DistributionPlan> {
        let job_id = request.job.job_id;
        request.retain_available_workers();
        request.validate()?;

        if request.already_created_tasks.is_empty() {
            request.already_created_tasks = self.tasks.find_by_job(job_id).await?;
            debug!(
                "作业 {} 已有 {} 个任务",
                job_id,
                request.already_created_tasks.len()
            );
        }

        let plan = self.distributor.distribute(&request);

        if let Some(gap) = plan.annotation_gaps.first() {
            self.record_gap(Activity::Annotation);
            return Err(AllocationError::AnnotationCoverageGap {
                file_id: gap.file_id,
                pages: gap.pages.len(),
            });
        }
        if let Some(gap) = plan.validation_gaps.first() {
            self.record_gap(Activity::Validation);
            return Err(AllocationError::ValidationCoverageGap {
                file_id: gap.file_id,
                pages: gap.pages.len(),
            });
        }

        let tasks: Vec<Task> = plan.tasks().cloned().collect();
        self.tasks.persist_tasks(&tasks, job_id).await?;

        if self.config.observability.metrics_enabled {
            counter!("allocation_tasks_created_total", "activity" => "annotation")
                .increment(plan.annotation_tasks.len() as u64);
            counter!("allocation_tasks_created_total", "activity" => "validation")
                .increment(plan.validation_tasks.len() as u64);
            counter!("allocation_pages_distributed_total", "activity" => "annotation")
                .increment(plan.annotation_pages() as u64);
            counter!("allocation_pages_distributed_total", "activity" => "validation")
                .increment(plan.validation_pages() as u64);
        }

        info!("作业 {} 已保存 {} 个任务", job_id, tasks.len());
        Ok(plan)
    }

    async fn build_request(&self, spec: JobSpec) -> AllocationResult<DistributionRequest> {
        let annotators = self.resolve_workers(&spec.annotator_ids).await?;
        let validators = self.resolve_workers(&spec.validator_ids).await?;

        let distribution = &self.config.distribution;
        let mut request = DistributionRequest::new(spec.job, spec.files)
            .with_annotators(annotators)
            .with_validators(validators)
            .with_statuses(
                spec.annotation_task_status
                    .unwrap_or(distribution.annotation_task_status),
                spec.validation_task_status
                    .unwrap_or(distribution.validation_task_status),
            );
        if let Some(files) = spec.validation_files {
            request = request.with_validation_files(files);
        }
        if let Some(deadline) = spec.deadline {
            request = request.with_deadline(deadline);
        }
        Ok(request)
    }

    /// 重复的ID只解析一次
    async fn resolve_workers(&self, ids: &[Uuid]) -> AllocationResult<Vec<Worker>> {
        let mut seen = HashSet::new();
        let mut workers = Vec::with_capacity(ids.len());
        for id in ids {
            if !seen.insert(*id) {
                continue;
            }
            workers.push(self.users.ensure_user_exists(*id).await?);
        }
        Ok(workers)
    }

    fn record_gap(&self, activity: Activity) {
        warn!("{} 存在无人可接手的页，拒绝保存任务", activity);
        if self.config.observability.metrics_enabled {
            counter!("allocation_coverage_gaps_total", "activity" => activity.as_str()).increment(1);
        }
    }
}
