//! 分配引擎入口
//!
//! 按校验类型串联各个步骤：
//! - 标注：覆盖次数大于1时走多重覆盖分配，否则依次做负载计算、整文件匹配和部分文件切分；
//! - 校验：先选出校验人员池，再走同样的流程；交叉校验时排除人员自己标注过的页。
//!
//! 引擎是纯同步计算，不做任何 I/O，也不修改调用方传入的记录。

use allocator_core::config::DistributionConfig;
use allocator_core::models::{DistributionRequest, File, Task, ValidationType, Worker};
use tracing::{debug, info, warn};

use crate::annotation::distribute_annotation_partial_files;
use crate::chunker::{TaskChunker, TaskTemplate};
use crate::extensive::distribute_extensive_coverage;
use crate::index::PagesIndex;
use crate::load::calculate_users_load;
use crate::matcher::{distribute_whole_files, WholeFileMatcher};
use crate::plan::{CoverageGap, DistributionPlan};
use crate::state::FileSlot;
use crate::unassigned::Activity;
use crate::validation::{choose_validators_users, distribute_validation_partial_files};

#[derive(Debug, Clone)]
pub struct TaskDistributor {
    config: DistributionConfig,
    chunker: TaskChunker,
    matcher: WholeFileMatcher,
}

impl TaskDistributor {
    pub fn new(config: DistributionConfig) -> Self {
        let chunker = TaskChunker::new(config.max_pages_per_task);
        let matcher = WholeFileMatcher::new(config.exact_match_search_budget);
        Self {
            config,
            chunker,
            matcher,
        }
    }

    pub fn config(&self) -> &DistributionConfig {
        &self.config
    }

    /// 为一个作业生成标注和校验任务
    ///
    /// 调用方负责先过滤掉权重为0的人员并检查前置条件（见 `DistributionRequest::validate`）。
    /// 无人可接手的页记录在返回计划的 `*_gaps` 中。
    pub fn distribute(&self, request: &DistributionRequest) -> DistributionPlan {
        let job = &request.job;
        let coverage = job.effective_coverage();
        let mut plan = DistributionPlan::default();

        if job.validation_type.requires_annotation() {
            let template = TaskTemplate::new(
                job.job_id,
                false,
                request.annotation_task_status,
                request.deadline,
            );
            let (tasks, gaps) = if coverage > 1 {
                let mut seen = PagesIndex::from_tasks(
                    request.already_created_tasks.iter().filter(|t| t.is_annotation()),
                );
                self.distribute_extensive(&request.files, &request.annotators, coverage, &mut seen, &template)
            } else {
                self.distribute_tasks(&request.files, &request.annotators, None, Activity::Annotation, &template)
            };
            plan.annotation_tasks = tasks;
            plan.annotation_gaps = gaps;
        }

        let validators =
            choose_validators_users(job.validation_type, &request.annotators, &request.validators);
        let template = TaskTemplate::new(
            job.job_id,
            true,
            request.validation_task_status,
            request.deadline,
        );
        let (tasks, gaps) = if coverage > 1 {
            let mut seen = PagesIndex::from_tasks(
                request.already_created_tasks.iter().filter(|t| t.is_validation),
            );
            self.distribute_extensive(request.validation_files(), &validators, coverage, &mut seen, &template)
        } else {
            let annotated = (job.validation_type == ValidationType::Cross).then(|| {
                PagesIndex::from_tasks(
                    request
                        .already_created_tasks
                        .iter()
                        .filter(|t| t.is_annotation())
                        .chain(plan.annotation_tasks.iter()),
                )
            });
            self.distribute_tasks(
                request.validation_files(),
                &validators,
                annotated.as_ref(),
                Activity::Validation,
                &template,
            )
        };
        plan.validation_tasks = tasks;
        plan.validation_gaps = gaps;

        info!(
            "作业 {} 分配完成 ({}): 标注任务 {} 个 / {} 页, 校验任务 {} 个 / {} 页",
            job.job_id,
            job.validation_type,
            plan.annotation_tasks.len(),
            plan.annotation_pages(),
            plan.validation_tasks.len(),
            plan.validation_pages()
        );
        if !plan.is_complete() {
            warn!(
                "作业 {} 有未能分配的页: 标注缺口 {} 个文件, 校验缺口 {} 个文件",
                job.job_id,
                plan.annotation_gaps.len(),
                plan.validation_gaps.len()
            );
        }

        plan
    }

    /// 负载计算 -> 整文件匹配 -> 部分文件切分
    fn distribute_tasks(
        &self,
        files: &[File],
        users: &[Worker],
        annotated: Option<&PagesIndex>,
        activity: Activity,
        template: &TaskTemplate,
    ) -> (Vec<Task>, Vec<CoverageGap>) {
        let mut slots: Vec<FileSlot> = files
            .iter()
            .map(FileSlot::from_file)
            .filter(|slot| !slot.is_empty())
            .collect();
        let total_pages: u64 = slots.iter().map(|slot| slot.remaining() as u64).sum();
        if total_pages == 0 {
            return (Vec::new(), Vec::new());
        }
        if users.is_empty() {
            debug!("{} 人员池为空，跳过 {} 页", activity, total_pages);
            return (Vec::new(), collect_gaps(&slots));
        }

        let mut loads = calculate_users_load(total_pages, users, 1);
        let mut tasks = distribute_whole_files(
            &mut loads,
            &mut slots,
            annotated,
            &self.matcher,
            &self.chunker,
            template,
        );

        if slots.iter().any(|slot| !slot.is_empty()) {
            loads.sort_by(|a, b| b.pages_number.cmp(&a.pages_number));
            let partial = match activity {
                Activity::Annotation => distribute_annotation_partial_files(
                    &mut loads,
                    &mut slots,
                    &self.chunker,
                    template,
                ),
                Activity::Validation => distribute_validation_partial_files(
                    &mut loads,
                    &mut slots,
                    annotated,
                    &self.chunker,
                    template,
                ),
            };
            tasks.extend(partial);
        }

        (tasks, collect_gaps(&slots))
    }

    fn distribute_extensive(
        &self,
        files: &[File],
        users: &[Worker],
        coverage: u32,
        seen: &mut PagesIndex,
        template: &TaskTemplate,
    ) -> (Vec<Task>, Vec<CoverageGap>) {
        let total_pages: u64 = files.iter().map(|f| f.eligible_count() as u64).sum();
        let mut loads = calculate_users_load(total_pages, users, coverage);
        distribute_extensive_coverage(files, &mut loads, coverage, seen, &self.chunker, template)
    }
}

impl Default for TaskDistributor {
    fn default() -> Self {
        Self::new(DistributionConfig::default())
    }
}

fn collect_gaps(slots: &[FileSlot]) -> Vec<CoverageGap> {
    slots
        .iter()
        .filter(|slot| !slot.is_empty())
        .map(|slot| CoverageGap {
            file_id: slot.file_id,
            pages: slot.pages().to_vec(),
        })
        .collect()
}

/// 使用默认配置分配，返回标注任务和校验任务
pub fn distribute(request: &DistributionRequest) -> Vec<Task> {
    TaskDistributor::default().distribute(request).into_tasks()
}
