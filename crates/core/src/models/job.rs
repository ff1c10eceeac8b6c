use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{File, Task, TaskStatus, Worker};
use crate::errors::{AllocationError, AllocationResult};

/// 校验策略
///
/// - `Cross`: 校验人员就是标注人员本身，但不能校验自己标注过的页
/// - `Hierarchical`: 由独立的校验人员池校验全部页
/// - `ValidationOnly`: 不产生标注任务，只由校验人员池校验
/// - `ExtensiveCoverage`: 每页由多名不同的标注人员独立标注
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationType {
    Cross,
    Hierarchical,
    ValidationOnly,
    ExtensiveCoverage,
}

impl ValidationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationType::Cross => "cross",
            ValidationType::Hierarchical => "hierarchical",
            ValidationType::ValidationOnly => "validation_only",
            ValidationType::ExtensiveCoverage => "extensive_coverage",
        }
    }

    pub fn requires_annotation(&self) -> bool {
        !matches!(self, ValidationType::ValidationOnly)
    }

    /// 除交叉校验外，其余策略都使用调用方提供的独立校验人员池
    pub fn uses_validator_pool(&self) -> bool {
        !matches!(self, ValidationType::Cross)
    }
}

impl std::fmt::Display for ValidationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ValidationType {
    type Err = AllocationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "cross" => Ok(ValidationType::Cross),
            "hierarchical" => Ok(ValidationType::Hierarchical),
            "validation_only" => Ok(ValidationType::ValidationOnly),
            "extensive_coverage" => Ok(ValidationType::ExtensiveCoverage),
            _ => Err(AllocationError::Configuration(format!(
                "Invalid validation type: {value}"
            ))),
        }
    }
}

fn default_coverage() -> u32 {
    1
}

/// 作业上下文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobContext {
    pub job_id: i64,
    pub validation_type: ValidationType,
    #[serde(default = "default_coverage")]
    pub extensive_coverage: u32,
}

impl JobContext {
    pub fn new(job_id: i64, validation_type: ValidationType) -> Self {
        Self {
            job_id,
            validation_type,
            extensive_coverage: 1,
        }
    }

    pub fn with_extensive_coverage(mut self, coverage: u32) -> Self {
        self.extensive_coverage = coverage;
        self
    }

    /// 每页需要的独立覆盖次数；只有多重覆盖策略会大于1
    pub fn effective_coverage(&self) -> u32 {
        match self.validation_type {
            ValidationType::ExtensiveCoverage => self.extensive_coverage.max(1),
            _ => 1,
        }
    }

    pub fn uses_extensive_distribution(&self) -> bool {
        self.effective_coverage() > 1
    }

    pub fn validate(&self) -> AllocationResult<()> {
        if self.extensive_coverage == 0 {
            return Err(AllocationError::InvalidExtensiveCoverage {
                coverage: 0,
                message: "覆盖次数必须大于等于1".to_string(),
            });
        }
        if self.extensive_coverage > 1
            && self.validation_type != ValidationType::ExtensiveCoverage
        {
            return Err(AllocationError::InvalidExtensiveCoverage {
                coverage: self.extensive_coverage,
                message: format!(
                    "覆盖次数大于1只能用于 extensive_coverage，当前校验类型: {}",
                    self.validation_type
                ),
            });
        }
        Ok(())
    }
}

/// 一次分配调用的全部输入
///
/// `validation_files` 缺省时校验使用与标注相同的文件列表。
/// `already_created_tasks` 是该作业之前已经生成的任务，用于避免重复覆盖同一人员已处理的页。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionRequest {
    pub job: JobContext,
    pub files: Vec<File>,
    #[serde(default)]
    pub annotators: Vec<Worker>,
    #[serde(default)]
    pub validators: Vec<Worker>,
    #[serde(default)]
    pub validation_files: Option<Vec<File>>,
    #[serde(default)]
    pub annotation_task_status: TaskStatus,
    #[serde(default)]
    pub validation_task_status: TaskStatus,
    #[serde(default)]
    pub already_created_tasks: Vec<Task>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl DistributionRequest {
    pub fn new(job: JobContext, files: Vec<File>) -> Self {
        Self {
            job,
            files,
            annotators: Vec::new(),
            validators: Vec::new(),
            validation_files: None,
            annotation_task_status: TaskStatus::default(),
            validation_task_status: TaskStatus::default(),
            already_created_tasks: Vec::new(),
            deadline: None,
        }
    }

    pub fn with_annotators(mut self, annotators: Vec<Worker>) -> Self {
        self.annotators = annotators;
        self
    }

    pub fn with_validators(mut self, validators: Vec<Worker>) -> Self {
        self.validators = validators;
        self
    }

    pub fn with_validation_files(mut self, files: Vec<File>) -> Self {
        self.validation_files = Some(files);
        self
    }

    pub fn with_statuses(mut self, annotation: TaskStatus, validation: TaskStatus) -> Self {
        self.annotation_task_status = annotation;
        self.validation_task_status = validation;
        self
    }

    pub fn with_already_created_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.already_created_tasks = tasks;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn validation_files(&self) -> &[File] {
        self.validation_files.as_deref().unwrap_or(&self.files)
    }

    /// 移除权重为0的人员
    pub fn retain_available_workers(&mut self) {
        self.annotators.retain(Worker::is_available);
        self.validators.retain(Worker::is_available);
    }

    /// 校验调用方的前置条件
    ///
    /// 引擎不会调用此方法；它只对满足前置条件的输入给出正确结果。
    pub fn validate(&self) -> AllocationResult<()> {
        self.job.validate()?;

        for file in self.files.iter().chain(self.validation_files()) {
            file.validate()?;
        }

        let validation_type = self.job.validation_type;
        let annotation_pages: u64 = self.files.iter().map(|f| f.eligible_count() as u64).sum();

        if validation_type.requires_annotation() && annotation_pages > 0 {
            if self.annotators.is_empty() {
                return Err(AllocationError::EmptyAnnotatorPool);
            }
            if self.job.uses_extensive_distribution()
                && (self.annotators.len() as u32) < self.job.extensive_coverage
            {
                return Err(AllocationError::InvalidExtensiveCoverage {
                    coverage: self.job.extensive_coverage,
                    message: format!("标注人员数量 {} 少于覆盖次数", self.annotators.len()),
                });
            }
        }

        match validation_type {
            ValidationType::Cross => {
                if self.annotators.len() < 2 {
                    return Err(AllocationError::EmptyValidatorPool { validation_type });
                }
            }
            _ => {
                if self.validators.is_empty() {
                    return Err(AllocationError::EmptyValidatorPool { validation_type });
                }
                if self.job.uses_extensive_distribution()
                    && (self.validators.len() as u32) < self.job.extensive_coverage
                {
                    return Err(AllocationError::InvalidExtensiveCoverage {
                        coverage: self.job.extensive_coverage,
                        message: format!("校验人员数量 {} 少于覆盖次数", self.validators.len()),
                    });
                }
            }
        }

        Ok(())
    }
}
