use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 标注或校验人员
///
/// 两种角色结构相同。`default_load` 是期望的工作份额权重，`overall_load` 是该人员在所有作业中
/// 当前已分配的总页数，用于再平衡。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub user_id: Uuid,
    pub default_load: u32,
    #[serde(default)]
    pub overall_load: u32,
}

impl Worker {
    pub fn new(user_id: Uuid, default_load: u32) -> Self {
        Self {
            user_id,
            default_load,
            overall_load: 0,
        }
    }

    pub fn with_overall_load(mut self, overall_load: u32) -> Self {
        self.overall_load = overall_load;
        self
    }

    /// 权重为0的人员不参与分配，调用方必须在调用引擎前过滤掉
    pub fn is_available(&self) -> bool {
        self.default_load > 0
    }
}
