//! 配置管理
//!
//! 配置按以下优先级合并（后者覆盖前者）：
//! 1. 内置默认值
//! 2. TOML 配置文件（显式路径或默认搜索路径）
//! 3. 环境变量（前缀 `ALLOCATOR_`，层级分隔符 `__`，例如
//!    `ALLOCATOR_DISTRIBUTION__MAX_PAGES_PER_TASK=40`）
//!
//! ```rust,no_run
//! use allocator_core::config::AppConfig;
//!
//! let config = AppConfig::load(None).expect("配置加载失败");
//! assert!(config.distribution.max_pages_per_task > 0);
//! ```

pub mod models;

pub use models::distribution::{DEFAULT_EXACT_MATCH_SEARCH_BUDGET, DEFAULT_MAX_PAGES_PER_TASK};
pub use models::{AppConfig, DistributionConfig, LogFormat, ObservabilityConfig};
