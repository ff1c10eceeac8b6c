pub mod app_config;
pub mod distribution;
pub mod observability;

pub use app_config::AppConfig;
pub use distribution::DistributionConfig;
pub use observability::{LogFormat, ObservabilityConfig};
