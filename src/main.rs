use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use page_allocator::commands::{run_distribute, run_unassigned, run_validate_config};
use page_allocator::common::{init_logging, load_config, StartupConfig};
use allocator_dispatcher::Activity;
use tracing::info;

/// 标注/校验任务分页分配工具
#[derive(Parser, Debug)]
#[command(name = "allocator")]
#[command(version = "1.0.0")]
#[command(about = "把作业的文件页分配给标注人员和校验人员")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别
    #[arg(
        short,
        long,
        global = true,
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    log_level: Option<String>,

    /// 日志格式
    #[arg(long, global = true, value_parser = ["json", "pretty"])]
    log_format: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 为一个作业生成标注和校验任务
    Distribute {
        /// 分配请求 (JSON)
        #[arg(short, long)]
        input: PathBuf,
        /// 任务输出文件，缺省时输出到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 计算重新分配时仍需分配的页
    Unassigned {
        /// 已分配页记录 (JSON)
        #[arg(short, long)]
        input: PathBuf,
        /// annotation 或 validation
        #[arg(short, long, value_parser = ["annotation", "validation"])]
        activity: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 加载并验证配置
    ValidateConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let startup = StartupConfig {
        config_path: cli.config.clone(),
        log_level: cli.log_level.clone(),
        log_format: cli.log_format.clone(),
    };
    let config = load_config(&startup)?;
    init_logging(
        &config.observability.log_level,
        config.observability.log_format.as_str(),
    )?;
    info!("配置加载完成");

    match cli.command {
        Commands::Distribute { input, output } => {
            run_distribute(&config, &input, output.as_deref()).await?;
        }
        Commands::Unassigned {
            input,
            activity,
            output,
        } => {
            let activity: Activity = activity.parse()?;
            run_unassigned(&input, activity, output.as_deref())?;
        }
        Commands::ValidateConfig => run_validate_config(&config)?,
    }

    Ok(())
}
