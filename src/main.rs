//! # EvalMatrix 主程序
//!
//! 启动 HTTP API 服务

use clap::Parser;
use eval_matrix::{
    Result,
    app::AppContext,
    config::load_config,
    logging,
    management::ManagementServer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// EvalMatrix backend server
#[derive(Parser)]
#[command(name = "eval-matrix")]
#[command(about = "CRUD backend for LLM evaluation datasets, models, runs and results")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 config/config.{RUST_ENV}.toml）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 覆盖监听端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 覆盖数据库URL
    #[arg(long)]
    database_url: Option<String>,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli).await {
        error!("服务启动失败: {e:?}");
        return Err(e.into());
    }

    info!("服务正常关闭");
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    config.validate()?;

    let context = Arc::new(AppContext::new(config));

    // 启动时即建立连接并执行迁移
    context.storage.connect().await?;

    ManagementServer::new(context).serve().await
}
