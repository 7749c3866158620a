//! # 日志配置模块
//!
//! 基于 `tracing-subscriber` 的日志初始化，默认屏蔽逐条 SQL 日志

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 默认过滤规则
#[must_use]
pub fn default_filter(level: &str) -> String {
    format!("{level},eval_matrix=debug,sqlx::query=off,sea_orm=warn")
}

/// 初始化日志系统
///
/// `RUST_LOG` 存在时优先使用；重复初始化会被忽略（测试中多次调用）。
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into()))
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();

    if result.is_ok() {
        tracing::debug!("日志系统初始化完成");
    }
}
