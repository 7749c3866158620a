//! # 配置管理模块
//!
//! 处理应用配置加载、环境变量覆盖和验证

mod app_config;
mod database;

pub use app_config::{AppConfig, ServerConfig};
pub use database::DatabaseConfig;

use crate::error::{EvalError, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 默认配置文件路径，按 `RUST_ENV` 选择
#[must_use]
pub fn default_config_path() -> PathBuf {
    let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    PathBuf::from(format!("config/config.{env}.toml"))
}

/// 加载配置
///
/// 显式给出的文件必须存在；默认文件不存在时回退到内置默认值。
/// 之后依次应用环境变量覆盖（`PORT`、`DATABASE_URL`）。
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                read_config_file(&default_path)?
            } else {
                debug!(path = %default_path.display(), "配置文件不存在，使用默认配置");
                AppConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        EvalError::config_with_source(format!("读取配置文件失败: {}", path.display()), e)
    })?;
    let config: AppConfig = toml::from_str(&content)?;
    info!(path = %path.display(), "已加载配置文件");
    Ok(config)
}

/// 应用环境变量覆盖
pub fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Ok(port) = env::var("PORT") {
        config.server.port = port
            .parse()
            .map_err(|e| EvalError::config_with_source(format!("无效的 PORT: {port}"), e))?;
    }
    if let Ok(url) = env::var("DATABASE_URL") {
        if !url.is_empty() {
            config.database.url = url;
        }
    }
    Ok(())
}
