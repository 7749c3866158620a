//! # 数据库配置

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 数据库URL
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
    /// 连接超时时间（秒）
    pub connect_timeout: u64,
    /// SQLite 写锁等待时间（秒）
    pub busy_timeout: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/evalmatrix.db".to_string(),
            max_connections: 10,
            connect_timeout: 30,
            busy_timeout: 5,
        }
    }
}

impl DatabaseConfig {
    /// 使用给定URL、其余默认值创建配置
    pub fn with_url<T: Into<String>>(url: T) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// SQLite 文件路径（去掉协议前缀和查询参数）
    #[must_use]
    pub fn sqlite_file_path(&self) -> Option<&Path> {
        if !self.is_sqlite() || self.is_memory_database() {
            return None;
        }
        let rest = self
            .url
            .strip_prefix("sqlite://")
            .or_else(|| self.url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or(rest);
        if path.is_empty() {
            None
        } else {
            Some(Path::new(path))
        }
    }

    /// 确保数据库路径存在（仅对SQLite文件数据库）
    pub fn ensure_database_path(&self) -> Result<()> {
        let Some(db_path) = self.sqlite_file_path() else {
            return Ok(());
        };

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    EvalError::config_with_source(
                        format!("无法创建数据库目录: {}", parent.display()),
                        e,
                    )
                })?;
                info!("创建数据库目录: {}", parent.display());
            }
        }

        if !db_path.exists() {
            info!("数据库文件将在首次连接时创建: {}", db_path.display());
        }
        Ok(())
    }

    /// 连接字符串；SQLite 文件库附加 `mode=rwc` 以便自动建库
    #[must_use]
    pub fn connection_url(&self) -> String {
        if self.sqlite_file_path().is_some() && !self.url.contains("mode=") {
            let sep = if self.url.contains('?') { '&' } else { '?' };
            format!("{}{sep}mode=rwc", self.url)
        } else {
            self.url.clone()
        }
    }

    /// 检查是否为内存数据库
    #[must_use]
    pub fn is_memory_database(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// 检查是否为SQLite数据库
    #[must_use]
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path() {
        let config = DatabaseConfig::with_url("sqlite://./data/evalmatrix.db?mode=rwc");
        assert_eq!(
            config.sqlite_file_path(),
            Some(Path::new("./data/evalmatrix.db"))
        );
        assert!(config.is_sqlite());
        assert!(!config.is_memory_database());
    }

    #[test]
    fn test_memory_database_has_no_path() {
        let config = DatabaseConfig::with_url("sqlite::memory:");
        assert!(config.is_memory_database());
        assert_eq!(config.sqlite_file_path(), None);
        assert_eq!(config.connection_url(), "sqlite::memory:");
    }

    #[test]
    fn test_connection_url_adds_create_mode() {
        let config = DatabaseConfig::with_url("sqlite:///tmp/eval.db");
        assert_eq!(config.connection_url(), "sqlite:///tmp/eval.db?mode=rwc");

        let config = DatabaseConfig::with_url("sqlite:///tmp/eval.db?mode=ro");
        assert_eq!(config.connection_url(), "sqlite:///tmp/eval.db?mode=ro");
    }

    #[test]
    fn test_ensure_database_path_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db_file = dir.path().join("nested").join("eval.db");
        let config = DatabaseConfig::with_url(format!("sqlite://{}", db_file.display()));

        config.ensure_database_path().unwrap();
        assert!(db_file.parent().unwrap().exists());
    }
}
