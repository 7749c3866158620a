//! # 应用配置结构定义

use super::DatabaseConfig;
use crate::ensure_config;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务器配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        ensure_config!(self.server.port != 0, "无效的服务器端口: 0");
        ensure_config!(
            self.server.api_prefix.starts_with('/')
                && self.server.api_prefix.len() > 1
                && !self.server.api_prefix.ends_with('/'),
            "API前缀必须以 / 开头且不能以 / 结尾: {}",
            self.server.api_prefix
        );
        ensure_config!(self.server.max_upload_size > 0, "上传大小上限必须大于0");
        ensure_config!(!self.database.url.is_empty(), "数据库URL不能为空");
        ensure_config!(self.database.max_connections > 0, "数据库最大连接数必须大于0");
        Ok(())
    }
}

/// HTTP 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// API路径前缀
    pub api_prefix: String,
    /// 是否启用CORS
    pub enable_cors: bool,
    /// CORS允许的源，`*` 表示任意
    pub cors_origins: Vec<String>,
    /// 上传文件大小上限（字节）
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8001,
            api_prefix: "/api".to_string(),
            enable_cors: true,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:5173".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// 监听地址字符串 `host:port`
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.server.listen_addr(), "0.0.0.0:8001");
        assert_eq!(config.database.url, "sqlite://./data/evalmatrix.db");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000
            cors_origins = ["*"]
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.api_prefix, "/api");
        assert_eq!(config.server.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.database.max_connections, 10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.server.api_prefix = "api".to_string();
        assert!(config.validate().is_err());
        config.server.api_prefix = "/".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.url = String::new();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }
}
