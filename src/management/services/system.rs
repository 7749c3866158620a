//! # 系统信息服务

use crate::database::{Storage, ping};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 健康检查响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub database: String,
}

/// 服务信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub database: String,
}

/// 数据库能执行 `SELECT 1` 即视为已连接；服务本身始终报告健康
pub async fn health(storage: &Storage, service: Option<&str>) -> HealthStatus {
    let database = match storage.connection().await {
        Ok(db) => match ping(db).await {
            Ok(()) => "connected",
            Err(e) => {
                warn!("数据库探测失败: {}", e);
                "disconnected"
            }
        },
        Err(e) => {
            warn!("数据库不可用: {}", e);
            "disconnected"
        }
    };

    HealthStatus {
        status: "healthy".to_string(),
        service: service.map(str::to_string),
        timestamp: Utc::now(),
        database: database.to_string(),
    }
}

#[must_use]
pub fn service_info() -> ServiceInfo {
    ServiceInfo {
        message: "EvalMatrix Backend is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: "SQLite".to_string(),
    }
}
