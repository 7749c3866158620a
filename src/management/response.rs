//! # API 响应结构
//!
//! 成功时直接返回资源JSON（旧版前端直接读取），失败时统一使用错误信封。

use crate::error::{ErrorCategory, EvalError, Result};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # 标准错误信息
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

/// # 标准错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorInfo,
    pub timestamp: DateTime<Utc>,
}

/// # API响应枚举
///
/// 统一所有API出口，方便转换为 `axum::response::Response`
#[derive(Debug)]
pub enum ApiResponse<T: Serialize> {
    Success(T),
    Error(StatusCode, String, String),
    AppError(EvalError),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Self::Error(status, code, message) => {
                let error_response = ErrorResponse {
                    success: false,
                    error: ErrorInfo { code, message },
                    timestamp: Utc::now(),
                };
                (status, Json(error_response)).into_response()
            }
            Self::AppError(error) => {
                let (status, code) = error.to_http_response_parts();
                match error.category() {
                    ErrorCategory::Client => tracing::warn!(code, "请求失败: {}", error),
                    ErrorCategory::Server => tracing::error!(code, "请求处理出错: {:?}", error),
                }
                Self::Error(status, code.to_string(), error.to_string()).into_response()
            }
        }
    }
}

/// # 便捷函数：成功响应
pub fn success<T: Serialize>(data: T) -> Response {
    ApiResponse::Success(data).into_response()
}

/// # 便捷函数：HTTP错误响应
pub fn error(status: StatusCode, code: &str, message: &str) -> Response {
    ApiResponse::<()>::Error(status, code.to_string(), message.to_string()).into_response()
}

/// # 便捷函数：应用错误响应
pub fn app_error(error: EvalError) -> Response {
    ApiResponse::<()>::AppError(error).into_response()
}

/// # 便捷函数：按结果返回成功或错误响应
pub fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(data) => success(data),
        Err(error) => app_error(error),
    }
}
