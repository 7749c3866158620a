//! 自定义 Axum 提取器

use crate::database::Storage;
use crate::error::{EvalError, Result};
use crate::management::{response, server::AppState};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::response::Response;
use sea_orm::DatabaseTransaction;
use serde::de::DeserializeOwned;
use std::ops::Deref;

/// 单个请求的数据库会话
///
/// 在处理函数执行前开启事务；成功时由 [`DbSession::finish`] 提交，
/// 其余任何路径在丢弃时回滚。
pub struct DbSession(DatabaseTransaction);

impl DbSession {
    /// 在处理函数内部开启会话，用于需要先读取请求体的场景
    pub async fn open(storage: &Storage) -> Result<Self> {
        storage.session().await.map(Self)
    }

    /// 根据处理结果提交或回滚
    pub async fn finish<T>(self, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                self.0.commit().await?;
                Ok(value)
            }
            // 丢弃事务即回滚
            Err(e) => Err(e),
        }
    }
}

impl Deref for DbSession {
    type Target = DatabaseTransaction;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for DbSession {
    type Rejection = Response;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        Self::open(&state.storage)
            .await
            .map_err(response::app_error)
    }
}

/// JSON 请求体；解析失败时返回统一错误信封而不是纯文本
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        axum::Json::<T>::from_request(req, state)
            .await
            .map(|axum::Json(value)| Self(value))
            .map_err(|rejection| {
                response::app_error(EvalError::validation(rejection.body_text(), None))
            })
    }
}
