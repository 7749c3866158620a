use crate::management::dto::{CreateRunRequest, RunPatch};
use crate::management::extractors::{ApiJson, DbSession};
use crate::management::{response, services};
use axum::extract::Path;
use axum::response::Response;
use serde_json::Value;

/// 获取评测任务列表
pub async fn list_runs(session: DbSession) -> Response {
    let result = services::runs::list(&*session).await;
    response::respond(session.finish(result).await)
}

/// 获取单个评测任务
pub async fn get_run(session: DbSession, Path(id): Path<String>) -> Response {
    let result = services::runs::get(&*session, &id).await;
    response::respond(session.finish(result).await)
}

/// 创建评测任务
pub async fn create_run(session: DbSession, ApiJson(body): ApiJson<Value>) -> Response {
    let request = match CreateRunRequest::from_body(body) {
        Ok(request) => request,
        Err(e) => return response::app_error(e),
    };
    let result = services::runs::create(&*session, request).await;
    response::respond(session.finish(result).await)
}

/// 部分更新评测任务
pub async fn update_run(
    session: DbSession,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<Value>,
) -> Response {
    let patch = match RunPatch::from_body(&body) {
        Ok(patch) => patch,
        Err(e) => return response::app_error(e),
    };
    let result = services::runs::update(&*session, &id, patch).await;
    response::respond(session.finish(result).await)
}

/// 删除评测任务
pub async fn delete_run(session: DbSession, Path(id): Path<String>) -> Response {
    let result = services::runs::delete(&*session, &id).await;
    response::respond(session.finish(result).await)
}
