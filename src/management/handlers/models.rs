use crate::management::dto::CreateModelRequest;
use crate::management::extractors::{ApiJson, DbSession};
use crate::management::{response, services};
use axum::extract::Path;
use axum::response::Response;

/// 获取模型列表
pub async fn list_models(session: DbSession) -> Response {
    let result = services::models::list(&*session).await;
    response::respond(session.finish(result).await)
}

/// 创建模型
pub async fn create_model(
    session: DbSession,
    ApiJson(request): ApiJson<CreateModelRequest>,
) -> Response {
    let result = services::models::create(&*session, request).await;
    response::respond(session.finish(result).await)
}

/// 删除模型
pub async fn delete_model(session: DbSession, Path(id): Path<String>) -> Response {
    let result = services::models::delete(&*session, &id).await;
    response::respond(session.finish(result).await)
}
