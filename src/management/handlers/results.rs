use crate::management::dto::CreateResultRequest;
use crate::management::extractors::{ApiJson, DbSession};
use crate::management::{response, services};
use axum::extract::Path;
use axum::response::Response;

/// 获取任务的评测结果
pub async fn list_results(session: DbSession, Path(run_id): Path<String>) -> Response {
    let result = services::results::list(&*session, &run_id).await;
    response::respond(session.finish(result).await)
}

/// 提交评测结果
pub async fn create_result(
    session: DbSession,
    Path(run_id): Path<String>,
    ApiJson(request): ApiJson<CreateResultRequest>,
) -> Response {
    let result = services::results::create(&*session, &run_id, request).await;
    response::respond(session.finish(result).await)
}
