use crate::management::extractors::{ApiJson, DbSession};
use crate::management::server::AppState;
use crate::management::{response, services};
use crate::seed;
use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

/// 根路径：服务信息
pub async fn root_handler() -> Response {
    Json(services::system::service_info()).into_response()
}

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> Response {
    Json(services::system::health(&state.storage, None).await).into_response()
}

/// API 健康检查（附带服务名）
pub async fn api_health_check(State(state): State<AppState>) -> Response {
    Json(services::system::health(&state.storage, Some("EvalMatrix API")).await).into_response()
}

/// 各表记录数
pub async fn get_stats(session: DbSession) -> Response {
    let result = seed::get_database_stats(&*session).await;
    response::respond(session.finish(result).await)
}

/// 生成示例数据；重复调用返回冲突
pub async fn generate_sample_data(session: DbSession) -> Response {
    let result = seed::generate_sample_data(&*session).await.map(|stats| {
        json!({
            "message": "Sample data generated successfully",
            "stats": stats,
        })
    });
    response::respond(session.finish(result).await)
}

/// 导入旧版浏览器本地存储数据
pub async fn import_legacy_data(session: DbSession, ApiJson(blob): ApiJson<Value>) -> Response {
    let result = seed::migrate_from_external_blob(&*session, &blob).await;
    response::respond(session.finish(result).await)
}

/// 清空全部数据
pub async fn clear_data(session: DbSession) -> Response {
    let result = seed::clear_all_data(&*session)
        .await
        .map(|()| json!({"message": "All data cleared"}));
    response::respond(session.finish(result).await)
}
