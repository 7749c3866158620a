//! # 路由配置
//!
//! 定义所有API路由和路由组织

use crate::management::handlers::{datasets, models, results, runs, system};
use crate::management::server::AppState;
use axum::Router;
use axum::routing::{delete, get, post};

/// 创建 API 前缀下的全部路由
pub fn create_routes() -> Router<AppState> {
    Router::new()
        // 数据集
        .nest("/datasets", dataset_routes())
        // 模型配置
        .nest("/models", model_routes())
        // 评测任务与结果
        .nest("/runs", run_routes())
        // 统计、示例数据、导入与清库
        .route("/stats", get(system::get_stats))
        .route("/generate-sample-data", post(system::generate_sample_data))
        .route("/import", post(system::import_legacy_data))
        .route("/data", delete(system::clear_data))
        .route("/health", get(system::api_health_check))
}

/// 数据集路由
fn dataset_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(datasets::list_datasets).post(datasets::create_dataset))
        .route(
            "/{id}",
            get(datasets::get_dataset).delete(datasets::delete_dataset),
        )
}

/// 模型配置路由
fn model_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(models::list_models).post(models::create_model))
        .route("/{id}", delete(models::delete_model))
}

/// 评测任务路由
fn run_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(runs::list_runs).post(runs::create_run))
        .route(
            "/{id}",
            get(runs::get_run)
                .put(runs::update_run)
                .delete(runs::delete_run),
        )
        .route(
            "/{id}/results",
            get(results::list_results).post(results::create_result),
        )
}
