//! # 评测任务服务

use crate::error::{Context, EvalError, Result};
use crate::management::dto::{CreateRunRequest, MessageResponse, RunPatch, RunView};
use crate::seed::new_id;
use chrono::Utc;
use entity::{RunStatus, datasets, evaluation_runs};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use serde_json::json;
use tracing::{debug, info};

/// 列出全部评测任务
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<RunView>> {
    let rows = evaluation_runs::Entity::find()
        .order_by_asc(evaluation_runs::Column::CreatedAt)
        .order_by_asc(evaluation_runs::Column::Id)
        .all(db)
        .await
        .context("获取评测任务列表失败")?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub(crate) async fn find<C: ConnectionTrait>(db: &C, id: &str) -> Result<evaluation_runs::Model> {
    evaluation_runs::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EvalError::not_found("EvaluationRun", id))
}

/// 获取单个评测任务
pub async fn get<C: ConnectionTrait>(db: &C, id: &str) -> Result<RunView> {
    find(db, id).await.map(Into::into)
}

/// 创建评测任务
///
/// 总条目数取自数据集的 `item_count`，数据集不存在时为 0。
pub async fn create<C: ConnectionTrait>(db: &C, request: CreateRunRequest) -> Result<RunView> {
    let id = new_id();
    let name = request
        .name
        .unwrap_or_else(|| format!("Evaluation Run {}", &id[..8]));

    let total_items = datasets::Entity::find_by_id(request.dataset_id.clone())
        .one(db)
        .await?
        .map_or(0, |dataset| dataset.item_count);

    let now = Utc::now();
    let run = evaluation_runs::ActiveModel {
        id: Set(id),
        name: Set(name),
        dataset_id: Set(request.dataset_id),
        model_ids: Set(json!(request.model_ids)),
        status: Set(RunStatus::Pending),
        progress: Set(0.0),
        total_items: Set(total_items),
        completed_items: Set(0),
        failed_items: Set(0),
        config_snapshot: Set(Some(request.snapshot)),
        created_at: Set(Some(now)),
        started_at: Set(None),
        completed_at: Set(None),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(run_id = %run.id, dataset_id = %run.dataset_id, total_items, "已创建评测任务");
    Ok(run.into())
}

/// 部分更新评测任务
pub async fn update<C: ConnectionTrait>(db: &C, id: &str, patch: RunPatch) -> Result<RunView> {
    let mut run = find(db, id).await?.into_active_model();

    if let Some(status) = patch.status {
        run.status = Set(status);
    }
    if let Some(progress) = patch.progress {
        run.progress = Set(progress);
    }
    if let Some(completed) = patch.completed {
        run.completed_items = Set(completed);
    }
    if let Some(failed) = patch.failed {
        run.failed_items = Set(failed);
    }
    if let Some(started_at) = patch.started_at {
        run.started_at = Set(started_at);
    }
    if let Some(completed_at) = patch.completed_at {
        run.completed_at = Set(completed_at);
    }
    run.updated_at = Set(Utc::now());

    let run = run.update(db).await?;
    debug!(run_id = %run.id, status = %run.status, "已更新评测任务");
    Ok(run.into())
}

/// 删除评测任务，结果随外键级联删除
pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<MessageResponse> {
    let result = evaluation_runs::Entity::delete_by_id(id.to_string())
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(EvalError::not_found("EvaluationRun", id));
    }

    info!(run_id = %id, "已删除评测任务");
    Ok(MessageResponse::new("Run deleted successfully"))
}
