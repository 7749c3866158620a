//! # 评测结果服务
//!
//! 提交结果时在同一事务内原子递增任务计数，并在全部完成时结束任务。

use crate::error::{Context, EvalError, Result};
use crate::management::dto::{CreateResultRequest, ResultView};
use crate::management::services::runs;
use crate::seed::new_id;
use chrono::Utc;
use entity::{ResultStatus, RunStatus, evaluation_results, evaluation_runs};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 提交结果的响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResult {
    pub message: String,
    pub id: String,
}

/// 列出某个任务的全部结果；任务不存在时返回空列表
pub async fn list<C: ConnectionTrait>(db: &C, run_id: &str) -> Result<Vec<ResultView>> {
    let rows = evaluation_results::Entity::find()
        .filter(evaluation_results::Column::RunId.eq(run_id))
        .order_by_asc(evaluation_results::Column::CreatedAt)
        .all(db)
        .await
        .context("获取评测结果失败")?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// 提交一条评测结果
///
/// 第一条语句即为计数递增，事务从一开始就持有写锁，并发提交按顺序执行。
pub async fn create<C: ConnectionTrait>(
    db: &C,
    run_id: &str,
    request: CreateResultRequest,
) -> Result<CreatedResult> {
    let status = request.parsed_status()?;
    let now = Utc::now();

    // 计数在数据库内递增，避免并发提交丢失更新
    let mut increment = evaluation_runs::Entity::update_many()
        .col_expr(
            evaluation_runs::Column::CompletedItems,
            Expr::col(evaluation_runs::Column::CompletedItems).add(1),
        )
        .col_expr(evaluation_runs::Column::UpdatedAt, Expr::value(now));
    if status == ResultStatus::Failed {
        increment = increment.col_expr(
            evaluation_runs::Column::FailedItems,
            Expr::col(evaluation_runs::Column::FailedItems).add(1),
        );
    }
    let updated = increment
        .filter(evaluation_runs::Column::Id.eq(run_id))
        .exec(db)
        .await?;
    if updated.rows_affected == 0 {
        return Err(EvalError::not_found("EvaluationRun", run_id));
    }

    let result = evaluation_results::ActiveModel {
        id: Set(new_id()),
        run_id: Set(run_id.to_string()),
        dataset_item_id: Set(request.dataset_item_id.unwrap_or_default()),
        model_id: Set(request.model_id.unwrap_or_default()),
        input_text: Set(request.input.unwrap_or_default()),
        expected_output: Set(request.expected),
        actual_output: Set(request.actual),
        metrics: Set(request.metrics.filter(|m| !m.is_null())),
        status: Set(status),
        error_message: Set(request.error),
        processing_time_ms: Set(request.processing_time_ms),
        created_at: Set(now),
    }
    .insert(db)
    .await?;

    let run = runs::find(db, run_id).await?;
    let finished = run.completed_items >= run.total_items && run.status != RunStatus::Completed;
    let progress = run.computed_progress().min(1.0);

    let mut active = run.into_active_model();
    active.progress = Set(progress);
    if finished {
        active.status = Set(RunStatus::Completed);
        active.completed_at = Set(Some(now));
    }
    let run = active.update(db).await?;

    if finished {
        info!(run_id = %run.id, completed = run.completed_items, "评测任务已完成");
    } else {
        debug!(run_id = %run.id, completed = run.completed_items, total = run.total_items, "已记录评测结果");
    }

    Ok(CreatedResult {
        message: "Result created successfully".to_string(),
        id: result.id,
    })
}
