//! # 模型配置服务

use crate::error::{Context, EvalError, Result};
use crate::management::dto::{CreateModelRequest, MessageResponse, ModelView};
use crate::seed::new_id;
use chrono::Utc;
use entity::models;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use tracing::info;

/// 列出全部模型
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<ModelView>> {
    let rows = models::Entity::find()
        .order_by_asc(models::Column::CreatedAt)
        .order_by_asc(models::Column::Id)
        .all(db)
        .await
        .context("获取模型列表失败")?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// 创建模型；ID 为空时自动生成，已存在则返回冲突且不修改原记录
pub async fn create<C: ConnectionTrait>(db: &C, request: CreateModelRequest) -> Result<ModelView> {
    let id = if request.id.is_empty() {
        new_id()
    } else {
        request.id
    };

    if models::Entity::find_by_id(id.clone()).one(db).await?.is_some() {
        return Err(EvalError::conflict("Model", id));
    }

    let now = Utc::now();
    let model = models::ActiveModel {
        id: Set(id),
        name: Set(request.name),
        provider: Set(request.provider),
        base_url: Set(Some(request.base_url)),
        api_key: Set(Some(request.api_key)),
        model_id: Set(request.model_id),
        config: Set(request.config.filter(|c| !c.is_null())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    info!(model_id = %model.id, provider = %model.provider, "已创建模型");
    Ok(model.into())
}

/// 删除模型；历史评测结果保留原模型ID
pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<MessageResponse> {
    let result = models::Entity::delete_by_id(id.to_string()).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(EvalError::not_found("Model", id));
    }

    info!(model_id = %id, "已删除模型");
    Ok(MessageResponse::new("Model deleted successfully"))
}
