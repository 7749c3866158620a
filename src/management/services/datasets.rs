//! # 数据集服务

use crate::error::{Context, EvalError, Result};
use crate::management::dto::{DatasetView, MessageResponse, parse_upload};
use crate::seed::new_id;
use chrono::Utc;
use entity::{dataset_items, datasets};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

/// 单次批量插入的条目数
const INSERT_CHUNK: usize = 100;

/// 列出全部数据集（内嵌条目）
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<DatasetView>> {
    let rows = datasets::Entity::find()
        .order_by_asc(datasets::Column::CreatedAt)
        .order_by_asc(datasets::Column::Id)
        .all(db)
        .await
        .context("获取数据集列表失败")?;
    let items = rows
        .load_many(dataset_items::Entity, db)
        .await
        .context("获取数据集条目失败")?;

    Ok(rows
        .into_iter()
        .zip(items)
        .map(|(dataset, items)| DatasetView::new(dataset, items))
        .collect())
}

/// 获取单个数据集
pub async fn get<C: ConnectionTrait>(db: &C, id: &str) -> Result<DatasetView> {
    let dataset = datasets::Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EvalError::not_found("Dataset", id))?;
    let items = dataset_items::Entity::find()
        .filter(dataset_items::Column::DatasetId.eq(id))
        .all(db)
        .await?;

    Ok(DatasetView::new(dataset, items))
}

/// 从上传的 JSONL 文件创建数据集
///
/// 任何失败都以 400 返回底层错误信息。
pub async fn create_from_upload<C: ConnectionTrait>(
    db: &C,
    file_name: &str,
    content: &[u8],
) -> Result<DatasetView> {
    insert_upload(db, file_name, content)
        .await
        .map_err(|e| match e {
            EvalError::BadRequest { .. } => e,
            other => EvalError::bad_request(other.to_string()),
        })
}

async fn insert_upload<C: ConnectionTrait>(
    db: &C,
    file_name: &str,
    content: &[u8],
) -> Result<DatasetView> {
    let uploaded = parse_upload(content)?;
    let now = Utc::now();
    let dataset_id = new_id();

    let dataset = datasets::ActiveModel {
        id: Set(dataset_id.clone()),
        name: Set(file_name.to_string()),
        description: Set(Some(format!("Dataset uploaded from {file_name}"))),
        file_name: Set(Some(file_name.to_string())),
        file_path: Set(None),
        file_size: Set(Some(i64::try_from(content.len()).unwrap_or(i64::MAX))),
        item_count: Set(i32::try_from(uploaded.len()).unwrap_or(i32::MAX)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;

    let rows: Vec<dataset_items::ActiveModel> = uploaded
        .into_iter()
        .map(|item| dataset_items::ActiveModel {
            id: Set(new_id()),
            dataset_id: Set(dataset_id.clone()),
            input_text: Set(item.input),
            reference_output: Set(item.reference),
            item_metadata: Set(item.metadata),
            created_at: Set(now),
        })
        .collect();

    for chunk in rows.chunks(INSERT_CHUNK) {
        dataset_items::Entity::insert_many(chunk.to_vec())
            .exec_without_returning(db)
            .await?;
    }

    info!(
        dataset_id = %dataset_id,
        items = dataset.item_count,
        "已从上传文件创建数据集: {}",
        file_name
    );
    get(db, &dataset_id).await
}

/// 删除数据集，条目随外键级联删除
pub async fn delete<C: ConnectionTrait>(db: &C, id: &str) -> Result<MessageResponse> {
    let result = datasets::Entity::delete_by_id(id.to_string())
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(EvalError::not_found("Dataset", id));
    }

    info!(dataset_id = %id, "已删除数据集");
    Ok(MessageResponse::new("Dataset deleted successfully"))
}
