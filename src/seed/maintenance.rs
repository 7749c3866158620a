//! 清库与统计

use crate::error::Result;
use entity::{api_keys, dataset_items, datasets, evaluation_results, evaluation_runs, models};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 各表记录数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub models: u64,
    pub datasets: u64,
    pub dataset_items: u64,
    pub evaluation_runs: u64,
    pub evaluation_results: u64,
    pub api_keys: u64,
}

/// 清空所有数据
///
/// 按依赖顺序删除：结果 → 任务 → 条目 → 数据集 → 模型 → API密钥。
/// 任一步失败则整体回滚。
pub async fn clear_all_data<C>(db: &C) -> Result<()>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    let results = evaluation_results::Entity::delete_many().exec(&txn).await?;
    let runs = evaluation_runs::Entity::delete_many().exec(&txn).await?;
    let items = dataset_items::Entity::delete_many().exec(&txn).await?;
    let sets = datasets::Entity::delete_many().exec(&txn).await?;
    let model_rows = models::Entity::delete_many().exec(&txn).await?;
    let keys = api_keys::Entity::delete_many().exec(&txn).await?;

    txn.commit().await?;

    info!(
        results = results.rows_affected,
        runs = runs.rows_affected,
        items = items.rows_affected,
        datasets = sets.rows_affected,
        models = model_rows.rows_affected,
        api_keys = keys.rows_affected,
        "已清空所有数据"
    );
    Ok(())
}

/// 统计各表记录数
pub async fn get_database_stats<C>(db: &C) -> Result<DatabaseStats>
where
    C: ConnectionTrait,
{
    Ok(DatabaseStats {
        models: models::Entity::find().count(db).await?,
        datasets: datasets::Entity::find().count(db).await?,
        dataset_items: dataset_items::Entity::find().count(db).await?,
        evaluation_runs: evaluation_runs::Entity::find().count(db).await?,
        evaluation_results: evaluation_results::Entity::find().count(db).await?,
        api_keys: api_keys::Entity::find().count(db).await?,
    })
}
