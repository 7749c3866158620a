//! # 评测任务实体定义
//!
//! `dataset_id` 不设外键：数据集被删除后任务保留原引用。

use super::sea_orm_active_enums::RunStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 评测任务
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluation_runs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub dataset_id: String,
    /// 参与评测的模型ID数组
    pub model_ids: Json,
    pub status: RunStatus,
    pub progress: f64,
    pub total_items: i32,
    pub completed_items: i32,
    pub failed_items: i32,
    pub config_snapshot: Option<Json>,
    pub created_at: Option<DateTimeUtc>,
    pub started_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::evaluation_results::Entity")]
    EvaluationResults,
}

impl Related<super::evaluation_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluationResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// progress = completed / max(total, 1)
    #[must_use]
    pub fn computed_progress(&self) -> f64 {
        f64::from(self.completed_items) / f64::from(self.total_items.max(1))
    }
}
