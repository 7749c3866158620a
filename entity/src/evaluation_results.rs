//! # 评测结果实体定义

use super::sea_orm_active_enums::ResultStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 单个模型在单个数据集条目上的评测结果
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluation_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub run_id: String,
    pub dataset_item_id: String,
    pub model_id: String,
    pub input_text: String,
    pub expected_output: Option<String>,
    pub actual_output: Option<String>,
    pub metrics: Option<Json>,
    pub status: ResultStatus,
    pub error_message: Option<String>,
    pub processing_time_ms: Option<i64>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evaluation_runs::Entity",
        from = "Column::RunId",
        to = "super::evaluation_runs::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    EvaluationRun,
}

impl Related<super::evaluation_runs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluationRun.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
