//! # 数据集实体定义

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 数据集元数据
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "datasets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub file_size: Option<i64>,
    pub item_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dataset_items::Entity")]
    DatasetItems,
}

impl Related<super::dataset_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DatasetItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
