//! # Entity 模块
//!
//! 评测数据的 Sea-ORM 实体定义

pub mod api_keys;
pub mod dataset_items;
pub mod datasets;
pub mod evaluation_results;
pub mod evaluation_runs;
pub mod models;
pub mod sea_orm_active_enums;

pub use api_keys::Entity as ApiKeys;
pub use dataset_items::Entity as DatasetItems;
pub use datasets::Entity as Datasets;
pub use evaluation_results::Entity as EvaluationResults;
pub use evaluation_runs::Entity as EvaluationRuns;
pub use models::Entity as Models;
pub use sea_orm_active_enums::{ResultStatus, RunStatus, UnknownStatus};

#[cfg(test)]
mod tests;
