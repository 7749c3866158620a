//! # 数据迁移与示例数据
//!
//! 旧版浏览器本地存储数据导入、示例数据生成、清库和按表统计。
//! 所有操作各自在一个事务内完成。

mod import;
mod maintenance;
mod sample;

pub use import::{
    MigrationReport, OutcomeStatus, RecordKind, RecordOutcome, migrate_from_external_blob,
    parse_timestamp,
};
pub use maintenance::{DatabaseStats, clear_all_data, get_database_stats};
pub use sample::{SampleDataStats, generate_sample_data, sample_legacy_blob};

/// 生成新的记录ID
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
