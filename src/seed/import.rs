//! 旧版本地存储数据导入
//!
//! 逐条插入缺失的记录（已存在则跳过，不合并），单条失败只记录不中断，
//! 整批在一个事务中提交。

use super::new_id;
use crate::error::{EvalError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use entity::{
    ResultStatus, RunStatus, dataset_items, datasets, evaluation_results, evaluation_runs, models,
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use tracing::{info, warn};

/// 记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Model,
    Dataset,
    DatasetItem,
    Run,
    Result,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Model => "model",
            Self::Dataset => "dataset",
            Self::DatasetItem => "dataset item",
            Self::Run => "run",
            Self::Result => "result",
        })
    }
}

/// 单条记录的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Imported,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordOutcome {
    pub kind: RecordKind,
    pub id: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 导入报告
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub models_migrated: usize,
    pub datasets_migrated: usize,
    pub dataset_items_migrated: usize,
    pub runs_migrated: usize,
    pub results_migrated: usize,
    pub errors: Vec<String>,
    pub records: Vec<RecordOutcome>,
}

impl MigrationReport {
    /// 导入的记录总数
    #[must_use]
    pub fn total_migrated(&self) -> usize {
        self.models_migrated
            + self.datasets_migrated
            + self.dataset_items_migrated
            + self.runs_migrated
            + self.results_migrated
    }

    fn imported(&mut self, kind: RecordKind, id: &str) {
        match kind {
            RecordKind::Model => self.models_migrated += 1,
            RecordKind::Dataset => self.datasets_migrated += 1,
            RecordKind::DatasetItem => self.dataset_items_migrated += 1,
            RecordKind::Run => self.runs_migrated += 1,
            RecordKind::Result => self.results_migrated += 1,
        }
        self.push(kind, id, OutcomeStatus::Imported, None);
    }

    fn skipped(&mut self, kind: RecordKind, id: &str) {
        self.push(kind, id, OutcomeStatus::Skipped, None);
    }

    fn failed(&mut self, kind: RecordKind, id: &str, err: &EvalError) {
        let message = format!("Error migrating {kind} {id}: {err}");
        warn!("{}", message);
        self.errors.push(message);
        self.push(kind, id, OutcomeStatus::Failed, Some(err.to_string()));
    }

    fn push(&mut self, kind: RecordKind, id: &str, status: OutcomeStatus, error: Option<String>) {
        self.records.push(RecordOutcome {
            kind,
            id: id.to_string(),
            status,
            error,
        });
    }
}

/// 尽力解析时间戳
///
/// 支持 RFC 3339（结尾 `Z` 视为 `+00:00`）和不带时区的 ISO 时间（按 UTC 处理），
/// 无法解析时返回 `None`。
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.trim().replace('Z', "+00:00");
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn timestamp_field(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value.and_then(Value::as_str).and_then(parse_timestamp)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyModel {
    id: Option<String>,
    name: Option<String>,
    provider: Option<String>,
    base_url: Option<String>,
    api_key: Option<String>,
    model_id: Option<String>,
    config: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyDataset {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    file_name: Option<String>,
    file_path: Option<String>,
    file_size: Option<i64>,
    item_count: Option<i32>,
    items: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegacyItem {
    id: Option<String>,
    input: Option<String>,
    reference: Option<String>,
    metadata: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyRun {
    id: Option<String>,
    name: Option<String>,
    dataset_id: Option<String>,
    model_ids: Option<Vec<String>>,
    status: Option<String>,
    progress: Option<f64>,
    total: Option<i32>,
    completed: Option<i32>,
    failed: Option<i32>,
    config_snapshot: Option<Value>,
    created_at: Option<Value>,
    started_at: Option<Value>,
    completed_at: Option<Value>,
    results: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyResult {
    id: Option<String>,
    dataset_item_id: Option<String>,
    model_id: Option<String>,
    input: Option<String>,
    expected: Option<String>,
    actual: Option<String>,
    metrics: Option<Value>,
    status: Option<String>,
    error: Option<String>,
    processing_time_ms: Option<i64>,
}

/// 从旧版本地存储数据迁移
///
/// `blob` 形如 `{"models": [...], "datasets": [...], "runs": [...]}`，各键均可缺省。
/// 事务开启或提交失败时整批回滚并返回错误。
pub async fn migrate_from_external_blob<C>(db: &C, blob: &Value) -> Result<MigrationReport>
where
    C: TransactionTrait,
{
    if !blob.is_object() {
        return Err(crate::validation_error!("迁移数据必须是JSON对象"));
    }

    let mut report = MigrationReport::default();
    let txn = db.begin().await?;

    for raw in section(blob, "models", &mut report) {
        migrate_model(&txn, raw, &mut report).await;
    }
    for raw in section(blob, "datasets", &mut report) {
        migrate_dataset(&txn, raw, &mut report).await;
    }
    for raw in section(blob, "runs", &mut report) {
        migrate_run(&txn, raw, &mut report).await;
    }

    txn.commit().await?;

    info!(
        migrated = report.total_migrated(),
        errors = report.errors.len(),
        "数据迁移完成"
    );
    Ok(report)
}

fn section<'a>(blob: &'a Value, key: &str, report: &mut MigrationReport) -> &'a [Value] {
    match blob.get(key) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(values)) => values,
        Some(_) => {
            let message = format!("Error migrating {key}: expected an array");
            warn!("{}", message);
            report.errors.push(message);
            &[]
        }
    }
}

fn id_hint(raw: &Value) -> String {
    raw.get("id")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

fn parse_record<T: for<'de> Deserialize<'de>>(raw: &Value) -> Result<T> {
    Ok(serde_json::from_value(raw.clone())?)
}

fn parse_status<T>(raw: Option<&str>, field: &str) -> Result<T>
where
    T: std::str::FromStr<Err = entity::UnknownStatus> + Default,
{
    match raw {
        None => Ok(T::default()),
        Some(value) => value
            .parse()
            .map_err(|e: entity::UnknownStatus| EvalError::validation(e.to_string(), Some(field.to_string()))),
    }
}

async fn migrate_model<C: ConnectionTrait>(db: &C, raw: &Value, report: &mut MigrationReport) {
    let hint = id_hint(raw);
    let legacy: LegacyModel = match parse_record(raw) {
        Ok(legacy) => legacy,
        Err(e) => return report.failed(RecordKind::Model, &hint, &e),
    };
    let id = legacy.id.unwrap_or_else(new_id);

    match models::Entity::find_by_id(id.clone()).one(db).await {
        Ok(Some(_)) => return report.skipped(RecordKind::Model, &id),
        Ok(None) => {}
        Err(e) => return report.failed(RecordKind::Model, &id, &e.into()),
    }

    let now = Utc::now();
    let model = models::ActiveModel {
        id: Set(id.clone()),
        name: Set(legacy.name.unwrap_or_default()),
        provider: Set(legacy.provider.unwrap_or_default()),
        base_url: Set(Some(legacy.base_url.unwrap_or_default())),
        api_key: Set(Some(legacy.api_key.unwrap_or_default())),
        model_id: Set(legacy.model_id.unwrap_or_default()),
        config: Set(Some(legacy.config.unwrap_or_else(|| json!({})))),
        created_at: Set(now),
        updated_at: Set(now),
    };

    match model.insert(db).await {
        Ok(_) => report.imported(RecordKind::Model, &id),
        Err(e) => report.failed(RecordKind::Model, &id, &e.into()),
    }
}

async fn migrate_dataset<C: ConnectionTrait>(db: &C, raw: &Value, report: &mut MigrationReport) {
    let hint = id_hint(raw);
    let legacy: LegacyDataset = match parse_record(raw) {
        Ok(legacy) => legacy,
        Err(e) => return report.failed(RecordKind::Dataset, &hint, &e),
    };
    let id = legacy.id.unwrap_or_else(new_id);

    match datasets::Entity::find_by_id(id.clone()).one(db).await {
        Ok(Some(_)) => return report.skipped(RecordKind::Dataset, &id),
        Ok(None) => {}
        Err(e) => return report.failed(RecordKind::Dataset, &id, &e.into()),
    }

    let now = Utc::now();
    let dataset = datasets::ActiveModel {
        id: Set(id.clone()),
        name: Set(legacy.name.unwrap_or_default()),
        description: Set(Some(legacy.description.unwrap_or_default())),
        file_name: Set(Some(legacy.file_name.unwrap_or_default())),
        file_path: Set(Some(legacy.file_path.unwrap_or_default())),
        file_size: Set(Some(legacy.file_size.unwrap_or_default())),
        item_count: Set(legacy.item_count.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = dataset.insert(db).await {
        return report.failed(RecordKind::Dataset, &id, &e.into());
    }
    report.imported(RecordKind::Dataset, &id);

    for raw_item in legacy.items.unwrap_or_default() {
        migrate_item(db, &id, &raw_item, report).await;
    }
}

async fn migrate_item<C: ConnectionTrait>(
    db: &C,
    dataset_id: &str,
    raw: &Value,
    report: &mut MigrationReport,
) {
    let hint = id_hint(raw);
    let legacy: LegacyItem = match parse_record(raw) {
        Ok(legacy) => legacy,
        Err(e) => return report.failed(RecordKind::DatasetItem, &hint, &e),
    };
    let id = legacy.id.unwrap_or_else(new_id);

    let item = dataset_items::ActiveModel {
        id: Set(id.clone()),
        dataset_id: Set(dataset_id.to_string()),
        input_text: Set(legacy.input.unwrap_or_default()),
        reference_output: Set(Some(legacy.reference.unwrap_or_default())),
        item_metadata: Set(Some(legacy.metadata.unwrap_or_else(|| json!({})))),
        created_at: Set(Utc::now()),
    };

    match item.insert(db).await {
        Ok(_) => report.imported(RecordKind::DatasetItem, &id),
        Err(e) => report.failed(RecordKind::DatasetItem, &id, &e.into()),
    }
}

async fn migrate_run<C: ConnectionTrait>(db: &C, raw: &Value, report: &mut MigrationReport) {
    let hint = id_hint(raw);
    let legacy: LegacyRun = match parse_record(raw) {
        Ok(legacy) => legacy,
        Err(e) => return report.failed(RecordKind::Run, &hint, &e),
    };
    let id = legacy.id.clone().unwrap_or_else(new_id);

    match evaluation_runs::Entity::find_by_id(id.clone()).one(db).await {
        Ok(Some(_)) => return report.skipped(RecordKind::Run, &id),
        Ok(None) => {}
        Err(e) => return report.failed(RecordKind::Run, &id, &e.into()),
    }

    let status: RunStatus = match parse_status(legacy.status.as_deref(), "status") {
        Ok(status) => status,
        Err(e) => return report.failed(RecordKind::Run, &id, &e),
    };

    let run = evaluation_runs::ActiveModel {
        id: Set(id.clone()),
        name: Set(legacy.name.unwrap_or_default()),
        dataset_id: Set(legacy.dataset_id.unwrap_or_default()),
        model_ids: Set(json!(legacy.model_ids.unwrap_or_default())),
        status: Set(status),
        progress: Set(legacy.progress.unwrap_or_default()),
        total_items: Set(legacy.total.unwrap_or_default()),
        completed_items: Set(legacy.completed.unwrap_or_default()),
        failed_items: Set(legacy.failed.unwrap_or_default()),
        config_snapshot: Set(Some(legacy.config_snapshot.unwrap_or_else(|| json!({})))),
        created_at: Set(timestamp_field(legacy.created_at.as_ref())),
        started_at: Set(timestamp_field(legacy.started_at.as_ref())),
        completed_at: Set(timestamp_field(legacy.completed_at.as_ref())),
        updated_at: Set(Utc::now()),
    };

    if let Err(e) = run.insert(db).await {
        return report.failed(RecordKind::Run, &id, &e.into());
    }
    report.imported(RecordKind::Run, &id);

    for raw_result in legacy.results.unwrap_or_default() {
        migrate_result(db, &id, &raw_result, report).await;
    }
}

async fn migrate_result<C: ConnectionTrait>(
    db: &C,
    run_id: &str,
    raw: &Value,
    report: &mut MigrationReport,
) {
    let hint = id_hint(raw);
    let legacy: LegacyResult = match parse_record(raw) {
        Ok(legacy) => legacy,
        Err(e) => return report.failed(RecordKind::Result, &hint, &e),
    };
    let id = legacy.id.unwrap_or_else(new_id);

    let status: ResultStatus = match parse_status(legacy.status.as_deref(), "status") {
        Ok(status) => status,
        Err(e) => return report.failed(RecordKind::Result, &id, &e),
    };

    let result = evaluation_results::ActiveModel {
        id: Set(id.clone()),
        run_id: Set(run_id.to_string()),
        dataset_item_id: Set(legacy.dataset_item_id.unwrap_or_default()),
        model_id: Set(legacy.model_id.unwrap_or_default()),
        input_text: Set(legacy.input.unwrap_or_default()),
        expected_output: Set(Some(legacy.expected.unwrap_or_default())),
        actual_output: Set(Some(legacy.actual.unwrap_or_default())),
        metrics: Set(Some(legacy.metrics.unwrap_or_else(|| json!({})))),
        status: Set(status),
        error_message: Set(legacy.error),
        processing_time_ms: Set(Some(legacy.processing_time_ms.unwrap_or_default())),
        created_at: Set(Utc::now()),
    };

    match result.insert(db).await {
        Ok(_) => report.imported(RecordKind::Result, &id),
        Err(e) => report.failed(RecordKind::Result, &id, &e.into()),
    }
}
