//! 数据迁移与示例数据集成测试
//!
//! 使用临时目录中的 SQLite 文件，覆盖：
//! - 旧版数据重复导入时跳过已存在记录
//! - 单条记录失败不影响其余记录
//! - 示例数据重复生成返回冲突
//! - 清库与按表统计

use entity::{RunStatus, evaluation_runs};
use eval_matrix::Storage;
use eval_matrix::config::DatabaseConfig;
use eval_matrix::error::EvalError;
use eval_matrix::seed::{
    OutcomeStatus, RecordKind, clear_all_data, generate_sample_data, get_database_stats,
    migrate_from_external_blob, sample_legacy_blob,
};
use pretty_assertions::assert_eq;
use sea_orm::EntityTrait;
use serde_json::json;
use tempfile::TempDir;

fn setup_storage() -> (TempDir, Storage) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("seed_test.db");
    let config = DatabaseConfig::with_url(format!("sqlite://{}", path.display()));
    (dir, Storage::new(config))
}

#[tokio::test]
async fn test_migrate_legacy_blob_is_idempotent() {
    let (_dir, storage) = setup_storage();
    let db = storage.connection().await.expect("connect");
    let blob = sample_legacy_blob();

    let first = migrate_from_external_blob(db, &blob).await.expect("first pass");
    assert_eq!(first.models_migrated, 2);
    assert_eq!(first.datasets_migrated, 1);
    assert_eq!(first.dataset_items_migrated, 2);
    assert_eq!(first.runs_migrated, 1);
    assert_eq!(first.results_migrated, 1);
    assert!(first.errors.is_empty());

    // 第二次导入全部跳过
    let second = migrate_from_external_blob(db, &blob).await.expect("second pass");
    assert_eq!(second.total_migrated(), 0);
    assert!(second.errors.is_empty());
    assert!(
        second
            .records
            .iter()
            .all(|r| r.status == OutcomeStatus::Skipped)
    );

    let stats = get_database_stats(db).await.expect("stats");
    assert_eq!(stats.models, 2);
    assert_eq!(stats.datasets, 1);
    assert_eq!(stats.dataset_items, 2);
    assert_eq!(stats.evaluation_runs, 1);
    assert_eq!(stats.evaluation_results, 1);

    let run = evaluation_runs::Entity::find_by_id("run-local-1")
        .one(db)
        .await
        .expect("query run")
        .expect("run imported");
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.total_items, 2);
    assert!(run.completed_at.is_some());
}

#[tokio::test]
async fn test_migrate_collects_record_failures() {
    let (_dir, storage) = setup_storage();
    let db = storage.connection().await.expect("connect");

    let blob = json!({
        "models": [
            {"id": "m-ok", "name": "ok", "provider": "openai", "modelId": "gpt-4"}
        ],
        "runs": [
            {"id": "r-bad", "name": "bad", "datasetId": "d-x", "status": "exploded"},
            {"id": "r-ok", "name": "ok", "datasetId": "d-x", "status": "pending"}
        ],
        "datasets": "not-an-array"
    });

    let report = migrate_from_external_blob(db, &blob).await.expect("migrate");
    assert_eq!(report.models_migrated, 1);
    assert_eq!(report.runs_migrated, 1);
    assert_eq!(report.datasets_migrated, 0);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors.iter().any(|e| e.contains("r-bad")));

    let failed: Vec<_> = report
        .records
        .iter()
        .filter(|r| r.status == OutcomeStatus::Failed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].kind, RecordKind::Run);
    assert_eq!(failed[0].id, "r-bad");

    let stats = get_database_stats(db).await.expect("stats");
    assert_eq!(stats.evaluation_runs, 1);
}

#[tokio::test]
async fn test_migrate_error_keeps_underlying_message() {
    let (_dir, storage) = setup_storage();
    let db = storage.connection().await.expect("connect");

    let blob = json!({"datasets": [{"id": "d1", "itemCount": "ten"}]});
    let report = migrate_from_external_blob(db, &blob).await.expect("migrate");

    assert_eq!(report.errors.len(), 1);
    let message = &report.errors[0];
    assert!(message.starts_with("Error migrating dataset d1: "));
    assert!(message.contains("invalid type"), "{message}");

    let outcome = &report.records[0];
    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert!(outcome.error.as_deref().unwrap_or_default().contains("invalid type"));
}

#[tokio::test]
async fn test_migrate_rejects_non_object_blob() {
    let (_dir, storage) = setup_storage();
    let db = storage.connection().await.expect("connect");

    let err = migrate_from_external_blob(db, &json!([1, 2, 3]))
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::Validation { .. }));
}

#[tokio::test]
async fn test_generate_sample_data_twice_conflicts() {
    let (_dir, storage) = setup_storage();
    let db = storage.connection().await.expect("connect");

    let stats = generate_sample_data(db).await.expect("generate");
    assert_eq!(stats.models_created, 3);
    assert_eq!(stats.datasets_created, 2);
    assert_eq!(stats.dataset_items_created, 10);
    assert_eq!(stats.runs_created, 2);
    assert_eq!(stats.results_created, 5);

    let err = generate_sample_data(db).await.unwrap_err();
    assert!(matches!(err, EvalError::Conflict { .. }));

    // 失败的第二次生成整体回滚
    let counts = get_database_stats(db).await.expect("stats");
    assert_eq!(counts.models, 3);
    assert_eq!(counts.dataset_items, 10);
    assert_eq!(counts.evaluation_results, 5);
}

#[tokio::test]
async fn test_clear_all_data() {
    let (_dir, storage) = setup_storage();
    let db = storage.connection().await.expect("connect");

    generate_sample_data(db).await.expect("generate");
    migrate_from_external_blob(db, &sample_legacy_blob())
        .await
        .expect("migrate");

    clear_all_data(db).await.expect("clear");

    let stats = get_database_stats(db).await.expect("stats");
    assert_eq!(stats.models, 0);
    assert_eq!(stats.datasets, 0);
    assert_eq!(stats.dataset_items, 0);
    assert_eq!(stats.evaluation_runs, 0);
    assert_eq!(stats.evaluation_results, 0);
    assert_eq!(stats.api_keys, 0);

    // 清空后可以重新生成示例数据
    generate_sample_data(db).await.expect("regenerate");
}
