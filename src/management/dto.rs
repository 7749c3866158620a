//! # 对外JSON结构
//!
//! 前端使用 camelCase 字段名，数据库列为 snake_case；两者的映射只在本模块中完成。

use crate::error::{EvalError, Result};
use crate::seed::parse_timestamp;
use crate::{ensure_validation, validation_error};
use chrono::{DateTime, Utc};
use entity::{
    ResultStatus, RunStatus, dataset_items, datasets, evaluation_results, evaluation_runs, models,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 数据集条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItemView {
    pub id: String,
    pub input: String,
    pub reference: Option<String>,
}

impl From<dataset_items::Model> for DatasetItemView {
    fn from(item: dataset_items::Model) -> Self {
        Self {
            id: item.id,
            input: item.input_text,
            reference: item.reference_output,
        }
    }
}

/// 数据集（内嵌全部条目）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetView {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<DatasetItemView>,
    pub item_count: usize,
}

impl DatasetView {
    #[must_use]
    pub fn new(dataset: datasets::Model, items: Vec<dataset_items::Model>) -> Self {
        let items: Vec<DatasetItemView> = items.into_iter().map(Into::into).collect();
        Self {
            id: dataset.id,
            name: dataset.name,
            description: dataset.description,
            created_at: dataset.created_at,
            item_count: items.len(),
            items,
        }
    }
}

/// 模型配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelView {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub base_url: String,
    pub api_key: String,
    pub model_id: String,
    pub config: Option<Value>,
}

impl From<models::Model> for ModelView {
    fn from(model: models::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            provider: model.provider,
            base_url: model.base_url.unwrap_or_default(),
            api_key: model.api_key.unwrap_or_default(),
            model_id: model.model_id,
            config: model.config,
        }
    }
}

/// 创建模型请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelRequest {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub provider: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    pub model_id: String,
    #[serde(default)]
    pub config: Option<Value>,
}

/// 评测任务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunView {
    pub id: String,
    pub name: String,
    pub dataset_id: String,
    pub model_ids: Value,
    pub status: RunStatus,
    pub progress: f64,
    pub total: i32,
    pub completed: i32,
    pub failed: i32,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub config_snapshot: Option<Value>,
}

impl From<evaluation_runs::Model> for RunView {
    fn from(run: evaluation_runs::Model) -> Self {
        Self {
            id: run.id,
            name: run.name,
            dataset_id: run.dataset_id,
            model_ids: run.model_ids,
            status: run.status,
            progress: run.progress,
            total: run.total_items,
            completed: run.completed_items,
            failed: run.failed_items,
            created_at: run.created_at,
            started_at: run.started_at,
            completed_at: run.completed_at,
            config_snapshot: run.config_snapshot,
        }
    }
}

/// 创建评测任务请求；整个请求体原样保存为配置快照
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRunRequest {
    pub name: Option<String>,
    pub dataset_id: String,
    pub model_ids: Vec<String>,
    pub snapshot: Value,
}

impl CreateRunRequest {
    pub fn from_body(body: Value) -> Result<Self> {
        let Value::Object(map) = &body else {
            return Err(validation_error!("请求体必须是JSON对象"));
        };

        let name = optional_string(map, "name")?;
        let dataset_id = optional_string(map, "datasetId")?.unwrap_or_default();
        let model_ids = match map.get("modelIds") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone()).map_err(|_| {
                validation_error!(field = "modelIds", "modelIds 必须是字符串数组")
            })?,
        };

        Ok(Self {
            name,
            dataset_id,
            model_ids,
            snapshot: body,
        })
    }
}

/// 评测任务的部分更新；未出现的字段保持不变
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunPatch {
    pub status: Option<RunStatus>,
    pub progress: Option<f64>,
    pub completed: Option<i32>,
    pub failed: Option<i32>,
    pub started_at: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl RunPatch {
    /// 解析更新请求，忽略无法识别的字段
    pub fn from_body(body: &Value) -> Result<Self> {
        let Value::Object(map) = body else {
            return Err(validation_error!("请求体必须是JSON对象"));
        };

        let mut patch = Self::default();

        if let Some(value) = map.get("status") {
            let raw = value
                .as_str()
                .ok_or_else(|| validation_error!(field = "status", "status 必须是字符串"))?;
            let status = raw
                .parse::<RunStatus>()
                .map_err(|e| EvalError::validation(e.to_string(), Some("status".to_string())))?;
            patch.status = Some(status);
        }

        if let Some(value) = map.get("progress") {
            let progress = value
                .as_f64()
                .ok_or_else(|| validation_error!(field = "progress", "progress 必须是数字"))?;
            ensure_validation!(
                (0.0..=1.0).contains(&progress),
                field = "progress",
                "progress 必须在 0 到 1 之间: {}",
                progress
            );
            patch.progress = Some(progress);
        }

        patch.completed = counter(map, "completed")?;
        patch.failed = counter(map, "failed")?;
        patch.started_at = timestamp(map, "startedAt")?;
        patch.completed_at = timestamp(map, "completedAt")?;

        Ok(patch)
    }
}

fn optional_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(validation_error!(field = key, "{} 必须是字符串", key)),
    }
}

fn counter(map: &Map<String, Value>, key: &str) -> Result<Option<i32>> {
    let Some(value) = map.get(key) else {
        return Ok(None);
    };
    value
        .as_u64()
        .and_then(|n| i32::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| validation_error!(field = key, "{} 必须是非负整数", key))
}

fn timestamp(map: &Map<String, Value>, key: &str) -> Result<Option<Option<DateTime<Utc>>>> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(raw)) => parse_timestamp(raw)
            .map(|dt| Some(Some(dt)))
            .ok_or_else(|| validation_error!(field = key, "无法解析时间: {}", raw)),
        Some(_) => Err(validation_error!(field = key, "{} 必须是时间字符串", key)),
    }
}

/// 评测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub id: String,
    pub run_id: String,
    pub dataset_item_id: String,
    pub model_id: String,
    pub input: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub metrics: Option<Value>,
    pub status: ResultStatus,
    pub error: Option<String>,
    pub processing_time_ms: Option<i64>,
}

impl From<evaluation_results::Model> for ResultView {
    fn from(result: evaluation_results::Model) -> Self {
        Self {
            id: result.id,
            run_id: result.run_id,
            dataset_item_id: result.dataset_item_id,
            model_id: result.model_id,
            input: result.input_text,
            expected: result.expected_output,
            actual: result.actual_output,
            metrics: result.metrics,
            status: result.status,
            error: result.error_message,
            processing_time_ms: result.processing_time_ms,
        }
    }
}

/// 提交评测结果请求
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateResultRequest {
    pub dataset_item_id: Option<String>,
    pub model_id: Option<String>,
    pub input: Option<String>,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub metrics: Option<Value>,
    pub status: Option<String>,
    pub error: Option<String>,
    pub processing_time_ms: Option<i64>,
}

impl CreateResultRequest {
    /// 结果状态，缺省为 pending
    pub fn parsed_status(&self) -> Result<ResultStatus> {
        match self.status.as_deref() {
            None => Ok(ResultStatus::Pending),
            Some(raw) => raw
                .parse()
                .map_err(|e: entity::UnknownStatus| {
                    EvalError::validation(e.to_string(), Some("status".to_string()))
                }),
        }
    }
}

/// 上传文件中解析出的一条数据
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedItem {
    pub input: String,
    pub reference: Option<String>,
    pub metadata: Option<Value>,
}

/// 解析换行分隔的JSON上传内容
///
/// 无法解析或不是JSON对象的行直接跳过。
pub fn parse_upload(content: &[u8]) -> Result<Vec<UploadedItem>> {
    let text = std::str::from_utf8(content)
        .map_err(|e| EvalError::bad_request(format!("文件不是有效的UTF-8文本: {e}")))?;

    Ok(text
        .trim()
        .split('\n')
        .filter_map(|line| match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(map)) => Some(uploaded_item(&map)),
            // 数组、字符串等非对象行与坏行一样跳过，不让整个上传失败
            _ => None,
        })
        .collect())
}

fn uploaded_item(map: &Map<String, Value>) -> UploadedItem {
    let input = match map.get("input").or_else(|| map.get("prompt")) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let reference = match map.get("reference").or_else(|| map.get("output")) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    let metadata = map.get("metadata").filter(|v| v.is_object()).cloned();

    UploadedItem {
        input,
        reference,
        metadata,
    }
}

/// 仅包含提示信息的响应体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
        }
    }
}
