//! 示例数据

use crate::error::Result;
use chrono::Utc;
use entity::{
    ResultStatus, RunStatus, dataset_items, datasets, evaluation_results, evaluation_runs, models,
};
use sea_orm::{ActiveModelTrait, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

/// 示例数据生成统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDataStats {
    pub models_created: u32,
    pub datasets_created: u32,
    pub dataset_items_created: u32,
    pub runs_created: u32,
    pub results_created: u32,
}

struct SampleModel {
    id: &'static str,
    name: &'static str,
    provider: &'static str,
    base_url: &'static str,
    api_key: &'static str,
    model_id: &'static str,
    temperature: f64,
    max_tokens: u32,
}

const SAMPLE_MODELS: [SampleModel; 3] = [
    SampleModel {
        id: "model-1",
        name: "GPT-3.5 Turbo",
        provider: "openai",
        base_url: "https://api.openai.com/v1",
        api_key: "sk-demo-key-1",
        model_id: "gpt-3.5-turbo",
        temperature: 0.7,
        max_tokens: 1000,
    },
    SampleModel {
        id: "model-2",
        name: "Claude 3 Haiku",
        provider: "anthropic",
        base_url: "https://api.anthropic.com/v1",
        api_key: "sk-demo-key-2",
        model_id: "claude-3-haiku-20240307",
        temperature: 0.8,
        max_tokens: 2000,
    },
    SampleModel {
        id: "model-3",
        name: "Gemini Pro",
        provider: "google",
        base_url: "https://generativelanguage.googleapis.com/v1",
        api_key: "demo-key-3",
        model_id: "gemini-pro",
        temperature: 0.9,
        max_tokens: 1500,
    },
];

struct SampleDataset {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    file_name: &'static str,
    file_path: &'static str,
    file_size: i64,
    item_count: i32,
    items: [(&'static str, &'static str); 5],
}

const SAMPLE_DATASETS: [SampleDataset; 2] = [
    SampleDataset {
        id: "dataset-1",
        name: "中文问答测试集",
        description: "包含100个中文问答对，用于测试模型的中文理解能力",
        file_name: "chinese_qa.jsonl",
        file_path: "/uploads/datasets/chinese_qa.jsonl",
        file_size: 1_024_000,
        item_count: 100,
        items: [
            ("中国的首都是哪里？", "中国的首都是北京。"),
            (
                "请解释机器学习的概念",
                "机器学习是人工智能的一个分支，让计算机通过数据学习规律。",
            ),
            ("什么是深度学习？", "深度学习是使用多层神经网络进行机器学习的方法。"),
            ("请介绍Python编程语言", "Python是一种高级编程语言，以简洁易读著称。"),
            ("人工智能和机器学习的关系？", "机器学习是实现人工智能的一种技术手段。"),
        ],
    },
    SampleDataset {
        id: "dataset-2",
        name: "英文翻译测试集",
        description: "包含50个中英文翻译对，用于测试翻译能力",
        file_name: "translation_en_zh.jsonl",
        file_path: "/uploads/datasets/translation_en_zh.jsonl",
        file_size: 512_000,
        item_count: 50,
        items: [
            ("Hello, how are you?", "你好，你好吗？"),
            ("The weather is nice today.", "今天天气很好。"),
            ("I love programming.", "我热爱编程。"),
            ("Machine learning is fascinating.", "机器学习很迷人。"),
            ("Good morning!", "早上好！"),
        ],
    },
];

struct SampleRun {
    id: &'static str,
    name: &'static str,
    dataset_id: &'static str,
    model_ids: &'static [&'static str],
    status: RunStatus,
    progress: f64,
    total_items: i32,
    completed_items: i32,
}

const SAMPLE_RUNS: [SampleRun; 2] = [
    SampleRun {
        id: "run-1",
        name: "中文问答评测 - GPT-3.5 vs Claude",
        dataset_id: "dataset-1",
        model_ids: &["model-1", "model-2"],
        status: RunStatus::Completed,
        progress: 1.0,
        total_items: 5,
        completed_items: 5,
    },
    SampleRun {
        id: "run-2",
        name: "翻译能力评测 - 多模型对比",
        dataset_id: "dataset-2",
        model_ids: &["model-1", "model-2", "model-3"],
        status: RunStatus::Running,
        progress: 0.6,
        total_items: 5,
        completed_items: 3,
    },
];

/// 写入固定的示例数据
///
/// 不做存在性检查；重复调用会因主键冲突整体回滚并返回冲突错误。
pub async fn generate_sample_data<C>(db: &C) -> Result<SampleDataStats>
where
    C: TransactionTrait,
{
    let mut stats = SampleDataStats::default();
    let now = Utc::now();
    let txn = db.begin().await?;

    for sample in &SAMPLE_MODELS {
        models::ActiveModel {
            id: Set(sample.id.to_string()),
            name: Set(sample.name.to_string()),
            provider: Set(sample.provider.to_string()),
            base_url: Set(Some(sample.base_url.to_string())),
            api_key: Set(Some(sample.api_key.to_string())),
            model_id: Set(sample.model_id.to_string()),
            config: Set(Some(json!({
                "temperature": sample.temperature,
                "max_tokens": sample.max_tokens,
            }))),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        stats.models_created += 1;
    }

    for sample in &SAMPLE_DATASETS {
        datasets::ActiveModel {
            id: Set(sample.id.to_string()),
            name: Set(sample.name.to_string()),
            description: Set(Some(sample.description.to_string())),
            file_name: Set(Some(sample.file_name.to_string())),
            file_path: Set(Some(sample.file_path.to_string())),
            file_size: Set(Some(sample.file_size)),
            item_count: Set(sample.item_count),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        stats.datasets_created += 1;

        for (index, (input, reference)) in sample.items.iter().enumerate() {
            dataset_items::ActiveModel {
                id: Set(format!("{}-item-{}", sample.id, index + 1)),
                dataset_id: Set(sample.id.to_string()),
                input_text: Set((*input).to_string()),
                reference_output: Set(Some((*reference).to_string())),
                item_metadata: Set(Some(json!({"difficulty": "medium", "category": "general"}))),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            stats.dataset_items_created += 1;
        }
    }

    for sample in &SAMPLE_RUNS {
        evaluation_runs::ActiveModel {
            id: Set(sample.id.to_string()),
            name: Set(sample.name.to_string()),
            dataset_id: Set(sample.dataset_id.to_string()),
            model_ids: Set(json!(sample.model_ids)),
            status: Set(sample.status),
            progress: Set(sample.progress),
            total_items: Set(sample.total_items),
            completed_items: Set(sample.completed_items),
            failed_items: Set(0),
            config_snapshot: Set(Some(json!({"batch_size": 10, "timeout": 30}))),
            created_at: Set(Some(now)),
            started_at: Set(None),
            completed_at: Set(None),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        stats.runs_created += 1;
    }

    // 只有已完成的 run-1 带结果
    for index in 0..5_i64 {
        let n = index + 1;
        evaluation_results::ActiveModel {
            id: Set(format!("run-1-result-{n}")),
            run_id: Set("run-1".to_string()),
            dataset_item_id: Set(format!("dataset-1-item-{n}")),
            model_id: Set(if index < 3 { "model-1" } else { "model-2" }.to_string()),
            input_text: Set(format!("测试输入 {n}")),
            expected_output: Set(Some(format!("期望输出 {n}"))),
            actual_output: Set(Some(format!("实际输出 {n}"))),
            metrics: Set(Some(
                json!({"accuracy": 0.85, "relevance": 0.9, "fluency": 0.8}),
            )),
            status: Set(ResultStatus::Completed),
            error_message: Set(None),
            processing_time_ms: Set(Some(1200 + index * 100)),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;
        stats.results_created += 1;
    }

    txn.commit().await?;
    info!(?stats, "示例数据已生成");
    Ok(stats)
}

/// 构造一份旧版浏览器本地存储数据，迁移工具未指定文件时使用
#[must_use]
pub fn sample_legacy_blob() -> Value {
    let now = Utc::now().to_rfc3339();
    json!({
        "models": [
            {
                "id": "model-local-1",
                "name": "GPT-4 Local",
                "provider": "openai",
                "baseUrl": "https://api.openai.com/v1",
                "apiKey": "sk-local-key-1",
                "modelId": "gpt-4",
                "config": {"temperature": 0.7, "max_tokens": 2000}
            },
            {
                "id": "model-local-2",
                "name": "Claude 3 Sonnet Local",
                "provider": "anthropic",
                "baseUrl": "https://api.anthropic.com/v1",
                "apiKey": "sk-local-key-2",
                "modelId": "claude-3-sonnet-20240229",
                "config": {"temperature": 0.8, "max_tokens": 3000}
            }
        ],
        "datasets": [
            {
                "id": "dataset-local-1",
                "name": "本地测试数据集",
                "description": "从本地存储导入的测试数据",
                "fileName": "local_test.jsonl",
                "filePath": "/uploads/local_test.jsonl",
                "fileSize": 2048,
                "itemCount": 10,
                "items": [
                    {
                        "id": "item-local-1",
                        "input": "这是一个本地测试问题？",
                        "reference": "这是本地测试答案。"
                    },
                    {
                        "id": "item-local-2",
                        "input": "本地存储的数据如何导入？",
                        "reference": "使用迁移工具可以导入本地存储的数据。"
                    }
                ]
            }
        ],
        "runs": [
            {
                "id": "run-local-1",
                "name": "本地评测任务",
                "datasetId": "dataset-local-1",
                "modelIds": ["model-local-1", "model-local-2"],
                "status": "completed",
                "progress": 1.0,
                "total": 2,
                "completed": 2,
                "failed": 0,
                "createdAt": now,
                "startedAt": now,
                "completedAt": now,
                "configSnapshot": {"batch_size": 5, "timeout": 60},
                "results": [
                    {
                        "id": "result-local-1",
                        "datasetItemId": "item-local-1",
                        "modelId": "model-local-1",
                        "input": "这是一个本地测试问题？",
                        "expected": "这是本地测试答案。",
                        "actual": "这是一个测试回答。",
                        "metrics": {"accuracy": 0.8, "relevance": 0.9},
                        "status": "completed",
                        "processingTimeMs": 1500
                    }
                ]
            }
        ]
    })
}
