//! # 实体定义测试

#[cfg(test)]
mod tests {
    use crate::{
        api_keys, dataset_items, datasets, evaluation_results, evaluation_runs, models, ResultStatus,
        RunStatus,
    };
    use chrono::Utc;
    use sea_orm::{ActiveEnum, Iterable, Set};
    use serde_json::json;

    #[tokio::test]
    async fn test_model_active_model_creation() {
        let model = models::ActiveModel {
            id: Set("model-1".to_string()),
            name: Set("GPT-3.5 Turbo".to_string()),
            provider: Set("openai".to_string()),
            model_id: Set("gpt-3.5-turbo".to_string()),
            config: Set(Some(json!({"temperature": 0.7}))),
            ..Default::default()
        };

        assert_eq!(model.id.as_ref(), "model-1");
        assert_eq!(model.provider.as_ref(), "openai");
        assert_eq!(model.config.as_ref(), &Some(json!({"temperature": 0.7})));
    }

    #[tokio::test]
    async fn test_dataset_item_creation() {
        let item = dataset_items::ActiveModel {
            id: Set("dataset-1-item-1".to_string()),
            dataset_id: Set("dataset-1".to_string()),
            input_text: Set("中国的首都是哪里？".to_string()),
            reference_output: Set(Some("北京".to_string())),
            ..Default::default()
        };

        assert_eq!(item.dataset_id.as_ref(), "dataset-1");
        assert_eq!(item.reference_output.as_ref(), &Some("北京".to_string()));
    }

    #[test]
    fn test_run_progress_uses_at_least_one_total() {
        let now = Utc::now();
        let mut run = evaluation_runs::Model {
            id: "run-1".to_string(),
            name: "run".to_string(),
            dataset_id: "dataset-1".to_string(),
            model_ids: json!([]),
            status: RunStatus::Pending,
            progress: 0.0,
            total_items: 0,
            completed_items: 1,
            failed_items: 0,
            config_snapshot: None,
            created_at: Some(now),
            started_at: None,
            completed_at: None,
            updated_at: now,
        };
        assert!((run.computed_progress() - 1.0).abs() < f64::EPSILON);

        run.total_items = 4;
        assert!((run.computed_progress() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_status_string_values() {
        let values: Vec<String> = RunStatus::iter().map(|s| s.to_value()).collect();
        assert_eq!(values, vec!["pending", "running", "completed", "failed"]);

        assert_eq!("completed".parse::<ResultStatus>(), Ok(ResultStatus::Completed));
        assert!("running".parse::<ResultStatus>().is_err());
        assert_eq!(RunStatus::default().as_str(), "pending");
    }

    #[test]
    fn test_status_serde_is_lowercase() {
        let encoded = serde_json::to_string(&RunStatus::Running).unwrap();
        assert_eq!(encoded, "\"running\"");
        let decoded: ResultStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(decoded, ResultStatus::Failed);
    }

    #[test]
    fn test_all_entities_compile() {
        println!("- Models: {}", std::any::type_name::<models::Entity>());
        println!("- Datasets: {}", std::any::type_name::<datasets::Entity>());
        println!("- DatasetItems: {}", std::any::type_name::<dataset_items::Entity>());
        println!("- EvaluationRuns: {}", std::any::type_name::<evaluation_runs::Entity>());
        println!("- EvaluationResults: {}", std::any::type_name::<evaluation_results::Entity>());
        println!("- ApiKeys: {}", std::any::type_name::<api_keys::Entity>());
    }
}
