//! REST API 集成测试
//!
//! 通过 `tower::ServiceExt::oneshot` 直接驱动路由，数据库为临时目录中的 SQLite 文件。

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use eval_matrix::AppConfig;
use eval_matrix::app::AppContext;
use eval_matrix::config::DatabaseConfig;
use eval_matrix::management::{AppState, create_router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "evalmatrix-test-boundary";

struct TestApp {
    _dir: TempDir,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("api_test.db");
        Self::with_database(dir, &path)
    }

    fn with_database(dir: TempDir, path: &std::path::Path) -> Self {
        let mut config = AppConfig::default();
        config.database = DatabaseConfig::with_url(format!("sqlite://{}", path.display()));

        let context = Arc::new(AppContext::new(config));
        let router = create_router(AppState::new(context));
        Self { _dir: dir, router }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::delete(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn json(&self, method: Method, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn upload(&self, file_name: &str, content: &str) -> (StatusCode, Value) {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        self.send(
            Request::post("/api/datasets")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    /// 上传 `items` 条数据并基于该数据集创建任务，返回任务ID
    async fn create_run_with_items(&self, items: usize) -> String {
        let content = (0..items)
            .map(|i| json!({"input": format!("问题 {i}"), "output": format!("答案 {i}")}).to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let (status, dataset) = self.upload("run.jsonl", &content).await;
        assert_eq!(status, StatusCode::OK);

        let (status, run) = self
            .json(
                Method::POST,
                "/api/runs",
                &json!({
                    "name": "集成测试任务",
                    "datasetId": dataset["id"],
                    "modelIds": ["model-a"],
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(run["total"], json!(items));
        run["id"].as_str().expect("run id").to_string()
    }

    async fn submit_result(&self, run_id: &str, status: &str) -> (StatusCode, Value) {
        self.json(
            Method::POST,
            &format!("/api/runs/{run_id}/results"),
            &json!({
                "datasetItemId": "item-x",
                "modelId": "model-a",
                "input": "问题",
                "expected": "答案",
                "actual": "回答",
                "metrics": {"accuracy": 1.0},
                "status": status,
                "processingTimeMs": 120,
            }),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_and_root() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body.get("service").is_none());

    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "EvalMatrix API");

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "EvalMatrix Backend is running");
    assert_eq!(body["database"], "SQLite");
}

#[tokio::test]
async fn test_unknown_route_returns_error_envelope() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_upload_skips_malformed_lines() {
    let app = TestApp::new();
    let content = [
        r#"{"input": "1+1=?", "reference": "2"}"#,
        "not json at all",
        r#"{"prompt": "首都是哪里？", "output": "北京", "metadata": {"lang": "zh"}}"#,
        "",
        "[1, 2, 3]",
        r#"{"input": "最后一行"}"#,
    ]
    .join("\n");

    let (status, dataset) = app.upload("mixed.jsonl", &content).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dataset["name"], "mixed.jsonl");
    assert_eq!(dataset["description"], "Dataset uploaded from mixed.jsonl");
    assert_eq!(dataset["itemCount"], 3);

    let items = dataset["items"].as_array().expect("items");
    assert_eq!(items.len(), 3);
    let capital = items
        .iter()
        .find(|item| item["input"] == "首都是哪里？")
        .expect("prompt fallback item");
    assert_eq!(capital["reference"], "北京");

    let (status, fetched) = app
        .get(&format!("/api/datasets/{}", dataset["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["itemCount"], 3);

    let (status, list) = app.get("/api/datasets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let app = TestApp::new();
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\r\n\
         value\r\n\
         --{BOUNDARY}--\r\n"
    );
    let (status, body) = app
        .send(
            Request::post("/api/datasets")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_upload_is_read_before_database_is_touched() {
    // 数据库目录无法创建，任何会话都会失败
    let dir = TempDir::new().expect("create temp dir");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").expect("write blocker");
    let app = TestApp::with_database(dir, &blocker.join("nested").join("api_test.db"));

    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"other\"\r\n\r\n\
         value\r\n\
         --{BOUNDARY}--\r\n"
    );
    let (status, body) = app
        .send(
            Request::post("/api/datasets")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // 读取完成后才开启会话，此时才暴露数据库错误
    let (status, _) = app.upload("data.jsonl", r#"{"input": "a"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_delete_dataset_cascades_items() {
    let app = TestApp::new();
    let content = [r#"{"input": "a"}"#, r#"{"input": "b"}"#].join("\n");
    let (_, dataset) = app.upload("cascade.jsonl", &content).await;
    let id = dataset["id"].as_str().unwrap().to_string();

    let (status, stats) = app.get("/api/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["dataset_items"], 2);

    let (status, body) = app.delete(&format!("/api/datasets/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Dataset deleted successfully");

    let (_, stats) = app.get("/api/stats").await;
    assert_eq!(stats["datasets"], 0);
    assert_eq!(stats["dataset_items"], 0);

    let (status, body) = app.get(&format!("/api/datasets/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");

    let (status, _) = app.delete(&format!("/api/datasets/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_model_is_conflict() {
    let app = TestApp::new();
    let model = json!({
        "id": "gpt-4-prod",
        "name": "GPT-4",
        "provider": "openai",
        "baseUrl": "https://api.openai.com/v1",
        "apiKey": "sk-original",
        "modelId": "gpt-4",
        "config": {"temperature": 0.2},
    });

    let (status, created) = app.json(Method::POST, "/api/models", &model).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], "gpt-4-prod");
    assert_eq!(created["apiKey"], "sk-original");

    let mut duplicate = model.clone();
    duplicate["apiKey"] = json!("sk-replaced");
    let (status, body) = app.json(Method::POST, "/api/models", &duplicate).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "RESOURCE_CONFLICT");

    // 原记录保持不变
    let (_, models) = app.get("/api/models").await;
    let models = models.as_array().expect("models");
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["apiKey"], "sk-original");
}

#[tokio::test]
async fn test_model_without_id_gets_generated_id() {
    let app = TestApp::new();
    let (status, created) = app
        .json(
            Method::POST,
            "/api/models",
            &json!({"name": "Claude", "provider": "anthropic", "modelId": "claude-3"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!created["id"].as_str().unwrap().is_empty());
    assert_eq!(created["baseUrl"], "");

    let (status, body) = app
        .delete(&format!("/api/models/{}", created["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Model deleted successfully");

    // 缺少必填字段
    let (status, body) = app
        .json(Method::POST, "/api/models", &json!({"name": "broken"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_run_completes_after_all_results() {
    let app = TestApp::new();
    let run_id = app.create_run_with_items(5).await;

    for i in 0..4 {
        let status = if i == 1 { "failed" } else { "completed" };
        let (code, body) = app.submit_result(&run_id, status).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["message"], "Result created successfully");
    }

    let (_, run) = app.get(&format!("/api/runs/{run_id}")).await;
    assert_eq!(run["status"], "pending");
    assert_eq!(run["completed"], 4);
    assert_eq!(run["failed"], 1);
    assert_eq!(run["progress"], json!(0.8));
    assert!(run["completedAt"].is_null());

    app.submit_result(&run_id, "completed").await;

    let (_, run) = app.get(&format!("/api/runs/{run_id}")).await;
    assert_eq!(run["status"], "completed");
    assert_eq!(run["completed"], 5);
    assert_eq!(run["progress"], json!(1.0));
    assert!(!run["completedAt"].is_null());

    let (_, results) = app.get(&format!("/api/runs/{run_id}/results")).await;
    assert_eq!(results.as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn test_progress_is_clamped_when_over_submitting() {
    let app = TestApp::new();
    let run_id = app.create_run_with_items(1).await;

    app.submit_result(&run_id, "completed").await;
    let (status, _) = app.submit_result(&run_id, "completed").await;
    assert_eq!(status, StatusCode::OK);

    let (_, run) = app.get(&format!("/api/runs/{run_id}")).await;
    assert_eq!(run["completed"], 2);
    assert_eq!(run["progress"], json!(1.0));
    assert_eq!(run["status"], "completed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_result_submissions_are_serialised() {
    let app = Arc::new(TestApp::new());
    let run_id = app.create_run_with_items(20).await;

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let app = Arc::clone(&app);
            let run_id = run_id.clone();
            tokio::spawn(async move { app.submit_result(&run_id, "completed").await })
        })
        .collect();

    for handle in handles {
        let (status, body) = handle.await.expect("task panicked");
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (_, run) = app.get(&format!("/api/runs/{run_id}")).await;
    assert_eq!(run["completed"], 20);
    assert_eq!(run["status"], "completed");
    assert_eq!(run["progress"], json!(1.0));

    let (_, results) = app.get(&format!("/api/runs/{run_id}/results")).await;
    assert_eq!(results.as_array().map(Vec::len), Some(20));
}

#[tokio::test]
async fn test_result_for_missing_run() {
    let app = TestApp::new();

    let (status, body) = app.submit_result("missing-run", "completed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "RESOURCE_NOT_FOUND");

    let (status, body) = app.get("/api/runs/missing-run/results").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_delete_run_cascades_results() {
    let app = TestApp::new();
    let run_id = app.create_run_with_items(2).await;
    app.submit_result(&run_id, "completed").await;

    let (_, stats) = app.get("/api/stats").await;
    assert_eq!(stats["evaluation_results"], 1);

    let (status, body) = app.delete(&format!("/api/runs/{run_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Run deleted successfully");

    let (_, stats) = app.get("/api/stats").await;
    assert_eq!(stats["evaluation_runs"], 0);
    assert_eq!(stats["evaluation_results"], 0);
}

#[tokio::test]
async fn test_update_run() {
    let app = TestApp::new();
    let run_id = app.create_run_with_items(3).await;
    let uri = format!("/api/runs/{run_id}");

    let (status, run) = app
        .json(
            Method::PUT,
            &uri,
            &json!({"status": "running", "startedAt": "2024-06-01T08:00:00Z"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["status"], "running");
    assert!(!run["startedAt"].is_null());

    let (status, body) = app
        .json(Method::PUT, &uri, &json!({"status": "exploded"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, _) = app.json(Method::PUT, &uri, &json!({"progress": 1.5})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 失败的更新不改变已有状态
    let (_, run) = app.get(&uri).await;
    assert_eq!(run["status"], "running");

    let (status, _) = app
        .json(Method::PUT, "/api/runs/missing", &json!({"status": "running"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_run_validation() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::POST, "/api/runs", &json!({"modelIds": "m"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let (status, body) = app.json(Method::POST, "/api/runs", &json!([1, 2])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // 数据集不存在时总数为 0，并使用默认名称
    let (status, run) = app
        .json(
            Method::POST,
            "/api/runs",
            &json!({"datasetId": "ghost", "modelIds": ["m"]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["total"], 0);
    assert!(run["name"].as_str().unwrap().starts_with("Evaluation Run "));
}

#[tokio::test]
async fn test_sample_import_and_clear_over_http() {
    let app = TestApp::new();

    let (status, body) = app
        .json(Method::POST, "/api/generate-sample-data", &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Sample data generated successfully");
    assert_eq!(body["stats"]["models_created"], 3);

    let (status, body) = app
        .json(Method::POST, "/api/generate-sample-data", &json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, report) = app
        .json(
            Method::POST,
            "/api/import",
            &json!({"models": [{"id": "model-1", "name": "dup"}, {"id": "legacy-1", "name": "new"}]}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["models_migrated"], 1);

    let (status, body) = app.delete("/api/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All data cleared");

    let (_, stats) = app.get("/api/stats").await;
    assert_eq!(stats["models"], 0);
    assert_eq!(stats["evaluation_runs"], 0);
}
