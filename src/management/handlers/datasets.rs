use crate::error::EvalError;
use crate::management::extractors::DbSession;
use crate::management::server::AppState;
use crate::management::{response, services};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::response::Response;

/// 获取数据集列表
pub async fn list_datasets(session: DbSession) -> Response {
    let result = services::datasets::list(&*session).await;
    response::respond(session.finish(result).await)
}

/// 获取单个数据集
pub async fn get_dataset(session: DbSession, Path(id): Path<String>) -> Response {
    let result = services::datasets::get(&*session, &id).await;
    response::respond(session.finish(result).await)
}

/// 上传 JSONL 文件创建数据集（表单字段 `file`）
///
/// 先读完请求体再开启会话，上传期间不占用事务。
pub async fn create_dataset(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return response::app_error(EvalError::bad_request(rejection.body_text())),
    };
    let (file_name, content) = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return response::app_error(e),
    };

    let session = match DbSession::open(&state.storage).await {
        Ok(session) => session,
        Err(e) => return response::app_error(e),
    };
    let result = services::datasets::create_from_upload(&*session, &file_name, &content).await;
    response::respond(session.finish(result).await)
}

/// 删除数据集
pub async fn delete_dataset(session: DbSession, Path(id): Path<String>) -> Response {
    let result = services::datasets::delete(&*session, &id).await;
    response::respond(session.finish(result).await)
}

async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), EvalError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| EvalError::bad_request(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.jsonl").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| EvalError::bad_request(e.body_text()))?;
        return Ok((file_name, bytes.to_vec()));
    }

    Err(EvalError::validation(
        "缺少上传文件字段 file",
        Some("file".to_string()),
    ))
}
