//! OpenAI proxy handlers
//!
//! Each handler makes exactly one provider call with the session user's
//! stored key. Provider failures are relayed with their status and body.

use axum::extract::{Extension, Json, Query};
use tracing::{debug, info, warn};

use super::models::{ApiKeyRequest, CreateFinetuneRequest, IdQuery, UploadFileRequest};
use crate::auth::{SessionUser, User};
use crate::common::{safe_email_log, ApiError, AppState, JsonBody, SharedState};
use crate::services::openai::OpenAIError;

/// Session user plus the provider key stored on their record
async fn provider_context(
    state_lock: &SharedState,
    session: SessionUser,
) -> Result<(AppState, User, String), ApiError> {
    let user = session.require()?;
    let api_key = user
        .open_ai_api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            debug!(user_id = %user.id, "Provider call without a stored API key");
            ApiError::BadRequest("OpenAI API key not configured".to_string())
        })?;
    let state = state_lock.read().await.clone();
    Ok((state, user, api_key))
}

fn required_id(query: IdQuery) -> Result<String, ApiError> {
    query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("id query parameter is required".to_string()))
}

/// Pull `data` out of a provider list object
fn list_data(mut body: serde_json::Value) -> serde_json::Value {
    body.get_mut("data")
        .map(serde_json::Value::take)
        .unwrap_or_else(|| serde_json::json!([]))
}

/// GET /listFiles
///
/// # Response
/// ```json
/// { "files": [ { "id": "file-...", "filename": "train.jsonl", ... } ] }
/// ```
pub async fn list_files(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, _, api_key) = provider_context(&state_lock, session).await?;
    let body = state.openai_service.list_files(&api_key).await?;
    Ok(Json(serde_json::json!({ "files": list_data(body) })))
}

/// POST /uploadFileToOpenAI
/// Uploads training data as a `fine-tune` file and returns the provider's file object
///
/// # Request Body
/// ```json
/// { "trainingData": "{\"messages\": [...]}\n...", "datasetName": "support-chats.json" }
/// ```
pub async fn upload_file(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
    JsonBody(payload): JsonBody<UploadFileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, user, api_key) = provider_context(&state_lock, session).await?;
    let file_name = payload.file_name();

    info!(
        user_id = %user.id,
        file_name = %file_name,
        bytes = payload.training_data.len(),
        "Uploading training file"
    );

    let upload = state
        .openai_service
        .upload_file(&api_key, &file_name, payload.training_data)
        .await?;
    Ok(Json(upload))
}

/// DELETE /deleteFile?id=
pub async fn delete_file(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, user, api_key) = provider_context(&state_lock, session).await?;
    let id = required_id(query)?;
    info!(user_id = %user.id, file_id = %id, "Deleting file");
    let body = state.openai_service.delete_file(&api_key, &id).await?;
    Ok(Json(body))
}

/// GET /getFile?id=
pub async fn get_file(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, _, api_key) = provider_context(&state_lock, session).await?;
    let id = required_id(query)?;
    let file = state.openai_service.retrieve_file(&api_key, &id).await?;
    Ok(Json(serde_json::json!({ "file": file })))
}

/// GET /getFileContent?id=
pub async fn get_file_content(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, _, api_key) = provider_context(&state_lock, session).await?;
    let id = required_id(query)?;
    let content = state.openai_service.file_content(&api_key, &id).await?;
    Ok(Json(serde_json::json!({ "fileContent": content })))
}

/// GET /listModels
pub async fn list_models(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, _, api_key) = provider_context(&state_lock, session).await?;
    let body = state.openai_service.list_models(&api_key).await?;
    Ok(Json(serde_json::json!({ "models": list_data(body) })))
}

/// DELETE /deleteModel?id=
pub async fn delete_model(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
    Query(query): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, user, api_key) = provider_context(&state_lock, session).await?;
    let id = required_id(query)?;
    info!(user_id = %user.id, model_id = %id, "Deleting fine-tuned model");
    let body = state.openai_service.delete_model(&api_key, &id).await?;
    Ok(Json(body))
}

/// POST /createFinetune
/// Starts a fine-tuning job on an uploaded file
///
/// # Request Body
/// ```json
/// { "fileId": "file-abc123", "n_epochs": 5 }
/// ```
/// `n_epochs` defaults to 3.
///
/// # Response
/// ```json
/// { "job": { "id": "ftjob-...", "status": "validating_files", ... } }
/// ```
pub async fn create_finetune(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
    JsonBody(payload): JsonBody<CreateFinetuneRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, user, api_key) = provider_context(&state_lock, session).await?;
    let job_request = payload.into_job(&state.finetune_model);

    let job = state
        .openai_service
        .create_fine_tuning_job(&api_key, &job_request)
        .await?;

    info!(
        user_id = %user.id,
        job_id = %job.get("id").and_then(|v| v.as_str()).unwrap_or("unknown"),
        n_epochs = job_request.hyperparameters.n_epochs,
        "Fine-tuning job created"
    );

    Ok(Json(serde_json::json!({ "job": job })))
}

/// GET /finetuneJobs
pub async fn finetune_jobs(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (state, _, api_key) = provider_context(&state_lock, session).await?;
    let jobs = state.openai_service.list_fine_tuning_jobs(&api_key).await?;
    Ok(Json(serde_json::json!({ "jobs": jobs })))
}

/// POST /saveApiKey
/// Stores the key as given; no format or provider check
///
/// # Request Body
/// ```json
/// { "apiKey": "sk-..." }
/// ```
pub async fn save_api_key(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
    JsonBody(payload): JsonBody<ApiKeyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = session.require()?;
    let state = state_lock.read().await.clone();

    state
        .user_service
        .update_api_key(&user.email, &payload.api_key)
        .await?;

    info!(email = %safe_email_log(&user.email), "Saved provider API key");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /testApiKey
/// Tries the candidate key with a model listing; stores it only if that call succeeds
///
/// # Response
/// The provider's model list on success, or the provider's error status and body.
pub async fn test_api_key(
    Extension(state_lock): Extension<SharedState>,
    session: SessionUser,
    JsonBody(payload): JsonBody<ApiKeyRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = session.require()?;
    let state = state_lock.read().await.clone();

    let models = match state.openai_service.list_models(&payload.api_key).await {
        Ok(models) => models,
        Err(e) => {
            if let OpenAIError::Upstream { status, .. } = &e {
                warn!(
                    email = %safe_email_log(&user.email),
                    status = status,
                    "Candidate API key rejected by provider"
                );
            }
            return Err(e.into());
        }
    };

    state
        .user_service
        .update_api_key(&user.email, &payload.api_key)
        .await?;

    info!(email = %safe_email_log(&user.email), "Validated and saved provider API key");
    Ok(Json(models))
}
