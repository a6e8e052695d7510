//! OpenAI proxy routes

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

/// Creates and returns the provider proxy router
///
/// # Routes
/// - `GET /listFiles`, `GET /getFile?id=`, `GET /getFileContent?id=`
/// - `POST /uploadFileToOpenAI`, `DELETE /deleteFile?id=`
/// - `GET /listModels`, `DELETE /deleteModel?id=`
/// - `POST /createFinetune`, `GET /finetuneJobs`
/// - `POST /saveApiKey`, `POST /testApiKey`
pub fn finetune_routes() -> Router {
    Router::new()
        .route("/listFiles", get(handlers::list_files))
        .route("/uploadFileToOpenAI", post(handlers::upload_file))
        .route("/deleteFile", delete(handlers::delete_file))
        .route("/getFile", get(handlers::get_file))
        .route("/getFileContent", get(handlers::get_file_content))
        .route("/listModels", get(handlers::list_models))
        .route("/deleteModel", delete(handlers::delete_model))
        .route("/createFinetune", post(handlers::create_finetune))
        .route("/finetuneJobs", get(handlers::finetune_jobs))
        .route("/saveApiKey", post(handlers::save_api_key))
        .route("/testApiKey", post(handlers::test_api_key))
}
