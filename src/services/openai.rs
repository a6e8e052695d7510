// src/services/openai.rs
//! Thin client for the OpenAI files, models and fine-tuning endpoints.
//!
//! Every call is a single round trip authenticated with the caller's own API
//! key. There is no retry: a non-2xx reply is surfaced as
//! [`OpenAIError::Upstream`] carrying the provider's status and body.

use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Debug, thiserror::Error)]
pub enum OpenAIError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("OpenAI returned HTTP {status}")]
    Upstream {
        status: u16,
        body: serde_json::Value,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FineTuneJobRequest {
    pub model: String,
    pub training_file: String,
    pub hyperparameters: Hyperparameters,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Hyperparameters {
    pub n_epochs: u32,
}

#[derive(Debug)]
pub struct OpenAIService {
    client: Client,
    base_url: String,
}

impl OpenAIService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OpenAIError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn file_url(&self, file_id: &str, suffix: &str) -> String {
        self.url(&format!("files/{}{}", urlencoding::encode(file_id), suffix))
    }

    /// GET /v1/files
    pub async fn list_files(&self, api_key: &str) -> Result<serde_json::Value, OpenAIError> {
        let response = self.send(self.client.get(self.url("files")), api_key).await?;
        json_body(response).await
    }

    /// POST /v1/files (multipart, purpose `fine-tune`)
    pub async fn upload_file(
        &self,
        api_key: &str,
        file_name: &str,
        contents: String,
    ) -> Result<serde_json::Value, OpenAIError> {
        let part = multipart::Part::text(contents)
            .file_name(file_name.to_string())
            .mime_str("text/plain; charset=utf8")
            .map_err(|e| OpenAIError::RequestFailed(e.to_string()))?;
        let form = multipart::Form::new()
            .text("purpose", "fine-tune")
            .part("file", part);

        debug!(file_name = %file_name, "Uploading training file to OpenAI");

        let response = self
            .send(self.client.post(self.url("files")).multipart(form), api_key)
            .await?;
        json_body(response).await
    }

    /// GET /v1/files/{id}
    pub async fn retrieve_file(
        &self,
        api_key: &str,
        file_id: &str,
    ) -> Result<serde_json::Value, OpenAIError> {
        let response = self
            .send(self.client.get(self.file_url(file_id, "")), api_key)
            .await?;
        json_body(response).await
    }

    /// GET /v1/files/{id}/content
    ///
    /// Training files are JSON Lines, so the body is returned as text unless it
    /// parses as a single JSON document.
    pub async fn file_content(
        &self,
        api_key: &str,
        file_id: &str,
    ) -> Result<serde_json::Value, OpenAIError> {
        let response = self
            .send(self.client.get(self.file_url(file_id, "/content")), api_key)
            .await?;
        let text = response
            .text()
            .await
            .map_err(|e| OpenAIError::InvalidResponse(e.to_string()))?;

        Ok(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
    }

    /// DELETE /v1/files/{id}
    pub async fn delete_file(
        &self,
        api_key: &str,
        file_id: &str,
    ) -> Result<serde_json::Value, OpenAIError> {
        let response = self
            .send(self.client.delete(self.file_url(file_id, "")), api_key)
            .await?;
        json_body(response).await
    }

    /// GET /v1/models
    pub async fn list_models(&self, api_key: &str) -> Result<serde_json::Value, OpenAIError> {
        let response = self.send(self.client.get(self.url("models")), api_key).await?;
        json_body(response).await
    }

    /// DELETE /v1/models/{id}
    pub async fn delete_model(
        &self,
        api_key: &str,
        model_id: &str,
    ) -> Result<serde_json::Value, OpenAIError> {
        let url = self.url(&format!("models/{}", urlencoding::encode(model_id)));
        let response = self.send(self.client.delete(url), api_key).await?;
        json_body(response).await
    }

    /// POST /v1/fine_tuning/jobs
    pub async fn create_fine_tuning_job(
        &self,
        api_key: &str,
        request: &FineTuneJobRequest,
    ) -> Result<serde_json::Value, OpenAIError> {
        debug!(
            model = %request.model,
            training_file = %request.training_file,
            n_epochs = request.hyperparameters.n_epochs,
            "Creating fine-tuning job"
        );
        let response = self
            .send(
                self.client.post(self.url("fine_tuning/jobs")).json(request),
                api_key,
            )
            .await?;
        json_body(response).await
    }

    /// GET /v1/fine_tuning/jobs
    pub async fn list_fine_tuning_jobs(
        &self,
        api_key: &str,
    ) -> Result<serde_json::Value, OpenAIError> {
        let response = self
            .send(self.client.get(self.url("fine_tuning/jobs")), api_key)
            .await?;
        json_body(response).await
    }

    /// Make a single API request; any non-2xx status is an `Upstream` error
    async fn send(&self, request: RequestBuilder, api_key: &str) -> Result<Response, OpenAIError> {
        let response = request
            .bearer_auth(api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(error = %e, "OpenAI request timed out");
                } else {
                    error!(error = %e, "OpenAI request could not be sent");
                }
                OpenAIError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        warn!(status = %status, "OpenAI API request failed");

        let body = serde_json::from_str(&text).unwrap_or_else(|_| {
            serde_json::json!({ "error": { "message": text } })
        });
        Err(OpenAIError::Upstream {
            status: status.as_u16(),
            body,
        })
    }
}

async fn json_body(response: Response) -> Result<serde_json::Value, OpenAIError> {
    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| OpenAIError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn service(server: &MockServer) -> OpenAIService {
        OpenAIService::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_requests_carry_the_callers_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v1/models")
                    .header("authorization", "Bearer sk-user-key");
                then.status(200)
                    .json_body(serde_json::json!({ "object": "list", "data": [] }));
            })
            .await;

        let body = service(&server).list_models("sk-user-key").await.unwrap();

        assert_eq!(body["object"], "list");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_provider_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/files");
                then.status(401).json_body(serde_json::json!({
                    "error": { "message": "Incorrect API key provided", "code": "invalid_api_key" }
                }));
            })
            .await;

        let err = service(&server).list_files("sk-bad").await.unwrap_err();

        match err {
            OpenAIError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body["error"]["code"], "invalid_api_key");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_wrapped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/v1/models/ft-gone");
                then.status(502).body("bad gateway");
            })
            .await;

        let err = service(&server)
            .delete_model("sk-key", "ft-gone")
            .await
            .unwrap_err();

        match err {
            OpenAIError::Upstream { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body["error"]["message"], "bad gateway");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_file_content_falls_back_to_text_for_jsonl() {
        let server = MockServer::start_async().await;
        let jsonl = "{\"messages\":[]}\n{\"messages\":[]}\n";
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v1/files/file-abc/content");
                then.status(200).body(jsonl);
            })
            .await;

        let content = service(&server)
            .file_content("sk-key", "file-abc")
            .await
            .unwrap();

        assert_eq!(content, serde_json::Value::String(jsonl.to_string()));
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_with_fine_tune_purpose() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/files")
                    .body_contains("name=\"purpose\"")
                    .body_contains("fine-tune")
                    .body_contains("filename=\"train.jsonl\"");
                then.status(200)
                    .json_body(serde_json::json!({ "id": "file-1", "purpose": "fine-tune" }));
            })
            .await;

        let body = service(&server)
            .upload_file("sk-key", "train.jsonl", "{\"a\":1}\n".to_string())
            .await
            .unwrap();

        assert_eq!(body["id"], "file-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_request_failure() {
        let service = OpenAIService::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

        let err = service.list_models("sk-key").await.unwrap_err();
        assert!(matches!(err, OpenAIError::RequestFailed(_)));
    }
}
