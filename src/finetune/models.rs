//! Request payloads for the OpenAI proxy endpoints

use serde::Deserialize;

use crate::services::openai::{FineTuneJobRequest, Hyperparameters};

pub const DEFAULT_N_EPOCHS: u32 = 3;
const JSONL_EXTENSION: &str = ".jsonl";

/// `?id=` on file and model routes
#[derive(Deserialize, Debug)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequest {
    pub training_data: String,
    pub dataset_name: String,
}

impl UploadFileRequest {
    /// Name the uploaded blob gets: `.jsonl` names are kept, anything else
    /// loses a trailing `.json` and ends in a single `.jsonl`
    pub fn file_name(&self) -> String {
        training_file_name(&self.dataset_name)
    }
}

pub fn training_file_name(dataset_name: &str) -> String {
    if dataset_name.ends_with(JSONL_EXTENSION) {
        return dataset_name.to_string();
    }
    let stem = dataset_name.strip_suffix(".json").unwrap_or(dataset_name);
    if stem.ends_with(JSONL_EXTENSION) {
        return stem.to_string();
    }
    format!("{}{}", stem, JSONL_EXTENSION)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinetuneRequest {
    pub file_id: String,
    #[serde(rename = "n_epochs", default)]
    pub n_epochs: Option<u32>,
}

impl CreateFinetuneRequest {
    /// Epoch count sent to the provider; absent or zero means the default of 3
    pub fn epochs(&self) -> u32 {
        self.n_epochs.filter(|n| *n > 0).unwrap_or(DEFAULT_N_EPOCHS)
    }

    pub fn into_job(self, model: &str) -> FineTuneJobRequest {
        FineTuneJobRequest {
            model: model.to_string(),
            hyperparameters: Hyperparameters {
                n_epochs: self.epochs(),
            },
            training_file: self.file_id,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    pub api_key: String,
}
