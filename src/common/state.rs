// Application state shared across all modules

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::services::{OpenAIService, UserService};

/// Application state containing services and session configuration
#[derive(Clone)]
pub struct AppState {
    pub jwt_secret: String,
    pub finetune_model: String,
    pub user_service: Arc<UserService>,
    pub openai_service: Arc<OpenAIService>,
}

/// Handle layered onto the router as an `Extension`
pub type SharedState = Arc<RwLock<AppState>>;
