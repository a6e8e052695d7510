//! # Fine-tune Module
//!
//! One-to-one proxies onto the OpenAI API using the session user's own key,
//! plus saving and validating that key.

pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::finetune_routes;
