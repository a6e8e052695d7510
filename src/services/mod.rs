// src/services/mod.rs
//
// Services backing the HTTP handlers: user persistence, key sealing and the
// OpenAI client

pub mod encryption;
pub mod openai;
pub mod users;

// Re-export commonly used types for convenience
pub use encryption::KeyCipher;
pub use openai::OpenAIService;
pub use users::UserService;
