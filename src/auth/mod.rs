//! # Auth Module
//!
//! This module handles session handling for the relay:
//! - Google sign-in and session token issuing
//! - The session middleware that resolves the user for every request
//! - The `SessionUser` extractor handlers read the resolved user from

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod token;


pub use extractors::SessionUser;
pub use models::User;
pub use routes::auth_routes;
pub use session::resolve_session;
