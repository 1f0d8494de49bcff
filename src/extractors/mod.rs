//! Request extractors: authenticated actor and JSON object bodies.

pub mod auth;
pub mod body;

pub use auth::AuthUser;
pub use body::JsonBody;
