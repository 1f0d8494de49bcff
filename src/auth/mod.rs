//! Credentials: argon2 password hashes and HS256 access tokens.

mod password;
mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};
