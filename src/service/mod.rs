//! Business rules shared by the handlers: field validation and access control.

pub mod access;
pub mod validation;
pub use access::{check_ownership, is_staff, require_role};
pub use validation::{body_to_map, field_string, Body, RequestValidator};
