//! Custom request extractors.

mod auth;
mod path;
mod validated_json;

pub use auth::{perm, Authorized, Requirement};
pub use path::{parse_id, IdPath};
pub use validated_json::{format_validation_errors, ValidatedJson};
