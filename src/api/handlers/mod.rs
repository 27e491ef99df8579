//! HTTP request handlers.

pub mod auth_handler;
pub mod booking_handler;
pub mod document_handler;
pub mod guest_handler;
pub mod meeting_handler;
pub mod prospect_handler;
pub mod purchase_handler;
mod query;
pub mod role_handler;
pub mod user_handler;
pub mod vendor_handler;

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

pub use auth_handler::{auth_routes, refresh_routes};
pub use booking_handler::booking_routes;
pub use document_handler::document_routes;
pub use guest_handler::guest_routes;
pub use meeting_handler::meeting_routes;
pub use prospect_handler::prospect_routes;
pub use purchase_handler::purchase_routes;
pub use role_handler::role_routes;
pub use user_handler::user_routes;
pub use vendor_handler::vendor_routes;

/// `{values: T}` edit body used by several resources
#[derive(Debug, Deserialize)]
pub struct Values<T> {
    pub values: T,
}

impl<T: Validate> Validate for Values<T> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.values.validate()
    }
}
