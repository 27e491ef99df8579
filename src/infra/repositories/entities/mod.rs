//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod booking;
pub mod credential;
pub mod guest;
pub mod json;
pub mod meeting;
pub mod prospective_guest;
pub mod purchase;
pub mod role;
pub mod user;
pub mod user_role;
pub mod vendor;
