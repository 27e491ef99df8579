//! Shared request and response shapes.

mod pagination;
mod response;

pub use pagination::{total_pages, PageRequest, Paginated, PaginationMeta, PaginationParams};
pub use response::{Created, MessageResponse, NoContent};
