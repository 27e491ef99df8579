//! Front desk: the back office of a single hotel.
//!
//! Staff log in with email and password and act under role-based
//! permissions. They register guests and their bookings (with co-stayers
//! and a cost ledger), file purchases against vendors, keep a small CRM of
//! prospective guests and their meetings, and browse the PDF documents all
//! of these carry in an S3 bucket.
//!
//! Requests flow `api` (axum handlers) -> `services` (use cases) ->
//! `infra` (SeaORM repositories, object store, mailer), with `domain`
//! holding the records and validation rules every layer shares.
//!
//! ```bash
//! frontdesk migrate up
//! frontdesk create-admin --name owner --email owner@hotel.example \
//!     --phone 9876543210 --password 'Str0ng!Pass'
//! frontdesk serve --port 3000
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Permission, User};
pub use errors::{AppError, AppResult};
