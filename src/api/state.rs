//! Application state - Dependency injection container.
//!
//! Handlers reach every use case through the service container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, Mailer, ObjectStore};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Absent when the router is driven with fake services
    pub database: Option<Arc<Database>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the production services over a connected database.
    pub fn from_config(
        database: Arc<Database>,
        config: Config,
        store: Arc<dyn ObjectStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let services = Services::from_connection(
            database.get_connection(),
            config.clone(),
            store,
            mailer,
        );

        Self {
            services: Arc::new(services),
            database: Some(database),
            config: Arc::new(config),
        }
    }

    /// State over manually injected services.
    pub fn new(services: Arc<dyn ServiceContainer>, config: Config) -> Self {
        Self {
            services,
            database: None,
            config: Arc::new(config),
        }
    }
}
