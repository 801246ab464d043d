use std::sync::Arc;

use axum::Router;
use catalog_core::config::AppConfig;
use catalog_store::{CatalogStore, InMemoryCatalogStore};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::{api, health};

pub struct Application {
    pub config: AppConfig,
    pub store: Arc<dyn CatalogStore>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("could not bind listener on `{address}`: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Every call builds an empty catalog; nothing is shared between applications.
pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        listen_address = %config.listen_address(),
        "starting application bootstrap"
    );

    Application { config, store: Arc::new(InMemoryCatalogStore::new()) }
}

impl Application {
    pub fn router(&self) -> Router {
        api::router(Arc::clone(&self.store)).merge(health::router())
    }

    pub async fn bind(&self) -> Result<TcpListener, BootstrapError> {
        let address = self.config.listen_address();
        let bound = TcpListener::bind(address.as_str()).await;
        bound.map_err(|source| BootstrapError::Bind { address, source })
    }
}
