use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::docs_client::DocsConnector;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Yields an authenticated document service per export.
    pub docs: Arc<dyn DocsConnector>,
    /// Held for the whole of an export; a second request is turned away, not queued.
    pub export_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, docs: Arc<dyn DocsConnector>) -> Self {
        Self {
            config,
            docs,
            export_lock: Arc::new(Mutex::new(())),
        }
    }
}
