use std::sync::Arc;

use crate::chat::ChatProxy;
use crate::classifier::Classifier;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once at startup, read-only afterwards.
    pub classifier: Arc<Classifier>,
    pub chat: ChatProxy,
    pub config: Config,
}
