use std::sync::Arc;

use crate::config::DashConfig;
use crate::dataset::Dataset;

/// Shared read-only state of a dashboard session: one immutable dataset
/// snapshot per server run, shared across requests behind an `Arc`. Requests
/// filter their own view; nothing here is ever mutated.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub config: DashConfig,
}

impl AppState {
    pub fn new(dataset: Dataset, config: DashConfig) -> Self {
        AppState {
            dataset: Arc::new(dataset),
            config,
        }
    }
}
