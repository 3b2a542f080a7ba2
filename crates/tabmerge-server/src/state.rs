//! Shared handler state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tabmerge_transform::EtlPipeline;

use crate::config::AppConfig;

/// Cloned into every handler. Holds nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<EtlPipeline>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let pipeline = EtlPipeline::new(config.pipeline_config());
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
