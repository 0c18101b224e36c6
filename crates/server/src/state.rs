use crate::config::ServerConfig;
use codesim::SimilarityEngine;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Engine shared by every request; owns the embedding provider.
    pub engine: Arc<SimilarityEngine>,
}

impl ServerState {
    pub fn new(config: ServerConfig, engine: Arc<SimilarityEngine>) -> Self {
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}
