use serde::{Deserialize, Serialize};
use tracing::info;

/// Fully resolved configuration for one synchronisation run. Built by
/// [`crate::load_config::load_config`] and handed to the entrypoint
/// explicitly, never read as ambient global state by the core.
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    pub pos: PosConfig,
    pub listmonk: ListmonkConfig,
}

impl SyncConfig {
    pub fn trace_loaded(&self) {
        self.pos.trace_loaded();
        self.listmonk.trace_loaded();
    }
}

/// Connection and credential parameters for the EdgeServ POS backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct PosConfig {
    pub host: String,
    /// Tenant code; every POS endpoint is scoped under it.
    pub restaurant_code: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl PosConfig {
    pub fn trace_loaded(&self) {
        // Secrets deliberately left out of the log line.
        info!(
            host = %self.host,
            restaurant_code = %self.restaurant_code,
            client_id = %self.client_id,
            "Loaded POS config"
        );
    }
}

/// Connection and credential parameters for the listmonk instance.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListmonkConfig {
    pub host: String,
    pub api_user: String,
    pub api_token: String,
}

impl ListmonkConfig {
    pub fn trace_loaded(&self) {
        info!(
            host = %self.host,
            api_user = %self.api_user,
            "Loaded listmonk config"
        );
    }
}
