use anyhow::Result;
use tracing::{error, info};

use crate::config::{ListmonkConfig, PosConfig, SyncConfig};

/// Loads the full run configuration from environment variables (typically
/// injected via the process environment or a `.env` file loaded by the
/// binary). Every variable is required; the first missing one fails the load
/// with an error naming it.
pub fn load_config() -> Result<SyncConfig> {
    let config = SyncConfig {
        pos: PosConfig {
            host: require_env("EDGESERV_POS_HOST")?,
            restaurant_code: require_env("RESTAURANT_CODE")?,
            client_id: require_env("CLIENT_ID")?,
            client_secret: require_env("CLIENT_SECRET")?,
            username: require_env("USERNAME")?,
            password: require_env("PASSWORD")?,
        },
        listmonk: ListmonkConfig {
            host: require_env("LISTMONK_HOST")?,
            api_user: require_env("LISTMONK_USER")?,
            api_token: require_env("LISTMONK_TOKEN")?,
        },
    };

    info!("Config loaded from environment");
    config.trace_loaded();
    Ok(config)
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(e) => {
            error!(error = ?e, var = name, "Required environment variable not set");
            Err(anyhow::anyhow!("{name} environment variable not set: {e}"))
        }
    }
}
