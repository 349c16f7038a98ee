use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use shared::ClientConfig;

/// LocalStorage key holding a JSON `ClientConfig`. Missing fields keep their defaults.
pub const CONFIG_STORAGE_KEY: &str = "deepfake_client.config";

/// Defaults, then the build-time `DEEPFAKE_API_URL`, then the stored config.
pub fn load_config() -> ClientConfig {
    let mut config = match option_env!("DEEPFAKE_API_URL") {
        Some(url) => ClientConfig::with_base_url(url),
        None => ClientConfig::default(),
    };

    match LocalStorage::get::<ClientConfig>(CONFIG_STORAGE_KEY) {
        Ok(stored) => match stored.validate() {
            Ok(()) => {
                log::info!("Using stored client config");
                config = stored;
            }
            Err(e) => log::warn!("Ignoring stored client config: {}", e),
        },
        Err(StorageError::KeyNotFound(_)) => {}
        Err(e) => log::warn!("Could not read stored client config: {}", e),
    }

    if let Err(e) = config.validate() {
        log::error!("{}; falling back to defaults", e);
        return ClientConfig::default();
    }
    config
}
