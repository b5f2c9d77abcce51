use shared_config::AppConfig;

use crate::store::StoreClient;

/// Shared application state: the configuration plus the one store client
/// whose connection pool every request multiplexes over.
pub struct AppState {
    pub config: AppConfig,
    pub store: StoreClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = StoreClient::new(&config);
        Self { config, store }
    }
}
