// Application state module
// Immutable state shared by every connection

use crate::logger::LogFormat;
use crate::routing::RouteTable;

use super::types::Config;

/// Application state, built once at startup and shared read-only
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    pub access_log_format: LogFormat,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let routes = RouteTable::from_config(&config.routes);
        let access_log_format = LogFormat::parse(&config.logging.access_log_format);

        Self {
            config,
            routes,
            access_log_format,
        }
    }
}
