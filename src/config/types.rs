// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Routes configuration
///
/// The defaults mirror the site layout: an index template plus CSS, JS, and
/// image directories, each served under its own URL prefix.
#[derive(Debug, Deserialize, Clone)]
pub struct RoutesConfig {
    /// Template rendered for `GET /`
    #[serde(default = "default_template")]
    pub template: String,
    /// Asset routes, matched by URL prefix
    #[serde(default = "default_assets")]
    pub assets: Vec<AssetRouteConfig>,
}

/// One asset route: URL prefix mapped to a base directory on disk
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AssetRouteConfig {
    pub prefix: String,
    pub dir: String,
}

fn default_template() -> String {
    "templates/index.html".to_string()
}

fn default_assets() -> Vec<AssetRouteConfig> {
    vec![
        AssetRouteConfig {
            prefix: "/static/css".to_string(),
            dir: "static/css".to_string(),
        },
        AssetRouteConfig {
            prefix: "/static/js".to_string(),
            dir: "static/js".to_string(),
        },
        AssetRouteConfig {
            prefix: "/images".to_string(),
            dir: "images".to_string(),
        },
    ]
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            assets: default_assets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes() {
        let routes = RoutesConfig::default();
        assert_eq!(routes.template, "templates/index.html");
        assert_eq!(routes.assets.len(), 3);
        assert_eq!(routes.assets[0].prefix, "/static/css");
        assert_eq!(routes.assets[2].dir, "images");
    }
}
