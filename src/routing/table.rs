//! Route table module
//!
//! The table is built once at startup from configuration and shared
//! immutably by every connection. Matching is pure: a request path either
//! hits the index route, one asset route by longest prefix, or nothing.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::RoutesConfig;
use crate::logger;

/// A single asset route: URL prefix mapped to a base directory on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoute {
    /// URL prefix, normalized to leading and trailing slash
    pub prefix: String,
    /// Base directory the route is permitted to serve from
    pub dir: PathBuf,
}

/// Result of matching a request path against the table
#[derive(Debug, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    /// The index page
    Index,
    /// An asset route; `rest` is the path relative to the base directory
    Asset { route: &'a AssetRoute, rest: &'a str },
    /// No route matched
    NotFound,
}

/// Explicit route table: index template plus ordered asset routes
pub struct RouteTable {
    template: PathBuf,
    assets: Vec<AssetRoute>,
}

impl RouteTable {
    pub fn from_config(routes: &RoutesConfig) -> Self {
        let mut assets: Vec<AssetRoute> = routes
            .assets
            .iter()
            .map(|r| AssetRoute {
                prefix: normalize_prefix(&r.prefix),
                dir: PathBuf::from(&r.dir),
            })
            .collect();

        // Longest prefix first so nested prefixes win over their parents
        assets.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));

        Self {
            template: PathBuf::from(&routes.template),
            assets,
        }
    }

    /// Template path for the index route
    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Match a request path against the table
    pub fn match_path<'a>(&'a self, path: &'a str) -> RouteMatch<'a> {
        if path == "/" {
            return RouteMatch::Index;
        }

        for route in &self.assets {
            if let Some(rest) = path.strip_prefix(route.prefix.as_str()) {
                if !rest.is_empty() {
                    return RouteMatch::Asset { route, rest };
                }
            }
        }

        RouteMatch::NotFound
    }

    /// Create every asset base directory if absent. Idempotent: existing
    /// directories and their contents are left untouched.
    pub fn ensure_asset_dirs(&self) -> io::Result<()> {
        for route in &self.assets {
            std::fs::create_dir_all(&route.dir)?;
            logger::log_asset_dir_ready(&route.dir);
        }
        Ok(())
    }
}

/// Normalize a configured prefix to `/name/` form so that stripping it
/// always leaves a relative remainder.
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    format!("/{trimmed}/")
}
