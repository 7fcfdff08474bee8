//! Routing module
//!
//! Explicit route table mapping URL prefixes to handlers.

mod table;

pub use table::{AssetRoute, RouteMatch, RouteTable};
