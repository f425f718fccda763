//! Route matching logic.
//!
//! # Responsibilities
//! - Filter table entries by method (exact, uppercase)
//! - Match the concrete path against each cached pattern
//! - Extract parameter values for the first hit
//!
//! # Design Decisions
//! - First match in table order wins; there is no specificity ranking, so
//!   more specific patterns should be registered first
//! - Method is uppercased here, matching registration normalization
//! - No match is an explicit result, not a silent default

use crate::routing::key::RouteKey;
use crate::routing::pattern::PathParams;
use crate::routing::table::{Route, RouteTable};

/// Result of a lookup against the table.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub key: &'a RouteKey,
    pub route: &'a Route,
    pub params: PathParams,
}

/// Find the first registered route matching `method` and `path`.
pub fn match_route<'a>(method: &str, path: &str, table: &'a RouteTable) -> Option<RouteMatch<'a>> {
    let method = method.to_ascii_uppercase();

    for entry in table.entries() {
        if entry.key.method() != method {
            continue;
        }
        match entry.pattern.captures(path) {
            Some(params) => {
                return Some(RouteMatch {
                    key: &entry.key,
                    route: &entry.route,
                    params,
                });
            }
            None => {
                tracing::trace!(path = %path, pattern = %entry.key.pattern(), "Path does not match pattern");
            }
        }
    }

    None
}
