//! Mock response resolution.
//!
//! # Data Flow
//! ```text
//! (method, path, table snapshot)
//!     → routing::match_route (first matching key + PathParams)
//!     → selector.rs (condition filtering, random tie-break)
//!     → render.rs (placeholder substitution)
//!     → Resolved { status, body }
//! ```

pub mod render;
pub mod selector;

pub use render::render_body;
pub use selector::{NoEligibleResponse, ResponsePicker, SeededPicker, ThreadRngPicker};

use serde_json::Value;

use crate::routing::{match_route, RouteTable};

/// A rendered mock response ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub route: String,
    pub status_code: u16,
    pub body: Value,
}

/// Why a request could not be answered from the table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("mock route not found")]
    RouteNotFound,

    #[error(transparent)]
    NoEligibleResponse(#[from] NoEligibleResponse),
}

/// Resolve a request against a table snapshot.
pub fn resolve(
    method: &str,
    path: &str,
    table: &RouteTable,
    picker: &dyn ResponsePicker,
) -> Result<Resolved, ResolveError> {
    let matched = match_route(method, path, table).ok_or(ResolveError::RouteNotFound)?;
    let candidate = selector::select(&matched.route.responses, &matched.params, picker)?;

    Ok(Resolved {
        route: matched.key.to_string(),
        status_code: candidate.status_code,
        body: render_body(&candidate.body, &matched.params),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{CandidateResponse, RouteKey};
    use serde_json::{json, Map};

    fn users_table() -> RouteTable {
        let key = RouteKey::parse("GET:/api/users/:userId").unwrap();
        let mut table = RouteTable::new();
        table
            .insert_response(
                key.clone(),
                CandidateResponse {
                    body: json!({ "id": ":userId", "name": "John Doe" }),
                    status_code: 200,
                    description: "default user".into(),
                    conditions: Map::new(),
                    created_at: "t1".into(),
                },
            )
            .unwrap();
        let mut conditions = Map::new();
        conditions.insert("userId".into(), json!("123"));
        table
            .insert_response(
                key,
                CandidateResponse {
                    body: json!({ "id": "123", "role": "admin" }),
                    status_code: 200,
                    description: "admin".into(),
                    conditions,
                    created_at: "t2".into(),
                },
            )
            .unwrap();
        table
    }

    #[test]
    fn test_unconditioned_fallback_is_rendered() {
        let resolved = resolve("GET", "/api/users/789", &users_table(), &ThreadRngPicker).unwrap();
        assert_eq!(resolved.status_code, 200);
        assert_eq!(resolved.body, json!({ "id": "789", "name": "John Doe" }));
        assert_eq!(resolved.route, "GET:/api/users/:userId");
    }

    #[test]
    fn test_condition_match_is_selected() {
        let resolved = resolve("GET", "/api/users/123", &users_table(), &ThreadRngPicker).unwrap();
        assert_eq!(resolved.body, json!({ "id": "123", "role": "admin" }));
    }

    #[test]
    fn test_errors_are_distinct() {
        let table = users_table();
        assert_eq!(
            resolve("GET", "/api/orders/1", &table, &ThreadRngPicker),
            Err(ResolveError::RouteNotFound)
        );

        let key = RouteKey::parse("GET:/only/:id").unwrap();
        let mut conditions = Map::new();
        conditions.insert("id".into(), json!("1"));
        let mut table = RouteTable::new();
        table
            .insert_response(
                key,
                CandidateResponse {
                    body: json!({}),
                    status_code: 201,
                    description: String::new(),
                    conditions,
                    created_at: "t".into(),
                },
            )
            .unwrap();
        assert_eq!(
            resolve("GET", "/only/2", &table, &ThreadRngPicker),
            Err(ResolveError::NoEligibleResponse(NoEligibleResponse))
        );
        assert_eq!(resolve("GET", "/only/1", &table, &ThreadRngPicker).unwrap().status_code, 201);
    }
}
