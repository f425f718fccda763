//! The registered mock table.
//!
//! # Design Decisions
//! - Entries kept in a `Vec` so insertion order is explicit and survives
//!   persistence regardless of how the JSON map type orders keys
//! - Each entry caches its compiled pattern
//! - A route with no responses is removed, never kept empty
//! - Mutations produce a new table; readers hold an immutable snapshot

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::routing::key::RouteKey;
use crate::routing::pattern::{PathPattern, PatternError};

/// One registered response option for a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    #[serde(rename = "response")]
    pub body: Value,

    #[serde(default = "default_status_code")]
    pub status_code: u16,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub conditions: Map<String, Value>,

    /// Unique creation timestamp; doubles as the response id.
    pub created_at: String,
}

fn default_status_code() -> u16 {
    200
}

impl CandidateResponse {
    pub fn is_conditioned(&self) -> bool {
        !self.conditions.is_empty()
    }
}

/// All candidate responses registered under one key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub responses: Vec<CandidateResponse>,
}

/// A table entry: key, its compiled pattern, and its responses.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub key: RouteKey,
    pub pattern: PathPattern,
    pub route: Route,
}

/// Error type for table mutations.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("route not found: {0}")]
    RouteNotFound(String),

    #[error("response '{id}' not found on route {key}")]
    ResponseNotFound { key: String, id: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Outcome of removing a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The route still has other responses.
    ResponseRemoved,
    /// The last response was removed and the route dropped.
    RouteRemoved,
}

/// Ordered mapping from route key to route.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn get(&self, key: &RouteKey) -> Option<&Route> {
        self.position(key).map(|idx| &self.entries[idx].route)
    }

    /// Append a response to a route, creating the route at the end of the
    /// table if it does not exist yet.
    pub fn insert_response(
        &mut self,
        key: RouteKey,
        response: CandidateResponse,
    ) -> Result<(), TableError> {
        match self.position(&key) {
            Some(idx) => self.entries[idx].route.responses.push(response),
            None => {
                let pattern = PathPattern::compile(key.pattern())?;
                self.entries.push(RouteEntry {
                    key,
                    pattern,
                    route: Route {
                        responses: vec![response],
                    },
                });
            }
        }
        Ok(())
    }

    /// Remove the response whose `created_at` equals `id`.
    pub fn remove_response(&mut self, key: &RouteKey, id: &str) -> Result<Removal, TableError> {
        let idx = self
            .position(key)
            .ok_or_else(|| TableError::RouteNotFound(key.to_string()))?;

        let responses = &mut self.entries[idx].route.responses;
        let before = responses.len();
        responses.retain(|r| r.created_at != id);
        if responses.len() == before {
            return Err(TableError::ResponseNotFound {
                key: key.to_string(),
                id: id.to_string(),
            });
        }

        if responses.is_empty() {
            self.entries.remove(idx);
            Ok(Removal::RouteRemoved)
        } else {
            Ok(Removal::ResponseRemoved)
        }
    }

    fn position(&self, key: &RouteKey) -> Option<usize> {
        self.entries.iter().position(|e| &e.key == key)
    }
}

impl Serialize for RouteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key.to_string(), &entry.route)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RouteTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor)
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = RouteTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of route keys to routes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RouteTable, A::Error> {
        use serde::de::Error;

        let mut table = RouteTable::new();
        while let Some((raw_key, route)) = access.next_entry::<String, Route>()? {
            let key = RouteKey::parse(&raw_key).map_err(A::Error::custom)?;
            if route.responses.is_empty() {
                continue;
            }
            for response in route.responses {
                table.insert_response(key.clone(), response).map_err(A::Error::custom)?;
            }
        }
        Ok(table)
    }
}
