//! Route identity: `METHOD:pattern`.
//!
//! # Design Decisions
//! - Method is stored uppercased; comparison against it is exact
//! - Parsing splits on the first separator only, since patterns carry `:`
//!   for their parameters

use std::fmt;
use std::str::FromStr;

/// Separator between the method token and the path pattern.
pub const KEY_SEPARATOR: char = ':';

/// Error type for route key parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteKeyError {
    #[error("route key '{0}' has no method separator")]
    MissingSeparator(String),

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("route key '{0}' has an empty path pattern")]
    EmptyPattern(String),
}

/// Identity of a registered mock route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    method: String,
    pattern: String,
}

impl RouteKey {
    /// Build a key from a raw method and pattern. The method is uppercased.
    pub fn new(method: &str, pattern: impl Into<String>) -> Result<Self, RouteKeyError> {
        let method = normalize_method(method)?;
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(RouteKeyError::EmptyPattern(format!("{method}{KEY_SEPARATOR}")));
        }
        Ok(Self { method, pattern })
    }

    /// Parse a persisted `METHOD:pattern` string.
    pub fn parse(raw: &str) -> Result<Self, RouteKeyError> {
        let idx = raw
            .find(KEY_SEPARATOR)
            .ok_or_else(|| RouteKeyError::MissingSeparator(raw.to_string()))?;
        let (method, rest) = raw.split_at(idx);
        let pattern = &rest[KEY_SEPARATOR.len_utf8()..];
        if pattern.is_empty() {
            return Err(RouteKeyError::EmptyPattern(raw.to_string()));
        }
        Self::new(method, pattern)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.method, KEY_SEPARATOR, self.pattern)
    }
}

impl FromStr for RouteKey {
    type Err = RouteKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Uppercase a method and check it is a usable HTTP token.
pub fn normalize_method(method: &str) -> Result<String, RouteKeyError> {
    let upper = method.trim().to_ascii_uppercase();
    let valid = !upper.is_empty()
        && !upper.contains(KEY_SEPARATOR)
        && axum::http::Method::from_bytes(upper.as_bytes()).is_ok();
    if valid {
        Ok(upper)
    } else {
        Err(RouteKeyError::InvalidMethod(method.to_string()))
    }
}
