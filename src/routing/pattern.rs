//! Path pattern compilation.
//!
//! # Responsibilities
//! - Turn `/api/users/:userId` into an anchored matcher
//! - Record parameter names in capture order
//!
//! # Design Decisions
//! - Literal text is regex-escaped; only `:name` segments become wildcards
//! - A parameter captures one non-empty segment (`[^/]+`)
//! - No trailing-slash normalization

use std::collections::HashMap;

use regex::Regex;

/// Captured path parameters keyed by name.
pub type PathParams = HashMap<String, String>;

const PARAM_PREFIX: char = ':';

/// Error type for pattern compilation.
#[derive(Debug, thiserror::Error)]
#[error("cannot compile path pattern '{pattern}': {source}")]
pub struct PatternError {
    pattern: String,
    #[source]
    source: regex::Error,
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    regex: Regex,
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compile a path pattern.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut param_names = Vec::new();
        let segments: Vec<String> = pattern
            .split('/')
            .map(|segment| match param_name(segment) {
                Some(name) => {
                    param_names.push(name.to_string());
                    "([^/]+)".to_string()
                }
                None => regex::escape(segment),
            })
            .collect();

        let expr = format!("^{}$", segments.join("/"));
        let regex = Regex::new(&expr).map_err(|source| PatternError {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            regex,
            param_names,
        })
    }

    /// Match a concrete path, returning the captured parameters.
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let params = self
            .param_names
            .iter()
            .zip(caps.iter().skip(1))
            .filter_map(|(name, value)| value.map(|v| (name.clone(), v.as_str().to_string())))
            .collect();
        Some(params)
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }
}

fn param_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix(PARAM_PREFIX)
        .filter(|name| !name.is_empty())
}
