//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     method + path pattern
//!     → key.rs (RouteKey "METHOD:pattern")
//!     → pattern.rs (compile anchored matcher, parameter names)
//!     → table.rs (ordered RouteKey → Route, pattern cached per entry)
//!
//! Incoming Request (method, path):
//!     → matcher.rs (first entry with same method whose pattern matches)
//!     → Return: matched Route + PathParams, or no match
//! ```
//!
//! # Design Decisions
//! - Patterns compiled once, when a key first enters the table
//! - Deterministic: same table and request always match the same route
//! - First match wins (table insertion order)

pub mod key;
pub mod matcher;
pub mod pattern;
pub mod table;

pub use key::RouteKey;
pub use matcher::{match_route, RouteMatch};
pub use pattern::{PathParams, PathPattern};
pub use table::{CandidateResponse, Route, RouteTable};
