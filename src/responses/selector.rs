//! Response selection.
//!
//! # Algorithm
//! ```text
//! candidates
//!     → conditioned whose every condition equals the captured param (as string)
//!     → if none: unconditioned candidates
//!     → if none: NoEligibleResponse
//!     → uniform random pick
//! ```
//!
//! Random choice is intentional: registering several unconditioned
//! responses on one route simulates a flaky or varying backend. The
//! randomness source is injected through [`ResponsePicker`].

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use crate::routing::pattern::PathParams;
use crate::routing::table::CandidateResponse;

/// Chooses an index in `0..len` for a non-empty eligible set.
pub trait ResponsePicker: Send + Sync {
    fn pick(&self, len: usize) -> usize;
}

/// Picks using the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngPicker;

impl ResponsePicker for ThreadRngPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Picks from a seeded RNG, giving a reproducible sequence.
#[derive(Debug)]
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ResponsePicker for SeededPicker {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(0..len)
    }
}

/// Route matched but no candidate passed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no matching response found for the given parameters")]
pub struct NoEligibleResponse;

/// Candidates selectable for the captured parameters.
pub fn eligible<'a>(
    candidates: &'a [CandidateResponse],
    params: &PathParams,
) -> Vec<&'a CandidateResponse> {
    let conditioned: Vec<_> = candidates
        .iter()
        .filter(|c| c.is_conditioned() && conditions_hold(c, params))
        .collect();

    if !conditioned.is_empty() {
        return conditioned;
    }

    candidates.iter().filter(|c| !c.is_conditioned()).collect()
}

/// Select one candidate for the captured parameters.
pub fn select<'a>(
    candidates: &'a [CandidateResponse],
    params: &PathParams,
    picker: &dyn ResponsePicker,
) -> Result<&'a CandidateResponse, NoEligibleResponse> {
    let pool = eligible(candidates, params);
    match pool.len() {
        0 => Err(NoEligibleResponse),
        1 => Ok(pool[0]),
        len => {
            // Guard against pickers that return out-of-range indices.
            let idx = picker.pick(len).min(len - 1);
            Ok(pool[idx])
        }
    }
}

fn conditions_hold(candidate: &CandidateResponse, params: &PathParams) -> bool {
    candidate.conditions.iter().all(|(name, expected)| {
        params
            .get(name)
            .map(|actual| actual.as_str() == condition_text(expected))
            .unwrap_or(false)
    })
}

/// String form of a condition value: strings as-is, anything else as JSON text.
fn condition_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
