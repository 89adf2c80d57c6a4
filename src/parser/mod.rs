//! Parsers for the textual output of the engine.
//!
//! The engine prints human-readable text with several grammars: the attractor listing,
//! one-step control, attractor-sequential control and path-based sequential control.
//! Each grammar has its own small state machine over trimmed lines. Transitions depend
//! only on line prefixes, never on line positions, since the length of every section
//! varies with the number of solutions.
//!
//! All parsers share the same failure policy: lines that do not fit the current state
//! are skipped, and a missing section banner produces an empty result (the engine omits
//! sections for which it found no solutions).

use crate::state::{NodeValue, PartialState};
use lazy_static::lazy_static;
use regex::Regex;

mod attractor_sequential;
mod attractors;
mod lexer;
mod one_step;
mod path_sequential;

#[cfg(test)]
mod tests;

pub use attractor_sequential::parse_attractor_sequential;
pub use attractors::parse_attractors;
pub use lexer::OutputLines;
pub use one_step::parse_one_step;
pub use path_sequential::parse_path_sequential;

lazy_static! {
    /// `=========== find attractor #2 : 4 states ===========`
    static ref ATTRACTOR_HEADER: Regex =
        Regex::new(r"find attractor #(?P<index>\d+)\s*:\s*(?P<size>\d+)\s+state").unwrap();
    /// `source - 1 to - 2` (the engine sometimes names the target before the dash).
    static ref PAIR_HEADER: Regex =
        Regex::new(r"^source\s*-\s*(?P<source>\d+)\s+to\b.*?-\s*(?P<target>\d+)").unwrap();
    /// `STEP 3` or `step 3:`
    static ref STEP_HEADER: Regex = Regex::new(r"^(?i:step)\s+(?P<step>\d+)").unwrap();
    static ref NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

/// Decodes the fixed-width state tokens printed by the engine.
///
/// A token holds one value per node (in the canonical node order) at even positions;
/// odd positions are separators and are ignored. `-` stands for a wildcard. Columns
/// past the last node (such as the step counter of a bounded model) are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDecoder {
    nodes: Vec<String>,
}

impl StateDecoder {
    pub fn new<S: Into<String>>(nodes: impl IntoIterator<Item = S>) -> StateDecoder {
        StateDecoder {
            nodes: nodes.into_iter().map(|it| it.into()).collect(),
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Returns `None` when the token is too short or a node column holds an unknown value.
    pub fn decode(&self, token: &str) -> Option<PartialState> {
        let values = token
            .chars()
            .step_by(2)
            .take(self.nodes.len())
            .map(|it| NodeValue::try_from(it).ok())
            .collect::<Option<Vec<_>>>()?;
        if values.len() < self.nodes.len() {
            return None;
        }
        Some(self.nodes.iter().cloned().zip(values).collect())
    }
}

/// Parse a `source - i to - j` header into 0-based attractor indices.
fn parse_pair_header(line: &str) -> Option<(usize, usize)> {
    let captures = PAIR_HEADER.captures(line)?;
    let source = captures["source"].parse::<usize>().ok()?.checked_sub(1)?;
    let target = captures["target"].parse::<usize>().ok()?.checked_sub(1)?;
    Some((source, target))
}

fn parse_step_header(line: &str) -> Option<usize> {
    STEP_HEADER.captures(line)?["step"].parse().ok()
}

/// Case-insensitive prefix test.
fn has_prefix(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// The text after the first `:` (or an empty string if there is none).
fn after_colon(line: &str) -> &str {
    line.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("")
}

/// Banners of control sections, regardless of their mode.
fn is_control_banner(line: &str) -> bool {
    line.starts_with('=') && (line.contains("ONE-STEP") || line.contains("SEQUENTIAL"))
}
