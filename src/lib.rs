//! Control and reprogramming of asynchronous Boolean networks through the CABEAN
//! model checker.
//!
//! The crate compiles a network into the engine's ISPL input ([`model`]), runs the
//! external engine ([`engine`]), parses its textual output into typed records
//! ([`parser`], [`control`]), and assembles those records into reprogramming strategies
//! ([`strategy`]). [`CabeanSession`] ties these steps together.

#[cfg(test)]
mod test_utils;

pub mod control;
pub mod engine;
mod error;
pub mod model;
pub mod parser;
pub mod session;
pub mod state;
pub mod strategy;

pub use error::CabeanError;
pub use session::CabeanSession;

/// Enumerate the Cartesian product of `choices` (the last position changes fastest),
/// stopping once `limit` combinations have been produced.
///
/// A product over zero positions contains one empty combination. A position without
/// choices makes the whole product empty.
fn cartesian_product<T: Clone>(choices: &[Vec<T>], limit: usize) -> Vec<Vec<T>> {
    if limit == 0 || choices.iter().any(|it| it.is_empty()) {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut position = vec![0usize; choices.len()];
    loop {
        result.push(
            position
                .iter()
                .zip(choices)
                .map(|(index, items)| items[*index].clone())
                .collect(),
        );
        if result.len() >= limit {
            return result;
        }
        // Advance the odometer, from the last position.
        let mut k = choices.len();
        loop {
            if k == 0 {
                return result;
            }
            k -= 1;
            position[k] += 1;
            if position[k] < choices[k].len() {
                break;
            }
            position[k] = 0;
        }
    }
}
