//! Reprogramming strategies assembled from engine control records.
//!
//! A strategy is a chain of [`StrategyStep`] values: apply a perturbation while in an
//! aliased attractor or state, then continue with the next step. Chains are built from
//! the last step backwards, so that every step owns its successor.

mod assembler;
mod perturbation;
mod strategies;

pub use assembler::StrategyAssembler;
pub use perturbation::{Perturbation, PerturbationValue};
pub use strategies::{AliasTarget, ReprogrammingStrategies, ReprogrammingStrategy, StrategyStep};
