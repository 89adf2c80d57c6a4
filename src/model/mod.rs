//! Translation of a Boolean network and a state specification into the engine input.
//!
//! The engine reads ISPL: a single agent `M` with one boolean variable per node, two
//! guarded transitions per update rule, optional target ("red") states and an initial
//! state formula. See [`compile_ispl`] for the exact layout.

mod boolean_model;
mod ispl;
mod perturbations;

pub use boolean_model::{BooleanModel, UpdateRule};
pub use ispl::{IsplSpecification, compile_ispl};
pub use perturbations::ExcludedPerturbations;
