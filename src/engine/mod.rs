//! Running the CABEAN engine.
//!
//! An [`Engine`] takes an [`EngineInvocation`] (arguments, compiled model, and optional
//! excluded perturbations) and returns the raw text printed by the engine. The default
//! implementation is [`ProcessEngine`], which runs an external executable. The output is
//! wrapped in [`EngineOutput`] for parsing, and [`AttractorIndexTracker`] decides whether
//! control results of a new run can be interpreted with a previously known attractor
//! listing.

use crate::CabeanError;

mod engine_config;
mod index_tracker;
mod output;
mod process;
mod query;

pub use engine_config::EngineConfig;
pub use index_tracker::{AttractorIndexTracker, IndexCheck};
pub use output::EngineOutput;
pub use process::ProcessEngine;
pub use query::{BASE_OPTIONS, EngineInvocation, EngineMode, EngineQuery};

/// Anything that can answer an engine invocation with the engine's textual output.
///
/// Implementations block until the output is complete.
pub trait Engine {
    fn execute(&self, invocation: &EngineInvocation) -> Result<String, CabeanError>;
}

impl<E: Engine + ?Sized> Engine for &E {
    fn execute(&self, invocation: &EngineInvocation) -> Result<String, CabeanError> {
        (**self).execute(invocation)
    }
}
