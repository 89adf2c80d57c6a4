use crate::control::{OneStepControls, PerturbationKind, SequentialControls, SequentialPaths};
use crate::parser::{
    OutputLines, StateDecoder, parse_attractor_sequential, parse_attractors, parse_one_step,
    parse_path_sequential,
};
use crate::state::Attractors;
use std::cell::OnceCell;

/// The output of one engine run, together with the node order needed to decode it.
///
/// The attractor listing is parsed at most once and then cached, since every control
/// query consults it.
#[derive(Clone, Debug)]
pub struct EngineOutput {
    lines: OutputLines,
    decoder: StateDecoder,
    attractors: OnceCell<Attractors>,
}

impl EngineOutput {
    pub fn new(raw: &str, decoder: StateDecoder) -> EngineOutput {
        EngineOutput {
            lines: OutputLines::from(raw),
            decoder,
            attractors: OnceCell::new(),
        }
    }

    pub fn lines(&self) -> &OutputLines {
        &self.lines
    }

    pub fn decoder(&self) -> &StateDecoder {
        &self.decoder
    }

    pub fn attractors(&self) -> &Attractors {
        self.attractors
            .get_or_init(|| parse_attractors(&self.lines, &self.decoder))
    }

    pub fn one_step(&self, kind: PerturbationKind) -> OneStepControls {
        parse_one_step(&self.lines, kind)
    }

    pub fn attractor_sequential(&self, kind: PerturbationKind) -> SequentialControls {
        parse_attractor_sequential(&self.lines, kind)
    }

    pub fn path_sequential(&self) -> SequentialPaths {
        parse_path_sequential(&self.lines, &self.decoder)
    }
}
