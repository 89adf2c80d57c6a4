use crate::cartesian_product;
use crate::control::{
    ControlSet, OneStepControls, PathStep, PerturbationKind, SequentialControls, SequentialPaths,
};
use crate::state::{Attractors, NodeValue, PartialState};
use crate::strategy::{
    Perturbation, PerturbationValue, ReprogrammingStrategies, ReprogrammingStrategy, StrategyStep,
};
use log::{debug, warn};

/// Turns index-keyed control records into [`ReprogrammingStrategies`].
///
/// All attractor indices are interpreted through the `attractors` listing given at
/// construction, so the records must come from a run whose listing agrees with it.
pub struct StrategyAssembler<'a> {
    attractors: &'a Attractors,
    strategies: ReprogrammingStrategies,
}

impl<'a> StrategyAssembler<'a> {
    pub fn new(attractors: &'a Attractors) -> StrategyAssembler<'a> {
        StrategyAssembler {
            attractors,
            strategies: ReprogrammingStrategies::new(),
        }
    }

    /// Add one single-step strategy per one-step control solution, for every pair of
    /// `sources` and `targets`.
    pub fn one_step(
        &mut self,
        kind: PerturbationKind,
        sources: &[usize],
        targets: &[usize],
        controls: &OneStepControls,
    ) {
        for &source in sources {
            for &target in targets {
                let Some(solutions) = controls.get(&(source, target)) else {
                    continue;
                };
                for control in solutions {
                    self.push_sequence(kind, &[(source, control.clone())], target);
                }
            }
        }
    }

    /// Add one multi-step strategy per attractor-sequential control solution, for every
    /// pair of `sources` and `targets`.
    pub fn attractor_sequential(
        &mut self,
        kind: PerturbationKind,
        sources: &[usize],
        targets: &[usize],
        controls: &SequentialControls,
    ) {
        for &source in sources {
            for &target in targets {
                let Some(solutions) = controls.get(&(source, target)) else {
                    continue;
                };
                for sequence in solutions {
                    self.push_sequence(kind, sequence, target);
                }
            }
        }
    }

    /// Add the state-based paths towards the `target` specification, materializing
    /// at most `limit` of them in total (across all calls on this assembler).
    pub fn path_sequential(&mut self, target: &PartialState, paths: &SequentialPaths, limit: usize) {
        let remaining = limit.saturating_sub(self.strategies.len());
        let paths = match paths {
            SequentialPaths::Combinatorial(hops) if hops.is_empty() => Vec::new(),
            SequentialPaths::Combinatorial(hops) => cartesian_product(hops, remaining),
            SequentialPaths::Enumerated(paths) => {
                paths.iter().take(remaining).cloned().collect()
            }
        };
        debug!("Materialized {} state-based path(s).", paths.len());
        for path in paths {
            let steps = path
                .iter()
                .map(|step| (self.strategies.register_state(&step.from), path_perturbation(step)))
                .collect::<Vec<_>>();
            if let Some(first) = StrategyStep::chain(steps) {
                let target = self.strategies.register_state(target);
                self.strategies.push(ReprogrammingStrategy { first, target });
            }
        }
    }

    /// Number of strategies assembled so far.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn finish(self) -> ReprogrammingStrategies {
        self.strategies
    }

    fn push_sequence(&mut self, kind: PerturbationKind, sequence: &[(usize, ControlSet)], target: usize) {
        let attractors = self.attractors;
        let Some(target_attractor) = attractors.get(&target) else {
            warn!("Skipping control towards unknown attractor #{target}.");
            return;
        };
        let mut steps = Vec::with_capacity(sequence.len());
        for (index, control) in sequence {
            let Some(attractor) = attractors.get(index) else {
                warn!("Skipping control applied in unknown attractor #{index}.");
                return;
            };
            let perturbation =
                Perturbation::from_control(kind, control, |node| attractor.projection(node));
            steps.push((self.strategies.register_attractor(*index, attractor), perturbation));
        }
        if let Some(first) = StrategyStep::chain(steps) {
            let target = self.strategies.register_attractor(target, target_attractor);
            self.strategies.push(ReprogrammingStrategy { first, target });
        }
    }
}

/// Path steps are instantaneous flips relative to the state in which they are applied.
fn path_perturbation(step: &PathStep) -> Perturbation {
    let assignment = step
        .flip
        .iter()
        .map(|node| {
            let current = step.from.get(node).unwrap_or(NodeValue::Any);
            (node.clone(), PerturbationValue::flip_of(current))
        })
        .collect();
    Perturbation {
        kind: PerturbationKind::Instantaneous,
        assignment,
    }
}
