//! High-level reprogramming queries over one network.
//!
//! A [`CabeanSession`] owns the engine, the network and the query restrictions, and
//! remembers the attractor listing of the first run. Control results refer to
//! attractors by index, so every control query is interpreted through that listing
//! and the listing is verified against the one printed by the control run itself.

use crate::CabeanError;
use crate::control::PerturbationKind;
use crate::engine::{
    AttractorIndexTracker, Engine, EngineConfig, EngineInvocation, EngineMode, EngineOutput,
    EngineQuery, IndexCheck, ProcessEngine,
};
use crate::model::{BooleanModel, ExcludedPerturbations, IsplSpecification, compile_ispl};
use crate::parser::StateDecoder;
use crate::state::{Attractors, PartialState, TrapSpaceAttractor, matching_attractors};
use crate::strategy::{ReprogrammingStrategies, StrategyAssembler};
use biodivine_lib_param_bn::BooleanNetwork;
use log::{debug, info, warn};

#[cfg(test)]
mod tests;

pub struct CabeanSession<E: Engine = ProcessEngine> {
    engine: E,
    model: BooleanModel,
    tracker: AttractorIndexTracker,
    initial: Option<PartialState>,
    excluded: ExcludedPerturbations,
    max_perturbations: Option<usize>,
    known: Option<Attractors>,
}

impl CabeanSession<ProcessEngine> {
    /// Create a session which runs the engine executable described by `config`.
    pub fn new(model: BooleanModel, config: EngineConfig) -> CabeanSession<ProcessEngine> {
        let tracker = AttractorIndexTracker::new(config.check_index_stability);
        CabeanSession::with_engine(ProcessEngine::new(config), model).with_tracker(tracker)
    }

    pub fn from_network(
        network: &BooleanNetwork,
        config: EngineConfig,
    ) -> Result<CabeanSession<ProcessEngine>, CabeanError> {
        Ok(CabeanSession::new(BooleanModel::try_from(network)?, config))
    }
}

impl<E: Engine> CabeanSession<E> {
    /// Create a session over an arbitrary engine, with the index stability check enabled.
    pub fn with_engine(engine: E, model: BooleanModel) -> CabeanSession<E> {
        CabeanSession {
            engine,
            model,
            tracker: AttractorIndexTracker::new(true),
            initial: None,
            excluded: ExcludedPerturbations::default(),
            max_perturbations: None,
            known: None,
        }
    }

    pub fn with_tracker(mut self, tracker: AttractorIndexTracker) -> CabeanSession<E> {
        self.tracker = tracker;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn model(&self) -> &BooleanModel {
        &self.model
    }

    /// Restrict the initial states of the attractor listing and of all control
    /// queries. Forgets the known attractor listing.
    pub fn set_initial(&mut self, initial: Option<PartialState>) -> Result<(), CabeanError> {
        if let Some(initial) = &initial {
            self.model.validate_state(initial)?;
        }
        self.initial = initial;
        self.known = None;
        Ok(())
    }

    /// Forbid perturbations in subsequent control queries (`X+`, `X-`, or `X`, see
    /// [`ExcludedPerturbations`]). Replaces any previous exclusions.
    pub fn exclude<S: AsRef<str>>(&mut self, specs: &[S]) -> Result<(), CabeanError> {
        self.excluded = ExcludedPerturbations::parse(specs, &self.model)?;
        Ok(())
    }

    /// Bound the number of perturbed nodes in subsequent control queries.
    pub fn max_perturbations(&mut self, max: Option<usize>) {
        self.max_perturbations = max;
    }

    /// Attractors reachable from `initial` (or from anywhere), computed by a fresh run.
    pub fn attractors(
        &self,
        initial: Option<&PartialState>,
    ) -> Result<Vec<TrapSpaceAttractor>, CabeanError> {
        if let Some(initial) = initial {
            self.model.validate_state(initial)?;
        }
        let spec = IsplSpecification::new().with_initial(initial.cloned());
        let output = self.run(&EngineQuery::new(EngineMode::Attractors), spec)?;
        Ok(output.attractors().values().cloned().collect())
    }

    /// The attractor listing that gives meaning to attractor indices. Computed on first
    /// use and replaced whenever the engine renumbers the attractors.
    pub fn known_attractors(&mut self) -> Result<&Attractors, CabeanError> {
        let known = match self.known.take() {
            Some(known) => known,
            None => {
                let spec = IsplSpecification::new().with_initial(self.initial.clone());
                let output = self.run(&EngineQuery::new(EngineMode::Attractors), spec)?;
                output.attractors().clone()
            }
        };
        let known: &Attractors = self.known.insert(known);
        Ok(known)
    }

    /// Single perturbations leading from attractors matching `orig` to attractors
    /// matching `dest`.
    pub fn one_step(
        &mut self,
        kind: PerturbationKind,
        orig: &PartialState,
        dest: &PartialState,
    ) -> Result<ReprogrammingStrategies, CabeanError> {
        self.attractor_control(
            EngineMode::OneStep(kind),
            orig,
            dest,
            |assembler, output, sources, targets| {
                assembler.one_step(kind, sources, targets, &output.one_step(kind));
            },
        )
    }

    /// Sequences of perturbations, each applied once the network settled in an
    /// intermediate attractor.
    pub fn attractor_sequential(
        &mut self,
        kind: PerturbationKind,
        orig: &PartialState,
        dest: &PartialState,
    ) -> Result<ReprogrammingStrategies, CabeanError> {
        self.attractor_control(
            EngineMode::AttractorSequential(kind),
            orig,
            dest,
            |assembler, output, sources, targets| {
                assembler.attractor_sequential(
                    kind,
                    sources,
                    targets,
                    &output.attractor_sequential(kind),
                );
            },
        )
    }

    /// Sequences of instantaneous flips applied in arbitrary states, with at most
    /// `max_steps` flips per path. At most `limit` paths are materialized (`0` means
    /// no limit).
    ///
    /// If `orig` fixes every node, it is used directly as the origin. Otherwise, every
    /// state of every known attractor matching `orig` is an origin.
    pub fn sequential(
        &mut self,
        orig: &PartialState,
        dest: &PartialState,
        max_steps: u32,
        limit: usize,
    ) -> Result<ReprogrammingStrategies, CabeanError> {
        self.model.validate_state(orig)?;
        self.model.validate_state(dest)?;
        let origins = if orig.is_complete_over(self.model.nodes()) {
            vec![orig.clone()]
        } else {
            let known = self.known_attractors()?;
            matching_attractors(known, orig)
                .into_iter()
                .flat_map(|index| known[&index].states().to_vec())
                .collect()
        };
        debug!("Sequential control from {} origin state(s).", origins.len());

        let bound = if limit == 0 { usize::MAX } else { limit };
        let query = EngineQuery::new(EngineMode::path_sequential(limit))
            .with_max_perturbations(self.max_perturbations)
            .with_step_bound(Some(max_steps));
        let no_attractors = Attractors::new();
        let mut assembler = StrategyAssembler::new(&no_attractors);
        for origin in origins {
            if assembler.len() >= bound {
                break;
            }
            let spec = IsplSpecification::new()
                .with_initial(Some(origin))
                .with_targets(vec![dest.clone()])
                .with_step_bound(Some(max_steps));
            let output = self.run(&query, spec)?;
            assembler.path_sequential(dest, &output.path_sequential(), bound);
        }
        Ok(assembler.finish())
    }

    /// Shared driver of the attractor-based control queries, including the retry after
    /// the engine renumbered the attractors.
    fn attractor_control<F>(
        &mut self,
        mode: EngineMode,
        orig: &PartialState,
        dest: &PartialState,
        assemble: F,
    ) -> Result<ReprogrammingStrategies, CabeanError>
    where
        F: Fn(&mut StrategyAssembler<'_>, &EngineOutput, &[usize], &[usize]),
    {
        self.model.validate_state(orig)?;
        self.model.validate_state(dest)?;
        let mut known = self.known_attractors()?.clone();
        let mut retried = false;
        loop {
            let sources = matching_attractors(&known, orig);
            let targets = matching_attractors(&known, dest);
            if sources.is_empty() || targets.is_empty() {
                debug!(
                    "No control needed: {} source and {} target attractor(s) match.",
                    sources.len(),
                    targets.len()
                );
                return Ok(ReprogrammingStrategies::new());
            }

            let mut query =
                EngineQuery::new(mode).with_max_perturbations(self.max_perturbations);
            if let ([source], [target]) = (sources.as_slice(), targets.as_slice()) {
                query = query.with_pair(*source, *target);
            }
            let spec = IsplSpecification::new().with_initial(self.initial.clone());
            let output = self.run(&query, spec)?;
            let fresh = output.attractors();

            match self.tracker.check(&known, fresh) {
                IndexCheck::Stable => (),
                IndexCheck::Unstable { mismatched } if !retried => {
                    info!("Attractor indices {mismatched:?} changed, repeating the query.");
                    known = fresh.clone();
                    self.known = Some(known.clone());
                    retried = true;
                    continue;
                }
                IndexCheck::Unstable { mismatched } => {
                    warn!(
                        "Attractor indices {mismatched:?} changed again, returning the last result."
                    );
                    self.known = Some(fresh.clone());
                }
            }

            let sources = matching_attractors(fresh, orig);
            let targets = matching_attractors(fresh, dest);
            let mut assembler = StrategyAssembler::new(fresh);
            assemble(&mut assembler, &output, &sources, &targets);
            let strategies = assembler.finish();
            debug!("Assembled {} strategy(ies).", strategies.len());
            return Ok(strategies);
        }
    }

    fn run(
        &self,
        query: &EngineQuery,
        spec: IsplSpecification,
    ) -> Result<EngineOutput, CabeanError> {
        let initial = self.model.fold_constants(spec.initial.as_ref());
        let spec = spec.with_initial(initial);
        let ispl = compile_ispl(&self.model, &spec)?;
        let excluded = match query.mode {
            EngineMode::Attractors => None,
            _ => Some(&self.excluded),
        };
        let invocation = EngineInvocation::new(query, ispl, excluded);
        let raw = self.engine.execute(&invocation)?;
        Ok(EngineOutput::new(&raw, StateDecoder::new(self.model.nodes())))
    }
}
