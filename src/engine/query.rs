use crate::control::PerturbationKind;
use crate::model::ExcludedPerturbations;

/// Flags passed to every engine run: asynchronous semantics, steady state enumeration,
/// and the attractor search variants.
pub const BASE_OPTIONS: [&str; 4] = ["-asynbn", "-steadystates", "-newtarjan", "-newpred"];

/// What the engine should compute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineMode {
    /// Attractor enumeration only.
    Attractors,
    /// One-step control between attractors.
    OneStep(PerturbationKind),
    /// Sequential control through intermediate attractors.
    AttractorSequential(PerturbationKind),
    /// Sequential control through arbitrary states, with the given path enumeration depth.
    PathSequential { depth: u8 },
}

impl EngineMode {
    /// Path-based mode with the enumeration depth the engine needs to produce at least
    /// `limit` paths: `0` (unbounded) or more than 200 paths need depth `2`, a single path
    /// needs depth `1`, and everything else is covered by depth `0`.
    pub fn path_sequential(limit: usize) -> EngineMode {
        let depth = match limit {
            0 => 2,
            1 => 1,
            limit if limit > 200 => 2,
            _ => 0,
        };
        EngineMode::PathSequential { depth }
    }

    fn arguments(&self) -> Vec<String> {
        match self {
            EngineMode::Attractors => vec!["-compositional".to_string(), "2".to_string()],
            EngineMode::OneStep(kind) => vec![
                "-compositional".to_string(),
                "2".to_string(),
                "-control".to_string(),
                format!("O{}", kind.code()),
            ],
            EngineMode::AttractorSequential(kind) => vec![
                "-compositional".to_string(),
                "2".to_string(),
                "-control".to_string(),
                format!("AS{}", kind.code()),
            ],
            EngineMode::PathSequential { depth } => vec![
                "-control".to_string(),
                "GSI".to_string(),
                "-path".to_string(),
                depth.to_string(),
            ],
        }
    }
}

/// One engine query: the mode and its optional restrictions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineQuery {
    pub mode: EngineMode,
    /// Restrict control to this source attractor (0-based).
    pub source: Option<usize>,
    /// Restrict control to this target attractor (0-based).
    pub target: Option<usize>,
    pub max_perturbations: Option<usize>,
    /// Bound on the `pc` step counter of the compiled model.
    pub step_bound: Option<u32>,
}

impl From<EngineMode> for EngineQuery {
    fn from(value: EngineMode) -> Self {
        EngineQuery::new(value)
    }
}

impl EngineQuery {
    pub fn new(mode: EngineMode) -> EngineQuery {
        EngineQuery {
            mode,
            source: None,
            target: None,
            max_perturbations: None,
            step_bound: None,
        }
    }

    pub fn with_pair(mut self, source: usize, target: usize) -> EngineQuery {
        self.source = Some(source);
        self.target = Some(target);
        self
    }

    pub fn with_max_perturbations(mut self, max: Option<usize>) -> EngineQuery {
        self.max_perturbations = max;
        self
    }

    pub fn with_step_bound(mut self, bound: Option<u32>) -> EngineQuery {
        self.step_bound = bound;
        self
    }

    /// Mode specific arguments. Attractor indices are converted to the 1-based
    /// numbering of the engine.
    pub fn arguments(&self) -> Vec<String> {
        let mut args = self.mode.arguments();
        if let Some(source) = self.source {
            args.push("-sin".to_string());
            args.push((source + 1).to_string());
        }
        if let Some(target) = self.target {
            args.push("-tin".to_string());
            args.push((target + 1).to_string());
        }
        if let Some(max) = self.max_perturbations {
            args.push("-maxpert".to_string());
            args.push(max.to_string());
        }
        match self.step_bound {
            Some(bound) if bound > 0 => {
                args.push("-pc".to_string());
                args.push(bound.to_string());
            }
            _ => (),
        }
        args
    }
}

/// Everything an [`crate::engine::Engine`] needs for one run: the arguments, the compiled
/// model, and the optional excluded-perturbation file content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineInvocation {
    pub arguments: Vec<String>,
    pub ispl: String,
    pub excluded: Option<String>,
}

impl EngineInvocation {
    pub fn new(
        query: &EngineQuery,
        ispl: String,
        excluded: Option<&ExcludedPerturbations>,
    ) -> EngineInvocation {
        EngineInvocation {
            arguments: query.arguments(),
            ispl,
            excluded: excluded.filter(|it| !it.is_empty()).map(|it| it.render()),
        }
    }
}
