use crate::CabeanError;
use crate::model::{BooleanModel, UpdateRule};
use crate::state::PartialState;
use std::fmt::{Display, Formatter};

/// Everything besides the network itself that goes into one compiled model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsplSpecification {
    /// Initial states (`None` means unconstrained). Every constant node of the network
    /// must be fixed here to its constant value, see [`BooleanModel::fold_constants`].
    pub initial: Option<PartialState>,
    /// Target ("red") states, one disjunct per state. Empty means no target section.
    pub targets: Vec<PartialState>,
    /// Upper bound on the number of value flips, tracked by an auxiliary `pc` counter.
    /// `None` (or zero) disables the counter.
    pub step_bound: Option<u32>,
}

impl IsplSpecification {
    pub fn new() -> IsplSpecification {
        IsplSpecification::default()
    }

    pub fn with_initial(mut self, initial: Option<PartialState>) -> IsplSpecification {
        self.initial = initial;
        self
    }

    pub fn with_targets(mut self, targets: Vec<PartialState>) -> IsplSpecification {
        self.targets = targets;
        self
    }

    pub fn with_step_bound(mut self, bound: Option<u32>) -> IsplSpecification {
        self.step_bound = bound;
        self
    }

    fn active_step_bound(&self) -> Option<u32> {
        self.step_bound.filter(|it| *it > 0)
    }
}

/// Compile the network and the specification into the engine's ISPL input.
pub fn compile_ispl(model: &BooleanModel, spec: &IsplSpecification) -> Result<String, CabeanError> {
    let Some(first) = model.nodes().next() else {
        return Err(CabeanError::UnsupportedNetwork(
            "network has no variables".to_string(),
        ));
    };
    if let Some(initial) = &spec.initial {
        model.validate_state(initial)?;
    }
    for target in &spec.targets {
        model.validate_state(target)?;
    }
    for (node, value) in model.constants() {
        let fixed = spec
            .initial
            .as_ref()
            .and_then(|it| it.get(node))
            .and_then(|it| it.try_as_bool());
        if fixed != Some(value) {
            return Err(CabeanError::UnresolvedConstant(node.to_string()));
        }
    }
    Ok(Ispl { model, spec, first }.to_string())
}

/// A validated model ready to be rendered.
struct Ispl<'a> {
    model: &'a BooleanModel,
    spec: &'a IsplSpecification,
    first: &'a str,
}

impl Display for Ispl<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Ispl { model, spec, first } = self;
        let bound = spec.active_step_bound();

        writeln!(f, "Agent M\n\tVars:")?;
        for node in model.nodes() {
            writeln!(f, "\t\t{node}: boolean;")?;
        }
        if let Some(bound) = bound {
            writeln!(f, "\t\tpc: 0..{bound};")?;
        }
        writeln!(f, "\tend Vars")?;

        if !spec.targets.is_empty() {
            writeln!(f, "\tRedStates:")?;
            for target in &spec.targets {
                writeln!(f, "\t\t{}", conjunction(first, target, ""))?;
            }
            writeln!(f, "\tend RedStates")?;
        }

        writeln!(f, "\tActions = {{none}};")?;
        writeln!(f, "\tProtocol:\n\t\tOther: {{none}};\n\tend Protocol")?;
        writeln!(f, "\tEvolution:")?;
        for (node, rule) in model.rules() {
            match rule {
                UpdateRule::Constant(value) => {
                    writeln!(f, "\t\t{node}={value} if {node}=true or {node}=false;")?;
                }
                UpdateRule::Expression(rule) => {
                    writeln!(f, "\t\t{node}=true if ({rule})=true;")?;
                    writeln!(f, "\t\t{node}=false if ({rule})=false;")?;
                }
            }
        }
        if let Some(bound) = bound {
            for node in model.nodes() {
                writeln!(f, "\t\t{node}=true and pc=pc+1 if pc<{bound} and {node}=false;")?;
                writeln!(f, "\t\t{node}=false and pc=pc+1 if pc<{bound} and {node}=true;")?;
            }
        }
        writeln!(f, "\tend Evolution\nend Agent\n")?;

        let initial = spec
            .initial
            .as_ref()
            .map(|it| conjunction(first, it, "M."))
            .unwrap_or_else(|| tautology(first, "M."));
        writeln!(f, "InitStates\n\t{initial}\nend InitStates")
    }
}

/// `x=true and y=false;` over the fixed values of `state`; a state without fixed values
/// becomes a tautology over `first`.
fn conjunction(first: &str, state: &PartialState, prefix: &str) -> String {
    let items = state
        .fixed()
        .map(|(node, value)| format!("{prefix}{node}={value}"))
        .collect::<Vec<_>>();
    if items.is_empty() {
        tautology(first, prefix)
    } else {
        format!("{};", items.join(" and "))
    }
}

fn tautology(node: &str, prefix: &str) -> String {
    format!("{prefix}{node}=true or {prefix}{node}=false;")
}
