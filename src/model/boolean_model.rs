use crate::CabeanError;
use crate::state::{NodeValue, PartialState};
use biodivine_lib_param_bn::{BinaryOp, BooleanNetwork, FnUpdate};
use log::debug;
use std::collections::BTreeMap;

/// The update rule of one node, already rendered in the engine's expression syntax.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpdateRule {
    Constant(bool),
    /// An ISPL boolean expression (`~` negation, `&` conjunction, `|` disjunction).
    Expression(String),
}

impl UpdateRule {
    pub fn expression(rule: &str) -> UpdateRule {
        UpdateRule::Expression(rule.to_string())
    }
}

/// A read-only view of a Boolean network: node name -> update rule.
///
/// Nodes are ordered lexicographically. This order fixes the variable declarations of the
/// compiled model as well as the columns of the fixed-width states printed by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BooleanModel {
    rules: BTreeMap<String, UpdateRule>,
}

impl<S: Into<String>> FromIterator<(S, UpdateRule)> for BooleanModel {
    fn from_iter<T: IntoIterator<Item = (S, UpdateRule)>>(iter: T) -> Self {
        BooleanModel {
            rules: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl TryFrom<&BooleanNetwork> for BooleanModel {
    type Error = CabeanError;

    fn try_from(network: &BooleanNetwork) -> Result<Self, Self::Error> {
        let mut rules = BTreeMap::new();
        for var in network.variables() {
            let name = network.get_variable_name(var).clone();
            let Some(function) = network.get_update_function(var) else {
                return Err(CabeanError::UnsupportedNetwork(format!(
                    "variable `{name}` has no explicit update function"
                )));
            };
            let rule = match function.as_const() {
                Some(value) => UpdateRule::Constant(value),
                None => UpdateRule::Expression(render_function(network, function)?),
            };
            rules.insert(name, rule);
        }
        Ok(BooleanModel { rules })
    }
}

impl BooleanModel {
    pub fn new() -> BooleanModel {
        BooleanModel::default()
    }

    pub fn set_rule(&mut self, node: &str, rule: UpdateRule) -> Option<UpdateRule> {
        self.rules.insert(node.to_string(), rule)
    }

    pub fn num_nodes(&self) -> usize {
        self.rules.len()
    }

    /// Node names in the canonical (lexicographic) order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|it| it.as_str())
    }

    pub fn contains(&self, node: &str) -> bool {
        self.rules.contains_key(node)
    }

    pub fn rule(&self, node: &str) -> Option<&UpdateRule> {
        self.rules.get(node)
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &UpdateRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn constants(&self) -> impl Iterator<Item = (&str, bool)> {
        self.rules.iter().filter_map(|(node, rule)| match rule {
            UpdateRule::Constant(value) => Some((node.as_str(), *value)),
            UpdateRule::Expression(_) => None,
        })
    }

    /// Fix every constant node to its value in the given initial state.
    ///
    /// Returns `initial` unchanged when the network has no constants. A value supplied by
    /// the caller for a constant node is overwritten by the constant.
    pub fn fold_constants(&self, initial: Option<&PartialState>) -> Option<PartialState> {
        let mut constants = self.constants().peekable();
        if constants.peek().is_none() {
            return initial.cloned();
        }
        let mut result = initial.cloned().unwrap_or_default();
        for (node, value) in constants {
            let value = NodeValue::from(value);
            match result.set(node, value) {
                Some(previous) if previous != value => {
                    debug!("Constant node `{node}` overrides initial value {previous} with {value}.");
                }
                _ => (),
            }
        }
        Some(result)
    }

    /// Fail if the state mentions a node that does not exist in this network.
    pub fn validate_state(&self, state: &PartialState) -> Result<(), CabeanError> {
        match state.nodes().find(|node| !self.contains(node)) {
            Some(node) => Err(CabeanError::UnknownNode(node.to_string())),
            None => Ok(()),
        }
    }

    /// Render the state as a fixed-width token with one value per node (in canonical order)
    /// and a separator between consecutive values. Wildcards and missing nodes print as `-`.
    pub fn render_state(&self, state: &PartialState) -> String {
        let values = self
            .nodes()
            .map(|node| match state.get(node).unwrap_or(NodeValue::Any) {
                NodeValue::Zero => "0",
                NodeValue::One => "1",
                NodeValue::Any => "-",
            })
            .collect::<Vec<_>>();
        values.join(",")
    }
}

/// Translate a network update function into the ISPL expression syntax.
fn render_function(network: &BooleanNetwork, function: &FnUpdate) -> Result<String, CabeanError> {
    if let Some(value) = function.as_const() {
        return Ok(value.to_string());
    }
    if let Some(var) = function.as_var() {
        return Ok(network.get_variable_name(var).clone());
    }
    if let Some(inner) = function.as_not() {
        return Ok(format!("~{}", render_function(network, inner)?));
    }
    if let Some((left, op, right)) = function.as_binary() {
        let l = render_function(network, left)?;
        let r = render_function(network, right)?;
        return Ok(match op {
            BinaryOp::And => format!("({l} & {r})"),
            BinaryOp::Or => format!("({l} | {r})"),
            BinaryOp::Xor => format!("(({l} & ~{r}) | (~{l} & {r}))"),
            BinaryOp::Iff => format!("(({l} & {r}) | (~{l} & ~{r}))"),
            BinaryOp::Imp => format!("(~{l} | {r})"),
        });
    }
    Err(CabeanError::UnsupportedNetwork(format!(
        "uninterpreted function in `{}`",
        function.to_string(network)
    )))
}
