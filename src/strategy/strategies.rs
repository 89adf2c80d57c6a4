use crate::state::{PartialState, TrapSpaceAttractor};
use crate::strategy::Perturbation;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// One perturbation applied at an aliased attractor or state, optionally followed by
/// the rest of the chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyStep {
    /// Alias of the attractor or state in which the perturbation is applied.
    pub origin: String,
    pub perturbation: Perturbation,
    pub next: Option<Box<StrategyStep>>,
}

impl StrategyStep {
    /// Link `steps` (in execution order) into a chain. Returns `None` for no steps.
    pub fn chain(steps: Vec<(String, Perturbation)>) -> Option<StrategyStep> {
        steps
            .into_iter()
            .rev()
            .fold(None, |next, (origin, perturbation)| {
                Some(StrategyStep {
                    origin,
                    perturbation,
                    next: next.map(Box::new),
                })
            })
    }
}

/// A chain of perturbations leading to the aliased `target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReprogrammingStrategy {
    pub first: StrategyStep,
    pub target: String,
}

impl ReprogrammingStrategy {
    /// Steps of the chain in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &StrategyStep> {
        std::iter::successors(Some(&self.first), |step| step.next.as_deref())
    }

    pub fn len(&self) -> usize {
        self.steps().count()
    }
}

impl Display for ReprogrammingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for step in self.steps() {
            write!(f, "{} --{}--> ", step.origin, step.perturbation)?;
        }
        write!(f, "{}", self.target)
    }
}

/// The object behind an alias.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AliasTarget {
    Attractor(TrapSpaceAttractor),
    State(PartialState),
}

/// Strategies of one reprogramming query, in the order in which the engine reported
/// them, and the alias table shared by all of them.
///
/// Attractors are aliased as `a<index>` (0-based) and states as `s<n>`, numbered in
/// order of first registration. Equal states always receive the same alias.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReprogrammingStrategies {
    strategies: Vec<ReprogrammingStrategy>,
    aliases: BTreeMap<String, AliasTarget>,
}

impl ReprogrammingStrategies {
    pub fn new() -> ReprogrammingStrategies {
        ReprogrammingStrategies::default()
    }

    pub fn register_attractor(&mut self, index: usize, attractor: &TrapSpaceAttractor) -> String {
        let alias = format!("a{index}");
        self.aliases
            .entry(alias.clone())
            .or_insert_with(|| AliasTarget::Attractor(attractor.clone()));
        alias
    }

    pub fn register_state(&mut self, state: &PartialState) -> String {
        let mut registered = 0;
        for (alias, target) in &self.aliases {
            if let AliasTarget::State(known) = target {
                if known == state {
                    return alias.clone();
                }
                registered += 1;
            }
        }
        let alias = format!("s{registered}");
        self.aliases
            .insert(alias.clone(), AliasTarget::State(state.clone()));
        alias
    }

    pub fn push(&mut self, strategy: ReprogrammingStrategy) {
        self.strategies.push(strategy);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReprogrammingStrategy> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn resolve(&self, alias: &str) -> Option<&AliasTarget> {
        self.aliases.get(alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, &AliasTarget)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a ReprogrammingStrategies {
    type Item = &'a ReprogrammingStrategy;
    type IntoIter = std::slice::Iter<'a, ReprogrammingStrategy>;

    fn into_iter(self) -> Self::IntoIter {
        self.strategies.iter()
    }
}

impl Display for ReprogrammingStrategies {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for strategy in &self.strategies {
            writeln!(f, "{strategy}")?;
        }
        for (alias, target) in &self.aliases {
            match target {
                AliasTarget::Attractor(attractor) => writeln!(f, "{alias} = {attractor}")?,
                AliasTarget::State(state) => writeln!(f, "{alias} = {{{state}}}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AliasTarget, ReprogrammingStrategies, ReprogrammingStrategy, StrategyStep};
    use crate::control::PerturbationKind;
    use crate::state::{PartialState, TrapSpaceAttractor};
    use crate::strategy::Perturbation;
    use pretty_assertions::assert_eq;

    fn state(s: &str) -> PartialState {
        s.parse().unwrap()
    }

    fn perturbation() -> Perturbation {
        Perturbation {
            kind: PerturbationKind::Instantaneous,
            assignment: Default::default(),
        }
    }

    #[test]
    fn test_state_alias_determinism() {
        let mut strategies = ReprogrammingStrategies::new();
        let first = strategies.register_state(&state("A=1,B=0"));
        let other = strategies.register_state(&state("A=0"));
        let again = strategies.register_state(&state("B=0,A=1"));
        assert_eq!(first, "s0");
        assert_eq!(other, "s1");
        assert_eq!(again, first);
        assert_eq!(
            strategies.resolve("s1"),
            Some(&AliasTarget::State(state("A=0")))
        );
    }

    #[test]
    fn test_attractor_alias() {
        let mut strategies = ReprogrammingStrategies::new();
        let attractor = TrapSpaceAttractor::from(state("A=1"));
        assert_eq!(strategies.register_attractor(3, &attractor), "a3");
        assert_eq!(
            strategies.resolve("a3"),
            Some(&AliasTarget::Attractor(attractor))
        );
        assert_eq!(strategies.resolve("a0"), None);
    }

    #[test]
    fn test_chain_order() {
        let steps = vec![
            ("a0".to_string(), perturbation()),
            ("a2".to_string(), perturbation()),
            ("a1".to_string(), perturbation()),
        ];
        let first = StrategyStep::chain(steps).unwrap();
        let strategy = ReprogrammingStrategy {
            first,
            target: "a3".to_string(),
        };
        let origins = strategy.steps().map(|it| it.origin.as_str()).collect::<Vec<_>>();
        assert_eq!(origins, vec!["a0", "a2", "a1"]);
        assert_eq!(strategy.len(), 3);
        assert_eq!(
            strategy.to_string(),
            "a0 --instantaneous()--> a2 --instantaneous()--> a1 --instantaneous()--> a3"
        );
        assert!(StrategyStep::chain(Vec::new()).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_strategies_to_json() {
        let mut strategies = ReprogrammingStrategies::new();
        let origin = strategies.register_state(&state("A=1,B=0"));
        let target = strategies.register_state(&state("A=0"));
        let first = StrategyStep::chain(vec![(origin, perturbation())]).unwrap();
        strategies.push(ReprogrammingStrategy { first, target });

        let json = serde_json::to_string(&strategies).unwrap();
        let mut parsed: ReprogrammingStrategies = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, strategies);
        // Aliases keep their meaning after a round trip.
        assert_eq!(parsed.register_state(&state("A=0")), "s1");
        assert_eq!(parsed.register_state(&state("B=1")), "s2");
    }
}
