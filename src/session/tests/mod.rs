//! Session queries against a scripted engine which replays prepared outputs.

use crate::CabeanError;
use crate::CabeanSession;
use crate::control::PerturbationKind;
use crate::engine::{AttractorIndexTracker, Engine, EngineInvocation};
use crate::model::{BooleanModel, UpdateRule};
use crate::state::{Attractors, PartialState, TrapSpaceAttractor};
use crate::test_utils::init_logger;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::collections::VecDeque;

const LISTING: &str = "\
=========== find attractor #1 : 1 states ===========
1-0

=========== find attractor #2 : 1 states ===========
0-1

";

const SWAPPED_LISTING: &str = "\
=========== find attractor #1 : 1 states ===========
0-1

=========== find attractor #2 : 1 states ===========
1-0

";

/// Replays the given outputs in order and records every invocation.
#[derive(Default)]
struct ScriptedEngine {
    outputs: RefCell<VecDeque<String>>,
    invocations: RefCell<Vec<EngineInvocation>>,
}

impl ScriptedEngine {
    fn new(outputs: &[&str]) -> ScriptedEngine {
        ScriptedEngine {
            outputs: RefCell::new(outputs.iter().map(|it| it.to_string()).collect()),
            invocations: RefCell::new(Vec::new()),
        }
    }

    fn count(&self) -> usize {
        self.invocations.borrow().len()
    }

    fn invocation(&self, index: usize) -> EngineInvocation {
        self.invocations.borrow()[index].clone()
    }
}

impl Engine for ScriptedEngine {
    fn execute(&self, invocation: &EngineInvocation) -> Result<String, CabeanError> {
        self.invocations.borrow_mut().push(invocation.clone());
        Ok(self.outputs.borrow_mut().pop_front().unwrap_or_default())
    }
}

/// `A` and `B` inhibit each other: steady states `A=1,B=0` and `A=0,B=1`.
fn toggle_switch() -> BooleanModel {
    [
        ("A", UpdateRule::expression("~B")),
        ("B", UpdateRule::expression("~A")),
    ]
    .into_iter()
    .collect()
}

fn state(s: &str) -> PartialState {
    s.parse().unwrap()
}

fn one_step_output(listing: &str, source: usize, target: usize) -> String {
    format!(
        "{listing}========= ONE-STEP INSTANTANEOUS CONTROL =========\n\
         source - {source} to - {target}\n\
         control set: A=0 B=1\n\
         execution time: 0.00 seconds\n"
    )
}

fn has_arguments(invocation: &EngineInvocation, expected: &[&str]) -> bool {
    invocation
        .arguments
        .windows(expected.len())
        .any(|window| window == expected)
}

#[test]
fn test_one_step_with_stable_indices() {
    init_logger();
    let control = one_step_output(LISTING, 1, 2);
    let engine = ScriptedEngine::new(&[LISTING, control.as_str(), control.as_str()]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch());

    let strategies = session
        .one_step(PerturbationKind::Instantaneous, &state("A=1"), &state("A=0"))
        .unwrap();
    assert_eq!(strategies.len(), 1);
    assert_eq!(
        strategies.iter().next().unwrap().to_string(),
        "a0 --instantaneous(A=0 B=1)--> a1"
    );
    assert_eq!(engine.count(), 2);
    assert!(has_arguments(&engine.invocation(1), &["-control", "OI"]));
    assert!(has_arguments(&engine.invocation(1), &["-sin", "1", "-tin", "2"]));

    // The attractor listing is only computed once.
    session
        .one_step(PerturbationKind::Instantaneous, &state("A=1"), &state("A=0"))
        .unwrap();
    assert_eq!(engine.count(), 3);
}

#[test]
fn test_instability_triggers_one_retry() {
    init_logger();
    let control = one_step_output(SWAPPED_LISTING, 2, 1);
    let engine = ScriptedEngine::new(&[LISTING, control.as_str(), control.as_str()]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch());

    let strategies = session
        .one_step(PerturbationKind::Instantaneous, &state("A=1"), &state("A=0"))
        .unwrap();
    assert_eq!(engine.count(), 3);
    // The retry uses the indices of the renumbered listing.
    assert!(has_arguments(&engine.invocation(2), &["-sin", "2", "-tin", "1"]));
    assert_eq!(
        strategies.iter().next().unwrap().to_string(),
        "a1 --instantaneous(A=0 B=1)--> a0"
    );

    let expected = Attractors::from([
        (0, TrapSpaceAttractor::from(state("A=0,B=1"))),
        (1, TrapSpaceAttractor::from(state("A=1,B=0"))),
    ]);
    assert_eq!(session.known_attractors().unwrap(), &expected);
    assert_eq!(engine.count(), 3);
}

#[test]
fn test_repeated_instability_is_not_retried_again() {
    init_logger();
    let swapped = one_step_output(SWAPPED_LISTING, 2, 1);
    let original = one_step_output(LISTING, 1, 2);
    let engine = ScriptedEngine::new(&[
        LISTING,
        swapped.as_str(),
        original.as_str(),
        original.as_str(),
    ]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch());

    let strategies = session
        .one_step(PerturbationKind::Instantaneous, &state("A=1"), &state("A=0"))
        .unwrap();
    assert_eq!(engine.count(), 3);
    assert_eq!(
        strategies.iter().next().unwrap().to_string(),
        "a0 --instantaneous(A=0 B=1)--> a1"
    );
}

#[test]
fn test_disabled_index_check() {
    let control = one_step_output(SWAPPED_LISTING, 2, 1);
    let engine = ScriptedEngine::new(&[LISTING, control.as_str()]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch())
        .with_tracker(AttractorIndexTracker::new(false));
    session
        .one_step(PerturbationKind::Instantaneous, &state("A=1"), &state("A=0"))
        .unwrap();
    assert_eq!(engine.count(), 2);
}

#[test]
fn test_unmatched_specification() {
    init_logger();
    let engine = ScriptedEngine::new(&[LISTING]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch());
    let strategies = session
        .attractor_sequential(
            PerturbationKind::Permanent,
            &state("A=1"),
            &state("A=1,B=1"),
        )
        .unwrap();
    assert!(strategies.is_empty());
    assert_eq!(engine.count(), 1);

    let strategies = session
        .one_step(PerturbationKind::Temporary, &state("B=1,A=1"), &state("A=0"))
        .unwrap();
    assert!(strategies.is_empty());
    assert_eq!(engine.count(), 1);
}

#[test]
fn test_invalid_specification_is_rejected_early() {
    let engine = ScriptedEngine::new(&[]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch());
    let result = session.one_step(PerturbationKind::Instantaneous, &state("X=1"), &state("A=0"));
    assert!(matches!(result, Err(CabeanError::UnknownNode(node)) if node == "X"));
    assert!(matches!(
        session.exclude(&["A+", "Z"]),
        Err(CabeanError::UnknownNode(_))
    ));
    assert!(matches!(
        session.set_initial(Some(state("Q=0"))),
        Err(CabeanError::UnknownNode(_))
    ));
    assert_eq!(engine.count(), 0);
}

#[test]
fn test_restrictions_reach_the_engine() {
    let sequential = format!(
        "{LISTING}========= ATTRACTOR-BASED SEQUENTIAL TEMPORARY CONTROL =========\n\
         source - 1 to - 2\n\
         Sequence of the attractors: 1 -> 2\n\
         STEP 1\n\
         control set: B\n\
         execution time: 0.00 seconds\n"
    );
    let engine = ScriptedEngine::new(&[LISTING, sequential.as_str()]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch());
    session.exclude(&["A+"]).unwrap();
    session.max_perturbations(Some(1));

    let strategies = session
        .attractor_sequential(PerturbationKind::Temporary, &state("A=1"), &state("B=1"))
        .unwrap();
    assert_eq!(
        strategies.iter().next().unwrap().to_string(),
        "a0 --temporary(B=1)--> a1"
    );

    let invocation = engine.invocation(1);
    assert!(has_arguments(&invocation, &["-control", "AST"]));
    assert!(has_arguments(&invocation, &["-maxpert", "1"]));
    assert_eq!(invocation.excluded, Some("R0: A\nR1: \nR: \n".to_string()));
    // The attractor listing is not restricted.
    assert_eq!(engine.invocation(0).excluded, None);
}

#[test]
fn test_sequential_from_complete_state() {
    init_logger();
    let paths = "\
STEP 1
from state 1-0
driver nodes: A B
";
    let engine = ScriptedEngine::new(&[paths]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch());
    let strategies = session
        .sequential(&state("A=1,B=0"), &state("A=0,B=1"), 3, 10)
        .unwrap();

    assert_eq!(engine.count(), 1);
    let invocation = engine.invocation(0);
    assert!(has_arguments(&invocation, &["-control", "GSI", "-path", "0"]));
    assert!(has_arguments(&invocation, &["-pc", "3"]));
    assert!(invocation.ispl.contains("\t\tpc: 0..3;\n"));
    assert!(invocation.ispl.contains("\tRedStates:\n\t\tA=false and B=true;\n"));
    assert!(invocation.ispl.contains("\tM.A=true and M.B=false;\n"));

    assert_eq!(
        strategies.iter().next().unwrap().to_string(),
        "s0 --instantaneous(A=0 B=1)--> s1"
    );
}

#[test]
fn test_sequential_from_attractors() {
    let paths = "\
STEP 1
from state 1-0
driver nodes: A
STEP 2
from state 0-0
driver nodes: B
";
    let engine = ScriptedEngine::new(&[LISTING, paths]);
    let mut session = CabeanSession::with_engine(&engine, toggle_switch());
    let strategies = session
        .sequential(&state("A=1"), &state("B=1"), 5, 0)
        .unwrap();
    assert_eq!(engine.count(), 2);
    assert!(has_arguments(&engine.invocation(1), &["-path", "2"]));
    assert_eq!(strategies.len(), 1);
    assert_eq!(strategies.iter().next().unwrap().len(), 2);
}

#[test]
fn test_free_standing_attractors() {
    let engine = ScriptedEngine::new(&[LISTING]);
    let session = CabeanSession::with_engine(&engine, toggle_switch());
    let attractors = session.attractors(Some(&state("A=1"))).unwrap();
    assert_eq!(attractors.len(), 2);
    assert!(engine.invocation(0).ispl.ends_with("InitStates\n\tM.A=true;\nend InitStates\n"));
}
