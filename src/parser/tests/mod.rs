//! Parsers applied to a single output that contains every section at once.

use crate::control::{ControlSet, PerturbationKind, SequentialPaths};
use crate::parser::{
    OutputLines, StateDecoder, parse_attractor_sequential, parse_attractors, parse_one_step,
    parse_path_sequential,
};
use crate::test_utils::init_logger;
use pretty_assertions::assert_eq;

const COMBINED: &str = "\
number of nodes: 3
=========== find attractor #1 : 1 states ===========
: 1 state(s) in total
1-0-0

=========== find attractor #2 : 2 states ===========
0-1--

=========== find attractor #3 : 1 states ===========
0-0-1

========= ONE-STEP INSTANTANEOUS CONTROL =========
source - 1 to - 2
control set: A=0 B=1
execution time: 0.00 seconds
source - 1 to - 3
driver nodes:
A=0 C=1
C=1 A=0 B=0

execution time: 0.00 seconds
========= ATTRACTOR-BASED SEQUENTIAL INSTANTANEOUS CONTROL =========
source - 1 to - 2
Sequence of the attractors: 1 -> 3 -> 2
STEP 1
control set: C=1
STEP 2
control set: B=1
control set: B=1 C=0
execution time: 0.01 seconds
total execution time: 0.02 seconds
";

fn decoder() -> StateDecoder {
    StateDecoder::new(["A", "B", "C"])
}

#[test]
fn test_sections_do_not_interfere() {
    init_logger();
    let lines = OutputLines::from(COMBINED);

    let attractors = parse_attractors(&lines, &decoder());
    assert_eq!(attractors.len(), 3);
    assert!(attractors[&0].is_steady_state());
    assert_eq!(attractors[&1].covered_states(), 2);

    let one_step = parse_one_step(&lines, PerturbationKind::Instantaneous);
    assert_eq!(one_step.len(), 2);
    assert_eq!(
        one_step[&(0, 1)],
        vec![ControlSet::from_iter([("A", false), ("B", true)])]
    );
    assert_eq!(one_step[&(0, 2)].len(), 2);

    let sequential = parse_attractor_sequential(&lines, PerturbationKind::Instantaneous);
    let sequences = &sequential[&(0, 1)];
    assert_eq!(sequences.len(), 2);
    assert!(sequences.iter().all(|it| it.len() == 2));
    assert!(sequences.iter().all(|it| it[0].0 == 0 && it[1].0 == 2));

    // `STEP` lines of the attractor-sequential section open hops, but none of them
    // carries a `from`/`driver nodes` pair.
    let paths = parse_path_sequential(&lines, &decoder());
    assert_eq!(paths, SequentialPaths::Combinatorial(vec![Vec::new(), Vec::new()]));
    assert_eq!(paths.count(), 0);
}

#[test]
fn test_other_kinds_are_absent() {
    let lines = OutputLines::from(COMBINED);
    for kind in [PerturbationKind::Temporary, PerturbationKind::Permanent] {
        assert!(parse_one_step(&lines, kind).is_empty());
        assert!(parse_attractor_sequential(&lines, kind).is_empty());
    }
}

#[test]
fn test_one_step_indices_refer_to_listing() {
    let lines = OutputLines::from(COMBINED);
    let attractors = parse_attractors(&lines, &decoder());
    let one_step = parse_one_step(&lines, PerturbationKind::Instantaneous);
    for (source, target) in one_step.keys() {
        assert!(attractors.contains_key(source));
        assert!(attractors.contains_key(target));
    }
}
