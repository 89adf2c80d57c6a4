use crate::control::{ControlSet, OneStepControls, PerturbationKind};
use crate::parser::{OutputLines, after_colon, has_prefix, is_control_banner, parse_pair_header};
use log::{debug, trace, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Before the banner of the requested mode (or after a different banner).
    Outside,
    /// Inside the requested section, waiting for a `source - i to - j` header.
    Section,
    /// Inside one (source, target) block.
    Pair(usize, usize),
    /// Inside a driver-node listing: every non-blank line is one solution.
    Listing(usize, usize),
}

/// Parse one-step control results: `(source, target) -> solutions` (0-based indices).
///
/// Solutions are either `control set: A=1 B=0` lines, or the lines of a listing that
/// follows a `driver nodes` marker and ends with a blank line. The block of one pair
/// ends with its `execution time` line.
pub fn parse_one_step(lines: &OutputLines, kind: PerturbationKind) -> OneStepControls {
    let banner = format!("= ONE-STEP {}", kind.banner_word());
    let mut controls = OneStepControls::new();
    let mut state = State::Outside;
    for line in lines.trimmed() {
        if line.contains(&banner) {
            trace!("Found one-step {kind} banner.");
            state = State::Section;
            continue;
        }
        if is_control_banner(line) {
            state = State::Outside;
            continue;
        }
        if state == State::Outside {
            continue;
        }
        if let Some((source, target)) = parse_pair_header(line) {
            controls.entry((source, target)).or_default();
            state = State::Pair(source, target);
            continue;
        }

        state = match state {
            State::Outside | State::Section => state,
            State::Pair(source, target) => {
                if has_prefix(line, "control set") {
                    push_solution(&mut controls, (source, target), after_colon(line));
                    state
                } else if has_prefix(line, "driver nodes") {
                    let inline = after_colon(line);
                    if !inline.is_empty() {
                        push_solution(&mut controls, (source, target), inline);
                    }
                    State::Listing(source, target)
                } else if has_prefix(line, "execution time") {
                    State::Section
                } else {
                    state
                }
            }
            State::Listing(source, target) => {
                if line.is_empty() {
                    State::Pair(source, target)
                } else if has_prefix(line, "execution time") {
                    State::Section
                } else {
                    let data = if has_prefix(line, "control set") {
                        after_colon(line)
                    } else {
                        line
                    };
                    push_solution(&mut controls, (source, target), data);
                    state
                }
            }
        };
    }

    debug!(
        "Parsed one-step {kind} control for {} attractor pair(s).",
        controls.len()
    );
    controls
}

fn push_solution(controls: &mut OneStepControls, pair: (usize, usize), data: &str) {
    match ControlSet::parse(data) {
        Some(set) if !set.is_empty() => controls.entry(pair).or_default().push(set),
        Some(_) => trace!("Ignoring empty control set for pair {pair:?}."),
        None => warn!("Skipping malformed control set `{data}` for pair {pair:?}."),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_one_step;
    use crate::control::{ControlSet, ControlValue, OneStepControls, PerturbationKind};
    use crate::parser::OutputLines;
    use crate::test_utils::init_logger;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_driver_line() {
        init_logger();
        let output = "\
========= ONE-STEP INSTANTANEOUS CONTROL =========
source - 1 to - 2
driver nodes:
A=0 B=1

execution time: 0.01 seconds
";
        let controls = parse_one_step(&OutputLines::from(output), PerturbationKind::Instantaneous);
        let expected = OneStepControls::from([(
            (0, 1),
            vec![ControlSet::from_iter([("A", false), ("B", true)])],
        )]);
        assert_eq!(controls, expected);
    }

    #[test]
    fn test_control_set_lines_and_multiple_pairs() {
        init_logger();
        let output = "\
=========== find attractor #1 : 1 states ===========
1-0

========= ONE-STEP TEMPORARY CONTROL =========
source - 1 to target - 2
Control set: A=0
control set: B=1 C=0
execution time: 0.01 seconds
source - 2 to target - 1
execution time: 0.02 seconds
source - 3 to target - 1
   driver nodes: C=1
   A=1
   B

total time: 1s
";
        let controls = parse_one_step(&OutputLines::from(output), PerturbationKind::Temporary);
        assert_eq!(controls.len(), 3);
        assert_eq!(
            controls[&(0, 1)],
            vec![
                ControlSet::from_iter([("A", false)]),
                ControlSet::from_iter([("B", true), ("C", false)]),
            ]
        );
        assert!(controls[&(1, 0)].is_empty());
        let third = &controls[&(2, 0)];
        assert_eq!(third.len(), 3);
        assert_eq!(third[2].get("B"), Some(ControlValue::Flip));
    }

    #[test]
    fn test_other_mode_is_ignored() {
        let output = "\
========= ONE-STEP PERMANENT CONTROL =========
source - 1 to - 2
control set: A=0
";
        let lines = OutputLines::from(output);
        assert!(parse_one_step(&lines, PerturbationKind::Instantaneous).is_empty());
        assert_eq!(parse_one_step(&lines, PerturbationKind::Permanent).len(), 1);
    }

    #[test]
    fn test_section_ends_at_different_banner() {
        let output = "\
========= ONE-STEP INSTANTANEOUS CONTROL =========
source - 1 to - 2
control set: A=0
========= ATTRACTOR-BASED SEQUENTIAL INSTANTANEOUS CONTROL =========
source - 2 to - 1
control set: B=0
";
        let controls = parse_one_step(&OutputLines::from(output), PerturbationKind::Instantaneous);
        assert_eq!(controls.keys().collect::<Vec<_>>(), vec![&(0, 1)]);
    }
}
