use crate::control::{PathStep, SequentialPaths};
use crate::parser::{OutputLines, StateDecoder, parse_step_header};
use log::{debug, warn};

/// Parse path-based sequential control results.
///
/// By default the engine reports one list of alternative steps per hop (`STEP n`
/// blocks). After a `One sequential` line it switches to listing complete paths, each
/// opened by a `path ...` line. In both modes a step is described by a
/// `from <label> <state>` line followed by a `driver nodes: X Y` line.
pub fn parse_path_sequential(lines: &OutputLines, decoder: &StateDecoder) -> SequentialPaths {
    let mut enumerated = false;
    let mut groups: Vec<Vec<PathStep>> = Vec::new();
    let mut from = None;
    for line in lines.trimmed() {
        if line.starts_with("One sequential") {
            enumerated = true;
        } else if line.starts_with("STEP ") {
            let expected = groups.len() + 1;
            match parse_step_header(line) {
                Some(step) if step == expected => (),
                other => warn!("Expected step {expected}, found {other:?}."),
            }
            groups.push(Vec::new());
        } else if line.starts_with("path ") {
            if enumerated {
                groups.push(Vec::new());
            }
            from = None;
        } else if line.starts_with("from ") {
            let token = line.split_whitespace().nth(2).unwrap_or("");
            from = decoder.decode(token);
            if from.is_none() {
                warn!("Skipping malformed origin state `{token}`.");
            }
        } else if let Some(drivers) = line.strip_prefix("driver nodes:") {
            let step = from.take().map(|from| PathStep {
                from,
                flip: drivers.split_whitespace().map(|it| it.to_string()).collect(),
            });
            match (step, groups.last_mut()) {
                (Some(step), Some(group)) => group.push(step),
                (None, _) => warn!("Driver nodes `{drivers}` without an origin state."),
                (Some(_), None) => warn!("Driver nodes `{drivers}` outside of any step."),
            }
        }
    }

    debug!(
        "Parsed {} path-based sequential group(s) (enumerated: {enumerated}).",
        groups.len()
    );
    if enumerated {
        SequentialPaths::Enumerated(groups)
    } else {
        SequentialPaths::Combinatorial(groups)
    }
}
