use crate::cartesian_product;
use crate::control::{ControlSet, PerturbationKind, SequentialControls};
use crate::parser::{
    NUMBER, OutputLines, after_colon, has_prefix, is_control_banner, parse_pair_header,
};
use log::{debug, trace, warn};

/// One `Sequence of the attractors` block: the attractor path and the alternative
/// control sets of every step.
struct OpenSequence {
    pair: (usize, usize),
    attractors: Vec<usize>,
    steps: Vec<Vec<ControlSet>>,
}

impl OpenSequence {
    /// Expand the per-step alternatives into complete sequences and store them.
    fn commit(self, controls: &mut SequentialControls) {
        let hops = self.attractors.len().saturating_sub(1);
        if self.steps.len() != hops {
            warn!(
                "Dropping sequence {:?} of pair {:?}: {} step(s) for {} hop(s).",
                self.attractors,
                self.pair,
                self.steps.len(),
                hops
            );
            return;
        }
        let entry = controls.entry(self.pair).or_default();
        for path in cartesian_product(&self.steps, usize::MAX) {
            entry.push(self.attractors.iter().copied().zip(path).collect());
        }
    }
}

/// Parse attractor-sequential control results: `(source, target) -> sequences`.
///
/// Every sequence lists `(attractor, control set)` pairs in execution order. The
/// engine reports alternatives per step, so a block with steps of sizes `n1, n2, ...`
/// yields `n1 * n2 * ...` sequences.
pub fn parse_attractor_sequential(
    lines: &OutputLines,
    kind: PerturbationKind,
) -> SequentialControls {
    let banner = format!("========= ATTRACTOR-BASED SEQUENTIAL {} ", kind.banner_word());
    let mut controls = SequentialControls::new();
    let mut in_section = false;
    let mut pair: Option<(usize, usize)> = None;
    let mut open: Option<OpenSequence> = None;
    for line in lines.trimmed() {
        if line.starts_with(&banner) {
            trace!("Found attractor-sequential {kind} banner.");
            in_section = true;
            continue;
        }
        if is_control_banner(line) {
            if let Some(sequence) = open.take() {
                sequence.commit(&mut controls);
            }
            in_section = false;
            continue;
        }
        if !in_section {
            continue;
        }

        let starts_block =
            parse_pair_header(line).is_some() || has_prefix(line, "Sequence of the attractors");
        if let Some(sequence) = open.take() {
            if line.is_empty() || has_prefix(line, "execution time") {
                sequence.commit(&mut controls);
                continue;
            } else if starts_block {
                sequence.commit(&mut controls);
            } else if has_prefix(line, "step") {
                let mut sequence = sequence;
                sequence.steps.push(Vec::new());
                open = Some(sequence);
            } else if has_prefix(line, "control set") {
                let mut sequence = sequence;
                let data = after_colon(line);
                match (ControlSet::parse(data), sequence.steps.last_mut()) {
                    (Some(set), Some(step)) => step.push(set),
                    (None, _) => warn!("Skipping malformed control set `{data}`."),
                    (Some(_), None) => warn!("Control set `{data}` appears before any step."),
                }
                open = Some(sequence);
            } else {
                open = Some(sequence);
            }
            if open.is_some() {
                continue;
            }
        }

        if let Some(header) = parse_pair_header(line) {
            controls.entry(header).or_default();
            pair = Some(header);
        } else if has_prefix(line, "Sequence of the attractors") {
            let Some(current) = pair else {
                warn!("Attractor sequence appears before any `source -` header.");
                continue;
            };
            let attractors = NUMBER
                .find_iter(after_colon(line))
                .filter_map(|it| it.as_str().parse::<usize>().ok()?.checked_sub(1))
                .collect();
            open = Some(OpenSequence {
                pair: current,
                attractors,
                steps: Vec::new(),
            });
        }
    }
    if let Some(sequence) = open {
        sequence.commit(&mut controls);
    }

    debug!(
        "Parsed attractor-sequential {kind} control for {} attractor pair(s).",
        controls.len()
    );
    controls
}
