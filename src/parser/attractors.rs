use crate::parser::{ATTRACTOR_HEADER, OutputLines, StateDecoder};
use crate::state::{Attractors, TrapSpaceAttractor};
use log::{debug, trace, warn};

/// The attractor currently being read, with the state count claimed by its header and
/// the number of states covered by the lines seen so far.
struct OpenAttractor {
    index: usize,
    claimed: usize,
    covered: usize,
}

/// Parse the attractor listing: `index -> attractor` (0-based indices).
///
/// Every attractor starts with a `find attractor #i : n states` header and ends at the
/// next blank line. Each line in between carries one fixed-width state as its first
/// token, except for `:`-prefixed annotation lines. States reported under the same index
/// are merged into a single attractor.
pub fn parse_attractors(lines: &OutputLines, decoder: &StateDecoder) -> Attractors {
    let mut attractors = Attractors::new();
    let mut open: Option<OpenAttractor> = None;
    for line in lines.trimmed() {
        if line.starts_with('=') {
            if let Some(header) = parse_header(line) {
                close(open.take());
                trace!("Reading attractor #{} ({} states).", header.index, header.claimed);
                open = Some(header);
                continue;
            }
        }

        let Some(current) = open.as_mut() else {
            continue;
        };

        if line.is_empty() {
            close(open.take());
        } else if !line.starts_with(':') {
            let token = line.split_whitespace().next().unwrap_or(line);
            let Some(state) = decoder.decode(token) else {
                warn!("Skipping malformed state `{token}` of attractor #{}.", current.index);
                continue;
            };
            let state = TrapSpaceAttractor::from(state);
            current.covered = current.covered.saturating_add(state.covered_states());
            let merged = match attractors.remove(&current.index) {
                Some(known) => known.extend(state),
                None => state,
            };
            attractors.insert(current.index, merged);
        }
    }
    close(open);

    debug!("Parsed {} attractor(s).", attractors.len());
    attractors
}

fn parse_header(line: &str) -> Option<OpenAttractor> {
    let captures = ATTRACTOR_HEADER.captures(line)?;
    let index = captures["index"].parse::<usize>().ok()?.checked_sub(1)?;
    let claimed = captures["size"].parse::<usize>().ok()?;
    Some(OpenAttractor {
        index,
        claimed,
        covered: 0,
    })
}

fn close(attractor: Option<OpenAttractor>) {
    match attractor {
        Some(attractor) if attractor.covered != attractor.claimed => {
            warn!(
                "Attractor #{} claims {} state(s), but its listing covers {}.",
                attractor.index, attractor.claimed, attractor.covered
            );
        }
        _ => (),
    }
}
