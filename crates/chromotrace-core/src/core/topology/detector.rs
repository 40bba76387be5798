use super::connectivity::ConnectivityGraph;
use crate::core::models::fragments::{FragmentMapping, RING_SIZE};
use thiserror::Error;
use tracing::{debug, info, instrument};

const CARBON: &str = "C";
const NITROGEN: &str = "N";

/// Why the donor–π–acceptor topology could not be identified.
///
/// Every variant names the criterion that failed so a caller can fall back to a manually
/// picked mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("Reference frame has {found} atoms, at least {required} are needed")]
    TooFewAtoms { found: usize, required: usize },
    #[error("Reference frame has {symbols} symbols but {coords} coordinates")]
    InconsistentFrame { symbols: usize, coords: usize },
    #[error("No closed {RING_SIZE}-membered all-carbon ring found")]
    NoRing,
    #[error(
        "No donor nitrogen found: need exactly one ring carbon and exactly two non-ring carbons bonded to one nitrogen"
    )]
    NoDonor,
    #[error(
        "No acceptor nitrogen found: need a nitrogen with a single carbon neighbor that is itself bonded to exactly one ring atom"
    )]
    NoAcceptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DonorGroup {
    nitrogen: usize,
    substituents: [usize; 2],
    ring_atom: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AcceptorGroup {
    nitrogen: usize,
    carbon: usize,
    ring_atom: usize,
}

/// Identifies the ring, donor and acceptor of a donor–π–acceptor chromophore.
///
/// Detection is a pure function of the symbols and the graph: running it twice on the same
/// reference frame yields the same mapping.
#[instrument(skip_all, name = "fragment_detection")]
pub fn detect_fragments(
    symbols: &[String],
    graph: &ConnectivityGraph,
) -> Result<FragmentMapping, DetectionError> {
    let ring = find_carbon_ring(symbols, graph).ok_or(DetectionError::NoRing)?;
    debug!(?ring, "Ring detected.");

    let donor = find_donor(symbols, graph, &ring).ok_or(DetectionError::NoDonor)?;
    debug!(nitrogen = donor.nitrogen, "Donor detected.");

    let acceptor =
        find_acceptor(symbols, graph, &ring, donor.nitrogen).ok_or(DetectionError::NoAcceptor)?;
    debug!(nitrogen = acceptor.nitrogen, "Acceptor detected.");

    let mapping = FragmentMapping {
        ring,
        donor_nitrogen: donor.nitrogen,
        donor_substituents: donor.substituents,
        acceptor_carbon: acceptor.carbon,
        acceptor_nitrogen: acceptor.nitrogen,
        ring_donor_atom: donor.ring_atom,
        ring_acceptor_atom: acceptor.ring_atom,
    };
    info!(?mapping, "Auto-detected fragments.");
    Ok(mapping)
}

fn is_element(symbols: &[String], atom: usize, element: &str) -> bool {
    symbols.get(atom).is_some_and(|s| s == element)
}

fn elements<'a>(symbols: &'a [String], element: &'a str) -> impl Iterator<Item = usize> + 'a {
    symbols
        .iter()
        .enumerate()
        .filter(move |(_, s)| *s == element)
        .map(|(i, _)| i)
}

/// Returns the first all-carbon six-ring, trying start atoms in index order.
fn find_carbon_ring(symbols: &[String], graph: &ConnectivityGraph) -> Option<[usize; RING_SIZE]> {
    elements(symbols, CARBON).find_map(|start| {
        find_ring_from(start, RING_SIZE, graph, |atom| {
            is_element(symbols, atom, CARBON)
        })
    })
}

/// Depth-first search for a simple cycle of exactly `size` atoms through `start`.
///
/// The search keeps its own path and per-depth neighbor cursors instead of recursing, so
/// the path never grows past `size` atoms and stack use is constant.
fn find_ring_from(
    start: usize,
    size: usize,
    graph: &ConnectivityGraph,
    accept: impl Fn(usize) -> bool,
) -> Option<[usize; RING_SIZE]> {
    let mut path = vec![start];
    let mut cursors = vec![0usize];

    while let (Some(&current), Some(cursor)) = (path.last(), cursors.last_mut()) {
        let neighbors = graph.neighbors(current);
        let Some(&next) = neighbors.get(*cursor) else {
            path.pop();
            cursors.pop();
            continue;
        };
        *cursor += 1;

        if path.len() == size {
            if next == start {
                return path.try_into().ok();
            }
            continue;
        }
        if next != start && accept(next) && !path.contains(&next) {
            path.push(next);
            cursors.push(0);
        }
    }
    None
}

fn carbon_neighbors<'a>(
    symbols: &'a [String],
    graph: &'a ConnectivityGraph,
    atom: usize,
) -> impl Iterator<Item = usize> + 'a {
    graph
        .neighbors(atom)
        .iter()
        .copied()
        .filter(move |&n| is_element(symbols, n, CARBON))
}

fn find_donor(
    symbols: &[String],
    graph: &ConnectivityGraph,
    ring: &[usize; RING_SIZE],
) -> Option<DonorGroup> {
    elements(symbols, NITROGEN).find_map(|nitrogen| {
        let (in_ring, outside): (Vec<usize>, Vec<usize>) =
            carbon_neighbors(symbols, graph, nitrogen).partition(|c| ring.contains(c));
        match (in_ring.as_slice(), outside.as_slice()) {
            (&[ring_atom], &[first, second]) => Some(DonorGroup {
                nitrogen,
                substituents: [first, second],
                ring_atom,
            }),
            _ => None,
        }
    })
}

fn find_acceptor(
    symbols: &[String],
    graph: &ConnectivityGraph,
    ring: &[usize; RING_SIZE],
    donor_nitrogen: usize,
) -> Option<AcceptorGroup> {
    elements(symbols, NITROGEN)
        .filter(|&nitrogen| nitrogen != donor_nitrogen)
        .find_map(|nitrogen| {
            let carbons: Vec<usize> = carbon_neighbors(symbols, graph, nitrogen).collect();
            let &[carbon] = carbons.as_slice() else {
                return None;
            };
            let ring_links: Vec<usize> = graph
                .neighbors(carbon)
                .iter()
                .copied()
                .filter(|&n| n != nitrogen && ring.contains(&n))
                .collect();
            match ring_links.as_slice() {
                &[ring_atom] => Some(AcceptorGroup {
                    nitrogen,
                    carbon,
                    ring_atom,
                }),
                _ => None,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_fixtures::{dmabn_frame, dmabn_mapping};
    use crate::core::topology::registry::BondThresholds;

    fn graph_of(frame: &crate::core::models::frame::TrajectoryFrame) -> ConnectivityGraph {
        ConnectivityGraph::build(frame, &BondThresholds::default()).unwrap()
    }

    fn strings(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn detects_dmabn_fragments() {
        let frame = dmabn_frame(0.0, 0.0);
        let mapping = detect_fragments(&frame.symbols, &graph_of(&frame)).unwrap();
        assert_eq!(mapping, dmabn_mapping());
    }

    #[test]
    fn detection_is_idempotent() {
        let frame = dmabn_frame(35.0, 0.0);
        let graph = graph_of(&frame);
        let first = detect_fragments(&frame.symbols, &graph).unwrap();
        let second = detect_fragments(&frame.symbols, &graph_of(&frame)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn detected_ring_is_a_closed_cycle_in_traversal_order() {
        let frame = dmabn_frame(60.0, 0.0);
        let graph = graph_of(&frame);
        let mapping = detect_fragments(&frame.symbols, &graph).unwrap();
        for k in 0..RING_SIZE {
            assert!(graph.are_bonded(mapping.ring[k], mapping.ring[(k + 1) % RING_SIZE]));
        }
    }

    #[test]
    fn ring_search_ignores_cycles_through_non_carbon_atoms() {
        // 0-1-2-3-4-5 closes only through the nitrogen at index 5.
        let symbols = strings(&["C", "C", "C", "C", "C", "N"]);
        let graph =
            ConnectivityGraph::from_bonds(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]);
        assert_eq!(find_carbon_ring(&symbols, &graph), None);
    }

    #[test]
    fn ring_search_rejects_five_and_seven_rings() {
        let symbols = strings(&["C"; 7]);
        let five = ConnectivityGraph::from_bonds(5, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        assert_eq!(find_carbon_ring(&symbols[..5], &five), None);

        let seven = ConnectivityGraph::from_bonds(
            7,
            [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 0)],
        );
        assert_eq!(find_carbon_ring(&symbols, &seven), None);
    }

    #[test]
    fn ring_search_finds_ring_behind_a_branch() {
        // Atom 0 is a substituent hanging off ring atom 1.
        let symbols = strings(&["C"; 7]);
        let graph = ConnectivityGraph::from_bonds(
            7,
            [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 1)],
        );
        assert_eq!(find_carbon_ring(&symbols, &graph), Some([1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn missing_ring_is_reported() {
        let mut frame = dmabn_frame(0.0, 0.0);
        frame.symbols[2] = "N".to_string();
        let result = detect_fragments(&frame.symbols, &graph_of(&frame));
        assert_eq!(result, Err(DetectionError::NoRing));
    }

    #[test]
    fn missing_donor_is_reported() {
        let mut frame = dmabn_frame(0.0, 0.0);
        let m = dmabn_mapping();
        // Move one substituent away so the nitrogen has only one alkyl carbon.
        frame.coords[m.donor_substituents[1]].z += 10.0;
        let result = detect_fragments(&frame.symbols, &graph_of(&frame));
        assert_eq!(result, Err(DetectionError::NoDonor));
    }

    #[test]
    fn missing_acceptor_is_reported() {
        let mut frame = dmabn_frame(0.0, 0.0);
        let m = dmabn_mapping();
        frame.coords[m.acceptor_nitrogen].x -= 10.0;
        let result = detect_fragments(&frame.symbols, &graph_of(&frame));
        assert_eq!(result, Err(DetectionError::NoAcceptor));
    }

    #[test]
    fn donor_nitrogen_is_never_reused_as_acceptor() {
        let symbols = strings(&["C", "C", "C", "C", "C", "C", "N", "C", "C"]);
        let graph = ConnectivityGraph::from_bonds(
            9,
            [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 6), (6, 7), (6, 8)],
        );
        let ring = find_carbon_ring(&symbols, &graph).unwrap();
        let donor = find_donor(&symbols, &graph, &ring).unwrap();
        assert_eq!(donor.nitrogen, 6);
        assert_eq!(find_acceptor(&symbols, &graph, &ring, donor.nitrogen), None);
    }
}
