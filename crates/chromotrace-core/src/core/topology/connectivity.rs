use super::detector::DetectionError;
use super::registry::BondThresholds;
use crate::core::models::frame::TrajectoryFrame;
use itertools::Itertools;
use tracing::debug;

/// Smallest molecule that can hold the donor–π–acceptor pattern: six ring atoms, the donor
/// nitrogen with two substituents, and the two nitrile atoms.
pub const MIN_ATOMS_FOR_TOPOLOGY: usize = 11;

/// Undirected bond graph inferred from interatomic distances.
///
/// Neighbor lists are kept sorted by atom index so every traversal over the graph visits
/// atoms in the same order, which makes fragment detection deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityGraph {
    adjacency: Vec<Vec<usize>>,
}

impl ConnectivityGraph {
    /// Builds the bond graph of one frame.
    ///
    /// Every atom pair is compared against the threshold for its element pair, so the cost
    /// is quadratic in the atom count. Only the reference frame is ever passed here.
    pub fn build(
        frame: &TrajectoryFrame,
        thresholds: &BondThresholds,
    ) -> Result<Self, DetectionError> {
        if !frame.is_consistent() {
            return Err(DetectionError::InconsistentFrame {
                symbols: frame.symbols.len(),
                coords: frame.coords.len(),
            });
        }
        let atom_count = frame.atom_count();
        if atom_count < MIN_ATOMS_FOR_TOPOLOGY {
            return Err(DetectionError::TooFewAtoms {
                found: atom_count,
                required: MIN_ATOMS_FOR_TOPOLOGY,
            });
        }

        let bonds = (0..atom_count).tuple_combinations().filter(|&(i, j)| {
            let distance = (frame.coords[i] - frame.coords[j]).norm();
            thresholds.is_bonded(&frame.symbols[i], &frame.symbols[j], distance)
        });
        let graph = Self::from_bonds(atom_count, bonds);

        debug!(
            atoms = atom_count,
            bonds = graph.bond_count(),
            "Built connectivity graph."
        );
        Ok(graph)
    }

    /// Builds a graph from an explicit bond list. Out-of-range and self bonds are ignored.
    pub fn from_bonds(atom_count: usize, bonds: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut adjacency = vec![Vec::new(); atom_count];
        for (i, j) in bonds {
            if i == j || i >= atom_count || j >= atom_count {
                continue;
            }
            adjacency[i].push(j);
            adjacency[j].push(i);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }
        Self { adjacency }
    }

    pub fn atom_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Bonded partners of `atom`, in ascending index order.
    pub fn neighbors(&self, atom: usize) -> &[usize] {
        self.adjacency.get(atom).map_or(&[], Vec::as_slice)
    }

    pub fn degree(&self, atom: usize) -> usize {
        self.neighbors(atom).len()
    }

    pub fn are_bonded(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    pub fn bond_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Every bond once, as `(lower, higher)` index pairs.
    pub fn bonds(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |&&j| j > i)
                    .map(move |&j| (i, j))
            })
    }
}
