use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Number of atoms in the aromatic ring.
pub const RING_SIZE: usize = 6;

/// Fixed assignment of chemical roles to atom indices.
///
/// Computed once per trajectory (or supplied by the user) and reused, read-only, for every
/// frame. The ring is stored in traversal order, so consecutive entries are bonded and the
/// last entry is bonded to the first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentMapping {
    /// The six ring atoms in ring traversal order.
    pub ring: [usize; RING_SIZE],
    /// The dialkylamino nitrogen.
    pub donor_nitrogen: usize,
    /// The two alkyl carbons bonded to the donor nitrogen.
    pub donor_substituents: [usize; 2],
    /// The nitrile carbon.
    pub acceptor_carbon: usize,
    /// The terminal nitrile nitrogen.
    pub acceptor_nitrogen: usize,
    /// The ring atom bonded to the donor nitrogen.
    pub ring_donor_atom: usize,
    /// The ring atom bonded to the acceptor carbon.
    pub ring_acceptor_atom: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("Atom index {index} ({role}) is out of range for {atom_count} atoms")]
    IndexOutOfRange {
        role: &'static str,
        index: usize,
        atom_count: usize,
    },
    #[error("Atom index {index} is assigned to more than one role")]
    DuplicateIndex { index: usize },
    #[error("Ring atoms must share one element, found '{first}' and '{other}'")]
    MixedRingElements { first: String, other: String },
    #[error("The {role} atom {index} is not a member of the ring")]
    NotInRing { role: &'static str, index: usize },
    #[error("Ring atom {index} cannot carry both the donor and the acceptor")]
    SharedRingLink { index: usize },
}

impl FragmentMapping {
    /// Every mapped index paired with the role it plays.
    pub fn labeled_indices(&self) -> Vec<(&'static str, usize)> {
        let mut labeled: Vec<(&'static str, usize)> =
            self.ring.iter().map(|&i| ("ring", i)).collect();
        labeled.extend([
            ("donor_nitrogen", self.donor_nitrogen),
            ("donor_substituent", self.donor_substituents[0]),
            ("donor_substituent", self.donor_substituents[1]),
            ("acceptor_carbon", self.acceptor_carbon),
            ("acceptor_nitrogen", self.acceptor_nitrogen),
        ]);
        labeled
    }

    /// Smallest atom count a frame must have for every mapped index to be valid.
    pub fn required_atom_count(&self) -> usize {
        self.labeled_indices()
            .into_iter()
            .map(|(_, index)| index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Position of `atom` within the ring traversal, if it is a ring atom.
    pub fn ring_position(&self, atom: usize) -> Option<usize> {
        self.ring.iter().position(|&r| r == atom)
    }

    /// The ring atom that follows `atom` in traversal order.
    pub fn next_in_ring(&self, atom: usize) -> Option<usize> {
        self.ring_position(atom)
            .map(|position| self.ring[(position + 1) % RING_SIZE])
    }

    /// Checks a mapping against the atoms of a reference frame.
    ///
    /// The ring-donor and ring-acceptor atoms are ring members, so they are checked against
    /// each other rather than against the ring.
    pub fn validate(&self, symbols: &[String]) -> Result<(), MappingError> {
        let atom_count = symbols.len();
        let ring_links = [
            ("ring_donor_atom", self.ring_donor_atom),
            ("ring_acceptor_atom", self.ring_acceptor_atom),
        ];

        for (role, index) in self.labeled_indices().into_iter().chain(ring_links) {
            if index >= atom_count {
                return Err(MappingError::IndexOutOfRange {
                    role,
                    index,
                    atom_count,
                });
            }
        }

        let mut seen = HashSet::new();
        for (_, index) in self.labeled_indices() {
            if !seen.insert(index) {
                return Err(MappingError::DuplicateIndex { index });
            }
        }

        for (role, index) in ring_links {
            if self.ring_position(index).is_none() {
                return Err(MappingError::NotInRing { role, index });
            }
        }
        if self.ring_donor_atom == self.ring_acceptor_atom {
            return Err(MappingError::SharedRingLink {
                index: self.ring_donor_atom,
            });
        }

        let first = &symbols[self.ring[0]];
        if let Some(other) = self.ring[1..]
            .iter()
            .map(|&i| &symbols[i])
            .find(|s| *s != first)
        {
            return Err(MappingError::MixedRingElements {
                first: first.clone(),
                other: other.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> Vec<String> {
        ["C", "C", "C", "C", "C", "C", "N", "C", "C", "C", "N"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn mapping() -> FragmentMapping {
        FragmentMapping {
            ring: [0, 1, 2, 3, 4, 5],
            donor_nitrogen: 6,
            donor_substituents: [7, 8],
            acceptor_carbon: 9,
            acceptor_nitrogen: 10,
            ring_donor_atom: 0,
            ring_acceptor_atom: 3,
        }
    }

    #[test]
    fn valid_mapping_passes_validation() {
        assert_eq!(mapping().validate(&symbols()), Ok(()));
    }

    #[test]
    fn required_atom_count_is_one_past_highest_index() {
        assert_eq!(mapping().required_atom_count(), 11);
    }

    #[test]
    fn next_in_ring_wraps_around() {
        let m = mapping();
        assert_eq!(m.next_in_ring(0), Some(1));
        assert_eq!(m.next_in_ring(5), Some(0));
        assert_eq!(m.next_in_ring(6), None);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut m = mapping();
        m.acceptor_nitrogen = 42;
        assert!(matches!(
            m.validate(&symbols()),
            Err(MappingError::IndexOutOfRange {
                role: "acceptor_nitrogen",
                index: 42,
                atom_count: 11
            })
        ));
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let mut m = mapping();
        m.donor_substituents = [7, 7];
        assert_eq!(
            m.validate(&symbols()),
            Err(MappingError::DuplicateIndex { index: 7 })
        );
    }

    #[test]
    fn ring_link_outside_ring_is_rejected() {
        let mut m = mapping();
        m.ring_acceptor_atom = 9;
        assert_eq!(
            m.validate(&symbols()),
            Err(MappingError::NotInRing {
                role: "ring_acceptor_atom",
                index: 9
            })
        );
    }

    #[test]
    fn donor_and_acceptor_on_the_same_ring_atom_are_rejected() {
        let mut m = mapping();
        m.ring_acceptor_atom = 0;
        assert_eq!(
            m.validate(&symbols()),
            Err(MappingError::SharedRingLink { index: 0 })
        );
    }

    #[test]
    fn mixed_ring_elements_are_rejected() {
        let mut s = symbols();
        s[2] = "N".to_string();
        assert!(matches!(
            mapping().validate(&s),
            Err(MappingError::MixedRingElements { .. })
        ));
    }

    #[test]
    fn mapping_round_trips_through_toml() {
        let text = toml::to_string(&mapping()).unwrap();
        let parsed: FragmentMapping = toml::from_str(&text).unwrap();
        assert_eq!(parsed, mapping());
    }
}
