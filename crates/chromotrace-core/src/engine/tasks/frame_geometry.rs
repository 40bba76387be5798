use crate::core::models::fragments::{FragmentMapping, RING_SIZE};
use crate::core::models::geometry::GeometryParameters;
use crate::core::utils::geometry::{
    DEGENERACY_EPSILON, Plane, angle_between_planes, angle_to_plane, centroid, dihedral_angle,
    fold_to_right_angle, plane_normal_from_three,
};
use crate::engine::config::TwistMethod;
use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Why a single frame produced no parameters.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Atom {index} is missing (frame has {atom_count} atoms)")]
    MissingAtom { index: usize, atom_count: usize },
    #[error("Atom {index} has non-finite coordinates")]
    NonFiniteCoordinate { index: usize },
    #[error("Frame has {found} atoms, expected {expected}")]
    AtomCountMismatch { expected: usize, found: usize },
    #[error("Atom {atom} is '{found}' but '{expected}' in the reference frame")]
    SymbolMismatch {
        atom: usize,
        expected: String,
        found: String,
    },
    #[error("Ring atom {index} of the fragment mapping is not part of the ring")]
    NotInRing { index: usize },
    #[error("Ring atoms do not span a plane")]
    DegenerateRing,
    #[error("Atoms {a} and {b} occupy the same position")]
    CoincidentAtoms { a: usize, b: usize },
}

/// Fragment atom positions of one frame together with the fitted ring plane.
#[derive(Debug, Clone)]
pub struct FragmentGeometry {
    ring: [Point3<f64>; RING_SIZE],
    ring_plane: Plane,
    ring_donor_atom: Point3<f64>,
    ring_donor_neighbor: Point3<f64>,
    donor_nitrogen: Point3<f64>,
    substituents: [Point3<f64>; 2],
    acceptor_carbon: Point3<f64>,
    acceptor_nitrogen: Point3<f64>,
}

impl FragmentGeometry {
    pub fn resolve(
        mapping: &FragmentMapping,
        coords: &[Point3<f64>],
    ) -> Result<Self, GeometryError> {
        let at = |index: usize| -> Result<Point3<f64>, GeometryError> {
            let point = coords.get(index).ok_or(GeometryError::MissingAtom {
                index,
                atom_count: coords.len(),
            })?;
            if point.coords.iter().all(|c| c.is_finite()) {
                Ok(*point)
            } else {
                Err(GeometryError::NonFiniteCoordinate { index })
            }
        };

        let mut ring = [Point3::origin(); RING_SIZE];
        for (slot, &index) in ring.iter_mut().zip(mapping.ring.iter()) {
            *slot = at(index)?;
        }
        let neighbor_index =
            mapping
                .next_in_ring(mapping.ring_donor_atom)
                .ok_or(GeometryError::NotInRing {
                    index: mapping.ring_donor_atom,
                })?;
        let ring_plane = Plane::fit(&ring).ok_or(GeometryError::DegenerateRing)?;

        Ok(Self {
            ring,
            ring_plane,
            ring_donor_atom: at(mapping.ring_donor_atom)?,
            ring_donor_neighbor: at(neighbor_index)?,
            donor_nitrogen: at(mapping.donor_nitrogen)?,
            substituents: [
                at(mapping.donor_substituents[0])?,
                at(mapping.donor_substituents[1])?,
            ],
            acceptor_carbon: at(mapping.acceptor_carbon)?,
            acceptor_nitrogen: at(mapping.acceptor_nitrogen)?,
        })
    }

    pub fn ring_plane(&self) -> &Plane {
        &self.ring_plane
    }

    /// Vector from the first donor substituent to the second.
    pub fn substituent_vector(&self) -> Vector3<f64> {
        self.substituents[1] - self.substituents[0]
    }

    pub fn twist_angle(&self, method: TwistMethod) -> f64 {
        match method {
            TwistMethod::Default => {
                angle_to_plane(&self.substituent_vector(), &self.ring_plane.normal)
            }
            TwistMethod::Dihedral => fold_to_right_angle(dihedral_angle(
                &self.ring_donor_neighbor,
                &self.ring_donor_atom,
                &self.donor_nitrogen,
                &self.substituents[0],
            )),
            TwistMethod::PlaneToPlane => plane_normal_from_three(
                &self.ring_donor_atom,
                &self.donor_nitrogen,
                &self.substituents[0],
            )
            .map_or(0.0, |amino_normal| {
                angle_between_planes(&self.ring_plane.normal, &amino_normal)
            }),
        }
    }

    /// Worst-case distance of a ring atom from the fitted ring plane.
    pub fn ring_planarity(&self) -> f64 {
        self.ring_plane.max_deviation(&self.ring)
    }

    pub fn ring_acceptor_angle(&self) -> f64 {
        angle_to_plane(
            &(self.acceptor_nitrogen - self.acceptor_carbon),
            &self.ring_plane.normal,
        )
    }

    pub fn donor_acceptor_distance(&self) -> f64 {
        (self.donor_nitrogen - self.acceptor_carbon).norm()
    }

    /// Tilt of the donor nitrogen out of the plane of its three carbon neighbors, in degrees.
    pub fn donor_pyramidalization(&self) -> f64 {
        let neighbors = [
            self.ring_donor_atom,
            self.substituents[0],
            self.substituents[1],
        ];
        let (Some(normal), Some(center)) = (
            plane_normal_from_three(&neighbors[0], &neighbors[1], &neighbors[2]),
            centroid(&neighbors),
        ) else {
            return 0.0;
        };

        let offset = self.donor_nitrogen - center;
        let out_of_plane = offset.dot(normal.as_ref());
        let in_plane = (offset - normal.into_inner() * out_of_plane).norm();

        if in_plane > DEGENERACY_EPSILON {
            (out_of_plane.abs() / in_plane).atan().to_degrees()
        } else if out_of_plane.abs() > DEGENERACY_EPSILON {
            90.0
        } else {
            0.0
        }
    }
}

/// Computes all five order parameters of one frame.
pub fn compute_frame(
    mapping: &FragmentMapping,
    coords: &[Point3<f64>],
    method: TwistMethod,
) -> Result<GeometryParameters, GeometryError> {
    let geometry = FragmentGeometry::resolve(mapping, coords)?;

    let donor_acceptor_distance = geometry.donor_acceptor_distance();
    if donor_acceptor_distance < DEGENERACY_EPSILON {
        return Err(GeometryError::CoincidentAtoms {
            a: mapping.donor_nitrogen,
            b: mapping.acceptor_carbon,
        });
    }

    Ok(GeometryParameters {
        twist_angle: geometry.twist_angle(method),
        ring_planarity: geometry.ring_planarity(),
        ring_acceptor_angle: geometry.ring_acceptor_angle(),
        donor_acceptor_distance,
        donor_pyramidalization: geometry.donor_pyramidalization(),
    })
}
