//! Synthetic DMABN geometries shared by unit tests.
//!
//! Planar reference geometry in the xy-plane: benzene ring centered at the origin with the
//! amino nitrogen on +x and the nitrile on -x. Atom order is ring C0..C5, N(amino), two
//! methyl carbons, nitrile C, nitrile N, then four ring hydrogens.

use crate::core::models::fragments::FragmentMapping;
use crate::core::models::frame::TrajectoryFrame;
use nalgebra::Point3;

pub const RING_RADIUS: f64 = 1.39;
const RING_N_BOND: f64 = 1.37;
const N_METHYL_BOND: f64 = 1.45;
const RING_NITRILE_BOND: f64 = 1.43;
const NITRILE_BOND: f64 = 1.16;
const RING_H_BOND: f64 = 1.08;

pub fn dmabn_mapping() -> FragmentMapping {
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

/// DMABN with the dimethylamino group rotated by `twist_degrees` about the ring–N bond.
pub fn dmabn_frame(twist_degrees: f64, time_fs: f64) -> TrajectoryFrame {
    let mut symbols = vec!["C"; 6];
    symbols.extend(["N", "C", "C", "C", "N", "H", "H", "H", "H"]);

    let ring_atom = |k: usize| {
        let angle = (60.0 * k as f64).to_radians();
        Point3::new(RING_RADIUS * angle.cos(), RING_RADIUS * angle.sin(), 0.0)
    };
    let mut coords: Vec<Point3<f64>> = (0..6).map(ring_atom).collect();

    let n_x = RING_RADIUS + RING_N_BOND;
    coords.push(Point3::new(n_x, 0.0, 0.0));

    let twist = twist_degrees.to_radians();
    let along = N_METHYL_BOND * 60f64.to_radians().cos();
    let across = N_METHYL_BOND * 60f64.to_radians().sin();
    for sign in [1.0, -1.0] {
        coords.push(Point3::new(
            n_x + along,
            sign * across * twist.cos(),
            sign * across * twist.sin(),
        ));
    }

    let c_x = -(RING_RADIUS + RING_NITRILE_BOND);
    coords.push(Point3::new(c_x, 0.0, 0.0));
    coords.push(Point3::new(c_x - NITRILE_BOND, 0.0, 0.0));

    for k in [1, 2, 4, 5] {
        let direction = ring_atom(k).coords.normalize();
        coords.push(ring_atom(k) + direction * RING_H_BOND);
    }

    TrajectoryFrame::new(
        symbols.into_iter().map(str::to_string).collect(),
        coords,
        time_fs,
    )
}

/// A short planar trajectory sampled every 0.5 fs.
pub fn planar_trajectory(frames: usize) -> Vec<TrajectoryFrame> {
    (0..frames)
        .map(|i| dmabn_frame(0.0, i as f64 * 0.5))
        .collect()
}

pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}
