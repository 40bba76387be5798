use nalgebra::{Matrix3, Point3, Unit, Vector3};

/// Vectors and residuals shorter than this are treated as zero.
pub const DEGENERACY_EPSILON: f64 = 1e-6;

const SVD_MAX_ITERATIONS: usize = 1000;

/// A plane through `centroid` with unit normal `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub centroid: Point3<f64>,
    pub normal: Unit<Vector3<f64>>,
}

impl Plane {
    /// Least-squares plane through a set of points.
    ///
    /// With four or more points the normal is the singular vector of the centered scatter
    /// matrix with the smallest singular value. With exactly three points it is the cross
    /// product of two edge vectors. Returns `None` for fewer than three points, non-finite
    /// coordinates, or points that do not span a plane.
    pub fn fit(points: &[Point3<f64>]) -> Option<Self> {
        if points.len() < 3 || !points.iter().all(is_finite) {
            return None;
        }
        let centroid = centroid(points)?;

        let normal = if points.len() == 3 {
            plane_normal_from_three(&points[0], &points[1], &points[2])?
        } else {
            let scatter = points
                .iter()
                .map(|p| p - centroid)
                .fold(Matrix3::zeros(), |acc, d| acc + d * d.transpose());
            if scatter.norm() < DEGENERACY_EPSILON {
                return None;
            }
            let svd = scatter.try_svd(true, false, f64::EPSILON, SVD_MAX_ITERATIONS)?;
            let u = svd.u?;
            let (smallest, _) = svd
                .singular_values
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.total_cmp(b))?;
            Unit::try_new(u.column(smallest).into_owned(), DEGENERACY_EPSILON)?
        };

        Some(Self { centroid, normal })
    }

    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.centroid).dot(self.normal.as_ref())
    }

    /// Largest unsigned distance of any point from the plane.
    pub fn max_deviation(&self, points: &[Point3<f64>]) -> f64 {
        points
            .iter()
            .map(|p| self.signed_distance(p).abs())
            .fold(0.0, f64::max)
    }
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

fn is_finite(point: &Point3<f64>) -> bool {
    point.coords.iter().all(|c| c.is_finite())
}

/// Unit normal of the plane through three points, `None` if they are collinear.
pub fn plane_normal_from_three(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Option<Unit<Vector3<f64>>> {
    Unit::try_new((b - a).cross(&(c - a)), DEGENERACY_EPSILON)
}

/// Angle between a vector and a plane, in degrees within [0, 90].
///
/// Computed as 90° minus the angle between the vector and the plane normal, using the
/// absolute cosine clipped to [0, 1]. A zero-length vector lies "in" every plane and
/// yields 0°.
pub fn angle_to_plane(vector: &Vector3<f64>, normal: &Unit<Vector3<f64>>) -> f64 {
    let Some(direction) = Unit::try_new(*vector, DEGENERACY_EPSILON) else {
        return 0.0;
    };
    let cos_to_normal = direction.dot(normal.as_ref()).abs().clamp(0.0, 1.0);
    90.0 - cos_to_normal.acos().to_degrees()
}

/// Angle between two planes given their normals, in degrees within [0, 90].
pub fn angle_between_planes(n1: &Unit<Vector3<f64>>, n2: &Unit<Vector3<f64>>) -> f64 {
    n1.dot(n2.as_ref()).abs().clamp(0.0, 1.0).acos().to_degrees()
}

/// Dihedral angle p1-p2-p3-p4 in degrees within [-180, 180].
///
/// The sign follows the scalar triple product of the two plane normals with the central
/// bond. Returns 0° when either plane is undefined.
pub fn dihedral_angle(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
    p4: &Point3<f64>,
) -> f64 {
    let b1 = p2 - p1;
    let b2 = p3 - p2;
    let b3 = p4 - p3;

    let (Some(n1), Some(n2)) = (
        Unit::try_new(b1.cross(&b2), DEGENERACY_EPSILON),
        Unit::try_new(b2.cross(&b3), DEGENERACY_EPSILON),
    ) else {
        return 0.0;
    };

    let angle = n1.dot(n2.as_ref()).clamp(-1.0, 1.0).acos().to_degrees();
    if n1.cross(n2.as_ref()).dot(&b2) < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Folds an angle in degrees into [0, 90] by taking its magnitude and reflecting values
/// above 90° as `180° - value`.
pub fn fold_to_right_angle(angle_degrees: f64) -> f64 {
    let magnitude = angle_degrees.abs() % 360.0;
    let magnitude = if magnitude > 180.0 {
        360.0 - magnitude
    } else {
        magnitude
    };
    if magnitude > 90.0 {
        180.0 - magnitude
    } else {
        magnitude
    }
}
