use nalgebra::{Point3, Unit, Vector3};

const EPSILON: f64 = 1e-8;

/// Ideal coordination geometry of an atom, inferred from its coordination number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum AtomGeometry {
    Spherical,
    Terminal,
    Linear,
    Trigonal,
    Tetrahedral,
    #[default]
    Unknown,
}

impl AtomGeometry {
    /// Ideal angle between two substituents, in radians.
    pub fn ideal_angle(self) -> Option<f64> {
        match self {
            Self::Linear => Some(std::f64::consts::PI),
            Self::Trigonal => Some(120.0f64.to_radians()),
            Self::Tetrahedral => Some(TETRAHEDRAL_ANGLE_DEG.to_radians()),
            _ => None,
        }
    }
}

pub const TETRAHEDRAL_ANGLE_DEG: f64 = 109.4712;

pub fn assign_geometry(coordination: i32) -> AtomGeometry {
    match coordination {
        0 => AtomGeometry::Spherical,
        1 => AtomGeometry::Terminal,
        2 => AtomGeometry::Linear,
        3 => AtomGeometry::Trigonal,
        4 => AtomGeometry::Tetrahedral,
        _ => AtomGeometry::Unknown,
    }
}

pub fn centroid(points: impl IntoIterator<Item = Point3<f64>>) -> Option<Point3<f64>> {
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    (count > 0).then(|| Point3::from(sum / count as f64))
}

/// Angle between two vectors in radians; `None` if either has zero length.
pub fn angle_between(u: &Vector3<f64>, v: &Vector3<f64>) -> Option<f64> {
    let denom = u.norm() * v.norm();
    if denom < EPSILON {
        return None;
    }
    Some((u.dot(v) / denom).clamp(-1.0, 1.0).acos())
}

/// Plane normal through three points: `(p1 - p2) x (p1 - p3)`, normalised.
pub fn plane_normal(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    p3: &Point3<f64>,
) -> Option<Unit<Vector3<f64>>> {
    let d1 = p1 - p2;
    let d2 = p1 - p3;
    Unit::try_new(d1.cross(&d2), EPSILON)
}

/// Distance between `to` and the projection of `from` onto the plane through `to`
/// with the given normal.
pub fn in_plane_offset(from: &Point3<f64>, to: &Point3<f64>, normal: &Unit<Vector3<f64>>) -> f64 {
    let d = from - to;
    let projected = d - normal.as_ref() * d.dot(normal.as_ref());
    projected.norm()
}

/// Angles at `center` between every neighbour and `target`, skipping degenerate ones.
pub fn substituent_angles(
    center: &Point3<f64>,
    neighbors: &[Point3<f64>],
    target: &Point3<f64>,
) -> Vec<f64> {
    let to_target = target - center;
    neighbors
        .iter()
        .filter_map(|n| angle_between(&(n - center), &to_target))
        .collect()
}

/// Directions in which hydrogens not present in the input may point.
///
/// Built from the ideal geometry of the heavy atom and the positions of its
/// explicit neighbours. When the remaining substituent positions are fully
/// determined they are returned as fixed directions; a single-neighbour atom
/// leaves the hydrogens free to rotate around the bond axis, described as a cone.
#[derive(Debug, Clone, PartialEq)]
pub enum HydrogenLayout {
    /// No open substituent position.
    None,
    Fixed(Vec<Unit<Vector3<f64>>>),
    Cone {
        axis: Unit<Vector3<f64>>,
        half_angle: f64,
    },
    /// No neighbour to orient against (e.g. water without explicit hydrogens).
    Free,
}

impl HydrogenLayout {
    pub fn from_geometry(
        geometry: AtomGeometry,
        center: &Point3<f64>,
        neighbors: &[Point3<f64>],
    ) -> Self {
        let dirs: Option<Vec<Unit<Vector3<f64>>>> = neighbors
            .iter()
            .map(|n| Unit::try_new(n - center, EPSILON))
            .collect();
        let Some(dirs) = dirs else {
            return Self::Free;
        };

        match (geometry, dirs.as_slice()) {
            (AtomGeometry::Tetrahedral | AtomGeometry::Trigonal | AtomGeometry::Linear, []) => {
                Self::Free
            }
            (AtomGeometry::Spherical | AtomGeometry::Unknown, _) => Self::Free,
            (AtomGeometry::Tetrahedral, [a]) => Self::Cone {
                axis: -*a,
                half_angle: (180.0 - TETRAHEDRAL_ANGLE_DEG).to_radians(),
            },
            (AtomGeometry::Tetrahedral, [a, b]) => {
                let (Some(bisector), Some(perp)) = (
                    Unit::try_new(-(a.as_ref() + b.as_ref()), EPSILON),
                    Unit::try_new(a.cross(b.as_ref()), EPSILON),
                ) else {
                    return Self::Free;
                };
                let half = (TETRAHEDRAL_ANGLE_DEG / 2.0).to_radians();
                let along = bisector.as_ref() * half.cos();
                let across = perp.as_ref() * half.sin();
                Self::Fixed(vec![
                    Unit::new_normalize(along + across),
                    Unit::new_normalize(along - across),
                ])
            }
            (AtomGeometry::Tetrahedral, [a, b, c]) => {
                match Unit::try_new(-(a.as_ref() + b.as_ref() + c.as_ref()), EPSILON) {
                    Some(dir) => Self::Fixed(vec![dir]),
                    None => Self::Free,
                }
            }
            (AtomGeometry::Trigonal, [a]) => Self::Cone {
                axis: -*a,
                half_angle: 60.0f64.to_radians(),
            },
            (AtomGeometry::Trigonal, [a, b]) => {
                match Unit::try_new(-(a.as_ref() + b.as_ref()), EPSILON) {
                    Some(dir) => Self::Fixed(vec![dir]),
                    None => Self::Free,
                }
            }
            (AtomGeometry::Linear, [a]) => Self::Fixed(vec![-*a]),
            _ => Self::None,
        }
    }

    /// Smallest angle (radians) any hydrogen of this layout can make with `direction`.
    ///
    /// Returns `None` when there is no hydrogen or `direction` is degenerate.
    pub fn best_angle(&self, direction: &Vector3<f64>) -> Option<f64> {
        match self {
            Self::None => None,
            Self::Free => (direction.norm() > EPSILON).then_some(0.0),
            Self::Fixed(dirs) => dirs
                .iter()
                .filter_map(|d| angle_between(d.as_ref(), direction))
                .min_by(|a, b| a.total_cmp(b)),
            Self::Cone { axis, half_angle } => {
                angle_between(axis.as_ref(), direction).map(|phi| (phi - half_angle).abs())
            }
        }
    }
}
