use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::config::CLASSIFY_TOLERANCE;
use crate::operators::format_fraction;
use crate::operators::xyz_notation::rational_from_decimal;

/// Geometric type of a symmetry operation, with the rotation order where it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmetryKind {
    Identity,
    Translation,
    Rotation(u8),
    Screw(u8),
    Inversion,
    Rotoinversion(u8),
    Mirror,
    Glide(GlideType),
}

impl SymmetryKind {
    /// Rotation order n (1 for identity and translations, 2 for inversion and reflections)
    pub fn order(&self) -> u8 {
        match *self {
            SymmetryKind::Identity | SymmetryKind::Translation => 1,
            SymmetryKind::Rotation(n) | SymmetryKind::Screw(n) | SymmetryKind::Rotoinversion(n) => n,
            SymmetryKind::Inversion | SymmetryKind::Mirror | SymmetryKind::Glide(_) => 2,
        }
    }

    /// det(R) = +1
    pub fn is_proper(&self) -> bool {
        matches!(
            self,
            SymmetryKind::Identity
                | SymmetryKind::Translation
                | SymmetryKind::Rotation(_)
                | SymmetryKind::Screw(_)
        )
    }

    pub fn has_axis(&self) -> bool {
        matches!(
            self,
            SymmetryKind::Rotation(_) | SymmetryKind::Screw(_) | SymmetryKind::Rotoinversion(_)
        )
    }

    pub fn has_plane(&self) -> bool {
        matches!(self, SymmetryKind::Mirror | SymmetryKind::Glide(_))
    }
}

/// Glide plane sub-type, read off the intrinsic glide vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlideType {
    /// Half of a
    A,
    /// Half of b
    B,
    /// Half of c
    C,
    /// Diagonal: half of two or three lattice vectors
    N,
    /// Diamond: quarter of two or three lattice vectors
    D,
    /// Any other glide vector
    G,
}

impl GlideType {
    pub fn symbol(&self) -> char {
        match self {
            GlideType::A => 'a',
            GlideType::B => 'b',
            GlideType::C => 'c',
            GlideType::N => 'n',
            GlideType::D => 'd',
            GlideType::G => 'g',
        }
    }
}

/// Sense of rotation when looking down the axis towards its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationSense {
    Clockwise,
    CounterClockwise,
}

/// Read-only geometric description of one symmetry operation.
///
/// All vectors are in fractional (lattice) coordinates. Axis directions and
/// plane indices are snapped to the smallest integer triple when possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedOperator {
    pub kind: SymmetryKind,
    /// Rotation order (same as `kind.order()`)
    pub order: u8,
    /// Rotation axis, or the direction reversed by a reflection
    pub axis: Option<Vector3<f64>>,
    /// Miller-type indices (h k l) of a mirror or glide plane
    pub plane_indices: Option<Vector3<f64>>,
    /// Screw or glide vector; the full translation for pure translations
    pub translation: Vector3<f64>,
    /// Translation minus its intrinsic part
    pub location: Vector3<f64>,
    /// Point on the axis or plane, or the inversion center
    pub fixed_point: Option<Vector3<f64>>,
    pub sense: Option<RotationSense>,
    /// Element of an expanded set with no distinct meaning within one cell
    pub irrelevant: bool,
}

impl ClassifiedOperator {
    /// The k of an n_k screw axis, counted in the rotation sense.
    ///
    /// `None` unless n times the screw translation is a whole repeat along the axis.
    pub fn screw_index(&self) -> Option<u8> {
        let SymmetryKind::Screw(n) = self.kind else {
            return None;
        };
        let axis = self.axis?;
        let k = n as f64 * self.translation.dot(&axis) / axis.dot(&axis);
        if (k - k.round()).abs() > CLASSIFY_TOLERANCE {
            return None;
        }
        let k = k.round() as i64;
        let k = match self.sense {
            Some(RotationSense::Clockwise) => -k,
            _ => k,
        };
        Some(k.rem_euclid(n as i64) as u8)
    }

    /// Integer indices [u v w] of the axis, if it snapped to a lattice direction
    pub fn axis_indices(&self) -> Option<[i32; 3]> {
        self.axis.and_then(integer_triple)
    }

    /// Whether the symmetry element meets the closed unit cell [0,1]³
    pub fn intersects_unit_cell(&self) -> bool {
        let Some(point) = self.fixed_point else {
            return false;
        };
        match self.kind {
            SymmetryKind::Inversion | SymmetryKind::Rotoinversion(_) => point_in_cell(&point),
            SymmetryKind::Rotation(_) | SymmetryKind::Screw(_) => match self.axis {
                Some(axis) => line_meets_cell(&point, &axis),
                None => false,
            },
            SymmetryKind::Mirror | SymmetryKind::Glide(_) => match self.plane_indices {
                Some(h) => plane_meets_cell(&point, &h),
                None => false,
            },
            SymmetryKind::Identity | SymmetryKind::Translation => false,
        }
    }

    /// Human-readable description, e.g. "2-fold screw axis along [0,1,0] through (0,0,1/4), translation (0,1/2,0)"
    pub fn description(&self) -> String {
        let axis = self.axis.map(|a| bracket(&a)).unwrap_or_default();
        let point = self.fixed_point.map(|p| paren(&p)).unwrap_or_default();
        let sense = match self.sense {
            Some(RotationSense::CounterClockwise) => "+",
            Some(RotationSense::Clockwise) => "-",
            None => "",
        };
        match self.kind {
            SymmetryKind::Identity => "identity".to_string(),
            SymmetryKind::Translation => format!("translation {}", paren(&self.translation)),
            SymmetryKind::Rotation(n) => {
                format!("{}{}-fold rotation axis along {} through {}", n, sense, axis, point)
            }
            SymmetryKind::Screw(n) => format!(
                "{}{} screw axis along {} through {}, translation {}",
                n,
                self.screw_index().map(|k| format!("_{}", k)).unwrap_or_default(),
                axis,
                point,
                paren(&self.translation)
            ),
            SymmetryKind::Inversion => format!("inversion center at {}", point),
            SymmetryKind::Rotoinversion(n) => format!(
                "-{}{} rotoinversion axis along {}, inversion point {}",
                n, sense, axis, point
            ),
            SymmetryKind::Mirror => format!(
                "mirror plane {} through {}",
                self.plane_indices.map(|h| paren(&h)).unwrap_or_default(),
                point
            ),
            SymmetryKind::Glide(g) => format!(
                "{}-glide plane {} through {}, glide {}",
                g.symbol(),
                self.plane_indices.map(|h| paren(&h)).unwrap_or_default(),
                point,
                paren(&self.translation)
            ),
        }
    }
}

impl fmt::Display for ClassifiedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

// ========================= Small helpers =========================

fn integer_triple(v: Vector3<f64>) -> Option<[i32; 3]> {
    let rounded = v.map(|x| x.round());
    ((v - rounded).amax() < CLASSIFY_TOLERANCE)
        .then(|| [rounded.x as i32, rounded.y as i32, rounded.z as i32])
}

fn format_coordinate(x: f64) -> String {
    match rational_from_decimal(x) {
        Some(r) if (x - *r.numer() as f64 / *r.denom() as f64).abs() < CLASSIFY_TOLERANCE => {
            format_fraction(r)
        }
        _ => format!("{:.4}", x),
    }
}

fn paren(v: &Vector3<f64>) -> String {
    format!(
        "({},{},{})",
        format_coordinate(v.x),
        format_coordinate(v.y),
        format_coordinate(v.z)
    )
}

fn bracket(v: &Vector3<f64>) -> String {
    format!(
        "[{},{},{}]",
        format_coordinate(v.x),
        format_coordinate(v.y),
        format_coordinate(v.z)
    )
}

fn point_in_cell(p: &Vector3<f64>) -> bool {
    p.iter()
        .all(|&x| x >= -CLASSIFY_TOLERANCE && x <= 1.0 + CLASSIFY_TOLERANCE)
}

/// Slab test of the line p + s·a against [0,1]³
fn line_meets_cell(p: &Vector3<f64>, a: &Vector3<f64>) -> bool {
    let mut s_min = f64::NEG_INFINITY;
    let mut s_max = f64::INFINITY;
    for i in 0..3 {
        if a[i].abs() < CLASSIFY_TOLERANCE {
            if p[i] < -CLASSIFY_TOLERANCE || p[i] > 1.0 + CLASSIFY_TOLERANCE {
                return false;
            }
            continue;
        }
        let s0 = (-CLASSIFY_TOLERANCE - p[i]) / a[i];
        let s1 = (1.0 + CLASSIFY_TOLERANCE - p[i]) / a[i];
        s_min = s_min.max(s0.min(s1));
        s_max = s_max.min(s0.max(s1));
    }
    s_min <= s_max
}

/// The plane h·x = h·p meets the cell iff h·p lies between the corner extremes
fn plane_meets_cell(p: &Vector3<f64>, h: &Vector3<f64>) -> bool {
    let level = h.dot(p);
    let low: f64 = h.iter().map(|&c| c.min(0.0)).sum();
    let high: f64 = h.iter().map(|&c| c.max(0.0)).sum();
    level >= low - CLASSIFY_TOLERANCE && level <= high + CLASSIFY_TOLERANCE
}
