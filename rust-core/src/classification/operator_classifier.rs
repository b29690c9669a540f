use log::trace;
use nalgebra::{Matrix3, Vector3};

use crate::classification::classified_operator::{
    ClassifiedOperator, GlideType, RotationSense, SymmetryKind,
};
use crate::config::{CLASSIFY_TOLERANCE, MAX_INTRINSIC_LENGTH};
use crate::operators::SymmetryOperator;

/// Classify the 3D part of an operator into its geometric symmetry element.
///
/// Works directly in fractional coordinates: the rotation type comes from the
/// determinant and trace of the integer rotation, the intrinsic translation from
/// the orbit of the origin, and the location from orbit centroids. No
/// eigen-decomposition is needed because every quantity is an average over a
/// finite cyclic group.
///
/// # Errors
/// `NumericDegenerate` when the rotation is not an orthogonal operation of a
/// lattice (|det| ≠ 1, or R^n ≠ 1 for the order implied by the trace).
pub fn classify(op: &SymmetryOperator) -> crate::Result<ClassifiedOperator> {
    let r_int = op.rotation3();
    let r = r_int.map(|x| x as f64);
    let t = snap(op.translation3());

    let det = r.determinant();
    if !det.is_finite() || (det.abs() - 1.0).abs() > CLASSIFY_TOLERANCE {
        return Err(op.degenerate("rotation determinant is not ±1"));
    }
    let det = det.round() as i32;
    let trace = r.trace().round() as i32;
    let proper = r_int * det;

    // trace 3 / -3 only belong to ±1 among finite-order integer matrices
    if trace.abs() == 3 && proper != Matrix3::identity() {
        return Err(op.degenerate("rotation has no finite order"));
    }

    if trace == 3 {
        if t.amax() < CLASSIFY_TOLERANCE {
            return Ok(simple(SymmetryKind::Identity, 1, t, None));
        }
        let irrelevant = is_lattice_vector(&t);
        let mut classified = simple(SymmetryKind::Translation, 1, t, None);
        classified.irrelevant = irrelevant;
        return Ok(classified);
    }
    if trace == -3 {
        return Ok(simple(SymmetryKind::Inversion, 2, Vector3::zeros(), Some(snap(t / 2.0))));
    }

    let mut order = det * trace + 3;
    if order == 5 {
        order = 6;
    }
    if !(2..=6).contains(&order) || !has_order(&proper, order as usize) {
        return Err(op.degenerate("rotation order is not 2, 3, 4 or 6"));
    }
    let n = order as usize;

    // Number of applications that brings the full operation back to a pure translation
    let operation_order = if det < 0 && n % 2 == 1 { 2 * n } else { n };

    let images = orbit(&r, &t, &Vector3::zeros(), operation_order);
    let intrinsic = snap((images[operation_order] - images[0]) / operation_order as f64);
    let location = snap(t - intrinsic);

    let p = proper.map(|x| x as f64);
    let axis = invariant_direction(&p, n).ok_or_else(|| op.degenerate("no invariant axis"))?;
    let sense = (n > 2).then(|| rotation_sense(&p, &axis));
    let has_glide = intrinsic.amax() > CLASSIFY_TOLERANCE;
    // Literal (expanded) operators only: the canonical set keeps its [0,1) representatives
    let too_long = !op.is_normalizable() && intrinsic.norm() > max_intrinsic_length(n);

    let classified = if det > 0 {
        let on_axis = orbit(&r, &location, &Vector3::zeros(), n);
        let fixed_point = snap(centroid(&on_axis[..n]));
        let (kind, irrelevant) = if has_glide {
            (SymmetryKind::Screw(n as u8), too_long)
        } else {
            (SymmetryKind::Rotation(n as u8), false)
        };
        ClassifiedOperator {
            kind,
            order: n as u8,
            axis: Some(axis),
            plane_indices: None,
            translation: intrinsic,
            location,
            fixed_point: Some(fixed_point),
            sense,
            irrelevant,
        }
    } else if n == 2 {
        let plane = plane_indices(&r).ok_or_else(|| op.degenerate("reflection has no plane"))?;
        let (kind, irrelevant) = if has_glide {
            (SymmetryKind::Glide(glide_type(&intrinsic)), too_long)
        } else {
            (SymmetryKind::Mirror, false)
        };
        ClassifiedOperator {
            kind,
            order: 2,
            axis: Some(axis),
            plane_indices: Some(plane),
            translation: intrinsic,
            location,
            fixed_point: Some(snap(location / 2.0)),
            sense: None,
            irrelevant,
        }
    } else {
        // The inversion point of a rotoinversion is the centroid of any orbit
        let points = orbit(&r, &t, &Vector3::zeros(), operation_order);
        ClassifiedOperator {
            kind: SymmetryKind::Rotoinversion(n as u8),
            order: n as u8,
            axis: Some(axis),
            plane_indices: None,
            translation: Vector3::zeros(),
            location,
            fixed_point: Some(snap(centroid(&points[..operation_order]))),
            sense,
            irrelevant: false,
        }
    };

    if !is_finite(&classified) {
        return Err(op.degenerate("non-finite geometry"));
    }
    trace!("{} -> {}", op.xyz(), classified.description());
    Ok(classified)
}

fn simple(
    kind: SymmetryKind,
    order: u8,
    translation: Vector3<f64>,
    fixed_point: Option<Vector3<f64>>,
) -> ClassifiedOperator {
    ClassifiedOperator {
        kind,
        order,
        axis: None,
        plane_indices: None,
        translation,
        location: Vector3::zeros(),
        fixed_point,
        sense: None,
        irrelevant: false,
    }
}

fn max_intrinsic_length(order: usize) -> f64 {
    MAX_INTRINSIC_LENGTH
        .iter()
        .find(|(n, _)| *n as usize == order)
        .map_or(0.5, |(_, length)| *length)
}

fn has_order(proper: &Matrix3<i32>, n: usize) -> bool {
    let mut power = Matrix3::<i32>::identity();
    for _ in 0..n {
        power = proper * power;
    }
    power == Matrix3::identity()
}

/// p_0 = start, p_{k+1} = R·p_k + t, returns `steps + 1` points
fn orbit(
    r: &Matrix3<f64>,
    t: &Vector3<f64>,
    start: &Vector3<f64>,
    steps: usize,
) -> Vec<Vector3<f64>> {
    let mut points = Vec::with_capacity(steps + 1);
    let mut current = *start;
    points.push(current);
    for _ in 0..steps {
        current = r * current + t;
        points.push(current);
    }
    points
}

fn centroid(points: &[Vector3<f64>]) -> Vector3<f64> {
    points.iter().sum::<Vector3<f64>>() / points.len() as f64
}

/// Direction fixed by the proper rotation P of order n.
///
/// Σ_k P^k v projects v onto the axis; the largest projection of the three
/// basis vectors is never zero.
fn invariant_direction(p: &Matrix3<f64>, n: usize) -> Option<Vector3<f64>> {
    let mut best: Option<Vector3<f64>> = None;
    for i in 0..3 {
        let mut image = Vector3::zeros();
        image[i] = 1.0;
        let mut sum = Vector3::zeros();
        for _ in 0..n {
            sum += image;
            image = p * image;
        }
        if best.map_or(true, |b| sum.norm() > b.norm()) {
            best = Some(sum);
        }
    }
    best.filter(|b| b.norm() > CLASSIFY_TOLERANCE).map(|b| integer_direction(&b))
}

/// Miller-type indices of the mirror plane of the reflection R.
///
/// The columns of (1 + R) span the plane; their cross product is the
/// coefficient vector of the plane equation in fractional coordinates.
fn plane_indices(r: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let span = Matrix3::identity() + r;
    let columns: Vec<Vector3<f64>> = (0..3).map(|j| span.column(j).into_owned()).collect();
    let mut best: Option<Vector3<f64>> = None;
    for i in 0..3 {
        for j in (i + 1)..3 {
            let normal = columns[i].cross(&columns[j]);
            if best.map_or(true, |b| normal.norm() > b.norm()) {
                best = Some(normal);
            }
        }
    }
    best.filter(|b| b.norm() > CLASSIFY_TOLERANCE).map(|b| integer_direction(&b))
}

/// Sign of det[u, P·u, axis] for the basis vector u farthest from the axis
fn rotation_sense(p: &Matrix3<f64>, axis: &Vector3<f64>) -> RotationSense {
    let mut best = 0.0_f64;
    for i in 0..3 {
        let mut u = Vector3::zeros();
        u[i] = 1.0;
        let value = Matrix3::from_columns(&[u, p * u, *axis]).determinant();
        if value.abs() > best.abs() {
            best = value;
        }
    }
    if best > 0.0 {
        RotationSense::CounterClockwise
    } else {
        RotationSense::Clockwise
    }
}

fn glide_type(w: &Vector3<f64>) -> GlideType {
    let nonzero: Vec<usize> = (0..3).filter(|&i| w[i].abs() > CLASSIFY_TOLERANCE).collect();
    let all_equal_to = |value: f64| {
        nonzero
            .iter()
            .all(|&i| (w[i].abs() - value).abs() < CLASSIFY_TOLERANCE)
    };
    match nonzero.as_slice() {
        [i] if all_equal_to(0.5) => match *i {
            0 => GlideType::A,
            1 => GlideType::B,
            _ => GlideType::C,
        },
        [_, _, ..] if all_equal_to(0.5) => GlideType::N,
        [_, _, ..] if all_equal_to(0.25) => GlideType::D,
        _ => GlideType::G,
    }
}

/// Scale to the smallest integer triple when one exists, first nonzero component positive
fn integer_direction(v: &Vector3<f64>) -> Vector3<f64> {
    let scale = v.amax();
    let unit = v / scale;
    let mut direction = (1..=12)
        .map(|m| unit * m as f64)
        .find(|candidate| (candidate - candidate.map(|x| x.round())).amax() < 1e-4)
        .map(|candidate| candidate.map(|x| x.round()))
        .unwrap_or(unit);
    if let Some(first) = direction.iter().find(|x| x.abs() > CLASSIFY_TOLERANCE) {
        if *first < 0.0 {
            direction = -direction;
        }
    }
    direction
}

fn is_lattice_vector(t: &Vector3<f64>) -> bool {
    (t - t.map(|x| x.round())).amax() < CLASSIFY_TOLERANCE
}

/// Zero out components that are numerically zero
fn snap(v: Vector3<f64>) -> Vector3<f64> {
    v.map(|x| if x.abs() < CLASSIFY_TOLERANCE { 0.0 } else { x })
}

fn is_finite(c: &ClassifiedOperator) -> bool {
    let finite = |v: &Vector3<f64>| v.iter().all(|x| x.is_finite());
    finite(&c.translation)
        && finite(&c.location)
        && c.axis.as_ref().map_or(true, finite)
        && c.fixed_point.as_ref().map_or(true, finite)
        && c.plane_indices.as_ref().map_or(true, finite)
}
