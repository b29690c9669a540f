#![cfg(test)]

use nalgebra::{Matrix3, Vector3};

use crate::classification::{classify, GlideType, RotationSense, SymmetryKind};
use crate::errors::SymmetryError;
use crate::operators::{parse_xyz, SymmetryOperator};

fn classified(xyz: &str) -> crate::classification::ClassifiedOperator {
    classify(&parse_xyz(xyz).unwrap()).unwrap()
}

fn assert_vec_eq(a: &Vector3<f64>, b: [f64; 3]) {
    for i in 0..3 {
        assert!((a[i] - b[i]).abs() < 1e-9, "{:?} != {:?}", a, b);
    }
}

#[test]
fn test_identity_and_translation() {
    let c = classified("x,y,z");
    assert_eq!(c.kind, SymmetryKind::Identity);
    assert_eq!(c.order, 1);
    assert!(!c.irrelevant);

    let c = classified("x+1/2,y+1/2,z");
    assert_eq!(c.kind, SymmetryKind::Translation);
    assert_vec_eq(&c.translation, [0.5, 0.5, 0.0]);
    assert!(!c.irrelevant);

    let lattice = parse_xyz("!x+1,y,z").unwrap();
    let c = classify(&lattice).unwrap();
    assert_eq!(c.kind, SymmetryKind::Translation);
    assert!(c.irrelevant);
}

#[test]
fn test_inversion_at_origin() {
    let c = classified("-x,-y,-z");
    assert_eq!(c.kind, SymmetryKind::Inversion);
    assert_eq!(c.order, 2);
    assert_vec_eq(&c.fixed_point.unwrap(), [0.0, 0.0, 0.0]);

    let c = classified("-x+1/2,-y,-z+1/2");
    assert_eq!(c.kind, SymmetryKind::Inversion);
    assert_vec_eq(&c.fixed_point.unwrap(), [0.25, 0.0, 0.25]);
}

#[test]
fn test_two_fold_screw_along_b() {
    let c = classified("-x,1/2+y,1/2-z");
    assert_eq!(c.kind, SymmetryKind::Screw(2));
    assert_eq!(c.order, 2);
    assert_eq!(c.axis_indices(), Some([0, 1, 0]));
    assert_vec_eq(&c.translation, [0.0, 0.5, 0.0]);
    let p = c.fixed_point.unwrap();
    assert!(p.x.abs() < 1e-9);
    assert!((p.z - 0.25).abs() < 1e-9);
    assert_eq!(c.screw_index(), Some(1));
    assert!(c.sense.is_none());
    assert!(!c.irrelevant);
}

#[test]
fn test_rotations_and_sense() {
    let c = classified("-y,x,z");
    assert_eq!(c.kind, SymmetryKind::Rotation(4));
    assert_eq!(c.axis_indices(), Some([0, 0, 1]));
    assert_eq!(c.sense, Some(RotationSense::CounterClockwise));

    let c = classified("y,-x,z");
    assert_eq!(c.kind, SymmetryKind::Rotation(4));
    assert_eq!(c.sense, Some(RotationSense::Clockwise));

    let c = classified("z,x,y");
    assert_eq!(c.kind, SymmetryKind::Rotation(3));
    assert_eq!(c.axis_indices(), Some([1, 1, 1]));

    let c = classified("x-y,x,z");
    assert_eq!(c.kind, SymmetryKind::Rotation(6));

    let c = classified("-x+1/2,-y,z");
    assert_eq!(c.kind, SymmetryKind::Rotation(2));
    assert_vec_eq(&c.fixed_point.unwrap(), [0.25, 0.0, 0.0]);
}

#[test]
fn test_screw_indices() {
    let c = classified("-y,x-y,z+1/3");
    assert_eq!(c.kind, SymmetryKind::Screw(3));
    assert_eq!(c.screw_index(), Some(1));

    let c = classified("-y,x-y,z+2/3");
    assert_eq!(c.screw_index(), Some(2));

    let c = classified("-y,x,z+1/4");
    assert_eq!(c.kind, SymmetryKind::Screw(4));
    assert_eq!(c.screw_index(), Some(1));

    let c = classified("x-y,x,z+1/6");
    assert_eq!(c.kind, SymmetryKind::Screw(6));
    assert_eq!(c.screw_index(), Some(1));
}

#[test]
fn test_mirror_and_glides() {
    let c = classified("x,y,-z");
    assert_eq!(c.kind, SymmetryKind::Mirror);
    assert_eq!(c.axis_indices(), Some([0, 0, 1]));
    assert_vec_eq(&c.plane_indices.unwrap(), [0.0, 0.0, 1.0]);

    let c = classified("x,y,-z+1/2");
    assert_eq!(c.kind, SymmetryKind::Mirror);
    assert_vec_eq(&c.fixed_point.unwrap(), [0.0, 0.0, 0.25]);

    let c = classified("x,-y,z+1/2");
    assert_eq!(c.kind, SymmetryKind::Glide(GlideType::C));

    let c = classified("x+1/2,y+1/2,-z");
    assert_eq!(c.kind, SymmetryKind::Glide(GlideType::N));

    let c = classified("x+1/4,y+1/4,-z");
    assert_eq!(c.kind, SymmetryKind::Glide(GlideType::D));

    let c = classified("-x,y+1/2,z");
    assert_eq!(c.kind, SymmetryKind::Glide(GlideType::B));

    let c = classified("y,x,z+1/2");
    assert_eq!(c.kind, SymmetryKind::Glide(GlideType::C));
    assert_eq!(c.axis_indices(), Some([1, -1, 0]));
}

#[test]
fn test_rotoinversions() {
    let c = classified("y,-x,-z");
    assert_eq!(c.kind, SymmetryKind::Rotoinversion(4));
    assert_vec_eq(&c.fixed_point.unwrap(), [0.0, 0.0, 0.0]);

    let c = classified("-z,-x,-y");
    assert_eq!(c.kind, SymmetryKind::Rotoinversion(3));
    assert_eq!(c.axis_indices(), Some([1, 1, 1]));

    let c = classified("-x+y,-x,-z");
    assert_eq!(c.kind, SymmetryKind::Rotoinversion(6));

    let c = classified("y+1/2,-x,-z");
    assert_eq!(c.kind, SymmetryKind::Rotoinversion(4));
    let op = parse_xyz("y+1/2,-x,-z").unwrap();
    let p = c.fixed_point.unwrap();
    assert!((op.apply(&p) - p).norm() < 1e-9);
}

#[test]
fn test_order_law() {
    // 2, 3, 4 and 6-fold proper and improper operations: order = det·trace + 3, 5 read as 6
    for xyz in ["-x,-y,z", "-y,x-y,z", "-y,x,z", "x-y,x,z", "x,y,-z", "y,-x+y,-z", "y,-x,-z", "-x+y,-x,-z"] {
        let op = parse_xyz(xyz).unwrap();
        let c = classify(&op).unwrap();
        let mut expected = op.determinant() * op.rotation3().trace() + 3;
        if expected == 5 {
            expected = 6;
        }
        assert_eq!(c.order as i32, expected, "{}", xyz);
        assert_eq!(c.kind.order(), c.order);

        // -3 only returns to the identity after six steps
        let steps = op.operation_order().unwrap();
        let odd_improper = op.determinant() < 0 && c.order % 2 == 1;
        assert_eq!(steps, usize::from(if odd_improper { 2 * c.order } else { c.order }), "{}", xyz);
        assert!(op.power(steps).has_identity_rotation(), "{}", xyz);
    }
}

#[test]
fn test_screw_powers_are_lattice_repeats() {
    let point = Vector3::new(0.1, 0.2, 0.3);
    for (xyz, repeat) in [
        ("-y,x-y,z+1/3", [0.0, 0.0, 1.0]),
        ("-y,x-y,z+2/3", [0.0, 0.0, 2.0]),
        ("-y,x,z+3/4", [0.0, 0.0, 3.0]),
        ("x-y,x,z+1/2", [0.0, 0.0, 3.0]),
        ("-x,y+1/2,-z+1/2", [0.0, 1.0, 0.0]),
        ("z+1/2,x+1/2,y", [1.0, 1.0, 1.0]),
    ] {
        let op = parse_xyz(xyz).unwrap();
        let n = classify(&op).unwrap().order;
        let image = (0..n).fold(point, |p, _| op.apply(&p));
        assert_vec_eq(&(image - point), repeat);
    }
}

#[test]
fn test_fixed_points_are_fixed() {
    for xyz in ["-y+1/2,x,z", "-x+1/2,y,-z+1/2", "-y,x-y,z", "z+1/2,x,y+1/2"] {
        let op = parse_xyz(xyz).unwrap();
        let c = classify(&op).unwrap();
        if matches!(c.kind, SymmetryKind::Rotation(_)) {
            let p = c.fixed_point.unwrap();
            assert!((op.apply(&p) - p).norm() < 1e-9, "{}", xyz);
        }
    }
}

#[test]
fn test_irrelevant_elements() {
    let screw = parse_xyz("!-x,-y,z+1").unwrap();
    let c = classify(&screw).unwrap();
    assert_eq!(c.kind, SymmetryKind::Screw(2));
    assert!(c.irrelevant);

    let glide = parse_xyz("!x,y+1,-z").unwrap();
    let c = classify(&glide).unwrap();
    assert!(matches!(c.kind, SymmetryKind::Glide(_)));
    assert!(c.irrelevant);
}

#[test]
fn test_relevance_is_bounded_per_order() {
    // 3-fold: 1/3 along c is a 3_1, 2/3 backwards is longer than any 3-fold screw
    assert!(!classified("!-y,x-y,z+1/3").irrelevant);
    assert!(classified("!-y,x-y,z-2/3").irrelevant);
    assert!(!classified("!-x+y,-x,z-1/3").irrelevant);
    assert!(classified("!-x+y,-x,z+2/3").irrelevant);

    // 2-fold: a face-diagonal 2_1 stays, a 3/4 repeat does not
    let diagonal = classified("!y+1/2,x+1/2,-z");
    assert_eq!(diagonal.kind, SymmetryKind::Screw(2));
    assert!(!diagonal.irrelevant);
    let long = classified("!-x,-y,z+3/4");
    assert_eq!(long.kind, SymmetryKind::Screw(2));
    assert!(long.irrelevant);
    assert_eq!(long.screw_index(), None);

    // Canonical [0,1) representatives are never flagged
    let canonical = classified("-x,-y,z+3/4");
    assert!(!canonical.irrelevant);
    assert_eq!(canonical.screw_index(), None);
    assert!(!classified("-y,x-y,z+2/3").irrelevant);
}

#[test]
fn test_classification_is_cached_and_idempotent() {
    let op = parse_xyz("-x,1/2+y,1/2-z").unwrap();
    let first = op.classify().unwrap().clone();
    let second = op.classify().unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(first, classify(&op).unwrap());
}

#[test]
fn test_degenerate_rotation() {
    let shear = SymmetryOperator::from_seitz(Matrix3::new(1, 1, 0, 0, 1, 0, 0, 0, 1), [0, 0, 0]);
    assert!(matches!(classify(&shear), Err(SymmetryError::NumericDegenerate { .. })));

    let doubled = SymmetryOperator::from_seitz(Matrix3::new(2, 0, 0, 0, 1, 0, 0, 0, 1), [0, 0, 0]);
    assert!(matches!(classify(&doubled), Err(SymmetryError::NumericDegenerate { .. })));
}

#[test]
fn test_unit_cell_intersection() {
    assert!(classified("-x,-y,-z").intersects_unit_cell());
    assert!(!classified("!-x+4,-y,-z").intersects_unit_cell());
    assert!(classified("-x,-y,z").intersects_unit_cell());
    assert!(!classified("!-x+4,-y,z").intersects_unit_cell());
    assert!(classified("x,y,-z+1").intersects_unit_cell());
    assert!(!classified("!x,y,-z+3").intersects_unit_cell());
}

#[test]
fn test_description() {
    let text = classified("-x,1/2+y,1/2-z").description();
    assert!(text.starts_with("2_1 screw axis along [0,1,0]"), "{}", text);
    assert!(text.contains("1/4"));
    assert_eq!(classified("x,y,z").description(), "identity");
    assert_eq!(classified("-x,-y,-z").to_string(), "inversion center at (0,0,0)");
}
