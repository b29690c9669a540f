#![cfg(test)]

use nalgebra::{Matrix3, Vector3};
use num_rational::Rational64;

use crate::errors::SymmetryError;
use crate::operators::parse_xyz;
use crate::settings::BasisChange;

fn r(n: i64, d: i64) -> Rational64 {
    Rational64::new(n, d)
}

#[test]
fn test_parse_and_display() {
    let basis = BasisChange::parse("a-b,a+b,c").unwrap();
    assert_eq!(basis.matrix()[(0, 0)], r(1, 1));
    assert_eq!(basis.matrix()[(1, 0)], r(-1, 1));
    assert_eq!(basis.matrix()[(0, 1)], r(1, 1));
    assert_eq!(basis.matrix()[(1, 1)], r(1, 1));
    assert_eq!(basis.to_string(), "a-b,a+b,c");
    assert_eq!(basis.determinant(), r(2, 1));

    let shifted: BasisChange = "a, b, c; 1/2, 0, 1/4".parse().unwrap();
    assert_eq!(*shifted.origin_shift(), Vector3::new(r(1, 2), r(0, 1), r(1, 4)));
    assert_eq!(shifted.to_string(), "a,b,c;1/2,0,1/4");

    let fractional = BasisChange::parse("1/2b+1/2c,1/2a+1/2c,1/2a+1/2b").unwrap();
    assert_eq!(fractional.to_string(), "1/2b+1/2c,1/2a+1/2c,1/2a+1/2b");
    assert_eq!(fractional.determinant(), r(1, 4));
}

#[test]
fn test_parse_failures() {
    for text in ["a,a,c", "a,b", "a+1/2,b,c", "a,b,q", "a,b,c;1/2,0"] {
        assert!(
            matches!(BasisChange::parse(text), Err(SymmetryError::Parse { .. })),
            "{}",
            text
        );
    }
    let singular = Matrix3::new(1, 0, 0, 0, 1, 0, 1, 1, 0);
    assert!(BasisChange::from_integer_matrix(singular).is_err());
}

#[test]
fn test_oversized_coefficients_are_parse_errors() {
    for text in [
        "4000000007a,4000000009b,4000000011c",
        "a,b,c;1/4000000007,0,0",
        "9223372036854775807a,b,c",
    ] {
        assert!(
            matches!(BasisChange::parse(text), Err(SymmetryError::Parse { .. })),
            "{}",
            text
        );
    }
    let large = BasisChange::parse("1000a,1000b,1000c").unwrap();
    assert_eq!(large.determinant(), r(1_000_000_000, 1));
    assert_eq!(large.inverse_matrix()[(0, 0)], r(1, 1000));
}

#[test]
fn test_identity() {
    assert!(BasisChange::identity().is_identity());
    assert!(BasisChange::parse("a,b,c").unwrap().is_identity());
    assert!(!BasisChange::parse("a,b,c;0,0,1/2").unwrap().is_identity());
    assert_eq!(BasisChange::default(), BasisChange::identity());
}

#[test]
fn test_inverse_and_composition() {
    let basis = BasisChange::parse("a-b,a+b,c;1/2,0,0").unwrap();
    let inverse = basis.inverse();
    assert_eq!(inverse.determinant(), r(1, 2));
    assert!(basis.then(&inverse).is_identity());
    assert!(inverse.then(&basis).is_identity());

    let cyclic = BasisChange::parse("c,a,b").unwrap();
    let twice = cyclic.then(&cyclic);
    assert_eq!(twice, BasisChange::parse("b,c,a").unwrap());
    assert!(twice.then(&cyclic).is_identity());
}

#[test]
fn test_transform_operator_permutation() {
    // The old c axis becomes the new b axis
    let basis = BasisChange::parse("b,c,a").unwrap();
    let op = parse_xyz("-x,-y,z+1/2").unwrap();
    let transformed = basis.transform_operator(&op).unwrap().finalized();
    assert_eq!(transformed, parse_xyz("-x,y+1/2,-z").unwrap().finalized());
}

#[test]
fn test_transform_operator_origin_shift() {
    let basis = BasisChange::origin_shift_only(Vector3::new(r(1, 4), r(1, 4), r(1, 4)));
    let inversion = parse_xyz("-x,-y,-z").unwrap();
    let transformed = basis.transform_operator(&inversion).unwrap().finalized();
    assert_eq!(transformed.xyz(), "1/2-x,1/2-y,1/2-z");

    // Pure rotations about an axis through the shift are unchanged
    let identity = parse_xyz("x,y,z").unwrap();
    assert!(basis.transform_operator(&identity).unwrap().finalized().is_identity());
}

#[test]
fn test_transform_operator_incompatible() {
    let basis = BasisChange::parse("2a,b,c").unwrap();
    let fourfold = parse_xyz("-y,x,z").unwrap();
    assert!(matches!(
        basis.transform_operator(&fourfold),
        Err(SymmetryError::IncompatibleBasis { .. })
    ));
    let twofold = parse_xyz("-x,-y,z").unwrap();
    assert!(basis.transform_operator(&twofold).is_ok());
}

#[test]
fn test_transform_keeps_flags() {
    let basis = BasisChange::parse("b,c,a").unwrap();
    let magnetic = parse_xyz("-x,-y,z,-m").unwrap();
    assert_eq!(basis.transform_operator(&magnetic).unwrap().time_reversal(), -1);

    let literal = parse_xyz("!x+2,y,z").unwrap();
    let transformed = basis.transform_operator(&literal).unwrap();
    assert!(!transformed.is_normalizable());
    assert_eq!(transformed.translation()[2], r(2, 1));
}

#[test]
fn test_transform_modulated_operator() {
    let basis = BasisChange::parse("b,c,a").unwrap();
    let op = parse_xyz("-x1,-x2,x3,x4+1/2").unwrap();
    let transformed = basis.transform_operator(&op).unwrap();
    assert_eq!(transformed.dimension(), 4);
    assert_eq!(transformed.rotation()[(3, 3)], 1);
    assert_eq!(transformed.translation()[3], r(1, 2));
}

#[test]
fn test_points_and_vectors() {
    let basis = BasisChange::parse("a-b,a+b,c;1/4,0,0").unwrap();
    let point = Vector3::new(r(1, 4), r(0, 1), r(0, 1));
    assert_eq!(basis.transform_point(&point), Vector3::new(r(0, 1), r(0, 1), r(0, 1)));

    let vector = Vector3::new(r(1, 1), r(0, 1), r(0, 1));
    assert_eq!(basis.transform_vector(&vector), Vector3::new(r(1, 2), r(1, 2), r(0, 1)));
}
