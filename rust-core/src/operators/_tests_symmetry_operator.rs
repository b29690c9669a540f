#![cfg(test)]
//! Tests for the exact operator algebra.

use std::collections::HashSet;

use nalgebra::{DMatrix, Matrix3, Vector3};
use num_rational::Rational64;

use crate::interfaces::TranslationRange;
use crate::operators::symmetry_operator::SymmetryOperator;
use crate::operators::xyz_notation::parse_xyz;

const TOL: f64 = 1e-10;

fn op(text: &str) -> SymmetryOperator {
    parse_xyz(text).unwrap()
}

fn nearly_vec(a: Vector3<f64>, b: Vector3<f64>) -> bool {
    (a - b).norm() < TOL
}

#[test]
fn test_identity_properties() {
    let id = SymmetryOperator::identity();
    assert!(id.is_identity());
    assert_eq!(id.xyz(), "x,y,z");
    assert_eq!(id.determinant(), 1);
    assert_eq!(id.operation_order(), Some(1));
    assert_eq!(id.modulation_dimension(), 0);
}

#[test]
fn test_from_seitz_uses_twelfths() {
    let rotation = Matrix3::new(-1, 0, 0, 0, 1, 0, 0, 0, -1);
    let screw = SymmetryOperator::from_seitz(rotation, [0, 6, 6]);
    assert_eq!(screw.divisor(), 12);
    assert_eq!(screw.translation_twelfths(), Some(vec![0, 6, 6]));
    assert_eq!(screw.xyz(), "-x,1/2+y,1/2-z");
}

#[test]
fn test_explicit_fraction_divisor() {
    let rotation = DMatrix::<i32>::identity(3, 3);
    let t = [Rational64::new(1, 5), Rational64::new(1, 2), Rational64::new(0, 1)];
    let shifted = SymmetryOperator::new(rotation, &t).unwrap();
    assert_eq!(shifted.divisor(), 10);
    assert_eq!(shifted.translation_twelfths(), None);
    assert_eq!(shifted.translation(), t.to_vec());
}

#[test]
fn test_new_rejects_bad_shapes() {
    let rotation = DMatrix::<i32>::identity(3, 3);
    assert!(SymmetryOperator::new(rotation, &[Rational64::new(0, 1); 2]).is_err());
    let small = DMatrix::<i32>::identity(2, 2);
    assert!(SymmetryOperator::new(small, &[Rational64::new(0, 1); 2]).is_err());
}

#[test]
fn test_compose_two_fold_axes() {
    let two_z = op("-x,-y,z");
    let two_x = op("x,-y,-z");
    assert_eq!(two_z.compose(&two_x).xyz(), "-x,y,-z");
}

#[test]
fn test_compose_applies_right_operand_first() {
    let four = op("-y,x,z");
    let shift = op("x+1/2,y,z");
    // 4 · t(1/2,0,0): rotate the shifted point
    assert_eq!(four.compose(&shift).finalized().xyz(), "-y,1/2+x,z");
    // t(1/2,0,0) · 4
    assert_eq!(shift.compose(&four).finalized().xyz(), "1/2-y,x,z");
}

#[test]
fn test_inverse_of_screw() {
    let screw = op("-y,x,z+1/4");
    let inverse = screw.inverse().unwrap();
    assert_eq!(inverse.xyz(), "y,-x,-1/4+z");
    assert!(screw.compose(&inverse).is_identity());
}

#[test]
fn test_power_and_order() {
    let six = op("x-y,x,z+1/6");
    assert_eq!(six.operation_order(), Some(6));
    let full_turn = six.power(6);
    assert!(full_turn.has_identity_rotation());
    assert_eq!(full_turn.translation()[2], Rational64::from_integer(1));
    assert!(full_turn.finalized().is_identity());
}

#[test]
fn test_normalized_ranges() {
    let shifted = SymmetryOperator::from_seitz(Matrix3::identity(), [9, -3, 18]);
    let positive = shifted.normalized(TranslationRange::Positive);
    assert_eq!(positive.translation_twelfths(), Some(vec![9, 9, 6]));
    assert!(positive.is_finalized());
    let symmetric = shifted.normalized(TranslationRange::Symmetric);
    assert_eq!(symmetric.translation_twelfths(), Some(vec![-3, -3, -6]));
}

#[test]
fn test_non_normalizable_keeps_translation() {
    let literal = op("!x+1,y,z");
    assert!(!literal.is_normalizable());
    assert_eq!(literal.normalized(TranslationRange::Positive).translation_twelfths(), Some(vec![12, 0, 0]));
}

#[test]
fn test_apply_and_seitz_matrix() {
    let glide = op("x,-y,z+1/2");
    let p = Vector3::new(0.1, 0.2, 0.3);
    assert!(nearly_vec(glide.apply(&p), Vector3::new(0.1, -0.2, 0.8)));
    let m = glide.seitz_matrix();
    assert_eq!(m[(1, 1)], -1.0);
    assert_eq!(m[(2, 3)], 0.5);
    assert_eq!(m[(3, 3)], 1.0);
}

#[test]
fn test_equality_and_hash_follow_canonical_form() {
    let a = op("-x,-y,z+1/2");
    let b = op("-x,-y,z-1/2");
    let c = op("-x,-y,z");
    assert_eq!(a, b);
    let set: HashSet<SymmetryOperator> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_modulated_composition() {
    let a = op("x1,-x2,x3,-x4+1/2");
    assert_eq!(a.modulation_dimension(), 1);
    let square = a.compose(&a).finalized();
    assert!(square.is_identity());
    assert_eq!(a.augmented_matrix().nrows(), 5);
}

#[test]
fn test_time_reversal_composition() {
    let primed = op("-x,-y,z,-m");
    let plain = op("x,y,z");
    assert_eq!(primed.compose(&plain).time_reversal(), -1);
    assert_eq!(primed.compose(&primed).time_reversal(), 1);
}
