#![cfg(test)]
//! Tests for parsing and printing the xyz notation.

use num_rational::Rational64;

use crate::errors::SymmetryError;
use crate::interfaces::TranslationRange;
use crate::operators::xyz_notation::{
    format_fraction, format_matrix, parse_linear_expression, parse_number, parse_xyz,
};

#[test]
fn test_parse_and_print_screw() {
    let op = parse_xyz("-x,1/2+y,1/2-z").unwrap();
    assert_eq!(op.xyz(), "-x,1/2+y,1/2-z");
    assert_eq!(op.rotation3()[(0, 0)], -1);
    assert_eq!(op.translation_twelfths(), Some(vec![0, 6, 6]));
}

#[test]
fn test_constant_position_and_case_are_irrelevant() {
    let a = parse_xyz("Y-X, -X, Z+2/3").unwrap();
    let b = parse_xyz("-x+y,-x,2/3+z").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.xyz(), "-x+y,-x,2/3+z");
}

#[test]
fn test_translation_is_reduced_on_parse() {
    let op = parse_xyz("x-1/2,y+3/2,z+1").unwrap();
    assert_eq!(op.xyz(), "1/2+x,1/2+y,z");
    assert_eq!(op.xyz_in(TranslationRange::Symmetric), "-1/2+x,-1/2+y,z");
}

#[test]
fn test_decimal_translations() {
    let op = parse_xyz("x+0.5,y+0.3333,z-0.25").unwrap();
    assert_eq!(op.xyz(), "1/2+x,1/3+y,3/4+z");
}

#[test]
fn test_coefficients() {
    let op = parse_xyz("x1+2x2,x2,x3,x4").unwrap();
    assert_eq!(op.rotation()[(0, 1)], 2);
    assert_eq!(op.xyz(), "x1+2x2,x2,x3,x4");
    assert!(parse_xyz("1/2x,y,z").is_err());
}

#[test]
fn test_non_normalizable_marker() {
    let op = parse_xyz("!x+1,y,z-3/2").unwrap();
    assert_eq!(op.xyz(), "!1+x,y,-3/2+z");
    let again = parse_xyz(op.xyz()).unwrap();
    assert_eq!(op, again);
}

#[test]
fn test_magnetic_suffixes() {
    assert_eq!(parse_xyz("-x,-y,z,-m").unwrap().time_reversal(), -1);
    assert_eq!(parse_xyz("-x,-y,z,+1").unwrap().time_reversal(), 1);
    assert_eq!(parse_xyz("-x,-y,z").unwrap().time_reversal(), 0);
    assert_eq!(parse_xyz("x,y,z,m").unwrap().xyz(), "x,y,z,m");
}

#[test]
fn test_moment_clause() {
    // Inversion leaves an axial vector unchanged
    let plain = parse_xyz("-x,-y,-z(mx,my,mz)").unwrap();
    assert_eq!(plain.time_reversal(), 1);
    let primed = parse_xyz("-x,-y,-z(-mx,-my,-mz)").unwrap();
    assert_eq!(primed.time_reversal(), -1);
    // 2z: det = 1, moment follows R
    let two = parse_xyz("-x,-y,z(-mx,-my,mz)").unwrap();
    assert_eq!(two.time_reversal(), 1);
    assert!(parse_xyz("-x,-y,z(mx,-my,mz)").is_err());
}

#[test]
fn test_modulated_rows() {
    let op = parse_xyz("x1,-x2,x3+1/2,-x4").unwrap();
    assert_eq!(op.modulation_dimension(), 1);
    assert_eq!(op.dimension(), 4);
    assert_eq!(op.xyz(), "x1,-x2,1/2+x3,-x4");
}

#[test]
fn test_matrix_literal() {
    let op = parse_xyz("[[-1,0,0,0],[0,1,0,1/2],[0,0,-1,0.5],[0,0,0,1]]").unwrap();
    assert_eq!(op.xyz(), "-x,1/2+y,1/2-z");
    let spaced = parse_xyz("[[0 -1 0 0] [1 0 0 0] [0 0 1 1/4]]").unwrap();
    assert_eq!(spaced.xyz(), "-y,x,1/4+z");
    assert_eq!(
        format_matrix(&op),
        "[[-1,0,0,0],[0,1,0,1/2],[0,0,-1,1/2],[0,0,0,1]]"
    );
    assert!(parse_xyz("[[1,0,0],[0,1,0]]").is_err());
}

#[test]
fn test_matrix_literal_with_magnetic_suffix() {
    let primed = parse_xyz("[[1,0,0,1/2],[0,1,0,0],[0,0,1,0]],m").unwrap();
    assert_eq!(primed.time_reversal(), 1);
    assert_eq!(primed.translation()[0], Rational64::new(1, 2));
    assert_eq!(primed.xyz(), "1/2+x,y,z,m");

    let unprimed = parse_xyz("[[1,0,0,1/2],[0,1,0,0],[0,0,1,0]], -m").unwrap();
    assert_eq!(unprimed.time_reversal(), -1);

    let two = parse_xyz("[[-1,0,0,0],[0,-1,0,0],[0,0,1,0]](-mx,-my,mz)").unwrap();
    assert_eq!(two.time_reversal(), 1);
    assert!(parse_xyz("[[-1,0,0,0],[0,-1,0,0],[0,0,1,0]](mx,my,mz)").is_err());
    assert!(parse_xyz("[[1,0,0,0],[0,1,0,0],[0,0,1,0]],q").is_err());
}

#[test]
fn test_oversized_numbers_are_parse_errors() {
    for text in [
        "x+1/4000000007+1/4000000009,y,z",
        "4294967297x,y,z",
        "x,y,z+9223372036854775807",
        "x,y,z+1/9223372036854775807-1/9223372036854775806",
        "[[4294967297,0,0,0],[0,1,0,0],[0,0,1,0]]",
    ] {
        assert!(
            matches!(parse_xyz(text), Err(SymmetryError::Parse { .. })),
            "{}",
            text
        );
    }
    // Ordinary crystallographic fractions stay well inside the limit
    assert_eq!(parse_xyz("x+1/6,y-5/12,z+0.125").unwrap().xyz(), "1/6+x,7/12+y,1/8+z");
}

#[test]
fn test_parse_errors() {
    assert!(parse_xyz("").is_err());
    assert!(parse_xyz("x,y").is_err());
    assert!(parse_xyz("x,y,q").is_err());
    assert!(parse_xyz("x,y,1/2").is_err());
    assert!(parse_xyz("x,y,z+1/0").is_err());
    assert!(parse_xyz("-x,-y,-z(mx,my").is_err());
}

#[test]
fn test_round_trip_of_printed_operators() {
    for text in ["x,y,z", "-y,x-y,1/3+z", "1/4+y,3/4+x,1/4-z", "-x+y,y,1/2-z", "z,x,y"] {
        let op = parse_xyz(text).unwrap();
        let again = parse_xyz(op.xyz()).unwrap();
        assert_eq!(op, again, "round trip failed for {}", text);
    }
}

#[test]
fn test_linear_expression_with_rational_coefficients() {
    let (c, k) = parse_linear_expression("2/3a+1/3b-c+1/2", &["a", "b", "c"]).unwrap();
    assert_eq!(c, vec![Rational64::new(2, 3), Rational64::new(1, 3), Rational64::from_integer(-1)]);
    assert_eq!(k, Rational64::new(1, 2));
    assert!(parse_linear_expression("", &["a"]).is_err());
}

#[test]
fn test_numbers_and_fractions() {
    assert_eq!(parse_number("-2/3"), Some(Rational64::new(-2, 3)));
    assert_eq!(parse_number("0.75"), Some(Rational64::new(3, 4)));
    assert_eq!(parse_number("abc"), None);
    assert_eq!(format_fraction(Rational64::new(6, 12)), "1/2");
    assert_eq!(format_fraction(Rational64::new(-4, 2)), "-2");
}
