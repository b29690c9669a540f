#![cfg(test)]

use crate::errors::SymmetryError;
use crate::groups::LatticeSymbol;
use crate::hall::{interpret, AxisDesignator, HallSymbol};
use crate::operators::{parse_xyz, SymmetryOperator};

fn op(xyz: &str) -> SymmetryOperator {
    parse_xyz(xyz).unwrap()
}

#[test]
fn test_parse_p21c() {
    let symbol = HallSymbol::parse("-P 2ybc").unwrap();
    assert!(symbol.is_centric());
    assert_eq!(symbol.lattice(), LatticeSymbol::P);
    assert_eq!(symbol.tokens().len(), 1);

    let token = &symbol.tokens()[0];
    assert!(!token.improper);
    assert_eq!(token.order, 2);
    assert_eq!(token.screw, 0);
    assert_eq!(token.axis, Some(AxisDesignator::Y));
    assert_eq!(token.subscripts, vec!['b', 'c']);

    let generators = symbol.generators().unwrap();
    assert_eq!(generators, vec![op("-x,y+1/2,-z+1/2")]);
    assert_eq!(symbol.inversion(), Some(op("-x,-y,-z")));
}

#[test]
fn test_default_axes() {
    let symbol = HallSymbol::parse("P 4 2 3").unwrap();
    assert_eq!(
        symbol.resolved_axes().unwrap(),
        vec![AxisDesignator::Z, AxisDesignator::X, AxisDesignator::Star]
    );

    let symbol = HallSymbol::parse("P 6 2").unwrap();
    assert_eq!(
        symbol.resolved_axes().unwrap(),
        vec![AxisDesignator::Z, AxisDesignator::Prime]
    );
    assert_eq!(symbol.generators().unwrap()[1], op("-y,-x,-z"));

    let symbol = HallSymbol::parse("P 3 2\"").unwrap();
    assert_eq!(symbol.generators().unwrap()[1], op("y,x,-z"));
}

#[test]
fn test_rotation_table() {
    let cases = [
        ("P 2x", "x,-y,-z"),
        ("P 3z", "-y,x-y,z"),
        ("P 4y", "z,y,-x"),
        ("P 6x", "x,y-z,y"),
        ("P 3*", "z,x,y"),
        ("P -4", "y,-x,-z"),
        ("P 4x 2'", "x,-z,y"),
    ];
    for (hall, xyz) in cases {
        let generators = HallSymbol::parse(hall).unwrap().generators().unwrap();
        assert_eq!(generators[0], op(xyz), "{}", hall);
    }

    let diagonal = HallSymbol::parse("P 4x 2'").unwrap().generators().unwrap();
    assert_eq!(diagonal[1], op("-x,-z,-y"));
}

#[test]
fn test_screws_and_subscripts() {
    let generators = HallSymbol::parse("P 61").unwrap().generators().unwrap();
    assert_eq!(generators[0], op("x-y,x,z+1/6"));

    let generators = HallSymbol::parse("P 4bd").unwrap().generators().unwrap();
    assert_eq!(generators[0], op("-y+1/4,x+3/4,z+1/4"));

    let generators = HallSymbol::parse("P 2ac").unwrap().generators().unwrap();
    assert_eq!(generators[0], op("-x+1/2,-y,z+1/2"));

    let generators = HallSymbol::parse("P 2 2 -1n").unwrap().generators().unwrap();
    assert_eq!(generators[2], op("-x+1/2,-y+1/2,-z+1/2"));
}

#[test]
fn test_origin_shift_conjugation() {
    let symbol = HallSymbol::parse("P 31 2c (0 0 1)").unwrap();
    assert_eq!(symbol.origin_shift(), [0, 0, 1]);
    let generators = symbol.generators().unwrap();
    assert_eq!(generators[0], op("-y,x-y,z+1/3"));
    assert_eq!(generators[1], op("-y,-x,-z+2/3"));

    let symbol = HallSymbol::parse("P 61 2 (0 0 -1)").unwrap();
    let generators = symbol.generators().unwrap();
    assert_eq!(generators[1], op("-y,-x,-z+5/6"));
}

#[test]
fn test_whitespace_and_case() {
    let a = HallSymbol::parse("  -p   2YBC ").unwrap();
    let b = HallSymbol::parse("-P 2ybc").unwrap();
    assert_eq!(a, b);
    let glued = HallSymbol::parse("-P2ybc").unwrap();
    assert_eq!(glued, b);
    assert_eq!(b.to_string(), "-P 2ybc");
    assert_eq!(
        HallSymbol::parse("P 31 2c (0 0 1)").unwrap().to_string(),
        "P 31 2c (0 0 1)"
    );
}

#[test]
fn test_interpret() {
    let decoded = interpret("-F 4 2 3").unwrap();
    assert_eq!(decoded.lattice, LatticeSymbol::F);
    assert!(decoded.centrosymmetric);
    assert_eq!(decoded.generators.len(), 3);
    assert!(decoded.inversion.is_some());
}

#[test]
fn test_failures() {
    for bad in [
        "",
        "Q 2",
        "P",
        "P 5",
        "P 2q",
        "P 22",
        "P 2xy",
        "P 2 3",
        "P 4 2 2",
        "P 2 2 (0 0)",
        "P 2 2 (0 0 a)",
        "P 2 2 (0 0 1",
        "P 21'",
    ] {
        let result = HallSymbol::parse(bad);
        assert!(matches!(result, Err(SymmetryError::Hall { .. })), "{:?}", bad);
    }
}
