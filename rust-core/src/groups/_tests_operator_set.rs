#![cfg(test)]

use crate::classification::SymmetryKind;
use crate::groups::{LatticeSymbol, OperatorSet};
use crate::operators::parse_xyz;

fn hall_count(symbol: &str) -> usize {
    OperatorSet::from_hall(symbol).unwrap().len()
}

#[test]
fn test_published_counts() {
    assert_eq!(hall_count("P 1"), 1);
    assert_eq!(hall_count("-P 1"), 2);
    assert_eq!(hall_count("-P 2ybc"), 4);
    assert_eq!(hall_count("-F 4 2 3"), 192);
    assert_eq!(hall_count("P 4 2 3"), 24);
    assert_eq!(hall_count("-I 4bd 2c 3"), 96);
    assert_eq!(hall_count("R 3"), 9);
    assert_eq!(hall_count("P 3*"), 3);
    assert_eq!(hall_count("P 61 2 (0 0 -1)"), 12);
    assert_eq!(hall_count("-P 6c 2c"), 24);
}

#[test]
fn test_identity_first_and_finalized() {
    let set = OperatorSet::from_hall("-F 4 2 3").unwrap();
    assert!(set.operators()[0].is_identity());
    assert!(set.iter().all(|op| op.is_finalized()));
    assert_eq!(set.point_group_order(), 48);
    assert_eq!(set.centering_multiplicity(), 4);
    assert_eq!(set.lattice(), Some(LatticeSymbol::F));
    assert!(set.is_centrosymmetric());
}

#[test]
fn test_p21c_operators() {
    let set = OperatorSet::from_hall("-P 2ybc").unwrap();
    for xyz in ["x,y,z", "-x,y+1/2,-z+1/2", "-x,-y,-z", "x,-y+1/2,z+1/2"] {
        assert!(set.contains(&parse_xyz(xyz).unwrap()), "{}", xyz);
    }
}

#[test]
fn test_generate_p_minus_1_from_operators() {
    let generators = vec![parse_xyz("x,y,z").unwrap(), parse_xyz("-x,-y,-z").unwrap()];
    let set = OperatorSet::generate(&generators, LatticeSymbol::P, false);
    assert_eq!(set.len(), 2);
    assert!(set.operators()[0].is_identity());

    let inversion = set.operators()[1].classify().unwrap();
    assert_eq!(inversion.kind, SymmetryKind::Inversion);
    let point = inversion.fixed_point.unwrap();
    assert!(point.norm() < 1e-9);
}

#[test]
fn test_centering_and_inversion_flags() {
    let generators = vec![parse_xyz("-x,-y,z").unwrap()];
    let set = OperatorSet::generate(&generators, LatticeSymbol::I, true);
    assert_eq!(set.len(), 8);
    assert_eq!(set.centering().len(), 1);
    assert!(set.is_centrosymmetric());
}

#[test]
fn test_from_generators_xyz_detects_centering() {
    let set = OperatorSet::from_generators_xyz("x+1/2,y+1/2,z; -x,-y,z").unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.lattice(), Some(LatticeSymbol::C));
    assert!(!set.is_centrosymmetric());

    assert!(OperatorSet::from_generators_xyz(" ; ").is_err());
    assert!(OperatorSet::from_generators_xyz("x,y,z;x1,x2,x3,x4").is_err());
}

#[test]
fn test_modulated_generation() {
    let generators = vec![parse_xyz("-x1,-x2,x3,x4").unwrap()];
    let set = OperatorSet::generate(&generators, LatticeSymbol::I, false);
    assert_eq!(set.len(), 4);
    assert_eq!(set.modulation_dimension(), 1);
    assert_eq!(set.centering()[0].len(), 4);
}

#[test]
fn test_generators_of_another_dimension_are_skipped() {
    let two = parse_xyz("-x,-y,z").unwrap();
    let modulated = parse_xyz("x1,x2,x3,-x4").unwrap();

    let set = OperatorSet::generate(&[two.clone(), modulated.clone()], LatticeSymbol::P, false);
    assert_eq!(set.len(), 2);
    assert!(set.iter().all(|op| op.dimension() == 3));

    let set = OperatorSet::generate(&[modulated.clone(), two.clone()], LatticeSymbol::C, true);
    assert_eq!(set.modulation_dimension(), 1);
    assert_eq!(set.len(), 8);
    assert!(set.iter().all(|op| op.dimension() == 4));

    // An explicit inversion of the wrong dimension is dropped as well
    let set = OperatorSet::generate_with_inversion(
        &[two],
        LatticeSymbol::P,
        Some(crate::operators::SymmetryOperator::inversion(1)),
    );
    assert_eq!(set.len(), 2);
    assert!(!set.is_centrosymmetric());
}

#[test]
fn test_canonical_key_is_order_independent() {
    let a = OperatorSet::from_generators_xyz("-x,-y,z;x,-y,-z").unwrap();
    let b = OperatorSet::from_generators_xyz("x,-y,-z;-x,-y,z").unwrap();
    assert_eq!(a.len(), 4);
    assert_eq!(a.canonical_key(), b.canonical_key());
}

#[test]
fn test_from_key_fallback() {
    let set = OperatorSet::from_key_or_identity("no such group");
    assert_eq!(set.len(), 1);
    assert!(set.operators()[0].is_identity());

    let set = OperatorSet::from_key_or_identity("P 2 3 4 5");
    assert_eq!(set.len(), 1);
}

#[test]
fn test_from_key_variants() {
    let set = OperatorSet::from_key("14").unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.table_id(), Some("14:b1"));

    let set = OperatorSet::from_key("x,y,z;-x,-y,-z").unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.table_id(), Some("2"));

    // Valid Hall symbol outside the catalog
    let set = OperatorSet::from_key("P 4x").unwrap();
    assert_eq!(set.len(), 4);
    assert_eq!(set.table_id(), None);
}

#[test]
fn test_classified_listing() {
    let set = OperatorSet::from_hall("-P 2ybc").unwrap();
    let classified = set.classified();
    assert_eq!(classified.len(), 4);
    assert!(classified
        .iter()
        .any(|(_, c)| c.kind == SymmetryKind::Screw(2)));
    assert!(classified
        .iter()
        .any(|(_, c)| matches!(c.kind, SymmetryKind::Glide(_))));
}
