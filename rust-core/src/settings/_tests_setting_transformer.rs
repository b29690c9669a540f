#![cfg(test)]

use num_rational::Rational64;

use crate::errors::SymmetryError;
use crate::groups::{LatticeSymbol, OperatorSet};
use crate::settings::{identify, lookup, transform, BasisChange};

fn catalog_set(key: &str) -> OperatorSet {
    lookup(key).unwrap().operators().unwrap().clone()
}

fn basis(text: &str) -> BasisChange {
    BasisChange::parse(text).unwrap()
}

#[test]
fn test_monoclinic_axis_permutations() {
    let p21c = catalog_set("14");

    let cyclic = transform(&p21c, &basis("c,a,b")).unwrap();
    assert_eq!(cyclic.len(), 4);
    assert_eq!(cyclic.table_id(), Some("14:c1"));
    assert_eq!(cyclic.setting_transform().to_string(), "c,a,b");

    let permuted = transform(&p21c, &basis("b,c,a")).unwrap();
    assert_eq!(permuted.table_id(), Some("14:a1"));

    let cell_choice = transform(&p21c, &basis("-a-c,b,a")).unwrap();
    assert_eq!(cell_choice.table_id(), Some("14:b2"));
    assert_eq!(cell_choice.lattice(), Some(LatticeSymbol::P));
}

#[test]
fn test_origin_shift_between_origin_choices() {
    let origin_two = catalog_set("48:2");
    let origin_one = transform(&origin_two, &basis("a,b,c;1/4,1/4,1/4")).unwrap();
    assert_eq!(origin_one.len(), 8);
    assert_eq!(origin_one.table_id(), Some("48:1"));

    // Shifting onto another inversion center keeps the setting
    let p21c = catalog_set("14");
    let shifted = transform(&p21c, &basis("a,b,c;1/2,0,0")).unwrap();
    assert_eq!(shifted.table_id(), Some("14:b1"));
}

#[test]
fn test_hexagonal_to_rhombohedral_axes() {
    let obverse = basis("2/3a+1/3b+1/3c,-1/3a+1/3b+1/3c,-1/3a-2/3b+1/3c");

    let r3 = transform(&catalog_set("146:H"), &obverse).unwrap();
    assert_eq!(r3.len(), 3);
    assert_eq!(r3.lattice(), Some(LatticeSymbol::P));
    assert_eq!(r3.table_id(), Some("146:R"));

    let r3m = transform(&catalog_set("166:H"), &obverse).unwrap();
    assert_eq!(r3m.len(), 12);
    assert_eq!(r3m.table_id(), Some("166:R"));
}

#[test]
fn test_centering_is_rebuilt() {
    // Face-centered cubic to its primitive cell
    let fm3m = catalog_set("225");
    let primitive = transform(&fm3m, &basis("1/2b+1/2c,1/2a+1/2c,1/2a+1/2b")).unwrap();
    assert_eq!(primitive.len(), 48);
    assert!(primitive.centering().is_empty());
    assert_eq!(primitive.lattice(), Some(LatticeSymbol::P));
    assert_eq!(primitive.table_id(), None);

    // C-centered to A-centered monoclinic
    let a_centered = transform(&catalog_set("12:b1"), &basis("-a-c,b,a")).unwrap();
    assert_eq!(a_centered.len(), 8);
    assert_eq!(a_centered.lattice(), Some(LatticeSymbol::A));
    assert_eq!(a_centered.table_id(), Some("12:b2"));

    // Doubling a primitive cell creates a centering with no conventional symbol
    let doubled = transform(&catalog_set("3:b"), &basis("2a,b,c")).unwrap();
    assert_eq!(doubled.len(), 4);
    assert_eq!(
        doubled.centering(),
        &[vec![Rational64::new(1, 2), Rational64::from_integer(0), Rational64::from_integer(0)]]
    );
    assert_eq!(doubled.lattice(), None);
    assert_eq!(doubled.table_id(), None);

    // Square cell rotated by 45 degrees picks up C centering
    let tetragonal = transform(&catalog_set("83"), &basis("a-b,a+b,c")).unwrap();
    assert_eq!(tetragonal.len(), 16);
    assert_eq!(tetragonal.lattice(), Some(LatticeSymbol::C));
}

#[test]
fn test_incompatible_basis() {
    let p4 = catalog_set("75");
    assert!(matches!(
        transform(&p4, &basis("2a,b,c")),
        Err(SymmetryError::IncompatibleBasis { .. })
    ));
}

#[test]
fn test_round_trip_to_standard() {
    let p21c = catalog_set("14");
    let change = basis("-a-c,b,a;0,1/4,0");
    let moved = p21c.transformed(&change).unwrap();
    assert_eq!(moved.setting_transform(), &change);

    let back = moved.standardized().unwrap();
    assert!(back.setting_transform().is_identity());
    assert_eq!(back.canonical_key(), p21c.canonical_key());
    assert_eq!(back.table_id(), Some("14:b1"));
}

#[test]
fn test_composition_matches_sequential_transforms() {
    let cmcm = catalog_set("63");
    let first = basis("c,a,b");
    let second = basis("a-b,a+b,c;0,1/2,0");

    let sequential = transform(&transform(&cmcm, &first).unwrap(), &second).unwrap();
    let direct = transform(&cmcm, &first.then(&second)).unwrap();
    assert_eq!(sequential.canonical_key(), direct.canonical_key());
    assert_eq!(sequential.setting_transform(), direct.setting_transform());
}

#[test]
fn test_identify() {
    let p1bar = OperatorSet::from_generators_xyz("-x,-y,-z").unwrap();
    assert_eq!(identify(&p1bar).map(|s| s.id()), Some("2".to_string()));

    let hall_only = OperatorSet::from_hall("P 4x").unwrap();
    assert!(identify(&hall_only).is_none());

    let modulated = OperatorSet::from_generators_xyz("-x1,-x2,-x3,-x4").unwrap();
    assert!(identify(&modulated).is_none());
}
