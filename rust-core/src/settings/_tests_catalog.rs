#![cfg(test)]

use crate::errors::SymmetryError;
use crate::groups::LatticeSymbol;
use crate::settings::{all_settings, lookup, point_group_order, settings_of, CrystalSystem};

fn id(key: &str) -> String {
    lookup(key).unwrap().id()
}

#[test]
fn test_catalog_size() {
    assert_eq!(all_settings().len(), 530);
    assert_eq!(settings_of(14).count(), 9);
    assert_eq!(settings_of(68).count(), 12);
    assert_eq!(settings_of(225).count(), 1);
    for number in 1..=230 {
        assert!(settings_of(number).next().is_some(), "{}", number);
    }
}

#[test]
fn test_lookup_by_number() {
    assert_eq!(id("14"), "14:b1");
    assert_eq!(id("14.2"), "14:b2");
    assert_eq!(id("14:c1"), "14:c1");
    assert_eq!(id("14:C1"), "14:c1");
    assert_eq!(id(" 225 "), "225");
    assert_eq!(id("146:R"), "146:R");
    assert_eq!(lookup("14:c1").unwrap().hall(), "-P 2ac");
}

#[test]
fn test_lookup_by_hermann_mauguin() {
    assert_eq!(id("HM:P 1 21/c 1"), "14:b1");
    assert_eq!(id("HM:p121/c1"), "14:b1");
    assert_eq!(id("P21/c"), "14:b1");
    assert_eq!(id("P 21/n"), "14:b2");
    assert_eq!(id("Pnma"), "62");
    assert_eq!(id("HM:P n n n:1"), "48:1");
    assert_eq!(id("HM:Pnnn:2"), "48:2");
    assert_eq!(id("HM:P n c b:2"), "50:2cab");
    assert_eq!(id("HM:R -3 m:R"), "166:R");
    assert_eq!(id("R -3 m"), "166:H");
    assert_eq!(id("F d -3 m"), "227:1");
}

#[test]
fn test_lookup_by_hall() {
    assert_eq!(id("Hall:-P 2ybc"), "14:b1");
    assert_eq!(id("hall: -p 2YBC"), "14:b1");
    assert_eq!(id("-F 4 2 3"), "225");
    assert_eq!(id("Hall:P 31 2c (0 0 1)"), "151");
    assert_eq!(id("P 3 2\""), "150");
}

#[test]
fn test_lookup_by_operator_list() {
    assert_eq!(id("x,y,z;-x,-y,-z"), "2");
    assert_eq!(id("-x,y+1/2,-z+1/2;-x,-y,-z"), "14:b1");
}

#[test]
fn test_lookup_misses() {
    for key in ["", "231", "0", "14:zz", "14.10", "Q 1", "HM:P 9", "Hall:Z 1"] {
        assert!(
            matches!(lookup(key), Err(SymmetryError::LookupMiss(_))),
            "{}",
            key
        );
    }
    // A malformed operator list is a parse failure, not a miss
    assert!(matches!(lookup("x,y"), Err(SymmetryError::Parse { .. })));
}

#[test]
fn test_setting_metadata() {
    let setting = lookup("14").unwrap();
    assert_eq!(setting.number(), 14);
    assert_eq!(setting.setting(), "b1");
    assert_eq!(setting.hm(), "P 1 21/c 1");
    assert_eq!(setting.short_hm(), "P 21/c");
    assert_eq!(setting.crystal_system(), CrystalSystem::Monoclinic);
    assert_eq!(setting.origin_choice(), None);
    assert_eq!(setting.to_string(), "14:b1 P 1 21/c 1 (Hall: -P 2ybc)");

    let pnma = lookup("62").unwrap();
    assert_eq!(pnma.short_hm(), "P n m a");
    assert_eq!(pnma.setting(), "");

    assert_eq!(lookup("48:1").unwrap().origin_choice(), Some(1));
    assert_eq!(lookup("50:2cab").unwrap().origin_choice(), Some(2));
    assert_eq!(lookup("166:H").unwrap().crystal_system(), CrystalSystem::Trigonal);
    assert_eq!(CrystalSystem::Trigonal.family(), CrystalSystem::Hexagonal);
    assert_eq!(CrystalSystem::Cubic.family(), CrystalSystem::Cubic);
}

#[test]
fn test_expected_order() {
    assert_eq!(point_group_order(1), 1);
    assert_eq!(point_group_order(14), 4);
    assert_eq!(point_group_order(62), 8);
    assert_eq!(point_group_order(194), 24);
    assert_eq!(point_group_order(230), 48);

    assert_eq!(lookup("225").unwrap().expected_order(), 192);
    assert_eq!(lookup("146:H").unwrap().expected_order(), 9);
    assert_eq!(lookup("146:R").unwrap().expected_order(), 3);
    assert_eq!(lookup("146:H").unwrap().lattice(), LatticeSymbol::R);
    assert_eq!(lookup("146:R").unwrap().lattice(), LatticeSymbol::P);
}

#[test]
fn test_operators_are_cached_and_tagged() {
    let setting = lookup("14").unwrap();
    let first = setting.operators().unwrap();
    let second = setting.operators().unwrap();
    assert!(std::ptr::eq(first, second));
    assert_eq!(first.len(), 4);
    assert_eq!(first.table_id(), Some("14:b1"));
    assert!(first.setting_transform().is_identity());
}

#[test]
fn test_duplicate_settings_share_canonical_keys() {
    let a = lookup("68:1").unwrap().canonical_key();
    let b = lookup("68:1ba-c").unwrap().canonical_key();
    assert!(a.is_some());
    assert_eq!(a, b);
    assert_ne!(a, lookup("68:2").unwrap().canonical_key());
}
