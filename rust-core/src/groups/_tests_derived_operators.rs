#![cfg(test)]

use crate::groups::{expand, ExpansionOptions, OperatorSet};

#[test]
fn test_default_options() {
    let options = ExpansionOptions::default();
    assert_eq!(options.range, 1);
    assert!(options.within_cell);

    let options = options.with_range(2).with_within_cell(false);
    assert_eq!(options.range, 2);
    assert!(!options.within_cell);
    assert_eq!(ExpansionOptions::default().with_range(-3).range, 0);
}

#[test]
fn test_inversion_centers_in_cell() {
    let set = OperatorSet::from_hall("-P 1").unwrap();
    let derived = expand(&set, &ExpansionOptions::default());
    // L/2 with L in {0,1}³ \ {0}
    assert_eq!(derived.len(), 7);
    assert!(derived.iter().all(|op| !op.is_normalizable()));

    let everywhere = expand(&set, &ExpansionOptions::default().with_within_cell(false));
    assert_eq!(everywhere.len(), 26);
}

#[test]
fn test_derived_operators_are_new_and_relevant() {
    let set = OperatorSet::from_hall("-P 2ybc").unwrap();
    let derived = set.expanded(&ExpansionOptions::default());
    assert!(!derived.is_empty());
    for op in &derived {
        let c = op.classify().unwrap();
        assert!(!c.irrelevant, "{}", op);
        assert!(c.intersects_unit_cell(), "{}", op);
        assert!(!op.has_identity_rotation());
    }
    let mut strings: Vec<&str> = derived.iter().map(|op| op.xyz()).collect();
    let before = strings.len();
    strings.sort_unstable();
    strings.dedup();
    assert_eq!(strings.len(), before);
}

#[test]
fn test_zero_range_gives_nothing() {
    let set = OperatorSet::from_hall("-P 2ybc").unwrap();
    let derived = expand(&set, &ExpansionOptions::default().with_range(0));
    assert!(derived.is_empty());
}

#[test]
fn test_screw_axes_are_listed_once() {
    let set = OperatorSet::from_hall("P 31").unwrap();
    let derived = expand(&set, &ExpansionOptions::default().with_within_cell(false));
    assert!(!derived.is_empty());

    // (rotation, location) pairs: lattice shifts along c only change the screw part
    let element = |op: &crate::operators::SymmetryOperator| {
        let c = op.classify().unwrap();
        let location = (op.translation3() - c.translation).map(|x| (x * 1e6).round() as i64);
        (op.rotation3(), location)
    };
    let mut elements: Vec<_> = set
        .iter()
        .filter(|op| !op.has_identity_rotation())
        .map(element)
        .collect();
    for op in &derived {
        let key = element(op);
        assert!(!elements.contains(&key), "{} repeats an element", op);
        elements.push(key);

        let c = op.classify().unwrap();
        assert!(!c.irrelevant, "{}", op);
        assert!(c.translation.norm() < 0.58, "{}", op);
        assert!(c.screw_index().is_some(), "{}", op);
    }
    assert!(!derived.iter().any(|op| op.xyz() == "!-y,x-y,-2/3+z"));
    assert!(!derived.iter().any(|op| op.xyz() == "!-x+y,-x,-1/3+z"));
}
