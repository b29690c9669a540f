use nalgebra::Vector3;
use num_traits::ToPrimitive;

use symmetry_engine::groups::OperatorSet;
use symmetry_engine::interfaces::TranslationRange;
use symmetry_engine::operators::parse_xyz;
use symmetry_engine::settings::{all_settings, identify, lookup, transform, BasisChange};

/// Space-group types whose point group contains the inversion
fn is_centrosymmetric_type(number: u16) -> bool {
    matches!(
        number,
        2 | 10..=15
            | 47..=74
            | 83..=88
            | 123..=142
            | 147..=148
            | 162..=167
            | 175..=176
            | 191..=194
            | 200..=206
            | 221..=230
    )
}

#[test]
fn test_every_setting_has_the_published_order() {
    let mut failures = Vec::new();
    for setting in all_settings() {
        match setting.operators() {
            Ok(set) if set.len() == setting.expected_order() => {}
            Ok(set) => failures.push(format!(
                "{} ({}): {} operators, expected {}",
                setting.id(),
                setting.hall(),
                set.len(),
                setting.expected_order()
            )),
            Err(e) => failures.push(format!("{}: {}", setting.id(), e)),
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn test_every_setting_is_consistent() {
    for setting in all_settings() {
        let set = setting.operators().unwrap();
        let id = setting.id();
        assert!(set.operators()[0].is_identity(), "{}", id);
        assert!(set.iter().all(|op| op.is_finalized()), "{}", id);
        assert_eq!(set.lattice(), Some(setting.lattice()), "{}", id);
        assert_eq!(
            set.point_group_order(),
            setting.point_group_order(),
            "{}",
            id
        );
        assert_eq!(
            set.is_centrosymmetric(),
            is_centrosymmetric_type(setting.number()),
            "{}",
            id
        );
    }
}

#[test]
fn test_every_setting_identifies_itself() {
    for setting in all_settings() {
        let regenerated = OperatorSet::from_hall(setting.hall()).unwrap();
        let found = identify(&regenerated).unwrap();
        // Duplicated Hall symbols (origin choice 1 of group 68) resolve to the first entry
        assert_eq!(found.canonical_key(), setting.canonical_key(), "{}", setting.id());
        assert_eq!(found.number(), setting.number(), "{}", setting.id());
    }
}

#[test]
fn test_lookup_by_id_round_trips() {
    for setting in all_settings() {
        assert_eq!(lookup(&setting.id()).unwrap().id(), setting.id());
    }
}

#[test]
fn test_every_operator_classifies() {
    for setting in all_settings() {
        let set = setting.operators().unwrap();
        for op in set {
            let classified = op
                .classify()
                .unwrap_or_else(|e| panic!("{}: {}", setting.id(), e));
            assert_eq!(
                classified.kind.is_proper(),
                op.determinant() == 1,
                "{} {}",
                setting.id(),
                op
            );
        }
    }
}

#[test]
fn test_printed_operators_parse_back() {
    for setting in all_settings() {
        let set = setting.operators().unwrap();
        for op in set {
            for range in [TranslationRange::Positive, TranslationRange::Symmetric] {
                let text = op.xyz_in(range);
                let parsed = parse_xyz(&text)
                    .unwrap_or_else(|e| panic!("{} '{}': {}", setting.id(), text, e));
                assert_eq!(&parsed, op, "{} '{}'", setting.id(), text);
            }
        }
    }
}

/// Whether `shift` is a lattice vector of `set`, centering included
fn is_lattice_translation(set: &OperatorSet, shift: &Vector3<f64>) -> bool {
    let integral = |v: Vector3<f64>| v.iter().all(|x| (x - x.round()).abs() < 1e-9);
    integral(*shift)
        || set.centering().iter().any(|c| {
            let vector = Vector3::from_iterator(c.iter().take(3).map(|r| r.to_f64().unwrap()));
            integral(shift - vector)
        })
}

#[test]
fn test_operator_powers_are_lattice_translations() {
    let point = Vector3::new(0.13, 0.29, 0.47);
    for setting in all_settings() {
        let set = setting.operators().unwrap();
        for op in set {
            let n = op.operation_order().unwrap();
            let power = op.power(n);
            assert!(power.has_identity_rotation(), "{} {}", setting.id(), op);
            assert!(set.contains(&power), "{} {}^{}", setting.id(), op, n);

            let image = (0..n).fold(point, |p, _| op.apply(&p));
            assert!(
                is_lattice_translation(&set, &(image - point)),
                "{} {}^{} moves by {:?}",
                setting.id(),
                op,
                n,
                image - point
            );
        }
    }
}

#[test]
fn test_basis_changes_round_trip() {
    let bases = ["-a-c,b,a;0,1/4,0", "b,c,a", "a,b,c;1/2,1/4,1/8", "-b,a,c;0,0,1/3"];
    for id in ["1", "14", "63", "62", "166:H", "48:2", "136", "194", "227:1"] {
        let set = lookup(id).unwrap().operators().unwrap();
        for text in bases {
            let change = BasisChange::parse(text).unwrap();
            let moved = transform(&set, &change).unwrap();
            assert_eq!(moved.len(), set.len(), "{} by {}", id, text);
            let back = transform(&moved, &change.inverse()).unwrap();
            assert_eq!(back.canonical_key(), set.canonical_key(), "{} by {}", id, text);
        }
    }
}
