use std::collections::HashSet;

use log::{debug, warn};
use nalgebra::Vector3;
use num_rational::Rational64;
use num_traits::{Signed, Zero};

use crate::groups::operator_set::Closure;
use crate::groups::OperatorSet;
use crate::interfaces::TranslationRange;
use crate::operators::symmetry_operator::reduce_into_range;
use crate::operators::SymmetryOperator;
use crate::settings::basis_change::BasisChange;
use crate::settings::catalog::{all_settings, SpaceGroupSetting};

/// Re-express a whole operator set in the setting reached by `basis`.
///
/// Every operator is conjugated and re-finalized, centering vectors of the
/// new cell are rebuilt from the old lattice, and the result is matched
/// against the catalog. Fails with `IncompatibleBasis` when some rotation
/// part is not integral in the new basis.
pub fn transform(set: &OperatorSet, basis: &BasisChange) -> crate::Result<OperatorSet> {
    let dimension = set.modulation_dimension();
    let centering = transformed_centering(set, basis);

    let mut closure = Closure::new(SymmetryOperator::identity_with_modulation(dimension));
    for op in set {
        closure.insert(basis.transform_operator(op)?);
    }
    let snapshot = closure.len();
    for vector in &centering {
        for i in 0..snapshot {
            let shifted = closure.operators[i].translated_by(vector);
            closure.insert(shifted);
        }
    }

    let transformed = OperatorSet::from_operators(closure.operators);

    // Operators per cell scale with the cell volume
    let expected = Rational64::from_integer(set.len() as i64) * basis.determinant().abs();
    if expected != Rational64::from_integer(transformed.len() as i64) {
        warn!(
            "Transform by {} gave {} operators, expected {}",
            basis,
            transformed.len(),
            expected
        );
    }
    if transformed.lattice().is_none() {
        debug!(
            "Centering {:?} after {} matches no lattice symbol",
            transformed.centering(),
            basis
        );
    }

    let table_id = identify(&transformed).map(SpaceGroupSetting::id);
    let setting_transform = set.setting_transform().then(basis);
    Ok(transformed.with_metadata(table_id, setting_transform))
}

/// Find the catalog setting with exactly the same operators.
///
/// Only entries with the same operator count are compared; no match is a
/// normal outcome for non-standard settings.
pub fn identify(set: &OperatorSet) -> Option<&'static SpaceGroupSetting> {
    if set.modulation_dimension() != 0 {
        return None;
    }
    let key = set.canonical_key();
    let found = all_settings()
        .iter()
        .filter(|s| s.expected_order() == set.len())
        .find(|s| s.canonical_key() == Some(key.as_str()));
    match found {
        Some(setting) => debug!("Operator set identified as {}", setting.id()),
        None => debug!("No catalog setting matches {} operators", set.len()),
    }
    found
}

/// Centering translations of the new cell.
///
/// Old lattice points `L + c` with `|L_i| ≤ Σ_j |P_ij| + 1` cover every point
/// that can fold into the new cell; each maps to `P⁻¹·(L + c)` mod 1.
fn transformed_centering(set: &OperatorSet, basis: &BasisChange) -> Vec<Vec<Rational64>> {
    let dimension = set.modulation_dimension();
    let matrix = basis.matrix();
    let bounds: Vec<i64> = (0..3)
        .map(|i| {
            let row_sum = (0..3).fold(Rational64::zero(), |acc, j| acc + matrix[(i, j)].abs());
            row_sum.ceil().to_integer() + 1
        })
        .collect();

    let mut origins: Vec<Vec<Rational64>> = vec![vec![Rational64::zero(); 3 + dimension]];
    origins.extend(set.centering().iter().cloned());

    let mut seen: HashSet<[Rational64; 3]> = HashSet::new();
    let mut vectors = Vec::new();
    for l0 in -bounds[0]..=bounds[0] {
        for l1 in -bounds[1]..=bounds[1] {
            for l2 in -bounds[2]..=bounds[2] {
                for origin in &origins {
                    let old = Vector3::new(
                        origin[0] + Rational64::from_integer(l0),
                        origin[1] + Rational64::from_integer(l1),
                        origin[2] + Rational64::from_integer(l2),
                    );
                    let new = basis.transform_vector(&old);
                    let reduced = [
                        reduce_into_range(new[0], TranslationRange::Positive),
                        reduce_into_range(new[1], TranslationRange::Positive),
                        reduce_into_range(new[2], TranslationRange::Positive),
                    ];
                    if reduced.iter().all(Zero::is_zero) || !seen.insert(reduced) {
                        continue;
                    }
                    let mut vector = reduced.to_vec();
                    vector.extend_from_slice(&origin[3..]);
                    vectors.push(vector);
                }
            }
        }
    }
    debug!("New cell has {} centering vectors", vectors.len());
    vectors
}

impl OperatorSet {
    /// [`transform`] as a method
    pub fn transformed(&self, basis: &BasisChange) -> crate::Result<OperatorSet> {
        transform(self, basis)
    }

    /// Transform back into the catalog setting this set was derived from
    pub fn standardized(&self) -> crate::Result<OperatorSet> {
        transform(self, &self.setting_transform().inverse())
    }
}
