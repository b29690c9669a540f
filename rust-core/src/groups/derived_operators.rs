use std::collections::HashSet;

use log::{debug, trace};
use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::classification::ClassifiedOperator;
use crate::config::DEFAULT_EXPANSION_RANGE;
use crate::groups::operator_set::OperatorSet;
use crate::operators::SymmetryOperator;

/// Options for [`expand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionOptions {
    /// Lattice translations from -range to +range are tried along each axis
    pub range: i32,
    /// Keep only elements that meet the closed unit cell
    pub within_cell: bool,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        ExpansionOptions {
            range: DEFAULT_EXPANSION_RANGE,
            within_cell: true,
        }
    }
}

impl ExpansionOptions {
    pub fn with_range(mut self, range: i32) -> Self {
        self.range = range.max(0);
        self
    }

    pub fn with_within_cell(mut self, within_cell: bool) -> Self {
        self.within_cell = within_cell;
        self
    }
}

/// Operators implied by neighbouring lattice translations.
///
/// Every non-translation operator is shifted by each lattice vector in the
/// range, kept with its literal translation and classified. Duplicates,
/// degenerate and irrelevant results are dropped, and so are images that
/// describe an element already present (a shift along a screw axis or within
/// a glide plane only changes the translation). The output never repeats an
/// operator or an element of `set`.
pub fn expand(set: &OperatorSet, options: &ExpansionOptions) -> Vec<SymmetryOperator> {
    let mut known: HashSet<String> = set
        .iter()
        .map(|op| op.as_non_normalizable().xyz().to_string())
        .collect();
    let mut elements: HashSet<String> = set
        .iter()
        .filter(|op| !op.has_identity_rotation())
        .filter_map(|op| op.classify().ok().map(|c| element_key(op, c)))
        .collect();
    let shifts = lattice_shifts(options.range);
    let mut derived = Vec::new();

    for op in set.iter().filter(|op| !op.has_identity_rotation()) {
        for shift in &shifts {
            let candidate = op.translated_by(shift).as_non_normalizable();
            if !known.insert(candidate.xyz().to_string()) {
                continue;
            }
            match candidate.classify() {
                Err(e) => {
                    debug!("Skipping derived operator: {}", e);
                    continue;
                }
                Ok(c) if c.irrelevant => continue,
                Ok(c) if options.within_cell && !c.intersects_unit_cell() => continue,
                Ok(c) => {
                    if !elements.insert(element_key(&candidate, c)) {
                        continue;
                    }
                    trace!("Derived {} ({})", candidate, c);
                }
            }
            derived.push(candidate);
        }
    }

    debug!(
        "Expanded {} operators into {} derived operators (range {})",
        set.len(),
        derived.len(),
        options.range
    );
    derived
}

/// Rotation and the translation left after removing the intrinsic part.
///
/// Two operators share a key exactly when they describe the same axis,
/// plane or center.
fn element_key(op: &SymmetryOperator, classified: &ClassifiedOperator) -> String {
    let location = op.translation3() - classified.translation;
    let micro = location.map(|x| (x * 1e6).round() as i64);
    format!("{:?}|{:?}", op.rotation3().as_slice(), micro.as_slice())
}

fn lattice_shifts(range: i32) -> Vec<[Rational64; 3]> {
    let r = range.max(0) as i64;
    let mut shifts = Vec::new();
    for i in -r..=r {
        for j in -r..=r {
            for k in -r..=r {
                if (i, j, k) != (0, 0, 0) {
                    shifts.push([i, j, k].map(Rational64::from_integer));
                }
            }
        }
    }
    shifts
}

impl OperatorSet {
    /// Shorthand for [`expand`]
    pub fn expanded(&self, options: &ExpansionOptions) -> Vec<SymmetryOperator> {
        expand(self, options)
    }
}
