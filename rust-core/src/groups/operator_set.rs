use std::collections::HashSet;
use std::fmt;

use log::{debug, warn};
use nalgebra::DMatrix;
use num_rational::Rational64;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::classification::ClassifiedOperator;
use crate::config::MAX_GROUP_ORDER;
use crate::errors::SymmetryError;
use crate::groups::lattice_centering::LatticeSymbol;
use crate::hall::HallSymbol;
use crate::operators::{parse_xyz, SymmetryOperator};
use crate::settings::{identify, lookup, BasisChange};

/// The finalized, deduplicated operators of one space group in one setting.
///
/// The identity is always the first operator. Order of the remaining
/// operators follows generation order and carries no meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorSet {
    operators: Vec<SymmetryOperator>,
    lattice: Option<LatticeSymbol>,
    /// Non-zero centering translations, 3+d components each
    centering: Vec<Vec<Rational64>>,
    centrosymmetric: bool,
    /// Catalog id ("14:b1") of the matching standard setting, if any
    table_id: Option<String>,
    /// Change of basis from the catalog setting this set was derived from
    setting_transform: BasisChange,
}

impl OperatorSet {
    /// Identity-only group
    pub fn identity() -> Self {
        OperatorSet {
            operators: vec![SymmetryOperator::identity().finalized()],
            lattice: Some(LatticeSymbol::P),
            centering: Vec::new(),
            centrosymmetric: false,
            table_id: None,
            setting_transform: BasisChange::identity(),
        }
    }

    /// Close `generators` under multiplication, then add centering and (optionally) inversion.
    pub fn generate(
        generators: &[SymmetryOperator],
        lattice: LatticeSymbol,
        centrosymmetric: bool,
    ) -> Self {
        let dimension = generators
            .first()
            .map_or(0, SymmetryOperator::modulation_dimension);
        let inversion = centrosymmetric.then(|| SymmetryOperator::inversion(dimension));
        Self::generate_with_inversion(generators, lattice, inversion)
    }

    /// Like [`OperatorSet::generate`], with an explicit inversion operator (e.g. off-origin).
    ///
    /// The dimension is set by the first generator; generators of any other
    /// dimension are dropped with a warning.
    pub fn generate_with_inversion(
        generators: &[SymmetryOperator],
        lattice: LatticeSymbol,
        inversion: Option<SymmetryOperator>,
    ) -> Self {
        let dimension = generators
            .first()
            .map_or(0, SymmetryOperator::modulation_dimension);
        let centering: Vec<Vec<Rational64>> = lattice
            .centering_vectors()
            .iter()
            .map(|v| {
                let mut padded = v.to_vec();
                padded.resize(3 + dimension, Rational64::zero());
                padded
            })
            .collect();

        let mut closure = Closure::new(SymmetryOperator::identity_with_modulation(dimension));
        let generators = closure.matching(generators);
        let inversion = inversion.filter(|inv| closure.accepts(inv));

        // Point-group part: left-multiply everything found so far by every generator
        closure.close_under(&generators);
        debug!("Point-group part closed with {} operators", closure.len());

        // Centering translations
        let snapshot = closure.len();
        for vector in &centering {
            for i in 0..snapshot {
                let shifted = closure.operators[i].translated_by(vector);
                closure.insert(shifted);
            }
        }

        // Inversion images
        if let Some(inversion) = &inversion {
            let snapshot = closure.len();
            for i in 0..snapshot {
                let inverted = inversion.compose(&closure.operators[i]);
                closure.insert(inverted);
            }
        }

        // Verify closure against every generator, centering and inversion included
        let mut all_generators = generators;
        all_generators.extend(
            centering
                .iter()
                .map(|v| SymmetryOperator::pure_translation(v).finalized()),
        );
        all_generators.extend(inversion.iter().cloned());
        let before = closure.len();
        closure.close_under(&all_generators);
        if closure.len() != before {
            debug!("Closure check added {} operators", closure.len() - before);
        }

        // Origin-choice-1 symbols carry the inversion as an ordinary term
        let centrosymmetric = closure.operators.iter().any(SymmetryOperator::is_inversion);
        let set = OperatorSet {
            operators: closure.operators,
            lattice: Some(lattice),
            centering,
            centrosymmetric,
            table_id: None,
            setting_transform: BasisChange::identity(),
        };
        set.check_order();
        set
    }

    /// Full group of a Hall symbol
    pub fn from_hall(symbol: &str) -> crate::Result<Self> {
        let hall = HallSymbol::parse(symbol)?;
        let set = Self::generate_with_inversion(&hall.generators()?, hall.lattice(), hall.inversion());
        debug!("Hall symbol '{}' generated {} operators", hall, set.len());
        Ok(set)
    }

    /// Group generated by a ';'-separated list of xyz operators.
    ///
    /// Centering and centrosymmetry are read off the generated operators.
    pub fn from_generators_xyz(list: &str) -> crate::Result<Self> {
        let generators = list
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_xyz)
            .collect::<crate::Result<Vec<_>>>()?;
        if generators.is_empty() {
            return Err(SymmetryError::parse(list, "no operators"));
        }
        let dimension = generators[0].modulation_dimension();
        if let Some(bad) = generators
            .iter()
            .find(|g| g.modulation_dimension() != dimension)
        {
            return Err(SymmetryError::DimensionMismatch {
                expected: 3 + dimension,
                found: bad.dimension(),
            });
        }
        let generated = Self::generate_with_inversion(&generators, LatticeSymbol::P, None);
        Ok(Self::from_operators(generated.operators))
    }

    /// Wrap an already complete operator list, deriving centering and centrosymmetry.
    pub fn from_operators(operators: Vec<SymmetryOperator>) -> Self {
        let dimension = operators
            .first()
            .map_or(0, SymmetryOperator::modulation_dimension);
        let mut closure = Closure::new(SymmetryOperator::identity_with_modulation(dimension));
        for op in operators {
            closure.insert(op);
        }
        let centering: Vec<Vec<Rational64>> = closure
            .operators
            .iter()
            .filter(|op| op.has_identity_rotation() && !op.is_identity())
            .map(SymmetryOperator::translation)
            .collect();
        let centrosymmetric = closure.operators.iter().any(SymmetryOperator::is_inversion);
        OperatorSet {
            lattice: LatticeSymbol::from_centering_vectors(&centering),
            operators: closure.operators,
            centering,
            centrosymmetric,
            table_id: None,
            setting_transform: BasisChange::identity(),
        }
    }

    /// Resolve a catalog key, a Hall symbol or a raw xyz list.
    ///
    /// Raw lists are identified against the catalog when possible.
    pub fn from_key(key: &str) -> crate::Result<Self> {
        let trimmed = key.trim();
        if trimmed.contains(',') {
            let mut set = Self::from_generators_xyz(trimmed)?;
            set.table_id = identify(&set).map(|s| s.id());
            return Ok(set);
        }
        match lookup(trimmed) {
            Ok(setting) => setting.operators().cloned(),
            Err(SymmetryError::LookupMiss(_)) => {
                let symbol = trimmed
                    .strip_prefix("Hall:")
                    .or_else(|| trimmed.strip_prefix("hall:"))
                    .unwrap_or(trimmed);
                Self::from_hall(symbol).map_err(|_| SymmetryError::LookupMiss(key.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// [`OperatorSet::from_key`], falling back to the identity-only group with a warning
    pub fn from_key_or_identity(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|e| {
            warn!("{}; using the identity-only group", e);
            Self::identity()
        })
    }

    // ======================== ACCESSORS ========================

    pub fn operators(&self) -> &[SymmetryOperator] {
        &self.operators
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SymmetryOperator> {
        self.operators.iter()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn lattice(&self) -> Option<LatticeSymbol> {
        self.lattice
    }

    pub fn centering(&self) -> &[Vec<Rational64>] {
        &self.centering
    }

    pub fn is_centrosymmetric(&self) -> bool {
        self.centrosymmetric
    }

    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    pub fn setting_transform(&self) -> &BasisChange {
        &self.setting_transform
    }

    pub fn modulation_dimension(&self) -> usize {
        self.operators
            .first()
            .map_or(0, SymmetryOperator::modulation_dimension)
    }

    /// Lattice points per cell (1 + number of centering vectors)
    pub fn centering_multiplicity(&self) -> usize {
        self.centering.len() + 1
    }

    // ======================== QUERIES ========================

    pub fn contains(&self, op: &SymmetryOperator) -> bool {
        let key = op.finalized();
        self.operators.iter().any(|o| o.xyz() == key.xyz())
    }

    pub fn xyz_list(&self) -> Vec<String> {
        self.operators.iter().map(|op| op.xyz().to_string()).collect()
    }

    /// Sorted canonical strings joined by ';', independent of operator order
    pub fn canonical_key(&self) -> String {
        let mut list = self.xyz_list();
        list.sort_unstable();
        list.join(";")
    }

    /// Classification of every operator; degenerate operators are skipped with a warning
    pub fn classified(&self) -> Vec<(&SymmetryOperator, &ClassifiedOperator)> {
        self.operators
            .iter()
            .filter_map(|op| match op.classify() {
                Ok(c) => Some((op, c)),
                Err(e) => {
                    warn!("Skipping operator: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Number of distinct rotation parts
    pub fn point_group_order(&self) -> usize {
        self.operators
            .iter()
            .map(|op| (op.rotation(), op.time_reversal()))
            .collect::<HashSet<(&DMatrix<i32>, i8)>>()
            .len()
    }

    /// Same set with different identification metadata
    pub(crate) fn with_metadata(
        mut self,
        table_id: Option<String>,
        setting_transform: BasisChange,
    ) -> Self {
        self.table_id = table_id;
        self.setting_transform = setting_transform;
        self
    }

    /// Count must equal distinct rotations × centering multiplicity
    fn check_order(&self) {
        let expected = self.point_group_order() * self.centering_multiplicity();
        if self.len() != expected {
            warn!(
                "Generated {} operators, expected {} ({} rotations x {} lattice points)",
                self.len(),
                expected,
                self.point_group_order(),
                self.centering_multiplicity()
            );
        }
    }
}

impl fmt::Display for OperatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.operators.iter().enumerate() {
            writeln!(f, "{:>4}  {}", i + 1, op)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a OperatorSet {
    type Item = &'a SymmetryOperator;
    type IntoIter = std::slice::Iter<'a, SymmetryOperator>;

    fn into_iter(self) -> Self::IntoIter {
        self.operators.iter()
    }
}

/// Operator list deduplicated by canonical xyz string
pub(crate) struct Closure {
    pub(crate) operators: Vec<SymmetryOperator>,
    seen: HashSet<String>,
    limit_reported: bool,
    /// Size of every rotation block, fixed by the identity
    dimension: usize,
}

impl Closure {
    pub(crate) fn new(identity: SymmetryOperator) -> Self {
        let mut closure = Closure {
            operators: Vec::new(),
            seen: HashSet::new(),
            limit_reported: false,
            dimension: identity.dimension(),
        };
        closure.insert(identity);
        closure
    }

    pub(crate) fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether `op` has this closure's dimension; mismatches are logged
    pub(crate) fn accepts(&self, op: &SymmetryOperator) -> bool {
        let fits = op.dimension() == self.dimension;
        if !fits {
            warn!(
                "Skipping {}: dimension {} in a group of dimension {}",
                op,
                op.dimension(),
                self.dimension
            );
        }
        fits
    }

    /// The operators of this closure's dimension
    pub(crate) fn matching(&self, ops: &[SymmetryOperator]) -> Vec<SymmetryOperator> {
        ops.iter().filter(|op| self.accepts(op)).cloned().collect()
    }

    /// Finalize and add `op`; false if it was known, of another dimension, or the size guard was hit
    pub(crate) fn insert(&mut self, op: SymmetryOperator) -> bool {
        if !self.accepts(&op) {
            return false;
        }
        let op = op.finalized();
        if self.seen.contains(op.xyz()) {
            return false;
        }
        if self.operators.len() >= MAX_GROUP_ORDER {
            if !self.limit_reported {
                warn!(
                    "Group closure exceeded {} operators; keeping the partial set",
                    MAX_GROUP_ORDER
                );
                self.limit_reported = true;
            }
            return false;
        }
        self.seen.insert(op.xyz().to_string());
        self.operators.push(op);
        true
    }

    /// Breadth-first closure: g·op for every generator g and every operator op
    pub(crate) fn close_under(&mut self, generators: &[SymmetryOperator]) {
        let generators = self.matching(generators);
        let mut i = 0;
        while i < self.operators.len() {
            for generator in &generators {
                let product = generator.compose(&self.operators[i]);
                self.insert(product);
            }
            i += 1;
            if self.limit_reported {
                break;
            }
        }
    }
}
