use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use log::warn;
use nalgebra::{DMatrix, Matrix3, Matrix4, Vector3};
use num_integer::Integer;
use num_rational::Rational64;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::classification::{classify, ClassifiedOperator};
use crate::config::{MAX_OPERATOR_POWER, TWELFTHS};
use crate::errors::SymmetryError;
use crate::interfaces::TranslationRange;
use crate::operators::xyz_notation::{format_fraction, format_xyz, parse_xyz};

/// A single affine symmetry operation (Seitz operator).
///
/// The rotation block is an integer matrix of size `3 + d` where `d` is the
/// modulation dimension (0 for ordinary space groups). Translations are kept
/// exactly as numerators over a shared `divisor`, which is 12 whenever every
/// component is a multiple of 1/12.
///
/// Values are immutable: every operation returns a new operator. The canonical
/// xyz string and the geometric classification are computed lazily and cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymmetryOperator {
    /// Integer rotation / rotoinversion block, (3+d)×(3+d)
    rotation: DMatrix<i32>,
    /// Translation numerators over `divisor`, length 3+d
    translation: Vec<i64>,
    /// 12, or the least common denominator when twelfths are insufficient
    divisor: i64,
    /// Time reversal for magnetic operators: -1, +1, or 0 when non-magnetic
    time_reversal: i8,
    /// Number of incommensurate modulation dimensions
    modulation_dimension: usize,
    /// `false` for operators written with a leading `!`
    normalizable: bool,
    /// Set once the translation has been reduced to its canonical representative
    finalized: bool,
    #[serde(skip)]
    xyz: OnceLock<String>,
    #[serde(skip)]
    classification: OnceLock<Result<ClassifiedOperator, SymmetryError>>,
}

impl SymmetryOperator {
    /// Create an operator from a square integer rotation block and a rational translation.
    pub fn new(rotation: DMatrix<i32>, translation: &[Rational64]) -> crate::Result<Self> {
        let n = rotation.nrows();
        if rotation.ncols() != n {
            return Err(SymmetryError::DimensionMismatch {
                expected: n,
                found: rotation.ncols(),
            });
        }
        if n < 3 {
            return Err(SymmetryError::DimensionMismatch {
                expected: 3,
                found: n,
            });
        }
        if translation.len() != n {
            return Err(SymmetryError::DimensionMismatch {
                expected: n,
                found: translation.len(),
            });
        }
        if pack_translation(translation).is_none() {
            let shown: Vec<String> = translation.iter().map(|t| format_fraction(*t)).collect();
            return Err(SymmetryError::NumericDegenerate {
                xyz: shown.join(","),
                message: "translation denominators have no common i64 multiple".to_string(),
            });
        }
        Ok(Self::from_raw(rotation, translation, 0, true))
    }

    /// Create a 3D operator from a rotation matrix and a translation in twelfths.
    pub fn from_seitz(rotation: Matrix3<i32>, twelfths: [i64; 3]) -> Self {
        let rotation = DMatrix::from_fn(3, 3, |i, j| rotation[(i, j)]);
        let translation: Vec<Rational64> = twelfths
            .iter()
            .map(|&t| Rational64::new(t, TWELFTHS))
            .collect();
        Self::from_raw(rotation, &translation, 0, true)
    }

    /// Create the identity operation
    pub fn identity() -> Self {
        Self::identity_with_modulation(0)
    }

    /// Create the identity operation of a (3+d)-dimensional superspace group
    pub fn identity_with_modulation(modulation_dimension: usize) -> Self {
        let n = 3 + modulation_dimension;
        Self::from_raw(DMatrix::identity(n, n), &vec![Rational64::zero(); n], 0, true)
    }

    /// Create the inversion through the origin
    pub fn inversion(modulation_dimension: usize) -> Self {
        let n = 3 + modulation_dimension;
        Self::from_raw(
            DMatrix::from_diagonal_element(n, n, -1),
            &vec![Rational64::zero(); n],
            0,
            true,
        )
    }

    /// Create a pure translation of matching dimension
    pub fn pure_translation(translation: &[Rational64]) -> Self {
        let n = translation.len().max(3);
        let mut padded = translation.to_vec();
        padded.resize(n, Rational64::zero());
        Self::from_raw(DMatrix::identity(n, n), &padded, 0, true)
    }

    pub(crate) fn from_raw(
        rotation: DMatrix<i32>,
        translation: &[Rational64],
        time_reversal: i8,
        normalizable: bool,
    ) -> Self {
        let modulation_dimension = rotation.nrows().saturating_sub(3);
        let (numerators, divisor) = pack_translation(translation).unwrap_or_else(|| {
            // Only reachable from arithmetic on operators built outside the checked constructors
            warn!("Translation denominators overflow; rounding to twelfths");
            let twelfths = translation
                .iter()
                .map(|t| (t.to_f64().unwrap_or(0.0) * TWELFTHS as f64).round() as i64)
                .collect();
            (twelfths, TWELFTHS)
        });
        SymmetryOperator {
            rotation,
            translation: numerators,
            divisor,
            time_reversal,
            modulation_dimension,
            normalizable,
            finalized: false,
            xyz: OnceLock::new(),
            classification: OnceLock::new(),
        }
    }

    // ======================== ACCESSORS ========================

    /// Full rotation block, (3+d)×(3+d)
    pub fn rotation(&self) -> &DMatrix<i32> {
        &self.rotation
    }

    /// Real-space 3×3 block of the rotation
    pub fn rotation3(&self) -> Matrix3<i32> {
        Matrix3::from_fn(|i, j| self.rotation[(i, j)])
    }

    /// Exact translation, one rational per row
    pub fn translation(&self) -> Vec<Rational64> {
        self.translation
            .iter()
            .map(|&n| Rational64::new(n, self.divisor))
            .collect()
    }

    /// Real-space translation as floating point
    pub fn translation3(&self) -> Vector3<f64> {
        Vector3::from_fn(|i, _| self.translation[i] as f64 / self.divisor as f64)
    }

    /// Translation numerators in twelfths, or `None` when twelfths are insufficient
    pub fn translation_twelfths(&self) -> Option<Vec<i64>> {
        if self.divisor != TWELFTHS {
            return None;
        }
        Some(self.translation.clone())
    }

    pub fn divisor(&self) -> i64 {
        self.divisor
    }

    pub fn time_reversal(&self) -> i8 {
        self.time_reversal
    }

    pub fn modulation_dimension(&self) -> usize {
        self.modulation_dimension
    }

    /// Number of rows of the rotation block (3 + modulation dimension)
    pub fn dimension(&self) -> usize {
        self.rotation.nrows()
    }

    pub fn is_normalizable(&self) -> bool {
        self.normalizable
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    // ======================== PREDICATES ========================

    pub fn has_identity_rotation(&self) -> bool {
        self.rotation == DMatrix::identity(self.dimension(), self.dimension())
    }

    /// Check if this is the identity operation
    pub fn is_identity(&self) -> bool {
        self.has_identity_rotation() && self.translation.iter().all(|&t| t == 0)
    }

    /// Inversion through some point (R = -1)
    pub fn is_inversion(&self) -> bool {
        self.rotation == DMatrix::from_diagonal_element(self.dimension(), self.dimension(), -1)
    }

    /// Rounded determinant of the full rotation block
    pub fn determinant(&self) -> i32 {
        self.rotation.map(|x| x as f64).determinant().round() as i32
    }

    // ======================== ALGEBRA ========================

    /// Composition `self · other`: apply `other` first, then `self`.
    ///
    /// # Panics
    /// Panics when the two operators have different dimensions.
    pub fn compose(&self, other: &Self) -> Self {
        assert_eq!(
            self.dimension(),
            other.dimension(),
            "cannot compose operators of different dimension"
        );
        let rotation = &self.rotation * &other.rotation;
        let t1 = self.translation();
        let t2 = other.translation();
        let translation: Vec<Rational64> = (0..self.dimension())
            .map(|i| {
                (0..self.dimension()).fold(t1[i], |acc, j| {
                    acc + Rational64::from_integer(self.rotation[(i, j)] as i64) * t2[j]
                })
            })
            .collect();
        let time_reversal = match (self.time_reversal, other.time_reversal) {
            (0, 0) => 0,
            (0, b) => b,
            (a, 0) => a,
            (a, b) => a * b,
        };
        Self::from_raw(
            rotation,
            &translation,
            time_reversal,
            self.normalizable && other.normalizable,
        )
    }

    /// Exact inverse operation
    pub fn inverse(&self) -> crate::Result<Self> {
        let n = self.dimension();
        let inverse = self
            .rotation
            .map(|x| x as f64)
            .try_inverse()
            .ok_or_else(|| self.degenerate("rotation block is singular"))?;
        let rounded = inverse.map(|x| x.round() as i32);
        if &self.rotation * &rounded != DMatrix::identity(n, n) {
            return Err(self.degenerate("rotation block has no integer inverse"));
        }
        let t = self.translation();
        let translation: Vec<Rational64> = (0..n)
            .map(|i| {
                -(0..n).fold(Rational64::zero(), |acc, j| {
                    acc + Rational64::from_integer(rounded[(i, j)] as i64) * t[j]
                })
            })
            .collect();
        Ok(Self::from_raw(
            rounded,
            &translation,
            self.time_reversal,
            self.normalizable,
        ))
    }

    /// `self` applied `k` times (k = 0 gives the identity)
    pub fn power(&self, k: usize) -> Self {
        let mut result = Self::identity_with_modulation(self.modulation_dimension);
        result.normalizable = self.normalizable;
        for _ in 0..k {
            result = self.compose(&result);
        }
        result
    }

    /// Smallest k ≥ 1 with R^k = 1, or `None` for a non-crystallographic block
    pub fn operation_order(&self) -> Option<usize> {
        let n = self.dimension();
        let identity = DMatrix::<i32>::identity(n, n);
        let mut current = self.rotation.clone();
        for k in 1..=MAX_OPERATOR_POWER {
            if current == identity {
                return Some(k);
            }
            current = &self.rotation * &current;
        }
        None
    }

    /// Add a translation (e.g. a lattice vector) to this operator.
    ///
    /// The result is not finalized; normalizing it again folds the shift back.
    pub fn translated_by(&self, delta: &[Rational64]) -> Self {
        let translation: Vec<Rational64> = self
            .translation()
            .iter()
            .enumerate()
            .map(|(i, t)| *t + delta.get(i).copied().unwrap_or_else(Rational64::zero))
            .collect();
        Self::from_raw(
            self.rotation.clone(),
            &translation,
            self.time_reversal,
            self.normalizable,
        )
    }

    /// Copy of this operator with the translation exempt from range reduction
    pub fn as_non_normalizable(&self) -> Self {
        let mut op = Self::from_raw(
            self.rotation.clone(),
            &self.translation(),
            self.time_reversal,
            false,
        );
        op.finalized = true;
        op
    }

    /// Copy of this operator with a time-reversal flag
    pub fn with_time_reversal(&self, time_reversal: i8) -> Self {
        let mut op = Self::from_raw(
            self.rotation.clone(),
            &self.translation(),
            time_reversal.signum(),
            self.normalizable,
        );
        op.finalized = self.finalized;
        op
    }

    /// Finalize: reduce every translation component into `range`.
    ///
    /// Non-normalizable operators keep their literal translation.
    pub fn normalized(&self, range: TranslationRange) -> Self {
        let translation: Vec<Rational64> = if self.normalizable {
            self.translation()
                .into_iter()
                .map(|t| reduce_into_range(t, range))
                .collect()
        } else {
            self.translation()
        };
        let mut op = Self::from_raw(
            self.rotation.clone(),
            &translation,
            self.time_reversal,
            self.normalizable,
        );
        op.finalized = true;
        op
    }

    /// Finalize into the default `[0, 1)` range
    pub fn finalized(&self) -> Self {
        self.normalized(TranslationRange::Positive)
    }

    // ======================== GEOMETRY ========================

    /// Apply the real-space part of the operation to a fractional point
    pub fn apply(&self, point: &Vector3<f64>) -> Vector3<f64> {
        let rotation = self.rotation3().map(|x| x as f64);
        rotation * point + self.translation3()
    }

    /// 4×4 Seitz matrix of the real-space part
    pub fn seitz_matrix(&self) -> Matrix4<f64> {
        let t = self.translation3();
        let mut m = Matrix4::identity();
        for i in 0..3 {
            for j in 0..3 {
                m[(i, j)] = self.rotation[(i, j)] as f64;
            }
            m[(i, 3)] = t[i];
        }
        m
    }

    /// Augmented (4+d)×(4+d) matrix including modulation rows
    pub fn augmented_matrix(&self) -> DMatrix<f64> {
        let n = self.dimension();
        let mut m = DMatrix::identity(n + 1, n + 1);
        for i in 0..n {
            for j in 0..n {
                m[(i, j)] = self.rotation[(i, j)] as f64;
            }
            m[(i, n)] = self.translation[i] as f64 / self.divisor as f64;
        }
        m
    }

    // ======================== NOTATION & CLASSIFICATION ========================

    /// Canonical xyz string (cached)
    pub fn xyz(&self) -> &str {
        self.xyz.get_or_init(|| format_xyz(self, None))
    }

    /// xyz string with the translation shown in the given range
    pub fn xyz_in(&self, range: TranslationRange) -> String {
        format_xyz(self, Some(range))
    }

    /// Geometric classification (computed on first use, then cached)
    pub fn classify(&self) -> crate::Result<&ClassifiedOperator> {
        self.classification
            .get_or_init(|| classify(self))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub(crate) fn degenerate(&self, message: &str) -> SymmetryError {
        SymmetryError::NumericDegenerate {
            xyz: self.xyz().to_string(),
            message: message.to_string(),
        }
    }
}

impl PartialEq for SymmetryOperator {
    fn eq(&self, other: &Self) -> bool {
        self.rotation == other.rotation
            && self.translation == other.translation
            && self.divisor == other.divisor
            && self.time_reversal == other.time_reversal
            && self.normalizable == other.normalizable
    }
}

impl Eq for SymmetryOperator {}

impl Hash for SymmetryOperator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rotation.hash(state);
        self.translation.hash(state);
        self.divisor.hash(state);
        self.time_reversal.hash(state);
        self.normalizable.hash(state);
    }
}

impl fmt::Display for SymmetryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.xyz())
    }
}

impl FromStr for SymmetryOperator {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_xyz(s)
    }
}

/// Pack rationals into numerators over a shared divisor (12 when possible).
///
/// `None` when the common denominator or a numerator does not fit in an `i64`.
pub(crate) fn pack_translation(translation: &[Rational64]) -> Option<(Vec<i64>, i64)> {
    let lcm = translation.iter().try_fold(1i64, |acc, t| {
        (acc / acc.gcd(t.denom())).checked_mul(*t.denom())
    })?;
    let divisor = if TWELFTHS % lcm == 0 { TWELFTHS } else { lcm };
    let numerators = translation
        .iter()
        .map(|t| t.numer().checked_mul(divisor / t.denom()))
        .collect::<Option<Vec<i64>>>()?;
    Some((numerators, divisor))
}

/// Reduce a value into [0, 1) or [-1/2, 1/2)
pub(crate) fn reduce_into_range(value: Rational64, range: TranslationRange) -> Rational64 {
    match range {
        TranslationRange::Positive => value - value.floor(),
        TranslationRange::Symmetric => {
            let half = Rational64::new(1, 2);
            value - (value + half).floor()
        }
    }
}

