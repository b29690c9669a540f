use std::fmt;
use std::str::FromStr;

use nalgebra::{DMatrix, Matrix3, Vector3};
use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::errors::SymmetryError;
use crate::operators::symmetry_operator::pack_translation;
use crate::operators::{format_fraction, parse_linear_expression, parse_number, SymmetryOperator};

const BASIS_LABELS: [&str; 3] = ["a", "b", "c"];

/// A change of setting `(P, p)`.
///
/// The columns of `P` are the new basis vectors written in the old basis and
/// `p` is the new origin in old fractional coordinates. Operators transform as
/// `W' = P⁻¹·W·P`, `w' = P⁻¹·(w + W·p - p)`, points as `x' = P⁻¹·(x - p)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasisChange {
    matrix: Matrix3<Rational64>,
    origin_shift: Vector3<Rational64>,
}

impl BasisChange {
    pub fn new(
        matrix: Matrix3<Rational64>,
        origin_shift: Vector3<Rational64>,
    ) -> crate::Result<Self> {
        let text = format_setting(&matrix, &origin_shift);
        Self::validated(matrix, origin_shift, &text)
    }

    /// P must be invertible, with det and P⁻¹ representable in `Rational64`
    fn validated(
        matrix: Matrix3<Rational64>,
        origin_shift: Vector3<Rational64>,
        text: &str,
    ) -> crate::Result<Self> {
        let too_large = || SymmetryError::parse(text, "basis coefficients are too large");
        let det = checked_determinant(&matrix).ok_or_else(too_large)?;
        // A singular P maps the cell onto a plane or a line
        if det.is_zero() {
            return Err(SymmetryError::parse(text, "basis vectors are linearly dependent"));
        }
        checked_inverse(&matrix, &det).ok_or_else(too_large)?;
        Ok(BasisChange {
            matrix,
            origin_shift,
        })
    }

    pub fn identity() -> Self {
        BasisChange {
            matrix: Matrix3::identity(),
            origin_shift: Vector3::zeros(),
        }
    }

    pub fn from_integer_matrix(matrix: Matrix3<i32>) -> crate::Result<Self> {
        Self::new(
            matrix.map(|x| Rational64::from_integer(x as i64)),
            Vector3::zeros(),
        )
    }

    /// Pure origin shift, `P = I`
    pub fn origin_shift_only(shift: Vector3<Rational64>) -> Self {
        BasisChange {
            matrix: Matrix3::identity(),
            origin_shift: shift,
        }
    }

    /// Parse `"a-b,a+b,c"` or `"a-b,a+b,c;1/2,0,0"`.
    ///
    /// Each comma-separated entry is one new basis vector as a rational
    /// combination of the old `a`, `b`, `c`; the optional part after `;`
    /// is the origin shift.
    pub fn parse(text: &str) -> crate::Result<Self> {
        let (linear, shift) = match text.split_once(';') {
            Some((linear, shift)) => (linear, Some(shift)),
            None => (text, None),
        };

        let vectors: Vec<&str> = linear.split(',').map(str::trim).collect();
        if vectors.len() != 3 {
            return Err(SymmetryError::parse(
                text,
                format!("expected 3 basis vectors, found {}", vectors.len()),
            ));
        }

        let mut matrix = Matrix3::zeros();
        for (j, vector) in vectors.iter().enumerate() {
            let (coefficients, constant) = parse_linear_expression(vector, &BASIS_LABELS)
                .map_err(|message| SymmetryError::parse(text, message))?;
            if !constant.is_zero() {
                return Err(SymmetryError::parse(
                    text,
                    format!("basis vector '{}' has a constant term", vector),
                ));
            }
            for (i, c) in coefficients.into_iter().enumerate() {
                matrix[(i, j)] = c;
            }
        }

        let origin_shift = match shift {
            Some(shift) => parse_shift(shift, text)?,
            None => Vector3::zeros(),
        };

        Self::validated(matrix, origin_shift, text)
    }

    // ======================== ACCESSORS ========================

    /// `P`: new basis vectors as columns
    pub fn matrix(&self) -> &Matrix3<Rational64> {
        &self.matrix
    }

    /// `p`: new origin in old fractional coordinates
    pub fn origin_shift(&self) -> &Vector3<Rational64> {
        &self.origin_shift
    }

    /// Volume ratio new cell / old cell
    pub fn determinant(&self) -> Rational64 {
        determinant(&self.matrix)
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix3::identity() && self.origin_shift.iter().all(Zero::is_zero)
    }

    /// `P⁻¹`
    pub fn inverse_matrix(&self) -> Matrix3<Rational64> {
        // Construction checked that det is non-zero and that P⁻¹ fits in Rational64
        let det = self.determinant();
        adjugate(&self.matrix).map(|x| x / det)
    }

    // ======================== ALGEBRA ========================

    /// `(P⁻¹, -P⁻¹·p)`
    pub fn inverse(&self) -> Self {
        let matrix = self.inverse_matrix();
        let origin_shift = -(matrix * self.origin_shift);
        BasisChange {
            matrix,
            origin_shift,
        }
    }

    /// Apply `self`, then `next` (expressed in the basis produced by `self`)
    pub fn then(&self, next: &BasisChange) -> Self {
        BasisChange {
            matrix: self.matrix * next.matrix,
            origin_shift: self.origin_shift + self.matrix * next.origin_shift,
        }
    }

    // ======================== ACTION ========================

    /// `W' = P⁻¹·W·P`, `w' = P⁻¹·(w + W·p - p)`; modulation rows pass through unchanged.
    ///
    /// Fails with `IncompatibleBasis` when `W'` is not an integer matrix,
    /// i.e. the operator is not a symmetry of the new lattice, and with
    /// `NumericDegenerate` when the exact arithmetic overflows.
    pub fn transform_operator(&self, op: &SymmetryOperator) -> crate::Result<SymmetryOperator> {
        let overflow = || SymmetryError::NumericDegenerate {
            xyz: op.xyz().to_string(),
            message: format!("transforming by '{}' overflows", self),
        };
        let n = op.dimension();
        let p = embed(&self.matrix, n);
        let p_inverse = embed(&self.inverse_matrix(), n);
        let w: DMatrix<Rational64> = op.rotation().map(|x| Rational64::from_integer(x as i64));

        let rotation = checked_product(&p_inverse, &w)
            .and_then(|pw| checked_product(&pw, &p))
            .ok_or_else(overflow)?;
        if rotation.iter().any(|x| !x.is_integer()) {
            return Err(SymmetryError::IncompatibleBasis {
                basis: self.to_string(),
                xyz: op.xyz().to_string(),
            });
        }
        let rotation = rotation
            .iter()
            .map(|x| i32::try_from(x.to_integer()).ok())
            .collect::<Option<Vec<i32>>>()
            .map(|entries| DMatrix::from_column_slice(n, n, &entries))
            .ok_or_else(overflow)?;

        let shift = DMatrix::from_fn(n, 1, |i, _| {
            if i < 3 {
                self.origin_shift[i]
            } else {
                Rational64::zero()
            }
        });
        let t = op.translation();
        let w_shift = checked_product(&w, &shift).ok_or_else(overflow)?;
        let inner = (0..n)
            .map(|i| t[i].checked_add(&w_shift[(i, 0)])?.checked_sub(&shift[(i, 0)]))
            .collect::<Option<Vec<Rational64>>>()
            .ok_or_else(overflow)?;
        let translation = checked_product(&p_inverse, &DMatrix::from_column_slice(n, 1, &inner))
            .filter(|t| pack_translation(t.as_slice()).is_some())
            .ok_or_else(overflow)?;

        Ok(SymmetryOperator::from_raw(
            rotation,
            translation.as_slice(),
            op.time_reversal(),
            op.is_normalizable(),
        ))
    }

    /// Fractional point in the new setting, `x' = P⁻¹·(x - p)`
    pub fn transform_point(&self, point: &Vector3<Rational64>) -> Vector3<Rational64> {
        self.inverse_matrix() * (point - self.origin_shift)
    }

    /// Lattice or centering vector in the new setting, `v' = P⁻¹·v`
    pub fn transform_vector(&self, vector: &Vector3<Rational64>) -> Vector3<Rational64> {
        self.inverse_matrix() * vector
    }
}

impl Default for BasisChange {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for BasisChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_setting(&self.matrix, &self.origin_shift))
    }
}

impl FromStr for BasisChange {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BasisChange::parse(s)
    }
}

// ========================= Helpers =========================

fn determinant(m: &Matrix3<Rational64>) -> Rational64 {
    m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
        - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
        + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
}

/// Transposed cofactor matrix, `adj(M)·M = det(M)·I`
fn adjugate(m: &Matrix3<Rational64>) -> Matrix3<Rational64> {
    let cofactor = |r0: usize, r1: usize, c0: usize, c1: usize| {
        m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)]
    };
    Matrix3::new(
        cofactor(1, 2, 1, 2),
        -cofactor(0, 2, 1, 2),
        cofactor(0, 1, 1, 2),
        -cofactor(1, 2, 0, 2),
        cofactor(0, 2, 0, 2),
        -cofactor(0, 1, 0, 2),
        cofactor(1, 2, 0, 1),
        -cofactor(0, 2, 0, 1),
        cofactor(0, 1, 0, 1),
    )
}

/// a·d - b·c, `None` on overflow
fn checked_minor(
    a: &Rational64,
    b: &Rational64,
    c: &Rational64,
    d: &Rational64,
) -> Option<Rational64> {
    a.checked_mul(d)?.checked_sub(&b.checked_mul(c)?)
}

fn checked_determinant(m: &Matrix3<Rational64>) -> Option<Rational64> {
    let first = m[(0, 0)].checked_mul(&checked_minor(&m[(1, 1)], &m[(1, 2)], &m[(2, 1)], &m[(2, 2)])?)?;
    let second = m[(0, 1)].checked_mul(&checked_minor(&m[(1, 0)], &m[(1, 2)], &m[(2, 0)], &m[(2, 2)])?)?;
    let third = m[(0, 2)].checked_mul(&checked_minor(&m[(1, 0)], &m[(1, 1)], &m[(2, 0)], &m[(2, 1)])?)?;
    first.checked_sub(&second)?.checked_add(&third)
}

/// adj(M) / det, `None` on overflow
fn checked_inverse(m: &Matrix3<Rational64>, det: &Rational64) -> Option<Matrix3<Rational64>> {
    let mut inverse = Matrix3::zeros();
    for i in 0..3 {
        for j in 0..3 {
            // Cofactor of (j, i): rows and columns other than j and i
            let (r0, r1) = others(j);
            let (c0, c1) = others(i);
            let minor = checked_minor(&m[(r0, c0)], &m[(r0, c1)], &m[(r1, c0)], &m[(r1, c1)])?;
            let cofactor = if (i + j) % 2 == 0 { minor } else { -minor };
            inverse[(i, j)] = cofactor.checked_div(det)?;
        }
    }
    Some(inverse)
}

fn others(k: usize) -> (usize, usize) {
    match k {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// Exact matrix product, `None` on overflow
fn checked_product(a: &DMatrix<Rational64>, b: &DMatrix<Rational64>) -> Option<DMatrix<Rational64>> {
    let mut product = DMatrix::zeros(a.nrows(), b.ncols());
    for i in 0..a.nrows() {
        for j in 0..b.ncols() {
            let mut sum = Rational64::zero();
            for k in 0..a.ncols() {
                sum = sum.checked_add(&a[(i, k)].checked_mul(&b[(k, j)])?)?;
            }
            product[(i, j)] = sum;
        }
    }
    Some(product)
}

/// diag(M, I) of size n
fn embed(m: &Matrix3<Rational64>, n: usize) -> DMatrix<Rational64> {
    DMatrix::from_fn(n, n, |i, j| {
        if i < 3 && j < 3 {
            m[(i, j)]
        } else if i == j {
            Rational64::one()
        } else {
            Rational64::zero()
        }
    })
}

fn parse_shift(text: &str, full: &str) -> crate::Result<Vector3<Rational64>> {
    let values = text
        .split(',')
        .map(|s| {
            parse_number(s)
                .ok_or_else(|| SymmetryError::parse(full, format!("bad origin shift '{}'", s.trim())))
        })
        .collect::<crate::Result<Vec<_>>>()?;
    match values.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(SymmetryError::parse(full, "origin shift needs three components")),
    }
}

fn format_setting(matrix: &Matrix3<Rational64>, origin_shift: &Vector3<Rational64>) -> String {
    let vectors: Vec<String> = (0..3)
        .map(|j| format_vector(&[matrix[(0, j)], matrix[(1, j)], matrix[(2, j)]]))
        .collect();
    let mut text = vectors.join(",");
    if origin_shift.iter().any(|x| !x.is_zero()) {
        let shift: Vec<String> = origin_shift.iter().map(|x| format_fraction(*x)).collect();
        text.push(';');
        text.push_str(&shift.join(","));
    }
    text
}

/// `[1, -1, 0]` -> `"a-b"`, `[1/2, 0, 0]` -> `"1/2a"`
fn format_vector(coefficients: &[Rational64; 3]) -> String {
    let mut text = String::new();
    for (c, label) in coefficients.iter().zip(BASIS_LABELS) {
        if c.is_zero() {
            continue;
        }
        text.push(if c.is_negative() { '-' } else { '+' });
        let magnitude = c.abs();
        if !magnitude.is_one() {
            text.push_str(&format_fraction(magnitude));
        }
        text.push_str(label);
    }
    match text.strip_prefix('+') {
        Some(stripped) => stripped.to_string(),
        None if text.is_empty() => "0".to_string(),
        None => text,
    }
}
