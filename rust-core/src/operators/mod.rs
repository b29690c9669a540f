// Operators module: exact affine symmetry operators and their textual notation
// This module provides the value type every other module builds on

// ======================== MODULE DECLARATIONS ========================
pub mod symmetry_operator;
pub mod xyz_notation;

// Test modules
mod _tests_symmetry_operator;
mod _tests_xyz_notation;

// ======================== SYMMETRY OPERATOR ========================
pub use symmetry_operator::SymmetryOperator; // struct - Seitz operator: integer rotation block + exact translation
// SymmetryOperator impl methods:
//   new(rotation: DMatrix<i32>, translation: &[Rational64]) -> Result<Self>  - general (3+d)-dimensional operator
//   from_seitz(rotation: Matrix3<i32>, twelfths: [i64; 3]) -> Self          - 3D operator with translation in twelfths
//   identity() / identity_with_modulation(d) / inversion(d) / pure_translation(t)
//   compose(&self, other: &Self) -> Self                                    - self · other
//   inverse(&self) -> Result<Self>                                          - exact inverse
//   power(&self, k: usize) -> Self                                          - k-fold application
//   operation_order(&self) -> Option<usize>                                 - smallest k with R^k = 1
//   translated_by(&self, delta: &[Rational64]) -> Self                      - add a lattice/centering vector
//   normalized(&self, range: TranslationRange) -> Self                      - finalize translation into range
//   apply(&self, point: &Vector3<f64>) -> Vector3<f64>                      - act on a fractional point
//   seitz_matrix(&self) -> Matrix4<f64>                                     - 4×4 real-space matrix
//   xyz(&self) -> &str                                                      - cached canonical notation
//   classify(&self) -> Result<&ClassifiedOperator>                          - cached geometric classification

// ======================== XYZ NOTATION ========================
pub use xyz_notation::{
    format_fraction,         // fn(value: Rational64) -> String - lowest-terms fraction
    format_matrix,           // fn(op: &SymmetryOperator) -> String - "[[r,r,r,t],...,[0,0,0,1]]"
    format_xyz,              // fn(op: &SymmetryOperator, range: Option<TranslationRange>) -> String
    parse_linear_expression, // fn(expr: &str, labels: &[&str]) -> Result<(Vec<Rational64>, Rational64), String>
    parse_number,            // fn(text: &str) -> Option<Rational64> - "1/2", "0.5", "3"
    parse_xyz,               // fn(text: &str) -> Result<SymmetryOperator>
};
