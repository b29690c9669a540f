// Groups module: lattice centering, group generation and derived operators
// Produces the complete, deduplicated operator list of one space group

// ======================== MODULE DECLARATIONS ========================
pub mod derived_operators;
pub mod lattice_centering;
pub mod operator_set;

// Test modules
mod _tests_derived_operators;
mod _tests_lattice_centering;
mod _tests_operator_set;

// ======================== LATTICE SYMBOLS ========================
pub use lattice_centering::LatticeSymbol; // enum - P, A, B, C, I, F, R, S, T
// LatticeSymbol impl methods:
//   from_char(c: char) -> Option<Self>
//   centering_vectors(&self) -> Vec<[Rational64; 3]>      - non-zero centering translations
//   multiplicity(&self) -> usize                          - lattice points per cell
//   from_centering_vectors(v: &[Vec<Rational64>]) -> Option<Self>

// ======================== OPERATOR SETS ========================
pub use operator_set::OperatorSet; // struct - finalized operators, lattice, centering, identification
// OperatorSet impl methods:
//   generate(generators, lattice, centrosymmetric) -> Self             - closure + centering + inversion
//   generate_with_inversion(generators, lattice, inversion) -> Self    - same with an off-origin inversion
//   from_hall(symbol: &str) -> Result<Self>
//   from_generators_xyz(list: &str) -> Result<Self>                    - "x,y,z;-x,-y,-z"
//   from_operators(operators: Vec<SymmetryOperator>) -> Self
//   from_key(key: &str) -> Result<Self>                                - catalog key, Hall symbol or xyz list
//   from_key_or_identity(key: &str) -> Self                            - identity-only fallback with a warning
//   canonical_key(&self) -> String                                     - sorted xyz strings joined by ';'
//   classified(&self) -> Vec<(&SymmetryOperator, &ClassifiedOperator)>
//   expanded(&self, options: &ExpansionOptions) -> Vec<SymmetryOperator>

// ======================== DERIVED OPERATORS ========================
pub use derived_operators::{
    expand,           // fn(set: &OperatorSet, options: &ExpansionOptions) -> Vec<SymmetryOperator>
    ExpansionOptions, // struct - range and cell restriction, with_* builders
};
