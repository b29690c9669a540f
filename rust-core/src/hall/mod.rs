// Hall module: Hall symbol grammar and generator construction
// Turns a terse symbol such as "-P 2ybc" into lattice, centrosymmetry and generator operators

// ======================== MODULE DECLARATIONS ========================
pub mod hall_symbol;

// Test modules
mod _tests_hall_symbol;

// ======================== HALL SYMBOLS ========================
pub use hall_symbol::{
    interpret,          // fn(text: &str) -> Result<HallInterpretation> - parse and decode in one step
    AxisDesignator,     // enum - X, Y, Z, Prime ('), DoublePrime ("), Star (*)
    HallInterpretation, // struct - lattice, centrosymmetric, generators, shifted inversion
    HallSymbol,         // struct - parsed symbol: lattice, centric flag, rotation terms, origin shift
    HallToken,          // struct - one rotation term: improper, order, screw, axis, subscripts
};
// HallSymbol impl methods:
//   parse(text: &str) -> Result<Self>                       - validate and parse
//   resolved_axes(&self) -> Result<Vec<AxisDesignator>>     - axes after positional defaults
//   generators(&self) -> Result<Vec<SymmetryOperator>>      - one finalized generator per term
//   inversion(&self) -> Option<SymmetryOperator>            - inversion through the shifted origin
//   interpretation(&self) -> Result<HallInterpretation>
