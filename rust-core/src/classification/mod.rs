// Classification module: geometric meaning of a single symmetry operator
// Rotation type, axis or plane, intrinsic translation and location

// ======================== MODULE DECLARATIONS ========================
pub mod classified_operator;
pub mod operator_classifier;

// Test modules
mod _tests_operator_classifier;

// ======================== CLASSIFIED OPERATOR ========================
pub use classified_operator::{
    ClassifiedOperator, // struct - kind, order, axis, plane, intrinsic/location translation, fixed point
    GlideType,          // enum - A, B, C, N, D, G
    RotationSense,      // enum - Clockwise, CounterClockwise
    SymmetryKind,       // enum - Identity, Translation, Rotation(n), Screw(n), Inversion, Rotoinversion(n), Mirror, Glide(g)
};
// ClassifiedOperator impl methods:
//   screw_index(&self) -> Option<u8>          - k of an n_k screw
//   axis_indices(&self) -> Option<[i32; 3]>   - integer axis direction
//   intersects_unit_cell(&self) -> bool       - element meets [0,1]³
//   description(&self) -> String              - human-readable summary

// ======================== CLASSIFIER ========================
pub use operator_classifier::classify; // fn(op: &SymmetryOperator) -> Result<ClassifiedOperator>
