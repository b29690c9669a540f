// Constants

// Translation encoding
pub const TWELFTHS: i64 = 12; // Implicit denominator of crystallographic translations

// Tolerances
pub const CLASSIFY_TOLERANCE: f64 = 1e-6; // Snapping of points and vectors during classification
pub const DECIMAL_TOLERANCE: f64 = 1e-3; // Decimal translations ("0.3333") to fractions
pub const MAX_DECIMAL_DENOMINATOR: i64 = 48;

// Parsing limits
pub const MAX_PARSED_MAGNITUDE: i64 = 1 << 20; // Largest numerator or denominator accepted from text

// Group construction limits
pub const MAX_GROUP_ORDER: usize = 1536; // Closure guard against inconsistent generators
pub const MAX_OPERATOR_POWER: usize = 24; // Crystallographic operators need at most 6 (12 for modulated)

// Derived operator expansion
pub const DEFAULT_EXPANSION_RANGE: i32 = 1;
// Longest intrinsic translation (fractional length) of an expanded element, by order.
// The limits are the face-diagonal 2_1, the body-diagonal 3_1 and the 4_2 / 6_3 screws.
pub const MAX_INTRINSIC_LENGTH: [(u8, f64); 4] = [(2, 0.71), (3, 0.58), (4, 0.51), (6, 0.51)];
