//! Crystallographic symmetry engine
//!
//! This library represents affine symmetry operations exactly (integer rotation
//! blocks, translations in twelfths), expands Hall symbols into complete
//! space-group operator sets, classifies individual operations geometrically and
//! transforms whole operator sets between settings, re-identifying them against
//! the catalog of 530 standard settings.

pub mod classification;
pub mod config;
pub mod errors;
pub mod groups;
pub mod hall;
pub mod interfaces;
pub mod operators;
pub mod settings;

pub use errors::SymmetryError;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, SymmetryError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A convenience prelude for importing common items.
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::classification::{ClassifiedOperator, GlideType, RotationSense, SymmetryKind};
    #[doc(no_inline)]
    pub use crate::groups::{LatticeSymbol, OperatorSet};
    #[doc(no_inline)]
    pub use crate::operators::SymmetryOperator;
    #[doc(no_inline)]
    pub use crate::settings::{BasisChange, SpaceGroupSetting};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_covers_a_full_round() {
        let set = OperatorSet::from_hall("-P 2ybc").unwrap();
        assert_eq!(set.len(), 4);
        assert_eq!(set.lattice(), Some(LatticeSymbol::P));

        let screw = "-x,1/2+y,1/2-z".parse::<SymmetryOperator>().unwrap();
        assert!(set.contains(&screw));
        assert_eq!(screw.classify().unwrap().kind, SymmetryKind::Screw(2));

        let moved = set.transformed(&BasisChange::parse("-a-c,b,a").unwrap()).unwrap();
        assert_eq!(moved.len(), 4);
        assert_eq!(moved.standardized().unwrap().canonical_key(), set.canonical_key());
    }
}
