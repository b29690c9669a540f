// Settings module: changes of basis, setting transforms and the reference catalog
// Re-expresses operator sets in other cells and recognizes them among the 530 tabulated settings

// ======================== MODULE DECLARATIONS ========================
pub mod basis_change;
pub mod catalog;
mod catalog_data;
pub mod setting_transformer;

// Test modules
mod _tests_basis_change;
mod _tests_catalog;
mod _tests_setting_transformer;

// ======================== BASIS CHANGES ========================
pub use basis_change::BasisChange; // struct - rational P (new basis vectors as columns) + origin shift p
// BasisChange impl methods:
//   new(matrix, origin_shift) -> Result<Self>                 - rejects singular P
//   parse(text: &str) -> Result<Self>                         - "a-b,a+b,c;1/2,0,0"
//   inverse(&self) -> Self / then(&self, next) -> Self        - group operations on settings
//   transform_operator(&self, op) -> Result<SymmetryOperator> - W' = P⁻¹WP, w' = P⁻¹(w + Wp - p)

// ======================== CATALOG ========================
pub use catalog::{
    all_settings,      // fn() -> &'static [SpaceGroupSetting]
    lookup,            // fn(key: &str) -> Result<&'static SpaceGroupSetting>
    point_group_order, // fn(number: u16) -> usize
    settings_of,       // fn(number: u16) -> impl Iterator<Item = &'static SpaceGroupSetting>
    CrystalSystem,     // enum - Triclinic .. Cubic
    SpaceGroupSetting, // struct - number, setting code, HM and Hall symbols, cached operators
};

// ======================== TRANSFORMS ========================
pub use setting_transformer::{
    identify,  // fn(set: &OperatorSet) -> Option<&'static SpaceGroupSetting>
    transform, // fn(set: &OperatorSet, basis: &BasisChange) -> Result<OperatorSet>
};
