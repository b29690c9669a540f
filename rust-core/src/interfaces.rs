// Definitions that are used throughout all modules

use serde::{Deserialize, Serialize};

// Canonical interval for finalized translation components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TranslationRange {
    /// [0, 1)
    #[default]
    Positive,
    /// [-1/2, 1/2)
    Symmetric,
}
