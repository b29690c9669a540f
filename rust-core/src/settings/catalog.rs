use std::fmt;
use std::sync::OnceLock;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::SymmetryError;
use crate::groups::{LatticeSymbol, OperatorSet};
use crate::hall::HallSymbol;
use crate::settings::basis_change::BasisChange;
use crate::settings::catalog_data::SETTINGS;
use crate::settings::setting_transformer::identify;

/// A crystal system as defined in ITA 2.1.1.1. Together with a centering
/// type it fixes the Bravais lattice.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrystalSystem {
    Triclinic,
    Monoclinic,
    Orthorhombic,
    Tetragonal,
    Trigonal,
    Hexagonal,
    Cubic,
}

impl CrystalSystem {
    pub fn from_number(number: u16) -> Option<Self> {
        match number {
            1..=2 => Some(CrystalSystem::Triclinic),
            3..=15 => Some(CrystalSystem::Monoclinic),
            16..=74 => Some(CrystalSystem::Orthorhombic),
            75..=142 => Some(CrystalSystem::Tetragonal),
            143..=167 => Some(CrystalSystem::Trigonal),
            168..=194 => Some(CrystalSystem::Hexagonal),
            195..=230 => Some(CrystalSystem::Cubic),
            _ => None,
        }
    }

    /// Crystal family: `Trigonal` becomes `Hexagonal`, everything else is unchanged.
    pub fn family(&self) -> Self {
        match *self {
            Self::Trigonal => Self::Hexagonal,
            other => other,
        }
    }
}

/// One of the 530 tabulated Hall settings.
///
/// The operator set is generated from the Hall symbol on first access and
/// cached for the lifetime of the process.
#[derive(Debug)]
pub struct SpaceGroupSetting {
    number: u16,
    setting: &'static str,
    hm: &'static str,
    hall: &'static str,
    operators: OnceLock<Result<OperatorSet, SymmetryError>>,
    canonical: OnceLock<Option<String>>,
}

impl SpaceGroupSetting {
    fn from_row(id: &'static str, hm: &'static str, hall: &'static str) -> Option<Self> {
        let (number, setting) = id.split_once(':').unwrap_or((id, ""));
        Some(SpaceGroupSetting {
            number: number.parse().ok()?,
            setting,
            hm,
            hall,
            operators: OnceLock::new(),
            canonical: OnceLock::new(),
        })
    }

    // ======================== IDENTITY ========================

    /// International Tables number, 1..=230
    pub fn number(&self) -> u16 {
        self.number
    }

    /// Setting code such as `b1`, `cab`, `2` or `H`; empty for a number's only setting
    pub fn setting(&self) -> &'static str {
        self.setting
    }

    /// `"14:b1"`, or just the number when there is a single setting
    pub fn id(&self) -> String {
        if self.setting.is_empty() {
            self.number.to_string()
        } else {
            format!("{}:{}", self.number, self.setting)
        }
    }

    /// Full Hermann-Mauguin symbol, e.g. `P 1 21/c 1`
    pub fn hm(&self) -> &'static str {
        self.hm
    }

    /// Hermann-Mauguin symbol with monoclinic `1` placeholders dropped, e.g. `P 21/c`
    pub fn short_hm(&self) -> String {
        let mut parts: Vec<&str> = self.hm.split_whitespace().collect();
        if CrystalSystem::from_number(self.number) == Some(CrystalSystem::Monoclinic)
            && parts.len() == 4
        {
            let lattice = parts.remove(0);
            let axis: Vec<&str> = parts.into_iter().filter(|p| *p != "1").collect();
            if axis.len() == 1 {
                return format!("{} {}", lattice, axis[0]);
            }
        }
        self.hm.to_string()
    }

    pub fn hall(&self) -> &'static str {
        self.hall
    }

    pub fn hall_symbol(&self) -> crate::Result<HallSymbol> {
        HallSymbol::parse(self.hall)
    }

    /// Origin choice `1` or `2` for groups tabulated with two origins
    pub fn origin_choice(&self) -> Option<u8> {
        match self.setting.chars().next() {
            Some(c @ ('1' | '2')) => Some(c as u8 - b'0'),
            _ => None,
        }
    }

    // ======================== CLASSIFICATION ========================

    /// Lattice symbol of the Hall symbol (rhombohedral axes give `P`)
    pub fn lattice(&self) -> LatticeSymbol {
        self.hall
            .trim_start_matches('-')
            .chars()
            .next()
            .and_then(LatticeSymbol::from_char)
            .unwrap_or(LatticeSymbol::P)
    }

    pub fn crystal_system(&self) -> CrystalSystem {
        CrystalSystem::from_number(self.number).unwrap_or(CrystalSystem::Triclinic)
    }

    /// Order of the point group of this space-group type
    pub fn point_group_order(&self) -> usize {
        point_group_order(self.number)
    }

    /// Operators per conventional cell: point-group order × lattice points
    pub fn expected_order(&self) -> usize {
        self.point_group_order() * self.lattice().multiplicity()
    }

    // ======================== OPERATORS ========================

    pub fn operators(&self) -> crate::Result<&OperatorSet> {
        self.operators
            .get_or_init(|| {
                let set = OperatorSet::from_hall(self.hall)?
                    .with_metadata(Some(self.id()), BasisChange::identity());
                if set.len() != self.expected_order() {
                    warn!(
                        "Setting {} ({}) generated {} operators, expected {}",
                        self.id(),
                        self.hall,
                        set.len(),
                        self.expected_order()
                    );
                }
                Ok(set)
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Sorted canonical operator list, used to recognize equivalent sets
    pub fn canonical_key(&self) -> Option<&str> {
        self.canonical
            .get_or_init(|| self.operators().ok().map(OperatorSet::canonical_key))
            .as_deref()
    }

    fn matches_hm(&self, wanted: &str, extension: Option<&str>) -> bool {
        let symbol_matches =
            normalize_hm(self.hm) == wanted || normalize_hm(&self.short_hm()) == wanted;
        let extension_matches = match extension {
            None => true,
            Some(ext) => {
                self.setting.eq_ignore_ascii_case(ext)
                    || (ext.len() == 1
                        && self.origin_choice().map(|c| c.to_string()).as_deref() == Some(ext))
            }
        };
        symbol_matches && extension_matches
    }
}

impl fmt::Display for SpaceGroupSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (Hall: {})", self.id(), self.hm, self.hall)
    }
}

// ======================== CATALOG ========================

static CATALOG: OnceLock<Vec<SpaceGroupSetting>> = OnceLock::new();

/// All 530 settings in table order
pub fn all_settings() -> &'static [SpaceGroupSetting] {
    CATALOG.get_or_init(|| {
        SETTINGS
            .iter()
            .filter_map(|&(id, hm, hall)| SpaceGroupSetting::from_row(id, hm, hall))
            .collect()
    })
}

/// Settings of one International Tables number, in table order
pub fn settings_of(number: u16) -> impl Iterator<Item = &'static SpaceGroupSetting> {
    all_settings().iter().filter(move |s| s.number == number)
}

/// Resolve a catalog key.
///
/// Accepted forms: `"14"` (first setting), `"14.2"` (second setting),
/// `"14:b2"`, `"HM:P 1 21/c 1"` (optional `:ext`), `"Hall:-P 2ybc"` and
/// a `;`-separated xyz list. Unprefixed text is tried as a Hermann-Mauguin
/// symbol first, then as a Hall symbol.
pub fn lookup(key: &str) -> crate::Result<&'static SpaceGroupSetting> {
    let trimmed = key.trim();
    let miss = || SymmetryError::LookupMiss(key.to_string());
    if trimmed.is_empty() {
        return Err(miss());
    }

    let found = if let Some(rest) = strip_prefix_ignore_case(trimmed, "HM:") {
        by_hm(rest)
    } else if let Some(rest) = strip_prefix_ignore_case(trimmed, "Hall:") {
        by_hall(rest)
    } else if trimmed.contains(',') {
        identify(&OperatorSet::from_generators_xyz(trimmed)?)
    } else if let Some(by_number) = by_number(trimmed) {
        by_number
    } else {
        by_hm(trimmed).or_else(|| by_hall(trimmed))
    };

    match found {
        Some(setting) => {
            debug!("Catalog key '{}' resolved to {}", key, setting.id());
            Ok(setting)
        }
        None => Err(miss()),
    }
}

/// `Some(result)` when `text` is a numeric key, `None` when it is not numeric at all
fn by_number(text: &str) -> Option<Option<&'static SpaceGroupSetting>> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let number: u16 = text[..end].parse().ok()?;
    let rest = &text[end..];

    let mut candidates = settings_of(number);
    let found = if rest.is_empty() {
        candidates.next()
    } else if let Some(index) = rest.strip_prefix('.') {
        match index.trim().parse::<usize>() {
            Ok(k) if k > 0 => candidates.nth(k - 1),
            _ => None,
        }
    } else if let Some(code) = rest.strip_prefix(':') {
        let code = code.trim();
        candidates.find(|s| s.setting.eq_ignore_ascii_case(code))
    } else {
        return None;
    };
    Some(found)
}

fn by_hm(text: &str) -> Option<&'static SpaceGroupSetting> {
    let (symbol, extension) = match text.rsplit_once(':') {
        Some((symbol, ext)) => (symbol, Some(ext.trim())),
        None => (text, None),
    };
    let wanted = normalize_hm(symbol);
    if wanted.is_empty() {
        return None;
    }
    all_settings()
        .iter()
        .find(|s| s.matches_hm(&wanted, extension))
}

fn by_hall(text: &str) -> Option<&'static SpaceGroupSetting> {
    let wanted = HallSymbol::parse(text).ok()?.to_string();
    all_settings()
        .iter()
        .find(|s| s.hall.eq_ignore_ascii_case(&wanted))
}

fn normalize_hm(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Point-group order of the space-group type with this number
pub fn point_group_order(number: u16) -> usize {
    match number {
        1 => 1,
        2 => 2,
        3..=9 => 2,
        10..=46 => 4,
        47..=74 => 8,
        75..=82 => 4,
        83..=122 => 8,
        123..=142 => 16,
        143..=146 => 3,
        147..=161 => 6,
        162..=167 => 12,
        168..=174 => 6,
        175..=190 => 12,
        191..=194 => 24,
        195..=199 => 12,
        200..=220 => 24,
        221..=230 => 48,
        _ => 0,
    }
}
