use std::fmt;
use std::str::FromStr;

use log::debug;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

use crate::config::TWELFTHS;
use crate::errors::SymmetryError;
use crate::groups::LatticeSymbol;
use crate::operators::SymmetryOperator;

/// Axis designator of a rotation term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDesignator {
    X,
    Y,
    Z,
    /// `'`: face diagonal perpendicular to the preceding axis, first kind
    Prime,
    /// `"`: face diagonal perpendicular to the preceding axis, second kind
    DoublePrime,
    /// `*`: body diagonal a+b+c
    Star,
}

impl AxisDesignator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'x' | 'X' => Some(AxisDesignator::X),
            'y' | 'Y' => Some(AxisDesignator::Y),
            'z' | 'Z' => Some(AxisDesignator::Z),
            '\'' => Some(AxisDesignator::Prime),
            '"' => Some(AxisDesignator::DoublePrime),
            '*' => Some(AxisDesignator::Star),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            AxisDesignator::X => 'x',
            AxisDesignator::Y => 'y',
            AxisDesignator::Z => 'z',
            AxisDesignator::Prime => '\'',
            AxisDesignator::DoublePrime => '"',
            AxisDesignator::Star => '*',
        }
    }

    fn is_principal(&self) -> bool {
        matches!(self, AxisDesignator::X | AxisDesignator::Y | AxisDesignator::Z)
    }
}

/// One rotation term of a Hall symbol, e.g. `-4bd` or `2"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallToken {
    pub improper: bool,
    /// Rotation order: 1, 2, 3, 4 or 6
    pub order: u8,
    /// Screw digit, 0 when absent
    pub screw: u8,
    /// Axis as written; `None` means the positional default applies
    pub axis: Option<AxisDesignator>,
    /// Translation subscript letters in the order written
    pub subscripts: Vec<char>,
}

impl HallToken {
    fn parse(text: &str, symbol: &str) -> crate::Result<Self> {
        let mut chars = text.chars().peekable();
        let improper = chars.next_if_eq(&'-').is_some();

        let order = match chars.next() {
            Some(c @ ('1' | '2' | '3' | '4' | '6')) => c as u8 - b'0',
            Some(c) => {
                return Err(SymmetryError::hall(
                    symbol,
                    &format!("'{}' is not a rotation order in term '{}'", c, text),
                ))
            }
            None => return Err(SymmetryError::hall(symbol, "empty rotation term")),
        };

        let mut screw = 0;
        if let Some(c) = chars.next_if(|c| ('1'..='5').contains(c)) {
            screw = c as u8 - b'0';
            if screw >= order {
                return Err(SymmetryError::hall(
                    symbol,
                    &format!("screw {} is not below the order in term '{}'", screw, text),
                ));
            }
        }

        let mut axis = None;
        let mut subscripts = Vec::new();
        for c in chars {
            if let Some(designator) = AxisDesignator::from_char(c) {
                if axis.replace(designator).is_some() {
                    return Err(SymmetryError::hall(
                        symbol,
                        &format!("more than one axis in term '{}'", text),
                    ));
                }
            } else if subscript_twelfths(c).is_some() {
                subscripts.push(c);
            } else {
                return Err(SymmetryError::hall(
                    symbol,
                    &format!("unknown code '{}' in term '{}'", c, text),
                ));
            }
        }

        Ok(HallToken {
            improper,
            order,
            screw,
            axis,
            subscripts,
        })
    }
}

impl fmt::Display for HallToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.improper {
            write!(f, "-")?;
        }
        write!(f, "{}", self.order)?;
        if self.screw > 0 {
            write!(f, "{}", self.screw)?;
        }
        if let Some(axis) = self.axis {
            write!(f, "{}", axis.symbol())?;
        }
        for c in &self.subscripts {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// A parsed Hall symbol: `[-]L T1 T2 ... [(Δx Δy Δz)]`.
///
/// The origin shift is kept in twelfths and folded into every generator by
/// conjugation, `t' = t + v - R·v`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallSymbol {
    centric: bool,
    lattice: LatticeSymbol,
    tokens: Vec<HallToken>,
    origin_shift: [i64; 3],
}

/// Lattice, centrosymmetry and generators decoded from a Hall symbol
#[derive(Debug, Clone)]
pub struct HallInterpretation {
    pub lattice: LatticeSymbol,
    pub centrosymmetric: bool,
    pub generators: Vec<SymmetryOperator>,
    /// Inversion through the shifted origin, when centrosymmetric
    pub inversion: Option<SymmetryOperator>,
}

impl HallSymbol {
    pub fn parse(text: &str) -> crate::Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SymmetryError::hall(text, "empty symbol"));
        }

        let (body, origin_shift) = match trimmed.find('(') {
            Some(open) => (&trimmed[..open], parse_origin_shift(&trimmed[open..], text)?),
            None => (trimmed, [0; 3]),
        };

        let mut parts = body.split_whitespace();
        let head = parts
            .next()
            .ok_or_else(|| SymmetryError::hall(text, "missing lattice symbol"))?;
        let (centric, head) = match head.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, head),
        };
        let mut head_chars = head.chars();
        let lattice = head_chars
            .next()
            .and_then(LatticeSymbol::from_char)
            .ok_or_else(|| SymmetryError::hall(text, "unknown lattice symbol"))?;

        // A first rotation term glued to the lattice letter ("P2yb") is accepted
        let glued = head_chars.as_str();
        let mut tokens = Vec::new();
        for part in std::iter::once(glued)
            .filter(|s| !s.is_empty())
            .chain(parts)
        {
            tokens.push(HallToken::parse(&part.to_ascii_lowercase(), text)?);
        }
        if tokens.is_empty() {
            return Err(SymmetryError::hall(text, "no rotation terms"));
        }

        let symbol = HallSymbol {
            centric,
            lattice,
            tokens,
            origin_shift,
        };
        // Resolving the axes validates positional defaults and the rotation table
        symbol.generators()?;
        Ok(symbol)
    }

    pub fn is_centric(&self) -> bool {
        self.centric
    }

    pub fn lattice(&self) -> LatticeSymbol {
        self.lattice
    }

    pub fn tokens(&self) -> &[HallToken] {
        &self.tokens
    }

    /// Origin shift in twelfths
    pub fn origin_shift(&self) -> [i64; 3] {
        self.origin_shift
    }

    /// Axis of every term after applying the positional defaults
    pub fn resolved_axes(&self) -> crate::Result<Vec<AxisDesignator>> {
        let mut axes = Vec::with_capacity(self.tokens.len());
        for (i, token) in self.tokens.iter().enumerate() {
            let axis = match token.axis {
                Some(axis) => axis,
                None if token.order == 1 || i == 0 => AxisDesignator::Z,
                None if i == 1 && token.order == 2 => match self.tokens[0].order {
                    2 | 4 => AxisDesignator::X,
                    3 | 6 => AxisDesignator::Prime,
                    _ => return Err(self.error(&format!("no default axis for term '{}'", token))),
                },
                None if i == 2 && token.order == 3 => AxisDesignator::Star,
                None => return Err(self.error(&format!("no default axis for term '{}'", token))),
            };
            axes.push(axis);
        }
        Ok(axes)
    }

    /// One generator per rotation term, finalized into [0,1)
    pub fn generators(&self) -> crate::Result<Vec<SymmetryOperator>> {
        let axes = self.resolved_axes()?;
        let mut previous = AxisDesignator::Z;
        let mut generators = Vec::with_capacity(self.tokens.len());

        for (token, &axis) in self.tokens.iter().zip(&axes) {
            let proper = rotation_matrix(token.order, axis, previous).ok_or_else(|| {
                self.error(&format!(
                    "no {}-fold rotation along '{}' in term '{}'",
                    token.order,
                    axis.symbol(),
                    token
                ))
            })?;
            let rotation = if token.improper { -proper } else { proper };

            let mut twelfths = [0i64; 3];
            for &c in &token.subscripts {
                let shift = subscript_twelfths(c).unwrap_or([0; 3]);
                for k in 0..3 {
                    twelfths[k] += shift[k];
                }
            }
            if token.screw > 0 {
                let index = match axis {
                    AxisDesignator::X => 0,
                    AxisDesignator::Y => 1,
                    AxisDesignator::Z => 2,
                    _ => return Err(self.error(&format!("screw on a diagonal axis in '{}'", token))),
                };
                twelfths[index] += token.screw as i64 * TWELFTHS / token.order as i64;
            }

            let shifted = self.shift_translation(&rotation, twelfths);
            let generator = SymmetryOperator::from_seitz(rotation, shifted).finalized();
            debug!("Hall term '{}' -> {}", token, generator);
            generators.push(generator);

            if axis.is_principal() {
                previous = axis;
            }
        }
        Ok(generators)
    }

    /// Inversion through the (shifted) origin, present for centric symbols
    pub fn inversion(&self) -> Option<SymmetryOperator> {
        self.centric.then(|| {
            let rotation = -Matrix3::<i32>::identity();
            let shifted = self.shift_translation(&rotation, [0; 3]);
            SymmetryOperator::from_seitz(rotation, shifted).finalized()
        })
    }

    /// Decode into lattice, centrosymmetry flag and generators
    pub fn interpretation(&self) -> crate::Result<HallInterpretation> {
        Ok(HallInterpretation {
            lattice: self.lattice,
            centrosymmetric: self.centric,
            generators: self.generators()?,
            inversion: self.inversion(),
        })
    }

    /// t + v - R·v, all in twelfths
    fn shift_translation(&self, rotation: &Matrix3<i32>, twelfths: [i64; 3]) -> [i64; 3] {
        let v = self.origin_shift;
        let mut result = twelfths;
        for i in 0..3 {
            let rv: i64 = (0..3).map(|j| rotation[(i, j)] as i64 * v[j]).sum();
            result[i] += v[i] - rv;
        }
        result
    }

    fn error(&self, message: &str) -> SymmetryError {
        SymmetryError::hall(&self.to_string(), message)
    }
}

/// Parse a Hall symbol and decode it in one step
pub fn interpret(text: &str) -> crate::Result<HallInterpretation> {
    HallSymbol::parse(text)?.interpretation()
}

impl fmt::Display for HallSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.centric {
            write!(f, "-")?;
        }
        write!(f, "{}", self.lattice)?;
        for token in &self.tokens {
            write!(f, " {}", token)?;
        }
        if self.origin_shift != [0; 3] {
            let [x, y, z] = self.origin_shift;
            write!(f, " ({} {} {})", x, y, z)?;
        }
        Ok(())
    }
}

impl FromStr for HallSymbol {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HallSymbol::parse(s)
    }
}

// ========================= Tables =========================

/// Translation subscript codes, in twelfths
fn subscript_twelfths(c: char) -> Option<[i64; 3]> {
    match c {
        'a' => Some([6, 0, 0]),
        'b' => Some([0, 6, 0]),
        'c' => Some([0, 0, 6]),
        'n' => Some([6, 6, 6]),
        'u' => Some([3, 0, 0]),
        'v' => Some([0, 3, 0]),
        'w' => Some([0, 0, 3]),
        'd' => Some([3, 3, 3]),
        'r' => Some([4, 0, 0]),
        's' => Some([0, 4, 0]),
        't' => Some([0, 0, 4]),
        _ => None,
    }
}

/// Proper rotation for (order, axis); diagonal axes are taken relative to `previous`.
fn rotation_matrix(
    order: u8,
    axis: AxisDesignator,
    previous: AxisDesignator,
) -> Option<Matrix3<i32>> {
    use AxisDesignator::*;
    let m = match (order, axis, previous) {
        (1, _, _) => Matrix3::identity(),
        (2, X, _) => Matrix3::new(1, 0, 0, 0, -1, 0, 0, 0, -1),
        (2, Y, _) => Matrix3::new(-1, 0, 0, 0, 1, 0, 0, 0, -1),
        (2, Z, _) => Matrix3::new(-1, 0, 0, 0, -1, 0, 0, 0, 1),
        (3, X, _) => Matrix3::new(1, 0, 0, 0, 0, -1, 0, 1, -1),
        (3, Y, _) => Matrix3::new(-1, 0, 1, 0, 1, 0, -1, 0, 0),
        (3, Z, _) => Matrix3::new(0, -1, 0, 1, -1, 0, 0, 0, 1),
        (4, X, _) => Matrix3::new(1, 0, 0, 0, 0, -1, 0, 1, 0),
        (4, Y, _) => Matrix3::new(0, 0, 1, 0, 1, 0, -1, 0, 0),
        (4, Z, _) => Matrix3::new(0, -1, 0, 1, 0, 0, 0, 0, 1),
        (6, X, _) => Matrix3::new(1, 0, 0, 0, 1, -1, 0, 1, 0),
        (6, Y, _) => Matrix3::new(0, 0, 1, 0, 1, 0, -1, 0, 1),
        (6, Z, _) => Matrix3::new(1, -1, 0, 1, 0, 0, 0, 0, 1),
        (3, Star, _) => Matrix3::new(0, 0, 1, 1, 0, 0, 0, 1, 0),
        (2, Prime, X) => Matrix3::new(-1, 0, 0, 0, 0, -1, 0, -1, 0),
        (2, Prime, Y) => Matrix3::new(0, 0, -1, 0, -1, 0, -1, 0, 0),
        (2, Prime, _) => Matrix3::new(0, -1, 0, -1, 0, 0, 0, 0, -1),
        (2, DoublePrime, X) => Matrix3::new(-1, 0, 0, 0, 0, 1, 0, 1, 0),
        (2, DoublePrime, Y) => Matrix3::new(0, 0, 1, 0, -1, 0, 1, 0, 0),
        (2, DoublePrime, _) => Matrix3::new(0, 1, 0, 1, 0, 0, 0, 0, -1),
        _ => return None,
    };
    Some(m)
}

/// "(0 0 1)" -> [0, 0, 1]; values are twelfths
fn parse_origin_shift(text: &str, symbol: &str) -> crate::Result<[i64; 3]> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| SymmetryError::hall(symbol, "malformed origin shift"))?;
    let values: Vec<i64> = inner
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>())
        .collect::<Result<_, _>>()
        .map_err(|_| SymmetryError::hall(symbol, "origin shift must be integers in twelfths"))?;
    match values.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(SymmetryError::hall(symbol, "origin shift needs three components")),
    }
}
