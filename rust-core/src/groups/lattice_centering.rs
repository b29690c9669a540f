use std::fmt;

use num_rational::Rational64;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::config::TWELFTHS;
use crate::interfaces::TranslationRange;
use crate::operators::symmetry_operator::reduce_into_range;

/// Lattice symbols of the Hall grammar, each with its set of centering translations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LatticeSymbol {
    P,
    A,
    B,
    C,
    I,
    F,
    R,
    S,
    T,
}

impl LatticeSymbol {
    pub const ALL: [LatticeSymbol; 9] = [
        LatticeSymbol::P,
        LatticeSymbol::A,
        LatticeSymbol::B,
        LatticeSymbol::C,
        LatticeSymbol::I,
        LatticeSymbol::F,
        LatticeSymbol::R,
        LatticeSymbol::S,
        LatticeSymbol::T,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(LatticeSymbol::P),
            'A' => Some(LatticeSymbol::A),
            'B' => Some(LatticeSymbol::B),
            'C' => Some(LatticeSymbol::C),
            'I' => Some(LatticeSymbol::I),
            'F' => Some(LatticeSymbol::F),
            'R' => Some(LatticeSymbol::R),
            'S' => Some(LatticeSymbol::S),
            'T' => Some(LatticeSymbol::T),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            LatticeSymbol::P => 'P',
            LatticeSymbol::A => 'A',
            LatticeSymbol::B => 'B',
            LatticeSymbol::C => 'C',
            LatticeSymbol::I => 'I',
            LatticeSymbol::F => 'F',
            LatticeSymbol::R => 'R',
            LatticeSymbol::S => 'S',
            LatticeSymbol::T => 'T',
        }
    }

    /// Non-zero centering translations, in twelfths
    pub fn centering_twelfths(&self) -> &'static [[i64; 3]] {
        match self {
            LatticeSymbol::P => &[],
            LatticeSymbol::A => &[[0, 6, 6]],
            LatticeSymbol::B => &[[6, 0, 6]],
            LatticeSymbol::C => &[[6, 6, 0]],
            LatticeSymbol::I => &[[6, 6, 6]],
            LatticeSymbol::F => &[[0, 6, 6], [6, 0, 6], [6, 6, 0]],
            LatticeSymbol::R => &[[8, 4, 4], [4, 8, 8]],
            LatticeSymbol::S => &[[4, 4, 8], [8, 8, 4]],
            LatticeSymbol::T => &[[4, 8, 4], [8, 4, 8]],
        }
    }

    /// Non-zero centering translations as exact fractions
    pub fn centering_vectors(&self) -> Vec<[Rational64; 3]> {
        self.centering_twelfths()
            .iter()
            .map(|v| v.map(|x| Rational64::new(x, TWELFTHS)))
            .collect()
    }

    /// Lattice points per conventional cell
    pub fn multiplicity(&self) -> usize {
        self.centering_twelfths().len() + 1
    }

    /// Recover the symbol from a set of centering vectors (zero vector optional).
    ///
    /// Components beyond the third are ignored; `None` when the set matches no symbol.
    pub fn from_centering_vectors(vectors: &[Vec<Rational64>]) -> Option<Self> {
        let mut twelfths = Vec::new();
        for vector in vectors {
            let mut reduced = [0i64; 3];
            for (i, slot) in reduced.iter_mut().enumerate() {
                let value = reduce_into_range(
                    vector.get(i).copied().unwrap_or_else(Rational64::zero),
                    TranslationRange::Positive,
                ) * Rational64::from_integer(TWELFTHS);
                if !value.is_integer() {
                    return None;
                }
                *slot = value.to_integer();
            }
            if reduced != [0, 0, 0] && !twelfths.contains(&reduced) {
                twelfths.push(reduced);
            }
        }
        twelfths.sort_unstable();
        LatticeSymbol::ALL.into_iter().find(|symbol| {
            let mut expected = symbol.centering_twelfths().to_vec();
            expected.sort_unstable();
            expected == twelfths
        })
    }
}

impl fmt::Display for LatticeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
