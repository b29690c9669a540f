#![cfg(test)]

use num_rational::Rational64;

use crate::groups::LatticeSymbol;

fn r(n: i64, d: i64) -> Rational64 {
    Rational64::new(n, d)
}

#[test]
fn test_from_char() {
    assert_eq!(LatticeSymbol::from_char('P'), Some(LatticeSymbol::P));
    assert_eq!(LatticeSymbol::from_char('f'), Some(LatticeSymbol::F));
    assert_eq!(LatticeSymbol::from_char('Q'), None);
    for symbol in LatticeSymbol::ALL {
        assert_eq!(LatticeSymbol::from_char(symbol.symbol()), Some(symbol));
    }
}

#[test]
fn test_multiplicities() {
    assert_eq!(LatticeSymbol::P.multiplicity(), 1);
    assert_eq!(LatticeSymbol::C.multiplicity(), 2);
    assert_eq!(LatticeSymbol::I.multiplicity(), 2);
    assert_eq!(LatticeSymbol::R.multiplicity(), 3);
    assert_eq!(LatticeSymbol::T.multiplicity(), 3);
    assert_eq!(LatticeSymbol::F.multiplicity(), 4);
}

#[test]
fn test_centering_vectors() {
    let vectors = LatticeSymbol::R.centering_vectors();
    assert_eq!(vectors[0], [r(2, 3), r(1, 3), r(1, 3)]);
    assert_eq!(vectors[1], [r(1, 3), r(2, 3), r(2, 3)]);
    assert!(LatticeSymbol::P.centering_vectors().is_empty());
}

#[test]
fn test_from_centering_vectors() {
    let c = vec![vec![r(1, 2), r(1, 2), r(0, 1)]];
    assert_eq!(LatticeSymbol::from_centering_vectors(&c), Some(LatticeSymbol::C));

    // Order, zero vector and whole-lattice offsets do not matter
    let f = vec![
        vec![r(3, 2), r(0, 1), r(1, 2)],
        vec![r(0, 1), r(0, 1), r(0, 1)],
        vec![r(1, 2), r(1, 2), r(0, 1)],
        vec![r(0, 1), r(1, 2), r(-1, 2)],
    ];
    assert_eq!(LatticeSymbol::from_centering_vectors(&f), Some(LatticeSymbol::F));

    assert_eq!(LatticeSymbol::from_centering_vectors(&[]), Some(LatticeSymbol::P));

    let odd = vec![vec![r(1, 2), r(0, 1), r(0, 1)]];
    assert_eq!(LatticeSymbol::from_centering_vectors(&odd), None);

    let fifths = vec![vec![r(1, 5), r(0, 1), r(0, 1)]];
    assert_eq!(LatticeSymbol::from_centering_vectors(&fifths), None);
}
