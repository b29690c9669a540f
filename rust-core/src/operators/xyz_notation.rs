//! Textual notation for symmetry operators.
//!
//! Supported forms:
//! - algebraic rows: `x,y,z`, `-x,1/2+y,-z`, `y-x, -x, z+2/3`
//! - superspace rows over `x1..xN`: `x1,-x2,x3+1/2,-x4`
//! - raw matrices: `[[-1,0,0,0],[0,1,0,1/2],[0,0,-1,1/2]]`
//! - a leading `!` keeps the translation outside the canonical range
//! - magnetic suffixes: `,m` / `,-m` / `,+1` / `,-1`, or a trailing
//!   `(mx,my,mz)` clause giving the transformation of the magnetic moment

use nalgebra::DMatrix;
use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, Zero};

use crate::config::{DECIMAL_TOLERANCE, MAX_DECIMAL_DENOMINATOR, MAX_PARSED_MAGNITUDE};
use crate::errors::SymmetryError;
use crate::interfaces::TranslationRange;
use crate::operators::symmetry_operator::{pack_translation, reduce_into_range, SymmetryOperator};

const XYZ_LABELS: [&str; 3] = ["x", "y", "z"];
const MOMENT_LABELS: [&str; 3] = ["mx", "my", "mz"];

/// Parse an operator from its textual notation.
///
/// Normalizable operators come back finalized with translations in `[0, 1)`.
pub fn parse_xyz(text: &str) -> crate::Result<SymmetryOperator> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SymmetryError::parse(text, "empty operator"));
    }
    let (normalizable, body) = match trimmed.strip_prefix('!') {
        Some(rest) => (false, rest.trim()),
        None => (true, trimmed),
    };

    let op = if body.starts_with("[[") {
        // The magnetic suffix follows the last closing bracket
        let end = body.rfind(']').map_or(body.len(), |i| i + 1);
        let (matrix, suffix) = body.split_at(end);
        let op = parse_matrix_literal(text, matrix)?;
        with_magnetic_suffix(text, op, suffix)?
    } else {
        parse_algebraic(text, body)?
    };

    let op = if normalizable {
        op.finalized()
    } else {
        op.as_non_normalizable()
    };
    Ok(op)
}

fn parse_algebraic(text: &str, body: &str) -> crate::Result<SymmetryOperator> {
    let lower = body.to_lowercase();

    // Split off a moment clause "(mx,my,mz)"
    let (rows_part, moment_clause) = match lower.find('(') {
        Some(open) => (&lower[..open], &lower[open..]),
        None => (lower.as_str(), ""),
    };

    let mut rows: Vec<&str> = rows_part.split(',').map(str::trim).collect();
    let mut flag_token = "";
    if rows.len() > 3 {
        if let Some(last) = rows.last().copied().filter(|last| time_reversal_flag(last).is_some()) {
            flag_token = last;
            rows.pop();
        }
    }

    let indexed = rows.iter().any(|row| {
        row.contains("x1") || row.contains("x2") || row.contains("x3")
    });
    let labels: Vec<String> = if indexed {
        (1..=rows.len()).map(|i| format!("x{}", i)).collect()
    } else {
        XYZ_LABELS.iter().map(|s| s.to_string()).collect()
    };
    if rows.len() != labels.len() || rows.len() < 3 {
        return Err(SymmetryError::parse(
            text,
            format!("expected {} rows, found {}", labels.len(), rows.len()),
        ));
    }
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();

    let n = rows.len();
    let mut rotation = DMatrix::<i32>::zeros(n, n);
    let mut translation = Vec::with_capacity(n);
    for (i, row) in rows.iter().enumerate() {
        let (coefficients, constant) =
            parse_linear_expression(row, &label_refs).map_err(|m| SymmetryError::parse(text, m))?;
        if coefficients.iter().all(Zero::is_zero) {
            return Err(SymmetryError::parse(
                text,
                format!("row '{}' has no variable term", row),
            ));
        }
        for (j, c) in coefficients.iter().enumerate() {
            if !c.is_integer() {
                return Err(SymmetryError::parse(
                    text,
                    format!("non-integer coefficient in row '{}'", row),
                ));
            }
            rotation[(i, j)] = small_integer(text, *c)?;
        }
        translation.push(constant);
    }

    let op = build(text, rotation, &translation)?;
    let op = with_magnetic_suffix(text, op, flag_token)?;
    with_magnetic_suffix(text, op, moment_clause)
}

/// Apply a trailing `m` / `-m` / `(mx,my,mz)` suffix, if any
fn with_magnetic_suffix(
    text: &str,
    op: SymmetryOperator,
    suffix: &str,
) -> crate::Result<SymmetryOperator> {
    let suffix = suffix.trim().trim_start_matches(',').trim().to_lowercase();
    if suffix.is_empty() {
        return Ok(op);
    }
    if suffix.starts_with('(') {
        let clause = suffix
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| SymmetryError::parse(text, "unbalanced parenthesis"))?;
        let flag = moment_time_reversal(text, clause, &op)?;
        return Ok(op.with_time_reversal(flag));
    }
    match time_reversal_flag(&suffix) {
        Some(flag) => Ok(op.with_time_reversal(flag)),
        None => Err(SymmetryError::parse(
            text,
            format!("unknown magnetic suffix '{}'", suffix),
        )),
    }
}

/// Checked conversion of an integral rotation or moment entry
fn small_integer(text: &str, value: Rational64) -> crate::Result<i32> {
    i32::try_from(value.to_integer())
        .map_err(|_| SymmetryError::parse(text, format!("matrix entry {} out of range", value)))
}

fn build(
    text: &str,
    rotation: DMatrix<i32>,
    translation: &[Rational64],
) -> crate::Result<SymmetryOperator> {
    if pack_translation(translation).is_none() {
        return Err(SymmetryError::parse(text, "translation denominators are too large"));
    }
    Ok(SymmetryOperator::from_raw(rotation, translation, 0, true))
}

fn time_reversal_flag(token: &str) -> Option<i8> {
    match token {
        "m" | "+m" | "+1" | "1" => Some(1),
        "-m" | "-1" => Some(-1),
        _ => None,
    }
}

/// Compare the moment transformation with det(R)·R (+1) or -det(R)·R (-1).
fn moment_time_reversal(text: &str, clause: &str, op: &SymmetryOperator) -> crate::Result<i8> {
    let rows: Vec<&str> = clause.split(',').map(str::trim).collect();
    if rows.len() != 3 {
        return Err(SymmetryError::parse(text, "moment clause needs three rows"));
    }
    let det = op.rotation3().map(|x| x as f64).determinant().round() as i32;
    let axial = op.rotation3() * det;
    let mut moment = axial;
    for (i, row) in rows.iter().enumerate() {
        let (coefficients, constant) =
            parse_linear_expression(row, &MOMENT_LABELS).map_err(|m| SymmetryError::parse(text, m))?;
        if !constant.is_zero() {
            return Err(SymmetryError::parse(text, "moment rows cannot carry a constant"));
        }
        for (j, c) in coefficients.iter().enumerate() {
            if !c.is_integer() {
                return Err(SymmetryError::parse(text, "non-integer moment coefficient"));
            }
            moment[(i, j)] = small_integer(text, *c)?;
        }
    }
    if moment == axial {
        Ok(1)
    } else if moment == -axial {
        Ok(-1)
    } else {
        Err(SymmetryError::parse(
            text,
            "moment transformation is not ±det(R)·R",
        ))
    }
}

fn parse_matrix_literal(text: &str, body: &str) -> crate::Result<SymmetryOperator> {
    let rows: Vec<Vec<&str>> = body
        .split(']')
        .map(|chunk| chunk.trim_matches(|c: char| c == '[' || c == ',' || c.is_whitespace()))
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            chunk
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .collect();

    let width = rows.first().map(Vec::len).unwrap_or(0);
    if width < 4 || rows.iter().any(|r| r.len() != width) {
        return Err(SymmetryError::parse(text, "matrix rows must have equal length ≥ 4"));
    }
    let n = width - 1;
    let body_rows = match rows.len() {
        r if r == n => &rows[..],
        r if r == n + 1 => {
            let last: Vec<Option<Rational64>> = rows[n].iter().map(|s| parse_number(s)).collect();
            let expected_last = (0..=n).all(|j| {
                last[j] == Some(Rational64::from_integer(if j == n { 1 } else { 0 }))
            });
            if !expected_last {
                return Err(SymmetryError::parse(text, "last matrix row must be 0,...,0,1"));
            }
            &rows[..n]
        }
        _ => return Err(SymmetryError::parse(text, "matrix is not square")),
    };

    let mut rotation = DMatrix::<i32>::zeros(n, n);
    let mut translation = Vec::with_capacity(n);
    for (i, row) in body_rows.iter().enumerate() {
        for (j, entry) in row.iter().enumerate() {
            let value = parse_number(entry)
                .ok_or_else(|| SymmetryError::parse(text, format!("bad matrix entry '{}'", entry)))?;
            if j < n {
                if !value.is_integer() {
                    return Err(SymmetryError::parse(text, "rotation entries must be integers"));
                }
                rotation[(i, j)] = small_integer(text, value)?;
            } else {
                translation.push(value);
            }
        }
    }
    build(text, rotation, &translation)
}

/// Parse a signed sum of labeled terms plus constants.
///
/// Returns the rational coefficient of every label (in `labels` order) and
/// the summed constant. Labels are matched longest-first and case-insensitively.
/// Every number and every running sum must stay within `MAX_PARSED_MAGNITUDE`.
pub fn parse_linear_expression(
    expr: &str,
    labels: &[&str],
) -> Result<(Vec<Rational64>, Rational64), String> {
    let chars: Vec<char> = expr
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if chars.is_empty() {
        return Err("empty expression".to_string());
    }

    let mut ordered: Vec<(usize, Vec<char>)> = labels
        .iter()
        .enumerate()
        .map(|(i, l)| (i, l.to_lowercase().chars().collect()))
        .collect();
    ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let mut coefficients = vec![Rational64::zero(); labels.len()];
    let mut constant = Rational64::zero();
    let mut i = 0;
    while i < chars.len() {
        let sign: i64 = match chars[i] {
            '-' => {
                i += 1;
                -1
            }
            '+' => {
                i += 1;
                1
            }
            _ => 1,
        };

        // Optional numeric factor
        let start = i;
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == '/') {
            i += 1;
        }
        let number: String = chars[start..i].iter().collect();
        let value = if number.is_empty() {
            None
        } else {
            Some(parse_number(&number).ok_or_else(|| format!("bad number '{}'", number))?)
        };
        if i < chars.len() && chars[i] == '*' && value.is_some() {
            i += 1;
        }

        let label = ordered
            .iter()
            .find(|(_, l)| chars[i..].starts_with(l))
            .map(|(index, l)| (*index, l.len()));

        let out_of_range = || format!("value out of range in '{}'", expr);
        match (value, label) {
            (v, Some((index, len))) => {
                let term = v.unwrap_or_else(|| Rational64::from_integer(1)) * sign;
                coefficients[index] = coefficients[index]
                    .checked_add(&term)
                    .filter(within_parse_limits)
                    .ok_or_else(out_of_range)?;
                i += len;
            }
            (Some(v), None) => {
                constant = constant
                    .checked_add(&(v * sign))
                    .filter(within_parse_limits)
                    .ok_or_else(out_of_range)?;
            }
            (None, None) => {
                let found = chars.get(i).copied().unwrap_or(' ');
                return Err(format!("unexpected '{}' in '{}'", found, expr));
            }
        }
    }
    Ok((coefficients, constant))
}

/// Parse `3`, `1/2`, `-2/3` or a decimal such as `0.5` into a rational.
///
/// `None` for malformed text and for values beyond `MAX_PARSED_MAGNITUDE`.
pub fn parse_number(text: &str) -> Option<Rational64> {
    let text = text.trim();
    let value = if let Some((num, den)) = text.split_once('/') {
        let num = parse_number(num)?;
        let den = parse_number(den)?;
        if den.is_zero() {
            return None;
        }
        num.checked_div(&den)?
    } else if let Ok(n) = text.parse::<i64>() {
        Rational64::from_integer(n)
    } else {
        rational_from_decimal(text.parse().ok()?)?
    };
    Some(value).filter(within_parse_limits)
}

fn within_parse_limits(value: &Rational64) -> bool {
    value
        .numer()
        .checked_abs()
        .map_or(false, |n| n <= MAX_PARSED_MAGNITUDE)
        && *value.denom() <= MAX_PARSED_MAGNITUDE
}

/// Snap a decimal to the fraction with the smallest denominator within tolerance.
pub fn rational_from_decimal(value: f64) -> Option<Rational64> {
    if !value.is_finite() {
        return None;
    }
    (1..=MAX_DECIMAL_DENOMINATOR).find_map(|den| {
        let num = (value * den as f64).round();
        ((value - num / den as f64).abs() < DECIMAL_TOLERANCE)
            .then(|| Rational64::new(num as i64, den))
    })
}

/// Lowest-terms fraction: `1/2`, `-2/3`, `1`
pub fn format_fraction(value: Rational64) -> String {
    if value.is_integer() {
        value.to_integer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

/// Print an operator in xyz notation.
///
/// With `range = None` the stored translation is printed as is; otherwise
/// normalizable translations are shown reduced into `range`.
pub fn format_xyz(op: &SymmetryOperator, range: Option<TranslationRange>) -> String {
    let n = op.dimension();
    let labels: Vec<String> = if op.modulation_dimension() == 0 {
        XYZ_LABELS.iter().map(|s| s.to_string()).collect()
    } else {
        (1..=n).map(|i| format!("x{}", i)).collect()
    };
    let translation = op.translation();
    let rotation = op.rotation();

    let rows: Vec<String> = (0..n)
        .map(|i| {
            let constant = match range {
                Some(range) if op.is_normalizable() => reduce_into_range(translation[i], range),
                _ => translation[i],
            };
            let coefficients: Vec<i64> = (0..n).map(|j| rotation[(i, j)] as i64).collect();
            format_row(&coefficients, constant, &labels)
        })
        .collect();

    let mut text = rows.join(",");
    match op.time_reversal() {
        1 => text.push_str(",m"),
        -1 => text.push_str(",-m"),
        _ => {}
    }
    if !op.is_normalizable() {
        text.insert(0, '!');
    }
    text
}

fn format_row(coefficients: &[i64], constant: Rational64, labels: &[String]) -> String {
    let mut row = String::new();
    if !constant.is_zero() {
        row.push_str(&format_fraction(constant));
    }
    for (c, label) in coefficients.iter().zip(labels) {
        if *c == 0 {
            continue;
        }
        row.push(if *c < 0 { '-' } else { '+' });
        if c.abs() != 1 {
            row.push_str(&c.abs().to_string());
        }
        row.push_str(label);
    }
    if row.is_empty() {
        return "0".to_string();
    }
    match row.strip_prefix('+') {
        Some(stripped) => stripped.to_string(),
        None => row,
    }
}

/// Print the 4×4 (or (4+d)×(4+d)) augmented matrix with exact fractions.
pub fn format_matrix(op: &SymmetryOperator) -> String {
    let n = op.dimension();
    let translation = op.translation();
    let mut rows: Vec<String> = (0..n)
        .map(|i| {
            let mut entries: Vec<String> =
                (0..n).map(|j| op.rotation()[(i, j)].to_string()).collect();
            entries.push(format_fraction(translation[i]));
            format!("[{}]", entries.join(","))
        })
        .collect();
    let mut last = vec!["0".to_string(); n];
    last.push("1".to_string());
    rows.push(format!("[{}]", last.join(",")));
    format!("[{}]", rows.join(","))
}
