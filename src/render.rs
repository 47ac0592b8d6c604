//! Text output for query results.

use matquery_core::{Matrix, RowPair};

/// Format a float with 12 significant digits, keeping a trailing `.0` on
/// integral values (`15.8113883008`, `81.0`, `1e+16`).
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // exponent after rounding to 12 significant digits
    let sci = format!("{:.11e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if !(-4..12).contains(&exp) {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exp.abs());
    }

    let decimals = (11 - exp) as usize;
    let fixed = format!("{:.*}", decimals, v);
    let trimmed = trim_fraction(&fixed);
    if trimmed.contains('.') {
        trimmed.to_string()
    } else {
        format!("{}.0", trimmed)
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `"i j"`, or `"i j d"` when `show_distance` is set.
pub fn pair_line(pair: &RowPair, show_distance: bool) -> String {
    if show_distance {
        format!("{} {} {}", pair.i, pair.j, format_float(pair.distance))
    } else {
        format!("{} {}", pair.i, pair.j)
    }
}

/// Coordinates joined by single spaces.
pub fn centroid_line(center: &[f64]) -> String {
    center
        .iter()
        .map(|&v| format_float(v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Bracketed, right-aligned layout:
///
/// ```text
/// [[1 2 3]
///  [2 3 4]
///  [1 1 1]]
/// ```
///
/// Integral matrices print without a fractional part. Sparse matrices are
/// shown densified.
pub fn render_matrix(matrix: &Matrix) -> String {
    let rows = matrix.to_rows();
    let integral = rows
        .iter()
        .flatten()
        .all(|v| v.fract() == 0.0 && v.abs() < 1e15);

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| {
                    if integral {
                        format!("{}", v as i64)
                    } else {
                        format_float(v)
                    }
                })
                .collect()
        })
        .collect();
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(0);

    let lines: Vec<String> = cells
        .iter()
        .map(|row| {
            let padded: Vec<String> = row.iter().map(|c| format!("{:>width$}", c)).collect();
            format!("[{}]", padded.join(" "))
        })
        .collect();
    format!("[{}]", lines.join("\n "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_fraction() {
        assert_eq!(trim_fraction("1.500"), "1.5");
        assert_eq!(trim_fraction("2.000"), "2");
        assert_eq!(trim_fraction("100"), "100");
    }
}
