//! Display formatting at the presentation boundary.

/// Group the digits of a non-negative integer string with `sep`.
fn group_digits(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Brazilian real: `R$ 1.189.855,00`, negatives as `R$ -2.500,75`.
pub fn format_brl(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // -0.004 rounds to zero and must not print a sign.
    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("R$ {sign}{},{frac_part}", group_digits(int_part, '.'))
}

/// Row counts with `,` grouping: `140,512`.
pub fn format_count(n: usize) -> String {
    group_digits(&n.to_string(), ',')
}

/// One decimal and a percent sign: `87.5%`.
pub fn format_pct(pct: f64) -> String {
    format!("{pct:.1}%")
}
