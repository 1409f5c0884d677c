//! Number rendering and display parsing.
//!
//! Rendering matches ECMAScript `Number.prototype.toString`, so chained
//! results, history entries and persisted records read the same as the
//! browser front end: shortest round-trip digits, no trailing `.0`,
//! exponent form outside `[1e-7, 1e21)`, and `-0` shown as `0`.

/// Renders a number the way the display shows it
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (digits, exponent) = shortest_digits(value.abs());
    format!("{sign}{}", layout(&digits, exponent))
}

/// Parses display or history text into a finite number.
///
/// Accepts plain decimals and exponent forms (`-12.5`, `3.`, `.5`,
/// `1e+21`). Rejects empty text, a lone sign, `Infinity`, `NaN` and
/// anything else that is not a numeral.
#[must_use]
pub fn parse_numeral(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty()
        || !text
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Splits a positive finite number into its shortest significant digits and
/// the decimal exponent of the first digit.
fn shortest_digits(value: f64) -> (String, i32) {
    // `{:e}` yields the shortest round-trip form, e.g. `1.2345e3`
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    (digits.to_string(), exponent.parse().unwrap_or(0))
}

fn layout(digits: &str, exponent: i32) -> String {
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{int_part}.{frac_part}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        let exp_abs = (n - 1).abs();
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{exp_sign}{exp_abs}")
        } else {
            format!("{first}.{rest}e{exp_sign}{exp_abs}")
        }
    }
}
