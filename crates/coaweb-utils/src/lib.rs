//! Utility functions and helpers

use rust_decimal::Decimal;

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// Format a decimal balance with a fixed number of places and grouped integer digits
///
/// `format_balance(dec!(-1234.5), 2)` gives `"-1,234.50"`.
pub fn format_balance(value: Decimal, decimal_places: u32) -> String {
    let rounded = value.round_dp(decimal_places);
    let text = format!("{:.*}", decimal_places as usize, rounded);
    match text.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", format_number(int_part), frac_part),
        None => format_number(text),
    }
}

/// Escape text for safe interpolation into HTMX fragments
pub fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
