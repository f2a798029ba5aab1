use crate::settings::Currency;

const GROUP_SEPARATOR: char = '\u{a0}';

fn format_grouped(value: i64) -> String {
    let is_negative = value < 0;
    let s = value.unsigned_abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(*ch);
    }
    let formatted: String = out.into_iter().rev().collect();
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Whole-unit amount in Czech notation, e.g. `15 000 Kč`.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let rounded = if amount.is_finite() { amount.round() as i64 } else { 0 };
    format!("{}{}{}", format_grouped(rounded), GROUP_SEPARATOR, currency.symbol())
}

/// A 0..1 ratio as a percentage with one decimal, e.g. `16.7 %`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1} %", ratio * 100.0)
}
