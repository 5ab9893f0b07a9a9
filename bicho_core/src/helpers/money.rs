// Stakes are carried as f64 reais, always normalized to whole cents.
const CENT_EPSILON: f64 = 1e-6;

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn floor_cents(value: f64) -> f64 {
    ((value * 100.0) + CENT_EPSILON).floor() / 100.0
}

/// Formats a value as Brazilian currency, e.g. `R$ 1.234,50`.
pub fn format_brl(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let reais = (cents / 100).to_string();

    let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
    for (i, ch) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

/// Parses an amount typed by a player: `2`, `2,50`, `R$ 2.50`, `R$ 1.234,50`.
/// With a comma present, dots are thousands separators.
pub fn parse_amount(input: &str) -> Option<f64> {
    let cleaned = input.trim().trim_start_matches("R$").trim();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return None;
    }
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.to_string()
    };
    let value: f64 = normalized.parse().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(round_cents(value))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_cents_handles_binary_noise() {
        assert_eq!(floor_cents(0.3), 0.3);
        assert_eq!(floor_cents(10.0 / 3.0), 3.33);
        assert_eq!(floor_cents(0.009), 0.0);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(3.0), "R$ 3,00");
        assert_eq!(format_brl(0.5), "R$ 0,50");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("2"), Some(2.0));
        assert_eq!(parse_amount("2,50"), Some(2.5));
        assert_eq!(parse_amount("R$ 1.75"), Some(1.75));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_amount_reads_formatted_values() {
        assert_eq!(parse_amount("R$ 1.234,50"), Some(1234.5));
        assert_eq!(parse_amount(&format_brl(1_000_000.0)), Some(1_000_000.0));
        assert_eq!(parse_amount("2.50"), Some(2.5));
        assert_eq!(parse_amount("1e2"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("2,5,0"), None);
    }
}
