//! Display strings for prices and percentages.

/// Two decimals with `,` thousands separators. Non-finite input renders as
/// `0.00`.
pub fn format_amount(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "BRL" => Some("R$"),
        "INR" => Some("₹"),
        _ => None,
    }
}

/// Price with its currency: `$1,250.00` for known symbols, `1,250.00 KES`
/// otherwise, bare number when the currency is empty.
pub fn format_price(price: f64, currency: &str) -> String {
    let amount = format_amount(price);
    let currency = currency.trim().to_ascii_uppercase();
    if currency.is_empty() {
        return amount;
    }

    match currency_symbol(&currency) {
        Some(symbol) => match amount.strip_prefix('-') {
            Some(magnitude) => format!("-{symbol}{magnitude}"),
            None => format!("{symbol}{amount}"),
        },
        None => format!("{amount} {currency}"),
    }
}

/// Signed percentage with two decimals; zero carries no sign.
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let magnitude = format!("{:.2}", value.abs());
    if magnitude == "0.00" {
        return String::from("0.00%");
    }

    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{sign}{magnitude}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(999.999), "1,000.00");
        assert_eq!(format_amount(1_250.0), "1,250.00");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(-1_250.5), "-1,250.50");
    }

    #[test]
    fn known_currencies_use_symbols() {
        assert_eq!(format_price(1_250.0, "USD"), "$1,250.00");
        assert_eq!(format_price(3.5, "eur"), "€3.50");
        assert_eq!(format_price(18.0, "BRL"), "R$18.00");
        assert_eq!(format_price(-2.0, "GBP"), "-£2.00");
    }

    #[test]
    fn other_currencies_are_appended() {
        assert_eq!(format_price(1_250.0, "KES"), "1,250.00 KES");
        assert_eq!(format_price(1_250.0, ""), "1,250.00");
    }

    #[test]
    fn non_finite_renders_as_zero() {
        assert_eq!(format_price(f64::NAN, "USD"), "$0.00");
        assert_eq!(format_percent(f64::INFINITY), "0.00%");
    }

    #[test]
    fn percent_is_signed() {
        assert_eq!(format_percent(7.843_137), "+7.84%");
        assert_eq!(format_percent(-3.1), "-3.10%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(-0.001), "0.00%");
    }
}
