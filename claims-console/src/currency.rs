use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// Thai baht, the settlement currency of the dashboard and claim lists.
    #[default]
    Thb,
    Usd,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Thb => "฿",
            Currency::Usd => "$",
        }
    }
}

/// Whole-unit amount with thousands separators, e.g. `฿1,234,568`.
///
/// Rounds half away from zero. Non-finite input renders as zero.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}{}{}", currency.symbol(), group_thousands(&digits))
}

/// Compact form used by chart axes: `$3.3M`, `฿485k`.
///
/// The unit is picked after rounding, so `999_999` reads `$1.0M`.
pub fn format_compact(amount: f64, currency: Currency) -> String {
    let abs = amount.abs();
    let sign = if amount < 0.0 { "-" } else { "" };
    let symbol = currency.symbol();
    if (abs / 1_000.0).round() >= 1_000.0 {
        format!("{sign}{symbol}{:.1}M", abs / 1_000_000.0)
    } else if abs.round() >= 1_000.0 {
        format!("{sign}{symbol}{:.0}k", abs / 1_000.0)
    } else {
        format!("{sign}{symbol}{abs:.0}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_and_rounds() {
        assert_eq!(format_currency(0.0, Currency::Thb), "฿0");
        assert_eq!(format_currency(999.0, Currency::Usd), "$999");
        assert_eq!(format_currency(4500.0, Currency::Usd), "$4,500");
        assert_eq!(format_currency(1_234_567.5, Currency::Thb), "฿1,234,568");
        assert_eq!(format_currency(-2500.4, Currency::Usd), "-$2,500");
        assert_eq!(format_currency(f64::NAN, Currency::Usd), "$0");
    }

    #[test]
    fn compact_amounts() {
        assert_eq!(format_compact(3_300_000.0, Currency::Usd), "$3.3M");
        assert_eq!(format_compact(485_000.0, Currency::Usd), "$485k");
        assert_eq!(format_compact(120.0, Currency::Thb), "฿120");
    }

    #[test]
    fn compact_unit_follows_rounding() {
        assert_eq!(format_compact(999_999.0, Currency::Usd), "$1.0M");
        assert_eq!(format_compact(999_499.0, Currency::Usd), "$999k");
        assert_eq!(format_compact(-999_700.0, Currency::Usd), "-$1.0M");
        assert_eq!(format_compact(999.6, Currency::Thb), "฿1k");
        assert_eq!(format_compact(999.4, Currency::Thb), "฿999");
    }
}
