use crate::models::listing::Currency;

/// Render an amount as Romanian-locale price text: dot thousands separator,
/// comma decimal separator. Amounts of 1000 and above drop fractional
/// digits; smaller amounts keep up to two (trailing zeros trimmed) so small
/// converted prices stay legible. RON takes a " lei" suffix, other
/// currencies a prefix symbol.
pub fn format_price(amount: f64, currency: Currency, include_symbol: bool) -> String {
    let negative = amount < 0.0;
    let amount = amount.abs();

    let number = if amount >= 1000.0 {
        group_thousands(amount.round() as u64)
    } else {
        // Round to cents once, then split, so 9.999 becomes "10" not "9,100".
        let cents = (amount * 100.0).round() as u64;
        let whole = cents / 100;
        let frac = cents % 100;
        if frac == 0 {
            group_thousands(whole)
        } else if frac % 10 == 0 {
            format!("{},{}", group_thousands(whole), frac / 10)
        } else {
            format!("{},{:02}", group_thousands(whole), frac)
        }
    };

    let number = if negative {
        format!("-{}", number)
    } else {
        number
    };

    if !include_symbol {
        return number;
    }

    match currency {
        Currency::Ron => format!("{} lei", number),
        Currency::Eur => format!("€{}", number),
        Currency::Usd => format!("${}", number),
        Currency::Gbp => format!("£{}", number),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ron_suffix_with_grouping() {
        assert_eq!(format_price(1500.0, Currency::Ron, true), "1.500 lei");
    }

    #[test]
    fn eur_small_amount_no_decimals() {
        assert_eq!(format_price(5.0, Currency::Eur, true), "€5");
    }

    #[test]
    fn large_amount_drops_fraction() {
        assert_eq!(format_price(1234.56, Currency::Usd, true), "$1.235");
    }

    #[test]
    fn small_amount_keeps_two_decimals() {
        assert_eq!(format_price(12.34, Currency::Eur, true), "€12,34");
    }

    #[test]
    fn trailing_zero_trimmed() {
        assert_eq!(format_price(12.5, Currency::Eur, true), "€12,5");
    }

    #[test]
    fn without_symbol() {
        assert_eq!(format_price(1500.0, Currency::Ron, false), "1.500");
        assert_eq!(format_price(12.34, Currency::Gbp, false), "12,34");
    }

    #[test]
    fn rounding_carries_into_whole_part() {
        assert_eq!(format_price(999.999, Currency::Eur, true), "€1.000");
    }

    #[test]
    fn seven_digit_grouping() {
        assert_eq!(format_price(1_234_567.0, Currency::Ron, false), "1.234.567");
    }

    #[test]
    fn zero_amount() {
        assert_eq!(format_price(0.0, Currency::Ron, true), "0 lei");
    }
}
