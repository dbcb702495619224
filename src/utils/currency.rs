use crate::models::listing::Currency;

/// Base currency for the single-hop fallback.
const BASE: Currency = Currency::Ron;

/// Static rate table. Entries are (from, to, rate); symmetry is by
/// convention, not enforced. No live exchange-rate fetching.
const RATES: &[(Currency, Currency, f64)] = &[
    (Currency::Eur, Currency::Ron, 4.97),
    (Currency::Ron, Currency::Eur, 0.2012),
    (Currency::Usd, Currency::Ron, 4.52),
    (Currency::Ron, Currency::Usd, 0.2212),
    (Currency::Gbp, Currency::Ron, 5.88),
    (Currency::Ron, Currency::Gbp, 0.1701),
    (Currency::Eur, Currency::Usd, 1.1),
    (Currency::Usd, Currency::Eur, 0.909),
    (Currency::Gbp, Currency::Usd, 1.3),
    (Currency::Usd, Currency::Gbp, 0.769),
];

fn direct_rate(from: Currency, to: Currency) -> Option<f64> {
    RATES
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, rate)| *rate)
}

/// Convert `amount` from one currency to another using the static rate
/// table, falling back to a single hop through RON when no direct rate
/// exists. If no path exists at all, the original amount is returned
/// unchanged: this feeds user-facing price text, so an unconverted price
/// beats an error page.
pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
    if from == to {
        return amount;
    }

    if let Some(rate) = direct_rate(from, to) {
        return amount * rate;
    }

    match (direct_rate(from, BASE), direct_rate(BASE, to)) {
        (Some(to_base), Some(from_base)) => amount * to_base * from_base,
        _ => {
            tracing::debug!(?from, ?to, "no conversion path, returning amount unchanged");
            amount
        }
    }
}
