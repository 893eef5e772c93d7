use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use spacefy_core::{hours_between, Instant};
use spacefy_shared::Locale;
use std::str::FromStr;

/// Label shown in place of a total when the listing's rate could not be read.
pub const PRICE_UNAVAILABLE: &str = "price unavailable";

/// Label shown while the booking window is still incomplete.
pub const PRICE_PENDING: &str = "select dates and times";

/// Pricing-related errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid rate format: {0:?}")]
    InvalidRateFormat(String),

    #[error("Quote total out of range")]
    Overflow,
}

/// Parse a displayed price such as `"R$ 2.000"` into a numeric hourly rate.
///
/// Everything but digits, `,`, `.` and `-` is discarded. The locale's group
/// separator is dropped and its decimal separator becomes the decimal point.
/// A lone group separator followed by one or two digits (`"R$ 99.90"` in
/// pt-BR) is read as a decimal point, since no grouping produces that shape.
pub fn parse_rate(display: &str, locale: Locale) -> Result<Decimal, PricingError> {
    let invalid = || PricingError::InvalidRateFormat(display.to_string());

    let kept: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let (negative, body) = match kept.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, kept.as_str()),
    };
    if body.contains('-') {
        return Err(invalid());
    }

    let group = locale.group_separator();
    let decimal = locale.decimal_separator();

    let decimal_count = body.matches(decimal).count();
    let (int_part, frac_part) = match decimal_count {
        0 => match lone_group_as_decimal(body, group) {
            Some(split) => split,
            None => (body.replace(group, ""), String::new()),
        },
        1 => {
            let (int_raw, frac_raw) = body.split_once(decimal).ok_or_else(invalid)?;
            if frac_raw.contains(group) {
                return Err(invalid());
            }
            (int_raw.replace(group, ""), frac_raw.to_string())
        }
        _ => return Err(invalid()),
    };

    let int_part = if int_part.is_empty() { "0".to_string() } else { int_part };
    let normalized = if frac_part.is_empty() {
        int_part
    } else {
        format!("{}.{}", int_part, frac_part)
    };

    let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;
    Ok(if negative { -value } else { value })
}

fn lone_group_as_decimal(body: &str, group: char) -> Option<(String, String)> {
    if body.matches(group).count() != 1 {
        return None;
    }
    let (int_raw, frac_raw) = body.split_once(group)?;
    if (1..=2).contains(&frac_raw.len()) {
        Some((int_raw.to_string(), frac_raw.to_string()))
    } else {
        None
    }
}

/// Render an amount in the locale's currency pattern, rounded half-up to cents.
pub fn format_currency(amount: Decimal, locale: Locale) -> String {
    let rounded = round_to_cents(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let mut cents = rounded.abs();
    cents.rescale(2);
    let digits = cents.to_string();
    let (int_digits, frac_digits) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_digits.len() + int_digits.len() / 3);
    for (i, c) in int_digits.chars().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            grouped.push(locale.group_separator());
        }
        grouped.push(c);
    }

    let spacer = if locale.spaced_symbol() { " " } else { "" };
    format!(
        "{}{}{}{}{}{}",
        if negative { "-" } else { "" },
        locale.currency_symbol(),
        spacer,
        grouped,
        locale.decimal_separator(),
        frac_digits
    )
}

fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Hourly rate of a listing, fixed for the lifetime of a detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRate {
    pub amount_per_hour: Decimal,
    pub locale: Locale,
}

impl PricingRate {
    pub fn new(amount_per_hour: Decimal, locale: Locale) -> Self {
        Self { amount_per_hour, locale }
    }

    pub fn from_display(display: &str, locale: Locale) -> Result<Self, PricingError> {
        parse_rate(display, locale).map(|amount| Self::new(amount, locale))
    }

    pub fn formatted(&self) -> String {
        format_currency(self.amount_per_hour, self.locale)
    }
}

/// Derived duration and price for a booking window. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuote {
    pub duration_hours: Decimal,
    pub total: Decimal,
}

impl BookingQuote {
    pub fn compute(
        check_in: Instant,
        check_out: Instant,
        rate: &PricingRate,
    ) -> Result<Self, PricingError> {
        let duration_hours = hours_between(check_in, check_out);
        let total = duration_hours
            .checked_mul(rate.amount_per_hour)
            .ok_or(PricingError::Overflow)?;
        Ok(Self { duration_hours, total })
    }

    /// Total rounded to cents, the amount a confirmation captures.
    pub fn rounded_total(&self) -> Decimal {
        let mut total = round_to_cents(self.total);
        total.rescale(2);
        total
    }

    pub fn formatted_total(&self, locale: Locale) -> String {
        format_currency(self.total, locale)
    }
}

/// What the presentation layer shows for the current total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PriceDisplay {
    Available { total: Decimal, formatted: String },
    /// The window has no quote yet.
    Pending,
    /// The listing's rate could not be read.
    Unavailable,
}

impl PriceDisplay {
    /// `rate` is `None` when the listing's price was unreadable; a known rate
    /// without a quote is still waiting on the window.
    pub fn for_quote(rate: Option<&PricingRate>, quote: Option<&BookingQuote>, locale: Locale) -> Self {
        match (rate, quote) {
            (None, _) => PriceDisplay::Unavailable,
            (Some(_), Some(q)) => PriceDisplay::Available {
                total: q.rounded_total(),
                formatted: q.formatted_total(locale),
            },
            (Some(_), None) => PriceDisplay::Pending,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PriceDisplay::Available { formatted, .. } => formatted,
            PriceDisplay::Pending => PRICE_PENDING,
            PriceDisplay::Unavailable => PRICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use spacefy_core::{compose, CalendarDate, WallClock};
    use test_case::test_case;

    fn at(h: u32, m: u32) -> Instant {
        compose(CalendarDate::new(2024, 6, 1).unwrap(), WallClock::new(h, m).unwrap())
    }

    #[test_case("R$ 2.000", Locale::PtBr, dec!(2000) ; "brl thousands")]
    #[test_case("R$ 1.234,56", Locale::PtBr, dec!(1234.56) ; "brl with cents")]
    #[test_case("R$ 99.90", Locale::PtBr, dec!(99.90) ; "brl dot as decimal")]
    #[test_case("R$ 1.000.000", Locale::PtBr, dec!(1000000) ; "brl millions")]
    #[test_case("R$ ,50", Locale::PtBr, dec!(0.50) ; "brl fraction only")]
    #[test_case("$1,234.56", Locale::EnUs, dec!(1234.56) ; "usd with cents")]
    #[test_case("$2,000", Locale::EnUs, dec!(2000) ; "usd thousands")]
    #[test_case("100.00/hour", Locale::EnUs, dec!(100.00) ; "usd per hour suffix")]
    #[test_case("-R$ 15,00", Locale::PtBr, dec!(-15) ; "negative")]
    fn test_parse_rate(display: &str, locale: Locale, expected: Decimal) {
        assert_eq!(parse_rate(display, locale).unwrap(), expected);
    }

    #[test_case("grátis" ; "no digits")]
    #[test_case("" ; "empty")]
    #[test_case("R$ ,." ; "separators only")]
    #[test_case("R$ 1,0,0" ; "two decimal separators")]
    #[test_case("10-20" ; "inner minus")]
    fn test_parse_rate_rejects(display: &str) {
        assert_eq!(
            parse_rate(display, Locale::PtBr),
            Err(PricingError::InvalidRateFormat(display.to_string()))
        );
    }

    #[test_case(dec!(1234.56), Locale::PtBr, "R$ 1.234,56" ; "brl")]
    #[test_case(dec!(4000), Locale::PtBr, "R$ 4.000,00" ; "brl whole")]
    #[test_case(dec!(0), Locale::PtBr, "R$ 0,00" ; "brl zero")]
    #[test_case(dec!(50), Locale::PtBr, "R$ 50,00" ; "brl fifty")]
    #[test_case(dec!(0.005), Locale::PtBr, "R$ 0,01" ; "half cent rounds up")]
    #[test_case(dec!(2.344), Locale::PtBr, "R$ 2,34" ; "rounds down")]
    #[test_case(dec!(-1.005), Locale::PtBr, "-R$ 1,01" ; "negative rounds away")]
    #[test_case(dec!(-0.001), Locale::PtBr, "R$ 0,00" ; "negative zero")]
    #[test_case(dec!(1234567.891), Locale::EnUs, "$1,234,567.89" ; "usd")]
    #[test_case(dec!(999), Locale::EnUs, "$999.00" ; "usd no grouping")]
    fn test_format_currency(amount: Decimal, locale: Locale, expected: &str) {
        assert_eq!(format_currency(amount, locale), expected);
    }

    #[test]
    fn test_format_then_parse_returns_value() {
        for (display, locale) in [
            ("R$ 2.000", Locale::PtBr),
            ("R$ 12,345", Locale::PtBr),
            ("R$ 0,99", Locale::PtBr),
            ("$75,300.10", Locale::EnUs),
            ("$3.333", Locale::EnUs),
        ] {
            let rate = parse_rate(display, locale).unwrap();
            let formatted = format_currency(rate, locale);
            let back = parse_rate(&formatted, locale).unwrap();
            assert!((back - rate).abs() <= dec!(0.01), "{} -> {} -> {}", display, formatted, back);
        }
    }

    #[test]
    fn test_quote_two_hours_at_brl_rate() {
        let rate = PricingRate::from_display("R$ 2.000", Locale::PtBr).unwrap();
        let quote = BookingQuote::compute(at(10, 0), at(12, 0), &rate).unwrap();
        assert_eq!(quote.duration_hours, dec!(2));
        assert_eq!(quote.formatted_total(Locale::PtBr), "R$ 4.000,00");
    }

    #[test]
    fn test_quote_half_hour() {
        let rate = PricingRate::new(dec!(100.00), Locale::PtBr);
        let quote = BookingQuote::compute(at(10, 0), at(10, 30), &rate).unwrap();
        assert_eq!(quote.rounded_total(), dec!(50.00));
        assert_eq!(quote.formatted_total(Locale::PtBr), "R$ 50,00");
    }

    #[test]
    fn test_quote_reversed_window_is_zero() {
        let rate = PricingRate::new(dec!(80), Locale::PtBr);
        let quote = BookingQuote::compute(at(10, 0), at(9, 0), &rate).unwrap();
        assert_eq!(quote.duration_hours, Decimal::ZERO);
        assert_eq!(quote.total, Decimal::ZERO);
    }

    #[test]
    fn test_price_display_unavailable_is_not_zero() {
        let display = PriceDisplay::for_quote(None, None, Locale::PtBr);
        assert_eq!(display, PriceDisplay::Unavailable);
        assert_eq!(display.label(), PRICE_UNAVAILABLE);
        assert_ne!(display.label(), "R$ 0,00");
    }

    #[test]
    fn test_price_display_pending_without_quote() {
        let rate = PricingRate::new(dec!(100), Locale::PtBr);
        let display = PriceDisplay::for_quote(Some(&rate), None, Locale::PtBr);
        assert_eq!(display, PriceDisplay::Pending);
        assert_eq!(display.label(), PRICE_PENDING);
        assert_eq!(serde_json::to_value(&display).unwrap()["status"], "pending");

        let quote = BookingQuote::compute(at(10, 0), at(11, 0), &rate).unwrap();
        let display = PriceDisplay::for_quote(Some(&rate), Some(&quote), Locale::PtBr);
        assert_eq!(display.label(), "R$ 100,00");
    }
}
