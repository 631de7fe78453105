//! Piecewise-linear forward-rate curve with flat extrapolation.

use rust_decimal::Decimal;

use clo_core::types::Date;

use crate::error::{CurveError, CurveResult};

/// A dated sequence of index rates (e.g. EURIBOR) used to project future
/// floating coupons, interpolated linearly between knots and held flat
/// beyond either end.
#[derive(Debug, Clone)]
pub struct ForwardRateCurve {
    id: String,
    dates: Vec<Date>,
    rates: Vec<Decimal>,
}

impl ForwardRateCurve {
    /// Builds a curve from parallel `dates`/`rates` sequences.
    ///
    /// `dates` must be strictly ascending and both sequences must have the
    /// same length of at least 2.
    pub fn new(id: impl Into<String>, dates: Vec<Date>, rates: Vec<Decimal>) -> CurveResult<Self> {
        let id = id.into();

        if dates.len() != rates.len() {
            return Err(CurveError::invalid_curve(
                &id,
                format!(
                    "dates and rates must have the same length ({} vs {})",
                    dates.len(),
                    rates.len()
                ),
            ));
        }
        if dates.len() < 2 {
            return Err(CurveError::invalid_curve(&id, "curve requires at least 2 knots"));
        }
        if !dates.windows(2).all(|w| w[0] < w[1]) {
            return Err(CurveError::invalid_curve(&id, "knot dates must be strictly ascending"));
        }

        Ok(Self { id, dates, rates })
    }

    /// The curve's identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Rate at `d`: linear interpolation between surrounding knots, flat
    /// extrapolation (first/last knot rate) outside the knot range.
    pub fn rate_at(&self, d: Date) -> Decimal {
        if d <= self.dates[0] {
            return self.rates[0];
        }
        let last = self.dates.len() - 1;
        if d >= self.dates[last] {
            return self.rates[last];
        }

        let hi = match self.dates.binary_search(&d) {
            Ok(idx) => return self.rates[idx],
            Err(idx) => idx,
        };
        let lo = hi - 1;

        let span = self.dates[lo].days_between(self.dates[hi]);
        let offset = self.dates[lo].days_between(d);
        let weight = Decimal::from(offset) / Decimal::from(span);

        self.rates[lo] + (self.rates[hi] - self.rates[lo]) * weight
    }

    /// Arithmetic mean of [`Self::rate_at`] over every calendar day in
    /// `[a, b]` inclusive.
    pub fn average_rate(&self, a: Date, b: Date) -> Decimal {
        let days = a.days_between(b).max(0);
        let mut sum = Decimal::ZERO;
        let mut count = 0i64;
        for offset in 0..=days {
            sum += self.rate_at(a.add_days(offset));
            count += 1;
        }
        sum / Decimal::from(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flat(rate: Decimal) -> ForwardRateCurve {
        ForwardRateCurve::new(
            "FLAT",
            vec![Date::from_ymd(2020, 1, 1).unwrap(), Date::from_ymd(2030, 1, 1).unwrap()],
            vec![rate, rate],
        )
        .unwrap()
    }

    #[test]
    fn flat_curve_returns_same_rate_everywhere() {
        let curve = flat(dec!(0.02));
        assert_eq!(curve.rate_at(Date::from_ymd(2025, 6, 15).unwrap()), dec!(0.02));
    }

    #[test]
    fn interpolates_linearly_between_knots() {
        let curve = ForwardRateCurve::new(
            "TEST",
            vec![Date::from_ymd(2025, 1, 1).unwrap(), Date::from_ymd(2025, 1, 11).unwrap()],
            vec![dec!(0.01), dec!(0.03)],
        )
        .unwrap();

        let mid = curve.rate_at(Date::from_ymd(2025, 1, 6).unwrap());
        assert_eq!(mid, dec!(0.02));
    }

    #[test]
    fn extrapolates_flat_before_first_and_after_last_knot() {
        let curve = ForwardRateCurve::new(
            "TEST",
            vec![Date::from_ymd(2025, 1, 1).unwrap(), Date::from_ymd(2025, 6, 1).unwrap()],
            vec![dec!(0.01), dec!(0.05)],
        )
        .unwrap();

        assert_eq!(curve.rate_at(Date::from_ymd(2020, 1, 1).unwrap()), dec!(0.01));
        assert_eq!(curve.rate_at(Date::from_ymd(2030, 1, 1).unwrap()), dec!(0.05));
    }

    #[test]
    fn average_rate_over_flat_curve_equals_the_flat_rate() {
        let curve = flat(dec!(0.025));
        let avg = curve.average_rate(Date::from_ymd(2025, 1, 1).unwrap(), Date::from_ymd(2025, 3, 31).unwrap());
        assert_eq!(avg, dec!(0.025));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let err = ForwardRateCurve::new("BAD", vec![Date::from_ymd(2025, 1, 1).unwrap()], vec![dec!(0.01), dec!(0.02)]);
        assert!(err.is_err());
    }

    #[test]
    fn monotone_in_knot_rates_implies_monotone_rate_at() {
        let a = ForwardRateCurve::new(
            "A",
            vec![Date::from_ymd(2025, 1, 1).unwrap(), Date::from_ymd(2025, 12, 31).unwrap()],
            vec![dec!(0.01), dec!(0.02)],
        )
        .unwrap();
        let b = ForwardRateCurve::new(
            "B",
            vec![Date::from_ymd(2025, 1, 1).unwrap(), Date::from_ymd(2025, 12, 31).unwrap()],
            vec![dec!(0.015), dec!(0.03)],
        )
        .unwrap();

        for day in 0..=364 {
            let d = Date::from_ymd(2025, 1, 1).unwrap().add_days(day);
            assert!(a.rate_at(d) <= b.rate_at(d));
        }
    }
}
