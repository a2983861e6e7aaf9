//! Derived advertising ratios.
//!
//! All results are rounded half away from zero to two decimal places. Every
//! ratio is defined as 0 when its denominator is 0.

pub const MICROS_PER_UNIT: f64 = 1_000_000.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn micros_to_currency(micros: f64) -> f64 {
    micros / MICROS_PER_UNIT
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Click-through rate as a percentage.
pub fn ctr(clicks: f64, impressions: f64) -> f64 {
    round2(ratio(clicks, impressions) * 100.0)
}

/// Cost per click.
pub fn cpc(cost: f64, clicks: f64) -> f64 {
    round2(ratio(cost, clicks))
}

/// Conversions per click as a percentage.
pub fn conversion_rate(conversions: f64, clicks: f64) -> f64 {
    round2(ratio(conversions, clicks) * 100.0)
}

pub fn cost_per_conversion(cost: f64, conversions: f64) -> f64 {
    round2(ratio(cost, conversions))
}

/// Customer acquisition cost.
pub fn cac(spend: f64, sales: f64) -> f64 {
    round2(ratio(spend, sales))
}

// ------------------------------------------------------------------ //
//  Row accumulation                                                   //
// ------------------------------------------------------------------ //

/// Running sums over reporting rows. `cost_micros` stays in micros until a
/// record is built.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerformanceTotals {
    pub impressions: f64,
    pub clicks: f64,
    pub cost_micros: f64,
    pub conversions: f64,
}

impl PerformanceTotals {
    pub fn add(
        &mut self,
        impressions: Option<f64>,
        clicks: Option<f64>,
        cost_micros: Option<f64>,
        conversions: Option<f64>,
    ) {
        self.impressions += impressions.unwrap_or(0.0);
        self.clicks += clicks.unwrap_or(0.0);
        self.cost_micros += cost_micros.unwrap_or(0.0);
        self.conversions += conversions.unwrap_or(0.0);
    }

    pub fn cost(&self) -> f64 {
        micros_to_currency(self.cost_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominators_yield_zero() {
        assert_eq!(ctr(10.0, 0.0), 0.0);
        assert_eq!(cpc(10.0, 0.0), 0.0);
        assert_eq!(conversion_rate(3.0, 0.0), 0.0);
        assert_eq!(cost_per_conversion(10.0, 0.0), 0.0);
        assert_eq!(cac(10.0, 0.0), 0.0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(2.346), 2.35);
        assert_eq!(round2(-2.346), -2.35);
    }

    #[test]
    fn results_have_at_most_two_decimals() {
        for value in [ctr(1.0, 3.0), cpc(10.0, 3.0), cac(100.0, 7.0)] {
            let scaled = value * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-9, "{value} has more than two decimals");
        }
    }

    #[test]
    fn reporting_scenario_matches_expected_ratios() {
        let mut totals = PerformanceTotals::default();
        totals.add(Some(5000.0), Some(750.0), Some(15_000_000.0), Some(60.0));

        let cost = totals.cost();
        assert_eq!(round2(cost), 15.00);
        assert_eq!(ctr(totals.clicks, totals.impressions), 15.00);
        assert_eq!(cpc(cost, totals.clicks), 0.02);
        assert_eq!(conversion_rate(totals.conversions, totals.clicks), 8.00);
        assert_eq!(cost_per_conversion(cost, totals.conversions), 0.25);
    }

    #[test]
    fn missing_row_values_count_as_zero() {
        let mut totals = PerformanceTotals::default();
        totals.add(Some(100.0), None, None, None);
        totals.add(None, Some(4.0), Some(2_000_000.0), Some(1.0));
        assert_eq!(totals.impressions, 100.0);
        assert_eq!(totals.clicks, 4.0);
        assert_eq!(totals.cost(), 2.0);
        assert_eq!(totals.conversions, 1.0);
    }
}
