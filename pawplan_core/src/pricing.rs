//! Price quote from a session range.
//!
//! The engine collapses an estimated session range into one billable
//! session count (midpoint or weighted average), adds travel, applies a
//! margin and rounds to a presentable step. Every intermediate value is kept
//! in the [`PricingBreakdown`] so callers can show the whole calculation.
//!
//! All inputs are clamped into their valid domain; nothing here can fail.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Step used for `total_cost_rounded`
pub const DEFAULT_ROUNDING_STEP: f64 = 10.0;

/// Upper bound for a margin percentage
pub const MAX_MARGIN_PERCENT: f64 = 200.0;

/// How a session range becomes a single billable count
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    #[default]
    Midpoint,
    WeightedAverage,
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingStrategy::Midpoint => f.write_str("midpoint"),
            PricingStrategy::WeightedAverage => f.write_str("weighted_average"),
        }
    }
}

impl FromStr for PricingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "midpoint" => Ok(PricingStrategy::Midpoint),
            "weighted_average" | "weighted" => Ok(PricingStrategy::WeightedAverage),
            other => Err(format!("unknown pricing strategy '{}'", other)),
        }
    }
}

/// Everything the engine needs to price a session range
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub band_low: f64,
    pub band_high: f64,
    pub strategy: PricingStrategy,
    pub midpoint_margin_percent: f64,
    pub weighted_high_weight_percent: f64,
    pub weighted_margin_percent: f64,
    pub session_rate: f64,
    pub home_sessions: f64,
    pub travel_distance_km: f64,
    pub travel_rate_per_km: f64,
}

impl Default for PricingInput {
    fn default() -> Self {
        PricingInput {
            band_low: 0.0,
            band_high: 0.0,
            strategy: PricingStrategy::Midpoint,
            midpoint_margin_percent: 0.0,
            weighted_high_weight_percent: 50.0,
            weighted_margin_percent: 0.0,
            session_rate: 0.0,
            home_sessions: 0.0,
            travel_distance_km: 0.0,
            travel_rate_per_km: 0.0,
        }
    }
}

/// The itemized result of [`price`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub strategy: PricingStrategy,
    pub band_low: f64,
    pub band_high: f64,
    pub base: f64,
    pub margin_percent: f64,
    pub sessions_precise: f64,
    pub sessions_ceiled: f64,
    pub session_rate: f64,
    pub session_cost_precise: f64,
    /// Alternative cost when billing whole sessions; not part of the total
    pub session_cost_ceiled: f64,
    pub travel_cost: f64,
    pub subtotal: f64,
    pub markup_amount: f64,
    pub total_cost: f64,
    pub total_cost_rounded: f64,
}

impl PricingBreakdown {
    /// Total rounded half away from zero to a multiple of `step`.
    /// A non-positive step leaves the total unrounded.
    pub fn rounded_total_cost(&self, step: f64) -> f64 {
        round_to_step(self.total_cost, step)
    }
}

fn round_to_step(value: f64, step: f64) -> f64 {
    if step.is_nan() || step <= 0.0 {
        return value;
    }
    (value / step).round() * step
}

fn non_negative(value: f64) -> f64 {
    // also maps NaN to 0
    if value > 0.0 {
        value
    } else {
        0.0
    }
}

fn clamp_percent(value: f64, max: f64) -> f64 {
    non_negative(value).min(max)
}

/// Price a session range
pub fn price(input: &PricingInput) -> PricingBreakdown {
    let low = non_negative(input.band_low);
    let high = non_negative(input.band_high);

    let (base, margin) = match input.strategy {
        PricingStrategy::Midpoint => ((low + high) / 2.0, input.midpoint_margin_percent),
        PricingStrategy::WeightedAverage => {
            let high_weight = clamp_percent(input.weighted_high_weight_percent, 100.0) / 100.0;
            let low_weight = 1.0 - high_weight;
            (
                low_weight * low + high_weight * high,
                input.weighted_margin_percent,
            )
        }
    };
    let margin_percent = clamp_percent(margin, MAX_MARGIN_PERCENT);

    let sessions_precise = non_negative(base);
    let sessions_ceiled = sessions_precise.ceil();

    let session_rate = non_negative(input.session_rate);
    let session_cost_precise = sessions_precise * session_rate;
    let session_cost_ceiled = sessions_ceiled * session_rate;

    let travel_cost = non_negative(input.home_sessions)
        * non_negative(input.travel_distance_km)
        * non_negative(input.travel_rate_per_km);

    let subtotal = session_cost_precise + travel_cost;
    let total_cost = subtotal * (1.0 + margin_percent / 100.0);
    let markup_amount = total_cost - subtotal;

    let breakdown = PricingBreakdown {
        strategy: input.strategy,
        band_low: low,
        band_high: high,
        base,
        margin_percent,
        sessions_precise,
        sessions_ceiled,
        session_rate,
        session_cost_precise,
        session_cost_ceiled,
        travel_cost,
        subtotal,
        markup_amount,
        total_cost,
        total_cost_rounded: round_to_step(total_cost, DEFAULT_ROUNDING_STEP),
    };

    tracing::debug!(
        "Priced {}..{} sessions ({}): base {:.2}, total {:.2}",
        low,
        high,
        input.strategy,
        base,
        total_cost
    );

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn midpoint_example() -> PricingInput {
        PricingInput {
            band_low: 2.0,
            band_high: 4.0,
            strategy: PricingStrategy::Midpoint,
            midpoint_margin_percent: 15.0,
            session_rate: 300.0,
            home_sessions: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_midpoint_example() {
        let result = price(&midpoint_example());
        assert!(approx(result.base, 3.0));
        assert!(approx(result.session_cost_precise, 900.0));
        assert!(approx(result.travel_cost, 0.0));
        assert!(approx(result.subtotal, 900.0));
        assert!(approx(result.total_cost, 1035.0));
        assert!(approx(result.markup_amount, 135.0));
        assert!(approx(result.rounded_total_cost(10.0), 1040.0));
        assert!(approx(result.total_cost_rounded, 1040.0));
    }

    #[test]
    fn test_weighted_example() {
        let input = PricingInput {
            band_low: 2.0,
            band_high: 4.0,
            strategy: PricingStrategy::WeightedAverage,
            weighted_high_weight_percent: 65.0,
            weighted_margin_percent: 0.0,
            session_rate: 100.0,
            ..Default::default()
        };
        let result = price(&input);
        assert!(approx(result.base, 3.3));
        assert!(approx(result.session_cost_precise, 330.0));
        assert!(approx(result.markup_amount, 0.0));
        assert_eq!(result.sessions_ceiled, 4.0);
        assert!(approx(result.session_cost_ceiled, 400.0));
    }

    #[test]
    fn test_strategy_selects_its_own_margin() {
        let mut input = midpoint_example();
        input.weighted_margin_percent = 50.0;
        assert!(approx(price(&input).margin_percent, 15.0));

        input.strategy = PricingStrategy::WeightedAverage;
        assert!(approx(price(&input).margin_percent, 50.0));
    }

    #[test]
    fn test_travel_cost() {
        let input = PricingInput {
            band_low: 1.0,
            band_high: 1.0,
            session_rate: 50.0,
            home_sessions: 3.0,
            travel_distance_km: 20.0,
            travel_rate_per_km: 0.5,
            ..Default::default()
        };
        let result = price(&input);
        assert!(approx(result.travel_cost, 30.0));
        assert!(approx(result.subtotal, 80.0));
        assert!(approx(result.total_cost, 80.0));
    }

    #[test]
    fn test_inputs_are_clamped() {
        let input = PricingInput {
            band_low: -5.0,
            band_high: -1.0,
            strategy: PricingStrategy::WeightedAverage,
            weighted_high_weight_percent: 250.0,
            weighted_margin_percent: 900.0,
            session_rate: -10.0,
            home_sessions: -2.0,
            travel_distance_km: 10.0,
            travel_rate_per_km: 1.0,
            ..Default::default()
        };
        let result = price(&input);
        assert_eq!(result.band_low, 0.0);
        assert_eq!(result.band_high, 0.0);
        assert_eq!(result.margin_percent, MAX_MARGIN_PERCENT);
        assert_eq!(result.session_rate, 0.0);
        assert_eq!(result.travel_cost, 0.0);
        assert_eq!(result.total_cost, 0.0);
    }

    #[test]
    fn test_full_high_weight_prices_the_high_bound() {
        let input = PricingInput {
            band_low: 2.0,
            band_high: 6.0,
            strategy: PricingStrategy::WeightedAverage,
            weighted_high_weight_percent: 100.0,
            session_rate: 10.0,
            ..Default::default()
        };
        assert!(approx(price(&input).base, 6.0));
    }

    #[test]
    fn test_rounding_step() {
        let result = price(&PricingInput {
            band_low: 1.0,
            band_high: 1.0,
            session_rate: 1234.0,
            ..Default::default()
        });
        assert!(approx(result.rounded_total_cost(10.0), 1230.0));
        assert!(approx(result.rounded_total_cost(25.0), 1225.0));
        assert!(approx(result.rounded_total_cost(100.0), 1200.0));
        assert!(approx(result.rounded_total_cost(0.0), 1234.0));
        assert!(approx(result.rounded_total_cost(-5.0), 1234.0));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let result = price(&PricingInput {
            band_low: 1.0,
            band_high: 1.0,
            session_rate: 1235.0,
            ..Default::default()
        });
        assert!(approx(result.rounded_total_cost(10.0), 1240.0));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "weighted-average".parse::<PricingStrategy>(),
            Ok(PricingStrategy::WeightedAverage)
        );
        assert_eq!("Midpoint".parse::<PricingStrategy>(), Ok(PricingStrategy::Midpoint));
        assert!("max".parse::<PricingStrategy>().is_err());
    }
}
