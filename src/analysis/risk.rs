// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{ExpenseCategory, IncomeStream, RiskTier, VolatilityMetrics};

/// Combine stream reliability and category trends into one volatility
/// reading. Empty inputs contribute zero volatility instead of dividing
/// by the list length.
pub fn volatility_metrics(
    streams: &[IncomeStream],
    categories: &[ExpenseCategory],
) -> VolatilityMetrics {
    let income_volatility = if streams.is_empty() {
        0.0
    } else {
        let mean_reliability =
            streams.iter().map(|s| s.reliability).sum::<f64>() / streams.len() as f64;
        1.0 - mean_reliability
    };

    let expense_volatility = if categories.is_empty() {
        0.0
    } else {
        let mean_abs_trend =
            categories.iter().map(|c| c.trend.abs()).sum::<f64>() / categories.len() as f64;
        mean_abs_trend.min(0.8)
    };

    let combined = (income_volatility + expense_volatility) / 2.0;
    VolatilityMetrics {
        income_volatility,
        expense_volatility,
        overall_risk: tier_for_combined(combined),
        confidence_score: (1.0 - combined).max(0.1),
    }
}

/// Tier thresholds are strict, so a combined volatility sitting exactly on
/// a boundary stays in the lower tier.
pub fn tier_for_combined(combined: f64) -> RiskTier {
    if combined > 0.6 {
        RiskTier::High
    } else if combined > 0.3 {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::patterns;
    use crate::models::{Frequency, IncomeCategory, Transaction, TransactionKind};
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;

    fn stream(reliability: f64) -> IncomeStream {
        IncomeStream {
            id: "stream-x".into(),
            name: "X".into(),
            category: IncomeCategory::Other,
            average_amount: Decimal::from(100),
            frequency: Frequency::Monthly,
            last_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            reliability,
            growth_rate: 0.0,
        }
    }

    fn category(trend: f64) -> ExpenseCategory {
        ExpenseCategory {
            id: "cat-x".into(),
            name: "X".into(),
            budgeted: Decimal::from(120),
            spent: Decimal::from(100),
            transactions: Vec::new(),
            trend,
            is_fixed: false,
        }
    }

    #[test]
    fn tier_boundaries_are_strict() {
        assert_eq!(tier_for_combined(0.3), RiskTier::Low);
        assert_eq!(tier_for_combined(0.30001), RiskTier::Medium);
        assert_eq!(tier_for_combined(0.6), RiskTier::Medium);
        assert_eq!(tier_for_combined(0.60001), RiskTier::High);
    }

    #[test]
    fn empty_inputs_read_as_calm() {
        let m = volatility_metrics(&[], &[]);
        assert_eq!(m.income_volatility, 0.0);
        assert_eq!(m.expense_volatility, 0.0);
        assert_eq!(m.overall_risk, RiskTier::Low);
        assert_eq!(m.confidence_score, 1.0);
    }

    #[test]
    fn income_volatility_complements_mean_reliability() {
        let m = volatility_metrics(&[stream(0.9), stream(0.5)], &[]);
        assert!((m.income_volatility - 0.3).abs() < 1e-9);
    }

    #[test]
    fn expense_volatility_uses_absolute_trends_and_caps() {
        let m = volatility_metrics(&[], &[category(-0.8), category(0.8)]);
        assert_eq!(m.expense_volatility, 0.8);

        let capped = volatility_metrics(&[], &[category(0.8), category(0.8)]);
        assert!(capped.expense_volatility <= 0.8);
    }

    #[test]
    fn confidence_floors_at_a_tenth() {
        let shaky = volatility_metrics(&[stream(0.0)], &[category(0.8), category(0.8)]);
        // combined = (1.0 + 0.8) / 2 = 0.9 -> confidence would be 0.1 exactly.
        assert_eq!(shaky.confidence_score, 0.1);
        assert_eq!(shaky.overall_risk, RiskTier::High);
    }

    #[test]
    fn derived_inputs_flow_through() {
        let tx = Transaction {
            id: "t1".into(),
            title: "Paycheck".into(),
            category: String::new(),
            amount: Decimal::from(5000),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            kind: TransactionKind::Income,
            merchant: Some("Acme Payroll".into()),
            description: None,
        };
        let streams = patterns::income_streams(&[tx]);
        let m = volatility_metrics(&streams, &[]);
        // Single observation: reliability 0.5, so income volatility 0.5.
        assert!((m.income_volatility - 0.5).abs() < 1e-9);
        assert_eq!(m.overall_risk, RiskTier::Low);
    }
}
