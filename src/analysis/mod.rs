// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod classify;
pub mod history;
pub mod patterns;
pub mod risk;

use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{
    CashFlowSummary, EmergencyFund, Frequency, FundAllocation, Transaction,
};

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Months the input list is assumed to span. Expense totals are divided
    /// by this to get a monthly figure.
    pub window_months: u32,
    /// Length of the synthesized display series.
    pub history_months: u32,
    /// Pin the series RNG for reproducible runs.
    pub seed: Option<u64>,
    /// Month the series ends at; today when unset.
    pub reference_date: Option<NaiveDate>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_months: 12,
            history_months: 12,
            seed: None,
            reference_date: None,
        }
    }
}

/// Derives a [`CashFlowSummary`] from a flat transaction list. Holds no
/// state between calls and never mutates its input; construct one wherever
/// needed.
#[derive(Debug, Clone, Default)]
pub struct CashFlowAnalyzer {
    config: AnalyzerConfig,
}

impl CashFlowAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, transactions: &[Transaction]) -> CashFlowSummary {
        let streams = patterns::income_streams(transactions);
        let categories = patterns::expense_categories(transactions);
        debug!(
            records = transactions.len(),
            streams = streams.len(),
            categories = categories.len(),
            "aggregated transaction groups"
        );

        let monthly_income: Decimal = streams
            .iter()
            .map(|s| monthly_equivalent(s.average_amount, s.frequency))
            .sum();
        let spent_total: Decimal = categories.iter().map(|c| c.spent).sum();
        let window = self.config.window_months.max(1);
        let monthly_expenses = spent_total / Decimal::from(window);

        let volatility = risk::volatility_metrics(&streams, &categories);

        let reference = self
            .config
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        let seed = self.config.seed.unwrap_or_else(rand::random::<u64>);
        let mut rng = StdRng::seed_from_u64(seed);
        let history = history::synthesize(
            monthly_income,
            monthly_expenses,
            self.config.history_months,
            reference,
            &mut rng,
        );

        CashFlowSummary {
            monthly_income,
            monthly_expenses,
            net_cash_flow: monthly_income - monthly_expenses,
            history,
            emergency_fund: emergency_fund_snapshot(monthly_expenses),
            volatility,
            income_streams: streams,
            expense_categories: categories,
        }
    }
}

/// Monthly-equivalent amount for a stream paid at the given cadence.
pub fn monthly_equivalent(amount: Decimal, frequency: Frequency) -> Decimal {
    match frequency {
        Frequency::Weekly => amount * Decimal::new(433, 2),
        Frequency::Biweekly => amount * Decimal::new(217, 2),
        Frequency::Monthly => amount,
        Frequency::Annual => amount / Decimal::from(12),
    }
}

/// Six months of expenses to aim for, assumed half funded, parked across a
/// fixed three-way split. Display heuristic only.
pub fn emergency_fund_snapshot(monthly_expenses: Decimal) -> EmergencyFund {
    let target = monthly_expenses * Decimal::from(6);
    let current = monthly_expenses * Decimal::from(3);
    let accounts = [
        ("High-Yield Savings", 70u32),
        ("Checking Buffer", 20),
        ("Money Market", 10),
    ]
    .iter()
    .map(|(account, pct)| FundAllocation {
        account: (*account).to_string(),
        share: f64::from(*pct) / 100.0,
        amount: (current * Decimal::from(*pct) / Decimal::from(100)).round_dp(2),
    })
    .collect();
    EmergencyFund {
        current,
        target,
        monthly_expenses,
        accounts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskTier, TransactionKind};
    use chrono::NaiveTime;

    fn analyzer(seed: u64) -> CashFlowAnalyzer {
        CashFlowAnalyzer::new(AnalyzerConfig {
            seed: Some(seed),
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..AnalyzerConfig::default()
        })
    }

    fn record(
        kind: TransactionKind,
        merchant: Option<&str>,
        category: &str,
        amount: i64,
        date: &str,
    ) -> Transaction {
        Transaction {
            id: format!("{}-{}", date, amount),
            title: "entry".into(),
            category: category.to_string(),
            amount: Decimal::from(amount),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            kind,
            merchant: merchant.map(|m| m.to_string()),
            description: None,
        }
    }

    #[test]
    fn monthly_equivalents_use_fixed_multipliers() {
        let hundred = Decimal::from(100);
        assert_eq!(
            monthly_equivalent(hundred, Frequency::Weekly),
            Decimal::from(433)
        );
        assert_eq!(
            monthly_equivalent(hundred, Frequency::Biweekly),
            Decimal::from(217)
        );
        assert_eq!(
            monthly_equivalent(hundred, Frequency::Monthly),
            Decimal::from(100)
        );
        assert_eq!(
            monthly_equivalent(Decimal::from(1200), Frequency::Annual),
            Decimal::from(100)
        );
    }

    #[test]
    fn end_to_end_scenario() {
        let txs = vec![
            record(TransactionKind::Income, Some("TechCorp"), "", 8500, "2024-01-15"),
            record(TransactionKind::Income, Some("TechCorp"), "", 8500, "2024-02-15"),
            record(TransactionKind::Expense, None, "Housing", 2800, "2024-01-05"),
        ];
        let summary = analyzer(11).analyze(&txs);

        assert_eq!(summary.income_streams.len(), 1);
        let stream = &summary.income_streams[0];
        assert_eq!(stream.name, "TechCorp");
        assert_eq!(stream.frequency, Frequency::Monthly);
        assert!((stream.reliability - 0.6).abs() < 1e-9);
        assert_eq!(stream.average_amount, Decimal::from(8500));

        assert_eq!(summary.expense_categories.len(), 1);
        let housing = &summary.expense_categories[0];
        assert_eq!(housing.name, "Housing");
        assert_eq!(housing.spent, Decimal::from(2800));
        assert_eq!(housing.budgeted, Decimal::from(3360));
        assert_eq!(housing.trend, 0.0);
        assert!(!housing.is_fixed);

        // 31 days between occurrences -> monthly, x1.
        assert_eq!(summary.monthly_income, Decimal::from(8500));
    }

    #[test]
    fn expense_window_is_a_parameter_not_a_constant() {
        let txs = vec![
            record(TransactionKind::Expense, None, "Groceries", 600, "2024-05-01"),
            record(TransactionKind::Expense, None, "Groceries", 600, "2024-06-01"),
        ];
        let yearly = analyzer(3).analyze(&txs);
        assert_eq!(yearly.monthly_expenses, Decimal::from(100));

        let two_month = CashFlowAnalyzer::new(AnalyzerConfig {
            window_months: 2,
            seed: Some(3),
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..AnalyzerConfig::default()
        })
        .analyze(&txs);
        assert_eq!(two_month.monthly_expenses, Decimal::from(600));
    }

    #[test]
    fn empty_input_produces_a_calm_zeroed_summary() {
        let summary = analyzer(1).analyze(&[]);
        assert!(summary.income_streams.is_empty());
        assert!(summary.expense_categories.is_empty());
        assert_eq!(summary.monthly_income, Decimal::ZERO);
        assert_eq!(summary.monthly_expenses, Decimal::ZERO);
        assert_eq!(summary.net_cash_flow, Decimal::ZERO);
        assert_eq!(summary.volatility.overall_risk, RiskTier::Low);
        assert_eq!(summary.volatility.confidence_score, 1.0);
        assert_eq!(summary.emergency_fund.target, Decimal::ZERO);
        assert_eq!(summary.history.len(), 12);
    }

    #[test]
    fn emergency_fund_sized_from_monthly_expenses() {
        let fund = emergency_fund_snapshot(Decimal::from(3000));
        assert_eq!(fund.target, Decimal::from(18000));
        assert_eq!(fund.current, Decimal::from(9000));
        assert_eq!(fund.accounts.len(), 3);
        let total: Decimal = fund.accounts.iter().map(|a| a.amount).sum();
        assert_eq!(total, fund.current);
        assert_eq!(fund.accounts[0].account, "High-Yield Savings");
        assert!((fund.accounts[0].share - 0.7).abs() < 1e-9);
        assert_eq!(fund.accounts[0].amount, Decimal::from(6300));
    }

    #[test]
    fn identical_runs_agree_when_seeded() {
        let txs = vec![
            record(TransactionKind::Income, Some("TechCorp"), "", 8500, "2024-01-15"),
            record(TransactionKind::Income, Some("TechCorp"), "", 8500, "2024-02-15"),
            record(TransactionKind::Expense, None, "Housing", 2800, "2024-01-05"),
        ];
        let a = analyzer(99).analyze(&txs);
        let b = analyzer(99).analyze(&txs.clone());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn unseeded_series_still_respects_bands() {
        let txs = vec![record(
            TransactionKind::Income,
            Some("TechCorp"),
            "",
            8500,
            "2024-01-15",
        )];
        let summary = CashFlowAnalyzer::default().analyze(&txs);
        for p in &summary.history {
            assert!(p.income >= Decimal::from(7650) && p.income <= Decimal::from(9350));
        }
    }
}
