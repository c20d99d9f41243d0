// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown transaction kind '{0}', expected 'income' or 'expense'")]
    UnknownKind(String),
    #[error("unknown frequency '{0}'")]
    UnknownFrequency(String),
    #[error("negative amount '{0}'; direction is carried by the kind, not the sign")]
    NegativeAmount(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ModelError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw financial record. `amount` is never negative; direction lives in
/// `kind`, not in the sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub title: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub kind: TransactionKind,
    pub merchant: Option<String>,
    pub description: Option<String>,
}

impl Transaction {
    /// Grouping key for income records: merchant, then title, then "Unknown".
    /// Blank strings fall through so the key is never empty.
    pub fn stream_key(&self) -> &str {
        match self.merchant.as_deref() {
            Some(m) if !m.trim().is_empty() => m,
            _ if !self.title.trim().is_empty() => &self.title,
            _ => "Unknown",
        }
    }

    /// Grouping key for expense records: the category label, default "Other".
    pub fn category_key(&self) -> &str {
        if self.category.trim().is_empty() {
            "Other"
        } else {
            &self.category
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
    Annual,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Annual => "annual",
        }
    }
}

impl FromStr for Frequency {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "annual" => Ok(Frequency::Annual),
            other => Err(ModelError::UnknownFrequency(other.to_string())),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Rental,
    Investment,
    Business,
    Other,
}

impl IncomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::Salary => "salary",
            IncomeCategory::Freelance => "freelance",
            IncomeCategory::Rental => "rental",
            IncomeCategory::Investment => "investment",
            IncomeCategory::Business => "business",
            IncomeCategory::Other => "other",
        }
    }
}

impl fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurring income source inferred from grouped records. Recomputed from
/// scratch on every analysis pass; carries no identity between passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStream {
    pub id: String,
    pub name: String,
    pub category: IncomeCategory,
    pub average_amount: Decimal,
    pub frequency: Frequency,
    pub last_date: NaiveDate,
    /// Confidence in the stream recurring, in [0, 1].
    pub reliability: f64,
    /// Relative change between the older and newer halves, in [-0.5, 0.5].
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: String,
    pub name: String,
    /// Heuristic budget line: total spent with 20% headroom.
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub transactions: Vec<Transaction>,
    /// Spending direction across the observation window, in [-0.8, 0.8].
    pub trend: f64,
    pub is_fixed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundAllocation {
    pub account: String,
    pub share: f64,
    pub amount: Decimal,
}

/// Display heuristic, not sourced from real account data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyFund {
    pub current: Decimal,
    pub target: Decimal,
    pub monthly_expenses: Decimal,
    pub accounts: Vec<FundAllocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityMetrics {
    pub income_volatility: f64,
    pub expense_volatility: f64,
    pub overall_risk: RiskTier,
    pub confidence_score: f64,
}

/// One synthesized month of the display series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net_flow: Decimal,
}

/// The one object an analysis pass returns. Owned entirely by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    pub net_cash_flow: Decimal,
    pub history: Vec<HistoricalPoint>,
    pub income_streams: Vec<IncomeStream>,
    pub expense_categories: Vec<ExpenseCategory>,
    pub emergency_fund: EmergencyFund,
    pub volatility: VolatilityMetrics,
}
