// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::HashMap;

use crate::analysis::classify;
use crate::models::{ExpenseCategory, Frequency, IncomeStream, Transaction, TransactionKind};

/// Group income records by stream key and derive one stream per group,
/// sorted by average amount descending. Ties break on the name so repeated
/// passes over the same input agree.
pub fn income_streams(transactions: &[Transaction]) -> Vec<IncomeStream> {
    let mut groups: HashMap<String, Vec<&Transaction>> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
    {
        groups.entry(t.stream_key().to_string()).or_default().push(t);
    }

    let mut streams: Vec<IncomeStream> = groups
        .into_iter()
        .map(|(name, group)| build_stream(name, group))
        .collect();
    streams.sort_by(|a, b| {
        b.average_amount
            .cmp(&a.average_amount)
            .then_with(|| a.name.cmp(&b.name))
    });
    streams
}

fn build_stream(name: String, mut group: Vec<&Transaction>) -> IncomeStream {
    group.sort_by_key(|t| t.date);
    let count = group.len().max(1);
    let total: Decimal = group.iter().map(|t| t.amount).sum();
    let amounts: Vec<Decimal> = group.iter().map(|t| t.amount).collect();
    let dates: Vec<NaiveDate> = group.iter().map(|t| t.date).collect();

    IncomeStream {
        id: format!("stream-{}", slug(&name)),
        category: classify::income_category_for(&name),
        average_amount: total / Decimal::from(count),
        frequency: infer_frequency(&dates),
        last_date: dates.iter().copied().max().unwrap_or_default(),
        reliability: reliability_for_count(group.len()),
        growth_rate: growth_rate(&amounts),
        name,
    }
}

/// Group expense records by category label and derive one category per
/// group, sorted by total spent descending.
pub fn expense_categories(transactions: &[Transaction]) -> Vec<ExpenseCategory> {
    let mut groups: HashMap<String, Vec<Transaction>> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
    {
        groups
            .entry(t.category_key().to_string())
            .or_default()
            .push(t.clone());
    }

    let mut categories: Vec<ExpenseCategory> = groups
        .into_iter()
        .map(|(name, mut group)| {
            group.sort_by_key(|t| t.date);
            let spent: Decimal = group.iter().map(|t| t.amount).sum();
            let amounts: Vec<Decimal> = group.iter().map(|t| t.amount).collect();
            ExpenseCategory {
                id: format!("cat-{}", slug(&name)),
                budgeted: (spent * Decimal::new(12, 1)).round(),
                spent,
                trend: spending_trend(&amounts),
                is_fixed: classify::is_fixed_expense(&name),
                transactions: group,
                name,
            }
        })
        .collect();
    categories.sort_by(|a, b| b.spent.cmp(&a.spent).then_with(|| a.name.cmp(&b.name)));
    categories
}

/// Mean gap in days between consecutive occurrences mapped to a cadence.
/// Boundaries are inclusive on the shorter cadence.
pub fn frequency_for_gap(mean_gap_days: f64) -> Frequency {
    if mean_gap_days <= 10.0 {
        Frequency::Weekly
    } else if mean_gap_days <= 20.0 {
        Frequency::Biweekly
    } else if mean_gap_days <= 40.0 {
        Frequency::Monthly
    } else {
        Frequency::Annual
    }
}

fn infer_frequency(dates: &[NaiveDate]) -> Frequency {
    if dates.len() < 2 {
        return Frequency::Monthly;
    }
    let mut sorted = dates.to_vec();
    sorted.sort();
    let gaps: Vec<i64> = sorted
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();
    let mean = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
    frequency_for_gap(mean)
}

/// More observed occurrences raise confidence, capped at 0.95. A single
/// observation scores 0.5.
pub fn reliability_for_count(count: usize) -> f64 {
    (0.4 + 0.1 * count as f64).min(0.95)
}

/// Relative change between the mean of the older half and the mean of the
/// newer half of a chronological amount series, clamped to [-0.5, 0.5].
pub fn growth_rate(amounts: &[Decimal]) -> f64 {
    half_over_half(amounts, 0.5, mean_f64)
}

/// Same split as [`growth_rate`] but on sums, clamped to [-0.8, 0.8].
pub fn spending_trend(amounts: &[Decimal]) -> f64 {
    half_over_half(amounts, 0.8, sum_f64)
}

// For odd counts the newer half takes the extra element. Too few points or
// a zero older statistic yields 0 rather than a division blowup.
fn half_over_half<F>(values: &[Decimal], bound: f64, stat: F) -> f64
where
    F: Fn(&[Decimal]) -> f64,
{
    if values.len() <= 2 {
        return 0.0;
    }
    let (older, newer) = values.split_at(values.len() / 2);
    let older_stat = stat(older);
    if older_stat == 0.0 {
        return 0.0;
    }
    ((stat(newer) - older_stat) / older_stat).clamp(-bound, bound)
}

fn mean_f64(values: &[Decimal]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum_f64(values) / values.len() as f64
}

fn sum_f64(values: &[Decimal]) -> f64 {
    values
        .iter()
        .copied()
        .sum::<Decimal>()
        .to_f64()
        .unwrap_or(0.0)
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') && !out.is_empty() {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}
