// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rand::Rng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::models::HistoricalPoint;

/// Manufacture a trailing monthly series around the given monthly averages,
/// oldest first, ending at the month of `reference`. The jitter makes charts
/// look lived-in; this is display smoothing, not a forecast, and callers
/// must treat the values as synthetic.
pub fn synthesize(
    monthly_income: Decimal,
    monthly_expenses: Decimal,
    months: u32,
    reference: NaiveDate,
    rng: &mut StdRng,
) -> Vec<HistoricalPoint> {
    let mut points = Vec::with_capacity(months as usize);
    for back in (0..months).rev() {
        let month = reference
            .checked_sub_months(Months::new(back))
            .unwrap_or(reference);
        let income = jitter(monthly_income, rng.gen_range(0.90..=1.10));
        let expenses = jitter(monthly_expenses, rng.gen_range(0.85..=1.15));
        points.push(HistoricalPoint {
            month: month.format("%b %Y").to_string(),
            net_flow: income - expenses,
            income,
            expenses,
        });
    }
    points
}

// Whole currency units; the charts never show cents.
fn jitter(base: Decimal, factor: f64) -> Decimal {
    let factor = Decimal::from_f64(factor).unwrap_or(Decimal::ONE);
    (base * factor).round()
}
