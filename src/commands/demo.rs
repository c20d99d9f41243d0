// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{Transaction, TransactionKind};
use anyhow::Result;
use chrono::{Datelike, Local, Months, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use uuid::Uuid;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("seed", sub)) => seed(conn, sub),
        _ => Ok(()),
    }
}

/// Populate the database with a plausible stretch of months: a salary, a
/// freelance stream, and a spread of fixed and variable expenses. Amounts
/// jitter around their bases so the derived trends are not perfectly flat.
fn seed(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let months = *sub.get_one::<u32>("months").unwrap_or(&12);
    let seed = sub
        .get_one::<u64>("seed")
        .copied()
        .unwrap_or_else(rand::random::<u64>);
    let mut rng = StdRng::seed_from_u64(seed);

    if sub.get_flag("replace") {
        conn.execute("DELETE FROM transactions", [])?;
    }

    let today = Local::now().date_naive();
    let start = today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today);

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for back in (0..months).rev() {
        let month_start = today
            .checked_sub_months(Months::new(back))
            .unwrap_or(today)
            .with_day(1)
            .unwrap_or(today);

        // Salary lands mid-month, freelance twice a month.
        count += insert(
            &tx,
            income(&mut rng, "TechCorp Payroll", "TechCorp", 8500.0, 0.02, month_start, 15),
        )?;
        for day in [7, 21] {
            count += insert(
                &tx,
                income(&mut rng, "Design consulting", "Studio North", 1200.0, 0.25, month_start, day),
            )?;
        }

        count += insert(&tx, expense(&mut rng, "Rent", "Housing", 2400.0, 0.0, month_start, 1))?;
        count += insert(
            &tx,
            expense(&mut rng, "Utilities", "Utilities", 180.0, 0.2, month_start, 5),
        )?;
        count += insert(
            &tx,
            expense(&mut rng, "Streaming bundle", "Subscriptions", 45.0, 0.0, month_start, 3),
        )?;
        for day in [4, 11, 18, 25] {
            count += insert(
                &tx,
                expense(&mut rng, "Groceries", "Groceries", 140.0, 0.3, month_start, day),
            )?;
        }
        for _ in 0..rng.gen_range(2..=5) {
            let day = rng.gen_range(1..=28);
            count += insert(
                &tx,
                expense(&mut rng, "Dinner out", "Dining Out", 60.0, 0.5, month_start, day),
            )?;
        }
    }
    tx.commit()?;
    println!(
        "Seeded {} transactions from {} to {} (seed {})",
        count, start, today, seed
    );
    Ok(())
}

fn insert(conn: &Connection, t: Transaction) -> Result<usize> {
    db::insert_transaction(conn, &t)?;
    Ok(1)
}

fn income(
    rng: &mut StdRng,
    title: &str,
    merchant: &str,
    base: f64,
    spread: f64,
    month_start: NaiveDate,
    day: u32,
) -> Transaction {
    record(rng, TransactionKind::Income, title, "", Some(merchant), base, spread, month_start, day)
}

fn expense(
    rng: &mut StdRng,
    title: &str,
    category: &str,
    base: f64,
    spread: f64,
    month_start: NaiveDate,
    day: u32,
) -> Transaction {
    record(rng, TransactionKind::Expense, title, category, None, base, spread, month_start, day)
}

#[allow(clippy::too_many_arguments)]
fn record(
    rng: &mut StdRng,
    kind: TransactionKind,
    title: &str,
    category: &str,
    merchant: Option<&str>,
    base: f64,
    spread: f64,
    month_start: NaiveDate,
    day: u32,
) -> Transaction {
    let factor = if spread > 0.0 {
        rng.gen_range(1.0 - spread..=1.0 + spread)
    } else {
        1.0
    };
    let amount = Decimal::from_f64(base * factor)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2);
    let date = month_start.with_day(day).unwrap_or(month_start);
    let hour = rng.gen_range(8..=20);
    Transaction {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        category: category.to_string(),
        amount,
        date,
        time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
        kind,
        merchant: merchant.map(|m| m.to_string()),
        description: None,
    }
}
