// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Transaction, TransactionKind};
use crate::utils::{apply_import_rules, parse_amount, parse_date, parse_time};
use anyhow::{Context, Result};
use chrono::NaiveTime;
use csv::ReaderBuilder;
use rusqlite::{Connection, params};
use std::str::FromStr;
use uuid::Uuid;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Expected columns: date, title, amount, kind, category, merchant, time,
/// description. The first four are required; the rest may be blank. The
/// whole file imports in one database transaction, so a bad row aborts the
/// import instead of leaving half of it behind.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut imported = 0usize;

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2; // header is line 1
        let rec = result?;
        let date_raw = rec
            .get(0)
            .with_context(|| format!("line {}: date missing", line))?
            .trim();
        let title = rec
            .get(1)
            .with_context(|| format!("line {}: title missing", line))?
            .trim()
            .to_string();
        let amount_raw = rec
            .get(2)
            .with_context(|| format!("line {}: amount missing", line))?
            .trim();
        let kind_raw = rec
            .get(3)
            .with_context(|| format!("line {}: kind missing", line))?
            .trim();
        let mut category = rec.get(4).unwrap_or("").trim().to_string();
        let mut merchant = rec
            .get(5)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());
        let time_raw = rec.get(6).unwrap_or("").trim();
        let description = rec
            .get(7)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let date = parse_date(date_raw)
            .with_context(|| format!("line {}: invalid date '{}'", line, date_raw))?;
        let amount = parse_amount(amount_raw)
            .with_context(|| format!("line {}: invalid amount '{}' for {}", line, amount_raw, title))?;
        let kind = TransactionKind::from_str(kind_raw)
            .with_context(|| format!("line {}: invalid kind '{}'", line, kind_raw))?;
        let time = if time_raw.is_empty() {
            NaiveTime::from_hms_opt(12, 0, 0).unwrap()
        } else {
            parse_time(time_raw)
                .with_context(|| format!("line {}: invalid time '{}'", line, time_raw))?
        };

        let (rule_cat, rewrite) = apply_import_rules(&tx, &title, merchant.as_deref())?;
        if category.is_empty() {
            category = rule_cat.unwrap_or_default();
        }
        if let Some(new_merchant) = rewrite.filter(|m| Some(m) != merchant.as_ref()) {
            merchant = Some(new_merchant);
        }

        let t = Transaction {
            id: Uuid::new_v4().to_string(),
            title,
            category,
            amount,
            date,
            time,
            kind,
            merchant,
            description,
        };
        tx.execute(
            "INSERT INTO transactions(id, title, category, amount, date, time, kind, merchant, description) \
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                t.id,
                t.title,
                t.category,
                t.amount.to_string(),
                t.date.to_string(),
                t.time.format("%H:%M").to_string(),
                t.kind.as_str(),
                t.merchant,
                t.description
            ],
        )?;
        imported += 1;
    }
    tx.commit()?;
    println!("Imported {} transactions from {}", imported, path);
    Ok(())
}
