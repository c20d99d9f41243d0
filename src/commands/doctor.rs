// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{parse_date, parse_time, pretty_table};
use anyhow::Result;
use regex::Regex;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Scan stored rows for anything `load_transactions` would skip, plus
/// rules that no longer compile. Reports, never repairs.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    let mut stmt =
        conn.prepare("SELECT id, amount, date, time, kind, title, merchant FROM transactions")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let date: String = r.get(2)?;
        let time: String = r.get(3)?;
        let kind: String = r.get(4)?;
        let title: String = r.get(5)?;
        let merchant: Option<String> = r.get(6)?;

        match amount.parse::<Decimal>() {
            Ok(d) if d < Decimal::ZERO => {
                rows.push(vec!["negative_amount".into(), format!("{} {}", id, amount)]);
            }
            Ok(_) => {}
            Err(_) => rows.push(vec!["bad_amount".into(), format!("{} '{}'", id, amount)]),
        }
        if parse_date(&date).is_err() {
            rows.push(vec!["bad_date".into(), format!("{} '{}'", id, date)]);
        }
        if parse_time(&time).is_err() {
            rows.push(vec!["bad_time".into(), format!("{} '{}'", id, time)]);
        }
        if crate::models::TransactionKind::from_str(&kind).is_err() {
            rows.push(vec!["bad_kind".into(), format!("{} '{}'", id, kind)]);
        }
        // These still analyze (they land in the Unknown bucket), but the
        // bucket usually means a sloppy import worth fixing.
        if title.trim().is_empty() && merchant.as_deref().unwrap_or("").trim().is_empty() {
            rows.push(vec!["blank_grouping_key".into(), id.clone()]);
        }
    }

    let mut stmt2 = conn.prepare("SELECT id, pattern FROM rules")?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let pattern: String = r.get(1)?;
        if Regex::new(&pattern).is_err() {
            rows.push(vec!["bad_rule_regex".into(), format!("rule {} /{}/", id, pattern)]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
