// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::sync::Once;

use crate::models::ModelError;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber once. Diagnostics go to stderr so table
/// and JSON output on stdout stays pipeable.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cashlens=info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .with_context(|| format!("Invalid time '{}', expected HH:MM", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parse a record amount. Amounts are magnitudes; direction belongs to the
/// kind flag, so negatives are rejected.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO {
        return Err(ModelError::NegativeAmount(d).into());
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Observation window the stored records are assumed to span, in months.
pub fn window_months(conn: &Connection) -> Result<u32> {
    match get_setting(conn, "window_months")? {
        Some(v) => v
            .parse::<u32>()
            .with_context(|| format!("Invalid window_months setting '{}'", v)),
        None => Ok(12),
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

use regex::Regex;

/// Run the stored rules over a record's title and merchant. Returns the
/// first matching rule's category and merchant rewrite. A rule that fails
/// to compile is an error, not a silent skip.
pub fn apply_import_rules(
    conn: &Connection,
    title: &str,
    merchant: Option<&str>,
) -> Result<(Option<String>, Option<String>)> {
    let mut stmt =
        conn.prepare("SELECT pattern, category, merchant_rewrite FROM rules ORDER BY id DESC")?;
    let mut cur = stmt.query([])?;
    let hay = if let Some(m) = merchant {
        format!("{} {}", title, m)
    } else {
        title.to_string()
    };
    while let Some(r) = cur.next()? {
        let pat: String = r.get(0)?;
        let cat: Option<String> = r.get(1)?;
        let rewrite: Option<String> = r.get(2)?;
        let re = Regex::new(&pat)
            .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pat, err))?;
        if re.is_match(&hay) {
            return Ok((cat, rewrite));
        }
    }
    Ok((None, None))
}
