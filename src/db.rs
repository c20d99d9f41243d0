// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

use crate::models::{ModelError, Transaction, TransactionKind};
use crate::utils::{parse_date, parse_time};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Cashlens", "cashlens"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cashlens.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT '',
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        time TEXT NOT NULL DEFAULT '12:00',
        kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
        merchant TEXT,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_kind ON transactions(kind);

    CREATE TABLE IF NOT EXISTS rules(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pattern TEXT NOT NULL,
        category TEXT,
        merchant_rewrite TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

pub fn insert_transaction(conn: &Connection, t: &Transaction) -> Result<()> {
    conn.execute(
        "INSERT INTO transactions(id, title, category, amount, date, time, kind, merchant, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
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
    Ok(())
}

/// Load every stored record, oldest first. Rows that no longer parse are
/// skipped with a warning so one corrupt row cannot poison an analysis
/// pass.
pub fn load_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, category, amount, date, time, kind, merchant, description
         FROM transactions ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let raw = RawRow {
            title: r.get(1)?,
            category: r.get(2)?,
            amount: r.get(3)?,
            date: r.get(4)?,
            time: r.get(5)?,
            kind: r.get(6)?,
            merchant: r.get(7)?,
            description: r.get(8)?,
        };
        match raw.into_transaction(id.clone()) {
            Ok(t) => out.push(t),
            Err(err) => warn!(id = %id, error = %err, "skipping unreadable transaction row"),
        }
    }
    Ok(out)
}

struct RawRow {
    title: String,
    category: String,
    amount: String,
    date: String,
    time: String,
    kind: String,
    merchant: Option<String>,
    description: Option<String>,
}

impl RawRow {
    fn into_transaction(self, id: String) -> Result<Transaction> {
        let amount = crate::utils::parse_decimal(&self.amount)?;
        if amount < rust_decimal::Decimal::ZERO {
            return Err(ModelError::NegativeAmount(amount).into());
        }
        Ok(Transaction {
            id,
            title: self.title,
            category: self.category,
            amount,
            date: parse_date(&self.date)?,
            time: parse_time(&self.time)?,
            kind: TransactionKind::from_str(&self.kind)?,
            merchant: self.merchant,
            description: self.description,
        })
    }
}
