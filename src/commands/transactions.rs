// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::{Transaction, TransactionKind};
use crate::utils::{
    apply_import_rules, maybe_print_json, parse_amount, parse_date, parse_month, parse_time,
    pretty_table,
};
use anyhow::{Result, anyhow};
use chrono::NaiveTime;
use rusqlite::{Connection, params};
use serde::Serialize;
use std::str::FromStr;
use uuid::Uuid;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let title = sub.get_one::<String>("title").unwrap().trim().to_string();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let kind = TransactionKind::from_str(sub.get_one::<String>("kind").unwrap())?;
    let mut category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let mut merchant = sub
        .get_one::<String>("merchant")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    let time = match sub.get_one::<String>("time") {
        Some(t) => parse_time(t)?,
        None => NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
    };
    let description = sub.get_one::<String>("description").map(|s| s.to_string());

    if category.is_empty() || merchant.is_none() {
        let (rule_cat, rewrite) = apply_import_rules(conn, &title, merchant.as_deref())?;
        if category.is_empty() {
            category = rule_cat.unwrap_or_default();
        }
        if let Some(new_merchant) = rewrite {
            println!("Merchant rewritten: {}", new_merchant);
            merchant = Some(new_merchant);
        }
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
    db::insert_transaction(conn, &t)?;
    println!("Recorded {} {} on {} '{}'", t.kind, t.amount, t.date, t.title);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.title.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.merchant.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Title", "Amount", "Category", "Merchant"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("No transaction with id '{}'", id));
    }
    println!("Removed transaction {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub title: String,
    pub amount: String,
    pub category: String,
    pub merchant: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT id, date, kind, title, amount, category, merchant FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        parse_month(month)?;
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(kind) = sub.get_one::<String>("kind") {
        let kind = TransactionKind::from_str(kind)?;
        sql.push_str(" AND kind=?");
        params_vec.push(kind.as_str().into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND category=?");
        params_vec.push(cat.into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let merchant: Option<String> = r.get(6)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            kind: r.get(2)?,
            title: r.get(3)?,
            amount: r.get(4)?,
            category: r.get(5)?,
            merchant: merchant.unwrap_or_default(),
        });
    }
    Ok(data)
}
