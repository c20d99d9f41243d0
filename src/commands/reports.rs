// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analysis::{AnalyzerConfig, CashFlowAnalyzer};
use crate::db;
use crate::models::CashFlowSummary;
use crate::utils::{fmt_money, maybe_print_json, pretty_table, window_months};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => overview(conn, sub)?,
        Some(("streams", sub)) => streams(conn, sub)?,
        Some(("spending", sub)) => spending(conn, sub)?,
        Some(("risk", sub)) => risk(conn, sub)?,
        Some(("history", sub)) => history(conn, sub)?,
        Some(("emergency", sub)) => emergency(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Run one analysis pass over the stored records. The observation window
/// comes from `--window-months`, falling back to the configured setting;
/// `--seed` pins the synthesized series.
fn analyze(conn: &Connection, sub: &clap::ArgMatches, history_arg: &str) -> Result<CashFlowSummary> {
    let window = match sub.try_get_one::<u32>("window-months") {
        Ok(Some(w)) => *w,
        _ => window_months(conn)?,
    };
    let history = match sub.try_get_one::<u32>(history_arg) {
        Ok(Some(n)) => *n,
        _ => 12,
    };
    let seed = match sub.try_get_one::<u64>("seed") {
        Ok(s) => s.copied(),
        Err(_) => None,
    };
    let transactions = db::load_transactions(conn)?;
    let analyzer = CashFlowAnalyzer::new(AnalyzerConfig {
        window_months: window,
        history_months: history,
        seed,
        reference_date: None,
    });
    Ok(analyzer.analyze(&transactions))
}

fn overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let summary = analyze(conn, sub, "history-months")?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Monthly income".into(), fmt_money(&summary.monthly_income)],
        vec!["Monthly expenses".into(), fmt_money(&summary.monthly_expenses)],
        vec!["Net cash flow".into(), fmt_money(&summary.net_cash_flow)],
        vec!["Income streams".into(), summary.income_streams.len().to_string()],
        vec![
            "Expense categories".into(),
            summary.expense_categories.len().to_string(),
        ],
        vec![
            "Overall risk".into(),
            summary.volatility.overall_risk.to_string(),
        ],
        vec![
            "Confidence".into(),
            format!("{:.2}", summary.volatility.confidence_score),
        ],
        vec![
            "Emergency fund target".into(),
            fmt_money(&summary.emergency_fund.target),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn streams(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let summary = analyze(conn, sub, "history-months")?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary.income_streams)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = summary
        .income_streams
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.category.to_string(),
                fmt_money(&s.average_amount),
                s.frequency.to_string(),
                s.last_date.to_string(),
                format!("{:.2}", s.reliability),
                format!("{:+.2}", s.growth_rate),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Stream", "Category", "Avg Amount", "Frequency", "Last Seen", "Reliability", "Growth"],
            rows,
        )
    );
    Ok(())
}

fn spending(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let summary = analyze(conn, sub, "history-months")?;
    if maybe_print_json(
        sub.get_flag("json"),
        sub.get_flag("jsonl"),
        &summary.expense_categories,
    )? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = summary
        .expense_categories
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_money(&c.spent),
                fmt_money(&c.budgeted),
                format!("{:+.2}", c.trend),
                if c.is_fixed { "fixed" } else { "variable" }.into(),
                c.transactions.len().to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Spent", "Budgeted", "Trend", "Kind", "Txns"],
            rows,
        )
    );
    Ok(())
}

fn risk(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let summary = analyze(conn, sub, "history-months")?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary.volatility)? {
        return Ok(());
    }
    let v = &summary.volatility;
    let rows = vec![
        vec!["Income volatility".into(), format!("{:.2}", v.income_volatility)],
        vec![
            "Expense volatility".into(),
            format!("{:.2}", v.expense_volatility),
        ],
        vec!["Overall risk".into(), v.overall_risk.to_string()],
        vec!["Confidence".into(), format!("{:.2}", v.confidence_score)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let summary = analyze(conn, sub, "months")?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary.history)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = summary
        .history
        .iter()
        .map(|p| {
            vec![
                p.month.clone(),
                fmt_money(&p.income),
                fmt_money(&p.expenses),
                fmt_money(&p.net_flow),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Net"], rows)
    );
    println!("Note: synthesized around current monthly averages, not recorded history.");
    Ok(())
}

fn emergency(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let summary = analyze(conn, sub, "history-months")?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary.emergency_fund)? {
        return Ok(());
    }
    let fund = &summary.emergency_fund;
    let mut rows = vec![
        vec!["Monthly expenses".into(), fmt_money(&fund.monthly_expenses)],
        vec!["Target (6 months)".into(), fmt_money(&fund.target)],
        vec!["Current".into(), fmt_money(&fund.current)],
    ];
    for a in &fund.accounts {
        rows.push(vec![
            format!("  {} ({:.0}%)", a.account, a.share * 100.0),
            fmt_money(&a.amount),
        ]);
    }
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    Ok(())
}
