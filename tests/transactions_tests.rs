// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashlens::{cli, commands::transactions};
use rusqlite::{Connection, params};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE transactions(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL DEFAULT '12:00',
            kind TEXT NOT NULL CHECK(kind IN ('income','expense')),
            merchant TEXT,
            description TEXT
        );
        CREATE TABLE rules(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pattern TEXT NOT NULL,
            category TEXT,
            merchant_rewrite TEXT
        );
        "#,
    )
    .unwrap();
    conn
}

fn seed_rows(conn: &Connection) {
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(id,title,category,amount,date,time,kind,merchant) \
             VALUES (?1,'Coffee','Dining Out','4.50',?2,'09:00','expense',NULL)",
            params![format!("t{}", i), format!("2025-01-0{}", i)],
        )
        .unwrap();
    }
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    seed_rows(&conn);
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["cashlens", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_kind_and_month() {
    let conn = setup();
    seed_rows(&conn);
    conn.execute(
        "INSERT INTO transactions(id,title,category,amount,date,time,kind,merchant) \
         VALUES ('t4','Paycheck','','8500','2025-02-15','09:00','income','TechCorp')",
        [],
    )
    .unwrap();

    let matches =
        cli::build_cli().get_matches_from(["cashlens", "tx", "list", "--kind", "income"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].merchant, "TechCorp");

    let matches =
        cli::build_cli().get_matches_from(["cashlens", "tx", "list", "--month", "2025-01"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    assert_eq!(transactions::query_rows(&conn, list_m).unwrap().len(), 3);
}

#[test]
fn add_applies_stored_rules_for_missing_category() {
    let conn = setup();
    conn.execute(
        "INSERT INTO rules(pattern, category, merchant_rewrite) \
         VALUES ('(?i)spotify', 'Subscriptions', 'Spotify')",
        [],
    )
    .unwrap();

    let matches = cli::build_cli().get_matches_from([
        "cashlens", "tx", "add", "--date", "2025-03-01", "--title", "SPOTIFY P1X2",
        "--amount", "9.99", "--kind", "expense",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    transactions::handle(&conn, tx_m).unwrap();

    let (cat, merchant): (String, Option<String>) = conn
        .query_row(
            "SELECT category, merchant FROM transactions LIMIT 1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(cat, "Subscriptions");
    assert_eq!(merchant.as_deref(), Some("Spotify"));
}

#[test]
fn add_rejects_negative_amounts() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "cashlens", "tx", "add", "--date", "2025-03-01", "--title", "Refund",
        "--amount", "-20", "--kind", "expense",
    ]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let err = transactions::handle(&conn, tx_m).unwrap_err();
    assert!(err.to_string().contains("negative amount"));
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn rm_unknown_id_is_an_error() {
    let conn = setup();
    let matches =
        cli::build_cli().get_matches_from(["cashlens", "tx", "rm", "--id", "missing"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    assert!(transactions::handle(&conn, tx_m).is_err());
}
