// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashlens::{cli, commands::exporter};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE transactions(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL DEFAULT '12:00',
            kind TEXT NOT NULL,
            merchant TEXT,
            description TEXT
        );
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(id,title,category,amount,date,time,kind,merchant,description) \
         VALUES ('t1','Corner Shop','Groceries','12.34','2025-01-02','18:15','expense',NULL,'Weekly run')",
        [],
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, format: &str, out: &str) {
    let matches = cli::build_cli().get_matches_from([
        "cashlens",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    let (_, export_m) = matches.subcommand().unwrap();
    exporter::handle(conn, export_m).unwrap();
}

#[test]
fn export_transactions_writes_pretty_json() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.json");
    run_export(&conn, "json", &out.to_string_lossy());

    let contents = std::fs::read_to_string(&out).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": "t1",
                "date": "2025-01-02",
                "time": "18:15",
                "kind": "expense",
                "title": "Corner Shop",
                "amount": "12.34",
                "category": "Groceries",
                "merchant": null,
                "description": "Weekly run"
            }
        ])
    );
}

#[test]
fn export_csv_round_trips_through_the_importer() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.csv");
    run_export(&conn, "csv", &out.to_string_lossy());

    let contents = std::fs::read_to_string(&out).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,title,amount,kind,category,merchant,time,description"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2025-01-02,Corner Shop,12.34,expense,Groceries,,18:15,Weekly run"
    );

    // The header order matches what `import transactions` expects.
    let mut dest = Connection::open_in_memory().unwrap();
    dest.execute_batch(
        r#"
        CREATE TABLE transactions(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL DEFAULT '12:00',
            kind TEXT NOT NULL,
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
    let matches = cli::build_cli().get_matches_from([
        "cashlens",
        "import",
        "transactions",
        "--path",
        &out.to_string_lossy(),
    ]);
    let (_, import_m) = matches.subcommand().unwrap();
    cashlens::commands::importer::handle(&mut dest, import_m).unwrap();
    let n: i64 = dest
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
}
