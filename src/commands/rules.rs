// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Result, anyhow};
use regex::Regex;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let pattern_raw = sub.get_one::<String>("pattern").unwrap();
            let pattern = pattern_raw.trim();
            Regex::new(pattern)
                .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;

            let cat = sub
                .get_one::<String>("category")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());
            let rewrite = sub
                .get_one::<String>("merchant-rewrite")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());
            conn.execute(
                "INSERT INTO rules(pattern, category, merchant_rewrite) VALUES (?1,?2,?3)",
                params![pattern, cat, rewrite],
            )?;
            println!(
                "Added rule: /{}/ -> category {:?}, rewrite {:?}",
                pattern, cat, rewrite
            );
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT id, pattern, COALESCE(category,''), COALESCE(merchant_rewrite,'')
                 FROM rules ORDER BY id DESC",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, pat, cat, rew) = row?;
                data.push(vec![id.to_string(), pat, cat, rew]);
            }
            println!(
                "{}",
                pretty_table(&["ID", "Pattern", "Category", "Merchant Rewrite"], data)
            );
        }
        Some(("rm", sub)) => {
            let raw = sub.get_one::<String>("id").unwrap();
            let id = raw.trim().parse::<i64>()?;
            conn.execute("DELETE FROM rules WHERE id=?1", params![id])?;
            println!("Removed rule {}", id);
        }
        _ => {}
    }
    Ok(())
}
