// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{pretty_table, set_setting, window_months};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![vec![
                "window_months".to_string(),
                window_months(conn)?.to_string(),
            ]];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("set", sub)) => {
            if let Some(w) = sub.get_one::<u32>("window-months") {
                set_setting(conn, "window_months", &w.to_string())?;
                println!("window_months = {}", w);
            } else {
                println!("Nothing to set (try --window-months)");
            }
        }
        _ => {}
    }
    Ok(())
}
