// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn with_json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn window_arg() -> Arg {
    Arg::new("window-months")
        .long("window-months")
        .value_parser(value_parser!(u32))
        .help("Months the stored records span (defaults to the configured window)")
}

fn seed_arg() -> Arg {
    Arg::new("seed")
        .long("seed")
        .value_parser(value_parser!(u64))
        .help("Pin the synthesized series RNG")
}

pub fn build_cli() -> Command {
    Command::new("cashlens")
        .about(clap::crate_description!())
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true)
                                .help("Non-negative amount; direction comes from --kind"),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income | expense"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("merchant").long("merchant"))
                        .arg(Arg::new("time").long("time").help("HH:MM, default 12:00"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(with_json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("kind").long("kind").help("income | expense"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("import").about("Import data").subcommand(
                Command::new("transactions")
                    .about("Import transactions from CSV")
                    .arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv | json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("rules")
                .about("Auto-categorization rules applied to incoming records")
                .subcommand(
                    Command::new("add")
                        .about("Add a rule")
                        .arg(
                            Arg::new("pattern")
                                .long("pattern")
                                .required(true)
                                .help("Regex matched against title and merchant"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("merchant-rewrite").long("merchant-rewrite")),
                )
                .subcommand(Command::new("list").about("List rules"))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a rule")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Cash-flow analytics over the stored transactions")
                .subcommand(with_json_flags(
                    Command::new("overview")
                        .about("Full cash-flow summary")
                        .arg(window_arg())
                        .arg(
                            Arg::new("history-months")
                                .long("history-months")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(seed_arg()),
                ))
                .subcommand(with_json_flags(
                    Command::new("streams").about("Detected income streams"),
                ))
                .subcommand(with_json_flags(
                    Command::new("spending").about("Expense categories with budgets and trends"),
                ))
                .subcommand(with_json_flags(
                    Command::new("risk").about("Volatility and risk reading"),
                ))
                .subcommand(with_json_flags(
                    Command::new("history")
                        .about("Synthesized monthly income/expense series")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32))
                                .help("Series length, default 12"),
                        )
                        .arg(window_arg())
                        .arg(seed_arg()),
                ))
                .subcommand(with_json_flags(
                    Command::new("emergency")
                        .about("Emergency fund sizing")
                        .arg(window_arg()),
                )),
        )
        .subcommand(
            Command::new("demo").about("Demo data").subcommand(
                Command::new("seed")
                    .about("Seed a plausible year of transactions")
                    .arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(u32))
                            .help("How many months to generate, default 12"),
                    )
                    .arg(seed_arg())
                    .arg(
                        Arg::new("replace")
                            .long("replace")
                            .action(ArgAction::SetTrue)
                            .help("Clear existing transactions first"),
                    ),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Analysis settings")
                .subcommand(Command::new("show").about("Show settings"))
                .subcommand(
                    Command::new("set")
                        .about("Update settings")
                        .arg(window_arg()),
                ),
        )
        .subcommand(Command::new("doctor").about("Scan stored data for problems"))
}
