//! Command line interface
//!
//! Lists are addressed by the 1-based numbers shown in the first column
//! of every table.

use clap::{App, AppSettings, Arg, SubCommand};

use crate::cli::config::{DEFAULT_CURRENCY, DEFAULT_DATA};

fn number<'a, 'b>(what: &'b str) -> Arg<'a, 'b> {
    Arg::with_name("N")
        .help(what)
        .required(true)
}

fn text<'a, 'b>(name: &'a str, help: &'b str) -> Arg<'a, 'b> {
    Arg::with_name(name).help(help).required(true)
}

fn signed<'a, 'b>(name: &'a str, help: &'b str) -> Arg<'a, 'b> {
    text(name, help).allow_hyphen_values(true)
}

fn list<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("list").about("Show the section")
}

fn remove<'a, 'b>(what: &'b str) -> App<'a, 'b> {
    SubCommand::with_name("rm")
        .about("Remove an item")
        .arg(number(what))
}

fn plan<'a, 'b>() -> App<'a, 'b> {
    let mut set = SubCommand::with_name("set")
        .about("Replace the whole plan, omitted goals become empty");
    for (key, label) in [("long", "long-term"), ("mid", "mid-term"), ("short", "short-term")] {
        set = set
            .arg(
                Arg::with_name(key)
                    .long(key)
                    .takes_value(true)
                    .value_name("GOAL")
                    .help(label),
            )
            .arg(
                Arg::with_name(date_arg(key))
                    .long(date_arg(key))
                    .takes_value(true)
                    .value_name("DATE")
                    .help("target date, YYYY-MM-DD"),
            )
            .arg(
                Arg::with_name(purpose_arg(key))
                    .long(purpose_arg(key))
                    .takes_value(true)
                    .value_name("WHY"),
            );
    }
    SubCommand::with_name("plan")
        .about("Long, mid and short-term goals")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(set)
        .subcommand(SubCommand::with_name("show").about("Show the plan with countdowns"))
}

/// Name of the date option of a horizon
pub fn date_arg(key: &str) -> &'static str {
    match key {
        "long" => "long-date",
        "mid" => "mid-date",
        _ => "short-date",
    }
}

/// Name of the purpose option of a horizon
pub fn purpose_arg(key: &str) -> &'static str {
    match key {
        "long" => "long-why",
        "mid" => "mid-why",
        _ => "short-why",
    }
}

fn expense<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("expense")
        .about("Recurring expenses")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("add")
                .about("Add an expense")
                .arg(text("NAME", "what it is for"))
                .arg(text("AMOUNT", "how much, not negative")),
        )
        .subcommand(remove("number of the expense"))
        .subcommand(list())
}

fn entry<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("entry")
        .about("Income, passive income, assets and debts")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("add")
                .about("Add a ledger entry")
                .setting(AppSettings::AllowNegativeNumbers)
                .arg(text("NAME", "name of the entry"))
                .arg(signed("AMOUNT", "how much"))
                .arg(
                    Arg::with_name("TYPE")
                        .required(true)
                        .possible_values(&["income", "passive", "asset", "debt"])
                        .case_insensitive(true),
                )
                .arg(
                    Arg::with_name("category")
                        .long("category")
                        .short("c")
                        .takes_value(true),
                ),
        )
        .subcommand(remove("number of the entry"))
        .subcommand(list())
}

fn skill<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("skill")
        .about("Skills and learning notes")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("add")
                .about("Track a new skill")
                .arg(text("NAME", "name of the skill"))
                .arg(
                    Arg::with_name("category")
                        .long("category")
                        .short("c")
                        .takes_value(true)
                        .help("technical, soft, language, tool, or anything else"),
                )
                .arg(
                    Arg::with_name("level")
                        .long("level")
                        .short("l")
                        .takes_value(true)
                        .possible_values(&["beginner", "intermediate", "advanced", "expert"])
                        .case_insensitive(true)
                        .default_value("intermediate"),
                ),
        )
        .subcommand(
            SubCommand::with_name("bump")
                .about("Move the progress of a skill, in percent")
                .setting(AppSettings::AllowNegativeNumbers)
                .arg(number("number of the skill"))
                .arg(signed("DELTA", "percentage points, may be negative")),
        )
        .subcommand(
            SubCommand::with_name("note")
                .about("Add a learning note")
                .arg(number("number of the skill"))
                .arg(text("TEXT", "the note")),
        )
        .subcommand(remove("number of the skill"))
        .subcommand(list())
}

fn habit<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("habit")
        .about("Habit chains of 21, 90 and 365 days")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("start")
                .about("Start a new 21-day chain")
                .arg(text("NAME", "the habit"))
                .arg(
                    Arg::with_name("goal")
                        .long("goal")
                        .short("g")
                        .takes_value(true)
                        .help("text of the plan goal it serves, independent if omitted"),
                ),
        )
        .subcommand(
            SubCommand::with_name("mark")
                .about("Check in for today")
                .arg(number("number of the habit"))
                .arg(
                    Arg::with_name("missed")
                        .long("missed")
                        .help("record that the habit was not done today"),
                )
                .arg(
                    Arg::with_name("force")
                        .long("force")
                        .help("check in even if already done today"),
                ),
        )
        .subcommand(
            SubCommand::with_name("bulk")
                .about("Add several days at once")
                .arg(number("number of the habit"))
                .arg(text("DAYS", "number of days, at least 1")),
        )
        .subcommand(
            SubCommand::with_name("archive")
                .about("Remove a completed habit")
                .arg(number("number of the habit")),
        )
        .subcommand(list())
}

fn deadline<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("deadline")
        .about("Deadlines with countdowns")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("add")
                .about("Add a deadline")
                .arg(text("NAME", "what is due"))
                .arg(text("WHEN", "YYYY-MM-DDTHH:MM, or a day for midnight")),
        )
        .subcommand(remove("number of the deadline"))
        .subcommand(list())
        .subcommand(SubCommand::with_name("next").about("Countdown to the nearest deadline"))
        .subcommand(
            SubCommand::with_name("watch")
                .about("Live countdowns until interrupted")
                .arg(
                    Arg::with_name("ticks")
                        .long("ticks")
                        .takes_value(true)
                        .value_name("N")
                        .help("stop after N seconds"),
                ),
        )
}

fn backup<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("backup")
        .about("Export or restore all the data")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("export")
                .about("Write a backup file")
                .arg(
                    Arg::with_name("FILE")
                        .help("defaults to lifeplan-backup-<today>.json"),
                ),
        )
        .subcommand(
            SubCommand::with_name("import")
                .about("Restore from a backup file")
                .arg(text("FILE", "backup to restore")),
        )
}

fn pin<'a, 'b>() -> App<'a, 'b> {
    SubCommand::with_name("pin")
        .about("Lock the data behind a PIN")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("set")
                .about("Set or replace the PIN")
                .arg(text("PIN", "4 to 12 characters"))
                .arg(text("CONFIRM", "the same PIN again")),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Check a PIN against the stored one")
                .arg(text("PIN", "PIN to check")),
        )
        .subcommand(SubCommand::with_name("clear").about("Remove the PIN"))
}

pub fn build<'a, 'b>() -> App<'a, 'b> {
    App::new("lifeplan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Track goals, money, skills, habits and deadlines")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::VersionlessSubcommands)
        .arg(
            Arg::with_name("data")
                .long("data")
                .short("d")
                .takes_value(true)
                .value_name("FILE")
                .env("LIFEPLAN_DATA")
                .default_value(DEFAULT_DATA)
                .help("data file"),
        )
        .arg(
            Arg::with_name("currency")
                .long("currency")
                .takes_value(true)
                .value_name("CODE")
                .env("LIFEPLAN_CURRENCY")
                .default_value(DEFAULT_CURRENCY),
        )
        .arg(
            Arg::with_name("pin")
                .long("pin")
                .takes_value(true)
                .env("LIFEPLAN_PIN")
                .hide_env_values(true)
                .help("unlock a store protected by a PIN"),
        )
        .subcommand(plan())
        .subcommand(expense())
        .subcommand(entry())
        .subcommand(skill())
        .subcommand(habit())
        .subcommand(deadline())
        .subcommand(SubCommand::with_name("wealth").about("Net worth and wealth level"))
        .subcommand(SubCommand::with_name("dashboard").about("Goals with their habits"))
        .subcommand(backup())
        .subcommand(pin())
        .subcommand(
            SubCommand::with_name("plot")
                .about("Draw the ledger and habit chains as SVG")
                .arg(
                    Arg::with_name("FILE")
                        .default_value("lifeplan.svg"),
                ),
        )
}
