// src/cli.rs
use std::error::Error;

use crate::data::{JobKind, Ocean};

pub const HELP: &str = "\
yoweb_scrape: scheduled scraper for Puzzle Pirates ocean pages

USAGE:
    yoweb_scrape [--config <file>] [serve]
    yoweb_scrape [--config <file>] scrape --ocean <ocean> --job <kind>
    yoweb_scrape [--config <file>] poll

COMMANDS:
    serve     Run the daily scheduler and market poller until Ctrl-C (default)
    scrape    Run one job now and print its id
    poll      Import the market CSV of every configured ocean once

OPTIONS:
    -c, --config <file>   Extra YAML config file (also: YOWEB_CONFIG)
    -o, --ocean <ocean>   emerald | meridian | cerulean | obsidian
    -j, --job <kind>      daily_full | islands | tax_rates | crew_fame |
                          crew_info | flag_fame | battle_info
    -h, --help            Show this text

Environment: YOWEB__<OPTION> overrides config values, YOWEB_LOG sets the log filter.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    Scrape { ocean: Ocean, kind: JobKind },
    Poll,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub config: Option<String>,
}

/// Parse arguments (program name already skipped). No arguments means `serve`.
pub fn parse_args<I>(args: I) -> Result<Args, Box<dyn Error + Send + Sync>>
where
    I: IntoIterator<Item = String>,
{
    let mut command: Option<String> = None;
    let mut config = None;
    let mut ocean: Option<Ocean> = None;
    let mut kind: Option<JobKind> = None;

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "serve" | "scrape" | "poll" if command.is_none() => command = Some(a.clone()),
            "-c" | "--config" => config = Some(args.next().ok_or("Missing value for --config")?),
            "-o" | "--ocean" => ocean = Some(args.next().ok_or("Missing value for --ocean")?.parse()?),
            "-j" | "--job" => kind = Some(args.next().ok_or("Missing value for --job")?.parse()?),
            "-h" | "--help" => return Ok(Args { command: Command::Help, config }),
            _ => return Err(format!("Unknown arg: {a}").into()),
        }
    }

    let command = match command.as_deref().unwrap_or("serve") {
        "scrape" => Command::Scrape {
            ocean: ocean.ok_or("scrape needs --ocean")?,
            kind: kind.ok_or("scrape needs --job")?,
        },
        other => {
            if ocean.is_some() || kind.is_some() {
                return Err(format!("--ocean/--job only apply to scrape, not {other}").into());
            }
            if other == "poll" { Command::Poll } else { Command::Serve }
        }
    };
    Ok(Args { command, config })
}
