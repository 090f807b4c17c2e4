//! Command-line front end.
//!
//! Arguments are `key=value` pairs, parsed the same way as configuration
//! maps so any [`Config`] field can be overridden inline:
//!
//! ```text
//! mealcast user=1                                 # rank for right now
//! mealcast user=1 date=2026-10-19 time=08:00 limit=5
//! mealcast user=1 cursor=<next_cursor from a previous page>
//! mealcast user=1 query="greek yogurt"
//! mealcast config=~/.config/mealcast.toml user=1 include_unsynced=true
//! ```
//!
//! Results are printed to stdout as pretty JSON. Errors go to stderr; the
//! exit code is 2 for bad input and 1 for everything else.

use chrono::{Local, NaiveDate, NaiveTime};
use mealcast::infrastructure::expand_tilde;
use mealcast::ranking::{ContextOptions, QueryOptions, RankingEngine, ReferencePoint};
use mealcast::storage::JsonStorage;
use mealcast::{observability, Config, MealcastError, Result, UserId};
use std::collections::BTreeMap;
use std::process::ExitCode;

fn invalid(message: String) -> MealcastError {
    MealcastError::InvalidParameters(message)
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<BTreeMap<String, String>> {
    args.into_iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| invalid(format!("expected key=value, got `{arg}`")))
        })
        .collect()
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| invalid(format!("time must be HH:MM, got `{raw}`")))
}

fn reference_point(args: &BTreeMap<String, String>) -> Result<ReferencePoint> {
    let now = Local::now().naive_local();

    let date = args
        .get("date")
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| invalid(format!("date must be YYYY-MM-DD, got `{raw}`")))
        })
        .transpose()?
        .unwrap_or_else(|| now.date());

    let time = args
        .get("time")
        .map(|raw| parse_time(raw))
        .transpose()?
        .unwrap_or_else(|| now.time());

    Ok(ReferencePoint::new(date, time))
}

fn run(args: &BTreeMap<String, String>) -> Result<String> {
    let config = match args.get("config") {
        Some(path) => Config::from_file(expand_tilde(path))?,
        None => Config::default(),
    }
    .merge_map(args);

    observability::init_tracing(&config);
    let _span = tracing::info_span!("cli_run").entered();

    let user = args
        .get("user")
        .ok_or_else(|| invalid("missing user=<id>".to_string()))?;
    let user = UserId(
        user.parse()
            .map_err(|_| invalid(format!("user must be an integer, got `{user}`")))?,
    );

    let limit = args
        .get("limit")
        .map(|raw| {
            raw.parse::<usize>()
                .map_err(|_| invalid(format!("limit must be a positive integer, got `{raw}`")))
        })
        .transpose()?
        .unwrap_or(config.default_limit);

    let storage = JsonStorage::open(config.data_path())?;
    let engine = RankingEngine::from_config(storage, &config)?;

    let json = if let Some(query) = args.get("query") {
        let options = QueryOptions {
            limit,
            include_unsynced: config.include_unsynced,
        };
        let foods = engine.rank_by_query(user, query, &options)?;
        serde_json::to_string_pretty(&foods)
    } else {
        let mut options = ContextOptions::new(limit).with_unsynced(config.include_unsynced);
        options.cursor = args.get("cursor").cloned();
        let page = engine.rank_by_context(user, reference_point(args)?, &options)?;
        serde_json::to_string_pretty(&page)
    };

    Ok(json.map_err(std::io::Error::from)?)
}

fn main() -> ExitCode {
    let result = parse_args(std::env::args().skip(1)).and_then(|args| run(&args));

    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "mealcast failed");
            eprintln!("error: {e}");
            if e.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
