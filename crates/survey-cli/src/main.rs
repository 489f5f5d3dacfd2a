//! `survey` command-line front end
//!
//! Submits responses, counts visits, and shows or exports the statistics of
//! one hosted survey. Remote bins come from an optional TOML file and
//! `SURVEY_*` environment variables; without them everything stays local.

mod app;
mod render;

use anyhow::Context;
use app::App;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use survey_core::SurveyConfig;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("survey")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Survey response persistence and statistics")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .help("Directory of the local storage file"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("submit")
                .about("Submit one response")
                .arg(
                    Arg::new("answer")
                        .long("answer")
                        .short('a')
                        .value_name("KEY=VALUE")
                        .action(ArgAction::Append)
                        .value_parser(parse_answer)
                        .help("Form field; repeat for every checked option"),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Show the statistics dashboard")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Write all responses to a CSV file")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("DIR")
                        .default_value(".")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output directory"),
                ),
        )
        .subcommand(Command::new("visit").about("Count one survey page visit"))
        .subcommand(Command::new("visits").about("Show page-view and unique-visitor counters"))
        .subcommand(Command::new("clear").about("Clear locally stored responses"))
}

fn parse_answer(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<SurveyConfig> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = SurveyConfig::load(path.map(PathBuf::as_path)).context("loading configuration")?;
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let config = load_config(&matches)?;
    tracing::debug!(
        responses_configured = config.responses.is_configured(),
        visits_configured = config.visits.is_configured(),
        data_dir = %config.data_dir.display(),
        "configuration loaded"
    );
    let app = App::from_config(&config);
    let today = chrono::Utc::now().date_naive();

    match matches.subcommand() {
        Some(("submit", args)) => {
            let entries: Vec<(String, String)> = args
                .get_many::<(String, String)>("answer")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();

            match app.submit(entries).await {
                Ok((record, outcome)) => {
                    println!("{}", render::append_outcome(&outcome));
                    println!("submitTime: {}", record.submit_time());
                }
                Err(err) => {
                    eprintln!("{err}");
                    for field in err.fields() {
                        eprintln!("  - {field}");
                    }
                    std::process::exit(2);
                }
            }
        }
        Some(("stats", args)) => {
            let (board, source) = app.dashboard(today).await;
            if args.get_flag("json") {
                let report = serde_json::json!({ "source": source, "dashboard": board });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::dashboard(&board, source));
            }
        }
        Some(("export", args)) => {
            let dir = args
                .get_one::<PathBuf>("out")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            let export = app.export(&dir, today).await?;
            println!(
                "exported {} responses ({}) to {}",
                export.rows,
                render::source(export.source),
                export.path.display()
            );
        }
        Some(("visit", _)) => {
            println!("{}", render::visit_outcome(&app.record_visit().await));
        }
        Some(("visits", _)) => {
            println!("{}", render::visit_counters(app.visit_stats().await));
        }
        Some(("clear", _)) => {
            let outcome = app.clear().context("clearing local data")?;
            println!("{}", outcome.notice());
        }
        _ => {}
    }

    Ok(())
}
