//! `ldex`: inspect a catalog export offline
//!
//! Loads a JSON catalog into the in-memory store, creates a throwaway
//! collection and serves box, list and stats views from it.

mod render;
mod session;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ldex_model::CatchStatus;
use ldex_projector::{EntryFilter, PageRequest, ProjectorConfig};
use serde::Serialize;
use session::{Session, UniverseArgs};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn catalog_arg() -> Arg {
    Arg::new("catalog")
        .long("catalog")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Catalog export (JSON)")
}

fn universe_args(command: Command) -> Command {
    command
        .arg(catalog_arg())
        .arg(
            Arg::new("region")
                .long("region")
                .help("Regional dex name; national when omitted"),
        )
        .arg(
            Arg::new("variants")
                .long("variants")
                .action(ArgAction::SetTrue)
                .help("Include variant forms (national only)"),
        )
        .arg(
            Arg::new("ledger")
                .long("ledger")
                .value_parser(value_parser!(PathBuf))
                .help("Catch records to apply first (JSON array)"),
        )
}

fn cli() -> Command {
    Command::new("ldex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Living Dex box views from a catalog export")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Projector configuration (TOML)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log filter, overrides RUST_LOG (default: warn)"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("validate")
                .about("Check placements and project every universe")
                .arg(catalog_arg()),
        )
        .subcommand(
            universe_args(Command::new("box").about("Render one box")).arg(
                Arg::new("box")
                    .long("box")
                    .default_value("1")
                    .value_parser(value_parser!(u32))
                    .help("Box number, 1-based"),
            ),
        )
        .subcommand(
            universe_args(Command::new("list").about("List one page of entries"))
                .arg(
                    Arg::new("page")
                        .long("page")
                        .default_value("1")
                        .value_parser(value_parser!(u32))
                        .help("Page number, 1-based"),
                )
                .arg(
                    Arg::new("page-size")
                        .long("page-size")
                        .value_parser(value_parser!(u32))
                        .help("Entries per page"),
                )
                .arg(Arg::new("name").long("name").help("Name contains"))
                .arg(
                    Arg::new("status")
                        .long("status")
                        .value_parser(["not_caught", "caught", "ready_to_evolve"])
                        .help("Exact catch status"),
                )
                .arg(Arg::new("game").long("game").help("Obtainable in game"))
                .arg(
                    Arg::new("catch-region")
                        .long("catch-region")
                        .help("Caught in region"),
                ),
        )
        .subcommand(universe_args(
            Command::new("stats").about("Completion statistics"),
        ))
}

fn init_tracing(matches: &ArgMatches) {
    let filter = match matches.get_one::<String>("log-level") {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if matches.get_flag("log-json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

fn page_request(args: &ArgMatches) -> Result<PageRequest> {
    let mut filter = EntryFilter::new();
    if let Some(name) = args.get_one::<String>("name") {
        filter = filter.with_name(name);
    }
    if let Some(status) = args.get_one::<String>("status") {
        let status: CatchStatus = status.parse().map_err(anyhow::Error::msg)?;
        filter = filter.with_status(status);
    }
    if let Some(game) = args.get_one::<String>("game") {
        filter = filter.with_game(game);
    }
    if let Some(region) = args.get_one::<String>("catch-region") {
        filter = filter.with_catch_region(region);
    }

    let page = args.get_one::<u32>("page").copied().unwrap_or(1);
    let mut request = PageRequest::new(page).with_filter(filter);
    if let Some(&size) = args.get_one::<u32>("page-size") {
        request = request.with_page_size(size);
    }
    Ok(request)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let matches = cli().get_matches();
    init_tracing(&matches);

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ProjectorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ProjectorConfig::new(),
    };
    let json = matches.get_flag("json");

    match matches.subcommand() {
        Some(("validate", args)) => {
            let catalog = args
                .get_one::<PathBuf>("catalog")
                .context("--catalog is required")?;
            let findings = session::validate(catalog, config).await?;
            emit(json, &findings, |findings| {
                findings.iter().map(|f| format!("{f}\n")).collect()
            })?;
            if findings.is_empty() {
                if !json {
                    println!("catalog ok");
                }
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Some(("box", args)) => {
            let session = Session::open(&UniverseArgs::from_matches(args)?, config).await?;
            let number = args.get_one::<u32>("box").copied().unwrap_or(1);
            let view = session.box_view(number).await?;
            emit(json, &view, render::box_view)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(("list", args)) => {
            let session = Session::open(&UniverseArgs::from_matches(args)?, config).await?;
            let page = session.page(&page_request(args)?).await?;
            emit(json, &page, render::page)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(("stats", args)) => {
            let session = Session::open(&UniverseArgs::from_matches(args)?, config).await?;
            let stats = session.stats().await?;
            emit(json, &stats, render::stats)?;
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            cli().print_help()?;
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn list_flags_build_filter() {
        let matches = cli()
            .try_get_matches_from([
                "ldex", "list", "--catalog", "dex.json", "--page", "2", "--page-size", "15",
                "--status", "caught", "--name", "chu",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let request = page_request(args).unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.page_size, Some(15));
        assert_eq!(request.filter.status, Some(CatchStatus::Caught));
        assert_eq!(request.filter.name.as_deref(), Some("chu"));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = cli().try_get_matches_from([
            "ldex", "list", "--catalog", "dex.json", "--status", "released",
        ]);
        assert!(result.is_err());
    }
}
