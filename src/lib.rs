pub mod classify;
pub mod cli;
pub mod emit;
pub mod generate;
pub mod io_utils;
pub mod loader;
pub mod region;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("region_sql", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate::execute(&args),
        Commands::Probe(args) => handle_probe(&args),
    }
}

fn handle_probe(args: &cli::ProbeArgs) -> Result<()> {
    let scan = generate::scan(
        &args.input,
        args.max_level,
        args.delimiter,
        args.input_encoding.as_deref(),
    )?;
    let report = scan.report();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    info!("Encoding: {}", report.encoding);
    info!("Delimiter: '{}'", report.delimiter);
    info!(
        "Roles: code='{}', name='{}', status={}",
        report.code_column,
        report.name_column,
        report
            .status_column
            .as_deref()
            .map(|c| format!("'{c}'"))
            .unwrap_or_else(|| "<none>".into())
    );
    info!(
        "{} accepted record(s), {} skipped",
        report.accepted, report.skipped_total
    );
    for (level, count) in &report.level_counts {
        info!(
            "  Level {} ({}): {} record(s)",
            level,
            region::level_name(*level),
            count
        );
    }
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
