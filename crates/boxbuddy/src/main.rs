// SPDX-FileCopyrightText: 2026 BoxBuddy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BoxBuddy - scan labels into place and capture items by voice.
//!
//! This is the binary entry point.

mod capture;
mod feedback;
mod lookup;
mod recorder;
mod scan;
mod shutdown;

use std::path::PathBuf;

use boxbuddy_config::model::BoxbuddyConfig;
use boxbuddy_core::{BoxbuddyError, ScanMode};
use clap::{Args, Parser, Subcommand};

/// BoxBuddy - scan labels into place and capture items by voice.
#[derive(Parser, Debug)]
#[command(name = "boxbuddy", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch decoded label payloads read line by line from stdin.
    Scan(ScanArgs),
    /// Compose one capture bundle from an audio file and upload it.
    Capture(CaptureArgs),
    /// Assign a captured photo to a saved item.
    Assign {
        photo_id: String,
        item_id: String,
    },
    /// Resolve a label payload or identifier against the service.
    Lookup {
        payload: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Mode the session starts in (`view` or `place-in`).
    #[arg(long, default_value = "view")]
    mode: ScanMode,
}

#[derive(Args, Debug)]
struct CaptureArgs {
    /// Recorded audio for the segment.
    audio: PathBuf,

    /// Photo to attach (repeatable).
    #[arg(long = "photo", value_name = "PHOTO_ID")]
    photos: Vec<String>,

    /// Draft metadata field (repeatable).
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("field name must not be empty".to_string());
    }
    Ok((key.to_string(), value.to_string()))
}

fn load_config(path: Option<&PathBuf>) -> BoxbuddyConfig {
    let loaded = match path {
        Some(path) => boxbuddy_config::load_and_validate_path(path),
        None => boxbuddy_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            boxbuddy_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("boxbuddy={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands, config: BoxbuddyConfig) -> Result<(), BoxbuddyError> {
    match command {
        Commands::Scan(args) => scan::run_scan(&config, args.mode).await,
        Commands::Capture(args) => {
            capture::run_capture(&config, args.audio, args.photos, args.fields).await
        }
        Commands::Assign { photo_id, item_id } => {
            lookup::run_assign(&config, &photo_id, &item_id).await
        }
        Commands::Lookup { payload, json } => lookup::run_lookup(&config, &payload, json).await,
        Commands::Config => {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| BoxbuddyError::Internal(format!("failed to render config: {e}")))?;
            print!("{rendered}");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    init_tracing(&config.log.level);

    let Some(command) = cli.command else {
        println!("boxbuddy: use --help for available commands");
        return;
    };

    if let Err(e) = run(command, config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_loads_config_defaults() {
        let config =
            boxbuddy_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.service.base_url, "http://localhost:5000");
    }

    #[test]
    fn scan_mode_flag_parses_kebab_case() {
        let cli = Cli::try_parse_from(["boxbuddy", "scan", "--mode", "place-in"]).unwrap();
        match cli.command {
            Some(Commands::Scan(args)) => assert_eq!(args.mode, ScanMode::PlaceIn),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn capture_collects_photos_and_fields() {
        let cli = Cli::try_parse_from([
            "boxbuddy",
            "capture",
            "memo.webm",
            "--photo",
            "p1",
            "--photo",
            "p2",
            "--field",
            "name=Cordless drill",
            "--field",
            "quantity=2",
        ])
        .unwrap();
        let Some(Commands::Capture(args)) = cli.command else {
            panic!("expected capture");
        };
        assert_eq!(args.audio, PathBuf::from("memo.webm"));
        assert_eq!(args.photos, vec!["p1", "p2"]);
        assert_eq!(
            args.fields,
            vec![
                ("name".to_string(), "Cordless drill".to_string()),
                ("quantity".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_field_is_rejected() {
        assert!(parse_field("no-equals-sign").is_err());
        assert!(parse_field("=value").is_err());
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn global_config_flag_is_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["boxbuddy", "config", "--config", "/tmp/bb.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/bb.toml")));
    }
}
