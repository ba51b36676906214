// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Fred - natural-language file agent
//!
//! Entry point for the Fred CLI application.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use fred::agent::FileAgent;
use fred::cli::Cli;
use fred::config::Settings;
use fred::error::Result;
use fred::repl;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let mut settings = match Settings::load_from(&config_path) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load configuration from {}: {err}", config_path.display());
            return ExitCode::from(2);
        }
    };
    cli.apply_overrides(&mut settings);

    if let Err(err) = init_tracing(&settings) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::from(2);
    }

    // An unknown provider name can never work; a missing API key only
    // matters once a chat turn happens, so it is reported and tolerated.
    // The report goes to stderr as well: with `logging.file` set the
    // tracing output is not on the terminal.
    for issue in settings.validate() {
        if issue.starts_with("Invalid AI provider") {
            eprintln!("{issue}");
            return ExitCode::from(2);
        }
        eprintln!("warning: {issue} (chat commands will fail until one is configured)");
        warn!("{issue}");
    }

    let agent = match FileAgent::new(settings) {
        Ok(agent) => agent,
        Err(err) => {
            eprintln!("failed to start: {err}");
            return ExitCode::from(2);
        }
    };

    match &cli.command {
        Some(command) => {
            let record = agent.execute(command).await;
            repl::print_record(&record);
            if record.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        None => match repl::run(agent).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        },
    }
}

/// Wires up the tracing subscriber. `RUST_LOG` wins when set; otherwise the
/// configured level applies to this crate only. With `logging.file` set,
/// output goes to that file without ANSI colors.
fn init_tracing(settings: &Settings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fred={}", settings.logging.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &settings.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            builder
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}
