// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// runsheet — render patient care reports from the command line.
//
// Entry point. Initialises logging, loads the engine config, and dispatches
// the subcommand. Failures are printed as operator-facing messages.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use runsheet_core::EngineConfig;
use runsheet_core::error::Result;
use runsheet_core::human_errors::humanize_error;

use cli::{App, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();
    let config = EngineConfig::load_or_default(app.config.as_deref());

    match run(&app, &config).await {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "runsheet failed");
            let human = humanize_error(&err);
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(app: &App, config: &EngineConfig) -> Result<String> {
    let value = match &app.command {
        Commands::Render(args) => serde_json::to_value(commands::render(config, args).await?)?,
        Commands::Validate(args) => commands::validate(args)?,
        Commands::InitConfig(args) => commands::init_config(config, args)?,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}
