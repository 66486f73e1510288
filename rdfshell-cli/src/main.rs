// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RDFShell command-line entry point

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        cli.log_level
            .map(cli::LogLevel::to_level_filter)
            .unwrap_or(log::LevelFilter::Warn)
    };
    env_logger::Builder::new().filter_level(level).init();

    let result = match cli.command {
        Some(Commands::Exec {
            command,
            body,
            body_file,
        }) => cli::handle_exec(&command, body, body_file),
        Some(Commands::Repl) | None => cli::handle_repl(),
    };

    if let Err(err) = result {
        eprintln!("{}", format!("Error: {}", err).red());
        std::process::exit(1);
    }
}
