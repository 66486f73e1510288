// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Interactive console and one-off execution
//!
//! The console reads one shell command per line. A line ending in `<<`
//! opens body capture: the following lines, up to a lone `.` (or EOF),
//! become the out-of-band body handed to the command. Example:
//!
//! ```text
//! rdf> turtle --label people <<
//! ...> @prefix ex: <http://example.org/> .
//! ...> ex:ada ex:knows ex:bob .
//! ...> .
//! ```

use colored::Colorize;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::path::{Path, PathBuf};

use rdfshell::rdf::HttpClient;
use rdfshell::{Dispatcher, Outcome, ShellConfig};

use super::output::TerminalSink;

const BODY_MARKER: &str = "<<";
const BODY_TERMINATOR: &str = ".";

fn new_session() -> Dispatcher {
    Dispatcher::new(
        Box::new(TerminalSink::new()),
        ShellConfig::default(),
        Box::new(HttpClient::new()),
    )
}

/// Run one command line and exit with its outcome.
pub fn handle_exec(
    command: &str,
    body: Option<String>,
    body_file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = match body_file {
        Some(path) => Some(std::fs::read_to_string(path)?),
        None => body,
    };

    let mut dispatcher = new_session();
    match dispatcher.execute(command, body.as_deref()) {
        Outcome::Completed(_) => Ok(()),
        // The cause was already reported through the sink.
        Outcome::Failed(msg) => Err(msg.into()),
        Outcome::Aborted => Err("command aborted".into()),
    }
}

/// Run the interactive console
pub fn handle_repl() -> Result<(), Box<dyn std::error::Error>> {
    let mut dispatcher = new_session();

    println!("{}", "RDFShell".bold().green());
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    println!(
        "End a command with '{}' to enter a body; finish it with a lone '{}'",
        BODY_MARKER, BODY_TERMINATOR
    );

    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<(), _>::with_config(config)?;

    let history_path = ".rdfshell/.history.txt";
    if let Some(parent) = Path::new(history_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.load_history(history_path);

    loop {
        let line = match rl.readline("rdf> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("{}", "Goodbye!".green());
                break;
            }
            "help" => {
                print_help(&mut dispatcher);
                continue;
            }
            "clear" => {
                print!("\x1B[2J\x1B[1;1H");
                let _ = std::io::Write::flush(&mut std::io::stdout());
                continue;
            }
            "" => continue,
            _ => {}
        }

        let (command, body) = if let Some(command) = trimmed.strip_suffix(BODY_MARKER) {
            match read_body(&mut rl) {
                Ok(body) => (command.trim().to_string(), Some(body)),
                Err(err) => {
                    eprintln!("{}", format!("Error: {:?}", err).red());
                    break;
                }
            }
        } else {
            (trimmed.to_string(), None)
        };

        rl.add_history_entry(trimmed)?;
        // Outcomes are already reported through the sink; the console
        // just moves on to the next line.
        let _ = dispatcher.execute(&command, body.as_deref());
    }

    let _ = rl.save_history(history_path);
    Ok(())
}

/// Collect body lines until the terminator or EOF.
fn read_body(
    rl: &mut Editor<(), rustyline::history::FileHistory>,
) -> Result<String, ReadlineError> {
    let mut body = String::new();
    loop {
        match rl.readline("...> ") {
            Ok(line) => {
                if line.trim() == BODY_TERMINATOR {
                    break;
                }
                body.push_str(&line);
                body.push('\n');
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => break,
            Err(err) => return Err(err),
        }
    }
    Ok(body)
}

/// Print help message
fn print_help(dispatcher: &mut Dispatcher) {
    println!("{}", "Console commands:".bold().green());
    println!("  {}  - Show this help message", "help".cyan());
    println!("  {}  - Exit the console", "exit/quit".cyan());
    println!("  {}  - Clear the screen", "clear".cyan());
    println!();
    println!("{}", "Shell commands:".bold().green());
    let _ = dispatcher.execute("--help", None);
    println!();
    println!("{}", "Examples:".bold().green());
    println!("  {}", "turtle --label people --display table <<".yellow());
    println!("  {}", "sparql --local people <<".yellow());
    println!("  {}", "graph list".yellow());
    println!("  {}", "--return-store".yellow());
}
