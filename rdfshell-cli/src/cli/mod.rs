// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for RDFShell
//!
//! Provides the command-line interface: the interactive console (REPL)
//! with out-of-band body capture, one-off command execution, and the
//! terminal renderer for the engine's display objects.

pub mod commands;
pub mod output;
pub mod repl;

pub use commands::{Cli, Commands, LogLevel};
pub use repl::{handle_exec, handle_repl};
