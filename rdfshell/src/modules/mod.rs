// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command modules
//!
//! Each module owns one subcommand: it contributes its argument grammar to
//! the shell's command tree and handles parsed invocations against the
//! shared session store. Modules keep private state across invocations
//! (remembered prefixes, the last SPARQL endpoint) but all shared state
//! lives in the store.
//!
//! Registered set:
//! - four serialization modules (`turtle`, `n3`, `json-ld`, `xml`)
//! - `sparql` for local and remote queries
//! - `shex` for shape schemas and validation
//! - `graph` for managing stored graphs
//! - `persistence` for file and URL round-trips

pub mod graph_manager;
pub mod persistence;
pub mod serialization;
pub mod shex;
pub mod sparql;

pub use graph_manager::GraphManagerModule;
pub use persistence::PersistenceModule;
pub use serialization::SerializationModule;
pub use shex::ShexModule;
pub use sparql::SparqlModule;

use crate::config::ShellConfig;
use crate::error::ModuleError;
use crate::grammar::ParsedCommand;
use crate::logger::Logger;
use crate::rdf::query::RemoteClient;
use crate::store::SessionStore;

/// Shared services handed to every module call.
pub struct ModuleContext<'a> {
    pub logger: &'a Logger,
    pub config: &'a ShellConfig,
    pub transport: &'a dyn RemoteClient,
}

/// One registered command module.
pub trait RdfModule {
    /// Subcommand name, unique within the shell.
    fn name(&self) -> &str;

    /// Name used to prefix user-facing messages.
    fn display_name(&self) -> &str;

    /// The module's argument grammar, merged into the command tree.
    fn grammar(&self) -> clap::Command;

    fn handle(
        &mut self,
        command: &ParsedCommand<'_>,
        store: &mut SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError>;

    /// Emit a message prefixed with the module's display name.
    fn log(&self, ctx: &ModuleContext<'_>, msg: &str) {
        ctx.logger.print(format!("{}: {msg}", self.display_name()));
    }
}
