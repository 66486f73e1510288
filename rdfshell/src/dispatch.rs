// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command dispatcher
//!
//! The session-scoped entry point: owns the module registry, the session
//! store, the logger and the remote transport, and routes one command
//! line at a time. Every invocation ends in one of three outcomes:
//! completed, failed (the cause has been reported through the logger
//! exactly once) or aborted (a module stopped the command after doing
//! its own reporting).
//!
//! Shell-level flags are handled here before any module runs:
//! `--verbose` sets the logger gate for the invocation and
//! `--return-store` short-circuits into a store snapshot.

use clap::error::ErrorKind;
use log::debug;

use crate::config::ShellConfig;
use crate::error::{ModuleError, ShellError};
use crate::grammar::{self, ParsedCommand};
use crate::logger::{DisplayData, DisplaySink, Logger};
use crate::modules::{
    GraphManagerModule, ModuleContext, PersistenceModule, RdfModule, SerializationModule,
    ShexModule, SparqlModule,
};
use crate::rdf::query::RemoteClient;
use crate::store::{SessionStore, StoreSnapshot};

/// Terminal state of one command.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The command ran to completion; carries the store snapshot for
    /// `--return-store` invocations.
    Completed(Option<StoreSnapshot>),
    /// The command failed; the message has already been reported.
    Failed(String),
    /// A module stopped the command after reporting on its own.
    Aborted,
}

/// One shell session: registered modules plus shared state.
pub struct Dispatcher {
    modules: Vec<Box<dyn RdfModule>>,
    store: SessionStore,
    logger: Logger,
    config: ShellConfig,
    transport: Box<dyn RemoteClient>,
}

impl Dispatcher {
    /// Build a session with the standard module set.
    pub fn new(
        sink: Box<dyn DisplaySink>,
        config: ShellConfig,
        transport: Box<dyn RemoteClient>,
    ) -> Self {
        let mut dispatcher = Self {
            modules: Vec::new(),
            store: SessionStore::new(),
            logger: Logger::new(sink),
            config,
            transport,
        };
        dispatcher.register_module(Box::new(SerializationModule::turtle()));
        dispatcher.register_module(Box::new(SerializationModule::n3()));
        dispatcher.register_module(Box::new(SerializationModule::json_ld()));
        dispatcher.register_module(Box::new(SerializationModule::xml()));
        dispatcher.register_module(Box::new(SparqlModule::new()));
        dispatcher.register_module(Box::new(ShexModule::new()));
        dispatcher.register_module(Box::new(GraphManagerModule::new()));
        dispatcher.register_module(Box::new(PersistenceModule::new()));
        dispatcher
    }

    /// Register an additional module; its grammar joins the command tree.
    pub fn register_module(&mut self, module: Box<dyn RdfModule>) {
        self.modules.push(module);
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    fn command_tree(&self) -> clap::Command {
        grammar::top_level(self.modules.iter().map(|module| module.grammar()))
    }

    /// Run one command line with an optional out-of-band body.
    pub fn execute(&mut self, line: &str, body: Option<&str>) -> Outcome {
        let tokens = match grammar::tokenize(line) {
            Ok(tokens) => {
                debug!("command line split into {} token(s)", tokens.len());
                tokens
            }
            Err(err) => {
                let msg = err.to_string();
                self.logger.print(msg.clone());
                return Outcome::Failed(msg);
            }
        };

        let matches = match self.command_tree().try_get_matches_from(tokens) {
            Ok(matches) => matches,
            Err(err) => {
                return match err.kind() {
                    ErrorKind::DisplayHelp
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                    | ErrorKind::DisplayVersion => {
                        self.logger.display(DisplayData::Text(err.to_string()));
                        Outcome::Completed(None)
                    }
                    _ => {
                        let msg = err.to_string();
                        self.logger.print(msg.clone());
                        Outcome::Failed(msg)
                    }
                }
            }
        };

        self.logger.set_verbose(matches.get_flag("verbose"));

        if matches.get_flag("return-store") {
            let snapshot = self.store.snapshot();
            match serde_json::to_string_pretty(&snapshot) {
                Ok(json) => self.logger.display(DisplayData::Text(json)),
                Err(err) => {
                    let msg = err.to_string();
                    self.logger.print(msg.clone());
                    return Outcome::Failed(msg);
                }
            }
            return Outcome::Completed(Some(snapshot));
        }

        let Some((name, submatches)) = matches.subcommand() else {
            self.logger.print("Usage: rdf --help");
            return Outcome::Completed(None);
        };

        // The grammar only accepts registered subcommands; a miss here
        // means the registry and the command tree went out of sync.
        let Some(module) = self
            .modules
            .iter_mut()
            .find(|module| module.name() == name)
        else {
            let msg = ShellError::ModuleNotFound(name.to_string()).to_string();
            self.logger.print(msg.clone());
            return Outcome::Failed(msg);
        };

        let command = ParsedCommand {
            matches: submatches,
            body,
        };
        let ctx = ModuleContext {
            logger: &self.logger,
            config: &self.config,
            transport: self.transport.as_ref(),
        };
        debug!("dispatching to module '{name}'");
        match module.handle(&command, &mut self.store, &ctx) {
            Ok(()) => Outcome::Completed(None),
            Err(ModuleError::Silent) => Outcome::Aborted,
            Err(err) => {
                let msg = format!("{}: {err}", module.display_name());
                self.logger.print(msg.clone());
                Outcome::Failed(msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RdfError;
    use crate::logger::MemorySink;
    use crate::rdf::query::RemoteResponse;
    use std::rc::Rc;
    use std::time::Duration;

    struct NoNetwork;

    impl RemoteClient for NoNetwork {
        fn get(
            &self,
            url: &str,
            _query: &[(&str, &str)],
            _accept: &str,
            _timeout: Duration,
        ) -> Result<RemoteResponse, RdfError> {
            Err(RdfError::Transport(format!("no network in tests: {url}")))
        }
    }

    struct Shared(Rc<MemorySink>);

    impl DisplaySink for Shared {
        fn emit(&self, data: &DisplayData) {
            self.0.emit(data);
        }
    }

    fn session() -> (Dispatcher, Rc<MemorySink>) {
        let sink = Rc::new(MemorySink::new());
        let dispatcher = Dispatcher::new(
            Box::new(Shared(sink.clone())),
            ShellConfig::default(),
            Box::new(NoNetwork),
        );
        (dispatcher, sink)
    }

    #[test]
    fn empty_line_prints_usage_hint() {
        let (mut dispatcher, sink) = session();
        assert!(matches!(dispatcher.execute("", None), Outcome::Completed(None)));
        assert_eq!(
            sink.events(),
            vec![DisplayData::Message("Usage: rdf --help".into())]
        );
    }

    #[test]
    fn help_is_completed_output_not_a_failure() {
        let (mut dispatcher, sink) = session();
        assert!(matches!(
            dispatcher.execute("--help", None),
            Outcome::Completed(None)
        ));
        assert!(matches!(sink.events().as_slice(), [DisplayData::Text(_)]));
    }

    #[test]
    fn unknown_module_fails_before_any_store_write() {
        let (mut dispatcher, _sink) = session();
        let outcome = dispatcher.execute("no-such-module --label g1", None);
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert!(dispatcher.store().graphs.is_empty());
        assert!(dispatcher.store().sources.is_empty());
    }

    #[test]
    fn verbose_flag_gates_the_logger_per_invocation() {
        let (mut dispatcher, _sink) = session();
        dispatcher.execute("turtle -v", None);
        assert!(dispatcher.logger().is_verbose());
        dispatcher.execute("turtle", None);
        assert!(!dispatcher.logger().is_verbose());
    }

    #[test]
    fn return_store_short_circuits_with_a_snapshot() {
        let (mut dispatcher, sink) = session();
        dispatcher.execute(
            "turtle --label g1",
            Some("@prefix ex: <http://example.org/> . ex:a ex:b ex:c ."),
        );
        sink.take();

        let outcome = dispatcher.execute("--return-store", None);
        let Outcome::Completed(Some(snapshot)) = outcome else {
            panic!("expected a snapshot");
        };
        let labels: Vec<&str> = snapshot
            .rdfgraphs
            .iter()
            .map(|summary| summary.label.as_str())
            .collect();
        assert_eq!(labels, vec!["g1", "last"]);
        assert!(matches!(sink.events().as_slice(), [DisplayData::Text(_)]));
    }
}
