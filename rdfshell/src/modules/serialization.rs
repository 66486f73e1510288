// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Serialization modules
//!
//! One module instance per input syntax (`turtle`, `n3`, `json-ld`,
//! `xml`), all sharing the same grammar and behavior: parse the command
//! body as a graph, store it (and its source text) in the session, then
//! display it as a drawing, a triple table or a raw serialization.
//!
//! `--prefix` invocations remember the body instead of parsing it; the
//! remembered block is prepended to every later body, so namespace
//! declarations only have to be written once. A failed parse still
//! records the offending source under `"last"` for inspection.

use std::rc::Rc;

use clap::{Arg, ArgAction, Command};

use crate::error::ModuleError;
use crate::grammar::ParsedCommand;
use crate::logger::DisplayData;
use crate::modules::{ModuleContext, RdfModule};
use crate::rdf::graph::{parse_graph, serialize_graph, strip_comments};
use crate::rdf::reason::{expand, EntailmentRegime};
use crate::rdf::syntax::RdfSyntax;
use crate::render;
use crate::render::dot::graph_to_dot;
use crate::store::SessionStore;

const DISPLAYS: [&str; 4] = ["graph", "table", "raw", "none"];
const RAW_FORMATS: [&str; 3] = ["turtle", "json-ld", "xml"];
const REGIMES: [&str; 3] = ["rdfs", "owl", "rdfs+owl"];

/// Parses one fixed syntax into session graphs.
pub struct SerializationModule {
    syntax: RdfSyntax,
    display_name: &'static str,
    prefix: String,
}

impl SerializationModule {
    pub fn new(syntax: RdfSyntax, display_name: &'static str) -> Self {
        Self {
            syntax,
            display_name,
            prefix: String::new(),
        }
    }

    pub fn turtle() -> Self {
        Self::new(RdfSyntax::Turtle, "Turtle")
    }

    pub fn n3() -> Self {
        Self::new(RdfSyntax::N3, "Notation 3")
    }

    pub fn json_ld() -> Self {
        Self::new(RdfSyntax::JsonLd, "JSON-LD")
    }

    pub fn xml() -> Self {
        Self::new(RdfSyntax::RdfXml, "RDF/XML")
    }
}

impl RdfModule for SerializationModule {
    fn name(&self) -> &str {
        self.syntax.name()
    }

    fn display_name(&self) -> &str {
        self.display_name
    }

    fn grammar(&self) -> Command {
        Command::new(self.syntax.name().to_string())
            .about(format!("Parse the body as {}", self.display_name))
            .arg(
                Arg::new("serialize")
                    .short('s')
                    .long("serialize")
                    .value_parser(RAW_FORMATS)
                    .default_value("turtle")
                    .help("Format for serializing when display is set to raw"),
            )
            .arg(
                Arg::new("display")
                    .short('d')
                    .long("display")
                    .value_parser(DISPLAYS)
                    .default_value("graph")
                    .help("How output is displayed"),
            )
            .arg(
                Arg::new("label")
                    .short('l')
                    .long("label")
                    .help("Store graph locally with this label"),
            )
            .arg(
                Arg::new("prefix")
                    .short('p')
                    .long("prefix")
                    .action(ArgAction::SetTrue)
                    .help("Remember the body and prepend it to every later body"),
            )
            .arg(
                Arg::new("entail")
                    .short('e')
                    .long("entail")
                    .value_parser(REGIMES)
                    .help("Expand the parsed graph under an entailment regime"),
            )
    }

    fn handle(
        &mut self,
        command: &ParsedCommand<'_>,
        store: &mut SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError> {
        let Some(body) = command.body() else {
            self.log(ctx, "No body given, nothing to do.");
            return Ok(());
        };

        if command.flag("prefix") {
            self.prefix = format!("{body}\n");
            self.log(ctx, "Stored prefix.");
            return Ok(());
        }

        let source = format!("{}{body}", self.prefix);
        let code = format!("{}{}", self.prefix, strip_comments(body));
        let artifact = match parse_graph(&code, self.syntax, self.syntax.name()) {
            Ok(artifact) => artifact,
            Err(err) => {
                // The offending source stays inspectable under "last".
                store.sources.set(None, Rc::new(source));
                return Err(ModuleError::Message(format!("Parse failed:\n{err}")));
            }
        };

        let label = command.value("label");
        let shared = artifact.shared();
        store.graphs.set(label, shared.clone());
        store.sources.set(label, Rc::new(source));
        ctx.logger.print_verbose(format!(
            "{}: parsed {} triple(s)",
            self.display_name,
            shared.borrow().len()
        ));

        if let Some(name) = command.value("entail") {
            if let Some(regime) = EntailmentRegime::from_name(name) {
                let mut artifact = shared.borrow_mut();
                expand(&mut artifact.graph, regime);
            }
        }

        let artifact = shared.borrow();
        match command.value("display").unwrap_or("graph") {
            "none" => {}
            "graph" => ctx.logger.display(DisplayData::Dot(graph_to_dot(
                &artifact,
                ctx.config.shorten_iris,
                ctx.config.anonymize_blank_nodes,
            ))),
            "table" => ctx
                .logger
                .display(render::graph_table(&artifact, ctx.config.shorten_iris)),
            _ => {
                let syntax = command
                    .value("serialize")
                    .and_then(RdfSyntax::from_name)
                    .unwrap_or(RdfSyntax::Turtle);
                let text = serialize_graph(&artifact, syntax)?;
                ctx.logger.display(DisplayData::Text(text));
            }
        }
        Ok(())
    }
}
