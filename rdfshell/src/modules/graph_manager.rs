// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph manager module
//!
//! Housekeeping for stored graphs: list labels, remove one, draw one, or
//! expand one in place under an entailment regime. Entailment mutates
//! the stored artifact, so every label aliasing it (including `"last"`)
//! sees the expanded graph.

use clap::{Arg, Command};

use crate::error::ModuleError;
use crate::grammar::ParsedCommand;
use crate::logger::DisplayData;
use crate::modules::{ModuleContext, RdfModule};
use crate::rdf::graph::SharedGraph;
use crate::rdf::reason::{expand, EntailmentRegime};
use crate::render::dot::graph_to_dot;
use crate::store::SessionStore;

const ACTIONS: [&str; 6] = [
    "list",
    "remove",
    "draw",
    "entail-rdfs",
    "entail-owl",
    "entail-rdfs+owl",
];

/// Management actions on the stored graphs.
#[derive(Default)]
pub struct GraphManagerModule;

impl GraphManagerModule {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `--label` to a stored graph, reporting the standard
    /// messages when it is absent or unknown.
    fn check_label(
        &self,
        label: Option<&str>,
        store: &SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Option<SharedGraph> {
        match label {
            Some(label) => match store.graphs.get(label) {
                Some(graph) => Some(graph.clone()),
                None => {
                    self.log(ctx, &format!("Graph labelled '{label}' not found."));
                    None
                }
            },
            None => {
                self.log(
                    ctx,
                    "Please specify the label of a graph with parameter --label or -l.",
                );
                None
            }
        }
    }

    fn entail(
        &self,
        label: Option<&str>,
        regime: EntailmentRegime,
        store: &SessionStore,
        ctx: &ModuleContext<'_>,
    ) {
        if let Some(graph) = self.check_label(label, store, ctx) {
            expand(&mut graph.borrow_mut().graph, regime);
            self.log(
                ctx,
                &format!(
                    "Graph labelled '{}' has been entailed using {}.",
                    label.unwrap_or_default(),
                    regime.describe()
                ),
            );
        }
    }
}

impl RdfModule for GraphManagerModule {
    fn name(&self) -> &str {
        "graph"
    }

    fn display_name(&self) -> &str {
        "Graph"
    }

    fn grammar(&self) -> Command {
        Command::new("graph")
            .about("Manage stored graphs")
            .arg(
                Arg::new("action")
                    .value_parser(ACTIONS)
                    .required(true)
                    .help("Action to perform"),
            )
            .arg(
                Arg::new("label")
                    .short('l')
                    .long("label")
                    .help("Reference a local graph by label"),
            )
    }

    fn handle(
        &mut self,
        command: &ParsedCommand<'_>,
        store: &mut SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError> {
        let label = command.value("label");
        match command.value("action").unwrap_or_default() {
            "list" => {
                let header = vec!["label".to_string(), "triples".to_string()];
                let rows = store
                    .snapshot()
                    .rdfgraphs
                    .iter()
                    .map(|summary| vec![summary.label.clone(), summary.triples.to_string()])
                    .collect();
                ctx.logger.print("The following labelled graphs are present:");
                ctx.logger.display(DisplayData::Table { header, rows });
            }
            "draw" => {
                if let Some(graph) = self.check_label(label, store, ctx) {
                    ctx.logger.display(DisplayData::Dot(graph_to_dot(
                        &graph.borrow(),
                        ctx.config.shorten_iris,
                        ctx.config.anonymize_blank_nodes,
                    )));
                }
            }
            "remove" => {
                if self.check_label(label, store, ctx).is_some() {
                    if let Some(label) = label {
                        store.graphs.remove(label);
                        self.log(ctx, &format!("Graph labelled '{label}' has been removed."));
                    }
                }
            }
            "entail-rdfs" => self.entail(label, EntailmentRegime::Rdfs, store, ctx),
            "entail-owl" => self.entail(label, EntailmentRegime::Owl, store, ctx),
            "entail-rdfs+owl" => self.entail(label, EntailmentRegime::RdfsThenOwl, store, ctx),
            _ => {}
        }
        Ok(())
    }
}
