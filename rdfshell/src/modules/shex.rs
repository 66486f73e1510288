// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shape module
//!
//! Parses shape schemas (the compact JSON form described in
//! [`crate::rdf::shape`]) into session artifacts and validates stored
//! graphs against them. The `prefix` action remembers a block of
//! `prefix: <iri>` declarations used to expand prefixed names in
//! schemas, focus nodes and constraint values.

use std::rc::Rc;

use clap::{Arg, Command};

use crate::error::ModuleError;
use crate::grammar::ParsedCommand;
use crate::modules::{ModuleContext, RdfModule};
use crate::rdf::prefix::PrefixMap;
use crate::rdf::shape::{evaluate, load_schema, ShapeOutcome};
use crate::store::SessionStore;

const ACTIONS: [&str; 3] = ["parse", "validate", "prefix"];

/// Shape schema parsing and validation.
#[derive(Default)]
pub struct ShexModule {
    prefixes: PrefixMap,
}

impl ShexModule {
    pub fn new() -> Self {
        Self {
            prefixes: PrefixMap::well_known(),
        }
    }

    fn print_outcome(&self, outcome: &ShapeOutcome, ctx: &ModuleContext<'_>) {
        self.log(
            ctx,
            &format!(
                "Evaluating shape '{}' on node '{}'",
                outcome.start, outcome.focus
            ),
        );
        if outcome.passed {
            ctx.logger.print("PASSED!");
        } else {
            let reason = outcome.reason.as_deref().unwrap_or("unspecified");
            ctx.logger.print(format!("FAILED! Reason:\n{reason}\n"));
        }
    }
}

impl RdfModule for ShexModule {
    fn name(&self) -> &str {
        "shex"
    }

    fn display_name(&self) -> &str {
        "ShEx"
    }

    fn grammar(&self) -> Command {
        Command::new("shex")
            .about("Parse shape schemas and validate graphs against them")
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
                    .help("Shape label for referencing"),
            )
            .arg(
                Arg::new("graph")
                    .short('g')
                    .long("graph")
                    .help("Graph label for validation"),
            )
            .arg(
                Arg::new("focus")
                    .short('f')
                    .long("focus")
                    .help("IRI of the node to focus on"),
            )
            .arg(
                Arg::new("start")
                    .short('s')
                    .long("start")
                    .help("Starting shape"),
            )
    }

    fn handle(
        &mut self,
        command: &ParsedCommand<'_>,
        store: &mut SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError> {
        match command.value("action").unwrap_or_default() {
            "prefix" => {
                let Some(body) = command.body() else {
                    self.log(ctx, "No prefix declarations given.");
                    return Ok(());
                };
                self.prefixes.harvest(body);
                self.log(ctx, "Stored prefix.");
            }
            "parse" => {
                let Some(body) = command.body() else {
                    self.log(ctx, "No body to parse.");
                    return Ok(());
                };
                match load_schema(body) {
                    Ok(schema) => {
                        store.shapes.set(command.value("label"), Rc::new(schema));
                        self.log(ctx, "Shape successfully parsed.");
                    }
                    Err(err) => {
                        return Err(ModuleError::Message(format!(
                            "Error during shape parse:\n{err}"
                        )))
                    }
                }
            }
            "validate" => {
                let (Some(shape_label), Some(graph_label)) =
                    (command.value("label"), command.value("graph"))
                else {
                    self.log(ctx, "A shape and a graph label are required for validation.");
                    return Ok(());
                };
                let Some(schema) = store.shapes.get(shape_label).cloned() else {
                    self.log(ctx, &format!("Found no shape with label '{shape_label}'."));
                    return Ok(());
                };
                let Some(graph) = store.graphs.get(graph_label).cloned() else {
                    self.log(ctx, &format!("Found no graph with label '{graph_label}'."));
                    return Ok(());
                };
                let outcomes = evaluate(
                    &graph.borrow(),
                    &schema,
                    command.value("focus"),
                    command.value("start"),
                    &self.prefixes,
                )
                .map_err(|err| ModuleError::Message(format!("Error during validation:\n{err}")))?;
                for outcome in &outcomes {
                    self.print_outcome(outcome, ctx);
                }
            }
            _ => {}
        }
        Ok(())
    }
}
