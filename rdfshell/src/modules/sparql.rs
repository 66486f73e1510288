// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! SPARQL module
//!
//! Queries either a remote endpoint or a locally stored graph. The
//! endpoint sticks across invocations once given; `--local <label>`
//! ignores it and evaluates against the session graph instead. Remote
//! results are kept as received (body plus MIME type) and rendered
//! through the display table below; local results are rendered by query
//! form and the `--display` choice does not apply to them.
//!
//! Display compatibility per response MIME type:
//!
//! | MIME type                            | displays        |
//! |--------------------------------------|-----------------|
//! | `application/sparql-results+xml`     | table           |
//! | `application/rdf+xml`                | graph, table    |
//! | `application/xml`                    | (raw only)      |
//! | `application/sparql-results+json`    | table           |
//!
//! An incompatible or unknown combination downgrades to a raw text
//! display with a warning instead of failing the command.

use std::rc::Rc;

use clap::{Arg, ArgAction, ArgGroup, Command};

use crate::error::ModuleError;
use crate::grammar::ParsedCommand;
use crate::logger::DisplayData;
use crate::modules::{ModuleContext, RdfModule};
use crate::rdf::graph::parse_graph;
use crate::rdf::query::query_local;
use crate::rdf::syntax::RdfSyntax;
use crate::render;
use crate::render::dot::graph_to_dot;
use crate::store::{ResultArtifact, SessionStore};

const FORMATS: [&str; 2] = ["xml", "json"];
const DISPLAYS: [&str; 4] = ["graph", "table", "raw", "none"];

fn accept_for(format: &str) -> &'static str {
    match format {
        "json" => render::SPARQL_RESULTS_JSON,
        _ => render::SPARQL_RESULTS_XML,
    }
}

fn format_of(mime: &str) -> Option<&'static str> {
    match mime {
        render::SPARQL_RESULTS_XML => Some("xml"),
        render::SPARQL_RESULTS_JSON => Some("json"),
        _ => None,
    }
}

/// Displays each known MIME type supports beyond raw.
fn supported_displays(mime: &str) -> Option<&'static [&'static str]> {
    match mime {
        render::SPARQL_RESULTS_XML | render::SPARQL_RESULTS_JSON => Some(&["table"]),
        render::RDF_XML => Some(&["graph", "table"]),
        "application/xml" => Some(&[]),
        _ => None,
    }
}

/// Local and remote SPARQL evaluation.
#[derive(Default)]
pub struct SparqlModule {
    endpoint: Option<String>,
    prefix: String,
}

impl SparqlModule {
    pub fn new() -> Self {
        Self::default()
    }

    fn display_response(
        &self,
        body: &[u8],
        mime: &str,
        method: &str,
        ctx: &ModuleContext<'_>,
    ) {
        if method == "none" {
            return;
        }
        let method = match supported_displays(mime) {
            None => {
                self.log(
                    ctx,
                    &format!("Mime type '{mime}' not supported. Defaulting to raw display."),
                );
                "raw"
            }
            Some(displays) if displays.contains(&method) => method,
            Some(_) => {
                if method != "raw" {
                    self.log(
                        ctx,
                        &format!(
                            "Incompatible display option '{method}' for mime type '{mime}'. \
                             Defaulting to raw display."
                        ),
                    );
                }
                "raw"
            }
        };

        match method {
            "graph" => {
                let text = String::from_utf8_lossy(body);
                match parse_graph(&text, RdfSyntax::RdfXml, "sparql") {
                    Ok(artifact) => ctx.logger.display(DisplayData::Dot(graph_to_dot(
                        &artifact,
                        ctx.config.shorten_iris,
                        ctx.config.anonymize_blank_nodes,
                    ))),
                    Err(err) => {
                        self.log(ctx, &format!("Could not parse response as a graph:\n{err}"));
                        ctx.logger
                            .display(DisplayData::Text(String::from_utf8_lossy(body).into_owned()));
                    }
                }
            }
            "table" => {
                let prefixes = crate::rdf::prefix::PrefixMap::well_known();
                let table = render::rows_from(body, mime, &prefixes, ctx.config.shorten_iris)
                    .and_then(render::collect_table);
                match table {
                    Ok(table) => ctx.logger.display(table),
                    Err(err) => {
                        self.log(ctx, &format!("{err}. Defaulting to raw display."));
                        ctx.logger
                            .display(DisplayData::Text(String::from_utf8_lossy(body).into_owned()));
                    }
                }
            }
            _ => ctx
                .logger
                .display(DisplayData::Text(String::from_utf8_lossy(body).into_owned())),
        }
    }
}

impl RdfModule for SparqlModule {
    fn name(&self) -> &str {
        "sparql"
    }

    fn display_name(&self) -> &str {
        "SPARQL"
    }

    fn grammar(&self) -> Command {
        Command::new("sparql")
            .about("Query a SPARQL endpoint or a local graph")
            .arg(
                Arg::new("endpoint")
                    .short('e')
                    .long("endpoint")
                    .help("SPARQL endpoint, remembered for later queries"),
            )
            .arg(
                Arg::new("format")
                    .short('f')
                    .long("format")
                    .value_parser(FORMATS)
                    .default_value("xml")
                    .help("Requested format for the query result"),
            )
            .arg(
                Arg::new("display")
                    .short('d')
                    .long("display")
                    .value_parser(DISPLAYS)
                    .default_value("table")
                    .help("How output is displayed. Does not apply to local queries"),
            )
            .arg(
                Arg::new("prefix")
                    .short('p')
                    .long("prefix")
                    .action(ArgAction::SetTrue)
                    .help("Remember the body and prepend it to every later query"),
            )
            .arg(
                Arg::new("local")
                    .short('l')
                    .long("local")
                    .help("Query the local graph stored under this label instead of the endpoint"),
            )
            .group(ArgGroup::new("input").args(["prefix", "local"]))
            .arg(
                Arg::new("store")
                    .short('s')
                    .long("store")
                    .help("Store the query result under this label"),
            )
    }

    fn handle(
        &mut self,
        command: &ParsedCommand<'_>,
        store: &mut SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError> {
        let Some(body) = command.body() else {
            self.log(ctx, "No query given, nothing to do.");
            return Ok(());
        };

        if command.flag("prefix") {
            self.prefix = format!("{body}\n");
            self.log(ctx, "Stored prefix.");
            return Ok(());
        }

        let query = format!("{}{body}", self.prefix);
        let label = command.value("store");

        if let Some(graph_label) = command.value("local") {
            let Some(graph) = store.graphs.get(graph_label).cloned() else {
                self.log(ctx, &format!("Graph labelled '{graph_label}' not found."));
                return Ok(());
            };
            let result = query_local(&graph.borrow(), &query)
                .map_err(|err| ModuleError::Message(format!("Error during local query:\n{err}")))?;
            match &result {
                ResultArtifact::Solutions { variables, rows } => {
                    ctx.logger.display(render::solutions_table(
                        variables,
                        rows,
                        &graph.borrow().prefixes,
                        ctx.config.shorten_iris,
                    ));
                }
                ResultArtifact::Boolean(answer) => ctx.logger.print(answer.to_string()),
                ResultArtifact::Graph(derived) => ctx.logger.display(DisplayData::Dot(
                    graph_to_dot(
                        &derived.borrow(),
                        ctx.config.shorten_iris,
                        ctx.config.anonymize_blank_nodes,
                    ),
                )),
                ResultArtifact::Remote { .. } => {}
            }
            store.results.set(label, Rc::new(result));
            store.sources.set(label, Rc::new(body.to_string()));
            return Ok(());
        }

        if let Some(endpoint) = command.value("endpoint") {
            self.endpoint = Some(endpoint.to_string());
        }
        let Some(endpoint) = self.endpoint.clone() else {
            self.log(ctx, "Endpoint not set. Use --endpoint parameter.");
            return Ok(());
        };

        let format = command.value("format").unwrap_or("xml");
        let accept = accept_for(format);
        let response = ctx
            .transport
            .get(
                &endpoint,
                &[("query", query.as_str())],
                accept,
                ctx.config.remote_timeout,
            )
            .map_err(|err| ModuleError::Message(format!("Error during query:\n{err}")))?;

        if let Some(responded) = format_of(&response.content_type) {
            if responded != format {
                self.log(
                    ctx,
                    &format!(
                        "The server responded with a format different from the requested \
                         format.\nEither the server does not support the requested format or \
                         the query resulted in an incompatible type.\nRequested: '{format}', \
                         Response: '{responded}'"
                    ),
                );
            }
        }

        self.display_response(
            &response.body,
            &response.content_type,
            command.value("display").unwrap_or("table"),
            ctx,
        );

        store.results.set(
            label,
            Rc::new(ResultArtifact::Remote {
                body: response.body,
                content_type: response.content_type,
            }),
        );
        store.sources.set(label, Rc::new(body.to_string()));
        Ok(())
    }
}
