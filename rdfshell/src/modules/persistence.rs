// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Persistence module
//!
//! Round-trips graphs between the session and the outside world: load
//! from a local file, download from a URL (with content negotiation
//! derived from `--format`), or save a stored graph to disk. Labels
//! default to the file stem or the last URL segment; output paths
//! default to `{label}.{extension}`. A failed load or download reports
//! its cause and leaves the store untouched.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Arg, ArgAction, ArgGroup, Command};

use crate::error::ModuleError;
use crate::grammar::ParsedCommand;
use crate::modules::{ModuleContext, RdfModule};
use crate::rdf::graph::{parse_graph, serialize_graph};
use crate::rdf::syntax::RdfSyntax;
use crate::store::SessionStore;

const FORMATS: [&str; 6] = ["turtle", "json-ld", "xml", "n3", "nt", "trig"];

/// File and URL round-trips for stored graphs.
#[derive(Default)]
pub struct PersistenceModule;

impl PersistenceModule {
    pub fn new() -> Self {
        Self
    }

    fn load(
        &self,
        path: &str,
        label: Option<&str>,
        syntax: RdfSyntax,
        store: &mut SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError> {
        let file = Path::new(path);
        if !file.exists() {
            self.log(ctx, &format!("File not found: {path}"));
            return Ok(());
        }
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(err) => {
                self.log(ctx, &format!("Failed to load file '{path}': {err}"));
                return Err(ModuleError::Silent);
            }
        };
        let origin = format!("file://{}", file.display());
        let artifact = match parse_graph(&content, syntax, &origin) {
            Ok(artifact) => artifact,
            Err(err) => {
                self.log(ctx, &format!("Failed to load file '{path}': {err}"));
                return Err(ModuleError::Silent);
            }
        };

        let label = match label {
            Some(label) => label.to_string(),
            None => file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "loaded".to_string()),
        };
        let triples = artifact.len();
        store.graphs.set(Some(&label), artifact.shared());
        store.sources.set(Some(&label), Rc::new(content));
        self.log(
            ctx,
            &format!("Loaded graph from '{path}' with label '{label}' ({triples} triples)"),
        );
        Ok(())
    }

    fn download(
        &self,
        url: &str,
        label: Option<&str>,
        syntax: RdfSyntax,
        store: &mut SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError> {
        self.log(ctx, &format!("Downloading from {url}..."));
        let response = match ctx
            .transport
            .get(url, &[], syntax.media_type(), ctx.config.remote_timeout)
        {
            Ok(response) => response,
            Err(err) => {
                self.log(ctx, &format!("Failed to download from '{url}': {err}"));
                return Err(ModuleError::Silent);
            }
        };
        let content = String::from_utf8_lossy(&response.body).into_owned();
        let artifact = match parse_graph(&content, syntax, url) {
            Ok(artifact) => artifact,
            Err(err) => {
                self.log(ctx, &format!("Failed to parse downloaded graph: {err}"));
                return Err(ModuleError::Silent);
            }
        };

        let label = match label {
            Some(label) => label.to_string(),
            None => {
                let tail = url
                    .rsplit('/')
                    .next()
                    .and_then(|segment| segment.split('.').next())
                    .unwrap_or_default();
                if tail.is_empty() {
                    "downloaded".to_string()
                } else {
                    tail.to_string()
                }
            }
        };
        let triples = artifact.len();
        store.graphs.set(Some(&label), artifact.shared());
        store.sources.set(Some(&label), Rc::new(content));
        self.log(
            ctx,
            &format!("Downloaded graph from '{url}' with label '{label}' ({triples} triples)"),
        );
        Ok(())
    }

    fn save(
        &self,
        label: Option<&str>,
        output: Option<&str>,
        syntax: RdfSyntax,
        store: &SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError> {
        let Some(label) = label else {
            self.log(ctx, "Please specify --label to identify which graph to save");
            return Ok(());
        };
        let Some(graph) = store.graphs.get(label) else {
            self.log(ctx, &format!("Graph with label '{label}' not found"));
            return Ok(());
        };

        let output = match output {
            Some(output) => PathBuf::from(output),
            None => PathBuf::from(format!("{label}.{}", syntax.extension())),
        };
        let result = serialize_graph(&graph.borrow(), syntax).and_then(|serialized| {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&output, serialized)?;
            Ok(())
        });
        if let Err(err) = result {
            self.log(ctx, &format!("Failed to save graph: {err}"));
            return Err(ModuleError::Silent);
        }
        self.log(
            ctx,
            &format!(
                "Saved graph '{label}' to '{}' ({} triples)",
                output.display(),
                graph.borrow().len()
            ),
        );
        Ok(())
    }
}

impl RdfModule for PersistenceModule {
    fn name(&self) -> &str {
        "persistence"
    }

    fn display_name(&self) -> &str {
        "Persistence"
    }

    fn grammar(&self) -> Command {
        Command::new("persistence")
            .about("Load, download and save graphs")
            .arg(
                Arg::new("load")
                    .short('l')
                    .long("load")
                    .help("Load an RDF graph from a local file path"),
            )
            .arg(
                Arg::new("download")
                    .short('d')
                    .long("download")
                    .help("Download an RDF graph from a remote URL"),
            )
            .arg(
                Arg::new("save")
                    .short('s')
                    .long("save")
                    .action(ArgAction::SetTrue)
                    .help("Save a graph to disk. Requires --label to select the graph"),
            )
            .group(ArgGroup::new("operation").args(["load", "download", "save"]))
            .arg(
                Arg::new("label")
                    .long("label")
                    .help("Label identifying the graph to store or save"),
            )
            .arg(
                Arg::new("format")
                    .short('f')
                    .long("format")
                    .value_parser(FORMATS)
                    .default_value("turtle")
                    .help("RDF format for the file"),
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .help("Output file path for --save"),
            )
    }

    fn handle(
        &mut self,
        command: &ParsedCommand<'_>,
        store: &mut SessionStore,
        ctx: &ModuleContext<'_>,
    ) -> Result<(), ModuleError> {
        let syntax = command
            .value("format")
            .and_then(RdfSyntax::from_name)
            .unwrap_or(RdfSyntax::Turtle);
        let label = command.value("label");

        if let Some(path) = command.value("load") {
            self.load(path, label, syntax, store, ctx)
        } else if let Some(url) = command.value("download") {
            self.download(url, label, syntax, store, ctx)
        } else if command.flag("save") {
            self.save(label, command.value("output"), syntax, store, ctx)
        } else {
            self.log(ctx, "Please specify --load, --download, or --save");
            Ok(())
        }
    }
}
