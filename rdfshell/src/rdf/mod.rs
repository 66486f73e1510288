// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RDF capability layer
//!
//! Thin seams over the backend codecs and query engine:
//! - parsing/serialization of the supported syntaxes
//! - namespace prefix bookkeeping
//! - local and remote SPARQL evaluation
//! - entailment expansion
//! - shape schemas and validation
//!
//! Modules talk to these seams only; none of them touch the backend
//! crates directly.

pub mod graph;
pub mod prefix;
pub mod query;
pub mod reason;
pub mod shape;
pub mod syntax;

pub use graph::{parse_graph, serialize_graph, strip_comments, GraphArtifact, SharedGraph};
pub use prefix::PrefixMap;
pub use query::{query_local, HttpClient, RemoteClient, RemoteResponse};
pub use reason::{expand, EntailmentRegime};
pub use shape::{evaluate, load_schema, ShapeOutcome, ShapeSchema};
pub use syntax::RdfSyntax;
