// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for the RDF shell
//!
//! The taxonomy follows the command lifecycle:
//! - [`ShellError`]: bad command syntax, raised before any module runs
//! - [`ModuleError`]: failures inside a module handler, caught at the
//!   dispatcher boundary and reported as a single message
//! - [`RdfError`]: failures of the RDF capability layer (parsing, queries,
//!   remote transport), usually wrapped into a `ModuleError`
//! - [`RenderError`]: result-decoding failures inside the renderer

use thiserror::Error;

/// Errors raised while turning a raw command line into a parsed command.
///
/// A grammar error always aborts the command before any module is invoked
/// and before any store mutation happens.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{0}")]
    Grammar(String),

    /// Only reachable when the grammar and the module registry disagree.
    #[error("no module registered under the name '{0}'")]
    ModuleNotFound(String),
}

/// Errors raised by a module handler.
///
/// Everything except [`ModuleError::Silent`] is logged by the dispatcher as
/// one line; `Silent` means the module already reported what it had to and
/// only wants the command to stop.
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error(transparent)]
    Rdf(#[from] RdfError),

    #[error("{0}")]
    Message(String),

    /// Stop the command without any further output.
    #[error("command aborted")]
    Silent,
}

/// Errors of the RDF capability layer.
#[derive(Error, Debug)]
pub enum RdfError {
    #[error(transparent)]
    Parse(#[from] oxrdfio::RdfParseError),

    #[error(transparent)]
    InvalidIri(#[from] oxrdf::IriParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serializer produced invalid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Storage(#[from] oxigraph::store::StorageError),

    #[error(transparent)]
    Query(#[from] oxigraph::sparql::EvaluationError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid shape schema: {0}")]
    Shape(String),
}

impl From<reqwest::Error> for RdfError {
    fn from(err: reqwest::Error) -> Self {
        RdfError::Transport(err.to_string())
    }
}

/// Errors raised while decoding a result body into rows.
///
/// These are non-fatal by design: callers fall back to a raw text display
/// and emit a warning instead of failing the command.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("mime type '{0}' not supported")]
    UnsupportedMime(String),

    #[error("could not decode result body: {0}")]
    Decode(String),
}

impl From<sparesults::QueryResultsParseError> for RenderError {
    fn from(err: sparesults::QueryResultsParseError) -> Self {
        RenderError::Decode(err.to_string())
    }
}

impl From<sparesults::QueryResultsSyntaxError> for RenderError {
    fn from(err: sparesults::QueryResultsSyntaxError) -> Self {
        RenderError::Decode(err.to_string())
    }
}

impl From<oxrdfio::RdfParseError> for RenderError {
    fn from(err: oxrdfio::RdfParseError) -> Self {
        RenderError::Decode(err.to_string())
    }
}
