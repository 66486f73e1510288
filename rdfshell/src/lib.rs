// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RDFShell — a command shell for working with RDF data.
//!
//! The crate is a host-agnostic engine: a [`dispatch::Dispatcher`] owns a
//! registry of command modules, a [`store::SessionStore`] of labeled
//! artifacts and a [`logger::Logger`] that forwards structured display
//! objects to whatever front end embeds the session. The bundled CLI is
//! one such front end; the test suites embed the engine directly with a
//! recording sink and a canned transport.
//!
//! A command line like
//!
//! ```text
//! turtle --label people --display table
//! ```
//!
//! is tokenized, parsed against the composed module grammar, and routed
//! to the owning module together with an optional out-of-band body (the
//! RDF document, query or schema text the command operates on).

pub mod config;
pub mod dispatch;
pub mod error;
pub mod grammar;
pub mod logger;
pub mod modules;
pub mod rdf;
pub mod render;
pub mod store;

pub use config::ShellConfig;
pub use dispatch::{Dispatcher, Outcome};
pub use error::{ModuleError, RdfError, RenderError, ShellError};
pub use logger::{DisplayData, DisplaySink, Logger, MemorySink};
pub use store::{SessionStore, StoreSnapshot};
