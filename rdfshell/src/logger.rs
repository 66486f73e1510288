// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! User-facing output channel
//!
//! Modules never print directly. They hand structured display objects to a
//! session-scoped [`Logger`] which forwards them to a host-provided
//! [`DisplaySink`] (a terminal renderer in the CLI, a recording sink in
//! tests). Diagnostic logging for developers goes through the `log` crate
//! and is configured by the host, independently of this channel.
//!
//! The logger carries the per-invocation verbosity flag: a message tagged
//! verbose is suppressed unless the current command enabled `--verbose`.

use std::cell::Cell;

/// One structured piece of output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayData {
    /// Plain status or error message.
    Message(String),
    /// Tabular result. Cell values are already formatted; a host embedding
    /// cells in markup is responsible for escaping them.
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Graphviz DOT source for a node/edge visualization.
    Dot(String),
    /// Raw, preformatted text (serializations, response bodies).
    Text(String),
}

/// Host side of the display channel.
pub trait DisplaySink {
    fn emit(&self, data: &DisplayData);
}

/// Session-scoped logger owning the display sink and the verbosity gate.
pub struct Logger {
    sink: Box<dyn DisplaySink>,
    verbose: Cell<bool>,
}

impl Logger {
    pub fn new(sink: Box<dyn DisplaySink>) -> Self {
        Self {
            sink,
            verbose: Cell::new(false),
        }
    }

    /// Set for the duration of one dispatcher call from the parsed
    /// `--verbose` flag.
    pub fn set_verbose(&self, verbose: bool) {
        self.verbose.set(verbose);
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.get()
    }

    /// Emit a message unconditionally.
    pub fn print(&self, msg: impl Into<String>) {
        self.sink.emit(&DisplayData::Message(msg.into()));
    }

    /// Emit a message only when verbosity is enabled.
    pub fn print_verbose(&self, msg: impl Into<String>) {
        if self.verbose.get() {
            self.print(msg);
        }
    }

    /// Emit a structured display object.
    pub fn display(&self, data: DisplayData) {
        self.sink.emit(&data);
    }
}

/// Sink that records everything it receives. Used by the test suites and
/// by embedders that post-process output instead of printing it.
#[derive(Default)]
pub struct MemorySink {
    events: std::cell::RefCell<Vec<DisplayData>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<DisplayData> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn events(&self) -> Vec<DisplayData> {
        self.events.borrow().clone()
    }
}

impl DisplaySink for MemorySink {
    fn emit(&self, data: &DisplayData) {
        self.events.borrow_mut().push(data.clone());
    }
}
