// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Terminal renderer for engine display objects

use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use rdfshell::{DisplayData, DisplaySink};

/// Renders display objects to stdout: tables through comfy-table, DOT
/// sources with a small banner, everything else as plain lines.
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for TerminalSink {
    fn emit(&self, data: &DisplayData) {
        match data {
            DisplayData::Message(msg) => println!("{msg}"),
            DisplayData::Table { header, rows } => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(header.clone());
                for row in rows {
                    table.add_row(row.clone());
                }
                println!("{table}");
                let count = rows.len();
                let noun = if count == 1 { "row" } else { "rows" };
                println!("{}", format!("{count} {noun}").cyan());
            }
            DisplayData::Dot(source) => {
                println!("{}", "Graph (DOT source, render with graphviz):".green());
                println!("{source}");
            }
            DisplayData::Text(text) => println!("{text}"),
        }
    }
}
