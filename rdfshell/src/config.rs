// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session configuration
//!
//! One value object built by the host (CLI flags or embedding code) and
//! threaded through the dispatcher context. There is no ambient global
//! configuration state.

use std::time::Duration;

/// Tunables of one shell session.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// Upper bound on remote query and download fetches.
    pub remote_timeout: Duration,
    /// Abbreviate IRIs with namespace prefixes in tables and drawings.
    pub shorten_iris: bool,
    /// Relabel blank nodes with a per-render counter (`_:bn0`, `_:bn1`, ...)
    /// instead of their raw identifier.
    pub anonymize_blank_nodes: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            remote_timeout: Duration::from_secs(30),
            shorten_iris: true,
            anonymize_blank_nodes: true,
        }
    }
}
