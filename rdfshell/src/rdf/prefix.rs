// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Namespace prefix handling
//!
//! The backend model has no notion of bound prefixes, so the shell keeps
//! its own map per graph artifact: the well-known namespaces plus every
//! `@prefix`/`PREFIX` declaration harvested from the source text that
//! produced the graph. The map drives IRI shortening in tables and
//! drawings and expansion of prefixed names given on the command line.

use once_cell::sync::Lazy;
use regex::Regex;

static PREFIX_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^\s*(?:@prefix|prefix)\s+([A-Za-z][A-Za-z0-9_.-]*)?:\s*<([^>]*)>")
        .expect("prefix declaration pattern is valid")
});

const WELL_KNOWN: [(&str, &str); 4] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

/// An ordered prefix → namespace IRI map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: Vec<(String, String)>,
}

impl PrefixMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The well-known RDF/RDFS/OWL/XSD namespaces.
    pub fn well_known() -> Self {
        let mut map = Self::new();
        for (prefix, iri) in WELL_KNOWN {
            map.bind(prefix, iri);
        }
        map
    }

    /// Bind a prefix, replacing an earlier binding of the same prefix.
    pub fn bind(&mut self, prefix: &str, iri: &str) {
        match self.entries.iter_mut().find(|(p, _)| p == prefix) {
            Some((_, bound)) => *bound = iri.to_string(),
            None => self.entries.push((prefix.to_string(), iri.to_string())),
        }
    }

    /// Harvest every prefix declaration (Turtle or SPARQL style) found in
    /// `source` into this map.
    pub fn harvest(&mut self, source: &str) {
        for caps in PREFIX_DECL.captures_iter(source) {
            let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let iri = &caps[2];
            self.bind(prefix, iri);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Abbreviate an IRI to a prefixed name, picking the longest matching
    /// namespace. Returns `None` when no binding applies or the local part
    /// would be empty-and-unnamed.
    pub fn shorten(&self, iri: &str) -> Option<String> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, ns) in self.iter() {
            if iri.starts_with(ns) && best.map_or(true, |(_, b)| ns.len() > b.len()) {
                best = Some((prefix, ns));
            }
        }
        let (prefix, ns) = best?;
        let local = &iri[ns.len()..];
        // A local part containing separators would not re-parse as a
        // prefixed name.
        if local.contains('/') || local.contains('#') {
            return None;
        }
        Some(format!("{prefix}:{local}"))
    }

    /// Expand `name` when it looks like a prefixed name bound here;
    /// otherwise hand it back unchanged.
    pub fn expand(&self, name: &str) -> String {
        if name.starts_with('<') || name.starts_with("_:") {
            return name.to_string();
        }
        if let Some((prefix, local)) = name.split_once(':') {
            if !local.contains("//") {
                if let Some((_, ns)) = self.iter().find(|(p, _)| *p == prefix) {
                    return format!("{ns}{local}");
                }
            }
        }
        name.to_string()
    }
}
