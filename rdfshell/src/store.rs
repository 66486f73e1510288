// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Session store
//!
//! The shared mutable state of one shell session: four independent
//! label → artifact mappings (graphs, sources, results, shapes). Every
//! successful write to a mapping also writes the reserved `"last"` label,
//! so `"last"` always aliases the most recent artifact of that kind,
//! whichever module produced it. Labels list in first-insertion order;
//! overwriting a label keeps its position.
//!
//! The store is owned by the dispatcher and lives for the session; it is
//! single-writer by construction (one command at a time), so no locking
//! is involved. Graph artifacts are reference-shared: an explicit label
//! and `"last"` point at the same object, and in-place mutation is
//! visible through both.

use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::rdf::graph::SharedGraph;
use crate::rdf::shape::ShapeSchema;

/// Reserved label maintained automatically on every write.
pub const LAST_LABEL: &str = "last";

/// The four artifact kinds and the mapping names they are published
/// under in store snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Graph,
    Source,
    Result,
    Shape,
}

impl ArtifactKind {
    pub fn mapping_name(self) -> &'static str {
        match self {
            ArtifactKind::Graph => "rdfgraphs",
            ArtifactKind::Source => "rdfsources",
            ArtifactKind::Result => "rdfresults",
            ArtifactKind::Shape => "rdfshapes",
        }
    }
}

/// Outcome of a query, stored as an artifact.
#[derive(Debug, Clone)]
pub enum ResultArtifact {
    /// SELECT bindings: variable names plus one optional term per cell.
    Solutions {
        variables: Vec<String>,
        rows: Vec<Vec<Option<oxrdf::Term>>>,
    },
    /// ASK answer.
    Boolean(bool),
    /// CONSTRUCT/DESCRIBE derived graph.
    Graph(SharedGraph),
    /// Raw remote response, kept as received.
    Remote { body: Vec<u8>, content_type: String },
}

/// One label → artifact mapping with insertion-order listing.
#[derive(Debug)]
pub struct LabelMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for LabelMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LabelMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, label: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Write one label, keeping its list position on overwrite.
    fn write(&mut self, label: &str, value: V) {
        debug!("store write under label '{label}'");
        match self.entries.iter_mut().find(|(l, _)| l == label) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((label.to_string(), value)),
        }
    }

    /// Remove a label. `"last"` keeps pointing at whatever it aliased.
    pub fn remove(&mut self, label: &str) -> Option<V> {
        let position = self.entries.iter().position(|(l, _)| l == label)?;
        Some(self.entries.remove(position).1)
    }

    /// Labels in first-insertion order, `"last"` included.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> LabelMap<V> {
    /// Store an artifact under an optional explicit label; always also
    /// updates `"last"`.
    pub fn set(&mut self, label: Option<&str>, value: V) {
        if let Some(label) = label {
            self.write(label, value.clone());
        }
        self.write(LAST_LABEL, value);
    }
}

/// The shared session state passed to every module call.
#[derive(Debug, Default)]
pub struct SessionStore {
    pub graphs: LabelMap<SharedGraph>,
    pub sources: LabelMap<Rc<String>>,
    pub results: LabelMap<Rc<ResultArtifact>>,
    pub shapes: LabelMap<Rc<ShapeSchema>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializable summary returned for `--return-store`.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            rdfgraphs: self
                .graphs
                .entries
                .iter()
                .map(|(label, graph)| {
                    let graph = graph.borrow();
                    GraphSummary {
                        label: label.clone(),
                        triples: graph.len(),
                        origin: graph.origin.clone(),
                    }
                })
                .collect(),
            rdfsources: self.sources.labels().map(str::to_string).collect(),
            rdfresults: self.results.labels().map(str::to_string).collect(),
            rdfshapes: self.shapes.labels().map(str::to_string).collect(),
        }
    }
}

/// Introspection summary of the whole store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub rdfgraphs: Vec<GraphSummary>,
    pub rdfsources: Vec<String>,
    pub rdfresults: Vec<String>,
    pub rdfshapes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub label: String,
    pub triples: usize,
    pub origin: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::graph::{parse_graph, GraphArtifact};
    use crate::rdf::prefix::PrefixMap;
    use crate::rdf::syntax::RdfSyntax;
    use oxrdf::Graph;

    fn graph(origin: &str) -> SharedGraph {
        GraphArtifact::new(Graph::new(), origin, PrefixMap::new()).shared()
    }

    #[test]
    fn set_updates_label_and_last() {
        let mut store = SessionStore::new();
        let g = graph("turtle");
        store.graphs.set(Some("g1"), g.clone());

        assert!(Rc::ptr_eq(store.graphs.get("g1").unwrap(), &g));
        assert!(Rc::ptr_eq(store.graphs.get(LAST_LABEL).unwrap(), &g));
    }

    #[test]
    fn last_tracks_the_most_recent_write() {
        let mut store = SessionStore::new();
        store.graphs.set(Some("a"), graph("one"));
        let second = graph("two");
        store.graphs.set(Some("b"), second.clone());
        assert!(Rc::ptr_eq(store.graphs.get(LAST_LABEL).unwrap(), &second));

        // Anonymous writes only touch "last".
        let third = graph("three");
        store.graphs.set(None, third.clone());
        assert!(Rc::ptr_eq(store.graphs.get(LAST_LABEL).unwrap(), &third));
        assert!(Rc::ptr_eq(store.graphs.get("b").unwrap(), &second));
    }

    #[test]
    fn labels_keep_first_insertion_order_across_overwrites() {
        let mut map = LabelMap::new();
        map.set(Some("a"), 1);
        map.set(Some("b"), 2);
        map.set(Some("a"), 3);
        let labels: Vec<&str> = map.labels().collect();
        assert_eq!(labels, vec!["a", "last", "b"]);
        assert_eq!(map.get("a"), Some(&3));
    }

    #[test]
    fn remove_missing_label_leaves_mapping_unchanged() {
        let mut map = LabelMap::new();
        map.set(Some("a"), 1);
        assert!(map.remove("missing").is_none());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn aliases_share_mutation() {
        let mut store = SessionStore::new();
        let artifact = parse_graph(
            "@prefix ex: <http://example.org/> . ex:a ex:b ex:c .",
            RdfSyntax::Turtle,
            "turtle",
        )
        .unwrap()
        .shared();
        store.graphs.set(Some("g1"), artifact);

        {
            let alias = store.graphs.get(LAST_LABEL).unwrap();
            let triple = alias.borrow().graph.iter().next().unwrap().into_owned();
            alias.borrow_mut().graph.remove(&triple);
        }
        assert!(store.graphs.get("g1").unwrap().borrow().is_empty());
    }
}
