// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph visualization
//!
//! Serializes a graph artifact as a Graphviz DOT document: one node per
//! distinct term, one labeled edge per triple. Literal nodes render as
//! boxes and are shared by value, so two triples pointing at the literal
//! `"42"` converge on one node. Blank node identifiers are scope-local
//! parser artifacts, so they are anonymized to stable `_:bn{n}` names
//! unless configured otherwise.

use std::collections::HashMap;
use std::fmt::Write;

use oxrdf::{Term, TermRef};

use crate::rdf::graph::GraphArtifact;
use crate::rdf::prefix::PrefixMap;

/// Render `artifact` as a DOT digraph.
pub fn graph_to_dot(artifact: &GraphArtifact, shorten: bool, anonymize: bool) -> String {
    let mut dot = String::from("digraph {\n");
    let mut nodes: HashMap<String, usize> = HashMap::new();
    let mut bnode_names: HashMap<String, String> = HashMap::new();

    let mut node_id = |dot: &mut String,
                       nodes: &mut HashMap<String, usize>,
                       bnode_names: &mut HashMap<String, String>,
                       term: TermRef<'_>|
     -> usize {
        let key = term.to_string();
        if let Some(&id) = nodes.get(&key) {
            return id;
        }
        let id = nodes.len();
        nodes.insert(key, id);
        let (label, is_literal) = node_label(term, &artifact.prefixes, shorten, anonymize, bnode_names);
        let shape = if is_literal { " shape=box" } else { "" };
        let _ = writeln!(dot, "  n{id} [label=\"{}\"{shape}];", escape(&label));
        id
    };

    let mut edges = Vec::new();
    for triple in artifact.graph.iter() {
        let subject = Term::from(triple.subject.into_owned());
        let from = node_id(&mut dot, &mut nodes, &mut bnode_names, subject.as_ref());
        let to = node_id(&mut dot, &mut nodes, &mut bnode_names, triple.object);
        let predicate = term_text(
            Term::from(triple.predicate.into_owned()).as_ref(),
            &artifact.prefixes,
            shorten,
        );
        edges.push((from, to, predicate));
    }
    for (from, to, label) in edges {
        let _ = writeln!(dot, "  n{from} -> n{to} [label=\"{}\"];", escape(&label));
    }
    dot.push_str("}\n");
    dot
}

fn node_label(
    term: TermRef<'_>,
    prefixes: &PrefixMap,
    shorten: bool,
    anonymize: bool,
    bnode_names: &mut HashMap<String, String>,
) -> (String, bool) {
    match term {
        TermRef::BlankNode(node) => {
            if anonymize {
                let next = format!("_:bn{}", bnode_names.len());
                let name = bnode_names
                    .entry(node.as_str().to_string())
                    .or_insert(next)
                    .clone();
                (name, false)
            } else {
                (format!("_:{}", node.as_str()), false)
            }
        }
        TermRef::Literal(_) => (term_text(term, prefixes, shorten), true),
        other => (term_text(other, prefixes, shorten), false),
    }
}

fn term_text(term: TermRef<'_>, prefixes: &PrefixMap, shorten: bool) -> String {
    match term {
        TermRef::NamedNode(node) => {
            if shorten {
                if let Some(short) = prefixes.shorten(node.as_str()) {
                    return short;
                }
            }
            node.as_str().to_string()
        }
        TermRef::Literal(literal) => literal.value().to_string(),
        other => other.to_string(),
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::graph::parse_graph;
    use crate::rdf::syntax::RdfSyntax;

    #[test]
    fn nodes_and_edges_are_emitted() {
        let artifact = parse_graph(
            "@prefix ex: <http://example.org/> .\n\
             ex:a ex:knows ex:b .\n\
             ex:a ex:age \"42\" .\n",
            RdfSyntax::Turtle,
            "turtle",
        )
        .unwrap();
        let dot = graph_to_dot(&artifact, true, true);
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("[label=\"ex:a\"]"));
        assert!(dot.contains("[label=\"42\" shape=box]"));
        assert!(dot.contains("[label=\"ex:knows\"]"));
        assert_eq!(dot.matches(" -> ").count(), 2);
    }

    #[test]
    fn literals_are_shared_by_value() {
        let artifact = parse_graph(
            "@prefix ex: <http://example.org/> .\n\
             ex:a ex:age \"42\" .\n\
             ex:b ex:age \"42\" .\n",
            RdfSyntax::Turtle,
            "turtle",
        )
        .unwrap();
        let dot = graph_to_dot(&artifact, true, true);
        assert_eq!(dot.matches("shape=box").count(), 1);
    }

    #[test]
    fn blank_nodes_are_anonymized() {
        let artifact = parse_graph(
            "@prefix ex: <http://example.org/> .\n\
             _:x ex:knows _:y .\n",
            RdfSyntax::Turtle,
            "turtle",
        )
        .unwrap();
        let dot = graph_to_dot(&artifact, true, true);
        assert!(dot.contains("_:bn0"));
        assert!(dot.contains("_:bn1"));
    }

    #[test]
    fn quotes_in_literals_are_escaped() {
        let artifact = parse_graph(
            "@prefix ex: <http://example.org/> .\n\
             ex:a ex:says \"say \\\"hi\\\"\" .\n",
            RdfSyntax::Turtle,
            "turtle",
        )
        .unwrap();
        let dot = graph_to_dot(&artifact, true, true);
        assert!(dot.contains("say \\\"hi\\\""));
    }
}
