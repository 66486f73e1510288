// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph artifacts and the parse/serialize capability
//!
//! A graph artifact couples the triple set with an origin descriptor (the
//! module or location that produced it) and the prefix map harvested from
//! its source text. Artifacts are shared by reference between store slots,
//! so in-place mutation (entailment expansion) is visible through every
//! label pointing at the same graph.

use std::cell::RefCell;
use std::rc::Rc;

use once_cell::sync::Lazy;
use oxrdf::{Graph, GraphNameRef, QuadRef, Triple};
use oxrdfio::{RdfParser, RdfSerializer};
use regex::Regex;

use crate::error::RdfError;
use crate::rdf::prefix::PrefixMap;
use crate::rdf::syntax::RdfSyntax;

/// A graph shared between store slots. Borrow rules are upheld by the
/// single-threaded session model: no borrow is held across a module call.
pub type SharedGraph = Rc<RefCell<GraphArtifact>>;

/// An RDF triple set plus its origin and active prefixes.
#[derive(Debug, Clone)]
pub struct GraphArtifact {
    pub graph: Graph,
    pub origin: String,
    pub prefixes: PrefixMap,
}

impl GraphArtifact {
    pub fn new(graph: Graph, origin: impl Into<String>, prefixes: PrefixMap) -> Self {
        Self {
            graph,
            origin: origin.into(),
            prefixes,
        }
    }

    pub fn shared(self) -> SharedGraph {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

/// Parse `text` into a graph artifact.
///
/// Quads found in named graphs (TriG) are merged into the single triple
/// set. Prefix declarations in the source are harvested on top of the
/// well-known namespaces.
pub fn parse_graph(text: &str, syntax: RdfSyntax, origin: &str) -> Result<GraphArtifact, RdfError> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(syntax.rdf_format()).for_reader(text.as_bytes()) {
        let quad = quad?;
        graph.insert(&Triple::new(quad.subject, quad.predicate, quad.object));
    }
    let mut prefixes = PrefixMap::well_known();
    prefixes.harvest(text);
    Ok(GraphArtifact::new(graph, origin, prefixes))
}

/// Serialize a graph artifact to text, binding its prefixes where the
/// target syntax can express them.
pub fn serialize_graph(artifact: &GraphArtifact, syntax: RdfSyntax) -> Result<String, RdfError> {
    let mut serializer = RdfSerializer::from_format(syntax.rdf_format());
    for (prefix, iri) in artifact.prefixes.iter() {
        // A prefix with an unparsable namespace IRI is skipped; the
        // triples themselves are unaffected.
        if oxiri::Iri::parse(iri).is_ok() {
            serializer = serializer.with_prefix(prefix, iri)?;
        }
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in artifact.graph.iter() {
        writer.serialize_quad(QuadRef::new(
            triple.subject,
            triple.predicate,
            triple.object,
            GraphNameRef::DefaultGraph,
        ))?;
    }
    let bytes = writer.finish()?;
    Ok(String::from_utf8(bytes)?)
}

static HASH_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)###.*$").expect("comment pattern is valid"));

/// Strip `###` comments so they can be used in syntaxes without native
/// comment support (JSON-LD in particular).
pub fn strip_comments(text: &str) -> String {
    HASH_COMMENT.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURTLE: &str = "@prefix ex: <http://example.org/> .\n\
                          ex:a ex:knows ex:b .\n\
                          ex:a ex:name \"Ada\"@en .\n";

    #[test]
    fn parses_turtle_and_harvests_prefixes() {
        let artifact = parse_graph(TURTLE, RdfSyntax::Turtle, "turtle").unwrap();
        assert_eq!(artifact.len(), 2);
        assert_eq!(artifact.origin, "turtle");
        assert_eq!(
            artifact.prefixes.expand("ex:a"),
            "http://example.org/a"
        );
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(parse_graph("not turtle at all", RdfSyntax::Turtle, "turtle").is_err());
    }

    #[test]
    fn parses_json_ld() {
        let doc = r#"{
            "@id": "http://example.org/a",
            "http://example.org/b": {"@id": "http://example.org/c"}
        }"#;
        let artifact = parse_graph(doc, RdfSyntax::JsonLd, "json-ld").unwrap();
        assert_eq!(artifact.len(), 1);
    }

    #[test]
    fn strip_comments_removes_triple_hash_tails() {
        let stripped = strip_comments("{\"a\": 1} ### trailing\nplain line\n");
        assert_eq!(stripped, "{\"a\": 1} \nplain line\n");
    }

    #[test]
    fn serialization_round_trips() {
        let artifact = parse_graph(TURTLE, RdfSyntax::Turtle, "turtle").unwrap();
        for syntax in [
            RdfSyntax::Turtle,
            RdfSyntax::N3,
            RdfSyntax::JsonLd,
            RdfSyntax::RdfXml,
            RdfSyntax::NTriples,
            RdfSyntax::TriG,
        ] {
            let text = serialize_graph(&artifact, syntax).unwrap();
            let back = parse_graph(&text, syntax, "roundtrip").unwrap();
            assert_eq!(back.len(), artifact.len(), "syntax {syntax}");
            for triple in artifact.graph.iter() {
                assert!(back.graph.contains(triple), "missing {triple} in {syntax}");
            }
        }
    }
}
