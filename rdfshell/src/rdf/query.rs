// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query capabilities
//!
//! Local queries load the labeled graph into a transient in-memory store
//! and evaluate there; the result is tagged by query form (SELECT / ASK /
//! CONSTRUCT / DESCRIBE). Remote queries and downloads go through the
//! [`RemoteClient`] seam so the test suites can substitute a canned
//! transport for the blocking HTTP client.

use std::time::Duration;

use log::debug;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use oxrdf::{Graph, GraphNameRef, QuadRef, Triple};

use crate::error::RdfError;
use crate::rdf::graph::GraphArtifact;
use crate::store::ResultArtifact;

/// Evaluate `query` against the triples of `artifact`.
pub fn query_local(artifact: &GraphArtifact, query: &str) -> Result<ResultArtifact, RdfError> {
    debug!("evaluating local query over {} triple(s)", artifact.len());
    let store = Store::new()?;
    for triple in artifact.graph.iter() {
        store.insert(QuadRef::new(
            triple.subject,
            triple.predicate,
            triple.object,
            GraphNameRef::DefaultGraph,
        ))?;
    }

    match store.query(query)? {
        QueryResults::Solutions(solutions) => {
            let variables = solutions.variables().to_vec();
            let mut rows = Vec::new();
            for solution in solutions {
                let solution = solution?;
                rows.push(
                    variables
                        .iter()
                        .map(|v| solution.get(v.as_str()).cloned())
                        .collect(),
                );
            }
            Ok(ResultArtifact::Solutions {
                variables: variables
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect(),
                rows,
            })
        }
        QueryResults::Boolean(answer) => Ok(ResultArtifact::Boolean(answer)),
        QueryResults::Graph(triples) => {
            let mut graph = Graph::new();
            for triple in triples {
                let triple: Triple = triple?;
                graph.insert(&triple);
            }
            Ok(ResultArtifact::Graph(
                GraphArtifact::new(graph, "query", artifact.prefixes.clone()).shared(),
            ))
        }
    }
}

/// A fetched remote document.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub body: Vec<u8>,
    /// Content-Type main type, parameters stripped.
    pub content_type: String,
}

/// Blocking HTTP fetch seam used by the query and persistence modules.
pub trait RemoteClient {
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        accept: &str,
        timeout: Duration,
    ) -> Result<RemoteResponse, RdfError>;
}

/// [`RemoteClient`] backed by a blocking reqwest client.
#[derive(Debug, Default)]
pub struct HttpClient;

impl HttpClient {
    pub fn new() -> Self {
        Self
    }
}

impl RemoteClient for HttpClient {
    fn get(
        &self,
        url: &str,
        query: &[(&str, &str)],
        accept: &str,
        timeout: Duration,
    ) -> Result<RemoteResponse, RdfError> {
        debug!("GET {url} (accept: {accept})");
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        let response = client
            .get(url)
            .query(query)
            .header(reqwest::header::ACCEPT, accept)
            .send()?
            .error_for_status()?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(strip_parameters)
            .unwrap_or_default();
        Ok(RemoteResponse {
            content_type,
            body: response.bytes()?.to_vec(),
        })
    }
}

/// Reduce a Content-Type header to its main type.
pub fn strip_parameters(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::graph::parse_graph;
    use crate::rdf::syntax::RdfSyntax;

    const DATA: &str = "@prefix ex: <http://example.org/> .\n\
                        ex:a ex:knows ex:b .\n\
                        ex:b ex:knows ex:c .\n";

    fn artifact() -> GraphArtifact {
        parse_graph(DATA, RdfSyntax::Turtle, "turtle").unwrap()
    }

    #[test]
    fn select_produces_variables_and_rows() {
        let result = query_local(&artifact(), "SELECT ?s ?o WHERE { ?s ?p ?o }").unwrap();
        match result {
            ResultArtifact::Solutions { variables, rows } => {
                assert_eq!(variables, vec!["s", "o"]);
                assert_eq!(rows.len(), 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn ask_produces_boolean() {
        let result = query_local(
            &artifact(),
            "ASK { <http://example.org/a> <http://example.org/knows> <http://example.org/b> }",
        )
        .unwrap();
        assert!(matches!(result, ResultArtifact::Boolean(true)));
    }

    #[test]
    fn construct_produces_graph_with_inherited_prefixes() {
        let result = query_local(
            &artifact(),
            "CONSTRUCT { ?s <http://example.org/linked> ?o } WHERE { ?s <http://example.org/knows> ?o }",
        )
        .unwrap();
        match result {
            ResultArtifact::Graph(graph) => {
                let graph = graph.borrow();
                assert_eq!(graph.len(), 2);
                assert_eq!(graph.prefixes.expand("ex:x"), "http://example.org/x");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn bad_query_reports_error() {
        assert!(query_local(&artifact(), "SELECT WHERE garbage").is_err());
    }

    #[test]
    fn content_type_parameters_are_stripped() {
        assert_eq!(
            strip_parameters("application/sparql-results+XML; charset=utf-8"),
            "application/sparql-results+xml"
        );
    }
}
