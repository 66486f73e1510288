// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result rendering
//!
//! Heterogeneous result encodings converge on one row contract here:
//! a lazy sequence of rows whose first element is always the header row.
//! Three decoders feed it — SPARQL results XML, SPARQL results JSON and
//! an RDF/XML triple stream rendered as subject/predicate/object — and a
//! single table-building routine consumes any of them. An unsupported
//! MIME type is a [`RenderError`] the caller downgrades to a raw-text
//! display with a warning, never a hard failure.
//!
//! Cell formatting: IRIs abbreviate to prefixed names where a namespace
//! applies (`ex:a`), otherwise render as `<iri>`; blank nodes render as
//! `<_:id>`; literals render as `"value"[@lang][^^datatype]`.

pub mod dot;

use std::iter;

use oxrdf::vocab::{rdf, xsd};
use oxrdf::{Term, TermRef};
use oxrdfio::{RdfFormat, RdfParser};
use sparesults::{QueryResultsFormat, QueryResultsParser, SliceQueryResultsParserOutput};

use crate::error::RenderError;
use crate::logger::DisplayData;
use crate::rdf::graph::GraphArtifact;
use crate::rdf::prefix::PrefixMap;

/// MIME types the tabular decoders understand.
pub const SPARQL_RESULTS_XML: &str = "application/sparql-results+xml";
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
pub const RDF_XML: &str = "application/rdf+xml";

/// One row of formatted cells.
pub type Row = Vec<String>;

/// Lazy row sequence; the first item is the header row.
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Row, RenderError>> + 'a>;

/// Decode `body` according to `mime` into the row contract.
pub fn rows_from<'a>(
    body: &'a [u8],
    mime: &str,
    prefixes: &'a PrefixMap,
    shorten: bool,
) -> Result<RowIter<'a>, RenderError> {
    match mime {
        SPARQL_RESULTS_XML => solution_rows(body, QueryResultsFormat::Xml, prefixes, shorten),
        SPARQL_RESULTS_JSON => solution_rows(body, QueryResultsFormat::Json, prefixes, shorten),
        RDF_XML => Ok(triple_rows(body, prefixes, shorten)),
        other => Err(RenderError::UnsupportedMime(other.to_string())),
    }
}

fn solution_rows<'a>(
    body: &'a [u8],
    format: QueryResultsFormat,
    prefixes: &'a PrefixMap,
    shorten: bool,
) -> Result<RowIter<'a>, RenderError> {
    match QueryResultsParser::from_format(format).for_slice(body)? {
        SliceQueryResultsParserOutput::Solutions(solutions) => {
            let variables = solutions.variables().to_vec();
            let header: Row = variables.iter().map(|v| v.as_str().to_string()).collect();
            let rows = solutions.map(move |solution| {
                let solution = solution.map_err(RenderError::from)?;
                Ok(variables
                    .iter()
                    .map(|variable| {
                        solution
                            .get(variable.as_str())
                            .map(|term| format_term(term.as_ref(), prefixes, shorten))
                            .unwrap_or_default()
                    })
                    .collect())
            });
            Ok(Box::new(iter::once(Ok(header)).chain(rows)))
        }
        SliceQueryResultsParserOutput::Boolean(answer) => Ok(Box::new(
            [
                Ok(vec!["boolean".to_string()]),
                Ok(vec![answer.to_string()]),
            ]
            .into_iter(),
        )),
    }
}

fn triple_rows<'a>(body: &'a [u8], prefixes: &'a PrefixMap, shorten: bool) -> RowIter<'a> {
    let header: Row = ["subject", "predicate", "object"]
        .map(str::to_string)
        .to_vec();
    let rows = RdfParser::from_format(RdfFormat::RdfXml)
        .for_reader(body)
        .map(move |quad| {
            let quad = quad.map_err(RenderError::from)?;
            let triple = oxrdf::Triple::new(quad.subject, quad.predicate, quad.object);
            Ok(vec![
                format_term(
                    Term::from(triple.subject).as_ref(),
                    prefixes,
                    shorten,
                ),
                format_term(Term::from(triple.predicate).as_ref(), prefixes, shorten),
                format_term(triple.object.as_ref(), prefixes, shorten),
            ])
        });
    Box::new(iter::once(Ok(header)).chain(rows))
}

/// Materialize a row sequence into a table display object.
pub fn collect_table(mut rows: RowIter<'_>) -> Result<DisplayData, RenderError> {
    let header = rows
        .next()
        .transpose()?
        .ok_or_else(|| RenderError::Decode("result has no header row".to_string()))?;
    let rows = rows.collect::<Result<Vec<Row>, RenderError>>()?;
    Ok(DisplayData::Table { header, rows })
}

/// Subject/predicate/object table of a local graph.
pub fn graph_table(artifact: &GraphArtifact, shorten: bool) -> DisplayData {
    let header = ["subject", "predicate", "object"]
        .map(str::to_string)
        .to_vec();
    let rows = artifact
        .graph
        .iter()
        .map(|t| {
            vec![
                format_term(
                    Term::from(t.subject.into_owned()).as_ref(),
                    &artifact.prefixes,
                    shorten,
                ),
                format_term(
                    Term::from(t.predicate.into_owned()).as_ref(),
                    &artifact.prefixes,
                    shorten,
                ),
                format_term(t.object, &artifact.prefixes, shorten),
            ]
        })
        .collect();
    DisplayData::Table { header, rows }
}

/// Table of local SELECT bindings.
pub fn solutions_table(
    variables: &[String],
    rows: &[Vec<Option<Term>>],
    prefixes: &PrefixMap,
    shorten: bool,
) -> DisplayData {
    DisplayData::Table {
        header: variables.to_vec(),
        rows: rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        cell.as_ref()
                            .map(|term| format_term(term.as_ref(), prefixes, shorten))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect(),
    }
}

/// Format one term for a table cell or a node label.
pub fn format_term(term: TermRef<'_>, prefixes: &PrefixMap, shorten: bool) -> String {
    match term {
        TermRef::NamedNode(node) => {
            if shorten {
                if let Some(short) = prefixes.shorten(node.as_str()) {
                    return short;
                }
            }
            format!("<{}>", node.as_str())
        }
        TermRef::BlankNode(node) => format!("<_:{}>", node.as_str()),
        TermRef::Literal(literal) => {
            let mut out = format!("\"{}\"", literal.value());
            if let Some(language) = literal.language() {
                out.push('@');
                out.push_str(language);
            } else {
                let datatype = literal.datatype();
                if datatype != xsd::STRING && datatype != rdf::LANG_STRING {
                    out.push_str("^^");
                    if shorten {
                        if let Some(short) = prefixes.shorten(datatype.as_str()) {
                            out.push_str(&short);
                            return out;
                        }
                    }
                    out.push_str(&format!("<{}>", datatype.as_str()));
                }
            }
            out
        }
        other => other.to_string(),
    }
}
