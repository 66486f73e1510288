// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Shape schemas and validation
//!
//! A schema is a set of named shapes, each a list of property constraints
//! (predicate, cardinality bounds, optional node-kind / datatype / value
//! set restriction). Schemas are written in a compact JSON form; the
//! shape module parses them into [`ShapeSchema`] artifacts and validates
//! labeled graphs against them, producing one outcome per focus node.
//!
//! Example schema:
//!
//! ```json
//! {
//!   "start": "PersonShape",
//!   "shapes": [{
//!     "name": "PersonShape",
//!     "constraints": [
//!       {"predicate": "foaf:name", "min": 1, "max": 1, "node_kind": "literal"},
//!       {"predicate": "foaf:knows", "node_kind": "iri"}
//!     ]
//!   }]
//! }
//! ```

use oxrdf::{NamedNode, Subject, Term};
use serde::{Deserialize, Serialize};

use crate::error::RdfError;
use crate::rdf::graph::GraphArtifact;
use crate::rdf::prefix::PrefixMap;

/// A parsed constraint schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeSchema {
    pub shapes: Vec<ShapeDef>,
    /// Shape evaluated when no starting shape is given on the command line.
    #[serde(default)]
    pub start: Option<String>,
}

/// One named shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeDef {
    pub name: String,
    #[serde(default)]
    pub constraints: Vec<PropertyConstraint>,
}

/// A constraint on the values of one predicate at the focus node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyConstraint {
    /// Predicate IRI, possibly a prefixed name resolved at evaluation time.
    pub predicate: String,
    #[serde(default)]
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
    /// Restrict objects to `"iri"`, `"literal"` or `"bnode"`.
    #[serde(default)]
    pub node_kind: Option<String>,
    /// Required literal datatype IRI.
    #[serde(default)]
    pub datatype: Option<String>,
    /// Closed set of allowed object values (IRIs or literal lexical forms).
    #[serde(default)]
    pub values: Option<Vec<String>>,
}

/// Outcome of evaluating one focus node against one shape.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeOutcome {
    pub start: String,
    pub focus: String,
    pub passed: bool,
    pub reason: Option<String>,
}

/// Parse a schema from its JSON text.
pub fn load_schema(text: &str) -> Result<ShapeSchema, RdfError> {
    let schema: ShapeSchema =
        serde_json::from_str(text).map_err(|e| RdfError::Shape(e.to_string()))?;
    if schema.shapes.is_empty() {
        return Err(RdfError::Shape("schema declares no shapes".to_string()));
    }
    Ok(schema)
}

/// Validate `graph` against `schema`.
///
/// `focus` narrows evaluation to one node (IRI or prefixed name expanded
/// against `prefixes` and the graph's own prefix map); otherwise every
/// subject of the graph is evaluated. `start` selects the shape by name,
/// falling back to the schema's declared start and then its first shape.
pub fn evaluate(
    artifact: &GraphArtifact,
    schema: &ShapeSchema,
    focus: Option<&str>,
    start: Option<&str>,
    prefixes: &PrefixMap,
) -> Result<Vec<ShapeOutcome>, RdfError> {
    let shape = resolve_shape(schema, start)?;

    let expand = |name: &str| -> String {
        let expanded = prefixes.expand(name);
        if expanded == name {
            artifact.prefixes.expand(name)
        } else {
            expanded
        }
    };

    let focus_nodes: Vec<Subject> = match focus {
        Some(node) => {
            let iri = expand(node.trim_start_matches('<').trim_end_matches('>'));
            vec![Subject::NamedNode(NamedNode::new(iri)?)]
        }
        None => {
            let mut subjects: Vec<Subject> = Vec::new();
            for t in artifact.graph.iter() {
                let subject = t.subject.into_owned();
                if !subjects.contains(&subject) {
                    subjects.push(subject);
                }
            }
            subjects
        }
    };

    let mut outcomes = Vec::new();
    for node in focus_nodes {
        let reason = check_focus(artifact, shape, &node, &expand)?;
        outcomes.push(ShapeOutcome {
            start: shape.name.clone(),
            focus: node.to_string(),
            passed: reason.is_none(),
            reason,
        });
    }
    Ok(outcomes)
}

fn resolve_shape<'a>(
    schema: &'a ShapeSchema,
    start: Option<&str>,
) -> Result<&'a ShapeDef, RdfError> {
    let name = start.or(schema.start.as_deref());
    match name {
        Some(name) => schema
            .shapes
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RdfError::Shape(format!("no shape named '{name}' in schema"))),
        // Checked non-empty at load time.
        None => schema
            .shapes
            .first()
            .ok_or_else(|| RdfError::Shape("schema declares no shapes".to_string())),
    }
}

fn check_focus(
    artifact: &GraphArtifact,
    shape: &ShapeDef,
    focus: &Subject,
    expand: &dyn Fn(&str) -> String,
) -> Result<Option<String>, RdfError> {
    for constraint in &shape.constraints {
        let predicate = NamedNode::new(expand(&constraint.predicate))?;
        let objects: Vec<Term> = artifact
            .graph
            .iter()
            .filter(|t| t.subject == focus.as_ref() && t.predicate == predicate.as_ref())
            .map(|t| t.object.into_owned())
            .collect();

        let count = objects.len() as u32;
        if count < constraint.min {
            return Ok(Some(format!(
                "expected at least {} value(s) for <{predicate}>, found {count}",
                constraint.min
            )));
        }
        if let Some(max) = constraint.max {
            if count > max {
                return Ok(Some(format!(
                    "expected at most {max} value(s) for <{predicate}>, found {count}"
                )));
            }
        }

        for object in &objects {
            if let Some(kind) = &constraint.node_kind {
                let matches = match kind.as_str() {
                    "iri" => matches!(object, Term::NamedNode(_)),
                    "literal" => matches!(object, Term::Literal(_)),
                    "bnode" => matches!(object, Term::BlankNode(_)),
                    other => {
                        return Err(RdfError::Shape(format!("unknown node kind '{other}'")))
                    }
                };
                if !matches {
                    return Ok(Some(format!(
                        "value {object} of <{predicate}> is not of kind '{kind}'"
                    )));
                }
            }
            if let Some(datatype) = &constraint.datatype {
                let expected = NamedNode::new(expand(datatype))?;
                let ok = matches!(object, Term::Literal(lit) if lit.datatype() == expected.as_ref());
                if !ok {
                    return Ok(Some(format!(
                        "value {object} of <{predicate}> does not have datatype <{expected}>"
                    )));
                }
            }
            if let Some(values) = &constraint.values {
                let ok = values.iter().any(|allowed| match object {
                    Term::NamedNode(n) => n.as_str() == expand(allowed),
                    Term::Literal(lit) => lit.value() == allowed,
                    _ => false,
                });
                if !ok {
                    return Ok(Some(format!(
                        "value {object} of <{predicate}> is not in the allowed value set"
                    )));
                }
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::graph::parse_graph;
    use crate::rdf::syntax::RdfSyntax;

    const DATA: &str = "@prefix ex: <http://example.org/> .\n\
                        ex:ada ex:name \"Ada\" .\n\
                        ex:ada ex:knows ex:bob .\n\
                        ex:bob ex:knows ex:ada .\n";

    const SCHEMA: &str = r#"{
        "start": "PersonShape",
        "shapes": [{
            "name": "PersonShape",
            "constraints": [
                {"predicate": "ex:name", "min": 1, "max": 1, "node_kind": "literal"},
                {"predicate": "ex:knows", "min": 1, "node_kind": "iri"}
            ]
        }]
    }"#;

    #[test]
    fn focused_validation_passes_and_fails() {
        let artifact = parse_graph(DATA, RdfSyntax::Turtle, "turtle").unwrap();
        let schema = load_schema(SCHEMA).unwrap();
        let mut prefixes = PrefixMap::new();
        prefixes.bind("ex", "http://example.org/");

        let ok = evaluate(&artifact, &schema, Some("ex:ada"), None, &prefixes).unwrap();
        assert_eq!(ok.len(), 1);
        assert!(ok[0].passed, "{:?}", ok[0].reason);

        // bob has no name, so the min-cardinality constraint trips.
        let fail = evaluate(&artifact, &schema, Some("ex:bob"), None, &prefixes).unwrap();
        assert!(!fail[0].passed);
        assert!(fail[0].reason.as_deref().unwrap().contains("at least"));
    }

    #[test]
    fn unfocused_validation_covers_every_subject() {
        let artifact = parse_graph(DATA, RdfSyntax::Turtle, "turtle").unwrap();
        let schema = load_schema(SCHEMA).unwrap();
        let outcomes =
            evaluate(&artifact, &schema, None, Some("PersonShape"), &PrefixMap::new()).unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn malformed_schema_is_rejected() {
        assert!(load_schema("{\"shapes\": []}").is_err());
        assert!(load_schema("not json").is_err());
    }
}
