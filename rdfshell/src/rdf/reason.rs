// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Entailment expansion
//!
//! Forward-chaining closure over a graph, run to a fixed point, so
//! applying the same regime twice never adds anything new. The RDFS
//! regime covers the finite core of the RDFS rule set (rdfs2, rdfs3,
//! rdfs5, rdfs7, rdfs9, rdfs11); the OWL regime covers the
//! property-oriented OWL 2 RL rules that make sense on a plain triple
//! set (symmetric/transitive/inverse properties, sameAs, class and
//! property equivalence). Expansion happens in place on the shared
//! graph, visible through every label aliasing it.

use oxrdf::vocab::{rdf, rdfs};
use oxrdf::{Graph, NamedNode, Subject, Term, Triple};

/// Reasoning regimes offered by the serialization and graph manager
/// modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntailmentRegime {
    Rdfs,
    Owl,
    /// RDFS closure first, then the OWL rules.
    RdfsThenOwl,
}

impl EntailmentRegime {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rdfs" => Some(Self::Rdfs),
            "owl" => Some(Self::Owl),
            "rdfs+owl" => Some(Self::RdfsThenOwl),
            _ => None,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Rdfs => "the RDFS regime",
            Self::Owl => "the OWL-RL regime",
            Self::RdfsThenOwl => "the RDFS regime and then the OWL-RL regime",
        }
    }
}

mod owl {
    use oxrdf::NamedNodeRef;

    pub const SYMMETRIC_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#SymmetricProperty");
    pub const TRANSITIVE_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
    pub const INVERSE_OF: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
    pub const SAME_AS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
    pub const EQUIVALENT_CLASS: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
    pub const EQUIVALENT_PROPERTY: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentProperty");
}

/// Expand `graph` in place under the given regime.
pub fn expand(graph: &mut Graph, regime: EntailmentRegime) {
    match regime {
        EntailmentRegime::Rdfs => fixed_point(graph, rdfs_step),
        EntailmentRegime::Owl => fixed_point(graph, owl_step),
        EntailmentRegime::RdfsThenOwl => {
            fixed_point(graph, rdfs_step);
            fixed_point(graph, owl_step);
        }
    }
}

fn fixed_point(graph: &mut Graph, step: fn(&[Triple]) -> Vec<Triple>) {
    loop {
        let triples: Vec<Triple> = graph.iter().map(|t| t.into_owned()).collect();
        let mut added = false;
        for triple in step(&triples) {
            if !graph.contains(&triple) {
                graph.insert(&triple);
                added = true;
            }
        }
        if !added {
            return;
        }
    }
}

fn subject_named(subject: &Subject) -> Option<NamedNode> {
    match subject {
        Subject::NamedNode(n) => Some(n.clone()),
        _ => None,
    }
}

fn object_named(object: &Term) -> Option<NamedNode> {
    match object {
        Term::NamedNode(n) => Some(n.clone()),
        _ => None,
    }
}

fn object_as_subject(object: &Term) -> Option<Subject> {
    match object {
        Term::NamedNode(n) => Some(Subject::NamedNode(n.clone())),
        Term::BlankNode(b) => Some(Subject::BlankNode(b.clone())),
        _ => None,
    }
}

fn subject_as_object(subject: &Subject) -> Option<Term> {
    match subject {
        Subject::NamedNode(n) => Some(Term::NamedNode(n.clone())),
        Subject::BlankNode(b) => Some(Term::BlankNode(b.clone())),
        _ => None,
    }
}

/// One round of the RDFS rules.
fn rdfs_step(triples: &[Triple]) -> Vec<Triple> {
    let mut sub_properties = Vec::new();
    let mut sub_classes = Vec::new();
    let mut domains = Vec::new();
    let mut ranges = Vec::new();
    for t in triples {
        let pair = || Some((subject_named(&t.subject)?, object_named(&t.object)?));
        if t.predicate == rdfs::SUB_PROPERTY_OF {
            sub_properties.extend(pair());
        } else if t.predicate == rdfs::SUB_CLASS_OF {
            sub_classes.extend(pair());
        } else if t.predicate == rdfs::DOMAIN {
            domains.extend(pair());
        } else if t.predicate == rdfs::RANGE {
            ranges.extend(pair());
        }
    }

    let mut fresh = Vec::new();

    // rdfs5 / rdfs11: transitivity of the two hierarchies.
    for (p, q) in &sub_properties {
        for (q2, r) in &sub_properties {
            if q == q2 {
                fresh.push(Triple::new(
                    p.clone(),
                    rdfs::SUB_PROPERTY_OF.into_owned(),
                    r.clone(),
                ));
            }
        }
    }
    for (c, d) in &sub_classes {
        for (d2, e) in &sub_classes {
            if d == d2 {
                fresh.push(Triple::new(
                    c.clone(),
                    rdfs::SUB_CLASS_OF.into_owned(),
                    e.clone(),
                ));
            }
        }
    }

    for t in triples {
        // rdfs7: a p statement is also a statement of every super-property.
        for (p, q) in &sub_properties {
            if t.predicate == *p {
                fresh.push(Triple::new(t.subject.clone(), q.clone(), t.object.clone()));
            }
        }
        // rdfs2 / rdfs3: domain and range typing.
        for (p, c) in &domains {
            if t.predicate == *p {
                fresh.push(Triple::new(
                    t.subject.clone(),
                    rdf::TYPE.into_owned(),
                    c.clone(),
                ));
            }
        }
        for (p, c) in &ranges {
            if t.predicate == *p {
                if let Some(subject) = object_as_subject(&t.object) {
                    fresh.push(Triple::new(subject, rdf::TYPE.into_owned(), c.clone()));
                }
            }
        }
        // rdfs9: instances inherit along subClassOf.
        if t.predicate == rdf::TYPE {
            if let Some(class) = object_named(&t.object) {
                for (c, d) in &sub_classes {
                    if *c == class {
                        fresh.push(Triple::new(
                            t.subject.clone(),
                            rdf::TYPE.into_owned(),
                            d.clone(),
                        ));
                    }
                }
            }
        }
    }

    fresh
}

/// One round of the OWL 2 RL property rules.
fn owl_step(triples: &[Triple]) -> Vec<Triple> {
    let mut symmetric = Vec::new();
    let mut transitive = Vec::new();
    let mut inverses = Vec::new();
    let mut equivalent_properties = Vec::new();
    let mut equivalent_classes = Vec::new();
    for t in triples {
        if t.predicate == rdf::TYPE {
            if let (Some(p), Term::NamedNode(class)) = (subject_named(&t.subject), &t.object) {
                if class.as_ref() == owl::SYMMETRIC_PROPERTY {
                    symmetric.push(p);
                } else if class.as_ref() == owl::TRANSITIVE_PROPERTY {
                    transitive.push(p);
                }
            }
        } else if t.predicate == owl::INVERSE_OF {
            if let Some((p, q)) = subject_named(&t.subject).zip(object_named(&t.object)) {
                inverses.push((p.clone(), q.clone()));
                inverses.push((q, p));
            }
        } else if t.predicate == owl::EQUIVALENT_PROPERTY {
            if let Some((p, q)) = subject_named(&t.subject).zip(object_named(&t.object)) {
                equivalent_properties.push((p.clone(), q.clone()));
                equivalent_properties.push((q, p));
            }
        } else if t.predicate == owl::EQUIVALENT_CLASS {
            if let Some((c, d)) = subject_named(&t.subject).zip(object_named(&t.object)) {
                equivalent_classes.push((c.clone(), d.clone()));
                equivalent_classes.push((d, c));
            }
        }
    }

    let mut fresh = Vec::new();

    for t in triples {
        // Symmetry of sameAs itself.
        if t.predicate == owl::SAME_AS {
            if let (Some(o), Some(s)) = (object_as_subject(&t.object), subject_as_object(&t.subject))
            {
                fresh.push(Triple::new(o.clone(), owl::SAME_AS.into_owned(), s));
                // Transitivity of sameAs.
                for t2 in triples {
                    if t2.predicate == owl::SAME_AS && t2.subject == o {
                        fresh.push(Triple::new(
                            t.subject.clone(),
                            owl::SAME_AS.into_owned(),
                            t2.object.clone(),
                        ));
                    }
                }
            }
        }
        for p in &symmetric {
            if t.predicate == *p {
                if let Some((o, s)) =
                    object_as_subject(&t.object).zip(subject_as_object(&t.subject))
                {
                    fresh.push(Triple::new(o, p.clone(), s));
                }
            }
        }
        for p in &transitive {
            if t.predicate == *p {
                if let Some(mid) = object_as_subject(&t.object) {
                    for t2 in triples {
                        if t2.predicate == *p && t2.subject == mid {
                            fresh.push(Triple::new(
                                t.subject.clone(),
                                p.clone(),
                                t2.object.clone(),
                            ));
                        }
                    }
                }
            }
        }
        for (p, q) in &inverses {
            if t.predicate == *p {
                if let Some((o, s)) =
                    object_as_subject(&t.object).zip(subject_as_object(&t.subject))
                {
                    fresh.push(Triple::new(o, q.clone(), s));
                }
            }
        }
        for (p, q) in &equivalent_properties {
            if t.predicate == *p {
                fresh.push(Triple::new(t.subject.clone(), q.clone(), t.object.clone()));
            }
        }
        if t.predicate == rdf::TYPE {
            if let Some(class) = object_named(&t.object) {
                for (c, d) in &equivalent_classes {
                    if *c == class {
                        fresh.push(Triple::new(
                            t.subject.clone(),
                            rdf::TYPE.into_owned(),
                            d.clone(),
                        ));
                    }
                }
            }
        }
    }

    fresh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::graph::parse_graph;
    use crate::rdf::syntax::RdfSyntax;

    fn sample() -> Graph {
        parse_graph(
            "@prefix ex: <http://example.org/> .\n\
             @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
             ex:Dog rdfs:subClassOf ex:Animal .\n\
             ex:Animal rdfs:subClassOf ex:Thing .\n\
             ex:rex a ex:Dog .\n\
             ex:hasPet rdfs:domain ex:Owner .\n\
             ex:ada ex:hasPet ex:rex .\n",
            RdfSyntax::Turtle,
            "test",
        )
        .unwrap()
        .graph
    }

    fn contains(graph: &Graph, turtle_term: (&str, &str, &str)) -> bool {
        let t = Triple::new(
            NamedNode::new(turtle_term.0).unwrap(),
            NamedNode::new(turtle_term.1).unwrap(),
            NamedNode::new(turtle_term.2).unwrap(),
        );
        graph.contains(&t)
    }

    #[test]
    fn rdfs_closure_derives_types_and_transitivity() {
        let mut graph = sample();
        expand(&mut graph, EntailmentRegime::Rdfs);

        assert!(contains(
            &graph,
            (
                "http://example.org/rex",
                "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
                "http://example.org/Animal"
            )
        ));
        assert!(contains(
            &graph,
            (
                "http://example.org/rex",
                "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
                "http://example.org/Thing"
            )
        ));
        assert!(contains(
            &graph,
            (
                "http://example.org/Dog",
                "http://www.w3.org/2000/01/rdf-schema#subClassOf",
                "http://example.org/Thing"
            )
        ));
        assert!(contains(
            &graph,
            (
                "http://example.org/ada",
                "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
                "http://example.org/Owner"
            )
        ));
    }

    #[test]
    fn closure_is_idempotent() {
        let mut graph = sample();
        expand(&mut graph, EntailmentRegime::Rdfs);
        let after_first = graph.len();
        expand(&mut graph, EntailmentRegime::Rdfs);
        assert_eq!(graph.len(), after_first);
    }

    #[test]
    fn owl_symmetric_and_transitive_rules() {
        let mut graph = parse_graph(
            "@prefix ex: <http://example.org/> .\n\
             @prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
             ex:knows a owl:SymmetricProperty .\n\
             ex:ancestorOf a owl:TransitiveProperty .\n\
             ex:a ex:knows ex:b .\n\
             ex:x ex:ancestorOf ex:y .\n\
             ex:y ex:ancestorOf ex:z .\n",
            RdfSyntax::Turtle,
            "test",
        )
        .unwrap()
        .graph;
        expand(&mut graph, EntailmentRegime::Owl);

        assert!(contains(
            &graph,
            (
                "http://example.org/b",
                "http://example.org/knows",
                "http://example.org/a"
            )
        ));
        assert!(contains(
            &graph,
            (
                "http://example.org/x",
                "http://example.org/ancestorOf",
                "http://example.org/z"
            )
        ));
    }
}
