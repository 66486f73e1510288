// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RDF serialization syntaxes recognized by the shell
//!
//! One enum ties together everything a syntax name implies: the module
//! name it is registered under, the file extension used when saving, the
//! MIME type sent for content negotiation and the backend codec.

use oxrdfio::{JsonLdProfileSet, RdfFormat};
use std::fmt;

/// A concrete RDF serialization syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfSyntax {
    Turtle,
    N3,
    JsonLd,
    RdfXml,
    NTriples,
    TriG,
}

impl RdfSyntax {
    /// All syntaxes, in the order they are presented to the user.
    pub const ALL: [RdfSyntax; 6] = [
        RdfSyntax::Turtle,
        RdfSyntax::N3,
        RdfSyntax::JsonLd,
        RdfSyntax::RdfXml,
        RdfSyntax::NTriples,
        RdfSyntax::TriG,
    ];

    /// The user-facing name, also used as a module or flag value.
    pub fn name(self) -> &'static str {
        match self {
            RdfSyntax::Turtle => "turtle",
            RdfSyntax::N3 => "n3",
            RdfSyntax::JsonLd => "json-ld",
            RdfSyntax::RdfXml => "xml",
            RdfSyntax::NTriples => "nt",
            RdfSyntax::TriG => "trig",
        }
    }

    pub fn from_name(name: &str) -> Option<RdfSyntax> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    /// Extension appended when deriving an output file name.
    pub fn extension(self) -> &'static str {
        match self {
            RdfSyntax::Turtle => "ttl",
            RdfSyntax::N3 => "n3",
            RdfSyntax::JsonLd => "jsonld",
            RdfSyntax::RdfXml => "rdf",
            RdfSyntax::NTriples => "nt",
            RdfSyntax::TriG => "trig",
        }
    }

    /// MIME type used as `Accept` header when fetching remote data.
    pub fn media_type(self) -> &'static str {
        match self {
            RdfSyntax::Turtle => "text/turtle",
            RdfSyntax::N3 => "text/n3",
            RdfSyntax::JsonLd => "application/ld+json",
            RdfSyntax::RdfXml => "application/rdf+xml",
            RdfSyntax::NTriples => "application/n-triples",
            RdfSyntax::TriG => "application/trig",
        }
    }

    /// Backend codec for the syntax.
    pub fn rdf_format(self) -> RdfFormat {
        match self {
            RdfSyntax::Turtle => RdfFormat::Turtle,
            RdfSyntax::N3 => RdfFormat::N3,
            RdfSyntax::JsonLd => RdfFormat::JsonLd {
                profile: JsonLdProfileSet::empty(),
            },
            RdfSyntax::RdfXml => RdfFormat::RdfXml,
            RdfSyntax::NTriples => RdfFormat::NTriples,
            RdfSyntax::TriG => RdfFormat::TriG,
        }
    }
}

impl fmt::Display for RdfSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_cover_the_six_syntaxes() {
        let expected = [
            ("turtle", "ttl"),
            ("xml", "rdf"),
            ("json-ld", "jsonld"),
            ("n3", "n3"),
            ("nt", "nt"),
            ("trig", "trig"),
        ];
        for (name, ext) in expected {
            let syntax = RdfSyntax::from_name(name).unwrap();
            assert_eq!(syntax.extension(), ext);
        }
    }

    #[test]
    fn names_round_trip() {
        for syntax in RdfSyntax::ALL {
            assert_eq!(RdfSyntax::from_name(syntax.name()), Some(syntax));
        }
        assert_eq!(RdfSyntax::from_name("rdfa"), None);
    }
}
