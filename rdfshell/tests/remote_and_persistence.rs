// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Integration tests for remote queries and file round-trips
//!
//! The remote side runs against a canned transport, so these tests
//! exercise content negotiation, the format-mismatch warning and the
//! download path without any network. The persistence tests use real
//! temporary files.

#[cfg(test)]
mod remote_and_persistence {
    use rdfshell::error::RdfError;
    use rdfshell::rdf::query::{RemoteClient, RemoteResponse};
    use rdfshell::store::ResultArtifact;
    use rdfshell::{Dispatcher, DisplayData, DisplaySink, MemorySink, Outcome, ShellConfig};
    use std::rc::Rc;
    use std::time::Duration;
    use tempfile::TempDir;

    struct SharedSink(Rc<MemorySink>);

    impl DisplaySink for SharedSink {
        fn emit(&self, data: &DisplayData) {
            self.0.emit(data);
        }
    }

    /// Transport that always answers with one canned response.
    struct Canned {
        body: &'static [u8],
        content_type: &'static str,
    }

    impl RemoteClient for Canned {
        fn get(
            &self,
            _url: &str,
            _query: &[(&str, &str)],
            _accept: &str,
            _timeout: Duration,
        ) -> Result<RemoteResponse, RdfError> {
            Ok(RemoteResponse {
                body: self.body.to_vec(),
                content_type: self.content_type.to_string(),
            })
        }
    }

    struct NoNetwork;

    impl RemoteClient for NoNetwork {
        fn get(
            &self,
            url: &str,
            _query: &[(&str, &str)],
            _accept: &str,
            _timeout: Duration,
        ) -> Result<RemoteResponse, RdfError> {
            Err(RdfError::Transport(format!("no network in tests: {url}")))
        }
    }

    const RESULTS_XML: &[u8] = br#"<?xml version="1.0"?>
<sparql xmlns="http://www.w3.org/2005/sparql-results#">
  <head><variable name="s"/></head>
  <results>
    <result>
      <binding name="s"><uri>http://example.org/a</uri></binding>
    </result>
  </results>
</sparql>"#;

    fn session(transport: Box<dyn RemoteClient>) -> (Dispatcher, Rc<MemorySink>) {
        let sink = Rc::new(MemorySink::new());
        let dispatcher = Dispatcher::new(
            Box::new(SharedSink(sink.clone())),
            ShellConfig::default(),
            transport,
        );
        (dispatcher, sink)
    }

    fn messages(sink: &MemorySink) -> Vec<String> {
        sink.events()
            .into_iter()
            .filter_map(|event| match event {
                DisplayData::Message(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn remote_query_renders_a_table_and_stores_the_response() {
        let (mut dispatcher, sink) = session(Box::new(Canned {
            body: RESULTS_XML,
            content_type: "application/sparql-results+xml",
        }));

        let outcome = dispatcher.execute(
            "sparql --endpoint http://endpoint.example/sparql --store q1",
            Some("SELECT ?s WHERE { ?s ?p ?o }"),
        );
        assert!(matches!(outcome, Outcome::Completed(None)));
        assert!(sink.events().iter().any(|event| matches!(
            event,
            DisplayData::Table { header, .. } if header == &vec!["s".to_string()]
        )));

        let result = dispatcher.store().results.get("q1").unwrap();
        assert!(matches!(
            result.as_ref(),
            ResultArtifact::Remote { content_type, .. }
                if content_type == "application/sparql-results+xml"
        ));
    }

    #[test]
    fn format_mismatch_warns_exactly_once() {
        let (mut dispatcher, sink) = session(Box::new(Canned {
            body: RESULTS_XML,
            content_type: "application/sparql-results+xml",
        }));

        dispatcher.execute(
            "sparql --endpoint http://endpoint.example/sparql --format json",
            Some("SELECT ?s WHERE { ?s ?p ?o }"),
        );
        let warnings = messages(&sink)
            .iter()
            .filter(|msg| msg.contains("format different from the requested format"))
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn endpoint_is_remembered_across_invocations() {
        let (mut dispatcher, sink) = session(Box::new(Canned {
            body: RESULTS_XML,
            content_type: "application/sparql-results+xml",
        }));

        dispatcher.execute(
            "sparql --endpoint http://endpoint.example/sparql",
            Some("SELECT ?s WHERE { ?s ?p ?o }"),
        );
        sink.take();

        dispatcher.execute("sparql", Some("SELECT ?s WHERE { ?s ?p ?o }"));
        assert!(!messages(&sink)
            .iter()
            .any(|msg| msg.contains("Endpoint not set")));
    }

    #[test]
    fn missing_endpoint_is_reported() {
        let (mut dispatcher, sink) = session(Box::new(NoNetwork));
        let outcome = dispatcher.execute("sparql", Some("SELECT ?s WHERE { ?s ?p ?o }"));
        assert!(matches!(outcome, Outcome::Completed(None)));
        assert_eq!(
            messages(&sink),
            vec!["SPARQL: Endpoint not set. Use --endpoint parameter.".to_string()]
        );
    }

    #[test]
    fn unknown_response_mime_downgrades_to_raw() {
        let (mut dispatcher, sink) = session(Box::new(Canned {
            body: b"opaque payload",
            content_type: "application/octet-stream",
        }));

        dispatcher.execute(
            "sparql --endpoint http://endpoint.example/sparql",
            Some("SELECT ?s WHERE { ?s ?p ?o }"),
        );
        assert!(messages(&sink)
            .iter()
            .any(|msg| msg.contains("not supported. Defaulting to raw display.")));
        assert!(sink
            .events()
            .iter()
            .any(|event| matches!(event, DisplayData::Text(text) if text == "opaque payload")));
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("people.ttl");
        let path_str = path.to_string_lossy().into_owned();

        let (mut dispatcher, _sink) = session(Box::new(NoNetwork));
        dispatcher.execute(
            "turtle --label g1 --display none",
            Some("@prefix ex: <http://example.org/> .\nex:a ex:b ex:c .\n"),
        );

        let outcome = dispatcher.execute(
            &format!("persistence --save --label g1 --output {path_str}"),
            None,
        );
        assert!(matches!(outcome, Outcome::Completed(None)));
        assert!(path.exists());

        let outcome = dispatcher.execute(
            &format!("persistence --load {path_str} --label reloaded"),
            None,
        );
        assert!(matches!(outcome, Outcome::Completed(None)));
        let reloaded = dispatcher.store().graphs.get("reloaded").unwrap();
        assert_eq!(reloaded.borrow().len(), 1);
    }

    #[test]
    fn load_derives_the_label_from_the_file_stem() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("animals.nt");
        std::fs::write(
            &path,
            "<http://example.org/rex> <http://example.org/is> <http://example.org/dog> .\n",
        )
        .expect("write fixture");

        let (mut dispatcher, sink) = session(Box::new(NoNetwork));
        dispatcher.execute(
            &format!("persistence --load {} --format nt", path.to_string_lossy()),
            None,
        );
        assert!(dispatcher.store().graphs.contains("animals"));
        assert!(messages(&sink)
            .iter()
            .any(|msg| msg.contains("with label 'animals' (1 triples)")));
    }

    #[test]
    fn missing_file_reports_without_aborting() {
        let (mut dispatcher, sink) = session(Box::new(NoNetwork));
        let outcome = dispatcher.execute("persistence --load /no/such/file.ttl", None);
        assert!(matches!(outcome, Outcome::Completed(None)));
        assert_eq!(
            messages(&sink),
            vec!["Persistence: File not found: /no/such/file.ttl".to_string()]
        );
    }

    #[test]
    fn download_derives_the_label_from_the_url_tail() {
        let (mut dispatcher, _sink) = session(Box::new(Canned {
            body: b"@prefix ex: <http://example.org/> .\nex:a ex:b ex:c .\n",
            content_type: "text/turtle",
        }));

        let outcome = dispatcher.execute(
            "persistence --download http://data.example/sets/people.ttl",
            None,
        );
        assert!(matches!(outcome, Outcome::Completed(None)));
        assert!(dispatcher.store().graphs.contains("people"));
        assert!(dispatcher.store().sources.contains("people"));
    }

    #[test]
    fn failed_download_aborts_and_leaves_the_store_untouched() {
        let (mut dispatcher, _sink) = session(Box::new(NoNetwork));
        let outcome = dispatcher.execute(
            "persistence --download http://data.example/sets/people.ttl",
            None,
        );
        assert!(matches!(outcome, Outcome::Aborted));
        assert!(dispatcher.store().graphs.is_empty());
    }

    #[test]
    fn load_and_download_are_mutually_exclusive() {
        let (mut dispatcher, _sink) = session(Box::new(NoNetwork));
        let outcome = dispatcher.execute(
            "persistence --load a.ttl --download http://data.example/b.ttl",
            None,
        );
        assert!(matches!(outcome, Outcome::Failed(_)));
    }
}
