// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command grammar
//!
//! Commands arrive as a single shell-like line (plus an optional
//! out-of-band body). The line is split by [`tokenize`] with quoting and
//! backslash escapes, then parsed against the composed argument tree from
//! [`top_level`]: two shell-level flags plus one subcommand per
//! registered module, each contributing its own flags and choices.
//! Unknown flags, missing required values and out-of-range choices are
//! all rejected by the parser before any module code runs.

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::error::ShellError;

/// Split a command line into argv-style tokens.
///
/// Double and single quotes group words; a backslash escapes the next
/// character outside single quotes. An unterminated quote is a grammar
/// error.
pub fn tokenize(line: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => {
                            return Err(ShellError::Grammar(
                                "unterminated single quote".to_string(),
                            ))
                        }
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => current.push(escaped),
                            None => {
                                return Err(ShellError::Grammar(
                                    "unterminated double quote".to_string(),
                                ))
                            }
                        },
                        Some(inner) => current.push(inner),
                        None => {
                            return Err(ShellError::Grammar(
                                "unterminated double quote".to_string(),
                            ))
                        }
                    }
                }
            }
            '\\' => match chars.next() {
                Some(escaped) => {
                    in_token = true;
                    current.push(escaped);
                }
                None => {
                    return Err(ShellError::Grammar(
                        "dangling escape at end of line".to_string(),
                    ))
                }
            },
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Compose the full argument tree from the registered module grammars.
pub fn top_level<I>(modules: I) -> Command
where
    I: IntoIterator<Item = Command>,
{
    Command::new("rdf")
        .about("RDF command shell")
        .no_binary_name(true)
        .disable_version_flag(true)
        .subcommand_required(false)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("return-store")
                .short('r')
                .long("return-store")
                .action(ArgAction::SetTrue)
                .help("Print a summary of the session store and exit"),
        )
        .subcommands(modules)
}

/// A successfully parsed module invocation.
pub struct ParsedCommand<'a> {
    pub matches: &'a ArgMatches,
    pub body: Option<&'a str>,
}

impl<'a> ParsedCommand<'a> {
    pub fn flag(&self, name: &str) -> bool {
        self.matches.get_flag(name)
    }

    pub fn value(&self, name: &str) -> Option<&'a str> {
        self.matches.get_one::<String>(name).map(String::as_str)
    }

    /// The command body, with surrounding whitespace trimmed; `None` when
    /// absent or blank.
    pub fn body(&self) -> Option<&'a str> {
        self.body.map(str::trim).filter(|b| !b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_split_on_whitespace() {
        assert_eq!(
            tokenize("turtle --label g1  -v").unwrap(),
            vec!["turtle", "--label", "g1", "-v"]
        );
    }

    #[test]
    fn quotes_group_words() {
        assert_eq!(
            tokenize("sparql --endpoint \"http://example.org/my query\"").unwrap(),
            vec!["sparql", "--endpoint", "http://example.org/my query"]
        );
        assert_eq!(tokenize("graph --label 'my graph'").unwrap(), vec![
            "graph",
            "--label",
            "my graph"
        ]);
    }

    #[test]
    fn escapes_inside_double_quotes() {
        assert_eq!(tokenize(r#"say "a \"b\" c""#).unwrap(), vec!["say", "a \"b\" c"]);
    }

    #[test]
    fn empty_quoted_token_is_kept() {
        assert_eq!(tokenize("label \"\"").unwrap(), vec!["label", ""]);
    }

    #[test]
    fn unterminated_quote_is_a_grammar_error() {
        assert!(matches!(
            tokenize("turtle --label \"g1"),
            Err(ShellError::Grammar(_))
        ));
        assert!(matches!(tokenize("x 'y"), Err(ShellError::Grammar(_))));
    }

    #[test]
    fn unknown_module_is_rejected() {
        let tree = top_level([Command::new("turtle")]);
        assert!(tree
            .clone()
            .try_get_matches_from(["no-such-module"])
            .is_err());
    }

    #[test]
    fn global_verbose_reaches_the_subcommand_line() {
        let tree = top_level([Command::new("turtle")]);
        let matches = tree.try_get_matches_from(["turtle", "-v"]).unwrap();
        assert!(matches.get_flag("verbose"));
        assert_eq!(matches.subcommand_name(), Some("turtle"));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let tree = top_level([Command::new("turtle")]);
        assert!(tree.try_get_matches_from(["turtle", "--bogus"]).is_err());
    }
}
