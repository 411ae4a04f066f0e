//! Tests for argument parsing

use super::runner::build_query;
use crate::search::{Qualifier, Range};
use super::*;
use crate::error::Error;
use clap::Parser;
use pretty_assertions::assert_eq;
use test_case::test_case;

#[test]
fn test_parse_walk() {
    let cli = Cli::try_parse_from([
        "gh-api-probe",
        "walk",
        "/orgs/acme/repos?per_page=5",
        "/orgs/acme/repos?per_page=10",
        "--max-pages",
        "20",
        "-f",
        "pretty",
    ])
    .unwrap();

    assert_eq!(cli.format, OutputFormat::Pretty);
    match cli.command {
        Commands::Walk {
            urls,
            max_pages,
            items,
        } => {
            assert_eq!(urls.len(), 2);
            assert_eq!(max_pages, Some(20));
            assert!(!items);
        }
        other => panic!("Expected walk, got {other:?}"),
    }
}

#[test]
fn test_walk_requires_url() {
    assert!(Cli::try_parse_from(["gh-api-probe", "walk"]).is_err());
}

#[test]
fn test_parse_rate_limit_defaults() {
    let cli = Cli::try_parse_from(["gh-api-probe", "--token", "abc", "rate-limit"]).unwrap();

    assert_eq!(cli.token.as_deref(), Some("abc"));
    assert_eq!(cli.format, OutputFormat::Json);
    match cli.command {
        Commands::RateLimit { path, expect } => {
            assert_eq!(path, "/meta");
            assert_eq!(expect, None);
        }
        other => panic!("Expected rate-limit, got {other:?}"),
    }
}

#[test_case("stars:>=10", "stars:>=10")]
#[test_case("in:readme", "in:readme")]
#[test_case(" created : <2007-11-01 ", "created:<2007-11-01")]
#[test_case("fork:only", "fork:only")]
fn test_build_query_qualifier(raw: &str, expected: &str) {
    let query = build_query(&[], &[raw.to_string()], None, None).unwrap();
    assert_eq!(query.to_query_string(), expected);
}

#[test]
fn test_build_query_types_qualifiers() {
    let query = build_query(&[], &["stars:>=10".to_string()], None, None).unwrap();
    assert_eq!(
        query.qualifiers(),
        &[Qualifier::Stars(Range::at_least(10))]
    );
}

#[test_case("stars" ; "no separator")]
#[test_case(":10" ; "empty key")]
#[test_case("stars:" ; "empty value")]
#[test_case("mirror:maybe" ; "bad flag")]
#[test_case("in:everything" ; "bad field")]
fn test_build_query_invalid_qualifier(raw: &str) {
    let result = build_query(&[], &[raw.to_string()], None, None);
    assert!(matches!(result, Err(Error::Config { .. })));
}

#[test]
fn test_parse_search_verifies_by_default() {
    let cli = Cli::try_parse_from(["gh-api-probe", "search", "-q", "stars:>=10"]).unwrap();
    match cli.command {
        Commands::Search {
            qualifiers,
            no_verify,
            ..
        } => {
            assert_eq!(qualifiers, vec!["stars:>=10".to_string()]);
            assert!(!no_verify);
        }
        other => panic!("Expected search, got {other:?}"),
    }

    let cli = Cli::try_parse_from(["gh-api-probe", "search", "rust", "--no-verify"]).unwrap();
    assert!(matches!(cli.command, Commands::Search { no_verify: true, .. }));
}

#[test]
fn test_build_query() {
    let query = build_query(
        &["shmest".to_string()],
        &["in:description".to_string()],
        Some("stars"),
        Some(10),
    )
    .unwrap();

    assert_eq!(query.to_query_string(), "shmest in:description");
    assert!(query
        .to_params()
        .contains(&("order".to_string(), "desc".to_string())));
}

#[test]
fn test_build_query_empty() {
    assert!(build_query(&[], &[], None, None).is_err());
}
