//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → HTTP client → pagination walk,
//! rate limit probes and repository search against a synthetic organisation.

use chrono::Utc;
use gh_api_probe::auth::AuthConfig;
use gh_api_probe::error::Error;
use gh_api_probe::http::{HttpClient, HttpClientConfig};
use gh_api_probe::pagination::{cancel_pair, PaginationWalker, WalkOptions};
use gh_api_probe::probe::RateLimitProbe;
use gh_api_probe::search::{Qualifier, Range, SearchClient, SearchIn, SearchQuery, SearchVerifier};
use gh_api_probe::types::AuthScheme;
use gh_api_probe::ProbeConfig;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// ============================================================================
// Synthetic organisation
// ============================================================================

const ORG_REPOS: &str = "/orgs/acme/repos";

/// Serves `/orgs/acme/repos` the way GitHub does: `page`/`per_page` query
/// parameters, absolute `Link` URLs, no header when everything fits.
struct OrgRepos {
    total: u64,
}

impl Respond for OrgRepos {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut page = 1u64;
        let mut per_page = 30u64;
        for (key, value) in request.url.query_pairs() {
            match key.as_ref() {
                "page" => page = value.parse().unwrap_or(1),
                "per_page" => per_page = value.parse().unwrap_or(30),
                _ => {}
            }
        }

        let last = self.total.div_ceil(per_page);
        let start = (page - 1) * per_page;
        let end = (start + per_page).min(self.total);
        let repos: Vec<_> = (start..end)
            .map(|i| json!({"id": i + 1, "name": format!("repo-{}", i + 1)}))
            .collect();

        let mut response = ResponseTemplate::new(200).set_body_json(repos);
        if last > 1 {
            let mut base = request.url.clone();
            // wiremock rebuilds origin-form requests as `http://localhost{path}`,
            // dropping the port; restore the authority from the Host header.
            if let Some(host) = request.headers.get("host").and_then(|h| h.to_str().ok()) {
                base = format!("http://{host}{}", request.url.path()).parse().unwrap();
            }
            base.set_query(None);
            let link = |p: u64, rel: &str| format!("<{base}?per_page={per_page}&page={p}>; rel=\"{rel}\"");
            let mut links = Vec::new();
            if page < last {
                links.push(link(page + 1, "next"));
                links.push(link(last, "last"));
            }
            if page > 1 {
                links.push(link(1, "first"));
                links.push(link(page - 1, "prev"));
            }
            response = response.insert_header("link", links.join(", ").as_str());
        }
        response
    }
}

async fn org_server(total: u64) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ORG_REPOS))
        .respond_with(OrgRepos { total })
        .mount(&mock_server)
        .await;
    mock_server
}

fn test_client(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .max_retries(0)
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

// ============================================================================
// Pagination Walk Tests
// ============================================================================

#[test_case("/orgs/acme/repos?per_page=5", 10, 47 ; "five per page from the start")]
#[test_case("/orgs/acme/repos?per_page=5&page=5", 6, 27 ; "five per page from page five")]
#[test_case("/orgs/acme/repos?per_page=10", 5, 47 ; "ten per page")]
#[test_case("/orgs/acme/repos?per_page=100", 1, 47 ; "single page without link header")]
#[tokio::test]
async fn test_walk_counts(start: &str, pages: u64, items: u64) {
    let mock_server = org_server(47).await;
    let client = test_client(&mock_server);

    let result = PaginationWalker::new(&client).walk(start).await.unwrap();

    assert_eq!(result.pages_visited, pages);
    assert_eq!(result.items_seen, items);
}

#[tokio::test]
async fn test_walk_two_urls_concurrently() {
    let mock_server = org_server(47).await;
    let client = test_client(&mock_server);
    let (_handle, signal) = cancel_pair();

    let starts = ["/orgs/acme/repos?per_page=5", "/orgs/acme/repos?per_page=10"];
    let outcomes = PaginationWalker::new(&client)
        .with_cancel(signal)
        .walk_many(&starts)
        .await;

    let totals: Vec<(u64, u64)> = outcomes
        .into_iter()
        .map(|outcome| outcome.map(|r| (r.pages_visited, r.items_seen)).unwrap())
        .collect();
    assert_eq!(totals, vec![(10, 47), (5, 47)]);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 15);
}

#[tokio::test]
async fn test_walk_concurrent_failure_does_not_stop_sibling() {
    let mock_server = org_server(47).await;
    Mock::given(method("GET"))
        .and(path("/orgs/ghost/repos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    let client = test_client(&mock_server);

    let outcomes = PaginationWalker::new(&client)
        .walk_many(&["/orgs/ghost/repos", "/orgs/acme/repos?per_page=10"])
        .await;

    assert!(matches!(
        outcomes[0],
        Err(Error::UnexpectedStatus { status: 404, .. })
    ));
    assert_eq!(outcomes[1].as_ref().map(|r| r.pages_visited).ok(), Some(5));
}

#[tokio::test]
async fn test_walk_aborts_on_failed_next_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORG_REPOS))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(502))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(ORG_REPOS))
        .respond_with(OrgRepos { total: 47 })
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = PaginationWalker::new(&client)
        .walk("/orgs/acme/repos?per_page=5")
        .await
        .unwrap_err();

    match err {
        Error::UnexpectedStatus { url, status } => {
            assert_eq!(status, 502);
            assert!(url.ends_with("page=3"), "unexpected url {url}");
        }
        other => panic!("Expected UnexpectedStatus, got {other}"),
    }
}

#[tokio::test]
async fn test_walk_sends_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ORG_REPOS))
        .and(header("Authorization", "token s3cret"))
        .respond_with(OrgRepos { total: 12 })
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .max_retries(0)
        .no_rate_limit()
        .build();
    let client =
        HttpClient::with_auth(config, AuthConfig::from_token("s3cret", AuthScheme::Token)).unwrap();

    let result = PaginationWalker::new(&client)
        .walk("/orgs/acme/repos?per_page=5")
        .await
        .unwrap();

    assert_eq!(result.pages_visited, 3);
    assert_eq!(result.items_seen, 12);
}

#[tokio::test]
async fn test_walk_page_limit() {
    let mock_server = org_server(47).await;
    let client = test_client(&mock_server);

    let err = PaginationWalker::new(&client)
        .with_options(WalkOptions::default().max_pages(3))
        .walk("/orgs/acme/repos?per_page=5")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::PageLimitExceeded { max_pages: 3 }));
}

#[tokio::test]
async fn test_walk_collect_items() {
    let mock_server = org_server(7).await;
    let client = test_client(&mock_server);

    let (result, items) = PaginationWalker::new(&client)
        .walk_collect("/orgs/acme/repos?per_page=3")
        .await
        .unwrap();

    assert_eq!(result.pages_visited, 3);
    assert_eq!(items.len(), 7);
    assert_eq!(items[0].name, "repo-1");
    assert_eq!(items[6].name, "repo-7");
}

#[tokio::test]
async fn test_relations_of_middle_page() {
    let mock_server = org_server(47).await;
    let client = test_client(&mock_server);

    let relations = PaginationWalker::new(&client)
        .relations("/orgs/acme/repos?per_page=5&page=4")
        .await
        .unwrap();

    assert_eq!(relations.len(), 4);
    assert_eq!(relations.last_page_number(), Some(10));
    assert!(relations.next().is_some_and(|u| u.ends_with("page=5")));
    assert!(relations.prev().is_some_and(|u| u.ends_with("page=3")));
}

#[tokio::test]
async fn test_walk_from_config() {
    let mock_server = org_server(47).await;

    let yaml = format!(
        "base_url: {}\ntoken: from-file\nmax_retries: 0\nwalk:\n  max_pages: 50\n",
        mock_server.uri()
    );
    let config = ProbeConfig::from_yaml_str(&yaml).unwrap();
    config.validate().unwrap();

    let client = HttpClient::with_auth(config.http_client_config(), config.auth_config()).unwrap();
    let result = PaginationWalker::new(&client)
        .with_options(config.walk_options())
        .walk("/orgs/acme/repos?per_page=10")
        .await
        .unwrap();

    assert_eq!(result.pages_visited, 5);
    assert_eq!(result.items_seen, 47);
}

// ============================================================================
// Rate Limit Tests
// ============================================================================

#[tokio::test]
async fn test_rate_limit_probe() {
    let mock_server = MockServer::start().await;
    let reset = (Utc::now().timestamp() + 3600).to_string();

    Mock::given(method("GET"))
        .and(path("/meta"))
        .and(header("If-None-Match", "\"meta-v1\""))
        .respond_with(
            ResponseTemplate::new(304)
                .insert_header("x-ratelimit-limit", "60")
                .insert_header("x-ratelimit-remaining", "57")
                .insert_header("x-ratelimit-reset", reset.as_str()),
        )
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meta"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("etag", "\"meta-v1\"")
                .insert_header("x-ratelimit-limit", "60")
                .insert_header("x-ratelimit-remaining", "57")
                .insert_header("x-ratelimit-reset", reset.as_str())
                .set_body_json(json!({"hooks": []})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let probe = RateLimitProbe::new(&client);

    let quota = probe.check_quota("/meta", None).await.unwrap();
    assert_eq!(quota.status.limit, 60);
    assert!(quota.status.reset_at > Utc::now());

    let conditional = probe.check_conditional("/meta").await.unwrap();
    assert_eq!(conditional.revalidation_status, 304);
    assert!(conditional.quota_preserved());
}

// ============================================================================
// Search Tests
// ============================================================================

#[tokio::test]
async fn test_search_by_size_and_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "zebra in:name size:>=90000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "incomplete_results": false,
            "items": [{"id": 7, "name": "zebra-static", "size": 95000000}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let query = SearchQuery::new()
        .term("zebra")
        .in_field(SearchIn::Name)
        .qualifier(Qualifier::Size(Range::at_least(90_000_000)));

    let results = SearchClient::new(&client)
        .search_repositories(&query)
        .await
        .unwrap();

    assert_eq!(results.names(), vec!["zebra-static"]);
    assert!(results.items[0].size >= 90_000_000);
}

#[tokio::test]
async fn test_search_verifies_help_wanted_issues() {
    let mock_server = MockServer::start().await;
    let repo_url = format!("{}/repos/acme/helpful", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "help-wanted-issues:>10 language:rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 1,
            "incomplete_results": false,
            "items": [{
                "id": 9,
                "name": "helpful",
                "full_name": "acme/helpful",
                "url": repo_url,
                "language": "Rust"
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let issues: Vec<_> = (1..=11)
        .map(|n| json!({"number": n, "labels": [{"name": "help wanted"}, {"name": "good first issue"}]}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/repos/acme/helpful/issues"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let query = SearchQuery::new()
        .qualifier(Qualifier::HelpWantedIssues(Range::greater_than(10)))
        .language("rust");

    let (results, report) = SearchVerifier::new(&client)
        .search_and_verify(&query)
        .await
        .unwrap();

    assert_eq!(results.names(), vec!["helpful"]);
    assert_eq!(report.repositories, 1);
    assert_eq!(
        report.checked,
        vec!["help-wanted-issues:>10".to_string(), "language:rust".to_string()]
    );
}
