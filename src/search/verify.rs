//! Result verification
//!
//! Checks that every repository a search returned actually satisfies the
//! typed qualifiers of its query.

use super::client::SearchClient;
use super::query::{Qualifier, Range, SearchQuery, Visibility};
use super::types::{Issue, Repository, SearchResults};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

/// Label counted by the `help-wanted-issues:` qualifier
pub const HELP_WANTED: &str = "help wanted";

/// Issues fetched per repository for the help-wanted count
const ISSUES_PER_PAGE: &str = "100";

/// Outcome of a verified search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// The `q` parameter that was searched
    pub query: String,
    /// Repositories checked
    pub repositories: usize,
    /// Qualifiers that were checked against each repository
    pub checked: Vec<String>,
    /// Qualifiers the results carry no data for (`in:`, unknown keys)
    pub unchecked: Vec<String>,
}

/// Searches and verifies results through an [`HttpClient`]
#[derive(Debug)]
pub struct SearchVerifier<'a> {
    client: &'a HttpClient,
}

impl<'a> SearchVerifier<'a> {
    /// Create a verifier
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Run the search, then verify its results
    pub async fn search_and_verify(
        &self,
        query: &SearchQuery,
    ) -> Result<(SearchResults, VerificationReport)> {
        let results = SearchClient::new(self.client)
            .search_repositories(query)
            .await?;
        let report = self.verify(query, &results).await?;
        Ok((results, report))
    }

    /// Check every returned repository against every checkable qualifier.
    ///
    /// Fails with [`Error::Check`] naming the first repository and
    /// qualifier that disagree.
    pub async fn verify(
        &self,
        query: &SearchQuery,
        results: &SearchResults,
    ) -> Result<VerificationReport> {
        let mut checked = Vec::new();
        let mut unchecked = Vec::new();

        for qualifier in query.qualifiers() {
            if !is_checkable(qualifier) {
                unchecked.push(qualifier.to_string());
                continue;
            }
            for repo in &results.items {
                let mismatch = match qualifier {
                    Qualifier::HelpWantedIssues(range) => {
                        let count = self.help_wanted_count(repo).await?;
                        debug!(repo = %repo.name, count, "Counted help wanted issues");
                        if compare(range, &count, qualifier)? {
                            None
                        } else {
                            Some(format!("{count} help wanted issues"))
                        }
                    }
                    _ => violation(qualifier, repo)?,
                };
                if let Some(actual) = mismatch {
                    return Err(Error::check(format!(
                        "repository '{}' does not satisfy '{qualifier}': {actual}",
                        repo.full_name.as_deref().unwrap_or(&repo.name)
                    )));
                }
            }
            checked.push(qualifier.to_string());
        }

        info!(
            query = %query,
            repositories = results.items.len(),
            checked = checked.len(),
            "Search results verified"
        );
        Ok(VerificationReport {
            query: query.to_query_string(),
            repositories: results.items.len(),
            checked,
            unchecked,
        })
    }

    /// Count the help-wanted issues among the first page of a repository's issues
    async fn help_wanted_count(&self, repo: &Repository) -> Result<u64> {
        let api_url = repo.url.as_deref().ok_or_else(|| {
            Error::check(format!("repository '{}' has no API url", repo.name))
        })?;
        let issues_url = format!("{}/issues", api_url.trim_end_matches('/'));

        let response = self
            .client
            .get_with_config(
                &issues_url,
                RequestConfig::new().query("per_page", ISSUES_PER_PAGE),
            )
            .await?;
        if response.status() != StatusCode::OK {
            return Err(Error::unexpected_status(
                response.url(),
                response.status_code(),
            ));
        }

        let issues: Vec<Issue> = response.json()?;
        Ok(issues.iter().filter(|i| i.has_label(HELP_WANTED)).count() as u64)
    }
}

fn is_checkable(qualifier: &Qualifier) -> bool {
    !matches!(qualifier, Qualifier::In(_) | Qualifier::Other(..))
}

/// Describe how `repo` breaks `qualifier`, or `None` if it satisfies it
fn violation(qualifier: &Qualifier, repo: &Repository) -> Result<Option<String>> {
    let failed = |ok: bool, actual: String| if ok { None } else { Some(actual) };

    Ok(match qualifier {
        Qualifier::User(login) | Qualifier::Org(login) => {
            let owner = repo
                .full_name
                .as_deref()
                .and_then(|full| full.split_once('/'))
                .map(|(owner, _)| owner);
            failed(
                owner.is_some_and(|o| o.eq_ignore_ascii_case(login)),
                format!("owner is {}", owner.unwrap_or("unknown")),
            )
        }
        Qualifier::Size(range) => failed(
            compare(range, &repo.size, qualifier)?,
            format!("size is {}", repo.size),
        ),
        Qualifier::Followers(range) => failed(
            compare(range, &repo.watchers, qualifier)?,
            format!("watchers is {}", repo.watchers),
        ),
        Qualifier::Forks(range) => failed(
            compare(range, &repo.forks_count, qualifier)?,
            format!("forks_count is {}", repo.forks_count),
        ),
        Qualifier::Stars(range) => failed(
            compare(range, &repo.stargazers_count, qualifier)?,
            format!("stargazers_count is {}", repo.stargazers_count),
        ),
        Qualifier::Created(range) => match repo.created_at {
            Some(created) => {
                let day = created.date_naive();
                failed(compare(range, &day, qualifier)?, format!("created_at is {created}"))
            }
            None => Some("created_at is missing".to_string()),
        },
        Qualifier::Pushed(range) => match repo.pushed_at {
            Some(pushed) => {
                // An exact `pushed:` date matches repositories pushed on or after it.
                let range = match range {
                    Range::Exactly(day) => Range::AtLeast(day.clone()),
                    other => other.clone(),
                };
                let day = pushed.date_naive();
                failed(compare(&range, &day, qualifier)?, format!("pushed_at is {pushed}"))
            }
            None => Some("pushed_at is missing".to_string()),
        },
        Qualifier::Language(language) => failed(
            repo.language
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(language)),
            format!("language is {}", repo.language.as_deref().unwrap_or("unknown")),
        ),
        Qualifier::Topic(topic) => failed(
            repo.has_topic(topic),
            format!("topics are {:?}", repo.topics),
        ),
        Qualifier::Topics(range) => {
            let count = repo.topics.len() as u64;
            failed(
                compare(range, &count, qualifier)?,
                format!("{count} topics"),
            )
        }
        Qualifier::License(key) => {
            let actual = repo.license.as_ref().map(|l| l.key.as_str());
            failed(
                actual.is_some_and(|k| k.eq_ignore_ascii_case(key)),
                format!("license is {}", actual.unwrap_or("none")),
            )
        }
        Qualifier::Is(visibility) => {
            let expected = *visibility == Visibility::Private;
            failed(repo.private == expected, format!("private is {}", repo.private))
        }
        Qualifier::Mirror(expected) => failed(
            repo.is_mirror() == *expected,
            format!("mirror_url is {}", repo.mirror_url.as_deref().unwrap_or("null")),
        ),
        Qualifier::Archived(expected) => failed(
            repo.archived == *expected,
            format!("archived is {}", repo.archived),
        ),
        Qualifier::HelpWantedIssues(_) | Qualifier::In(_) | Qualifier::Other(..) => None,
    })
}

/// Compare a value against a range whose bounds must parse as `T`
fn compare<T>(range: &Range, value: &T, qualifier: &Qualifier) -> Result<bool>
where
    T: std::str::FromStr + PartialOrd,
{
    range
        .contains(value)
        .ok_or_else(|| Error::check(format!("cannot compare against bounds of '{qualifier}'")))
}

