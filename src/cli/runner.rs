//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{cancel_pair, Item, PaginationResult, PaginationWalker, WalkOptions};
use crate::probe::RateLimitProbe;
use crate::search::{Qualifier, SearchClient, SearchQuery, SearchVerifier, SortOrder};
use serde_json::{json, Value};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = HttpClient::with_auth(config.http_client_config(), config.auth_config())?;

        match &self.cli.command {
            Commands::Links { url } => self.links(&client, &config, url).await,
            Commands::Walk {
                urls,
                max_pages,
                items,
            } => {
                let mut options = config.walk_options();
                if let Some(max_pages) = max_pages {
                    options = options.max_pages(*max_pages);
                }
                self.walk(&client, urls, options, *items).await
            }
            Commands::RateLimit { path, expect } => self.rate_limit(&client, path, *expect).await,
            Commands::Conditional { path } => self.conditional(&client, path).await,
            Commands::Search {
                terms,
                qualifiers,
                sort,
                per_page,
                no_verify,
            } => {
                let query = build_query(terms, qualifiers, sort.as_deref(), *per_page)?;
                self.search(&client, &query, !*no_verify).await
            }
        }
    }

    /// Load configuration: file, then environment, then flags
    fn load_config(&self) -> Result<ProbeConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ProbeConfig::load(path)?,
            None => ProbeConfig::default(),
        };
        config.apply_env();
        config.apply_overrides(self.cli.token.clone(), self.cli.base_url.clone());
        config.validate()?;
        Ok(config)
    }

    /// Print the relations of one page
    async fn links(&self, client: &HttpClient, config: &ProbeConfig, url: &str) -> Result<()> {
        let walker = PaginationWalker::new(client).with_options(config.walk_options());
        let relations = walker.relations(url).await?;

        self.output_message(&json!({
            "type": "LINKS",
            "url": client.build_url(url),
            "links": relations,
            "lastPage": relations.last_page_number(),
        }));
        Ok(())
    }

    /// Traverse every start URL concurrently
    async fn walk(
        &self,
        client: &HttpClient,
        urls: &[String],
        options: WalkOptions,
        print_items: bool,
    ) -> Result<()> {
        let (handle, signal) = cancel_pair();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling traversals");
                handle.cancel();
            }
        });

        let walker = PaginationWalker::new(client)
            .with_options(options)
            .with_cancel(signal);
        let outcomes = if print_items {
            walker.walk_collect_many(urls).await
        } else {
            walker
                .walk_many(urls)
                .await
                .into_iter()
                .map(|outcome| outcome.map(|result| (result, Vec::new())))
                .collect()
        };
        interrupt.abort();

        let mut failed = 0;
        for (url, outcome) in urls.iter().zip(outcomes) {
            if !self.report_walk(url, outcome) {
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(Error::Other(format!(
                "{failed} of {} traversals failed",
                urls.len()
            )));
        }
        Ok(())
    }

    /// Print the outcome of one traversal
    fn report_walk(&self, url: &str, outcome: Result<(PaginationResult, Vec<Item>)>) -> bool {
        match outcome {
            Ok((result, items)) => {
                for item in &items {
                    self.output_message(&json!({
                        "type": "ITEM",
                        "url": url,
                        "item": item,
                    }));
                }
                self.output_message(&json!({
                    "type": "PAGINATION_RESULT",
                    "url": url,
                    "pagesVisited": result.pages_visited,
                    "itemsSeen": result.items_seen,
                }));
                true
            }
            Err(e) => {
                self.output_message(&json!({
                    "type": "ERROR",
                    "url": url,
                    "message": e.to_string(),
                }));
                false
            }
        }
    }

    /// Check the reported quota
    async fn rate_limit(&self, client: &HttpClient, path: &str, expect: Option<u32>) -> Result<()> {
        let report = RateLimitProbe::new(client).check_quota(path, expect).await?;
        self.output_message(&json!({
            "type": "RATE_LIMIT",
            "rateLimit": report,
        }));
        Ok(())
    }

    /// Check conditional request accounting
    async fn conditional(&self, client: &HttpClient, path: &str) -> Result<()> {
        let report = RateLimitProbe::new(client).check_conditional(path).await?;
        self.output_message(&json!({
            "type": "CONDITIONAL",
            "conditional": report,
        }));
        Ok(())
    }

    /// Search repositories
    async fn search(&self, client: &HttpClient, query: &SearchQuery, verify: bool) -> Result<()> {
        info!(query = %query, verify, "Searching repositories");
        let (results, report) = if verify {
            let (results, report) = SearchVerifier::new(client).search_and_verify(query).await?;
            (results, Some(report))
        } else {
            (SearchClient::new(client).search_repositories(query).await?, None)
        };

        self.output_message(&json!({
            "type": "SEARCH_RESULTS",
            "query": query.to_query_string(),
            "totalCount": results.total_count,
            "incompleteResults": results.incomplete_results,
            "names": results.names(),
            "verification": report,
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Build a search query from command-line arguments
pub(crate) fn build_query(
    terms: &[String],
    qualifiers: &[String],
    sort: Option<&str>,
    per_page: Option<u32>,
) -> Result<SearchQuery> {
    let mut query = terms
        .iter()
        .fold(SearchQuery::new(), |query, term| query.term(term.as_str()));

    for raw in qualifiers {
        query = query.qualifier(raw.parse::<Qualifier>()?);
    }
    if let Some(sort) = sort {
        query = query.sort(sort, SortOrder::Desc);
    }
    if let Some(per_page) = per_page {
        query = query.per_page(per_page);
    }

    if query.is_empty() {
        return Err(Error::config("search needs at least one term or qualifier"));
    }
    Ok(query)
}
