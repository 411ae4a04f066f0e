//! Search query builder
//!
//! Produces the `q` parameter of `/search/repositories`. Terms and
//! qualifiers are separated by spaces; the HTTP layer encodes those as `+`.

use crate::error::{Error, Result};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Numeric or date comparison used by range qualifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range {
    /// `n`
    Exactly(String),
    /// `>n`
    GreaterThan(String),
    /// `>=n`
    AtLeast(String),
    /// `<n`
    LessThan(String),
    /// `<=n`
    AtMost(String),
    /// `a..b`
    Between(String, String),
}

impl Range {
    /// Exact match
    pub fn exactly(value: impl Display) -> Self {
        Self::Exactly(value.to_string())
    }

    /// Strictly greater
    pub fn greater_than(value: impl Display) -> Self {
        Self::GreaterThan(value.to_string())
    }

    /// Greater or equal
    pub fn at_least(value: impl Display) -> Self {
        Self::AtLeast(value.to_string())
    }

    /// Strictly less
    pub fn less_than(value: impl Display) -> Self {
        Self::LessThan(value.to_string())
    }

    /// Less or equal
    pub fn at_most(value: impl Display) -> Self {
        Self::AtMost(value.to_string())
    }

    /// Inclusive range
    pub fn between(low: impl Display, high: impl Display) -> Self {
        Self::Between(low.to_string(), high.to_string())
    }

    /// Whether `value` falls inside the range.
    ///
    /// Returns `None` when a bound does not parse as `T`.
    pub fn contains<T>(&self, value: &T) -> Option<bool>
    where
        T: FromStr + PartialOrd,
    {
        let bound = |raw: &str| raw.parse::<T>().ok();
        Some(match self {
            Self::Exactly(v) => *value == bound(v)?,
            Self::GreaterThan(v) => *value > bound(v)?,
            Self::AtLeast(v) => *value >= bound(v)?,
            Self::LessThan(v) => *value < bound(v)?,
            Self::AtMost(v) => *value <= bound(v)?,
            Self::Between(low, high) => *value >= bound(low)? && *value <= bound(high)?,
        })
    }
}

impl FromStr for Range {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let range = if let Some(v) = s.strip_prefix(">=") {
            Self::at_least(v.trim())
        } else if let Some(v) = s.strip_prefix("<=") {
            Self::at_most(v.trim())
        } else if let Some(v) = s.strip_prefix('>') {
            Self::greater_than(v.trim())
        } else if let Some(v) = s.strip_prefix('<') {
            Self::less_than(v.trim())
        } else if let Some((low, high)) = s.split_once("..") {
            Self::between(low.trim(), high.trim())
        } else {
            Self::exactly(s)
        };

        let empty = match &range {
            Self::Between(low, high) => low.is_empty() || high.is_empty(),
            Self::Exactly(v)
            | Self::GreaterThan(v)
            | Self::AtLeast(v)
            | Self::LessThan(v)
            | Self::AtMost(v) => v.is_empty(),
        };
        if empty {
            return Err(Error::config(format!("Invalid range '{s}'")));
        }
        Ok(range)
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(v) => write!(f, "{v}"),
            Self::GreaterThan(v) => write!(f, ">{v}"),
            Self::AtLeast(v) => write!(f, ">={v}"),
            Self::LessThan(v) => write!(f, "<{v}"),
            Self::AtMost(v) => write!(f, "<={v}"),
            Self::Between(a, b) => write!(f, "{a}..{b}"),
        }
    }
}

/// Where free-text terms are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchIn {
    /// Repository name
    Name,
    /// Repository description
    Description,
    /// README contents
    Readme,
}

impl Display for SearchIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Readme => "readme",
        })
    }
}

impl FromStr for SearchIn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "readme" => Ok(Self::Readme),
            _ => Err(Error::config(format!("Invalid in: target '{s}'"))),
        }
    }
}

/// Repository visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `is:public`
    Public,
    /// `is:private`
    Private,
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(Error::config(format!("Invalid visibility '{s}'"))),
        }
    }
}

/// A search qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Qualifier {
    /// `in:name|description|readme`
    In(SearchIn),
    /// `user:login`
    User(String),
    /// `org:login`
    Org(String),
    /// `size:` in kilobytes
    Size(Range),
    /// `followers:`
    Followers(Range),
    /// `forks:`
    Forks(Range),
    /// `stars:`
    Stars(Range),
    /// `created:` (dates as `YYYY-MM-DD`)
    Created(Range),
    /// `pushed:` (dates as `YYYY-MM-DD`)
    Pushed(Range),
    /// `language:`
    Language(String),
    /// `topic:`
    Topic(String),
    /// `topics:` (number of topics)
    Topics(Range),
    /// `license:` SPDX-like key
    License(String),
    /// `is:public` / `is:private`
    Is(Visibility),
    /// `mirror:true|false`
    Mirror(bool),
    /// `archived:true|false`
    Archived(bool),
    /// `help-wanted-issues:`
    HelpWantedIssues(Range),
    /// Any other `key:value`
    Other(String, String),
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In(target) => write!(f, "in:{target}"),
            Self::User(login) => write!(f, "user:{login}"),
            Self::Org(login) => write!(f, "org:{login}"),
            Self::Size(r) => write!(f, "size:{r}"),
            Self::Followers(r) => write!(f, "followers:{r}"),
            Self::Forks(r) => write!(f, "forks:{r}"),
            Self::Stars(r) => write!(f, "stars:{r}"),
            Self::Created(r) => write!(f, "created:{r}"),
            Self::Pushed(r) => write!(f, "pushed:{r}"),
            Self::Language(lang) => write!(f, "language:{lang}"),
            Self::Topic(topic) => write!(f, "topic:{topic}"),
            Self::Topics(r) => write!(f, "topics:{r}"),
            Self::License(key) => write!(f, "license:{key}"),
            Self::Is(Visibility::Public) => f.write_str("is:public"),
            Self::Is(Visibility::Private) => f.write_str("is:private"),
            Self::Mirror(flag) => write!(f, "mirror:{flag}"),
            Self::Archived(flag) => write!(f, "archived:{flag}"),
            Self::HelpWantedIssues(r) => write!(f, "help-wanted-issues:{r}"),
            Self::Other(key, value) => write!(f, "{key}:{value}"),
        }
    }
}

impl FromStr for Qualifier {
    type Err = Error;

    /// Parse `key:value`; unknown keys become [`Qualifier::Other`]
    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s
            .split_once(':')
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .ok_or_else(|| Error::config(format!("Invalid qualifier '{s}', expected key:value")))?;

        let flag = |v: &str| {
            v.parse::<bool>()
                .map_err(|_| Error::config(format!("Invalid {key}: value '{v}'")))
        };

        Ok(match key {
            "in" => Self::In(value.parse()?),
            "user" => Self::User(value.to_string()),
            "org" => Self::Org(value.to_string()),
            "size" => Self::Size(value.parse()?),
            "followers" => Self::Followers(value.parse()?),
            "forks" => Self::Forks(value.parse()?),
            "stars" => Self::Stars(value.parse()?),
            "created" => Self::Created(value.parse()?),
            "pushed" => Self::Pushed(value.parse()?),
            "language" => Self::Language(value.to_string()),
            "topic" => Self::Topic(value.to_string()),
            "topics" => Self::Topics(value.parse()?),
            "license" => Self::License(value.to_string()),
            "is" => Self::Is(value.parse()?),
            "mirror" => Self::Mirror(flag(value)?),
            "archived" => Self::Archived(flag(value)?),
            "help-wanted-issues" => Self::HelpWantedIssues(value.parse()?),
            _ => Self::Other(key.to_string(), value.to_string()),
        })
    }
}

/// Repository search query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
    qualifiers: Vec<Qualifier>,
    sort: Option<String>,
    order: Option<SortOrder>,
    per_page: Option<u32>,
    page: Option<u32>,
}

impl SearchQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free-text term
    #[must_use]
    pub fn term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        if !term.trim().is_empty() {
            self.terms.push(term.trim().to_string());
        }
        self
    }

    /// Add a qualifier
    #[must_use]
    pub fn qualifier(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// Restrict where terms match
    #[must_use]
    pub fn in_field(self, target: SearchIn) -> Self {
        self.qualifier(Qualifier::In(target))
    }

    /// Repositories owned by a user
    #[must_use]
    pub fn user(self, login: impl Into<String>) -> Self {
        self.qualifier(Qualifier::User(login.into()))
    }

    /// Repositories owned by an organisation
    #[must_use]
    pub fn org(self, login: impl Into<String>) -> Self {
        self.qualifier(Qualifier::Org(login.into()))
    }

    /// Filter on star count
    #[must_use]
    pub fn stars(self, range: Range) -> Self {
        self.qualifier(Qualifier::Stars(range))
    }

    /// Filter on language
    #[must_use]
    pub fn language(self, language: impl Into<String>) -> Self {
        self.qualifier(Qualifier::Language(language.into()))
    }

    /// Filter on topic
    #[must_use]
    pub fn topic(self, topic: impl Into<String>) -> Self {
        self.qualifier(Qualifier::Topic(topic.into()))
    }

    /// Sort field (`stars`, `forks`, `help-wanted-issues`, `updated`)
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    /// Results per page (GitHub caps this at 100)
    #[must_use]
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page.clamp(1, 100));
        self
    }

    /// Page to fetch (1-based)
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    /// Qualifiers in the order they were added
    pub fn qualifiers(&self) -> &[Qualifier] {
        &self.qualifiers
    }

    /// Whether the query has neither terms nor qualifiers
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.qualifiers.is_empty()
    }

    /// The `q` parameter value
    pub fn to_query_string(&self) -> String {
        self.terms
            .iter()
            .cloned()
            .chain(self.qualifiers.iter().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// All query parameters for the request
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("q".to_string(), self.to_query_string())];
        if let Some(ref sort) = self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        if let Some(order) = self.order {
            params.push(("order".to_string(), order.as_str().to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        params
    }
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
