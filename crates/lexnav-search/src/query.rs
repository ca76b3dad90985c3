//! Query engine: case-insensitive substring search with Act and field filters.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use lexnav_core::Document;
use tracing::debug;

use crate::index::{IndexEntry, SearchIndex};
use crate::snippet::fold_case;

/// Default cap on entries returned for rendering.
pub const MAX_RESULTS: usize = 50;
/// Default quiet period before search-as-you-type runs.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Search tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_results: usize,
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULTS,
            debounce: DEBOUNCE,
        }
    }
}

/// Which part of a Section a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldFilter {
    /// Section number, compared as text for equality.
    Number,
    Title,
    Content,
    #[default]
    All,
}

impl FieldFilter {
    /// `query` must already be trimmed and case-folded.
    fn matches(self, entry: &IndexEntry, query: &str) -> bool {
        match self {
            Self::Number => entry.number_lc == query,
            Self::Title => entry.title_lc.contains(query),
            Self::Content => entry.content_lc.contains(query),
            Self::All => entry.combined.contains(query),
        }
    }
}

impl FromStr for FieldFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "section" | "number" => Ok(Self::Number),
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            "all" | "" => Ok(Self::All),
            other => Err(format!(
                "unknown field filter '{other}' (expected section, title, content or all)"
            )),
        }
    }
}

impl fmt::Display for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Number => "section",
            Self::Title => "title",
            Self::Content => "content",
            Self::All => "all",
        })
    }
}

/// Restricts candidates to one Act, or none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActFilter {
    #[default]
    All,
    Act(String),
}

impl ActFilter {
    fn admits(&self, entry: &IndexEntry) -> bool {
        match self {
            Self::All => true,
            Self::Act(id) => entry.act_id == *id,
        }
    }
}

impl From<&str> for ActFilter {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Act(s.to_string())
        }
    }
}

impl fmt::Display for ActFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Act(id) => f.write_str(id),
        }
    }
}

/// Raw query text plus the two filter selections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryState {
    pub query: String,
    pub act: ActFilter,
    pub field: FieldFilter,
}

impl QueryState {
    pub fn new(query: impl Into<String>, act: ActFilter, field: FieldFilter) -> Self {
        Self {
            query: query.into(),
            act,
            field,
        }
    }

    /// Target one exact section number inside one Act.
    pub fn section_number(number: &str, act_id: &str) -> Self {
        Self::new(number, ActFilter::from(act_id), FieldFilter::Number)
    }

    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// Result of running a query.
#[derive(Debug)]
pub enum SearchOutcome<'a> {
    /// The query was empty: results should be hidden.
    Cleared,
    /// Up to the cap, in document order. `capped` is set when more matched.
    Matches {
        hits: Vec<&'a IndexEntry>,
        capped: bool,
    },
}

impl SearchOutcome<'_> {
    pub fn hits(&self) -> &[&IndexEntry] {
        match self {
            Self::Cleared => &[],
            Self::Matches { hits, .. } => hits,
        }
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, Self::Cleared)
    }

    pub fn is_capped(&self) -> bool {
        matches!(self, Self::Matches { capped: true, .. })
    }
}

/// An immutable document handle plus the index derived from it.
pub struct SearchEngine {
    doc: Arc<Document>,
    index: SearchIndex,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(doc: Arc<Document>) -> Self {
        Self::with_config(doc, SearchConfig::default())
    }

    pub fn with_config(doc: Arc<Document>, config: SearchConfig) -> Self {
        let index = SearchIndex::build(&doc);
        debug!(entries = index.len(), "built search index");
        Self { doc, index, config }
    }

    /// Swap in a new document, discarding and rebuilding the whole index.
    pub fn reload(&mut self, doc: Arc<Document>) {
        self.index = SearchIndex::build(&doc);
        self.doc = doc;
        debug!(entries = self.index.len(), "rebuilt search index");
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.doc
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run `state` against the index.
    pub fn search(&self, state: &QueryState) -> SearchOutcome<'_> {
        let query = fold_case(state.query.trim());
        if query.is_empty() {
            return SearchOutcome::Cleared;
        }

        let cap = self.config.max_results;
        let mut hits = Vec::new();
        let mut capped = false;
        for entry in self
            .index
            .entries()
            .iter()
            .filter(|e| state.act.admits(e) && state.field.matches(e, &query))
        {
            if hits.len() == cap {
                capped = true;
                break;
            }
            hits.push(entry);
        }

        debug!(
            query = %query,
            act = %state.act,
            field = %state.field,
            hits = hits.len(),
            capped,
            "search"
        );
        SearchOutcome::Matches { hits, capped }
    }
}
