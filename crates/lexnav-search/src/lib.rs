//! Statute search: flat index, query engine, highlighted snippets and the
//! debounced search-as-you-type session.

pub mod debounce;
pub mod index;
pub mod query;
pub mod render;
pub mod session;
pub mod snippet;

pub use debounce::Debouncer;
pub use index::{IndexEntry, SearchIndex};
pub use query::{
    ActFilter, DEBOUNCE, FieldFilter, MAX_RESULTS, QueryState, SearchConfig, SearchEngine,
    SearchOutcome,
};
pub use render::{RenderedHit, ResultsView, count_label, render_hits};
pub use session::{SearchSession, SearchSummary};
pub use snippet::{Excerpt, escape_html, excerpt, find_ci, fold_case, highlight};
