//! The legal books page: one search session and one outline navigator over
//! the same document, plus the two bridges between them.

use std::sync::Arc;

use lexnav_core::QuickReference;
use lexnav_search::{QueryState, ResultsView, SearchEngine, SearchSession, SearchSummary};
use tracing::debug;

use crate::navigator::{NavTimings, Navigator, OutlineView};

pub struct Browser<R: ResultsView + 'static, O: OutlineView + 'static> {
    search: SearchSession<R>,
    navigator: Navigator<O>,
}

impl<R: ResultsView + 'static, O: OutlineView + 'static> Browser<R, O> {
    pub fn new(
        engine: Arc<SearchEngine>,
        results: Arc<R>,
        outline: Arc<O>,
        timings: NavTimings,
    ) -> Self {
        let doc = Arc::clone(engine.document());
        Self {
            search: SearchSession::new(engine, results),
            navigator: Navigator::new(doc, outline, timings),
        }
    }

    pub fn search(&mut self) -> &mut SearchSession<R> {
        &mut self.search
    }

    pub fn navigator(&self) -> &Navigator<O> {
        &self.navigator
    }

    pub fn quick_references(&self) -> &[QuickReference] {
        &self.navigator.document().quick_reference
    }

    /// A quick reference entry was clicked: search for exactly that section
    /// number within that Act, immediately.
    pub fn quick_reference_lookup(&mut self, section_number: &str, act_id: &str) -> SearchSummary {
        debug!(section_number, act_id, "quick reference lookup");
        self.search
            .search_now(QueryState::section_number(section_number, act_id))
    }

    /// A search result was clicked: hide the results and deep-link into the
    /// outline. Unknown sections leave the outline untouched.
    pub async fn open_hit(&mut self, section_id: &str) -> bool {
        self.search.hide();
        self.navigator.expand_to_section(section_id).await
    }
}
