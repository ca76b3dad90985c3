//! Interactive search session: query state, filter controls and the
//! debounced search-as-you-type path, rendering into a [`ResultsView`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::debounce::Debouncer;
use crate::query::{ActFilter, FieldFilter, QueryState, SearchEngine, SearchOutcome};
use crate::render::{RenderedHit, ResultsView, count_label, render_hits};

/// What the last executed search showed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchSummary {
    /// Empty query; the panel is hidden.
    #[default]
    Cleared,
    Shown {
        hits: Vec<RenderedHit>,
        capped: bool,
    },
}

impl SearchSummary {
    pub fn hits(&self) -> &[RenderedHit] {
        match self {
            Self::Cleared => &[],
            Self::Shown { hits, .. } => hits,
        }
    }
}

/// Shared pieces a scheduled search needs after the caller has moved on.
struct Shared<V> {
    engine: Arc<SearchEngine>,
    state: Mutex<QueryState>,
    last: Mutex<SearchSummary>,
    view: Arc<V>,
    /// Bumped on every state change so a debounced search that already
    /// started cannot render after a newer change. Only touched while
    /// `state` is locked.
    generation: AtomicU64,
}

impl<V: ResultsView> Shared<V> {
    fn state(&self) -> MutexGuard<'_, QueryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn last(&self) -> MutexGuard<'_, SearchSummary> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Debounced path: render only if nothing changed since scheduling.
    fn execute_scheduled(&self, generation: u64) {
        let state = self.state();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("superseded debounced search dropped");
            return;
        }
        self.render(&state);
    }

    /// Run `state` and push the outcome to the view. Callers hold the state
    /// lock so renders never interleave with a state change.
    fn render(&self, state: &QueryState) -> SearchSummary {
        let summary = match self.engine.search(state) {
            SearchOutcome::Cleared => {
                self.view.hide_results();
                SearchSummary::Cleared
            }
            outcome @ SearchOutcome::Matches { .. } => {
                let capped = outcome.is_capped();
                let hits = render_hits(&outcome, &state.query);
                self.view.show_results(&count_label(hits.len(), capped), &hits);
                SearchSummary::Shown { hits, capped }
            }
        };
        *self.last() = summary.clone();
        summary
    }
}

/// One user's search interaction. Needs a tokio runtime for the debounced path.
pub struct SearchSession<V: ResultsView + 'static> {
    shared: Arc<Shared<V>>,
    debouncer: Debouncer,
}

impl<V: ResultsView + 'static> SearchSession<V> {
    pub fn new(engine: Arc<SearchEngine>, view: Arc<V>) -> Self {
        let debounce = engine.config().debounce;
        Self {
            shared: Arc::new(Shared {
                engine,
                state: Mutex::new(QueryState::default()),
                last: Mutex::new(SearchSummary::Cleared),
                view,
                generation: AtomicU64::new(0),
            }),
            debouncer: Debouncer::new(debounce),
        }
    }

    pub fn state(&self) -> QueryState {
        self.shared.state().clone()
    }

    /// What the most recent search (immediate or debounced) showed.
    pub fn last_summary(&self) -> SearchSummary {
        self.shared.last().clone()
    }

    /// The text input changed. Any pending search is cancelled and a new one
    /// is scheduled after the quiet period; an empty input clears instead.
    pub fn input(&mut self, text: &str) {
        let generation = {
            let mut state = self.shared.state();
            state.query = text.to_string();
            self.shared.bump()
        };
        let shared = Arc::clone(&self.shared);
        self.debouncer.schedule(async move {
            debug!("debounced search firing");
            shared.execute_scheduled(generation);
        });
    }

    /// Enter key or search button: run now.
    pub fn submit(&mut self) -> SearchSummary {
        self.debouncer.cancel();
        let state = self.shared.state();
        self.shared.bump();
        self.shared.render(&state)
    }

    /// Act selector changed. Re-runs when a query is present.
    pub fn set_act_filter(&mut self, act: ActFilter) -> Option<SearchSummary> {
        self.shared.state().act = act;
        self.rerun_if_active()
    }

    /// Field selector changed. Re-runs when a query is present.
    pub fn set_field_filter(&mut self, field: FieldFilter) -> Option<SearchSummary> {
        self.shared.state().field = field;
        self.rerun_if_active()
    }

    /// Replace the whole query state and run immediately.
    pub fn search_now(&mut self, state: QueryState) -> SearchSummary {
        *self.shared.state() = state;
        self.submit()
    }

    /// Clear trigger: empty the query and hide the results.
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        let mut state = self.shared.state();
        self.shared.bump();
        state.query.clear();
        *self.shared.last() = SearchSummary::Cleared;
        self.shared.view.hide_results();
    }

    /// Hide the results panel but keep the query, e.g. after opening a hit.
    pub fn hide(&self) {
        self.shared.view.hide_results();
    }

    pub fn has_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn rerun_if_active(&mut self) -> Option<SearchSummary> {
        if self.shared.state().is_blank() {
            return None;
        }
        Some(self.submit())
    }
}
