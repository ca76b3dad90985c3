//! Tabbed outline navigation: which Act tab is active, which chapters are
//! expanded, and the transient highlight on a deep-linked section.
//!
//! Unknown act or section ids are silent no-ops. Every state change is
//! written to an [`OutlineView`]; the navigator never reads view state back.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lexnav_core::Document;
use tracing::debug;

/// Write-only render target for the outline.
pub trait OutlineView: Send + Sync {
    fn set_tab_active(&self, act_id: &str, active: bool);
    fn set_chapter_expanded(&self, act_id: &str, chapter_index: usize, expanded: bool);
    fn scroll_to_section(&self, section_id: &str);
    fn set_section_highlighted(&self, section_id: &str, highlighted: bool);
}

/// Fixed delays used by [`Navigator::expand_to_section`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTimings {
    /// Wait after switching tabs before touching the chapter.
    pub tab_settle: Duration,
    /// Wait after expanding the chapter before scrolling.
    pub expand_settle: Duration,
    /// How long the section highlight stays on.
    pub highlight: Duration,
}

impl Default for NavTimings {
    fn default() -> Self {
        Self {
            tab_settle: Duration::from_millis(100),
            expand_settle: Duration::from_millis(300),
            highlight: Duration::from_millis(3000),
        }
    }
}

impl NavTimings {
    /// No settle delays; for renderers without animations.
    pub fn immediate() -> Self {
        Self {
            tab_settle: Duration::ZERO,
            expand_settle: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Current outline state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutlineState {
    active_act: Option<String>,
    /// (act index, chapter index)
    expanded: BTreeSet<(usize, usize)>,
    highlighted: Option<String>,
}

impl OutlineState {
    pub fn active_act(&self) -> Option<&str> {
        self.active_act.as_deref()
    }

    pub fn is_expanded(&self, act_index: usize, chapter_index: usize) -> bool {
        self.expanded.contains(&(act_index, chapter_index))
    }

    pub fn expanded(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.expanded.iter().copied()
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }
}

struct Inner<V> {
    doc: Arc<Document>,
    view: Arc<V>,
    timings: NavTimings,
    state: Mutex<OutlineState>,
    /// Bumped on every highlight so an older clear timer leaves a newer highlight alone.
    /// Only touched while `state` is locked.
    highlight_seq: AtomicU64,
}

impl<V> Inner<V> {
    fn state(&self) -> MutexGuard<'_, OutlineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Outline navigator over one document. Cheap to clone.
pub struct Navigator<V: OutlineView + 'static> {
    inner: Arc<Inner<V>>,
}

impl<V: OutlineView + 'static> Clone for Navigator<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: OutlineView + 'static> Navigator<V> {
    /// The first Act's tab starts active; all chapters start collapsed.
    pub fn new(doc: Arc<Document>, view: Arc<V>, timings: NavTimings) -> Self {
        let active_act = doc.acts.first().map(|a| a.id.clone());
        if let Some(id) = &active_act {
            view.set_tab_active(id, true);
        }
        Self {
            inner: Arc::new(Inner {
                doc,
                view,
                timings,
                state: Mutex::new(OutlineState {
                    active_act,
                    ..OutlineState::default()
                }),
                highlight_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.inner.doc
    }

    pub fn state(&self) -> OutlineState {
        self.inner.state().clone()
    }

    /// Activate the tab for `act_id`. Returns false (and changes nothing) for
    /// an unknown id.
    pub fn switch_tab(&self, act_id: &str) -> bool {
        if self.inner.doc.act(act_id).is_none() {
            debug!(act_id, "switch_tab: unknown act");
            return false;
        }
        let mut state = self.inner.state();
        for act in &self.inner.doc.acts {
            self.inner.view.set_tab_active(&act.id, false);
        }
        self.inner.view.set_tab_active(act_id, true);
        state.active_act = Some(act_id.to_string());
        true
    }

    /// Flip a chapter open or closed, as a header click does. Returns the
    /// new expanded flag, or `None` for an unknown chapter.
    pub fn toggle_chapter(&self, act_id: &str, chapter_index: usize) -> Option<bool> {
        let act_index = self.inner.doc.act_index(act_id)?;
        if chapter_index >= self.inner.doc.acts[act_index].chapters.len() {
            return None;
        }
        let mut state = self.inner.state();
        let key = (act_index, chapter_index);
        let expanded = if state.expanded.remove(&key) {
            false
        } else {
            state.expanded.insert(key);
            true
        };
        self.inner
            .view
            .set_chapter_expanded(act_id, chapter_index, expanded);
        Some(expanded)
    }

    /// Deep-link to a section: activate its Act's tab, expand its chapter if
    /// collapsed, scroll to it and highlight it for [`NavTimings::highlight`].
    ///
    /// Returns false for an unknown section id, which is otherwise a no-op.
    pub async fn expand_to_section(&self, section_id: &str) -> bool {
        let Some(path) = self.inner.doc.locate(section_id) else {
            debug!(section_id, "expand_to_section: unknown section");
            return false;
        };
        let act_id = path.act.id.clone();
        let key = (path.act_index, path.chapter_index);

        self.switch_tab(&act_id);
        tokio::time::sleep(self.inner.timings.tab_settle).await;

        {
            let mut state = self.inner.state();
            if state.expanded.insert(key) {
                self.inner.view.set_chapter_expanded(&act_id, key.1, true);
            }
        }
        tokio::time::sleep(self.inner.timings.expand_settle).await;

        self.inner.view.scroll_to_section(section_id);
        self.highlight(section_id);
        debug!(section_id, act_id = %act_id, "navigated to section");
        true
    }

    fn highlight(&self, section_id: &str) {
        let seq = {
            let mut state = self.inner.state();
            match state.highlighted.take() {
                Some(previous) if previous != section_id => {
                    self.inner.view.set_section_highlighted(&previous, false);
                }
                _ => {}
            }
            state.highlighted = Some(section_id.to_string());
            self.inner.view.set_section_highlighted(section_id, true);
            self.inner.highlight_seq.fetch_add(1, Ordering::SeqCst) + 1
        };

        let inner = Arc::clone(&self.inner);
        let section_id = section_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(inner.timings.highlight).await;
            let mut state = inner.state();
            if inner.highlight_seq.load(Ordering::SeqCst) == seq {
                state.highlighted = None;
                inner.view.set_section_highlighted(&section_id, false);
            }
        });
    }
}
