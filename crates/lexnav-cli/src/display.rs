//! Terminal rendering for statute search results and outlines.
//!
//! Plain text only: matches are bracketed instead of wrapped in `<mark>`.

use std::sync::{Arc, Mutex};

use lexnav_core::{Document, SectionPath};
use lexnav_outline::{OutlineState, OutlineView};
use lexnav_search::{RenderedHit, ResultsView, find_ci};

const TITLE_WIDTH: usize = 8;

// ── Public API ──

/// Print a results panel: count label, then one card per hit.
pub fn print_results(label: &str, hits: &[RenderedHit], query: &str) {
    println!("=== {label} ===");
    for (i, hit) in hits.iter().enumerate() {
        println!();
        println!("[{}] {} › {}", i + 1, hit.act_title, hit.chapter_title);
        println!("    Section {}: {}", hit.number, bracket_match(&hit.title, query));
        if !hit.excerpt_text.is_empty() {
            println!("      {}", bracket_match(&hit.excerpt_text, query));
        }
    }
}

/// Print one Act (or all) as a chapter/section outline. Expanded chapters
/// list their sections; with no state every chapter is expanded.
pub fn print_outline(doc: &Document, act_id: Option<&str>, state: Option<&OutlineState>) {
    for (act_index, act) in doc.acts.iter().enumerate() {
        if act_id.is_some_and(|id| id != act.id) {
            continue;
        }
        let marker = match state.and_then(|s| s.active_act()) {
            Some(active) if active == act.id => " (active)",
            _ => "",
        };
        println!("=== {} [{}]{marker} ===", act.title, act.id);
        if !act.description.is_empty() {
            println!("{}", act.description);
        }
        println!();

        for (chapter_index, chapter) in act.chapters.iter().enumerate() {
            let expanded = state.is_none_or(|s| s.is_expanded(act_index, chapter_index));
            println!("{} {}", if expanded { "▾" } else { "▸" }, chapter.title);
            if !expanded {
                continue;
            }
            for section in &chapter.sections {
                let highlighted = state.and_then(|s| s.highlighted()) == Some(section.id.as_str());
                println!(
                    "  {}{:<TITLE_WIDTH$} {}",
                    if highlighted { "→ " } else { "" },
                    section.number,
                    section.title
                );
            }
        }
        println!();
    }
}

pub fn print_quick_reference(doc: &Document) {
    if doc.quick_reference.is_empty() {
        println!("No quick reference entries.");
        return;
    }
    for reference in &doc.quick_reference {
        println!("{} [{}]", reference.title, reference.act_id);
        for entry in &reference.sections {
            println!("  • Section {:<TITLE_WIDTH$} {}", entry.section, entry.title);
        }
        println!();
    }
}

/// Print a full section with its owners.
pub fn print_section_card(path: &SectionPath<'_>) {
    println!("=== Section {}: {} ===", path.section.number, path.section.title);
    println!("  {:<10} {} [{}]", "act", path.act.title, path.act.id);
    println!("  {:<10} {}", "chapter", path.chapter.title);
    println!("  {:<10} {}", "id", path.section.id);
    println!();
    println!("{}", path.section.content);
}

// ── Render targets ──

/// Results panel that prints to stdout.
#[derive(Default)]
pub struct TerminalResults {
    query: Mutex<String>,
}

impl TerminalResults {
    /// Query used to bracket matches in subsequent output.
    pub fn set_query(&self, query: &str) {
        if let Ok(mut q) = self.query.lock() {
            *q = query.to_string();
        }
    }
}

impl ResultsView for TerminalResults {
    fn show_results(&self, label: &str, hits: &[RenderedHit]) {
        let query = self.query.lock().map(|q| q.clone()).unwrap_or_default();
        print_results(label, hits, &query);
    }

    fn hide_results(&self) {}
}

/// Outline target that prints the section it is asked to scroll to.
pub struct TerminalOutline {
    doc: Arc<Document>,
}

impl TerminalOutline {
    pub fn new(doc: Arc<Document>) -> Self {
        Self { doc }
    }
}

impl OutlineView for TerminalOutline {
    fn set_tab_active(&self, act_id: &str, active: bool) {
        tracing::debug!(act_id, active, "tab");
    }

    fn set_chapter_expanded(&self, act_id: &str, chapter_index: usize, expanded: bool) {
        tracing::debug!(act_id, chapter_index, expanded, "chapter");
    }

    fn scroll_to_section(&self, section_id: &str) {
        if let Some(path) = self.doc.locate(section_id) {
            print_section_card(&path);
        }
    }

    fn set_section_highlighted(&self, section_id: &str, highlighted: bool) {
        tracing::debug!(section_id, highlighted, "highlight");
    }
}

// ── Helpers ──

/// Wrap the first case-insensitive match of `query` in `[` `]`.
fn bracket_match(text: &str, query: &str) -> String {
    match find_ci(text, query.trim()) {
        Some(r) => format!("{}[{}]{}", &text[..r.start], &text[r.clone()], &text[r.end..]),
        None => text.to_string(),
    }
}
