//! Result rendering: count label, per-hit HTML and the results render target.

use crate::index::IndexEntry;
use crate::query::SearchOutcome;
use crate::snippet::{escape_html, excerpt, highlight};

/// Write-only render target for the results panel.
pub trait ResultsView: Send + Sync {
    /// Show the panel with a count label and the rendered hits.
    fn show_results(&self, label: &str, hits: &[RenderedHit]);
    /// Hide the panel (cleared state).
    fn hide_results(&self);
}

/// One search hit, ready to display. `title_html` and `excerpt_html` are
/// escaped HTML; the other text fields are raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHit {
    pub act_id: String,
    pub act_title: String,
    pub chapter_title: String,
    pub section_id: String,
    pub number: String,
    pub title: String,
    pub title_html: String,
    pub excerpt_html: String,
    /// Excerpt without markup, for terminals.
    pub excerpt_text: String,
}

impl RenderedHit {
    pub fn new(entry: &IndexEntry, query: &str) -> Self {
        let window = excerpt(&entry.content, query);
        Self {
            act_id: entry.act_id.clone(),
            act_title: entry.act_title.clone(),
            chapter_title: entry.chapter_title.clone(),
            section_id: entry.section_id.clone(),
            number: entry.number.clone(),
            title: entry.title.clone(),
            title_html: highlight(&entry.title, query),
            excerpt_html: window.to_html(query),
            excerpt_text: window.to_text(),
        }
    }

    /// Markup for one `.search-result-item`.
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="search-result-item" data-act-id="{act_id}" data-section-id="{section_id}">"#,
                r#"<div class="result-header"><div class="result-act-info">"#,
                r#"<span class="result-act">{act}</span>"#,
                r#"<span class="result-chapter">{chapter}</span>"#,
                r#"</div></div>"#,
                r#"<div class="result-section">"#,
                r#"<h4>Section {number}: {title}</h4>"#,
                r#"<p class="result-content">{content}</p>"#,
                r#"</div></div>"#,
            ),
            act_id = escape_html(&self.act_id),
            section_id = escape_html(&self.section_id),
            act = escape_html(&self.act_title),
            chapter = escape_html(&self.chapter_title),
            number = escape_html(&self.number),
            title = self.title_html,
            content = self.excerpt_html,
        )
    }
}

/// Render every hit of `outcome`. Cleared outcomes render nothing.
pub fn render_hits(outcome: &SearchOutcome<'_>, query: &str) -> Vec<RenderedHit> {
    outcome
        .hits()
        .iter()
        .map(|entry| RenderedHit::new(entry, query))
        .collect()
}

/// Count label for the results panel. A capped result never claims an exact total.
pub fn count_label(shown: usize, capped: bool) -> String {
    if capped {
        format!("Search Results ({shown}+ found) - refine your search")
    } else if shown == 0 {
        "No sections found".to_string()
    } else {
        format!("Search Results ({shown} found)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SearchIndex;
    use lexnav_core::Document;

    fn index() -> SearchIndex {
        SearchIndex::build(
            &Document::from_json_str(
                r#"{"acts": [{"id": "ipc", "title": "Indian <Penal> Code", "chapters": [
                    {"title": "Chapter \"I\"", "sections": [
                        {"id": "ipc-2", "number": "2", "title": "Definitions & <b>terms</b>", "content": "Whoever commits theft"}
                    ]}
                ]}]}"#,
            )
            .unwrap(),
        )
    }

    #[test]
    fn hit_highlights_title_and_excerpt() {
        let index = index();
        let hit = RenderedHit::new(&index.entries()[0], "theft");
        assert_eq!(hit.excerpt_html, "Whoever commits <mark>theft</mark>");
        assert_eq!(hit.excerpt_text, "Whoever commits theft");
        assert_eq!(hit.title_html, "Definitions &amp; &lt;b&gt;terms&lt;/b&gt;");
    }

    #[test]
    fn markup_query_does_not_change_item_structure() {
        let index = index();
        let hit = RenderedHit::new(&index.entries()[0], "<b>");
        assert_eq!(
            hit.title_html,
            "Definitions &amp; <mark>&lt;b&gt;</mark>terms&lt;/b&gt;"
        );
        let html = hit.to_html();
        assert_eq!(html.matches("<div").count(), 4);
        assert_eq!(html.matches("<mark>").count(), 1);
        assert!(!html.contains("<b>"));
        assert!(html.contains("Indian &lt;Penal&gt; Code"));
        assert!(html.contains("Chapter &quot;I&quot;"));
        assert!(html.contains(r#"data-section-id="ipc-2""#));
    }

    #[test]
    fn every_engine_hit_is_highlighted() {
        use crate::query::{ActFilter, FieldFilter, QueryState, SearchEngine};
        use std::sync::Arc;

        let content = format!("{} ΝΟΜΟΣ τέλος", "α".repeat(400));
        let doc = Document::from_json_str(&format!(
            r#"{{"acts": [{{"id": "gr", "title": "Greek", "chapters": [
                {{"title": "A", "sections": [
                    {{"id": "gr-1", "number": "1", "title": "ΝΟΜΟΣ", "content": "{content}"}}
                ]}}
            ]}}]}}"#
        ))
        .unwrap();
        let engine = SearchEngine::new(Arc::new(doc));
        let state = QueryState::new("νομος", ActFilter::All, FieldFilter::All);
        let outcome = engine.search(&state);
        let hits = render_hits(&outcome, "νομος");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title_html, "<mark>ΝΟΜΟΣ</mark>");
        assert!(hits[0].excerpt_html.starts_with("..."));
        assert!(hits[0].excerpt_html.contains("<mark>ΝΟΜΟΣ</mark>"));
    }

    #[test]
    fn count_label_variants() {
        assert_eq!(count_label(3, false), "Search Results (3 found)");
        assert_eq!(count_label(0, false), "No sections found");
        assert_eq!(
            count_label(50, true),
            "Search Results (50+ found) - refine your search"
        );
    }
}
