//! HTML for the tabbed outline and the quick reference grid.
//!
//! All document text is escaped. Class names follow the portal stylesheet
//! (`tab-content`, `chapter-card`, `section-item`, ...).

use lexnav_core::{Act, Document};
use lexnav_search::escape_html;

use crate::navigator::OutlineState;

/// Tab buttons, one per Act, carrying `data-tab` for [`switch_tab`](crate::Navigator::switch_tab).
pub fn render_tab_bar(doc: &Document, state: &OutlineState) -> String {
    let mut out = String::from(r#"<div class="tab-buttons">"#);
    for act in &doc.acts {
        let active = if state.active_act() == Some(act.id.as_str()) {
            " active"
        } else {
            ""
        };
        out.push_str(&format!(
            r#"<button class="tab-btn{active}" data-tab="{id}">{title}</button>"#,
            id = escape_html(&act.id),
            title = escape_html(&act.title),
        ));
    }
    out.push_str("</div>");
    out
}

/// One panel per Act, reflecting active tab, expanded chapters and highlight.
pub fn render_outline_html(doc: &Document, state: &OutlineState) -> String {
    let mut out = String::new();
    for (act_index, act) in doc.acts.iter().enumerate() {
        render_act(&mut out, act_index, act, state);
    }
    out
}

fn render_act(out: &mut String, act_index: usize, act: &Act, state: &OutlineState) {
    let active = if state.active_act() == Some(act.id.as_str()) {
        " active"
    } else {
        ""
    };
    out.push_str(&format!(
        r#"<div class="tab-content{active}" id="{id}-tab">"#,
        id = escape_html(&act.id),
    ));
    out.push_str(&format!(
        r#"<div class="card mb-4"><div class="card-header"><h2>{}</h2><p>{}</p></div></div>"#,
        escape_html(&act.title),
        escape_html(&act.description),
    ));
    out.push_str(r#"<div class="chapters-list">"#);

    for (chapter_index, chapter) in act.chapters.iter().enumerate() {
        let expanded = state.is_expanded(act_index, chapter_index);
        let (show, chevron) = if expanded {
            (" show", "fa-chevron-down")
        } else {
            ("", "fa-chevron-right")
        };
        out.push_str(r#"<div class="chapter-card">"#);
        out.push_str(&format!(
            r#"<div class="chapter-header collapsible" data-chapter="{chapter_index}"><h3>{}</h3><i class="fas {chevron}"></i></div>"#,
            escape_html(&chapter.title),
        ));
        out.push_str(&format!(r#"<div class="chapter-content{show}">"#));
        for section in &chapter.sections {
            let highlighted = if state.highlighted() == Some(section.id.as_str()) {
                " highlighted"
            } else {
                ""
            };
            out.push_str(&format!(
                r#"<div class="section-item{highlighted}" data-section-id="{}"><h4>Section {}: {}</h4><p>{}</p></div>"#,
                escape_html(&section.id),
                escape_html(&section.number),
                escape_html(&section.title),
                escape_html(&section.content),
            ));
        }
        out.push_str("</div></div>");
    }

    out.push_str("</div></div>");
}

/// Quick reference cards. Each entry carries `data-act-id` and
/// `data-section` so a click maps straight to
/// [`Browser::quick_reference_lookup`](crate::Browser::quick_reference_lookup).
pub fn render_quick_reference_html(doc: &Document) -> String {
    let mut out = String::new();
    for reference in &doc.quick_reference {
        let act_id = escape_html(&reference.act_id);
        out.push_str(&format!(
            r#"<div class="quick-reference-item" data-act-id="{act_id}"><h4>{}</h4><ul>"#,
            escape_html(&reference.title),
        ));
        for entry in &reference.sections {
            out.push_str(&format!(
                r#"<li data-act-id="{act_id}" data-section="{number}">• Section {number}: {title}</li>"#,
                number = escape_html(&entry.section),
                title = escape_html(&entry.title),
            ));
        }
        out.push_str("</ul></div>");
    }
    out
}
