//! Outline navigation for the legal books page: tabs, chapter expansion,
//! deep links, and the bridge from search results and quick references.

mod browser;
pub mod html;
pub mod navigator;

pub use browser::Browser;
pub use html::{render_outline_html, render_quick_reference_html, render_tab_bar};
pub use navigator::{NavTimings, Navigator, OutlineState, OutlineView};
