//! Flat, denormalised search index over a statute document.
//!
//! One entry per Section in document order, carrying its owners and the
//! case-folded text the query engine matches against. The index is always
//! rebuilt whole; there is no incremental update path.

use lexnav_core::Document;

use crate::snippet::fold_case;

/// Separates fields in [`IndexEntry::combined`] so a match cannot span two fields.
pub const FIELD_SEPARATOR: char = '\u{1f}';

/// One Section, flattened with back-references to its Act and Chapter.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub act_index: usize,
    pub chapter_index: usize,
    pub section_index: usize,
    pub act_id: String,
    pub act_title: String,
    pub chapter_title: String,
    pub section_id: String,
    pub number: String,
    pub title: String,
    pub content: String,
    pub(crate) number_lc: String,
    pub(crate) title_lc: String,
    pub(crate) content_lc: String,
    pub(crate) combined: String,
}

impl IndexEntry {
    /// Case-folded `number ␟ title ␟ content`.
    pub fn combined(&self) -> &str {
        &self.combined
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    /// Flatten `doc` in Act → Chapter → Section order. `doc` is not modified.
    pub fn build(doc: &Document) -> Self {
        let entries = doc
            .sections()
            .map(|path| {
                let number_lc = fold_case(path.section.number.trim());
                let title_lc = fold_case(&path.section.title);
                let content_lc = fold_case(&path.section.content);
                let combined = format!(
                    "{number_lc}{FIELD_SEPARATOR}{title_lc}{FIELD_SEPARATOR}{content_lc}"
                );
                IndexEntry {
                    act_index: path.act_index,
                    chapter_index: path.chapter_index,
                    section_index: path.section_index,
                    act_id: path.act.id.clone(),
                    act_title: path.act.title.clone(),
                    chapter_title: path.chapter.title.clone(),
                    section_id: path.section.id.clone(),
                    number: path.section.number.clone(),
                    title: path.section.title.clone(),
                    content: path.section.content.clone(),
                    number_lc,
                    title_lc,
                    content_lc,
                    combined,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::from_json_str(
            r#"{"acts": [
                {"id": "ipc", "title": "Indian Penal Code", "chapters": [
                    {"title": "Chapter I", "sections": [
                        {"id": "ipc-1", "number": 1, "title": "Short Title", "content": "This ACT"},
                        {"id": "ipc-2", "number": " 2 ", "title": "Definitions", "content": "Theft"}
                    ]},
                    {"title": "Chapter II", "sections": [
                        {"id": "ipc-3", "number": "3", "title": "Extent", "content": "India"}
                    ]}
                ]},
                {"id": "crpc", "title": "CrPC", "chapters": [
                    {"title": "Chapter V", "sections": [
                        {"id": "crpc-41", "number": "41A", "title": "Notice", "content": "Appear"}
                    ]}
                ]}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn entries_follow_document_order() {
        let index = SearchIndex::build(&doc());
        let ids: Vec<&str> = index.entries().iter().map(|e| e.section_id.as_str()).collect();
        assert_eq!(ids, vec!["ipc-1", "ipc-2", "ipc-3", "crpc-41"]);
    }

    #[test]
    fn entries_carry_owners() {
        let index = SearchIndex::build(&doc());
        let e = &index.entries()[2];
        assert_eq!(e.act_id, "ipc");
        assert_eq!(e.act_title, "Indian Penal Code");
        assert_eq!(e.chapter_title, "Chapter II");
        assert_eq!((e.act_index, e.chapter_index, e.section_index), (0, 1, 0));
    }

    #[test]
    fn combined_is_lowercase_with_separators() {
        let index = SearchIndex::build(&doc());
        assert_eq!(index.entries()[0].combined(), "1\u{1f}short title\u{1f}this act");
        assert_eq!(index.entries()[1].number_lc, "2");
        assert_eq!(index.entries()[3].number_lc, "41a");
    }

    #[test]
    fn build_is_deterministic_and_leaves_source_untouched() {
        let source = doc();
        let a = SearchIndex::build(&source);
        let b = SearchIndex::build(&source);
        let combined = |i: &SearchIndex| -> Vec<String> {
            i.entries().iter().map(|e| e.combined.clone()).collect()
        };
        assert_eq!(combined(&a), combined(&b));
        assert_eq!(source.acts[0].chapters[0].sections[0].title, "Short Title");
    }

    #[test]
    fn empty_document_gives_empty_index() {
        let index = SearchIndex::build(&Document::from_json_str(r#"{"acts": []}"#).unwrap());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
