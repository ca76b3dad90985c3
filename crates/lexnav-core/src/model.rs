//! Statute document model: Act → Chapter → Section, plus the curated
//! Quick Reference shortcut list.
//!
//! The document is immutable after load. Section `id` and `number` are
//! accepted as either JSON strings or numbers and coerced to their textual
//! form, so `302` and `"302"` are the same section number.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A loaded statute document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub acts: Vec<Act>,
    /// Quick reference lists in the order they appear in the source JSON.
    #[serde(default, deserialize_with = "quick_references_in_order")]
    pub quick_reference: Vec<QuickReference>,
}

/// A top-level statute grouping.
#[derive(Debug, Clone, Deserialize)]
pub struct Act {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub sections: Vec<Section>,
}

/// The atomic unit of statutory text.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    #[serde(deserialize_with = "text_or_number")]
    pub id: String,
    /// Display label such as "302" or "41A". Not numerically sortable.
    #[serde(deserialize_with = "text_or_number")]
    pub number: String,
    pub title: String,
    pub content: String,
}

/// Curated shortcut list for one Act.
#[derive(Debug, Clone)]
pub struct QuickReference {
    pub act_id: String,
    pub title: String,
    pub sections: Vec<QuickReferenceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickReferenceEntry {
    /// Section number, matched against [`Section::number`].
    #[serde(deserialize_with = "text_or_number")]
    pub section: String,
    pub title: String,
}

/// A Section together with its owners and tree position.
#[derive(Debug, Clone, Copy)]
pub struct SectionPath<'a> {
    pub act_index: usize,
    pub chapter_index: usize,
    pub section_index: usize,
    pub act: &'a Act,
    pub chapter: &'a Chapter,
    pub section: &'a Section,
}

/// A quick reference entry that does not resolve to any Section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub act_id: String,
    pub section: String,
}

/// Size of a loaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStats {
    pub acts: usize,
    pub chapters: usize,
    pub sections: usize,
}

impl Document {
    /// Find an Act by id.
    pub fn act(&self, act_id: &str) -> Option<&Act> {
        self.acts.iter().find(|a| a.id == act_id)
    }

    pub fn act_index(&self, act_id: &str) -> Option<usize> {
        self.acts.iter().position(|a| a.id == act_id)
    }

    /// Locate a Section by id, scanning in document order.
    pub fn locate(&self, section_id: &str) -> Option<SectionPath<'_>> {
        self.sections().find(|p| p.section.id == section_id)
    }

    /// Locate the first Section of `act_id` whose number equals `number`.
    pub fn locate_number(&self, act_id: &str, number: &str) -> Option<SectionPath<'_>> {
        let number = number.trim();
        self.sections()
            .find(|p| p.act.id == act_id && p.section.number.trim().eq_ignore_ascii_case(number))
    }

    /// Every Section in document order (Act, then Chapter, then Section).
    pub fn sections(&self) -> impl Iterator<Item = SectionPath<'_>> {
        self.acts.iter().enumerate().flat_map(|(act_index, act)| {
            act.chapters
                .iter()
                .enumerate()
                .flat_map(move |(chapter_index, chapter)| {
                    chapter
                        .sections
                        .iter()
                        .enumerate()
                        .map(move |(section_index, section)| SectionPath {
                            act_index,
                            chapter_index,
                            section_index,
                            act,
                            chapter,
                            section,
                        })
                })
        })
    }

    /// Quick reference entries with no matching Section in their Act.
    pub fn dangling_quick_references(&self) -> Vec<DanglingReference> {
        self.quick_reference
            .iter()
            .flat_map(|r| {
                r.sections
                    .iter()
                    .filter(|e| self.locate_number(&r.act_id, &e.section).is_none())
                    .map(|e| DanglingReference {
                        act_id: r.act_id.clone(),
                        section: e.section.clone(),
                    })
            })
            .collect()
    }

    /// Section ids that occur more than once, each reported once.
    pub fn duplicate_section_ids(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut dupes: Vec<String> = Vec::new();
        for path in self.sections() {
            let id = path.section.id.as_str();
            if !seen.insert(id) && !dupes.iter().any(|d| d.as_str() == id) {
                dupes.push(id.to_string());
            }
        }
        dupes
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            acts: self.acts.len(),
            chapters: self.acts.iter().map(|a| a.chapters.len()).sum(),
            sections: self.sections().count(),
        }
    }
}

// ── Deserialisation helpers ──

/// Accept `"302"`, `302` or `302.5` and keep the textual form.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Integer(i64),
        Unsigned(u64),
        Float(f64),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Integer(n) => n.to_string(),
        TextOrNumber::Unsigned(n) => n.to_string(),
        TextOrNumber::Float(f) => f.to_string(),
    })
}

#[derive(Deserialize)]
struct QuickReferenceBody {
    title: String,
    #[serde(default)]
    sections: Vec<QuickReferenceEntry>,
}

/// Deserialise the `quickReference` object keeping key order.
fn quick_references_in_order<'de, D>(deserializer: D) -> Result<Vec<QuickReference>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedReferences;

    impl<'de> Visitor<'de> for OrderedReferences {
        type Value = Vec<QuickReference>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of act id to quick reference list")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut refs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((act_id, body)) = map.next_entry::<String, QuickReferenceBody>()? {
                refs.push(QuickReference {
                    act_id,
                    title: body.title,
                    sections: body.sections,
                });
            }
            Ok(refs)
        }
    }

    deserializer.deserialize_map(OrderedReferences)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "acts": [
            {
                "id": "ipc",
                "title": "Indian Penal Code",
                "description": "The principal criminal code.",
                "chapters": [
                    {
                        "title": "Chapter I - Introduction",
                        "sections": [
                            {"id": "ipc-1", "number": 1, "title": "Short title", "content": "This Act shall be called the Indian Penal Code."},
                            {"id": "ipc-2", "number": "2", "title": "Definitions", "content": "Whoever commits theft shall be punished."}
                        ]
                    },
                    {
                        "title": "Chapter XVI - Offences affecting the human body",
                        "sections": [
                            {"id": 302, "number": "302", "title": "Punishment for murder", "content": "Whoever commits murder shall be punished with death."}
                        ]
                    }
                ]
            },
            {
                "id": "crpc",
                "title": "Code of Criminal Procedure",
                "chapters": [
                    {
                        "title": "Chapter V - Arrest of persons",
                        "sections": [
                            {"id": "crpc-41", "number": "41A", "title": "Notice of appearance", "content": "The police officer shall issue a notice."}
                        ]
                    }
                ]
            }
        ],
        "quickReference": {
            "ipc": {"title": "IPC essentials", "sections": [{"section": 302, "title": "Murder"}, {"section": "999", "title": "Missing"}]},
            "crpc": {"title": "CrPC essentials", "sections": [{"section": "41a", "title": "Notice"}]}
        }
    }"#;

    fn sample() -> Document {
        serde_json::from_str(SAMPLE).unwrap()
    }

    #[test]
    fn numeric_ids_and_numbers_become_text() {
        let doc = sample();
        let first = &doc.acts[0].chapters[0].sections[0];
        assert_eq!(first.number, "1");
        let murder = &doc.acts[0].chapters[1].sections[0];
        assert_eq!(murder.id, "302");
        assert_eq!(doc.quick_reference[0].sections[0].section, "302");
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let doc = sample();
        assert_eq!(doc.acts[1].description, "");
    }

    #[test]
    fn quick_reference_keeps_source_order() {
        let doc = sample();
        let ids: Vec<&str> = doc.quick_reference.iter().map(|r| r.act_id.as_str()).collect();
        assert_eq!(ids, vec!["ipc", "crpc"]);
        assert_eq!(doc.quick_reference[1].title, "CrPC essentials");
    }

    #[test]
    fn quick_reference_is_optional() {
        let doc: Document = serde_json::from_str(r#"{"acts": []}"#).unwrap();
        assert!(doc.quick_reference.is_empty());
    }

    #[test]
    fn sections_iterate_in_document_order() {
        let doc = sample();
        let ids: Vec<&str> = doc.sections().map(|p| p.section.id.as_str()).collect();
        assert_eq!(ids, vec!["ipc-1", "ipc-2", "302", "crpc-41"]);
    }

    #[test]
    fn locate_reports_owners_and_position() {
        let doc = sample();
        let path = doc.locate("302").unwrap();
        assert_eq!(path.act.id, "ipc");
        assert_eq!(path.chapter_index, 1);
        assert_eq!(path.section_index, 0);
        assert_eq!(path.chapter.title, "Chapter XVI - Offences affecting the human body");
        assert!(doc.locate("nope").is_none());
    }

    #[test]
    fn locate_number_is_scoped_to_act() {
        let doc = sample();
        assert!(doc.locate_number("ipc", "302").is_some());
        assert!(doc.locate_number("crpc", "302").is_none());
        assert_eq!(doc.locate_number("crpc", "41a").unwrap().section.id, "crpc-41");
    }

    #[test]
    fn dangling_quick_references_are_listed() {
        let doc = sample();
        assert_eq!(
            doc.dangling_quick_references(),
            vec![DanglingReference {
                act_id: "ipc".into(),
                section: "999".into(),
            }]
        );
    }

    #[test]
    fn duplicate_ids_reported_once() {
        let mut doc = sample();
        let dup = doc.acts[0].chapters[0].sections[0].clone();
        doc.acts[1].chapters[0].sections.push(dup.clone());
        doc.acts[1].chapters[0].sections.push(dup);
        assert_eq!(doc.duplicate_section_ids(), vec!["ipc-1".to_string()]);
        assert!(sample().duplicate_section_ids().is_empty());
    }

    #[test]
    fn stats_count_tree() {
        assert_eq!(
            sample().stats(),
            DocumentStats {
                acts: 2,
                chapters: 3,
                sections: 4,
            }
        );
    }

    #[test]
    fn act_lookup() {
        let doc = sample();
        assert_eq!(doc.act("crpc").unwrap().title, "Code of Criminal Procedure");
        assert_eq!(doc.act_index("crpc"), Some(1));
        assert!(doc.act("nope").is_none());
    }
}
