use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identity of one indexed section. Equal iff all three fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SectionKey {
    pub title: String,
    /// In-page anchor such as `#install`, empty for the page's own entry.
    pub anchor: String,
    /// Document path relative to the corpus root.
    pub document_url: String,
}

impl SectionKey {
    pub fn new(title: impl Into<String>, anchor: impl Into<String>, document_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            anchor: anchor.into(),
            document_url: document_url.into(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.document_url, self.anchor)
    }
}

/// Output record, one per distinct [`SectionKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Section text blocks keyed by section identity.
///
/// Keys keep their first-discovery order, so flattening is deterministic.
#[derive(Debug, Default)]
pub struct SectionIndex {
    slots: HashMap<SectionKey, usize>,
    sections: Vec<(SectionKey, Vec<String>)>,
}

impl SectionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block list for `key`, created empty on first sight.
    pub fn get_or_create(&mut self, key: &SectionKey) -> &mut Vec<String> {
        let slot = match self.slots.get(key) {
            Some(&slot) => slot,
            None => {
                let slot = self.sections.len();
                self.slots.insert(key.clone(), slot);
                self.sections.push((key.clone(), Vec::new()));
                slot
            }
        };
        &mut self.sections[slot].1
    }

    pub fn push_block(&mut self, key: &SectionKey, block: String) {
        self.get_or_create(key).push(block);
    }

    pub fn blocks(&self, key: &SectionKey) -> Option<&[String]> {
        self.slots
            .get(key)
            .map(|&slot| self.sections[slot].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|(_, blocks)| blocks.len()).sum()
    }

    /// Flatten into output records: `url = document_url + anchor`,
    /// `content` = blocks joined by a single space.
    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.sections
            .into_iter()
            .map(|(key, blocks)| IndexEntry {
                url: key.url(),
                title: key.title,
                content: blocks.join(" "),
            })
            .collect()
    }
}

// ── Tests ──
