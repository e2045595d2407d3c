use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

static SECTION_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^sect(\d+)$").unwrap());

pub const CONTENT_ROOT_ID: &str = "content";
/// Class carried by the page's top-level heading, directly under the content root.
pub const TOP_LEVEL_CLASS: &str = "sect0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Paragraph,
    List,
    Table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    ContentRoot,
    SectionBoundary(u32),
    TextLeaf(LeafKind),
    Structural,
}

pub fn classify(element: ElementRef<'_>) -> NodeKind {
    let el = element.value();
    if el.id() == Some(CONTENT_ROOT_ID) {
        return NodeKind::ContentRoot;
    }

    if let Some(level) = el.classes().filter_map(section_level).max() {
        return NodeKind::SectionBoundary(level);
    }

    for class in el.classes() {
        let kind = match class {
            "paragraph" => LeafKind::Paragraph,
            "ulist" | "olist" => LeafKind::List,
            "tableblock" => LeafKind::Table,
            _ => continue,
        };
        return NodeKind::TextLeaf(kind);
    }

    NodeKind::Structural
}

/// Nesting level of a `sectN` class. `sect0` and `sectionbody` are not boundaries.
fn section_level(class: &str) -> Option<u32> {
    let caps = SECTION_CLASS_RE.captures(class)?;
    caps[1].parse().ok().filter(|&level| level >= 1)
}

pub fn is_top_level(element: ElementRef<'_>) -> bool {
    element.value().classes().any(|class| class == TOP_LEVEL_CLASS)
}

// ── Tests ──
