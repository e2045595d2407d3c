use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::classify::{classify, is_top_level, NodeKind, CONTENT_ROOT_ID};
use super::text::{is_heading, visible_text};
use crate::index::{SectionIndex, SectionKey};

static CONTENT_ROOT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(&format!("#{CONTENT_ROOT_ID}")).unwrap());
static PAGE_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("head > title").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.anchor").unwrap());

pub const UNKNOWN_TITLE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOutcome {
    /// `sections` counts keys first seen in this document (root included).
    Indexed { sections: usize, blocks: usize },
    MissingContentRoot,
}

/// Walk a sanitized document and attribute its text blocks to sections.
pub fn scope_document(document: &Html, document_url: &str, index: &mut SectionIndex) -> ScopeOutcome {
    let Some(content) = document.root_element().select(&CONTENT_ROOT).next() else {
        return ScopeOutcome::MissingContentRoot;
    };

    let sections_before = index.len();
    let blocks_before = index.block_count();

    let root = SectionKey::new(page_title(document), "", document_url);
    index.get_or_create(&root);
    scope(content, &root, document_url, index);

    ScopeOutcome::Indexed {
        sections: index.len() - sections_before,
        blocks: index.block_count() - blocks_before,
    }
}

pub fn page_title(document: &Html) -> String {
    document
        .root_element()
        .select(&PAGE_TITLE)
        .next()
        .map(visible_text)
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Depth-first walk under `context`, the section currently receiving text.
fn scope(element: ElementRef<'_>, context: &SectionKey, document_url: &str, index: &mut SectionIndex) {
    let owned;
    let mut context = context;

    match classify(element) {
        NodeKind::ContentRoot => {
            // The top-level heading sits directly under the root instead of
            // leading its own section container.
            if let Some(heading) = element_children(element).find(|child| is_top_level(*child)) {
                if let Some(key) = section_key(Some(heading), document_url) {
                    index.get_or_create(&key);
                    owned = key;
                    context = &owned;
                }
            }
        }
        NodeKind::SectionBoundary(level) => {
            match section_key(element_children(element).next(), document_url) {
                Some(key) => {
                    index.get_or_create(&key);
                    owned = key;
                    context = &owned;
                }
                None => debug!(level, url = document_url, "section boundary without heading, keeping context"),
            }
        }
        NodeKind::TextLeaf(_) => {
            index.push_block(context, visible_text(element));
            return;
        }
        NodeKind::Structural => {}
    }

    for child in element_children(element) {
        scope(child, context, document_url, index);
    }
}

/// Key for a candidate heading element, `None` unless it is an `h1`..`h6`.
pub fn section_key(heading: Option<ElementRef<'_>>, document_url: &str) -> Option<SectionKey> {
    let heading = heading.filter(|el| is_heading(*el))?;
    let anchor = heading
        .select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or_default();
    Some(SectionKey::new(visible_text(heading), anchor, document_url))
}

fn element_children(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element.children().filter_map(ElementRef::wrap)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use crate::parser::sanitize::sanitize;

    fn index_of(html: &str, url: &str) -> (SectionIndex, ScopeOutcome) {
        let mut doc = Html::parse_document(html);
        sanitize(&mut doc);
        let mut index = SectionIndex::new();
        let outcome = scope_document(&doc, url, &mut index);
        (index, outcome)
    }

    fn find<'a>(entries: &'a [IndexEntry], title: &str) -> &'a IndexEntry {
        entries
            .iter()
            .find(|e| e.title == title)
            .unwrap_or_else(|| panic!("no entry titled {title:?} in {entries:?}"))
    }

    fn entry(title: &str, url: &str, content: &str) -> IndexEntry {
        IndexEntry {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }

    #[test]
    fn intro_and_details() {
        let html = r##"<html><head><title>Test Page</title></head><body>
<div id="content">
  <h1 class="sect0"><a class="anchor" href="#intro"></a>Intro</h1>
  <div class="paragraph"><p>Hello</p></div>
  <div class="sect1">
    <h2><a class="anchor" href="#details"></a>Details</h2>
    <div class="sectionbody"><div class="paragraph"><p>World</p></div></div>
  </div>
</div></body></html>"##;
        let (index, outcome) = index_of(html, "doc.html");
        assert_eq!(outcome, ScopeOutcome::Indexed { sections: 3, blocks: 2 });
        assert_eq!(
            index.into_entries(),
            vec![
                entry("Test Page", "doc.html", ""),
                entry("Intro", "doc.html#intro", "Hello"),
                entry("Details", "doc.html#details", "World"),
            ]
        );
    }

    #[test]
    fn asciidoc_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/flavors.html").unwrap();
        let (index, _) = index_of(&html, "test.html");
        let entries = index.into_entries();
        assert_eq!(entries.len(), 5);

        let main = find(&entries, "Test WildFly Documentation");
        assert_eq!(main.url, "test.html");
        assert!(main.content.is_empty());

        let s0 = find(&entries, "Different flavors of WildFly");
        assert_eq!(s0.url, "test.html#section0");
        assert_eq!(s0.content, "Open Block Paragraph One Open Block Paragraph Two");

        let s1 = find(&entries, "1. Title");
        assert_eq!(s1.url, "test.html#section1");
        assert_eq!(s1.content, "Section 1 Paragraph One Section 1 Paragraph two");

        let s2 = find(&entries, "1.1. Title");
        assert_eq!(s2.url, "test.html#section2");
        assert_eq!(s2.content, "Section 1.1 Paragraph");

        let s3 = find(&entries, "1.1.1. Title");
        assert_eq!(s3.url, "test.html#section3");
        assert_eq!(s3.content, "Section 1.1.1 Paragraph");
    }

    #[test]
    fn text_before_any_boundary_goes_to_page_entry() {
        let html = r##"<html><head><title>Page</title></head><body><div id="content">
<div class="paragraph"><p>Preamble</p></div>
<div class="sect1"><h2><a class="anchor" href="#a"></a>A</h2><div class="paragraph"><p>In A</p></div></div>
</div></body></html>"##;
        let (index, _) = index_of(html, "p.html");
        let entries = index.into_entries();
        assert_eq!(find(&entries, "Page").content, "Preamble");
        assert_eq!(find(&entries, "A").content, "In A");
    }

    #[test]
    fn boundary_without_heading_keeps_context() {
        let html = r##"<html><head><title>Page</title></head><body><div id="content">
<div class="sect1"><h2><a class="anchor" href="#a"></a>A</h2>
  <div class="paragraph"><p>first</p></div>
  <div class="sect2"><div class="title">Not a heading</div>
    <div class="paragraph"><p>second</p></div>
  </div>
</div></div></body></html>"##;
        let (index, outcome) = index_of(html, "p.html");
        assert_eq!(outcome, ScopeOutcome::Indexed { sections: 2, blocks: 2 });
        let entries = index.into_entries();
        assert_eq!(find(&entries, "A").content, "first second");
        assert!(entries.iter().all(|e| e.title != "Not a heading"));
    }

    #[test]
    fn leaves_are_not_recursed() {
        let html = r##"<html><head><title>Page</title></head><body><div id="content">
<div class="ulist"><ul>
  <li><div class="paragraph"><p>one</p></div></li>
  <li><div class="sect2"><h3><a class="anchor" href="#hidden"></a>Hidden</h3><p>two</p></div></li>
</ul></div>
</div></body></html>"##;
        let (index, outcome) = index_of(html, "p.html");
        assert_eq!(outcome, ScopeOutcome::Indexed { sections: 1, blocks: 1 });
        let entries = index.into_entries();
        assert_eq!(entries, vec![entry("Page", "p.html", "one Hidden two")]);
    }

    #[test]
    fn repeated_heading_accumulates_into_one_entry() {
        let html = r##"<html><head><title>Page</title></head><body><div id="content">
<div class="sect1"><h2><a class="anchor" href="#dup"></a>Dup</h2><div class="paragraph"><p>a</p></div></div>
<div class="sect1"><h2><a class="anchor" href="#dup"></a>Dup</h2><div class="paragraph"><p>b</p></div></div>
</div></body></html>"##;
        let (index, _) = index_of(html, "p.html");
        let entries = index.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(find(&entries, "Dup").content, "a b");
    }

    #[test]
    fn same_titles_in_two_documents_stay_apart() {
        let html = r##"<html><head><title>Guide</title></head><body><div id="content">
<div class="sect1"><h2><a class="anchor" href="#setup"></a>Setup</h2><div class="paragraph"><p>x</p></div></div>
</div></body></html>"##;
        let mut index = SectionIndex::new();
        for url in ["a/guide.html", "b/guide.html"] {
            let doc = Html::parse_document(html);
            scope_document(&doc, url, &mut index);
        }
        let entries = index.into_entries();
        let urls: Vec<_> = entries.iter().filter(|e| e.title == "Setup").map(|e| e.url.as_str()).collect();
        assert_eq!(urls, ["a/guide.html#setup", "b/guide.html#setup"]);
    }

    #[test]
    fn sibling_sections_do_not_leak_context() {
        let html = r##"<html><head><title>Page</title></head><body><div id="content">
<div class="sect1"><h2><a class="anchor" href="#a"></a>A</h2>
  <div class="sect2"><h3><a class="anchor" href="#a1"></a>A.1</h3><div class="paragraph"><p>deep</p></div></div>
  <div class="paragraph"><p>back in A</p></div>
</div>
<div class="tableblock"><table><tr><td>after</td></tr></table></div>
</div></body></html>"##;
        let (index, _) = index_of(html, "p.html");
        let entries = index.into_entries();
        assert_eq!(find(&entries, "A.1").content, "deep");
        assert_eq!(find(&entries, "A").content, "back in A");
        assert_eq!(find(&entries, "Page").content, "after");
    }

    #[test]
    fn heading_without_anchor_has_empty_fragment() {
        let html = r##"<html><head><title>Page</title></head><body><div id="content">
<div class="sect1"><h2>Plain</h2><div class="paragraph"><p>text</p></div></div>
</div></body></html>"##;
        let (index, _) = index_of(html, "p.html");
        let entries = index.into_entries();
        assert_eq!(find(&entries, "Plain").url, "p.html");
    }

    #[test]
    fn only_first_top_level_heading_counts() {
        let html = r##"<html><head><title>Page</title></head><body><div id="content">
<h1 class="sect0"><a class="anchor" href="#one"></a>One</h1>
<h1 class="sect0"><a class="anchor" href="#two"></a>Two</h1>
<div class="paragraph"><p>text</p></div>
</div></body></html>"##;
        let (index, _) = index_of(html, "p.html");
        let entries = index.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(find(&entries, "One").content, "text");
    }

    #[test]
    fn missing_title_and_missing_root() {
        let (index, outcome) = index_of(
            r#"<html><body><div id="content"><div class="paragraph"><p>x</p></div></div></body></html>"#,
            "p.html",
        );
        assert!(matches!(outcome, ScopeOutcome::Indexed { .. }));
        assert_eq!(index.into_entries(), vec![entry(UNKNOWN_TITLE, "p.html", "x")]);

        let (index, outcome) = index_of("<html><body><div class=\"paragraph\">x</div></body></html>", "p.html");
        assert_eq!(outcome, ScopeOutcome::MissingContentRoot);
        assert!(index.is_empty());
    }

    #[test]
    fn section_key_requires_heading() {
        let doc = Html::parse_fragment(r##"<h3><a class="anchor" href="#k"></a> Key </h3><div>Nope</div>"##);
        let h3 = doc.select(&Selector::parse("h3").unwrap()).next();
        let div = doc.select(&Selector::parse("div").unwrap()).next();
        assert_eq!(section_key(h3, "d.html"), Some(SectionKey::new("Key", "#k", "d.html")));
        assert_eq!(section_key(div, "d.html"), None);
        assert_eq!(section_key(None, "d.html"), None);
    }
}
