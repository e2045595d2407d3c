use std::sync::LazyLock;

use scraper::{Html, Selector};

/// Non-content markup stripped before scoping.
const REMOVED: &[&str] = &[
    "script",
    "style",
    "nav",
    "footer",
    "img",
    ".listingblock",
    ".literalblock",
    ".navigation",
    ".nav",
    ".menu",
    ".image",
    "#toc",
    ".breadcrumb",
    ".admonitionblock",
];

static REMOVED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse(&REMOVED.join(", ")).unwrap());

/// Detach every non-content element from the tree. Returns how many were detached.
pub fn sanitize(document: &mut Html) -> usize {
    // Selecting from the root element only sees attached nodes, so a second
    // run finds nothing.
    let ids: Vec<_> = document
        .root_element()
        .select(&REMOVED_SELECTOR)
        .map(|el| el.id())
        .collect();

    let mut removed = 0;
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
            removed += 1;
        }
    }
    removed
}
