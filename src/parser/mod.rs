pub mod classify;
pub mod sanitize;
pub mod sections;
pub mod text;

use std::path::Path;

use scraper::Html;

use crate::error::{IndexError, Result};
use crate::index::SectionIndex;
use sections::ScopeOutcome;

/// Two-pass pipeline: sanitize the parsed page, then scope its sections into `index`.
pub fn process_html(html: &str, document_url: &str, index: &mut SectionIndex) -> ScopeOutcome {
    let mut document = Html::parse_document(html);
    sanitize::sanitize(&mut document);
    sections::scope_document(&document, document_url, index)
}

pub fn process_file(path: &Path, document_url: &str, index: &mut SectionIndex) -> Result<ScopeOutcome> {
    let bytes = std::fs::read(path).map_err(|e| IndexError::io(path, e))?;
    let html = String::from_utf8_lossy(&bytes);
    Ok(process_html(&html, document_url, index))
}
