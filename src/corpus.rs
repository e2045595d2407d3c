use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::error::Result;

const DOCUMENT_EXTENSION: &str = ".html";

/// One page to index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub path: PathBuf,
    /// Path relative to the corpus root, `/`-separated.
    pub url: String,
}

/// Walk every scan directory under `base` and return its HTML documents.
///
/// Directories named in `exclude_dirs` are pruned with their whole subtree.
/// Within a directory, entries are visited in file-name order.
pub fn collect_documents(base: &Path, scan_dirs: &[String], exclude_dirs: &[String]) -> Result<Vec<Document>> {
    let excluded: HashSet<&str> = exclude_dirs.iter().map(String::as_str).collect();
    let mut documents = Vec::new();

    for scan_dir in scan_dirs {
        let root = base.join(scan_dir);
        let before = documents.len();

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded_dir(entry, &excluded));

        for entry in walker {
            let entry = entry?;
            if !is_document(&entry) {
                continue;
            }
            let path = entry.into_path();
            let url = relative_url(base, &path);
            debug!(url = %url, "found document");
            documents.push(Document { path, url });
        }

        info!("Found {} documents under {}", documents.len() - before, root.display());
    }

    Ok(documents)
}

fn is_excluded_dir(entry: &DirEntry, excluded: &HashSet<&str>) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_str().is_some_and(|name| excluded.contains(name))
}

fn is_document(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(DOCUMENT_EXTENSION)
}

/// `path` relative to `base`, joined with `/` regardless of platform.
pub fn relative_url(base: &Path, path: &Path) -> String {
    let Ok(relative) = path.strip_prefix(base) else {
        return path.to_string_lossy().into_owned();
    };
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

// ── Tests ──
