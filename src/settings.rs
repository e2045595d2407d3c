use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{IndexError, Result};
use crate::writer::DEFAULT_OUTPUT;

pub const ENV_PREFIX: &str = "DOC_INDEXER";
const DEFAULT_SCAN_DIRS: &[&str] = &["38", "prospero", "bootablejar", "galleon", "galleon-plugins"];
const DEFAULT_EXCLUDE_DIRS: &[&str] = &["downloads", "feature-pack", "images"];

/// Resolved settings for one indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub doc_base_dir: PathBuf,
    pub output_file_path: PathBuf,
    pub scan_dirs: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

/// Values given on the command line; `None` falls through to lower layers.
#[derive(Debug, Default)]
pub struct Overrides {
    pub doc_base_dir: Option<PathBuf>,
    pub output_file_path: Option<PathBuf>,
    pub scan_dirs: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    doc_base_dir: Option<PathBuf>,
    output_file_path: PathBuf,
    scan_dirs: Vec<String>,
    exclude_dirs: Vec<String>,
}

impl Settings {
    /// Layer defaults, an optional TOML file, `DOC_INDEXER_*` variables and
    /// command-line overrides, in increasing precedence.
    pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("output_file_path", DEFAULT_OUTPUT)?
            .set_default("scan_dirs", strings(DEFAULT_SCAN_DIRS))?
            .set_default("exclude_dirs", strings(DEFAULT_EXCLUDE_DIRS))?;

        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(true));
        }

        let raw: RawSettings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("scan_dirs")
                    .with_list_parse_key("exclude_dirs"),
            )
            .set_override_option("doc_base_dir", overrides.doc_base_dir.map(path_value))?
            .set_override_option("output_file_path", overrides.output_file_path.map(path_value))?
            .set_override_option("scan_dirs", overrides.scan_dirs)?
            .set_override_option("exclude_dirs", overrides.exclude_dirs)?
            .build()?
            .try_deserialize()?;

        Ok(Settings {
            doc_base_dir: raw.doc_base_dir.ok_or(IndexError::MissingSetting("doc_base_dir"))?,
            output_file_path: raw.output_file_path,
            scan_dirs: raw.scan_dirs,
            exclude_dirs: raw.exclude_dirs,
        })
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn path_value(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

// ── Tests ──
