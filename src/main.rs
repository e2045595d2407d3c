mod corpus;
mod error;
mod index;
mod parser;
mod settings;
mod writer;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use corpus::Document;
use index::SectionIndex;
use parser::sections::ScopeOutcome;
use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "doc_indexer", version, about = "Build a section-level search index from HTML documentation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the documentation tree and write the JSON index
    Build {
        /// Path of the documentation directory
        #[arg(long)]
        doc_base_dir: Option<PathBuf>,
        /// Path of the generated index [default: ./wildfly-doc-index.json]
        #[arg(long)]
        output_file_path: Option<PathBuf>,
        /// Comma separated directory names, relative to the base dir, to scan for html files
        #[arg(long, value_delimiter = ',')]
        scan_dirs: Option<Vec<String>>,
        /// Comma separated directory names that are skipped wherever they are found
        #[arg(long, value_delimiter = ',')]
        exclude_dirs: Option<Vec<String>>,
        /// Optional TOML settings file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the index entries of a single html file
    Inspect {
        file: PathBuf,
        /// Document URL to record (default: the file name)
        #[arg(long)]
        url: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            doc_base_dir,
            output_file_path,
            scan_dirs,
            exclude_dirs,
            config,
        } => {
            let overrides = Overrides {
                doc_base_dir,
                output_file_path,
                scan_dirs,
                exclude_dirs,
            };
            let settings = Settings::load(config.as_deref(), overrides).context("Failed to load settings")?;
            debug!(?settings, "settings resolved");

            let documents = corpus::collect_documents(&settings.doc_base_dir, &settings.scan_dirs, &settings.exclude_dirs)
                .with_context(|| format!("Failed to walk {}", settings.doc_base_dir.display()))?;
            if documents.is_empty() {
                warn!("No html documents found under {}", settings.doc_base_dir.display());
            }

            let (index, counts) = index_documents(&documents)?;
            let entries = index.into_entries();
            writer::write_index(&entries, &settings.output_file_path)
                .with_context(|| format!("Failed to write {}", settings.output_file_path.display()))?;

            println!(
                "Indexed {} documents ({} skipped), wrote {} entries to {} in {}",
                counts.indexed,
                counts.skipped,
                entries.len(),
                settings.output_file_path.display(),
                format_duration(t0.elapsed()),
            );
        }
        Commands::Inspect { file, url } => {
            let url = url.unwrap_or_else(|| file_name(&file));
            let mut index = SectionIndex::new();
            match parser::process_file(&file, &url, &mut index)? {
                ScopeOutcome::Indexed { sections, blocks } => {
                    info!("{}: {} sections, {} text blocks", url, sections, blocks)
                }
                ScopeOutcome::MissingContentRoot => warn!("No content div found in {}", file.display()),
            }
            println!("{}", serde_json::to_string_pretty(&index.into_entries())?);
        }
    }

    Ok(())
}

struct IndexCounts {
    indexed: usize,
    skipped: usize,
}

/// Parse, sanitize and scope every document into one shared index, strictly in order.
fn index_documents(documents: &[Document]) -> anyhow::Result<(SectionIndex, IndexCounts)> {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut index = SectionIndex::new();
    let mut counts = IndexCounts { indexed: 0, skipped: 0 };

    for doc in documents {
        debug!("Processing {}", doc.path.display());
        let outcome = parser::process_file(&doc.path, &doc.url, &mut index)?;
        match outcome {
            ScopeOutcome::Indexed { sections, blocks } => {
                debug!(url = %doc.url, sections, blocks, "document indexed");
                counts.indexed += 1;
            }
            ScopeOutcome::MissingContentRoot => {
                pb.suspend(|| warn!("No content div found in {}, continuing with next file", doc.path.display()));
                counts.skipped += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Collected {} sections with {} text blocks from {} documents",
        index.len(),
        index.block_count(),
        counts.indexed
    );
    Ok((index, counts))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
