pub mod importer;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use thiserror::Error;
use tracing::info;

use hymnal_backend::{logger, Parsers};
use hymnal_backend::catalog::Catalog;
use hymnal_backend::hymn_source::{DirSource, GitSnapshotSource, HymnSource};
use hymnal_backend::languages::{default_languages, load_languages, LanguageEntry};

use importer::{ImportOutcome, LanguageImporter};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("No input given. Use --input-dir (or HYMNAL_INPUT_DIR) or --git-repo.")]
    NoInput,

    #[error("Input directory does not exist: {0}")]
    MissingInputDir(PathBuf),
}

/// Read the hymn lists from a git revision instead of the working files.
#[derive(Debug, Clone)]
pub struct GitSnapshot {
    pub repo: PathBuf,
    pub rev: String,
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub git: Option<GitSnapshot>,
    pub languages_file: Option<PathBuf>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertReport {
    /// `(directory name, hymn count)` in table order.
    pub written: Vec<(String, usize)>,
    pub skipped: Vec<String>,
    pub failed: Vec<String>,
    pub backup: Option<PathBuf>,
}

/// The `--languages` file when given, otherwise the built-in table.
pub fn language_table(languages_file: Option<&Path>) -> Result<Vec<LanguageEntry>> {
    match languages_file {
        Some(path) => load_languages(path),
        None => Ok(default_languages()),
    }
}

/// `--limit`, or `CONVERT_LIMIT` when the option is not given.
pub fn resolve_limit(limit: Option<usize>) -> Option<usize> {
    limit.or_else(|| match env::var("CONVERT_LIMIT") {
        Ok(s) if !s.is_empty() => s.parse().ok(),
        _ => None,
    })
}

fn open_source(opts: &ConvertOptions) -> Result<Box<dyn HymnSource>> {
    if let Some(git) = &opts.git {
        return Ok(Box::new(GitSnapshotSource::new(&git.repo, &git.rev, &git.path)));
    }

    let input_dir = opts.input_dir.as_ref().ok_or(ConvertError::NoInput)?;
    if !input_dir.is_dir() {
        return Err(ConvertError::MissingInputDir(input_dir.clone()).into());
    }
    Ok(Box::new(DirSource::new(input_dir)))
}

pub fn convert(opts: &ConvertOptions) -> Result<ConvertReport> {
    logger::info("=== convert() ===");

    let languages = language_table(opts.languages_file.as_deref())?;
    let source = open_source(opts)?;
    let parsers = Parsers::default();

    let limit = resolve_limit(opts.limit);
    if let Some(n) = limit {
        logger::info(&format!("CONVERT_LIMIT set to {}", n));
    }

    let mut catalog = Catalog::create(&opts.output_dir)
        .with_context(|| format!("Failed to prepare output directory: {}", opts.output_dir.display()))?;

    let mut report = ConvertReport {
        backup: catalog.backup_path().map(Path::to_path_buf),
        ..Default::default()
    };

    for (base_name, language) in &languages {
        let importer = LanguageImporter::new(base_name, language, limit);
        match importer.import(source.as_ref(), &parsers, &mut catalog)? {
            ImportOutcome::Written(summary) => {
                report.written.push((summary.descriptor.directory_name.clone(), summary.hymn_count));
            }
            ImportOutcome::Skipped(_) => report.skipped.push(base_name.clone()),
            ImportOutcome::Failed(_) => report.failed.push(base_name.clone()),
        }
    }

    let index = catalog.finish()?;
    info!("Wrote index with {} hymnals to {}", index.hymnals.len(), opts.output_dir.display());

    Ok(report)
}

pub fn print_report(report: &ConvertReport, output_dir: &Path) {
    println!("{}", "Conversion summary".bold());

    if let Some(backup) = &report.backup {
        println!("  previous output moved to {}", backup.display());
    }

    let total: usize = report.written.iter().map(|(_, n)| n).sum();
    for (dir, count) in &report.written {
        println!("  {} {:<12} {} hymns", "✓".green(), dir, count);
    }
    for base in &report.skipped {
        println!("  {} {:<12} no source", "-".yellow(), base);
    }
    for base in &report.failed {
        println!("  {} {:<12} invalid source, see log", "✗".red(), base);
    }

    println!("  {} hymns written to {}", total, output_dir.display());
}
