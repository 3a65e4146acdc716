//! The output tree: one JSON file per hymn under each language directory, an
//! `index.json` summary and a `cross-references.json` scaffold.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Serialize, Deserialize};

use crate::logger;
use crate::types::{HymnRecord, LanguageDescriptor};

pub const INDEX_FILE_NAME: &str = "index.json";
pub const CROSS_REFERENCES_FILE_NAME: &str = "cross-references.json";
pub const CATALOG_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HymnalEntry {
    pub code: String,
    pub title: String,
    pub hymn_count: usize,
    pub directory: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogIndex {
    pub version: String,
    pub description: String,
    pub generated_at: String,
    pub hymnals: BTreeMap<String, HymnalEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HymnRef {
    pub number: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReference {
    pub id: String,
    pub note: String,
    pub hymns: BTreeMap<String, HymnRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReferenceFile {
    pub version: String,
    pub description: String,
    pub note: String,
    pub cross_references: Vec<CrossReference>,
}

/// What was written for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSummary {
    pub descriptor: LanguageDescriptor,
    pub hymn_count: usize,
    /// The lowest-numbered hymn, used for the cross-reference example.
    pub first_hymn: Option<HymnRef>,
}

/// `7` -> `007.json`
pub fn hymn_file_name(number: u32) -> String {
    format!("{:03}.json", number)
}

/// Move a previous output tree out of the way, to `<dir>.backup-<timestamp>`.
///
/// Returns the backup path, or `None` when there was nothing to move.
pub fn backup_existing_output(out_dir: &Path) -> Result<Option<PathBuf>> {
    if !out_dir.exists() {
        return Ok(None);
    }

    let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let dir_name = out_dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow::anyhow!("Output path has no directory name: {}", out_dir.display()))?;

    let base_name = format!("{}.backup-{}", dir_name, stamp);
    let mut backup = out_dir.with_file_name(&base_name);
    let mut n = 1;
    while backup.exists() {
        backup = out_dir.with_file_name(format!("{}-{}", base_name, n));
        n += 1;
    }

    fs::rename(out_dir, &backup)
        .with_context(|| format!("Failed to move {} to {}", out_dir.display(), backup.display()))?;

    logger::info(&format!("Moved previous output to {}", backup.display()));
    Ok(Some(backup))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    json.push('\n');
    fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn write_hymn(out_dir: &Path, language: &LanguageDescriptor, record: &HymnRecord) -> Result<PathBuf> {
    let lang_dir = out_dir.join(&language.directory_name);
    if !lang_dir.exists() {
        fs::create_dir_all(&lang_dir)
            .with_context(|| format!("Failed to create directory: {}", lang_dir.display()))?;
    }

    let path = lang_dir.join(hymn_file_name(record.number));
    write_json(&path, record)?;
    Ok(path)
}

pub fn build_index(summaries: &[LanguageSummary], generated_at: DateTime<Utc>) -> CatalogIndex {
    let hymnals = summaries.iter()
        .map(|s| {
            let d = &s.descriptor;
            (d.directory_name.clone(), HymnalEntry {
                code: d.code.clone(),
                title: d.display_title.clone(),
                hymn_count: s.hymn_count,
                directory: d.directory_name.clone(),
            })
        })
        .collect();

    CatalogIndex {
        version: CATALOG_VERSION.to_string(),
        description: "Hymnal catalog: hymn counts and metadata per language".to_string(),
        generated_at: generated_at.to_rfc3339(),
        hymnals,
    }
}

pub fn write_index(out_dir: &Path, index: &CatalogIndex) -> Result<PathBuf> {
    let path = out_dir.join(INDEX_FILE_NAME);
    write_json(&path, index)?;
    Ok(path)
}

/// A fresh scaffold with one example entry linking the first hymn of each language.
pub fn cross_reference_template(summaries: &[LanguageSummary]) -> CrossReferenceFile {
    let hymns: BTreeMap<String, HymnRef> = summaries.iter()
        .filter_map(|s| s.first_hymn.clone().map(|h| (s.descriptor.directory_name.clone(), h)))
        .collect();

    let cross_references = if hymns.is_empty() {
        Vec::new()
    } else {
        vec![CrossReference {
            id: "example-1".to_string(),
            note: "Example entry, replace with hymns that are translations of one another".to_string(),
            hymns,
        }]
    };

    CrossReferenceFile {
        version: CATALOG_VERSION.to_string(),
        description: "Links between hymns in different hymnals believed to be translations of one another".to_string(),
        note: "Curated by hand. This file is regenerated on every conversion, keep the edited copy elsewhere".to_string(),
        cross_references,
    }
}

pub fn write_cross_references(out_dir: &Path, file: &CrossReferenceFile) -> Result<PathBuf> {
    let path = out_dir.join(CROSS_REFERENCES_FILE_NAME);
    write_json(&path, file)?;
    Ok(path)
}

/// Writes hymn files language by language and remembers what it wrote, for the
/// index and the cross-reference scaffold at the end.
pub struct Catalog {
    out_dir: PathBuf,
    backup: Option<PathBuf>,
    summaries: Vec<LanguageSummary>,
}

impl Catalog {
    /// Moves any previous output aside and creates a fresh output directory.
    pub fn create(out_dir: &Path) -> Result<Self> {
        let backup = backup_existing_output(out_dir)?;
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

        Ok(Catalog {
            out_dir: out_dir.to_path_buf(),
            backup,
            summaries: Vec::new(),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Where the previous output was moved to, if there was one.
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    /// A later record with an already written number replaces the earlier file and is
    /// counted once.
    pub fn write_language(&mut self, language: &LanguageDescriptor, records: &[HymnRecord]) -> Result<LanguageSummary> {
        let mut numbers = BTreeSet::new();
        for record in records {
            if !numbers.insert(record.number) {
                logger::warn(&format!(
                    "Duplicate hymn number {} in {}, the later record replaces {}",
                    record.number, language.directory_name, hymn_file_name(record.number)
                ));
            }
            write_hymn(&self.out_dir, language, record)?;
        }

        // Reversed, so a duplicate resolves to the record that was written last
        let first_hymn = records.iter().rev()
            .min_by_key(|r| r.number)
            .map(|r| HymnRef { number: r.number, title: r.title.clone() });

        let summary = LanguageSummary {
            descriptor: language.clone(),
            hymn_count: numbers.len(),
            first_hymn,
        };
        self.summaries.push(summary.clone());
        Ok(summary)
    }

    pub fn summaries(&self) -> &[LanguageSummary] {
        &self.summaries
    }

    /// Write `index.json` and `cross-references.json`.
    pub fn finish(self) -> Result<CatalogIndex> {
        let index = build_index(&self.summaries, Utc::now());
        write_index(&self.out_dir, &index)?;
        write_cross_references(&self.out_dir, &cross_reference_template(&self.summaries))?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn summary(code: &str, dir: &str, count: usize, first: Option<(u32, &str)>) -> LanguageSummary {
        LanguageSummary {
            descriptor: LanguageDescriptor::new(code, dir, &format!("{} hymnal", dir)),
            hymn_count: count,
            first_hymn: first.map(|(number, title)| HymnRef { number, title: title.to_string() }),
        }
    }

    #[test]
    fn test_hymn_file_name() {
        assert_eq!(hymn_file_name(1), "001.json");
        assert_eq!(hymn_file_name(42), "042.json");
        assert_eq!(hymn_file_name(1234), "1234.json");
    }

    #[test]
    fn test_build_index() {
        let summaries = vec![
            summary("sw", "swahili", 3, Some((1, "Mungu ni pendo"))),
            summary("en", "english", 2, Some((1, "Abide with me"))),
        ];
        let index = build_index(&summaries, Utc::now());
        let dirs: Vec<&String> = index.hymnals.keys().collect();
        assert_eq!(dirs, vec!["english", "swahili"]);
        assert_eq!(index.hymnals["swahili"].hymn_count, 3);
        assert_eq!(index.hymnals["english"].code, "en");

        let json = serde_json::to_value(&index).unwrap();
        assert!(json.get("generatedAt").is_some());
        assert_eq!(json["hymnals"]["english"]["hymnCount"], 2);
    }

    #[test]
    fn test_cross_reference_template() {
        let summaries = vec![
            summary("en", "english", 2, Some((1, "Abide with me"))),
            summary("lg", "luganda", 0, None),
        ];
        let file = cross_reference_template(&summaries);
        assert_eq!(file.cross_references.len(), 1);
        let hymns = &file.cross_references[0].hymns;
        assert_eq!(hymns.len(), 1);
        assert_eq!(hymns["english"].title, "Abide with me");

        let empty = cross_reference_template(&[]);
        assert!(empty.cross_references.is_empty());
        let json = serde_json::to_value(&empty).unwrap();
        assert!(json["crossReferences"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_backup_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("output");

        assert_eq!(backup_existing_output(&out_dir).unwrap(), None);

        fs::create_dir_all(&out_dir).unwrap();
        fs::write(out_dir.join("marker.txt"), "old").unwrap();
        let first = backup_existing_output(&out_dir).unwrap().unwrap();
        assert!(!out_dir.exists());
        assert_eq!(fs::read_to_string(first.join("marker.txt")).unwrap(), "old");

        // Same second, the name is taken
        fs::create_dir_all(&out_dir).unwrap();
        let second = backup_existing_output(&out_dir).unwrap().unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }
}
