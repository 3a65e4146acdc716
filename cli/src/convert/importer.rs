use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use hymnal_backend::{HymnRecord, LanguageDescriptor, Parsers, RawHymn};
use hymnal_backend::catalog::{Catalog, LanguageSummary};
use hymnal_backend::hymn_source::{HymnSource, SourceError};

/// What happened to one language during a conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Written(LanguageSummary),
    /// The source could not be read. Not an error, the language is left out.
    Skipped(String),
    /// The source was read but is not a valid hymn list.
    Failed(String),
}

pub struct LanguageImporter {
    base_name: String,
    language: LanguageDescriptor,
    limit: Option<usize>,
}

impl LanguageImporter {
    pub fn new(base_name: &str, language: &LanguageDescriptor, limit: Option<usize>) -> Self {
        Self {
            base_name: base_name.to_string(),
            language: language.clone(),
            limit,
        }
    }

    fn read_hymns(&self, source: &dyn HymnSource) -> Result<Vec<RawHymn>, SourceError> {
        let mut hymns = source.read_language(&self.base_name)?;
        if let Some(limit) = self.limit {
            hymns.truncate(limit);
        }
        Ok(hymns)
    }

    fn assemble(&self, parsers: &Parsers, hymns: &[RawHymn]) -> Vec<HymnRecord> {
        let pb = ProgressBar::new(hymns.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("=>-"));
        }

        let mut records = Vec::with_capacity(hymns.len());
        for raw in hymns {
            pb.set_message(format!("{} {}", self.language.code, raw.number));
            records.push(parsers.assemble_hymn(raw, &self.language));
            pb.inc(1);
        }

        let stanza_count: usize = records.iter().map(|r| r.stanzas.len()).sum();
        pb.finish_with_message(format!("{}: {} hymns, {} stanzas", self.language.code, records.len(), stanza_count));

        records
    }

    /// Read, segment and write one language. Only output errors are returned as `Err`,
    /// source problems become `Skipped` or `Failed`.
    pub fn import(&self, source: &dyn HymnSource, parsers: &Parsers, catalog: &mut Catalog) -> Result<ImportOutcome> {
        info!("Importing {} from {}", self.base_name, source.describe());

        let hymns = match self.read_hymns(source) {
            Ok(hymns) => hymns,
            Err(e @ SourceError::Unavailable { .. }) => {
                warn!("Skipping {}: {}", self.base_name, e);
                hymnal_backend::logger::warn(&e.to_string());
                return Ok(ImportOutcome::Skipped(e.to_string()));
            }
            Err(e @ SourceError::Invalid { .. }) => {
                hymnal_backend::logger::error(&e.to_string());
                return Ok(ImportOutcome::Failed(e.to_string()));
            }
        };

        if hymns.is_empty() {
            warn!("No hymns found for {}", self.base_name);
        }

        let records = self.assemble(parsers, &hymns);
        let summary = catalog.write_language(&self.language, &records)?;

        info!("{} import completed: {} hymns written to {}",
              self.base_name, summary.hymn_count, catalog.out_dir().join(&self.language.directory_name).display());

        Ok(ImportOutcome::Written(summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use serial_test::serial;
    use tempfile::TempDir;

    use crate::test_helpers::logging_setup;
    use hymnal_backend::hymn_source::DirSource;

    fn swahili() -> LanguageDescriptor {
        LanguageDescriptor::new("sw", "swahili", "Nyimbo za Kiswahili")
    }

    #[test]
    #[serial]
    fn test_import_outcomes() {
        logging_setup();
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("swahili.json"), r#"[
            {"number": 2, "title": "B", "content": "<p>b</p>"},
            {"number": 1, "title": "A", "markdown": "a"},
            {"number": 3, "title": "C", "markdown": "c"}
        ]"#).unwrap();
        fs::write(input.join("broken.json"), "[{").unwrap();

        let source = DirSource::new(&input);
        let parsers = Parsers::default();
        let mut catalog = Catalog::create(&temp_dir.path().join("output")).unwrap();

        let outcome = LanguageImporter::new("swahili", &swahili(), Some(2))
            .import(&source, &parsers, &mut catalog).unwrap();
        match outcome {
            ImportOutcome::Written(summary) => {
                assert_eq!(summary.hymn_count, 2);
                assert_eq!(summary.first_hymn.unwrap().title, "A");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(!temp_dir.path().join("output/swahili/003.json").exists());

        let outcome = LanguageImporter::new("missing", &swahili(), None)
            .import(&source, &parsers, &mut catalog).unwrap();
        assert!(matches!(outcome, ImportOutcome::Skipped(_)));

        let outcome = LanguageImporter::new("broken", &swahili(), None)
            .import(&source, &parsers, &mut catalog).unwrap();
        assert!(matches!(outcome, ImportOutcome::Failed(_)));
    }
}
