use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::types::LanguageDescriptor;

/// Input base name and its hymnal, e.g. `("swahili", sw / swahili / Nyimbo za Kiswahili)`.
pub type LanguageEntry = (String, LanguageDescriptor);

pub fn default_languages() -> Vec<LanguageEntry> {
    vec![
        ("english".to_string(), LanguageDescriptor::new("en", "english", "English Hymnal")),
        ("luganda".to_string(), LanguageDescriptor::new("lg", "luganda", "Ennyimba za Luganda")),
        ("swahili".to_string(), LanguageDescriptor::new("sw", "swahili", "Nyimbo za Kiswahili")),
    ]
}

/// Read a language table from JSON, keeping the order of the keys:
///
/// ```json
/// { "english": { "code": "en", "directoryName": "english", "displayTitle": "English Hymnal" } }
/// ```
pub fn load_languages(path: &Path) -> Result<Vec<LanguageEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read language table: {}", path.display()))?;
    parse_languages(&text)
        .with_context(|| format!("Invalid language table: {}", path.display()))
}

pub fn parse_languages(text: &str) -> Result<Vec<LanguageEntry>> {
    let map: Map<String, Value> = serde_json::from_str(text)?;

    let mut languages = Vec::with_capacity(map.len());
    for (base, value) in map {
        let descriptor: LanguageDescriptor = serde_json::from_value(value)
            .with_context(|| format!("Invalid descriptor for '{}'", base))?;
        languages.push((base, descriptor));
    }

    if languages.is_empty() {
        anyhow::bail!("Language table is empty");
    }

    Ok(languages)
}

pub fn language_for_base<'a>(languages: &'a [LanguageEntry], base: &str) -> Option<&'a LanguageDescriptor> {
    languages.iter()
        .find(|(b, _)| b == base)
        .map(|(_, descriptor)| descriptor)
}
