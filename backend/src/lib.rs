pub mod types;
pub mod helpers;
pub mod chorus;
pub mod html_stanzas;
pub mod markdown_stanzas;
pub mod hymn_record;
pub mod hymn_source;
pub mod languages;
pub mod catalog;
pub mod logger;

use std::env;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::error::Error;
use app_dirs::{get_app_root, AppDataType, AppInfo};

pub use types::{HymnContent, HymnRecord, LanguageDescriptor, LyricFormat, RawHymn, Stanza, StanzaParser};
pub use html_stanzas::HtmlStanzaParser;
pub use markdown_stanzas::MarkdownStanzaParser;
pub use hymn_record::{assemble_hymn, assemble_hymns, Parsers};

pub const APP_INFO: AppInfo = AppInfo{name: "hymnal", author: "hymnal"};

/// The directory for the log files.
///
/// `HYMNAL_DIR` when set, otherwise the user data directory.
pub fn get_create_hymnal_dir() -> Result<PathBuf, Box<dyn Error>> {
    let p = match env::var("HYMNAL_DIR") {
        Ok(s) if !s.is_empty() => PathBuf::from(s),
        _ => get_app_root(AppDataType::UserData, &APP_INFO)?,
    };
    if !p.exists() {
        create_dir_all(&p)?;
    }
    Ok(p)
}

/// Segment lyric text of a known format.
pub fn parse_lyrics(text: &str, format: LyricFormat) -> Vec<Stanza> {
    let parsers = Parsers::default();
    match format {
        LyricFormat::Html => parsers.html.parse(text),
        LyricFormat::Markdown => parsers.markdown.parse(text),
    }
}
