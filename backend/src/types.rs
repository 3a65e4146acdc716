use serde::{Serialize, Deserialize};

/// One block of lyric lines.
///
/// Serialized with an internal `type` tag, e.g.
/// `{"type":"verse","number":1,"lines":["..."]}` or `{"type":"chorus","lines":["..."]}`.
/// Only verses carry a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Stanza {
    Verse {
        number: u32,
        lines: Vec<String>,
    },
    Chorus {
        lines: Vec<String>,
    },
}

impl Stanza {
    pub fn lines(&self) -> &[String] {
        match self {
            Stanza::Verse { lines, .. } => lines,
            Stanza::Chorus { lines } => lines,
        }
    }

    pub fn number(&self) -> Option<u32> {
        match self {
            Stanza::Verse { number, .. } => Some(*number),
            Stanza::Chorus { .. } => None,
        }
    }

    pub fn is_chorus(&self) -> bool {
        matches!(self, Stanza::Chorus { .. })
    }
}

/// A hymn as it appears in the per-language input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHymn {
    pub number: u32,
    #[serde(default)]
    pub title: String,
    /// HTML lyrics
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
}

/// Which markup a hymn's lyrics are written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HymnContent {
    Html(String),
    Markdown(String),
    Missing,
}

impl RawHymn {
    /// HTML content takes precedence. Blank fields count as absent.
    pub fn hymn_content(&self) -> HymnContent {
        fn non_blank(s: &Option<String>) -> Option<&String> {
            s.as_ref().filter(|s| !s.trim().is_empty())
        }

        if let Some(html) = non_blank(&self.content) {
            HymnContent::Html(html.clone())
        } else if let Some(md) = non_blank(&self.markdown) {
            HymnContent::Markdown(md.clone())
        } else {
            HymnContent::Missing
        }
    }
}

/// Turns one hymn's lyric markup into stanzas.
///
/// Empty input yields no stanzas. Implementations are pure: the same text always
/// gives the same stanzas.
pub trait StanzaParser {
    fn parse(&self, text: &str) -> Vec<Stanza>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HymnRecord {
    pub number: u32,
    pub language: String,
    pub title: String,
    pub stanzas: Vec<Stanza>,
}

/// Static metadata for one hymnal, keyed by the input file's base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDescriptor {
    pub code: String,
    pub directory_name: String,
    pub display_title: String,
}

impl LanguageDescriptor {
    pub fn new(code: &str, directory_name: &str, display_title: &str) -> Self {
        LanguageDescriptor {
            code: code.to_string(),
            directory_name: directory_name.to_string(),
            display_title: display_title.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricFormat {
    Html,
    Markdown,
}

impl LyricFormat {
    /// `.md` and `.markdown` files are markdown, everything else is treated as HTML.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(|e| e.to_lowercase()).as_deref() {
            Some("md") | Some("markdown") => LyricFormat::Markdown,
            _ => LyricFormat::Html,
        }
    }
}
