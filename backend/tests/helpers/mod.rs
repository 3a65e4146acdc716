use std::env;

use hymnal_backend::{LanguageDescriptor, RawHymn, Stanza};

/// Keep the logger out of the user's data directory during tests.
///
/// Changes process environment, so callers are marked `#[serial]`.
pub fn logging_setup() {
    unsafe {
        env::set_var("HYMNAL_DIR", env::temp_dir().join("hymnal-tests"));
        env::set_var("DISABLE_LOG", "true");
    }
}

#[allow(dead_code)]
pub fn english() -> LanguageDescriptor {
    LanguageDescriptor::new("en", "english", "English Hymnal")
}

#[allow(dead_code)]
pub fn html_hymn(number: u32, title: &str, content: &str) -> RawHymn {
    RawHymn {
        number,
        title: title.to_string(),
        content: Some(content.to_string()),
        markdown: None,
    }
}

#[allow(dead_code)]
pub fn markdown_hymn(number: u32, title: &str, markdown: &str) -> RawHymn {
    RawHymn {
        number,
        title: title.to_string(),
        content: None,
        markdown: Some(markdown.to_string()),
    }
}

#[allow(dead_code)]
pub fn verse(number: u32, lines: &[&str]) -> Stanza {
    Stanza::Verse { number, lines: lines.iter().map(|s| s.to_string()).collect() }
}

#[allow(dead_code)]
pub fn chorus(lines: &[&str]) -> Stanza {
    Stanza::Chorus { lines: lines.iter().map(|s| s.to_string()).collect() }
}

/// Counter-numbered verses must run 1, 2, 3, ... and every stanza must have lines.
#[allow(dead_code)]
pub fn assert_well_formed(stanzas: &[Stanza]) {
    let mut expected = 1;
    for stanza in stanzas {
        assert!(!stanza.lines().is_empty(), "stanza without lines: {:?}", stanza);
        assert!(stanza.lines().iter().all(|l| !l.is_empty() && l.trim() == l));
        if let Some(n) = stanza.number() {
            assert_eq!(n, expected);
            expected += 1;
        }
    }
}
