//! Segment HTML lyrics into stanzas.
//!
//! Each `<p>` block becomes one stanza, except when the block carries explicit
//! verse-number markers such as `<font><b>2</b></font>`. Then it is split at every
//! marker and each part keeps the marker's number.

use regex::Regex;
use lazy_static::lazy_static;

use crate::chorus::{ChorusClassifier, HtmlChorusClassifier};
use crate::helpers::{html_to_text, normalize_lines};
use crate::logger;
use crate::types::{Stanza, StanzaParser};

lazy_static! {
    // Title repeated at the top of the content
    static ref RE_LEADING_HEADING: Regex = Regex::new(r"(?is)^\s*<h[1-6]\b[^>]*>.*?</h[1-6]\s*>").unwrap();
    static ref RE_PARAGRAPH: Regex = Regex::new(r"(?i)</?p\b[^>]*>").unwrap();
    // <b>1</b>, <strong>2.</strong>, <font color="red"><b>3</b></font>, <span style="..."><b>4</b></span>
    static ref RE_VERSE_MARKER: Regex = Regex::new(
        r"(?i)(?:<(?:font|span)\b[^>]*>\s*)*<(?:b|strong)\b[^>]*>\s*(\d+)\.?\s*</(?:b|strong)\s*>(?:\s*</(?:font|span)\s*>)*"
    ).unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct HtmlStanzaParser<C: ChorusClassifier = HtmlChorusClassifier> {
    classifier: C,
}

/// Position of an explicit verse number in a block.
struct VerseMarker {
    number: u32,
    start: usize,
    end: usize,
}

impl<C: ChorusClassifier> HtmlStanzaParser<C> {
    pub fn with_classifier(classifier: C) -> Self {
        HtmlStanzaParser { classifier }
    }

    /// Parse one `<p>` block, pushing its stanzas. Returns the next counter value.
    fn parse_block(&self, block: &str, counter: u32, stanzas: &mut Vec<Stanza>) -> u32 {
        let markers = find_verse_markers(block);
        if !markers.is_empty() {
            if let Some(prefix) = text_before_markers(block, &markers) {
                logger::debug(&format!("Dropped text before verse {}: {}", markers[0].number, prefix));
            }
            stanzas.extend(split_at_markers(block, &markers));
            return counter;
        }

        let is_chorus = self.classifier.is_chorus(block);

        let mut text = html_to_text(block);
        if is_chorus {
            text = self.classifier.strip_label(&text);
        }

        let lines = normalize_lines(&text);
        if lines.is_empty() {
            return counter;
        }

        if is_chorus {
            stanzas.push(Stanza::Chorus { lines });
            counter
        } else {
            stanzas.push(Stanza::Verse { number: counter, lines });
            counter + 1
        }
    }
}

impl<C: ChorusClassifier> StanzaParser for HtmlStanzaParser<C> {
    fn parse(&self, html: &str) -> Vec<Stanza> {
        if html.trim().is_empty() {
            return Vec::new();
        }

        let body = RE_LEADING_HEADING.replace(html, "");

        let (stanzas, _next_verse) = RE_PARAGRAPH
            .split(&body)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .fold((Vec::new(), 1u32), |(mut stanzas, counter), block| {
                let counter = self.parse_block(block, counter, &mut stanzas);
                (stanzas, counter)
            });

        stanzas
    }
}

fn find_verse_markers(block: &str) -> Vec<VerseMarker> {
    RE_VERSE_MARKER
        .captures_iter(block)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let number: u32 = caps[1].parse().ok()?;
            if number == 0 {
                return None;
            }
            Some(VerseMarker { number, start: m.start(), end: m.end() })
        })
        .collect()
}

/// Visible lyric text ahead of the first marker, which no verse takes.
fn text_before_markers(block: &str, markers: &[VerseMarker]) -> Option<String> {
    let first = markers.first()?;
    let lines = normalize_lines(&html_to_text(&block[..first.start]));
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" / "))
    }
}

/// Each marker numbers the text up to the next marker. Text before the first marker
/// and segments without any visible text are dropped.
fn split_at_markers(block: &str, markers: &[VerseMarker]) -> Vec<Stanza> {
    markers
        .iter()
        .enumerate()
        .filter_map(|(idx, marker)| {
            let segment_end = markers.get(idx + 1).map_or(block.len(), |next| next.start);
            let lines = normalize_lines(&html_to_text(&block[marker.end..segment_end]));
            if lines.is_empty() {
                None
            } else {
                Some(Stanza::Verse { number: marker.number, lines })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> Vec<Stanza> {
        HtmlStanzaParser::<HtmlChorusClassifier>::default().parse(html)
    }

    #[test]
    fn test_find_verse_markers() {
        let block = r#"<font color="red"><b>1</b></font> One<br><b>2.</b> Two <strong> 3 </strong>"#;
        let numbers: Vec<u32> = find_verse_markers(block).iter().map(|m| m.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);

        assert!(find_verse_markers("<b>Chorus</b> <i>4</i> <b>1a</b>").is_empty());
        assert!(find_verse_markers("<b>0</b> zero").is_empty());
    }

    #[test]
    fn test_leading_heading_is_dropped() {
        let stanzas = parse("<h2>Amazing Grace</h2><p>Amazing grace<br>How sweet the sound</p>");
        assert_eq!(stanzas, vec![Stanza::Verse {
            number: 1,
            lines: vec!["Amazing grace".to_string(), "How sweet the sound".to_string()],
        }]);
    }

    #[test]
    fn test_indented_heading_with_attributes_is_dropped() {
        let stanzas = parse("\n  <H1 class=\"title\">Abide\nWith Me</H1>\n<p>Abide with me</p>");
        assert_eq!(stanzas, vec![Stanza::Verse { number: 1, lines: vec!["Abide with me".to_string()] }]);
    }

    #[test]
    fn test_marker_segments_without_text_are_dropped() {
        let stanzas = parse("<p><b>3</b> Third verse<br><b>4</b> <br> </p>");
        assert_eq!(stanzas, vec![Stanza::Verse { number: 3, lines: vec!["Third verse".to_string()] }]);
    }

    #[test]
    fn test_text_before_markers() {
        let block = "Intro line<br><i>sung softly</i><b>2</b> Second";
        let markers = find_verse_markers(block);
        assert_eq!(text_before_markers(block, &markers), Some("Intro line / sung softly".to_string()));
        assert_eq!(split_at_markers(block, &markers), vec![Stanza::Verse {
            number: 2,
            lines: vec!["Second".to_string()],
        }]);

        let block = "<font color=\"red\"> <br></font><b>1</b> First";
        assert_eq!(text_before_markers(block, &find_verse_markers(block)), None);
    }

    #[test]
    fn test_markers_do_not_advance_counter() {
        let stanzas = parse("<p><b>5</b> Marked</p><p>Unmarked</p>");
        let numbers: Vec<Option<u32>> = stanzas.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, vec![Some(5), Some(1)]);
    }

    #[test]
    fn test_marked_block_with_chorus_label_is_verse() {
        let stanzas = parse("<p><b>1</b> First<br><i>Chorus</i> sung here</p>");
        assert_eq!(stanzas, vec![Stanza::Verse {
            number: 1,
            lines: vec!["First".to_string(), "Chorus sung here".to_string()],
        }]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n").is_empty());
        assert!(parse("<p> </p><p><br></p>").is_empty());
    }
}
