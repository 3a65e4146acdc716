//! Segment markdown lyrics into stanzas.
//!
//! Stanzas are separated by blank lines. Verse numbers written as `**1**` are removed,
//! verses are numbered in order of appearance.

use regex::Regex;
use lazy_static::lazy_static;

use crate::chorus::{ChorusClassifier, MarkdownChorusClassifier};
use crate::helpers::{normalize_lines, remove_emphasis_runs};
use crate::types::{Stanza, StanzaParser};

lazy_static! {
    static ref RE_BLANK_LINES: Regex = Regex::new(r"\n[ \t]*\n(?:[ \t]*\n)*").unwrap();
    // Text of a `**1**` or `*2.*` verse-number run
    static ref RE_VERSE_NUMBER: Regex = Regex::new(r"^\s*\d+\.?\s*$").unwrap();
    static ref RE_EMPHASIS_DELIMITERS: Regex = Regex::new(r"[*_]+").unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct MarkdownStanzaParser<C: ChorusClassifier = MarkdownChorusClassifier> {
    classifier: C,
}

impl<C: ChorusClassifier> MarkdownStanzaParser<C> {
    pub fn with_classifier(classifier: C) -> Self {
        MarkdownStanzaParser { classifier }
    }

    fn block_lines(&self, block: &str) -> Vec<String> {
        let s = remove_emphasis_runs(block, |run_text| RE_VERSE_NUMBER.is_match(run_text), false);
        let s = self.classifier.strip_label(&s);
        let s = RE_EMPHASIS_DELIMITERS.replace_all(&s, "");
        normalize_lines(&s)
    }
}

impl<C: ChorusClassifier> StanzaParser for MarkdownStanzaParser<C> {
    fn parse(&self, markdown: &str) -> Vec<Stanza> {
        let text = markdown.replace("\r\n", "\n");

        let (stanzas, _next_verse) = RE_BLANK_LINES
            .split(&text)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .fold((Vec::new(), 1u32), |(mut stanzas, counter), block| {
                let is_chorus = self.classifier.is_chorus(block);
                let lines = self.block_lines(block);

                let counter = if lines.is_empty() {
                    counter
                } else if is_chorus {
                    stanzas.push(Stanza::Chorus { lines });
                    counter
                } else {
                    stanzas.push(Stanza::Verse { number: counter, lines });
                    counter + 1
                };

                (stanzas, counter)
            });

        stanzas
    }
}
