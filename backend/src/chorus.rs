//! Chorus detection.
//!
//! A block is a chorus when one of the [`ChorusLabels`] appears as the text of an
//! emphasis run. The same label outside emphasis is ordinary lyric text.

use regex::Regex;

use crate::helpers::{emphasis_runs, remove_emphasis_runs};

/// Labels recognized as chorus headings, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChorusLabels {
    labels: Vec<String>,
}

impl Default for ChorusLabels {
    fn default() -> Self {
        ChorusLabels {
            labels: ["CHORUS", "Chorus", "NNYESO", "Nnyeso", "KWAYA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ChorusLabels {
    pub fn new(labels: &[&str]) -> Self {
        ChorusLabels {
            labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        if !self.labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            self.labels.push(label.to_string());
        }
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Regex alternation of the escaped labels, e.g. `(?:CHORUS|Chorus|KWAYA)`.
    fn alternation(&self) -> String {
        let escaped: Vec<String> = self.labels.iter().map(|l| regex::escape(l)).collect();
        format!("(?:{})", escaped.join("|"))
    }
}

pub trait ChorusClassifier {
    /// Decide from the raw block markup whether it is a chorus.
    fn is_chorus(&self, block: &str) -> bool;

    /// Remove the chorus label from block text.
    fn strip_label(&self, text: &str) -> String;
}

/// Recognizes `<i>Chorus</i>`, `<b>KWAYA:</b>`, `<i><b>Nnyeso</b></i>`,
/// `<span style="..."><b>Chorus</b></span>` and the like.
#[derive(Debug, Clone)]
pub struct HtmlChorusClassifier {
    re_emphasis_label: Regex,
    re_label_prefix: Regex,
}

impl HtmlChorusClassifier {
    pub fn try_new(labels: &ChorusLabels) -> Result<Self, regex::Error> {
        let alt = labels.alternation();
        let re_emphasis_label = Regex::new(&format!(
            r"(?i)<(?:i|em|b|strong)\b[^>]*>\s*(?:<(?:i|em|b|strong|span|font)\b[^>]*>\s*)*{}\s*:?\s*</",
            alt
        ))?;
        // Applied after the tags are gone, so the label is plain text here.
        let re_label_prefix = Regex::new(&format!(r"(?i)^\s*{}\b\s*:?\s*", alt))?;

        Ok(HtmlChorusClassifier { re_emphasis_label, re_label_prefix })
    }
}

impl Default for HtmlChorusClassifier {
    fn default() -> Self {
        HtmlChorusClassifier::try_new(&ChorusLabels::default())
            .expect("default chorus labels must compile")
    }
}

impl ChorusClassifier for HtmlChorusClassifier {
    fn is_chorus(&self, block: &str) -> bool {
        self.re_emphasis_label.is_match(block)
    }

    fn strip_label(&self, text: &str) -> String {
        self.re_label_prefix.replace(text, "").to_string()
    }
}

/// Recognizes `**Chorus**`, `__KWAYA:__`, `*Nnyeso*` and `_Chorus_`.
///
/// The label has to be the whole text of one emphasis run.
#[derive(Debug, Clone)]
pub struct MarkdownChorusClassifier {
    re_label_text: Regex,
}

impl MarkdownChorusClassifier {
    pub fn try_new(labels: &ChorusLabels) -> Result<Self, regex::Error> {
        let re_label_text = Regex::new(&format!(r"(?i)^\s*{}\s*:?\s*$", labels.alternation()))?;
        Ok(MarkdownChorusClassifier { re_label_text })
    }

    fn is_label(&self, run_text: &str) -> bool {
        self.re_label_text.is_match(run_text)
    }
}

impl Default for MarkdownChorusClassifier {
    fn default() -> Self {
        MarkdownChorusClassifier::try_new(&ChorusLabels::default())
            .expect("default chorus labels must compile")
    }
}

impl ChorusClassifier for MarkdownChorusClassifier {
    fn is_chorus(&self, block: &str) -> bool {
        emphasis_runs(block).iter().any(|run| self.is_label(run.inner))
    }

    fn strip_label(&self, text: &str) -> String {
        remove_emphasis_runs(text, |run_text| self.is_label(run_text), true)
    }
}
