use crate::chorus::{ChorusLabels, HtmlChorusClassifier, MarkdownChorusClassifier};
use crate::html_stanzas::HtmlStanzaParser;
use crate::markdown_stanzas::MarkdownStanzaParser;
use crate::types::{HymnContent, HymnRecord, LanguageDescriptor, RawHymn, Stanza, StanzaParser};
use crate::logger;

/// Both segmenters, sharing one chorus label set.
#[derive(Debug, Clone, Default)]
pub struct Parsers {
    pub html: HtmlStanzaParser,
    pub markdown: MarkdownStanzaParser,
}

impl Parsers {
    pub fn with_labels(labels: &ChorusLabels) -> Result<Self, regex::Error> {
        Ok(Parsers {
            html: HtmlStanzaParser::with_classifier(HtmlChorusClassifier::try_new(labels)?),
            markdown: MarkdownStanzaParser::with_classifier(MarkdownChorusClassifier::try_new(labels)?),
        })
    }

    /// `None` for missing content.
    pub fn parse_content(&self, content: &HymnContent) -> Option<Vec<Stanza>> {
        match content {
            HymnContent::Html(html) => Some(self.html.parse(html)),
            HymnContent::Markdown(md) => Some(self.markdown.parse(md)),
            HymnContent::Missing => None,
        }
    }

    pub fn assemble_hymn(&self, raw: &RawHymn, language: &LanguageDescriptor) -> HymnRecord {
        let stanzas = match self.parse_content(&raw.hymn_content()) {
            Some(stanzas) => stanzas,
            None => {
                logger::warn(&format!(
                    "Hymn {} ({}) has no content or markdown, writing it without stanzas",
                    raw.number, language.code
                ));
                Vec::new()
            }
        };

        HymnRecord {
            number: raw.number,
            language: language.code.clone(),
            title: raw.title.trim().to_string(),
            stanzas,
        }
    }

    pub fn assemble_hymns(&self, raws: &[RawHymn], language: &LanguageDescriptor) -> Vec<HymnRecord> {
        raws.iter().map(|raw| self.assemble_hymn(raw, language)).collect()
    }
}

/// Assemble with the default chorus labels.
pub fn assemble_hymn(raw: &RawHymn, language: &LanguageDescriptor) -> HymnRecord {
    Parsers::default().assemble_hymn(raw, language)
}

pub fn assemble_hymns(raws: &[RawHymn], language: &LanguageDescriptor) -> Vec<HymnRecord> {
    Parsers::default().assemble_hymns(raws, language)
}
