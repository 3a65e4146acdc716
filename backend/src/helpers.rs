use regex::Regex;
use lazy_static::lazy_static;
use html_escape::decode_html_entities;

lazy_static! {
    static ref RE_COMMENT: Regex = Regex::new(r"(?s)<!--(.*?)-->").unwrap();
    static ref RE_TAG: Regex = Regex::new(r"</*\w[^>]*>").unwrap();
    static ref RE_BR: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
    static ref RE_SPACES: Regex = Regex::new(r"[ \t\u{00A0}]+").unwrap();
    static ref RE_SPACE_AROUND_NEWLINE: Regex = Regex::new(r" *\n *").unwrap();
    // Candidate run. Matching delimiters and word boundaries are checked in emphasis_runs().
    static ref RE_EMPHASIS_RUN: Regex = Regex::new(r"(\*\*|__|\*|_)([^*_\n]+?)(\*\*|__|\*|_)").unwrap();
}

/// Remove comments and tags, then decode entities.
///
/// Line breaks in the input are kept, so callers can split lines afterwards.
/// Anything that doesn't look like a tag (a lone `<`, a stray `>`) passes through.
pub fn strip_html(text: &str) -> String {
    let s = RE_COMMENT.replace_all(text, "");
    let s = RE_TAG.replace_all(&s, "");
    decode_html_entities(&s).to_string()
}

/// `<br>` variants to newlines, then strip the rest of the markup.
pub fn html_to_text(html: &str) -> String {
    let s = RE_BR.replace_all(html, "\n");
    strip_html(&s)
}

/// Collapse runs of spaces and tabs, drop the stray space a line break tends to leave
/// behind, and return the trimmed, non-empty lines.
pub fn normalize_lines(text: &str) -> Vec<String> {
    let s = text.replace("\r\n", "\n");
    let s = RE_SPACES.replace_all(&s, " ");
    let s = RE_SPACE_AROUND_NEWLINE.replace_all(&s, "\n");

    s.split('\n')
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// True if the text has something other than whitespace once the markup is gone.
pub fn has_visible_text(html: &str) -> bool {
    !html_to_text(html).trim().is_empty()
}

/// A markdown `*x*`, `**x**`, `_x_` or `__x__` run. `start..end` includes the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmphasisRun<'a> {
    pub start: usize,
    pub end: usize,
    pub inner: &'a str,
}

fn is_run_boundary(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '*' || c == '_'),
    }
}

/// Emphasis runs in document order.
///
/// A run opens and closes with the same delimiter and is not glued to a word or to
/// another delimiter on either side, so in `*glad* chorus *evermore*` the text between
/// the two runs is not a run.
pub fn emphasis_runs(text: &str) -> Vec<EmphasisRun<'_>> {
    let mut runs = Vec::new();
    let mut pos = 0;

    while let Some(caps) = RE_EMPHASIS_RUN.captures_at(text, pos) {
        let (Some(whole), Some(open), Some(inner), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3)) else {
            break;
        };

        let before = text[..whole.start()].chars().next_back();
        let after = text[whole.end()..].chars().next();

        if open.as_str() == close.as_str() && is_run_boundary(before) && is_run_boundary(after) {
            runs.push(EmphasisRun { start: whole.start(), end: whole.end(), inner: inner.as_str() });
            pos = whole.end();
        } else {
            // Delimiters are ASCII, so this stays on a char boundary.
            pos = whole.start() + 1;
        }
    }

    runs
}

/// Remove the emphasis runs whose inner text is accepted by `matches`.
///
/// With `trailing_colon`, a colon following a removed run (after optional spaces) goes too.
pub fn remove_emphasis_runs<F>(text: &str, matches: F, trailing_colon: bool) -> String
where
    F: Fn(&str) -> bool,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for run in emphasis_runs(text).into_iter().filter(|r| matches(r.inner)) {
        out.push_str(&text[last..run.start]);
        last = run.end;

        if trailing_colon {
            let rest = &text[last..];
            let after_spaces = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
            if after_spaces.starts_with(':') {
                last += rest.len() - after_spaces.len() + 1;
            }
        }
    }

    out.push_str(&text[last..]);
    out
}
