//! Where the per-language hymn lists come from: a directory of `<base>.json` files,
//! or the same files at some git revision.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use thiserror::Error;

use crate::types::RawHymn;

#[derive(Error, Debug)]
pub enum SourceError {
    /// Missing file, unreadable file, failed git command. The language is skipped.
    #[error("Source for '{base}' is unavailable: {reason}")]
    Unavailable { base: String, reason: String },

    /// The source was read but is not a list of hymns.
    #[error("Source for '{base}' is not a valid hymn list: {source}")]
    Invalid {
        base: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait HymnSource {
    fn read_language(&self, base_name: &str) -> Result<Vec<RawHymn>, SourceError>;

    /// Short description for log messages.
    fn describe(&self) -> String;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HymnList {
    Bare(Vec<RawHymn>),
    Wrapped { hymns: Vec<RawHymn> },
}

/// Accepts `[ {...}, ... ]` or `{ "hymns": [ {...}, ... ] }`.
pub fn parse_hymns_json(base: &str, text: &str) -> Result<Vec<RawHymn>, SourceError> {
    // Parse to a Value first, so a malformed document reports the real syntax error
    // rather than the untagged enum's generic one.
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| SourceError::Invalid { base: base.to_string(), source: e })?;

    let list: HymnList = serde_json::from_value(value)
        .map_err(|e| SourceError::Invalid { base: base.to_string(), source: e })?;

    Ok(match list {
        HymnList::Bare(hymns) => hymns,
        HymnList::Wrapped { hymns } => hymns,
    })
}

#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: &Path) -> Self {
        DirSource { dir: dir.to_path_buf() }
    }

    pub fn file_path(&self, base_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", base_name))
    }
}

impl HymnSource for DirSource {
    fn read_language(&self, base_name: &str) -> Result<Vec<RawHymn>, SourceError> {
        let path = self.file_path(base_name);
        let text = fs::read_to_string(&path).map_err(|e| SourceError::Unavailable {
            base: base_name.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        parse_hymns_json(base_name, &text)
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

/// Reads `<path>/<base>.json` as it was at `rev`, with `git show`.
#[derive(Debug, Clone)]
pub struct GitSnapshotSource {
    repo: PathBuf,
    rev: String,
    path: String,
}

impl GitSnapshotSource {
    pub fn new(repo: &Path, rev: &str, path: &str) -> Self {
        GitSnapshotSource {
            repo: repo.to_path_buf(),
            rev: rev.to_string(),
            path: path.trim_matches('/').to_string(),
        }
    }

    /// The `<rev>:<path>` object name passed to `git show`.
    pub fn object_name(&self, base_name: &str) -> String {
        if self.path.is_empty() {
            format!("{}:{}.json", self.rev, base_name)
        } else {
            format!("{}:{}/{}.json", self.rev, self.path, base_name)
        }
    }
}

impl HymnSource for GitSnapshotSource {
    fn read_language(&self, base_name: &str) -> Result<Vec<RawHymn>, SourceError> {
        let object = self.object_name(base_name);
        let unavailable = |reason: String| SourceError::Unavailable {
            base: base_name.to_string(),
            reason,
        };

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo)
            .arg("show")
            .arg(&object)
            .output()
            .map_err(|e| unavailable(format!("failed to run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(unavailable(format!("git show {} failed: {}", object, stderr.trim())));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| unavailable(format!("{} is not UTF-8: {}", object, e)))?;

        parse_hymns_json(base_name, &text)
    }

    fn describe(&self) -> String {
        format!("{} at {}", self.repo.display(), self.rev)
    }
}
