//! Document buffers and the artifacts derived from a finished post.

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

const WORDS_PER_MINUTE: usize = 200;

/// Text accumulated while streaming. Only grows.
#[derive(Debug, Default)]
pub struct StreamedDocument {
    text: String,
}

impl StreamedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// End the streaming phase. The returned buffer can only be rewritten.
    pub fn freeze(self) -> FrozenDocument {
        FrozenDocument { text: self.text }
    }
}

/// Text after streaming has finished, rewritten once per resolved marker.
#[derive(Debug)]
pub struct FrozenDocument {
    text: String,
}

impl FrozenDocument {
    /// Replace every occurrence of `marker`. Returns whether anything changed.
    pub fn substitute(&mut self, marker: &str, replacement: &str) -> bool {
        if marker.is_empty() || !self.text.contains(marker) {
            return false;
        }
        self.text = self.text.replace(marker, replacement);
        true
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentMetrics {
    pub word_count: usize,
    pub char_count: usize,
    pub reading_time_minutes: usize,
}

impl DocumentMetrics {
    pub fn from_text(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        Self {
            word_count,
            char_count: text.chars().count(),
            reading_time_minutes: (word_count / WORDS_PER_MINUTE).max(1),
        }
    }
}

/// Lossy plain-text variant: `#` and `**` are deleted outright.
pub fn plain_text(markdown: &str) -> String {
    markdown.replace('#', "").replace("**", "")
}

/// File name stem for downloads, e.g. `"My Post"` -> `"My_Post"`.
///
/// Separators and characters that are not valid in file names become `_`,
/// as does a leading `.`, so the stem always names a plain file in the
/// output directory.
pub fn export_file_stem(title: &str) -> String {
    title
        .chars()
        .enumerate()
        .map(|(i, c)| match c {
            ' ' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            '.' if i == 0 => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Locations of the markdown and plain-text downloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub markdown: PathBuf,
    pub plain_text: PathBuf,
}

/// Write `<stem>.md` and `<stem>.txt` into `dir`, creating it if needed.
pub fn write_exports(dir: &Path, title: &str, markdown: &str) -> Result<ExportPaths> {
    fs::create_dir_all(dir)?;

    let stem = export_file_stem(title);
    let paths = ExportPaths {
        markdown: dir.join(format!("{}.md", stem)),
        plain_text: dir.join(format!("{}.txt", stem)),
    };

    fs::write(&paths.markdown, markdown)?;
    fs::write(&paths.plain_text, plain_text(markdown))?;
    tracing::info!("Saved markdown to {}", paths.markdown.display());
    tracing::info!("Saved plain text to {}", paths.plain_text.display());

    Ok(paths)
}
