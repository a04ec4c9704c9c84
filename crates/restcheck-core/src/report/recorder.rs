//! Report lifecycle: open → begin_case → pass/fail → close
//!
//! Log lines can only be appended through the [`CaseLog`] returned by
//! [`Report::begin_case`], so there is no way to log before a case exists.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::document::{LogLine, Outcome, ReportDocument, ReportEntry, SystemInfo};
use super::html::render_html;

/// Environment labels and the document title for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMeta {
    pub os: String,
    pub tester: String,
    pub title: String,
}

impl ReportMeta {
    #[must_use]
    pub fn new(os: impl Into<String>, tester: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            tester: tester.into(),
            title: title.into(),
        }
    }
}

/// Files produced by [`Report::close`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportArtifacts {
    pub html: PathBuf,
    pub json: PathBuf,
}

/// Report context for one suite run.
///
/// Passed explicitly to every case. Flushed once, either by [`Report::close`]
/// or, if the report is dropped unclosed, on drop.
#[derive(Debug)]
pub struct Report {
    meta: ReportMeta,
    dir: PathBuf,
    started_at: String,
    entries: Vec<ReportEntry>,
    flushed: bool,
}

impl Report {
    /// Start a report whose artifacts will be written under `dir`.
    pub fn open(meta: ReportMeta, dir: impl AsRef<Path>) -> Self {
        tracing::debug!(title = %meta.title, dir = %dir.as_ref().display(), "report opened");
        Self {
            meta,
            dir: dir.as_ref().to_path_buf(),
            started_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            entries: Vec::new(),
            flushed: false,
        }
    }

    /// Create a new entry and return the handle that logs into it.
    pub fn begin_case(&mut self, name: &str, description: &str) -> CaseLog<'_> {
        tracing::info!(case = name, "begin case");
        let idx = self.entries.len();
        self.entries.push(ReportEntry::new(name, description));
        CaseLog {
            entry: &mut self.entries[idx],
        }
    }

    #[must_use]
    pub fn meta(&self) -> &ReportMeta {
        &self.meta
    }

    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// `{dir}/{title}_report.html`
    #[must_use]
    pub fn html_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}_report.html", file_stem(&self.meta.title)))
    }

    /// `{dir}/{title}_report.json`
    #[must_use]
    pub fn json_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}_report.json", file_stem(&self.meta.title)))
    }

    /// Snapshot of the current contents.
    #[must_use]
    pub fn document(&self) -> ReportDocument {
        ReportDocument::new(
            self.meta.title.clone(),
            self.started_at.clone(),
            vec![
                SystemInfo {
                    key: "operating system".into(),
                    value: self.meta.os.clone(),
                },
                SystemInfo {
                    key: "tester".into(),
                    value: self.meta.tester.clone(),
                },
            ],
            self.entries.clone(),
        )
    }

    /// Write the HTML and JSON artifacts.
    ///
    /// # Errors
    ///
    /// Returns error if the report directory or files cannot be written.
    pub fn close(mut self) -> Result<ReportArtifacts, ReportError> {
        self.flush()
    }

    fn flush(&mut self) -> Result<ReportArtifacts, ReportError> {
        // One attempt only, even if writing fails
        self.flushed = true;

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ReportError::Io(format!("create {}: {e}", self.dir.display())))?;

        let doc = self.document();
        let html = self.html_path();
        std::fs::write(&html, render_html(&doc))
            .map_err(|e| ReportError::Io(format!("write {}: {e}", html.display())))?;

        let json = self.json_path();
        let content =
            serde_json::to_string_pretty(&doc).map_err(|e| ReportError::Serialize(e.to_string()))?;
        std::fs::write(&json, content)
            .map_err(|e| ReportError::Io(format!("write {}: {e}", json.display())))?;

        tracing::info!(
            path = %html.display(),
            cases = doc.summary.total,
            failed = doc.summary.failed,
            "report written"
        );
        Ok(ReportArtifacts { html, json })
    }
}

impl Drop for Report {
    fn drop(&mut self) {
        if self.flushed {
            return;
        }
        tracing::warn!(title = %self.meta.title, "report dropped without close, flushing");
        if let Err(e) = self.flush() {
            tracing::error!(title = %self.meta.title, "failed to flush report: {e}");
        }
    }
}

/// Append-only handle to the active report entry.
///
/// A [`Report`] cannot log on its own:
///
/// ```compile_fail
/// use restcheck_core::{Report, ReportMeta};
///
/// let mut report = Report::open(ReportMeta::new("linux", "ci", "Suite"), "reports");
/// report.pass("no case has begun");
/// ```
#[derive(Debug)]
pub struct CaseLog<'r> {
    entry: &'r mut ReportEntry,
}

impl CaseLog<'_> {
    pub fn pass(&mut self, message: impl Into<String>) {
        self.push(Outcome::Pass, message.into());
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.push(Outcome::Fail, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Outcome::Info, message.into());
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.entry.failed_count() > 0
    }

    fn push(&mut self, outcome: Outcome, message: String) {
        match outcome {
            Outcome::Fail => tracing::warn!(case = %self.entry.name, "{outcome}: {message}"),
            _ => tracing::debug!(case = %self.entry.name, "{outcome}: {message}"),
        }
        self.entry.lines.push(LogLine { outcome, message });
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

/// Maximum characters kept from the title in artifact file names.
const MAX_STEM_LEN: usize = 120;

/// "Dog API: breeds" → "Dog_API__breeds"
fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .take(MAX_STEM_LEN)
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect();
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}
