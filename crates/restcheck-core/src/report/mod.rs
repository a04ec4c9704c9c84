//! Report module - per-case entries, recorder lifecycle, HTML/JSON artifacts

mod document;
mod html;
mod recorder;

pub use document::{LogLine, Outcome, ReportDocument, ReportEntry, ReportSummary, SystemInfo};
pub use html::render_html;
pub use recorder::{CaseLog, Report, ReportArtifacts, ReportError, ReportMeta};
