//! JSON Schema export for the machine-readable report

use crate::report::ReportDocument;

/// JSON Schema of `*_report.json` files.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(ReportDocument);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
