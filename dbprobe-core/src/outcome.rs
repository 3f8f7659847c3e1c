//! The canonical probe result and the static supported-kinds table.
//!
//! A [`ProbeOutcome`] is produced for every probe regardless of how it
//! ended; callers serialize it as-is.

use serde::{Deserialize, Serialize};

use crate::adapters::ConnectionReport;
use crate::descriptor::DatabaseKind;
use crate::error::{ProbeError, ProbeErrorKind};

/// Uniform result of one probe.
///
/// `version` and `databases` are present only on success; `error_kind`
/// only on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ProbeErrorKind>,
}

impl ProbeOutcome {
    /// Assembles the success outcome from a connection report and the
    /// (possibly empty) database list.
    pub fn from_report(report: ConnectionReport, databases: Vec<String>) -> Self {
        Self {
            success: true,
            message: report.message,
            version: report.version,
            databases: Some(databases),
            error_kind: None,
        }
    }

    /// Normalizes any probe error into the failure outcome.
    pub fn failure(error: &ProbeError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            version: None,
            databases: None,
            error_kind: Some(error.kind()),
        }
    }
}

/// One row of the supported-kinds table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindInfo {
    pub kind: String,
    pub display_name: String,
    pub default_port: Option<u16>,
    pub description: String,
}

/// The fixed table of supported database kinds. No I/O.
pub fn supported_kinds() -> Vec<KindInfo> {
    DatabaseKind::ALL
        .iter()
        .map(|kind| KindInfo {
            kind: kind.as_str().to_string(),
            display_name: kind.display_name().to_string(),
            default_port: kind.default_port(),
            description: kind.description().to_string(),
        })
        .collect()
}
