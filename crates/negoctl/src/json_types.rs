//! Stable JSON output types for `--json`
//!
//! Machine-readable output for scripts. Field names are part of the
//! interface; bump `SCHEMA_VERSION` when they change.

use nego_common::resolver::{flatten, resolve_status, summarize, RunSummary};
use nego_common::{CanonicalResults, PayloadShape, TaskOutcome};
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "1";

/// One row of the results table
#[derive(Debug, Clone, Serialize)]
pub struct ResultRowJson {
    pub initiator: String,
    pub partner: String,
    pub task_id: i64,
    pub location_index: Option<i64>,
    pub agreed: bool,
}

/// JSON output for `results` and `negotiate`
#[derive(Debug, Clone, Serialize)]
pub struct ResultsJson {
    pub schema_version: String,
    /// When negoctl produced this document (RFC 3339)
    pub generated_at: String,
    /// Run timestamp reported by the backend
    pub timestamp: Option<String>,
    pub shape: PayloadShape,
    pub rows: Vec<ResultRowJson>,
    pub summary: RunSummary,
}

impl ResultsJson {
    pub fn from_canonical(canonical: &CanonicalResults) -> Self {
        let rows = flatten(canonical)
            .into_iter()
            .map(|row| {
                let status = resolve_status(row.outcome);
                ResultRowJson {
                    initiator: row.initiator,
                    partner: status.partner,
                    task_id: row.outcome.task_id,
                    location_index: row.outcome.location_index,
                    agreed: status.agreed,
                }
            })
            .collect();

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            timestamp: canonical.timestamp.clone(),
            shape: canonical.shape,
            rows,
            summary: summarize(canonical),
        }
    }
}

/// JSON output for `detail`
#[derive(Debug, Clone, Serialize)]
pub struct DetailJson<'a> {
    pub schema_version: String,
    pub agreed: bool,
    pub partner: String,
    pub outcome: &'a TaskOutcome,
}

impl<'a> DetailJson<'a> {
    pub fn from_outcome(outcome: &'a TaskOutcome) -> Self {
        let status = resolve_status(outcome);
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            agreed: status.agreed,
            partner: status.partner,
            outcome,
        }
    }
}
