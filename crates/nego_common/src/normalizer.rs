//! Result normalization.
//!
//! Turns either payload shape into one canonical, initiator-grouped value.
//! Nothing is cached: callers normalize the payload they currently hold every
//! time they query it.

use crate::error::Result;
use crate::payload::{self, ResultEnvelope, ResultPayload};
use crate::types::{
    CoalitionTable, FinalState, Satellite, StrategyPerformance, Task, TaskOutcome,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadShape {
    SingleInitiator,
    MultiInitiator,
}

/// Task outcomes negotiated by one initiator, in payload order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InitiatorGroup {
    /// Satellite named by the coalition table at this group's position
    pub initiator: Option<String>,
    pub outcomes: Vec<TaskOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalResults {
    pub shape: PayloadShape,
    pub timestamp: Option<String>,
    pub satellites: Vec<Satellite>,
    pub tasks: Vec<Task>,
    pub coalition_tables: Vec<CoalitionTable>,
    pub final_states: BTreeMap<String, FinalState>,
    pub strategy_performance: Option<StrategyPerformance>,
    pub groups: Vec<InitiatorGroup>,
}

impl CanonicalResults {
    pub fn outcome_count(&self) -> usize {
        self.groups.iter().map(|g| g.outcomes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.outcome_count() == 0
    }

    /// Satellite named by the coalition table at `index`
    pub fn table_satellite(&self, index: usize) -> Option<&str> {
        self.coalition_tables
            .get(index)
            .and_then(|t| t.satellite.as_deref())
    }

    fn from_envelope(shape: PayloadShape, envelope: ResultEnvelope) -> Self {
        Self {
            shape,
            timestamp: envelope.timestamp,
            satellites: envelope.satellites,
            tasks: envelope.tasks,
            coalition_tables: envelope.coalition_tables,
            final_states: envelope.final_states,
            strategy_performance: envelope.strategy_performance,
            groups: Vec::new(),
        }
    }
}

impl From<ResultPayload> for CanonicalResults {
    fn from(classified: ResultPayload) -> Self {
        match classified {
            ResultPayload::SingleInitiator(single) => {
                let mut canonical =
                    CanonicalResults::from_envelope(PayloadShape::SingleInitiator, single.envelope);
                // An empty run has no initiator to report
                if !single.outcomes.is_empty() {
                    let initiator = canonical.table_satellite(0).map(String::from);
                    canonical.groups.push(InitiatorGroup {
                        initiator,
                        outcomes: single.outcomes,
                    });
                }
                canonical
            }
            ResultPayload::MultiInitiator(multi) => {
                let mut canonical =
                    CanonicalResults::from_envelope(PayloadShape::MultiInitiator, multi.envelope);
                for (index, outcomes) in multi.groups.into_iter().enumerate() {
                    let initiator = canonical.table_satellite(index).map(String::from);
                    if initiator.is_none() {
                        warn!(group = index, "no coalition table satellite for initiator group");
                    }
                    canonical.groups.push(InitiatorGroup { initiator, outcomes });
                }
                canonical
            }
        }
    }
}

/// Normalize a raw `/negotiation-results` or `/start-negotiation` payload.
pub fn normalize(payload: &Value) -> Result<CanonicalResults> {
    let classified = payload::classify(payload)?;
    let canonical = CanonicalResults::from(classified);
    debug!(
        shape = ?canonical.shape,
        groups = canonical.groups.len(),
        outcomes = canonical.outcome_count(),
        "normalized negotiation results"
    );
    Ok(canonical)
}
