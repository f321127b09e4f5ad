//! Payload classification.
//!
//! The backend reports a run in one of two shapes: a flat list of task
//! outcomes (one initiator) or a list of such lists (every satellite took a
//! turn as initiator). `classify` decides the shape once and hands back a
//! tagged value, so nothing downstream has to probe JSON again.

use crate::error::{NegoError, Result};
use crate::types::{CoalitionTable, FinalState, Satellite, StrategyPerformance, Task, TaskOutcome};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Envelope key of a `/start-negotiation` response
pub const WRAPPER_KEY: &str = "results";

pub const RESULTS_KEY: &str = "negotiation_results";

/// Everything in a result set besides the outcomes themselves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultEnvelope {
    pub timestamp: Option<String>,
    pub satellites: Vec<Satellite>,
    pub tasks: Vec<Task>,
    /// One table per initiator, in initiator order
    pub coalition_tables: Vec<CoalitionTable>,
    pub final_states: BTreeMap<String, FinalState>,
    pub strategy_performance: Option<StrategyPerformance>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleInitiatorPayload {
    pub envelope: ResultEnvelope,
    pub outcomes: Vec<TaskOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiInitiatorPayload {
    pub envelope: ResultEnvelope,
    pub groups: Vec<Vec<TaskOutcome>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    SingleInitiator(SingleInitiatorPayload),
    MultiInitiator(MultiInitiatorPayload),
}

impl ResultPayload {
    pub fn envelope(&self) -> &ResultEnvelope {
        match self {
            ResultPayload::SingleInitiator(p) => &p.envelope,
            ResultPayload::MultiInitiator(p) => &p.envelope,
        }
    }

    pub fn is_multi_initiator(&self) -> bool {
        matches!(self, ResultPayload::MultiInitiator(_))
    }
}

/// Strip the response envelope, if there is one.
///
/// Exactly one level: a `results` object inside a `results` object is left
/// alone.
pub fn unwrap_result_set(payload: &Value) -> &Value {
    match payload.get(WRAPPER_KEY) {
        Some(inner) if inner.is_object() => inner,
        _ => payload,
    }
}

/// Multi-initiator iff the first element of `negotiation_results` is itself a
/// list. Only the first element is inspected.
pub fn is_multi_initiator(negotiation_results: &[Value]) -> bool {
    negotiation_results.first().map_or(false, Value::is_array)
}

pub fn classify(payload: &Value) -> Result<ResultPayload> {
    let result_set = unwrap_result_set(payload);
    if !result_set.is_object() {
        return Err(NegoError::malformed("payload is not a JSON object"));
    }

    let raw_results = match result_set.get(RESULTS_KEY) {
        None | Some(Value::Null) => {
            return Err(NegoError::malformed(format!("missing `{}` field", RESULTS_KEY)))
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(NegoError::malformed(format!(
                "`{}` must be a list, got {}",
                RESULTS_KEY,
                json_kind(other)
            )))
        }
    };

    let envelope = parse_envelope(result_set);

    if is_multi_initiator(raw_results) {
        let groups = raw_results
            .iter()
            .enumerate()
            .map(|(index, group)| match group {
                Value::Array(items) => parse_outcomes(items, Some(index)),
                other => Err(NegoError::malformed(format!(
                    "initiator group {} is {}, expected a list",
                    index,
                    json_kind(other)
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(groups = groups.len(), "classified multi-initiator payload");
        Ok(ResultPayload::MultiInitiator(MultiInitiatorPayload { envelope, groups }))
    } else {
        let outcomes = parse_outcomes(raw_results, None)?;
        debug!(outcomes = outcomes.len(), "classified single-initiator payload");
        Ok(ResultPayload::SingleInitiator(SingleInitiatorPayload { envelope, outcomes }))
    }
}

/// Run metadata around the outcomes.
///
/// Only `negotiation_results` can make a payload malformed; an unreadable
/// metadata field or list entry is skipped with a warning.
fn parse_envelope(result_set: &Value) -> ResultEnvelope {
    // Single-initiator runs report their one table as `coalition_table`
    let coalition_tables = match result_set.get("coalition_tables") {
        Some(Value::Array(_)) => lenient_list(result_set, "coalition_tables"),
        _ => lenient_field::<CoalitionTable>(result_set, "coalition_table")
            .into_iter()
            .collect(),
    };

    ResultEnvelope {
        timestamp: lenient_field(result_set, "timestamp"),
        satellites: lenient_list(result_set, "satellites"),
        tasks: lenient_list(result_set, "tasks"),
        coalition_tables,
        final_states: lenient_field(result_set, "final_states").unwrap_or_default(),
        strategy_performance: lenient_field(result_set, "strategy_performance"),
    }
}

fn lenient_field<T: DeserializeOwned>(result_set: &Value, field: &str) -> Option<T> {
    match result_set.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => match T::deserialize(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(field, error = %e, "ignoring unreadable result set field");
                None
            }
        },
    }
}

fn lenient_list<T: DeserializeOwned>(result_set: &Value, field: &str) -> Vec<T> {
    match result_set.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match T::deserialize(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!(field, index, error = %e, "skipping unreadable entry");
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!(field, got = json_kind(other), "expected a list");
            Vec::new()
        }
    }
}

fn parse_outcomes(items: &[Value], group: Option<usize>) -> Result<Vec<TaskOutcome>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            TaskOutcome::deserialize(item).map_err(|e| {
                let position = match group {
                    Some(g) => format!("group {} outcome {}", g, index),
                    None => format!("outcome {}", index),
                };
                NegoError::malformed(format!("{}: {}", position, e))
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
