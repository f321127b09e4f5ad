//! Outcome resolution: the view-facing facts derived from canonical results.

use crate::error::{NegoError, Result};
use crate::normalizer::CanonicalResults;
use crate::types::{Negotiation, TaskOutcome};
use crate::ui::NOT_AVAILABLE;
use serde::Serialize;

/// Agreement status of one task outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeStatus {
    pub agreed: bool,
    /// Members of the agreeing coalition, comma separated, or `N/A`
    pub partner: String,
}

/// One row of the flat result table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatOutcome<'a> {
    pub initiator: String,
    pub group_index: usize,
    pub outcome: &'a TaskOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InitiatorTally {
    pub initiator: String,
    pub outcomes: usize,
    pub agreed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_outcomes: usize,
    pub agreed_outcomes: usize,
    pub per_initiator: Vec<InitiatorTally>,
}

impl RunSummary {
    pub fn agreement_rate(&self) -> f64 {
        if self.total_outcomes == 0 {
            0.0
        } else {
            self.agreed_outcomes as f64 / self.total_outcomes as f64
        }
    }
}

/// First outcome for `task_id`, scanning groups in order.
///
/// Later outcomes for the same task in other groups are not considered.
pub fn find_task(canonical: &CanonicalResults, task_id: i64) -> Result<&TaskOutcome> {
    canonical
        .groups
        .iter()
        .flat_map(|g| g.outcomes.iter())
        .find(|o| o.task_id == task_id)
        .ok_or_else(|| NegoError::NotFound(task_id.to_string()))
}

/// `find_task` for a user-typed id.
///
/// The whole trimmed query must be an integer: `"3abc"` matches nothing
/// rather than task 3.
pub fn find_task_by_query<'a>(
    canonical: &'a CanonicalResults,
    query: &str,
) -> Result<&'a TaskOutcome> {
    match query.trim().parse::<i64>() {
        Ok(task_id) => find_task(canonical, task_id),
        Err(_) => Err(NegoError::NotFound(query.trim().to_string())),
    }
}

/// First negotiation of the outcome that reached agreement
pub fn agreed_negotiation(outcome: &TaskOutcome) -> Option<&Negotiation> {
    outcome.negotiations.iter().find(|n| n.agreed())
}

pub fn resolve_status(outcome: &TaskOutcome) -> OutcomeStatus {
    match agreed_negotiation(outcome) {
        Some(negotiation) => OutcomeStatus {
            agreed: true,
            partner: coalition_label(&negotiation.coalition),
        },
        None => OutcomeStatus {
            agreed: false,
            partner: NOT_AVAILABLE.to_string(),
        },
    }
}

/// Coalition members as a display string; `N/A` when there are none
pub fn coalition_label(coalition: &[String]) -> String {
    if coalition.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        coalition.join(", ")
    }
}

/// Display initiator of `outcome` in group `group_index`.
///
/// Precedence: explicit initiator on the outcome (or its negotiations), the
/// group's first outcome's explicit initiator, the coalition table at the
/// same position, then `N/A`.
pub fn attribute_initiator(
    canonical: &CanonicalResults,
    group_index: usize,
    outcome: &TaskOutcome,
) -> String {
    if let Some(name) = outcome.explicit_initiator() {
        return name.to_string();
    }

    canonical
        .groups
        .get(group_index)
        .and_then(|g| g.outcomes.first())
        .and_then(TaskOutcome::explicit_initiator)
        .or_else(|| canonical.table_satellite(group_index))
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Every outcome of every group, group order then payload order, each tagged
/// with its display initiator.
pub fn flatten(canonical: &CanonicalResults) -> Vec<FlatOutcome<'_>> {
    canonical
        .groups
        .iter()
        .enumerate()
        .flat_map(|(group_index, group)| {
            group.outcomes.iter().map(move |outcome| FlatOutcome {
                initiator: attribute_initiator(canonical, group_index, outcome),
                group_index,
                outcome,
            })
        })
        .collect()
}

pub fn summarize(canonical: &CanonicalResults) -> RunSummary {
    let mut summary = RunSummary::default();

    for (group_index, group) in canonical.groups.iter().enumerate() {
        let agreed = group
            .outcomes
            .iter()
            .filter(|o| agreed_negotiation(o).is_some())
            .count();
        // Same label the flat rows carry for this group's first outcome
        let initiator = match group.outcomes.first() {
            Some(first) => attribute_initiator(canonical, group_index, first),
            None => canonical
                .table_satellite(group_index)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
        };

        summary.total_outcomes += group.outcomes.len();
        summary.agreed_outcomes += agreed;
        summary.per_initiator.push(InitiatorTally {
            initiator,
            outcomes: group.outcomes.len(),
            agreed,
        });
    }

    summary
}
