//! Negotiation run entities as reported by the backend.
//!
//! These are read-only snapshots. Apart from an outcome's `task_id`, every
//! field is optional: a missing value is carried as `None` (or empty) and the
//! display layer picks the fallback text.

use serde::{Deserialize, Serialize};

/// A satellite taking part in the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub memory_capacity: Option<f64>,
    #[serde(default)]
    pub available_memory: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coalition_table: Option<CoalitionTable>,
}

/// Observation window, in simulation hours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default)]
    pub start_time: Option<f64>,
    #[serde(default)]
    pub end_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub location_index: Option<i64>,
    #[serde(default, rename = "time_window")]
    pub time_windows: Vec<TimeWindow>,
    #[serde(default)]
    pub reward_points: Option<f64>,
    #[serde(default)]
    pub memory_required: Option<f64>,
}

/// Coalition preferences of one satellite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoalitionTable {
    #[serde(default)]
    pub satellite: Option<String>,
    #[serde(default)]
    pub preferences: Vec<Preference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default)]
    pub task_id: Option<i64>,
    #[serde(default)]
    pub preferred_satellites: Vec<String>,
    #[serde(default)]
    pub priority: Option<f64>,
}

/// One coalition's attempt at a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Negotiation {
    #[serde(default)]
    pub coalition: Vec<String>,
    #[serde(default)]
    pub agreement: Option<bool>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub agreement_details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<String>,
    #[serde(default)]
    pub negotiation_details: Option<NegotiationDetails>,
}

impl Negotiation {
    pub fn agreed(&self) -> bool {
        self.agreement.unwrap_or(false)
    }
}

/// Four independently time-ordered traces of a negotiation session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegotiationDetails {
    #[serde(default)]
    pub memory_checks: Vec<MemoryCheck>,
    #[serde(default)]
    pub utility_calculations: Vec<UtilityCalculation>,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub responses: Vec<ResponseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryCheck {
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub available_memory: Option<f64>,
    #[serde(default)]
    pub required_memory: Option<f64>,
    #[serde(default)]
    pub has_enough_memory: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilityCalculation {
    #[serde(default)]
    pub time: Option<f64>,
    /// Set when computed while proposing
    #[serde(default)]
    pub outcome: Option<String>,
    /// Set when computed while responding
    #[serde(default)]
    pub offer: Option<String>,
    #[serde(default)]
    pub base_utility: Option<f64>,
    #[serde(default)]
    pub reward_factor: Option<f64>,
    #[serde(default)]
    pub memory_factor: Option<f64>,
    #[serde(default)]
    pub memory_availability_factor: Option<f64>,
    #[serde(default)]
    pub adjusted_utility: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub satellite: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub base_utility: Option<f64>,
    #[serde(default)]
    pub adjusted_utility: Option<f64>,
    #[serde(default)]
    pub selected_index: Option<i64>,
    #[serde(default)]
    pub total_outcomes: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub satellite: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub offer: Option<String>,
    #[serde(default)]
    pub base_utility: Option<f64>,
    #[serde(default)]
    pub adjusted_utility: Option<f64>,
    #[serde(default)]
    pub base_threshold: Option<f64>,
    #[serde(default)]
    pub adjusted_threshold: Option<f64>,
    /// Verdict, e.g. `ACCEPT_OFFER` / `REJECT_OFFER`
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub current_step: Option<i64>,
    #[serde(default)]
    pub total_steps: Option<i64>,
}

/// All coalition attempts made for one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub task_id: i64,
    #[serde(default)]
    pub location_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiator: Option<String>,
    #[serde(default)]
    pub negotiations: Vec<Negotiation>,
}

impl TaskOutcome {
    /// Initiator named on the outcome itself, else on the first negotiation
    /// that names one.
    pub fn explicit_initiator(&self) -> Option<&str> {
        self.initiator
            .as_deref()
            .or_else(|| self.negotiations.iter().find_map(|n| n.initiator.as_deref()))
            .filter(|name| !name.is_empty())
    }
}

/// Per-satellite end state of a full run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalState {
    #[serde(default)]
    pub initial_memory: Option<f64>,
    #[serde(default)]
    pub final_available_memory: Option<f64>,
    #[serde(default)]
    pub final_reward: Option<f64>,
    #[serde(default)]
    pub memory_utilization: Option<String>,
    #[serde(default)]
    pub memory_cost: Option<String>,
}

/// Run-wide figures, preformatted by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyPerformance {
    #[serde(default)]
    pub average_memory_utilisation: Option<String>,
    #[serde(default)]
    pub average_reward_per_satellite: Option<String>,
    #[serde(default)]
    pub average_memory_cost: Option<String>,
    #[serde(default)]
    pub gini_coefficient: Option<String>,
}

/// Negotiation phase, banded on relative simulation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Early,
    Middle,
    Late,
}

impl Phase {
    pub const EARLY_END: f64 = 0.3;
    pub const MIDDLE_END: f64 = 0.7;

    pub fn from_time(relative_time: f64) -> Self {
        if relative_time < Self::EARLY_END {
            Phase::Early
        } else if relative_time < Self::MIDDLE_END {
            Phase::Middle
        } else {
            Phase::Late
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Early => "early",
            Phase::Middle => "middle",
            Phase::Late => "late",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
