//! Display helpers for negoctl screens.
//!
//! Renderers return strings; command handlers print them. Numeric fields go
//! through the `ui` formatters so absent values show as `N/A`.

use nego_common::resolver::{coalition_label, flatten, resolve_status, RunSummary};
use nego_common::types::{
    MemoryCheck, Negotiation, NegotiationDetails, Proposal, ResponseRecord, Satellite, Task,
    TaskOutcome, TimeWindow, UtilityCalculation,
};
use nego_common::ui::{colors, fmt_fixed, fmt_flag, fmt_opt, render_table, HR, NOT_AVAILABLE};
use nego_common::{CanonicalResults, Phase};
use owo_colors::OwoColorize;

/// Simulation times
const TIME_PRECISION: usize = 2;
/// Utilities, factors and thresholds
const UTILITY_PRECISION: usize = 4;

pub const AGREEMENT_REACHED: &str = "Agreement Reached";
pub const NO_AGREEMENT: &str = "No Agreement";

pub fn status_label(agreed: bool) -> String {
    if agreed {
        AGREEMENT_REACHED.green().to_string()
    } else {
        NO_AGREEMENT.red().to_string()
    }
}

fn title(text: &str) -> String {
    format!("{}{}{}\n{}{}{}\n", colors::HEADER, text, colors::RESET, colors::DIM, HR, colors::RESET)
}

fn subtitle(text: &str) -> String {
    format!("{}\n", text.bold())
}

fn satellite_name(satellite: &Satellite) -> &str {
    if satellite.name.is_empty() {
        NOT_AVAILABLE
    } else {
        &satellite.name
    }
}

fn hour(value: Option<f64>) -> String {
    match value {
        Some(h) => format!("{}:00", h),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn render_satellites(satellites: &[Satellite]) -> String {
    let rows: Vec<Vec<String>> = satellites
        .iter()
        .map(|s| {
            vec![
                satellite_name(s).to_string(),
                fmt_opt(s.memory_capacity),
                fmt_opt(s.available_memory),
            ]
        })
        .collect();

    let mut out = title("Satellites");
    out.push_str(&render_table(&["Name", "Memory Capacity", "Available Memory"], &rows));
    out
}

pub fn render_coalition_tables(satellites: &[Satellite]) -> String {
    let mut out = String::new();
    for satellite in satellites {
        let Some(table) = &satellite.coalition_table else {
            continue;
        };
        let rows: Vec<Vec<String>> = table
            .preferences
            .iter()
            .map(|p| {
                vec![
                    fmt_opt(p.task_id),
                    coalition_label(&p.preferred_satellites),
                    fmt_opt(p.priority),
                ]
            })
            .collect();

        out.push('\n');
        out.push_str(&subtitle(&format!("Coalition Table for {}", satellite_name(satellite))));
        out.push_str(&render_table(&["Task ID", "Preferred Satellites", "Priority"], &rows));
    }
    out
}

/// `8:00 - 10:00, 14:00 - 15:00`
pub fn format_time_windows(windows: &[TimeWindow]) -> String {
    if windows.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    windows
        .iter()
        .map(|w| format!("{} - {}", hour(w.start_time), hour(w.end_time)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_tasks(tasks: &[Task]) -> String {
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                fmt_opt(t.id),
                fmt_opt(t.location_index),
                format_time_windows(&t.time_windows),
                fmt_opt(t.reward_points),
                fmt_opt(t.memory_required),
            ]
        })
        .collect();

    let mut out = title("Tasks");
    out.push_str(&render_table(
        &["ID", "Location Index", "Time Windows", "Reward", "Memory Required"],
        &rows,
    ));
    out
}

/// The flat results table, one row per task outcome across all initiators
pub fn render_results(canonical: &CanonicalResults) -> String {
    let mut out = title("Negotiation Results");
    out.push_str(&format!(
        "Timestamp: {}\n\n",
        canonical.timestamp.as_deref().unwrap_or(NOT_AVAILABLE)
    ));

    if canonical.is_empty() {
        out.push_str("No negotiation results available\n");
        return out;
    }

    let rows: Vec<Vec<String>> = flatten(canonical)
        .into_iter()
        .map(|row| {
            let status = resolve_status(row.outcome);
            vec![
                row.initiator,
                status.partner,
                row.outcome.task_id.to_string(),
                fmt_opt(row.outcome.location_index),
                status_label(status.agreed),
            ]
        })
        .collect();

    out.push_str(&render_table(
        &["Initiator", "Partner", "Task ID", "Location Index", "Status"],
        &rows,
    ));
    out
}

pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = subtitle("Summary");
    out.push_str(&format!(
        "{} of {} tasks reached agreement ({:.1}%)\n",
        summary.agreed_outcomes,
        summary.total_outcomes,
        summary.agreement_rate() * 100.0
    ));

    if summary.per_initiator.len() > 1 {
        let rows: Vec<Vec<String>> = summary
            .per_initiator
            .iter()
            .map(|t| vec![t.initiator.clone(), t.outcomes.to_string(), t.agreed.to_string()])
            .collect();
        out.push_str(&render_table(&["Initiator", "Tasks", "Agreements"], &rows));
    }
    out
}

/// Strategy performance and per-satellite end state, when the run reported them
pub fn render_performance(canonical: &CanonicalResults) -> Option<String> {
    if canonical.strategy_performance.is_none() && canonical.final_states.is_empty() {
        return None;
    }

    let mut out = String::new();
    if let Some(perf) = &canonical.strategy_performance {
        out.push_str(&subtitle("Strategy Performance"));
        let kw = 30;
        for (key, value) in [
            ("average memory utilisation", &perf.average_memory_utilisation),
            ("average reward per satellite", &perf.average_reward_per_satellite),
            ("average memory cost", &perf.average_memory_cost),
            ("gini coefficient", &perf.gini_coefficient),
        ] {
            out.push_str(&format!(
                "{:width$} {}\n",
                key,
                value.as_deref().unwrap_or(NOT_AVAILABLE),
                width = kw
            ));
        }
    }

    if !canonical.final_states.is_empty() {
        // Satellite list order first, then any extra names
        let mut names: Vec<&str> = canonical
            .satellites
            .iter()
            .map(|s| s.name.as_str())
            .filter(|name| canonical.final_states.contains_key(*name))
            .collect();
        for name in canonical.final_states.keys() {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }

        let rows: Vec<Vec<String>> = names
            .into_iter()
            .map(|name| {
                let state = &canonical.final_states[name];
                vec![
                    name.to_string(),
                    fmt_opt(state.initial_memory),
                    fmt_opt(state.final_available_memory),
                    fmt_opt(state.final_reward),
                    fmt_opt(state.memory_utilization.as_deref()),
                    fmt_opt(state.memory_cost.as_deref()),
                ]
            })
            .collect();

        out.push('\n');
        out.push_str(&subtitle("Final States"));
        out.push_str(&render_table(
            &[
                "Satellite",
                "Initial Memory",
                "Final Memory",
                "Reward",
                "Utilisation",
                "Memory Cost",
            ],
            &rows,
        ));
    }

    Some(out)
}

pub fn render_detail(outcome: &TaskOutcome) -> String {
    let mut out = title(&format!(
        "Task {} - Location {}",
        outcome.task_id,
        fmt_opt(outcome.location_index)
    ));

    if outcome.negotiations.is_empty() {
        out.push_str("No negotiation details available\n");
        return out;
    }

    for (index, negotiation) in outcome.negotiations.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_negotiation(index + 1, negotiation));
    }
    out
}

fn render_negotiation(number: usize, negotiation: &Negotiation) -> String {
    let mut out = format!(
        "{}[{}coalition {}{}]{} {}   {}\n",
        colors::DIM,
        colors::RESET,
        number,
        colors::DIM,
        colors::RESET,
        coalition_label(&negotiation.coalition),
        status_label(negotiation.agreed())
    );

    let kw = 18;
    out.push_str(&format!(
        "  {:width$} {}\n",
        "result",
        negotiation.result.as_deref().unwrap_or(NOT_AVAILABLE),
        width = kw
    ));
    if let Some(details) = &negotiation.agreement_details {
        out.push_str(&format!("  {:width$} {}\n", "agreement details", details, width = kw));
    }

    if let Some(details) = &negotiation.negotiation_details {
        out.push_str(&render_negotiation_details(details));
    }
    out
}

pub fn render_negotiation_details(details: &NegotiationDetails) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&subtitle("Memory Checks"));
    out.push_str(&render_table(
        &["Time", "Available Memory", "Required Memory", "Has Enough Memory"],
        &details.memory_checks.iter().map(memory_check_row).collect::<Vec<_>>(),
    ));

    out.push('\n');
    out.push_str(&subtitle("Utility Calculations"));
    out.push_str(&render_table(
        &[
            "Time",
            "Phase",
            "Base Utility",
            "Reward Factor",
            "Memory Factor",
            "Memory Availability",
            "Adjusted Utility",
        ],
        &details.utility_calculations.iter().map(utility_row).collect::<Vec<_>>(),
    ));

    out.push('\n');
    out.push_str(&subtitle("Proposals"));
    out.push_str(&render_table(
        &["Time", "Satellite", "Phase", "Outcome", "Base Utility", "Adjusted Utility"],
        &details.proposals.iter().map(proposal_row).collect::<Vec<_>>(),
    ));

    out.push('\n');
    out.push_str(&subtitle("Responses"));
    out.push_str(&render_table(
        &[
            "Time",
            "Satellite",
            "Phase",
            "Offer",
            "Base Utility",
            "Adjusted Utility",
            "Base Threshold",
            "Adjusted Threshold",
            "Response",
        ],
        &details.responses.iter().map(response_row).collect::<Vec<_>>(),
    ));

    out
}

fn memory_check_row(check: &MemoryCheck) -> Vec<String> {
    vec![
        fmt_fixed(check.time, TIME_PRECISION),
        fmt_opt(check.available_memory),
        fmt_opt(check.required_memory),
        fmt_flag(check.has_enough_memory),
    ]
}

fn utility_row(calc: &UtilityCalculation) -> Vec<String> {
    vec![
        fmt_fixed(calc.time, TIME_PRECISION),
        fmt_opt(calc.time.map(Phase::from_time)),
        fmt_fixed(calc.base_utility, UTILITY_PRECISION),
        fmt_fixed(calc.reward_factor, UTILITY_PRECISION),
        fmt_fixed(calc.memory_factor, UTILITY_PRECISION),
        fmt_fixed(calc.memory_availability_factor, UTILITY_PRECISION),
        fmt_fixed(calc.adjusted_utility, UTILITY_PRECISION),
    ]
}

fn proposal_row(proposal: &Proposal) -> Vec<String> {
    vec![
        fmt_fixed(proposal.time, TIME_PRECISION),
        fmt_opt(proposal.satellite.as_deref()),
        fmt_opt(proposal.phase.as_deref()),
        fmt_opt(proposal.outcome.as_deref()),
        fmt_fixed(proposal.base_utility, UTILITY_PRECISION),
        fmt_fixed(proposal.adjusted_utility, UTILITY_PRECISION),
    ]
}

fn response_row(response: &ResponseRecord) -> Vec<String> {
    vec![
        fmt_fixed(response.time, TIME_PRECISION),
        fmt_opt(response.satellite.as_deref()),
        fmt_opt(response.phase.as_deref()),
        fmt_opt(response.offer.as_deref()),
        fmt_fixed(response.base_utility, UTILITY_PRECISION),
        fmt_fixed(response.adjusted_utility, UTILITY_PRECISION),
        fmt_fixed(response.base_threshold, UTILITY_PRECISION),
        fmt_fixed(response.adjusted_threshold, UTILITY_PRECISION),
        fmt_opt(response.response.as_deref()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_windows() {
        let windows = [
            TimeWindow { start_time: Some(8.0), end_time: Some(10.0) },
            TimeWindow { start_time: Some(14.0), end_time: Some(15.0) },
        ];
        assert_eq!(format_time_windows(&windows), "8:00 - 10:00, 14:00 - 15:00");
        assert_eq!(format_time_windows(&[]), "N/A");

        let open_ended = [TimeWindow { start_time: Some(8.0), end_time: None }];
        assert_eq!(format_time_windows(&open_ended), "8:00 - N/A");
    }

    #[test]
    fn test_utility_row_precision_and_phase() {
        let calc = UtilityCalculation {
            time: Some(0.456),
            base_utility: Some(0.9),
            adjusted_utility: Some(0.123456),
            ..Default::default()
        };
        let row = utility_row(&calc);
        assert_eq!(row[0], "0.46");
        assert_eq!(row[1], "middle");
        assert_eq!(row[2], "0.9000");
        assert_eq!(row[3], "N/A");
        assert_eq!(row[6], "0.1235");
    }

    #[test]
    fn test_memory_check_row() {
        let check = MemoryCheck {
            time: Some(0.0),
            available_memory: Some(80.0),
            required_memory: Some(30.0),
            has_enough_memory: Some(true),
        };
        assert_eq!(memory_check_row(&check), vec!["0.00", "80", "30", "Yes"]);
    }
}
