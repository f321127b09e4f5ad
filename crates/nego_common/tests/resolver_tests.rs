//! Resolver tests: task lookup, agreement status, initiator attribution,
//! flattening and run summaries.

use nego_common::{
    attribute_initiator, find_task, flatten, normalize, resolve_status, summarize, NegoError,
    TaskOutcome,
};
use serde_json::{json, Value};

fn outcome(task_id: i64, location_index: i64) -> Value {
    json!({"task_id": task_id, "location_index": location_index, "negotiations": []})
}

fn agreed_outcome(task_id: i64, coalition: &[&str]) -> Value {
    json!({
        "task_id": task_id,
        "location_index": 0,
        "negotiations": [
            {"coalition": ["sat9"], "agreement": false, "result": "timeout"},
            {"coalition": coalition, "agreement": true, "agreement_details": "(60, 40)"}
        ]
    })
}

fn two_group_payload() -> Value {
    json!({
        "coalition_tables": [{"satellite": "sat1"}, {"satellite": "sat2"}],
        "negotiation_results": [
            [outcome(1, 10), outcome(2, 20)],
            [outcome(2, 99), outcome(3, 30)]
        ]
    })
}

#[test]
fn test_find_task_returns_first_match_in_group_order() {
    let canonical = normalize(&two_group_payload()).unwrap();

    let found = find_task(&canonical, 2).unwrap();
    assert_eq!(found.location_index, Some(20));

    let found = find_task(&canonical, 3).unwrap();
    assert_eq!(found.location_index, Some(30));
}

#[test]
fn test_find_task_not_found() {
    let canonical = normalize(&two_group_payload()).unwrap();
    let err = find_task(&canonical, 42).unwrap_err();
    assert!(matches!(err, NegoError::NotFound(ref id) if id == "42"));
    assert!(err.is_not_found());
}

#[test]
fn test_find_task_in_empty_results() {
    let canonical = normalize(&json!({"negotiation_results": []})).unwrap();
    assert!(find_task(&canonical, 1).unwrap_err().is_not_found());
}

#[test]
fn test_resolve_status_first_agreement() {
    let outcome: TaskOutcome =
        serde_json::from_value(agreed_outcome(1, &["SatA", "SatB"])).unwrap();
    let status = resolve_status(&outcome);
    assert!(status.agreed);
    assert_eq!(status.partner, "SatA, SatB");
}

#[test]
fn test_resolve_status_picks_earliest_agreement() {
    let outcome: TaskOutcome = serde_json::from_value(json!({
        "task_id": 1,
        "negotiations": [
            {"coalition": ["sat2"], "agreement": true},
            {"coalition": ["sat3"], "agreement": true}
        ]
    }))
    .unwrap();
    assert_eq!(resolve_status(&outcome).partner, "sat2");
}

#[test]
fn test_resolve_status_without_agreement() {
    let outcome: TaskOutcome = serde_json::from_value(json!({
        "task_id": 1,
        "negotiations": [
            {"coalition": ["sat2"], "agreement": false},
            {"coalition": ["sat3"]}
        ]
    }))
    .unwrap();
    let status = resolve_status(&outcome);
    assert!(!status.agreed);
    assert_eq!(status.partner, "N/A");

    let no_attempts: TaskOutcome = serde_json::from_value(outcome_with_no_attempts()).unwrap();
    assert!(!resolve_status(&no_attempts).agreed);
}

fn outcome_with_no_attempts() -> Value {
    json!({"task_id": 5, "negotiations": []})
}

#[test]
fn test_explicit_initiator_beats_positional() {
    let payload = json!({
        "coalition_tables": [{"satellite": "sat1"}, {"satellite": "sat2"}],
        "negotiation_results": [
            [{"task_id": 1, "initiator": "sat5", "negotiations": []}],
            [{"task_id": 2, "negotiations": []}]
        ]
    });
    let canonical = normalize(&payload).unwrap();

    let first = &canonical.groups[0].outcomes[0];
    assert_eq!(attribute_initiator(&canonical, 0, first), "sat5");

    let second = &canonical.groups[1].outcomes[0];
    assert_eq!(attribute_initiator(&canonical, 1, second), "sat2");
}

#[test]
fn test_attribution_falls_back_to_na() {
    let payload = json!({"negotiation_results": [[{"task_id": 1}], [{"task_id": 2}]]});
    let canonical = normalize(&payload).unwrap();
    let outcome = &canonical.groups[1].outcomes[0];
    assert_eq!(attribute_initiator(&canonical, 1, outcome), "N/A");
}

#[test]
fn test_single_initiator_attribution_uses_singular_table() {
    let payload = json!({
        "coalition_table": {"satellite": "sat3"},
        "negotiation_results": [outcome(1, 0), outcome(2, 0)]
    });
    let canonical = normalize(&payload).unwrap();
    let rows = flatten(&canonical);
    assert!(rows.iter().all(|r| r.initiator == "sat3"));
}

#[test]
fn test_flatten_concatenates_in_group_order() {
    let canonical = normalize(&two_group_payload()).unwrap();
    let rows = flatten(&canonical);

    assert_eq!(rows.len(), canonical.outcome_count());
    let order: Vec<(String, i64, Option<i64>)> = rows
        .iter()
        .map(|r| (r.initiator.clone(), r.outcome.task_id, r.outcome.location_index))
        .collect();
    assert_eq!(
        order,
        vec![
            ("sat1".to_string(), 1, Some(10)),
            ("sat1".to_string(), 2, Some(20)),
            ("sat2".to_string(), 2, Some(99)),
            ("sat2".to_string(), 3, Some(30)),
        ]
    );
    assert_eq!(rows[2].group_index, 1);
}

#[test]
fn test_flatten_twice_is_deterministic() {
    let payload = two_group_payload();
    let first = normalize(&payload).unwrap();
    let second = normalize(&payload).unwrap();
    assert_eq!(flatten(&first), flatten(&second));
}

#[test]
fn test_summarize_counts_agreements_per_initiator() {
    let payload = json!({
        "coalition_tables": [{"satellite": "sat1"}, {"satellite": "sat2"}],
        "negotiation_results": [
            [agreed_outcome(1, &["sat2"]), outcome(2, 0)],
            [agreed_outcome(1, &["sat1"]), agreed_outcome(3, &["sat3"])]
        ]
    });
    let canonical = normalize(&payload).unwrap();
    let summary = summarize(&canonical);

    assert_eq!(summary.total_outcomes, 4);
    assert_eq!(summary.agreed_outcomes, 3);
    assert_eq!(summary.agreement_rate(), 0.75);
    assert_eq!(summary.per_initiator.len(), 2);
    assert_eq!(summary.per_initiator[0].initiator, "sat1");
    assert_eq!(summary.per_initiator[0].agreed, 1);
    assert_eq!(summary.per_initiator[1].outcomes, 2);
    assert_eq!(summary.per_initiator[1].agreed, 2);
}

#[test]
fn test_group_inherits_first_outcome_initiator() {
    let payload = json!({
        "coalition_tables": [{"satellite": "sat1"}],
        "negotiation_results": [[
            {"task_id": 1, "initiator": "sat7", "negotiations": []},
            {"task_id": 2, "negotiations": []}
        ]]
    });
    let canonical = normalize(&payload).unwrap();

    let initiators: Vec<String> = flatten(&canonical).into_iter().map(|r| r.initiator).collect();
    assert_eq!(initiators, vec!["sat7", "sat7"]);

    let second = &canonical.groups[0].outcomes[1];
    assert_eq!(attribute_initiator(&canonical, 0, second), "sat7");
}

#[test]
fn test_negotiation_initiator_beats_table() {
    let payload = json!({
        "coalition_tables": [{"satellite": "sat1"}, {"satellite": "sat2"}],
        "negotiation_results": [
            [{"task_id": 1, "negotiations": []}],
            [{"task_id": 2, "negotiations": [
                {"coalition": ["sat1"], "agreement": false},
                {"coalition": ["sat3"], "agreement": true, "initiator": "sat5"}
            ]}]
        ]
    });
    let canonical = normalize(&payload).unwrap();

    let outcome = &canonical.groups[1].outcomes[0];
    assert_eq!(attribute_initiator(&canonical, 1, outcome), "sat5");

    let rows = flatten(&canonical);
    assert_eq!(rows[0].initiator, "sat1");
    assert_eq!(rows[1].initiator, "sat5");
}

#[test]
fn test_summary_labels_match_flat_rows() {
    let payload = json!({
        "coalition_tables": [{"satellite": "sat1"}, {"satellite": "sat2"}],
        "negotiation_results": [
            [{"task_id": 1, "initiator": "sat7", "negotiations": []}],
            [{"task_id": 2, "negotiations": []}]
        ]
    });
    let canonical = normalize(&payload).unwrap();
    let summary = summarize(&canonical);

    let tally_names: Vec<&str> = summary
        .per_initiator
        .iter()
        .map(|t| t.initiator.as_str())
        .collect();
    assert_eq!(tally_names, vec!["sat7", "sat2"]);

    let row_names: Vec<String> = flatten(&canonical).into_iter().map(|r| r.initiator).collect();
    assert_eq!(row_names, vec!["sat7", "sat2"]);
}

#[test]
fn test_summary_of_empty_group_uses_table_name() {
    let payload = json!({
        "coalition_tables": [{"satellite": "sat1"}, {"satellite": "sat2"}],
        "negotiation_results": [[{"task_id": 1}], []]
    });
    let summary = summarize(&normalize(&payload).unwrap());
    assert_eq!(summary.per_initiator[1].initiator, "sat2");
    assert_eq!(summary.per_initiator[1].outcomes, 0);
}
