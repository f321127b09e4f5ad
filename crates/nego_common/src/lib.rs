//! Negotiation Common - result consolidation and query layer for
//! multi-satellite coalition negotiation runs.
//!
//! Raw backend payloads go through [`normalizer::normalize`] into
//! [`CanonicalResults`]; the [`resolver`] functions answer the view queries.

pub mod client;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod payload;
pub mod resolver;
pub mod types;
pub mod ui;

pub use client::{BackendClient, Initiator, LoadedData, NegotiationRequest};
pub use config::NegoConfig;
pub use error::{NegoError, Result};
pub use normalizer::{normalize, CanonicalResults, InitiatorGroup, PayloadShape};
pub use payload::{classify, ResultPayload};
pub use resolver::{
    attribute_initiator, find_task, find_task_by_query, flatten, resolve_status, summarize,
    FlatOutcome, OutcomeStatus, RunSummary,
};
pub use types::{
    CoalitionTable, MemoryCheck, Negotiation, NegotiationDetails, Phase, Preference, Proposal,
    ResponseRecord, Satellite, Task, TaskOutcome, TimeWindow, UtilityCalculation,
};
