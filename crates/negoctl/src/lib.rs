//! negoctl library - command handlers and rendering, shared with the
//! binary and the integration tests.

pub mod cli;
pub mod commands;
pub mod display;
pub mod errors;
pub mod json_types;
pub mod logging;
pub mod source;
