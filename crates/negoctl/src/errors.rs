//! Error codes and exit status for negoctl

use nego_common::ui::{print_err, print_info};
use nego_common::NegoError;

pub use nego_common::error::{
    EXIT_BACKEND_UNAVAILABLE, EXIT_GENERAL_ERROR, EXIT_MALFORMED_PAYLOAD, EXIT_NOT_FOUND,
};

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<NegoError>().map_or(EXIT_GENERAL_ERROR, NegoError::exit_code)
}

/// Print the failure the way its kind calls for and return the exit code.
///
/// A missing task is informational; everything else is an error.
pub fn report(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<NegoError>() {
        Some(NegoError::NotFound(task_id)) => {
            print_info(&format!("No negotiation details available for task {}", task_id));
        }
        _ => print_err(&format!("{:#}", err)),
    }
    exit_code_for(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_codes() {
        let malformed = anyhow::Error::from(NegoError::malformed("missing"));
        assert_eq!(exit_code_for(&malformed), EXIT_MALFORMED_PAYLOAD);

        let missing = anyhow::Error::from(NegoError::NotFound("4".into()));
        assert_eq!(exit_code_for(&missing), EXIT_NOT_FOUND);

        let down = anyhow::Error::from(NegoError::BackendUnavailable("refused".into()));
        assert_eq!(exit_code_for(&down), EXIT_BACKEND_UNAVAILABLE);

        let other = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&other), EXIT_GENERAL_ERROR);
    }

    #[test]
    fn test_exit_code_survives_context() {
        let result: Result<(), NegoError> = Err(NegoError::malformed("missing"));
        let err = result.context("reading run.json").unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_MALFORMED_PAYLOAD);
    }
}
