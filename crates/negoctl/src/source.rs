//! Where a result payload comes from: the backend or a saved file.

use nego_common::{BackendClient, NegoError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub enum ResultSource<'a> {
    Backend(&'a BackendClient),
    File(PathBuf),
}

impl<'a> ResultSource<'a> {
    pub fn new(client: &'a BackendClient, file: Option<PathBuf>) -> Self {
        match file {
            Some(path) => ResultSource::File(path),
            None => ResultSource::Backend(client),
        }
    }

    /// Fetch the complete payload; the caller normalizes it.
    pub async fn fetch(&self) -> Result<Value> {
        match self {
            ResultSource::Backend(client) => client.negotiation_results().await,
            ResultSource::File(path) => read_payload_file(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ResultSource::Backend(client) => client.base_url().to_string(),
            ResultSource::File(path) => path.display().to_string(),
        }
    }
}

/// Read a result set saved as JSON
pub fn read_payload_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| NegoError::malformed(format!("{} is not valid JSON: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_payload_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"negotiation_results": []}}"#).unwrap();
        let value = read_payload_file(file.path()).unwrap();
        assert!(value["negotiation_results"].is_array());
    }

    #[test]
    fn test_invalid_json_file_is_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            read_payload_file(file.path()),
            Err(NegoError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_payload_file(&dir.path().join("absent.json")),
            Err(NegoError::Io(_))
        ));
    }
}
