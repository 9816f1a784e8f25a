//! Shared test utilities for integration tests

use analytics_report::{Result, config::Config, transport::Transport};
use std::io::Write;
use tempfile::NamedTempFile;

mod stub;

pub use stub::StubTransport;

pub const SERVICE_ACCOUNT_KEY: &str = include_str!("../fixtures/service_account.json");

pub const TOKEN_RESPONSE: &str =
    r#"{"access_token":"ya29.test-token","token_type":"Bearer","expires_in":3599}"#;

/// Write `contents` to a temporary key file
pub fn key_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create key file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write key file");
    file
}

/// Config pointing at `file` for the given view
pub fn config(file: &NamedTempFile, view_id: &str) -> Config {
    Config {
        debug: false,
        keyfile: file.path().to_path_buf(),
        view_id: view_id.to_string(),
    }
}
