//! Tests for the server URL environment override.
//!
//! Kept in its own test binary because it mutates the process environment.

use std::io::Write;

use strictly_chess::{ClientConfig, SERVER_URL_ENV};

#[test]
fn test_environment_beats_file_and_flag_beats_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"base_url = "http://from-file:9000/""#).unwrap();

    // SAFETY: this is the only test in this binary, so no other thread reads
    // the environment concurrently.
    unsafe { std::env::set_var(SERVER_URL_ENV, "http://from-env:8000/") };

    let config = ClientConfig::load(file.path()).unwrap();
    assert_eq!(config.base_url(), "http://from-env:8000/");

    let config = config.with_url_override(Some("http://from-flag:7000/"));
    assert_eq!(config.base_url(), "http://from-flag:7000/");

    unsafe { std::env::set_var(SERVER_URL_ENV, "  ") };
    let config = ClientConfig::load(file.path()).unwrap();
    assert_eq!(config.base_url(), "http://from-file:9000/");

    unsafe { std::env::remove_var(SERVER_URL_ENV) };
}
