#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use assert_cmd::Command;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use savings_core::{
    config::{Config, ConfigManager},
    core::{FixedClock, Session},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn config_manager() -> ConfigManager {
    ConfigManager::with_base_dir(temp_home()).expect("create config manager for temp dir")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn session_on(today: NaiveDate) -> Session {
    Session::with_clock(Config::default(), Box::new(FixedClock::new(today)))
}

/// Script-mode CLI pinned to `today`, isolated in its own home directory.
pub fn script_cli(today: &str) -> Command {
    let mut cmd = Command::cargo_bin("savings_core_cli").expect("binary built");
    cmd.env("SAVINGS_CORE_CLI_SCRIPT", "1")
        .env("SAVINGS_CORE_HOME", temp_home())
        .env("SAVINGS_CORE_TODAY", today)
        .env_remove("RUST_LOG");
    cmd
}
