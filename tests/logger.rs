//! End-to-end behaviour through the default console and file sinks.

use std::fs;

use chrono::Utc;
use contextlog::format::json::parse_json;
use contextlog::{Level, Logger, LoggerConfig, LoggerOptions};
use serde_json::json;
use tempfile::TempDir;

fn today_log(dir: &std::path::Path) -> std::path::PathBuf {
    dir.join(format!("{}.log", Utc::now().format("%Y-%m-%d")))
}

#[test]
fn logger_with_empty_path_returns_itself() {
    let logger = Logger::new("");
    assert_eq!(logger.path(), std::path::Path::new(""));

    let returned = logger.disable_file().info("hello");
    assert!(std::ptr::eq(returned, &logger));
    assert!(!logger.file_enabled());
}

#[test]
fn records_reach_the_daily_file() {
    let temp = TempDir::new().unwrap();
    let logger = Logger::new(temp.path());

    let request = logger.with_session(&json!({"request_id": "r-1"})).with_tags(["api"]);
    request
        .info_with("Build *done*", &json!({"artifacts": 3}))
        .success("shipped");
    request.flush();

    let content = fs::read_to_string(today_log(temp.path())).unwrap();
    let records: Vec<_> = content.lines().map(|l| parse_json(l).unwrap()).collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].level, Level::Info);
    assert_eq!(records[0].message, "Build *done*");
    assert_eq!(records[0].data, Some(json!({"artifacts": 3})));
    assert_eq!(records[0].session, Some(json!({"request_id": "r-1"})));
    assert_eq!(records[0].tags, Some(vec!["api".to_string()]));
    assert_eq!(records[1].level, Level::Success);
}

#[test]
fn disabling_file_keeps_context() {
    let temp = TempDir::new().unwrap();
    let logger = Logger::new(temp.path());
    logger.add_session(&json!({"job": "nightly"}));

    logger.disable_file().info("not in file");
    assert!(!today_log(temp.path()).exists());

    logger.enable_file().info("in file");
    let content = fs::read_to_string(today_log(temp.path())).unwrap();
    let records: Vec<_> = content.lines().map(|l| parse_json(l).unwrap()).collect();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "in file");
    assert_eq!(records[0].session, Some(json!({"job": "nightly"})));
}

#[test]
fn file_level_threshold_from_config() {
    let temp = TempDir::new().unwrap();
    let config = LoggerConfig::from_json_str(r#"{"file": {"min_level": "warn"}}"#).unwrap();
    let logger =
        Logger::with_options(LoggerOptions::new(temp.path()).with_config(config)).unwrap();

    logger.debug("dropped").info("dropped").warn("kept").divider();

    let content = fs::read_to_string(today_log(temp.path())).unwrap();
    let messages: Vec<String> = content
        .lines()
        .map(|l| parse_json(l).unwrap().message)
        .collect();
    assert_eq!(messages, vec!["kept"]);
}
