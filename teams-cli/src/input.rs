//! Activity files: one activity object or a JSON array of them.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use teams_core::Activity;

pub fn load_activities(path: &Path) -> Result<Vec<Activity>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Read activity file {}", path.display()))?;
    parse_activities(&raw).with_context(|| format!("Parse activities in {}", path.display()))
}

pub fn parse_activities(raw: &str) -> Result<Vec<Activity>> {
    let value: Value = serde_json::from_str(raw)?;
    let activities = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Activity>, _>>()?,
        single => vec![serde_json::from_value(single)?],
    };
    Ok(activities)
}
