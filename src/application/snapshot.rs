use serde::{Deserialize, Serialize};

use super::{AppError, AppResult};
use crate::domain::Project;

/// On-disk shape of the board: `{"projects": [...]}`.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    projects: &'a [Project],
}

#[derive(Deserialize)]
struct SnapshotOwned {
    #[serde(default)]
    projects: Vec<Project>,
}

pub fn encode_snapshot(projects: &[Project]) -> AppResult<String> {
    serde_json::to_string(&SnapshotRef { projects })
        .map_err(|e| AppError::CorruptSnapshot(e.to_string()))
}

pub fn decode_snapshot(blob: &str) -> AppResult<Vec<Project>> {
    serde_json::from_str::<SnapshotOwned>(blob)
        .map(|s| s.projects)
        .map_err(|e| AppError::CorruptSnapshot(e.to_string()))
}
