use serde::Serialize;
use std::sync::Arc;

use crate::domain::{ColumnId, Project, ProjectId, TaskId};

/// What a single applied mutation changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardChange {
    ProjectCreated {
        project_id: ProjectId,
    },
    ProjectUpdated {
        project_id: ProjectId,
    },
    ProjectDeleted {
        project_id: ProjectId,
    },
    ColumnCreated {
        project_id: ProjectId,
        column_id: ColumnId,
    },
    ColumnDeleted {
        project_id: ProjectId,
        column_id: ColumnId,
    },
    TaskCreated {
        project_id: ProjectId,
        column_id: ColumnId,
        task_id: TaskId,
    },
    TaskUpdated {
        project_id: ProjectId,
        from_column: ColumnId,
        to_column: ColumnId,
        task_id: TaskId,
    },
    TaskDeleted {
        project_id: ProjectId,
        column_id: ColumnId,
        task_id: TaskId,
    },
    TaskReordered {
        project_id: ProjectId,
        column_id: ColumnId,
        start_index: usize,
        end_index: usize,
    },
    TaskMoved {
        project_id: ProjectId,
        from_column: ColumnId,
        to_column: ColumnId,
        task_id: TaskId,
        end_index: usize,
    },
}

impl BoardChange {
    pub fn project_id(&self) -> &ProjectId {
        match self {
            BoardChange::ProjectCreated { project_id }
            | BoardChange::ProjectUpdated { project_id }
            | BoardChange::ProjectDeleted { project_id }
            | BoardChange::ColumnCreated { project_id, .. }
            | BoardChange::ColumnDeleted { project_id, .. }
            | BoardChange::TaskCreated { project_id, .. }
            | BoardChange::TaskUpdated { project_id, .. }
            | BoardChange::TaskDeleted { project_id, .. }
            | BoardChange::TaskReordered { project_id, .. }
            | BoardChange::TaskMoved { project_id, .. } => project_id,
        }
    }
}

/// Broadcast to subscribers after every applied mutation.
#[derive(Debug, Clone)]
pub struct BoardEvent {
    pub change: BoardChange,
    pub projects: Arc<[Project]>,
}
