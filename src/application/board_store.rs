use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use super::{
    decode_snapshot, encode_snapshot, AppError, AppResult, BoardChange, BoardEvent,
    SnapshotWriter,
};
use crate::domain::*;
use crate::ports::{AppConfig, BlobStore, IdGenerator, DEFAULT_STORAGE_KEY};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct BoardSettings {
    /// Key the whole board is saved under.
    pub storage_key: String,
    /// Column names seeded into every new project, left to right.
    pub default_columns: Vec<String>,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl From<&AppConfig> for BoardSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            default_columns: config.default_columns.clone(),
        }
    }
}

/// Where a dragged card was picked up or dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropLocation {
    pub column_id: ColumnId,
    pub index: usize,
}

/// Owns every project, column and task of the board.
///
/// Each mutation runs under the write lock: the in-memory change is applied,
/// the full snapshot is queued for the [`BlobStore`], and subscribers get a
/// [`BoardEvent`]. Saving happens on a background task after the lock is
/// released, so slow or stuck storage never holds up the board. Targets that
/// do not exist turn a mutation into a no-op that returns `None` and persists
/// nothing.
///
/// Construct it from within a Tokio runtime.
pub struct BoardStore {
    writer: SnapshotWriter,
    ids: Arc<dyn IdGenerator>,
    settings: BoardSettings,
    projects: RwLock<Vec<Project>>,
    events: broadcast::Sender<BoardEvent>,
}

impl BoardStore {
    pub fn new(blob_store: Arc<dyn BlobStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self::with_settings(blob_store, ids, BoardSettings::default())
    }

    pub fn with_settings(
        blob_store: Arc<dyn BlobStore>,
        ids: Arc<dyn IdGenerator>,
        settings: BoardSettings,
    ) -> Self {
        Self::from_projects(blob_store, ids, settings, Vec::new())
    }

    /// Load the last saved snapshot, then build the store around it.
    pub async fn open(
        blob_store: Arc<dyn BlobStore>,
        ids: Arc<dyn IdGenerator>,
        settings: BoardSettings,
    ) -> AppResult<Self> {
        let projects = match blob_store.load(&settings.storage_key).await? {
            Some(blob) => decode_snapshot(&blob)?,
            None => {
                tracing::debug!("No snapshot under '{}', starting empty", settings.storage_key);
                Vec::new()
            }
        };

        tracing::info!(
            "Loaded {} projects from '{}'",
            projects.len(),
            settings.storage_key
        );

        Ok(Self::from_projects(blob_store, ids, settings, projects))
    }

    fn from_projects(
        blob_store: Arc<dyn BlobStore>,
        ids: Arc<dyn IdGenerator>,
        settings: BoardSettings,
        projects: Vec<Project>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            writer: SnapshotWriter::spawn(blob_store, settings.storage_key.clone()),
            ids,
            settings,
            projects: RwLock::new(projects),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.events.subscribe()
    }

    /// Wait until every snapshot queued so far has reached storage.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    /// Newest project first.
    pub async fn projects_list(&self) -> Vec<Project> {
        self.projects.read().await.clone()
    }

    pub async fn get_project_by_id(&self, id: &ProjectId) -> Option<Project> {
        self.projects
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    pub async fn resolve_path(&self, path: &ProjectPath) -> PathResolution {
        let projects = self.projects.read().await;
        match projects.iter().find(|p| p.id == path.id) {
            None => PathResolution::NotFound,
            Some(project) if project.slug == path.as_slug() => {
                PathResolution::Found(project.clone())
            }
            Some(project) => PathResolution::Redirect {
                canonical_slug: project.slug.clone(),
            },
        }
    }

    pub async fn create_project(&self, name: &str, description: Option<String>) -> ProjectId {
        let mut projects = self.projects.write().await;

        let project_id = ProjectId::from(self.ids.next_id());
        let columns = self
            .settings
            .default_columns
            .iter()
            .map(|name| Column::new(ColumnId::from(self.ids.next_id()), name.as_str()))
            .collect();
        let project = Project::new(project_id.clone(), name, description, columns);

        tracing::info!("Created project {}", project.slug);
        projects.insert(0, project);

        let change = BoardChange::ProjectCreated {
            project_id: project_id.clone(),
        };
        self.commit(&projects, change);
        project_id
    }

    /// Replace a project in place. The slug is re-derived from the incoming name.
    pub async fn update_project(&self, project: Project) -> Option<BoardChange> {
        let mut projects = self.projects.write().await;

        let Some(index) = projects.iter().position(|p| p.id == project.id) else {
            tracing::debug!("update_project: no project {}", project.id);
            return None;
        };

        let mut project = project;
        project.refresh_slug();
        project.normalize_task_columns();

        let change = BoardChange::ProjectUpdated {
            project_id: project.id.clone(),
        };
        tracing::info!("Updated project {}", project.slug);
        projects[index] = project;

        self.commit(&projects, change.clone());
        Some(change)
    }

    pub async fn delete_project(&self, project_id: &ProjectId) -> Option<BoardChange> {
        let mut projects = self.projects.write().await;

        let Some(index) = projects.iter().position(|p| &p.id == project_id) else {
            tracing::debug!("delete_project: no project {}", project_id);
            return None;
        };

        let removed = projects.remove(index);
        tracing::info!(
            "Deleted project {} with {} columns and {} tasks",
            removed.slug,
            removed.columns.len(),
            removed.task_count()
        );

        let change = BoardChange::ProjectDeleted {
            project_id: project_id.clone(),
        };
        self.commit(&projects, change.clone());
        Some(change)
    }

    pub async fn create_project_column(
        &self,
        project_id: &ProjectId,
        column_name: &str,
    ) -> Option<BoardChange> {
        let mut projects = self.projects.write().await;

        let Some(project) = find_project(&mut projects, project_id) else {
            tracing::debug!("create_project_column: no project {}", project_id);
            return None;
        };

        let column_id = ColumnId::from(self.ids.next_id());
        project
            .columns
            .push(Column::new(column_id.clone(), column_name));

        let change = BoardChange::ColumnCreated {
            project_id: project_id.clone(),
            column_id,
        };
        self.commit(&projects, change.clone());
        Some(change)
    }

    /// Remove a column together with every task in it.
    pub async fn delete_project_column(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
    ) -> Option<BoardChange> {
        let mut projects = self.projects.write().await;

        let Some(project) = find_project(&mut projects, project_id) else {
            tracing::debug!("delete_project_column: no project {}", project_id);
            return None;
        };
        let Some(index) = project.column_index(column_id) else {
            tracing::debug!("delete_project_column: no column {} in {}", column_id, project_id);
            return None;
        };
        project.columns.remove(index);

        let change = BoardChange::ColumnDeleted {
            project_id: project_id.clone(),
            column_id: column_id.clone(),
        };
        self.commit(&projects, change.clone());
        Some(change)
    }

    pub async fn create_project_column_task(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        new_task: NewTask,
    ) -> Option<BoardChange> {
        let mut projects = self.projects.write().await;

        let Some(column) = find_column(&mut projects, project_id, column_id) else {
            tracing::debug!(
                "create_project_column_task: no column {} in {}",
                column_id,
                project_id
            );
            return None;
        };

        let task_id = TaskId::from(self.ids.next_id());
        column
            .tasks
            .push(Task::from_new(task_id.clone(), column_id.clone(), new_task));

        let change = BoardChange::TaskCreated {
            project_id: project_id.clone(),
            column_id: column_id.clone(),
            task_id,
        };
        self.commit(&projects, change.clone());
        Some(change)
    }

    /// Save an edited task. `task.column` names where it should end up: the
    /// same column keeps its slot, another column gets it appended at the end.
    /// Either way the stored task is the edited value passed in here.
    pub async fn update_project_column_task(
        &self,
        project_id: &ProjectId,
        source_column_id: &ColumnId,
        task: Task,
    ) -> Option<BoardChange> {
        let mut projects = self.projects.write().await;

        let Some(project) = find_project(&mut projects, project_id) else {
            tracing::debug!("update_project_column_task: no project {}", project_id);
            return None;
        };
        let (Some(source), Some(destination)) = (
            project.column_index(source_column_id),
            project.column_index(&task.column),
        ) else {
            tracing::debug!(
                "update_project_column_task: missing column {} or {} in {}",
                source_column_id,
                task.column,
                project_id
            );
            return None;
        };
        let Some(task_index) = project.columns[source].task_index(&task.id) else {
            tracing::debug!(
                "update_project_column_task: no task {} in column {}",
                task.id,
                source_column_id
            );
            return None;
        };

        let change = BoardChange::TaskUpdated {
            project_id: project_id.clone(),
            from_column: source_column_id.clone(),
            to_column: task.column.clone(),
            task_id: task.id.clone(),
        };

        if source == destination {
            project.columns[source].tasks[task_index] = task;
        } else {
            project.columns[source].tasks.remove(task_index);
            project.columns[destination].tasks.push(task);
        }

        self.commit(&projects, change.clone());
        Some(change)
    }

    pub async fn delete_project_column_task(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        task_id: &TaskId,
    ) -> Option<BoardChange> {
        let mut projects = self.projects.write().await;

        let Some(column) = find_column(&mut projects, project_id, column_id) else {
            tracing::debug!(
                "delete_project_column_task: no column {} in {}",
                column_id,
                project_id
            );
            return None;
        };
        let Some(index) = column.task_index(task_id) else {
            tracing::debug!(
                "delete_project_column_task: no task {} in column {}",
                task_id,
                column_id
            );
            return None;
        };
        column.tasks.remove(index);

        let change = BoardChange::TaskDeleted {
            project_id: project_id.clone(),
            column_id: column_id.clone(),
            task_id: task_id.clone(),
        };
        self.commit(&projects, change.clone());
        Some(change)
    }

    /// Move the task at `start_index` to `end_index` within one column.
    ///
    /// Indices follow remove-then-insert semantics, so `end_index` addresses
    /// the list after the task has been taken out. Both must be `< len`.
    pub async fn reorder_project_task(
        &self,
        project_id: &ProjectId,
        column_id: &ColumnId,
        start_index: usize,
        end_index: usize,
    ) -> AppResult<Option<BoardChange>> {
        let mut projects = self.projects.write().await;

        let Some(column) = find_column(&mut projects, project_id, column_id) else {
            tracing::debug!("reorder_project_task: no column {} in {}", column_id, project_id);
            return Ok(None);
        };
        reorder_within(&mut column.tasks, start_index, end_index)?;

        let change = BoardChange::TaskReordered {
            project_id: project_id.clone(),
            column_id: column_id.clone(),
            start_index,
            end_index,
        };
        self.commit(&projects, change.clone());
        Ok(Some(change))
    }

    /// Take the task at `start_index` out of one column and insert it at
    /// `end_index` of another. `end_index` may equal the destination length.
    pub async fn move_project_task(
        &self,
        project_id: &ProjectId,
        source_column_id: &ColumnId,
        dest_column_id: &ColumnId,
        start_index: usize,
        end_index: usize,
    ) -> AppResult<Option<BoardChange>> {
        let mut projects = self.projects.write().await;

        let Some(project) = find_project(&mut projects, project_id) else {
            tracing::debug!("move_project_task: no project {}", project_id);
            return Ok(None);
        };
        let (Some(source), Some(destination)) = (
            project.column_index(source_column_id),
            project.column_index(dest_column_id),
        ) else {
            tracing::debug!(
                "move_project_task: missing column {} or {} in {}",
                source_column_id,
                dest_column_id,
                project_id
            );
            return Ok(None);
        };

        let change = if source == destination {
            reorder_within(&mut project.columns[source].tasks, start_index, end_index)?;
            BoardChange::TaskReordered {
                project_id: project_id.clone(),
                column_id: source_column_id.clone(),
                start_index,
                end_index,
            }
        } else {
            let source_len = project.columns[source].tasks.len();
            let dest_len = project.columns[destination].tasks.len();
            check_index(start_index, source_len)?;
            if end_index > dest_len {
                return Err(AppError::IndexOutOfRange {
                    index: end_index,
                    len: dest_len,
                });
            }

            let mut task = project.columns[source].tasks.remove(start_index);
            task.column = dest_column_id.clone();
            let task_id = task.id.clone();
            project.columns[destination].tasks.insert(end_index, task);

            BoardChange::TaskMoved {
                project_id: project_id.clone(),
                from_column: source_column_id.clone(),
                to_column: dest_column_id.clone(),
                task_id,
                end_index,
            }
        };

        self.commit(&projects, change.clone());
        Ok(Some(change))
    }

    /// Route a finished drag: same column reorders, another column moves,
    /// no destination (dropped outside any column) does nothing.
    pub async fn apply_drop(
        &self,
        project_id: &ProjectId,
        source: &DropLocation,
        destination: Option<&DropLocation>,
    ) -> AppResult<Option<BoardChange>> {
        let Some(destination) = destination else {
            return Ok(None);
        };

        if source.column_id == destination.column_id {
            self.reorder_project_task(project_id, &source.column_id, source.index, destination.index)
                .await
        } else {
            self.move_project_task(
                project_id,
                &source.column_id,
                &destination.column_id,
                source.index,
                destination.index,
            )
            .await
        }
    }

    fn commit(&self, projects: &[Project], change: BoardChange) {
        match encode_snapshot(projects) {
            Ok(blob) => self.writer.enqueue(blob),
            Err(e) => tracing::warn!("Failed to encode board snapshot after {:?}: {}", change, e),
        }

        // Nobody listening is fine.
        let _ = self.events.send(BoardEvent {
            change,
            projects: Arc::from(projects),
        });
    }
}

fn find_project<'a>(projects: &'a mut [Project], id: &ProjectId) -> Option<&'a mut Project> {
    projects.iter_mut().find(|p| &p.id == id)
}

fn find_column<'a>(
    projects: &'a mut [Project],
    project_id: &ProjectId,
    column_id: &ColumnId,
) -> Option<&'a mut Column> {
    find_project(projects, project_id)?.column_mut(column_id)
}

fn check_index(index: usize, len: usize) -> AppResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(AppError::IndexOutOfRange { index, len })
    }
}

fn reorder_within(tasks: &mut Vec<Task>, start_index: usize, end_index: usize) -> AppResult<()> {
    check_index(start_index, tasks.len())?;
    check_index(end_index, tasks.len())?;

    let task = tasks.remove(start_index);
    tasks.insert(end_index, task);
    Ok(())
}
