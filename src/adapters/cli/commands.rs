use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use serde_json::{json, Value};

use crate::application::{BoardChange, BoardStore};
use crate::domain::{
    ColumnId, DueDate, NewTask, PathResolution, Priority, ProjectId, ProjectPath, Task, TaskId,
};

pub fn build_command() -> Command {
    let project_arg = || {
        Arg::new("project")
            .value_name("PROJECT_ID")
            .help("Project ID")
            .required(true)
    };
    let column_arg = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .value_name("COLUMN_ID")
            .help(help)
            .required(true)
    };
    let index_arg = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .help(help)
            .required(true)
            .value_parser(value_parser!(usize))
    };
    let task_fields = [
        Arg::new("due")
            .long("due")
            .value_name("DATE")
            .help("Due date: epoch milliseconds or a date string"),
        Arg::new("assign")
            .long("assign")
            .value_name("WHO")
            .help("Assignee"),
        Arg::new("priority")
            .long("priority")
            .value_name("LEVEL")
            .help("low, medium or high"),
        Arg::new("description")
            .long("description")
            .short('d')
            .value_name("TEXT")
            .help("Task description"),
    ];

    Command::new("taskboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Kanban-style project and task board")
        .arg(
            Arg::new("data_dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding the board (can also be set via TASKBOARD_DATA_DIR)")
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("projects")
                .about("Project operations")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List projects, newest first"))
                .subcommand(
                    Command::new("show")
                        .about("Show a project by ID or by ID/slug path")
                        .arg(Arg::new("path").value_name("PATH").required(true)),
                )
                .subcommand(
                    Command::new("create")
                        .about("Create a project with the default columns")
                        .arg(Arg::new("name").value_name("NAME").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .short('d')
                                .value_name("TEXT"),
                        ),
                )
                .subcommand(
                    Command::new("update")
                        .about("Rename or re-describe a project")
                        .arg(project_arg())
                        .arg(Arg::new("name").long("name").value_name("NAME"))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .short('d')
                                .value_name("TEXT"),
                        ),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a project and everything in it")
                        .arg(project_arg()),
                ),
        )
        .subcommand(
            Command::new("columns")
                .about("Column operations")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about("Append a column")
                        .arg(project_arg())
                        .arg(Arg::new("name").value_name("NAME").required(true)),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a column and its tasks")
                        .arg(project_arg())
                        .arg(column_arg("column", "Column ID")),
                ),
        )
        .subcommand(
            Command::new("tasks")
                .about("Task operations")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List tasks column by column")
                        .arg(project_arg())
                        .arg(
                            Arg::new("column")
                                .long("column")
                                .value_name("COLUMN_ID")
                                .help("Only this column"),
                        )
                        .arg(
                            Arg::new("overdue")
                                .long("overdue")
                                .help("Only tasks whose due date has passed")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("add")
                        .about("Append a task to a column")
                        .arg(project_arg())
                        .arg(column_arg("column", "Column ID"))
                        .arg(Arg::new("title").value_name("TITLE").required(true))
                        .args(task_fields.clone()),
                )
                .subcommand(
                    Command::new("update")
                        .about("Edit a task, optionally sending it to another column")
                        .arg(project_arg())
                        .arg(column_arg("column", "Column currently holding the task"))
                        .arg(Arg::new("task").value_name("TASK_ID").required(true))
                        .arg(Arg::new("title").long("title").value_name("TITLE"))
                        .arg(
                            Arg::new("to_column")
                                .long("to-column")
                                .value_name("COLUMN_ID"),
                        )
                        .args(task_fields),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a task")
                        .arg(project_arg())
                        .arg(column_arg("column", "Column ID"))
                        .arg(Arg::new("task").value_name("TASK_ID").required(true)),
                )
                .subcommand(
                    Command::new("reorder")
                        .about("Move a task to another slot in the same column")
                        .arg(project_arg())
                        .arg(column_arg("column", "Column ID"))
                        .arg(index_arg("from", "Current index"))
                        .arg(index_arg("to", "Target index")),
                )
                .subcommand(
                    Command::new("move")
                        .about("Move a task into another column at a given index")
                        .arg(project_arg())
                        .arg(column_arg("from_column", "Source column ID"))
                        .arg(column_arg("to_column", "Destination column ID"))
                        .arg(index_arg("from", "Index in the source column"))
                        .arg(index_arg("to", "Index in the destination column")),
                ),
        )
}

/// Execute a parsed command against the store and return what should be printed.
pub async fn run(matches: &ArgMatches, store: &BoardStore) -> Result<Value> {
    match matches.subcommand() {
        Some(("projects", sub)) => run_projects(sub, store).await,
        Some(("columns", sub)) => run_columns(sub, store).await,
        Some(("tasks", sub)) => run_tasks(sub, store).await,
        _ => bail!("Unknown command"),
    }
}

async fn run_projects(matches: &ArgMatches, store: &BoardStore) -> Result<Value> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(serde_json::to_value(store.projects_list().await)?),
        Some(("show", m)) => {
            let path = ProjectPath::parse(required(m, "path")?)?;
            if path.suffix.is_empty() {
                return match store.get_project_by_id(&path.id).await {
                    Some(project) => Ok(serde_json::to_value(project)?),
                    None => bail!("Project {} not found", path.id),
                };
            }

            match store.resolve_path(&path).await {
                PathResolution::Found(project) => Ok(serde_json::to_value(project)?),
                PathResolution::Redirect { canonical_slug } => {
                    Ok(json!({ "redirect": canonical_slug }))
                }
                PathResolution::NotFound => bail!("Project {} not found", path.id),
            }
        }
        Some(("create", m)) => {
            let name = non_empty(m, "name")?;
            let description = m.get_one::<String>("description").cloned();
            let id = store.create_project(name, description).await;
            Ok(serde_json::to_value(store.get_project_by_id(&id).await)?)
        }
        Some(("update", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let Some(mut project) = store.get_project_by_id(&id).await else {
                return Ok(outcome(None));
            };
            if m.contains_id("name") {
                project.name = non_empty(m, "name")?.to_string();
            }
            if let Some(description) = m.get_one::<String>("description") {
                project.description = Some(description.clone());
            }
            Ok(outcome(store.update_project(project).await))
        }
        Some(("delete", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            Ok(outcome(store.delete_project(&id).await))
        }
        _ => bail!("Unknown projects subcommand"),
    }
}

async fn run_columns(matches: &ArgMatches, store: &BoardStore) -> Result<Value> {
    match matches.subcommand() {
        Some(("add", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let name = non_empty(m, "name")?;
            Ok(outcome(store.create_project_column(&id, name).await))
        }
        Some(("delete", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let column = ColumnId::from(required(m, "column")?);
            Ok(outcome(store.delete_project_column(&id, &column).await))
        }
        _ => bail!("Unknown columns subcommand"),
    }
}

async fn run_tasks(matches: &ArgMatches, store: &BoardStore) -> Result<Value> {
    match matches.subcommand() {
        Some(("list", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let Some(project) = store.get_project_by_id(&id).await else {
                bail!("Project {} not found", id);
            };
            let only_column = m.get_one::<String>("column").map(|c| ColumnId::from(c.as_str()));
            let overdue_only = m.get_flag("overdue");
            let now = Utc::now();

            let mut tasks = Vec::new();
            for column in &project.columns {
                if only_column.as_ref().is_some_and(|c| c != &column.id) {
                    continue;
                }
                for task in &column.tasks {
                    if overdue_only && !task.is_overdue(now) {
                        continue;
                    }
                    tasks.push(task_row(task, now)?);
                }
            }
            Ok(Value::Array(tasks))
        }
        Some(("add", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let column = ColumnId::from(required(m, "column")?);
            let new_task = NewTask {
                title: non_empty(m, "title")?.to_string(),
                due_date: m.get_one::<String>("due").map(|s| parse_due(s)),
                assign_to: m.get_one::<String>("assign").cloned(),
                prioritize: parse_priority(m)?,
                description: m.get_one::<String>("description").cloned(),
                ..Default::default()
            };
            Ok(outcome(
                store.create_project_column_task(&id, &column, new_task).await,
            ))
        }
        Some(("update", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let column = ColumnId::from(required(m, "column")?);
            let task_id = TaskId::from(required(m, "task")?);

            let Some(mut task) = store.get_project_by_id(&id).await.and_then(|project| {
                project
                    .column(&column)
                    .and_then(|c| c.tasks.iter().find(|t| t.id == task_id).cloned())
            }) else {
                return Ok(outcome(None));
            };

            if m.contains_id("title") {
                task.title = non_empty(m, "title")?.to_string();
            }
            if let Some(to_column) = m.get_one::<String>("to_column") {
                task.column = ColumnId::from(to_column.as_str());
            }
            if let Some(due) = m.get_one::<String>("due") {
                task.due_date = Some(parse_due(due));
            }
            if let Some(assign) = m.get_one::<String>("assign") {
                task.assign_to = Some(assign.clone());
            }
            if let Some(priority) = parse_priority(m)? {
                task.prioritize = Some(priority);
            }
            if let Some(description) = m.get_one::<String>("description") {
                task.description = Some(description.clone());
            }

            Ok(outcome(
                store.update_project_column_task(&id, &column, task).await,
            ))
        }
        Some(("delete", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let column = ColumnId::from(required(m, "column")?);
            let task_id = TaskId::from(required(m, "task")?);
            Ok(outcome(
                store
                    .delete_project_column_task(&id, &column, &task_id)
                    .await,
            ))
        }
        Some(("reorder", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let column = ColumnId::from(required(m, "column")?);
            let change = store
                .reorder_project_task(&id, &column, index(m, "from")?, index(m, "to")?)
                .await?;
            Ok(outcome(change))
        }
        Some(("move", m)) => {
            let id = ProjectId::from(required(m, "project")?);
            let from_column = ColumnId::from(required(m, "from_column")?);
            let to_column = ColumnId::from(required(m, "to_column")?);
            let change = store
                .move_project_task(
                    &id,
                    &from_column,
                    &to_column,
                    index(m, "from")?,
                    index(m, "to")?,
                )
                .await?;
            Ok(outcome(change))
        }
        _ => bail!("Unknown tasks subcommand"),
    }
}

/// A task as stored, plus its due date normalized to UTC and whether it is late.
fn task_row(task: &Task, now: DateTime<Utc>) -> Result<Value> {
    let mut row = serde_json::to_value(task)?;
    if let Value::Object(fields) = &mut row {
        fields.insert(
            "dueUtc".to_string(),
            json!(task.due_date_utc().map(|d| d.to_rfc3339())),
        );
        fields.insert("overdue".to_string(), json!(task.is_overdue(now)));
    }
    Ok(row)
}

fn outcome(change: Option<BoardChange>) -> Value {
    match change {
        Some(change) => json!({ "applied": true, "change": change }),
        None => json!({ "applied": false }),
    }
}

fn required<'a>(m: &'a ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| eyre!("Missing argument: {id}"))
}

/// Blank names and titles are rejected here; the store trusts its callers.
fn non_empty<'a>(m: &'a ArgMatches, id: &str) -> Result<&'a str> {
    let value = required(m, id)?;
    if value.trim().is_empty() {
        bail!("{id} must not be empty");
    }
    Ok(value)
}

fn index(m: &ArgMatches, id: &str) -> Result<usize> {
    m.get_one::<usize>(id)
        .copied()
        .ok_or_else(|| eyre!("Missing argument: {id}"))
}

fn parse_priority(m: &ArgMatches) -> Result<Option<Priority>> {
    Ok(m.get_one::<String>("priority")
        .map(|p| p.parse::<Priority>())
        .transpose()?)
}

pub fn parse_due(value: &str) -> DueDate {
    value
        .trim()
        .parse::<i64>()
        .map(DueDate::Millis)
        .unwrap_or_else(|_| DueDate::Text(value.to_string()))
}
