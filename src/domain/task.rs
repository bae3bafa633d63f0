use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{ColumnId, DomainError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(label)
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

/// Due dates arrive either as epoch milliseconds or as whatever string the
/// date picker produced. Both are stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DueDate {
    Millis(i64),
    Text(String),
}

impl DueDate {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            DueDate::Millis(ms) => Utc.timestamp_millis_opt(*ms).single(),
            DueDate::Text(text) => DateTime::parse_from_rfc3339(text)
                .or_else(|_| DateTime::parse_from_rfc2822(text))
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub column: ColumnId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prioritize: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Task {
    /// Materialize a [`NewTask`] inside `column`.
    pub fn from_new(id: TaskId, column: ColumnId, new: NewTask) -> Self {
        Self {
            id,
            title: new.title,
            column,
            due_date: new.due_date,
            position: new.position,
            assign_to: new.assign_to,
            prioritize: new.prioritize,
            description: new.description,
        }
    }

    pub fn due_date_utc(&self) -> Option<DateTime<Utc>> {
        self.due_date.as_ref().and_then(DueDate::to_utc)
    }

    /// A task is overdue when its due day is strictly before `now`'s day.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date_utc()
            .map(|due| due.date_naive() < now.date_naive())
            .unwrap_or(false)
    }
}

/// Task fields supplied by the caller on creation; the store assigns `id` and `column`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub due_date: Option<DueDate>,
    #[serde(default)]
    pub position: Option<f64>,
    #[serde(default)]
    pub assign_to: Option<String>,
    #[serde(default)]
    pub prioritize: Option<Priority>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse() {
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::Low);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(DomainError::InvalidPriority(_))
        ));
    }

    #[test]
    fn test_due_date_accepts_both_shapes() {
        let task: Task = serde_json::from_str(
            r#"{"id":"t1","title":"a","column":"c1","dueDate":1700000000000}"#,
        )
        .unwrap();
        assert_eq!(task.due_date, Some(DueDate::Millis(1_700_000_000_000)));

        let task: Task = serde_json::from_str(
            r#"{"id":"t1","title":"a","column":"c1","dueDate":"Tue, 14 Nov 2023 22:13:20 GMT"}"#,
        )
        .unwrap();
        assert_eq!(
            task.due_date_utc(),
            Utc.timestamp_millis_opt(1_700_000_000_000).single()
        );
    }

    #[test]
    fn test_is_overdue() {
        let mut task = Task::from_new("t1".into(), "c1".into(), NewTask::titled("a"));
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        assert!(!task.is_overdue(now));

        task.due_date = Some(DueDate::Text("2024-05-09T23:00:00Z".into()));
        assert!(task.is_overdue(now));

        task.due_date = Some(DueDate::Text("2024-05-10T01:00:00Z".into()));
        assert!(!task.is_overdue(now));

        task.due_date = Some(DueDate::Text("next friday".into()));
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn test_task_json_uses_camel_case() {
        let mut task = Task::from_new("t1".into(), "c1".into(), NewTask::titled("Design"));
        task.assign_to = Some("sam".into());
        task.prioritize = Some(Priority::Medium);

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["assignTo"], "sam");
        assert_eq!(json["prioritize"], "medium");
        assert_eq!(json["column"], "c1");
        assert!(json.get("dueDate").is_none());
    }
}
