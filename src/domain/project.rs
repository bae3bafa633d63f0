use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Column, DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        ProjectId(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.to_string())
    }
}

/// Productivity figures shown on the project header. Stored, never computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Productivity {
    pub current: f64,
    pub day_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_costs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productivity: Option<Productivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_earnings: Option<f64>,
}

impl Project {
    /// Build a project with a derived slug and the given columns.
    pub fn new(
        id: ProjectId,
        name: impl Into<String>,
        description: Option<String>,
        columns: Vec<Column>,
    ) -> Self {
        let name = name.into();
        Self {
            slug: derive_slug(&id, &name),
            id,
            name,
            description,
            columns,
            total_time: None,
            total_costs: None,
            productivity: None,
            total_earnings: None,
        }
    }

    /// Recompute `slug` from the current `(id, name)`.
    pub fn refresh_slug(&mut self) {
        self.slug = derive_slug(&self.id, &self.name);
    }

    pub fn column(&self, id: &super::ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn column_mut(&mut self, id: &super::ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| &c.id == id)
    }

    pub fn column_index(&self, id: &super::ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Rewrite every task's `column` field to the column that holds it.
    pub fn normalize_task_columns(&mut self) {
        for column in &mut self.columns {
            column.normalize_task_columns();
        }
    }
}

/// `{id}/{name}` with the name lower-cased and every space turned into a hyphen.
///
/// Only `' '` is replaced; other whitespace and punctuation are kept as-is so
/// the result stays stable for links that were already handed out.
pub fn derive_slug(id: &ProjectId, name: &str) -> String {
    format!("{}/{}", id, name.to_lowercase().replace(' ', "-"))
}

/// External address of a project: the canonical id plus a display-only suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath {
    pub id: ProjectId,
    pub suffix: String,
}

impl ProjectPath {
    /// Split at the first `/`. Everything after it is the slug suffix.
    pub fn parse(path: &str) -> DomainResult<Self> {
        let path = path.trim_matches('/');
        let (id, suffix) = path.split_once('/').unwrap_or((path, ""));
        if id.is_empty() {
            return Err(DomainError::InvalidPath(path.to_string()));
        }

        Ok(Self {
            id: ProjectId::from(id),
            suffix: suffix.to_string(),
        })
    }

    pub fn as_slug(&self) -> String {
        format!("{}/{}", self.id, self.suffix)
    }
}

/// Outcome of resolving a [`ProjectPath`] against the stored projects.
#[derive(Debug, Clone, PartialEq)]
pub enum PathResolution {
    Found(Project),
    /// The id exists but the suffix is stale; consumers should navigate here instead.
    Redirect { canonical_slug: String },
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_slug() {
        let id = ProjectId::from("abc");
        assert_eq!(derive_slug(&id, "Website Revamp"), "abc/website-revamp");
        assert_eq!(derive_slug(&id, "Q3  Plan"), "abc/q3--plan");
        assert_eq!(derive_slug(&id, "Tabs\tStay"), "abc/tabs\tstay");
        assert_eq!(derive_slug(&id, "ÉCOLE Été"), "abc/école-été");
    }

    #[test]
    fn test_refresh_slug_follows_name() {
        let mut project = Project::new("p1".into(), "Old Name", None, Vec::new());
        assert_eq!(project.slug, "p1/old-name");

        project.name = "Brand New".to_string();
        project.refresh_slug();
        assert_eq!(project.slug, "p1/brand-new");
    }

    #[test]
    fn test_parse_project_path() {
        let path = ProjectPath::parse("p1/website-revamp").unwrap();
        assert_eq!(path.id, ProjectId::from("p1"));
        assert_eq!(path.suffix, "website-revamp");

        let nested = ProjectPath::parse("p1/a/b").unwrap();
        assert_eq!(nested.id, ProjectId::from("p1"));
        assert_eq!(nested.suffix, "a/b");

        let bare = ProjectPath::parse("p1").unwrap();
        assert_eq!(bare.suffix, "");

        assert!(matches!(
            ProjectPath::parse("/"),
            Err(DomainError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_project_json_shape() {
        let mut project = Project::new("p1".into(), "Site", Some("desc".into()), Vec::new());
        project.total_time = Some(220.0);
        project.productivity = Some(Productivity {
            current: 93.57,
            day_change: 2.37,
        });

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["slug"], "p1/site");
        assert_eq!(json["totalTime"], 220.0);
        assert_eq!(json["productivity"]["dayChange"], 2.37);
        assert!(json.get("totalCosts").is_none());
    }

    #[test]
    fn test_missing_columns_read_as_empty() {
        let project: Project =
            serde_json::from_str(r#"{"id":"p1","slug":"p1/x","name":"x"}"#).unwrap();
        assert!(project.columns.is_empty());
        assert_eq!(project.description, None);
    }
}
