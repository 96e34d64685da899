use serde::{Deserialize, Serialize};
use std::fmt;

/// Accent used when a task arrives without a category colour.
pub const DEFAULT_CATEGORY_COLOR: &str = "bg-gray-500";

/// Lane membership of a task.
///
/// Values outside the four known statuses are kept as `Unknown` so they
/// survive a save/load cycle, but such a task belongs to no lane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Approved,
    Reject,
    Unknown(String),
}

impl TaskStatus {
    pub const KNOWN: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Approved,
        TaskStatus::Reject,
    ];

    /// Parses one of the four known status strings. Anything else is `None`.
    pub fn parse_known(value: &str) -> Option<TaskStatus> {
        match value {
            "todo" => Some(TaskStatus::Todo),
            "in-progress" => Some(TaskStatus::InProgress),
            "approved" => Some(TaskStatus::Approved),
            "reject" => Some(TaskStatus::Reject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Approved => "approved",
            TaskStatus::Reject => "reject",
            TaskStatus::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TaskStatus::Unknown(_))
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        TaskStatus::parse_known(&value).unwrap_or(TaskStatus::Unknown(value))
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        TaskStatus::parse_known(value).unwrap_or_else(|| TaskStatus::Unknown(value.to_string()))
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub category_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Initials, front-most first.
    #[serde(default)]
    pub avatars: Vec<String>,
    #[serde(default)]
    pub metrics: TaskMetrics,
    #[serde(default)]
    pub has_image: bool,
    #[serde(default)]
    pub has_group_call: bool,
    #[serde(default)]
    pub has_stream: bool,
}

impl Task {
    /// Fills the defaults a loaded task may be missing.
    ///
    /// `avatars` and `metrics` already default during deserialization; the
    /// category colour also needs repair when it was present but blank.
    pub fn normalize(&mut self) {
        if self.category_color.trim().is_empty() {
            self.category_color = DEFAULT_CATEGORY_COLOR.to_string();
        }
    }

    /// Case-insensitive substring match over title, description, assignee
    /// and category. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        let hit = |field: &str| field.to_lowercase().contains(needle);
        hit(&self.title)
            || self.description.as_deref().is_some_and(hit)
            || self.assignee.as_deref().is_some_and(hit)
            || hit(&self.category)
    }
}

/// Everything a caller supplies when creating a task; the store assigns
/// `id` and `createdAt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub status: Option<TaskStatus>,
    pub category: String,
    pub category_color: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
    pub avatars: Vec<String>,
    pub metrics: TaskMetrics,
    pub has_image: bool,
    pub has_group_call: bool,
    pub has_stream: bool,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub(crate) fn into_task(self, id: String, created_at: String) -> Task {
        let mut task = Task {
            id,
            title: self.title,
            status: self.status.unwrap_or(TaskStatus::Todo),
            category: self.category,
            category_color: self.category_color.unwrap_or_default(),
            description: self.description,
            assignee: self.assignee,
            due_date: self.due_date,
            created_at: Some(created_at),
            avatars: self.avatars,
            metrics: self.metrics,
            has_image: self.has_image,
            has_group_call: self.has_group_call,
            has_stream: self.has_stream,
        };
        task.normalize();
        task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("todo", TaskStatus::Todo)]
    #[case("in-progress", TaskStatus::InProgress)]
    #[case("approved", TaskStatus::Approved)]
    #[case("reject", TaskStatus::Reject)]
    fn known_statuses_parse(#[case] raw: &str, #[case] expected: TaskStatus) {
        assert_eq!(TaskStatus::parse_known(raw), Some(expected.clone()));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("done")]
    #[case("TODO")]
    fn unknown_status_is_preserved(#[case] raw: &str) {
        assert_eq!(TaskStatus::parse_known(raw), None);
        let status = TaskStatus::from(raw);
        assert!(!status.is_known());
        assert_eq!(String::from(status), raw);
    }

    #[test]
    fn missing_optional_fields_default_on_load() {
        let json = r#"{"id":"1","title":"Fix bug","status":"todo","category":"web"}"#;
        let mut task: Task = serde_json::from_str(json).unwrap();
        task.normalize();

        assert!(task.avatars.is_empty());
        assert_eq!(task.metrics, TaskMetrics::default());
        assert_eq!(task.category_color, DEFAULT_CATEGORY_COLOR);
        assert!(!task.has_image);
    }

    #[test]
    fn status_serializes_as_string() {
        let task = NewTask {
            status: Some(TaskStatus::InProgress),
            ..NewTask::titled("Ship")
        }
        .into_task("t-1".into(), "2024-01-01".into());
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["categoryColor"], DEFAULT_CATEGORY_COLOR);
        assert_eq!(json["createdAt"], "2024-01-01");
    }

    #[test]
    fn matches_skips_absent_fields() {
        let task: Task =
            serde_json::from_str(r#"{"id":"1","title":"Write docs","status":"todo"}"#).unwrap();

        assert!(task.matches("docs"));
        assert!(!task.matches("alice"));
    }

    #[test]
    fn matches_description_and_assignee() {
        let mut task: Task =
            serde_json::from_str(r#"{"id":"1","title":"Plan","status":"todo","category":"Ops"}"#)
                .unwrap();
        task.description = Some("Quarterly ROADMAP".into());
        task.assignee = Some("Alice".into());

        assert!(task.matches("roadmap"));
        assert!(task.matches("alice"));
        assert!(task.matches("ops"));
    }
}
