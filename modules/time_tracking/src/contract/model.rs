use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

/// Authenticated principal as reported by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
}

/// A named container owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Id of the owning user; never changes after creation.
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new project. The owner is always the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
}

/// One tracked interval attributed to a project.
///
/// `end_time == None` means the timer is still running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub description: String,
    pub project: String,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Creation payload for a time entry: the optional fields are filled in by
/// [`NewTimeEntry::materialize`] before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeEntry {
    pub id: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub description: Option<String>,
    pub project: String,
}

impl NewTimeEntry {
    /// Minimal running entry: only project, date and start time.
    pub fn running(project: impl Into<String>, date: NaiveDate, start_time: NaiveTime) -> Self {
        Self {
            id: None,
            date,
            start_time,
            end_time: None,
            description: None,
            project: project.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_end_time(mut self, end_time: NaiveTime) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Apply defaults: a fresh v4 id when none was given and an empty description.
    pub fn materialize(self) -> TimeEntry {
        TimeEntry {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description.unwrap_or_default(),
            project: self.project,
        }
    }
}

impl From<TimeEntry> for NewTimeEntry {
    fn from(entry: TimeEntry) -> Self {
        Self {
            id: Some(entry.id),
            date: entry.date,
            start_time: entry.start_time,
            end_time: entry.end_time,
            description: Some(entry.description),
            project: entry.project,
        }
    }
}
