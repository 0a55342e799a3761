use async_trait::async_trait;

use crate::contract::model::{NewTimeEntry, Project, TimeEntry};
use crate::domain::error::DatabaseError;

/// Port for the domain layer: persistence operations the time-tracking service needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait TimeTrackingDatabase: Send + Sync {
    /// Load a project by id.
    async fn get_project(&self, id: &str) -> Result<Option<Project>, DatabaseError>;

    /// All projects owned by `owner_id`.
    async fn get_projects(&self, owner_id: &str) -> Result<Vec<Project>, DatabaseError>;

    /// Insert a fully-formed project.
    async fn create_project(&self, project: Project) -> Result<(), DatabaseError>;

    /// Load a time entry by id.
    async fn get_time_entry(&self, id: &str) -> Result<Option<TimeEntry>, DatabaseError>;

    /// All time entries of a project.
    async fn get_all_time_entries(&self, project_id: &str)
        -> Result<Vec<TimeEntry>, DatabaseError>;

    /// Batch insert. Missing ids are generated, missing descriptions default to empty.
    ///
    /// The batch is all-or-nothing: a duplicate id anywhere aborts it with
    /// [`DatabaseError::time_entry_already_exists`].
    async fn create_time_entries(&self, entries: Vec<NewTimeEntry>) -> Result<(), DatabaseError>;

    async fn create_time_entry(&self, entry: NewTimeEntry) -> Result<(), DatabaseError> {
        self.create_time_entries(vec![entry]).await
    }

    /// Full replace by `entry.id`. Completes without effect when no such row exists.
    async fn update_time_entry(&self, entry: TimeEntry) -> Result<(), DatabaseError>;

    /// Idempotent delete.
    async fn delete_time_entry(&self, id: &str) -> Result<(), DatabaseError>;
}
