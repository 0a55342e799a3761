use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{NewProject, NewTimeEntry, Project, TimeEntry, User};
use crate::domain::error::{DomainError, TIME_ENTRY_ALREADY_EXISTS};
use crate::domain::repo::TimeTrackingDatabase;
use crate::domain::user_service::UserService;

/// Authorization and orchestration for projects and time entries.
///
/// Every operation resolves the caller, loads the stored project that owns the
/// target, compares `project.owner` with the caller, and only then touches
/// storage. Nothing is cached between calls.
#[derive(Clone)]
pub struct TimeTrackingService {
    users: UserService,
    db: Arc<dyn TimeTrackingDatabase>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_batch_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 500,
        }
    }
}

impl TimeTrackingService {
    pub fn new(users: UserService, db: Arc<dyn TimeTrackingDatabase>, config: ServiceConfig) -> Self {
        Self { users, db, config }
    }

    /// Projects owned by `user_id`.
    ///
    /// Returns an empty list, not an error, when nobody is logged in or the
    /// caller asks for someone else's projects.
    #[instrument(name = "time_tracking.service.get_projects", skip(self), fields(user_id = %user_id))]
    pub async fn get_projects(&self, user_id: &str) -> Result<Vec<Project>, DomainError> {
        debug!("Listing projects");

        match self.users.get_logged_in_user().await? {
            Some(user) if user.id == user_id => Ok(self.db.get_projects(user_id).await?),
            _ => {
                debug!("Caller is not the requested user; returning no projects");
                Ok(Vec::new())
            }
        }
    }

    #[instrument(name = "time_tracking.service.get_project", skip(self), fields(project_id = %project_id))]
    pub async fn get_project(&self, project_id: &str) -> Result<Option<Project>, DomainError> {
        let user = self.require_user().await?;

        let Some(project) = self.db.get_project(project_id).await? else {
            return Ok(None);
        };
        ensure_owner(&project, &user)?;
        Ok(Some(project))
    }

    #[instrument(name = "time_tracking.service.create_project", skip(self, new_project), fields(name = %new_project.name))]
    pub async fn create_project(&self, new_project: NewProject) -> Result<Project, DomainError> {
        info!("Creating new project");
        let user = self.require_user().await?;

        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: new_project.name,
            description: new_project.description,
            owner: user.id,
            created_at: Utc::now(),
        };
        self.db.create_project(project.clone()).await?;

        info!("Successfully created project with id={}", project.id);
        Ok(project)
    }

    #[instrument(name = "time_tracking.service.get_all_time_entries", skip(self), fields(project_id = %project_id))]
    pub async fn get_all_time_entries(&self, project_id: &str) -> Result<Vec<TimeEntry>, DomainError> {
        let user = self.require_user().await?;

        let Some(project) = self.db.get_project(project_id).await? else {
            debug!("Project not found; no entries");
            return Ok(Vec::new());
        };
        ensure_owner(&project, &user)?;

        let entries = self.db.get_all_time_entries(project_id).await?;
        debug!("Successfully listed {} time entries", entries.len());
        Ok(entries)
    }

    #[instrument(name = "time_tracking.service.create_time_entry", skip(self, entry), fields(project_id = %entry.project))]
    pub async fn create_time_entry(&self, entry: NewTimeEntry) -> Result<(), DomainError> {
        info!("Creating time entry");
        let user = self.require_user().await?;

        let Some(project) = self.db.get_project(&entry.project).await? else {
            debug!("Project not found; nothing to create");
            return Ok(());
        };
        ensure_owner(&project, &user)?;

        if let Some(id) = entry.id.as_deref() {
            if self.db.get_time_entry(id).await?.is_some() {
                return Err(DomainError::invalid_operation(TIME_ENTRY_ALREADY_EXISTS));
            }
        }

        self.db.create_time_entry(entry).await?;
        info!("Successfully created time entry");
        Ok(())
    }

    /// Batch variant of [`Self::create_time_entry`].
    ///
    /// Entries pointing at unknown projects are dropped; a single foreign
    /// project rejects the whole batch before anything is written.
    #[instrument(name = "time_tracking.service.create_time_entries", skip(self, entries), fields(count = entries.len()))]
    pub async fn create_time_entries(&self, entries: Vec<NewTimeEntry>) -> Result<(), DomainError> {
        info!("Creating time entries");
        let user = self.require_user().await?;
        if entries.len() > self.config.max_batch_size {
            return Err(DomainError::invalid_operation(format!(
                "batch of {} time entries exceeds the limit of {}",
                entries.len(),
                self.config.max_batch_size
            )));
        }

        let mut projects: HashMap<String, Option<Project>> = HashMap::new();
        for entry in &entries {
            if !projects.contains_key(&entry.project) {
                let project = self.db.get_project(&entry.project).await?;
                projects.insert(entry.project.clone(), project);
            }
        }
        for project in projects.values().flatten() {
            ensure_owner(project, &user)?;
        }

        let accepted: Vec<NewTimeEntry> = entries
            .into_iter()
            .filter(|e| matches!(projects.get(&e.project), Some(Some(_))))
            .collect();
        if accepted.is_empty() {
            debug!("No entry references a known project; nothing to create");
            return Ok(());
        }

        let count = accepted.len();
        self.db.create_time_entries(accepted).await?;
        info!("Successfully created {} time entries", count);
        Ok(())
    }

    /// Full replace of an entry. Ownership is checked on the target project
    /// and, when the entry is being moved, on the project it currently lives in.
    #[instrument(name = "time_tracking.service.update_time_entry", skip(self, entry), fields(entry_id = %entry.id, project_id = %entry.project))]
    pub async fn update_time_entry(&self, entry: TimeEntry) -> Result<(), DomainError> {
        info!("Updating time entry");
        let user = self.require_user().await?;

        let Some(project) = self.db.get_project(&entry.project).await? else {
            debug!("Project not found; nothing to update");
            return Ok(());
        };
        ensure_owner(&project, &user)?;

        if let Some(stored) = self.db.get_time_entry(&entry.id).await? {
            if stored.project != entry.project {
                if let Some(current) = self.db.get_project(&stored.project).await? {
                    ensure_owner(&current, &user)?;
                }
            }
        }

        self.db.update_time_entry(entry).await?;
        info!("Successfully updated time entry");
        Ok(())
    }

    #[instrument(name = "time_tracking.service.delete_time_entry", skip(self), fields(entry_id = %time_entry_id))]
    pub async fn delete_time_entry(&self, time_entry_id: &str) -> Result<(), DomainError> {
        info!("Deleting time entry");
        let user = self.require_user().await?;

        let Some(entry) = self.db.get_time_entry(time_entry_id).await? else {
            debug!("Time entry not found; nothing to delete");
            return Ok(());
        };
        let Some(project) = self.db.get_project(&entry.project).await? else {
            debug!("Owning project not found; nothing to delete");
            return Ok(());
        };
        ensure_owner(&project, &user)?;

        self.db.delete_time_entry(time_entry_id).await?;
        info!("Successfully deleted time entry");
        Ok(())
    }

    // --- authorization helpers ---

    async fn require_user(&self) -> Result<User, DomainError> {
        self.users.get_logged_in_user().await?.ok_or_else(|| {
            debug!("No authenticated user");
            DomainError::unauthorized()
        })
    }
}

fn ensure_owner(project: &Project, user: &User) -> Result<(), DomainError> {
    if project.owner != user.id {
        warn!(project_id = %project.id, user_id = %user.id, "Ownership check failed");
        return Err(DomainError::unauthorized());
    }
    Ok(())
}
