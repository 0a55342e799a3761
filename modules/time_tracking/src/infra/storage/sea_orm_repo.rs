//! SeaORM-backed implementation of both storage ports.
//!
//! Generic over `C: ConnectionTrait + TransactionTrait`, so it can be built on a
//! `DatabaseConnection` (a pool handle, cheap to clone) or on an open
//! transaction. One instance is scoped to one request: it carries the
//! caller's session token, which `AuthDatabase` resolves against the
//! `sessions` table written by the auth backend.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use tracing::debug;

use crate::contract::model::{NewTimeEntry, Project, TimeEntry, User};
use crate::domain::error::DatabaseError;
use crate::domain::ports::AuthDatabase;
use crate::domain::repo::TimeTrackingDatabase;
use crate::infra::storage::entity::{project, session, time_entry};
use crate::infra::storage::mapper::{project_to_active, time_entry_replacement, time_entry_to_active};

/// SeaORM storage adapter.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmTimeTrackingDatabase<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
    access_token: Option<String>,
}

impl<C> SeaOrmTimeTrackingDatabase<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    /// Adapter without credentials: every auth lookup yields no user.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }
}

fn db_err(op: &'static str) -> impl FnOnce(DbErr) -> DatabaseError {
    move |e| DatabaseError::new(format!("{op} failed"), e)
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[async_trait::async_trait]
impl<C> AuthDatabase for SeaOrmTimeTrackingDatabase<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn get_logged_in_user(&self) -> Result<Option<User>, DatabaseError> {
        let Some(token) = self.access_token.as_deref() else {
            return Ok(None);
        };

        let found = session::Entity::find_by_id(token.to_owned())
            .one(&self.conn)
            .await
            .map_err(db_err("get_logged_in_user"))?;

        Ok(found
            .filter(|s| s.is_active_at(Utc::now()))
            .map(|s| User { id: s.user_id }))
    }
}

#[async_trait::async_trait]
impl<C> TimeTrackingDatabase for SeaOrmTimeTrackingDatabase<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn get_project(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        let found = project::Entity::find_by_id(id.to_owned())
            .one(&self.conn)
            .await
            .map_err(db_err("get_project"))?;
        Ok(found.map(Into::into))
    }

    async fn get_projects(&self, owner_id: &str) -> Result<Vec<Project>, DatabaseError> {
        let rows = project::Entity::find()
            .filter(project::Column::Owner.eq(owner_id))
            .order_by_asc(project::Column::CreatedAt)
            .all(&self.conn)
            .await
            .map_err(db_err("get_projects"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_project(&self, p: Project) -> Result<(), DatabaseError> {
        let _ = project_to_active(p)
            .insert(&self.conn)
            .await
            .map_err(db_err("create_project"))?;
        Ok(())
    }

    async fn get_time_entry(&self, id: &str) -> Result<Option<TimeEntry>, DatabaseError> {
        let found = time_entry::Entity::find_by_id(id.to_owned())
            .one(&self.conn)
            .await
            .map_err(db_err("get_time_entry"))?;
        Ok(found.map(Into::into))
    }

    async fn get_all_time_entries(
        &self,
        project_id: &str,
    ) -> Result<Vec<TimeEntry>, DatabaseError> {
        let rows = time_entry::Entity::find()
            .filter(time_entry::Column::Project.eq(project_id))
            .order_by_asc(time_entry::Column::Date)
            .order_by_asc(time_entry::Column::StartTime)
            .all(&self.conn)
            .await
            .map_err(db_err("get_all_time_entries"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_time_entries(&self, entries: Vec<NewTimeEntry>) -> Result<(), DatabaseError> {
        let rows: Vec<TimeEntry> = entries.into_iter().map(NewTimeEntry::materialize).collect();
        if rows.is_empty() {
            return Ok(());
        }

        let mut ids = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !ids.insert(row.id.clone()) {
                return Err(DatabaseError::time_entry_already_exists(anyhow::anyhow!(
                    "id {} appears twice in the batch",
                    row.id
                )));
            }
        }

        let txn = self.conn.begin().await.map_err(db_err("begin"))?;

        let existing = time_entry::Entity::find()
            .filter(time_entry::Column::Id.is_in(ids))
            .count(&txn)
            .await
            .map_err(db_err("create_time_entries"))?;
        if existing > 0 {
            debug!(existing, "Batch collides with stored time entries");
            txn.rollback().await.map_err(db_err("rollback"))?;
            return Err(DatabaseError::time_entry_already_exists(anyhow::anyhow!(
                "{existing} id(s) already stored"
            )));
        }

        let count = rows.len();
        time_entry::Entity::insert_many(rows.into_iter().map(time_entry_to_active))
            .exec_without_returning(&txn)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DatabaseError::time_entry_already_exists(e)
                } else {
                    DatabaseError::new("create_time_entries failed", e)
                }
            })?;

        txn.commit().await.map_err(db_err("commit"))?;
        debug!(count, "Inserted time entries");
        Ok(())
    }

    async fn update_time_entry(&self, entry: TimeEntry) -> Result<(), DatabaseError> {
        let id = entry.id.clone();
        let res = time_entry::Entity::update_many()
            .set(time_entry_replacement(entry))
            .filter(time_entry::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .map_err(db_err("update_time_entry"))?;
        debug!(rows = res.rows_affected, "Updated time entry");
        Ok(())
    }

    async fn delete_time_entry(&self, id: &str) -> Result<(), DatabaseError> {
        let res = time_entry::Entity::delete_by_id(id.to_owned())
            .exec(&self.conn)
            .await
            .map_err(db_err("delete_time_entry"))?;
        debug!(rows = res.rows_affected, "Deleted time entry");
        Ok(())
    }
}
