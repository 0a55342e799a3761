use sea_orm::{ActiveValue::NotSet, Set};

use crate::contract::model::{Project, TimeEntry};
use crate::infra::storage::entity::{project, time_entry};

impl From<project::Model> for Project {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            owner: m.owner,
            created_at: m.created_at,
        }
    }
}

impl From<time_entry::Model> for TimeEntry {
    fn from(m: time_entry::Model) -> Self {
        Self {
            id: m.id,
            date: m.date,
            start_time: m.start_time,
            end_time: m.end_time,
            description: m.description,
            project: m.project,
        }
    }
}

pub fn project_to_active(p: Project) -> project::ActiveModel {
    project::ActiveModel {
        id: Set(p.id),
        name: Set(p.name),
        description: Set(p.description),
        owner: Set(p.owner),
        created_at: Set(p.created_at),
    }
}

pub fn time_entry_to_active(e: TimeEntry) -> time_entry::ActiveModel {
    time_entry::ActiveModel {
        id: Set(e.id),
        date: Set(e.date),
        start_time: Set(e.start_time),
        end_time: Set(e.end_time),
        description: Set(e.description),
        project: Set(e.project),
    }
}

/// Every column except the primary key, for full-replace updates.
pub fn time_entry_replacement(e: TimeEntry) -> time_entry::ActiveModel {
    time_entry::ActiveModel {
        id: NotSet,
        ..time_entry_to_active(e)
    }
}
