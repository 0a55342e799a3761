//! Wire representation of projects and time entries.
//!
//! Dates travel as `YYYY-MM-DD`, times of day as `HH:mm:ss`; a `null`
//! `endTime` marks a running timer.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::contract::model::{NewProject, NewTimeEntry, Project, TimeEntry};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DtoError {
    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid {field} '{value}', expected HH:mm:ss")]
    InvalidTime { field: &'static str, value: String },
}

/// REST DTO for a time entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryDto {
    pub id: String,
    #[schema(example = "2025-04-12")]
    pub date: String,
    #[schema(example = "09:30:00")]
    pub start_time: String,
    /// `null` while the timer is running.
    #[schema(example = "17:45:10")]
    pub end_time: Option<String>,
    pub description: String,
    pub project: String,
}

/// REST DTO for creating a time entry. Omitted `id` is generated server-side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeEntryReq {
    #[serde(default)]
    pub id: Option<String>,
    pub date: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub project: String,
}

/// REST DTO for replacing a time entry; the id comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeEntryReq {
    pub date: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub description: String,
    pub project: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateProjectReq {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// --- parsing helpers ---

/// Strict `YYYY-MM-DD`; unpadded fields are rejected.
pub fn parse_date(value: &str) -> Result<NaiveDate, DtoError> {
    let invalid = || DtoError::InvalidDate {
        value: value.to_string(),
    };
    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Strict `HH:MM:SS`; unpadded fields and leap seconds are rejected.
pub fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, DtoError> {
    let invalid = || DtoError::InvalidTime {
        field,
        value: value.to_string(),
    };
    if value.len() != 8 {
        return Err(invalid());
    }
    let time = NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| invalid())?;
    if time.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }
    Ok(time)
}

fn parse_end_time(value: Option<&str>) -> Result<Option<NaiveTime>, DtoError> {
    value.map(|v| parse_time("endTime", v)).transpose()
}

// --- mapping between the wire and the domain ---

pub fn to_dto(entry: &TimeEntry) -> TimeEntryDto {
    TimeEntryDto {
        id: entry.id.clone(),
        date: entry.date.format(DATE_FORMAT).to_string(),
        start_time: entry.start_time.format(TIME_FORMAT).to_string(),
        end_time: entry.end_time.map(|t| t.format(TIME_FORMAT).to_string()),
        description: entry.description.clone(),
        project: entry.project.clone(),
    }
}

pub fn to_time_entry(dto: TimeEntryDto) -> Result<TimeEntry, DtoError> {
    Ok(TimeEntry {
        date: parse_date(&dto.date)?,
        start_time: parse_time("startTime", &dto.start_time)?,
        end_time: parse_end_time(dto.end_time.as_deref())?,
        id: dto.id,
        description: dto.description,
        project: dto.project,
    })
}

impl From<TimeEntry> for TimeEntryDto {
    fn from(entry: TimeEntry) -> Self {
        to_dto(&entry)
    }
}

impl TryFrom<TimeEntryDto> for TimeEntry {
    type Error = DtoError;

    fn try_from(dto: TimeEntryDto) -> Result<Self, Self::Error> {
        to_time_entry(dto)
    }
}

impl TryFrom<CreateTimeEntryReq> for NewTimeEntry {
    type Error = DtoError;

    fn try_from(req: CreateTimeEntryReq) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_date(&req.date)?,
            start_time: parse_time("startTime", &req.start_time)?,
            end_time: parse_end_time(req.end_time.as_deref())?,
            id: req.id,
            description: req.description,
            project: req.project,
        })
    }
}

impl UpdateTimeEntryReq {
    pub fn into_entry(self, id: String) -> Result<TimeEntry, DtoError> {
        to_time_entry(TimeEntryDto {
            id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
            project: self.project,
        })
    }
}

impl From<Project> for ProjectDto {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            owner: p.owner,
            created_at: p.created_at,
        }
    }
}

impl From<CreateProjectReq> for NewProject {
    fn from(req: CreateProjectReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}
