use std::sync::Arc;

use axum::{
    extract::Path,
    http::{header, HeaderMap, StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};

use crate::api::rest::dto::{
    CreateProjectReq, CreateTimeEntryReq, ProjectDto, TimeEntryDto, UpdateTimeEntryReq,
};
use crate::api::rest::error::{
    map_domain_error, map_dto_error, project_not_found, ErrorContext,
};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::contract::model::{NewTimeEntry, TimeEntry};
use crate::domain::service::TimeTrackingService;
use crate::module::TimeTracking;

/// Session token from `Authorization: Bearer ...`, falling back to the session cookie.
pub fn access_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn service(module: &TimeTracking, headers: &HeaderMap) -> TimeTrackingService {
    module.service_for(access_token(headers, &module.config().session_cookie))
}

/// List the projects of a user
#[utoipa::path(
    get,
    path = "/users/{user_id}/projects",
    tag = "projects",
    params(("user_id" = String, Path, description = "Owner id")),
    responses(
        (status = 200, description = "Projects of the user; empty unless the caller is that user", body = [ProjectDto]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_projects(
    Extension(module): Extension<Arc<TimeTracking>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<Vec<ProjectDto>>, ProblemResponse> {
    info!("Listing projects of user {}", user_id);

    match service(&module, &headers).get_projects(&user_id).await {
        Ok(projects) => Ok(Json(projects.into_iter().map(ProjectDto::from).collect())),
        Err(e) => {
            error!("Failed to list projects of {}: {}", user_id, e);
            Err(map_domain_error(&e, &ErrorContext::new(&uri, &headers)))
        }
    }
}

/// Create a project owned by the caller
#[utoipa::path(
    post,
    path = "/projects",
    tag = "projects",
    request_body = CreateProjectReq,
    responses(
        (status = 201, description = "Created project", body = ProjectDto),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_project(
    uri: Uri,
    headers: HeaderMap,
    Extension(module): Extension<Arc<TimeTracking>>,
    Json(req_body): Json<CreateProjectReq>,
) -> Result<(StatusCode, Json<ProjectDto>), ProblemResponse> {
    info!("Creating project: {:?}", req_body);

    match service(&module, &headers).create_project(req_body.into()).await {
        Ok(project) => Ok((StatusCode::CREATED, Json(ProjectDto::from(project)))),
        Err(e) => {
            error!("Failed to create project: {}", e);
            Err(map_domain_error(&e, &ErrorContext::new(&uri, &headers)))
        }
    }
}

/// Get a project by id
#[utoipa::path(
    get,
    path = "/projects/{project_id}",
    tag = "projects",
    params(("project_id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project found", body = ProjectDto),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_project(
    Extension(module): Extension<Arc<TimeTracking>>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<ProjectDto>, ProblemResponse> {
    info!("Getting project with id: {}", project_id);

    match service(&module, &headers).get_project(&project_id).await {
        Ok(Some(project)) => Ok(Json(ProjectDto::from(project))),
        Ok(None) => Err(project_not_found(
            &project_id,
            &ErrorContext::new(&uri, &headers),
        )),
        Err(e) => {
            error!("Failed to get project {}: {}", project_id, e);
            Err(map_domain_error(&e, &ErrorContext::new(&uri, &headers)))
        }
    }
}

/// List the time entries of a project
#[utoipa::path(
    get,
    path = "/projects/{project_id}/time-entries",
    tag = "time-entries",
    params(("project_id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Time entries of the project", body = [TimeEntryDto]),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_time_entries(
    Extension(module): Extension<Arc<TimeTracking>>,
    Path(project_id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<Vec<TimeEntryDto>>, ProblemResponse> {
    info!("Listing time entries of project {}", project_id);

    match service(&module, &headers).get_all_time_entries(&project_id).await {
        Ok(entries) => Ok(Json(entries.into_iter().map(TimeEntryDto::from).collect())),
        Err(e) => {
            error!("Failed to list time entries of {}: {}", project_id, e);
            Err(map_domain_error(&e, &ErrorContext::new(&uri, &headers)))
        }
    }
}

/// Create a time entry; a missing id is generated and echoed back
#[utoipa::path(
    post,
    path = "/time-entries",
    tag = "time-entries",
    request_body = CreateTimeEntryReq,
    responses(
        (status = 201, description = "Created time entry", body = TimeEntryDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_time_entry(
    uri: Uri,
    headers: HeaderMap,
    Extension(module): Extension<Arc<TimeTracking>>,
    Json(req_body): Json<CreateTimeEntryReq>,
) -> Result<(StatusCode, Json<TimeEntryDto>), ProblemResponse> {
    info!("Creating time entry: {:?}", req_body);

    let entry = NewTimeEntry::try_from(req_body)
        .map_err(|e| map_dto_error(&e, &ErrorContext::new(&uri, &headers)))?
        .materialize();

    match service(&module, &headers)
        .create_time_entry(entry.clone().into())
        .await
    {
        Ok(()) => Ok((StatusCode::CREATED, Json(TimeEntryDto::from(entry)))),
        Err(e) => {
            error!("Failed to create time entry: {}", e);
            Err(map_domain_error(&e, &ErrorContext::new(&uri, &headers)))
        }
    }
}

/// Create several time entries in one atomic batch
#[utoipa::path(
    post,
    path = "/time-entries/batch",
    tag = "time-entries",
    request_body = [CreateTimeEntryReq],
    responses(
        (status = 201, description = "Created time entries", body = [TimeEntryDto]),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_time_entries(
    uri: Uri,
    headers: HeaderMap,
    Extension(module): Extension<Arc<TimeTracking>>,
    Json(req_body): Json<Vec<CreateTimeEntryReq>>,
) -> Result<(StatusCode, Json<Vec<TimeEntryDto>>), ProblemResponse> {
    info!("Creating {} time entries", req_body.len());

    let entries = req_body
        .into_iter()
        .map(|req| NewTimeEntry::try_from(req).map(NewTimeEntry::materialize))
        .collect::<Result<Vec<TimeEntry>, _>>()
        .map_err(|e| map_dto_error(&e, &ErrorContext::new(&uri, &headers)))?;

    match service(&module, &headers)
        .create_time_entries(entries.iter().cloned().map(Into::into).collect())
        .await
    {
        Ok(()) => Ok((
            StatusCode::CREATED,
            Json(entries.into_iter().map(TimeEntryDto::from).collect()),
        )),
        Err(e) => {
            error!("Failed to create time entries: {}", e);
            Err(map_domain_error(&e, &ErrorContext::new(&uri, &headers)))
        }
    }
}

/// Replace a time entry
#[utoipa::path(
    put,
    path = "/time-entries/{id}",
    tag = "time-entries",
    params(("id" = String, Path, description = "Time entry id")),
    request_body = UpdateTimeEntryReq,
    responses(
        (status = 200, description = "Updated time entry", body = TimeEntryDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_time_entry(
    uri: Uri,
    headers: HeaderMap,
    Extension(module): Extension<Arc<TimeTracking>>,
    Path(id): Path<String>,
    Json(req_body): Json<UpdateTimeEntryReq>,
) -> Result<Json<TimeEntryDto>, ProblemResponse> {
    info!("Updating time entry {} with: {:?}", id, req_body);

    let entry = req_body
        .into_entry(id.clone())
        .map_err(|e| map_dto_error(&e, &ErrorContext::new(&uri, &headers)))?;

    match service(&module, &headers)
        .update_time_entry(entry.clone())
        .await
    {
        Ok(()) => Ok(Json(TimeEntryDto::from(entry))),
        Err(e) => {
            error!("Failed to update time entry {}: {}", id, e);
            Err(map_domain_error(&e, &ErrorContext::new(&uri, &headers)))
        }
    }
}

/// Delete a time entry; unknown ids succeed
#[utoipa::path(
    delete,
    path = "/time-entries/{id}",
    tag = "time-entries",
    params(("id" = String, Path, description = "Time entry id")),
    responses(
        (status = 204, description = "Time entry deleted (or never existed)"),
        (status = 401, description = "Unauthorized", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_time_entry(
    Extension(module): Extension<Arc<TimeTracking>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting time entry: {}", id);

    match service(&module, &headers).delete_time_entry(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete time entry {}: {}", id, e);
            Err(map_domain_error(&e, &ErrorContext::new(&uri, &headers)))
        }
    }
}
