use axum::Json;
use utoipa::OpenApi;

use crate::api::rest::dto::{
    CreateProjectReq, CreateTimeEntryReq, ProjectDto, TimeEntryDto, UpdateTimeEntryReq,
};
use crate::api::rest::handlers;
use crate::api::rest::problem::Problem;

#[derive(OpenApi)]
#[openapi(
    info(title = "Time tracking API"),
    paths(
        handlers::list_projects,
        handlers::create_project,
        handlers::get_project,
        handlers::list_time_entries,
        handlers::create_time_entry,
        handlers::create_time_entries,
        handlers::update_time_entry,
        handlers::delete_time_entry,
    ),
    components(schemas(
        ProjectDto,
        CreateProjectReq,
        TimeEntryDto,
        CreateTimeEntryReq,
        UpdateTimeEntryReq,
        Problem
    )),
    tags(
        (name = "projects", description = "Projects owned by the caller"),
        (name = "time-entries", description = "Tracked intervals within a project")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("json");
        for path in [
            "/users/{user_id}/projects",
            "/projects",
            "/projects/{project_id}",
            "/projects/{project_id}/time-entries",
            "/time-entries",
            "/time-entries/batch",
            "/time-entries/{id}",
        ] {
            assert!(doc["paths"].get(path).is_some(), "missing {path}");
        }
        assert!(doc.pointer("/components/schemas/TimeEntryDto").is_some());
    }
}
