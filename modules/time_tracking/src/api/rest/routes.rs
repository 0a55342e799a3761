use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Extension, Router,
};

use crate::api::rest::{handlers, openapi};
use crate::module::TimeTracking;

pub fn register_routes(router: Router, module: Arc<TimeTracking>) -> Router {
    router
        .route("/users/{user_id}/projects", get(handlers::list_projects))
        .route("/projects", post(handlers::create_project))
        .route("/projects/{project_id}", get(handlers::get_project))
        .route(
            "/projects/{project_id}/time-entries",
            get(handlers::list_time_entries),
        )
        .route("/time-entries", post(handlers::create_time_entry))
        .route("/time-entries/batch", post(handlers::create_time_entries))
        .route(
            "/time-entries/{id}",
            put(handlers::update_time_entry).delete(handlers::delete_time_entry),
        )
        .route("/openapi.json", get(openapi::openapi_json))
        .layer(Extension(module))
}
