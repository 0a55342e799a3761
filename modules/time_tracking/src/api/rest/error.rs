use axum::http::{HeaderMap, StatusCode, Uri};

use crate::api::rest::dto::DtoError;
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::domain::error::DomainError;

/// Header set by the server's request-id layer.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Where an error happened: request path plus the request id, if any.
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext<'a> {
    instance: &'a str,
    request_id: Option<&'a str>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(uri: &'a Uri, headers: &'a HeaderMap) -> Self {
        Self {
            instance: uri.path(),
            request_id: headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
        }
    }

    fn problem(
        &self,
        status: StatusCode,
        code: &str,
        title: &str,
        detail: impl Into<String>,
    ) -> ProblemResponse {
        ProblemResponse(
            Problem::new(status, code, title, detail)
                .at(self.instance)
                .with_trace_id(self.request_id),
        )
    }
}

pub fn map_domain_error(e: &DomainError, ctx: &ErrorContext<'_>) -> ProblemResponse {
    match e {
        DomainError::Unauthorized => ctx.problem(
            StatusCode::UNAUTHORIZED,
            "TIME_TRACKING_UNAUTHORIZED",
            "Unauthorized",
            "Not logged in or not the owner of this resource",
        ),
        DomainError::InvalidOperation { message } => ctx.problem(
            StatusCode::BAD_REQUEST,
            "TIME_TRACKING_INVALID_OPERATION",
            "Invalid operation",
            message.clone(),
        ),
        DomainError::Database(db) if db.is_duplicate() => ctx.problem(
            StatusCode::BAD_REQUEST,
            "TIME_TRACKING_DUPLICATE",
            "Invalid operation",
            db.message.clone(),
        ),
        DomainError::Database(db) => {
            // details stay in the log
            tracing::error!(error = ?db, "Database error occurred");
            ctx.problem(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_DB",
                "Internal error",
                "An internal database error occurred",
            )
        }
    }
}

pub fn map_dto_error(e: &DtoError, ctx: &ErrorContext<'_>) -> ProblemResponse {
    ctx.problem(
        StatusCode::BAD_REQUEST,
        "TIME_TRACKING_INVALID_PAYLOAD",
        "Invalid payload",
        e.to_string(),
    )
}

pub fn project_not_found(id: &str, ctx: &ErrorContext<'_>) -> ProblemResponse {
    ctx.problem(
        StatusCode::NOT_FOUND,
        "TIME_TRACKING_PROJECT_NOT_FOUND",
        "Project not found",
        format!("Project with id {id} was not found"),
    )
}
