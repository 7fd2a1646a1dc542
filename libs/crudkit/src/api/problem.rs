use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use http::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::ResourceError;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 9457 Problem Details body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: &str, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.to_owned(),
            status: status.as_u16(),
            detail: detail.into(),
            code: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_owned());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", detail).with_code("VALIDATION")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", detail).with_code("NOT_FOUND")
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, [(CONTENT_TYPE, PROBLEM_CONTENT_TYPE)], Json(self)).into_response()
    }
}

impl From<ResourceError> for Problem {
    fn from(e: ResourceError) -> Self {
        match &e {
            ResourceError::Unauthenticated => Self::new(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Missing or invalid Authorization header",
            )
            .with_code("UNAUTHENTICATED"),
            ResourceError::Denied { reason } => {
                Self::new(StatusCode::FORBIDDEN, "Forbidden", reason.clone()).with_code("FORBIDDEN")
            }
            ResourceError::NotFound { .. } => Self::not_found(e.to_string()),
            ResourceError::Validation { .. } => Self::bad_request(e.to_string()),
            ResourceError::Store(_) | ResourceError::Internal(_) => {
                tracing::error!(error = %e, "request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An internal error occurred",
                )
                .with_code("INTERNAL")
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crudkit_db::StoreError;

    #[test]
    fn maps_errors_to_statuses() {
        let cases = [
            (ResourceError::Unauthenticated, 401),
            (ResourceError::Denied { reason: "insufficient scope".into() }, 403),
            (ResourceError::not_found("faqs", 3), 404),
            (ResourceError::validation("id", "bad"), 400),
            (ResourceError::Store(StoreError::Config("x".into())), 500),
        ];
        for (err, status) in cases {
            assert_eq!(Problem::from(err).status, status);
        }
    }

    #[test]
    fn store_details_are_masked() {
        let p = Problem::from(ResourceError::Store(StoreError::Config("secret dsn".into())));
        assert!(!p.detail.contains("secret"));
    }

    #[test]
    fn response_has_problem_content_type() {
        let resp = Problem::not_found("gone").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_TYPE], PROBLEM_CONTENT_TYPE);
    }
}
