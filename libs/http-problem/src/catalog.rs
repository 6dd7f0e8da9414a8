use axum::http::StatusCode;

use crate::problem::{Problem, ProblemResponse};

/// Static error definition from a module's error catalog.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    /// Convert this error definition into a Problem with the given detail.
    #[inline]
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            self.title,
            detail.into(),
        )
        .with_code(self.code)
        .with_type(self.type_url)
    }

    /// Build a ready-to-return response for `instance`, tagged with the current span.
    pub fn respond(&self, detail: impl Into<String>, instance: &str) -> ProblemResponse {
        ProblemResponse(
            self.to_problem(detail)
                .with_instance(instance)
                .with_current_span(),
        )
    }
}
