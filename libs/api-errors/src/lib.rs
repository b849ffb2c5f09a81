//! RFC 9457 problem bodies and catalog-driven problem building.
use http::StatusCode;

pub mod problem;

pub use problem::{Problem, ProblemResponse, APPLICATION_PROBLEM_JSON};

/// Static error definition from a module's error catalog
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    /// Convert this error definition into a Problem with the given detail
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

    /// Problem bound to the request path and, if known, the request id.
    pub fn to_response(
        &self,
        detail: impl Into<String>,
        instance: &str,
        request_id: Option<String>,
    ) -> ProblemResponse {
        let mut problem = self.to_problem(detail).with_instance(instance);
        if let Some(id) = request_id {
            problem = problem.with_request_id(id);
        }
        ProblemResponse(problem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_FOUND: ErrDef = ErrDef {
        status: 404,
        title: "Not Found",
        code: "TEST_NOT_FOUND",
        type_url: "https://errors.example.com/TEST_NOT_FOUND",
    };

    #[test]
    fn err_def_to_problem_works() {
        let problem = NOT_FOUND.to_problem("Resource missing");
        assert_eq!(problem.status, 404);
        assert_eq!(problem.title, "Not Found");
        assert_eq!(problem.detail, "Resource missing");
        assert_eq!(problem.code, "TEST_NOT_FOUND");
        assert_eq!(
            problem.type_url,
            "https://errors.example.com/TEST_NOT_FOUND"
        );
    }

    #[test]
    fn to_response_attaches_context() {
        let resp = NOT_FOUND.to_response("gone", "/salespersons/42", Some("rid-7".into()));
        assert_eq!(resp.0.instance, "/salespersons/42");
        assert_eq!(resp.0.request_id.as_deref(), Some("rid-7"));

        let resp = NOT_FOUND.to_response("gone", "/salespersons/42", None);
        assert!(resp.0.request_id.is_none());
    }
}
