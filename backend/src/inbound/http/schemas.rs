//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of utoipa derives; these mirrors register the
//! error envelope under the domain type's name so handlers can reference it.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// Malformed input or a refused booking (own ride, duplicate, no seats).
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Missing, invalid or expired bearer token; wrong credentials.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    /// Absent, not owned, or already cancelled.
    #[schema(rename = "not_found")]
    NotFound,
    /// Email already registered.
    #[schema(rename = "conflict")]
    Conflict,
    /// The store is busy; the request had no effect and may be retried.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable reason.
    #[schema(example = "Not enough seats available.")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "6f1c0d1e-8d1a-4a36-9d8e-2b7f6c3a9e10")]
    trace_id: Option<String>,
    /// Extra context such as the offending `field`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn schemas_are_named_after_domain_types() {
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("unauthorized")]
    #[case("not_found")]
    #[case("conflict")]
    #[case("service_unavailable")]
    #[case("internal_error")]
    fn every_error_code_is_documented(#[case] code: &str) {
        assert!(schema_json::<ErrorCodeSchema>().contains(code), "missing {code}");
    }

    #[test]
    fn error_envelope_uses_camel_case() {
        let json = schema_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(json.contains("details"));
    }
}
