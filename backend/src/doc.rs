//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` handler plus the health probes. Schemas
//! referenced from request and response bodies are registered automatically;
//! the error envelope mirrors ([`ErrorSchema`], [`ErrorCodeSchema`]) are listed
//! explicitly because domain types carry no utoipa derives.
//!
//! The document backs Swagger UI at `/docs` in debug builds and is printed by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/v1/auth/register or /api/v1/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Rideshare API",
        description = "Carpooling backend: accounts, ride offers, seat bookings and reviews."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::current_user,
        crate::inbound::http::accounts::update_profile,
        crate::inbound::http::rides::list_rides,
        crate::inbound::http::rides::search_rides,
        crate::inbound::http::rides::my_rides,
        crate::inbound::http::rides::ride_details,
        crate::inbound::http::rides::create_ride,
        crate::inbound::http::rides::cancel_ride,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::my_bookings,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "accounts", description = "Registration, login and profile"),
        (name = "rides", description = "Offering, browsing and cancelling rides"),
        (name = "bookings", description = "Reserving and releasing seats"),
        (name = "reviews", description = "Rating other riders"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's paths and schemas.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/auth/me")]
    #[case("/api/v1/rides")]
    #[case("/api/v1/rides/search")]
    #[case("/api/v1/rides/mine")]
    #[case("/api/v1/rides/{id}")]
    #[case("/api/v1/bookings")]
    #[case("/api/v1/bookings/mine")]
    #[case("/api/v1/bookings/{id}")]
    #[case("/api/v1/reviews")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        let scheme = components
            .security_schemes
            .get(BEARER_SCHEME)
            .expect("bearer scheme");
        let json = serde_json::to_value(scheme).expect("scheme serialises");

        assert_eq!(json["scheme"], "bearer");
        assert_eq!(json["bearerFormat"], "JWT");
    }

    #[test]
    fn document_serialises_to_json() {
        let json = ApiDoc::openapi().to_json().expect("document serialises");
        assert!(json.contains("Rideshare API"));
    }
}
