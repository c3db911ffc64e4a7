//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{catalog, health, languages, library_years};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Statistics API",
        version = "1.0.0",
        description = "Annual statistics submissions of consortium libraries",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        languages::list_languages,
        catalog::get_item,
        catalog::update_item,
        catalog::create_item,
        // Library years
        library_years::ensure_library_year,
        library_years::list_subscriptions,
        library_years::create_subscription,
        library_years::delete_subscription,
    ),
    components(
        schemas(
            crate::models::CatalogKind,
            crate::models::EditOutcome,
            crate::models::Language,
            crate::models::LibraryYear,
            crate::models::catalog::SubscribedItem,
            crate::models::library_year::EnsureLibraryYear,
            crate::models::ebook::EBookFields,
            crate::models::ebook::EBookCounts,
            crate::models::ejournal::EJournalFields,
            crate::models::ejournal::EJournalCounts,
            crate::models::audiovisual::AudioVisualFields,
            crate::models::audiovisual::AudioVisualCounts,
            catalog::CreatedResponse,
            library_years::SubscribeRequest,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "E-Book, E-Journal and audio-visual catalog"),
        (name = "library-years", description = "Library submission periods and subscriptions")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
