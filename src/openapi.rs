use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{ItemView, ListingView, LoginBody, LoginResponse, SessionInfo};
use crate::listing::{Category, SortKey};
use crate::models::{Item, ItemKind};
use crate::navigation::MenuItem;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
        components.add_security_scheme(
            "query_token",
            SecurityScheme::ApiKey(ApiKey::Query(ApiKeyValue::new("token"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::healthz_live,
        crate::handlers::healthz_ready,
        crate::handlers::login,
        crate::handlers::logout,
        crate::handlers::current_session,
        crate::handlers::get_navigation,
        crate::handlers::list_webinars,
        crate::handlers::get_webinars_ical,
        crate::handlers::get_webinar,
        crate::handlers::list_courses,
        crate::handlers::get_course
    ),
    components(schemas(
        Item,
        ItemKind,
        ItemView,
        ListingView,
        Category,
        SortKey,
        MenuItem,
        LoginBody,
        LoginResponse,
        SessionInfo
    )),
    tags(
        (name = "portal", description = "Service and dashboard shell"),
        (name = "auth", description = "Member login and sessions"),
        (name = "listings", description = "Webinar and course listings")
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;
