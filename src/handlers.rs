use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use axum_extra::extract::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use chrono::{Local, NaiveDateTime};
use serde::de::IntoDeserializer;
use serde::de::value::StrDeserializer;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::{
    AppState,
    auth::{authorize, provided_token},
    error::ApiError,
    listing::{self, Category, ListingQuery, SortKey},
    models::{Item, ItemKind},
    navigation::{self, MenuItem},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingParams {
    /// live, upcoming or past
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<Category>,
    /// Case-insensitive title substring
    pub q: Option<String>,
    /// newest or popularity
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort: Option<SortKey>,
    /// Session token (alternative to Bearer header)
    pub token: Option<String>,
}

/// Unset dropdowns arrive as `?category=&sort=`.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => {
            let value: StrDeserializer<'_, D::Error> = value.into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TokenParams {
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NavigationParams {
    /// Current dashboard path, marks the active entry
    pub path: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginBody {
    /// Membership No, email or mobile number
    #[serde(default)]
    pub identifier: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub identifier: String,
    #[schema(value_type = String, format = "date-time")]
    pub logged_in_at: chrono::DateTime<chrono::Utc>,
    pub profile_image: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub status: Category,
    pub action_label: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListingView {
    pub category: Option<Category>,
    pub sort: SortKey,
    pub query: String,
    pub total: usize,
    pub items: Vec<ItemView>,
}

impl ItemView {
    fn new(item: &Item, now: NaiveDateTime) -> Self {
        Self {
            item: item.clone(),
            status: listing::classify(item, now),
            action_label: item.action_label(),
        }
    }
}

fn listing_query(params: &ListingParams, default_category: Option<Category>) -> ListingQuery {
    ListingQuery {
        category: params.category.or(default_category),
        query: params.q.clone().unwrap_or_default(),
        sort: params.sort.unwrap_or_default(),
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn build_listing(
    state: &AppState,
    kind: ItemKind,
    params: &ListingParams,
    default_category: Option<Category>,
) -> ListingView {
    let query = listing_query(params, default_category);
    let now = now();
    let items: Vec<ItemView> = listing::run(state.catalog.items(kind), &query, now)
        .into_iter()
        .map(|item| ItemView::new(item, now))
        .collect();
    debug!(kind = ?kind, ?query, total = items.len(), "listing evaluated");

    ListingView {
        category: query.category,
        sort: query.sort,
        query: query.query,
        total: items.len(),
        items,
    }
}

fn find_item(state: &AppState, kind: ItemKind, id: &str) -> Result<Json<Item>, ApiError> {
    state
        .catalog
        .find(kind, id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("{} not found", kind.label())))
}

#[utoipa::path(get, path = "/", tag = "portal")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "USI Membership Portal API",
        "endpoints": {
            "/auth/login": "Log in with membership number, email or mobile",
            "/auth/logout": "Close the current session",
            "/auth/session": "Current session details",
            "/navigation": "Dashboard menu",
            "/webinars": "List webinars (category, q, sort)",
            "/webinars.ical": "Download webinars as iCal file",
            "/courses": "List courses (category, q, sort)"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "portal")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(get, path = "/healthz/ready", tag = "portal")]
pub async fn healthz_ready() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 400, description = "Empty identifier"),
        (status = 401, description = "Rejected by the membership backend"),
        (status = 502, description = "Membership backend unreachable")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let success = state.backend.login(&body.identifier).await?;
    let session = state.sessions.open(&body.identifier, success);
    Ok(Json(LoginResponse {
        token: session.token,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    params(TokenParams),
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Invalid or expired session")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<TokenParams>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    let token = provided_token(auth_header, query.token.as_deref())
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".into()))?;
    state
        .sessions
        .close(&token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".into()))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/auth/session",
    params(TokenParams),
    responses(
        (status = 200, description = "Current session", body = SessionInfo),
        (status = 401, description = "Invalid or expired session")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "auth"
)]
pub async fn current_session(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<TokenParams>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    let session = authorize(&state.sessions, auth_header, query.token.as_deref())?;
    let profile_image = navigation::resolve_image_url(
        session.profile_photo.as_deref(),
        &state.settings.backend_base_url,
    );
    Ok(Json(SessionInfo {
        identifier: session.identifier,
        logged_in_at: session.logged_in_at,
        profile_image,
    }))
}

#[utoipa::path(
    get,
    path = "/navigation",
    params(NavigationParams),
    responses(
        (status = 200, description = "Dashboard menu", body = [MenuItem]),
        (status = 401, description = "Invalid or expired session")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "portal"
)]
pub async fn get_navigation(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<NavigationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    authorize(&state.sessions, auth_header, query.token.as_deref())?;
    Ok(Json(navigation::menu(query.path.as_deref())))
}

#[utoipa::path(
    get,
    path = "/webinars",
    params(ListingParams),
    responses(
        (status = 200, description = "Webinar listing, live by default", body = ListingView),
        (status = 400, description = "Unknown category or sort key"),
        (status = 401, description = "Invalid or expired session")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "listings"
)]
pub async fn list_webinars(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(token): Query<TokenParams>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    authorize(&state.sessions, auth_header, token.token.as_deref())?;
    let Query(params) = params?;
    Ok(Json(build_listing(
        &state,
        ItemKind::Webinar,
        &params,
        Some(Category::Live),
    )))
}

#[utoipa::path(
    get,
    path = "/webinars.ical",
    params(ListingParams),
    responses(
        (status = 200, description = "iCal file", content_type = "text/calendar"),
        (status = 401, description = "Invalid or expired session"),
        (status = 404, description = "No webinars found")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "listings"
)]
pub async fn get_webinars_ical(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(token): Query<TokenParams>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    authorize(&state.sessions, auth_header, token.token.as_deref())?;
    let Query(params) = params?;

    let query = listing_query(&params, Some(Category::Live));
    let items = listing::run(state.catalog.items(ItemKind::Webinar), &query, now());
    if items.is_empty() {
        return Err(ApiError::NotFound("No webinars found".into()));
    }

    let body = state.exporter.generate(ItemKind::Webinar, &items);
    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/calendar"),
            ("content-disposition", "attachment; filename=usi_webinars.ics"),
        ],
        body,
    ))
}

#[utoipa::path(
    get,
    path = "/webinars/{id}",
    params(("id" = String, Path, description = "Webinar id"), TokenParams),
    responses(
        (status = 200, description = "Webinar details", body = Item),
        (status = 401, description = "Invalid or expired session"),
        (status = 404, description = "Webinar not found")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "listings"
)]
pub async fn get_webinar(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(id): Path<String>,
    Query(query): Query<TokenParams>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    authorize(&state.sessions, auth_header, query.token.as_deref())?;
    find_item(&state, ItemKind::Webinar, &id)
}

#[utoipa::path(
    get,
    path = "/courses",
    params(ListingParams),
    responses(
        (status = 200, description = "Courses, all categories by default", body = ListingView),
        (status = 400, description = "Unknown category or sort key"),
        (status = 401, description = "Invalid or expired session")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "listings"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Query(token): Query<TokenParams>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    authorize(&state.sessions, auth_header, token.token.as_deref())?;
    let Query(params) = params?;
    Ok(Json(build_listing(&state, ItemKind::Course, &params, None)))
}

#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(("id" = String, Path, description = "Course id"), TokenParams),
    responses(
        (status = 200, description = "Course details", body = Item),
        (status = 401, description = "Invalid or expired session"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = []), ("query_token" = [])),
    tag = "listings"
)]
pub async fn get_course(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Bearer>>>,
    Path(id): Path<String>,
    Query(query): Query<TokenParams>,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = auth.map(|TypedHeader(a)| a);
    authorize(&state.sessions, auth_header, query.token.as_deref())?;
    find_item(&state, ItemKind::Course, &id)
}
