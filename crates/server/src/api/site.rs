//! Public site endpoints: homepage, service timelines, documentation.

use crate::AppResources;
use crate::entity::{event, service, status};
use crate::identity::RequestIdentity;
use crate::timeline::resolve_window;
use crate::views::{
    BaseContext, DocumentationView, HomeView, NotFoundView, ServiceView, past_days,
};
use axum::{
    Extension, Json,
    extract::Path,
    response::{IntoResponse, Response},
};
use hyper::StatusCode;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde_json::json;

/// Tag for OpenAPI documentation.
pub const SITE_TAG: &str = "Status Site";

/// How many services and recent events the homepage lists.
const HOMEPAGE_LIMIT: u64 = 10;
/// How many previous days the views summarize.
const PAST_DAYS: i64 = 5;

#[tracing::instrument(skip(resources, identity))]
#[utoipa::path(
    get,
    path = "/",
    tag = SITE_TAG,
    operation_id = "Homepage",
    summary = "Homepage with services, statuses and recent events",
    responses(
        (status = 200, description = "Homepage view data", body = HomeView, content_type = "application/json"),
        (status = 500, description = "Internal server error", content_type = "application/json")
    )
)]
pub async fn home(
    Extension(resources): Extension<AppResources>,
    identity: RequestIdentity,
) -> Response {
    let db = resources.db.as_ref();

    let services = match service::Entity::find()
        .order_by_asc(service::Column::Name)
        .limit(HOMEPAGE_LIMIT)
        .all(db)
        .await
    {
        Ok(services) => services,
        Err(e) => return db_error(e),
    };
    let all_statuses = match status::Entity::find()
        .order_by_asc(status::Column::Severity)
        .all(db)
        .await
    {
        Ok(statuses) => statuses,
        Err(e) => return db_error(e),
    };
    let default_status = match status::Entity::lowest_severity(db).await {
        Ok(found) => found,
        Err(e) => return db_error(e),
    };
    let info_status = match status::Entity::info(db).await {
        Ok(found) => found,
        Err(e) => return db_error(e),
    };
    let recent_events = match event::Entity::find()
        .order_by_desc(event::Column::Start)
        .limit(HOMEPAGE_LIMIT)
        .all(db)
        .await
    {
        Ok(events) => events,
        Err(e) => return db_error(e),
    };

    Json(HomeView {
        base: BaseContext::new(&identity, &resources.config),
        services,
        past: past_days(PAST_DAYS),
        all_statuses,
        default_status,
        info_status,
        recent_events,
    })
    .into_response()
}

#[tracing::instrument(skip(resources, identity))]
#[utoipa::path(
    get,
    path = "/documentation",
    tag = SITE_TAG,
    operation_id = "Documentation",
    summary = "Static documentation view",
    responses(
        (status = 200, description = "Documentation view data", body = DocumentationView, content_type = "application/json")
    )
)]
pub async fn documentation(
    Extension(resources): Extension<AppResources>,
    identity: RequestIdentity,
) -> Response {
    Json(DocumentationView {
        base: BaseContext::new(&identity, &resources.config),
    })
    .into_response()
}

#[tracing::instrument(skip(resources, identity))]
#[utoipa::path(
    get,
    path = "/services/{slug}",
    tag = SITE_TAG,
    operation_id = "Service Timeline",
    summary = "A service's event timeline",
    description = "The full, unfiltered timeline for a service. Appending \
                   `/{year}`, `/{year}/{month}` or `/{year}/{month}/{day}` \
                   narrows the timeline to that date window.",
    params(("slug" = String, Path, description = "Service slug")),
    responses(
        (status = 200, description = "Service timeline view data", body = ServiceView, content_type = "application/json"),
        (status = 404, description = "Unknown service or invalid date", body = NotFoundView, content_type = "application/json"),
        (status = 500, description = "Internal server error", content_type = "application/json")
    )
)]
pub async fn service_timeline(
    Extension(resources): Extension<AppResources>,
    identity: RequestIdentity,
    Path(slug): Path<String>,
) -> Response {
    render_service(&resources, &identity, &slug, None, None, None).await
}

pub async fn service_timeline_year(
    Extension(resources): Extension<AppResources>,
    identity: RequestIdentity,
    Path((slug, year)): Path<(String, String)>,
) -> Response {
    render_service(&resources, &identity, &slug, Some(&year), None, None).await
}

pub async fn service_timeline_month(
    Extension(resources): Extension<AppResources>,
    identity: RequestIdentity,
    Path((slug, year, month)): Path<(String, String, String)>,
) -> Response {
    render_service(&resources, &identity, &slug, Some(&year), Some(&month), None).await
}

pub async fn service_timeline_day(
    Extension(resources): Extension<AppResources>,
    identity: RequestIdentity,
    Path((slug, year, month, day)): Path<(String, String, String, String)>,
) -> Response {
    render_service(
        &resources,
        &identity,
        &slug,
        Some(&year),
        Some(&month),
        Some(&day),
    )
    .await
}

async fn render_service(
    resources: &AppResources,
    identity: &RequestIdentity,
    slug: &str,
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
) -> Response {
    let db = resources.db.as_ref();

    let service = match service::Entity::find_by_slug(db, slug).await {
        Ok(Some(service)) => service,
        Ok(None) => return not_found_response(),
        Err(e) => return db_error(e),
    };

    let window = match resolve_window(year, month, day) {
        Ok(window) => window,
        // An unparseable date path is a missing page, not a client error.
        Err(_) => return not_found_response(),
    };

    let mut query = event::Entity::find().filter(event::Column::ServiceId.eq(service.id));
    if let Some(window) = &window {
        query = query
            .filter(event::Column::Start.gte(window.start_at()))
            .filter(event::Column::Start.lt(window.end_at()));
    }
    let events = match query.order_by_desc(event::Column::Start).all(db).await {
        Ok(events) => events,
        Err(e) => return db_error(e),
    };

    let statuses = match status::Entity::find()
        .order_by_asc(status::Column::Severity)
        .all(db)
        .await
    {
        Ok(statuses) => statuses,
        Err(e) => return db_error(e),
    };

    Json(ServiceView {
        base: BaseContext::new(identity, &resources.config),
        service,
        events,
        start_date: window.map(|w| w.start),
        end_date: window.map(|w| w.end),
        statuses,
        past: past_days(PAST_DAYS),
        show_admin: window.is_none(),
    })
    .into_response()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    not_found_response()
}

pub(crate) fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, Json(NotFoundView::new())).into_response()
}

pub(crate) fn db_error(e: DbErr) -> Response {
    tracing::error!(
        name = "api.site.db_query_failed",
        error = ?e,
        message = "Datastore query failed"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "datastore error" })),
    )
        .into_response()
}
