//! Admin profile endpoints: the OAuth linking state machine's HTTP surface.
//!
//! `/profile` shows the link state and, for unlinked admins, starts the
//! handshake by fetching a request token. `/profile/verify` receives the
//! provider's redirect and finishes the exchange. Both require the admin
//! capability; everything else answers 403 with an empty body.

use crate::AppResources;
use crate::config::AppConfig;
use crate::entity::{auth_request, profile};
use crate::identity::{RequestIdentity, require_admin};
use crate::oauth::{ProviderEndpoints, is_dev_host};
use crate::views::{BaseContext, ProfileView};
use axum::{
    Extension, Json,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use hyper::{HeaderMap, header};
use serde::Deserialize;
use utoipa::IntoParams;

use super::site::db_error;

/// Tag for OpenAPI documentation.
pub const PROFILE_TAG: &str = "Admin Profile";

#[derive(Deserialize, IntoParams, Debug)]
pub struct VerifyParams {
    pub oauth_token: Option<String>,
    pub oauth_verifier: Option<String>,
}

#[tracing::instrument(skip(resources, identity, headers))]
#[utoipa::path(
    get,
    path = "/profile",
    tag = PROFILE_TAG,
    operation_id = "Admin Profile",
    summary = "Link state of the admin's external account",
    description = "For a linked admin, reports the stored access token. For an \
                   unlinked admin, obtains a request token from the provider \
                   and exposes the authorization URL to visit. In local \
                   development no provider call is made and the profile simply \
                   reports as unlinked.",
    responses(
        (status = 200, description = "Profile view data", body = ProfileView, content_type = "application/json"),
        (status = 403, description = "Caller is not an admin"),
        (status = 500, description = "Internal server error", content_type = "application/json")
    )
)]
pub async fn profile(
    Extension(resources): Extension<AppResources>,
    identity: RequestIdentity,
    headers: HeaderMap,
) -> Response {
    let admin = match require_admin(&identity) {
        Ok(admin) => admin,
        Err(denied) => return denied.into_response(),
    };
    let db = resources.db.as_ref();
    let base = BaseContext::new(&identity, &resources.config);

    match profile::Entity::find_by_owner(db, &admin.user).await {
        Err(e) => db_error(e),
        Ok(Some(linked)) => Json(ProfileView {
            base,
            user_is_authorized: true,
            access_token: Some(linked.access_token),
            oauth_url: None,
        })
        .into_response(),
        Ok(None) => {
            let host = request_host(&headers);
            let mut view = ProfileView {
                base,
                user_is_authorized: false,
                access_token: None,
                oauth_url: None,
            };

            if let Some(endpoints) = provider_endpoints(&resources.config, host) {
                let callback = format!("http://{host}{}", resources.config.oauth.callback_path);
                match resources
                    .linker
                    .begin_link(db, &endpoints, &admin.user, &callback)
                    .await
                {
                    Ok(oauth_url) => view.oauth_url = Some(oauth_url),
                    Err(e) => {
                        // Absorbed: the page renders unlinked with no URL and
                        // the user can retry by reloading.
                        tracing::warn!(
                            name = "api.profile.request_token_failed",
                            owner = %admin.user,
                            error = %e,
                            message = "Request token leg failed"
                        );
                    }
                }
            }

            Json(view).into_response()
        }
    }
}

#[tracing::instrument(skip(resources, identity, headers, params))]
#[utoipa::path(
    get,
    path = "/profile/verify",
    tag = PROFILE_TAG,
    operation_id = "Verify Profile Link",
    summary = "Provider redirect target completing the handshake",
    description = "Exchanges the authorized request token plus verifier for an \
                   access token and stores it as the admin's profile. Always \
                   redirects back to `/profile`, whether or not the exchange \
                   succeeded.",
    params(VerifyParams),
    responses(
        (status = 303, description = "Redirect to /profile"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn verify(
    Extension(resources): Extension<AppResources>,
    identity: RequestIdentity,
    headers: HeaderMap,
    Query(params): Query<VerifyParams>,
) -> Response {
    let admin = match require_admin(&identity) {
        Ok(admin) => admin,
        Err(denied) => return denied.into_response(),
    };
    let db = resources.db.as_ref();

    let pending = match auth_request::Entity::find_by_owner(db, &admin.user).await {
        Ok(pending) => pending,
        Err(e) => {
            tracing::error!(
                name = "api.verify.db_query_failed",
                error = ?e,
                message = "Failed to load auth request"
            );
            None
        }
    };

    if let (Some(token), Some(verifier), Some(pending)) =
        (&params.oauth_token, &params.oauth_verifier, pending)
    {
        let host = request_host(&headers);
        if let Some(endpoints) = provider_endpoints(&resources.config, host) {
            match resources
                .linker
                .complete_link(
                    db,
                    &endpoints,
                    &admin.user,
                    token,
                    verifier,
                    &pending.request_secret,
                )
                .await
            {
                Ok(_) => {
                    tracing::info!(
                        name = "api.verify.profile_linked",
                        owner = %admin.user,
                        message = "Profile linked"
                    );
                }
                Err(e) => {
                    // Absorbed: the user lands back on /profile unlinked.
                    tracing::warn!(
                        name = "api.verify.exchange_failed",
                        owner = %admin.user,
                        error = %e,
                        message = "Access token exchange failed"
                    );
                }
            }
        }
    }

    Redirect::to("/profile").into_response()
}

fn request_host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("nohost")
}

/// Where to find the provider, or `None` when the handshake is skipped
/// entirely (local development without an explicit provider override).
fn provider_endpoints(config: &AppConfig, host: &str) -> Option<ProviderEndpoints> {
    match &config.oauth.provider_base {
        Some(base) => Some(ProviderEndpoints::from_base(base)),
        None if is_dev_host(host) => None,
        None => Some(ProviderEndpoints::for_host(host)),
    }
}
