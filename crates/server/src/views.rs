//! Typed view data for each page.
//!
//! Every view enumerates exactly the fields it renders instead of passing an
//! open-ended template context around. Views serialize to JSON; rendering
//! them into HTML is left to whatever front end consumes the API.

use crate::config::AppConfig;
use crate::entity::{event, service, status};
use crate::identity::RequestIdentity;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use utoipa::ToSchema;

/// Fields shared by every page: the caller's identity and the platform
/// login/logout link.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BaseContext {
    pub user: Option<String>,
    pub user_is_admin: bool,
    pub login_link: String,
}

impl BaseContext {
    pub fn new(identity: &RequestIdentity, config: &AppConfig) -> Self {
        let login_link = if identity.user.is_some() {
            config.identity.logout_url.clone()
        } else {
            config.identity.login_url.clone()
        };
        Self {
            user: identity.user.clone(),
            user_is_admin: identity.is_admin,
            login_link,
        }
    }
}

/// Homepage: all services with their current reference data and the most
/// recent events across the board.
#[derive(Debug, Serialize, ToSchema)]
pub struct HomeView {
    #[serde(flatten)]
    pub base: BaseContext,
    pub services: Vec<service::Model>,
    pub past: Vec<Date>,
    pub all_statuses: Vec<status::Model>,
    pub default_status: Option<status::Model>,
    pub info_status: Option<status::Model>,
    pub recent_events: Vec<event::Model>,
}

/// A single service's timeline, optionally filtered to a date window.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceView {
    #[serde(flatten)]
    pub base: BaseContext,
    pub service: service::Model,
    pub events: Vec<event::Model>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub statuses: Vec<status::Model>,
    pub past: Vec<Date>,
    /// True when the timeline is unfiltered; the admin controls are only
    /// offered on the live view.
    pub show_admin: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentationView {
    #[serde(flatten)]
    pub base: BaseContext,
}

/// Admin profile page: either the linked credential or the authorization URL
/// to start the handshake.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileView {
    #[serde(flatten)]
    pub base: BaseContext,
    pub user_is_authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundView {
    pub error: &'static str,
}

impl NotFoundView {
    pub fn new() -> Self {
        Self { error: "not found" }
    }
}

impl Default for NotFoundView {
    fn default() -> Self {
        Self::new()
    }
}

/// The previous `num` calendar days, yesterday first.
pub fn past_days(num: i64) -> Vec<Date> {
    let today = OffsetDateTime::now_utc().date();
    (1..=num)
        .filter_map(|i| today.checked_sub(time::Duration::days(i)))
        .collect()
}
