//! A status page service.
//!
//! Serves a homepage of monitored services with recent events, per-service
//! incident timelines filtered by year/month/day path windows, and an
//! admin-only OAuth 1.0a flow that links an external account to a profile.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::oauth::ProfileLinker;

pub mod api;
pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod oauth;
pub mod timeline;
pub mod views;

/// Shared per-process resources handed to every handler.
#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub linker: Arc<ProfileLinker>,
    pub config: Arc<AppConfig>,
}
