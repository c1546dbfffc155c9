//! OpenAPI/Utoipa configuration.

use crate::api::{health::MISC_TAG, profile::PROFILE_TAG, site::SITE_TAG};
use utoipa::OpenApi;

/// OpenAPI documentation configuration.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Status Page API",
        version = "1.0.0",
        description = "Service status homepage, per-service incident timelines and admin profile linking."
    ),
    tags(
        (name = MISC_TAG, description = "Miscellaneous endpoints"),
        (name = SITE_TAG, description = "Public status page endpoints"),
        (name = PROFILE_TAG, description = "Admin-only profile linking endpoints")
    )
)]
pub struct ApiDoc;
