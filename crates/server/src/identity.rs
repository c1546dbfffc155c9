//! Request identity, threaded explicitly into handlers.
//!
//! Session management is delegated to the fronting platform, which injects
//! the authenticated user and admin flag as trusted proxy headers. There is
//! no ambient current-user accessor; handlers take a [`RequestIdentity`]
//! extractor and admin-only handlers pass it through [`require_admin`].

use crate::AppResources;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

/// The identity (if any) of the caller, as asserted by the platform.
#[derive(Debug, Clone, Default)]
pub struct RequestIdentity {
    pub user: Option<String>,
    pub is_admin: bool,
}

/// Proof that [`require_admin`] succeeded: a logged-in user with the admin
/// capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    pub user: String,
}

/// Authorization failure. Renders as 403 with an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denied;

impl IntoResponse for Denied {
    fn into_response(self) -> Response {
        StatusCode::FORBIDDEN.into_response()
    }
}

/// Explicit authorization guard for admin-only handlers.
pub fn require_admin(identity: &RequestIdentity) -> Result<AdminIdentity, Denied> {
    match &identity.user {
        Some(user) if identity.is_admin => Ok(AdminIdentity { user: user.clone() }),
        _ => Err(Denied),
    }
}

impl<S> FromRequestParts<S> for RequestIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resources = parts
            .extensions
            .get::<AppResources>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("AppResources not found in extensions");
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

        let header_value = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let user = header_value(&resources.config.identity.user_header);
        let is_admin = header_value(&resources.config.identity.admin_header)
            .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes"));

        Ok(RequestIdentity { user, is_admin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_requires_user_and_flag() {
        let identity = RequestIdentity {
            user: Some("admin@example.com".into()),
            is_admin: true,
        };
        let admin = require_admin(&identity).expect("authorized");
        assert_eq!(admin.user, "admin@example.com");
    }

    #[test]
    fn non_admin_is_denied() {
        let identity = RequestIdentity {
            user: Some("user@example.com".into()),
            is_admin: false,
        };
        assert_eq!(require_admin(&identity), Err(Denied));
    }

    #[test]
    fn admin_flag_without_user_is_denied() {
        let identity = RequestIdentity {
            user: None,
            is_admin: true,
        };
        assert_eq!(require_admin(&identity), Err(Denied));
    }
}
