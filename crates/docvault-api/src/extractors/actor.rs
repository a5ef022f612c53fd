//! `Actor` extractor resolving the caller identity from the request headers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use docvault_core::error::AppError;
use docvault_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller identity.
pub const ACTOR_HEADER: &str = "x-docvault-user";

/// Longest identity accepted from the header.
const MAX_ACTOR_LEN: usize = 255;

/// Caller context available in handlers.
///
/// Taken from `X-DocVault-User`, falling back to `server.default_actor`.
/// The value is not authenticated.
#[derive(Debug, Clone)]
pub struct Actor(pub RequestContext);

impl Actor {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for Actor {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(ACTOR_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| AppError::validation("X-DocVault-User must be visible ASCII"))?
                    .trim(),
            ),
            None => None,
        };

        let actor = match header {
            Some(name) if !name.is_empty() => {
                if name.chars().count() > MAX_ACTOR_LEN {
                    return Err(AppError::validation(format!(
                        "X-DocVault-User must be at most {MAX_ACTOR_LEN} characters"
                    ))
                    .into());
                }
                name.to_string()
            }
            _ => state.config.server.default_actor.clone(),
        };

        Ok(Actor(RequestContext::new(actor)))
    }
}
