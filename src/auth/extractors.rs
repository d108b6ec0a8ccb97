use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::AppError, state::AppState, users::User};

/// Resolves the identity cookie to an existing user.
///
/// Rejects with [`AppError::Unauthorized`] when the cookie is absent, is not
/// a UUID, or names no user.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let raw = jar
            .get(&state.config.cookie.name)
            .map(|c| c.value().to_owned())
            .ok_or_else(|| {
                debug!("missing identity cookie");
                AppError::Unauthorized
            })?;

        let user_id = Uuid::parse_str(&raw).map_err(|_| {
            warn!("malformed identity cookie");
            AppError::Unauthorized
        })?;

        match state.users.find_by_id(user_id).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                warn!(%user_id, "identity cookie names no user");
                Err(AppError::Unauthorized)
            }
        }
    }
}
