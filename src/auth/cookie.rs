use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;
use uuid::Uuid;

use crate::config::CookieConfig;

/// Cookie carrying the user's identity. `Max-Age` is emitted in seconds.
pub fn identity_cookie(cfg: &CookieConfig, user_id: Uuid) -> Cookie<'static> {
    Cookie::build((cfg.name.clone(), user_id.to_string()))
        .path("/")
        .http_only(true)
        .secure(cfg.secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(cfg.max_age_days))
        .build()
}
