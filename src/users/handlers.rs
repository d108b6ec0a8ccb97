use axum::{extract::State, http::StatusCode, routing::post, Router};
use axum_extra::extract::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::cookie::identity_cookie,
    error::AppResult,
    extract::ValidJson,
    state::AppState,
    users::dto::RegisterRequest,
};

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

/// Registers a user, or identifies the existing one owning the email, and
/// hands the identity back as a cookie.
#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar)> {
    let payload = payload.normalize()?;

    let (user, created) = state
        .users
        .find_or_create(&payload.name, &payload.email)
        .await?;

    if created {
        info!(user_id = %user.id, "user registered");
    } else {
        info!(user_id = %user.id, "existing user identified");
    }

    let jar = jar.add(identity_cookie(&state.config.cookie, user.id));
    Ok((StatusCode::CREATED, jar))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use tower::ServiceExt;

    use super::*;

    fn register_request(body: &str) -> Request<Body> {
        Request::post("/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn set_cookie(res: &axum::response::Response) -> String {
        res.headers()
            .get(header::SET_COOKIE)
            .expect("identity cookie")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn register_sets_identity_cookie() {
        let app = users_routes().with_state(AppState::fake());

        let res = app
            .oneshot(register_request(
                r#"{"name":"John Doe","email":"johndoe@example.com"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::CREATED);
        let cookie = set_cookie(&res);
        assert!(cookie.starts_with("userId="));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[tokio::test]
    async fn same_email_reuses_identity() {
        let app = users_routes().with_state(AppState::fake());

        let first = app
            .clone()
            .oneshot(register_request(
                r#"{"name":"John Doe","email":"johndoe@example.com"}"#,
            ))
            .await
            .unwrap();
        let second = app
            .clone()
            .oneshot(register_request(
                r#"{"name":"Johnny","email":"JohnDoe@example.com"}"#,
            ))
            .await
            .unwrap();
        let other = app
            .oneshot(register_request(
                r#"{"name":"Jane Doe","email":"janedoe@example.com"}"#,
            ))
            .await
            .unwrap();

        let token = |c: String| c.split(';').next().unwrap().to_string();
        assert_eq!(token(set_cookie(&first)), token(set_cookie(&second)));
        assert_ne!(token(set_cookie(&first)), token(set_cookie(&other)));
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let app = users_routes().with_state(AppState::fake());

        let missing_email = app
            .clone()
            .oneshot(register_request(r#"{"name":"John Doe"}"#))
            .await
            .unwrap();
        assert_eq!(missing_email.status(), StatusCode::BAD_REQUEST);

        let bad_email = app
            .oneshot(register_request(r#"{"name":"John Doe","email":"nope"}"#))
            .await
            .unwrap();
        assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);
    }
}
