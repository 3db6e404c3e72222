use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        extractors::CurrentUser,
        password::is_valid_email,
        repo_types::SessionUser,
        session::AuthError,
    },
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn bad_request(msg: &str) -> (StatusCode, String) {
    warn!(reason = msg, "rejected auth request");
    (StatusCode::BAD_REQUEST, msg.to_string())
}

fn auth_failure(e: AuthError) -> (StatusCode, String) {
    if matches!(e, AuthError::Storage(_) | AuthError::Hashing(_)) {
        error!(error = %e, "auth failed");
    }
    e.into()
}

fn validate_register(p: &RegisterRequest) -> Result<(), (StatusCode, String)> {
    if [&p.name, &p.email, &p.password, &p.confirm_password]
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(bad_request("Please fill in all fields"));
    }
    if p.password != p.confirm_password {
        return Err(bad_request("Passwords do not match"));
    }
    if p.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(bad_request("Password must be at least 6 characters"));
    }
    if !is_valid_email(p.email.trim()) {
        return Err(bad_request("Invalid email"));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    validate_register(&payload)?;

    let user = state
        .session
        .register(&payload.name, &payload.email, &payload.password)
        .await
        .map_err(auth_failure)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Account created successfully!".into(),
            user,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(bad_request("Please fill in all fields"));
    }

    let user = state
        .session
        .login(&payload.email, &payload.password)
        .await
        .map_err(auth_failure)?;

    Ok(Json(AuthResponse {
        message: "Welcome back!".into(),
        user,
    }))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    let previous = state.session.current().await;
    state.session.logout().await.map_err(auth_failure)?;
    if let Some(user) = previous {
        let dropped = state.builders.remove_owner(user.id).await;
        if dropped > 0 {
            info!(user_id = %user.id, dropped, "discarded unsaved custom workouts");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<SessionUser> {
    Json(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::build_app,
        app::test_support::{call, call_json},
        store::seed::{demo_user_id, DEMO_USER_EMAIL, DEMO_USER_PASSWORD},
    };
    use axum::http::Method;
    use serde_json::json;

    fn register_body(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn register_validation_order() {
        let mut empty = register_body("secret1", "secret1");
        empty.name = "  ".into();
        assert_eq!(validate_register(&empty).unwrap_err().1, "Please fill in all fields");
        assert_eq!(
            validate_register(&register_body("secret1", "secret2")).unwrap_err().1,
            "Passwords do not match"
        );
        assert_eq!(
            validate_register(&register_body("abc", "abc")).unwrap_err().1,
            "Password must be at least 6 characters"
        );
        let mut bad_email = register_body("secret1", "secret1");
        bad_email.email = "sam".into();
        assert_eq!(validate_register(&bad_email).unwrap_err().1, "Invalid email");
        assert!(validate_register(&register_body("secret1", "secret1")).is_ok());
    }

    #[tokio::test]
    async fn login_me_logout_flow() {
        let state = AppState::fake().await;
        let app = build_app(state.clone());

        let (status, _) = call(&app, Method::GET, "/api/v1/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = call_json(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": DEMO_USER_EMAIL, "password": DEMO_USER_PASSWORD }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], demo_user_id().to_string());

        let (status, body) = call(&app, Method::GET, "/api/v1/me", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], DEMO_USER_EMAIL);

        let (status, _) = call(&app, Method::POST, "/api/v1/auth/logout", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::GET, "/api/v1/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let app = build_app(AppState::fake().await);
        let (status, body) = call_json(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            json!({ "email": DEMO_USER_EMAIL, "password": "nope" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!("Invalid email or password"));
    }

    #[tokio::test]
    async fn register_conflicts_on_existing_email() {
        let state = AppState::fake().await;
        let app = build_app(state.clone());
        let (status, _) = call_json(
            &app,
            Method::POST,
            "/api/v1/auth/register",
            json!({
                "name": "Dup",
                "email": DEMO_USER_EMAIL,
                "password": "secret1",
                "confirm_password": "secret1"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(state.session.registry().len().await, 1);

        let (status, body) = call_json(
            &app,
            Method::POST,
            "/api/v1/auth/register",
            json!({
                "name": "New",
                "email": "new@example.com",
                "password": "secret1",
                "confirm_password": "secret1"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["name"], "New");
        assert_eq!(state.session.current().await.unwrap().email, "new@example.com");
    }
}
