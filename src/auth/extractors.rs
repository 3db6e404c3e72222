use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tracing::debug;

use super::repo_types::SessionUser;
use crate::state::AppState;

/// The logged-in user; rejects with 401 when nobody is.
pub struct CurrentUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.session.current().await {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                debug!("request without a session");
                Err((StatusCode::UNAUTHORIZED, "Please log in".into()))
            }
        }
    }
}
