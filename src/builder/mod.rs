mod dto;
pub mod handlers;
pub mod registry;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::builder_routes()
}
