use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use super::services::{daily_summary, DailySummary};
use crate::{auth::extractors::CurrentUser, dates::DayQuery, state::AppState};

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/summary", get(get_summary))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn get_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<DayQuery>,
) -> Result<Json<DailySummary>, (StatusCode, String)> {
    let date = query.day_or(state.clock.now().date())?;
    let (meals, workouts) = tokio::try_join!(
        state.store.list_meal_entries(user.id, date),
        state.store.list_workout_entries(user.id, date),
    )
    .map_err(|e| {
        error!(error = %e, %date, "summary lookup failed");
        <(StatusCode, String)>::from(e)
    })?;
    Ok(Json(daily_summary(date, meals, workouts)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{
            build_app,
            test_support::{call, call_json, logged_in_state_with_clock},
        },
        store::seed::food_id,
        timer::ManualClock,
    };
    use axum::http::Method;
    use serde_json::json;
    use std::sync::Arc;
    use time::macros::datetime;

    #[tokio::test]
    async fn summary_requires_session() {
        let app = build_app(AppState::fake().await);
        let (status, msg) = call(&app, Method::GET, "/api/v1/summary", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(msg, json!("Please log in"));
    }

    #[tokio::test]
    async fn seeded_dashboard_for_today() {
        let clock = Arc::new(ManualClock::new(datetime!(2024-05-01 09:30:00 UTC)));
        let app = build_app(logged_in_state_with_clock(clock).await);

        let (status, today) = call(&app, Method::GET, "/api/v1/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(today["date"], "2024-05-01");
        // chicken + rice + yogurt
        assert_eq!(today["nutrition"]["calories"], 511.0);
        assert_eq!(today["workouts"]["duration"], 45);
        assert_eq!(today["workouts"]["calories_burned"], 350.0);
        assert_eq!(today["net_calories"], 161.0);
        assert_eq!(today["meal_count"], 3);

        let (_, yesterday) = call(&app, Method::GET, "/api/v1/summary?date=2024-04-30", None).await;
        assert_eq!(yesterday["meal_count"], 0);
        assert_eq!(yesterday["workouts"]["calories_burned"], 400.0);
    }

    #[tokio::test]
    async fn logged_meal_moves_totals() {
        let clock = Arc::new(ManualClock::new(datetime!(2024-05-01 09:30:00 UTC)));
        let app = build_app(logged_in_state_with_clock(clock).await);

        let (status, _) = call_json(
            &app,
            Method::POST,
            "/api/v1/meals",
            json!({ "food_id": food_id(5), "meal_type": "snack", "quantity": 2 }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, today) = call(&app, Method::GET, "/api/v1/summary?date=2024-05-01", None).await;
        assert_eq!(today["nutrition"]["calories"], 721.0);
        assert_eq!(today["meal_count"], 4);
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let clock = Arc::new(ManualClock::new(datetime!(2024-05-01 09:30:00 UTC)));
        let app = build_app(logged_in_state_with_clock(clock).await);
        let (status, _) = call(&app, Method::GET, "/api/v1/summary?date=05-01-2024", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
