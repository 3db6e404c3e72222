use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{dto::CreateWorkoutEntryRequest, repo_types::WorkoutEntry};
use crate::{auth::extractors::CurrentUser, dates::DayQuery, state::AppState, store::StoreError};

pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/workout-entries", get(list_entries).post(create_entry))
        .route("/workout-entries/:id", delete(delete_entry))
}

fn store_failure(e: StoreError) -> (StatusCode, String) {
    warn!(error = %e, "workout entry request failed");
    e.into()
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn list_entries(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<WorkoutEntry>>, (StatusCode, String)> {
    let date = query.day_or(state.clock.now().date())?;
    let entries = state
        .store
        .list_workout_entries(user.id, date)
        .await
        .map_err(store_failure)?;
    Ok(Json(entries))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateWorkoutEntryRequest>,
) -> Result<(StatusCode, Json<WorkoutEntry>), (StatusCode, String)> {
    let entry = body
        .into_new_entry(user.id, state.clock.now().date())
        .map_err(|msg| {
            warn!(reason = %msg, "workout entry rejected");
            (StatusCode::BAD_REQUEST, msg)
        })?;
    let entry = state
        .store
        .add_workout_entry(entry)
        .await
        .map_err(store_failure)?;
    info!(entry_id = %entry.id, workout = %entry.workout.name, minutes = entry.duration, "workout logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn delete_entry(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .store
        .delete_workout_entry(user.id, id)
        .await
        .map_err(store_failure)?;
    info!(entry_id = %id, "workout entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{
            build_app,
            test_support::{call, call_json, logged_in_state_with_clock},
        },
        store::seed::workout_id,
        timer::ManualClock,
    };
    use axum::http::Method;
    use serde_json::json;
    use std::sync::Arc;
    use time::macros::datetime;

    async fn app() -> Router {
        let clock = Arc::new(ManualClock::new(datetime!(2024-05-01 07:00:00 UTC)));
        build_app(logged_in_state_with_clock(clock).await)
    }

    #[tokio::test]
    async fn logs_a_workout_for_today() {
        let app = app().await;

        let (status, entry) = call_json(
            &app,
            Method::POST,
            "/api/v1/workout-entries",
            json!({
                "workout_id": workout_id(2),
                "duration": 15,
                "intensity": "low",
                "notes": "Short stretch"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["date"], "2024-05-01");
        assert_eq!(entry["workout"]["name"], "Morning Yoga Flow");
        assert_eq!(entry["intensity"], "low");

        let (_, today) = call(&app, Method::GET, "/api/v1/workout-entries", None).await;
        assert_eq!(today.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rejects_missing_duration_and_unknown_workout() {
        let app = app().await;

        let (status, msg) = call_json(
            &app,
            Method::POST,
            "/api/v1/workout-entries",
            json!({ "workout_id": workout_id(1) }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, json!("Please enter workout duration"));

        let (status, _) = call_json(
            &app,
            Method::POST,
            "/api/v1/workout-entries",
            json!({ "workout_id": Uuid::new_v4(), "duration": 10 }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversized_duration_is_rejected_and_summary_still_reads() {
        let app = app().await;

        let (status, msg) = call_json(
            &app,
            Method::POST,
            "/api/v1/workout-entries",
            json!({ "workout_id": workout_id(1), "duration": u32::MAX }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, json!("Duration cannot exceed 1440 minutes"));

        let (status, _) = call_json(
            &app,
            Method::POST,
            "/api/v1/workout-entries",
            json!({ "workout_id": workout_id(1), "duration": 1440 }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, summary) = call(&app, Method::GET, "/api/v1/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["workouts"]["duration"], 45 + 1440);
    }

    #[tokio::test]
    async fn delete_removes_only_that_entry() {
        let app = app().await;

        let (_, yesterday) =
            call(&app, Method::GET, "/api/v1/workout-entries?date=2024-04-30", None).await;
        let id = yesterday[0]["id"].as_str().unwrap().to_string();

        let uri = format!("/api/v1/workout-entries/{id}");
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, yesterday) =
            call(&app, Method::GET, "/api/v1/workout-entries?date=2024-04-30", None).await;
        assert_eq!(yesterday, json!([]));
        let (_, today) = call(&app, Method::GET, "/api/v1/workout-entries", None).await;
        assert_eq!(today.as_array().unwrap().len(), 1);
    }
}
