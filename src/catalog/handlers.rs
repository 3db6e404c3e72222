use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{validate_food, validate_workout, SearchQuery},
    repo_types::{Food, NewFood, NewWorkout, Workout},
};
use crate::{auth::extractors::CurrentUser, state::AppState, store::StoreError};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts).post(create_workout))
        .route("/workouts/:id", get(get_workout))
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", get(get_food))
}

fn store_failure(e: StoreError) -> (StatusCode, String) {
    warn!(error = %e, "catalog request failed");
    e.into()
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Workout>>, (StatusCode, String)> {
    let workouts = match query.term() {
        Some(q) => state.store.search_workouts(q).await,
        None => state.store.list_workouts().await,
    }
    .map_err(store_failure)?;
    Ok(Json(workouts))
}

#[instrument(skip(state))]
pub async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Workout>, (StatusCode, String)> {
    let workout = state.store.get_workout(id).await.map_err(store_failure)?;
    Ok(Json(workout))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewWorkout>,
) -> Result<(StatusCode, Json<Workout>), (StatusCode, String)> {
    validate_workout(&body).map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;
    let workout = state
        .store
        .add_custom_workout(body)
        .await
        .map_err(store_failure)?;
    info!(workout_id = %workout.id, name = %workout.name, "custom workout added");
    Ok((StatusCode::CREATED, Json(workout)))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Food>>, (StatusCode, String)> {
    let foods = match query.term() {
        Some(q) => state.store.search_foods(q).await,
        None => state.store.list_foods().await,
    }
    .map_err(store_failure)?;
    Ok(Json(foods))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Food>, (StatusCode, String)> {
    let food = state.store.get_food(id).await.map_err(store_failure)?;
    Ok(Json(food))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create_food(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<NewFood>,
) -> Result<(StatusCode, Json<Food>), (StatusCode, String)> {
    validate_food(&body).map_err(|msg| {
        warn!(reason = %msg, "invalid custom food");
        (StatusCode::BAD_REQUEST, msg)
    })?;
    let food = state.store.add_custom_food(body).await.map_err(store_failure)?;
    info!(food_id = %food.id, name = %food.name, "custom food added");
    Ok((StatusCode::CREATED, Json(food)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{
            build_app,
            test_support::{call, call_json, logged_in_state},
        },
        store::seed::{food_id, workout_id},
    };
    use axum::http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn catalog_reads_are_public() {
        let app = build_app(AppState::fake().await);

        let (status, all) = call(&app, Method::GET, "/api/v1/workouts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 5);

        let (_, found) = call(&app, Method::GET, "/api/v1/foods?q=PROTEIN", None).await;
        let names: Vec<_> = found
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Grilled Chicken Breast", "Salmon Fillet"]);

        let uri = format!("/api/v1/workouts/{}", workout_id(3));
        let (status, hiit) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hiit["calories_burn"], 400.0);
        assert_eq!(hiit["difficulty"], "advanced");

        let uri = format!("/api/v1/foods/{}", food_id(2));
        let (_, rice) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(rice["serving_size"], "1 cup cooked");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let app = build_app(AppState::fake().await);
        let uri = format!("/api/v1/foods/{}", Uuid::new_v4());
        let (status, _) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn custom_food_needs_session_and_valid_fields() {
        let body = json!({
            "name": "Homemade Granola",
            "category": "grain",
            "calories": 180,
            "protein": 5,
            "carbs": 24,
            "fat": 7.5,
            "serving_size": "40g"
        });

        let anon = build_app(AppState::fake().await);
        let (status, _) = call_json(&anon, Method::POST, "/api/v1/foods", body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let app = build_app(logged_in_state().await);
        let mut bad = body.clone();
        bad["calories"] = json!(-5);
        let (status, msg) = call_json(&app, Method::POST, "/api/v1/foods", bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, json!("Calories cannot be negative"));

        let (status, food) = call_json(&app, Method::POST, "/api/v1/foods", body).await;
        assert_eq!(status, StatusCode::CREATED);
        let (_, found) = call(&app, Method::GET, "/api/v1/foods?q=granola", None).await;
        assert_eq!(found[0]["id"], food["id"]);
    }
}
