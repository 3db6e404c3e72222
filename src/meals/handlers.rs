use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::CreateMealEntryRequest,
    repo_types::{MealEntry, NewMealEntry},
};
use crate::{
    auth::extractors::CurrentUser,
    dates::DayQuery,
    state::AppState,
    store::StoreError,
    summary::services::{group_meal_history, MealHistoryDay},
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/history", get(meal_history))
        .route("/meals/:id", delete(delete_meal))
}

fn store_failure(e: StoreError) -> (StatusCode, String) {
    warn!(error = %e, "meal request failed");
    e.into()
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<MealEntry>>, (StatusCode, String)> {
    let date = query.day_or(state.clock.now().date())?;
    let entries = state
        .store
        .list_meal_entries(user.id, date)
        .await
        .map_err(store_failure)?;
    Ok(Json(entries))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateMealEntryRequest>,
) -> Result<(StatusCode, Json<MealEntry>), (StatusCode, String)> {
    body.validate().map_err(|msg| {
        warn!(reason = %msg, "meal entry rejected");
        (StatusCode::BAD_REQUEST, msg)
    })?;
    let entry = NewMealEntry {
        user_id: user.id,
        food_id: body.food_id,
        date: body.date.unwrap_or_else(|| state.clock.now().date()),
        meal_type: body.meal_type,
        quantity: body.quantity,
    };
    let entry = state.store.add_meal_entry(entry).await.map_err(store_failure)?;
    info!(entry_id = %entry.id, food = %entry.food.name, quantity = entry.quantity, "food logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .store
        .delete_meal_entry(user.id, id)
        .await
        .map_err(store_failure)?;
    info!(entry_id = %id, "meal entry deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn meal_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<MealHistoryDay>>, (StatusCode, String)> {
    let entries = state
        .store
        .list_all_meal_entries(user.id)
        .await
        .map_err(store_failure)?;
    Ok(Json(group_meal_history(entries)))
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
    use serde_json::{json, Value};
    use std::sync::Arc;
    use time::macros::datetime;

    async fn app() -> Router {
        let clock = Arc::new(ManualClock::new(datetime!(2024-05-01 12:00:00 UTC)));
        build_app(logged_in_state_with_clock(clock).await)
    }

    #[tokio::test]
    async fn entries_need_a_session() {
        let anon = build_app(AppState::fake().await);
        let (status, _) = call(&anon, Method::GET, "/api/v1/meals", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = call_json(
            &anon,
            Method::POST,
            "/api/v1/meals",
            json!({ "food_id": food_id(1) }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_list_and_delete() {
        let app = app().await;

        let (status, entry) = call_json(
            &app,
            Method::POST,
            "/api/v1/meals",
            json!({ "food_id": food_id(7), "meal_type": "dinner", "quantity": 1.5, "date": "2024-04-28" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(entry["food"]["name"], "Salmon Fillet");
        assert_eq!(entry["date"], "2024-04-28");

        let (_, day) = call(&app, Method::GET, "/api/v1/meals?date=2024-04-28", None).await;
        assert_eq!(day.as_array().unwrap().len(), 1);

        let uri = format!("/api/v1/meals/{}", entry["id"].as_str().unwrap());
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, day) = call(&app, Method::GET, "/api/v1/meals?date=2024-04-28", None).await;
        assert_eq!(day, json!([]));
    }

    #[tokio::test]
    async fn rejects_bad_quantity_and_unknown_food() {
        let app = app().await;

        let (status, msg) = call_json(
            &app,
            Method::POST,
            "/api/v1/meals",
            json!({ "food_id": food_id(1), "quantity": -1 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, json!("Quantity must be greater than zero"));

        let (status, _) = call_json(
            &app,
            Method::POST,
            "/api/v1/meals",
            json!({ "food_id": Uuid::new_v4() }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, today) = call(&app, Method::GET, "/api/v1/meals", None).await;
        assert_eq!(today.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn history_groups_newest_first() {
        let app = app().await;
        call_json(
            &app,
            Method::POST,
            "/api/v1/meals",
            json!({ "food_id": food_id(5), "meal_type": "snack", "date": "2024-04-30" }),
        )
        .await;

        let (status, history) = call(&app, Method::GET, "/api/v1/meals/history", None).await;
        assert_eq!(status, StatusCode::OK);
        let days: Vec<&Value> = history.as_array().unwrap().iter().collect();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0]["date"], "2024-05-01");
        assert_eq!(days[0]["total_calories"], 511.0);
        assert_eq!(days[1]["date"], "2024-04-30");
        assert_eq!(days[1]["entries"][0]["meal_type"], "snack");
    }
}
