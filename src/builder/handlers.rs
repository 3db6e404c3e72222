use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{BuilderDetailsRequest, SavedCustomWorkout},
    registry::BuilderView,
    services::{BuilderError, CustomWorkoutBuilder, ExercisePatch},
};
use crate::{auth::extractors::CurrentUser, state::AppState, store::StoreError};

pub fn builder_routes() -> Router<AppState> {
    Router::new()
        .route("/custom-workouts", post(create_builder))
        .route(
            "/custom-workouts/:id",
            axum::routing::get(get_builder)
                .put(update_details)
                .delete(discard_builder),
        )
        .route("/custom-workouts/:id/exercises", post(add_exercise))
        .route(
            "/custom-workouts/:id/exercises/:exercise_id",
            patch(update_exercise).delete(remove_exercise),
        )
        .route("/custom-workouts/:id/start", post(start_workout))
        .route(
            "/custom-workouts/:id/exercises/:exercise_id/start",
            post(start_exercise),
        )
        .route(
            "/custom-workouts/:id/exercises/:exercise_id/complete",
            post(complete_exercise),
        )
        .route("/custom-workouts/:id/stop", post(stop_workout))
        .route("/custom-workouts/:id/save", post(save_workout))
}

fn builder_failure(e: BuilderError) -> (StatusCode, String) {
    warn!(error = %e, "custom workout request rejected");
    e.into()
}

fn store_failure(e: StoreError) -> (StatusCode, String) {
    warn!(error = %e, "saving custom workout failed");
    e.into()
}

/// Applies `f` to the caller's builder and returns the refreshed view.
async fn apply<F>(
    state: &AppState,
    owner: Uuid,
    id: Uuid,
    f: F,
) -> Result<Json<BuilderView>, (StatusCode, String)>
where
    F: FnOnce(&mut CustomWorkoutBuilder, OffsetDateTime) -> Result<(), BuilderError>,
{
    let clock = state.clock.clone();
    let now = clock.now();
    let view = state
        .builders
        .with_session(owner, id, |s| {
            f(&mut s.builder, now)?;
            s.sync_ticker(&clock);
            Ok::<_, BuilderError>(s.view(clock.as_ref()))
        })
        .await
        .map_err(builder_failure)?
        .map_err(builder_failure)?;
    Ok(Json(view))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn create_builder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    body: Option<Json<BuilderDetailsRequest>>,
) -> Result<(StatusCode, Json<BuilderView>), (StatusCode, String)> {
    let view = state.builders.create(user.id, state.clock.as_ref()).await;
    let Some(Json(details)) = body else {
        return Ok((StatusCode::CREATED, Json(view)));
    };
    let Json(view) = apply(&state, user.id, view.id, |b, _| {
        b.set_details(details.name, details.description)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn get_builder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BuilderView>, (StatusCode, String)> {
    apply(&state, user.id, id, |_, _| Ok(())).await
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn update_details(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<BuilderDetailsRequest>,
) -> Result<Json<BuilderView>, (StatusCode, String)> {
    apply(&state, user.id, id, |b, _| {
        b.set_details(body.name, body.description)
    })
    .await
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn add_exercise(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    body: Option<Json<ExercisePatch>>,
) -> Result<(StatusCode, Json<BuilderView>), (StatusCode, String)> {
    let patch = body.map(|Json(p)| p).unwrap_or_default();
    let view = apply(&state, user.id, id, |b, _| {
        let exercise_id = b.add_exercise()?;
        b.update_exercise(exercise_id, patch)
    })
    .await?;
    Ok((StatusCode::CREATED, view))
}

#[instrument(skip(state, body), fields(user_id = %user.id))]
pub async fn update_exercise(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, exercise_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<ExercisePatch>,
) -> Result<Json<BuilderView>, (StatusCode, String)> {
    apply(&state, user.id, id, |b, _| b.update_exercise(exercise_id, body)).await
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn remove_exercise(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, exercise_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BuilderView>, (StatusCode, String)> {
    apply(&state, user.id, id, |b, _| b.remove_exercise(exercise_id)).await
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn start_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BuilderView>, (StatusCode, String)> {
    let view = apply(&state, user.id, id, |b, now| b.start(now)).await?;
    info!(builder_id = %id, "workout started");
    Ok(view)
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn start_exercise(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, exercise_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BuilderView>, (StatusCode, String)> {
    apply(&state, user.id, id, |b, now| b.start_exercise(exercise_id, now)).await
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn complete_exercise(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, exercise_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BuilderView>, (StatusCode, String)> {
    apply(&state, user.id, id, |b, now| {
        b.complete_exercise(exercise_id, now).map(|_| ())
    })
    .await
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn stop_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BuilderView>, (StatusCode, String)> {
    let view = apply(&state, user.id, id, |b, now| b.stop(now).map(|_| ())).await?;
    info!(builder_id = %id, minutes = ?view.minutes, "workout completed");
    Ok(view)
}

/// Stores the finished workout in the catalog, then logs an entry for it.
#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn save_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SavedCustomWorkout>), (StatusCode, String)> {
    let today = state.clock.now().date();
    let (draft, session) = state
        .builders
        .take_with(user.id, id, |s| s.builder.save(today))
        .await
        .map_err(builder_failure)?;

    let workout = match state.store.add_custom_workout(draft.workout.clone()).await {
        Ok(workout) => workout,
        Err(e) => {
            state.builders.restore(session).await;
            return Err(store_failure(e));
        }
    };
    let entry = state
        .store
        .add_workout_entry(draft.entry(user.id, workout.id))
        .await
        .map_err(store_failure)?;

    info!(workout_id = %workout.id, entry_id = %entry.id, "custom workout saved");
    Ok((StatusCode::CREATED, Json(SavedCustomWorkout { workout, entry })))
}

#[instrument(skip(state), fields(user_id = %user.id))]
pub async fn discard_builder(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .builders
        .remove(user.id, id)
        .await
        .map_err(builder_failure)?;
    info!(builder_id = %id, "custom workout discarded");
    Ok(StatusCode::NO_CONTENT)
}
