use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{DeletedResponse, GoalBody, GoalResponse, Pagination};
use super::repo::Goal;
use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/goals", get(list_goals))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/goals", post(create_goal))
        .route("/goals/:id", put(update_goal).delete(delete_goal))
}

/// Name and unit must be non-empty once trimmed; the trimmed values are
/// what gets stored.
fn validated(body: &GoalBody) -> Result<(&str, &str), ApiError> {
    let name = body.name.trim();
    let unit = body.unit.trim();
    if name.is_empty() || unit.is_empty() || !body.target.is_finite() {
        warn!("goal body rejected");
        return Err(ApiError::Validation);
    }
    Ok((name, unit))
}

#[instrument(skip(state))]
pub async fn list_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<GoalResponse>>, ApiError> {
    let goals = Goal::list_by_user(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(goals.into_iter().map(GoalResponse::from).collect()))
}

#[instrument(skip(state, body))]
pub async fn create_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GoalBody>,
) -> Result<(StatusCode, Json<GoalResponse>), ApiError> {
    let (name, unit) = validated(&body)?;
    let goal = Goal::create(&state.db, user_id, name, body.target, unit).await?;
    info!(user_id = %user_id, goal_id = %goal.id, "goal created");
    Ok((StatusCode::CREATED, Json(goal.into())))
}

#[instrument(skip(state, body))]
pub async fn update_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<GoalBody>,
) -> Result<Json<GoalResponse>, ApiError> {
    let (name, unit) = validated(&body)?;
    let goal = Goal::update(&state.db, user_id, id, name, body.target, unit)
        .await?
        .ok_or(ApiError::NotFound("Goal not found"))?;
    info!(user_id = %user_id, goal_id = %goal.id, "goal updated");
    Ok(Json(goal.into()))
}

#[instrument(skip(state))]
pub async fn delete_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, ApiError> {
    if !Goal::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Goal not found"));
    }
    info!(user_id = %user_id, goal_id = %id, "goal deleted");
    Ok(Json(DeletedResponse {
        message: "Goal deleted successfully".into(),
    }))
}
