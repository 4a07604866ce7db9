//! Student API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::student;
use crate::services::accounts;
use crate::utils::AppResult;
use crate::utils::validation::{JsonBody, ValidJson};
use shared::models::{BalanceAdjustment, Student, StudentCreate, StudentUpdate};

/// GET /api/students - 学生列表 (最新在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Student>>> {
    let students = student::find_all(&state.pool).await?;
    Ok(Json(students))
}

/// GET /api/students/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Student>> {
    Ok(Json(accounts::get_student(&state.pool, id).await?))
}

/// GET /api/students/roll/{roll_number}
pub async fn get_by_roll_number(
    State(state): State<ServerState>,
    Path(roll_number): Path<String>,
) -> AppResult<Json<Student>> {
    Ok(Json(accounts::get_by_roll_number(&state.pool, &roll_number).await?))
}

/// POST /api/students
pub async fn create(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<StudentCreate>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let created = accounts::create_student(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/students/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ValidJson(payload): ValidJson<StudentUpdate>,
) -> AppResult<Json<Student>> {
    Ok(Json(accounts::update_student(&state.pool, id, payload).await?))
}

/// DELETE /api/students/{id} - 有交易记录时返回 409
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    accounts::delete_student(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/students/{id}/balance - 充值 (正数) 或冲正 (负数)
pub async fn adjust_balance(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<BalanceAdjustment>,
) -> AppResult<Json<Student>> {
    let updated =
        accounts::adjust_balance(&state.pool, id, payload.amount, current_user.id).await?;
    Ok(Json(updated))
}
