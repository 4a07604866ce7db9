//! Authentication Handlers

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::auth::CurrentUser;
use crate::auth::password::verify_password;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::security_log;
use crate::utils::validation::{JsonBody, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResult};
use shared::ErrorCode;
use shared::models::{LoginRequest, LoginResponse, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let username = req.username.trim().to_string();
    if username.is_empty()
        || username.len() > MAX_SHORT_TEXT_LEN
        || req.password.len() > MAX_PASSWORD_LEN
    {
        return Err(AppError::invalid_credentials());
    }

    let found = user::find_by_username(&state.pool, &username).await?;

    // Fixed delay before checking the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match found {
        Some(u) if verify_password(&req.password, &u.password_hash) => u,
        Some(_) | None => {
            security_log!("WARN", "login_failed", username = username.clone());
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        security_log!("WARN", "login_disabled", username = username.clone());
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let token = state
        .get_jwt_service()
        .generate_token(account.id, &account.username, account.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %account.role,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(account),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current_user.id)))?;
    Ok(Json(UserInfo::from(account)))
}
