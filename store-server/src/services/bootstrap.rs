//! First-run admin account

use sqlx::SqlitePool;

use crate::auth::password::hash_password;
use crate::db::repository::user;
use crate::utils::{AppError, AppResult};
use shared::models::UserRole;

/// Create the initial admin when no user exists yet
///
/// Returns `true` when an account was created.
pub async fn ensure_admin(pool: &SqlitePool, username: &str, password: &str) -> AppResult<bool> {
    if user::count(pool).await? > 0 {
        tracing::debug!("Users present, skipping admin bootstrap");
        return Ok(false);
    }
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation(
            "Bootstrap admin username and password must not be empty",
        ));
    }

    let hash = hash_password(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    let admin = user::create(pool, username, &hash, UserRole::Admin).await?;
    tracing::info!(user_id = admin.id, username = %admin.username, "Bootstrap admin created");
    Ok(true)
}

/// Create a staff account (used by tooling and tests)
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: UserRole,
) -> AppResult<shared::models::User> {
    let hash = hash_password(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    Ok(user::create(pool, username.trim(), &hash, role).await?)
}
