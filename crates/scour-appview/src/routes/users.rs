use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserParams {
    name: Option<String>,
}

/// Quota and usage snapshot for one user
pub async fn get_user(
    State(state): State<AppState>,
    Query(params): Query<UserParams>,
) -> Result<Json<Value>, AppError> {
    let name = params
        .name
        .ok_or_else(|| AppError::BadRequest("name is required".into()))?;

    let user = scour_db::users::get_by_name(&state.pool, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", name)))?;

    let volume = scour_db::volumes::get(&state.pool, user.volume_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("cache volume {} missing", user.volume_id)))?;

    let cache_path = Path::new(&volume.mountpoint).join(&user.cache_path);

    Ok(Json(json!({
        "name": user.name,
        "email": user.email,
        "notify": user.notify,
        "quota_size": user.quota_size,
        "quota_used": user.quota_used,
        "hard_limit_size": user.hard_limit_size,
        "total_used": user.total_used,
        "cache_path": cache_path,
    })))
}
