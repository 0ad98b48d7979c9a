use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use scour_quota::forecast::{project, UserBudget};
use scour_quota::FileUsage;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PredictParams {
    name: Option<String>,
}

/// Project when deletions will start for a user and which files they will
/// take. Read-only; nothing in the catalog is touched.
pub async fn predict(
    State(state): State<AppState>,
    Query(params): Query<PredictParams>,
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

    let files: Vec<FileUsage> = scour_db::files::list_for_user(&state.pool, user.id)
        .await?
        .into_iter()
        .map(|f| FileUsage {
            file_id: f.id,
            path: f.path,
            size: f.size,
            first_seen: f.first_seen,
        })
        .collect();

    let budget = UserBudget {
        quota_size: user.quota_size,
        quota_used: user.quota_used,
        total_used: user.total_used,
    };
    let projection = project(budget, files, Utc::now(), state.deletion_grace_hours);

    let paths: Vec<String> = projection.victims.into_iter().map(|f| f.path).collect();

    Ok(Json(json!({
        "name": user.name,
        "cache_volume": volume.mountpoint,
        "time_predict": projection.time_predict.map(|t| t.to_rfc3339()),
        "over_quota": projection.over_quota,
        "files": paths,
    })))
}
