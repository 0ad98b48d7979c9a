use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FileParams {
    name: Option<String>,
    /// Substring to match against file paths.
    #[serde(rename = "match")]
    match_: Option<String>,
    /// "1" expands paths to include the volume mountpoint.
    full_path: Option<String>,
}

/// List a user's cached files, optionally filtered by path substring
pub async fn list_files(
    State(state): State<AppState>,
    Query(params): Query<FileParams>,
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

    let substring = params.match_.unwrap_or_default();
    let full_path = params.full_path.as_deref() == Some("1");

    let files = scour_db::files::list_matching(&state.pool, user.id, &substring).await?;

    let mountpoint = Path::new(&volume.mountpoint);
    let entries: Vec<Value> = files
        .iter()
        .map(|f| {
            let path = if full_path {
                mountpoint.join(&f.path).to_string_lossy().into_owned()
            } else {
                f.path.clone()
            };
            json!({
                "path": path,
                "size": f.size,
                "first_seen": f.first_seen.to_rfc3339(),
            })
        })
        .collect();

    Ok(Json(json!(entries)))
}
