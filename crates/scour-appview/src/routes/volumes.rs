use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct VolumeParams {
    id: Option<i64>,
    mountpoint: Option<String>,
}

fn volume_json(v: &scour_db::types::CacheVolumeRow) -> Value {
    json!({
        "id": v.id,
        "mountpoint": v.mountpoint,
        "size": v.size_bytes,
        "allocated": v.allocated_bytes,
        "used": v.used_bytes,
    })
}

/// List cache volumes, or select one by id or mountpoint
pub async fn list_volumes(
    State(state): State<AppState>,
    Query(params): Query<VolumeParams>,
) -> Result<Json<Value>, AppError> {
    let volumes = if let Some(id) = params.id {
        let volume = scour_db::volumes::get(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("cache volume {} not found", id)))?;
        vec![volume_json(&volume)]
    } else if let Some(mountpoint) = params.mountpoint.as_deref() {
        let volume = scour_db::volumes::get_by_mountpoint(&state.pool, mountpoint)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("cache volume {} not found", mountpoint))
            })?;
        vec![volume_json(&volume)]
    } else {
        scour_db::volumes::list(&state.pool)
            .await?
            .iter()
            .map(volume_json)
            .collect()
    };

    Ok(Json(json!({ "cache_volumes": volumes })))
}
