use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DeletionParams {
    name: Option<String>,
}

/// Pending deletion batches for one user, with the referenced file paths
pub async fn list_deletions(
    State(state): State<AppState>,
    Query(params): Query<DeletionParams>,
) -> Result<Json<Value>, AppError> {
    let name = params
        .name
        .ok_or_else(|| AppError::BadRequest("name is required".into()))?;

    let user = scour_db::users::get_by_name(&state.pool, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {} not found", name)))?;

    let mut batches = Vec::new();
    for batch in scour_db::deletions::list_for_user(&state.pool, user.id).await? {
        let files = scour_db::deletions::files_for(&state.pool, batch.id).await?;
        let paths: Vec<String> = files.into_iter().map(|f| f.path).collect();
        batches.push(json!({
            "name": user.name,
            "time_entered": batch.time_entered.to_rfc3339(),
            "time_delete": batch.time_delete.to_rfc3339(),
            "files": paths,
        }));
    }

    Ok(Json(json!({ "scheduled_deletions": batches })))
}
