//! File API Handlers
//!
//! Artifacts (proofs, approvals, print-ready files) attach to an order,
//! optionally to a specific item. The object lands under the work dir and a
//! metadata row points at it; replace swaps the object and keeps one row.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::FileRef;
use crate::utils::{AppError, AppResult};
use crate::workflow::effects;
use shared::util::now_millis;

const RESOURCE: &str = "file_ref";

/// GET /api/files/orders/:order_id
pub async fn list_for_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<Vec<FileRef>>> {
    Ok(Json(state.files.find_by_order(&order_id).await?))
}

struct UploadPart {
    file_name: String,
    data: Vec<u8>,
    item_id: Option<String>,
}

async fn read_multipart(mut multipart: Multipart) -> AppResult<UploadPart> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut item_id = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::validation("File field has no name"))?;
                let data = field.bytes().await?.to_vec();
                file = Some((file_name, data));
            }
            Some("item_id") => {
                let value = field.text().await?;
                if !value.trim().is_empty() {
                    item_id = Some(value.trim().to_string());
                }
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::validation("Multipart body needs a 'file' field"))?;
    Ok(UploadPart {
        file_name,
        data,
        item_id,
    })
}

/// POST /api/files/orders/:order_id - multipart upload
pub async fn upload(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(order_id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<FileRef>> {
    let order = state
        .orders
        .find_by_id(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", order_id)))?;

    let part = read_multipart(multipart).await?;
    let path = state
        .file_storage
        .save(&order_id, &part.file_name, &part.data)?;

    let row = FileRef {
        id: None,
        order_id: order_id.clone(),
        item_id: part.item_id,
        file_name: part.file_name.clone(),
        mime: state.file_storage.mime_for(&part.file_name),
        size: part.data.len() as i64,
        path,
        uploaded_by: current_user.id.clone(),
        created_at: now_millis(),
    };
    let file = state.files.create(row).await?;
    let id = file.id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    effects::log_activity(
        &state,
        &current_user,
        "file.uploaded",
        RESOURCE,
        &id,
        serde_json::json!({ "order_number": order.order_number, "file": file.file_name }),
    )
    .await;
    state
        .broadcast_sync(RESOURCE, "created", &id, Some(&file))
        .await;

    Ok(Json(file))
}

/// POST /api/files/:id/replace - new object, same metadata row
pub async fn replace(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Json<FileRef>> {
    let existing = state
        .files
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", id)))?;

    let part = read_multipart(multipart).await?;
    let path = state
        .file_storage
        .save(&existing.order_id, &part.file_name, &part.data)?;

    // The new object is durable before the old one goes
    let old_path = existing.path.clone();
    let mut row = existing;
    row.file_name = part.file_name.clone();
    row.mime = state.file_storage.mime_for(&part.file_name);
    row.size = part.data.len() as i64;
    row.path = path;
    row.created_at = now_millis();
    row.uploaded_by = current_user.id.clone();
    let file = state.files.save(row).await?;

    if let Err(e) = state.file_storage.delete(&old_path) {
        tracing::warn!(target: "files", error = %e, path = %old_path, "Orphaned upload");
    }

    state
        .broadcast_sync(RESOURCE, "updated", &id, Some(&file))
        .await;
    Ok(Json(file))
}

/// GET /api/files/:id - raw bytes with the stored mime type
pub async fn download(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let file = state
        .files
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", id)))?;
    let bytes = state.file_storage.read(&file.path)?;

    Ok((
        [
            (header::CONTENT_TYPE, file.mime.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ),
        ],
        bytes,
    ))
}

/// DELETE /api/files/:id
pub async fn delete_file(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let file = state
        .files
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {} not found", id)))?;
    if let Err(e) = state.file_storage.delete(&file.path) {
        tracing::warn!(target: "files", error = %e, path = %file.path, "Orphaned upload");
    }

    effects::log_activity(
        &state,
        &current_user,
        "file.deleted",
        RESOURCE,
        &id,
        serde_json::json!({ "file": file.file_name }),
    )
    .await;
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id, None)
        .await;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
