use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio_util::sync::CancellationToken;
use tracing::error;

use conhook_client::HookCache;
use conhook_common::types::hook::Hook;
use conhook_storage::{HookStore, StorageError};

use crate::structs::{merge_hook_update, InfoResponse, ModifyHookRequest};

#[derive(Clone)]
struct AppState {
    store: Arc<dyn HookStore>,
    cache: HookCache,
    cancellation_token: CancellationToken,
}

pub fn get_app(
    store: Arc<dyn HookStore>,
    cache: HookCache,
    cancellation_token: CancellationToken,
) -> Router {
    let state = AppState {
        store,
        cache,
        cancellation_token,
    };

    Router::new()
        .route("/hooks", get(list_hooks).put(create_hook))
        .route(
            "/hooks/{id}",
            get(get_hook).post(modify_hook).delete(delete_hook),
        )
        .route("/info", get(info))
        .route("/terminate", post(terminate))
        .with_state(state)
}

fn storage_status(err: StorageError) -> StatusCode {
    match err {
        StorageError::NotFound => StatusCode::NOT_FOUND,
        StorageError::Backend(err) => {
            error!("storage error: {err:#}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn list_hooks(State(state): State<AppState>) -> Result<Json<Vec<Hook>>, StatusCode> {
    state.store.get_all().await.map(Json).map_err(storage_status)
}

async fn create_hook(
    State(state): State<AppState>,
    Json(hook): Json<Hook>,
) -> Result<impl IntoResponse, StatusCode> {
    if hook.url.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let stored = state
        .store
        .store(hook.with_defaults())
        .await
        .map_err(storage_status)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn get_hook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Hook>, StatusCode> {
    state
        .store
        .get_by_id(&id)
        .await
        .map(Json)
        .map_err(storage_status)
}

async fn modify_hook(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ModifyHookRequest>,
) -> Result<Json<Hook>, StatusCode> {
    let mut hook = state.store.get_by_id(&id).await.map_err(storage_status)?;
    merge_hook_update(&mut hook, &request);

    let stored = state.store.store(hook).await.map_err(storage_status)?;
    Ok(Json(stored))
}

async fn delete_hook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    state.store.delete(&id).await.map_err(storage_status)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        hostname: sysinfo::System::host_name().unwrap_or_else(|| "unknown".to_string()),
        cached_hooks: state.cache.hooks().len(),
    })
}

async fn terminate(State(state): State<AppState>) -> &'static str {
    state.cancellation_token.cancel();
    "Terminating..."
}
