//! Task routes
//!
//! Each mutating handler calls the record service first and only patches the
//! task store once the service has acknowledged the change.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::{DataResponse, MessageResponse};
use crate::app::AppState;
use crate::auth::RequireUser;
use crate::domain::{NewTask, Task, TaskId, TaskListFilter, TaskPatch, TaskQuery};
use crate::error::ApiError;
use crate::store::TaskStats;

/// Collection snapshot returned after a sync
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskListResponse {
    pub data: Vec<Task>,
    pub stats: TaskStats,
}

/// Lifecycle flags of the task store
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStateResponse {
    pub loading: bool,
    pub error: Option<String>,
}

/// POST /tasks/sync
///
/// Fetch the user's tasks from the record service and replace the store.
pub async fn sync_tasks(
    State(state): State<Arc<AppState>>,
    _user: RequireUser,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    // No body means no filter; a body that does not parse is rejected
    let query = if body.iter().all(u8::is_ascii_whitespace) {
        TaskQuery::default()
    } else {
        serde_json::from_slice::<TaskQuery>(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid task filter: {}", e)))?
    };
    state.tasks.lock().set_loading(true);

    let tasks = state
        .records
        .fetch_tasks(&query)
        .await
        .map_err(|e| state.task_failure(e))?;

    tracing::debug!(count = tasks.len(), "Task collection replaced");

    let mut store = state.tasks.lock();
    store.replace_all(tasks);
    Ok(Json(TaskListResponse {
        data: store.tasks().to_vec(),
        stats: store.stats(),
    }))
}

/// GET /tasks
///
/// List the stored tasks, narrowed by the list view filters.
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    _user: RequireUser,
    Query(filter): Query<TaskListFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.tasks.lock();
    let data: Vec<Task> = filter.apply(store.tasks()).into_iter().cloned().collect();
    Ok(DataResponse::new(data))
}

/// GET /tasks/stats
pub async fn task_stats(
    State(state): State<Arc<AppState>>,
    _user: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.tasks.lock().stats();
    Ok(DataResponse::new(stats))
}

/// GET /tasks/state
pub async fn store_state(
    State(state): State<Arc<AppState>>,
    _user: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.tasks.lock();
    Ok(Json(StoreStateResponse {
        loading: store.is_loading(),
        error: store.error().map(str::to_string),
    }))
}

/// GET /tasks/current
pub async fn current_task(
    State(state): State<Arc<AppState>>,
    _user: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let current = state.tasks.lock().current().cloned();
    Ok(DataResponse::new(current))
}

/// GET /tasks/:task_id
///
/// Serve from the store when loaded, otherwise fetch it into the current slot.
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<TaskId>,
    _user: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let cached = state.tasks.lock().get(task_id).cloned();
    if let Some(task) = cached {
        return Ok(DataResponse::new(task));
    }

    let task = state
        .records
        .get_task(task_id)
        .await
        .map_err(|e| state.task_failure(e))?;

    state.tasks.lock().set_current(Some(task.clone()));
    Ok(DataResponse::new(task))
}

/// POST /tasks
///
/// Create a new task.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    _user: RequireUser,
    Json(req): Json<NewTask>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::bad_request)?;

    state.tasks.lock().set_loading(true);
    let task = state
        .records
        .create_task(&req)
        .await
        .map_err(|e| state.task_failure(e))?;

    tracing::info!(task_id = task.id, "Task created");

    {
        let mut store = state.tasks.lock();
        store.add(task.clone());
        store.set_loading(false);
    }
    Ok((StatusCode::CREATED, DataResponse::new(task)))
}

/// PUT /tasks/:task_id
///
/// Update a task with the fields present in the body.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<TaskId>,
    _user: RequireUser,
    Json(req): Json<TaskPatch>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::bad_request)?;
    if req.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    state.tasks.lock().set_loading(true);
    let task = state
        .records
        .update_task(task_id, &req)
        .await
        .map_err(|e| state.task_failure(e))?;

    {
        let mut store = state.tasks.lock();
        if !store.apply_update(task.clone()) {
            tracing::debug!(task_id, "Updated task not loaded; store left as is");
        }
        store.set_loading(false);
    }
    Ok(DataResponse::new(task))
}

/// POST /tasks/:task_id/toggle
///
/// Flip the completion flag, moving the status along with it.
pub async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<TaskId>,
    _user: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    let patch = {
        let store = state.tasks.lock();
        let task = store
            .get(task_id)
            .or_else(|| store.current().filter(|t| t.id == task_id));
        task.map(Task::toggle_completion)
    };
    let patch = patch.ok_or_else(|| ApiError::not_found("Task not found"))?;

    let task = state
        .records
        .update_task(task_id, &patch)
        .await
        .map_err(|e| state.task_failure(e))?;

    state.tasks.lock().apply_update(task.clone());
    Ok(DataResponse::new(task))
}

/// DELETE /tasks/:task_id
///
/// Delete a task.
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<TaskId>,
    _user: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    state
        .records
        .delete_task(task_id)
        .await
        .map_err(|e| state.task_failure(e))?;

    state.tasks.lock().remove(task_id);
    tracing::info!(task_id, "Task deleted");

    Ok(MessageResponse::new("Task deleted successfully"))
}
