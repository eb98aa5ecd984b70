pub mod dashboard;
pub mod health;
pub mod me;
pub mod tasks;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Public routes
        .route("/health", get(health::health_check))
        .route("/session", post(me::login).delete(me::logout))
        // Protected routes
        .route("/me", get(me::get_me).put(me::update_me))
        .route("/dashboard", get(dashboard::dashboard))
        // Tasks
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/tasks/sync", post(tasks::sync_tasks))
        .route("/tasks/stats", get(tasks::task_stats))
        .route("/tasks/state", get(tasks::store_state))
        .route("/tasks/current", get(tasks::current_task))
        .route(
            "/tasks/:task_id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/tasks/:task_id/toggle", post(tasks::toggle_task))
}
