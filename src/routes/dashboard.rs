//! Dashboard summary

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{Local, Timelike};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;
use crate::auth::RequireUser;
use crate::domain::filters::{by_category, by_priority, BreakdownEntry};
use crate::store::TaskStats;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub greeting: String,
    pub stats: TaskStats,
    pub by_category: Vec<BreakdownEntry>,
    pub by_priority: Vec<BreakdownEntry>,
}

pub fn greeting(hour: u32, first_name: &str) -> String {
    let name = if first_name.trim().is_empty() {
        "there"
    } else {
        first_name
    };

    match hour {
        0..=11 => format!("Good morning, {}", name),
        12..=17 => format!("Good afternoon, {}", name),
        _ => format!("Good evening, {}", name),
    }
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    user: RequireUser,
) -> Json<DashboardResponse> {
    let store = state.tasks.lock();

    Json(DashboardResponse {
        greeting: greeting(Local::now().hour(), &user.first_name),
        stats: store.stats(),
        by_category: by_category(store.tasks()),
        by_priority: by_priority(store.tasks()),
    })
}
