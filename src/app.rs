use axum::{http::HeaderValue, Router};
use parking_lot::Mutex;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Settings;
use crate::error::{ApiError, RecordError};
use crate::middleware::request_id_layer;
use crate::routes;
use crate::services::RecordService;
use crate::store::{TaskStore, UserStore};

/// Session state container shared by every handler.
///
/// The stores are only locked for synchronous mutations; no lock is held
/// while a record service call is in flight.
pub struct AppState {
    pub records: Arc<dyn RecordService>,
    pub tasks: Mutex<TaskStore>,
    pub users: Mutex<UserStore>,
}

impl AppState {
    pub fn new(records: Arc<dyn RecordService>) -> Arc<Self> {
        Arc::new(Self {
            records,
            tasks: Mutex::new(TaskStore::new()),
            users: Mutex::new(UserStore::new()),
        })
    }

    /// Records a failed task call on the task store and converts it for the response.
    pub fn task_failure(&self, err: RecordError) -> ApiError {
        self.tasks.lock().set_error(err.to_string());
        err.into()
    }

    /// Records a failed user call on the user store and converts it for the response.
    pub fn user_failure(&self, err: RecordError) -> ApiError {
        self.users.lock().set_error(err.to_string());
        err.into()
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>, settings: &Settings) -> Router {
    let cors = build_cors_layer(settings);

    // Build trace layer (use DEBUG for spans to reduce overhead at INFO level)
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    let (set_request_id, propagate_request_id) = request_id_layer();

    Router::new()
        .merge(routes::api_router())
        // Middleware stack (applied bottom-up)
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let max_age = if settings.env.is_dev() {
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static("x-request-id"),
        ]))
        .allow_credentials(true)
        .max_age(max_age)
}
