//! TaskFlow session service.
//!
//! Mirrors one user's tasks from the hosted record service, keeps derived
//! statistics alongside them and exposes both to the view layer over HTTP.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod store;
