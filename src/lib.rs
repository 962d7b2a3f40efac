//! casedesk API Library
//!
//! Delivery-delay dispute resolution for hospital inventory orders: look an
//! order up in the loaded dataset, decide whether it is late against its
//! promised-plus-buffer window, and when it is, delegate the vendor-fault
//! verdict to a hosted completion model.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod dataset;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod seeding;
pub mod services;
pub mod tracing;

use std::sync::Arc;

use axum::Router;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<dataset::Dataset>,
    pub config: config::AppConfig,
    pub cases: services::cases::CaseService,
}

/// Application routes: the case-resolution endpoint plus health probes.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::cases::case_routes())
        .nest("/health", handlers::health::health_routes())
}
