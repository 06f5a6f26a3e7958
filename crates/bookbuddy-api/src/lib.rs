#![allow(non_snake_case)]

pub mod config;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Routes served next to the Leptos pages: the gateway relay and a health check.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::relay::routes())
        .with_state(state)
}
