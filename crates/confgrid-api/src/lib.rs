//! confgrid-api — REST API for ConfGrid.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | POST | `/configs` | Save a configuration document |
//! | GET | `/{service}/{version}` | Poll the resolved configuration |
//! | GET | `/healthz` | Liveness probe |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use confgrid_core::ServerConfig;
use confgrid_service::ConfigService;
use confgrid_state::StateStore;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub service: ConfigService<StateStore>,
}

/// Build the complete API router.
pub fn build_router(store: StateStore, config: Arc<ServerConfig>) -> Router {
    let api_state = ApiState {
        service: ConfigService::new(store, config),
    };

    Router::new()
        .route("/configs", post(handlers::save_config))
        .route("/healthz", get(handlers::healthz))
        .route("/{service}/{version}", get(handlers::poll_config))
        .with_state(api_state)
}
