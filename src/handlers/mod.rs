pub mod health;
pub mod translate;

pub use health::*;
pub use translate::*;

use crate::{config::Config, services::PaymentGate};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<PaymentGate>,
    pub config: Arc<Config>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/translate", post(translate::translate))
        .with_state(state)
}
