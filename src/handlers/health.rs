use crate::{handlers::AppState, models::HealthStatus};
use axum::{extract::State, Json};
use ethers::utils::to_checksum;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        ok: true,
        verify_onchain: state.gate.verifies_onchain(),
        payment_address: to_checksum(&state.config.payment_address, None),
        price_eth: state.config.price_eth.clone(),
    })
}
