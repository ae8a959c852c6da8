use crate::config::Config;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AgentError {
    /// No receipt was supplied at all; the response carries the terms the
    /// client must pay under.
    #[error("Payment Required")]
    PaymentRequired(PaymentTerms),

    /// A receipt was supplied but did not verify. Pending and invalid
    /// rejections are indistinguishable at this boundary; the logs tell
    /// them apart.
    #[error("Payment invalid or not yet confirmed")]
    PaymentRejected,
}

/// What a client must pay, and where, to use the service.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PaymentTerms {
    pub price: String,
    pub currency: String,
    pub payment_address: String,
    pub chain: String,
}

impl PaymentTerms {
    pub fn from_config(config: &Config) -> Self {
        Self {
            price: config.price_eth.clone(),
            currency: "ETH".to_string(),
            payment_address: to_checksum(&config.payment_address, None),
            chain: format!("chainId:{}", config.chain_id),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,

    #[serde(flatten)]
    pub payment_terms: Option<PaymentTerms>,
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let (status, error_code, payment_terms) = match &self {
            AgentError::PaymentRequired(terms) => (
                StatusCode::PAYMENT_REQUIRED,
                "PAYMENT_REQUIRED",
                Some(terms.clone()),
            ),
            AgentError::PaymentRejected => {
                (StatusCode::PAYMENT_REQUIRED, "PAYMENT_REJECTED", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
            payment_terms,
        };

        (status, Json(body)).into_response()
    }
}
