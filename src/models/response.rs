use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Debug, Default)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    /// Untrusted proof-of-payment. Only the transaction hash inside it is
    /// ever trusted, and only as a pointer to the on-chain record.
    #[serde(default)]
    pub payment_receipt: Option<Value>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TranslateResponse {
    pub result: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub ok: bool,
    /// The verification mode actually in effect, after any startup
    /// downgrade to mock.
    pub verify_onchain: bool,
    pub payment_address: String,
    pub price_eth: String,
}
