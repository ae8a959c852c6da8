use crate::{
    error::{AgentError, PaymentTerms},
    handlers::AppState,
    models::{TranslateRequest, TranslateResponse},
    services::{translator, VerifyOutcome},
};
use axum::{extract::State, Json};

pub async fn translate(
    State(state): State<AppState>,
    body: Option<Json<TranslateRequest>>,
) -> Result<Json<TranslateResponse>, AgentError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();

    let Some(receipt) = request.payment_receipt else {
        tracing::info!("no payment proof provided, responding with payment terms");
        return Err(AgentError::PaymentRequired(PaymentTerms::from_config(
            &state.config,
        )));
    };

    tracing::info!("received payment_receipt in request");
    match state.gate.verify_payment(&receipt).await {
        VerifyOutcome::Accepted => Ok(Json(TranslateResponse {
            result: translator::translate(&request.text),
        })),
        VerifyOutcome::Pending | VerifyOutcome::Invalid => Err(AgentError::PaymentRejected),
    }
}
