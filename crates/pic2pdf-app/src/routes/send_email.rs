// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use pic2pdf_mail::{SendEmailRequest, SendEmailResponse};
use tracing::info;

use super::AppState;
use super::errors::ApiError;

/// POST /api/send-email
///
/// 400 for incomplete or malformed requests, 500 when the mail server refuses.
pub async fn send_email_handler(
    State(state): State<AppState>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let Json(request) = payload?;
    let receipt = request.handle(&state.dispatcher).await?;
    info!(to = %receipt.to, attachment = %receipt.attachment_name, "send-email request served");
    Ok(Json(SendEmailResponse::sent(&receipt)))
}
