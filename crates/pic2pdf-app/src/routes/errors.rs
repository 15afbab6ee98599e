// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error type for HTTP handlers. Every failure becomes
// `{"error": "Failed to send e-mail: <cause>"}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pic2pdf_core::Pic2PdfError;
use pic2pdf_mail::SendEmailResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] Pic2PdfError),

    #[error("malformed request body: {0}")]
    Body(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Domain(err) if err.is_validation() => {
                (StatusCode::BAD_REQUEST, SendEmailResponse::failed(err))
            }
            ApiError::Domain(err) => {
                tracing::error!(error = %err, "send-email request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SendEmailResponse::failed(err))
            }
            ApiError::Body(rejection) => (
                StatusCode::BAD_REQUEST,
                SendEmailResponse::failed(&Pic2PdfError::validation(rejection.body_text())),
            ),
        };
        (status, Json(body)).into_response()
    }
}
