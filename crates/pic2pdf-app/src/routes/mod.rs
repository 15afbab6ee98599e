// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP entry point served by `pic2pdf serve`.

pub mod errors;
pub mod health;
pub mod send_email;

use axum::Router;
use axum::routing::{get, post};
use pic2pdf_mail::Dispatcher;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/send-email", post(send_email::send_email_handler))
        .with_state(state)
}
