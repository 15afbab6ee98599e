// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use axum::Json;
use serde_json::{Value, json};

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "pic2pdf",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
