// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pic2pdf — Core types, error definitions, and session state shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod session;
pub mod types;
pub mod validation;

pub use config::AppConfig;
pub use error::Pic2PdfError;
pub use session::Session;
pub use types::*;
