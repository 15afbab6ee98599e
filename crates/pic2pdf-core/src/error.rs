// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for pic2pdf.

use thiserror::Error;

/// Top-level error type for all pic2pdf operations.
#[derive(Debug, Error)]
pub enum Pic2PdfError {
    // -- Input validation --
    #[error("invalid input: {0}")]
    Validation(String),

    // -- Composition errors --
    #[error("could not decode image '{name}': {reason}")]
    Decode { name: String, reason: String },

    #[error("image '{name}' has zero dimensions ({width}x{height}) and cannot be placed on a page")]
    DegenerateImage {
        name: String,
        width: u32,
        height: u32,
    },

    #[error("could not embed image '{name}' after both attempts (primary: {primary}; fallback: {fallback})")]
    Encode {
        name: String,
        primary: String,
        fallback: String,
    },

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    // -- Delivery --
    #[error("failed to send e-mail: {0}")]
    Dispatch(String),

    #[error("missing required config: {0}")]
    MissingConfig(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Pic2PdfError {
    /// Shorthand for a [`Pic2PdfError::Validation`] with the given reason.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Whether the error was raised before any I/O took place.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, Pic2PdfError>;
