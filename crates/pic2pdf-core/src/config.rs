// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::validation::DEFAULT_DOCUMENT_NAME;

/// Persistent application settings.
///
/// Mail transport credentials are not stored here; they come from the process
/// environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document name used when the user does not supply one.
    pub default_document_name: String,
    /// Where composed PDFs are written. `None` means the data directory's
    /// `documents` subfolder.
    pub output_dir: Option<PathBuf>,
    /// Port for the HTTP send-email endpoint.
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_document_name: DEFAULT_DOCUMENT_NAME.to_owned(),
            output_dir: None,
            server_port: 3000,
        }
    }
}
