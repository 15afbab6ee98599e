// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON entry point for clients that already hold a PDF: the body of
// `POST /api/send-email`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use pic2pdf_core::error::{Pic2PdfError, Result};
use pic2pdf_core::validation::is_email_shaped;
use pic2pdf_core::{DispatchReceipt, DispatchRequest};
use serde::{Deserialize, Serialize};

use crate::dispatch::Dispatcher;

/// `{to, subject, body, pdfData, pdfFileName}`; `pdfData` is base64.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    #[serde(rename = "pdfData")]
    pub pdf_data: Option<String>,
    #[serde(rename = "pdfFileName")]
    pub pdf_file_name: Option<String>,
}

impl SendEmailRequest {
    /// Check completeness and recipient shape, then decode the PDF.
    pub fn into_parts(self) -> Result<(DispatchRequest, Vec<u8>)> {
        let present = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
        let (Some(to), Some(subject), Some(body), Some(pdf_data), Some(pdf_file_name)) = (
            present(self.to),
            present(self.subject),
            present(self.body),
            present(self.pdf_data),
            present(self.pdf_file_name),
        ) else {
            return Err(Pic2PdfError::validation("incomplete e-mail data"));
        };

        if !is_email_shaped(&to) {
            return Err(Pic2PdfError::validation("invalid recipient e-mail address"));
        }

        let pdf = BASE64
            .decode(pdf_data.trim().as_bytes())
            .map_err(|e| Pic2PdfError::validation(format!("pdfData is not valid base64: {e}")))?;

        let request = DispatchRequest {
            to,
            subject,
            body,
            attachment_name: pdf_file_name,
        };
        Ok((request, pdf))
    }

    /// Validate, decode, and send.
    pub async fn handle(self, dispatcher: &Dispatcher) -> Result<DispatchReceipt> {
        let (request, pdf) = self.into_parts()?;
        dispatcher.dispatch_bytes(&pdf, &request).await
    }
}

/// Response body of the entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendEmailResponse {
    Sent { message: String },
    Failed { error: String },
}

impl SendEmailResponse {
    pub fn sent(receipt: &DispatchReceipt) -> Self {
        Self::Sent {
            message: receipt.message.clone(),
        }
    }

    pub fn failed(err: &Pic2PdfError) -> Self {
        let cause = match err {
            Pic2PdfError::Validation(reason) | Pic2PdfError::Dispatch(reason) => reason.clone(),
            other => other.to_string(),
        };
        Self::Failed {
            error: format!("Failed to send e-mail: {cause}"),
        }
    }
}

impl From<&Result<DispatchReceipt>> for SendEmailResponse {
    fn from(outcome: &Result<DispatchReceipt>) -> Self {
        match outcome {
            Ok(receipt) => Self::sent(receipt),
            Err(err) => Self::failed(err),
        }
    }
}
