// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dispatcher — validates a request, wraps the PDF in an envelope, and hands it
// to a `Mailer`. No retries; the caller decides what to do with a failure.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use pic2pdf_core::error::{Pic2PdfError, Result};
use pic2pdf_core::validation::validate_dispatch_request;
use pic2pdf_core::{ComposedDocument, DispatchReceipt, DispatchRequest};
use tracing::{info, instrument, warn};

use crate::mailer::Mailer;
use crate::message::{Attachment, OutgoingMail};

/// Confirmation text returned on success.
pub const SUCCESS_MESSAGE: &str = "E-mail sent successfully!";

/// Sends composed documents through a [`Mailer`].
#[derive(Clone)]
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Sender address stamped on every envelope.
    pub fn sender(&self) -> &str {
        self.mailer.sender()
    }

    /// Send `document` as an attachment. The document is only borrowed and
    /// stays usable whatever the outcome.
    #[instrument(skip_all, fields(to = %request.to, attachment = %request.attachment_name))]
    pub async fn dispatch(
        &self,
        document: &ComposedDocument,
        request: &DispatchRequest,
    ) -> Result<DispatchReceipt> {
        self.dispatch_bytes(&document.bytes, request).await
    }

    /// Send raw PDF bytes as an attachment.
    pub async fn dispatch_bytes(&self, pdf: &[u8], request: &DispatchRequest) -> Result<DispatchReceipt> {
        validate_dispatch_request(request)?;
        if pdf.is_empty() {
            return Err(Pic2PdfError::validation("there is no PDF to send"));
        }

        let mail = OutgoingMail::new(
            self.mailer.sender(),
            request.to.as_str(),
            request.subject.clone(),
            request.body.clone(),
            Attachment::pdf(request.attachment_name.clone(), BASE64.encode(pdf)),
        );

        if let Err(err) = self.mailer.send(&mail).await {
            warn!(error = %err, "e-mail dispatch failed");
            return Err(match err {
                Pic2PdfError::Dispatch(_) => err,
                other => Pic2PdfError::Dispatch(other.to_string()),
            });
        }

        info!(bytes = pdf.len(), "e-mail dispatched");
        Ok(DispatchReceipt {
            to: mail.to,
            attachment_name: mail.attachment.filename,
            attachment_bytes: pdf.len(),
            message: SUCCESS_MESSAGE.to_owned(),
        })
    }
}
