// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input validation — document names, recipient addresses, dispatch requests.
//
// Every check here runs before any I/O and fails with `Pic2PdfError::Validation`
// carrying a reason the user can act on.

use crate::error::{Pic2PdfError, Result};
use crate::types::DispatchRequest;

/// Longest document name accepted, in characters.
pub const MAX_DOCUMENT_NAME_LEN: usize = 100;

/// Name used when the user never chose one.
pub const DEFAULT_DOCUMENT_NAME: &str = "document";

/// Validate a user-chosen document name and return it trimmed.
pub fn validate_document_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Pic2PdfError::validation("the PDF name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_DOCUMENT_NAME_LEN {
        return Err(Pic2PdfError::validation(format!(
            "the PDF name is too long (max. {MAX_DOCUMENT_NAME_LEN} characters)"
        )));
    }
    if trimmed.contains(['/', '\\']) {
        return Err(Pic2PdfError::validation(
            "the PDF name cannot contain slashes (/, \\)",
        ));
    }
    Ok(trimmed.to_owned())
}

/// File name for a document name: `<name>.pdf`.
pub fn pdf_file_name(name: &str) -> String {
    let trimmed = name.trim();
    let stem = if trimmed.is_empty() {
        DEFAULT_DOCUMENT_NAME
    } else {
        trimmed
    };
    format!("{stem}.pdf")
}

/// Check the `local@domain.tld` shape: one `@`, no whitespace, a non-empty
/// local part, and a domain with a dot that has characters on both sides.
pub fn is_email_shaped(address: &str) -> bool {
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Validate all fields of a dispatch request. Each failure has its own reason.
pub fn validate_dispatch_request(request: &DispatchRequest) -> Result<()> {
    if request.to.trim().is_empty() {
        return Err(Pic2PdfError::validation("the recipient address is missing"));
    }
    if !is_email_shaped(&request.to) {
        return Err(Pic2PdfError::validation(format!(
            "'{}' is not a valid e-mail address",
            request.to
        )));
    }
    if request.subject.trim().is_empty() {
        return Err(Pic2PdfError::validation("the subject is missing"));
    }
    if request.body.trim().is_empty() {
        return Err(Pic2PdfError::validation("the message body is missing"));
    }
    if request.attachment_name.trim().is_empty() {
        return Err(Pic2PdfError::validation("the attachment name is missing"));
    }
    Ok(())
}
