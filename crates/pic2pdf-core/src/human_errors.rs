// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the caller presents it; `retriable` tells the caller
// whether repeating the same request can help. Nothing here retries on its own.

use crate::error::Pic2PdfError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Network or mail server hiccup; trying again may work.
    Transient,
    /// The user must fix their input first.
    ActionRequired,
    /// Retrying the same input will fail the same way.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether re-issuing the same request can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `Pic2PdfError` into a `HumanError`.
pub fn humanize_error(err: &Pic2PdfError) -> HumanError {
    match err {
        Pic2PdfError::Validation(reason) => HumanError {
            message: "Some information is missing or not quite right.".into(),
            suggestion: format!("Please check and try again: {reason}."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Composition --
        Pic2PdfError::Decode { name, .. } => HumanError {
            message: format!("We couldn't read the image \"{name}\"."),
            suggestion: "The file may be damaged or not really a JPG/PNG. Remove it or save it again as JPG or PNG, then create the PDF again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        Pic2PdfError::DegenerateImage { name, .. } => HumanError {
            message: format!("The image \"{name}\" is empty."),
            suggestion: "It has no width or height, so it cannot go on a page. Remove it and try again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        Pic2PdfError::Encode { name, .. } => HumanError {
            message: format!("The image \"{name}\" couldn't be added to the PDF."),
            suggestion: "Try opening the image in another program and saving it again, or remove it from the list.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        Pic2PdfError::Pdf(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try creating the PDF again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Delivery --
        Pic2PdfError::Dispatch(detail) => humanize_dispatch_error(detail),

        Pic2PdfError::MissingConfig(key) => HumanError {
            message: "E-mail sending isn't set up.".into(),
            suggestion: format!("Ask whoever runs this service to configure {key}. You can still download the PDF."),
            retriable: false,
            severity: Severity::Permanent,
        },

        // -- Storage --
        Pic2PdfError::Io(io_err) => HumanError {
            message: "We couldn't read or write a file.".into(),
            suggestion: format!("Check that the file exists and that there is free disk space. ({io_err})"),
            retriable: true,
            severity: Severity::Transient,
        },

        Pic2PdfError::Serialization(_) => HumanError {
            message: "A settings file is damaged.".into(),
            suggestion: "Delete the settings file to restore defaults.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

/// Mail relay failures: the composed PDF is untouched, so the suggestion
/// always mentions downloading it instead.
fn humanize_dispatch_error(detail: &str) -> HumanError {
    let lower = detail.to_lowercase();

    if lower.contains("auth") || lower.contains("credentials") || lower.contains("535") {
        HumanError {
            message: "The mail server refused our login.".into(),
            suggestion: "The e-mail settings need fixing. Meanwhile you can download the PDF and send it yourself.".into(),
            retriable: false,
            severity: Severity::Permanent,
        }
    } else if lower.contains("recipient") || lower.contains("mailbox") || lower.contains("550") {
        HumanError {
            message: "The mail server didn't accept that address.".into(),
            suggestion: "Check the recipient's e-mail address and send again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else {
        HumanError {
            message: "The e-mail couldn't be sent.".into(),
            suggestion: format!("Your PDF is still ready. Try sending again in a moment, or download it instead. (Detail: {detail})"),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_needs_user_action() {
        let human = humanize_error(&Pic2PdfError::validation("the subject is missing"));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("subject"));
    }

    #[test]
    fn decode_failure_is_permanent_and_names_image() {
        let err = Pic2PdfError::Decode {
            name: "beach.jpg".into(),
            reason: "bad huffman table".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.message.contains("beach.jpg"));
    }

    #[test]
    fn connection_failure_is_transient() {
        let human = humanize_error(&Pic2PdfError::Dispatch("connection refused".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn auth_failure_is_permanent() {
        let human = humanize_error(&Pic2PdfError::Dispatch(
            "permanent error (535): authentication failed".into(),
        ));
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn rejected_recipient_needs_user_action() {
        let human = humanize_error(&Pic2PdfError::Dispatch(
            "permanent error (550): mailbox unavailable".into(),
        ));
        assert_eq!(human.severity, Severity::ActionRequired);
    }
}
