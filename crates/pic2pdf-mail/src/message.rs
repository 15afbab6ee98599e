// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outgoing message envelope handed to a `Mailer`.

use serde::{Deserialize, Serialize};

/// Transfer encoding declared for every attachment.
pub const ATTACHMENT_ENCODING: &str = "base64";

/// Content type of the composed document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file attached to the message. `content` is already base64 text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
    pub encoding: String,
    pub content_type: String,
}

impl Attachment {
    /// PDF attachment from base64 content.
    pub fn pdf(filename: impl Into<String>, base64_content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: base64_content.into(),
            encoding: ATTACHMENT_ENCODING.to_owned(),
            content_type: PDF_CONTENT_TYPE.to_owned(),
        }
    }
}

/// A complete message ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Plain-text body exactly as the user wrote it.
    pub text: String,
    /// The same body as a single HTML paragraph.
    pub html: String,
    pub attachment: Attachment,
}

impl OutgoingMail {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
        attachment: Attachment,
    ) -> Self {
        let text = text.into();
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            html: text_to_html(&text),
            text,
            attachment,
        }
    }
}

/// Wrap plain text in `<p>`, escaping markup and turning newlines into `<br>`.
pub fn text_to_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len() + 7);
    html.push_str("<p>");
    for c in text.chars() {
        match c {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '"' => html.push_str("&quot;"),
            '\'' => html.push_str("&#39;"),
            '\r' => {}
            '\n' => html.push_str("<br>"),
            other => html.push(other),
        }
    }
    html.push_str("</p>");
    html
}
