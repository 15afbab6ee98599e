// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pic2pdf-mail — Delivers a composed PDF as an e-mail attachment.
//
// The dispatcher validates the request, base64-encodes the document, builds the
// envelope, and hands it to a `Mailer`. `SmtpMailer` talks to a real relay via
// lettre; `MemoryMailer` keeps messages in memory for dry runs and tests.
//
// # Environment Variables
//
// `MailerConfig::from_env` reads:
//
// | Variable                | Required | Description                                   |
// |-------------------------|----------|-----------------------------------------------|
// | `EMAIL_SERVER_HOST`     | Yes      | SMTP relay hostname                           |
// | `EMAIL_SERVER_PORT`     | No       | Port (default 587)                            |
// | `EMAIL_SERVER_SECURE`   | No       | `true` implicit TLS, `none` plaintext, else STARTTLS |
// | `EMAIL_SERVER_USER`     | No       | Login name                                    |
// | `EMAIL_SERVER_PASSWORD` | No       | Password                                      |
// | `EMAIL_FROM`            | No*      | Sender; falls back to `EMAIL_SERVER_USER`     |
// | `EMAIL_SERVER_TIMEOUT`  | No       | Seconds (default 10)                          |

pub mod dispatch;
pub mod mailer;
pub mod message;
pub mod request;

pub use dispatch::Dispatcher;
pub use mailer::{Mailer, MailerConfig, MemoryMailer, SmtpMailer, TlsMode};
pub use message::{Attachment, OutgoingMail};
pub use request::{SendEmailRequest, SendEmailResponse};
