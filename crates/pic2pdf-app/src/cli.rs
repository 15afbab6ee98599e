// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line interface.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use pic2pdf_core::error::Pic2PdfError;
use pic2pdf_core::human_errors::humanize_error;
use pic2pdf_core::validation::{validate_dispatch_request, validate_document_name};
use pic2pdf_core::{AppConfig, DispatchRequest, Session};
use pic2pdf_document::PdfReader;
use pic2pdf_mail::{Dispatcher, Mailer, MemoryMailer, SmtpMailer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::routes::{AppState, build_router};
use crate::services::app_services::AppServices;

/// Sender shown on envelopes built by `send --dry-run`.
const DRY_RUN_SENDER: &str = "pic2pdf@localhost";

#[derive(Parser)]
#[command(
    name = "pic2pdf",
    version,
    about = "Turn JPG/PNG photos into an A4 PDF, one image per page, and e-mail it"
)]
pub struct Cli {
    /// Raise the log level (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compose images into `<name>.pdf`, in the order given.
    Compose {
        #[arg(required = true, value_name = "IMAGE")]
        images: Vec<PathBuf>,

        /// Document name without extension.
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Compose images, keep the PDF locally, and e-mail it.
    Send {
        #[arg(required = true, value_name = "IMAGE")]
        images: Vec<PathBuf>,

        #[arg(long)]
        to: String,

        /// Defaults to "[PDF] <name>".
        #[arg(short, long)]
        subject: Option<String>,

        /// Defaults to a short note naming the attachment.
        #[arg(short, long)]
        body: Option<String>,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Build and validate the e-mail without contacting a mail server.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the saved settings, or change them.
    Config {
        /// Default document name.
        #[arg(short, long)]
        name: Option<String>,

        /// Default output directory.
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Default port for `serve`.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the page count and page sizes of a PDF.
    Inspect { pdf: PathBuf },

    /// Serve `POST /api/send-email` and `GET /health`.
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let services = AppServices::init().context("preparing the data directory")?;

    match cli.command {
        Command::Compose { images, name, out_dir } => {
            let mut session = services.session_from_paths(&images, name.as_deref())?;
            let path = services.compose_to_file(&mut session, out_dir.as_deref()).await?;
            print_composed(&session, &path);
            Ok(())
        }
        Command::Send {
            images,
            to,
            subject,
            body,
            name,
            out_dir,
            dry_run,
        } => {
            let mailer: Arc<dyn Mailer> = if dry_run {
                Arc::new(MemoryMailer::new(DRY_RUN_SENDER))
            } else {
                Arc::new(SmtpMailer::from_env().context("configuring the SMTP transport")?)
            };
            let draft = Draft { to, subject, body };
            compose_and_send(
                &services,
                &Dispatcher::new(mailer),
                &images,
                name.as_deref(),
                out_dir.as_deref(),
                draft,
                dry_run,
            )
            .await
            .map(|_| ())
        }
        Command::Config { name, out_dir, port } => {
            let config = apply_settings(services.config(), name, out_dir, port)?;
            if config != services.config() {
                services.save_config(&config)?;
                info!("settings saved");
            }
            println!("data directory: {}", services.data_dir().display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Inspect { pdf } => inspect(&pdf),
        Command::Serve { port } => {
            let port = port.unwrap_or(services.config().server_port);
            serve(port).await
        }
    }
}

/// Recipient and message text as given on the command line.
struct Draft {
    to: String,
    subject: Option<String>,
    body: Option<String>,
}

/// Validate the e-mail, then compose, write, and send. Returns the PDF path.
async fn compose_and_send(
    services: &AppServices,
    dispatcher: &Dispatcher,
    images: &[PathBuf],
    name: Option<&str>,
    out_dir: Option<&Path>,
    draft: Draft,
    dry_run: bool,
) -> Result<PathBuf> {
    let mut session = services.session_from_paths(images, name)?;
    let request = DispatchRequest {
        to: draft.to,
        subject: draft.subject.unwrap_or_else(|| session.default_subject()),
        body: draft.body.unwrap_or_else(|| session.default_body()),
        attachment_name: session.file_name(),
    };
    validate_dispatch_request(&request)?;

    let path = services.compose_to_file(&mut session, out_dir).await?;
    print_composed(&session, &path);
    send(dispatcher, &session, &request, &path, dry_run).await?;
    Ok(path)
}

/// Overlay the given settings on `config`, validating the document name.
fn apply_settings(
    mut config: AppConfig,
    name: Option<String>,
    out_dir: Option<PathBuf>,
    port: Option<u16>,
) -> Result<AppConfig> {
    if let Some(name) = name {
        config.default_document_name = validate_document_name(&name)?;
    }
    if let Some(dir) = out_dir {
        config.output_dir = Some(dir);
    }
    if let Some(port) = port {
        config.server_port = port;
    }
    Ok(config)
}

async fn send(
    dispatcher: &Dispatcher,
    session: &Session,
    request: &DispatchRequest,
    path: &Path,
    dry_run: bool,
) -> Result<()> {
    let document = session
        .document()
        .ok_or_else(|| Pic2PdfError::validation("there is no PDF to send"))?;

    match dispatcher.dispatch(document, request).await {
        Ok(receipt) if dry_run => {
            println!("Dry run: would send {} to {}", receipt.attachment_name, receipt.to);
            Ok(())
        }
        Ok(receipt) => {
            println!("{} ({} -> {})", receipt.message, receipt.attachment_name, receipt.to);
            Ok(())
        }
        Err(err) => {
            warn!(retriable = humanize_error(&err).retriable, "dispatch failed");
            Err(err).with_context(|| format!("the PDF was kept at {}", path.display()))
        }
    }
}

fn inspect(pdf: &Path) -> Result<()> {
    let reader = PdfReader::open(pdf)?;
    println!("{}: {} page(s)", pdf.display(), reader.page_count());
    for (index, (width, height)) in reader.page_sizes_mm()?.into_iter().enumerate() {
        println!("  page {}: {:.1} x {:.1} mm", index + 1, width, height);
    }
    Ok(())
}

async fn serve(port: u16) -> Result<()> {
    let mailer = SmtpMailer::from_env().context("configuring the SMTP transport")?;
    let state = AppState {
        dispatcher: Dispatcher::new(Arc::new(mailer)),
    };
    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn print_composed(session: &Session, path: &Path) {
    if let Some(document) = session.document() {
        println!(
            "Wrote {} ({} page(s), {} bytes, sha256 {})",
            path.display(),
            document.page_count(),
            document.len(),
            document.fingerprint
        );
    }
}
