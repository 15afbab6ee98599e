// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pic2pdf — turn photos into a one-image-per-page A4 PDF and e-mail it.
//
// Entry point. Parses the command line, initialises logging, and runs the
// selected command.

mod cli;
mod routes;
mod services;

use std::process::ExitCode;

use clap::Parser;
use pic2pdf_core::Pic2PdfError;
use pic2pdf_core::human_errors::humanize_error;
use tracing_subscriber::EnvFilter;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("pic2pdf {} starting", env!("CARGO_PKG_VERSION"));

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(domain) = err.downcast_ref::<Pic2PdfError>() {
                let human = humanize_error(domain);
                eprintln!("{}\n{}", human.message, human.suggestion);
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
