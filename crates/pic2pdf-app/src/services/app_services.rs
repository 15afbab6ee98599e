// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the persisted config and runs compositions off
// the async runtime.
//
// Composition is CPU-bound, so it runs on `spawn_blocking` against a snapshot
// of the session's image sequence. The session itself stays with the caller.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pic2pdf_core::error::{Pic2PdfError, Result};
use pic2pdf_core::session::AddOutcome;
use pic2pdf_core::{AppConfig, ImageFormat, ImageSource, Session};
use pic2pdf_document::DocumentComposer;
use tracing::{info, warn};

use super::data_dir;

const CONFIG_FILE: &str = "config.json";
const DOCUMENTS_DIR: &str = "documents";

/// Shared services for the CLI commands and the HTTP server.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Resolve the data directory and load the persisted config.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir()?;
        info!(path = %dir.display(), "initialising app services");
        Ok(Self::with_data_dir(dir))
    }

    /// Services rooted at an explicit directory.
    pub fn with_data_dir(dir: PathBuf) -> Self {
        let config = load_config(&dir).unwrap_or_default();
        Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    // -- Config Persistence --------------------------------------------------

    pub fn config(&self) -> AppConfig {
        self.config.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Ok(mut current) = self.config.lock() {
            *current = config.clone();
        }
        persist_config(&self.data_dir, config)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Where PDFs are written: the explicit override, then the configured
    /// directory, then `documents/` inside the data directory.
    pub fn output_dir(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.config().output_dir)
            .unwrap_or_else(|| self.data_dir.join(DOCUMENTS_DIR))
    }

    // -- Images --------------------------------------------------------------

    /// Read an image file, taking its format from the extension.
    pub fn load_image(path: &Path) -> Result<ImageSource> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| Pic2PdfError::validation(format!("{name} is not a JPG/PNG image")))?;
        let bytes = std::fs::read(path)?;
        Ok(ImageSource::new(name, format, bytes))
    }

    /// Build a session from image files in the given order.
    ///
    /// Without an explicit name the configured default is used.
    pub fn session_from_paths(&self, paths: &[PathBuf], name: Option<&str>) -> Result<Session> {
        let mut session = Session::new();
        for path in paths {
            if let AddOutcome::Duplicate = session.add_image(Self::load_image(path)?)? {
                warn!(path = %path.display(), "skipping duplicate image");
            }
        }
        let name = name.map(str::to_owned).unwrap_or_else(|| self.config().default_document_name);
        session.set_document_name(&name)?;
        Ok(session)
    }

    // -- Composition ---------------------------------------------------------

    /// Compose the session's images and write `<name>.pdf` into the output
    /// directory. The document is stored back into the session.
    pub async fn compose_to_file(&self, session: &mut Session, out_dir: Option<&Path>) -> Result<PathBuf> {
        if !session.can_compose() {
            return Err(Pic2PdfError::validation("select at least one image first"));
        }

        let dir = self.output_dir(out_dir);
        std::fs::create_dir_all(&dir)?;

        let images = session.images().clone();
        let composer = DocumentComposer::new(session.document_name());
        let (document, path) = tokio::task::spawn_blocking(move || composer.compose_to_dir(&images, &dir))
            .await
            .map_err(|e| Pic2PdfError::Pdf(format!("composition task failed: {e}")))??;

        info!(
            pages = document.page_count(),
            bytes = document.len(),
            fingerprint = %document.fingerprint,
            "document composed"
        );
        session.set_document(document);
        Ok(path)
    }
}

// -- Config file persistence -------------------------------------------------

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let data = std::fs::read_to_string(data_dir.join(CONFIG_FILE)).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(error = %e, "ignoring unreadable config.json");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(data_dir.join(CONFIG_FILE), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat as CodecFormat, RgbImage};
    use pic2pdf_document::PdfReader;

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
            .save_with_format(&path, CodecFormat::Png)
            .unwrap();
        path
    }

    #[test]
    fn config_round_trips_through_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let services = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(services.config(), AppConfig::default());

        let config = AppConfig {
            default_document_name: "scans".into(),
            server_port: 8080,
            ..AppConfig::default()
        };
        services.save_config(&config).unwrap();

        let reloaded = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(reloaded.config(), config);
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();
        let services = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(services.config(), AppConfig::default());
    }

    #[test]
    fn output_dir_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let services = AppServices::with_data_dir(dir.path().to_path_buf());
        assert_eq!(services.output_dir(None), dir.path().join("documents"));

        services
            .save_config(&AppConfig {
                output_dir: Some(PathBuf::from("/srv/pdfs")),
                ..AppConfig::default()
            })
            .unwrap();
        assert_eq!(services.output_dir(None), PathBuf::from("/srv/pdfs"));
        assert_eq!(services.output_dir(Some(Path::new("/tmp/x"))), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn load_image_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.gif");
        std::fs::write(&path, b"GIF89a").unwrap();
        assert!(AppServices::load_image(&path).unwrap_err().is_validation());
    }

    #[test]
    fn session_keeps_order_and_skips_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", 4, 3);
        let b = write_png(dir.path(), "b.png", 3, 4);
        let services = AppServices::with_data_dir(dir.path().to_path_buf());

        let session = services
            .session_from_paths(&[b.clone(), a, b], Some("holiday"))
            .unwrap();
        let names: Vec<_> = session.images().iter().map(|i| i.name().to_owned()).collect();
        assert_eq!(names, ["b.png", "a.png"]);
        assert_eq!(session.file_name(), "holiday.pdf");
    }

    #[test]
    fn session_uses_configured_default_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", 4, 3);
        let services = AppServices::with_data_dir(dir.path().to_path_buf());
        services
            .save_config(&AppConfig {
                default_document_name: "inbox".into(),
                ..AppConfig::default()
            })
            .unwrap();
        let session = services.session_from_paths(&[a], None).unwrap();
        assert_eq!(session.file_name(), "inbox.pdf");
    }

    #[tokio::test]
    async fn compose_to_file_writes_pdf_and_stores_document() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(dir.path(), "a.png", 8, 6);
        let b = write_png(dir.path(), "b.png", 6, 8);
        let services = AppServices::with_data_dir(dir.path().to_path_buf());
        let mut session = services.session_from_paths(&[a, b], Some("pair")).unwrap();

        let out = dir.path().join("out");
        let path = services.compose_to_file(&mut session, Some(&out)).await.unwrap();

        assert_eq!(path, out.join("pair.pdf"));
        let document = session.document().unwrap();
        assert_eq!(document.page_count(), 2);
        assert_eq!(PdfReader::open(&path).unwrap().page_count(), 2);
    }

    #[tokio::test]
    async fn compose_to_file_needs_images() {
        let dir = tempfile::tempdir().unwrap();
        let services = AppServices::with_data_dir(dir.path().to_path_buf());
        let mut session = Session::new();
        let err = services.compose_to_file(&mut session, None).await.unwrap_err();
        assert!(err.is_validation());
    }
}
