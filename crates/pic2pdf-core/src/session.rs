// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session state — the caller-owned selection of images, the document name, and
// the most recently composed document.
//
// The composer and dispatcher never see this type. Callers take a snapshot of
// `images()` for composition and store the result back with `set_document`.
// Any edit to the inputs drops the stored document so a stale PDF can never be
// downloaded or sent.

use tracing::{debug, info};

use crate::error::{Pic2PdfError, Result};
use crate::types::{ComposedDocument, Direction, ImageId, ImageSequence, ImageSource};
use crate::validation::{self, DEFAULT_DOCUMENT_NAME};

/// What happened when an image was offered to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(ImageId),
    /// Same display name and byte length as an image already selected.
    Duplicate,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    images: ImageSequence,
    document_name: Option<String>,
    document: Option<ComposedDocument>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Images ---------------------------------------------------------------

    /// Append an image unless an identical-looking one is already selected.
    pub fn add_image(&mut self, source: ImageSource) -> Result<AddOutcome> {
        let duplicate = self
            .images
            .iter()
            .any(|img| img.name() == source.name() && img.len() == source.len());
        if duplicate {
            debug!(name = source.name(), "duplicate image ignored");
            return Ok(AddOutcome::Duplicate);
        }

        let id = source.id();
        self.images.push(source)?;
        self.invalidate_document();
        Ok(AddOutcome::Added(id))
    }

    /// Remove an image by identifier.
    pub fn remove_image(&mut self, id: ImageId) -> Result<ImageSource> {
        let removed = self
            .images
            .remove(id)
            .ok_or_else(|| Pic2PdfError::validation(format!("no selected image with id {id}")))?;
        self.invalidate_document();
        Ok(removed)
    }

    /// Move an image one place. Returns `true` when the order changed.
    pub fn move_image(&mut self, id: ImageId, direction: Direction) -> bool {
        let moved = self.images.move_image(id, direction);
        if moved {
            self.invalidate_document();
        }
        moved
    }

    pub fn images(&self) -> &ImageSequence {
        &self.images
    }

    // -- Naming ---------------------------------------------------------------

    /// Set the document name after validating it.
    pub fn set_document_name(&mut self, name: &str) -> Result<()> {
        let name = validation::validate_document_name(name)?;
        if self.document_name.as_deref() != Some(name.as_str()) {
            self.document_name = Some(name);
            self.invalidate_document();
        }
        Ok(())
    }

    /// The chosen name, or the default when none was set.
    pub fn document_name(&self) -> &str {
        self.document_name.as_deref().unwrap_or(DEFAULT_DOCUMENT_NAME)
    }

    /// `<name>.pdf`
    pub fn file_name(&self) -> String {
        validation::pdf_file_name(self.document_name())
    }

    /// Whether there is enough input to compose.
    pub fn can_compose(&self) -> bool {
        !self.images.is_empty() && self.document_name.is_some()
    }

    // -- Composed document ----------------------------------------------------

    pub fn set_document(&mut self, document: ComposedDocument) {
        info!(
            pages = document.page_count(),
            fingerprint = %document.fingerprint,
            "document stored in session"
        );
        self.document = Some(document);
    }

    pub fn document(&self) -> Option<&ComposedDocument> {
        self.document.as_ref()
    }

    pub fn invalidate_document(&mut self) {
        if self.document.take().is_some() {
            debug!("composed document invalidated");
        }
    }

    // -- Dispatch defaults ----------------------------------------------------

    pub fn default_subject(&self) -> String {
        format!("[PDF] {}", self.document_name())
    }

    pub fn default_body(&self) -> String {
        format!("Please find the PDF \"{}\" attached.", self.file_name())
    }

    /// Forget everything.
    pub fn reset(&mut self) {
        self.images.clear();
        self.document_name = None;
        self.document = None;
        info!("session reset");
    }
}
