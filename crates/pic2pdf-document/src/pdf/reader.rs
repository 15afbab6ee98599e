// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open a composed PDF and inspect its pages using the `lopdf`
// crate. Used by `pic2pdf inspect` and to check composer output.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use pic2pdf_core::error::{Pic2PdfError, Result};
use tracing::{debug, info, instrument};

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// How deep to follow `/Parent` links looking for an inherited `/MediaBox`.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Read-only view of an existing PDF.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            Pic2PdfError::Pdf(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            Pic2PdfError::Pdf(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height of every page in millimetres, in page order.
    pub fn page_sizes_mm(&self) -> Result<Vec<(f32, f32)>> {
        self.document
            .get_pages()
            .into_iter()
            .map(|(number, id)| {
                let media_box = self.media_box(id).ok_or_else(|| {
                    Pic2PdfError::Pdf(format!("page {number} has no readable MediaBox"))
                })?;
                let [x0, y0, x1, y1] = media_box;
                Ok(((x1 - x0).abs() / PT_PER_MM, (y1 - y0).abs() / PT_PER_MM))
            })
            .collect()
    }

    /// `/MediaBox` of a page, following `/Parent` when it is inherited.
    fn media_box(&self, page_id: ObjectId) -> Option<[f32; 4]> {
        let mut current = self.document.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Some(rect) = read_rect(&self.document, current) {
                return Some(rect);
            }
            let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
            current = self.document.get_dictionary(parent).ok()?;
        }
        None
    }
}

fn read_rect(document: &Document, dict: &Dictionary) -> Option<[f32; 4]> {
    let object = dict.get(b"MediaBox").ok()?;
    let array = match object {
        Object::Reference(id) => document.get_object(*id).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };
    if array.len() != 4 {
        return None;
    }
    let mut rect = [0.0f32; 4];
    for (slot, value) in rect.iter_mut().zip(array) {
        *slot = value.as_float().ok()?;
    }
    Some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::composer::DocumentComposer;
    use image::{DynamicImage, ImageFormat as CodecFormat, RgbImage};
    use pic2pdf_core::{ImageFormat, ImageSequence, ImageSource};

    fn composed(pages: usize) -> Vec<u8> {
        let sources = (0..pages).map(|i| {
            let img = DynamicImage::ImageRgb8(RgbImage::new(8 + i as u32, 6));
            let mut bytes = Vec::new();
            img.write_to(&mut std::io::Cursor::new(&mut bytes), CodecFormat::Png)
                .unwrap();
            ImageSource::new(format!("{i}.png"), ImageFormat::Png, bytes)
        });
        let images = ImageSequence::from_sources(sources).unwrap();
        DocumentComposer::default().compose(&images).unwrap().bytes
    }

    #[test]
    fn counts_pages_of_composed_document() {
        let reader = PdfReader::from_bytes(&composed(3)).unwrap();
        assert_eq!(reader.page_count(), 3);
    }

    #[test]
    fn pages_are_a4() {
        let reader = PdfReader::from_bytes(&composed(2)).unwrap();
        for (w, h) in reader.page_sizes_mm().unwrap() {
            assert!((w - 210.0).abs() < 0.5, "width {w}");
            assert!((h - 297.0).abs() < 0.5, "height {h}");
        }
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        assert!(matches!(
            PdfReader::from_bytes(b"hello"),
            Err(Pic2PdfError::Pdf(_))
        ));
    }

    #[test]
    fn opens_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.pdf");
        std::fs::write(&path, composed(1)).unwrap();
        assert_eq!(PdfReader::open(&path).unwrap().page_count(), 1);
    }
}
