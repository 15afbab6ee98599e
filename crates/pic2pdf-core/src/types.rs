// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for pic2pdf.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Pic2PdfError, Result};

/// Unique identifier for a selected image.
///
/// Assigned once at selection time; reordering never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(pub Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two raster encodings accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Accept a declared MIME type. Parameters after the type (`image/png; q=1`)
    /// are tolerated, anything else is rejected.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/jpeg") {
            Some(Self::Jpeg)
        } else if mime.starts_with("image/png") {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Jpeg => f.write_str("JPEG"),
            Self::Png => f.write_str("PNG"),
        }
    }
}

/// One selected image: identity, display name, declared format, and the raw
/// encoded bytes exactly as ingested.
#[derive(Debug, Clone)]
pub struct ImageSource {
    id: ImageId,
    name: String,
    format: ImageFormat,
    bytes: Arc<[u8]>,
}

impl ImageSource {
    /// Create a source with a fresh identifier.
    pub fn new(name: impl Into<String>, format: ImageFormat, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::with_id(ImageId::new(), name, format, bytes)
    }

    /// Create a source with an explicit identifier.
    pub fn with_id(
        id: ImageId,
        name: impl Into<String>,
        format: ImageFormat,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            format,
            bytes: bytes.into(),
        }
    }

    /// Create a source from a declared MIME type, rejecting anything that is
    /// not JPEG or PNG.
    pub fn from_mime(
        name: impl Into<String>,
        mime: &str,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self> {
        let name = name.into();
        let format = ImageFormat::from_mime(mime).ok_or_else(|| {
            Pic2PdfError::validation(format!("{name} is not a JPG/PNG image ({mime})"))
        })?;
        Ok(Self::new(name, format, bytes))
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the encoded content in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Direction for moving an image one step within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Ordered list of images. Order is page order; identifiers are unique.
#[derive(Debug, Clone, Default)]
pub struct ImageSequence {
    images: Vec<ImageSource>,
}

impl ImageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from sources in the given order.
    pub fn from_sources(sources: impl IntoIterator<Item = ImageSource>) -> Result<Self> {
        let mut seq = Self::new();
        for source in sources {
            seq.push(source)?;
        }
        Ok(seq)
    }

    /// Append an image. Rejects an identifier that is already present.
    pub fn push(&mut self, source: ImageSource) -> Result<()> {
        if self.contains(source.id()) {
            return Err(Pic2PdfError::validation(format!(
                "image {} is already in the sequence",
                source.id()
            )));
        }
        self.images.push(source);
        Ok(())
    }

    /// Remove an image by identifier, returning it.
    pub fn remove(&mut self, id: ImageId) -> Option<ImageSource> {
        let index = self.position(id)?;
        Some(self.images.remove(index))
    }

    /// Move an image one step up or down. Returns `true` when the order changed.
    pub fn move_image(&mut self, id: ImageId, direction: Direction) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.images.len() => index + 1,
            _ => return false,
        };
        self.images.swap(index, target);
        true
    }

    pub fn position(&self, id: ImageId) -> Option<usize> {
        self.images.iter().position(|img| img.id() == id)
    }

    pub fn contains(&self, id: ImageId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&ImageSource> {
        self.images.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageSource> {
        self.images.iter()
    }

    pub fn ids(&self) -> Vec<ImageId> {
        self.images.iter().map(ImageSource::id).collect()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}

impl<'a> IntoIterator for &'a ImageSequence {
    type Item = &'a ImageSource;
    type IntoIter = std::slice::Iter<'a, ImageSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

/// Fixed page geometry in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    width_mm: f32,
    height_mm: f32,
    margin_mm: f32,
}

impl PageGeometry {
    /// ISO A4 portrait with a uniform 10 mm margin.
    pub const A4: Self = Self {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 10.0,
    };

    /// Build a geometry, rejecting one whose drawable area would be empty.
    pub fn new(width_mm: f32, height_mm: f32, margin_mm: f32) -> Result<Self> {
        let geometry = Self {
            width_mm,
            height_mm,
            margin_mm,
        };
        // Written so that NaN inputs fail too.
        let usable = margin_mm >= 0.0
            && geometry.drawable_width() > 0.0
            && geometry.drawable_height() > 0.0;
        if !usable {
            return Err(Pic2PdfError::validation(format!(
                "page {width_mm}x{height_mm} mm with margin {margin_mm} mm has no drawable area"
            )));
        }
        Ok(geometry)
    }

    pub fn width_mm(&self) -> f32 {
        self.width_mm
    }

    pub fn height_mm(&self) -> f32 {
        self.height_mm
    }

    pub fn margin_mm(&self) -> f32 {
        self.margin_mm
    }

    /// Width inside the margins.
    pub fn drawable_width(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Height inside the margins.
    pub fn drawable_height(&self) -> f32 {
        self.height_mm - 2.0 * self.margin_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Size and offset of one image on its page, in millimetres from the page's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Placement {
    /// Whether the placement lies within the drawable area, allowing `tolerance`
    /// millimetres of floating-point slack.
    pub fn fits_within(&self, geometry: &PageGeometry, tolerance: f32) -> bool {
        let margin = geometry.margin_mm();
        self.x >= margin - tolerance
            && self.y >= margin - tolerance
            && self.x + self.width <= geometry.width_mm() - margin + tolerance
            && self.y + self.height <= geometry.height_mm() - margin + tolerance
    }

    /// Offset of the bottom edge measured from the bottom of the page, as PDF
    /// coordinates expect.
    pub fn bottom_offset(&self, geometry: &PageGeometry) -> f32 {
        geometry.height_mm() - self.y - self.height
    }
}

/// A finished PDF: bytes plus the layout that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedDocument {
    /// File name including the `.pdf` extension.
    pub file_name: String,
    /// Serialised PDF bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// One placement per page, in page order.
    pub placements: Vec<Placement>,
    /// SHA-256 of `bytes`, lowercase hex.
    pub fingerprint: String,
    pub created_at: DateTime<Utc>,
}

impl ComposedDocument {
    pub fn page_count(&self) -> usize {
        self.placements.len()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type of the artifact.
    pub fn mime_type(&self) -> &'static str {
        "application/pdf"
    }
}

/// Everything needed to e-mail a composed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
}

/// Acknowledgement of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    pub to: String,
    pub attachment_name: String,
    pub attachment_bytes: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str) -> ImageSource {
        ImageSource::new(name, ImageFormat::Png, vec![1u8, 2, 3])
    }

    #[test]
    fn mime_accepts_only_jpeg_and_png() {
        assert_eq!(ImageFormat::from_mime("image/jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime("image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime("IMAGE/PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime("image/gif"), None);
        assert_eq!(ImageFormat::from_mime("application/pdf"), None);
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("Png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("webp"), None);
    }

    #[test]
    fn from_mime_rejects_unsupported_format() {
        let err = ImageSource::from_mime("clip.gif", "image/gif", vec![0u8]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn sequence_rejects_duplicate_ids() {
        let img = source("a.png");
        let copy = img.clone();
        let mut seq = ImageSequence::new();
        seq.push(img).unwrap();
        assert!(seq.push(copy).is_err());
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn move_swaps_neighbours_and_stops_at_edges() {
        let (a, b, c) = (source("a"), source("b"), source("c"));
        let (ida, idb, idc) = (a.id(), b.id(), c.id());
        let mut seq = ImageSequence::from_sources([a, b, c]).unwrap();

        assert!(!seq.move_image(ida, Direction::Up));
        assert!(!seq.move_image(idc, Direction::Down));
        assert!(seq.move_image(idc, Direction::Up));
        assert_eq!(seq.ids(), vec![ida, idc, idb]);
        assert!(seq.move_image(ida, Direction::Down));
        assert_eq!(seq.ids(), vec![idc, ida, idb]);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let (a, b, c) = (source("a"), source("b"), source("c"));
        let (ida, idb, idc) = (a.id(), b.id(), c.id());
        let mut seq = ImageSequence::from_sources([a, b, c]).unwrap();
        assert_eq!(seq.remove(idb).map(|s| s.name().to_owned()), Some("b".into()));
        assert_eq!(seq.ids(), vec![ida, idc]);
        assert!(seq.remove(idb).is_none());
    }

    #[test]
    fn a4_drawable_area() {
        let g = PageGeometry::A4;
        assert_eq!(g.drawable_width(), 190.0);
        assert_eq!(g.drawable_height(), 277.0);
    }

    #[test]
    fn geometry_without_drawable_area_is_rejected() {
        assert!(PageGeometry::new(20.0, 297.0, 10.0).is_err());
        assert!(PageGeometry::new(210.0, 297.0, -1.0).is_err());
        assert!(PageGeometry::new(210.0, 297.0, 10.0).is_ok());
    }

    #[test]
    fn bottom_offset_flips_y_axis() {
        let p = Placement {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 277.0,
        };
        assert_eq!(p.bottom_offset(&PageGeometry::A4), 10.0);
    }
}
