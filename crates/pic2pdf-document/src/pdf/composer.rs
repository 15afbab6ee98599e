// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document composer — one image per page, fit inside the margins, centred.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.
//
// Images are processed strictly in order. Each is decoded, measured, placed and
// embedded before the next one is touched, so page N is always image N. Any
// failure aborts the whole composition; no partial document escapes.

use std::path::{Path, PathBuf};

use chrono::Utc;
use pic2pdf_core::error::{Pic2PdfError, Result};
use pic2pdf_core::validation::pdf_file_name;
use pic2pdf_core::{ComposedDocument, ImageSequence, ImageSource, PageGeometry, Placement};
use printpdf::{Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, RawImage, XObjectTransform};
use tracing::{debug, info, instrument, warn};

use crate::image::DecodedImage;
use crate::integrity::fingerprint;
use crate::layout;
use crate::pdf::embed::{DecodedPixelsEmbed, EmbedStrategy, RawBytesEmbed};

/// At 72 dpi one image pixel renders as one PDF point, which keeps the scale
/// factor a plain points-per-pixel ratio.
const PLACEMENT_DPI: f32 = 72.0;

/// Composes ordered images into a paginated PDF.
pub struct DocumentComposer {
    geometry: PageGeometry,
    /// Document name (without extension); also the PDF title.
    name: String,
    primary: Box<dyn EmbedStrategy>,
    fallback: Box<dyn EmbedStrategy>,
}

impl DocumentComposer {
    /// Composer for A4 pages with the standard strategies.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_strategies(name, Box::new(RawBytesEmbed), Box::new(DecodedPixelsEmbed))
    }

    /// Composer with explicit embedding strategies, tried in order.
    pub fn with_strategies(
        name: impl Into<String>,
        primary: Box<dyn EmbedStrategy>,
        fallback: Box<dyn EmbedStrategy>,
    ) -> Self {
        Self {
            geometry: PageGeometry::A4,
            name: name.into(),
            primary,
            fallback,
        }
    }

    /// Use a different page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// `<name>.pdf`
    pub fn file_name(&self) -> String {
        pdf_file_name(&self.name)
    }

    // -- Composition ----------------------------------------------------------

    /// Compose the images into a PDF, one page per image in sequence order.
    #[instrument(skip(self, images), fields(name = %self.name, images = images.len()))]
    pub fn compose(&self, images: &ImageSequence) -> Result<ComposedDocument> {
        if images.is_empty() {
            return Err(Pic2PdfError::validation(
                "select at least one image before creating the PDF",
            ));
        }

        info!(geometry = ?self.geometry, "Composing PDF");

        let (page_w, page_h) = (Mm(self.geometry.width_mm()), Mm(self.geometry.height_mm()));
        let mut doc = PdfDocument::new(&self.name);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());
        let mut placements: Vec<Placement> = Vec::with_capacity(images.len());

        for (index, source) in images.iter().enumerate() {
            let decoded = DecodedImage::from_source(source)?;
            let placement = self.placement_for(source.name(), &decoded)?;
            let raw = self.embed(source, &decoded)?;

            let transform = self.transform_for(&placement, &raw);
            let xobject_id = doc.add_image(&raw);
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform,
            }];
            pages.push(PdfPage::new(page_w, page_h, ops));

            debug!(
                page = index + 1,
                image = source.name(),
                x = placement.x,
                y = placement.y,
                width = placement.width,
                height = placement.height,
                "Image placed on page"
            );
            placements.push(placement);
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported save warnings");
        }

        let document = ComposedDocument {
            file_name: self.file_name(),
            fingerprint: fingerprint(&bytes),
            bytes,
            placements,
            created_at: Utc::now(),
        };

        info!(
            pages = document.page_count(),
            bytes = document.len(),
            fingerprint = %document.fingerprint,
            "PDF composed"
        );
        Ok(document)
    }

    /// Compose and write `<dir>/<name>.pdf`, returning the document and path.
    pub fn compose_to_dir(
        &self,
        images: &ImageSequence,
        dir: impl AsRef<Path>,
    ) -> Result<(ComposedDocument, PathBuf)> {
        let document = self.compose(images)?;
        let path = dir.as_ref().join(&document.file_name);
        std::fs::write(&path, &document.bytes)?;
        info!("Wrote PDF to {}", path.display());
        Ok((document, path))
    }

    // -- Per-image steps ------------------------------------------------------

    /// Reject zero-sized images, then fit and centre.
    ///
    /// The bundled JPEG/PNG decoders already refuse zero-sized headers, so
    /// through `compose` such files surface as `Decode`; this check covers
    /// any decoder that lets them through.
    fn placement_for(&self, name: &str, decoded: &DecodedImage) -> Result<Placement> {
        layout::place(&self.geometry, decoded.width(), decoded.height()).ok_or_else(|| {
            Pic2PdfError::DegenerateImage {
                name: name.to_owned(),
                width: decoded.width(),
                height: decoded.height(),
            }
        })
    }

    /// Try the primary strategy, then the fallback once.
    fn embed(&self, source: &ImageSource, decoded: &DecodedImage) -> Result<RawImage> {
        let primary_err = match self.primary.prepare(source, decoded) {
            Ok(raw) => return Ok(raw),
            Err(err) => err,
        };

        warn!(
            image = source.name(),
            strategy = self.primary.name(),
            error = %primary_err,
            "Primary embedding failed, trying {}",
            self.fallback.name()
        );

        self.fallback
            .prepare(source, decoded)
            .map_err(|fallback_err| Pic2PdfError::Encode {
                name: source.name().to_owned(),
                primary: format!("{}: {primary_err}", self.primary.name()),
                fallback: format!("{}: {fallback_err}", self.fallback.name()),
            })
    }

    /// Map a top-left-origin placement in mm onto printpdf's bottom-left
    /// coordinate system, scaling the XObject to the exact placed size.
    fn transform_for(&self, placement: &Placement, raw: &RawImage) -> XObjectTransform {
        let width_pt = Mm(placement.width).into_pt().0;
        let height_pt = Mm(placement.height).into_pt().0;
        XObjectTransform {
            translate_x: Some(Mm(placement.x).into_pt()),
            translate_y: Some(Mm(placement.bottom_offset(&self.geometry)).into_pt()),
            scale_x: Some(width_pt / raw.width as f32),
            scale_y: Some(height_pt / raw.height as f32),
            dpi: Some(PLACEMENT_DPI),
            rotate: None,
        }
    }
}

impl Default for DocumentComposer {
    fn default() -> Self {
        Self::new(pic2pdf_core::validation::DEFAULT_DOCUMENT_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use image::{DynamicImage, ImageFormat as CodecFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use pic2pdf_core::ImageFormat;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const EPS: f32 = 1e-3;

    fn jpeg(name: &str, w: u32, h: u32) -> ImageSource {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([30, 120, 200])));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), CodecFormat::Jpeg)
            .unwrap();
        ImageSource::new(name, ImageFormat::Jpeg, bytes)
    }

    fn png(name: &str, w: u32, h: u32) -> ImageSource {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([250, 20, 20, 200])));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), CodecFormat::Png)
            .unwrap();
        ImageSource::new(name, ImageFormat::Png, bytes)
    }

    /// PNG signature, an IHDR with the given size and an IEND; no pixel data.
    fn png_header_only(width: u32, height: u32) -> Vec<u8> {
        fn crc32(bytes: &[u8]) -> u32 {
            let mut crc = 0xFFFF_FFFFu32;
            for &b in bytes {
                crc ^= u32::from(b);
                for _ in 0..8 {
                    crc = if crc & 1 == 1 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
                }
            }
            !crc
        }
        fn chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            let start = out.len();
            out.extend_from_slice(kind);
            out.extend_from_slice(data);
            let crc = crc32(&out[start..]);
            out.extend_from_slice(&crc.to_be_bytes());
        }

        let mut ihdr = Vec::with_capacity(13);
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&height.to_be_bytes());
        ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);

        let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
        chunk(&mut out, b"IHDR", &ihdr);
        chunk(&mut out, b"IEND", &[]);
        out
    }

    /// Always fails and counts how often it was asked.
    struct Failing(Arc<AtomicUsize>);

    impl EmbedStrategy for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn prepare(&self, _: &ImageSource, _: &DecodedImage) -> std::result::Result<RawImage, String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err("refused".into())
        }
    }

    /// Delegates to the pixel strategy and counts calls.
    struct Counting(Arc<AtomicUsize>);

    impl EmbedStrategy for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn prepare(
            &self,
            source: &ImageSource,
            decoded: &DecodedImage,
        ) -> std::result::Result<RawImage, String> {
            self.0.fetch_add(1, Ordering::SeqCst);
            DecodedPixelsEmbed.prepare(source, decoded)
        }
    }

    #[test]
    fn two_images_two_pages_in_order() {
        let images =
            ImageSequence::from_sources([jpeg("landscape.jpg", 80, 60), png("portrait.png", 60, 80)])
                .unwrap();
        let doc = DocumentComposer::new("holiday").compose(&images).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.file_name, "holiday.pdf");
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.fingerprint, fingerprint(&doc.bytes));

        let first = doc.placements[0];
        assert!((first.width - 190.0).abs() < EPS);
        assert!((first.height - 142.5).abs() < EPS);
        assert!((first.x - 10.0).abs() < EPS);
        assert!((first.y - 77.25).abs() < EPS);

        let second = doc.placements[1];
        assert!((second.width - 190.0).abs() < EPS);
        assert!((second.height - 253.333).abs() < EPS);

        let reader = PdfReader::from_bytes(&doc.bytes).unwrap();
        assert_eq!(reader.page_count(), 2);
    }

    #[test]
    fn empty_sequence_is_a_validation_error() {
        let err = DocumentComposer::default()
            .compose(&ImageSequence::new())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn undecodable_image_aborts_whole_document() {
        let broken = ImageSource::new("broken.png", ImageFormat::Png, b"nope".to_vec());
        let images = ImageSequence::from_sources([jpeg("ok.jpg", 10, 10), broken]).unwrap();
        match DocumentComposer::default().compose(&images) {
            Err(Pic2PdfError::Decode { name, .. }) => assert_eq!(name, "broken.png"),
            other => panic!("expected decode error, got {:?}", other.map(|d| d.page_count())),
        }
    }

    #[test]
    fn zero_sized_image_is_degenerate() {
        let composer = DocumentComposer::default();
        let empty = DecodedImage::from_dynamic(DynamicImage::new_rgb8(0, 12), ImageFormat::Png);
        match composer.placement_for("blank.png", &empty) {
            Err(Pic2PdfError::DegenerateImage { name, width, height }) => {
                assert_eq!(name, "blank.png");
                assert_eq!((width, height), (0, 12));
            }
            other => panic!("expected degenerate image error, got {other:?}"),
        }
    }

    #[test]
    fn default_primary_handles_valid_jpeg_and_png() {
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let composer = DocumentComposer::with_strategies(
            "direct",
            Box::new(RawBytesEmbed),
            Box::new(Counting(fallback_calls.clone())),
        );
        let images = ImageSequence::from_sources([
            jpeg("landscape.jpg", 80, 60),
            png("portrait.png", 60, 80),
        ])
        .unwrap();

        let doc = composer.compose(&images).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn zero_width_header_never_yields_a_document() {
        let blank = ImageSource::new("blank.png", ImageFormat::Png, png_header_only(0, 12));
        let images = ImageSequence::from_sources([jpeg("ok.jpg", 10, 10), blank]).unwrap();
        match DocumentComposer::default().compose(&images) {
            Err(Pic2PdfError::Decode { name, .. }) | Err(Pic2PdfError::DegenerateImage { name, .. }) => {
                assert_eq!(name, "blank.png")
            }
            other => panic!("expected rejection, got {:?}", other.map(|d| d.page_count())),
        }
    }

    #[test]
    fn fallback_is_used_when_primary_fails() {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let composer = DocumentComposer::with_strategies(
            "fallback",
            Box::new(Failing(primary_calls.clone())),
            Box::new(Counting(fallback_calls.clone())),
        );
        let images = ImageSequence::from_sources([jpeg("a.jpg", 20, 10), png("b.png", 10, 20)]).unwrap();

        let doc = composer.compose(&images).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(primary_calls.load(Ordering::SeqCst), 2);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn fallback_not_tried_when_primary_succeeds() {
        let primary_calls = Arc::new(AtomicUsize::new(0));
        let fallback_calls = Arc::new(AtomicUsize::new(0));
        let composer = DocumentComposer::with_strategies(
            "primary",
            Box::new(Counting(primary_calls.clone())),
            Box::new(Failing(fallback_calls.clone())),
        );
        let images = ImageSequence::from_sources([png("only.png", 5, 5)]).unwrap();

        composer.compose(&images).unwrap();
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn both_strategies_failing_is_an_encode_error_with_both_causes() {
        let composer = DocumentComposer::with_strategies(
            "doomed",
            Box::new(Failing(Arc::new(AtomicUsize::new(0)))),
            Box::new(Failing(Arc::new(AtomicUsize::new(0)))),
        );
        let images = ImageSequence::from_sources([jpeg("first.jpg", 8, 8)]).unwrap();
        match composer.compose(&images) {
            Err(Pic2PdfError::Encode {
                name,
                primary,
                fallback,
            }) => {
                assert_eq!(name, "first.jpg");
                assert!(primary.contains("refused"));
                assert!(fallback.contains("refused"));
            }
            other => panic!("expected encode error, got {:?}", other.map(|d| d.page_count())),
        }
    }

    #[test]
    fn composing_twice_gives_identical_geometry() {
        let images =
            ImageSequence::from_sources([jpeg("a.jpg", 300, 100), png("b.png", 100, 300)]).unwrap();
        let composer = DocumentComposer::default();
        let first = composer.compose(&images).unwrap();
        let second = composer.compose(&images).unwrap();
        assert_eq!(first.page_count(), second.page_count());
        assert_eq!(first.placements, second.placements);
    }

    #[test]
    fn reordering_only_changes_page_order() {
        let a = jpeg("a.jpg", 300, 100);
        let b = png("b.png", 100, 300);
        let composer = DocumentComposer::default();

        let forward = composer
            .compose(&ImageSequence::from_sources([a.clone(), b.clone()]).unwrap())
            .unwrap();
        let reversed = composer
            .compose(&ImageSequence::from_sources([b, a]).unwrap())
            .unwrap();

        assert_eq!(forward.placements[0], reversed.placements[1]);
        assert_eq!(forward.placements[1], reversed.placements[0]);
    }

    #[test]
    fn every_placement_fits_the_page() {
        let images = ImageSequence::from_sources([
            jpeg("wide.jpg", 400, 20),
            jpeg("tall.jpg", 20, 400),
            png("square.png", 50, 50),
        ])
        .unwrap();
        let composer = DocumentComposer::default();
        let doc = composer.compose(&images).unwrap();
        for p in &doc.placements {
            assert!(p.fits_within(composer.geometry(), EPS), "{p:?}");
        }
    }

    #[test]
    fn compose_to_dir_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageSequence::from_sources([png("x.png", 4, 4)]).unwrap();
        let (doc, path) = DocumentComposer::new("out").compose_to_dir(&images, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("out.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), doc.bytes);
    }
}
