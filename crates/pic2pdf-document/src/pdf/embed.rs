// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Embedding strategies — turn one selected image into a `printpdf::RawImage`
// ready to be added to a document as an image XObject.
//
// Two strategies exist and the composer tries them in order:
//   1. `RawBytesEmbed` hands the encoded bytes straight to printpdf's decoder.
//   2. `DecodedPixelsEmbed` builds the XObject from the pixel buffer already
//      decoded for measuring.
// The second tolerates streams printpdf's own decoder rejects.

use pic2pdf_core::{ImageFormat, ImageSource};
use printpdf::{PdfWarnMsg, RawImage, RawImageData, RawImageFormat};
use tracing::debug;

use crate::image::DecodedImage;

/// One way of producing an embeddable image.
///
/// Errors are plain strings, matching what printpdf reports; the composer wraps
/// them into `Pic2PdfError::Encode` together with the image name.
pub trait EmbedStrategy: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    fn prepare(&self, source: &ImageSource, decoded: &DecodedImage) -> Result<RawImage, String>;
}

/// Primary strategy: let printpdf decode the original encoded bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawBytesEmbed;

impl EmbedStrategy for RawBytesEmbed {
    fn name(&self) -> &'static str {
        "raw-bytes"
    }

    fn prepare(&self, source: &ImageSource, decoded: &DecodedImage) -> Result<RawImage, String> {
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let raw = RawImage::decode_from_bytes(source.bytes(), &mut warnings)?;
        if !warnings.is_empty() {
            debug!(count = warnings.len(), name = source.name(), "printpdf reported decode warnings");
        }

        // A different size here means printpdf read the stream differently
        // (e.g. applied orientation); placing it would distort the image.
        if raw.width != decoded.width() as usize || raw.height != decoded.height() as usize {
            return Err(format!(
                "decoded as {}x{} but measured {}x{}",
                raw.width,
                raw.height,
                decoded.width(),
                decoded.height()
            ));
        }
        Ok(raw)
    }
}

/// Fallback strategy: build the image from the already-decoded pixels.
///
/// JPEG sources become RGB8. PNG sources keep their alpha channel as RGBA8
/// when they have one, otherwise RGB8.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodedPixelsEmbed;

impl EmbedStrategy for DecodedPixelsEmbed {
    fn name(&self) -> &'static str {
        "decoded-pixels"
    }

    fn prepare(&self, _source: &ImageSource, decoded: &DecodedImage) -> Result<RawImage, String> {
        let (width, height) = (decoded.width() as usize, decoded.height() as usize);
        if width == 0 || height == 0 {
            return Err("image has no pixels".into());
        }

        let (pixels, data_format) = if decoded.format() == ImageFormat::Png && decoded.has_alpha() {
            (decoded.as_dynamic().to_rgba8().into_raw(), RawImageFormat::RGBA8)
        } else {
            (decoded.as_dynamic().to_rgb8().into_raw(), RawImageFormat::RGB8)
        };

        Ok(RawImage {
            pixels: RawImageData::U8(pixels),
            width,
            height,
            data_format,
            tag: Vec::new(),
        })
    }
}
