// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image decoder — turn a selected JPEG/PNG into pixels and measure it.
//
// The declared format is trusted: bytes are decoded with that format's codec
// only, never sniffed. A PNG mislabelled as JPEG fails here as a decode error.

use image::{DynamicImage, ImageFormat as CodecFormat};
use pic2pdf_core::error::{Pic2PdfError, Result};
use pic2pdf_core::{ImageFormat, ImageSource};
use tracing::{debug, instrument};

/// A decoded image together with the format it was declared as.
///
/// The pixel buffer is what the fallback embedding strategy works from.
pub struct DecodedImage {
    image: DynamicImage,
    format: ImageFormat,
}

impl DecodedImage {
    /// Decode a selected image with its declared codec.
    #[instrument(skip_all, fields(name = source.name(), format = %source.format(), bytes_len = source.len()))]
    pub fn from_source(source: &ImageSource) -> Result<Self> {
        let image = image::load_from_memory_with_format(source.bytes(), codec_for(source.format()))
            .map_err(|err| Pic2PdfError::Decode {
                name: source.name().to_owned(),
                reason: err.to_string(),
            })?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded"
        );
        Ok(Self {
            image,
            format: source.format(),
        })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage, format: ImageFormat) -> Self {
        Self { image, format }
    }

    /// Intrinsic width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Intrinsic height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Whether the pixels carry an alpha channel worth keeping.
    pub fn has_alpha(&self) -> bool {
        self.format == ImageFormat::Png && self.image.color().has_alpha()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }
}

fn codec_for(format: ImageFormat) -> CodecFormat {
    match format {
        ImageFormat::Jpeg => CodecFormat::Jpeg,
        ImageFormat::Png => CodecFormat::Png,
    }
}
