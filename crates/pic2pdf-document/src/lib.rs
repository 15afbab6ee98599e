// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pic2pdf-document — Turns an ordered list of JPEG/PNG images into a PDF with
// one image per page.
//
// Provides decoding and measuring (`image`), fit-and-centre layout (`layout`),
// the two-tier embedding strategies and the composer itself (`pdf`), and
// fingerprinting of the finished bytes (`integrity`).

pub mod image;
pub mod integrity;
pub mod layout;
pub mod pdf;

// Re-export the primary structs so callers can use `pic2pdf_document::DocumentComposer` etc.
pub use crate::image::decoder::DecodedImage;
pub use crate::layout::place;
pub use crate::pdf::composer::DocumentComposer;
pub use crate::pdf::embed::{DecodedPixelsEmbed, EmbedStrategy, RawBytesEmbed};
pub use crate::pdf::reader::PdfReader;
