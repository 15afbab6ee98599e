// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — composing image documents and reading them back.

pub mod composer;
pub mod embed;
pub mod reader;

pub use composer::DocumentComposer;
pub use embed::{DecodedPixelsEmbed, EmbedStrategy, RawBytesEmbed};
pub use reader::PdfReader;
