// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution.

use std::path::PathBuf;

/// Return the application data directory, creating it if needed.
///
/// `PIC2PDF_HOME` wins when set; otherwise the XDG data directory is used.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("PIC2PDF_HOME") {
        Some(home) => PathBuf::from(home),
        None => base_dir().join("pic2pdf"),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn base_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
        return PathBuf::from(xdg);
    }
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".local").join("share");
    }
    std::env::temp_dir()
}
