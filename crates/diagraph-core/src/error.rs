// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Diagraph.

use thiserror::Error;

/// Top-level error type for all Diagraph operations.
#[derive(Debug, Error)]
pub enum DiagraphError {
    // -- Image errors --
    /// The input bytes could not be interpreted as a raster. Fatal to that
    /// single image; callers skip it and keep going.
    #[error("image decoding failed: {0}")]
    Decode(String),

    /// A geometric or numeric step could not run on the given raster.
    #[error("image analysis failed: {0}")]
    Analysis(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Config(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DiagraphError {
    /// True for errors raised while decoding input bytes.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DiagraphError>;
