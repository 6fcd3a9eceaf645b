// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Diagraph.

use serde::{Deserialize, Serialize};

/// Encoding of an extracted image, as reported by its source.
///
/// Metadata only: decoding sniffs the actual format from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormatTag {
    Png,
    Jpeg,
    /// JPEG 2000 (PDF `JPXDecode`). Usually not decodable by the raster stack.
    Jpx,
    Tiff,
    Bmp,
    Gif,
    Webp,
    Unknown,
}

impl ImageFormatTag {
    /// Conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Jpx => "jpx",
            Self::Tiff => "tiff",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Unknown => "bin",
        }
    }

    /// Infer the format tag from a file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "jpx" | "jp2" => Self::Jpx,
            "tif" | "tiff" => Self::Tiff,
            "bmp" => Self::Bmp,
            "gif" => Self::Gif,
            "webp" => Self::Webp,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for ImageFormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// One encoded image handed over by a document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// Raw encoded bytes.
    pub data: Vec<u8>,
    /// Encoding reported by the source.
    pub format: ImageFormatTag,
    /// 0-based page the image was found on.
    pub page_index: u32,
    /// Position of the image in its batch. The count runs across pages, so
    /// the first image on page two follows the last one on page one.
    pub index: usize,
}

impl ExtractedImage {
    pub fn new(data: Vec<u8>, format: ImageFormatTag, page_index: u32, index: usize) -> Self {
        Self {
            data,
            format,
            page_index,
            index,
        }
    }
}

/// Plain text recovered from one document page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// 0-based page the text was found on.
    pub page_index: u32,
    pub text: String,
}
