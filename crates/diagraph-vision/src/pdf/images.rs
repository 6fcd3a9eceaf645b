// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF extraction — pulls embedded image XObjects and plain page text out of
// each page using the `lopdf` crate.

use std::io::Cursor;
use std::path::Path;

use diagraph_core::error::{DiagraphError, Result};
use diagraph_core::types::{ExtractedImage, ImageFormatTag, PageText};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, instrument};

/// Page trees deeper than this are treated as malformed when looking up
/// inherited resources.
const MAX_PARENT_DEPTH: usize = 32;

/// Extracts embedded raster images and page text from a PDF.
///
/// JPEG and JPEG 2000 streams are handed back as-is. Uncompressed or
/// Flate-compressed 8-bit grayscale and RGB samples are re-encoded as PNG.
/// Anything else is skipped; one unreadable image never fails the document.
pub struct PdfImageExtractor {
    document: Document,
}

impl PdfImageExtractor {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = Document::load(path).map_err(|err| {
            DiagraphError::PdfError(format!("failed to open {}: {}", path.display(), err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            DiagraphError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;
        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Every decodable image on every page, in page order. `index` counts
    /// across the whole document.
    #[instrument(skip_all)]
    pub fn extract_images(&self) -> Vec<ExtractedImage> {
        let mut images = Vec::new();

        // lopdf page numbers are 1-based.
        for (page_number, page_id) in self.document.get_pages() {
            let page_index = page_number.saturating_sub(1);
            let Some(xobjects) = self.page_xobjects(page_id) else {
                continue;
            };

            for (name, object) in xobjects.iter() {
                let Some(stream) = self.resolve(object).and_then(|o| o.as_stream().ok()) else {
                    continue;
                };
                if !is_image(stream) {
                    continue;
                }

                match decode_image_stream(&self.document, stream) {
                    Ok((data, format)) => {
                        let index = images.len();
                        images.push(ExtractedImage::new(data, format, page_index, index));
                    }
                    Err(err) => {
                        debug!(
                            page = page_number,
                            name = %String::from_utf8_lossy(name),
                            error = %err,
                            "Skipping image"
                        );
                    }
                }
            }
        }

        info!(
            pages = self.page_count(),
            images = images.len(),
            "PDF images extracted"
        );
        images
    }

    /// Text of every page that carries any, in page order. Pages whose
    /// content cannot be decoded are skipped like unreadable images.
    #[instrument(skip_all)]
    pub fn extract_text(&self) -> Vec<PageText> {
        let mut pages = Vec::new();

        for page_number in self.document.get_pages().into_keys() {
            match self.document.extract_text(&[page_number]) {
                Ok(text) if !text.trim().is_empty() => pages.push(PageText {
                    page_index: page_number.saturating_sub(1),
                    text,
                }),
                Ok(_) => {}
                Err(err) => {
                    debug!(page = page_number, error = %err, "Skipping page text");
                }
            }
        }

        info!(
            pages = self.page_count(),
            with_text = pages.len(),
            "PDF text extracted"
        );
        pages
    }

    /// The page's `/XObject` dictionary, looking through `/Parent` for
    /// inherited `/Resources`.
    fn page_xobjects(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let resources = self.page_resources(page_id)?;
        let xobjects = resources.get(b"XObject").ok()?;
        self.resolve(xobjects)?.as_dict().ok()
    }

    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.document.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_PARENT_DEPTH {
            if let Some(resources) = node
                .get(b"Resources")
                .ok()
                .and_then(|o| self.resolve(o))
                .and_then(|o| o.as_dict().ok())
            {
                return Some(resources);
            }
            let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
            node = self.document.get_dictionary(parent).ok()?;
        }
        None
    }

    fn resolve<'a>(&'a self, object: &'a Object) -> Option<&'a Object> {
        resolve(&self.document, object)
    }
}

fn resolve<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}

fn is_image(stream: &Stream) -> bool {
    matches!(stream.dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Image"))
}

/// Filter names in decoding order. A missing `/Filter` is an empty list.
fn filters(dict: &Dictionary) -> Vec<&[u8]> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.as_slice()],
        Ok(Object::Array(names)) => names.iter().filter_map(|o| o.as_name().ok()).collect(),
        _ => Vec::new(),
    }
}

fn decode_image_stream(
    document: &Document,
    stream: &Stream,
) -> Result<(Vec<u8>, ImageFormatTag)> {
    let filters = filters(&stream.dict);
    match filters.as_slice() {
        [] => encode_samples(document, &stream.dict, &stream.content),
        [filter] => match *filter {
            b"DCTDecode" => Ok((stream.content.clone(), ImageFormatTag::Jpeg)),
            b"JPXDecode" => Ok((stream.content.clone(), ImageFormatTag::Jpx)),
            b"FlateDecode" => {
                let samples = stream.decompressed_content().map_err(|err| {
                    DiagraphError::PdfError(format!("failed to inflate image stream: {}", err))
                })?;
                encode_samples(document, &stream.dict, &samples)
            }
            other => Err(DiagraphError::PdfError(format!(
                "unsupported image filter /{}",
                String::from_utf8_lossy(other)
            ))),
        },
        _ => Err(DiagraphError::PdfError(format!(
            "unsupported filter chain of {} filters",
            filters.len()
        ))),
    }
}

/// Wrap raw 8-bit samples in an image buffer and encode them as PNG.
fn encode_samples(
    document: &Document,
    dict: &Dictionary,
    samples: &[u8],
) -> Result<(Vec<u8>, ImageFormatTag)> {
    let width = dimension(dict, b"Width")?;
    let height = dimension(dict, b"Height")?;

    let bits = dict
        .get(b"BitsPerComponent")
        .and_then(Object::as_i64)
        .unwrap_or(8);
    if bits != 8 {
        return Err(DiagraphError::PdfError(format!(
            "unsupported bit depth {}",
            bits
        )));
    }

    let channels = color_components(document, dict)?;
    let expected = width as usize * height as usize * channels;
    if samples.len() < expected {
        return Err(DiagraphError::PdfError(format!(
            "image stream holds {} bytes, {}x{}x{} needs {}",
            samples.len(),
            width,
            height,
            channels,
            expected
        )));
    }
    let samples = samples[..expected].to_vec();

    let image = match channels {
        1 => GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8),
        _ => RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8),
    }
    .ok_or_else(|| DiagraphError::PdfError("sample buffer does not fit image".to_string()))?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|err| DiagraphError::PdfError(format!("PNG re-encoding failed: {}", err)))?;
    Ok((png, ImageFormatTag::Png))
}

fn dimension(dict: &Dictionary, key: &[u8]) -> Result<u32> {
    dict.get(key)
        .and_then(Object::as_i64)
        .ok()
        .and_then(|value| u32::try_from(value).ok())
        .filter(|&value| value > 0)
        .ok_or_else(|| {
            DiagraphError::PdfError(format!(
                "image has no valid /{}",
                String::from_utf8_lossy(key)
            ))
        })
}

/// 1 for gray, 3 for RGB. ICC-based spaces report `/N` on their profile.
fn color_components(document: &Document, dict: &Dictionary) -> Result<usize> {
    let space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| resolve(document, o))
        .ok_or_else(|| DiagraphError::PdfError("image has no /ColorSpace".to_string()))?;

    let components = match space {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"CalGray" => Some(1),
            b"DeviceRGB" | b"CalRGB" => Some(3),
            _ => None,
        },
        Object::Array(parts) => match parts.first().and_then(|o| o.as_name().ok()) {
            Some(b"ICCBased") => parts
                .get(1)
                .and_then(|o| resolve(document, o))
                .and_then(|o| o.as_stream().ok())
                .and_then(|profile| profile.dict.get(b"N").and_then(Object::as_i64).ok())
                .and_then(|n| usize::try_from(n).ok()),
            Some(b"CalGray") => Some(1),
            Some(b"CalRGB") => Some(3),
            _ => None,
        },
        _ => None,
    };

    match components {
        Some(n @ (1 | 3)) => Ok(n),
        _ => Err(DiagraphError::PdfError(
            "unsupported image colour space".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::dictionary;

    fn image_stream(
        filter: Option<&str>,
        color_space: &str,
        w: i64,
        h: i64,
        data: Vec<u8>,
    ) -> Stream {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => w,
            "Height" => h,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
        };
        if let Some(filter) = filter {
            dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
        }
        Stream::new(dict, data)
    }

    /// Two pages sharing a `/Pages` node. Page one inherits its resources from
    /// the node; page two carries its own.
    fn two_page_pdf(inherited: Vec<Stream>, own: Vec<Stream>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let xobjects = |doc: &mut Document, streams: Vec<Stream>| {
            let mut dict = Dictionary::new();
            for (i, stream) in streams.into_iter().enumerate() {
                let id = doc.add_object(stream);
                dict.set(format!("Im{}", i), Object::Reference(id));
            }
            dictionary! { "XObject" => dict }
        };

        let shared = xobjects(&mut doc, inherited);
        let local = xobjects(&mut doc, own);

        let first = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        });
        let second = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Resources" => local,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![first.into(), second.into()],
                "Count" => 2,
                "Resources" => shared,
            }),
        );
        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn jpeg_bytes() -> Vec<u8> {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, image::Luma([90])));
        let mut out = Vec::new();
        gray.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg).unwrap();
        out
    }

    #[test]
    fn raw_and_jpeg_images_are_extracted_with_pages() {
        let samples = vec![0, 50, 100, 150, 200, 250, 255, 0];
        let raw_gray = image_stream(None, "DeviceGray", 4, 2, samples);
        let jpeg = jpeg_bytes();
        let dct = image_stream(Some("DCTDecode"), "DeviceGray", 8, 8, jpeg.clone());

        let pdf = two_page_pdf(vec![raw_gray], vec![dct]);
        let extractor = PdfImageExtractor::from_bytes(&pdf).unwrap();
        assert_eq!(extractor.page_count(), 2);

        let images = extractor.extract_images();
        assert_eq!(images.len(), 2);

        assert_eq!(images[0].page_index, 0);
        assert_eq!(images[0].index, 0);
        assert_eq!(images[0].format, ImageFormatTag::Png);
        let decoded = image::load_from_memory(&images[0].data).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (4, 2));
        assert_eq!(decoded.get_pixel(1, 0).0, [50]);
        assert_eq!(decoded.get_pixel(3, 1).0, [0]);

        assert_eq!(images[1].page_index, 1);
        assert_eq!(images[1].index, 1);
        assert_eq!(images[1].format, ImageFormatTag::Jpeg);
        assert_eq!(images[1].data, jpeg);
    }

    #[test]
    fn rgb_samples_are_reencoded() {
        let rgb = image_stream(None, "DeviceRGB", 2, 1, vec![255, 0, 0, 0, 0, 255]);
        let pdf = two_page_pdf(Vec::new(), vec![rgb]);
        let images = PdfImageExtractor::from_bytes(&pdf).unwrap().extract_images();

        assert_eq!(images.len(), 1);
        let decoded = image::load_from_memory(&images[0].data).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255]);
    }

    #[test]
    fn unsupported_images_are_skipped_not_fatal() {
        let ccitt = image_stream(Some("CCITTFaxDecode"), "DeviceGray", 4, 4, vec![0; 4]);
        let short = image_stream(None, "DeviceGray", 10, 10, vec![0; 3]);
        let cmyk = image_stream(None, "DeviceCMYK", 1, 1, vec![0; 4]);
        let good = image_stream(None, "DeviceGray", 1, 1, vec![7]);

        let pdf = two_page_pdf(vec![ccitt, short, cmyk], vec![good]);
        let images = PdfImageExtractor::from_bytes(&pdf).unwrap().extract_images();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].page_index, 1);
        assert_eq!(images[0].index, 0);
    }

    #[test]
    fn non_image_xobjects_are_ignored() {
        let form = Stream::new(dictionary! { "Subtype" => "Form" }, b"q Q".to_vec());
        let pdf = two_page_pdf(vec![form], Vec::new());
        let extractor = PdfImageExtractor::from_bytes(&pdf).unwrap();
        assert!(extractor.extract_images().is_empty());
    }

    /// One page per entry, each drawing its string in Courier.
    fn text_pdf(texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });

        let mut kids = Vec::new();
        for text in texts {
            let mut operations = vec![Operation::new("BT", vec![])];
            if !text.is_empty() {
                operations.extend([
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                ]);
            }
            operations.push(Operation::new("ET", vec![]));

            let content = Content { operations }.encode().unwrap();
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn page_text_is_extracted_and_blank_pages_skipped() {
        let pdf = text_pdf(&["Figure 1: pipeline", "", "Table 2: results"]);
        let pages = PdfImageExtractor::from_bytes(&pdf).unwrap().extract_text();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_index, 0);
        assert_eq!(pages[0].text.trim(), "Figure 1: pipeline");
        assert_eq!(pages[1].page_index, 2);
        assert_eq!(pages[1].text.trim(), "Table 2: results");
    }

    #[test]
    fn image_only_pages_have_no_text() {
        let gray = image_stream(None, "DeviceGray", 1, 1, vec![7]);
        let pdf = two_page_pdf(vec![gray], Vec::new());
        assert!(PdfImageExtractor::from_bytes(&pdf).unwrap().extract_text().is_empty());
    }

    #[test]
    fn garbage_is_a_pdf_error() {
        let err = PdfImageExtractor::from_bytes(b"not a pdf").err().unwrap();
        assert!(matches!(err, DiagraphError::PdfError(_)));
        assert!(PdfImageExtractor::open("/nonexistent/file.pdf").is_err());
    }
}
