//! Output document assembly.
//!
//! Two variants feed the same output page list:
//! - raster embedding: an encoded page image becomes one output page sized
//!   and placed per a [`PagePlacement`]
//! - vector copy: selected pages of a source PDF are imported verbatim, with
//!   the whole object graph remapped past the output's id space, preserving
//!   original fidelity
//!
//! Page order always equals append order. Finalizing with zero pages is an
//! error; callers pre-flight their selections before processing begins.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, trace};

use crate::error::AssembleError;
use crate::transform::{EncodedPage, OutputFormat};

/// A4 page size in PDF points (width, height).
pub const A4_PORTRAIT: (f32, f32) = (595.28, 841.89);

/// Page attributes a PDF page may inherit from its page-tree ancestors.
/// Copied pages are cut loose from their original tree, so these must be
/// materialized onto the page dictionary itself.
const INHERITED_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Placement of an image on an output page, in PDF points.
#[derive(Debug, Clone, Copy)]
pub struct PagePlacement {
    pub page_width: f32,
    pub page_height: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PagePlacement {
    /// Page sized exactly to the image's pixel dimensions, with the image
    /// filling it edge to edge.
    pub fn full_bleed(width: u32, height: u32) -> Self {
        Self {
            page_width: width as f32,
            page_height: height as f32,
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Fit the image inside a fixed page, preserving aspect ratio, centered.
    pub fn fit_centered(
        image_width: u32,
        image_height: u32,
        page_width: f32,
        page_height: f32,
    ) -> Self {
        let ratio =
            (page_width / image_width as f32).min(page_height / image_height as f32);
        let width = image_width as f32 * ratio;
        let height = image_height as f32 * ratio;
        Self {
            page_width,
            page_height,
            x: (page_width - width) / 2.0,
            y: (page_height - height) / 2.0,
            width,
            height,
        }
    }
}

/// An output document that pages are appended to, then finalized into bytes.
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputDocument {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Raster-embedding variant: one output page sized to the image's pixel
    /// dimensions, with the image drawn to exactly fill it.
    pub fn append_rendered(&mut self, page: &EncodedPage) -> Result<(), AssembleError> {
        self.append_image_page(page, PagePlacement::full_bleed(page.width, page.height))
    }

    /// Embed an encoded image as one output page with explicit placement.
    pub fn append_image_page(
        &mut self,
        page: &EncodedPage,
        placement: PagePlacement,
    ) -> Result<(), AssembleError> {
        let stream = match page.format {
            OutputFormat::Jpeg => jpeg_xobject(&page.bytes, page.width, page.height),
            OutputFormat::Png => flate_xobject(&page.bytes)?,
        };
        let image_id = self.document.add_object(stream);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(placement.width),
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(placement.height),
                        Object::Real(placement.x),
                        Object::Real(placement.y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content
            .encode()
            .map_err(|e| AssembleError::ImageEmbed(format!("content encode failed: {e}")))?;
        let content_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), content_bytes));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(placement.page_width),
                Object::Real(placement.page_height),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
            "Contents" => content_id,
        });
        self.page_ids.push(page_id);
        trace!(
            "appended {}x{} image page as object {:?}",
            page.width,
            page.height,
            page_id
        );
        Ok(())
    }

    /// Vector-copy variant: import `indices` (1-indexed, order preserved,
    /// duplicates allowed) from a source PDF without rasterization.
    pub fn copy_pages(
        &mut self,
        source_bytes: &[u8],
        indices: &[u32],
    ) -> Result<(), AssembleError> {
        let source = Document::load_mem(source_bytes)
            .map_err(|e| AssembleError::PageCopy(format!("failed to load source: {e}")))?;
        let source_pages: BTreeMap<u32, ObjectId> = source.get_pages();
        let page_count = source_pages.len() as u32;

        for &index in indices {
            if index < 1 || index > page_count {
                return Err(AssembleError::PageCopy(format!(
                    "page {index} out of bounds (source has {page_count} pages)"
                )));
            }
        }

        // Attributes inherited through the source page tree must be pulled
        // down before the tree is discarded.
        let mut inherited: BTreeMap<u32, Vec<(Vec<u8>, Object)>> = BTreeMap::new();
        for &index in indices {
            inherited
                .entry(index)
                .or_insert_with(|| inherited_entries(&source, source_pages[&index]));
        }

        // Remap the whole source object graph past our current id space.
        let id_offset = self.document.max_id;
        let source_max_id = source.max_id;
        for (old_id, object) in source.objects.into_iter() {
            let new_id = (old_id.0 + id_offset, old_id.1);
            self.document
                .objects
                .insert(new_id, remap_object_refs(object, id_offset));
        }
        self.document.max_id = id_offset + source_max_id;

        // Pick the selected pages out of the imported graph, in selection order.
        for &index in indices {
            let old_ref = source_pages[&index];
            let new_ref = (old_ref.0 + id_offset, old_ref.1);
            if let Some(Object::Dictionary(dict)) = self.document.objects.get_mut(&new_ref) {
                dict.set("Parent", Object::Reference(self.pages_id));
                for (key, value) in &inherited[&index] {
                    dict.set(key.clone(), remap_object_refs(value.clone(), id_offset));
                }
            }
            self.page_ids.push(new_ref);
        }

        debug!(
            "copied {} pages (of {page_count}) from a {} byte source",
            indices.len(),
            source_bytes.len()
        );
        Ok(())
    }

    /// Serialize the assembled document.
    pub fn finalize(mut self) -> Result<Vec<u8>, AssembleError> {
        if self.page_ids.is_empty() {
            return Err(AssembleError::Empty);
        }

        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        let count = self.page_ids.len();
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count as i64,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        self.document.prune_objects();
        self.document.compress();

        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| AssembleError::Save(e.to_string()))?;
        debug!("finalized output document: {count} pages, {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Wrap already-encoded JPEG data as an image XObject (DCTDecode).
fn jpeg_xobject(bytes: &[u8], width: u32, height: u32) -> Stream {
    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8_i64,
        "Filter" => "DCTDecode",
    };
    Stream::new(dict, bytes.to_vec())
}

/// Decode PNG data and wrap the raw RGB samples as a FlateDecode image
/// XObject. Alpha is dropped; pages have no transparency to preserve.
fn flate_xobject(png_bytes: &[u8]) -> Result<Stream, AssembleError> {
    let decoded = image::load_from_memory(png_bytes)
        .map_err(|e| AssembleError::ImageEmbed(e.to_string()))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(rgb.as_raw())
        .map_err(|e| AssembleError::ImageEmbed(e.to_string()))?;
    let data = encoder
        .finish()
        .map_err(|e| AssembleError::ImageEmbed(e.to_string()))?;

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8_i64,
        "Filter" => "FlateDecode",
    };
    Ok(Stream::new(dict, data))
}

/// Recursively remap object references by `offset`.
fn remap_object_refs(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference(id) => Object::Reference((id.0 + offset, id.1)),
        Object::Array(array) => Object::Array(
            array
                .into_iter()
                .map(|o| remap_object_refs(o, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = remap_object_refs(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Resolve attributes the page inherits from its page-tree ancestors but
/// does not carry itself.
fn inherited_entries(source: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let mut found = Vec::new();
    let Ok(page_dict) = source.get_object(page_id).and_then(Object::as_dict) else {
        return found;
    };

    for key in INHERITED_KEYS {
        if page_dict.get(key).is_ok() {
            continue;
        }
        let mut current = parent_of(page_dict);
        while let Some(id) = current {
            let Ok(dict) = source.get_object(id).and_then(Object::as_dict) else {
                break;
            };
            if let Ok(value) = dict.get(key) {
                found.push((key.to_vec(), value.clone()));
                break;
            }
            current = parent_of(dict);
        }
    }
    found
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    dict.get(b"Parent").ok().and_then(|o| o.as_reference().ok())
}
