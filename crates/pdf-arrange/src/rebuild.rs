//! Rebuilding a paginated document from an export plan.
//!
//! Pass-through slots copy the original page verbatim, content stream
//! included; merged groups become a single new page sized to the composite's
//! pixel dimensions with the raster embedded full bleed. Output page order
//! equals plan order, which is how reordering and merging both end up in the
//! final file.

use crate::export::{ExportPlan, UnitSource};
use crate::types::{ArrangeError, Result};
use image::RgbaImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

// =============================================================================
// Page Assembly
// =============================================================================

/// Builds an output document one page at a time, then assembles the page
/// tree and catalog.
pub struct PageAssembler {
    output: Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
    import_cache: HashMap<ObjectId, ObjectId>,
}

impl PageAssembler {
    pub fn new() -> Self {
        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();
        Self {
            output,
            pages_tree_id,
            page_refs: Vec::new(),
            import_cache: HashMap::new(),
        }
    }

    /// Copy a source page into the output, preserving its content stream and
    /// resources. Shared objects are imported once and reused across pages.
    pub fn copy_page(&mut self, source: &Document, page_id: ObjectId) -> Result<()> {
        let page_dict = source.get_dictionary(page_id)?;

        let mut copied = Dictionary::new();
        for (key, value) in page_dict.iter() {
            // The parent link must point into the output page tree, not drag
            // the whole source tree along.
            if key.as_slice() == b"Parent" {
                continue;
            }
            copied.set(
                key.clone(),
                import_object(&mut self.output, source, value, &mut self.import_cache)?,
            );
        }
        copied.set("Parent", Object::Reference(self.pages_tree_id));

        let new_id = self.output.add_object(copied);
        self.page_refs.push(Object::Reference(new_id));
        Ok(())
    }

    /// Append a page sized in points to the raster's pixel dimensions, with
    /// the raster embedded as a full-bleed DeviceRGB image.
    pub fn embed_raster_page(&mut self, raster: &RgbaImage) {
        let (width, height) = raster.dimensions();
        let rgb: Vec<u8> = raster
            .pixels()
            .flat_map(|px| [px.0[0], px.0[1], px.0[2]])
            .collect();

        let mut image_dict = Dictionary::new();
        image_dict.set("Type", Object::Name(b"XObject".to_vec()));
        image_dict.set("Subtype", Object::Name(b"Image".to_vec()));
        image_dict.set("Width", Object::Integer(i64::from(width)));
        image_dict.set("Height", Object::Integer(i64::from(height)));
        image_dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
        image_dict.set("BitsPerComponent", Object::Integer(8));
        let image_id = self.output.add_object(Stream::new(image_dict, rgb));

        let content = format!("q {width} 0 0 {height} 0 0 cm /Im0 Do Q");
        let content_id = self
            .output
            .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut xobjects = Dictionary::new();
        xobjects.set("Im0", Object::Reference(image_id));
        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        let page_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_tree_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(i64::from(width)),
                    Object::Integer(i64::from(height)),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]);
        let page_id = self.output.add_object(page_dict);
        self.page_refs.push(Object::Reference(page_id));
    }

    /// Finish the page tree and catalog and hand over the document.
    pub fn assemble(mut self) -> Document {
        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.output
            .objects
            .insert(self.pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = self.output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_tree_id)),
        ]));
        self.output.trailer.set("Root", catalog_id);
        self.output.compress();
        self.output
    }
}

impl Default for PageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object graph from source to output, following references.
///
/// New ids are reserved in the cache before recursing so reference cycles
/// (page to annotation and back) terminate instead of recursing forever.
fn import_object(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let referenced = source.get_object(*id)?;
            let copied = import_object(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                new_dict.set(key.clone(), import_object(output, source, value, cache)?);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| import_object(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                new_dict.set(key.clone(), import_object(output, source, value, cache)?);
            }
            Ok(Object::Stream(Stream {
                dict: new_dict,
                content: stream.content.clone(),
                allows_compression: stream.allows_compression,
                start_position: None,
            }))
        }
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

// =============================================================================
// Reconstruction Driver
// =============================================================================

/// Rebuild a paginated document from `source` following `plan`, returning
/// the serialized bytes.
pub fn reconstruct(source: &Document, plan: &ExportPlan) -> Result<Vec<u8>> {
    let page_ids: Vec<ObjectId> = source.get_pages().values().copied().collect();

    let mut assembler = PageAssembler::new();
    for unit in &plan.units {
        match unit.source {
            UnitSource::Original(original_index) => {
                let page_id = page_ids
                    .get(original_index)
                    .copied()
                    .ok_or(ArrangeError::PageOutOfRange(original_index))?;
                assembler.copy_page(source, page_id)?;
            }
            UnitSource::Composite(_) => assembler.embed_raster_page(&unit.raster),
        }
    }

    let mut output = assembler.assemble();
    let mut bytes = Vec::new();
    output.save_to(&mut bytes)?;
    Ok(bytes)
}
