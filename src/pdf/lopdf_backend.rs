//! lopdf-backed document implementation

use std::collections::BTreeSet;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::png::decode_png;
use super::traits::{EmbeddedImage, PdfBackend, SignableDocument};
use crate::placement::{PageGeometry, PlacementError, ResolvedPlacement, Result};

/// US Letter, used when neither the page nor its ancestors declare a MediaBox
const FALLBACK_PAGE_SIZE: PageGeometry = PageGeometry {
    width: 612.0,
    height: 792.0,
};

const XOBJECT_PREFIX: &str = "SigImg";

#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;

    fn load(&self, bytes: &[u8]) -> Result<LopdfDocument> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| PlacementError::DocumentLoad(e.to_string()))?;

        if doc.trailer.get(b"Encrypt").is_ok() {
            return Err(PlacementError::DocumentLoad(
                "encrypted PDFs are not supported".to_string(),
            ));
        }

        let pages = doc.get_pages().into_values().collect();
        Ok(LopdfDocument {
            doc,
            pages,
            images: Vec::new(),
        })
    }
}

/// A parsed PDF plus the image XObjects embedded during this call
pub struct LopdfDocument {
    doc: Document,
    pages: Vec<ObjectId>,
    images: Vec<ObjectId>,
}

impl LopdfDocument {
    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.pages
            .get(index)
            .copied()
            .ok_or_else(|| malformed(index, "page index out of range"))
    }

    fn page_dict(&self, index: usize, page_id: ObjectId) -> Result<&Dictionary> {
        self.doc
            .get_dictionary(page_id)
            .map_err(|e| malformed(index, e))
    }

    /// Resolve a direct or referenced dictionary into an owned copy
    fn resolve_dict(&self, obj: &Object) -> Option<Dictionary> {
        match obj {
            Object::Dictionary(dict) => Some(dict.clone()),
            Object::Reference(id) => self.doc.get_dictionary(*id).ok().cloned(),
            _ => None,
        }
    }

    /// Walk the page tree upwards until an attribute is found
    fn inherited(&self, index: usize, key: &[u8]) -> Result<Option<Object>> {
        let mut visited = BTreeSet::new();
        let mut current = Some(self.page_id(index)?);
        while let Some(id) = current {
            if !visited.insert(id) {
                return Err(malformed(index, "cyclic page tree"));
            }
            let dict = self.doc.get_dictionary(id).map_err(|e| malformed(index, e))?;
            if let Ok(value) = dict.get(key) {
                return Ok(Some(value.clone()));
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }
        Ok(None)
    }

    fn media_box(&self, index: usize) -> Result<Option<PageGeometry>> {
        let Some(raw) = self.inherited(index, b"MediaBox")? else {
            return Ok(None);
        };
        let resolved = match raw {
            Object::Reference(id) => self
                .doc
                .get_object(id)
                .map_err(|e| malformed(index, e))?
                .clone(),
            other => other,
        };
        let Ok(corners) = resolved.as_array() else {
            return Ok(None);
        };
        if corners.len() != 4 {
            return Ok(None);
        }

        let values: Option<Vec<f64>> = corners.iter().map(number).collect();
        Ok(values.map(|v| PageGeometry {
            width: (v[2] - v[0]).abs(),
            height: (v[3] - v[1]).abs(),
        }))
    }

    /// Content stream references of a page, flattened into a list
    fn content_refs(&self, index: usize, page_id: ObjectId) -> Result<Vec<Object>> {
        let page = self.page_dict(index, page_id)?;
        let refs = match page.get(b"Contents") {
            Ok(Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(Object::Array(items)) => items.clone(),
                _ => vec![Object::Reference(*id)],
            },
            Ok(Object::Array(items)) => items.clone(),
            Ok(_) => return Err(malformed(index, "unsupported /Contents entry")),
            Err(_) => Vec::new(),
        };
        Ok(refs)
    }
}

impl SignableDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> Result<PageGeometry> {
        match self.media_box(index)? {
            Some(geometry) => Ok(geometry),
            None => {
                tracing::debug!(index, "Page has no usable MediaBox, assuming US Letter");
                Ok(FALLBACK_PAGE_SIZE)
            }
        }
    }

    fn embed_png(&mut self, bytes: &[u8]) -> Result<EmbeddedImage> {
        let png = decode_png(bytes)?;

        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => png.width as i64,
            "Height" => png.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };

        if let Some(alpha) = png.alpha {
            let smask = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => png.width as i64,
                "Height" => png.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            };
            let smask_id = self.doc.add_object(compressed(smask, alpha));
            image_dict.set("SMask", smask_id);
        }

        let image_id = self.doc.add_object(compressed(image_dict, png.rgb));
        self.images.push(image_id);

        Ok(EmbeddedImage {
            handle: self.images.len() - 1,
            pixel_width: png.width,
            pixel_height: png.height,
        })
    }

    fn draw_image(
        &mut self,
        index: usize,
        image: &EmbeddedImage,
        rect: ResolvedPlacement,
    ) -> Result<()> {
        let page_id = self.page_id(index)?;
        let image_id = *self
            .images
            .get(image.handle)
            .ok_or_else(|| PlacementError::ImageEmbed("unknown image handle".to_string()))?;

        // Copy resources onto the page itself so shared or inherited
        // dictionaries used by other pages stay untouched
        let mut resources = match self.inherited(index, b"Resources")? {
            Some(obj) => self
                .resolve_dict(&obj)
                .ok_or_else(|| malformed(index, "unsupported /Resources entry"))?,
            None => Dictionary::new(),
        };
        let mut xobjects = match resources.get(b"XObject") {
            Ok(obj) => self
                .resolve_dict(obj)
                .ok_or_else(|| malformed(index, "unsupported /XObject entry"))?,
            Err(_) => Dictionary::new(),
        };

        let name = unused_xobject_name(&xobjects);
        xobjects.set(name.clone(), Object::Reference(image_id));
        resources.set("XObject", Object::Dictionary(xobjects));

        // Isolate the existing content in its own graphics state so a leftover
        // transform cannot shift the stamp
        let mut contents = vec![Object::Reference(
            self.doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec())),
        )];
        contents.extend(self.content_refs(index, page_id)?);
        let stamp = format!(
            "\nQ\nq\n{:.4} 0 0 {:.4} {:.4} {:.4} cm\n/{} Do\nQ\n",
            rect.width, rect.height, rect.x, rect.y, name
        );
        contents.push(Object::Reference(
            self.doc
                .add_object(Stream::new(dictionary! {}, stamp.into_bytes())),
        ));

        let page = self
            .doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| malformed(index, e))?;
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Array(contents));

        Ok(())
    }

    fn serialize(mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| PlacementError::Serialize(e.to_string()))?;
        Ok(buffer)
    }
}

fn malformed(index: usize, reason: impl ToString) -> PlacementError {
    PlacementError::MalformedPage {
        index,
        reason: reason.to_string(),
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(f64::from(*f)),
        _ => None,
    }
}

fn compressed(dict: Dictionary, content: Vec<u8>) -> Stream {
    let mut stream = Stream::new(dict, content);
    if let Err(e) = stream.compress() {
        tracing::debug!("Keeping image stream uncompressed: {}", e);
    }
    stream
}

/// First `SigImgN` name not already used by the page's XObjects
fn unused_xobject_name(xobjects: &Dictionary) -> String {
    (1..)
        .map(|n| format!("{XOBJECT_PREFIX}{n}"))
        .find(|candidate| !xobjects.has(candidate.as_bytes()))
        .unwrap_or_else(|| XOBJECT_PREFIX.to_string())
}
