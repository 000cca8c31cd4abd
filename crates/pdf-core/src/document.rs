//! PDF Document wrapper

use crate::image::{generate_image_operators, ImageXObject};
use crate::{mm_to_pt, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Page size in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// ISO A4 portrait (595.28 x 841.89 points)
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// Create a page size from millimetres
    pub fn from_mm(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width: mm_to_pt(width_mm),
            height: mm_to_pt(height_mm),
        }
    }
}

/// Document information dictionary entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
}

/// Encode a PDF text string
///
/// ASCII stays a literal string; anything else is written as UTF-16BE with
/// a byte order mark so viewers do not read it as PDFDocEncoding.
pub(crate) fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// PDF Document wrapper providing high-level operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Embedded images (data hash -> PDF object ID)
    embedded_images: HashMap<u64, ObjectId>,
    /// Page image resources (page number -> image name -> object ID)
    page_image_resources: HashMap<usize, HashMap<String, ObjectId>>,
    /// Next image resource number
    next_image_resource: u32,
    /// Buffered content operators per page (page number -> operators)
    page_content_buffer: HashMap<usize, Vec<u8>>,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// Create an empty document with no pages
    ///
    /// # Example
    /// ```ignore
    /// let mut doc = PdfDocument::new();
    /// let page = doc.add_page(PageSize::A4)?;
    /// ```
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.add_object(dictionary! {
            "Type" => "Pages",
            "Count" => 0,
            "Kids" => Vec::<Object>::new(),
        });
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self {
            inner,
            embedded_images: HashMap::new(),
            page_image_resources: HashMap::new(),
            next_image_resource: 1,
            page_content_buffer: HashMap::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Get the size of a page in points
    ///
    /// # Arguments
    /// * `page` - Page number (1-indexed)
    pub fn page_size(&self, page: usize) -> Result<PageSize> {
        let page_dict = self.page_dict(self.page_id(page)?)?;
        let media_box = page_dict
            .get(b"MediaBox")
            .and_then(Object::as_array)
            .map_err(|_| PdfError::ParseError("Page missing MediaBox".to_string()))?;

        let coord = |index: usize| -> Result<f64> {
            media_box
                .get(index)
                .and_then(|value| value.as_float().ok())
                .map(f64::from)
                .ok_or_else(|| PdfError::ParseError(format!("Invalid MediaBox entry {index}")))
        };

        Ok(PageSize {
            width: coord(2)? - coord(0)?,
            height: coord(3)? - coord(1)?,
        })
    }

    /// Append a blank page of the given size
    ///
    /// # Returns
    /// New page number (1-indexed)
    ///
    /// # Example
    /// ```ignore
    /// let mut doc = PdfDocument::new();
    /// assert_eq!(doc.add_page(PageSize::A4)?, 1);
    /// assert_eq!(doc.page_count(), 1);
    /// ```
    pub fn add_page(&mut self, size: PageSize) -> Result<usize> {
        if !(size.width > 0.0 && size.height > 0.0) {
            return Err(PdfError::InvalidPageSize(size.width, size.height));
        }

        let pages_id = self.pages_root_id()?;
        let page_count = self.page_count();

        let contents_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), Vec::new()));

        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::from(size.width),
                Object::from(size.height),
            ],
            "Resources" => Dictionary::new(),
            "Contents" => contents_id,
        };
        let new_page_id = self.inner.add_object(page_dict);

        let mut pages_dict = self.page_dict(pages_id)?;
        let mut kids_array = pages_dict
            .get(b"Kids")
            .and_then(Object::as_array)
            .map_err(|_| PdfError::ParseError("Pages object missing Kids array".to_string()))?
            .clone();
        kids_array.push(Object::Reference(new_page_id));

        let current_count = pages_dict
            .get(b"Count")
            .and_then(Object::as_i64)
            .map_err(|_| PdfError::ParseError("Pages object missing Count".to_string()))?;

        pages_dict.set(b"Kids", Object::Array(kids_array));
        pages_dict.set(b"Count", Object::Integer(current_count + 1));
        self.inner.objects.insert(pages_id, pages_dict.into());

        Ok(page_count + 1)
    }

    /// Set the document information dictionary
    pub fn set_info(&mut self, info: &DocumentInfo) {
        let mut dict = Dictionary::new();
        if let Some(title) = &info.title {
            dict.set("Title", text_string(title));
        }
        if let Some(author) = &info.author {
            dict.set("Author", text_string(author));
        }
        if let Some(creator) = &info.creator {
            dict.set("Creator", text_string(creator));
        }

        let info_id = self.inner.add_object(dict);
        self.inner.trailer.set("Info", info_id);
    }

    /// Draw an image XObject into a box on a page
    ///
    /// Identical images are embedded once and shared between placements.
    ///
    /// # Arguments
    /// * `xobject` - Prepared image
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `width` - Drawn width in points
    /// * `height` - Drawn height in points
    pub fn insert_xobject(
        &mut self,
        xobject: ImageXObject,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }
        if xobject.width == 0 || xobject.height == 0 {
            return Err(PdfError::ImageError("Image has zero size".to_string()));
        }

        let image_resource_name = self.get_or_create_image_ref(xobject, page)?;

        // Convert Y coordinate from top-origin to PDF bottom-origin
        let page_height = self.page_size(page)?.height;
        let pdf_y = page_height - y - height;

        let operators = generate_image_operators(&image_resource_name, x, pdf_y, width, height);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush_content_buffers()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    /// Owned copy of a dictionary object
    fn page_dict(&self, id: ObjectId) -> Result<Dictionary> {
        self.inner
            .get_object(id)?
            .as_dict()
            .cloned()
            .map_err(|_| PdfError::ParseError(format!("Object {id:?} is not a dictionary")))
    }

    /// Resolve the root Pages node through the catalog
    fn pages_root_id(&self) -> Result<ObjectId> {
        let catalog_id = self
            .inner
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|_| PdfError::ParseError("Document trailer missing Root entry".to_string()))?;
        let catalog = self.page_dict(catalog_id)?;
        catalog
            .get(b"Pages")
            .and_then(Object::as_reference)
            .map_err(|_| PdfError::ParseError("Catalog missing Pages entry".to_string()))
    }

    /// Get or create an image reference for a specific page
    ///
    /// Returns the resource name (e.g., "Im1", "Im2").
    /// Images are deduplicated by hash of their data.
    fn get_or_create_image_ref(&mut self, xobject: ImageXObject, page: usize) -> Result<String> {
        let mut hasher = DefaultHasher::new();
        xobject.width.hash(&mut hasher);
        xobject.height.hash(&mut hasher);
        xobject.data.hash(&mut hasher);
        let data_hash = hasher.finish();

        let object_id = match self.embedded_images.get(&data_hash) {
            Some(id) => *id,
            None => {
                let id = self.inner.add_object(xobject.to_pdf_stream());
                self.embedded_images.insert(data_hash, id);
                id
            }
        };

        let page_resources = self.page_image_resources.entry(page).or_default();
        if let Some((name, _)) = page_resources.iter().find(|(_, id)| **id == object_id) {
            return Ok(name.clone());
        }

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.insert(resource_name.clone(), object_id);

        self.add_image_to_page_resources(page, &resource_name, object_id)?;

        Ok(resource_name)
    }

    /// Add image to a specific page's Resources dictionary
    fn add_image_to_page_resources(
        &mut self,
        page: usize,
        resource_name: &str,
        object_id: ObjectId,
    ) -> Result<()> {
        let page_id = self.page_id(page)?;
        let mut page_dict = self.page_dict(page_id)?;

        let mut resources = page_dict
            .get(b"Resources")
            .and_then(Object::as_dict)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new());

        let mut xobjects = resources
            .get(b"XObject")
            .and_then(Object::as_dict)
            .cloned()
            .unwrap_or_else(|_| Dictionary::new());
        xobjects.set(resource_name.as_bytes(), Object::Reference(object_id));
        resources.set(b"XObject", Object::Dictionary(xobjects));

        page_dict.set(b"Resources", Object::Dictionary(resources));
        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush all buffered content to page streams
    ///
    /// Called from to_bytes. Appends the buffered operators of each page to
    /// its content stream.
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> = self.page_content_buffer.drain().collect();

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append content to a page's content stream
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page_id(page)?;
        let mut page_dict = self.page_dict(page_id)?;

        let mut new_content = match page_dict.get(b"Contents") {
            Ok(Object::Reference(ref_id)) => match self.inner.get_object(*ref_id) {
                Ok(Object::Stream(stream)) => stream.content.clone(),
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        new_content.extend_from_slice(content);

        let stream_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), new_content));

        page_dict.set(b"Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_bitmap(width: u32, height: u32) -> ImageXObject {
        let bitmap = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        ImageXObject::from_rgba(&bitmap, [255, 255, 255]).unwrap()
    }

    #[test]
    fn test_new_document_has_no_pages() {
        let doc = PdfDocument::new();
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_add_page() {
        let mut doc = PdfDocument::new();
        assert_eq!(doc.add_page(PageSize::A4).unwrap(), 1);
        assert_eq!(doc.add_page(PageSize::from_mm(100.0, 50.0)).unwrap(), 2);
        assert_eq!(doc.page_count(), 2);

        let size = doc.page_size(1).unwrap();
        assert!((size.width - 595.28).abs() < 0.01);
        assert!((size.height - 841.89).abs() < 0.01);
    }

    #[test]
    fn test_add_page_rejects_empty_size() {
        let mut doc = PdfDocument::new();
        let result = doc.add_page(PageSize {
            width: 0.0,
            height: 100.0,
        });
        assert!(matches!(result, Err(PdfError::InvalidPageSize(..))));
    }

    #[test]
    fn test_page_size_from_mm() {
        let a4 = PageSize::from_mm(210.0, 297.0);
        assert!((a4.width - PageSize::A4.width).abs() < 0.01);
        assert!((a4.height - PageSize::A4.height).abs() < 0.01);
    }

    #[test]
    fn test_insert_xobject_invalid_page() {
        let mut doc = PdfDocument::new();
        let result = doc.insert_xobject(test_bitmap(2, 2), 1, 0.0, 0.0, 10.0, 10.0);
        assert!(matches!(result, Err(PdfError::InvalidPage(1, 0))));
    }

    #[test]
    fn test_insert_xobject_flips_y() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page(PageSize::A4).unwrap();
        doc.insert_xobject(test_bitmap(2, 1), page, 10.0, 20.0, 400.0, 200.0)
            .unwrap();

        let ops = String::from_utf8(doc.page_content_buffer[&page].clone()).unwrap();
        let expected_y = doc.page_size(page).unwrap().height - 20.0 - 200.0;
        assert!(ops.contains(&format!("400 0 0 200 10 {expected_y} cm")));
    }

    #[test]
    fn test_same_image_embedded_once() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page(PageSize::A4).unwrap();

        for y in [0.0, 100.0] {
            doc.insert_xobject(test_bitmap(4, 4), page, 0.0, y, 20.0, 20.0)
                .unwrap();
        }

        assert_eq!(doc.embedded_images.len(), 1);
        assert_eq!(doc.page_image_resources[&page].len(), 1);
    }

    #[test]
    fn test_text_string_ascii_is_literal() {
        assert_eq!(
            text_string("Letter"),
            Object::String(b"Letter".to_vec(), StringFormat::Literal)
        );
    }

    #[test]
    fn test_text_string_non_ascii_is_utf16() {
        let Object::String(bytes, _) = text_string("José") else {
            panic!("expected a string object");
        };
        assert_eq!(
            bytes,
            vec![0xFE, 0xFF, 0x00, b'J', 0x00, b'o', 0x00, b's', 0x00, 0xE9]
        );
    }

    #[test]
    fn test_to_bytes_twice_keeps_content() {
        let mut doc = PdfDocument::new();
        let page = doc.add_page(PageSize::A4).unwrap();
        doc.insert_xobject(test_bitmap(2, 2), page, 0.0, 0.0, 10.0, 10.0)
            .unwrap();

        let first = doc.to_bytes().unwrap();
        let second = doc.to_bytes().unwrap();
        assert!(first.starts_with(b"%PDF-1.5"));

        let reopened = Document::load_mem(&second).unwrap();
        let page_id = reopened.get_pages()[&1];
        let content = reopened.get_page_content(page_id).unwrap();
        assert!(String::from_utf8_lossy(&content).contains("/Im1 Do"));
    }
}
