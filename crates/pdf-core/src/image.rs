//! Image handling for PDF documents

use crate::{PdfError, Result};
use image::RgbaImage;
use lopdf::{Dictionary, Stream};
use std::io::Write;

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// Color space ("DeviceRGB")
    pub color_space: String,
    /// Bits per component
    pub bits_per_component: u8,
    /// PDF filter ("FlateDecode")
    pub filter: String,
    /// Raw image data (compressed)
    pub data: Vec<u8>,
}

/// Blend one channel onto a background using the pixel's alpha
fn blend(channel: u8, alpha: u8, background: u8) -> u8 {
    let alpha = alpha as f32 / 255.0;
    (channel as f32 * alpha + background as f32 * (1.0 - alpha)) as u8
}

/// Flatten RGBA pixels onto an opaque background, producing packed RGB
fn flatten_rgba(rgba: &RgbaImage, background: [u8; 3]) -> Vec<u8> {
    let mut rgb_data = Vec::with_capacity((rgba.width() * rgba.height() * 3) as usize);
    for pixel in rgba.pixels() {
        let alpha = pixel[3];
        rgb_data.push(blend(pixel[0], alpha, background[0]));
        rgb_data.push(blend(pixel[1], alpha, background[1]));
        rgb_data.push(blend(pixel[2], alpha, background[2]));
    }
    rgb_data
}

/// Compress with FlateDecode (zlib)
fn deflate(raw: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

impl ImageXObject {
    /// Create XObject from a decoded RGBA bitmap
    ///
    /// Transparent pixels are flattened onto `background` (RGB).
    pub fn from_rgba(bitmap: &RgbaImage, background: [u8; 3]) -> Result<Self> {
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(PdfError::ImageError(format!(
                "Bitmap has no pixels ({}x{})",
                bitmap.width(),
                bitmap.height()
            )));
        }

        let raw_data = flatten_rgba(bitmap, background);

        Ok(Self {
            width: bitmap.width(),
            height: bitmap.height(),
            color_space: "DeviceRGB".to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: deflate(&raw_data)?,
        })
    }

    /// Convert to lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();

        dict.set("Type", lopdf::Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", lopdf::Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set(
            "ColorSpace",
            lopdf::Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", self.bits_per_component as i64);
        dict.set(
            "Filter",
            lopdf::Object::Name(self.filter.as_bytes().to_vec()),
        );

        Stream::new(dict, self.data.clone())
    }
}

/// Generate PDF operators to draw an image
pub(crate) fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{image_name} Do\nQ\n").into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use image::Rgba;
    use std::io::Read;

    #[test]
    fn test_generate_image_operators() {
        let ops = generate_image_operators("Im1", 100.0, 200.0, 50.0, 75.0);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.starts_with("q\n"));
        assert!(ops_str.contains("50 0 0 75 100 200 cm"));
        assert!(ops_str.contains("/Im1 Do"));
        assert!(ops_str.ends_with("Q\n"));
    }

    #[test]
    fn test_image_xobject_to_pdf_stream() {
        let xobject = ImageXObject {
            width: 100,
            height: 50,
            color_space: "DeviceRGB".to_string(),
            bits_per_component: 8,
            filter: "FlateDecode".to_string(),
            data: vec![1, 2, 3, 4, 5],
        };

        let stream = xobject.to_pdf_stream();
        let dict = stream.dict;

        assert_eq!(dict.get(b"Type").unwrap().as_name().unwrap(), b"XObject");
        assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Image");
        assert_eq!(dict.get(b"Width").unwrap().as_i64().unwrap(), 100);
        assert_eq!(dict.get(b"Height").unwrap().as_i64().unwrap(), 50);
        assert_eq!(
            dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceRGB"
        );
        assert_eq!(
            dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"FlateDecode"
        );
        assert_eq!(stream.content, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_flatten_rgba_blends_onto_background() {
        let mut bitmap = RgbaImage::new(2, 1);
        bitmap.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        bitmap.put_pixel(1, 0, Rgba([0, 0, 0, 0]));

        let rgb = flatten_rgba(&bitmap, [255, 255, 255]);
        assert_eq!(rgb, vec![10, 20, 30, 255, 255, 255]);
    }

    #[test]
    fn test_from_rgba() {
        let bitmap = RgbaImage::from_pixel(4, 3, Rgba([0, 0, 0, 255]));
        let xobject = ImageXObject::from_rgba(&bitmap, [255, 255, 255]).unwrap();

        assert_eq!(xobject.width, 4);
        assert_eq!(xobject.height, 3);
        assert_eq!(xobject.color_space, "DeviceRGB");
        assert_eq!(xobject.filter, "FlateDecode");

        let mut raw = Vec::new();
        ZlibDecoder::new(xobject.data.as_slice())
            .read_to_end(&mut raw)
            .unwrap();
        assert_eq!(raw.len(), 4 * 3 * 3);
        assert!(raw.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_rgba_empty_bitmap() {
        let bitmap = RgbaImage::new(0, 0);
        assert!(ImageXObject::from_rgba(&bitmap, [255, 255, 255]).is_err());
    }
}
