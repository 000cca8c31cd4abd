//! PDF export of the rendered letter
//!
//! The export captures the preview surface as a bitmap through a
//! [`Rasterizer`], places it on a single page and hands the bytes to a
//! [`DocumentSink`]. Failures are reported through a [`Notifier`].

use crate::{LetterError, Result};
use image::RgbaImage;
use log::{debug, error, info};
use pdf_core::{mm_to_pt, DocumentInfo, ImageXObject, PageSize, PdfDocument};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Value written to the PDF `Creator` entry
const CREATOR: &str = "experience-letter";

/// The rendered letter that gets captured
pub trait PreviewSurface {
    /// Rendered size in CSS pixels (width, height)
    fn dimensions(&self) -> (u32, u32);

    /// Hide interactive controls so they stay out of the capture
    fn hide_controls(&mut self);

    fn show_controls(&mut self);
}

/// Turns a surface into a bitmap
#[allow(async_fn_in_trait)]
pub trait Rasterizer<S: ?Sized> {
    async fn rasterize(&self, surface: &S, options: &CaptureOptions) -> Result<RgbaImage>;
}

/// Destination of the finished document
pub trait DocumentSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<()>;
}

/// Blocking user notification
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Options passed to the rasterizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureOptions {
    /// Device pixel ratio used for the capture
    pub scale: f64,
    /// Load cross-origin images through CORS
    #[serde(rename = "useCORS")]
    pub use_cors: bool,
    pub allow_taint: bool,
    /// CSS hex color, also used to flatten transparency in the PDF
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            use_cors: true,
            allow_taint: true,
            background_color: "#ffffff".to_string(),
            width: None,
            height: None,
        }
    }
}

impl CaptureOptions {
    /// Copy of these options pinned to the surface's exact size
    pub fn for_surface(&self, (width, height): (u32, u32)) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..self.clone()
        }
    }

    /// Background color as RGB
    pub fn background_rgb(&self) -> Result<[u8; 3]> {
        parse_hex_color(&self.background_color).ok_or_else(|| {
            LetterError::ConfigError(format!(
                "invalid background color '{}'",
                self.background_color
            ))
        })
    }
}

/// Parse "#rrggbb" or "#rgb"
fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        6 => Some([channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?]),
        3 => {
            let mut rgb = [0u8; 3];
            for (i, slot) in rgb.iter_mut().enumerate() {
                let v = channel(&hex[i..i + 1])?;
                *slot = v * 17;
            }
            Some(rgb)
        }
        _ => None,
    }
}

/// Page geometry of the exported document, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageLayout {
    /// A4 portrait with 10mm margins
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 10.0,
        }
    }
}

/// Where the bitmap lands on the page, in millimetres from the top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageLayout {
    pub fn page_size(&self) -> PageSize {
        PageSize::from_mm(self.page_width_mm, self.page_height_mm)
    }

    /// Page width minus both side margins
    pub fn content_width_mm(&self) -> f64 {
        self.page_width_mm - 2.0 * self.margin_mm
    }

    /// Place a bitmap at the top-left margin, full content width, keeping
    /// its aspect ratio
    ///
    /// Tall bitmaps are not clipped to the page height.
    pub fn placement(&self, bitmap_width: u32, bitmap_height: u32) -> Placement {
        let width_mm = self.content_width_mm();
        let height_mm = if bitmap_width == 0 {
            0.0
        } else {
            bitmap_height as f64 * width_mm / bitmap_width as f64
        };

        Placement {
            x_mm: self.margin_mm,
            y_mm: self.margin_mm,
            width_mm,
            height_mm,
        }
    }
}

/// File name for an exported letter: `<prefix>_<first name>_<millis>.pdf`
///
/// Path separators and control characters in the name are replaced with
/// underscores.
pub fn export_file_name(prefix: &str, first_name: &str, timestamp_millis: i64) -> String {
    let name: String = first_name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{prefix}_{name}_{timestamp_millis}.pdf")
}

/// Build a single-page PDF containing `bitmap`
pub fn build_letter_pdf(
    bitmap: &RgbaImage,
    layout: &PageLayout,
    background: [u8; 3],
    title: &str,
) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new();
    let page = doc.add_page(layout.page_size())?;

    let placement = layout.placement(bitmap.width(), bitmap.height());
    let xobject = ImageXObject::from_rgba(bitmap, background)?;
    doc.insert_xobject(
        xobject,
        page,
        mm_to_pt(placement.x_mm),
        mm_to_pt(placement.y_mm),
        mm_to_pt(placement.width_mm),
        mm_to_pt(placement.height_mm),
    )?;

    doc.set_info(&DocumentInfo {
        title: Some(title.to_string()),
        author: None,
        creator: Some(CREATOR.to_string()),
    });

    Ok(doc.to_bytes()?)
}

/// Hides a surface's controls until dropped
struct HiddenControls<'a, S: PreviewSurface> {
    surface: &'a mut S,
}

impl<'a, S: PreviewSurface> HiddenControls<'a, S> {
    fn hide(surface: &'a mut S) -> Self {
        surface.hide_controls();
        Self { surface }
    }

    fn surface(&self) -> &S {
        self.surface
    }
}

impl<S: PreviewSurface> Drop for HiddenControls<'_, S> {
    fn drop(&mut self) {
        self.surface.show_controls();
    }
}

/// Result of an export attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// No preview surface was rendered
    Skipped,
    Saved { file_name: String, size: usize },
    /// The user has been notified
    Failed { reason: String },
}

/// Captures the preview and saves it as a PDF
pub struct ExportAdapter<R, D, N> {
    settings: crate::ExportSettings,
    rasterizer: R,
    sink: D,
    notifier: N,
}

impl<R, D, N> ExportAdapter<R, D, N>
where
    D: DocumentSink,
    N: Notifier,
{
    pub fn new(settings: crate::ExportSettings, rasterizer: R, sink: D, notifier: N) -> Self {
        Self {
            settings,
            rasterizer,
            sink,
            notifier,
        }
    }

    pub fn settings(&self) -> &crate::ExportSettings {
        &self.settings
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Export the surface, if one is rendered
    ///
    /// Errors never escape: they are logged and the user is alerted.
    pub async fn export<S>(
        &mut self,
        surface: Option<&mut S>,
        first_name: &str,
        timestamp_millis: i64,
    ) -> ExportOutcome
    where
        S: PreviewSurface,
        R: Rasterizer<S>,
    {
        let Some(surface) = surface else {
            debug!("No preview surface rendered, nothing to export");
            return ExportOutcome::Skipped;
        };

        match self.try_export(surface, first_name, timestamp_millis).await {
            Ok((file_name, size)) => {
                info!("Saved {file_name} ({size} bytes)");
                ExportOutcome::Saved { file_name, size }
            }
            Err(e) => {
                error!("Error generating PDF: {e}");
                self.notifier.alert(&self.settings.failure_message);
                ExportOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_export<S>(
        &mut self,
        surface: &mut S,
        first_name: &str,
        timestamp_millis: i64,
    ) -> Result<(String, usize)>
    where
        S: PreviewSurface,
        R: Rasterizer<S>,
    {
        let background = self.settings.capture.background_rgb()?;
        let options = self.settings.capture.for_surface(surface.dimensions());

        let bitmap = {
            let hidden = HiddenControls::hide(surface);
            self.rasterizer.rasterize(hidden.surface(), &options).await?
        };
        if bitmap.width() == 0 || bitmap.height() == 0 {
            return Err(LetterError::EmptyBitmap);
        }
        debug!("Captured {}x{} bitmap", bitmap.width(), bitmap.height());

        let file_name = export_file_name(&self.settings.file_prefix, first_name, timestamp_millis);
        let title = format!("Experience Letter - {first_name}");
        let bytes = build_letter_pdf(&bitmap, &self.settings.layout, background, &title)?;

        self.sink.save(&file_name, &bytes)?;
        Ok((file_name, bytes.len()))
    }
}

/// Writes documents into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            saved: Vec::new(),
        }
    }

    /// Paths written so far
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl DocumentSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)
            .map_err(|e| LetterError::SaveError(format!("{}: {e}", path.display())))?;
        self.saved.push(path);
        Ok(())
    }
}

/// Notifier that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        log::warn!("{message}");
    }
}
