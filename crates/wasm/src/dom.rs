//! Browser implementations of the export collaborators

use image::RgbaImage;
use letter::{
    CaptureOptions, DocumentSink, LetterError, Notifier, PreviewSurface, Rasterizer,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, HtmlAnchorElement,
    HtmlCanvasElement, HtmlElement, Url,
};

#[wasm_bindgen]
extern "C" {
    /// Global `html2canvas(element, options)` loaded by the page
    #[wasm_bindgen(catch, js_name = html2canvas)]
    fn html2canvas(element: &HtmlElement, options: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// The rendered letter element
pub struct DomSurface {
    element: HtmlElement,
    controls_selector: String,
    /// Controls hidden for capture, with their previous inline `display`
    hidden: Vec<(HtmlElement, String)>,
}

impl DomSurface {
    /// Look up the surface by element id; `None` when it is not rendered
    pub fn find(document: &Document, id: &str, controls_selector: &str) -> Option<Self> {
        let element = document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()?;
        Some(Self {
            element,
            controls_selector: controls_selector.to_string(),
            hidden: Vec::new(),
        })
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl PreviewSurface for DomSurface {
    fn dimensions(&self) -> (u32, u32) {
        (
            self.element.offset_width().max(0) as u32,
            self.element.offset_height().max(0) as u32,
        )
    }

    fn hide_controls(&mut self) {
        let Ok(nodes) = self.element.query_selector_all(&self.controls_selector) else {
            log::warn!("Invalid controls selector '{}'", self.controls_selector);
            return;
        };

        for i in 0..nodes.length() {
            let Some(control) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) else {
                continue;
            };
            let style = control.style();
            let previous = style.get_property_value("display").unwrap_or_default();
            style.set_property("display", "none").ok();
            self.hidden.push((control, previous));
        }
    }

    fn show_controls(&mut self) {
        for (control, previous) in self.hidden.drain(..) {
            let style = control.style();
            if previous.is_empty() {
                style.remove_property("display").ok();
            } else {
                style.set_property("display", &previous).ok();
            }
        }
    }
}

/// Rasterizer backed by the page's html2canvas
pub struct Html2Canvas;

impl Rasterizer<DomSurface> for Html2Canvas {
    async fn rasterize(
        &self,
        surface: &DomSurface,
        options: &CaptureOptions,
    ) -> letter::Result<RgbaImage> {
        let js_options = serde_wasm_bindgen::to_value(options)
            .map_err(|e| LetterError::RasterizeError(e.to_string()))?;
        let promise = html2canvas(surface.element(), &js_options)
            .map_err(|e| LetterError::RasterizeError(describe(&e)))?;
        let canvas = JsFuture::from(promise)
            .await
            .map_err(|e| LetterError::RasterizeError(describe(&e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| LetterError::RasterizeError("html2canvas did not return a canvas".into()))?;

        canvas_to_rgba(&canvas)
    }
}

/// Read the pixels of a canvas
fn canvas_to_rgba(canvas: &HtmlCanvasElement) -> letter::Result<RgbaImage> {
    let (width, height) = (canvas.width(), canvas.height());
    if width == 0 || height == 0 {
        return Ok(RgbaImage::new(0, 0));
    }

    let context = canvas
        .get_context("2d")
        .map_err(|e| LetterError::RasterizeError(describe(&e)))?
        .ok_or_else(|| LetterError::RasterizeError("canvas has no 2d context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| LetterError::RasterizeError("unexpected canvas context".into()))?;
    let pixels = context
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| LetterError::RasterizeError(describe(&e)))?
        .data();

    RgbaImage::from_raw(width, height, pixels.0)
        .ok_or_else(|| LetterError::RasterizeError("pixel buffer size mismatch".into()))
}

/// Saves documents through a temporary download link
pub struct BrowserDownload {
    document: Document,
}

impl BrowserDownload {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl DocumentSink for BrowserDownload {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> letter::Result<()> {
        let save_error = |e: JsValue| LetterError::SaveError(describe(&e));

        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type("application/pdf");
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(save_error)?;
        let url = Url::create_object_url_with_blob(&blob).map_err(save_error)?;

        let anchor = self
            .document
            .create_element("a")
            .map_err(save_error)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| LetterError::SaveError("could not create a download link".into()))?;
        anchor.set_href(&url);
        anchor.set_download(file_name);
        anchor.click();

        revoke_later(url);
        Ok(())
    }
}

/// How long a download URL stays valid after the click
const REVOKE_DELAY_MS: i32 = 40_000;

/// Revoke an object URL once the browser has had time to start the download
///
/// Revoking straight after `click()` can cancel the download in some
/// browsers, since the navigation it triggers is asynchronous.
fn revoke_later(url: String) {
    let Some(window) = web_sys::window() else {
        Url::revoke_object_url(&url).ok();
        return;
    };

    let revoke = Closure::once_into_js(move || {
        if let Err(e) = Url::revoke_object_url(&url) {
            log::warn!("could not revoke download URL: {}", describe(&e));
        }
    });
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        revoke.unchecked_ref(),
        REVOKE_DELAY_MS,
    ) {
        log::warn!("could not schedule download URL cleanup: {}", describe(&e));
    }
}

/// `window.alert`
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn alert(&self, message: &str) {
        match web_sys::window() {
            Some(window) => {
                window.alert_with_message(message).ok();
            }
            None => log::warn!("{message}"),
        }
    }
}
