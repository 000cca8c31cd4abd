//! WASM bindings for the experience letter generator
//!
//! This crate provides a JavaScript-friendly API for:
//! - Editing the letter form and generating the letter
//! - Reading the letter record and its composed text for the preview
//! - Exporting the rendered preview to a downloaded PDF
//!
//! The page must load `html2canvas` as a global before calling
//! `generatePdf`.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { ExperienceLetter } from 'experience-letter-wasm';
//!
//! await init();
//!
//! const letter = new ExperienceLetter();
//! letter.setField('employeeName', 'Mr Manvendra Singh');
//! // ... remaining fields
//!
//! if (letter.generateLetter()) {
//!   render(letter.letterContent());
//!   await letter.generatePdf();
//! }
//! ```

mod dom;

pub use dom::{AlertNotifier, BrowserDownload, DomSurface, Html2Canvas};

use chrono::NaiveDate;
use letter::{
    parse_config, ExportAdapter, ExportOutcome, FormController, FormField, LetterConfig,
    LetterError, LetterForm,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

// Install the panic hook and route `log` output to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    console_log::init_with_level(if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    })
    .ok();
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Today's date in the browser's local time zone
fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .unwrap_or_default()
}

/// The experience letter component
#[wasm_bindgen]
pub struct ExperienceLetter {
    config: LetterConfig,
    controller: FormController,
}

#[wasm_bindgen]
impl ExperienceLetter {
    /// Create a component with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> ExperienceLetter {
        Self::with_config(LetterConfig::default())
    }

    /// Create a component from a configuration JSON string
    ///
    /// @param json - Configuration JSON (`{}` for defaults)
    /// @returns ExperienceLetter instance
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(json: &str) -> Result<ExperienceLetter, JsValue> {
        let config = parse_config(json).map_err(to_js_error)?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: LetterConfig) -> ExperienceLetter {
        let controller = FormController::new(config.company.clone(), today());
        ExperienceLetter { config, controller }
    }

    /// Whether the form (rather than the preview) is shown
    #[wasm_bindgen(getter, js_name = showForm)]
    pub fn show_form(&self) -> bool {
        !self.controller.is_preview()
    }

    /// Switch between form and preview
    ///
    /// @returns the new value of `showForm`
    #[wasm_bindgen(js_name = toggleForm)]
    pub fn toggle_form(&mut self) -> bool {
        self.controller.toggle_mode();
        self.show_form()
    }

    /// Current form values (camelCase keys)
    #[wasm_bindgen(js_name = formValues)]
    pub fn form_values(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.controller.form())?)
    }

    /// Set one form field by its control name
    ///
    /// @param name - Control name, e.g. "employeeName"
    /// @param value - New value
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), JsValue> {
        let field: FormField = name.parse().map_err(to_js_error)?;
        self.controller.set_field(field, value).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = isTouched)]
    pub fn is_touched(&self, name: &str) -> Result<bool, JsValue> {
        let field: FormField = name.parse().map_err(to_js_error)?;
        Ok(self.controller.is_touched(field))
    }

    /// Whether a field should display its "required" message
    #[wasm_bindgen(js_name = showsError)]
    pub fn shows_error(&self, name: &str) -> Result<bool, JsValue> {
        let field: FormField = name.parse().map_err(to_js_error)?;
        Ok(self.controller.shows_error(field))
    }

    /// Control names of required fields that are still empty
    #[wasm_bindgen(js_name = missingFields)]
    pub fn missing_fields(&self) -> Vec<JsValue> {
        self.controller
            .missing_fields()
            .into_iter()
            .map(|field| JsValue::from_str(field.name()))
            .collect()
    }

    /// Submit the form and switch to the preview
    ///
    /// @param form - Optional form values; the edited form is used when omitted
    /// @returns false when required fields are missing
    #[wasm_bindgen(js_name = generateLetter)]
    pub fn generate_letter(&mut self, form: JsValue) -> Result<bool, JsValue> {
        let result = if form.is_undefined() || form.is_null() {
            self.controller.submit_current()
        } else {
            let form: LetterForm = serde_wasm_bindgen::from_value(form)?;
            self.controller.submit(form)
        };

        match result {
            Ok(()) => Ok(true),
            Err(LetterError::Validation { .. }) => Ok(false),
            Err(e) => Err(to_js_error(e)),
        }
    }

    /// The letter record (camelCase keys)
    #[wasm_bindgen(js_name = letterData)]
    pub fn letter_data(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.controller.data())?)
    }

    /// The composed letter, piece by piece
    #[wasm_bindgen(js_name = letterContent)]
    pub fn letter_content(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.controller.letter_content())?)
    }

    /// The composed letter as plain text
    #[wasm_bindgen(js_name = letterText)]
    pub fn letter_text(&self) -> String {
        self.controller.letter_content().to_plain_text()
    }

    #[wasm_bindgen(js_name = firstName)]
    pub fn first_name(&self) -> String {
        self.controller.first_name()
    }

    #[wasm_bindgen(js_name = subjectPronoun)]
    pub fn subject_pronoun(&self) -> String {
        self.controller.subject_pronoun().to_string()
    }

    #[wasm_bindgen(js_name = possessivePronoun)]
    pub fn possessive_pronoun(&self) -> String {
        self.controller.possessive_pronoun().to_string()
    }

    #[wasm_bindgen(js_name = objectPronoun)]
    pub fn object_pronoun(&self) -> String {
        self.controller.object_pronoun().to_string()
    }

    /// Capture the rendered letter and download it as a PDF
    ///
    /// Errors are reported with `alert` and never reject the promise.
    ///
    /// @returns Promise resolving to the file name, or null when nothing
    /// was saved
    #[wasm_bindgen(js_name = generatePdf)]
    pub fn generate_pdf(&self) -> js_sys::Promise {
        let settings = self.config.export.clone();
        let first_name = self.controller.first_name();

        future_to_promise(async move {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return Ok(JsValue::NULL);
            };
            let mut surface =
                DomSurface::find(&document, &settings.surface_id, &settings.controls_selector);
            let mut adapter = ExportAdapter::new(
                settings,
                Html2Canvas,
                BrowserDownload::new(document),
                AlertNotifier,
            );

            let timestamp = js_sys::Date::now() as i64;
            match adapter.export(surface.as_mut(), &first_name, timestamp).await {
                ExportOutcome::Saved { file_name, .. } => Ok(JsValue::from_str(&file_name)),
                ExportOutcome::Skipped | ExportOutcome::Failed { .. } => Ok(JsValue::NULL),
            }
        })
    }
}

impl Default for ExperienceLetter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fill(letter: &mut ExperienceLetter) {
        for (name, value) in [
            ("employeeCode", "1157"),
            ("title", "Mr"),
            ("employeeName", "Mr Manvendra Singh"),
            ("startDateInput", "2025-04-23"),
            ("endDateInput", "2025-08-03"),
            ("designation", "Quality Assurance"),
        ] {
            letter.set_field(name, value).unwrap();
        }
    }

    #[wasm_bindgen_test]
    fn test_initial_state() {
        let letter = ExperienceLetter::new();
        assert!(letter.show_form());
        assert_eq!(letter.first_name(), "Manvendra");
        assert_eq!(letter.missing_fields().len(), 5);
    }

    #[wasm_bindgen_test]
    fn test_generate_letter() {
        let mut letter = ExperienceLetter::new();
        assert!(!letter.generate_letter(JsValue::UNDEFINED).unwrap());
        assert!(letter.show_form());
        assert!(letter.is_touched("designation").unwrap());

        fill(&mut letter);
        assert!(letter.generate_letter(JsValue::UNDEFINED).unwrap());
        assert!(!letter.show_form());
        assert_eq!(letter.subject_pronoun(), "he");
        assert!(letter.letter_text().contains("23rd April 2025"));
    }

    #[wasm_bindgen_test]
    fn test_unknown_field_is_rejected() {
        let mut letter = ExperienceLetter::new();
        assert!(letter.set_field("salary", "1").is_err());
    }

    #[wasm_bindgen_test]
    fn test_from_config() {
        let letter = ExperienceLetter::from_config(r#"{ "company": { "hrName": "Jo Park" } }"#)
            .unwrap();
        assert!(letter.letter_text().contains("Jo Park"));
        assert!(ExperienceLetter::from_config("not json").is_err());
    }

    #[wasm_bindgen_test]
    async fn test_generate_pdf_without_preview() {
        let letter = ExperienceLetter::new();
        let result = wasm_bindgen_futures::JsFuture::from(letter.generate_pdf())
            .await
            .unwrap();
        assert!(result.is_null());
    }

    #[wasm_bindgen_test]
    fn test_dom_surface_hides_and_restores_controls() {
        use letter::PreviewSurface;
        use wasm_bindgen::JsCast;

        let document = web_sys::window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        root.set_id("letter-test");
        root.set_inner_html(
            r#"<p>Letter</p><div class="print-section" style="display: flex">buttons</div>"#,
        );
        document.body().unwrap().append_child(&root).unwrap();

        let mut surface = DomSurface::find(&document, "letter-test", ".print-section").unwrap();
        let controls = root
            .query_selector(".print-section")
            .unwrap()
            .unwrap()
            .dyn_into::<web_sys::HtmlElement>()
            .unwrap();

        surface.hide_controls();
        assert_eq!(controls.style().get_property_value("display").unwrap(), "none");
        surface.show_controls();
        assert_eq!(controls.style().get_property_value("display").unwrap(), "flex");

        root.remove();
        assert!(DomSurface::find(&document, "letter-test", ".print-section").is_none());
    }
}
