//! Configuration loaded from JSON

use crate::export::{CaptureOptions, PageLayout};
use crate::{LetterError, Result};
use serde::{Deserialize, Serialize};

/// Issuing company and signatory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub company_full_name: String,
    pub hr_name: String,
    pub hr_role: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            company_name: "CODESMOTECH".to_string(),
            company_full_name: "Codesmotech Consulting pvt ltd".to_string(),
            hr_name: "Shreya G".to_string(),
            hr_role: "HR Manager".to_string(),
        }
    }
}

/// Settings for the PDF export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    /// File name prefix, e.g. "Experience_Letter"
    pub file_prefix: String,
    /// Element id of the preview surface
    pub surface_id: String,
    /// Selector of the controls hidden during capture
    pub controls_selector: String,
    /// Message shown when the export fails
    pub failure_message: String,
    pub capture: CaptureOptions,
    pub layout: PageLayout,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_prefix: "Experience_Letter".to_string(),
            surface_id: "letter-content".to_string(),
            controls_selector: ".print-section".to_string(),
            failure_message: "Error generating PDF. Please try again.".to_string(),
            capture: CaptureOptions::default(),
            layout: PageLayout::default(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LetterConfig {
    pub company: CompanyProfile,
    pub export: ExportSettings,
}

/// Parse a configuration from JSON string
///
/// Missing keys fall back to their defaults, so `{}` is a valid config.
pub fn parse_config(json: &str) -> Result<LetterConfig> {
    let config: LetterConfig =
        serde_json::from_str(json).map_err(|e| LetterError::ConfigError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

impl LetterConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        self.export.capture.background_rgb()?;

        let layout = &self.export.layout;
        if layout.page_width_mm <= 0.0 || layout.page_height_mm <= 0.0 {
            return Err(LetterError::ConfigError(format!(
                "page size must be positive, got {} x {} mm",
                layout.page_width_mm, layout.page_height_mm
            )));
        }
        if layout.margin_mm < 0.0 || layout.content_width_mm() <= 0.0 {
            return Err(LetterError::ConfigError(format!(
                "margin {} mm leaves no room on a {} mm wide page",
                layout.margin_mm, layout.page_width_mm
            )));
        }
        if self.export.capture.scale <= 0.0 {
            return Err(LetterError::ConfigError(format!(
                "capture scale must be positive, got {}",
                self.export.capture.scale
            )));
        }
        if self.export.file_prefix.trim().is_empty() {
            return Err(LetterError::ConfigError("file prefix is empty".to_string()));
        }
        Ok(())
    }
}
