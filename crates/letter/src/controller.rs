//! Form controller: edit/preview modes and submission

use crate::config::{CompanyProfile, LetterConfig};
use crate::content::LetterContent;
use crate::schema::{FormField, LetterData, LetterForm, Pronouns, Title};
use crate::{LetterError, Result};
use chrono::{Local, NaiveDate};
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;

/// Which view of the letter is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    #[default]
    Edit,
    Preview,
}

/// Owns the form, its touched state and the current letter record
#[derive(Debug, Clone)]
pub struct FormController {
    company: CompanyProfile,
    mode: DisplayMode,
    form: LetterForm,
    touched: BTreeSet<FormField>,
    data: LetterData,
}

impl FormController {
    /// Start in edit mode with the sample record and a form dated `today`
    pub fn new(company: CompanyProfile, today: NaiveDate) -> Self {
        let data = LetterData::sample(&company);
        Self {
            company,
            mode: DisplayMode::Edit,
            form: LetterForm::new(today),
            touched: BTreeSet::new(),
            data,
        }
    }

    /// Start from a configuration, dated with the local date
    pub fn from_config(config: &LetterConfig) -> Self {
        Self::new(config.company.clone(), Local::now().date_naive())
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_preview(&self) -> bool {
        self.mode == DisplayMode::Preview
    }

    /// Switch between edit and preview, returning the new mode
    pub fn toggle_mode(&mut self) -> DisplayMode {
        self.mode = match self.mode {
            DisplayMode::Edit => DisplayMode::Preview,
            DisplayMode::Preview => DisplayMode::Edit,
        };
        debug!("Display mode toggled to {:?}", self.mode);
        self.mode
    }

    pub fn form(&self) -> &LetterForm {
        &self.form
    }

    /// Set a form field from its string form and mark it touched
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<()> {
        self.form.set(field, value)?;
        self.touched.insert(field);
        Ok(())
    }

    pub fn set_title(&mut self, title: Title) {
        self.form.title = title;
        self.touched.insert(FormField::Title);
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.contains(&field)
    }

    pub fn mark_all_as_touched(&mut self) {
        self.touched.extend(FormField::ALL);
    }

    /// Whether a field should show its "required" message
    pub fn shows_error(&self, field: FormField) -> bool {
        self.is_touched(field) && self.missing_fields().contains(&field)
    }

    /// Required fields of the current form that are still empty
    pub fn missing_fields(&self) -> Vec<FormField> {
        self.form.missing_fields()
    }

    /// Validate `form`, derive the letter record and switch to preview
    ///
    /// On failure the controller stays in edit mode and the current record
    /// is left untouched.
    pub fn submit(&mut self, form: LetterForm) -> Result<()> {
        self.form = form;

        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            self.mark_all_as_touched();
            debug!("Submit rejected, missing {} field(s)", missing.len());
            return Err(LetterError::Validation { missing });
        }

        let data = LetterData::derive(&self.company, &self.form).inspect_err(|e| {
            debug!("Submit rejected: {e}");
        })?;

        self.data = data;
        self.mode = DisplayMode::Preview;
        debug!("Letter generated for employee {}", self.data.employee_code());
        Ok(())
    }

    /// Submit the form as currently edited
    pub fn submit_current(&mut self) -> Result<()> {
        let form = self.form.clone();
        self.submit(form)
    }

    pub fn data(&self) -> &LetterData {
        &self.data
    }

    pub fn company(&self) -> &CompanyProfile {
        &self.company
    }

    pub fn first_name(&self) -> String {
        self.data.first_name()
    }

    pub fn pronouns(&self) -> Pronouns {
        self.data.pronouns()
    }

    pub fn subject_pronoun(&self) -> &'static str {
        self.pronouns().subject
    }

    pub fn possessive_pronoun(&self) -> &'static str {
        self.pronouns().possessive
    }

    pub fn object_pronoun(&self) -> &'static str {
        self.pronouns().object
    }

    pub fn letter_content(&self) -> LetterContent {
        LetterContent::compose(&self.data, &self.company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn controller() -> FormController {
        FormController::new(CompanyProfile::default(), today())
    }

    fn filled_form() -> LetterForm {
        LetterForm {
            date_input: "2025-01-11".to_string(),
            employee_code: "2042".to_string(),
            title: Title::Ms,
            employee_name: "Ms Priya Rao".to_string(),
            start_date_input: "2023-06-01".to_string(),
            end_date_input: "2025-01-02".to_string(),
            designation: "Developer".to_string(),
        }
    }

    #[test]
    fn test_initial_state() {
        let c = controller();
        assert_eq!(c.mode(), DisplayMode::Edit);
        assert!(!c.is_preview());
        assert_eq!(c.form().date_input, "2026-10-18");
        assert_eq!(c.data(), &LetterData::sample(&CompanyProfile::default()));
        assert_eq!(c.first_name(), "Manvendra");
        assert!(FormField::ALL.iter().all(|f| !c.is_touched(*f)));
    }

    #[test]
    fn test_toggle_mode() {
        let mut c = controller();
        assert_eq!(c.toggle_mode(), DisplayMode::Preview);
        assert!(c.is_preview());
        assert_eq!(c.toggle_mode(), DisplayMode::Edit);
    }

    #[test]
    fn test_set_field_marks_touched() {
        let mut c = controller();
        c.set_field(FormField::EmployeeCode, "77").unwrap();
        assert!(c.is_touched(FormField::EmployeeCode));
        assert!(!c.is_touched(FormField::Designation));
        assert_eq!(c.form().employee_code, "77");

        c.set_title(Title::Mrs);
        assert_eq!(c.form().title, Title::Mrs);
        assert!(c.is_touched(FormField::Title));
    }

    #[test]
    fn test_shows_error_only_when_touched() {
        let mut c = controller();
        assert!(!c.shows_error(FormField::Designation));
        c.set_field(FormField::Designation, "  ").unwrap();
        assert!(c.shows_error(FormField::Designation));
        assert!(!c.shows_error(FormField::DateInput));
    }

    #[test]
    fn test_submit_success() {
        let mut c = controller();
        c.submit(filled_form()).unwrap();

        assert!(c.is_preview());
        assert_eq!(c.data().date(), "11th January 2025");
        assert_eq!(c.data().start_date(), "1st June 2023");
        assert_eq!(c.data().end_date(), "2nd January 2025");
        assert_eq!(c.data().employee_code(), "2042");
        assert_eq!(c.first_name(), "Priya");
        assert_eq!(
            (c.subject_pronoun(), c.possessive_pronoun(), c.object_pronoun()),
            ("she", "her", "her")
        );
    }

    #[test]
    fn test_submit_missing_fields_keeps_record() {
        for field in FormField::ALL.into_iter().filter(FormField::is_required) {
            let mut c = controller();
            let before = c.data().clone();
            let mut form = filled_form();
            form.set(field, "").unwrap();

            let err = c.submit(form).unwrap_err();
            match err {
                LetterError::Validation { missing } => assert_eq!(missing, vec![field]),
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(c.mode(), DisplayMode::Edit);
            assert_eq!(c.data(), &before);
            assert!(FormField::ALL.iter().all(|f| c.is_touched(*f)));
        }
    }

    #[test]
    fn test_submit_invalid_date_keeps_record() {
        let mut c = controller();
        let before = c.data().clone();
        let form = LetterForm {
            start_date_input: "23/04/2025".to_string(),
            ..filled_form()
        };

        let err = c.submit(form).unwrap_err();
        assert!(matches!(
            err,
            LetterError::InvalidDate {
                field: FormField::StartDateInput,
                ..
            }
        ));
        assert_eq!(c.mode(), DisplayMode::Edit);
        assert_eq!(c.data(), &before);
        assert_eq!(c.form().start_date_input, "23/04/2025");
    }

    #[test]
    fn test_submit_current() {
        let mut c = controller();
        for (field, value) in [
            (FormField::EmployeeCode, "9"),
            (FormField::EmployeeName, "Mr. Arjun Mehta"),
            (FormField::StartDateInput, "2024-02-03"),
            (FormField::EndDateInput, "2025-03-04"),
            (FormField::Designation, "Analyst"),
        ] {
            c.set_field(field, value).unwrap();
        }
        c.submit_current().unwrap();

        assert!(c.is_preview());
        assert_eq!(c.data().date(), "18th October 2026");
        assert_eq!(c.first_name(), "Arjun");
        assert_eq!(c.letter_content().signatory, "Shreya G");
    }

    #[test]
    fn test_first_name_default() {
        let mut c = controller();
        let form = LetterForm {
            employee_name: "Mr".to_string(),
            ..filled_form()
        };
        c.submit(form).unwrap();
        assert_eq!(c.first_name(), "Employee");
    }
}
