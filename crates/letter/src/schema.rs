//! Letter data model

use crate::config::CompanyProfile;
use crate::{LetterError, Result};
use chrono::NaiveDate;
use letter_text::{first_name, format_date_input, to_date_input};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Salutation used in front of the employee name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Title {
    #[default]
    Mr,
    Ms,
    Mrs,
}

impl Title {
    /// All titles in form order
    pub const ALL: [Title; 3] = [Title::Mr, Title::Ms, Title::Mrs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Title::Mr => "Mr",
            Title::Ms => "Ms",
            Title::Mrs => "Mrs",
        }
    }

    /// Pronouns used when the letter refers to the employee
    pub fn pronouns(&self) -> Pronouns {
        match self {
            Title::Mr => Pronouns::MASCULINE,
            Title::Ms | Title::Mrs => Pronouns::FEMININE,
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Title {
    type Err = LetterError;

    /// Accepts "Mr", "mr.", "MRS" and so on
    fn from_str(s: &str) -> Result<Self> {
        let bare = s.trim().trim_end_matches('.');
        Title::ALL
            .into_iter()
            .find(|title| title.as_str().eq_ignore_ascii_case(bare))
            .ok_or_else(|| LetterError::InvalidTitle(s.to_string()))
    }
}

/// Subject, possessive and object pronouns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pronouns {
    pub subject: &'static str,
    pub possessive: &'static str,
    pub object: &'static str,
}

impl Pronouns {
    pub const MASCULINE: Pronouns = Pronouns {
        subject: "he",
        possessive: "his",
        object: "him",
    };

    pub const FEMININE: Pronouns = Pronouns {
        subject: "she",
        possessive: "her",
        object: "her",
    };
}

/// Inputs of the letter form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    DateInput,
    EmployeeCode,
    Title,
    EmployeeName,
    StartDateInput,
    EndDateInput,
    Designation,
}

impl FormField {
    /// All fields in form order
    pub const ALL: [FormField; 7] = [
        FormField::DateInput,
        FormField::EmployeeCode,
        FormField::Title,
        FormField::EmployeeName,
        FormField::StartDateInput,
        FormField::EndDateInput,
        FormField::Designation,
    ];

    /// Form control name, as used by the page template
    pub fn name(&self) -> &'static str {
        match self {
            FormField::DateInput => "dateInput",
            FormField::EmployeeCode => "employeeCode",
            FormField::Title => "title",
            FormField::EmployeeName => "employeeName",
            FormField::StartDateInput => "startDateInput",
            FormField::EndDateInput => "endDateInput",
            FormField::Designation => "designation",
        }
    }

    /// Human-readable label for messages
    pub fn label(&self) -> &'static str {
        match self {
            FormField::DateInput => "issue date",
            FormField::EmployeeCode => "employee code",
            FormField::Title => "title",
            FormField::EmployeeName => "employee name",
            FormField::StartDateInput => "start date",
            FormField::EndDateInput => "end date",
            FormField::Designation => "designation",
        }
    }

    /// Every field except the title must be filled in
    pub fn is_required(&self) -> bool {
        !matches!(self, FormField::Title)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FormField {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| LetterError::UnknownField(s.to_string()))
    }
}

/// Raw values as entered in the form
///
/// Dates are date-picker values (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LetterForm {
    pub date_input: String,
    pub employee_code: String,
    pub title: Title,
    pub employee_name: String,
    pub start_date_input: String,
    pub end_date_input: String,
    pub designation: String,
}

impl LetterForm {
    /// Blank form with the issue date preset to `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date_input: to_date_input(today),
            ..Default::default()
        }
    }

    /// Placeholder values shown before the first submission
    pub fn sample() -> Self {
        Self {
            date_input: "2025-08-31".to_string(),
            employee_code: "1157".to_string(),
            title: Title::Mr,
            employee_name: "Mr Manvendra Singh".to_string(),
            start_date_input: "2025-04-23".to_string(),
            end_date_input: "2025-08-03".to_string(),
            designation: "Quality Assurance".to_string(),
        }
    }

    /// Text value of a field (`None` for the title)
    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::DateInput => Some(&self.date_input),
            FormField::EmployeeCode => Some(&self.employee_code),
            FormField::Title => None,
            FormField::EmployeeName => Some(&self.employee_name),
            FormField::StartDateInput => Some(&self.start_date_input),
            FormField::EndDateInput => Some(&self.end_date_input),
            FormField::Designation => Some(&self.designation),
        }
    }

    /// Set a field from its string form
    pub fn set(&mut self, field: FormField, value: &str) -> Result<()> {
        let slot = match field {
            FormField::Title => {
                self.title = value.parse()?;
                return Ok(());
            }
            FormField::DateInput => &mut self.date_input,
            FormField::EmployeeCode => &mut self.employee_code,
            FormField::EmployeeName => &mut self.employee_name,
            FormField::StartDateInput => &mut self.start_date_input,
            FormField::EndDateInput => &mut self.end_date_input,
            FormField::Designation => &mut self.designation,
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Required fields that are empty or whitespace, in form order
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(FormField::is_required)
            .filter(|field| self.text(*field).map_or(true, |v| v.trim().is_empty()))
            .collect()
    }
}

/// Raw date input paired with its display form
#[derive(Debug, Clone, PartialEq, Eq)]
struct DerivedDate {
    display: String,
    input: String,
}

impl DerivedDate {
    fn derive(field: FormField, input: &str) -> Result<Self> {
        let display = format_date_input(input)
            .map_err(|source| LetterError::InvalidDate { field, source })?;
        Ok(Self {
            display,
            input: input.trim().to_string(),
        })
    }
}

/// The letter record: raw inputs plus their display-ready forms
///
/// Display dates can only be produced by deriving them from the raw
/// inputs, so the two never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterData {
    company_name: String,
    date: DerivedDate,
    employee_name: String,
    employee_code: String,
    start_date: DerivedDate,
    end_date: DerivedDate,
    designation: String,
    hr_name: String,
    company_full_name: String,
    title: Title,
}

impl LetterData {
    /// Derive display values from a submitted form
    pub fn derive(company: &CompanyProfile, form: &LetterForm) -> Result<Self> {
        Ok(Self {
            company_name: company.company_name.clone(),
            date: DerivedDate::derive(FormField::DateInput, &form.date_input)?,
            employee_name: form.employee_name.trim().to_string(),
            employee_code: form.employee_code.trim().to_string(),
            start_date: DerivedDate::derive(FormField::StartDateInput, &form.start_date_input)?,
            end_date: DerivedDate::derive(FormField::EndDateInput, &form.end_date_input)?,
            designation: form.designation.trim().to_string(),
            hr_name: company.hr_name.clone(),
            company_full_name: company.company_full_name.clone(),
            title: form.title,
        })
    }

    /// Record shown before the first submission
    pub fn sample(company: &CompanyProfile) -> Self {
        let form = LetterForm::sample();
        let date = |input: &str| DerivedDate {
            display: format_date_input(input).unwrap_or_default(),
            input: input.to_string(),
        };

        Self {
            company_name: company.company_name.clone(),
            date: date(&form.date_input),
            employee_name: form.employee_name,
            employee_code: form.employee_code,
            start_date: date(&form.start_date_input),
            end_date: date(&form.end_date_input),
            designation: form.designation,
            hr_name: company.hr_name.clone(),
            company_full_name: company.company_full_name.clone(),
            title: form.title,
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// Issue date, e.g. "31st August 2025"
    pub fn date(&self) -> &str {
        &self.date.display
    }

    pub fn date_input(&self) -> &str {
        &self.date.input
    }

    pub fn employee_name(&self) -> &str {
        &self.employee_name
    }

    pub fn employee_code(&self) -> &str {
        &self.employee_code
    }

    pub fn start_date(&self) -> &str {
        &self.start_date.display
    }

    pub fn start_date_input(&self) -> &str {
        &self.start_date.input
    }

    pub fn end_date(&self) -> &str {
        &self.end_date.display
    }

    pub fn end_date_input(&self) -> &str {
        &self.end_date.input
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn hr_name(&self) -> &str {
        &self.hr_name
    }

    pub fn company_full_name(&self) -> &str {
        &self.company_full_name
    }

    pub fn title(&self) -> Title {
        self.title
    }

    /// First name without honorific, or "Employee"
    pub fn first_name(&self) -> String {
        first_name(&self.employee_name)
    }

    pub fn pronouns(&self) -> Pronouns {
        self.title.pronouns()
    }
}

/// Flat camelCase view used by the page template
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LetterDataView<'a> {
    company_name: &'a str,
    date: &'a str,
    date_input: &'a str,
    employee_name: &'a str,
    employee_code: &'a str,
    start_date: &'a str,
    start_date_input: &'a str,
    end_date: &'a str,
    end_date_input: &'a str,
    designation: &'a str,
    hr_name: &'a str,
    company_full_name: &'a str,
    title: Title,
}

impl Serialize for LetterData {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        LetterDataView {
            company_name: &self.company_name,
            date: &self.date.display,
            date_input: &self.date.input,
            employee_name: &self.employee_name,
            employee_code: &self.employee_code,
            start_date: &self.start_date.display,
            start_date_input: &self.start_date.input,
            end_date: &self.end_date.display,
            end_date_input: &self.end_date.input,
            designation: &self.designation,
            hr_name: &self.hr_name,
            company_full_name: &self.company_full_name,
            title: self.title,
        }
        .serialize(serializer)
    }
}
