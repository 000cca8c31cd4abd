//! Letter text composed from the letter record

use crate::config::CompanyProfile;
use crate::schema::LetterData;
use serde::Serialize;

const HEADING: &str = "EXPERIENCE LETTER";
const SALUTATION: &str = "To Whom It May Concern,";
const CLOSING: &str = "Sincerely,";

/// The pieces of the preview document, top to bottom
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterContent {
    pub company_name: String,
    pub date_line: String,
    pub heading: String,
    pub salutation: String,
    pub paragraphs: Vec<String>,
    pub closing: String,
    pub signatory: String,
    pub signatory_role: String,
    pub company_full_name: String,
}

impl LetterContent {
    pub fn compose(data: &LetterData, company: &CompanyProfile) -> Self {
        let pronouns = data.pronouns();

        let certification = format!(
            "This is to certify that {} (Employee Code: {}) was employed with {} as {} from {} to {}.",
            data.employee_name(),
            data.employee_code(),
            data.company_name(),
            data.designation(),
            data.start_date(),
            data.end_date(),
        );
        let conduct = format!(
            "During {pos} tenure with us, we found {obj} to be sincere and dedicated towards {pos} work. \
             {subj} maintained professional conduct throughout {pos} association with the company.",
            pos = pronouns.possessive,
            obj = pronouns.object,
            subj = capitalize(pronouns.subject),
        );
        let wishes = format!(
            "We wish {} all the very best in {} future endeavours.",
            data.first_name(),
            pronouns.possessive,
        );

        Self {
            company_name: data.company_name().to_string(),
            date_line: format!("Date: {}", data.date()),
            heading: HEADING.to_string(),
            salutation: SALUTATION.to_string(),
            paragraphs: vec![certification, conduct, wishes],
            closing: CLOSING.to_string(),
            signatory: data.hr_name().to_string(),
            signatory_role: company.hr_role.clone(),
            company_full_name: data.company_full_name().to_string(),
        }
    }

    /// Render as plain text, blocks separated by blank lines
    pub fn to_plain_text(&self) -> String {
        let mut blocks = vec![
            self.company_name.clone(),
            self.date_line.clone(),
            self.heading.clone(),
            self.salutation.clone(),
        ];
        blocks.extend(self.paragraphs.iter().cloned());
        blocks.push(format!(
            "{}\n{}\n{}\n{}",
            self.closing, self.signatory, self.signatory_role, self.company_full_name
        ));
        blocks.join("\n\n")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
