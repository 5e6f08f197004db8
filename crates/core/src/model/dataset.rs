use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::step::Cursor;

const BUNDLED_DATASET: &str = include_str!("../../resources/dataset.json");

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("dataset is not valid JSON: {0}")]
    Parse(String),

    #[error("dataset has no assessment sections")]
    NoSections,

    #[error("section {section} has no questions")]
    EmptySection { section: String },

    #[error("question {question} in section {section} has no options")]
    NoOptions { section: String, question: String },

    #[error("duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("duplicate question id {question} in section {section}")]
    DuplicateQuestion { section: String, question: String },

    #[error("field {field} has an invalid pattern: {reason}")]
    InvalidPattern { field: String, reason: String },
}

//
// ─── FORM SECTIONS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Number,
    Radio,
    Select,
    Textarea,
}

impl FieldKind {
    /// True for kinds whose value must be one of the declared options.
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Radio | Self::Select)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSection {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub fields: Vec<FormField>,
}

impl FormSection {
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.id == id)
    }
}

//
// ─── ASSESSMENT SECTIONS ───────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Exactly one option may be chosen.
    Radio,
    /// One or more options may be chosen.
    Checkbox,
}

impl QuestionKind {
    #[must_use]
    pub fn is_multi(self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub label: String,
    pub score: i64,
    #[serde(default)]
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    #[serde(default)]
    pub hint: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    #[must_use]
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.value == value)
    }

    /// Highest score this question can contribute.
    ///
    /// Single choice questions are worth their best option, multi choice
    /// questions the sum of every option.
    #[must_use]
    pub fn max_score(&self) -> i64 {
        match self.kind {
            QuestionKind::Radio => self
                .options
                .iter()
                .map(|option| option.score)
                .max()
                .unwrap_or(0),
            QuestionKind::Checkbox => self.options.iter().map(|option| option.score).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub gradient: String,
    pub questions: Vec<Question>,
}

//
// ─── BONUS SECTIONS ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusStatement {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSection {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    pub statements: Vec<BonusStatement>,
}

impl BonusSection {
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.statements.iter().any(|statement| statement.value == value)
    }

    #[must_use]
    pub fn label(&self, value: &str) -> Option<&str> {
        self.statements
            .iter()
            .find(|statement| statement.value == value)
            .map(|statement| statement.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSections {
    pub wishes: BonusSection,
    pub pain: BonusSection,
}

//
// ─── DATASET ───────────────────────────────────────────────────────────────────
//

/// Static question and response catalogue driving the assessment wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDataset {
    pub profile_section: FormSection,
    pub organization_section: FormSection,
    pub assessment_sections: Vec<AssessmentSection>,
    pub bonus_sections: BonusSections,
}

impl AssessmentDataset {
    /// Parse and validate a dataset from JSON.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Parse` for malformed JSON and the structural
    /// variants when the catalogue cannot drive a wizard.
    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let dataset: Self =
            serde_json::from_str(raw).map_err(|err| DatasetError::Parse(err.to_string()))?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// The dataset shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError` if the bundled resource is malformed.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json(BUNDLED_DATASET)
    }

    /// Check structural invariants the wizard relies on.
    ///
    /// # Errors
    ///
    /// Returns the first `DatasetError` found.
    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.assessment_sections.is_empty() {
            return Err(DatasetError::NoSections);
        }

        let mut section_ids = HashSet::new();
        for section in &self.assessment_sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(DatasetError::DuplicateSection(section.id.clone()));
            }
            if section.questions.is_empty() {
                return Err(DatasetError::EmptySection {
                    section: section.id.clone(),
                });
            }
            let mut question_ids = HashSet::new();
            for question in &section.questions {
                if !question_ids.insert(question.id.as_str()) {
                    return Err(DatasetError::DuplicateQuestion {
                        section: section.id.clone(),
                        question: question.id.clone(),
                    });
                }
                if question.options.is_empty() {
                    return Err(DatasetError::NoOptions {
                        section: section.id.clone(),
                        question: question.id.clone(),
                    });
                }
            }
        }

        let fields = self
            .profile_section
            .fields
            .iter()
            .chain(self.organization_section.fields.iter());
        for field in fields {
            if let Some(pattern) = field.pattern.as_deref() {
                Regex::new(pattern).map_err(|err| DatasetError::InvalidPattern {
                    field: field.id.clone(),
                    reason: err.to_string(),
                })?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn section(&self, index: usize) -> Option<&AssessmentSection> {
        self.assessment_sections.get(index)
    }

    #[must_use]
    pub fn question(&self, cursor: Cursor) -> Option<&Question> {
        self.section(cursor.section)
            .and_then(|section| section.questions.get(cursor.question))
    }

    #[must_use]
    pub fn contains(&self, cursor: Cursor) -> bool {
        self.question(cursor).is_some()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.assessment_sections
            .iter()
            .map(|section| section.questions.len())
            .sum()
    }

    /// Every question position in traversal order.
    pub fn cursors(&self) -> impl Iterator<Item = Cursor> + '_ {
        self.assessment_sections
            .iter()
            .enumerate()
            .flat_map(|(section, entry)| {
                (0..entry.questions.len()).map(move |question| Cursor::new(section, question))
            })
    }

    /// Position of the final question of the final section.
    #[must_use]
    pub fn last_cursor(&self) -> Option<Cursor> {
        let section = self.assessment_sections.len().checked_sub(1)?;
        let question = self.assessment_sections[section].questions.len().checked_sub(1)?;
        Some(Cursor::new(section, question))
    }

    /// Position following `cursor`, crossing into the next section when needed.
    #[must_use]
    pub fn next_cursor(&self, cursor: Cursor) -> Option<Cursor> {
        let section = self.section(cursor.section)?;
        if cursor.question + 1 < section.questions.len() {
            return Some(Cursor::new(cursor.section, cursor.question + 1));
        }
        let next = cursor.section + 1;
        self.section(next)
            .filter(|entry| !entry.questions.is_empty())
            .map(|_| Cursor::new(next, 0))
    }

    /// Position preceding `cursor`, crossing into the previous section when needed.
    #[must_use]
    pub fn prev_cursor(&self, cursor: Cursor) -> Option<Cursor> {
        if cursor.question > 0 {
            return Some(Cursor::new(cursor.section, cursor.question - 1));
        }
        let previous = cursor.section.checked_sub(1)?;
        let last = self.section(previous)?.questions.len().checked_sub(1)?;
        Some(Cursor::new(previous, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_parses() {
        let dataset = AssessmentDataset::bundled().unwrap();
        assert_eq!(dataset.assessment_sections.len(), 3);
        assert_eq!(dataset.total_questions(), 7);
        assert_eq!(dataset.cursors().count(), 7);
        assert_eq!(dataset.last_cursor(), Some(Cursor::new(2, 1)));
    }

    #[test]
    fn cursor_walk_crosses_sections() {
        let dataset = AssessmentDataset::bundled().unwrap();
        assert_eq!(
            dataset.next_cursor(Cursor::new(0, 2)),
            Some(Cursor::new(1, 0))
        );
        assert_eq!(dataset.next_cursor(Cursor::new(2, 1)), None);
        assert_eq!(
            dataset.prev_cursor(Cursor::new(1, 0)),
            Some(Cursor::new(0, 2))
        );
        assert_eq!(dataset.prev_cursor(Cursor::new(0, 0)), None);
    }

    #[test]
    fn missing_hint_defaults_to_empty() {
        let dataset = AssessmentDataset::bundled().unwrap();
        let question = dataset.question(Cursor::new(0, 2)).unwrap();
        assert_eq!(question.hint, "");
    }

    #[test]
    fn max_score_follows_question_kind() {
        let dataset = AssessmentDataset::bundled().unwrap();
        let single = dataset.question(Cursor::new(0, 0)).unwrap();
        assert_eq!(single.max_score(), 5);
        let multi = dataset.question(Cursor::new(1, 1)).unwrap();
        assert_eq!(multi.max_score(), 10);
    }

    #[test]
    fn rejects_duplicate_question_ids() {
        let mut dataset = AssessmentDataset::bundled().unwrap();
        let duplicate = dataset.assessment_sections[0].questions[0].clone();
        dataset.assessment_sections[0].questions.push(duplicate);
        assert!(matches!(
            dataset.validate(),
            Err(DatasetError::DuplicateQuestion { .. })
        ));
    }

    #[test]
    fn rejects_empty_sections() {
        let mut dataset = AssessmentDataset::bundled().unwrap();
        dataset.assessment_sections[1].questions.clear();
        assert_eq!(
            dataset.validate(),
            Err(DatasetError::EmptySection {
                section: "data".into()
            })
        );

        dataset.assessment_sections.clear();
        assert_eq!(dataset.validate(), Err(DatasetError::NoSections));
    }

    #[test]
    fn rejects_invalid_field_pattern() {
        let mut dataset = AssessmentDataset::bundled().unwrap();
        dataset.profile_section.fields[0].pattern = Some("([a-z".into());
        assert!(matches!(
            dataset.validate(),
            Err(DatasetError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            AssessmentDataset::from_json("{"),
            Err(DatasetError::Parse(_))
        ));
    }
}
