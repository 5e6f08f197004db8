use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::dataset::{AnswerOption, Question, QuestionKind};

/// One chosen option as captured at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub score: i64,
    #[serde(default)]
    pub statement: String,
}

impl From<&AnswerOption> for Choice {
    fn from(option: &AnswerOption) -> Self {
        Self {
            value: option.value.clone(),
            score: option.score,
            statement: option.statement.clone(),
        }
    }
}

/// Submitted answer for a single question.
///
/// Serialized flat for single choice (`{value, score, statement}`) and as
/// `{values, score}` for multi choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Multi { values: Vec<Choice>, score: i64 },
    Single(Choice),
}

impl Answer {
    /// Build an answer from the selected option values.
    ///
    /// Unknown values are ignored. Returns `None` when the selection does not
    /// satisfy the question kind (nothing chosen, or several for a radio).
    #[must_use]
    pub fn from_selection(question: &Question, selected: &[String]) -> Option<Self> {
        let choices: Vec<Choice> = question
            .options
            .iter()
            .filter(|option| selected.iter().any(|value| *value == option.value))
            .map(Choice::from)
            .collect();

        match question.kind {
            QuestionKind::Radio => {
                let mut choices = choices.into_iter();
                let choice = choices.next()?;
                if choices.next().is_some() {
                    return None;
                }
                Some(Self::Single(choice))
            }
            QuestionKind::Checkbox => {
                if choices.is_empty() {
                    return None;
                }
                let score = choices.iter().map(|choice| choice.score).sum();
                Some(Self::Multi {
                    values: choices,
                    score,
                })
            }
        }
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        match self {
            Self::Multi { score, .. } => *score,
            Self::Single(choice) => choice.score,
        }
    }

    /// Option values in the order they were stored.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        match self {
            Self::Multi { values, .. } => values.iter().map(|choice| choice.value.clone()).collect(),
            Self::Single(choice) => vec![choice.value.clone()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub wishes: Vec<String>,
    pub pain: Vec<String>,
}

/// Everything the user has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Responses {
    pub profile: BTreeMap<String, String>,
    pub organization: BTreeMap<String, String>,
    pub sections: BTreeMap<String, BTreeMap<String, Answer>>,
    pub bonus: Bonus,
}

impl Responses {
    #[must_use]
    pub fn answer(&self, section_id: &str, question_id: &str) -> Option<&Answer> {
        self.sections
            .get(section_id)
            .and_then(|answers| answers.get(question_id))
    }

    /// Store an answer, replacing any earlier one for the same question.
    pub fn record(&mut self, section_id: &str, question_id: &str, answer: Answer) {
        self.sections
            .entry(section_id.to_owned())
            .or_default()
            .insert(question_id.to_owned(), answer);
    }

    pub fn clear_sections(&mut self) {
        self.sections.clear();
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }
}
