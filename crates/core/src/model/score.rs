use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::dataset::AssessmentDataset;
use crate::model::response::Responses;

/// Achieved and attainable score for a section or the whole assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub score: i64,
    pub max_possible: i64,
    pub percentage: u32,
}

impl ScoreSummary {
    #[must_use]
    pub fn new(score: i64, max_possible: i64) -> Self {
        Self {
            score,
            max_possible,
            percentage: percentage(score, max_possible),
        }
    }
}

/// Per-section and total scores, computed once at completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub sections: BTreeMap<String, ScoreSummary>,
    pub total: ScoreSummary,
}

impl ScoreBreakdown {
    /// Score every section of `dataset` against `responses`.
    ///
    /// Unanswered questions add nothing to the achieved score but still count
    /// towards the maximum.
    #[must_use]
    pub fn compute(dataset: &AssessmentDataset, responses: &Responses) -> Self {
        let mut sections = BTreeMap::new();
        let mut total_score = 0_i64;
        let mut total_max = 0_i64;

        for section in &dataset.assessment_sections {
            let mut score = 0_i64;
            let mut max_possible = 0_i64;
            for question in &section.questions {
                max_possible += question.max_score();
                if let Some(answer) = responses.answer(&section.id, &question.id) {
                    score += answer.score();
                }
            }
            total_score += score;
            total_max += max_possible;
            sections.insert(section.id.clone(), ScoreSummary::new(score, max_possible));
        }

        Self {
            sections,
            total: ScoreSummary::new(total_score, total_max),
        }
    }

    #[must_use]
    pub fn section(&self, id: &str) -> Option<&ScoreSummary> {
        self.sections.get(id)
    }
}

/// `round(achieved / max * 100)`, or 0 when nothing is attainable.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentage(achieved: i64, max: i64) -> u32 {
    if max <= 0 {
        return 0;
    }
    let value = (achieved as f64 / max as f64 * 100.0).round();
    if value <= 0.0 { 0 } else { value as u32 }
}

/// Share of all questions that have a stored answer, as a whole percentage.
#[must_use]
pub fn progress_percentage(dataset: &AssessmentDataset, responses: &Responses) -> u32 {
    let total = dataset.total_questions();
    let answered = dataset
        .assessment_sections
        .iter()
        .flat_map(|section| {
            section
                .questions
                .iter()
                .map(move |question| (section.id.as_str(), question.id.as_str()))
        })
        .filter(|(section, question)| responses.answer(section, question).is_some())
        .count();
    percentage(
        i64::try_from(answered).unwrap_or(i64::MAX),
        i64::try_from(total).unwrap_or(i64::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dataset::{AnswerOption, Question, QuestionKind};
    use crate::model::response::Answer;
    use crate::model::step::Cursor;

    #[test]
    fn percentage_rounds_and_handles_zero_max() {
        assert_eq!(percentage(3, 5), 60);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn single_choice_contributes_chosen_over_best() {
        let mut dataset = AssessmentDataset::bundled().unwrap();
        dataset.assessment_sections.truncate(1);
        dataset.assessment_sections[0].questions.truncate(1);
        dataset.assessment_sections[0].questions[0].options = vec![
            option("low", 1),
            option("mid", 3),
            option("high", 5),
        ];

        let mut responses = Responses::default();
        let question = dataset.question(Cursor::new(0, 0)).unwrap().clone();
        let answer = Answer::from_selection(&question, &["mid".to_string()]).unwrap();
        responses.record("process", &question.id, answer);

        let scores = ScoreBreakdown::compute(&dataset, &responses);
        let section = scores.section("process").unwrap();
        assert_eq!(section.score, 3);
        assert_eq!(section.max_possible, 5);
        assert_eq!(section.percentage, 60);
        assert_eq!(scores.total, *section);
    }

    #[test]
    fn multi_choice_max_is_sum_of_options() {
        let question = Question {
            id: "multi".into(),
            kind: QuestionKind::Checkbox,
            text: "Pick".into(),
            hint: String::new(),
            options: vec![option("a", 2), option("b", 3), option("c", 5)],
        };
        let mut dataset = AssessmentDataset::bundled().unwrap();
        dataset.assessment_sections.truncate(1);
        dataset.assessment_sections[0].questions = vec![question.clone()];

        let mut responses = Responses::default();
        let answer =
            Answer::from_selection(&question, &["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(answer.score(), 5);
        responses.record("process", "multi", answer);

        let scores = ScoreBreakdown::compute(&dataset, &responses);
        let section = scores.section("process").unwrap();
        assert_eq!(section.score, 5);
        assert_eq!(section.max_possible, 10);
        assert_eq!(section.percentage, 50);
    }

    #[test]
    fn unanswered_questions_still_count_towards_max() {
        let dataset = AssessmentDataset::bundled().unwrap();
        let scores = ScoreBreakdown::compute(&dataset, &Responses::default());
        assert_eq!(scores.total.score, 0);
        assert_eq!(scores.total.max_possible, 5 + 3 + 5 + 5 + 10 + 5 + 5);
        assert_eq!(scores.total.percentage, 0);
        assert_eq!(scores.sections.len(), 3);
    }

    #[test]
    fn progress_counts_answered_questions() {
        let dataset = AssessmentDataset::bundled().unwrap();
        let mut responses = Responses::default();
        assert_eq!(progress_percentage(&dataset, &responses), 0);

        let question = dataset.question(Cursor::new(0, 0)).unwrap();
        let answer = Answer::from_selection(question, &["full".to_string()]).unwrap();
        responses.record("process", &question.id, answer);
        // 1 of 7
        assert_eq!(progress_percentage(&dataset, &responses), 14);
    }

    fn option(value: &str, score: i64) -> AnswerOption {
        AnswerOption {
            value: value.into(),
            label: value.to_uppercase(),
            score,
            statement: String::new(),
        }
    }
}
