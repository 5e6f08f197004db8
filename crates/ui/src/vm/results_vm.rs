use assess_core::model::{AssessmentDataset, BonusSection, ScoreSummary};
use services::AssessmentResults;

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionScoreVm {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub score: i64,
    pub max: i64,
    pub percentage: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub sections: Vec<SectionScoreVm>,
    pub total: i64,
    pub max: i64,
    pub percentage: u32,
    pub wishes: Vec<String>,
    pub pain: Vec<String>,
    pub completed_at_str: Option<String>,
}

/// Order sections the way the dataset lists them; scores for sections the
/// dataset no longer has are dropped.
#[must_use]
pub fn map_results(dataset: &AssessmentDataset, results: &AssessmentResults) -> ResultsVm {
    let sections = dataset
        .assessment_sections
        .iter()
        .filter_map(|section| {
            let ScoreSummary {
                score,
                max_possible,
                percentage,
            } = *results.scores.section(&section.id)?;
            Some(SectionScoreVm {
                name: section.name.clone(),
                icon: section.icon.clone(),
                color: section.color.clone(),
                score,
                max: max_possible,
                percentage,
            })
        })
        .collect();

    let bonus = &results.responses.bonus;
    let total = &results.scores.total;
    ResultsVm {
        sections,
        total: total.score,
        max: total.max_possible,
        percentage: total.percentage,
        wishes: labels(&dataset.bonus_sections.wishes, &bonus.wishes),
        pain: labels(&dataset.bonus_sections.pain, &bonus.pain),
        completed_at_str: results.completed_at.map(format_datetime),
    }
}

fn labels(section: &BonusSection, values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| section.label(value).unwrap_or(value.as_str()).to_owned())
        .collect()
}
