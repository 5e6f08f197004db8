mod dataset;
mod response;
mod score;
mod step;

pub use dataset::{
    AnswerOption, AssessmentDataset, AssessmentSection, BonusSection, BonusSections,
    BonusStatement, DatasetError, FieldKind, FieldOption, FormField, FormSection, Question,
    QuestionKind,
};
pub use response::{Answer, Bonus, Choice, Responses};
pub use score::{ScoreBreakdown, ScoreSummary, percentage, progress_percentage};
pub use step::{BonusKind, Cursor, FormKind, Step};
