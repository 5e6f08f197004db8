mod assessment_vm;
mod markdown_vm;
mod results_vm;
mod time_fmt;

pub use assessment_vm::{
    BonusVm, ChoiceVm, ConfirmVm, ControlsVm, FieldVm, FormVm, NavEntryVm, NavGroupVm,
    QuestionVm, StepVm, WizardVm, map_wizard,
};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use results_vm::{ResultsVm, SectionScoreVm, map_results};
pub use time_fmt::format_datetime;
