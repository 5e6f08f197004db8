use assess_core::guard::Confirmation;
use assess_core::model::{BonusKind, Cursor, FieldKind, FormKind, QuestionKind, Step};
use assess_core::wizard::{EntryStatus, Wizard};

use crate::vm::markdown_vm::markdown_to_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldVm {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    pub input_type: &'static str,
    pub required: bool,
    pub placeholder: String,
    pub value: String,
    /// `(value, label)` pairs for radio and select fields.
    pub options: Vec<(String, String)>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormVm {
    pub kind: FormKind,
    pub title: String,
    pub subtitle: String,
    pub fields: Vec<FieldVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceVm {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub section_name: String,
    pub section_icon: String,
    pub section_color: String,
    pub gradient: String,
    /// 1-based position inside the section.
    pub number: usize,
    pub of: usize,
    pub text: String,
    pub hint_html: String,
    pub multi: bool,
    pub choices: Vec<ChoiceVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BonusVm {
    pub kind: BonusKind,
    pub title: String,
    pub icon: String,
    pub color: String,
    pub choices: Vec<ChoiceVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepVm {
    Form(FormVm),
    Question(QuestionVm),
    Bonus(BonusVm),
    Complete,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlsVm {
    pub show_back: bool,
    pub can_advance: bool,
    pub next_label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavEntryVm {
    pub cursor: Cursor,
    pub label: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavGroupVm {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub entries: Vec<NavEntryVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmVm {
    pub title: &'static str,
    pub message: &'static str,
    pub confirm_label: &'static str,
}

impl From<&Confirmation> for ConfirmVm {
    fn from(confirmation: &Confirmation) -> Self {
        match confirmation {
            Confirmation::RestartAssessment => Self {
                title: "Start over?",
                message: "Going back to your organization details clears every answer in the assessment.",
                confirm_label: "Clear answers",
            },
            Confirmation::Exit(_) => Self {
                title: "Leave the assessment?",
                message: "Your progress has not been saved and will be lost.",
                confirm_label: "Leave",
            },
        }
    }
}

/// Everything the assessment page renders for one wizard state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WizardVm {
    pub step_label: String,
    pub progress: Option<u32>,
    pub body: StepVm,
    pub controls: ControlsVm,
    pub navigator: Vec<NavGroupVm>,
    pub confirm: Option<ConfirmVm>,
}

/// Project the wizard into view models.
///
/// Missing required values are only reported once `reveal_errors` is set,
/// so an untouched form does not open covered in messages.
#[must_use]
pub fn map_wizard(wizard: &Wizard, reveal_errors: bool) -> WizardVm {
    let step = wizard.step();
    let body = match step {
        Step::Profile => StepVm::Form(map_form(wizard, FormKind::Profile, reveal_errors)),
        Step::Organization => {
            StepVm::Form(map_form(wizard, FormKind::Organization, reveal_errors))
        }
        Step::Section(cursor) => map_question(wizard, cursor).map_or(StepVm::Complete, StepVm::Question),
        Step::Wishes => StepVm::Bonus(map_bonus(wizard, BonusKind::Wishes)),
        Step::Pain => StepVm::Bonus(map_bonus(wizard, BonusKind::Pain)),
        Step::Complete => StepVm::Complete,
    };

    WizardVm {
        step_label: step_label(wizard, step),
        progress: wizard.progress(),
        body,
        controls: ControlsVm {
            show_back: !matches!(step, Step::Profile | Step::Complete),
            can_advance: wizard.can_advance(),
            next_label: match step {
                Step::Pain => "See my results",
                _ => "Next",
            },
        },
        navigator: map_navigator(wizard),
        confirm: wizard.pending_confirmation().map(ConfirmVm::from),
    }
}

fn step_label(wizard: &Wizard, step: Step) -> String {
    match step {
        Step::Profile => "About you".to_owned(),
        Step::Organization => "Your organization".to_owned(),
        Step::Section(cursor) => wizard.current_section().map_or_else(String::new, |section| {
            format!(
                "{} · Question {} of {}",
                section.name,
                cursor.question + 1,
                section.questions.len()
            )
        }),
        Step::Wishes | Step::Pain => "Bonus".to_owned(),
        Step::Complete => "Complete".to_owned(),
    }
}

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Email => "email",
        FieldKind::Tel => "tel",
        FieldKind::Number => "number",
        FieldKind::Radio => "radio",
        FieldKind::Select => "select",
        FieldKind::Textarea => "textarea",
        FieldKind::Text => "text",
    }
}

fn map_form(wizard: &Wizard, kind: FormKind, reveal_errors: bool) -> FormVm {
    let section = wizard.form_section(kind);
    let issues = wizard.invalid_fields();

    let fields = section
        .fields
        .iter()
        .map(|field| {
            let value = wizard.field_value(kind, &field.id).unwrap_or_default().to_owned();
            let error = issues
                .iter()
                .find(|(id, _)| *id == field.id)
                .filter(|_| reveal_errors || !value.trim().is_empty())
                .map(|(_, issue)| issue.message());
            FieldVm {
                id: field.id.clone(),
                label: field.label.clone(),
                kind: field.kind,
                input_type: input_type(field.kind),
                required: field.required,
                placeholder: field.placeholder.clone(),
                value,
                options: field
                    .options
                    .iter()
                    .map(|option| (option.value.clone(), option.label.clone()))
                    .collect(),
                error,
            }
        })
        .collect();

    FormVm {
        kind,
        title: section.title.clone(),
        subtitle: section.subtitle.clone(),
        fields,
    }
}

fn map_question(wizard: &Wizard, cursor: Cursor) -> Option<QuestionVm> {
    let section = wizard.current_section()?;
    let question = wizard.current_question()?;
    Some(QuestionVm {
        section_name: section.name.clone(),
        section_icon: section.icon.clone(),
        section_color: section.color.clone(),
        gradient: section.gradient.clone(),
        number: cursor.question + 1,
        of: section.questions.len(),
        text: question.text.clone(),
        hint_html: markdown_to_html(&question.hint),
        multi: question.kind == QuestionKind::Checkbox,
        choices: question
            .options
            .iter()
            .map(|option| ChoiceVm {
                value: option.value.clone(),
                label: option.label.clone(),
                selected: wizard.is_selected(&option.value),
            })
            .collect(),
    })
}

fn map_bonus(wizard: &Wizard, kind: BonusKind) -> BonusVm {
    let bonus = &wizard.dataset().bonus_sections;
    let section = match kind {
        BonusKind::Wishes => &bonus.wishes,
        BonusKind::Pain => &bonus.pain,
    };
    BonusVm {
        kind,
        title: section.title.clone(),
        icon: section.icon.clone(),
        color: section.color.clone(),
        choices: section
            .statements
            .iter()
            .map(|statement| ChoiceVm {
                value: statement.value.clone(),
                label: statement.label.clone(),
                selected: wizard.is_selected(&statement.value),
            })
            .collect(),
    }
}

fn map_navigator(wizard: &Wizard) -> Vec<NavGroupVm> {
    wizard
        .navigator()
        .into_iter()
        .map(|group| NavGroupVm {
            name: group.name,
            icon: group.icon,
            color: group.color,
            entries: group
                .entries
                .into_iter()
                .map(|entry| NavEntryVm {
                    cursor: entry.cursor,
                    label: format!("{}. {}", entry.cursor.question + 1, entry.text),
                    class: match entry.status {
                        EntryStatus::Current => "nav-entry current",
                        EntryStatus::Answered => "nav-entry answered",
                        EntryStatus::Unanswered => "nav-entry",
                    },
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assess_core::model::AssessmentDataset;

    use super::*;

    fn wizard() -> Wizard {
        Wizard::new(Arc::new(AssessmentDataset::bundled().unwrap()))
    }

    fn fill_forms(wizard: &mut Wizard) {
        wizard.set_field(FormKind::Profile, "fullName", "Ada Lovelace").unwrap();
        wizard.set_field(FormKind::Profile, "email", "ada@example.com").unwrap();
        wizard.set_field(FormKind::Profile, "role", "founder").unwrap();
        wizard.next().unwrap();
        wizard.set_field(FormKind::Organization, "companyName", "Analytical").unwrap();
        wizard.set_field(FormKind::Organization, "companySize", "1-10").unwrap();
        wizard.next().unwrap();
    }

    #[test]
    fn untouched_profile_hides_missing_errors() {
        let wizard = wizard();
        let vm = map_wizard(&wizard, false);
        let StepVm::Form(form) = vm.body else {
            panic!("expected form");
        };
        assert_eq!(form.kind, FormKind::Profile);
        assert!(form.fields.iter().all(|field| field.error.is_none()));
        assert!(!vm.controls.show_back);
        assert!(!vm.controls.can_advance);

        let revealed = map_wizard(&wizard, true);
        let StepVm::Form(form) = revealed.body else {
            panic!("expected form");
        };
        let email = form.fields.iter().find(|field| field.id == "email").unwrap();
        assert_eq!(email.input_type, "email");
        assert!(email.error.is_some());
    }

    #[test]
    fn malformed_value_reports_without_reveal() {
        let mut wizard = wizard();
        wizard.set_field(FormKind::Profile, "email", "not-an-email").unwrap();
        let StepVm::Form(form) = map_wizard(&wizard, false).body else {
            panic!("expected form");
        };
        let email = form.fields.iter().find(|field| field.id == "email").unwrap();
        assert!(email.error.is_some());
        let role = form.fields.iter().find(|field| field.id == "role").unwrap();
        assert_eq!(role.options.len(), 4);
    }

    #[test]
    fn first_question_renders_hint_and_progress() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        let vm = map_wizard(&wizard, false);
        assert_eq!(vm.step_label, "Process maturity · Question 1 of 3");
        assert_eq!(vm.progress, Some(0));
        let StepVm::Question(question) = vm.body else {
            panic!("expected question");
        };
        assert!(question.hint_html.contains("<strong>order to cash</strong>"));
        assert!(!question.multi);
        assert!(question.choices.iter().all(|choice| !choice.selected));

        wizard.select("full").unwrap();
        let vm = map_wizard(&wizard, false);
        assert!(vm.controls.can_advance);
        let StepVm::Question(question) = vm.body else {
            panic!("expected question");
        };
        assert!(question.choices.iter().any(|choice| choice.value == "full" && choice.selected));
    }

    #[test]
    fn navigator_marks_current_and_answered() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        wizard.select("full").unwrap();
        wizard.next().unwrap();

        let vm = map_wizard(&wizard, false);
        assert_eq!(vm.navigator.len(), 1);
        let entries = &vm.navigator[0].entries;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].class, "nav-entry answered");
        assert_eq!(entries[1].class, "nav-entry current");
    }

    #[test]
    fn restart_prompt_maps_to_dialog() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        wizard.back().unwrap();
        let vm = map_wizard(&wizard, false);
        let confirm = vm.confirm.expect("dialog");
        assert_eq!(confirm.confirm_label, "Clear answers");
    }
}
