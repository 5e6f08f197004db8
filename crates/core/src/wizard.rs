//! The assessment wizard: profile → organization → sections → wishes → pain → complete.
//!
//! `Wizard` owns all mutable assessment state. Views read from it and send
//! intents (`set_field`, `select`, `next`, `back`, `jump_to`, `confirm`);
//! nothing else mutates responses or the high-water mark.

use std::mem;
use std::sync::Arc;

use thiserror::Error;

use crate::guard::{Confirmation, ExitAttempt, GuardDecision, NavigationGuard};
use crate::model::{
    Answer, AssessmentDataset, AssessmentSection, BonusKind, Cursor, FormKind, FormSection,
    Question, QuestionKind, Responses, ScoreBreakdown, Step, progress_percentage,
};
use crate::validation::FieldIssue;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WizardError {
    #[error("{} field(s) are missing or invalid", .0.len())]
    IncompleteForm(Vec<(String, FieldIssue)>),

    #[error("question {0} has not been answered")]
    Unanswered(Cursor),

    #[error("question {0} has not been reached yet")]
    BeyondFurthest(Cursor),

    #[error("no question at {0}")]
    UnknownQuestion(Cursor),

    #[error("option {0} is not offered on this step")]
    UnknownOption(String),

    #[error("field {0} does not exist")]
    UnknownField(String),

    #[error("nothing can be selected on this step")]
    NotSelectable,

    #[error("the question navigator is only available inside the assessment")]
    NavigatorUnavailable,

    #[error("already at the first step")]
    AtStart,

    #[error("assessment already completed")]
    Completed,

    #[error("a confirmation is waiting for an answer")]
    ConfirmationPending,
}

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of a navigation intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved(Step),
    /// Nothing moved; the user has to answer `Confirmation` first.
    ConfirmationRequired(Confirmation),
    Completed(ScoreBreakdown),
}

/// What happened when a pending confirmation was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Section answers were discarded and the wizard is back on the organization step.
    Restarted,
    /// The wizard is back at a fresh start with the guard armed; the host may
    /// now perform the navigation.
    Leave(ExitAttempt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Answered,
    Unanswered,
    Current,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorEntry {
    pub cursor: Cursor,
    pub text: String,
    pub status: EntryStatus,
}

/// Reachable questions of one section, for the jump navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorGroup {
    pub section: usize,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub entries: Vec<NavigatorEntry>,
}

//
// ─── WIZARD ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    dataset: Arc<AssessmentDataset>,
    step: Step,
    furthest: Cursor,
    responses: Responses,
    /// Checked values on the current question or bonus checklist.
    selection: Vec<String>,
    scores: Option<ScoreBreakdown>,
    guard: NavigationGuard,
}

impl Wizard {
    #[must_use]
    pub fn new(dataset: Arc<AssessmentDataset>) -> Self {
        Self {
            dataset,
            step: Step::Profile,
            furthest: Cursor::default(),
            responses: Responses::default(),
            selection: Vec::new(),
            scores: None,
            guard: NavigationGuard::new(),
        }
    }

    #[must_use]
    pub fn dataset(&self) -> &AssessmentDataset {
        &self.dataset
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Furthest question reached moving forward.
    #[must_use]
    pub fn furthest(&self) -> Cursor {
        self.furthest
    }

    #[must_use]
    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    #[must_use]
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, value: &str) -> bool {
        self.selection.iter().any(|selected| selected == value)
    }

    #[must_use]
    pub fn scores(&self) -> Option<&ScoreBreakdown> {
        self.scores.as_ref()
    }

    #[must_use]
    pub fn pending_confirmation(&self) -> Option<&Confirmation> {
        self.guard.pending()
    }

    #[must_use]
    pub fn current_section(&self) -> Option<&AssessmentSection> {
        self.step
            .cursor()
            .and_then(|cursor| self.dataset.section(cursor.section))
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.step
            .cursor()
            .and_then(|cursor| self.dataset.question(cursor))
    }

    #[must_use]
    pub fn form_section(&self, kind: FormKind) -> &FormSection {
        match kind {
            FormKind::Profile => &self.dataset.profile_section,
            FormKind::Organization => &self.dataset.organization_section,
        }
    }

    #[must_use]
    pub fn field_value(&self, kind: FormKind, field_id: &str) -> Option<&str> {
        self.form_values(kind).get(field_id).map(String::as_str)
    }

    /// Answer progress while inside a section, `None` elsewhere.
    #[must_use]
    pub fn progress(&self) -> Option<u32> {
        self.step
            .cursor()
            .map(|_| progress_percentage(&self.dataset, &self.responses))
    }

    /// True once the user has started work that leaving would discard.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.step != Step::Profile || !self.responses.sections.is_empty()
    }

    //
    // ─── INPUT ─────────────────────────────────────────────────────────────────
    //

    /// Store a profile or organization field value.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::UnknownField` if the form has no such field and
    /// `WizardError::Completed` after completion.
    pub fn set_field(
        &mut self,
        kind: FormKind,
        field_id: &str,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        if self.step.is_complete() {
            return Err(WizardError::Completed);
        }
        if self.form_section(kind).field(field_id).is_none() {
            return Err(WizardError::UnknownField(field_id.to_owned()));
        }
        let values = match kind {
            FormKind::Profile => &mut self.responses.profile,
            FormKind::Organization => &mut self.responses.organization,
        };
        values.insert(field_id.to_owned(), value.into());
        Ok(())
    }

    /// Fields on the current form step that fail validation.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<(String, FieldIssue)> {
        let kind = match self.step {
            Step::Profile => FormKind::Profile,
            Step::Organization => FormKind::Organization,
            _ => return Vec::new(),
        };
        let values = self.form_values(kind);
        self.form_section(kind)
            .invalid_fields(|id| values.get(id).cloned())
    }

    /// Select an option on the current step.
    ///
    /// Single choice questions replace the selection; multi choice questions
    /// and bonus checklists toggle `value`.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::NotSelectable` on form and terminal steps and
    /// `WizardError::UnknownOption` for values the step does not offer.
    pub fn select(&mut self, value: &str) -> Result<(), WizardError> {
        let (offered, multi) = self.offered_values()?;
        if !offered.iter().any(|candidate| candidate == value) {
            return Err(WizardError::UnknownOption(value.to_owned()));
        }

        if multi {
            if self.is_selected(value) {
                self.selection.retain(|selected| selected != value);
            } else {
                self.selection.push(value.to_owned());
            }
            // keep dataset order
            let selection = mem::take(&mut self.selection);
            self.selection = offered
                .into_iter()
                .filter(|candidate| selection.contains(candidate))
                .collect();
        } else {
            self.selection = vec![value.to_owned()];
        }
        Ok(())
    }

    /// Whether "Next" is enabled on the current step.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        match self.step {
            Step::Profile | Step::Organization => self.invalid_fields().is_empty(),
            Step::Section(_) => match self.current_question().map(|question| question.kind) {
                Some(QuestionKind::Radio) => self.selection.len() == 1,
                Some(QuestionKind::Checkbox) => !self.selection.is_empty(),
                None => false,
            },
            Step::Wishes | Step::Pain => true,
            Step::Complete => false,
        }
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move forward, saving whatever the current step captured.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::IncompleteForm` or `WizardError::Unanswered` when
    /// the step guard blocks, `WizardError::ConfirmationPending` while a dialog
    /// is open and `WizardError::Completed` at the end.
    pub fn next(&mut self) -> Result<Transition, WizardError> {
        self.ensure_no_pending()?;
        let dataset = Arc::clone(&self.dataset);

        match self.step {
            Step::Profile => {
                self.ensure_form_valid()?;
                Ok(self.advance_to(Step::Organization))
            }
            Step::Organization => {
                self.ensure_form_valid()?;
                Ok(self.advance_to(Step::Section(Cursor::default())))
            }
            Step::Section(cursor) => {
                let section = dataset
                    .section(cursor.section)
                    .ok_or(WizardError::UnknownQuestion(cursor))?;
                let question = dataset
                    .question(cursor)
                    .ok_or(WizardError::UnknownQuestion(cursor))?;
                let answer = Answer::from_selection(question, &self.selection)
                    .ok_or(WizardError::Unanswered(cursor))?;
                self.responses.record(&section.id, &question.id, answer);

                let next = dataset
                    .next_cursor(cursor)
                    .map_or(Step::Wishes, Step::Section);
                Ok(self.advance_to(next))
            }
            Step::Wishes => {
                self.save_bonus(BonusKind::Wishes);
                Ok(self.advance_to(Step::Pain))
            }
            Step::Pain => {
                self.save_bonus(BonusKind::Pain);
                Ok(self.complete())
            }
            Step::Complete => Err(WizardError::Completed),
        }
    }

    /// Move backward.
    ///
    /// From the first question this only opens the restart confirmation.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::AtStart` on the profile step,
    /// `WizardError::ConfirmationPending` while a dialog is open and
    /// `WizardError::Completed` at the end.
    pub fn back(&mut self) -> Result<Transition, WizardError> {
        self.ensure_no_pending()?;
        let dataset = Arc::clone(&self.dataset);

        match self.step {
            Step::Profile => Err(WizardError::AtStart),
            Step::Organization => Ok(self.show(Step::Profile)),
            Step::Section(cursor) if cursor.is_first() => {
                let confirmation = Confirmation::RestartAssessment;
                self.guard.request(confirmation.clone());
                Ok(Transition::ConfirmationRequired(confirmation))
            }
            Step::Section(cursor) => {
                let previous = dataset
                    .prev_cursor(cursor)
                    .ok_or(WizardError::UnknownQuestion(cursor))?;
                Ok(self.show(Step::Section(previous)))
            }
            Step::Wishes => {
                let last = dataset
                    .last_cursor()
                    .ok_or(WizardError::UnknownQuestion(Cursor::default()))?;
                Ok(self.show(Step::Section(last)))
            }
            Step::Pain => {
                self.save_bonus(BonusKind::Pain);
                Ok(self.show(Step::Wishes))
            }
            Step::Complete => Err(WizardError::Completed),
        }
    }

    /// Show a previously reached question directly, reloading its saved answer.
    ///
    /// Does not move the high-water mark.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::BeyondFurthest` for questions not reached yet,
    /// `WizardError::UnknownQuestion` for positions outside the dataset and
    /// `WizardError::NavigatorUnavailable` outside the assessment steps.
    pub fn jump_to(&mut self, cursor: Cursor) -> Result<Transition, WizardError> {
        self.ensure_no_pending()?;
        match self.step {
            Step::Complete => return Err(WizardError::Completed),
            Step::Profile | Step::Organization => return Err(WizardError::NavigatorUnavailable),
            Step::Section(_) | Step::Wishes | Step::Pain => {}
        }
        if !self.dataset.contains(cursor) {
            return Err(WizardError::UnknownQuestion(cursor));
        }
        if cursor > self.furthest {
            return Err(WizardError::BeyondFurthest(cursor));
        }
        Ok(self.show(Step::Section(cursor)))
    }

    /// Questions up to the high-water mark, grouped by section.
    #[must_use]
    pub fn navigator(&self) -> Vec<NavigatorGroup> {
        if !matches!(self.step, Step::Section(_) | Step::Wishes | Step::Pain) {
            return Vec::new();
        }

        let mut groups: Vec<NavigatorGroup> = Vec::new();
        for cursor in self.dataset.cursors().take_while(|c| *c <= self.furthest) {
            let (Some(section), Some(question)) = (
                self.dataset.section(cursor.section),
                self.dataset.question(cursor),
            ) else {
                continue;
            };
            let status = if self.step == Step::Section(cursor) {
                EntryStatus::Current
            } else if self.responses.answer(&section.id, &question.id).is_some() {
                EntryStatus::Answered
            } else {
                EntryStatus::Unanswered
            };
            let entry = NavigatorEntry {
                cursor,
                text: question.text.clone(),
                status,
            };

            match groups.last_mut() {
                Some(group) if group.section == cursor.section => group.entries.push(entry),
                _ => groups.push(NavigatorGroup {
                    section: cursor.section,
                    name: section.name.clone(),
                    icon: section.icon.clone(),
                    color: section.color.clone(),
                    entries: vec![entry],
                }),
            }
        }
        groups
    }

    //
    // ─── GUARD ─────────────────────────────────────────────────────────────────
    //

    /// Route an attempt to leave the page through the navigation guard.
    pub fn attempt_exit(&mut self, attempt: ExitAttempt) -> GuardDecision {
        let in_progress = self.is_in_progress();
        self.guard.evaluate(attempt, in_progress)
    }

    /// Accept the pending confirmation.
    pub fn confirm(&mut self) -> Option<Resolution> {
        match self.guard.accept()? {
            Confirmation::RestartAssessment => {
                self.reset_progress();
                self.show(Step::Organization);
                Some(Resolution::Restarted)
            }
            Confirmation::Exit(attempt) => {
                *self = Self::new(Arc::clone(&self.dataset));
                Some(Resolution::Leave(attempt))
            }
        }
    }

    /// Window close on a host without a native leave-page prompt.
    ///
    /// Returns `true` when the window may close. Otherwise the close is held
    /// and an exit confirmation is opened in its place.
    pub fn request_close(&mut self) -> bool {
        match self.attempt_exit(ExitAttempt::Unload) {
            GuardDecision::Allow => true,
            GuardDecision::NativePrompt => {
                self.guard.request(Confirmation::Exit(ExitAttempt::Unload));
                false
            }
            GuardDecision::AwaitConfirmation => false,
        }
    }

    /// Decline the pending confirmation, leaving all state as it was.
    pub fn cancel(&mut self) -> Option<Confirmation> {
        self.guard.dismiss()
    }

    #[must_use]
    pub fn navigation_released(&self) -> bool {
        self.guard.is_released()
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn form_values(&self, kind: FormKind) -> &std::collections::BTreeMap<String, String> {
        match kind {
            FormKind::Profile => &self.responses.profile,
            FormKind::Organization => &self.responses.organization,
        }
    }

    fn ensure_no_pending(&self) -> Result<(), WizardError> {
        if self.guard.pending().is_some() {
            return Err(WizardError::ConfirmationPending);
        }
        Ok(())
    }

    fn ensure_form_valid(&self) -> Result<(), WizardError> {
        let invalid = self.invalid_fields();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(WizardError::IncompleteForm(invalid))
        }
    }

    /// Values offered on the current step and whether they toggle.
    fn offered_values(&self) -> Result<(Vec<String>, bool), WizardError> {
        let bonus = &self.dataset.bonus_sections;
        match self.step {
            Step::Section(_) => {
                let question = self.current_question().ok_or(WizardError::NotSelectable)?;
                let values = question.options.iter().map(|o| o.value.clone()).collect();
                Ok((values, question.kind.is_multi()))
            }
            Step::Wishes => Ok((
                bonus.wishes.statements.iter().map(|s| s.value.clone()).collect(),
                true,
            )),
            Step::Pain => Ok((
                bonus.pain.statements.iter().map(|s| s.value.clone()).collect(),
                true,
            )),
            Step::Profile | Step::Organization | Step::Complete => Err(WizardError::NotSelectable),
        }
    }

    fn save_bonus(&mut self, kind: BonusKind) {
        let values = self.selection.clone();
        match kind {
            BonusKind::Wishes => self.responses.bonus.wishes = values,
            BonusKind::Pain => self.responses.bonus.pain = values,
        }
    }

    /// Forward move: render `step` and raise the high-water mark.
    fn advance_to(&mut self, step: Step) -> Transition {
        if let Step::Section(cursor) = step {
            self.furthest = self.furthest.max(cursor);
        }
        self.show(step)
    }

    /// Render `step` and reload whatever was saved for it.
    fn show(&mut self, step: Step) -> Transition {
        self.step = step;
        self.selection = match step {
            Step::Section(cursor) => self
                .dataset
                .section(cursor.section)
                .zip(self.dataset.question(cursor))
                .and_then(|(section, question)| self.responses.answer(&section.id, &question.id))
                .map(Answer::values)
                .unwrap_or_default(),
            Step::Wishes => self.responses.bonus.wishes.clone(),
            Step::Pain => self.responses.bonus.pain.clone(),
            Step::Profile | Step::Organization | Step::Complete => Vec::new(),
        };
        Transition::Moved(step)
    }

    fn reset_progress(&mut self) {
        self.responses.clear_sections();
        self.furthest = Cursor::default();
    }

    fn complete(&mut self) -> Transition {
        let scores = ScoreBreakdown::compute(&self.dataset, &self.responses);
        self.scores = Some(scores.clone());
        self.step = Step::Complete;
        self.selection.clear();
        self.guard.release();
        Transition::Completed(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> Wizard {
        Wizard::new(Arc::new(AssessmentDataset::bundled().unwrap()))
    }

    fn fill_forms(wizard: &mut Wizard) {
        wizard
            .set_field(FormKind::Profile, "fullName", "Ada Lovelace")
            .unwrap();
        wizard
            .set_field(FormKind::Profile, "email", "ada@example.com")
            .unwrap();
        wizard
            .set_field(FormKind::Profile, "role", "founder")
            .unwrap();
        wizard.next().unwrap();
        wizard
            .set_field(FormKind::Organization, "companyName", "Engines Ltd")
            .unwrap();
        wizard
            .set_field(FormKind::Organization, "companySize", "11-50")
            .unwrap();
        wizard.next().unwrap();
    }

    fn answer_first_option(wizard: &mut Wizard) -> Transition {
        let value = wizard.current_question().unwrap().options[0].value.clone();
        wizard.select(&value).unwrap();
        wizard.next().unwrap()
    }

    #[test]
    fn forms_block_until_required_fields_are_valid() {
        let mut wizard = wizard();
        assert!(!wizard.can_advance());
        let Err(WizardError::IncompleteForm(invalid)) = wizard.next() else {
            panic!("expected incomplete form");
        };
        let ids: Vec<_> = invalid.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["fullName", "email", "role"]);

        wizard
            .set_field(FormKind::Profile, "email", "not-an-email")
            .unwrap();
        assert!(matches!(
            wizard.invalid_fields().iter().find(|(id, _)| id == "email"),
            Some((_, FieldIssue::Malformed(_)))
        ));
        assert_eq!(wizard.step(), Step::Profile);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut wizard = wizard();
        assert_eq!(
            wizard.set_field(FormKind::Profile, "shoeSize", "44"),
            Err(WizardError::UnknownField("shoeSize".into()))
        );
    }

    #[test]
    fn forward_navigation_tracks_high_water_mark() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        assert_eq!(wizard.step(), Step::Section(Cursor::new(0, 0)));

        let mut previous = wizard.furthest();
        while let Step::Section(cursor) = wizard.step() {
            assert_eq!(wizard.furthest(), cursor);
            answer_first_option(&mut wizard);
            assert!(wizard.furthest() >= previous);
            previous = wizard.furthest();
        }
        assert_eq!(wizard.step(), Step::Wishes);
        assert_eq!(wizard.furthest(), Cursor::new(2, 1));
    }

    #[test]
    fn backward_navigation_keeps_high_water_mark() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        answer_first_option(&mut wizard);
        answer_first_option(&mut wizard);
        assert_eq!(wizard.furthest(), Cursor::new(0, 2));

        wizard.back().unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.step(), Step::Section(Cursor::new(0, 0)));
        assert_eq!(wizard.furthest(), Cursor::new(0, 2));
    }

    #[test]
    fn single_choice_needs_exactly_one_and_multi_at_least_one() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        assert!(!wizard.can_advance());
        assert_eq!(
            wizard.next(),
            Err(WizardError::Unanswered(Cursor::new(0, 0)))
        );

        wizard.select("partial").unwrap();
        wizard.select("full").unwrap();
        assert_eq!(wizard.selection(), ["full".to_string()]);
        assert!(wizard.can_advance());
        wizard.next().unwrap();

        // checkbox question
        assert!(!wizard.can_advance());
        wizard.select("hr-it").unwrap();
        wizard.select("sales-ops").unwrap();
        assert_eq!(
            wizard.selection(),
            ["sales-ops".to_string(), "hr-it".to_string()]
        );
        wizard.select("hr-it").unwrap();
        assert_eq!(wizard.selection(), ["sales-ops".to_string()]);
        assert!(wizard.can_advance());

        assert_eq!(
            wizard.select("bogus"),
            Err(WizardError::UnknownOption("bogus".into()))
        );
    }

    #[test]
    fn reanswering_overwrites_previous_answer() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        wizard.select("none").unwrap();
        wizard.next().unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.selection(), ["none".to_string()]);

        wizard.select("mostly").unwrap();
        wizard.next().unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.selection(), ["mostly".to_string()]);

        let stored = wizard.responses().answer("process", "documented").unwrap();
        assert_eq!(stored.values(), vec!["mostly".to_string()]);
        assert_eq!(stored.score(), 3);
        assert_eq!(wizard.responses().answered_count(), 1);
    }

    #[test]
    fn answers_are_stored_only_on_submit() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        wizard.select("full").unwrap();
        assert!(wizard.responses().sections.is_empty());
        wizard.next().unwrap();
        wizard.select("hr-it").unwrap();
        wizard.back().unwrap();
        assert!(wizard.responses().answer("process", "handoffs").is_none());
    }

    #[test]
    fn back_from_first_question_requires_confirmation() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        answer_first_option(&mut wizard);
        answer_first_option(&mut wizard);
        wizard.jump_to(Cursor::new(0, 0)).unwrap();
        let before = wizard.clone();

        assert_eq!(
            wizard.back(),
            Ok(Transition::ConfirmationRequired(
                Confirmation::RestartAssessment
            ))
        );
        assert_eq!(wizard.next(), Err(WizardError::ConfirmationPending));

        // declining leaves everything untouched
        assert_eq!(wizard.cancel(), Some(Confirmation::RestartAssessment));
        assert_eq!(wizard, before);

        wizard.back().unwrap();
        assert_eq!(wizard.confirm(), Some(Resolution::Restarted));
        assert_eq!(wizard.step(), Step::Organization);
        assert!(wizard.responses().sections.is_empty());
        assert_eq!(wizard.furthest(), Cursor::default());
        assert_eq!(wizard.responses().organization["companyName"], "Engines Ltd");
    }

    #[test]
    fn restart_keeps_bonus_answers() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        while wizard.step().cursor().is_some() {
            answer_first_option(&mut wizard);
        }
        wizard.select("visibility").unwrap();
        wizard.next().unwrap();
        wizard.back().unwrap();
        wizard.jump_to(Cursor::new(0, 0)).unwrap();
        wizard.back().unwrap();
        wizard.confirm().unwrap();

        assert_eq!(wizard.responses().bonus.wishes, vec!["visibility".to_string()]);
    }

    #[test]
    fn jump_is_limited_to_reached_questions() {
        let mut wizard = wizard();
        assert_eq!(
            wizard.jump_to(Cursor::new(0, 0)),
            Err(WizardError::NavigatorUnavailable)
        );

        fill_forms(&mut wizard);
        wizard.select("partial").unwrap();
        wizard.next().unwrap();
        assert_eq!(
            wizard.jump_to(Cursor::new(1, 0)),
            Err(WizardError::BeyondFurthest(Cursor::new(1, 0)))
        );
        assert_eq!(
            wizard.jump_to(Cursor::new(0, 9)),
            Err(WizardError::UnknownQuestion(Cursor::new(0, 9)))
        );

        wizard.jump_to(Cursor::new(0, 0)).unwrap();
        assert_eq!(wizard.selection(), ["partial".to_string()]);
        assert_eq!(wizard.furthest(), Cursor::new(0, 1));
    }

    #[test]
    fn navigator_marks_entry_status() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        assert_eq!(wizard.navigator().len(), 1);

        answer_first_option(&mut wizard);
        answer_first_option(&mut wizard);
        answer_first_option(&mut wizard);
        // now on the first question of section 2
        wizard.jump_to(Cursor::new(0, 1)).unwrap();

        let groups = wizard.navigator();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Process maturity");
        let statuses: Vec<_> = groups[0].entries.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                EntryStatus::Answered,
                EntryStatus::Current,
                EntryStatus::Answered
            ]
        );
        assert_eq!(groups[1].entries.len(), 1);
        assert_eq!(groups[1].entries[0].status, EntryStatus::Unanswered);
    }

    #[test]
    fn progress_is_shown_only_inside_sections() {
        let mut wizard = wizard();
        assert_eq!(wizard.progress(), None);
        fill_forms(&mut wizard);
        assert_eq!(wizard.progress(), Some(0));
        answer_first_option(&mut wizard);
        assert_eq!(wizard.progress(), Some(14));
    }

    #[test]
    fn bonus_lists_are_overwritten_on_submit() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        while wizard.step().cursor().is_some() {
            answer_first_option(&mut wizard);
        }
        assert!(wizard.can_advance());
        wizard.select("scaling").unwrap();
        wizard.select("visibility").unwrap();
        wizard.next().unwrap();
        assert_eq!(
            wizard.responses().bonus.wishes,
            vec!["visibility".to_string(), "scaling".to_string()]
        );

        wizard.select("delays").unwrap();
        wizard.back().unwrap();
        assert_eq!(wizard.responses().bonus.pain, vec!["delays".to_string()]);
        assert_eq!(wizard.step(), Step::Wishes);
        assert_eq!(
            wizard.selection(),
            ["visibility".to_string(), "scaling".to_string()]
        );

        wizard.select("scaling").unwrap();
        wizard.next().unwrap();
        assert_eq!(
            wizard.responses().bonus.wishes,
            vec!["visibility".to_string()]
        );
        assert_eq!(wizard.selection(), ["delays".to_string()]);
    }

    #[test]
    fn completion_scores_and_is_terminal() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        while wizard.step().cursor().is_some() {
            answer_first_option(&mut wizard);
        }
        wizard.next().unwrap();
        let Ok(Transition::Completed(scores)) = wizard.next() else {
            panic!("expected completion");
        };

        // first options: 0 + 1 + 0 | 0 + 2 | 0 + 0
        assert_eq!(scores.total.score, 3);
        assert_eq!(scores.section("data").unwrap().score, 2);
        assert_eq!(wizard.scores(), Some(&scores));
        assert_eq!(wizard.step(), Step::Complete);
        assert!(wizard.navigation_released());

        assert_eq!(wizard.next(), Err(WizardError::Completed));
        assert_eq!(wizard.back(), Err(WizardError::Completed));
        assert_eq!(
            wizard.attempt_exit(ExitAttempt::History),
            GuardDecision::Allow
        );
    }

    #[test]
    fn exit_confirmation_discards_progress() {
        let mut wizard = wizard();
        assert_eq!(
            wizard.attempt_exit(ExitAttempt::History),
            GuardDecision::Allow
        );

        fill_forms(&mut wizard);
        answer_first_option(&mut wizard);
        let link = ExitAttempt::LinkClick {
            href: "/contact".into(),
        };
        assert_eq!(
            wizard.attempt_exit(link.clone()),
            GuardDecision::AwaitConfirmation
        );
        assert_eq!(
            wizard.attempt_exit(ExitAttempt::Unload),
            GuardDecision::NativePrompt
        );

        assert_eq!(wizard.confirm(), Some(Resolution::Leave(link)));
        assert!(wizard.responses().sections.is_empty());
        assert!(wizard.responses().profile.is_empty());
        assert!(wizard.responses().organization.is_empty());
        assert_eq!(wizard.step(), Step::Profile);
        assert_eq!(wizard.furthest(), Cursor::default());
        assert_eq!(
            wizard.attempt_exit(ExitAttempt::FormSubmit {
                form_id: "newsletter".into()
            }),
            GuardDecision::Allow
        );
    }

    #[test]
    fn guard_rearms_after_confirmed_exit() {
        let mut wizard = wizard();
        fill_forms(&mut wizard);
        answer_first_option(&mut wizard);
        let link = ExitAttempt::LinkClick {
            href: "/results".into(),
        };
        assert_eq!(
            wizard.attempt_exit(link.clone()),
            GuardDecision::AwaitConfirmation
        );
        assert_eq!(wizard.confirm(), Some(Resolution::Leave(link.clone())));
        assert!(!wizard.navigation_released());

        fill_forms(&mut wizard);
        answer_first_option(&mut wizard);
        assert!(wizard.is_in_progress());
        assert_eq!(
            wizard.attempt_exit(link),
            GuardDecision::AwaitConfirmation
        );
        assert_eq!(
            wizard.attempt_exit(ExitAttempt::Unload),
            GuardDecision::NativePrompt
        );
    }

    #[test]
    fn window_close_is_held_while_in_progress() {
        let mut wizard = wizard();
        assert!(wizard.request_close());

        fill_forms(&mut wizard);
        answer_first_option(&mut wizard);
        assert!(!wizard.request_close());
        assert_eq!(
            wizard.pending_confirmation(),
            Some(&Confirmation::Exit(ExitAttempt::Unload))
        );

        wizard.cancel();
        assert_eq!(wizard.responses().sections.len(), 1);
        assert!(!wizard.request_close());
        assert_eq!(
            wizard.confirm(),
            Some(Resolution::Leave(ExitAttempt::Unload))
        );
        assert!(wizard.request_close());
    }
}
