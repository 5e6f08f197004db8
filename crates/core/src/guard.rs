//! One place that decides whether in-progress work may be discarded.
//!
//! Page unloads, history navigation, link clicks, foreign form submissions and
//! the "back to organization" restart all funnel through `NavigationGuard`,
//! which holds the single pending confirmation and the release flag.

use serde::{Deserialize, Serialize};

/// A navigation the host environment is about to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitAttempt {
    /// Tab close or reload. Only a native prompt is possible here.
    Unload,
    /// Browser back/forward. The host replays the history move after confirmation.
    History,
    LinkClick { href: String },
    FormSubmit { form_id: String },
}

/// A question waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confirmation {
    /// Leaving the first question for the organization step wipes section answers.
    RestartAssessment,
    Exit(ExitAttempt),
}

/// What the host should do with an `ExitAttempt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Let the environment show its own leave-page prompt.
    NativePrompt,
    /// Cancel the navigation and show the confirmation dialog.
    AwaitConfirmation,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationGuard {
    released: bool,
    pending: Option<Confirmation>,
}

impl NavigationGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide how to handle `attempt` given whether work is in progress.
    ///
    /// While a confirmation is already pending, further attempts are held
    /// back without replacing it.
    pub fn evaluate(&mut self, attempt: ExitAttempt, in_progress: bool) -> GuardDecision {
        if self.released || !in_progress {
            return GuardDecision::Allow;
        }
        if matches!(attempt, ExitAttempt::Unload) {
            return GuardDecision::NativePrompt;
        }
        if self.pending.is_none() {
            self.pending = Some(Confirmation::Exit(attempt));
        }
        GuardDecision::AwaitConfirmation
    }

    /// Ask for a confirmation. Returns `false` if another one is already open.
    pub fn request(&mut self, confirmation: Confirmation) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(confirmation);
        true
    }

    #[must_use]
    pub fn pending(&self) -> Option<&Confirmation> {
        self.pending.as_ref()
    }

    /// Take the pending confirmation so the caller can act on it.
    pub fn accept(&mut self) -> Option<Confirmation> {
        self.pending.take()
    }

    /// Drop the pending confirmation without acting on it.
    pub fn dismiss(&mut self) -> Option<Confirmation> {
        self.pending.take()
    }

    /// Stop intercepting navigation for the rest of the session.
    pub fn release(&mut self) {
        self.released = true;
        self.pending = None;
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}
