use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a question inside the assessment sections.
///
/// Ordering is traversal order: section first, then question.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Cursor {
    pub section: usize,
    pub question: usize,
}

impl Cursor {
    #[must_use]
    pub const fn new(section: usize, question: usize) -> Self {
        Self { section, question }
    }

    #[must_use]
    pub const fn is_first(self) -> bool {
        self.section == 0 && self.question == 0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section + 1, self.question + 1)
    }
}

/// Which part of the wizard is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    #[default]
    Profile,
    Organization,
    Section(Cursor),
    Wishes,
    Pain,
    Complete,
}

impl Step {
    #[must_use]
    pub fn cursor(self) -> Option<Cursor> {
        match self {
            Self::Section(cursor) => Some(cursor),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Which of the two form steps a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Profile,
    Organization,
}

/// Which of the two bonus checklists a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusKind {
    Wishes,
    Pain,
}
