use dioxus::prelude::*;
use services::AssessmentServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// Local storage could not be read.
    Storage,
    /// Stored entries exist but do not parse.
    Corrupt,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Storage => "Saved data could not be read. Please try again.",
            Self::Corrupt => "Saved results are damaged. Please take the assessment again.",
        }
    }
}

impl From<AssessmentServiceError> for ViewError {
    fn from(err: AssessmentServiceError) -> Self {
        match err {
            AssessmentServiceError::Malformed(_) | AssessmentServiceError::Timestamp(_) => {
                Self::Corrupt
            }
            _ => Self::Storage,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Loading,
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
