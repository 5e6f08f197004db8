mod assessment;
mod forms;
mod results;
mod state;

pub use assessment::{AssessmentView, GuardedLink, WindowCloseGuard, WizardSlot};
pub use forms::{BookDemoView, ContactView};
pub use results::ResultsView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
