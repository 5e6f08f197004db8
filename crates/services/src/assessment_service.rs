use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use assess_core::model::{AssessmentDataset, Responses, ScoreBreakdown};
use assess_core::wizard::{Transition, Wizard};
use storage::repository::KeyValueStore;

use crate::Clock;
use crate::error::AssessmentServiceError;

pub const RESPONSES_KEY: &str = "assessmentResponses";
pub const SCORES_KEY: &str = "assessmentScores";
pub const COMPLETED_AT_KEY: &str = "assessmentCompletedAt";

/// Snapshot handed from the assessment page to the results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentResults {
    pub responses: Responses,
    pub scores: ScoreBreakdown,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Starts wizards and persists their results when they complete.
#[derive(Clone)]
pub struct AssessmentService {
    clock: Clock,
    dataset: Arc<AssessmentDataset>,
    local: Arc<dyn KeyValueStore>,
}

impl AssessmentService {
    #[must_use]
    pub fn new(clock: Clock, dataset: Arc<AssessmentDataset>, local: Arc<dyn KeyValueStore>) -> Self {
        Self {
            clock,
            dataset,
            local,
        }
    }

    #[must_use]
    pub fn dataset(&self) -> Arc<AssessmentDataset> {
        Arc::clone(&self.dataset)
    }

    /// A fresh wizard on the profile step.
    #[must_use]
    pub fn start(&self) -> Wizard {
        Wizard::new(Arc::clone(&self.dataset))
    }

    /// Advance `wizard`, persisting the handoff when the assessment completes.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError::Wizard` if the step guard blocks and
    /// `AssessmentServiceError::Storage` if the results cannot be written.
    pub async fn advance(&self, wizard: &mut Wizard) -> Result<Transition, AssessmentServiceError> {
        let transition = wizard.next()?;
        if let Transition::Completed(scores) = &transition {
            self.save_results(wizard.responses(), scores).await?;
        }
        Ok(transition)
    }

    /// Write responses, scores and the completion time to local storage.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError` if serialization or storage fails.
    pub async fn save_results(
        &self,
        responses: &Responses,
        scores: &ScoreBreakdown,
    ) -> Result<DateTime<Utc>, AssessmentServiceError> {
        let completed_at = self.clock.now();
        self.local
            .set_item(RESPONSES_KEY, &serde_json::to_string(responses)?)
            .await?;
        self.local
            .set_item(SCORES_KEY, &serde_json::to_string(scores)?)
            .await?;
        self.local
            .set_item(COMPLETED_AT_KEY, &completed_at.to_rfc3339())
            .await?;
        info!(
            score = scores.total.score,
            max = scores.total.max_possible,
            "assessment completed"
        );
        Ok(completed_at)
    }

    /// Read the last completed assessment, if any.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError::Malformed` or
    /// `AssessmentServiceError::Timestamp` for entries that do not parse.
    pub async fn load_results(&self) -> Result<Option<AssessmentResults>, AssessmentServiceError> {
        let Some(responses) = self.local.get_item(RESPONSES_KEY).await? else {
            return Ok(None);
        };
        let Some(scores) = self.local.get_item(SCORES_KEY).await? else {
            return Ok(None);
        };
        let completed_at = self
            .local
            .get_item(COMPLETED_AT_KEY)
            .await?
            .map(|raw| DateTime::parse_from_rfc3339(&raw).map(|at| at.with_timezone(&Utc)))
            .transpose()?;

        Ok(Some(AssessmentResults {
            responses: serde_json::from_str(&responses)?,
            scores: serde_json::from_str(&scores)?,
            completed_at,
        }))
    }

    /// Forget the stored handoff.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentServiceError::Storage` if the entries cannot be removed.
    pub async fn clear_results(&self) -> Result<(), AssessmentServiceError> {
        for key in [RESPONSES_KEY, SCORES_KEY, COMPLETED_AT_KEY] {
            self.local.remove_item(key).await?;
        }
        Ok(())
    }
}
