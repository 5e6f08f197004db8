use std::sync::Arc;

use services::{AppServices, AssessmentService, PostalLookupService};

/// What the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn assessment(&self) -> Arc<AssessmentService>;
    fn postal_lookup(&self) -> Arc<PostalLookupService>;
}

impl UiApp for AppServices {
    fn assessment(&self) -> Arc<AssessmentService> {
        AppServices::assessment(self)
    }

    fn postal_lookup(&self) -> Arc<PostalLookupService> {
        AppServices::postal_lookup(self)
    }
}

#[derive(Clone)]
pub struct AppContext {
    assessment: Arc<AssessmentService>,
    postal_lookup: Arc<PostalLookupService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            assessment: app.assessment(),
            postal_lookup: app.postal_lookup(),
        }
    }

    #[must_use]
    pub fn assessment(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessment)
    }

    #[must_use]
    pub fn postal_lookup(&self) -> Arc<PostalLookupService> {
        Arc::clone(&self.postal_lookup)
    }
}

// Provided by the composition root in `crates/app`.

#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
