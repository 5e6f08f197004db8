use std::sync::Arc;

use assess_core::time::fixed_clock;
use assess_core::wizard::Wizard;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, HttpFetcher, SiteConfig};
use storage::repository::Storage;

use crate::context::{UiApp, build_app_context};
use crate::views::{AssessmentView, BookDemoView, ContactView, ResultsView, WizardSlot};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Assessment,
    Results,
    Contact,
    BookDemo,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<AppServices>,
    view: ViewKind,
    wizard: Wizard,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    use_context_provider(|| WizardSlot(Signal::new(props.wizard.clone())));
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Assessment => rsx! { AssessmentView {} },
        ViewKind::Results => rsx! { ResultsView {} },
        ViewKind::Contact => rsx! { ContactView {} },
        ViewKind::BookDemo => rsx! { BookDemoView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn test_services() -> Arc<AppServices> {
    let services = AppServices::from_storage(
        &SiteConfig::default(),
        fixed_clock(),
        Storage::in_memory(),
        Arc::new(HttpFetcher::new()),
    )
    .expect("services");
    Arc::new(services)
}

/// Mount `view` with the given wizard state already in place.
pub fn setup_view_harness_with_wizard(
    view: ViewKind,
    services: Arc<AppServices>,
    wizard: Wizard,
) -> ViewHarness {
    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: services,
            view,
            wizard,
        },
    );
    ViewHarness { dom }
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    let services = test_services();
    let wizard = services.assessment().start();
    setup_view_harness_with_wizard(view, services, wizard)
}
