use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::context::AppContext;
use crate::views::{
    AssessmentView, BookDemoView, ContactView, GuardedLink, ResultsView, WindowCloseGuard,
    WizardSlot,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", AssessmentView)] Assessment {},
        #[route("/results", ResultsView)] Results {},
        #[route("/contact", ContactView)] Contact {},
        #[route("/book-demo", BookDemoView)] BookDemo {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    use_context_provider(|| WizardSlot(Signal::new(ctx.assessment().start())));

    rsx! {
        div { class: "app",
            WindowCloseGuard {}
            Header {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Header() -> Element {
    rsx! {
        nav { class: "topbar",
            h1 { "Business Assessment" }
            ul {
                li { GuardedLink { to: Route::Assessment {}, label: "Assessment" } }
                li { GuardedLink { to: Route::Results {}, label: "Results" } }
                li { GuardedLink { to: Route::Contact {}, label: "Contact" } }
                li { GuardedLink { to: Route::BookDemo {}, label: "Book a demo" } }
            }
        }
    }
}
