use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ResultsVm, SectionScoreVm, map_results};

#[component]
pub fn ResultsView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.assessment();

    let resource = use_resource(move || {
        let service = service.clone();
        async move {
            let results = service
                .load_results()
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(results.map(|results| map_results(&service.dataset(), &results)))
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page results",
            h2 { "Your results" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(None) => rsx! {
                    p { "No completed assessment yet." }
                    Link { class: "btn primary", to: Route::Assessment {}, "Take the assessment" }
                },
                ViewState::Ready(Some(results)) => rsx! {
                    ResultsSummary { results }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn ResultsSummary(results: ResultsVm) -> Element {
    rsx! {
        section { class: "score-total",
            p { class: "score-big", "{results.percentage}%" }
            p { "Total: {results.total} / {results.max}" }
            if let Some(completed_at) = results.completed_at_str.clone() {
                p { class: "completed-at", "Completed {completed_at}" }
            }
        }
        ul { class: "section-scores",
            for section in results.sections {
                SectionScore { key: "{section.name}", section }
            }
        }
        if !results.wishes.is_empty() {
            section { class: "bonus-summary",
                h3 { "What you want" }
                ul {
                    for wish in results.wishes {
                        li { "{wish}" }
                    }
                }
            }
        }
        if !results.pain.is_empty() {
            section { class: "bonus-summary",
                h3 { "What holds you back" }
                ul {
                    for pain in results.pain {
                        li { "{pain}" }
                    }
                }
            }
        }
        Link { class: "btn", to: Route::BookDemo {}, "Book a demo" }
    }
}

#[component]
fn SectionScore(section: SectionScoreVm) -> Element {
    rsx! {
        li { class: "section-score", style: "--section-color: {section.color}",
            span { class: "section-name", "{section.icon} {section.name}" }
            span { class: "section-value", "{section.score} / {section.max} ({section.percentage}%)" }
            div { class: "bar",
                div { class: "bar-fill", style: "width: {section.percentage}%" }
            }
        }
    }
}
