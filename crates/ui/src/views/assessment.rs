use assess_core::guard::{ExitAttempt, GuardDecision};
use assess_core::model::{Cursor, FieldKind, FormKind};
use assess_core::wizard::{Resolution, Transition, Wizard, WizardError};
use dioxus::desktop::tao::event::{Event, WindowEvent};
use dioxus::desktop::{use_wry_event_handler, window};
use dioxus::prelude::*;
use dioxus_router::{Navigator, use_navigator};
use services::AssessmentServiceError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{
    BonusVm, ConfirmVm, ControlsVm, FieldVm, FormVm, NavGroupVm, QuestionVm, StepVm, map_wizard,
};

/// The wizard shared by the assessment page and the guarded header links.
#[derive(Clone, Copy)]
pub struct WizardSlot(pub Signal<Wizard>);

fn follow(navigator: Navigator, resolution: Option<Resolution>) {
    match resolution {
        Some(Resolution::Leave(ExitAttempt::LinkClick { href })) => {
            if let Ok(route) = href.parse::<Route>() {
                navigator.push(route);
            }
        }
        Some(Resolution::Leave(ExitAttempt::Unload)) => window().close(),
        _ => {}
    }
}

#[component]
pub fn AssessmentView() -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.assessment();
    let navigator = use_navigator();
    let WizardSlot(mut wizard) = use_context::<WizardSlot>();
    let mut reveal_errors = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let vm = map_wizard(&wizard.read(), reveal_errors());

    let on_next = {
        let service = service.clone();
        move |_: MouseEvent| {
            let service = service.clone();
            spawn(async move {
                let mut draft = (*wizard.peek()).clone();
                match service.advance(&mut draft).await {
                    Ok(transition) => {
                        wizard.set(draft);
                        reveal_errors.set(false);
                        error.set(None);
                        if matches!(transition, Transition::Completed(_)) {
                            navigator.push(Route::Results {});
                        }
                    }
                    Err(AssessmentServiceError::Wizard(WizardError::IncompleteForm(_))) => {
                        reveal_errors.set(true);
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        }
    };
    let on_back = move |_: MouseEvent| {
        if let Err(err) = wizard.write().back() {
            error.set(Some(err.to_string()));
        }
    };
    let on_field = move |(kind, id, value): (FormKind, String, String)| {
        if let Err(err) = wizard.write().set_field(kind, &id, value) {
            error.set(Some(err.to_string()));
        }
    };
    let on_select = move |value: String| {
        if let Err(err) = wizard.write().select(&value) {
            error.set(Some(err.to_string()));
        }
    };
    let on_jump = move |cursor: Cursor| {
        if let Err(err) = wizard.write().jump_to(cursor) {
            error.set(Some(err.to_string()));
        }
    };
    let on_confirm = move |()| {
        let resolution = wizard.write().confirm();
        reveal_errors.set(false);
        follow(navigator, resolution);
    };
    let on_cancel = move |()| {
        wizard.write().cancel();
    };
    let on_restart = move |_: MouseEvent| {
        wizard.set(service.start());
        reveal_errors.set(false);
        error.set(None);
    };

    rsx! {
        div { class: "page assessment",
            header { class: "assessment-header",
                h2 { "{vm.step_label}" }
                if let Some(progress) = vm.progress {
                    div { class: "progress",
                        div { class: "progress-fill", style: "width: {progress}%" }
                        span { class: "progress-label", "{progress}% complete" }
                    }
                }
            }

            if let Some(message) = error() {
                p { class: "error-banner", "{message}" }
            }

            div { class: "assessment-body",
                if !vm.navigator.is_empty() {
                    QuestionNavigator { groups: vm.navigator.clone(), on_jump }
                }
                div { class: "step",
                    match vm.body.clone() {
                        StepVm::Form(form) => rsx! { FormStep { form, on_field } },
                        StepVm::Question(question) => rsx! { QuestionStep { question, on_select } },
                        StepVm::Bonus(bonus) => rsx! { BonusStep { bonus, on_select } },
                        StepVm::Complete => rsx! {
                            div { class: "complete",
                                h3 { "Assessment complete" }
                                p { "Your results are ready." }
                                button {
                                    class: "btn primary",
                                    r#type: "button",
                                    onclick: move |_| {
                                        navigator.push(Route::Results {});
                                    },
                                    "View results"
                                }
                                button {
                                    class: "btn",
                                    r#type: "button",
                                    onclick: on_restart,
                                    "Start a new assessment"
                                }
                            }
                        },
                    }
                    if vm.body != StepVm::Complete {
                        StepControls { controls: vm.controls.clone(), on_back, on_next }
                    }
                }
            }

            if let Some(confirm) = vm.confirm.clone() {
                ConfirmDialog { confirm, on_cancel, on_confirm }
            }
        }
    }
}

#[component]
fn FormStep(form: FormVm, on_field: Callback<(FormKind, String, String)>) -> Element {
    let kind = form.kind;
    rsx! {
        section { class: "form-step",
            h3 { "{form.title}" }
            if !form.subtitle.is_empty() {
                p { class: "subtitle", "{form.subtitle}" }
            }
            for field in form.fields {
                FormFieldInput { key: "{field.id}", kind, field, on_field }
            }
        }
    }
}

#[component]
fn FormFieldInput(
    kind: FormKind,
    field: FieldVm,
    on_field: Callback<(FormKind, String, String)>,
) -> Element {
    let id = field.id.clone();
    let emit = move |value: String| on_field.call((kind, id.clone(), value));
    let class = if field.error.is_some() {
        "field invalid"
    } else {
        "field"
    };

    rsx! {
        div { class,
            label { r#for: "{field.id}",
                "{field.label}"
                if field.required {
                    span { class: "required", " *" }
                }
            }
            match field.kind {
                FieldKind::Radio => rsx! {
                    div { class: "radio-group",
                        for (value, label) in field.options.clone() {
                            label { key: "{value}", class: "radio",
                                input {
                                    r#type: "radio",
                                    name: "{field.id}",
                                    value: "{value}",
                                    checked: field.value == value,
                                    onchange: {
                                        let emit = emit.clone();
                                        let value = value.clone();
                                        move |_| emit(value.clone())
                                    },
                                }
                                "{label}"
                            }
                        }
                    }
                },
                FieldKind::Select => rsx! {
                    select {
                        id: "{field.id}",
                        value: "{field.value}",
                        onchange: move |evt| emit(evt.value()),
                        option { value: "", "Choose..." }
                        for (value, label) in field.options.clone() {
                            option { key: "{value}", value: "{value}", selected: field.value == value, "{label}" }
                        }
                    }
                },
                FieldKind::Textarea => rsx! {
                    textarea {
                        id: "{field.id}",
                        placeholder: "{field.placeholder}",
                        value: "{field.value}",
                        oninput: move |evt| emit(evt.value()),
                    }
                },
                _ => rsx! {
                    input {
                        id: "{field.id}",
                        r#type: field.input_type,
                        placeholder: "{field.placeholder}",
                        value: "{field.value}",
                        oninput: move |evt| emit(evt.value()),
                    }
                },
            }
            if let Some(message) = field.error.clone() {
                p { class: "field-error", "{message}" }
            }
        }
    }
}

#[component]
fn QuestionStep(question: QuestionVm, on_select: Callback<String>) -> Element {
    rsx! {
        section {
            class: "question-step",
            style: "--section-color: {question.section_color}; background: {question.gradient}",
            p { class: "section-name", "{question.section_icon} {question.section_name}" }
            h3 { "{question.text}" }
            if !question.hint_html.is_empty() {
                div { class: "hint", dangerous_inner_html: "{question.hint_html}" }
            }
            if question.multi {
                p { class: "multi-note", "Select all that apply." }
            }
            div { class: "choices",
                for choice in question.choices {
                    button {
                        key: "{choice.value}",
                        class: if choice.selected { "choice selected" } else { "choice" },
                        r#type: "button",
                        onclick: {
                            let value = choice.value.clone();
                            move |_| on_select.call(value.clone())
                        },
                        "{choice.label}"
                    }
                }
            }
        }
    }
}

#[component]
fn BonusStep(bonus: BonusVm, on_select: Callback<String>) -> Element {
    rsx! {
        section { class: "bonus-step", style: "--section-color: {bonus.color}",
            h3 { "{bonus.icon} {bonus.title}" }
            p { class: "multi-note", "Optional. Select any that apply." }
            div { class: "choices",
                for choice in bonus.choices {
                    button {
                        key: "{choice.value}",
                        class: if choice.selected { "choice selected" } else { "choice" },
                        r#type: "button",
                        onclick: {
                            let value = choice.value.clone();
                            move |_| on_select.call(value.clone())
                        },
                        "{choice.label}"
                    }
                }
            }
        }
    }
}

#[component]
fn StepControls(
    controls: ControlsVm,
    on_back: EventHandler<MouseEvent>,
    on_next: EventHandler<MouseEvent>,
) -> Element {
    rsx! {
        div { class: "step-controls",
            if controls.show_back {
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |evt| on_back.call(evt),
                    "Back"
                }
            }
            button {
                class: "btn primary",
                r#type: "button",
                disabled: !controls.can_advance,
                onclick: move |evt| on_next.call(evt),
                "{controls.next_label}"
            }
        }
    }
}

#[component]
fn QuestionNavigator(groups: Vec<NavGroupVm>, on_jump: Callback<Cursor>) -> Element {
    rsx! {
        nav { class: "question-navigator",
            for group in groups {
                div { class: "nav-group", style: "--section-color: {group.color}",
                    p { class: "nav-group-name", "{group.icon} {group.name}" }
                    ul {
                        for entry in group.entries {
                            li {
                                key: "{entry.cursor}",
                                button {
                                    class: entry.class,
                                    r#type: "button",
                                    onclick: move |_| on_jump.call(entry.cursor),
                                    "{entry.label}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ConfirmDialog(confirm: ConfirmVm, on_cancel: Callback<()>, on_confirm: Callback<()>) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            onclick: move |_| on_cancel.call(()),
            div {
                class: "modal",
                onclick: move |evt| evt.stop_propagation(),
                h3 { class: "modal-title", "{confirm.title}" }
                p { class: "modal-body", "{confirm.message}" }
                div { class: "modal-actions",
                    button {
                        class: "btn",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn danger",
                        r#type: "button",
                        onclick: move |_| on_confirm.call(()),
                        "{confirm.confirm_label}"
                    }
                }
            }
        }
    }
}

/// Header link that routes through the wizard's navigation guard.
#[component]
pub fn GuardedLink(to: Route, label: &'static str) -> Element {
    let WizardSlot(mut wizard) = use_context::<WizardSlot>();
    let navigator = use_navigator();

    rsx! {
        a {
            href: "{to}",
            onclick: move |evt| {
                evt.prevent_default();
                let attempt = ExitAttempt::LinkClick { href: to.to_string() };
                if wizard.write().attempt_exit(attempt) == GuardDecision::Allow {
                    navigator.push(to.clone());
                }
            },
            "{label}"
        }
    }
}

/// Holds a window close while an assessment is in progress and asks instead.
#[component]
pub fn WindowCloseGuard() -> Element {
    let WizardSlot(mut wizard) = use_context::<WizardSlot>();
    let desktop = window();

    use_wry_event_handler(move |event, _| {
        let Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            window_id,
            ..
        } = event
        else {
            return;
        };
        if *window_id != desktop.id() {
            return;
        }
        if wizard.write().request_close() {
            desktop.close();
        } else {
            // Closing only hides the window; bring it back for the dialog.
            let desktop = desktop.clone();
            spawn(async move { desktop.set_visible(true) });
        }
    });

    rsx! {}
}
