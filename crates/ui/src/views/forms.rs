use std::collections::HashMap;

use assess_core::validation::{
    ContactForm, DemoBookingForm, FeedbackUpdate, FieldFeedback, FieldIssue, FormError,
};
use dioxus::prelude::*;

use crate::context::AppContext;

type Updates = HashMap<&'static str, FeedbackUpdate>;

fn issues(result: Result<(), FormError>) -> Vec<(&'static str, FieldIssue)> {
    match result {
        Ok(()) => Vec::new(),
        Err(FormError::Invalid(invalid)) => invalid,
        Err(_) => Vec::new(),
    }
}

/// Re-validate one field and record the outcome for display.
fn touch(
    invalid: &[(&'static str, FieldIssue)],
    field: &'static str,
    feedback: &mut FieldFeedback,
    updates: &mut Updates,
) {
    let result = invalid
        .iter()
        .find(|(name, _)| *name == field)
        .map_or(Ok(()), |(_, issue)| Err(issue.clone()));
    updates.insert(field, feedback.record(field, &result));
}

#[component]
fn FeedbackInput(
    name: &'static str,
    label: &'static str,
    input_type: &'static str,
    value: String,
    update: Option<FeedbackUpdate>,
    on_input: Callback<(&'static str, String)>,
    #[props(default)] disabled: bool,
) -> Element {
    let class = match &update {
        Some(FeedbackUpdate { valid: false, shake: true, .. }) => "field invalid shake",
        Some(FeedbackUpdate { valid: false, .. }) => "field invalid",
        Some(_) => "field valid",
        None => "field",
    };
    let message = update.and_then(|update| update.message);

    rsx! {
        div { class,
            label { r#for: name, "{label}" }
            if input_type == "textarea" {
                textarea {
                    id: name,
                    value: "{value}",
                    oninput: move |evt| on_input.call((name, evt.value())),
                }
            } else {
                input {
                    id: name,
                    r#type: input_type,
                    value: "{value}",
                    disabled,
                    oninput: move |evt| on_input.call((name, evt.value())),
                }
            }
            if let Some(message) = message {
                p { class: "field-error", "{message}" }
            }
        }
    }
}

#[component]
pub fn ContactView() -> Element {
    let mut form = use_signal(ContactForm::default);
    let mut feedback = use_signal(FieldFeedback::new);
    let mut updates = use_signal(Updates::new);
    let mut sent = use_signal(|| false);

    let on_input = use_callback(move |(field, value): (&'static str, String)| {
        {
            let mut form = form.write();
            match field {
                "name" => form.name = value,
                "email" => form.email = value,
                "phone" => form.phone = value,
                "message" => form.message = value,
                _ => return,
            }
        }
        let invalid = issues(form.read().validate());
        touch(&invalid, field, &mut feedback.write(), &mut updates.write());
    });
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let invalid = issues(form.read().validate());
        if invalid.is_empty() {
            sent.set(true);
            return;
        }
        for (field, _) in &invalid {
            touch(&invalid, *field, &mut feedback.write(), &mut updates.write());
        }
    };

    let current = form.cloned();
    let update = |field: &str| updates.read().get(field).cloned();

    rsx! {
        div { class: "page contact",
            h2 { "Contact us" }
            if sent() {
                p { class: "success", "Thanks, we will get back to you shortly." }
            } else {
                form { onsubmit: on_submit,
                    FeedbackInput { name: "name", label: "Name", input_type: "text", value: current.name, update: update("name"), on_input }
                    FeedbackInput { name: "email", label: "Email", input_type: "email", value: current.email, update: update("email"), on_input }
                    FeedbackInput { name: "phone", label: "Phone", input_type: "tel", value: current.phone, update: update("phone"), on_input }
                    FeedbackInput { name: "message", label: "Message", input_type: "textarea", value: current.message, update: update("message"), on_input }
                    button { class: "btn primary", r#type: "submit", "Send" }
                }
            }
        }
    }
}

#[component]
pub fn BookDemoView() -> Element {
    let ctx = use_context::<AppContext>();
    let postal_lookup = ctx.postal_lookup();

    let mut form = use_signal(DemoBookingForm::default);
    let mut feedback = use_signal(FieldFeedback::new);
    let mut updates = use_signal(Updates::new);
    let mut booked = use_signal(|| false);
    let mut lookup_task = use_signal(|| None::<Task>);
    let mut lookup_pending = use_signal(|| false);

    let on_input = use_callback(move |(field, value): (&'static str, String)| {
        let lookup_code = {
            let mut form = form.write();
            match field {
                "name" => form.name = value,
                "email" => form.email = value,
                "phone" => form.phone = value,
                "company" => form.company = value,
                "address" => form.address.address = value,
                "postal_code" => {
                    form.address.postal_code = value;
                    form.address.postal_code_valid = false;
                }
                _ => return,
            }
            (field == "postal_code").then(|| form.address.postal_code.trim().to_owned())
        };

        if lookup_code.is_some()
            && let Some(task) = lookup_task.take()
        {
            task.cancel();
            lookup_pending.set(false);
        }

        match lookup_code {
            Some(code) if code.len() == 6 => {
                let postal_lookup = postal_lookup.clone();
                lookup_pending.set(true);
                let task = spawn(async move {
                    let result = postal_lookup.lookup(&code).await;
                    let applied = form.write().address.apply_lookup(&code, result);
                    lookup_pending.set(false);
                    lookup_task.set(None);
                    if applied {
                        let invalid = issues(form.read().validate());
                        touch(&invalid, "postal_code", &mut feedback.write(), &mut updates.write());
                    }
                });
                lookup_task.set(Some(task));
            }
            _ => {
                let invalid = issues(form.read().validate());
                touch(&invalid, field, &mut feedback.write(), &mut updates.write());
            }
        }
    });
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let invalid = issues(form.read().validate());
        if invalid.is_empty() {
            booked.set(true);
            return;
        }
        for (field, _) in &invalid {
            touch(&invalid, *field, &mut feedback.write(), &mut updates.write());
        }
    };

    let current = form.cloned();
    let update = |field: &str| updates.read().get(field).cloned();
    let address = current.address.clone();

    rsx! {
        div { class: "page book-demo",
            h2 { "Book a demo" }
            if booked() {
                p { class: "success", "Thanks, your demo request is in." }
            } else {
                form { onsubmit: on_submit,
                    FeedbackInput { name: "name", label: "Name", input_type: "text", value: current.name, update: update("name"), on_input }
                    FeedbackInput { name: "email", label: "Email", input_type: "email", value: current.email, update: update("email"), on_input }
                    FeedbackInput { name: "phone", label: "Phone", input_type: "tel", value: current.phone, update: update("phone"), on_input }
                    FeedbackInput { name: "company", label: "Company", input_type: "text", value: current.company, update: update("company"), on_input }
                    FeedbackInput { name: "address", label: "Address", input_type: "text", value: address.address, update: update("address"), on_input }
                    FeedbackInput { name: "postal_code", label: "Postal code", input_type: "text", value: address.postal_code, update: update("postal_code"), on_input, disabled: lookup_pending() }
                    if lookup_pending() {
                        p { class: "lookup-working", "Looking up postal code..." }
                    }
                    div { class: "lookup-fields",
                        p { "District: {address.district}" }
                        p { "State: {address.state}" }
                        p { "Country: {address.country}" }
                    }
                    button { class: "btn primary", r#type: "submit", "Request demo" }
                }
            }
        }
    }
}
