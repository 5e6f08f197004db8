use assess_core::model::FormKind;
use assess_core::wizard::Wizard;

use super::test_harness::{
    ViewKind, setup_view_harness, setup_view_harness_with_wizard, test_services,
};

fn past_forms(mut wizard: Wizard) -> Wizard {
    wizard.set_field(FormKind::Profile, "fullName", "Ada Lovelace").unwrap();
    wizard.set_field(FormKind::Profile, "email", "ada@example.com").unwrap();
    wizard.set_field(FormKind::Profile, "role", "founder").unwrap();
    wizard.next().unwrap();
    wizard.set_field(FormKind::Organization, "companyName", "Analytical").unwrap();
    wizard.set_field(FormKind::Organization, "companySize", "1-10").unwrap();
    wizard.next().unwrap();
    wizard
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_opens_on_profile_form() {
    let mut harness = setup_view_harness(ViewKind::Assessment);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("About you"), "missing step label in {html}");
    assert!(html.contains("Work email"), "missing field in {html}");
    assert!(!html.contains("Back"), "profile step shows back in {html}");
    assert!(!html.contains("field-error"), "untouched form shows errors in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_renders_question_hint_and_navigator() {
    let services = test_services();
    let wizard = past_forms(services.assessment().start());
    let mut harness = setup_view_harness_with_wizard(ViewKind::Assessment, services, wizard);
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("How are your core processes documented?"),
        "missing question in {html}"
    );
    assert!(html.contains("<strong>order to cash</strong>"), "missing hint in {html}");
    assert!(html.contains("question-navigator"), "missing navigator in {html}");
    assert!(html.contains("0% complete"), "missing progress in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn assessment_view_shows_restart_dialog() {
    let services = test_services();
    let mut wizard = past_forms(services.assessment().start());
    wizard.back().unwrap();
    let mut harness = setup_view_harness_with_wizard(ViewKind::Assessment, services, wizard);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Start over?"), "missing dialog in {html}");
    assert!(html.contains("Clear answers"), "missing confirm button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn held_window_close_shows_leave_dialog() {
    let services = test_services();
    let mut wizard = past_forms(services.assessment().start());
    let first = wizard.current_question().unwrap().options[0].value.clone();
    wizard.select(&first).unwrap();
    wizard.next().unwrap();
    assert!(!wizard.request_close());
    let mut harness = setup_view_harness_with_wizard(ViewKind::Assessment, services, wizard);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Leave the assessment?"), "missing dialog in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_without_handoff_prompts_for_assessment() {
    let mut harness = setup_view_harness(ViewKind::Results);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No completed assessment yet."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_lists_section_scores() {
    let services = test_services();
    let service = services.assessment();
    let mut wizard = past_forms(service.start());
    let total = wizard.dataset().total_questions();
    for _ in 0..total {
        let best = wizard
            .current_question()
            .unwrap()
            .options
            .last()
            .unwrap()
            .value
            .clone();
        wizard.select(&best).unwrap();
        service.advance(&mut wizard).await.unwrap();
    }
    wizard.select("scaling").unwrap();
    service.advance(&mut wizard).await.unwrap();
    service.advance(&mut wizard).await.unwrap();

    let mut harness = setup_view_harness_with_wizard(ViewKind::Results, services, wizard);
    harness.rebuild();
    harness.drive_async().await;
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Process maturity"), "missing section in {html}");
    assert!(html.contains("Total:"), "missing total in {html}");
    assert!(
        html.contains("Processes that scale with the team"),
        "missing wish in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn book_demo_view_renders_address_block() {
    let mut harness = setup_view_harness(ViewKind::BookDemo);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Postal code"), "missing postal field in {html}");
    assert!(html.contains("District:"), "missing lookup fields in {html}");
    assert!(!html.contains("Looking up"), "idle form shows lookup in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn contact_view_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Contact);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Contact us"), "missing title in {html}");
    assert!(html.contains("Message"), "missing message field in {html}");
}
