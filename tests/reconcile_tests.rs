mod common;

use std::time::Duration;

use common::utils::{engine, login_page, password_input, password_only_page, text_input};

use form_overlay::dom::element::InputHandle;
use form_overlay::dom::page::PageDom;
use form_overlay::dom::scanner::{DomFormScanner, FormScanner, LoginForm};
use form_overlay::engine::events::DomEvent;
use form_overlay::observe::reconcile::reconcile;
use form_overlay::observe::registry::ObservationRegistry;
use form_overlay::observe::throttle::Throttle;
use form_overlay::overlay::controller::OverlayState;
use form_overlay::overlay::surface::OverlayConfig;

/// Scanner returning a fixed form list, for driving reconciliation with
/// hand-picked scan orders.
struct FixedScanner(Vec<LoginForm>);

impl FormScanner for FixedScanner {
    fn scan(&self, _page: &PageDom) -> Vec<LoginForm> {
        self.0.clone()
    }
}

// =========================================================================
// Reconciliation core properties
// =========================================================================

#[test]
fn second_run_without_dom_change_is_noop() {
    let (mut page, _, _) = login_page("https://example.com/login");
    let mut registry = ObservationRegistry::new();
    let config = OverlayConfig::default();

    let first = reconcile(&mut page, &mut registry, &DomFormScanner, &config);
    assert_eq!(first.registered, 2, "Username and password get observed");
    assert_eq!(first.unregistered, 0);

    let second = reconcile(&mut page, &mut registry, &DomFormScanner, &config);
    assert!(
        second.is_noop(),
        "Idempotence: an unchanged DOM causes zero register/unregister"
    );
    assert_eq!(registry.len(), 2);
}

#[test]
fn reorder_of_same_inputs_causes_no_churn() {
    let mut page = PageDom::new("https://example.com/login");
    let first = password_input("first");
    let second = password_input("second");
    let form_a = page.add_form();
    page.append_input(form_a, first.clone());
    let form_b = page.add_form();
    page.append_input(form_b, second.clone());

    let form_of = |password: &InputHandle| LoginForm {
        username_input: None,
        password_input: password.clone(),
    };

    let mut registry = ObservationRegistry::new();
    let config = OverlayConfig::default();

    let forward = FixedScanner(vec![form_of(&first), form_of(&second)]);
    reconcile(&mut page, &mut registry, &forward, &config);

    // Open an overlay so a rebuild would be observable as a close.
    registry
        .controller_mut(&first)
        .expect("controller")
        .on_focus(&mut page);

    let reversed = FixedScanner(vec![form_of(&second), form_of(&first)]);
    let outcome = reconcile(&mut page, &mut registry, &reversed, &config);

    assert!(outcome.is_noop(), "Scan order must not cause churn");
    assert_eq!(
        registry.controller(&first).map(|c| c.state()),
        Some(OverlayState::Open),
        "Surviving controllers keep their state across reorder"
    );
}

#[test]
fn vanished_input_is_unregistered_alone() {
    let mut page = PageDom::new("https://example.com/login");
    let (username, password) = {
        let username = text_input("username");
        let password = password_input("password");
        let form = page.add_form();
        page.append_input(form, username.clone());
        page.append_input(form, password.clone());
        (username, password)
    };
    let extra = password_input("extra");
    let form_b = page.add_form();
    page.append_input(form_b, extra.clone());

    let mut registry = ObservationRegistry::new();
    let config = OverlayConfig::default();
    let first = reconcile(&mut page, &mut registry, &DomFormScanner, &config);
    assert_eq!(first.registered, 3);

    registry
        .controller_mut(&username)
        .expect("controller")
        .on_focus(&mut page);

    page.remove_input(&extra);
    let outcome = reconcile(&mut page, &mut registry, &DomFormScanner, &config);

    assert_eq!(outcome.unregistered, 1, "Exactly the vanished input goes");
    assert_eq!(outcome.registered, 0, "Survivors are not re-registered");
    assert!(!registry.contains(&extra));
    assert!(registry.contains(&username));
    assert!(registry.contains(&password));
    assert_eq!(
        registry.controller(&username).map(|c| c.state()),
        Some(OverlayState::Open),
        "Surviving controller instances are untouched"
    );
}

#[test]
fn empty_scan_unregisters_everything() {
    let (mut page, _, _) = login_page("https://example.com/login");
    let mut registry = ObservationRegistry::new();
    let config = OverlayConfig::default();

    reconcile(&mut page, &mut registry, &DomFormScanner, &config);
    assert_eq!(registry.len(), 2);

    // No forms is the normal empty case, not an error.
    let outcome = reconcile(&mut page, &mut registry, &FixedScanner(vec![]), &config);
    assert_eq!(outcome.unregistered, 2);
    assert!(registry.is_empty());
}

// =========================================================================
// Throttle
// =========================================================================

#[test]
fn throttle_fires_once_per_window_trailing_edge() {
    let mut throttle = Throttle::new(Duration::from_millis(100));
    let ms = Duration::from_millis;

    assert!(!throttle.poll(ms(0)), "Nothing requested, nothing fires");

    throttle.request(ms(10));
    assert!(throttle.pending());
    assert!(!throttle.poll(ms(50)), "Window not elapsed yet");

    // A burst of further requests coalesces into the armed deadline.
    throttle.request(ms(60));
    throttle.request(ms(90));

    assert!(throttle.poll(ms(110)), "Fires once the window elapsed");
    assert!(!throttle.poll(ms(120)), "Armed deadline fires at most once");
    assert!(!throttle.pending());

    throttle.request(ms(200));
    assert!(throttle.poll(ms(300)), "A later request re-arms the gate");
}

// =========================================================================
// Engine trigger policy
// =========================================================================

#[test]
fn attach_reconciles_eagerly() {
    let (page, _, _) = login_page("https://example.com/login");
    let engine = engine(page);

    assert_eq!(
        engine.registry().len(),
        2,
        "Forms present at startup are observed without waiting for a mutation"
    );
}

#[test]
fn mutations_reconcile_after_the_throttle_window() {
    let (page, password) = password_only_page("https://example.com/login");
    let mut engine = engine(page);
    let ms = Duration::from_millis;

    let late = password_input("late");
    let form = engine.page_mut().add_form();
    engine.page_mut().append_input(form, late.clone());

    engine.notify_mutation(ms(0));
    assert!(
        engine.tick(ms(10)).is_none(),
        "Still inside the throttle window"
    );
    assert!(!engine.registry().contains(&late));

    let outcome = engine.tick(ms(150)).expect("run after window");
    assert_eq!(outcome.registered, 1);
    assert!(engine.registry().contains(&late));
    assert!(engine.registry().contains(&password));

    // Torn-down observers stop reacting: remove and reconcile, then poke.
    engine.page_mut().remove_input(&late);
    engine.notify_mutation(ms(200));
    engine.tick(ms(400)).expect("second run");
    assert!(!engine.registry().contains(&late));

    engine.dispatch(&late, DomEvent::Focus);
    assert_eq!(
        engine.page().surface_count(),
        0,
        "Events for unobserved inputs do nothing"
    );
}
