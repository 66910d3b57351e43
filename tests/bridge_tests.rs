mod common;

use common::utils::{engine, login_page, password_input, password_only_page};

use form_overlay::bridge::dispatch::{self, BridgeError};
use form_overlay::bridge::protocol::PageCommand;
use form_overlay::dom::fill::FillError;
use form_overlay::dom::page::PageDom;
use form_overlay::dom::scanner::LoginForm;
use form_overlay::engine::events::DomEvent;
use form_overlay::observe::registry::ObservationRegistry;
use form_overlay::overlay::controller::OverlayState;
use form_overlay::overlay::surface::OverlayConfig;

fn fill(username: &str, password: &str) -> PageCommand {
    PageCommand::FillPassword {
        username: username.to_string(),
        password: password.to_string(),
    }
}

// =========================================================================
// Delivery to the open overlay
// =========================================================================

#[test]
fn fill_lands_in_the_open_overlay_and_dismisses_it() {
    let (page, username, password) = login_page("https://example.com/login");
    let mut engine = engine(page);

    engine.dispatch(&password, DomEvent::Focus);

    let outcome = engine
        .deliver(&fill("a@b.com", "secret"))
        .expect("fill succeeds");

    assert!(outcome.success);
    assert!(outcome.warnings.is_empty(), "Clean fill carries no warnings");
    assert_eq!(username.value(), "a@b.com");
    assert_eq!(password.value(), "secret");
    assert_eq!(
        engine.overlay_state(&password),
        Some(OverlayState::Closed),
        "A fill attempt always dismisses the overlay"
    );
    assert_eq!(engine.page().surface_count(), 0);
}

#[test]
fn fill_without_an_open_overlay_is_refused() {
    let (page, _, password) = login_page("https://example.com/login");
    let mut engine = engine(page);

    let result = engine.deliver(&fill("a@b.com", "secret"));
    assert!(
        matches!(result, Err(BridgeError::NoOpenOverlay)),
        "No overlay open, nothing to route to"
    );
    assert_eq!(password.value(), "", "Nothing was filled");

    // A successful fill closes the overlay, so a second delivery is refused.
    engine.dispatch(&password, DomEvent::Focus);
    engine.deliver(&fill("a@b.com", "secret")).expect("first fill");
    let second = engine.deliver(&fill("x@y.com", "other"));
    assert!(matches!(second, Err(BridgeError::NoOpenOverlay)));
    assert_eq!(password.value(), "secret", "Second delivery changed nothing");
}

#[test]
fn fill_routes_to_the_most_recently_opened_overlay() {
    let mut page = PageDom::new("https://example.com/login");
    let first = password_input("first");
    let second = password_input("second");
    let form_a = page.add_form();
    page.append_input(form_a, first.clone());
    let form_b = page.add_form();
    page.append_input(form_b, second.clone());

    // Drive the registry directly so both overlays coexist; dispatch-level
    // focus would blur one before opening the other.
    let mut registry = ObservationRegistry::new();
    let config = OverlayConfig::default();
    for password in [&first, &second] {
        let form = LoginForm {
            username_input: None,
            password_input: password.clone(),
        };
        registry.register(&mut page, &config, password, &form);
    }
    registry
        .controller_mut(&first)
        .expect("first controller")
        .on_focus(&mut page);
    registry
        .controller_mut(&second)
        .expect("second controller")
        .on_focus(&mut page);
    assert_eq!(page.surface_count(), 2);

    dispatch::deliver(&mut page, &mut registry, &fill("", "secret"))
        .expect("fill succeeds");

    assert_eq!(second.value(), "secret", "Latest overlay receives the fill");
    assert_eq!(first.value(), "", "The older overlay's input is untouched");
    assert_eq!(
        registry.controller(&first).map(|c| c.state()),
        Some(OverlayState::Open),
        "The older overlay stays open"
    );
    assert_eq!(page.surface_count(), 1);
}

// =========================================================================
// Wire decoding
// =========================================================================

#[test]
fn unknown_command_tag_is_a_decode_error() {
    let (page, password) = password_only_page("https://example.com/login");
    let mut engine = engine(page);
    engine.dispatch(&password, DomEvent::Focus);

    let result = engine.deliver_json(r#"{"cmd":"SELF_DESTRUCT"}"#);
    assert!(
        matches!(result, Err(BridgeError::Decode(_))),
        "Unknown cmd values are rejected, not ignored"
    );
    assert_eq!(
        engine.overlay_state(&password),
        Some(OverlayState::Open),
        "A rejected command leaves the overlay alone"
    );
}

#[test]
fn malformed_json_is_a_decode_error() {
    let (page, _) = password_only_page("https://example.com/login");
    let mut engine = engine(page);

    let result = engine.deliver_json("{not json");
    assert!(matches!(result, Err(BridgeError::Decode(_))));
}

#[test]
fn well_formed_wire_fill_round_trips() {
    let (page, username, password) = login_page("https://example.com/login");
    let mut engine = engine(page);
    engine.dispatch(&password, DomEvent::Focus);

    let outcome = engine
        .deliver_json(
            r#"{"cmd":"FILL_PASSWORD","username":"a@b.com","password":"secret"}"#,
        )
        .expect("wire fill succeeds");

    assert!(outcome.success);
    assert_eq!(username.value(), "a@b.com");
    assert_eq!(password.value(), "secret");
}

// =========================================================================
// Degraded fills
// =========================================================================

#[test]
fn detached_username_fills_password_with_a_warning() {
    let (page, username, password) = login_page("https://example.com/login");
    let mut engine = engine(page);

    engine.dispatch(&password, DomEvent::Focus);
    username.detach();

    let outcome = engine
        .deliver(&fill("a@b.com", "secret"))
        .expect("password fill still succeeds");

    assert!(outcome.success);
    assert_eq!(outcome.warnings.len(), 1, "One warning for the skipped field");
    assert_eq!(password.value(), "secret");
    assert_eq!(username.value(), "", "Detached field left untouched");
}

#[test]
fn empty_username_value_is_skipped_with_a_warning() {
    let (page, username, password) = login_page("https://example.com/login");
    let mut engine = engine(page);

    engine.dispatch(&password, DomEvent::Focus);

    let outcome = engine.deliver(&fill("", "secret")).expect("fill succeeds");

    assert!(outcome.success);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(username.value(), "");
    assert_eq!(password.value(), "secret");
}

#[test]
fn detached_password_fails_the_fill_and_still_closes() {
    let (page, _, password) = login_page("https://example.com/login");
    let mut engine = engine(page);

    engine.dispatch(&password, DomEvent::Focus);
    password.detach();

    let result = engine.deliver(&fill("a@b.com", "secret"));
    assert!(
        matches!(
            result,
            Err(BridgeError::Fill(FillError::NoActionableField))
        ),
        "No live password field means the fill fails outright"
    );
    assert_eq!(
        engine.page().surface_count(),
        0,
        "Even a failed attempt dismisses the overlay"
    );
}
