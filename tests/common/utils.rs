use form_overlay::dom::element::{InputElement, InputHandle, InputKind, LayoutBox};
use form_overlay::dom::page::PageDom;
use form_overlay::dom::scanner::DomFormScanner;
use form_overlay::engine::engine::Engine;
use form_overlay::overlay::surface::OverlayConfig;
use form_overlay::trace::logger::TraceLogger;

pub fn input_at(kind: InputKind, name: &str, top: i32, left: i32, width: i32) -> InputHandle {
    InputHandle::new(
        InputElement::new(kind, name).with_layout(LayoutBox::new(top, left, width, 30)),
    )
}

pub fn text_input(name: &str) -> InputHandle {
    input_at(InputKind::Text, name, 0, 10, 220)
}

pub fn password_input(name: &str) -> InputHandle {
    input_at(InputKind::Password, name, 40, 10, 220)
}

/// One form holding a username and a password input.
pub fn login_page(url: &str) -> (PageDom, InputHandle, InputHandle) {
    let mut page = PageDom::new(url);
    let username = text_input("username");
    let password = password_input("password");

    let form = page.add_form();
    page.append_input(form, username.clone());
    page.append_input(form, password.clone());

    (page, username, password)
}

/// One form holding only a password input.
pub fn password_only_page(url: &str) -> (PageDom, InputHandle) {
    let mut page = PageDom::new(url);
    let password = password_input("password");

    let form = page.add_form();
    page.append_input(form, password.clone());

    (page, password)
}

/// Engine over the default scanner and config, with tracing off.
pub fn engine(page: PageDom) -> Engine {
    Engine::attach(
        page,
        Box::new(DomFormScanner),
        OverlayConfig::default(),
        TraceLogger::disabled(),
    )
}
