use crate::dom::element::{InputHandle, InputKind};
use crate::dom::page::PageDom;

/// A detected login form. The password input is always present; the
/// username input is optional (password-only forms are common). Handles are
/// clones of the live elements, so two scans of an unchanged page yield
/// forms whose handles compare equal.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username_input: Option<InputHandle>,
    pub password_input: InputHandle,
}

/// Detection boundary: given the current document, produce the current set
/// of login forms. Pure query, no side effects.
pub trait FormScanner {
    fn scan(&self, page: &PageDom) -> Vec<LoginForm>;
}

/// Default heuristic scanner.
///
/// A form is a login form when it contains a password input. The username
/// input, when present, is the closest text or email input preceding the
/// password input within the same form.
pub struct DomFormScanner;

impl FormScanner for DomFormScanner {
    fn scan(&self, page: &PageDom) -> Vec<LoginForm> {
        let mut found = Vec::new();

        for form in page.forms() {
            let password_pos = form
                .inputs
                .iter()
                .position(|input| !input.is_detached() && input.kind() == InputKind::Password);

            let Some(password_pos) = password_pos else {
                continue;
            };

            let username_input = form.inputs[..password_pos]
                .iter()
                .rev()
                .find(|input| {
                    !input.is_detached()
                        && matches!(input.kind(), InputKind::Text | InputKind::Email)
                })
                .cloned();

            found.push(LoginForm {
                username_input,
                password_input: form.inputs[password_pos].clone(),
            });
        }

        found
    }
}
