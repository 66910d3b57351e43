use std::fmt;

use crate::dom::scanner::LoginForm;

#[derive(Debug)]
pub enum FillError {
    /// No field of the form can be written at all (the password input has
    /// left the document).
    NoActionableField,
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillError::NoActionableField => {
                write!(f, "No fillable field remains in the login form")
            }
        }
    }
}

impl std::error::Error for FillError {}

/// Write credentials into a login form.
///
/// Individual field problems are reported as warnings on an otherwise
/// successful fill; only a missing password field is a total failure. An
/// absent username field is the normal password-only case and produces no
/// warning.
pub fn fill_login_form(
    form: &LoginForm,
    username: &str,
    password: &str,
) -> Result<Vec<String>, FillError> {
    if form.password_input.is_detached() {
        return Err(FillError::NoActionableField);
    }

    let mut warnings = Vec::new();
    form.password_input.set_value(password);

    if let Some(username_input) = &form.username_input {
        if username_input.is_detached() {
            warnings.push("Username field is no longer attached; skipped".to_string());
        } else if username.is_empty() {
            warnings.push("No username value provided; username field left untouched".to_string());
        } else {
            username_input.set_value(username);
        }
    }

    Ok(warnings)
}
