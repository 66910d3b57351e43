use std::cell::{Ref, RefCell};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Email,
    Password,
}

/// On-screen box of an input, in CSS pixels relative to its offset parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutBox {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
}

impl LayoutBox {
    pub fn new(top: i32, left: i32, width: i32, height: i32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }
}

/// A single live input element on the page.
#[derive(Debug, Clone)]
pub struct InputElement {
    pub kind: InputKind,
    pub name: String,
    pub value: String,
    pub layout: LayoutBox,
    /// Value of the native autocomplete attribute, if set.
    pub autocomplete: Option<String>,
    /// Set once the element has been removed from the document.
    pub detached: bool,
}

impl InputElement {
    pub fn new(kind: InputKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            value: String::new(),
            layout: LayoutBox::default(),
            autocomplete: None,
            detached: false,
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_layout(mut self, layout: LayoutBox) -> Self {
        self.layout = layout;
        self
    }
}

/// Shared reference to a live input element.
///
/// Identity is reference identity: two handles compare equal (and hash
/// equal) exactly when they point at the same element, no matter how the
/// element's fields change. Repeated scans of the same live element must
/// therefore hand out clones of the same handle, which is what makes
/// handles usable as registry keys.
#[derive(Debug, Clone)]
pub struct InputHandle(Rc<RefCell<InputElement>>);

impl InputHandle {
    pub fn new(element: InputElement) -> Self {
        Self(Rc::new(RefCell::new(element)))
    }

    pub fn text(name: &str) -> Self {
        Self::new(InputElement::new(InputKind::Text, name))
    }

    pub fn email(name: &str) -> Self {
        Self::new(InputElement::new(InputKind::Email, name))
    }

    pub fn password(name: &str) -> Self {
        Self::new(InputElement::new(InputKind::Password, name))
    }

    pub fn element(&self) -> Ref<'_, InputElement> {
        self.0.borrow()
    }

    pub fn kind(&self) -> InputKind {
        self.0.borrow().kind
    }

    pub fn name(&self) -> String {
        self.0.borrow().name.clone()
    }

    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    pub fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    pub fn layout(&self) -> LayoutBox {
        self.0.borrow().layout
    }

    pub fn set_layout(&self, layout: LayoutBox) {
        self.0.borrow_mut().layout = layout;
    }

    pub fn autocomplete(&self) -> Option<String> {
        self.0.borrow().autocomplete.clone()
    }

    /// Force the native autocomplete attribute off so the host browser's own
    /// suggestion UI does not compete with the overlay.
    pub fn set_autocomplete_off(&self) {
        self.0.borrow_mut().autocomplete = Some("off".to_string());
    }

    pub fn is_detached(&self) -> bool {
        self.0.borrow().detached
    }

    pub fn detach(&self) {
        self.0.borrow_mut().detached = true;
    }
}

impl PartialEq for InputHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for InputHandle {}

impl Hash for InputHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}
