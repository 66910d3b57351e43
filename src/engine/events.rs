use serde::{Deserialize, Serialize};

/// Keyboard key carried with a keydown. Only Escape has overlay semantics;
/// the rest exist so hosts and scenarios can deliver realistic traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Char(char),
}

/// DOM event delivered by the host for a specific input element. Closed
/// union; anything a host cannot express here is not an overlay concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Focus,
    Blur,
    Input,
    Keydown(Key),
}
