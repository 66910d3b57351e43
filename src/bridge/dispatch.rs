use std::fmt;

use crate::bridge::protocol::{FillOutcome, PageCommand};
use crate::dom::fill::FillError;
use crate::dom::page::PageDom;
use crate::observe::registry::ObservationRegistry;

#[derive(Debug)]
pub enum BridgeError {
    /// No controller currently has an open surface; the command has no
    /// intended recipient and the page context stays silent.
    NoOpenOverlay,

    /// Inbound payload did not decode as a known command (bad shape or
    /// unrecognized tag).
    Decode(serde_json::Error),

    /// The fill itself failed with no actionable field.
    Fill(FillError),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::NoOpenOverlay => {
                write!(f, "No overlay is currently open for this page")
            }
            BridgeError::Decode(source) => {
                write!(f, "Unrecognized page command: {}", source)
            }
            BridgeError::Fill(source) => {
                write!(f, "Fill failed: {}", source)
            }
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Decode(source) => Some(source),
            BridgeError::Fill(source) => Some(source),
            BridgeError::NoOpenOverlay => None,
        }
    }
}

/// Deliver an inbound command to the single intended controller.
///
/// Rather than broadcasting and letting every controller self-filter, the
/// dispatcher selects the one controller whose surface is open (most
/// recently opened wins if several somehow are), so at most one handler
/// ever answers a given fill command. Delivery is at-most-once; the caller
/// must not retry on failure.
pub fn deliver(
    page: &mut PageDom,
    registry: &mut ObservationRegistry,
    command: &PageCommand,
) -> Result<FillOutcome, BridgeError> {
    match command {
        PageCommand::FillPassword { username, password } => {
            let target = registry.open_input().ok_or(BridgeError::NoOpenOverlay)?;

            let controller = registry
                .controller_mut(&target)
                .ok_or(BridgeError::NoOpenOverlay)?;

            match controller.handle_fill(page, username, password) {
                Some(Ok(outcome)) => Ok(outcome),
                Some(Err(source)) => Err(BridgeError::Fill(source)),
                None => Err(BridgeError::NoOpenOverlay),
            }
        }
    }
}

/// Decode a raw JSON payload and deliver it. Unknown command tags surface
/// as `BridgeError::Decode`.
pub fn deliver_json(
    page: &mut PageDom,
    registry: &mut ObservationRegistry,
    raw: &str,
) -> Result<FillOutcome, BridgeError> {
    let command: PageCommand = serde_json::from_str(raw).map_err(BridgeError::Decode)?;
    deliver(page, registry, &command)
}
