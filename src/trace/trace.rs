use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::overlay::controller::OverlayState;

/// One JSONL lifecycle record: a reconciliation pass, an overlay state
/// transition, or a fill attempt.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub event: String,

    pub input: Option<String>,
    pub overlay_state: Option<String>,

    pub registered: Option<usize>,
    pub unregistered: Option<usize>,

    pub outcome: Option<String>,
    pub warnings: Vec<String>,
}

impl TraceEvent {
    pub fn now(event: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
            event: event.to_string(),
            input: None,
            overlay_state: None,
            registered: None,
            unregistered: None,
            outcome: None,
            warnings: vec![],
        }
    }

    pub fn with_input(mut self, name: &str) -> Self {
        self.input = Some(name.to_string());
        self
    }

    pub fn with_overlay_state(mut self, state: OverlayState) -> Self {
        self.overlay_state = Some(state.as_str().to_string());
        self
    }

    pub fn with_counts(mut self, registered: usize, unregistered: usize) -> Self {
        self.registered = Some(registered);
        self.unregistered = Some(unregistered);
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = Some(outcome.to_string());
        self
    }

    pub fn with_warnings(mut self, warnings: &[String]) -> Self {
        self.warnings = warnings.to_vec();
        self
    }
}
