use std::collections::HashSet;

use crate::dom::page::PageDom;
use crate::dom::scanner::FormScanner;
use crate::observe::registry::ObservationRegistry;
use crate::overlay::surface::OverlayConfig;

/// What one reconciliation pass actually did. Both counts are zero when the
/// observed set already matched the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub registered: usize,
    pub unregistered: usize,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.registered == 0 && self.unregistered == 0
    }
}

/// Bring the observed-input set in line with the current scan, with minimal
/// disruption: inputs present in both stay untouched (tearing down a
/// focused overlay would interrupt the user), fresh inputs are registered,
/// vanished inputs are unregistered. Idempotent: a second run with no
/// intervening DOM change does nothing.
pub fn reconcile(
    page: &mut PageDom,
    registry: &mut ObservationRegistry,
    scanner: &dyn FormScanner,
    config: &OverlayConfig,
) -> ReconcileOutcome {
    let forms = scanner.scan(page);

    let mut remaining: HashSet<_> = registry.inputs().into_iter().collect();
    let mut outcome = ReconcileOutcome::default();

    for form in &forms {
        if let Some(username_input) = &form.username_input {
            if !remaining.remove(username_input)
                && registry.register(page, config, username_input, form)
            {
                outcome.registered += 1;
            }
        }

        if !remaining.remove(&form.password_input)
            && registry.register(page, config, &form.password_input, form)
        {
            outcome.registered += 1;
        }
    }

    // Whatever is left belongs to no detected form anymore.
    for input in remaining {
        if registry.unregister(page, &input) {
            outcome.unregistered += 1;
        }
    }

    outcome
}
