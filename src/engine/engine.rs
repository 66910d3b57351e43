use std::time::Duration;

use crate::bridge::dispatch::{self, BridgeError};
use crate::bridge::protocol::{FillOutcome, PageCommand};
use crate::dom::element::InputHandle;
use crate::dom::page::{PageDom, SurfaceId};
use crate::dom::scanner::FormScanner;
use crate::engine::events::DomEvent;
use crate::observe::reconcile::{ReconcileOutcome, reconcile};
use crate::observe::registry::ObservationRegistry;
use crate::observe::throttle::Throttle;
use crate::overlay::controller::OverlayState;
use crate::overlay::surface::OverlayConfig;
use crate::trace::{logger::TraceLogger, trace::TraceEvent};

/// The content-script half of the system: owns the page document, the
/// observation registry, the scanner, and the throttled reconciliation
/// loop, and routes host-delivered DOM events, surface load signals, and
/// inbound fill commands to the right overlay controller.
///
/// Everything is single-threaded and host-driven: the host mutates the
/// page, calls `notify_mutation` (its MutationObserver callback), advances
/// the clock through `tick`, and feeds events through `dispatch`.
pub struct Engine {
    page: PageDom,
    registry: ObservationRegistry,
    scanner: Box<dyn FormScanner>,
    throttle: Throttle,
    config: OverlayConfig,
    tracer: TraceLogger,
}

impl Engine {
    /// Attach to a page. Runs one eager reconciliation so forms present at
    /// startup get their overlays immediately.
    pub fn attach(
        page: PageDom,
        scanner: Box<dyn FormScanner>,
        config: OverlayConfig,
        tracer: TraceLogger,
    ) -> Self {
        let throttle = Throttle::new(Duration::from_millis(config.throttle_ms));

        let mut engine = Self {
            page,
            registry: ObservationRegistry::new(),
            scanner,
            throttle,
            config,
            tracer,
        };

        engine.run_reconcile();
        engine
    }

    /// The host observed a subtree mutation. Coalesced trailing-edge; the
    /// actual run happens on a later `tick`.
    pub fn notify_mutation(&mut self, now: Duration) {
        self.throttle.request(now);
    }

    /// Advance the host clock. Runs the reconciliation loop when the
    /// throttle window has elapsed.
    pub fn tick(&mut self, now: Duration) -> Option<ReconcileOutcome> {
        if self.throttle.poll(now) {
            Some(self.run_reconcile())
        } else {
            None
        }
    }

    /// Run reconciliation immediately, bypassing the throttle.
    pub fn reconcile_now(&mut self) -> ReconcileOutcome {
        self.run_reconcile()
    }

    fn run_reconcile(&mut self) -> ReconcileOutcome {
        let outcome = reconcile(
            &mut self.page,
            &mut self.registry,
            self.scanner.as_ref(),
            &self.config,
        );

        self.tracer.log(
            &TraceEvent::now("reconcile").with_counts(outcome.registered, outcome.unregistered),
        );

        outcome
    }

    /// Route a DOM event to the controller observing `input`. Events for
    /// unobserved inputs only update focus bookkeeping.
    pub fn dispatch(&mut self, input: &InputHandle, event: DomEvent) {
        match event {
            DomEvent::Focus => self.page.focus(input),
            DomEvent::Blur => self.page.blur(input),
            _ => {}
        }

        let Some(controller) = self.registry.controller_mut(input) else {
            return;
        };

        let before = controller.state();
        match &event {
            DomEvent::Focus => controller.on_focus(&mut self.page),
            DomEvent::Blur => controller.on_blur(&mut self.page),
            DomEvent::Input => controller.on_input(&mut self.page),
            DomEvent::Keydown(key) => controller.on_keydown(&mut self.page, key),
        }
        let after = controller.state();

        if before != after {
            self.tracer.log(
                &TraceEvent::now("overlay")
                    .with_input(&input.name())
                    .with_overlay_state(after),
            );
        }
    }

    /// A surface finished loading; reveal it.
    pub fn surface_loaded(&mut self, id: SurfaceId) {
        if let Some(controller) = self.registry.controller_for_surface_mut(id) {
            controller.on_surface_load(&mut self.page);
        }
    }

    /// Deliver an inbound fill command from the privileged UI context.
    pub fn deliver(&mut self, command: &PageCommand) -> Result<FillOutcome, BridgeError> {
        let result = dispatch::deliver(&mut self.page, &mut self.registry, command);

        match &result {
            Ok(outcome) => self.tracer.log(
                &TraceEvent::now("fill")
                    .with_outcome("success")
                    .with_warnings(&outcome.warnings),
            ),
            Err(error) => self
                .tracer
                .log(&TraceEvent::now("fill").with_outcome(error)),
        }

        result
    }

    /// Deliver a raw JSON payload (the wire form).
    pub fn deliver_json(&mut self, raw: &str) -> Result<FillOutcome, BridgeError> {
        let command: PageCommand = match serde_json::from_str(raw) {
            Ok(command) => command,
            Err(source) => {
                let error = BridgeError::Decode(source);
                self.tracer
                    .log(&TraceEvent::now("fill").with_outcome(&error));
                return Err(error);
            }
        };
        self.deliver(&command)
    }

    /// Page unload: tear down every controller.
    pub fn detach(&mut self) {
        self.registry.teardown_all(&mut self.page);
    }

    pub fn page(&self) -> &PageDom {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut PageDom {
        &mut self.page
    }

    pub fn registry(&self) -> &ObservationRegistry {
        &self.registry
    }

    /// Overlay state of an observed input, if any.
    pub fn overlay_state(&self, input: &InputHandle) -> Option<OverlayState> {
        self.registry
            .controller(input)
            .map(|controller| controller.state())
    }

    /// Current surface source URL for an observed input, if its overlay is
    /// open.
    pub fn surface_src(&self, input: &InputHandle) -> Option<String> {
        let id = self.registry.controller(input)?.surface_id()?;
        self.page.surface(id).map(|surface| surface.src.clone())
    }
}
