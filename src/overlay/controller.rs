use crate::bridge::protocol::FillOutcome;
use crate::dom::element::InputHandle;
use crate::dom::fill::{FillError, fill_login_form};
use crate::dom::page::{PageDom, SurfaceId};
use crate::dom::scanner::LoginForm;
use crate::overlay::surface::{OverlayConfig, OverlaySurface, anchored_below, surface_src};

/// Lifecycle of one overlay surface. `Open` means the surface exists in the
/// document but is still hidden, waiting for its own load signal; `Visible`
/// means it has loaded and is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Open,
    Visible,
}

impl OverlayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayState::Closed => "closed",
            OverlayState::Open => "open",
            OverlayState::Visible => "visible",
        }
    }
}

/// Per-observed-input state machine. Owns its single overlay surface and is
/// the only component allowed to mutate its state.
#[derive(Debug)]
pub struct OverlayController {
    input: InputHandle,
    form: LoginForm,
    config: OverlayConfig,
    state: OverlayState,
    surface: Option<SurfaceId>,
    torn_down: bool,
}

impl OverlayController {
    /// Construct the controller for a freshly observed input. Forces the
    /// input's native autocomplete off, and opens immediately when the input
    /// already holds focus at registration time.
    pub fn attach(
        page: &mut PageDom,
        config: &OverlayConfig,
        input: InputHandle,
        form: LoginForm,
    ) -> Self {
        input.set_autocomplete_off();

        let mut controller = Self {
            input,
            form,
            config: config.clone(),
            state: OverlayState::Closed,
            surface: None,
            torn_down: false,
        };

        if page.active_element() == Some(&controller.input) {
            controller.on_focus(page);
        }

        controller
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn surface_id(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn input(&self) -> &InputHandle {
        &self.input
    }

    pub fn form(&self) -> &LoginForm {
        &self.form
    }

    fn is_password(&self) -> bool {
        self.input == self.form.password_input
    }

    fn current_src(&self, page: &PageDom) -> String {
        let query = self
            .form
            .username_input
            .as_ref()
            .map(|input| input.value())
            .unwrap_or_default();

        surface_src(&self.config, page.url(), self.is_password(), &query)
    }

    /// Focus: open the surface, or refresh its source in place when one
    /// already exists. Reusing the surface avoids visible flicker.
    pub fn on_focus(&mut self, page: &mut PageDom) {
        if self.torn_down {
            return;
        }

        let src = self.current_src(page);

        if let Some(id) = self.surface {
            if let Some(surface) = page.surface_mut(id) {
                surface.src = src;
            }
            return;
        }

        let geometry = anchored_below(&self.input, &self.config);
        let surface = OverlaySurface::new(self.input.clone(), src, geometry);
        self.surface = Some(page.insert_surface(surface));
        self.state = OverlayState::Open;
    }

    /// The surface's own load signal: reveal it.
    pub fn on_surface_load(&mut self, page: &mut PageDom) {
        if self.torn_down {
            return;
        }

        if let Some(id) = self.surface {
            if let Some(surface) = page.surface_mut(id) {
                surface.loaded = true;
                surface.hidden = false;
            }
            if self.state == OverlayState::Open {
                self.state = OverlayState::Visible;
            }
        }
    }

    /// Input event. A password field turning non-empty means the user is
    /// typing a password manually, so the overlay stops being useful; any
    /// other input behaves like a focus refresh.
    pub fn on_input(&mut self, page: &mut PageDom) {
        if self.torn_down {
            return;
        }

        if self.is_password() && !self.input.value().is_empty() {
            self.force_close(page);
        } else {
            self.on_focus(page);
        }
    }

    pub fn on_keydown(&mut self, page: &mut PageDom, key: &crate::engine::events::Key) {
        if self.torn_down {
            return;
        }

        if matches!(key, crate::engine::events::Key::Escape) {
            self.force_close(page);
        }
    }

    pub fn on_blur(&mut self, page: &mut PageDom) {
        if self.torn_down {
            return;
        }
        self.force_close(page);
    }

    /// Close from any state: remove the surface from the document and drop
    /// the reference. Idempotent.
    pub fn force_close(&mut self, page: &mut PageDom) {
        if let Some(id) = self.surface.take() {
            page.remove_surface(id);
        }
        self.state = OverlayState::Closed;
    }

    /// Called by the registry on unregistration. After this the controller
    /// reacts to nothing.
    pub fn teardown(&mut self, page: &mut PageDom) {
        self.force_close(page);
        self.torn_down = true;
    }

    /// Handle an inbound fill command. Declines (returns `None`) unless this
    /// controller's surface currently exists; a fill attempt, successful or
    /// not, always dismisses the overlay.
    pub fn handle_fill(
        &mut self,
        page: &mut PageDom,
        username: &str,
        password: &str,
    ) -> Option<Result<FillOutcome, FillError>> {
        if self.torn_down || self.surface.is_none() {
            return None;
        }

        let result = fill_login_form(&self.form, username, password);
        self.force_close(page);

        Some(result.map(FillOutcome::ok))
    }
}
