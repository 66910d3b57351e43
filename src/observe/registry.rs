use std::collections::HashMap;

use crate::dom::element::InputHandle;
use crate::dom::page::{PageDom, SurfaceId};
use crate::dom::scanner::LoginForm;
use crate::overlay::controller::OverlayController;
use crate::overlay::surface::OverlayConfig;

/// One currently observed input and its live overlay controller.
#[derive(Debug)]
pub struct ObservationEntry {
    controller: OverlayController,
}

/// Table of every input currently under observation, keyed by element
/// identity. Sole invariant: no two entries share an input key. The
/// reconciliation loop is the only writer; controller lookups exist so the
/// engine can route DOM events and fill commands, the Rust rendition of the
/// per-input listeners a real content script would attach.
#[derive(Debug, Default)]
pub struct ObservationRegistry {
    entries: HashMap<InputHandle, ObservationEntry>,
}

impl ObservationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, input: &InputHandle) -> bool {
        self.entries.contains_key(input)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of the observed input set.
    pub fn inputs(&self) -> Vec<InputHandle> {
        self.entries.keys().cloned().collect()
    }

    /// Construct and store an overlay controller for a freshly detected
    /// input. Refuses (no-op, returns false) when the input is already
    /// observed.
    pub fn register(
        &mut self,
        page: &mut PageDom,
        config: &OverlayConfig,
        input: &InputHandle,
        form: &LoginForm,
    ) -> bool {
        if self.entries.contains_key(input) {
            return false;
        }

        let controller = OverlayController::attach(page, config, input.clone(), form.clone());
        self.entries
            .insert(input.clone(), ObservationEntry { controller });
        true
    }

    /// Tear down and remove the entry for an input. No-op when absent.
    pub fn unregister(&mut self, page: &mut PageDom, input: &InputHandle) -> bool {
        match self.entries.remove(input) {
            Some(mut entry) => {
                entry.controller.teardown(page);
                true
            }
            None => false,
        }
    }

    /// Page unload: tear everything down.
    pub fn teardown_all(&mut self, page: &mut PageDom) {
        for (_, mut entry) in self.entries.drain() {
            entry.controller.teardown(page);
        }
    }

    pub fn controller(&self, input: &InputHandle) -> Option<&OverlayController> {
        self.entries.get(input).map(|entry| &entry.controller)
    }

    pub fn controller_mut(&mut self, input: &InputHandle) -> Option<&mut OverlayController> {
        self.entries
            .get_mut(input)
            .map(|entry| &mut entry.controller)
    }

    /// Controller owning a given surface, for load-signal routing.
    pub fn controller_for_surface_mut(
        &mut self,
        id: SurfaceId,
    ) -> Option<&mut OverlayController> {
        self.entries
            .values_mut()
            .map(|entry| &mut entry.controller)
            .find(|controller| controller.surface_id() == Some(id))
    }

    /// Input of the controller whose surface is currently open, the most
    /// recently opened one winning if several are. Used by the fill
    /// dispatcher to pick exactly one receiver.
    pub fn open_input(&self) -> Option<InputHandle> {
        self.entries
            .iter()
            .filter_map(|(input, entry)| {
                entry.controller.surface_id().map(|id| (id, input))
            })
            .max_by_key(|(id, _)| *id)
            .map(|(_, input)| input.clone())
    }
}
