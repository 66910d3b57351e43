use std::collections::BTreeMap;

use crate::dom::element::InputHandle;
use crate::overlay::surface::OverlaySurface;

/// Identifier of an inserted overlay surface. Allocated monotonically, so a
/// higher id always means a more recently inserted surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// A `<form>` element: an ordered list of its input elements.
#[derive(Debug, Clone, Default)]
pub struct FormNode {
    pub inputs: Vec<InputHandle>,
}

/// The live document as seen by the content side.
///
/// The embedding host owns all mutation: it adds and removes inputs, moves
/// focus, and then notifies the engine that the subtree changed. The engine
/// and the overlay controllers read the document and manage only the overlay
/// surfaces inserted into it.
#[derive(Debug)]
pub struct PageDom {
    url: String,
    forms: Vec<FormNode>,
    active: Option<InputHandle>,
    surfaces: BTreeMap<SurfaceId, OverlaySurface>,
    next_surface: u64,
}

impl PageDom {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            forms: Vec::new(),
            active: None,
            surfaces: BTreeMap::new(),
            next_surface: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn forms(&self) -> &[FormNode] {
        &self.forms
    }

    /// Append an empty form element, returning its index.
    pub fn add_form(&mut self) -> usize {
        self.forms.push(FormNode::default());
        self.forms.len() - 1
    }

    /// Append an input to an existing form. Returns false if the form index
    /// is out of range.
    pub fn append_input(&mut self, form: usize, input: InputHandle) -> bool {
        match self.forms.get_mut(form) {
            Some(node) => {
                node.inputs.push(input);
                true
            }
            None => false,
        }
    }

    /// Remove an input from the document, marking it detached. Focus is
    /// cleared if the removed input held it. Returns false if the input was
    /// not in any form.
    pub fn remove_input(&mut self, input: &InputHandle) -> bool {
        let mut removed = false;
        for form in &mut self.forms {
            if let Some(pos) = form.inputs.iter().position(|i| i == input) {
                form.inputs.remove(pos);
                removed = true;
            }
        }
        if removed {
            input.detach();
            if self.active.as_ref() == Some(input) {
                self.active = None;
            }
        }
        removed
    }

    pub fn active_element(&self) -> Option<&InputHandle> {
        self.active.as_ref()
    }

    pub fn focus(&mut self, input: &InputHandle) {
        self.active = Some(input.clone());
    }

    pub fn blur(&mut self, input: &InputHandle) {
        if self.active.as_ref() == Some(input) {
            self.active = None;
        }
    }

    // ------------------------------------------------------------------
    // Overlay surfaces
    // ------------------------------------------------------------------

    pub fn insert_surface(&mut self, surface: OverlaySurface) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, surface);
        id
    }

    /// Remove a surface from the document. No-op when already gone.
    pub fn remove_surface(&mut self, id: SurfaceId) -> bool {
        self.surfaces.remove(&id).is_some()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&OverlaySurface> {
        self.surfaces.get(&id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut OverlaySurface> {
        self.surfaces.get_mut(&id)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        self.surfaces.keys().copied().collect()
    }
}
