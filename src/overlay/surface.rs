use serde::{Deserialize, Serialize};

use crate::dom::element::InputHandle;

/// Maximal CSS stacking layer, so the surface sits above everything the
/// page renders.
pub const SURFACE_Z_INDEX: u32 = 2_147_483_647;

pub const SURFACE_CORNER_RADIUS: i32 = 8;

/// Overlay engine configuration, loadable from the optional YAML config
/// file and overridable per engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Origin of the privileged extension context, prefixed to the surface
    /// source URL.
    #[serde(default = "default_extension_base")]
    pub extension_base: String,

    /// Width floor for the surface; narrower inputs still get a usable
    /// suggestion panel.
    #[serde(default = "default_min_width")]
    pub min_width: i32,

    /// Fixed surface height.
    #[serde(default = "default_surface_height")]
    pub surface_height: i32,

    /// Reconciliation throttle window, trailing edge.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            extension_base: default_extension_base(),
            min_width: default_min_width(),
            surface_height: default_surface_height(),
            throttle_ms: default_throttle_ms(),
        }
    }
}

// Serde default helpers
fn default_extension_base() -> String {
    "extension://form-overlay".to_string()
}
fn default_min_width() -> i32 {
    300
}
fn default_surface_height() -> i32 {
    180
}
fn default_throttle_ms() -> u64 {
    100
}

/// Resolved on-screen box of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceGeometry {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
}

/// Anchor the surface directly below the input, left-aligned, at least
/// `min_width` wide.
pub fn anchored_below(input: &InputHandle, config: &OverlayConfig) -> SurfaceGeometry {
    let layout = input.layout();
    SurfaceGeometry {
        top: layout.top + layout.height,
        left: layout.left,
        width: layout.width.max(config.min_width),
        height: config.surface_height,
    }
}

/// An inserted overlay surface: the isolated, privileged rendering surface
/// shown adjacent to a detected input. Hidden until its own load signal
/// arrives.
#[derive(Debug, Clone)]
pub struct OverlaySurface {
    pub anchor: InputHandle,
    pub src: String,
    pub geometry: SurfaceGeometry,
    pub z_index: u32,
    pub corner_radius: i32,
    pub hidden: bool,
    pub loaded: bool,
}

impl OverlaySurface {
    pub fn new(anchor: InputHandle, src: String, geometry: SurfaceGeometry) -> Self {
        Self {
            anchor,
            src,
            geometry,
            z_index: SURFACE_Z_INDEX,
            corner_radius: SURFACE_CORNER_RADIUS,
            hidden: true,
            loaded: false,
        }
    }
}

/// Build the surface source URL.
///
/// Fragment-encoded parameters: `u` is the page URL, `p` flags whether the
/// relevant input is the password field, and `q` carries the username
/// field's current value as a prefix query, omitted when empty. The
/// fragment never reaches any server, so the page URL stays inside the
/// extension.
pub fn surface_src(
    config: &OverlayConfig,
    page_url: &str,
    is_password: bool,
    username_query: &str,
) -> String {
    let mut src = format!(
        "{}/in_page.html#u={}&p={}",
        config.extension_base.trim_end_matches('/'),
        urlencoding::encode(page_url),
        if is_password { "1" } else { "0" },
    );

    if !username_query.is_empty() {
        src.push_str("&q=");
        src.push_str(&urlencoding::encode(username_query));
    }

    src
}
