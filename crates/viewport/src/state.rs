use foundation::Vec2;
use serde::{Deserialize, Serialize};

use crate::layer::Layer;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom change applied by the step buttons.
pub const ZOOM_STEP: f64 = 0.5;

/// Wheel `deltaY` to zoom factor; negative so scrolling up zooms in.
pub const WHEEL_ZOOM_SPEED: f64 = -0.001;

/// Snapshot of the viewport transform.
///
/// `zoom` is always within `[MIN_ZOOM, MAX_ZOOM]`; `offset` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub zoom: f64,
    pub offset: Vec2,
    pub active_layer: Layer,
    pub is_panning: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            offset: Vec2::ZERO,
            active_layer: Layer::Visible,
            is_panning: false,
        }
    }
}
