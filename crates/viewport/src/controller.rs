//! Viewport controller: turns pointer and wheel input into transform updates.
//!
//! - Idle -> Panning on pointer-down, capturing the anchor.
//! - Panning -> Panning on pointer-move, recomputing the offset.
//! - Panning -> Idle on pointer-up anywhere.
//!
//! None of the operations fail; out-of-range zoom requests are clamped.

use foundation::{Vec2, clamp};

use crate::gesture::{GesturePhase, PanGesture, PointerSubscriber};
use crate::layer::{Layer, UnknownLayer};
use crate::state::{MAX_ZOOM, MIN_ZOOM, ViewportState, WHEEL_ZOOM_SPEED, ZOOM_STEP};
use crate::transform::ImageStyle;

#[derive(Debug)]
pub struct ViewportController<S = ()> {
    zoom: f64,
    offset: Vec2,
    layer: Layer,
    phase: GesturePhase,
    subscriber: S,
}

impl Default for ViewportController<()> {
    fn default() -> Self {
        Self::new(())
    }
}

impl<S: PointerSubscriber> ViewportController<S> {
    pub fn new(subscriber: S) -> Self {
        let initial = ViewportState::default();
        Self {
            zoom: initial.zoom,
            offset: initial.offset,
            layer: initial.active_layer,
            phase: GesturePhase::Idle,
            subscriber,
        }
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            zoom: self.zoom,
            offset: self.offset,
            active_layer: self.layer,
            is_panning: self.phase.is_panning(),
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn active_layer(&self) -> Layer {
        self.layer
    }

    pub fn is_panning(&self) -> bool {
        self.phase.is_panning()
    }

    pub fn subscriber(&self) -> &S {
        &self.subscriber
    }

    /// Handle pointer-down over the image.
    ///
    /// Re-anchors if a pan is already active; listeners are only attached on
    /// the Idle -> Panning edge.
    pub fn begin_pan(&mut self, pointer_x: f64, pointer_y: f64) {
        let pointer = Vec2::new(pointer_x, pointer_y);
        if !pointer.is_finite() {
            return;
        }
        let was_idle = !self.phase.is_panning();
        self.phase = GesturePhase::Panning(PanGesture::begin(pointer, self.offset));
        if was_idle {
            self.subscriber.attach();
        }
    }

    /// Handle pointer-move anywhere. Returns whether the offset changed.
    pub fn update_pan(&mut self, pointer_x: f64, pointer_y: f64) -> bool {
        let GesturePhase::Panning(gesture) = self.phase else {
            return false;
        };
        let pointer = Vec2::new(pointer_x, pointer_y);
        if !pointer.is_finite() {
            return false;
        }
        let next = gesture.offset_for(pointer);
        let changed = next != self.offset;
        self.offset = next;
        changed
    }

    /// Handle pointer-up anywhere. Idempotent.
    pub fn end_pan(&mut self) {
        if self.phase.is_panning() {
            self.phase = GesturePhase::Idle;
            self.subscriber.detach();
        }
    }

    /// Add `delta` to the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`. NaN is
    /// ignored. Returns the resulting zoom.
    pub fn zoom_by(&mut self, delta: f64) -> f64 {
        if !delta.is_nan() {
            self.zoom = clamp(self.zoom + delta, MIN_ZOOM, MAX_ZOOM);
        }
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom_by(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom_by(-ZOOM_STEP)
    }

    /// Wheel input: scrolling up (negative `delta_y`) zooms in.
    pub fn on_wheel(&mut self, delta_y: f64) -> f64 {
        self.zoom_by(delta_y * WHEEL_ZOOM_SPEED)
    }

    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    /// Select a layer by its selector name. Unknown names leave the active
    /// layer unchanged.
    pub fn select_layer(&mut self, name: &str) -> Result<Layer, UnknownLayer> {
        let layer = name.parse::<Layer>()?;
        self.layer = layer;
        Ok(layer)
    }

    /// Back to the startup view. An active pan is ended first.
    pub fn reset(&mut self) {
        self.end_pan();
        let initial = ViewportState::default();
        self.zoom = initial.zoom;
        self.offset = initial.offset;
        self.layer = initial.active_layer;
    }

    pub fn image_style(&self) -> ImageStyle {
        ImageStyle::from_state(&self.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn controller() -> ViewportController {
        ViewportController::default()
    }

    #[derive(Debug, Default)]
    struct CountingSubscriber {
        attached: usize,
        detached: usize,
    }

    impl CountingSubscriber {
        fn live(&self) -> usize {
            self.attached - self.detached
        }
    }

    impl PointerSubscriber for CountingSubscriber {
        fn attach(&mut self) {
            self.attached += 1;
        }

        fn detach(&mut self) {
            self.detached += 1;
        }
    }

    #[test]
    fn zoom_is_clamped_at_both_bounds() {
        let mut c = controller();
        assert_eq!(c.zoom_by(-10.0), 1.0);
        assert_eq!(c.zoom_by(10.0), 5.0);
        assert_eq!(c.zoom_by(f64::INFINITY), 5.0);
        assert_eq!(c.zoom_by(f64::NEG_INFINITY), 1.0);
    }

    #[test]
    fn zoom_stays_in_range_for_any_delta_sequence() {
        let mut c = controller();
        let deltas = [0.3, -7.0, 2.25, 1e9, -0.0001, 0.5, -1e-12, 4.0, -3.3];
        for d in deltas {
            let z = c.zoom_by(d);
            assert!((MIN_ZOOM..=MAX_ZOOM).contains(&z), "zoom {z} after {d}");
        }
    }

    #[test]
    fn nan_delta_is_ignored() {
        let mut c = controller();
        c.zoom_by(1.0);
        assert_eq!(c.zoom_by(f64::NAN), 2.0);
    }

    #[test]
    fn step_buttons_move_by_half() {
        let mut c = controller();
        assert_eq!(c.zoom_in(), 1.5);
        assert_eq!(c.zoom_in(), 2.0);
        assert_eq!(c.zoom_out(), 1.5);
        assert_eq!(c.zoom_out(), 1.0);
        assert_eq!(c.zoom_out(), 1.0);
    }

    #[test]
    fn wheel_up_zooms_in() {
        let mut c = controller();
        assert_eq!(c.on_wheel(-500.0), 1.5);
        assert_eq!(c.on_wheel(250.0), 1.25);
        assert_eq!(c.on_wheel(100_000.0), 1.0);
    }

    #[test]
    fn pan_is_pure_translation() {
        let mut c = controller();
        c.begin_pan(10.0, 10.0);
        assert!(c.update_pan(15.0, 15.0));
        assert_eq!(c.offset(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn pan_distance_is_independent_of_zoom() {
        let mut c = controller();
        c.zoom_by(3.0);
        c.begin_pan(100.0, 40.0);
        c.update_pan(130.0, 20.0);
        assert_eq!(c.offset(), Vec2::new(30.0, -20.0));
    }

    #[test]
    fn second_gesture_continues_from_current_offset() {
        let mut c = controller();
        c.begin_pan(0.0, 0.0);
        c.update_pan(20.0, 10.0);
        c.end_pan();
        c.begin_pan(50.0, 50.0);
        c.update_pan(45.0, 60.0);
        assert_eq!(c.offset(), Vec2::new(15.0, 20.0));
    }

    #[test]
    fn update_without_begin_is_ignored() {
        let mut c = controller();
        assert!(!c.update_pan(40.0, 40.0));
        assert_eq!(c.offset(), Vec2::ZERO);
    }

    #[test]
    fn update_after_end_is_ignored() {
        let mut c = controller();
        c.begin_pan(0.0, 0.0);
        c.update_pan(8.0, 3.0);
        c.end_pan();
        assert!(!c.update_pan(100.0, 100.0));
        assert_eq!(c.offset(), Vec2::new(8.0, 3.0));
    }

    #[test]
    fn end_pan_is_idempotent() {
        let mut c = ViewportController::new(CountingSubscriber::default());
        c.begin_pan(1.0, 2.0);
        c.update_pan(4.0, 4.0);
        c.end_pan();
        let once = c.state();
        c.end_pan();
        assert_eq!(c.state(), once);
        assert_eq!(c.subscriber().detached, 1);
    }

    #[test]
    fn listeners_are_scoped_to_panning() {
        let mut c = ViewportController::new(CountingSubscriber::default());
        assert_eq!(c.subscriber().live(), 0);

        c.begin_pan(0.0, 0.0);
        assert!(c.is_panning());
        assert_eq!(c.subscriber().live(), 1);

        // Re-anchoring mid-gesture must not stack listeners.
        c.begin_pan(5.0, 5.0);
        assert_eq!(c.subscriber().attached, 1);

        c.end_pan();
        assert_eq!(c.subscriber().live(), 0);

        for _ in 0..3 {
            c.begin_pan(0.0, 0.0);
            c.end_pan();
        }
        assert_eq!(c.subscriber().attached, 4);
        assert_eq!(c.subscriber().live(), 0);
    }

    #[test]
    fn non_finite_pointer_does_not_start_a_pan() {
        let mut c = ViewportController::new(CountingSubscriber::default());
        c.begin_pan(f64::NAN, 0.0);
        assert!(!c.is_panning());
        assert_eq!(c.subscriber().attached, 0);
    }

    #[test]
    fn select_layer_accepts_known_names() {
        let mut c = controller();
        assert_eq!(c.select_layer("Infrared"), Ok(Layer::Infrared));
        assert_eq!(c.active_layer(), Layer::Infrared);
    }

    #[test]
    fn unknown_layer_leaves_previous_layer() {
        let mut c = controller();
        c.set_layer(Layer::Xray);
        assert!(c.select_layer("Ultraviolet").is_err());
        assert_eq!(c.active_layer(), Layer::Xray);
    }

    #[test]
    fn reset_restores_defaults_and_releases_listeners() {
        let mut c = ViewportController::new(CountingSubscriber::default());
        c.zoom_by(2.0);
        c.set_layer(Layer::Infrared);
        c.begin_pan(0.0, 0.0);
        c.update_pan(9.0, 9.0);
        c.reset();
        assert_eq!(c.state(), ViewportState::default());
        assert_eq!(c.subscriber().live(), 0);
    }

    #[test]
    fn style_tracks_gesture_state() {
        let mut c = controller();
        c.zoom_in();
        c.begin_pan(10.0, 10.0);
        c.update_pan(15.0, 12.0);
        let style = c.image_style();
        assert_eq!(style.transform, "scale(1.5)");
        assert_eq!(style.left, "5px");
        assert_eq!(style.top, "2px");
        assert_eq!(style.cursor, "grabbing");
        c.end_pan();
        assert_eq!(c.image_style().cursor, "grab");
    }
}
