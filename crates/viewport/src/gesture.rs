use foundation::Vec2;

/// Pan gesture captured at pointer-down.
///
/// `anchor` is the pointer position relative to the image offset at the
/// moment the gesture began; every subsequent offset is `pointer - anchor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    pub anchor: Vec2,
}

impl PanGesture {
    pub fn begin(pointer: Vec2, offset: Vec2) -> Self {
        Self {
            anchor: pointer - offset,
        }
    }

    pub fn offset_for(&self, pointer: Vec2) -> Vec2 {
        pointer - self.anchor
    }
}

/// Gesture state machine. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Panning(PanGesture),
}

impl GesturePhase {
    pub fn is_panning(&self) -> bool {
        matches!(self, GesturePhase::Panning(_))
    }
}

/// Global move/release listeners, scoped to the Panning state.
///
/// `attach` runs on Idle -> Panning and `detach` on Panning -> Idle, each
/// exactly once per gesture. Implementations must not call back into the
/// controller from either method.
pub trait PointerSubscriber {
    fn attach(&mut self);
    fn detach(&mut self);
}

/// For hosts that deliver move/release events unconditionally.
impl PointerSubscriber for () {
    fn attach(&mut self) {}
    fn detach(&mut self) {}
}
