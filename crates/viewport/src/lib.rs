//! Pan/zoom viewport for a layered image.
//!
//! The controller owns the transform state (zoom, offset, active layer) and
//! the two-state gesture machine (Idle/Panning) that derives it from pointer
//! and wheel input. Rendering is left to the host, which reads an
//! [`ImageStyle`] or a [`ViewportTransform`] after every update.

pub mod controller;
pub mod gesture;
pub mod layer;
pub mod state;
pub mod transform;

pub use controller::*;
pub use gesture::*;
pub use layer::*;
pub use state::*;
pub use transform::*;
