//! 3x3x3 puzzle cube
//!
//! Pointer clicks are resolved against the cubelets' oriented boxes into a
//! quarter turn of one outer layer. The turn animates through a temporary
//! pivot and grid slots are re-derived from positions when it lands.

pub mod cubelet;
pub mod engine;
pub mod picking;
pub mod transform;

pub use cubelet::{Axis, Cubelet, Face, FaceColors, GridCoord};
pub use engine::{CubeEngine, LayerTurn, PickHit};
pub use picking::{BoxHit, Camera, Ray, Viewport, ray_box};
pub use transform::Transform;
