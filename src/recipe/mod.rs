pub mod animation;
pub mod camera_finder;
pub mod controller;
pub mod highlight;
pub mod mesh_index;
pub mod sequencer;
pub mod steps;

pub use controller::{ControllerConfig, ControllerError, TapToAdvance};
pub use sequencer::{Phase, TapOutcome};
