//! Deterministic ride simulation module
//!
//! All track geometry and ride logic lives here. This module must be pure:
//! - Tick-driven, single writer per tick
//! - No rendering or platform dependencies
//! - Degenerate input clamps or falls back, never panics

pub mod camera;
pub mod car;
pub mod curve;
pub mod loop_gen;
pub mod physics;
pub mod state;
pub mod tick;

pub use camera::{transport_up, update_camera};
pub use car::{CarPose, car_pose};
pub use curve::{CatmullRomCurve, TrackCurve, catmull_rom, catmull_rom_scalar};
pub use loop_gen::generate_loop;
pub use physics::{ProgressOutcome, advance_progress, first_peak_t};
pub use state::{
    CameraFrameState, CameraPose, LoopMetadata, PointIdAlloc, RidePhase, RideState, TrackPoint,
};
pub use tick::{TickInput, TickResult, tick};
