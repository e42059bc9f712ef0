//! Coasterworks - Procedural roller-coaster authoring and ride simulation
//!
//! Core modules:
//! - `sim`: Deterministic ride simulation (loop generation, curve evaluation,
//!   ride physics, camera frame tracking)
//! - `session`: Track authoring session owning the point sequence and the
//!   ride lifecycle

pub mod session;
pub mod sim;

pub use session::{CoasterMode, CoasterSession};
pub use sim::{
    CameraFrameState, CameraPose, CarPose, CatmullRomCurve, RidePhase, RideState, TrackCurve,
    TrackPoint,
};

/// Simulation tuning constants
pub mod consts {
    /// Scale applied to the original full-size coaster dimensions
    pub const WORLD_SCALE: f32 = 0.5;

    /// Loop radius of a generated loop
    pub const LOOP_RADIUS: f32 = 8.0;
    /// Lateral corkscrew offset accumulated over one full loop turn
    pub const HELIX_SEPARATION: f32 = 3.5;
    /// Points generated for the loop body
    pub const LOOP_POINT_COUNT: usize = 20;
    /// Points generated for the exit easing past the full turn
    pub const EXIT_EASE_COUNT: usize = 5;
    /// Straight transition samples between loop exit and the next point
    pub const TRANSITION_COUNT: usize = 4;
    /// Forward creep distance accumulated while easing out of the loop
    pub const EXIT_CREEP: f32 = 4.0;
    /// Fraction of pi the exit easing continues past the full turn
    pub const EXIT_THETA_OVERSHOOT: f32 = 0.3;
    /// Minimum planar approach length before falling back to the +X axis
    pub const MIN_FORWARD_LEN: f32 = 0.1;

    /// Constant car speed while the chain lift is engaged
    pub const CHAIN_LIFT_SPEED: f32 = 0.9;
    /// Floor speed during free coast
    pub const MIN_RIDE_SPEED: f32 = 1.0;
    /// Gravity in scaled world units
    pub const GRAVITY: f32 = 9.8 / WORLD_SCALE;
    /// Vertical tangent component that counts as climbing
    pub const CLIMB_TANGENT_THRESHOLD: f32 = 0.1;
    /// Vertical tangent component that counts as descending past the peak
    pub const DESCENT_TANGENT_THRESHOLD: f32 = -0.1;
    /// Number of fixed scan steps over [0, 0.5] for peak detection
    pub const PEAK_SCAN_STEPS: usize = 50;
    /// Parameter increment per scan step
    pub const PEAK_SCAN_STEP: f32 = 0.01;
    /// Chain lift disengage parameter when no climb/peak pattern is found
    pub const DEFAULT_FIRST_PEAK_T: f32 = 0.2;
    /// Curve lengths at or below this stall the tick (guards divide-by-zero)
    pub const MIN_CURVE_LENGTH: f32 = 1e-4;

    /// Camera height above the track along the transported up vector
    pub const CAMERA_HEIGHT: f32 = 1.5 * WORLD_SCALE;
    /// Fixed per-frame smoothing factor for camera position/look-at/roll
    pub const CAMERA_LERP: f32 = 0.1;
    /// Look-ahead distance in curve parameter space
    pub const CAMERA_LOOK_AHEAD: f32 = 0.02;
    /// Look-ahead clamp just short of the end of an open track
    pub const OPEN_TRACK_LOOK_CLAMP: f32 = 0.999;
    /// Below this projected length the transported up is re-derived
    pub const TRANSPORT_EPSILON: f32 = 0.01;

    /// Car body drop below the rail centerline
    pub const CAR_DROP: f32 = 0.3 * WORLD_SCALE;

    /// Arc-length samples per control point when measuring the curve
    pub const SAMPLES_PER_POINT: usize = 10;
}
