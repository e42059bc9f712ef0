//! Track and ride state types
//!
//! All state that persists across ticks or edits lives here.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Frame of the generating loop, recorded on every generator-produced point
/// so banked geometry can be rebuilt downstream.
///
/// `right = normalize(forward x up)` at generation time; never mutated after
/// creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopMetadata {
    /// Anchor position the loop was grown from
    pub entry_pos: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub radius: f32,
    /// This point's angle within the loop (0 to 2π)
    pub theta: f32,
}

/// An authored 3-D anchor the track curve passes through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Session-unique id, never reused
    pub id: String,
    pub position: Vec3,
    /// Banking angle in degrees
    pub tilt: f32,
    /// Present only on loop-generator output
    #[serde(default)]
    pub loop_meta: Option<LoopMetadata>,
}

impl TrackPoint {
    pub fn new(id: String, position: Vec3) -> Self {
        Self {
            id,
            position,
            tilt: 0.0,
            loop_meta: None,
        }
    }
}

/// Allocates session-unique point ids from a monotonic counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointIdAlloc {
    next: u64,
}

impl PointIdAlloc {
    pub fn next_id(&mut self) -> String {
        self.next += 1;
        format!("point-{}", self.next)
    }
}

/// Ride phase derived from the ride flags and progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RidePhase {
    /// Not riding
    Idle,
    /// Chain lift engaged, constant climb speed
    Climb,
    /// Free coast under energy conservation
    Coast,
}

/// Scalar ride progress and the energy-model history that drives it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RideState {
    pub riding: bool,
    /// Position along the curve in [0, 1)
    pub progress: f32,
    /// Highest track height seen so far this ride (energy reference)
    pub max_height_reached: f32,
    /// User speed scale applied to both phases
    pub speed_multiplier: f32,
    pub chain_lift_active: bool,
}

impl Default for RideState {
    fn default() -> Self {
        Self {
            riding: false,
            progress: 0.0,
            max_height_reached: 0.0,
            speed_multiplier: 1.0,
            chain_lift_active: true,
        }
    }
}

impl RideState {
    /// Begin a ride at the start of the curve
    pub fn start(&mut self, start_height: f32, chain_lift: bool) {
        self.riding = true;
        self.progress = 0.0;
        self.max_height_reached = start_height;
        self.chain_lift_active = chain_lift;
    }

    /// End the ride and discard progress
    pub fn stop(&mut self) {
        self.riding = false;
        self.progress = 0.0;
    }

    pub fn phase(&self, first_peak_t: f32) -> RidePhase {
        if !self.riding {
            RidePhase::Idle
        } else if self.chain_lift_active && self.progress < first_peak_t {
            RidePhase::Climb
        } else {
            RidePhase::Coast
        }
    }
}

/// Smoothing history the camera carries across ticks.
///
/// `previous_up` is the parallel-transported frame axis; it must stay unit
/// length and orthogonal to the current tangent after each update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrameState {
    pub previous_up: Vec3,
    pub previous_camera_pos: Vec3,
    pub previous_look_at: Vec3,
    pub previous_roll: f32,
}

impl Default for CameraFrameState {
    fn default() -> Self {
        Self {
            previous_up: Vec3::Y,
            previous_camera_pos: Vec3::ZERO,
            previous_look_at: Vec3::ZERO,
            previous_roll: 0.0,
        }
    }
}

impl CameraFrameState {
    /// Reseed the transported up for a new ride; smoothing history from a
    /// prior ride is not meaningful for a new one.
    pub fn reset_for_ride(&mut self) {
        self.previous_up = Vec3::Y;
    }
}

/// Smoothed camera pose produced by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
    /// Bank roll in radians about the camera forward axis
    pub roll: f32,
}

impl CameraPose {
    /// World orientation: aim at the look-at target, then roll about the
    /// camera's own forward axis.
    pub fn orientation(&self) -> Quat {
        let forward = (self.look_at - self.position).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        let aim = Quat::from_mat3(&Mat3::from_cols(right, up, -forward));
        aim * Quat::from_rotation_z(-self.roll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_id_alloc_monotonic() {
        let mut ids = PointIdAlloc::default();
        assert_eq!(ids.next_id(), "point-1");
        assert_eq!(ids.next_id(), "point-2");
        assert_eq!(ids.next_id(), "point-3");
    }

    #[test]
    fn test_ride_phase_transitions() {
        let mut ride = RideState::default();
        assert_eq!(ride.phase(0.2), RidePhase::Idle);

        ride.start(5.0, true);
        assert_eq!(ride.phase(0.2), RidePhase::Climb);

        ride.progress = 0.3;
        assert_eq!(ride.phase(0.2), RidePhase::Coast);

        ride.stop();
        assert_eq!(ride.phase(0.2), RidePhase::Idle);
        assert_eq!(ride.progress, 0.0);
    }

    #[test]
    fn test_ride_start_without_chain_lift_coasts_immediately() {
        let mut ride = RideState::default();
        ride.start(2.0, false);
        assert_eq!(ride.phase(0.2), RidePhase::Coast);
        assert_relative_eq!(ride.max_height_reached, 2.0);
    }

    #[test]
    fn test_camera_pose_orientation_is_unit() {
        let pose = CameraPose {
            position: Vec3::new(0.0, 1.0, 0.0),
            look_at: Vec3::new(3.0, 1.0, 4.0),
            roll: 0.4,
        };
        let q = pose.orientation();
        assert_relative_eq!(q.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_camera_pose_orientation_degenerate_target() {
        // Look-at coincides with position; helper must not produce NaN
        let pose = CameraPose {
            position: Vec3::ONE,
            look_at: Vec3::ONE,
            roll: 0.0,
        };
        let q = pose.orientation();
        assert!(q.is_finite());
    }
}
