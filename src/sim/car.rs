//! Coaster car pose along the track
//!
//! The car body rides slightly below the rail centerline and aligns to the
//! curve tangent: yaw from the horizontal direction, pitch from the vertical
//! component. Mesh assembly is left to the presentation layer.

use glam::Vec3;

use super::curve::TrackCurve;
use crate::consts::CAR_DROP;

/// World pose of the car body at a ride progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarPose {
    pub position: Vec3,
    /// Heading about the world Y axis, radians
    pub yaw: f32,
    /// Nose pitch about the car's lateral axis, radians
    pub pitch: f32,
}

/// Derive the car pose from curve and progress.
pub fn car_pose(curve: &impl TrackCurve, progress: f32) -> CarPose {
    let mut position = curve.point(progress);
    position.y -= CAR_DROP;

    let tangent = curve.tangent(progress).normalize_or_zero();
    CarPose {
        position,
        yaw: tangent.x.atan2(tangent.z),
        pitch: (-tangent.y).clamp(-1.0, 1.0).asin(),
    }
}
