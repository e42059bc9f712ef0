//! Ride camera frame tracking
//!
//! Maintains a roll-stable viewpoint along the curve via parallel transport
//! of a persistent up vector. Using world-up directly would be numerically
//! singular through vertical and inverted sections; transporting the previous
//! frame's up keeps the camera from rolling unpredictably there.

use glam::Vec3;

use super::curve::TrackCurve;
use super::state::{CameraFrameState, CameraPose};
use crate::consts::{
    CAMERA_HEIGHT, CAMERA_LERP, CAMERA_LOOK_AHEAD, OPEN_TRACK_LOOK_CLAMP, TRANSPORT_EPSILON,
};

/// Carry an up vector one step along the curve by removing its component
/// along the new tangent.
///
/// Returns a unit vector orthogonal to `tangent`. When the tangent is nearly
/// parallel to the carried up (looking straight up or down), the frame is
/// re-derived from world-up instead.
pub fn transport_up(previous_up: Vec3, tangent: Vec3) -> Vec3 {
    let projected = previous_up - tangent * previous_up.dot(tangent);
    if projected.length() > TRANSPORT_EPSILON {
        projected.normalize()
    } else {
        let fallback = Vec3::Y - tangent * Vec3::Y.dot(tangent);
        fallback.normalize_or(Vec3::X)
    }
}

/// Advance the camera state one tick at the simulator's new progress and
/// return the smoothed pose.
pub fn update_camera(
    state: &mut CameraFrameState,
    curve: &impl TrackCurve,
    progress: f32,
    looped: bool,
) -> CameraPose {
    let position = curve.point(progress);
    let tangent = curve.tangent(progress).normalize_or_zero();

    let up = transport_up(state.previous_up, tangent);
    state.previous_up = up;

    let look_ahead_t = if looped {
        (progress + CAMERA_LOOK_AHEAD) % 1.0
    } else {
        (progress + CAMERA_LOOK_AHEAD).min(OPEN_TRACK_LOOK_CLAMP)
    };
    let look_at_point = curve.point(look_ahead_t);

    let camera_offset = up * CAMERA_HEIGHT;
    let target_camera_pos = position + camera_offset;
    let target_look_at = look_at_point + camera_offset * 0.5;

    // Fixed smoothing factor per rendered frame, independent of elapsed
    // time; faster frame rates smooth harder. Known limitation.
    state.previous_camera_pos = state.previous_camera_pos.lerp(target_camera_pos, CAMERA_LERP);
    state.previous_look_at = state.previous_look_at.lerp(target_look_at, CAMERA_LERP);

    let target_roll = curve.tilt_at(progress).to_radians();
    state.previous_roll += (target_roll - state.previous_roll) * CAMERA_LERP;

    CameraPose {
        position: state.previous_camera_pos,
        look_at: state.previous_look_at,
        roll: state.previous_roll,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    /// Quarter-circle climb in the XY plane, banked 45 degrees throughout.
    struct ClimbCurve;

    impl TrackCurve for ClimbCurve {
        fn point(&self, t: f32) -> Vec3 {
            let angle = t * std::f32::consts::FRAC_PI_2;
            Vec3::new(angle.sin() * 20.0, (1.0 - angle.cos()) * 20.0, 0.0)
        }

        fn tangent(&self, t: f32) -> Vec3 {
            let angle = t * std::f32::consts::FRAC_PI_2;
            Vec3::new(angle.cos(), angle.sin(), 0.0)
        }

        fn length(&self) -> f32 {
            std::f32::consts::FRAC_PI_2 * 20.0
        }

        fn tilt_at(&self, _t: f32) -> f32 {
            45.0
        }
    }

    #[test]
    fn test_transport_preserves_orthonormality() {
        let mut up = Vec3::Y;
        // Sweep the tangent from horizontal to vertical
        for step in 0..=20 {
            let angle = step as f32 / 20.0 * std::f32::consts::FRAC_PI_2;
            let tangent = Vec3::new(angle.cos(), angle.sin(), 0.0);
            up = transport_up(up, tangent);
            assert_relative_eq!(up.length(), 1.0, epsilon = 1e-5);
            assert_relative_eq!(up.dot(tangent), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_transport_through_vertical_rederives_from_world_up() {
        // Carried up parallel to the tangent: the projection is degenerate
        let up = transport_up(Vec3::Y, Vec3::Y);
        assert_relative_eq!(up.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(up.dot(Vec3::Y), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_transport_identity_on_straight_track() {
        let up = transport_up(Vec3::Y, Vec3::X);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(up.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(up.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_camera_converges_to_target() {
        let mut state = CameraFrameState::default();
        let curve = ClimbCurve;

        // Repeated ticks at a fixed progress pull the smoothed pose onto the
        // target
        for _ in 0..200 {
            update_camera(&mut state, &curve, 0.0, false);
        }

        let expected = curve.point(0.0) + state.previous_up * CAMERA_HEIGHT;
        assert_relative_eq!(
            state.previous_camera_pos.distance(expected),
            0.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_roll_converges_to_banking() {
        let mut state = CameraFrameState::default();
        let curve = ClimbCurve;

        for _ in 0..200 {
            update_camera(&mut state, &curve, 0.5, false);
        }
        assert_relative_eq!(state.previous_roll, 45.0_f32.to_radians(), epsilon = 1e-3);
    }

    #[test]
    fn test_up_stays_orthogonal_across_ride() {
        let mut state = CameraFrameState::default();
        let curve = ClimbCurve;

        for step in 0..=50 {
            let progress = step as f32 / 50.0;
            update_camera(&mut state, &curve, progress, false);
            let tangent = curve.tangent(progress).normalize();
            assert_relative_eq!(state.previous_up.length(), 1.0, epsilon = 1e-4);
            assert_relative_eq!(state.previous_up.dot(tangent), 0.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_look_ahead_clamps_on_open_track() {
        let mut state = CameraFrameState::default();
        let curve = ClimbCurve;

        // Near the end of an open track the look-ahead must not pass the end
        let pose = update_camera(&mut state, &curve, 0.995, false);
        let end = curve.point(1.0);
        // Look-at target stays at or before the track end (plus half offset)
        assert!(pose.look_at.x <= end.x + CAMERA_HEIGHT);
    }

    proptest! {
        /// The transported up stays unit length and orthogonal to the tangent
        /// for arbitrary tangent sequences, including near-vertical ones.
        #[test]
        fn prop_transport_orthonormal(
            components in proptest::collection::vec(
                (-1.0_f32..1.0, -1.0_f32..1.0, -1.0_f32..1.0),
                1..32,
            )
        ) {
            let mut up = Vec3::Y;
            for (x, y, z) in components {
                let tangent = Vec3::new(x, y, z).normalize_or(Vec3::X);
                up = transport_up(up, tangent);
                prop_assert!((up.length() - 1.0).abs() < 1e-4);
                prop_assert!(up.dot(tangent).abs() < 1e-4);
            }
        }
    }
}
