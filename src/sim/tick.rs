//! Per-frame ride tick
//!
//! One "advance simulation by dt and recompute camera" step per rendered
//! frame: physics first, then the camera at the new progress. Exactly one
//! writer mutates the ride and camera state; nothing here blocks or retries.

use super::camera::update_camera;
use super::curve::TrackCurve;
use super::physics::{ProgressOutcome, advance_progress};
use super::state::{CameraFrameState, CameraPose, RideState};

/// Authoring flags sampled live for one tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub looped: bool,
    pub chain_lift: bool,
    pub speed_multiplier: f32,
    /// Chain lift disengage parameter for the current track
    pub first_peak_t: f32,
}

/// What one simulation tick produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickResult {
    /// Not riding, or the curve cannot be advanced this tick
    Idle,
    /// Ride advanced; camera pose for this frame
    Running(CameraPose),
    /// Open track reached its end; ride state has been reset
    Finished,
}

/// Advance the ride by `dt` seconds and recompute the camera pose.
pub fn tick(
    ride: &mut RideState,
    camera: &mut CameraFrameState,
    curve: &impl TrackCurve,
    input: &TickInput,
    dt: f32,
) -> TickResult {
    if !ride.riding {
        return TickResult::Idle;
    }

    // The multiplier and chain-lift toggles take effect mid-ride
    ride.speed_multiplier = input.speed_multiplier;
    ride.chain_lift_active = input.chain_lift;

    match advance_progress(ride, curve, input.looped, input.first_peak_t, dt) {
        ProgressOutcome::Stalled => TickResult::Idle,
        ProgressOutcome::Finished => TickResult::Finished,
        ProgressOutcome::Advanced => {
            let pose = update_camera(camera, curve, ride.progress, input.looped);
            TickResult::Running(pose)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_FIRST_PEAK_T;
    use crate::sim::curve::CatmullRomCurve;
    use crate::sim::physics::first_peak_t;
    use crate::sim::state::TrackPoint;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn input(looped: bool, chain_lift: bool, peak: f32) -> TickInput {
        TickInput {
            looped,
            chain_lift,
            speed_multiplier: 1.0,
            first_peak_t: peak,
        }
    }

    fn open_flat_track() -> CatmullRomCurve {
        let points = vec![
            TrackPoint::new("point-1".into(), Vec3::ZERO),
            TrackPoint::new("point-2".into(), Vec3::new(10.0, 0.0, 0.0)),
        ];
        CatmullRomCurve::from_track(&points, false).unwrap()
    }

    #[test]
    fn test_idle_without_ride() {
        let curve = open_flat_track();
        let mut ride = RideState::default();
        let mut camera = CameraFrameState::default();

        let result = tick(
            &mut ride,
            &mut camera,
            &curve,
            &input(false, false, DEFAULT_FIRST_PEAK_T),
            0.016,
        );
        assert_eq!(result, TickResult::Idle);
    }

    #[test]
    fn test_running_tick_reports_pose_and_advances() {
        let curve = open_flat_track();
        let mut ride = RideState::default();
        let mut camera = CameraFrameState::default();
        ride.start(0.0, false);

        let result = tick(
            &mut ride,
            &mut camera,
            &curve,
            &input(false, false, DEFAULT_FIRST_PEAK_T),
            0.016,
        );
        assert!(matches!(result, TickResult::Running(_)));
        assert!(ride.progress > 0.0);
    }

    #[test]
    fn test_open_track_ride_terminates() {
        // Two points at (0,0,0) and (10,0,0), open, no chain lift: ticking
        // with a large enough dt must end the ride rather than loop forever
        let curve = open_flat_track();
        let mut ride = RideState::default();
        let mut camera = CameraFrameState::default();
        ride.start(0.0, false);

        let mut finished = false;
        for _ in 0..2_000 {
            match tick(
                &mut ride,
                &mut camera,
                &curve,
                &input(false, false, DEFAULT_FIRST_PEAK_T),
                0.1,
            ) {
                TickResult::Finished => {
                    finished = true;
                    break;
                }
                TickResult::Running(_) => {}
                TickResult::Idle => panic!("ride stalled mid-run"),
            }
        }
        assert!(finished);
        assert!(!ride.riding);
        assert_relative_eq!(ride.progress, 0.0);
    }

    #[test]
    fn test_frame_invariants_hold_over_a_hilly_ride() {
        let points = vec![
            TrackPoint::new("point-1".into(), Vec3::ZERO),
            TrackPoint::new("point-2".into(), Vec3::new(10.0, 8.0, 0.0)),
            TrackPoint::new("point-3".into(), Vec3::new(20.0, 0.0, 5.0)),
            TrackPoint::new("point-4".into(), Vec3::new(30.0, 4.0, 0.0)),
        ];
        let curve = CatmullRomCurve::from_track(&points, true).unwrap();
        let peak = first_peak_t(&curve);
        let mut ride = RideState::default();
        let mut camera = CameraFrameState::default();
        ride.start(0.0, true);
        camera.reset_for_ride();

        for _ in 0..500 {
            let result = tick(&mut ride, &mut camera, &curve, &input(true, true, peak), 0.016);
            assert!(matches!(result, TickResult::Running(_)));

            let tangent = curve.tangent(ride.progress).normalize_or_zero();
            assert_relative_eq!(camera.previous_up.length(), 1.0, epsilon = 1e-4);
            assert_relative_eq!(camera.previous_up.dot(tangent), 0.0, epsilon = 1e-4);
            assert!(ride.progress >= 0.0 && ride.progress < 1.0);
        }
    }

    #[test]
    fn test_closed_ride_wraps_and_reseeds_lift_height() {
        let points = vec![
            TrackPoint::new("point-1".into(), Vec3::new(0.0, 2.0, 0.0)),
            TrackPoint::new("point-2".into(), Vec3::new(10.0, 6.0, 0.0)),
            TrackPoint::new("point-3".into(), Vec3::new(20.0, 0.0, 5.0)),
            TrackPoint::new("point-4".into(), Vec3::new(5.0, 1.0, 10.0)),
        ];
        let curve = CatmullRomCurve::from_track(&points, true).unwrap();
        let mut ride = RideState::default();
        let mut camera = CameraFrameState::default();
        ride.start(curve.point(0.0).y, true);
        ride.progress = 0.995;
        ride.max_height_reached = 50.0;

        // Force a wrap in one tick
        tick(&mut ride, &mut camera, &curve, &input(true, true, 0.2), 1.0);
        assert!(ride.progress < 0.995);
        assert_relative_eq!(ride.max_height_reached, curve.point(0.0).y, epsilon = 1e-4);
    }
}
