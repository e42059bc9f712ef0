//! Ride progress physics
//!
//! Two-phase speed model: constant-speed chain lift up to the first peak,
//! then free coast with speed from potential-to-kinetic energy conversion
//! relative to the highest point reached so far, so speed is
//! path-history-dependent rather than tied to the global track maximum.

use super::curve::TrackCurve;
use super::state::RideState;
use crate::consts::{
    CHAIN_LIFT_SPEED, CLIMB_TANGENT_THRESHOLD, DEFAULT_FIRST_PEAK_T, DESCENT_TANGENT_THRESHOLD,
    GRAVITY, MIN_CURVE_LENGTH, MIN_RIDE_SPEED, PEAK_SCAN_STEP, PEAK_SCAN_STEPS,
};

/// Locate the parameter of the first climb peak, where the chain lift
/// disengages.
///
/// Scans the first half of the curve in fixed steps: once a climb is seen
/// (vertical tangent above threshold) the running height maximum is tracked,
/// and the scan stops at the first clear descent past that maximum. Falls
/// back to a fixed parameter when no climb/peak pattern exists.
pub fn first_peak_t(curve: &impl TrackCurve) -> f32 {
    let mut max_height = f32::NEG_INFINITY;
    let mut peak_t = 0.0_f32;
    let mut found_climb = false;

    // Fixed integer step count; accumulating the float parameter instead
    // would drift across platforms.
    for step in 0..=PEAK_SCAN_STEPS {
        let t = step as f32 * PEAK_SCAN_STEP;
        let height = curve.point(t).y;
        let tangent = curve.tangent(t).normalize_or_zero();

        if tangent.y > CLIMB_TANGENT_THRESHOLD {
            found_climb = true;
        }
        if found_climb && height > max_height {
            max_height = height;
            peak_t = t;
        }
        if found_climb && tangent.y < DESCENT_TANGENT_THRESHOLD && t > peak_t {
            break;
        }
    }

    if peak_t > 0.0 {
        peak_t
    } else {
        DEFAULT_FIRST_PEAK_T
    }
}

/// What a physics tick did with the ride
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Progress moved forward (possibly wrapping on a closed track)
    Advanced,
    /// Open track reached its end; the ride state has been reset
    Finished,
    /// Nothing happened: not riding, or the curve is degenerate
    Stalled,
}

/// Advance ride progress by one tick of `dt` seconds.
pub fn advance_progress(
    ride: &mut RideState,
    curve: &impl TrackCurve,
    looped: bool,
    first_peak_t: f32,
    dt: f32,
) -> ProgressOutcome {
    if !ride.riding {
        return ProgressOutcome::Stalled;
    }
    let curve_length = curve.length();
    if curve_length <= MIN_CURVE_LENGTH {
        return ProgressOutcome::Stalled;
    }

    let current_height = curve.point(ride.progress).y;
    ride.max_height_reached = ride.max_height_reached.max(current_height);

    let speed = if ride.chain_lift_active && ride.progress < first_peak_t {
        CHAIN_LIFT_SPEED * ride.speed_multiplier
    } else {
        let height_drop = (ride.max_height_reached - current_height).max(0.0);
        let energy_speed = (2.0 * GRAVITY * height_drop).sqrt();
        energy_speed.max(MIN_RIDE_SPEED) * ride.speed_multiplier
    };

    let mut progress = ride.progress + speed * dt / curve_length;
    if progress >= 1.0 {
        if looped {
            progress %= 1.0;
            if ride.chain_lift_active {
                // The car re-enters the lift hill; energy history restarts
                ride.max_height_reached = curve.point(0.0).y;
            }
        } else {
            ride.stop();
            return ProgressOutcome::Finished;
        }
    }
    ride.progress = progress;
    ProgressOutcome::Advanced
}
