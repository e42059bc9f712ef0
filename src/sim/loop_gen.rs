//! Procedural loop insertion
//!
//! Grows a vertical loop with a mild corkscrew from a single anchor point and
//! splices it into the authored sequence. The lateral helix ramp separates
//! the ascending and descending strands, which the planar loop equation alone
//! would make coincide in 3-D space.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::state::{LoopMetadata, PointIdAlloc, TrackPoint};
use crate::consts::{
    EXIT_CREEP, EXIT_EASE_COUNT, EXIT_THETA_OVERSHOOT, HELIX_SEPARATION, LOOP_POINT_COUNT,
    LOOP_RADIUS, MIN_FORWARD_LEN, TRANSITION_COUNT,
};

#[inline]
fn ease_out_quad(x: f32) -> f32 {
    1.0 - (1.0 - x) * (1.0 - x)
}

/// Splice a generated loop into `points` at the anchor with the given id.
///
/// Returns the new point sequence; points before and after the anchor are
/// untouched. An unknown `anchor_id` returns the input unchanged.
pub fn generate_loop(
    points: &[TrackPoint],
    anchor_id: &str,
    ids: &mut PointIdAlloc,
) -> Vec<TrackPoint> {
    let Some(anchor_index) = points.iter().position(|p| p.id == anchor_id) else {
        return points.to_vec();
    };
    let entry_pos = points[anchor_index].position;

    // Approach direction, flattened to the horizontal plane; loops are
    // authored to start from a roughly level run-in.
    let mut forward = Vec3::X;
    if anchor_index > 0 {
        let mut approach = entry_pos - points[anchor_index - 1].position;
        approach.y = 0.0;
        if approach.length() >= MIN_FORWARD_LEN {
            forward = approach.normalize();
        }
    }
    let up = Vec3::Y;
    let right = forward.cross(up).normalize();

    let meta = |theta: f32| LoopMetadata {
        entry_pos,
        forward,
        up,
        right,
        radius: LOOP_RADIUS,
        theta,
    };

    let mut inserted: Vec<TrackPoint> =
        Vec::with_capacity(LOOP_POINT_COUNT + EXIT_EASE_COUNT + TRANSITION_COUNT);

    // Helical loop body: one full turn with a linear lateral ramp
    for i in 1..=LOOP_POINT_COUNT {
        let t = i as f32 / LOOP_POINT_COUNT as f32;
        let theta = t * TAU;

        let forward_offset = theta.sin() * LOOP_RADIUS;
        let vertical_offset = (1.0 - theta.cos()) * LOOP_RADIUS;
        let lateral_offset = t * HELIX_SEPARATION;

        inserted.push(TrackPoint {
            id: ids.next_id(),
            position: entry_pos
                + forward * forward_offset
                + right * lateral_offset
                + up * vertical_offset,
            tilt: 0.0,
            loop_meta: Some(meta(theta)),
        });
    }

    // Exit easing continues past the full turn with decaying amplitude so the
    // spline does not pinch where the loop closes back to horizontal.
    for i in 1..=EXIT_EASE_COUNT {
        let t = i as f32 / EXIT_EASE_COUNT as f32;
        let eased = ease_out_quad(t);
        let decay = 1.0 - eased;

        let theta = TAU + t * PI * EXIT_THETA_OVERSHOOT;
        let forward_offset = theta.sin() * LOOP_RADIUS * decay + eased * EXIT_CREEP;
        let vertical_offset = (1.0 - theta.cos()) * LOOP_RADIUS * decay;

        inserted.push(TrackPoint {
            id: ids.next_id(),
            position: entry_pos
                + forward * forward_offset
                + right * HELIX_SEPARATION
                + up * vertical_offset,
            tilt: 0.0,
            // Orientation held at the full turn through the exit
            loop_meta: Some(meta(TAU)),
        });
    }

    // Straight transition samples give the spline enough room to blend back
    // into the pre-existing track instead of cutting a sharp corner.
    if let Some(next) = points.get(anchor_index + 1) {
        let exit_pos = inserted.last().map_or(entry_pos, |p| p.position);
        for i in 1..=TRANSITION_COUNT {
            let t = i as f32 / (TRANSITION_COUNT + 1) as f32;
            inserted.push(TrackPoint::new(ids.next_id(), exit_pos.lerp(next.position, t)));
        }
    }

    log::info!(
        "Loop at {}: {} generated points spliced in",
        anchor_id,
        inserted.len()
    );

    let mut result = Vec::with_capacity(points.len() + inserted.len());
    result.extend_from_slice(&points[..=anchor_index]);
    result.append(&mut inserted);
    result.extend_from_slice(&points[anchor_index + 1..]);
    result
}
