//! Track curve evaluation
//!
//! Catmull-Rom interpolation over the authored point sequence, with
//! closed/open semantics and banking interpolation. The ride physics and
//! camera depend only on the `TrackCurve` trait, so any C1-continuous
//! evaluator can stand in.

use glam::Vec3;

use super::state::TrackPoint;
use crate::consts::SAMPLES_PER_POINT;

/// Continuous queries over the authored point sequence.
///
/// Tangents are not guaranteed unit length; callers normalize before any
/// angle math.
pub trait TrackCurve {
    /// Position at parameter t in [0, 1]
    fn point(&self, t: f32) -> Vec3;
    /// Derivative direction at t
    fn tangent(&self, t: f32) -> Vec3;
    /// Arc-length estimate for the whole curve
    fn length(&self) -> f32;
    /// Interpolated banking angle in degrees at t
    fn tilt_at(&self, t: f32) -> f32;
}

/// Catmull-Rom interpolation between four control positions
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Catmull-Rom interpolation for a scalar channel (banking)
pub fn catmull_rom_scalar(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Segment-wise Catmull-Rom curve through the track points.
///
/// Open curves clamp the end control points; closed curves wrap. Arc length
/// is measured once at construction from a fixed-resolution polyline.
#[derive(Debug, Clone)]
pub struct CatmullRomCurve {
    positions: Vec<Vec3>,
    tilts: Vec<f32>,
    closed: bool,
    length: f32,
}

impl CatmullRomCurve {
    /// Returns `None` when fewer than 2 points are given; a curve cannot be
    /// defined.
    pub fn from_track(points: &[TrackPoint], closed: bool) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let mut curve = Self {
            positions: points.iter().map(|p| p.position).collect(),
            tilts: points.iter().map(|p| p.tilt).collect(),
            closed,
            length: 0.0,
        };
        curve.length = curve.measure();
        Some(curve)
    }

    fn segment_count(&self) -> usize {
        if self.closed {
            self.positions.len()
        } else {
            self.positions.len() - 1
        }
    }

    /// Wrap (closed) or clamp (open) a control index
    fn control(&self, i: isize) -> usize {
        let n = self.positions.len() as isize;
        if self.closed {
            i.rem_euclid(n) as usize
        } else {
            i.clamp(0, n - 1) as usize
        }
    }

    /// Map t to a segment index and local parameter
    fn locate(&self, t: f32) -> (usize, f32) {
        let t = if self.closed {
            t.rem_euclid(1.0)
        } else {
            t.clamp(0.0, 1.0)
        };
        let segments = self.segment_count();
        let scaled = t * segments as f32;
        let seg = scaled.floor() as usize;
        if seg >= segments {
            (segments - 1, 1.0)
        } else {
            (seg, scaled - seg as f32)
        }
    }

    fn measure(&self) -> f32 {
        let samples = self.positions.len() * SAMPLES_PER_POINT;
        let mut total = 0.0;
        let mut prev = self.point(0.0);
        for i in 1..=samples {
            let next = self.point(i as f32 / samples as f32);
            total += prev.distance(next);
            prev = next;
        }
        total
    }
}

impl TrackCurve for CatmullRomCurve {
    fn point(&self, t: f32) -> Vec3 {
        let (seg, local) = self.locate(t);
        let i = seg as isize;
        catmull_rom(
            self.positions[self.control(i - 1)],
            self.positions[self.control(i)],
            self.positions[self.control(i + 1)],
            self.positions[self.control(i + 2)],
            local,
        )
    }

    fn tangent(&self, t: f32) -> Vec3 {
        // Central finite difference; locate() clamps or wraps the probes
        let delta = 1e-4;
        self.point(t + delta) - self.point(t - delta)
    }

    fn length(&self) -> f32 {
        self.length
    }

    fn tilt_at(&self, t: f32) -> f32 {
        let (seg, local) = self.locate(t);
        let i = seg as isize;
        catmull_rom_scalar(
            self.tilts[self.control(i - 1)],
            self.tilts[self.control(i)],
            self.tilts[self.control(i + 1)],
            self.tilts[self.control(i + 2)],
            local,
        )
    }
}
