//! Track authoring session
//!
//! The single owner of the control-point sequence, ride state, and camera
//! state. The UI layer is a thin adapter over this type: it forwards edits
//! and calls `advance` once per rendered frame. Unknown point ids in any
//! mutation are silent no-ops; nothing here panics on bad input.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_FIRST_PEAK_T;
use crate::sim::car::{CarPose, car_pose};
use crate::sim::curve::{CatmullRomCurve, TrackCurve};
use crate::sim::loop_gen::generate_loop;
use crate::sim::physics::first_peak_t;
use crate::sim::state::{
    CameraFrameState, CameraPose, PointIdAlloc, RidePhase, RideState, TrackPoint,
};
use crate::sim::tick::{TickInput, TickResult, tick};

/// Authoring/ride mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CoasterMode {
    #[default]
    Build,
    Ride,
    Preview,
}

/// One coaster authoring session.
///
/// Created at session start, reset by `clear_track`/`stop_ride`, dropped at
/// session end. The curve and the chain-lift disengage parameter are cached
/// and rebuilt lazily after track edits.
#[derive(Debug, Clone)]
pub struct CoasterSession {
    points: Vec<TrackPoint>,
    ids: PointIdAlloc,
    selected: Option<String>,
    mode: CoasterMode,
    looped: bool,
    chain_lift: bool,
    speed_multiplier: f32,
    ride: RideState,
    camera: CameraFrameState,
    curve: Option<CatmullRomCurve>,
    first_peak: f32,
    curve_dirty: bool,
}

impl Default for CoasterSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CoasterSession {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            ids: PointIdAlloc::default(),
            selected: None,
            mode: CoasterMode::Build,
            looped: false,
            chain_lift: true,
            speed_multiplier: 1.0,
            ride: RideState::default(),
            camera: CameraFrameState::default(),
            curve: None,
            first_peak: DEFAULT_FIRST_PEAK_T,
            curve_dirty: true,
        }
    }

    // === Read access ===

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn mode(&self) -> CoasterMode {
        self.mode
    }

    pub fn selected_point(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn ride(&self) -> &RideState {
        &self.ride
    }

    pub fn camera(&self) -> &CameraFrameState {
        &self.camera
    }

    pub fn is_riding(&self) -> bool {
        self.ride.riding
    }

    pub fn progress(&self) -> f32 {
        self.ride.progress
    }

    pub fn phase(&self) -> RidePhase {
        self.ride.phase(self.first_peak)
    }

    pub fn looped(&self) -> bool {
        self.looped
    }

    pub fn chain_lift(&self) -> bool {
        self.chain_lift
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    // === Point editing ===

    /// Append a control point; returns its id.
    pub fn add_point(&mut self, position: Vec3) -> String {
        let id = self.ids.next_id();
        self.points.push(TrackPoint::new(id.clone(), position));
        self.curve_dirty = true;
        id
    }

    pub fn update_point_position(&mut self, id: &str, position: Vec3) {
        if let Some(point) = self.points.iter_mut().find(|p| p.id == id) {
            point.position = position;
            self.curve_dirty = true;
        }
    }

    pub fn update_point_tilt(&mut self, id: &str, tilt: f32) {
        if let Some(point) = self.points.iter_mut().find(|p| p.id == id) {
            point.tilt = tilt;
            self.curve_dirty = true;
        }
    }

    pub fn remove_point(&mut self, id: &str) {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        if self.points.len() != before {
            if self.selected.as_deref() == Some(id) {
                self.selected = None;
            }
            self.curve_dirty = true;
        }
    }

    /// Splice a generated loop in at the given anchor point.
    pub fn insert_loop_at(&mut self, id: &str) {
        let before = self.points.len();
        self.points = generate_loop(&self.points, id, &mut self.ids);
        if self.points.len() != before {
            self.curve_dirty = true;
        }
    }

    /// Select a point, or pass `None` to clear. Unknown ids clear nothing
    /// and select nothing.
    pub fn select_point(&mut self, id: Option<&str>) {
        self.selected = id
            .filter(|id| self.points.iter().any(|p| p.id == *id))
            .map(str::to_owned);
    }

    /// Drop all points and any ride in progress. Point ids are not reused.
    pub fn clear_track(&mut self) {
        self.points.clear();
        self.selected = None;
        self.ride.stop();
        self.curve = None;
        self.first_peak = DEFAULT_FIRST_PEAK_T;
        self.curve_dirty = true;
        log::info!("Track cleared");
    }

    // === Ride settings ===

    pub fn set_mode(&mut self, mode: CoasterMode) {
        self.mode = mode;
    }

    pub fn set_looped(&mut self, looped: bool) {
        if self.looped != looped {
            self.looped = looped;
            self.curve_dirty = true;
        }
    }

    pub fn set_chain_lift(&mut self, chain_lift: bool) {
        self.chain_lift = chain_lift;
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier;
    }

    // === Ride lifecycle ===

    /// Start a ride from the top of the track. Refused (returns false) when
    /// fewer than 2 points exist.
    pub fn start_ride(&mut self) -> bool {
        if self.points.len() < 2 {
            return false;
        }
        self.refresh_curve();
        let Some(curve) = &self.curve else {
            return false;
        };

        self.ride.speed_multiplier = self.speed_multiplier;
        self.ride.start(curve.point(0.0).y, self.chain_lift);
        self.camera.reset_for_ride();
        self.mode = CoasterMode::Ride;
        log::info!(
            "Ride started: {} points, curve length {:.1}",
            self.points.len(),
            curve.length()
        );
        true
    }

    pub fn stop_ride(&mut self) {
        self.mode = CoasterMode::Build;
        self.ride.stop();
        log::info!("Ride stopped");
    }

    /// Advance the simulation by `dt` seconds; returns the camera pose while
    /// the ride is running.
    pub fn advance(&mut self, dt: f32) -> Option<CameraPose> {
        if !self.ride.riding {
            return None;
        }
        self.refresh_curve();
        let Some(curve) = &self.curve else {
            return None;
        };

        let input = TickInput {
            looped: self.looped,
            chain_lift: self.chain_lift,
            speed_multiplier: self.speed_multiplier,
            first_peak_t: self.first_peak,
        };
        match tick(&mut self.ride, &mut self.camera, curve, &input, dt) {
            TickResult::Running(pose) => Some(pose),
            TickResult::Finished => {
                self.mode = CoasterMode::Build;
                log::info!("Ride finished");
                None
            }
            TickResult::Idle => None,
        }
    }

    /// Car body pose at the current ride progress.
    pub fn car_pose(&mut self) -> Option<CarPose> {
        self.refresh_curve();
        self.curve
            .as_ref()
            .map(|curve| car_pose(curve, self.ride.progress))
    }

    fn refresh_curve(&mut self) {
        if !self.curve_dirty {
            return;
        }
        self.curve = CatmullRomCurve::from_track(&self.points, self.looped);
        self.first_peak = match &self.curve {
            Some(curve) => {
                let peak = first_peak_t(curve);
                log::debug!("Chain lift disengages at t = {peak:.3}");
                peak
            }
            None => DEFAULT_FIRST_PEAK_T,
        };
        self.curve_dirty = false;
    }
}
