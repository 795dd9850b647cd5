/// Orbit-style camera controls with optional auto-rotation
use nalgebra::{Point3, Vector3};

use crate::projection::Camera;

/// Pitch limit just short of the poles to keep the up vector valid
const PITCH_LIMIT: f32 = 1.5;

/// Auto-rotation advances the yaw by this base angle each frame; one full
/// orbit takes 60 seconds at speed 1.0 on a 60 fps clock.
const AUTO_ROTATE_STEP: f32 = 2.0 * std::f32::consts::PI / 60.0 / 60.0;

/// Camera controls orbiting a focal point.
///
/// The host feeds pointer/key deltas in through `rotate` and `zoom`; the
/// render loop calls `update` once per frame to advance auto-rotation and
/// write the resulting camera pose.
pub struct OrbitControls {
    pub target: Point3<f32>,
    distance: f32,
    min_distance: f32,
    max_distance: f32,
    yaw: f32,
    pitch: f32,
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            target: Point3::origin(),
            distance: 5.0,
            min_distance: 0.1,
            max_distance: f32::MAX,
            yaw: 0.0,
            pitch: 0.3,
            auto_rotate: false,
            auto_rotate_speed: 1.0,
        }
    }

    /// Orbit the camera by yaw/pitch deltas (radians).
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Dolly toward (positive delta) or away from the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance =
            (self.distance * (1.0 - delta * 0.1)).clamp(self.min_distance, self.max_distance);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Place the orbit at a fixed distance from a target. The zoom range
    /// follows so the model cannot be lost by scrolling.
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
        self.min_distance = distance * 0.05;
        self.max_distance = distance * 20.0;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Camera position derived from the spherical orbit state.
    pub fn position(&self) -> Point3<f32> {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vector3::new(x, y, z)
    }

    /// Per-frame step: advance auto-rotation and write the camera pose.
    pub fn update(&mut self, camera: &mut Camera) {
        if self.auto_rotate {
            self.yaw += AUTO_ROTATE_STEP * self.auto_rotate_speed;
        }
        camera.position = self.position();
        camera.look_at(self.target);
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_clamped() {
        let mut controls = OrbitControls::new();
        controls.rotate(0.0, 10.0);
        assert!(controls.pitch <= PITCH_LIMIT);
        controls.rotate(0.0, -20.0);
        assert!(controls.pitch >= -PITCH_LIMIT);
    }

    #[test]
    fn test_position_at_distance() {
        let mut controls = OrbitControls::new();
        controls.set_distance(7.0);
        let p = controls.position();
        assert!((nalgebra::distance(&p, &controls.target) - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_update_without_auto_rotate_keeps_yaw() {
        let mut camera = Camera::perspective(70f32.to_radians(), 1.0, 1.0, 1000.0);
        let mut controls = OrbitControls::new();
        let yaw = controls.yaw();
        controls.update(&mut camera);
        assert_eq!(controls.yaw(), yaw);
    }

    #[test]
    fn test_update_with_auto_rotate_advances_yaw() {
        let mut camera = Camera::perspective(70f32.to_radians(), 1.0, 1.0, 1000.0);
        let mut controls = OrbitControls::new();
        controls.auto_rotate = true;
        controls.auto_rotate_speed = 2.0;

        let yaw = controls.yaw();
        controls.update(&mut camera);
        assert!((controls.yaw() - yaw - AUTO_ROTATE_STEP * 2.0).abs() < 1e-7);

        // The camera follows the orbit and keeps aiming at the target
        assert!((camera.position - controls.position()).norm() < 1e-6);
        assert!((camera.target - controls.target).norm() < 1e-6);
    }

    #[test]
    fn test_zoom_clamped_to_range() {
        let mut controls = OrbitControls::new();
        controls.set_distance(10.0);
        for _ in 0..1000 {
            controls.zoom(1.0);
        }
        assert!(controls.distance() >= 10.0 * 0.05 - 1e-4);
        for _ in 0..1000 {
            controls.zoom(-1.0);
        }
        assert!(controls.distance() <= 10.0 * 20.0 + 1e-2);
    }
}
