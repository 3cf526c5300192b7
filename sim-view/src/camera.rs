//! Perspective orbit camera for drawing the 3-D aggregate with egui.

use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 60.0;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// A camera circling the origin.
///
/// The scene is rotated by `yaw` (around Y) then `pitch` (around X) and
/// viewed from `distance` along +Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

/// A projected point in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub pos: egui::Pos2,
    /// Distance from the camera along its view axis.
    pub depth: f32,
    /// Screen pixels per world unit at this depth.
    pub scale: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.35,
            distance: 8.0,
            fov_y: 50f32.to_radians(),
        }
    }
}

impl OrbitCamera {
    /// Rotates around the origin from a drag delta in pixels.
    pub fn orbit(&mut self, delta: egui::Vec2) {
        self.yaw += delta.x * 0.01;
        self.pitch = (self.pitch + delta.y * 0.01).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Moves toward (`factor < 1`) or away from the origin.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Pulls back far enough to fit a sphere of `radius` in view.
    pub fn frame(&mut self, radius: f32) {
        let fit = radius / (self.fov_y * 0.5).sin();
        self.distance = (fit * 1.1).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    fn rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw)
    }

    /// Projects a world position into `rect`.
    ///
    /// Returns `None` for points at or behind the near plane.
    pub fn project(&self, p: Vec3, rect: egui::Rect) -> Option<Projected> {
        let v = self.rotation() * p;
        let depth = self.distance - v.z;
        if depth <= 0.01 {
            return None;
        }

        let focal = rect.height() * 0.5 / (self.fov_y * 0.5).tan();
        let scale = focal / depth;
        let center = rect.center();
        Some(Projected {
            pos: egui::pos2(center.x + v.x * scale, center.y - v.y * scale),
            depth,
            scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0))
    }

    #[test]
    fn origin_projects_to_center() {
        let cam = OrbitCamera::default();
        let p = cam.project(Vec3::ZERO, rect()).unwrap();
        assert!((p.pos - rect().center()).length() < 1e-3);
        assert!((p.depth - cam.distance).abs() < 1e-5);
    }

    #[test]
    fn nearer_points_draw_larger() {
        let cam = OrbitCamera {
            yaw: 0.0,
            pitch: 0.0,
            ..OrbitCamera::default()
        };
        let near = cam.project(Vec3::new(0.0, 0.0, 2.0), rect()).unwrap();
        let far = cam.project(Vec3::new(0.0, 0.0, -2.0), rect()).unwrap();
        assert!(near.scale > far.scale);
        assert!(near.depth < far.depth);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let cam = OrbitCamera {
            yaw: 0.0,
            pitch: 0.0,
            distance: 5.0,
            ..OrbitCamera::default()
        };
        assert!(cam.project(Vec3::new(0.0, 0.0, 6.0), rect()).is_none());
    }

    #[test]
    fn positive_y_is_up_on_screen() {
        let cam = OrbitCamera {
            yaw: 0.0,
            pitch: 0.0,
            ..OrbitCamera::default()
        };
        let p = cam.project(Vec3::Y, rect()).unwrap();
        assert!(p.pos.y < rect().center().y);
    }

    #[test]
    fn quarter_yaw_turns_x_axis_away() {
        let cam = OrbitCamera {
            yaw: FRAC_PI_2,
            pitch: 0.0,
            ..OrbitCamera::default()
        };
        let p = cam.project(Vec3::X, rect()).unwrap();
        assert!((p.depth - (cam.distance + 1.0)).abs() < 1e-4);
    }

    #[test]
    fn orbit_clamps_pitch_and_zoom_clamps_distance() {
        let mut cam = OrbitCamera::default();
        cam.orbit(egui::vec2(0.0, 10_000.0));
        assert!(cam.pitch <= PITCH_LIMIT);
        cam.zoom(1e6);
        assert_eq!(cam.distance, MAX_DISTANCE);
        cam.zoom(0.0);
        assert_eq!(cam.distance, MIN_DISTANCE);
    }

    #[test]
    fn frame_keeps_sphere_in_front_of_camera() {
        let mut cam = OrbitCamera::default();
        cam.frame(3.0);
        assert!(cam.distance > 3.0);
    }
}
