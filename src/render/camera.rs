//! Orbit camera: projection of world points into an egui rect, pointer
//! picking of ornaments, and orbit/zoom/auto-rotate bounded by `OrbitLimits`.

use std::f32::consts::TAU;

use egui::{vec2, Pos2, Rect};

use crate::render::scene::{add, cross, dot, normalize, sub, OrbitLimits, Scene};

const NEAR: f32 = 0.1;
const UP: [f32; 3] = [0.0, 1.0, 0.0];
/// Hit radius of an ornament at scale 1, in world units
const HIT_RADIUS: f32 = 0.6;

/// Camera orbiting a target point
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    /// Angle around Y in radians, kept in `0..TAU` (0 = looking down -Z from +Z)
    pub azimuth: f32,
    /// Angle from +Y in radians
    pub polar: f32,
    pub distance: f32,
    pub target: [f32; 3],
    pub fov_y: f32,
    pub limits: OrbitLimits,
}

/// A projected point
#[derive(Debug, Clone, Copy)]
pub struct Projected {
    pub pos: Pos2,
    /// Distance along the view direction
    pub depth: f32,
    /// Screen pixels per world unit at this depth
    pub pixels_per_unit: f32,
}

impl OrbitCamera {
    /// Camera matching the scene's initial perspective camera.
    pub fn from_scene(scene: &Scene) -> Self {
        let cam = scene.camera;
        let offset = sub(cam.position, cam.target);
        let distance = dot(offset, offset).sqrt().max(NEAR);
        let polar = (offset[1] / distance).clamp(-1.0, 1.0).acos();
        let azimuth = wrap_angle(offset[0].atan2(offset[2]));
        let mut camera = Self {
            azimuth,
            polar,
            distance,
            target: cam.target,
            fov_y: cam.fov_y_deg.to_radians(),
            limits: scene.controls,
        };
        camera.clamp();
        camera
    }

    pub fn eye(&self) -> [f32; 3] {
        let s = self.polar.sin();
        add(
            self.target,
            [
                self.distance * s * self.azimuth.sin(),
                self.distance * self.polar.cos(),
                self.distance * s * self.azimuth.cos(),
            ],
        )
    }

    /// Rotate by a pointer drag of (`dx`, `dy`) pixels in a view `height` pixels tall.
    pub fn orbit(&mut self, dx: f32, dy: f32, height: f32) {
        let h = height.max(1.0);
        self.azimuth = wrap_angle(self.azimuth - TAU * dx / h);
        self.polar -= TAU * dy / h;
        self.clamp();
    }

    /// Dolly in (positive `scroll`) or out.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance *= 0.95f32.powf(scroll / 50.0);
        self.clamp();
    }

    /// Advance auto-rotation by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.azimuth = wrap_angle(self.azimuth - self.limits.auto_rotate_rate() * dt);
    }

    fn clamp(&mut self) {
        self.polar = self.polar.clamp(self.limits.min_polar, self.limits.max_polar);
        self.distance = self
            .distance
            .clamp(self.limits.min_distance, self.limits.max_distance);
    }

    /// Project a world point into `rect`. `None` when behind the near plane.
    pub fn project(&self, point: [f32; 3], rect: Rect) -> Option<Projected> {
        let eye = self.eye();
        let forward = normalize(sub(self.target, eye));
        let right = normalize(cross(forward, UP));
        let up = cross(right, forward);

        let d = sub(point, eye);
        let depth = dot(d, forward);
        if depth < NEAR {
            return None;
        }
        let pixels_per_unit = (rect.height() * 0.5) / (depth * (self.fov_y * 0.5).tan());
        let x = dot(d, right) * pixels_per_unit;
        let y = dot(d, up) * pixels_per_unit;
        Some(Projected {
            pos: rect.center() + vec2(x, -y),
            depth,
            pixels_per_unit,
        })
    }

    /// Nearest ornament under `pointer` at `time`.
    pub fn pick(&self, scene: &Scene, rect: Rect, pointer: Pos2, time: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for i in 0..scene.ornaments().len() {
            let Some(pose) = scene.ornament_pose(i, time) else {
                continue;
            };
            let Some(p) = self.project(pose.position, rect) else {
                continue;
            };
            let radius = pose.scale * HIT_RADIUS * p.pixels_per_unit;
            if p.pos.distance(pointer) > radius {
                continue;
            }
            if best.map_or(true, |(_, depth)| p.depth < depth) {
                best = Some((i, p.depth));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Map an angle into `0..TAU`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::{compose, SceneSettings};

    fn scene() -> Scene {
        compose(
            &SceneSettings {
                seed: 21,
                star_count: 16,
                sparkle_count: 4,
                ..SceneSettings::default()
            },
            |_| {},
        )
    }

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0))
    }

    #[test]
    fn starts_at_scene_camera() {
        let cam = OrbitCamera::from_scene(&scene());
        let eye = cam.eye();
        assert!((eye[0] - 0.0).abs() < 1e-3);
        assert!((eye[1] - 10.0).abs() < 1e-3);
        assert!((eye[2] - 25.0).abs() < 1e-3);
    }

    #[test]
    fn target_projects_to_center() {
        let cam = OrbitCamera::from_scene(&scene());
        let p = cam.project(cam.target, viewport()).unwrap();
        assert!((p.pos.x - 400.0).abs() < 1e-3);
        assert!((p.pos.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn higher_points_project_higher() {
        let cam = OrbitCamera::from_scene(&scene());
        let low = cam.project([0.0, 0.0, 0.0], viewport()).unwrap();
        let high = cam.project([0.0, 5.0, 0.0], viewport()).unwrap();
        assert!(high.pos.y < low.pos.y);
    }

    #[test]
    fn behind_camera_is_culled() {
        let cam = OrbitCamera::from_scene(&scene());
        assert!(cam.project([0.0, 10.0, 60.0], viewport()).is_none());
    }

    #[test]
    fn orbit_and_zoom_respect_limits() {
        let mut cam = OrbitCamera::from_scene(&scene());
        cam.orbit(0.0, 100_000.0, 600.0);
        assert!((cam.polar - cam.limits.min_polar).abs() < 1e-6);
        cam.orbit(0.0, -100_000.0, 600.0);
        assert!((cam.polar - cam.limits.max_polar).abs() < 1e-6);
        cam.zoom(1.0e6);
        assert!((cam.distance - 10.0).abs() < 1e-4);
        cam.zoom(-1.0e6);
        assert!((cam.distance - 40.0).abs() < 1e-4);
    }

    #[test]
    fn auto_rotate_moves_azimuth() {
        let mut cam = OrbitCamera::from_scene(&scene());
        let rate = cam.limits.auto_rotate_rate();
        assert!(cam.azimuth.abs() < 1e-6);
        cam.advance(1.0);
        assert!((cam.azimuth - (TAU - rate)).abs() < 1e-4);
    }

    #[test]
    fn azimuth_stays_bounded() {
        let mut cam = OrbitCamera::from_scene(&scene());
        for _ in 0..100_000 {
            cam.advance(0.1);
        }
        cam.advance(1.0e7);
        assert!((0.0..TAU).contains(&cam.azimuth));

        cam.orbit(-1.0e6, 0.0, 600.0);
        assert!((0.0..TAU).contains(&cam.azimuth));
        cam.orbit(1.0e6, 0.0, 600.0);
        assert!((0.0..TAU).contains(&cam.azimuth));

        assert_eq!(wrap_angle(-1.0e-9), 0.0);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-6);
    }

    #[test]
    fn picks_topper_and_misses_sky() {
        let scene = scene();
        let mut cam = OrbitCamera::from_scene(&scene);
        let last = scene.ornaments().len() - 1;
        let topper = scene.ornament_pose(last, 0.0).unwrap();
        cam.target = topper.position;

        let p = cam.project(topper.position, viewport()).unwrap();
        assert_eq!(cam.pick(&scene, viewport(), p.pos, 0.0), Some(last));
        assert_eq!(cam.pick(&scene, viewport(), Pos2::new(2.0, 2.0), 0.0), None);
    }
}
