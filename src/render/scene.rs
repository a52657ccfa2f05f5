//! Scene composition: the declarative scene graph for the tree.
//!
//! Architecture:
//!   - `SceneSettings` : seed + tree shape + particle counts
//!   - `compose`       : builds camera, lights, backdrop, starfield, the tree
//!                       group (cone, trunk, ornaments, sparkles) and the
//!                       post-processing chain
//!   - `Scene::activate`: dispatches the activation callback for one ornament
//!
//! Everything except the callback is plain data; painting lives in
//! `render::paint`, projection and picking in `render::camera`.

use std::f32::consts::{PI, TAU};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ornament::{OrnamentPlacement, OrnamentType, OrnamentVariant};
use crate::render::layout::{generate_ornaments, TreeParams};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Scene graph types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Perspective camera the view starts from
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_y_deg: f32,
}

/// Orbit control limits
#[derive(Debug, Clone, Copy)]
pub struct OrbitLimits {
    pub enable_pan: bool,
    /// Polar angle measured from +Y (radians)
    pub min_polar: f32,
    pub max_polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate: bool,
    /// 2.0 is one revolution every 30 seconds
    pub auto_rotate_speed: f32,
}

impl OrbitLimits {
    /// Auto-rotation rate in radians per second.
    pub fn auto_rotate_rate(&self) -> f32 {
        if self.auto_rotate {
            TAU / 60.0 * self.auto_rotate_speed
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        intensity: f32,
    },
    Point {
        position: [f32; 3],
        color: &'static str,
        intensity: f32,
    },
    /// Spot aimed at the world origin
    Spot {
        position: [f32; 3],
        angle: f32,
        penumbra: f32,
        intensity: f32,
        cast_shadow: bool,
    },
}

impl Light {
    /// Scalar light reaching `point` (world space).
    pub fn contribution(&self, point: [f32; 3]) -> f32 {
        match *self {
            Light::Ambient { intensity } => intensity,
            Light::Point {
                position,
                intensity,
                ..
            } => {
                let d2 = dist2(position, point);
                intensity / (1.0 + d2)
            }
            Light::Spot {
                position,
                angle,
                penumbra,
                intensity,
                ..
            } => {
                let axis = normalize(sub([0.0; 3], position));
                let to_point = normalize(sub(point, position));
                let theta = dot(axis, to_point).clamp(-1.0, 1.0).acos();
                let outer = angle * (1.0 + penumbra);
                if theta >= outer {
                    0.0
                } else if theta <= angle * (1.0 - penumbra) {
                    intensity * 0.25
                } else {
                    let inner = angle * (1.0 - penumbra);
                    intensity * 0.25 * (outer - theta) / (outer - inner).max(1e-4)
                }
            }
        }
    }
}

/// Environment preset used for the backdrop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Night,
}

impl Environment {
    /// Backdrop gradient (top, horizon) as 0..1 RGB.
    pub fn backdrop(self) -> ([f32; 3], [f32; 3]) {
        match self {
            Environment::Night => ([0.008, 0.024, 0.09], [0.06, 0.09, 0.2]),
        }
    }
}

/// One background star
#[derive(Debug, Clone, Copy)]
pub struct StarPoint {
    pub position: [f32; 3],
    pub size: f32,
    /// Hue in 0..1 (rendered desaturated)
    pub hue: f32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    pub radius: f32,
    pub depth: f32,
    pub saturation: f32,
    pub fade: bool,
    /// Rotation speed in radians per second
    pub speed: f32,
    pub stars: Vec<StarPoint>,
}

#[derive(Debug, Clone, Copy)]
pub struct ConeMesh {
    pub center: [f32; 3],
    pub radius: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub color: &'static str,
    pub opacity: f32,
    pub wireframe: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CylinderMesh {
    pub center: [f32; 3],
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub color: &'static str,
}

/// Floating light specks
#[derive(Debug, Clone)]
pub struct Sparkles {
    pub center: [f32; 3],
    pub extent: [f32; 3],
    pub size: f32,
    pub speed: f32,
    pub color: &'static str,
    /// (position, phase)
    pub points: Vec<([f32; 3], f32)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animation {
    None,
    /// Spin around Y and pulse the scale
    SpinPulse { spin_speed: f32, pulse_amplitude: f32 },
    /// Gentle vertical bob
    Float { speed: f32, intensity: f32 },
}

/// Instantaneous transform of an ornament
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World position
    pub position: [f32; 3],
    pub scale: f32,
    /// Rotation about Y (radians)
    pub spin: f32,
}

/// An interactive ornament in the scene
#[derive(Debug, Clone)]
pub struct OrnamentNode {
    pub placement: OrnamentPlacement,
    pub variant: OrnamentVariant,
    pub animation: Animation,
    /// Glow strength; 0 for non-emissive materials
    pub emissive: f32,
    pub phase: f32,
}

impl OrnamentNode {
    fn new(placement: OrnamentPlacement, phase: f32) -> Self {
        let variant = placement.kind.variant();
        let (animation, emissive) = match variant {
            OrnamentVariant::Star => (
                Animation::SpinPulse {
                    spin_speed: 0.9,
                    pulse_amplitude: 0.05,
                },
                1.5,
            ),
            OrnamentVariant::Ball => (Animation::Float { speed: 2.0, intensity: 1.0 }, 0.0),
            OrnamentVariant::Gift => (Animation::Float { speed: 1.5, intensity: 1.0 }, 0.0),
            _ => (Animation::None, 0.0),
        };
        Self {
            placement,
            variant,
            animation,
            emissive,
            phase,
        }
    }

    /// Pose at `time` seconds with the tree group translated by `offset`.
    pub fn pose(&self, offset: [f32; 3], time: f32) -> Pose {
        let base = add(self.placement.position, offset);
        let scale = self.placement.scale;
        match self.animation {
            Animation::None => Pose {
                position: base,
                scale,
                spin: 0.0,
            },
            Animation::SpinPulse {
                spin_speed,
                pulse_amplitude,
            } => Pose {
                position: base,
                scale: scale * (1.0 + (time * 2.0).sin() * pulse_amplitude),
                spin: (time * spin_speed + self.phase) % TAU,
            },
            Animation::Float { speed, intensity } => {
                let bob = (time * speed / 4.0 + self.phase).sin() * 0.1 * intensity;
                Pose {
                    position: [base[0], base[1] + bob, base[2]],
                    scale,
                    spin: 0.0,
                }
            }
        }
    }
}

/// Animation clock wraps after this many seconds to keep f32 phases precise.
pub const ANIMATION_PERIOD: f64 = std::f64::consts::TAU * 1000.0;

/// Animation time for `elapsed` seconds since start.
pub fn animation_time(elapsed: f64) -> f32 {
    (elapsed.max(0.0) % ANIMATION_PERIOD) as f32
}

#[derive(Debug, Clone)]
pub struct TreeGroup {
    pub offset: [f32; 3],
    pub cone: ConeMesh,
    pub trunk: CylinderMesh,
    pub ornaments: Vec<OrnamentNode>,
    pub sparkles: Sparkles,
    /// Point lights in tree space
    pub lights: Vec<Light>,
}

#[derive(Debug, Clone, Copy)]
pub struct ContactShadow {
    pub position: [f32; 3],
    pub opacity: f32,
    pub scale: f32,
    pub blur: f32,
    pub far: f32,
}

/// Post-processing passes, applied in order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostEffect {
    Bloom {
        luminance_threshold: f32,
        luminance_smoothing: f32,
        intensity: f32,
    },
    Noise {
        opacity: f32,
    },
    Vignette {
        offset: f32,
        darkness: f32,
    },
}

/// Inputs to scene composition
#[derive(Debug, Clone)]
pub struct SceneSettings {
    pub seed: u64,
    pub tree: TreeParams,
    pub star_count: usize,
    pub sparkle_count: usize,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            tree: TreeParams::default(),
            star_count: 5000,
            sparkle_count: 150,
        }
    }
}

/// The composed, renderable scene
pub struct Scene {
    pub background: &'static str,
    pub environment: Environment,
    pub camera: PerspectiveCamera,
    pub controls: OrbitLimits,
    /// World-space lights (ambient + spot)
    pub lights: Vec<Light>,
    pub starfield: Starfield,
    pub tree: TreeGroup,
    pub contact_shadow: ContactShadow,
    pub post: Vec<PostEffect>,
    on_activate: Box<dyn Fn(OrnamentType)>,
}

impl Scene {
    pub fn ornaments(&self) -> &[OrnamentNode] {
        &self.tree.ornaments
    }

    /// Activate the ornament at `index`: the callback receives its type.
    pub fn activate(&self, index: usize) -> Option<OrnamentType> {
        let kind = self.tree.ornaments.get(index)?.placement.kind;
        log::debug!("ornament {} activated ({})", index, kind);
        (self.on_activate)(kind);
        Some(kind)
    }

    /// World pose of the ornament at `index`.
    pub fn ornament_pose(&self, index: usize, time: f32) -> Option<Pose> {
        self.tree
            .ornaments
            .get(index)
            .map(|n| n.pose(self.tree.offset, time))
    }

    /// Light reaching a world-space point, clamped to 0..=1.5.
    pub fn illumination(&self, point: [f32; 3]) -> f32 {
        let world: f32 = self.lights.iter().map(|l| l.contribution(point)).sum();
        let local_point = sub(point, self.tree.offset);
        let tree: f32 = self
            .tree
            .lights
            .iter()
            .map(|l| l.contribution(local_point))
            .sum();
        (world + tree).clamp(0.0, 1.5)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Composition
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compose the scene. `on_activate` runs whenever an ornament is activated.
pub fn compose<F>(settings: &SceneSettings, on_activate: F) -> Scene
where
    F: Fn(OrnamentType) + 'static,
{
    let placements = generate_ornaments(settings.seed, &settings.tree);

    // Decorations draw from a separate stream so they never disturb the layout.
    let mut rng = ChaCha8Rng::seed_from_u64(settings.seed);
    rng.set_stream(1);

    let ornaments: Vec<OrnamentNode> = placements
        .into_iter()
        .map(|p| {
            let phase = rng.random_range(0.0..TAU);
            OrnamentNode::new(p, phase)
        })
        .collect();

    let starfield = build_starfield(&mut rng, settings.star_count, 100.0, 50.0);
    let sparkles = build_sparkles(&mut rng, settings.sparkle_count, [0.0, 6.0, 0.0], [12.0, 14.0, 12.0]);

    log::info!(
        "composed scene: {} ornaments, {} stars, {} sparkles (seed {})",
        ornaments.len(),
        starfield.stars.len(),
        sparkles.points.len(),
        settings.seed
    );

    Scene {
        background: "#020617",
        environment: Environment::Night,
        camera: PerspectiveCamera {
            position: [0.0, 10.0, 25.0],
            target: [0.0, 0.0, 0.0],
            fov_y_deg: 40.0,
        },
        controls: OrbitLimits {
            enable_pan: false,
            min_polar: PI / 4.0,
            max_polar: PI / 1.5,
            min_distance: 10.0,
            max_distance: 40.0,
            auto_rotate: true,
            auto_rotate_speed: 0.5,
        },
        lights: vec![
            Light::Ambient { intensity: 0.2 },
            Light::Spot {
                position: [10.0, 20.0, 10.0],
                angle: 0.15,
                penumbra: 1.0,
                intensity: 2.0,
                cast_shadow: true,
            },
        ],
        starfield,
        tree: TreeGroup {
            offset: [0.0, -5.0, 0.0],
            cone: ConeMesh {
                center: [0.0, 6.0, 0.0],
                radius: 5.5,
                height: 12.0,
                radial_segments: 32,
                color: "#064e3b",
                opacity: 0.15,
                wireframe: true,
            },
            trunk: CylinderMesh {
                center: [0.0, -0.5, 0.0],
                radius_top: 0.8,
                radius_bottom: 1.0,
                height: 1.0,
                radial_segments: 16,
                color: "#3f2305",
            },
            ornaments,
            sparkles,
            lights: vec![
                Light::Point {
                    position: [2.0, 3.0, 2.0],
                    color: "#fbbf24",
                    intensity: 20.0,
                },
                Light::Point {
                    position: [-2.0, 7.0, -2.0],
                    color: "#e11d48",
                    intensity: 20.0,
                },
                Light::Point {
                    position: [0.0, 1.0, -3.0],
                    color: "#16a34a",
                    intensity: 15.0,
                },
            ],
        },
        contact_shadow: ContactShadow {
            position: [0.0, -5.0, 0.0],
            opacity: 0.4,
            scale: 20.0,
            blur: 2.0,
            far: 4.5,
        },
        post: vec![
            PostEffect::Bloom {
                luminance_threshold: 0.5,
                luminance_smoothing: 0.9,
                intensity: 1.5,
            },
            PostEffect::Noise { opacity: 0.02 },
            PostEffect::Vignette {
                offset: 0.1,
                darkness: 1.1,
            },
        ],
        on_activate: Box::new(on_activate),
    }
}

/// Stars scattered through a spherical shell, outermost first.
fn build_starfield<R: Rng>(rng: &mut R, count: usize, radius: f32, depth: f32) -> Starfield {
    let mut r = radius + depth;
    let increment = if count > 0 { depth / count as f32 } else { 0.0 };
    let factor = 4.0;

    let stars = (0..count)
        .map(|i| {
            r -= increment * rng.random::<f32>();
            let phi = (1.0 - rng.random::<f32>() * 2.0).clamp(-1.0, 1.0).acos();
            let theta = rng.random::<f32>() * TAU;
            StarPoint {
                position: [
                    r * phi.sin() * theta.sin(),
                    r * phi.cos(),
                    r * phi.sin() * theta.cos(),
                ],
                size: (0.5 + 0.5 * rng.random::<f32>()) * factor,
                hue: i as f32 / count as f32,
            }
        })
        .collect();

    Starfield {
        radius,
        depth,
        saturation: 0.0,
        fade: true,
        speed: 0.01,
        stars,
    }
}

fn build_sparkles<R: Rng>(rng: &mut R, count: usize, center: [f32; 3], extent: [f32; 3]) -> Sparkles {
    let points = (0..count)
        .map(|_| {
            let p = [
                center[0] + (rng.random::<f32>() - 0.5) * extent[0],
                center[1] + (rng.random::<f32>() - 0.5) * extent[1],
                center[2] + (rng.random::<f32>() - 0.5) * extent[2],
            ];
            (p, rng.random_range(0.0..TAU))
        })
        .collect();

    Sparkles {
        center,
        extent,
        size: 4.0,
        speed: 0.2,
        color: "#fbbf24",
        points,
    }
}

// ── small vector helpers ──

pub(crate) fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub(crate) fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub(crate) fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub(crate) fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub(crate) fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = dot(v, v).sqrt();
    if len > 1e-6 {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        v
    }
}

fn dist2(a: [f32; 3], b: [f32; 3]) -> f32 {
    let d = sub(a, b);
    dot(d, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn small_settings(seed: u64) -> SceneSettings {
        SceneSettings {
            seed,
            star_count: 64,
            sparkle_count: 8,
            ..SceneSettings::default()
        }
    }

    #[test]
    fn activation_dispatches_ornament_type() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let scene = compose(&small_settings(5), move |t| sink.borrow_mut().push(t));

        let last = scene.ornaments().len() - 1;
        assert_eq!(scene.activate(last), Some(OrnamentType::Star));
        let first = scene.ornaments()[0].placement.kind;
        assert_eq!(scene.activate(0), Some(first));
        assert_eq!(*seen.borrow(), vec![OrnamentType::Star, first]);
    }

    #[test]
    fn unknown_index_is_ignored() {
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let scene = compose(&small_settings(5), move |_| *sink.borrow_mut() += 1);
        assert_eq!(scene.activate(usize::MAX), None);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn layout_matches_generator() {
        let settings = small_settings(11);
        let scene = compose(&settings, |_| {});
        let expected = generate_ornaments(11, &settings.tree);
        let got: Vec<_> = scene.ornaments().iter().map(|n| n.placement.clone()).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn post_chain_order() {
        let scene = compose(&small_settings(1), |_| {});
        assert_eq!(scene.post.len(), 3);
        assert!(matches!(scene.post[0], PostEffect::Bloom { .. }));
        assert!(matches!(scene.post[1], PostEffect::Noise { .. }));
        assert!(matches!(scene.post[2], PostEffect::Vignette { .. }));
    }

    #[test]
    fn undrawn_types_use_ball_shape() {
        let scene = compose(&small_settings(2), |_| {});
        for node in scene.ornaments() {
            match node.placement.kind {
                OrnamentType::Santa
                | OrnamentType::Reindeer
                | OrnamentType::Bear
                | OrnamentType::CrystalBall => assert_eq!(node.variant, OrnamentVariant::Ball),
                _ => {}
            }
        }
    }

    #[test]
    fn topper_pose_is_offset_into_world() {
        let scene = compose(&small_settings(3), |_| {});
        let last = scene.ornaments().len() - 1;
        let pose = scene.ornament_pose(last, 0.0).unwrap();
        assert_eq!(pose.position, [0.0, 7.5, 0.0]);
        assert!((pose.scale - 1.5).abs() < 1e-6);
    }

    #[test]
    fn float_bob_is_small() {
        let scene = compose(&small_settings(4), |_| {});
        for (i, node) in scene.ornaments().iter().enumerate() {
            if let Animation::Float { .. } = node.animation {
                for t in [0.0, 0.7, 3.1, 10.0] {
                    let pose = scene.ornament_pose(i, t).unwrap();
                    let rest = node.placement.position[1] + scene.tree.offset[1];
                    assert!((pose.position[1] - rest).abs() <= 0.1 + 1e-5);
                }
            }
        }
    }

    #[test]
    fn starfield_stays_in_shell() {
        let scene = compose(&small_settings(6), |_| {});
        let sf = &scene.starfield;
        assert_eq!(sf.stars.len(), 64);
        for s in &sf.stars {
            let r = dot(s.position, s.position).sqrt();
            assert!(r <= sf.radius + sf.depth + 1e-3);
            assert!(r >= sf.radius - 1e-3);
        }
    }

    #[test]
    fn lights_brighten_near_tree() {
        let scene = compose(&small_settings(7), |_| {});
        let near = scene.illumination([2.0, -2.0, 2.0]);
        let far = scene.illumination([60.0, 60.0, 60.0]);
        assert!(near > far);
        assert!(far >= 0.2 - 1e-6);
        assert!(near <= 1.5);
    }

    #[test]
    fn auto_rotate_takes_two_minutes() {
        let scene = compose(&small_settings(8), |_| {});
        let period = TAU / scene.controls.auto_rotate_rate();
        assert!((period - 120.0).abs() < 1e-2);
    }

    #[test]
    fn animation_time_wraps() {
        assert_eq!(animation_time(0.0), 0.0);
        assert!((animation_time(12.5) - 12.5).abs() < 1e-6);
        let week = 7.0 * 24.0 * 3600.0;
        let t = animation_time(week);
        assert!((0.0..ANIMATION_PERIOD as f32).contains(&t));
        assert!((t as f64 - week % ANIMATION_PERIOD).abs() < 1e-2);
    }
}
