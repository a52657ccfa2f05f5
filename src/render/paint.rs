//! egui Painter-based scene rendering.
//!
//! Projects the composed scene through an `OrbitCamera` and draws it back to
//! front: night backdrop, starfield, contact shadow, cone wireframe, trunk,
//! ornaments, sparkles, then the post chain (bloom halos, film noise,
//! vignette).

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use egui::epaint::Mesh;
use egui::{vec2, Color32, Painter, Pos2, Rect, Shape, Stroke};
use rayon::prelude::*;

use crate::ornament::{hex_rgb, OrnamentVariant};
use crate::render::camera::OrbitCamera;
use crate::render::scene::{add, Light, OrnamentNode, Pose, PostEffect, Scene};

const GOLD: [f32; 3] = [1.0, 0.84, 0.0];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const ORANGE: [f32; 3] = [1.0, 0.65, 0.0];

/// Something bright enough to feed the bloom pass
struct GlowSource {
    pos: Pos2,
    radius: f32,
    color: [f32; 3],
    strength: f32,
}

/// Draw `scene` into `rect`. `hovered` gets a highlight ring.
pub fn paint_scene(
    painter: &Painter,
    rect: Rect,
    scene: &Scene,
    camera: &OrbitCamera,
    time: f32,
    hovered: Option<usize>,
) {
    paint_backdrop(painter, rect, scene);
    paint_starfield(painter, rect, scene, camera, time);
    paint_contact_shadow(painter, rect, scene, camera, time);
    paint_cast_shadows(painter, rect, scene, camera);
    paint_cone(painter, rect, scene, camera);
    paint_trunk(painter, rect, scene, camera);

    let mut glow = paint_ornaments(painter, rect, scene, camera, time, hovered);
    paint_sparkles(painter, rect, scene, camera, time);

    for light in &scene.tree.lights {
        if let Light::Point {
            position,
            color,
            intensity,
        } = *light
        {
            let world = add(position, scene.tree.offset);
            if let Some(p) = camera.project(world, rect) {
                glow.push(GlowSource {
                    pos: p.pos,
                    radius: 0.25 * p.pixels_per_unit,
                    color: hex_rgb(color).unwrap_or(WHITE),
                    strength: (intensity / 20.0).min(1.0),
                });
            }
        }
    }

    for effect in &scene.post {
        match *effect {
            PostEffect::Bloom {
                luminance_threshold,
                luminance_smoothing,
                intensity,
            } => paint_bloom(painter, &glow, luminance_threshold, luminance_smoothing, intensity),
            PostEffect::Noise { opacity } => paint_noise(painter, rect, opacity, time),
            PostEffect::Vignette { offset, darkness } => paint_vignette(painter, rect, offset, darkness),
        }
    }
}

// ── backdrop & environment ──

fn paint_backdrop(painter: &Painter, rect: Rect, scene: &Scene) {
    let base = hex_rgb(scene.background).unwrap_or([0.0; 3]);
    let (top, horizon) = scene.environment.backdrop();
    let top = to_color32(mix(base, top, 0.5), 1.0);
    let bottom = to_color32(mix(base, horizon, 0.6), 1.0);

    let mut mesh = Mesh::default();
    mesh.colored_vertex(rect.left_top(), top);
    mesh.colored_vertex(rect.right_top(), top);
    mesh.colored_vertex(rect.right_bottom(), bottom);
    mesh.colored_vertex(rect.left_bottom(), bottom);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    painter.add(Shape::mesh(mesh));
}

fn paint_starfield(painter: &Painter, rect: Rect, scene: &Scene, camera: &OrbitCamera, time: f32) {
    let field = &scene.starfield;
    let angle = time * field.speed;
    let (sin, cos) = angle.sin_cos();
    let far = field.radius + field.depth;

    let dots: Vec<(Pos2, f32, Color32)> = field
        .stars
        .par_iter()
        .filter_map(|star| {
            let [x, y, z] = star.position;
            let rotated = [x * cos + z * sin, y, -x * sin + z * cos];
            let p = camera.project(rotated, rect)?;
            if !rect.contains(p.pos) {
                return None;
            }
            let fade = if field.fade {
                (1.0 - (p.depth / (far * 1.2))).clamp(0.2, 1.0)
            } else {
                1.0
            };
            let twinkle = 0.75 + 0.25 * (time * 1.5 + star.hue * TAU * 7.0).sin();
            let color = to_color32(star_tint(star.hue, field.saturation), fade * twinkle * 0.9);
            Some((p.pos, star.size * 0.22, color))
        })
        .collect();

    for (pos, radius, color) in dots {
        painter.circle_filled(pos, radius, color);
    }
}

fn paint_contact_shadow(painter: &Painter, rect: Rect, scene: &Scene, camera: &OrbitCamera, time: f32) {
    let shadow = &scene.contact_shadow;
    let ground = shadow.position;
    let black = |alpha: f32| Color32::from_rgba_unmultiplied(0, 0, 0, (alpha.clamp(0.0, 1.0) * 255.0) as u8);

    for (spread, alpha) in shadow_rings(shadow.opacity * 0.6, shadow.blur) {
        let radius = shadow.scale * 0.25 * spread;
        if let Some(points) = ground_ring(camera, rect, ground, radius, 32) {
            painter.add(Shape::convex_polygon(points, black(alpha), Stroke::NONE));
        }
    }

    // Ornaments close to the floor leave their own contact blob
    for node in scene.ornaments() {
        let pose = node.pose(scene.tree.offset, time);
        let strength = contact_strength(pose.position[1] - ground[1], shadow.far);
        if strength <= 0.0 {
            continue;
        }
        let center = [pose.position[0], ground[1], pose.position[2]];
        if let Some(points) = ground_ring(camera, rect, center, 0.5 * pose.scale, 12) {
            painter.add(Shape::convex_polygon(points, black(shadow.opacity * strength), Stroke::NONE));
        }
    }
}

/// Shadow the cone casts on the floor from each shadow-casting spot light.
fn paint_cast_shadows(painter: &Painter, rect: Rect, scene: &Scene, camera: &OrbitCamera) {
    let cone = &scene.tree.cone;
    let center = add(cone.center, scene.tree.offset);
    let apex = [center[0], center[1] + cone.height * 0.5, center[2]];
    let base = [center[0], center[1] - cone.height * 0.5, center[2]];
    let ground_y = scene.contact_shadow.position[1];

    for light in &scene.lights {
        let Light::Spot {
            position,
            intensity,
            cast_shadow: true,
            ..
        } = *light
        else {
            continue;
        };
        let Some(outline) = cast_shadow_outline(position, apex, base, cone.radius, ground_y) else {
            continue;
        };
        let points: Option<Vec<Pos2>> = outline
            .iter()
            .map(|p| camera.project(*p, rect).map(|p| p.pos))
            .collect();
        if let Some(points) = points {
            let alpha = (0.12 * intensity).min(0.35);
            painter.add(Shape::convex_polygon(
                points,
                Color32::from_rgba_unmultiplied(0, 0, 0, (alpha * 255.0) as u8),
                Stroke::NONE,
            ));
        }
    }
}

/// Projected circle on a horizontal plane. `None` if any point is culled.
fn ground_ring(camera: &OrbitCamera, rect: Rect, center: [f32; 3], radius: f32, segments: u32) -> Option<Vec<Pos2>> {
    (0..segments)
        .map(|k| {
            let a = k as f32 / segments as f32 * TAU;
            let world = add(center, [a.cos() * radius, 0.0, a.sin() * radius]);
            camera.project(world, rect).map(|p| p.pos)
        })
        .collect()
}

/// (radius factor, alpha) per layer of a feathered shadow, outermost first.
/// Layer alphas stack to `opacity` at the core.
fn shadow_rings(opacity: f32, blur: f32) -> Vec<(f32, f32)> {
    let layers = (blur.max(0.0) * 2.0).ceil().max(1.0) as usize;
    let alpha = opacity / layers as f32;
    (0..layers)
        .map(|k| {
            let t = 1.0 - k as f32 / layers as f32;
            (1.0 + 0.15 * blur.max(0.0) * t, alpha)
        })
        .collect()
}

/// Contact shadow strength of something `height` above the floor.
fn contact_strength(height: f32, far: f32) -> f32 {
    if far <= 0.0 || height < 0.0 {
        return 0.0;
    }
    (1.0 - height / far).clamp(0.0, 1.0)
}

/// Floor outline (world space) of a cone lit from `light`: the convex hull of
/// its base circle and its apex projected onto `ground_y`.
fn cast_shadow_outline(
    light: [f32; 3],
    apex: [f32; 3],
    base: [f32; 3],
    radius: f32,
    ground_y: f32,
) -> Option<Vec<[f32; 3]>> {
    if light[1] <= apex[1] {
        return None;
    }
    let onto_ground = |p: [f32; 3]| {
        let t = (light[1] - ground_y) / (light[1] - p[1]);
        [
            light[0] + (p[0] - light[0]) * t,
            light[2] + (p[2] - light[2]) * t,
        ]
    };

    let mut points: Vec<[f32; 2]> = (0..24)
        .map(|k| {
            let a = k as f32 / 24.0 * TAU;
            onto_ground([base[0] + a.cos() * radius, base[1], base[2] + a.sin() * radius])
        })
        .collect();
    points.push(onto_ground(apex));

    let hull = convex_hull(points);
    (hull.len() >= 3).then(|| hull.into_iter().map(|[x, z]| [x, ground_y, z]).collect())
}

/// Monotone-chain convex hull, counter-clockwise.
fn convex_hull(mut points: Vec<[f32; 2]>) -> Vec<[f32; 2]> {
    points.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    points.dedup();
    if points.len() < 3 {
        return points;
    }
    let turn = |o: [f32; 2], a: [f32; 2], b: [f32; 2]| (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0]);

    let chain = |iter: &mut dyn Iterator<Item = [f32; 2]>| {
        let mut half: Vec<[f32; 2]> = Vec::new();
        for p in iter {
            while half.len() >= 2 && turn(half[half.len() - 2], half[half.len() - 1], p) <= 0.0 {
                half.pop();
            }
            half.push(p);
        }
        half.pop();
        half
    };
    let mut hull = chain(&mut points.iter().copied());
    hull.extend(chain(&mut points.iter().rev().copied()));
    hull
}

// ── tree body ──

fn paint_cone(painter: &Painter, rect: Rect, scene: &Scene, camera: &OrbitCamera) {
    let cone = &scene.tree.cone;
    if !cone.wireframe {
        return;
    }
    let center = add(cone.center, scene.tree.offset);
    let apex = camera.project([center[0], center[1] + cone.height * 0.5, center[2]], rect);
    let base_y = center[1] - cone.height * 0.5;
    let segments = cone.radial_segments.max(3);
    let ring: Vec<Option<Pos2>> = (0..segments)
        .map(|k| {
            let a = k as f32 / segments as f32 * TAU;
            camera
                .project([center[0] + a.cos() * cone.radius, base_y, center[2] + a.sin() * cone.radius], rect)
                .map(|p| p.pos)
        })
        .collect();

    let rgb = mix(hex_rgb(cone.color).unwrap_or(WHITE), [0.2, 0.9, 0.6], 0.35);
    let stroke = Stroke::new(1.0, to_color32(rgb, (cone.opacity * 2.0).min(1.0)));
    for k in 0..ring.len() {
        let next = (k + 1) % ring.len();
        if let (Some(a), Some(b)) = (ring[k], ring[next]) {
            painter.line_segment([a, b], stroke);
        }
        if let (Some(a), Some(top)) = (ring[k], apex) {
            painter.line_segment([a, top.pos], stroke);
        }
    }
}

fn paint_trunk(painter: &Painter, rect: Rect, scene: &Scene, camera: &OrbitCamera) {
    let trunk = &scene.tree.trunk;
    let center = add(trunk.center, scene.tree.offset);
    let top = camera.project([center[0], center[1] + trunk.height * 0.5, center[2]], rect);
    let bottom = camera.project([center[0], center[1] - trunk.height * 0.5, center[2]], rect);
    let (Some(top), Some(bottom)) = (top, bottom) else {
        return;
    };
    let rt = trunk.radius_top * top.pixels_per_unit;
    let rb = trunk.radius_bottom * bottom.pixels_per_unit;
    let color = to_color32(hex_rgb(trunk.color).unwrap_or(WHITE), 1.0);
    painter.add(Shape::convex_polygon(
        vec![
            top.pos - vec2(rt, 0.0),
            top.pos + vec2(rt, 0.0),
            bottom.pos + vec2(rb, 0.0),
            bottom.pos - vec2(rb, 0.0),
        ],
        color,
        Stroke::NONE,
    ));
}

// ── ornaments ──

fn paint_ornaments(
    painter: &Painter,
    rect: Rect,
    scene: &Scene,
    camera: &OrbitCamera,
    time: f32,
    hovered: Option<usize>,
) -> Vec<GlowSource> {
    let mut visible: Vec<(usize, Pose, Pos2, f32, f32)> = scene
        .ornaments()
        .iter()
        .enumerate()
        .filter_map(|(i, node)| {
            let pose = node.pose(scene.tree.offset, time);
            let p = camera.project(pose.position, rect)?;
            Some((i, pose, p.pos, p.depth, pose.scale * p.pixels_per_unit))
        })
        .collect();
    // Back to front
    visible.sort_by(|a, b| b.3.total_cmp(&a.3));

    let mut glow = Vec::new();
    for (i, pose, center, _depth, unit) in visible {
        let node = &scene.ornaments()[i];
        let base = hex_rgb(node.placement.color).unwrap_or(WHITE);
        let lit = shade(base, scene.illumination(pose.position), node.emissive);
        draw_ornament(painter, node, center, unit, pose.spin, lit);

        if node.emissive > 0.0 {
            glow.push(GlowSource {
                pos: center,
                radius: unit,
                color: base,
                strength: node.emissive,
            });
        }
        if hovered == Some(i) {
            painter.circle_stroke(
                center,
                unit * 0.75,
                Stroke::new(1.5, Color32::from_rgba_unmultiplied(255, 255, 255, 160)),
            );
        }
    }
    glow
}

fn draw_ornament(painter: &Painter, node: &OrnamentNode, c: Pos2, unit: f32, spin: f32, rgb: [f32; 3]) {
    let at = |x: f32, y: f32| c + vec2(x * unit, -y * unit);
    let fill = to_color32(rgb, 1.0);

    match node.variant {
        OrnamentVariant::Star => {
            let squash = spin.cos().abs().max(0.2);
            let outline = star_outline(1.0, 0.4);
            let mut mesh = Mesh::default();
            mesh.colored_vertex(c, fill);
            for [x, y] in &outline {
                mesh.colored_vertex(at(x * squash, *y), fill);
            }
            let n = outline.len() as u32;
            for k in 0..n {
                mesh.add_triangle(0, 1 + k, 1 + (k + 1) % n);
            }
            painter.add(Shape::mesh(mesh));
        }
        OrnamentVariant::Ball => {
            painter.circle_filled(c, 0.5 * unit, fill);
            painter.circle_filled(
                at(-0.15, 0.15),
                0.12 * unit,
                Color32::from_rgba_unmultiplied(255, 255, 255, 90),
            );
        }
        OrnamentVariant::Gift => {
            let box_rect = Rect::from_center_size(c, vec2(unit, unit));
            painter.rect_filled(box_rect, 0.0, fill);
            let gold = to_color32(GOLD, 1.0);
            painter.rect_filled(Rect::from_center_size(c, vec2(1.1 * unit, 0.1 * unit)), 0.0, gold);
            painter.rect_filled(Rect::from_center_size(c, vec2(0.1 * unit, 1.1 * unit)), 0.0, gold);
        }
        OrnamentVariant::CandyCane => {
            let mut path: Vec<[f32; 2]> = (0..=12)
                .map(|k| {
                    let a = k as f32 / 12.0 * PI;
                    [0.4 * a.cos(), 0.4 * a.sin()]
                })
                .collect();
            path.reverse();
            path.push([0.4, -0.8]);
            let points: Vec<Pos2> = path
                .iter()
                .map(|p| {
                    let [x, y] = rotate2(*p, FRAC_PI_4);
                    at(x, y)
                })
                .collect();
            let white = to_color32(WHITE, 1.0);
            for (k, pair) in points.windows(2).enumerate() {
                let color = if k % 2 == 0 { fill } else { white };
                painter.line_segment([pair[0], pair[1]], Stroke::new(0.2 * unit, color));
            }
        }
        OrnamentVariant::Snowman => {
            let white = to_color32(mix(WHITE, rgb, 0.1), 1.0);
            let black = Color32::BLACK;
            painter.circle_filled(at(0.0, -0.4), 0.5 * unit, white);
            painter.circle_filled(at(0.0, 0.2), 0.35 * unit, white);
            painter.circle_filled(at(0.2, 0.3), 0.04 * unit, black);
            painter.circle_filled(at(-0.2, 0.3), 0.04 * unit, black);
            painter.circle_filled(at(0.0, 0.2), 0.06 * unit, to_color32(ORANGE, 1.0));
        }
        OrnamentVariant::Sock => {
            painter.rect_filled(Rect::from_center_size(c, vec2(0.4 * unit, 0.6 * unit)), 0.0, fill);
            painter.rect_filled(
                Rect::from_center_size(at(0.1, -0.3), vec2(0.4 * unit, 0.4 * unit)),
                0.2 * unit,
                fill,
            );
            painter.circle_stroke(at(0.0, 0.3), 0.2 * unit, Stroke::new(0.1 * unit, to_color32(WHITE, 1.0)));
        }
    }
}

/// Alternating outer/inner vertices of a five-point star, first point up.
fn star_outline(outer: f32, inner: f32) -> Vec<[f32; 2]> {
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f32 / 10.0 * TAU + FRAC_PI_2;
            [a.cos() * r, a.sin() * r]
        })
        .collect()
}

fn paint_sparkles(painter: &Painter, rect: Rect, scene: &Scene, camera: &OrbitCamera, time: f32) {
    let sparkles = &scene.tree.sparkles;
    let rgb = hex_rgb(sparkles.color).unwrap_or(GOLD);
    for (position, phase) in &sparkles.points {
        let drift = (time * sparkles.speed + phase).sin() * 0.3;
        let world = add(add(*position, scene.tree.offset), [0.0, drift, 0.0]);
        let Some(p) = camera.project(world, rect) else {
            continue;
        };
        let flicker = 0.5 + 0.5 * (time * 3.0 * sparkles.speed + phase * 3.0).sin();
        let radius = (sparkles.size * 0.02 * p.pixels_per_unit).clamp(0.5, 4.0);
        painter.circle_filled(p.pos, radius, to_color32(rgb, 0.3 + 0.6 * flicker));
    }
}

// ── post chain ──

fn paint_bloom(painter: &Painter, sources: &[GlowSource], threshold: f32, smoothing: f32, intensity: f32) {
    for src in sources {
        let weight = bloom_weight(luminance(src.color) * src.strength, threshold, smoothing);
        if weight <= 0.0 {
            continue;
        }
        for (scale, alpha) in [(1.6, 0.16), (2.4, 0.08), (3.4, 0.04)] {
            let a = (alpha * intensity * weight).min(1.0);
            painter.circle_filled(src.pos, src.radius * scale, to_color32(src.color, a));
        }
    }
}

fn paint_noise(painter: &Painter, rect: Rect, opacity: f32, time: f32) {
    let frame = (time * 24.0) as usize;
    let count = (rect.area() / 900.0) as usize;
    let alpha = (opacity * 255.0).round().clamp(1.0, 255.0) as u8;
    for i in 0..count {
        let seed = frame.wrapping_mul(7919).wrapping_add(i);
        let x = rect.left() + hash01(seed.wrapping_mul(3)) * rect.width();
        let y = rect.top() + hash01(seed.wrapping_mul(3).wrapping_add(1)) * rect.height();
        let v = if hash01(seed.wrapping_mul(3).wrapping_add(2)) > 0.5 { 255 } else { 0 };
        painter.circle_filled(Pos2::new(x, y), 0.8, Color32::from_rgba_unmultiplied(v, v, v, alpha));
    }
}

fn paint_vignette(painter: &Painter, rect: Rect, offset: f32, darkness: f32) {
    let segments = 48u32;
    let half = rect.size() * 0.5;
    let center = rect.center();
    let inner_scale = (0.6 + offset).min(1.0);
    let outer_scale = 1.5;
    let edge = Color32::from_rgba_unmultiplied(0, 0, 0, (darkness.min(1.0) * 220.0) as u8);

    let mut mesh = Mesh::default();
    for k in 0..segments {
        let a = k as f32 / segments as f32 * TAU;
        let dir = vec2(a.cos() * half.x, a.sin() * half.y);
        mesh.colored_vertex(center + dir * inner_scale, Color32::TRANSPARENT);
        mesh.colored_vertex(center + dir * outer_scale, edge);
    }
    for k in 0..segments {
        let i0 = 2 * k;
        let i1 = 2 * ((k + 1) % segments);
        mesh.add_triangle(i0, i0 + 1, i1 + 1);
        mesh.add_triangle(i0, i1 + 1, i1);
    }
    painter.add(Shape::mesh(mesh));
}

// ── color helpers ──

/// Star color: neutral white blended toward the star's hue by `saturation`.
fn star_tint(hue: f32, saturation: f32) -> [f32; 3] {
    let h = hue.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let pure = match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    };
    mix([0.9, 0.9, 0.9], pure, saturation.clamp(0.0, 1.0))
}

fn luminance(rgb: [f32; 3]) -> f32 {
    0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]
}

/// 0 below `threshold`, 1 above `threshold + smoothing`, smooth in between.
fn bloom_weight(lum: f32, threshold: f32, smoothing: f32) -> f32 {
    if smoothing <= 0.0 {
        return if lum >= threshold { 1.0 } else { 0.0 };
    }
    let t = ((lum - threshold) / smoothing).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Apply scene illumination and emissive glow to a base color.
fn shade(rgb: [f32; 3], illumination: f32, emissive: f32) -> [f32; 3] {
    let k = (0.35 + 0.65 * illumination + 0.2 * emissive).min(1.4);
    [
        (rgb[0] * k).min(1.0),
        (rgb[1] * k).min(1.0),
        (rgb[2] * k).min(1.0),
    ]
}

fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn rotate2(p: [f32; 2], angle: f32) -> [f32; 2] {
    let (s, c) = angle.sin_cos();
    [p[0] * c - p[1] * s, p[0] * s + p[1] * c]
}

fn to_color32(rgb: [f32; 3], alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        (rgb[0].clamp(0.0, 1.0) * 255.0) as u8,
        (rgb[1].clamp(0.0, 1.0) * 255.0) as u8,
        (rgb[2].clamp(0.0, 1.0) * 255.0) as u8,
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

fn hash01(seed: usize) -> f32 {
    let x = seed.wrapping_mul(2654435761) ^ seed.wrapping_mul(340573321);
    let x = x ^ (x >> 15);
    (x % 10_000) as f32 / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_has_ten_alternating_points() {
        let pts = star_outline(1.0, 0.4);
        assert_eq!(pts.len(), 10);
        let r0 = (pts[0][0].powi(2) + pts[0][1].powi(2)).sqrt();
        let r1 = (pts[1][0].powi(2) + pts[1][1].powi(2)).sqrt();
        assert!((r0 - 1.0).abs() < 1e-5);
        assert!((r1 - 0.4).abs() < 1e-5);
        // first point straight up
        assert!(pts[0][0].abs() < 1e-5 && pts[0][1] > 0.99);
    }

    #[test]
    fn bloom_threshold() {
        assert_eq!(bloom_weight(0.2, 0.5, 0.9), 0.0);
        assert_eq!(bloom_weight(2.0, 0.5, 0.9), 1.0);
        let mid = bloom_weight(0.95, 0.5, 0.9);
        assert!(mid > 0.0 && mid < 1.0);
        assert_eq!(bloom_weight(0.5, 0.5, 0.0), 1.0);
    }

    #[test]
    fn gold_star_blooms() {
        let gold = hex_rgb("#fbbf24").unwrap();
        assert!(bloom_weight(luminance(gold) * 1.5, 0.5, 0.9) > 0.5);
    }

    #[test]
    fn shade_clamps() {
        let lit = shade([0.9, 0.9, 0.9], 1.5, 1.5);
        assert!(lit.iter().all(|c| *c <= 1.0));
        let dim = shade([1.0, 0.0, 0.0], 0.0, 0.0);
        assert!((dim[0] - 0.35).abs() < 1e-6);
    }

    #[test]
    fn color_conversion() {
        let c = to_color32([1.0, 0.0, 0.5], 1.0);
        assert_eq!(c.r(), 255);
        assert_eq!(c.g(), 0);
        assert_eq!(c.b(), 127);
    }

    #[test]
    fn hash_in_unit_range() {
        for seed in 0..1000 {
            let h = hash01(seed);
            assert!((0.0..1.0).contains(&h));
        }
    }

    #[test]
    fn rotate_quarter_turn() {
        let [x, y] = rotate2([1.0, 0.0], FRAC_PI_2);
        assert!(x.abs() < 1e-6 && (y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn stars_stay_white_without_saturation() {
        for hue in [0.0, 0.3, 0.75] {
            assert_eq!(star_tint(hue, 0.0), [0.9, 0.9, 0.9]);
        }
        let red = star_tint(0.0, 1.0);
        assert!((red[0] - 1.0).abs() < 1e-6 && red[2].abs() < 1e-6);
    }

    #[test]
    fn feathered_shadow_layers() {
        let rings = shadow_rings(0.24, 2.0);
        assert_eq!(rings.len(), 4);
        let total: f32 = rings.iter().map(|(_, a)| a).sum();
        assert!((total - 0.24).abs() < 1e-6);
        assert!((rings[0].0 - 1.3).abs() < 1e-6);
        assert!(rings.windows(2).all(|w| w[0].0 > w[1].0));

        let sharp = shadow_rings(0.24, 0.0);
        assert_eq!(sharp, vec![(1.0, 0.24)]);
    }

    #[test]
    fn contact_fades_with_height() {
        assert_eq!(contact_strength(0.0, 4.5), 1.0);
        assert!((contact_strength(2.25, 4.5) - 0.5).abs() < 1e-6);
        assert_eq!(contact_strength(6.0, 4.5), 0.0);
        assert_eq!(contact_strength(-1.0, 4.5), 0.0);
        assert_eq!(contact_strength(1.0, 0.0), 0.0);
    }

    #[test]
    fn cone_shadow_falls_away_from_light() {
        let outline =
            cast_shadow_outline([10.0, 20.0, 10.0], [0.0, 7.0, 0.0], [0.0, -5.0, 0.0], 5.5, -5.0).unwrap();
        assert!(outline.len() >= 3);
        assert!(outline.iter().all(|p| (p[1] + 5.0).abs() < 1e-6));
        // apex lands beyond the base, opposite the light
        assert!(outline.iter().any(|p| p[0] < -5.5 && p[2] < -5.5));

        assert!(cast_shadow_outline([0.0, 5.0, 0.0], [0.0, 7.0, 0.0], [0.0, -5.0, 0.0], 5.5, -5.0).is_none());
    }

    #[test]
    fn hull_drops_interior_points() {
        let hull = convex_hull(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.5, 0.5], [1.0, 0.0]]);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&[0.5, 0.5]));
    }
}
