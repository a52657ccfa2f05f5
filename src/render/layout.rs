//! Ornament layout: conical layers of ornaments approximating a tree.
//!
//! The layout is a pure function of a seed. Each layer is a ring whose radius
//! and item count shrink linearly towards the top; consecutive layers are
//! twisted so ornaments don't line up vertically. A star topper sits at the apex.

use std::f32::consts::TAU;
use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ornament::{OrnamentPlacement, OrnamentType, PALETTE};

/// Shape parameters for the generated tree
#[derive(Debug, Clone)]
pub struct TreeParams {
    /// Number of horizontal rings
    pub layers: usize,
    /// Items on the bottom ring (before the per-layer minimum is added)
    pub items_per_layer: f32,
    /// Added to every ring so upper rings are never empty
    pub min_items_per_layer: f32,
    /// Tree height; layer `i` sits at `height * i / layers`
    pub height: f32,
    /// Radius of the bottom ring
    pub base_radius: f32,
    /// Angular offset added per layer (radians)
    pub layer_twist: f32,
    /// Uniform range for ornament scale
    pub scale_range: Range<f32>,
    pub topper_position: [f32; 3],
    pub topper_color: &'static str,
    pub topper_scale: f32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            layers: 15,
            items_per_layer: 10.0,
            min_items_per_layer: 3.0,
            height: 12.0,
            base_radius: 5.0,
            layer_twist: 0.5,
            scale_range: 0.3..0.7,
            topper_position: [0.0, 12.5, 0.0],
            topper_color: "#fbbf24",
            topper_scale: 1.5,
        }
    }
}

impl TreeParams {
    /// Fraction of the way up the tree for `layer` (0 at the base).
    fn progress(&self, layer: usize) -> f32 {
        if self.layers == 0 {
            return 0.0;
        }
        layer as f32 / self.layers as f32
    }

    /// Fractional item count for `layer`. Angles are spaced by this value.
    fn fractional_count(&self, layer: usize) -> f32 {
        let shrink = (1.0 - self.progress(layer)).max(0.0);
        (self.items_per_layer * shrink + self.min_items_per_layer).max(0.0)
    }

    /// Radius of the ring at `layer`.
    pub fn layer_radius(&self, layer: usize) -> f32 {
        self.base_radius * (1.0 - self.progress(layer)).max(0.0)
    }

    /// Height of the ring at `layer`.
    pub fn layer_height(&self, layer: usize) -> f32 {
        self.progress(layer) * self.height
    }
}

/// Number of ornaments placed on `layer`.
pub fn layer_item_count(params: &TreeParams, layer: usize) -> usize {
    params.fractional_count(layer).ceil() as usize
}

/// Generate the full ornament layout for `seed`, topper last.
pub fn generate_ornaments(seed: u64, params: &TreeParams) -> Vec<OrnamentPlacement> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate_with_rng(&mut rng, params)
}

/// Generate the layout drawing randomness from `rng`.
pub fn generate_with_rng<R: Rng>(rng: &mut R, params: &TreeParams) -> Vec<OrnamentPlacement> {
    let total: usize = (0..params.layers)
        .map(|i| layer_item_count(params, i))
        .sum();
    let mut data = Vec::with_capacity(total + 1);

    for i in 0..params.layers {
        let y = params.layer_height(i);
        let radius = params.layer_radius(i);
        let spacing = params.fractional_count(i);
        let count = layer_item_count(params, i);

        for j in 0..count {
            let angle = (j as f32 / spacing) * TAU + i as f32 * params.layer_twist;
            let kind = OrnamentType::ALL[rng.random_range(0..OrnamentType::ALL.len())];
            let color = PALETTE[rng.random_range(0..PALETTE.len())];
            let scale = random_scale(rng, &params.scale_range);

            data.push(OrnamentPlacement {
                id: format!("ornament-{}-{}", i, j),
                kind,
                position: [angle.cos() * radius, y, angle.sin() * radius],
                color,
                scale,
            });
        }
    }

    data.push(OrnamentPlacement {
        id: String::from("topper"),
        kind: OrnamentType::Star,
        position: params.topper_position,
        color: params.topper_color,
        scale: params.topper_scale,
    });

    data
}

fn random_scale<R: Rng>(rng: &mut R, range: &Range<f32>) -> f32 {
    if range.end > range.start {
        rng.random_range(range.clone())
    } else {
        range.start
    }
}
