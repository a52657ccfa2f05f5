//! Ornament data model.
//!
//! Ten ornament types are declared but only six have a drawn shape
//! (`OrnamentVariant`). The remaining types render as a ball.

use std::fmt;

/// Colors an ornament may be painted with.
pub const PALETTE: [&str; 5] = ["#e11d48", "#16a34a", "#fbbf24", "#f8fafc", "#9333ea"];

/// Every kind of ornament that can hang on the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentType {
    Star,
    Ball,
    Gift,
    CandyCane,
    Snowman,
    Santa,
    Reindeer,
    Sock,
    Bear,
    CrystalBall,
}

impl OrnamentType {
    pub const ALL: [OrnamentType; 10] = [
        OrnamentType::Star,
        OrnamentType::Ball,
        OrnamentType::Gift,
        OrnamentType::CandyCane,
        OrnamentType::Snowman,
        OrnamentType::Santa,
        OrnamentType::Reindeer,
        OrnamentType::Sock,
        OrnamentType::Bear,
        OrnamentType::CrystalBall,
    ];

    /// Upper-snake label, as embedded into wish prompts.
    pub fn label(self) -> &'static str {
        match self {
            OrnamentType::Star => "STAR",
            OrnamentType::Ball => "BALL",
            OrnamentType::Gift => "GIFT",
            OrnamentType::CandyCane => "CANDY_CANE",
            OrnamentType::Snowman => "SNOWMAN",
            OrnamentType::Santa => "SANTA",
            OrnamentType::Reindeer => "REINDEER",
            OrnamentType::Sock => "SOCK",
            OrnamentType::Bear => "BEAR",
            OrnamentType::CrystalBall => "CRYSTAL_BALL",
        }
    }

    /// Shape used to draw this type. Types without their own shape fall back to a ball.
    pub fn variant(self) -> OrnamentVariant {
        match self {
            OrnamentType::Star => OrnamentVariant::Star,
            OrnamentType::Ball => OrnamentVariant::Ball,
            OrnamentType::Gift => OrnamentVariant::Gift,
            OrnamentType::CandyCane => OrnamentVariant::CandyCane,
            OrnamentType::Snowman => OrnamentVariant::Snowman,
            OrnamentType::Sock => OrnamentVariant::Sock,
            OrnamentType::Santa
            | OrnamentType::Reindeer
            | OrnamentType::Bear
            | OrnamentType::CrystalBall => OrnamentVariant::Ball,
        }
    }
}

impl fmt::Display for OrnamentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Drawn ornament shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrnamentVariant {
    Star,
    Ball,
    Gift,
    CandyCane,
    Snowman,
    Sock,
}

/// One ornament's computed place and look on the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct OrnamentPlacement {
    pub id: String,
    pub kind: OrnamentType,
    /// Position in tree space (the tree group is offset when composed).
    pub position: [f32; 3],
    /// Hex color from `PALETTE` (the topper uses gold).
    pub color: &'static str,
    pub scale: f32,
}

/// Parse a `#rrggbb` hex color into linear-ish 0..1 RGB.
pub fn hex_rgb(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(digits.get(i..i + 2)?, 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}
