//! Overlay state shared between the scene and the wish card.

pub mod state;
