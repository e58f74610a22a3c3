//! Render pass execution helpers.

mod fullscreen;

pub use fullscreen::render_fullscreen_effect;
