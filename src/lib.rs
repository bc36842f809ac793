pub mod app;
pub mod buffer;
pub mod clock;
pub mod config;
pub mod dither;
pub mod logging;
pub mod palette;
pub mod prefs;
pub mod render;
pub mod sampler;
pub mod session;
pub mod source;
pub mod sprites;
pub mod still;
pub mod terminal;
pub mod tracker;
