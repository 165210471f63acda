//! # Fluxfield - Interactive Electric Field Canvas
//!
//! Point charges and field sensors on a 500x500 canvas, with the electric
//! field rendered as a direction-and-magnitude color map on the GPU.
//!
//! Click empty canvas to place the selected kind of entity; click an
//! existing one to grab and drag it. Charges source the field, sensors
//! probe it and draw an arrow along the local field vector.
//!
//! ## Controls
//!
//! - `1` / `2` / `3` - next click places an electron / proton / sensor
//! - Up / Down arrows - step the flux scale (field layer opacity)
//! - Left mouse - place, grab and drag
//!
//! ## Layers
//!
//! Each frame composites three layers over a white clear:
//! - the field raster, re-evaluated only when a charge or the flux scale
//!   changes ([`gpu::Renderer::render_frame`]), otherwise recomposited
//!   from cache ([`gpu::Renderer::render_sensors_only`])
//! - charge sprites, instanced 50x50 textured quads
//! - the sensor overlay, amber markers with red field arrows
//!
//! ## Coordinates
//!
//! Scene positions live in a y-up frame with the origin at the bottom
//! left. Window events are flipped on entry by [`coords::flip_y`]; the
//! CPU mirror ([`raster::FieldRaster`]) and the fragment shader sample
//! in the same frame, which keeps the two pixel-identical.

pub mod app;
pub mod controller;
pub mod controls;
pub mod coords;
pub mod error;
pub mod field;
pub mod gpu;
pub mod overlay;
pub mod raster;
pub mod scene;
pub mod sprites;
