//! Procedural tile renderer for TileShade.
//!
//! Each tile is one surface plus one or more full-viewport shader passes:
//! a grain field, a light-glow field, an emblem built from gradient-filled
//! polygons and line strokes, a bezier curve field, or a circle-marker
//! field. The flow from the CLI down to the GPU:
//!
//! ```text
//!   tileshade CLI
//!        │ TileSpec (effect parameters + seed)
//!        ▼
//!   build_passes() ──▶ PassPlan list ──▶ GpuState ──▶ render()
//!        ▲                                  │
//!        └── HoverAnimator retargets ───────┘ (light tile only)
//! ```
//!
//! `GpuState` owns every GPU resource (surface, device, pipelines, uniform
//! buffers, bind groups); `run_preview` is the winit loop that feeds it.
//! Fragment bodies are GLSL validated on the CPU through the naga front end
//! before any pipeline exists, so a malformed shader disables its tile
//! instead of taking the process down.

pub mod animate;
pub mod compile;
pub mod geometry;
pub mod gpu;
pub mod params;
pub mod tiles;
pub mod types;
pub mod uniforms;
pub mod window;

pub use animate::HoverAnimator;
pub use gpu::GpuState;
pub use tiles::{build_passes, TileEffect, TileId, TileSpec};
pub use types::{Antialiasing, PreviewConfig};
pub use window::run_preview;
