/// Anti-aliasing policy for the tile pipelines.
///
/// MSAA mostly matters for the emblem tile's line strokes; the pure
/// fragment-field tiles look identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

impl Default for Antialiasing {
    fn default() -> Self {
        Self::Auto
    }
}

/// Immutable configuration for a preview window.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Optional FPS cap while the hover animator is running; None renders on
    /// every redraw the platform grants.
    pub target_fps: Option<f32>,
    /// Anti-aliasing mode requested by the caller.
    pub antialiasing: Antialiasing,
    /// Rotate through the bank on this interval; None leaves switching to
    /// the arrow keys.
    pub cycle: Option<std::time::Duration>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            surface_size: (800, 800),
            target_fps: None,
            antialiasing: Antialiasing::default(),
            cycle: None,
        }
    }
}
