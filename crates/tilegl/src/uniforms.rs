//! CPU-side std140 mirrors of the per-tile uniform blocks.
//!
//! Each struct must match its GLSL block field for field; everything is kept
//! in vec4-sized slots so std140 array strides and padding never disagree
//! between the CPU and the shader. Variable-length inputs (curves, circles)
//! are fixed-capacity arrays plus an active-count scalar.

use bytemuck::{Pod, Zeroable};

use crate::geometry::grid_to_clip;
use crate::params::{CircleField, CornerGlowField, CurveField, GrainField, LightRig, Shape};

/// Shader capacity for bezier curves; extra curves are ignored at draw time.
pub const MAX_CURVES: usize = 16;
/// Shader capacity for circle markers.
pub const MAX_CIRCLES: usize = 10;

#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct GrainUniforms {
    /// rgb = base color, w = grain seed.
    pub base_seed: [f32; 4],
    /// x = grain amount.
    pub grain: [f32; 4],
}

unsafe impl Zeroable for GrainUniforms {}
unsafe impl Pod for GrainUniforms {}

impl GrainUniforms {
    pub fn new(field: &GrainField, seed: f32) -> Self {
        let [r, g, b] = field.base_color;
        Self {
            base_seed: [r, g, b, seed],
            grain: [field.amount, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct CornerUniforms {
    /// rgb = base color, w = grain seed.
    pub base_seed: [f32; 4],
    /// rgb = tint color, w = tint opacity.
    pub tint: [f32; 4],
    /// xy = gradient extent, z = grain amount, w = corner index.
    pub extent: [f32; 4],
}

unsafe impl Zeroable for CornerUniforms {}
unsafe impl Pod for CornerUniforms {}

impl CornerUniforms {
    pub fn new(field: &CornerGlowField, seed: f32) -> Self {
        let [r, g, b] = field.grain.base_color;
        let [tr, tg, tb] = field.tint;
        Self {
            base_seed: [r, g, b, seed],
            tint: [tr, tg, tb, field.opacity],
            extent: [
                field.extent[0],
                field.extent[1],
                field.grain.amount,
                field.corner.shader_index(),
            ],
        }
    }
}

#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct LightUniforms {
    /// xy per light.
    pub positions: [[f32; 4]; 3],
    /// rgb per light, w = intensity.
    pub colors: [[f32; 4]; 3],
    /// x = grain seed, y = grain amount.
    pub seed_grain: [f32; 4],
}

unsafe impl Zeroable for LightUniforms {}
unsafe impl Pod for LightUniforms {}

impl LightUniforms {
    pub fn new(rig: &LightRig, grain: f32, seed: f32) -> Self {
        let mut positions = [[0.0; 4]; 3];
        let mut colors = [[0.0; 4]; 3];
        for (index, light) in rig.lights.iter().enumerate() {
            positions[index] = [light.position[0], light.position[1], 0.0, 0.0];
            colors[index] = [
                light.color[0],
                light.color[1],
                light.color[2],
                light.intensity,
            ];
        }
        Self {
            positions,
            colors,
            seed_grain: [seed, grain, 0.0, 0.0],
        }
    }
}

#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct ShapeUniforms {
    /// xy = gradient start, zw = gradient end, both in clip space.
    pub axis: [f32; 4],
    pub start_color: [f32; 4],
    pub end_color: [f32; 4],
}

unsafe impl Zeroable for ShapeUniforms {}
unsafe impl Pod for ShapeUniforms {}

impl ShapeUniforms {
    pub fn new(shape: &Shape) -> Self {
        let start = grid_to_clip(shape.gradient_start);
        let end = grid_to_clip(shape.gradient_end);
        let [sr, sg, sb] = shape.start_color;
        let [er, eg, eb] = shape.end_color;
        Self {
            axis: [start[0], start[1], end[0], end[1]],
            start_color: [sr, sg, sb, 0.0],
            end_color: [er, eg, eb, 0.0],
        }
    }
}

#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct LineUniforms {
    pub color: [f32; 4],
}

unsafe impl Zeroable for LineUniforms {}
unsafe impl Pod for LineUniforms {}

impl LineUniforms {
    pub fn new(color: [f32; 3]) -> Self {
        Self {
            color: [color[0], color[1], color[2], 1.0],
        }
    }
}

#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct CurveUniforms {
    /// rgb = base color, w = grain seed.
    pub base_seed: [f32; 4],
    /// rgb = curve color, w = stroke thickness.
    pub curve_style: [f32; 4],
    /// xy = gradient start, zw = gradient end.
    pub gradient_coords: [f32; 4],
    /// rgb = gradient start color, w = gradient strength.
    pub gradient_start_color: [f32; 4],
    /// rgb = gradient end color, w = gradient enabled flag.
    pub gradient_end_color: [f32; 4],
    /// x = active curve count, y = grain amount.
    pub counts: [f32; 4],
    /// Two slots per curve: p0.xy p1.zw then p2.xy p3.zw.
    pub control_points: [[f32; 4]; MAX_CURVES * 2],
}

unsafe impl Zeroable for CurveUniforms {}
unsafe impl Pod for CurveUniforms {}

impl CurveUniforms {
    pub fn new(field: &CurveField, seed: f32) -> Self {
        let active = field.curves.len().min(MAX_CURVES);
        let mut control_points = [[0.0; 4]; MAX_CURVES * 2];
        for (index, curve) in field.curves.iter().take(MAX_CURVES).enumerate() {
            control_points[index * 2] = [curve[0][0], curve[0][1], curve[1][0], curve[1][1]];
            control_points[index * 2 + 1] = [curve[2][0], curve[2][1], curve[3][0], curve[3][1]];
        }
        let [r, g, b] = field.base_color;
        let [cr, cg, cb] = field.curve_color;
        let [gsr, gsg, gsb] = field.gradient.start_color;
        let [ger, geg, geb] = field.gradient.end_color;
        Self {
            base_seed: [r, g, b, seed],
            curve_style: [cr, cg, cb, field.thickness],
            gradient_coords: [
                field.gradient.start[0],
                field.gradient.start[1],
                field.gradient.end[0],
                field.gradient.end[1],
            ],
            gradient_start_color: [gsr, gsg, gsb, field.gradient.strength],
            gradient_end_color: [ger, geg, geb, if field.gradient.enabled { 1.0 } else { 0.0 }],
            counts: [active as f32, field.grain, 0.0, 0.0],
            control_points,
        }
    }
}

#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct CircleUniforms {
    /// x = grain seed, y = radius in pixels, z = active count, w = grain amount.
    pub seed_counts: [f32; 4],
    /// xy = surface size in pixels.
    pub resolution: [f32; 4],
    /// xy = gradient start, zw = gradient end.
    pub gradient_coords: [f32; 4],
    pub gradient_start_color: [f32; 4],
    pub gradient_end_color: [f32; 4],
    pub circle_color: [f32; 4],
    /// xy per marker.
    pub centers: [[f32; 4]; MAX_CIRCLES],
}

unsafe impl Zeroable for CircleUniforms {}
unsafe impl Pod for CircleUniforms {}

impl CircleUniforms {
    pub fn new(field: &CircleField, seed: f32, resolution: (u32, u32)) -> Self {
        let active = field.centers.len().min(MAX_CIRCLES);
        let mut centers = [[0.0; 4]; MAX_CIRCLES];
        for (index, center) in field.centers.iter().take(MAX_CIRCLES).enumerate() {
            centers[index] = [center[0], center[1], 0.0, 0.0];
        }
        let [gsr, gsg, gsb] = field.gradient.start_color;
        let [ger, geg, geb] = field.gradient.end_color;
        let [cr, cg, cb] = field.color;
        Self {
            seed_counts: [seed, field.radius, active as f32, field.grain],
            resolution: [resolution.0 as f32, resolution.1 as f32, 0.0, 0.0],
            gradient_coords: [
                field.gradient.start[0],
                field.gradient.start[1],
                field.gradient.end[0],
                field.gradient.end[1],
            ],
            gradient_start_color: [gsr, gsg, gsb, 0.0],
            gradient_end_color: [ger, geg, geb, 0.0],
            circle_color: [cr, cg, cb, 0.0],
            centers,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::size_of;

    use super::*;
    use crate::params::{CircleField, CurveField};

    #[test]
    fn uniform_blocks_are_vec4_multiples() {
        assert_eq!(size_of::<GrainUniforms>() % 16, 0);
        assert_eq!(size_of::<CornerUniforms>() % 16, 0);
        assert_eq!(size_of::<LightUniforms>(), 112);
        assert_eq!(size_of::<ShapeUniforms>(), 48);
        assert_eq!(size_of::<CurveUniforms>(), 96 + MAX_CURVES * 32);
        assert_eq!(size_of::<CircleUniforms>(), 96 + MAX_CIRCLES * 16);
    }

    #[test]
    fn curve_count_clamps_to_capacity() {
        let mut field = CurveField::default();
        field.curves = vec![[[0.0, 0.0], [0.3, 0.3], [0.6, 0.6], [1.0, 1.0]]; MAX_CURVES + 5];
        let uniforms = CurveUniforms::new(&field, 0.0);
        assert_eq!(uniforms.counts[0], MAX_CURVES as f32);
    }

    #[test]
    fn control_points_pack_in_pairs() {
        let mut field = CurveField::default();
        field.curves = vec![[[0.1, 0.2], [0.3, 0.4], [0.5, 0.6], [0.7, 0.8]]];
        let uniforms = CurveUniforms::new(&field, 0.0);
        assert_eq!(uniforms.control_points[0], [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(uniforms.control_points[1], [0.5, 0.6, 0.7, 0.8]);
    }

    #[test]
    fn circle_resolution_lands_in_uniforms() {
        let uniforms = CircleUniforms::new(&CircleField::default(), 1.0, (640, 480));
        assert_eq!(uniforms.resolution[0], 640.0);
        assert_eq!(uniforms.resolution[1], 480.0);
        assert_eq!(uniforms.seed_counts[2], 10.0);
    }
}
