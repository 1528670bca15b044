//! Per-tile parameter records and the scalar field math behind the shaders.
//!
//! The records carry the numeric inputs fed to uniforms each draw. The field
//! functions mirror the fragment shader formulas on the CPU so diagnostics
//! (`tileshade probe`) and tests can evaluate them without a device.

/// Inverse-square-like falloff steepness for the light-glow tile.
pub const FALLOFF_STEEPNESS: f32 = 5.0;
/// Parametric samples taken when approximating distance to a bezier curve.
pub const BEZIER_SAMPLES: u32 = 30;
/// Default grain blend weight.
pub const GRAIN_AMOUNT: f32 = 0.04;

const BASE_GRAY: [f32; 3] = [0.102, 0.102, 0.102];

/// One point light on the glow tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: [f32; 2],
    pub color: [f32; 3],
    pub intensity: f32,
}

/// The glow tile's three lights as one animatable rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRig {
    pub lights: [Light; 3],
}

impl LightRig {
    /// Resting configuration.
    pub fn resting() -> Self {
        Self {
            lights: [
                Light {
                    position: [0.3, 0.18],
                    color: [0.0, 1.0, 110.0 / 255.0],
                    intensity: 0.1,
                },
                Light {
                    position: [0.1, 0.89],
                    color: [12.0 / 255.0, 227.0 / 255.0, 1.0],
                    intensity: 0.05,
                },
                Light {
                    position: [0.9, 0.55],
                    color: [0.0, 117.0 / 255.0, 35.0 / 255.0],
                    intensity: 0.05,
                },
            ],
        }
    }

    /// Hover configuration: lights converge on the center and shift hue.
    pub fn hover() -> Self {
        Self {
            lights: [
                Light {
                    position: [0.5, 0.5],
                    color: [50.0 / 255.0, 1.0, 150.0 / 255.0],
                    intensity: 0.05,
                },
                Light {
                    position: [0.5, 0.5],
                    color: [0.0, 180.0 / 255.0, 1.0],
                    intensity: 0.1,
                },
                Light {
                    position: [0.5, 0.5],
                    color: [20.0 / 255.0, 200.0 / 255.0, 50.0 / 255.0],
                    intensity: 0.08,
                },
            ],
        }
    }
}

/// Flat grain-over-base-color field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainField {
    pub base_color: [f32; 3],
    pub amount: f32,
}

impl Default for GrainField {
    fn default() -> Self {
        Self {
            base_color: BASE_GRAY,
            amount: GRAIN_AMOUNT,
        }
    }
}

/// Which corner a bounded glow radiates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Index fed to the shader; texcoords are mirrored per corner.
    pub(crate) fn shader_index(self) -> f32 {
        match self {
            Corner::TopLeft => 0.0,
            Corner::TopRight => 1.0,
            Corner::BottomLeft => 2.0,
            Corner::BottomRight => 3.0,
        }
    }
}

/// Grain plus a bounded corner tint with squared falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerGlowField {
    pub grain: GrainField,
    pub tint: [f32; 3],
    /// Fraction of the tile the tint may reach, per axis.
    pub extent: [f32; 2],
    pub opacity: f32,
    pub corner: Corner,
}

impl Default for CornerGlowField {
    fn default() -> Self {
        Self {
            grain: GrainField::default(),
            tint: [0.0, 1.0, 0.43],
            extent: [0.5, 0.6],
            opacity: 0.1,
            corner: Corner::TopLeft,
        }
    }
}

/// Filled polygon on the 0–100 design grid with an independent gradient axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub coords: [[f32; 2]; 4],
    pub gradient_start: [f32; 2],
    pub gradient_end: [f32; 2],
    pub start_color: [f32; 3],
    pub end_color: [f32; 3],
}

/// Line segment on the 0–100 design grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: [f32; 2],
    pub end: [f32; 2],
}

/// The emblem tile: grain background, gradient shapes, line strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct EmblemField {
    pub grain: GrainField,
    pub shapes: Vec<Shape>,
    pub lines: Vec<Line>,
    pub line_color: [f32; 3],
}

const EMBLEM_START: [f32; 3] = [0.1137, 0.2745, 0.1961];

impl Default for EmblemField {
    fn default() -> Self {
        let shape = |coords, gradient_start, gradient_end| Shape {
            coords,
            gradient_start,
            gradient_end,
            start_color: EMBLEM_START,
            end_color: BASE_GRAY,
        };
        Self {
            grain: GrainField::default(),
            shapes: vec![
                shape(
                    [[22.0, 23.0], [48.0, 23.0], [48.0, 40.0], [22.0, 40.0]],
                    [22.0, 23.0],
                    [48.0, 47.0],
                ),
                shape(
                    [[22.0, 40.0], [22.0, 47.0], [40.0, 47.0], [48.0, 40.0]],
                    [22.0, 23.0],
                    [50.0, 50.0],
                ),
                shape(
                    [[52.0, 23.0], [74.0, 23.0], [57.0, 40.0], [52.0, 40.0]],
                    [74.0, 23.0],
                    [52.0, 40.0],
                ),
                shape(
                    [[60.0, 43.0], [60.0, 57.0], [78.0, 69.0], [78.0, 26.0]],
                    [78.0, 50.0],
                    [60.0, 50.0],
                ),
                shape(
                    [[60.0, 57.0], [78.0, 69.0], [75.0, 72.0], [60.0, 57.0]],
                    [78.0, 50.0],
                    [60.0, 50.0],
                ),
                shape(
                    [[43.0, 60.0], [57.0, 60.0], [70.0, 77.0], [26.0, 77.0]],
                    [50.0, 77.0],
                    [50.0, 60.0],
                ),
                shape(
                    [[57.0, 60.0], [70.0, 77.0], [72.0, 75.0], [57.0, 60.0]],
                    [50.0, 77.0],
                    [50.0, 60.0],
                ),
                shape(
                    [[22.0, 53.0], [40.0, 53.0], [40.0, 56.0], [22.0, 75.0]],
                    [22.0, 75.0],
                    [40.0, 53.0],
                ),
            ],
            lines: vec![
                Line { start: [20.0, 20.0], end: [80.0, 20.0] },
                Line { start: [20.0, 20.0], end: [20.0, 80.0] },
                Line { start: [20.0, 80.0], end: [70.0, 80.0] },
                Line { start: [80.0, 20.0], end: [80.0, 70.0] },
                Line { start: [80.0, 70.0], end: [70.0, 80.0] },
                Line { start: [20.0, 50.0], end: [40.0, 50.0] },
                Line { start: [50.0, 20.0], end: [50.0, 40.0] },
                Line { start: [72.0, 78.0], end: [78.0, 78.0] },
                Line { start: [78.0, 78.0], end: [78.0, 72.0] },
                Line { start: [78.0, 78.0], end: [60.0, 60.0] },
                Line { start: [80.0, 20.0], end: [60.0, 40.0] },
                Line { start: [20.0, 80.0], end: [40.0, 60.0] },
            ],
            line_color: [0.5, 0.5, 0.5],
        }
    }
}

/// Linear gradient description shared by the curve and circle tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub enabled: bool,
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub start_color: [f32; 3],
    pub end_color: [f32; 3],
    pub strength: f32,
}

/// Cubic bezier control points in texcoord space.
pub type CubicBezier = [[f32; 2]; 4];

/// The bezier curve-field tile.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveField {
    pub base_color: [f32; 3],
    pub grain: f32,
    pub curve_color: [f32; 3],
    pub thickness: f32,
    pub gradient: Gradient,
    pub curves: Vec<CubicBezier>,
}

impl Default for CurveField {
    fn default() -> Self {
        Self {
            base_color: [0.1176, 0.1412, 0.1216],
            grain: 0.03,
            curve_color: [0.6, 0.6, 0.6],
            thickness: 0.004,
            gradient: Gradient {
                enabled: true,
                start: [1.0, 0.0],
                end: [0.5, 0.5],
                start_color: [0.2, 0.3, 0.4],
                end_color: BASE_GRAY,
                strength: 0.3,
            },
            curves: vec![
                [[0.0, 0.9], [0.4, 0.1], [0.6, 0.9], [1.0, 0.0]],
                [[0.0, 0.7], [0.4, 0.1], [0.6, 0.9], [1.0, 0.0]],
                [[0.0, 0.5], [0.4, 0.1], [0.6, 0.9], [1.0, 0.0]],
                [[0.0, 0.3], [0.4, 0.1], [0.6, 0.9], [1.0, 0.0]],
                [[0.0, 0.1], [0.4, 0.1], [0.6, 0.9], [1.0, 0.0]],
                [[0.0, 1.1], [0.4, 0.1], [0.6, 0.9], [1.0, 0.0]],
                [[0.0, -0.1], [0.4, 0.1], [0.6, 0.9], [1.0, 0.0]],
                [[1.0, 0.0], [0.6, 0.9], [0.4, 0.1], [1.0, 1.0]],
                [[0.0, 1.0], [0.6, 0.9], [0.4, 0.1], [1.0, 1.0]],
                [[0.0, 1.0], [0.6, 0.5], [0.4, 0.2], [1.0, 1.0]],
                [[0.0, 1.0], [0.6, 0.5], [0.4, 0.3], [1.0, 1.0]],
            ],
        }
    }
}

/// The circle-marker tile.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleField {
    pub centers: Vec<[f32; 2]>,
    /// Marker radius in pixels; resolution-independent by design.
    pub radius: f32,
    pub color: [f32; 3],
    pub gradient: Gradient,
    pub grain: f32,
}

impl Default for CircleField {
    fn default() -> Self {
        Self {
            centers: vec![
                [0.09, 0.16],
                [0.15, 0.25],
                [0.50, 0.25],
                [0.85, 0.25],
                [0.91, 0.16],
                [0.09, 0.84],
                [0.15, 0.75],
                [0.50, 0.75],
                [0.85, 0.75],
                [0.91, 0.84],
            ],
            radius: 4.0,
            color: [0.5, 0.5, 0.5],
            gradient: Gradient {
                enabled: true,
                start: [1.5, 1.5],
                end: [0.4, 0.4],
                start_color: [0.1, 0.5, 0.3],
                end_color: [0.1, 0.1, 0.1],
                strength: 1.0,
            },
            grain: GRAIN_AMOUNT,
        }
    }
}

/// Scalar position of `point` along the `start`→`end` axis, clamped to
/// [0, 1]: 0 exactly at the start coordinate, 1 at the end, monotonic along
/// the axis, and degenerate axes collapse to 0.
pub fn gradient_projection(point: [f32; 2], start: [f32; 2], end: [f32; 2]) -> f32 {
    let dir = [end[0] - start[0], end[1] - start[1]];
    let len2 = dir[0] * dir[0] + dir[1] * dir[1];
    if len2 <= 0.0 {
        return 0.0;
    }
    let rel = [point[0] - start[0], point[1] - start[1]];
    let projection = (rel[0] * dir[0] + rel[1] * dir[1]) / len2;
    projection.clamp(0.0, 1.0)
}

/// One light's RGB contribution at `point`: `color * intensity / (1 + k·d²)`.
pub fn light_contribution(light: &Light, point: [f32; 2]) -> [f32; 3] {
    let dx = point[0] - light.position[0];
    let dy = point[1] - light.position[1];
    let dist2 = dx * dx + dy * dy;
    let falloff = 1.0 / (1.0 + FALLOFF_STEEPNESS * dist2);
    let scale = falloff * light.intensity;
    [
        light.color[0] * scale,
        light.color[1] * scale,
        light.color[2] * scale,
    ]
}

/// Point on a cubic bezier at parameter `t`.
pub fn bezier_point(curve: &CubicBezier, t: f32) -> [f32; 2] {
    let mt = 1.0 - t;
    let w = [mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t];
    let mut out = [0.0_f32; 2];
    for (point, weight) in curve.iter().zip(w) {
        out[0] += point[0] * weight;
        out[1] += point[1] * weight;
    }
    out
}

/// Stroke influence of a curve at `point`: minimum distance over
/// [`BEZIER_SAMPLES`] parametric samples, pushed through a smoothstep
/// falloff between 0.7·thickness and thickness. 1.0 on the curve, exactly
/// 0.0 outside the thickness band.
pub fn bezier_influence(curve: &CubicBezier, point: [f32; 2], thickness: f32) -> f32 {
    let mut min_dist = 1.0_f32;
    for i in 0..=BEZIER_SAMPLES {
        let t = i as f32 / BEZIER_SAMPLES as f32;
        let sample = bezier_point(curve, t);
        let dx = point[0] - sample[0];
        let dy = point[1] - sample[1];
        min_dist = min_dist.min((dx * dx + dy * dy).sqrt());
    }
    if min_dist < thickness {
        1.0 - smoothstep(thickness * 0.7, thickness, min_dist)
    } else {
        0.0
    }
}

/// Strength of the corner tint at `point`: squared falloff over the bounded
/// extent, hard zero outside it.
pub fn corner_glow_strength(field: &CornerGlowField, point: [f32; 2]) -> f32 {
    let uv = match field.corner {
        Corner::TopLeft => point,
        Corner::TopRight => [1.0 - point[0], point[1]],
        Corner::BottomLeft => [point[0], 1.0 - point[1]],
        Corner::BottomRight => [1.0 - point[0], 1.0 - point[1]],
    };
    if uv[0] > field.extent[0] || uv[1] > field.extent[1] {
        return 0.0;
    }
    let normalized = [uv[0] / field.extent[0], uv[1] / field.extent[1]];
    let dist = ((normalized[0] * normalized[0] + normalized[1] * normalized[1]).sqrt()
        / 2.0_f32.sqrt())
    .clamp(0.0, 1.0);
    (1.0 - dist).powi(2)
}

/// Marker coverage at `point` for the given surface resolution: 1 inside a
/// circle, 0 outside, smoothed over a one-pixel edge. Radius is fixed in
/// pixels, so coverage extent shrinks as resolution grows.
pub fn circle_coverage(field: &CircleField, point: [f32; 2], resolution: (u32, u32)) -> f32 {
    let pixel = [
        point[0] * resolution.0 as f32,
        point[1] * resolution.1 as f32,
    ];
    let mut min_edge = 1.0_f32;
    for center in &field.centers {
        let center_px = [
            center[0] * resolution.0 as f32,
            center[1] * resolution.1 as f32,
        ];
        let dx = pixel[0] - center_px[0];
        let dy = pixel[1] - center_px[1];
        let dist = (dx * dx + dy * dy).sqrt();
        let edge = smoothstep(field.radius - 0.5, field.radius + 0.5, dist);
        min_edge = min_edge.min(edge);
    }
    1.0 - min_edge
}

/// Quadratic ease-in-out applied to the circle tile's gradient position.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_projection_boundaries() {
        let start = [0.2, 0.3];
        let end = [0.8, 0.9];
        assert_eq!(gradient_projection(start, start, end), 0.0);
        assert_eq!(gradient_projection(end, start, end), 1.0);
    }

    #[test]
    fn gradient_projection_monotonic_and_clamped() {
        let start = [0.0, 0.0];
        let end = [1.0, 0.0];
        let mut previous = -1.0;
        for i in 0..=10 {
            let x = i as f32 / 10.0;
            let value = gradient_projection([x, 0.5], start, end);
            assert!(value >= previous);
            previous = value;
        }
        // Outside the segment the projection pins to the nearest endpoint.
        assert_eq!(gradient_projection([-0.5, 0.0], start, end), 0.0);
        assert_eq!(gradient_projection([1.5, 0.0], start, end), 1.0);
    }

    #[test]
    fn gradient_projection_degenerate_axis() {
        assert_eq!(gradient_projection([0.4, 0.4], [0.5, 0.5], [0.5, 0.5]), 0.0);
    }

    #[test]
    fn light_contribution_exact_at_zero_distance() {
        let light = Light {
            position: [0.3, 0.7],
            color: [0.2, 0.4, 0.6],
            intensity: 0.5,
        };
        let at_center = light_contribution(&light, light.position);
        for (channel, expected) in at_center.iter().zip(light.color) {
            assert!((channel - expected * light.intensity).abs() < 1e-7);
        }
    }

    #[test]
    fn light_contribution_strictly_decreases_with_distance() {
        let light = Light {
            position: [0.5, 0.5],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        };
        let mut previous = f32::INFINITY;
        for i in 1..=20 {
            let offset = i as f32 * 0.05;
            let value = light_contribution(&light, [0.5 + offset, 0.5])[0];
            assert!(value < previous, "falloff not decreasing at {offset}");
            previous = value;
        }
    }

    #[test]
    fn bezier_influence_peaks_on_curve_and_dies_outside() {
        let curve: CubicBezier = [[0.0, 0.5], [0.3, 0.5], [0.7, 0.5], [1.0, 0.5]];
        let on_curve = bezier_point(&curve, 0.5);
        assert_eq!(bezier_influence(&curve, on_curve, 0.01), 1.0);
        // Far outside the thickness band the influence is exactly zero.
        assert_eq!(bezier_influence(&curve, [0.5, 0.9], 0.01), 0.0);
    }

    #[test]
    fn bezier_endpoints_match_control_points() {
        let curve: CubicBezier = [[0.1, 0.9], [0.4, 0.1], [0.6, 0.9], [0.9, 0.2]];
        assert_eq!(bezier_point(&curve, 0.0), [0.1, 0.9]);
        let end = bezier_point(&curve, 1.0);
        assert!((end[0] - 0.9).abs() < 1e-6 && (end[1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn corner_glow_vanishes_outside_extent() {
        let field = CornerGlowField::default();
        assert!(corner_glow_strength(&field, [0.0, 0.0]) > 0.9);
        assert_eq!(corner_glow_strength(&field, [0.6, 0.1]), 0.0);
        assert_eq!(corner_glow_strength(&field, [0.1, 0.7]), 0.0);

        let mirrored = CornerGlowField {
            corner: Corner::BottomRight,
            ..CornerGlowField::default()
        };
        assert!(corner_glow_strength(&mirrored, [1.0, 1.0]) > 0.9);
        assert_eq!(corner_glow_strength(&mirrored, [0.2, 0.2]), 0.0);
    }

    #[test]
    fn circle_coverage_is_full_at_centers_regardless_of_resolution() {
        let field = CircleField::default();
        let center = field.centers[0];
        assert_eq!(circle_coverage(&field, center, (400, 400)), 1.0);
        assert_eq!(circle_coverage(&field, center, (1600, 1600)), 1.0);
        assert_eq!(circle_coverage(&field, [0.5, 0.5], (400, 400)), 0.0);
    }

    #[test]
    fn ease_in_out_fixed_points() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(0.5), 0.5);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert!(ease_in_out(0.25) < 0.25);
        assert!(ease_in_out(0.75) > 0.75);
    }
}
