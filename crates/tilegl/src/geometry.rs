//! Shared quad geometry and the design-grid coordinate mapping.

use crate::params::{Line, Shape};

/// Clip-space corners of the full-viewport quad, drawn as a triangle strip.
pub const QUAD_POSITIONS: [f32; 8] = [-1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0];
/// Texture coordinates matching [`QUAD_POSITIONS`].
pub const QUAD_TEXCOORDS: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];
pub const QUAD_VERTEX_COUNT: u32 = 4;

/// Maps a point on the 0–100 design grid into clip space, with y flipped so
/// the grid reads top-down like the layouts it was authored in.
pub fn grid_to_clip(point: [f32; 2]) -> [f32; 2] {
    [point[0] / 50.0 - 1.0, 1.0 - point[1] / 50.0]
}

/// Converts a four-vertex fan into the equivalent six-vertex triangle list;
/// the pipeline has no fan topology.
pub fn fan_to_triangles(fan: &[[f32; 2]; 4]) -> [[f32; 2]; 6] {
    [fan[0], fan[1], fan[2], fan[0], fan[2], fan[3]]
}

/// Flat clip-space vertex data for a shape list, six vertices per shape.
pub fn shape_vertices(shapes: &[Shape]) -> Vec<f32> {
    let mut out = Vec::with_capacity(shapes.len() * 12);
    for shape in shapes {
        let clip = shape.coords.map(grid_to_clip);
        for vertex in fan_to_triangles(&clip) {
            out.extend_from_slice(&vertex);
        }
    }
    out
}

/// Flat clip-space vertex data for a line list, two vertices per segment.
pub fn line_vertices(lines: &[Line]) -> Vec<f32> {
    let mut out = Vec::with_capacity(lines.len() * 4);
    for line in lines {
        out.extend_from_slice(&grid_to_clip(line.start));
        out.extend_from_slice(&grid_to_clip(line.end));
    }
    out
}

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const TEXCOORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

pub(crate) fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 8,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRIBUTES,
    }
}

pub(crate) fn texcoord_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 8,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &TEXCOORD_ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::EmblemField;

    #[test]
    fn grid_corners_map_to_clip_corners() {
        assert_eq!(grid_to_clip([0.0, 0.0]), [-1.0, 1.0]);
        assert_eq!(grid_to_clip([100.0, 0.0]), [1.0, 1.0]);
        assert_eq!(grid_to_clip([0.0, 100.0]), [-1.0, -1.0]);
        assert_eq!(grid_to_clip([100.0, 100.0]), [1.0, -1.0]);
        assert_eq!(grid_to_clip([50.0, 50.0]), [0.0, 0.0]);
    }

    #[test]
    fn fan_triangulation_preserves_winding() {
        let fan = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let triangles = fan_to_triangles(&fan);
        assert_eq!(&triangles[0..3], &[fan[0], fan[1], fan[2]]);
        assert_eq!(&triangles[3..6], &[fan[0], fan[2], fan[3]]);
    }

    #[test]
    fn emblem_buffers_have_expected_sizes() {
        let emblem = EmblemField::default();
        let shapes = shape_vertices(&emblem.shapes);
        assert_eq!(shapes.len(), emblem.shapes.len() * 12);
        let lines = line_vertices(&emblem.lines);
        assert_eq!(lines.len(), emblem.lines.len() * 4);
    }
}
