//! The tile bank: nine registered tiles built from six fragment families,
//! lowered into the pass plans `GpuState` consumes.

pub mod shaders;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use bytemuck::bytes_of;

use crate::geometry::{line_vertices, shape_vertices, QUAD_VERTEX_COUNT};
use crate::params::{
    CircleField, Corner, CornerGlowField, CurveField, EmblemField, GrainField, LightRig,
    GRAIN_AMOUNT,
};
use crate::uniforms::{
    CircleUniforms, CornerUniforms, CurveUniforms, GrainUniforms, LightUniforms, LineUniforms,
    ShapeUniforms,
};

/// Position of a tile in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileId {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
}

impl TileId {
    pub const ALL: [TileId; 9] = [
        TileId::First,
        TileId::Second,
        TileId::Third,
        TileId::Fourth,
        TileId::Fifth,
        TileId::Sixth,
        TileId::Seventh,
        TileId::Eighth,
        TileId::Ninth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TileId::First => "first",
            TileId::Second => "second",
            TileId::Third => "third",
            TileId::Fourth => "fourth",
            TileId::Fifth => "fifth",
            TileId::Sixth => "sixth",
            TileId::Seventh => "seventh",
            TileId::Eighth => "eighth",
            TileId::Ninth => "ninth",
        }
    }

    /// The effect this slot renders when no configuration overrides it.
    pub fn default_effect(self) -> TileEffect {
        match self {
            TileId::First => TileEffect::Lights {
                resting: LightRig::resting(),
                hover: LightRig::hover(),
                grain: GRAIN_AMOUNT,
            },
            TileId::Second | TileId::Fourth | TileId::Fifth => {
                TileEffect::Grain(GrainField::default())
            }
            TileId::Third => TileEffect::CornerGlow(CornerGlowField::default()),
            TileId::Sixth => TileEffect::CornerGlow(CornerGlowField {
                corner: Corner::BottomRight,
                ..CornerGlowField::default()
            }),
            TileId::Seventh => TileEffect::Emblem(EmblemField::default()),
            TileId::Eighth => TileEffect::Curves(CurveField::default()),
            TileId::Ninth => TileEffect::Circles(CircleField::default()),
        }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TileId {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        TileId::ALL
            .into_iter()
            .find(|id| id.name() == normalized)
            .ok_or_else(|| {
                format!("unknown tile '{input}'; expected first through ninth")
            })
    }
}

/// Effect family plus its parameter record.
#[derive(Debug, Clone, PartialEq)]
pub enum TileEffect {
    Grain(GrainField),
    CornerGlow(CornerGlowField),
    Lights {
        resting: LightRig,
        hover: LightRig,
        grain: f32,
    },
    Emblem(EmblemField),
    Curves(CurveField),
    Circles(CircleField),
}

/// One tile instance: bank slot, grain seed, and effect parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSpec {
    pub id: TileId,
    /// Fixed at creation; the grain pattern never flickers frame to frame.
    pub seed: f32,
    pub effect: TileEffect,
}

impl TileSpec {
    pub fn with_defaults(id: TileId, seed: f32) -> Self {
        Self {
            id,
            seed,
            effect: id.default_effect(),
        }
    }

    /// The resting/hover rigs when this tile is the interactive one.
    pub fn light_rigs(&self) -> Option<(LightRig, LightRig)> {
        match &self.effect {
            TileEffect::Lights { resting, hover, .. } => Some((*resting, *hover)),
            _ => None,
        }
    }
}

/// Which vertex stage and buffer shape a pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexClass {
    /// Shared position+texcoord quad, 4-vertex triangle strip.
    Quad,
    /// Bespoke clip-space triangle list.
    Shapes,
    /// Bespoke clip-space line list.
    Lines,
}

/// How a draw's uniform buffer is kept current after creation.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// Uniform values are fixed for the tile's life.
    Static,
    /// Rebuilt every frame from the hover animator's rig.
    Lights { grain: f32, seed: f32 },
    /// Rebuilt whenever the surface size changes.
    CircleResolution { field: CircleField, seed: f32 },
}

/// One draw call: its uniform block and the vertex range it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPlan {
    pub initial: Vec<u8>,
    pub refresh: Refresh,
    pub range: Range<u32>,
}

impl DrawPlan {
    fn fixed(initial: Vec<u8>, range: Range<u32>) -> Self {
        Self {
            initial,
            refresh: Refresh::Static,
            range,
        }
    }
}

/// One shader pass over the tile's surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PassPlan {
    pub label: &'static str,
    pub vertex_class: VertexClass,
    pub vertex_source: &'static str,
    pub fragment_source: &'static str,
    /// Flat clip-space vertex data for bespoke geometry; `None` uses the
    /// shared quad buffers.
    pub vertex_data: Option<Vec<f32>>,
    pub draws: Vec<DrawPlan>,
}

fn quad_pass(label: &'static str, fragment_source: &'static str, draw: DrawPlan) -> PassPlan {
    PassPlan {
        label,
        vertex_class: VertexClass::Quad,
        vertex_source: shaders::QUAD_VS,
        fragment_source,
        vertex_data: None,
        draws: vec![draw],
    }
}

/// Lowers a tile spec into the ordered pass list its surface draws. Order
/// matters for the emblem tile: grain first, shapes over it, lines on top,
/// with plain overdraw rather than blending.
pub fn build_passes(spec: &TileSpec) -> Vec<PassPlan> {
    let quad_range = 0..QUAD_VERTEX_COUNT;
    match &spec.effect {
        TileEffect::Grain(field) => vec![quad_pass(
            "grain",
            shaders::GRAIN_FS,
            DrawPlan::fixed(
                bytes_of(&GrainUniforms::new(field, spec.seed)).to_vec(),
                quad_range,
            ),
        )],
        TileEffect::CornerGlow(field) => vec![quad_pass(
            "corner-glow",
            shaders::CORNER_FS,
            DrawPlan::fixed(
                bytes_of(&CornerUniforms::new(field, spec.seed)).to_vec(),
                quad_range,
            ),
        )],
        TileEffect::Lights {
            resting, grain, ..
        } => vec![quad_pass(
            "light-glow",
            shaders::LIGHTS_FS,
            DrawPlan {
                initial: bytes_of(&LightUniforms::new(resting, *grain, spec.seed)).to_vec(),
                refresh: Refresh::Lights {
                    grain: *grain,
                    seed: spec.seed,
                },
                range: quad_range,
            },
        )],
        TileEffect::Emblem(field) => {
            let mut passes = vec![quad_pass(
                "emblem-grain",
                shaders::GRAIN_FS,
                DrawPlan::fixed(
                    bytes_of(&GrainUniforms::new(&field.grain, spec.seed)).to_vec(),
                    quad_range,
                ),
            )];

            let shape_draws = field
                .shapes
                .iter()
                .enumerate()
                .map(|(index, shape)| {
                    let base = index as u32 * 6;
                    DrawPlan::fixed(bytes_of(&ShapeUniforms::new(shape)).to_vec(), base..base + 6)
                })
                .collect();
            passes.push(PassPlan {
                label: "emblem-shapes",
                vertex_class: VertexClass::Shapes,
                vertex_source: shaders::SHAPE_VS,
                fragment_source: shaders::SHAPE_FS,
                vertex_data: Some(shape_vertices(&field.shapes)),
                draws: shape_draws,
            });

            let line_count = field.lines.len() as u32 * 2;
            passes.push(PassPlan {
                label: "emblem-lines",
                vertex_class: VertexClass::Lines,
                vertex_source: shaders::LINE_VS,
                fragment_source: shaders::LINE_FS,
                vertex_data: Some(line_vertices(&field.lines)),
                draws: vec![DrawPlan::fixed(
                    bytes_of(&LineUniforms::new(field.line_color)).to_vec(),
                    0..line_count,
                )],
            });
            passes
        }
        TileEffect::Curves(field) => vec![quad_pass(
            "curve-field",
            shaders::CURVES_FS,
            DrawPlan::fixed(
                bytes_of(&CurveUniforms::new(field, spec.seed)).to_vec(),
                quad_range,
            ),
        )],
        TileEffect::Circles(field) => vec![quad_pass(
            "circle-field",
            shaders::CIRCLES_FS,
            DrawPlan {
                initial: bytes_of(&CircleUniforms::new(field, spec.seed, (1, 1))).to_vec(),
                refresh: Refresh::CircleResolution {
                    field: field.clone(),
                    seed: spec.seed,
                },
                range: quad_range,
            },
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_names_round_trip() {
        for id in TileId::ALL {
            assert_eq!(id.name().parse::<TileId>().unwrap(), id);
        }
        assert!("tenth".parse::<TileId>().is_err());
    }

    #[test]
    fn emblem_lowers_to_three_passes_in_order() {
        let spec = TileSpec::with_defaults(TileId::Seventh, 1.0);
        let passes = build_passes(&spec);
        let labels: Vec<_> = passes.iter().map(|pass| pass.label).collect();
        assert_eq!(labels, ["emblem-grain", "emblem-shapes", "emblem-lines"]);

        // One draw per shape, each covering its own six vertices.
        let shapes = &passes[1];
        assert_eq!(shapes.draws.len(), 8);
        assert_eq!(shapes.draws[3].range, 18..24);
    }

    #[test]
    fn light_tile_refreshes_from_the_animator() {
        let spec = TileSpec::with_defaults(TileId::First, 1.0);
        let passes = build_passes(&spec);
        assert_eq!(passes.len(), 1);
        assert!(matches!(passes[0].draws[0].refresh, Refresh::Lights { .. }));
    }

    #[test]
    fn circle_tile_refreshes_on_resolution_change() {
        let spec = TileSpec::with_defaults(TileId::Ninth, 1.0);
        let passes = build_passes(&spec);
        assert!(matches!(
            passes[0].draws[0].refresh,
            Refresh::CircleResolution { .. }
        ));
    }

    #[test]
    fn bank_slots_cover_all_six_families() {
        use std::collections::BTreeSet;
        let mut families = BTreeSet::new();
        for id in TileId::ALL {
            families.insert(match id.default_effect() {
                TileEffect::Grain(_) => "grain",
                TileEffect::CornerGlow(_) => "corner-glow",
                TileEffect::Lights { .. } => "lights",
                TileEffect::Emblem(_) => "emblem",
                TileEffect::Curves(_) => "curves",
                TileEffect::Circles(_) => "circles",
            });
        }
        assert_eq!(families.len(), 6);
    }
}
