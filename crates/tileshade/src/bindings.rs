//! Maps `tileconfig` records onto the renderer's parameter types. The two
//! crates stay decoupled; this module is the only place that knows both
//! vocabularies.

use anyhow::{anyhow, Result};
use tileconfig::{AntialiasSetting, TileBankConfig, TileRecord};
use tilegl::params::{
    CircleField, Corner, CornerGlowField, CurveField, EmblemField, GrainField, Light, LightRig,
    Line, Shape,
};
use tilegl::tiles::{TileEffect, TileId, TileSpec};
use tilegl::Antialiasing;

pub fn map_antialias(setting: AntialiasSetting) -> Antialiasing {
    match setting {
        AntialiasSetting::Auto => Antialiasing::Auto,
        AntialiasSetting::Off => Antialiasing::Off,
        AntialiasSetting::Samples2 => Antialiasing::Samples(2),
        AntialiasSetting::Samples4 => Antialiasing::Samples(4),
        AntialiasSetting::Samples8 => Antialiasing::Samples(8),
        AntialiasSetting::Samples16 => Antialiasing::Samples(16),
    }
}

/// Builds the full bank: each slot starts from its built-in effect and takes
/// whatever overrides the config carries. A configured record may also
/// repurpose a slot to a different effect family.
pub fn build_bank(
    config: Option<&TileBankConfig>,
    mut seed_for: impl FnMut(TileId) -> f32,
) -> Result<Vec<TileSpec>> {
    let mut bank = Vec::with_capacity(TileId::ALL.len());
    for id in TileId::ALL {
        let mut spec = TileSpec::with_defaults(id, seed_for(id));
        if let Some(record) = config.and_then(|config| config.tiles.get(id.name())) {
            spec.effect = effect_from_record(record)
                .map_err(|err| anyhow!("tile '{id}': {err}"))?;
        }
        bank.push(spec);
    }
    Ok(bank)
}

fn effect_from_record(record: &TileRecord) -> Result<TileEffect, String> {
    Ok(match record {
        TileRecord::Grain { base_color, grain } => {
            let mut field = GrainField::default();
            apply(base_color, &mut field.base_color);
            apply(grain, &mut field.amount);
            TileEffect::Grain(field)
        }
        TileRecord::CornerGlow {
            base_color,
            grain,
            tint,
            extent,
            opacity,
            corner,
        } => {
            let mut field = CornerGlowField::default();
            apply(base_color, &mut field.grain.base_color);
            apply(grain, &mut field.grain.amount);
            apply(tint, &mut field.tint);
            apply(extent, &mut field.extent);
            apply(opacity, &mut field.opacity);
            if let Some(corner) = corner {
                field.corner = map_corner(*corner);
            }
            TileEffect::CornerGlow(field)
        }
        TileRecord::Lights {
            lights,
            hover,
            grain,
        } => {
            let mut resting = LightRig::resting();
            let mut hover_rig = LightRig::hover();
            overlay_lights(&mut resting, lights);
            overlay_lights(&mut hover_rig, hover);
            TileEffect::Lights {
                resting,
                hover: hover_rig,
                grain: grain.unwrap_or(tilegl::params::GRAIN_AMOUNT),
            }
        }
        TileRecord::Emblem {
            shapes,
            lines,
            line_color,
        } => {
            let mut field = EmblemField::default();
            if !shapes.is_empty() {
                field.shapes = shapes
                    .iter()
                    .map(|record| {
                        let coords: [[f32; 2]; 4] = record
                            .coords
                            .clone()
                            .try_into()
                            .map_err(|_| "shapes are four-vertex fans".to_string())?;
                        Ok(Shape {
                            coords,
                            gradient_start: record.gradient_start,
                            gradient_end: record.gradient_end,
                            start_color: record.start_color,
                            end_color: record.end_color,
                        })
                    })
                    .collect::<Result<Vec<_>, String>>()?;
            }
            if !lines.is_empty() {
                field.lines = lines
                    .iter()
                    .map(|record| Line {
                        start: record.start,
                        end: record.end,
                    })
                    .collect();
            }
            apply(line_color, &mut field.line_color);
            TileEffect::Emblem(field)
        }
        TileRecord::Curves {
            base_color,
            grain,
            curve_color,
            thickness,
            gradient,
            curves,
        } => {
            let mut field = CurveField::default();
            apply(base_color, &mut field.base_color);
            apply(grain, &mut field.grain);
            apply(curve_color, &mut field.curve_color);
            apply(thickness, &mut field.thickness);
            if let Some(gradient) = gradient {
                apply(&gradient.start, &mut field.gradient.start);
                apply(&gradient.end, &mut field.gradient.end);
                apply(&gradient.start_color, &mut field.gradient.start_color);
                apply(&gradient.end_color, &mut field.gradient.end_color);
                apply(&gradient.strength, &mut field.gradient.strength);
            }
            if !curves.is_empty() {
                field.curves = curves.clone();
            }
            TileEffect::Curves(field)
        }
        TileRecord::Circles {
            circles,
            radius,
            gradient,
            grain,
        } => {
            let mut field = CircleField::default();
            if !circles.is_empty() {
                field.centers = circles.clone();
            }
            apply(radius, &mut field.radius);
            apply(grain, &mut field.grain);
            if let Some(gradient) = gradient {
                apply(&gradient.start, &mut field.gradient.start);
                apply(&gradient.end, &mut field.gradient.end);
                apply(&gradient.start_color, &mut field.gradient.start_color);
                apply(&gradient.end_color, &mut field.gradient.end_color);
            }
            TileEffect::Circles(field)
        }
    })
}

fn apply<T: Copy>(source: &Option<T>, target: &mut T) {
    if let Some(value) = source {
        *target = *value;
    }
}

fn overlay_lights(rig: &mut LightRig, records: &[tileconfig::LightRecord]) {
    for (slot, record) in rig.lights.iter_mut().zip(records) {
        *slot = Light {
            position: record.position,
            color: record.color,
            intensity: record.intensity,
        };
    }
}

fn map_corner(corner: tileconfig::Corner) -> Corner {
    match corner {
        tileconfig::Corner::TopLeft => Corner::TopLeft,
        tileconfig::Corner::TopRight => Corner::TopRight,
        tileconfig::Corner::BottomLeft => Corner::BottomLeft,
        tileconfig::Corner::BottomRight => Corner::BottomRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bank_matches_registry() {
        let bank = build_bank(None, |_| 1.0).unwrap();
        assert_eq!(bank.len(), 9);
        assert_eq!(bank[0].effect, TileId::First.default_effect());
        assert_eq!(bank[7].effect, TileId::Eighth.default_effect());
    }

    #[test]
    fn config_overrides_single_knobs() {
        let config = TileBankConfig::from_toml_str(
            r#"
version = 1

[tiles.eighth]
effect = "curves"
thickness = 0.008
"#,
        )
        .unwrap();
        let bank = build_bank(Some(&config), |_| 1.0).unwrap();
        match &bank[7].effect {
            TileEffect::Curves(field) => {
                assert!((field.thickness - 0.008).abs() < 1e-9);
                // Everything unspecified keeps the built-in values.
                assert_eq!(field.curves, CurveField::default().curves);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn config_can_repurpose_a_slot() {
        let config = TileBankConfig::from_toml_str(
            r#"
version = 1

[tiles.fourth]
effect = "circles"
radius = 6.0
"#,
        )
        .unwrap();
        let bank = build_bank(Some(&config), |_| 1.0).unwrap();
        assert!(matches!(
            &bank[3].effect,
            TileEffect::Circles(field) if field.radius == 6.0
        ));
    }

    #[test]
    fn light_overrides_touch_only_listed_slots() {
        let config = TileBankConfig::from_toml_str(
            r#"
version = 1

[tiles.first]
effect = "lights"

[[tiles.first.lights]]
position = [0.2, 0.2]
color = [1.0, 0.0, 0.0]
intensity = 0.2
"#,
        )
        .unwrap();
        let bank = build_bank(Some(&config), |_| 1.0).unwrap();
        match &bank[0].effect {
            TileEffect::Lights { resting, .. } => {
                assert_eq!(resting.lights[0].position, [0.2, 0.2]);
                assert_eq!(
                    resting.lights[1].position,
                    LightRig::resting().lights[1].position
                );
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }
}
