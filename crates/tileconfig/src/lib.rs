//! TOML parameter records for the TileShade tile bank.
//!
//! A config file overrides individual knobs of individual tiles; anything it
//! leaves out falls back to the renderer's built-in parameters. Records
//! therefore carry `Option`s and possibly-empty lists, and the binary
//! overlays them onto the renderer's defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Shader capacity for point lights on the light-glow tile.
pub const MAX_LIGHTS: usize = 3;
/// Shader capacity for bezier curves on the curve-field tile.
pub const MAX_CURVES: usize = 16;
/// Shader capacity for circle markers on the marker tile.
pub const MAX_CIRCLES: usize = 10;

/// Names the bank recognizes, in presentation order.
pub const TILE_NAMES: [&str; 9] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TileBankConfig {
    pub version: u32,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub tiles: BTreeMap<String, TileRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default, deserialize_with = "deserialize_antialias_opt")]
    pub antialias: Option<AntialiasSetting>,
    pub fps: Option<f32>,
    /// Grain seed; omit to draw a fresh one per launch.
    pub seed: Option<f32>,
    /// Rotation interval for cycle mode, e.g. `"10s"`.
    #[serde(
        default,
        deserialize_with = "deserialize_duration_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub cycle: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntialiasSetting {
    Auto,
    Off,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

/// One tile's overrides, tagged by the effect family it configures.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TileRecord {
    Grain {
        base_color: Option<[f32; 3]>,
        grain: Option<f32>,
    },
    CornerGlow {
        base_color: Option<[f32; 3]>,
        grain: Option<f32>,
        tint: Option<[f32; 3]>,
        /// Fraction of the tile the glow may reach, per axis.
        extent: Option<[f32; 2]>,
        opacity: Option<f32>,
        corner: Option<Corner>,
    },
    Lights {
        #[serde(default)]
        lights: Vec<LightRecord>,
        /// Hover targets, one per light; empty keeps the built-in targets.
        #[serde(default)]
        hover: Vec<LightRecord>,
        grain: Option<f32>,
    },
    Emblem {
        #[serde(default)]
        shapes: Vec<ShapeRecord>,
        #[serde(default)]
        lines: Vec<LineRecord>,
        line_color: Option<[f32; 3]>,
    },
    Curves {
        base_color: Option<[f32; 3]>,
        grain: Option<f32>,
        curve_color: Option<[f32; 3]>,
        thickness: Option<f32>,
        gradient: Option<GradientRecord>,
        #[serde(default)]
        curves: Vec<[[f32; 2]; 4]>,
    },
    Circles {
        #[serde(default)]
        circles: Vec<[f32; 2]>,
        radius: Option<f32>,
        gradient: Option<GradientRecord>,
        grain: Option<f32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LightRecord {
    pub position: [f32; 2],
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Filled polygon on the 0–100 design grid with its own gradient axis.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShapeRecord {
    pub coords: Vec<[f32; 2]>,
    pub gradient_start: [f32; 2],
    pub gradient_end: [f32; 2],
    pub start_color: [f32; 3],
    pub end_color: [f32; 3],
}

/// Line segment on the 0–100 design grid.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LineRecord {
    pub start: [f32; 2],
    pub end: [f32; 2],
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct GradientRecord {
    pub start: Option<[f32; 2]>,
    pub end: Option<[f32; 2]>,
    pub start_color: Option<[f32; 3]>,
    pub end_color: Option<[f32; 3]>,
    pub strength: Option<f32>,
}

impl TileBankConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: TileBankConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        for (name, record) in &self.tiles {
            if !TILE_NAMES.contains(&name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "unknown tile '{name}'; expected one of {TILE_NAMES:?}"
                )));
            }
            record
                .validate()
                .map_err(|issue| ConfigError::Invalid(format!("tile '{name}': {issue}")))?;
        }
        Ok(())
    }
}

impl TileRecord {
    fn validate(&self) -> Result<(), String> {
        match self {
            TileRecord::Grain { base_color, grain } => {
                check_color_opt("base_color", base_color)?;
                check_unit_opt("grain", grain)?;
            }
            TileRecord::CornerGlow {
                base_color,
                grain,
                tint,
                extent,
                opacity,
                ..
            } => {
                check_color_opt("base_color", base_color)?;
                check_color_opt("tint", tint)?;
                check_unit_opt("grain", grain)?;
                check_unit_opt("opacity", opacity)?;
                if let Some([x, y]) = extent {
                    if *x <= 0.0 || *y <= 0.0 {
                        return Err("extent components must be positive".into());
                    }
                }
            }
            TileRecord::Lights {
                lights,
                hover,
                grain,
            } => {
                if lights.len() > MAX_LIGHTS {
                    return Err(format!(
                        "{} lights exceed the shader capacity of {MAX_LIGHTS}",
                        lights.len()
                    ));
                }
                if hover.len() > MAX_LIGHTS {
                    return Err(format!(
                        "{} hover targets exceed the shader capacity of {MAX_LIGHTS}",
                        hover.len()
                    ));
                }
                for light in lights.iter().chain(hover) {
                    check_color("color", &light.color)?;
                }
                check_unit_opt("grain", grain)?;
            }
            TileRecord::Emblem {
                shapes, line_color, ..
            } => {
                for (index, shape) in shapes.iter().enumerate() {
                    if shape.coords.len() != 4 {
                        return Err(format!(
                            "shape {index} has {} vertices; shapes are four-vertex fans",
                            shape.coords.len()
                        ));
                    }
                    check_color("start_color", &shape.start_color)?;
                    check_color("end_color", &shape.end_color)?;
                }
                check_color_opt("line_color", line_color)?;
            }
            TileRecord::Curves {
                base_color,
                grain,
                curve_color,
                thickness,
                curves,
                ..
            } => {
                if curves.len() > MAX_CURVES {
                    return Err(format!(
                        "{} curves exceed the shader capacity of {MAX_CURVES}",
                        curves.len()
                    ));
                }
                check_color_opt("base_color", base_color)?;
                check_color_opt("curve_color", curve_color)?;
                check_unit_opt("grain", grain)?;
                if let Some(thickness) = thickness {
                    if *thickness <= 0.0 {
                        return Err("thickness must be positive".into());
                    }
                }
            }
            TileRecord::Circles {
                circles,
                radius,
                grain,
                ..
            } => {
                if circles.len() > MAX_CIRCLES {
                    return Err(format!(
                        "{} circles exceed the shader capacity of {MAX_CIRCLES}",
                        circles.len()
                    ));
                }
                if let Some(radius) = radius {
                    if *radius <= 0.0 {
                        return Err("radius must be positive".into());
                    }
                }
                check_unit_opt("grain", grain)?;
            }
        }
        Ok(())
    }
}

fn check_color(field: &str, color: &[f32; 3]) -> Result<(), String> {
    if color.iter().any(|component| !(0.0..=1.0).contains(component)) {
        return Err(format!("{field} components must lie in 0..=1"));
    }
    Ok(())
}

fn check_color_opt(field: &str, color: &Option<[f32; 3]>) -> Result<(), String> {
    match color {
        Some(color) => check_color(field, color),
        None => Ok(()),
    }
}

fn check_unit_opt(field: &str, value: &Option<f32>) -> Result<(), String> {
    match value {
        Some(value) if !(0.0..=1.0).contains(value) => {
            Err(format!("{field} must lie in 0..=1"))
        }
        _ => Ok(()),
    }
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs_f64(v)))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn deserialize_antialias_opt<'de, D>(deserializer: D) -> Result<Option<AntialiasSetting>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Num(i64),
    }

    let helper: Option<Helper> = Option::deserialize(deserializer)?;
    let result = match helper {
        None => None,
        Some(Helper::Str(raw)) => Some(parse_antialias(&raw).map_err(de::Error::custom)?),
        Some(Helper::Num(value)) => {
            if value < 0 {
                return Err(de::Error::custom("antialias value must be non-negative"));
            }
            let raw = value.to_string();
            Some(parse_antialias(&raw).map_err(de::Error::custom)?)
        }
    };
    Ok(result)
}

pub fn parse_antialias(raw: &str) -> Result<AntialiasSetting, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(AntialiasSetting::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(AntialiasSetting::Off),
        "2" => Ok(AntialiasSetting::Samples2),
        "4" => Ok(AntialiasSetting::Samples4),
        "8" => Ok(AntialiasSetting::Samples8),
        "16" => Ok(AntialiasSetting::Samples16),
        other => Err(format!("invalid antialias setting '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sparse_config() {
        let config = TileBankConfig::from_toml_str(
            r#"
version = 1

[defaults]
antialias = "4"
cycle = "10s"

[tiles.eighth]
effect = "curves"
thickness = 0.006
"#,
        )
        .unwrap();

        assert_eq!(config.defaults.antialias, Some(AntialiasSetting::Samples4));
        assert_eq!(config.defaults.cycle, Some(Duration::from_secs(10)));
        assert!(matches!(
            config.tiles.get("eighth"),
            Some(TileRecord::Curves {
                thickness: Some(t),
                ..
            }) if (t - 0.006).abs() < 1e-9
        ));
    }

    #[test]
    fn rejects_unknown_tile_name() {
        let err = TileBankConfig::from_toml_str(
            r#"
version = 1

[tiles.tenth]
effect = "grain"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("tenth")));
    }

    #[test]
    fn rejects_excess_curves() {
        let mut config = String::from("version = 1\n[tiles.eighth]\neffect = \"curves\"\ncurves = [\n");
        for _ in 0..17 {
            config.push_str("  [[0.0, 0.9], [0.4, 0.1], [0.6, 0.9], [1.0, 0.0]],\n");
        }
        config.push_str("]\n");
        let err = TileBankConfig::from_toml_str(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("capacity")));
    }

    #[test]
    fn rejects_out_of_range_color() {
        let err = TileBankConfig::from_toml_str(
            r#"
version = 1

[tiles.second]
effect = "grain"
base_color = [1.5, 0.0, 0.0]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("base_color")));
    }

    #[test]
    fn rejects_non_quad_shape() {
        let err = TileBankConfig::from_toml_str(
            r#"
version = 1

[tiles.seventh]
effect = "emblem"

[[tiles.seventh.shapes]]
coords = [[22.0, 23.0], [48.0, 23.0], [48.0, 40.0]]
gradient_start = [22.0, 23.0]
gradient_end = [48.0, 47.0]
start_color = [0.11, 0.27, 0.20]
end_color = [0.10, 0.10, 0.10]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("four-vertex")));
    }

    #[test]
    fn rejects_wrong_version() {
        let err = TileBankConfig::from_toml_str("version = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
