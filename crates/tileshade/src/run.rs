use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use tileconfig::TileBankConfig;
use tilegl::params::{
    bezier_influence, circle_coverage, corner_glow_strength, ease_in_out, gradient_projection,
    light_contribution,
};
use tilegl::tiles::{TileEffect, TileId, TileSpec};
use tilegl::{run_preview, Antialiasing, PreviewConfig};
use tracing_subscriber::EnvFilter;

use crate::bindings;
use crate::cli::{parse_size, ProbeArgs, QuizArgs, RunArgs};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    if args.list {
        list_bank(config.as_ref());
        return Ok(());
    }

    let pinned_seed = args
        .seed
        .or_else(|| config.as_ref().and_then(|config| config.defaults.seed));
    let mut rng = rand::thread_rng();
    let bank = bindings::build_bank(config.as_ref(), |_| {
        pinned_seed.unwrap_or_else(|| rng.gen_range(0.0..100.0))
    })?;

    let specs = match args.tile.as_deref() {
        Some(name) => {
            let id: TileId = name.parse().map_err(anyhow::Error::msg)?;
            vec![tile_from_bank(bank, id)]
        }
        None => bank,
    };

    let defaults = config.map(|config| config.defaults).unwrap_or_default();
    let surface_size = match args.size.as_deref() {
        Some(value) => parse_size(value).map_err(anyhow::Error::msg)?,
        None => (800, 800),
    };
    let antialiasing = args
        .antialias
        .or(defaults.antialias.map(bindings::map_antialias))
        .unwrap_or(Antialiasing::Auto);
    let preview = PreviewConfig {
        surface_size,
        target_fps: normalize_fps(args.fps.or(defaults.fps)),
        antialiasing,
        cycle: args.cycle.or(defaults.cycle),
    };

    tracing::info!(
        tiles = specs.len(),
        cycle = ?preview.cycle,
        "starting tile preview"
    );
    run_preview(preview, specs)
}

pub fn probe(args: ProbeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let id: TileId = args.tile.parse().map_err(anyhow::Error::msg)?;
    let bank = bindings::build_bank(config.as_ref(), |_| 0.0)?;
    let spec = tile_from_bank(bank, id);

    let point = [args.at.0, args.at.1];
    let resolution = parse_size(&args.size).map_err(anyhow::Error::msg)?;
    println!("tile {id} at ({}, {})", point[0], point[1]);

    match &spec.effect {
        TileEffect::Grain(field) => {
            println!(
                "  base color ({:.4}, {:.4}, {:.4}), grain {:.3}",
                field.base_color[0], field.base_color[1], field.base_color[2], field.amount
            );
        }
        TileEffect::CornerGlow(field) => {
            println!(
                "  tint strength {:.6} (extent {}x{}, opacity {})",
                corner_glow_strength(field, point),
                field.extent[0],
                field.extent[1],
                field.opacity
            );
        }
        TileEffect::Lights { resting, .. } => {
            let mut total = [0.0_f32; 3];
            for (index, light) in resting.lights.iter().enumerate() {
                let contribution = light_contribution(light, point);
                println!(
                    "  light {index}: ({:.6}, {:.6}, {:.6})",
                    contribution[0], contribution[1], contribution[2]
                );
                for (slot, value) in total.iter_mut().zip(contribution) {
                    *slot += value;
                }
            }
            println!(
                "  combined: ({:.6}, {:.6}, {:.6})",
                total[0], total[1], total[2]
            );
        }
        TileEffect::Emblem(field) => {
            let clip = [point[0] * 2.0 - 1.0, 1.0 - point[1] * 2.0];
            for (index, shape) in field.shapes.iter().enumerate() {
                let start = tilegl::geometry::grid_to_clip(shape.gradient_start);
                let end = tilegl::geometry::grid_to_clip(shape.gradient_end);
                println!(
                    "  shape {index}: gradient position {:.4}",
                    gradient_projection(clip, start, end)
                );
            }
            println!("  {} line segments", field.lines.len());
        }
        TileEffect::Curves(field) => {
            // The base tint eases toward the start coordinate.
            let factor = gradient_projection(point, field.gradient.end, field.gradient.start);
            println!("  gradient factor {factor:.4}");
            let mut max_influence = 0.0_f32;
            for (index, curve) in field.curves.iter().enumerate() {
                let influence = bezier_influence(curve, point, field.thickness);
                if influence > 0.0 {
                    println!("  curve {index}: influence {influence:.4}");
                }
                max_influence = max_influence.max(influence);
            }
            println!("  combined influence {max_influence:.4}");
        }
        TileEffect::Circles(field) => {
            let eased = ease_in_out(gradient_projection(
                point,
                field.gradient.start,
                field.gradient.end,
            ));
            println!("  eased gradient position {eased:.4}");
            println!(
                "  marker coverage {:.4} at {}x{}",
                circle_coverage(field, point, resolution),
                resolution.0,
                resolution.1
            );
        }
    }
    Ok(())
}

pub fn quiz(args: QuizArgs) -> Result<()> {
    let answers = pageflow::QuizAnswers {
        is_adult: Some(args.adult),
        has_job: Some(args.job),
        saving_for_college: Some(args.college),
        saving_for_retirement: Some(args.retirement),
    };
    for entry in pageflow::account_likelihoods(&answers) {
        println!("  {:<20} {:>5.1}%", entry.account, entry.value * 100.0);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Option<TileBankConfig>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let config = TileBankConfig::from_toml_str(&raw)
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    Ok(Some(config))
}

fn list_bank(config: Option<&TileBankConfig>) {
    println!("Tile bank:");
    for id in TileId::ALL {
        let family = match id.default_effect() {
            TileEffect::Grain(_) => "grain",
            TileEffect::CornerGlow(_) => "corner-glow",
            TileEffect::Lights { .. } => "light-glow (interactive)",
            TileEffect::Emblem(_) => "emblem",
            TileEffect::Curves(_) => "curve field",
            TileEffect::Circles(_) => "circle markers",
        };
        let configured = config
            .map(|config| config.tiles.contains_key(id.name()))
            .unwrap_or(false);
        println!(
            "  {:<8} {family}{}",
            id.name(),
            if configured { "  (configured)" } else { "" }
        );
    }
}

fn tile_from_bank(bank: Vec<TileSpec>, id: TileId) -> TileSpec {
    bank.into_iter()
        .find(|spec| spec.id == id)
        .expect("bank covers every tile id")
}

fn normalize_fps(value: Option<f32>) -> Option<f32> {
    value.and_then(|fps| if fps > 0.0 { Some(fps) } else { None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn zero_fps_treated_as_uncapped() {
        assert_eq!(normalize_fps(Some(0.0)), None);
        assert_eq!(normalize_fps(Some(-5.0)), None);
        assert_eq!(normalize_fps(Some(30.0)), Some(30.0));
        assert_eq!(normalize_fps(None), None);
    }

    #[test]
    fn missing_config_surfaces_path_in_error() {
        let err = load_config(Some(Path::new("/nonexistent/tiles.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tiles.toml"));
    }

    #[test]
    fn config_file_round_trips_through_loader() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "version = 1\n\n[tiles.second]\neffect = \"grain\"\ngrain = 0.06\n"
        )
        .unwrap();
        let config = load_config(Some(file.path())).unwrap().unwrap();
        assert!(config.tiles.contains_key("second"));
    }
}
