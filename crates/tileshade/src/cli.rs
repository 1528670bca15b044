use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tilegl::Antialiasing;

#[derive(Parser, Debug)]
#[command(
    name = "tileshade",
    author,
    version,
    about = "Procedural background tile renderer",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Tile to preview (`first` through `ninth`); omit to open the whole bank.
    #[arg(value_name = "TILE")]
    pub tile: Option<String>,

    /// List the tile bank and exit.
    #[arg(long)]
    pub list: bool,

    /// Window size (e.g. `800x800`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// FPS cap for the hover animation (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count.
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<Antialiasing>,

    /// Pin the grain seed; omit to draw a fresh one per tile per launch.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<f32>,

    /// Tile parameter overrides (TOML).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rotate through the bank on an interval (e.g. `10s`).
    #[arg(long, value_name = "DURATION", value_parser = parse_cycle)]
    pub cycle: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a tile's scalar fields on the CPU at one point.
    Probe(ProbeArgs),
    /// Print account likelihoods for a set of quiz answers.
    Quiz(QuizArgs),
}

#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Tile to probe (`first` through `ninth`).
    #[arg(value_name = "TILE")]
    pub tile: String,

    /// Sample point in texture coordinates, e.g. `0.3,0.7`.
    #[arg(long, value_name = "X,Y", value_parser = parse_point, default_value = "0.5,0.5")]
    pub at: (f32, f32),

    /// Surface size assumed for pixel-space fields.
    #[arg(long, value_name = "WIDTHxHEIGHT", default_value = "800x800")]
    pub size: String,

    /// Tile parameter overrides (TOML).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct QuizArgs {
    #[arg(long)]
    pub adult: bool,
    #[arg(long)]
    pub job: bool,
    #[arg(long)]
    pub college: bool,
    #[arg(long)]
    pub retirement: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;

            if samples == 0 || samples == 1 {
                return Ok(Antialiasing::Off);
            }

            if !matches!(samples, 2 | 4 | 8 | 16) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                ));
            }

            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width".to_string())?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height".to_string())?;
    if width == 0 || height == 0 {
        return Err("size must be greater than zero".into());
    }
    Ok((width, height))
}

fn parse_cycle(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value.trim())
        .map_err(|err| format!("invalid cycle interval '{value}': {err}"))
}

fn parse_point(value: &str) -> Result<(f32, f32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| "expected X,Y".to_string())?;
    let x = x
        .trim()
        .parse::<f32>()
        .map_err(|_| "invalid x coordinate".to_string())?;
    let y = y
        .trim()
        .parse::<f32>()
        .map_err(|_| "invalid y coordinate".to_string())?;
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_antialias_variants() {
        assert_eq!(parse_antialias("auto").unwrap(), Antialiasing::Auto);
        assert_eq!(parse_antialias("off").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("1").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("4").unwrap(), Antialiasing::Samples(4));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("").is_err());
    }

    #[test]
    fn parses_sizes() {
        assert_eq!(parse_size("800x600").unwrap(), (800, 600));
        assert_eq!(parse_size("1920X1080").unwrap(), (1920, 1080));
        assert!(parse_size("800").is_err());
        assert!(parse_size("0x600").is_err());
    }

    #[test]
    fn parses_points_and_cycles() {
        assert_eq!(parse_point("0.3,0.7").unwrap(), (0.3, 0.7));
        assert!(parse_point("0.3").is_err());
        assert_eq!(
            parse_cycle("10s").unwrap(),
            std::time::Duration::from_secs(10)
        );
        assert!(parse_cycle("later").is_err());
    }
}
