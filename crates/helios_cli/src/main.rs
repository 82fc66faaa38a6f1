//! `helios` - render the solar system to PNG, as a still or a frame sequence.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use helios_core::{saturn_ring, solar_system, OrbitalSystem, SceneConfig, TextureCache};
use helios_renderer::{build_solar_scene, render, Camera, RenderConfig};

const USAGE: &str = "\
Usage: helios [OPTIONS]

Options:
  --config FILE         Scene configuration (JSON); built-in view if omitted
  --output FILE         Output image for a still render [default: render.png]
  --width W             Override image width
  --height H            Override image height
  --spp N               Override samples per pixel
  --soft-shadows N      Soft shadows with N light samples per shading point
  --seed S              Override the random seed
  --assets DIR          Directory texture paths are resolved against [default: .]
  --background FILE     Sky texture, relative to the assets directory
  --frames N            Render N frames instead of a still
  --dt T                Time step between frames [default: 0.1]
  --out-dir DIR         Directory for frame_00000.png ... [default: frames]
  -h, --help            Print this help";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
struct Args {
    config: Option<PathBuf>,
    output: PathBuf,
    width: Option<u32>,
    height: Option<u32>,
    spp: Option<u32>,
    soft_shadows: Option<u32>,
    seed: Option<u64>,
    assets: PathBuf,
    background: Option<String>,
    frames: Option<u32>,
    dt: f32,
    out_dir: PathBuf,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            output: PathBuf::from("render.png"),
            width: None,
            height: None,
            spp: None,
            soft_shadows: None,
            seed: None,
            assets: PathBuf::from("."),
            background: None,
            frames: None,
            dt: 0.1,
            out_dir: PathBuf::from("frames"),
        }
    }
}

fn value<T>(flag: &str, args: &mut impl Iterator<Item = String>) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = args
        .next()
        .ok_or_else(|| anyhow!("missing value for {flag}"))?;
    raw.parse()
        .map_err(|e| anyhow!("invalid value {raw:?} for {flag}: {e}"))
}

/// Parse flags (without the program name). `None` means help was requested.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut parsed = Args::default();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => parsed.config = Some(value(&flag, &mut args)?),
            "--output" => parsed.output = value(&flag, &mut args)?,
            "--width" => parsed.width = Some(value(&flag, &mut args)?),
            "--height" => parsed.height = Some(value(&flag, &mut args)?),
            "--spp" => parsed.spp = Some(value(&flag, &mut args)?),
            "--soft-shadows" => parsed.soft_shadows = Some(value(&flag, &mut args)?),
            "--seed" => parsed.seed = Some(value(&flag, &mut args)?),
            "--assets" => parsed.assets = value(&flag, &mut args)?,
            "--background" => parsed.background = Some(value(&flag, &mut args)?),
            "--frames" => parsed.frames = Some(value(&flag, &mut args)?),
            "--dt" => parsed.dt = value(&flag, &mut args)?,
            "--out-dir" => parsed.out_dir = value(&flag, &mut args)?,
            other => bail!("unknown argument {other:?}\n\n{USAGE}"),
        }
    }

    if parsed.frames == Some(0) {
        bail!("--frames must be at least 1");
    }

    Ok(Some(parsed))
}

/// Load the configuration and apply command-line overrides.
fn scene_config(args: &Args) -> Result<SceneConfig> {
    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading scene config {}", path.display()))?,
        None => {
            log::info!("No --config given, using the default view");
            SceneConfig::default()
        }
    };

    let settings = &mut config.render;
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(spp) = args.spp {
        settings.samples_per_pixel = spp;
    }
    if let Some(samples) = args.soft_shadows {
        settings.shadow_samples = Some(samples);
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    config.validate().context("invalid settings")?;
    Ok(config)
}

fn render_frame(
    system: &OrbitalSystem,
    config: &SceneConfig,
    time: f32,
    cache: &mut TextureCache,
    background: Option<&str>,
    path: &Path,
) -> Result<()> {
    let background = background
        .map(|name| cache.load(name))
        .transpose()
        .context("loading background texture")?;

    let scene = build_solar_scene(system, &[saturn_ring()], time, cache, background)
        .context("building scene")?;
    let camera = Camera::from_config(&config.camera, config.render.width, config.render.height);
    let image = render(&camera, &scene, &RenderConfig::from(&config.render));

    image
        .save_png(path)
        .with_context(|| format!("writing {}", path.display()))
}

fn run(args: Args) -> Result<()> {
    let config = scene_config(&args)?;
    let system = OrbitalSystem::new(solar_system()).context("building orbital system")?;
    let mut cache = TextureCache::with_base_dir(&args.assets);
    let background = args.background.as_deref();

    let Some(frames) = args.frames else {
        return render_frame(&system, &config, config.time, &mut cache, background, &args.output);
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let start = Instant::now();
    for frame in 0..frames {
        let time = config.time + frame as f32 * args.dt;
        let path = args.out_dir.join(format!("frame_{frame:05}.png"));
        log::info!("Frame {}/{} at t={:.3}", frame + 1, frames, time);
        render_frame(&system, &config, time, &mut cache, background, &path)?;
    }
    log::info!(
        "Rendered {} frames to {} in {:.2?}",
        frames,
        args.out_dir.display(),
        start.elapsed()
    );

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    log::info!("Starting Helios");
    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_no_args_gives_defaults() {
        assert_eq!(parse(&[]).unwrap(), Some(Args::default()));
    }

    #[test]
    fn test_parse_all_flags() {
        let args = parse(&[
            "--config", "scene.json", "--width", "320", "--height", "200", "--spp", "16",
            "--soft-shadows", "32", "--seed", "9", "--assets", "data", "--frames", "3",
            "--dt", "0.5", "--out-dir", "out", "--background", "stars.png",
        ])
        .unwrap()
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("scene.json")));
        assert_eq!((args.width, args.height), (Some(320), Some(200)));
        assert_eq!(args.spp, Some(16));
        assert_eq!(args.soft_shadows, Some(32));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.assets, PathBuf::from("data"));
        assert_eq!(args.frames, Some(3));
        assert_eq!(args.dt, 0.5);
        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.background.as_deref(), Some("stars.png"));
    }

    #[test]
    fn test_help_short_circuits() {
        assert_eq!(parse(&["--width", "10", "--help"]).unwrap(), None);
    }

    #[test]
    fn test_bad_input_rejected() {
        assert!(parse(&["--width"]).is_err());
        assert!(parse(&["--width", "wide"]).is_err());
        assert!(parse(&["--frobnicate"]).is_err());
        assert!(parse(&["--frames", "0"]).is_err());
    }

    #[test]
    fn test_overrides_applied_and_validated() {
        let args = parse(&["--width", "64", "--soft-shadows", "8", "--seed", "3"])
            .unwrap()
            .unwrap();
        let config = scene_config(&args).unwrap();
        assert_eq!(config.render.width, 64);
        assert_eq!(config.render.shadow_samples, Some(8));
        assert_eq!(config.render.seed, 3);

        let args = parse(&["--spp", "0"]).unwrap().unwrap();
        assert!(scene_config(&args).is_err());
    }
}
