//! Cornell - command line front end for the path tracer.
//!
//! `cornell render` traces one of the built-in scenes to a PPM or PNG image;
//! `cornell pi` and `cornell cosine` run the Monte Carlo sampling demos.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cornell_math::monte_carlo::{estimate_cosine_cubed, estimate_pi};
use cornell_renderer::{render, save_png, write_ppm, RenderConfig, Scene, SceneKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cornell", version, about = "Monte Carlo path tracer for the Cornell box")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a built-in scene
    Render(RenderArgs),

    /// Estimate pi with plain and stratified samples
    Pi {
        /// Samples per side of the stratification grid
        #[arg(long = "sqrt-n", default_value_t = 1000)]
        sqrt_n: u32,

        /// Random seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Integrate cos^3 over the hemisphere with cosine-weighted samples
    Cosine {
        /// Number of samples
        #[arg(short = 's', long, default_value_t = 1_000_000)]
        samples: u32,

        /// Random seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// JSON render settings; flags below override it
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Scene to render (cornell-box, cornell-smoke)
    #[arg(long)]
    scene: Option<SceneKind>,

    /// Width of the rendered image
    #[arg(short = 'w', long)]
    width: Option<u32>,

    /// Samples per pixel
    #[arg(short = 's', long)]
    samples: Option<u32>,

    /// Maximum bounce depth
    #[arg(short = 'd', long)]
    depth: Option<u32>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Render on a single thread
    #[arg(long)]
    sequential: bool,

    /// Output file (.png writes PNG, anything else PPM); stdout when omitted or "-"
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    /// Defaults, then the config file, then flags.
    fn resolve_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse config {}", path.display()))?
            }
            None => RenderConfig::default(),
        };

        if let Some(scene) = self.scene {
            config.scene = scene;
        }
        if let Some(width) = self.width {
            config.image_width = width;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(depth) = self.depth {
            config.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if self.sequential {
            config.parallel = false;
        }

        config.validate().context("Invalid render settings")?;
        Ok(config)
    }
}

fn run_render(args: RenderArgs) -> Result<()> {
    let config = args.resolve_config()?;
    log::info!("Render settings: {:?}", config);

    let scene = Scene::build(config.scene).context("Failed to build scene")?;
    let image = render(&scene, &config)?;

    match args.output.as_deref() {
        Some(path) if path != Path::new("-") => {
            if is_png(path) {
                save_png(path, &image).with_context(|| format!("Failed to save {}", path.display()))?;
            } else {
                let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
                write_ppm(BufWriter::new(file), &image)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                log::info!("Saved {}x{} PPM to {}", image.width, image.height, path.display());
            }
        }
        _ => {
            let stdout = io::stdout();
            write_ppm(BufWriter::new(stdout.lock()), &image).context("Failed to write image to stdout")?;
        }
    }

    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Render(args) => run_render(args)?,
        Command::Pi { sqrt_n, seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let estimate = estimate_pi(sqrt_n, &mut rng);
            println!("Regular    Estimate of Pi = {:.12}", estimate.regular);
            println!("Stratified Estimate of Pi = {:.12}", estimate.stratified);
        }
        Command::Cosine { samples, seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let estimate = estimate_cosine_cubed(samples, &mut rng);
            println!("Pi/2     = {:.12}", std::f64::consts::FRAC_PI_2);
            println!("Estimate = {:.12}", estimate);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "cornell", "render", "--scene", "cornell-smoke", "-w", "64", "-s", "8", "--seed", "3", "--sequential",
        ]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        let config = args.resolve_config().unwrap();

        assert_eq!(config.scene, SceneKind::CornellSmoke);
        assert_eq!(config.image_width, 64);
        assert_eq!(config.samples_per_pixel, 8);
        assert_eq!(config.seed, 3);
        assert_eq!(config.max_depth, 50);
        assert!(!config.parallel);
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = std::env::temp_dir().join(format!("cornell_cli_test_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "image_width": 300, "samples_per_pixel": 20, "max_depth": 7 }"#).unwrap();

        let cli = Cli::parse_from([
            "cornell",
            "render",
            "--config",
            path.to_str().unwrap(),
            "--samples",
            "5",
        ]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        let config = args.resolve_config();
        std::fs::remove_file(&path).ok();
        let config = config.unwrap();

        assert_eq!(config.image_width, 300);
        assert_eq!(config.samples_per_pixel, 5);
        assert_eq!(config.max_depth, 7);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let cli = Cli::parse_from(["cornell", "render", "--samples", "0"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_unknown_scene_rejected() {
        let result = Cli::try_parse_from(["cornell", "render", "--scene", "sponza"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_by_extension() {
        assert!(is_png(Path::new("out.png")));
        assert!(is_png(Path::new("OUT.PNG")));
        assert!(!is_png(Path::new("out.ppm")));
        assert!(!is_png(Path::new("out")));
    }
}
