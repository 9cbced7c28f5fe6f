//! Command-line entry point for the metaballs viewer.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use metaballs::{init_logging, run, AppError, SceneConfig};

#[derive(Parser)]
#[command(name = "metaballs", version, about = "Animated metaballs merging into one isosurface")]
struct Cli {
    /// Scene config file (JSON). Missing fields use defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid points per axis.
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Side length of the sampled cube.
    #[arg(long)]
    grid_size: Option<f32>,

    /// Field value at which the surface is drawn.
    #[arg(long)]
    iso_level: Option<f32>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn scene_config(&self) -> Result<SceneConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        if let Some(resolution) = self.resolution {
            config.grid_resolution = resolution;
        }
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(iso_level) = self.iso_level {
            config.iso_level = iso_level;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = cli.scene_config().and_then(|config| {
        if cli.print_config {
            println!("{}", config.to_json_pretty()?);
            Ok(())
        } else {
            run(config)
        }
    });

    if let Err(err) = result {
        log::error!("{err}");
        process::exit(1);
    }
}
