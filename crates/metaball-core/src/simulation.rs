//! Simulation context: the sphere set, its sampling grid and the frame clock.

use std::time::Instant;

use crate::error::Result;
use crate::field::DEFAULT_GRADIENT_EPSILON;
use crate::grid::SamplingGrid;
use crate::isosurface::{extract_isosurface, IsoSurface};
use crate::motion::{boundary_for, integrate};
use crate::options::{SceneConfig, MAX_SHADER_SPHERES};
use crate::sphere::Sphere;

/// Owns all mutable animation state for one run.
#[derive(Debug, Clone)]
pub struct Simulation {
    spheres: Vec<Sphere>,
    grid: SamplingGrid,
    boundary: f32,
    iso_level: f32,
    elapsed: f32,
    frame: u64,
}

impl Simulation {
    /// Validates `config` and builds the sphere set and sampling grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn new(config: &SceneConfig) -> Result<Self> {
        config.validate()?;
        let grid = SamplingGrid::generate(config.grid_size, config.grid_resolution)?;
        log::info!("created {} spheres", config.spheres.len());
        if config.spheres.len() > MAX_SHADER_SPHERES {
            log::warn!(
                "{} spheres configured; only the first {MAX_SHADER_SPHERES} contribute to surface color",
                config.spheres.len()
            );
        }
        Ok(Self {
            spheres: config.spheres.clone(),
            grid,
            boundary: boundary_for(config.grid_size),
            iso_level: config.iso_level,
            elapsed: 0.0,
            frame: 0,
        })
    }

    /// Advances all spheres by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        integrate(&mut self.spheres, dt, self.boundary);
        self.elapsed += dt;
        self.frame += 1;
    }

    /// Extracts the current blended surface.
    #[must_use]
    pub fn extract_surface(&self) -> IsoSurface {
        extract_isosurface(
            &self.grid,
            self.spheres.as_slice(),
            self.iso_level,
            DEFAULT_GRADIENT_EPSILON,
        )
    }

    /// Current spheres.
    #[must_use]
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// The sampling grid.
    #[must_use]
    pub fn grid(&self) -> &SamplingGrid {
        &self.grid
    }

    /// Half-width of the bounce cube.
    #[must_use]
    pub fn boundary(&self) -> f32 {
        self.boundary
    }

    /// Surface threshold.
    #[must_use]
    pub fn iso_level(&self) -> f32 {
        self.iso_level
    }

    /// Simulated seconds so far.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Number of steps taken.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

/// Wall-clock frame timer producing capped time steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: f32,
}

impl FrameClock {
    /// Creates a clock whose deltas never exceed `max_delta` seconds.
    #[must_use]
    pub fn new(max_delta: f32) -> Self {
        Self {
            last: None,
            max_delta,
        }
    }

    /// Returns seconds since the previous tick (0 on the first tick).
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// [`Self::tick`] with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = self
            .last
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f32());
        self.last = Some(now);
        dt.min(self.max_delta)
    }
}
