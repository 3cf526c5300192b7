use std::path::Path;

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

/// Engine constants for the aggregation process.
///
/// Every field has a default, so a TOML file only needs the keys it
/// overrides:
///
/// ```toml
/// max_particles = 4000
/// step_size = 0.08
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Radius of one particle. Two particles touch at `2 * particle_radius`.
    pub particle_radius: f32,
    /// Hard ceiling on structure entries and on visual instances.
    pub max_particles: usize,
    /// Radius of the sphere walkers are spawned on.
    pub spawn_radius: f32,
    /// Length of the drift toward the origin per step.
    pub step_size: f32,
    /// Target number of walkers alive at once.
    pub max_active: usize,
    /// Full width of the per-axis jitter; each axis moves by `(u - 0.5) * jitter`.
    pub jitter: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            particle_radius: 0.1,
            max_particles: 1000,
            spawn_radius: 3.0,
            step_size: 0.05,
            max_active: 10,
            jitter: 0.5,
        }
    }
}

impl Config {
    /// Distance below which a walker sticks to a structure entry.
    #[inline]
    pub fn contact_distance(&self) -> f32 {
        2.0 * self.particle_radius
    }

    /// Checks that every constant is usable by the engine.
    ///
    /// ### Errors
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.particle_radius.is_finite() && self.particle_radius > 0.0,
            "particle_radius must be positive, got {}",
            self.particle_radius
        );
        ensure!(self.max_particles > 0, "max_particles must be at least 1");
        ensure!(
            self.spawn_radius.is_finite() && self.spawn_radius > 0.0,
            "spawn_radius must be positive, got {}",
            self.spawn_radius
        );
        ensure!(
            self.step_size.is_finite() && self.step_size >= 0.0,
            "step_size must be non-negative, got {}",
            self.step_size
        );
        ensure!(
            self.jitter.is_finite() && self.jitter >= 0.0,
            "jitter must be non-negative, got {}",
            self.jitter
        );
        Ok(())
    }

    /// Parses and validates a config from TOML text.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = toml::from_str(text).context("invalid config TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}
