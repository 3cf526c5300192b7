//! Core 3-D diffusion-limited aggregation library.
//!
//! Main components:
//! - [`simulation`] — the engine that owns all state and runs a step.
//! - [`phases`] — the individual per-step phases.
//! - [`structure`] — the fixed-capacity aggregate and collision test.
//! - [`walker`] — sphere spawning and the biased random walk.
//! - [`symmetry`] — eight-fold mirror images of a position.
//! - [`instance_buffer`] — fixed-size render buffer with sentinel slots.
//! - [`config`] — engine constants, loadable from TOML.
//! - [`rng`] — seeded random source.
//! - [`types`] — shared aliases and constants.

pub mod config;
pub mod instance_buffer;
pub mod phases;
pub mod rng;
pub mod simulation;
pub mod structure;
pub mod symmetry;
pub mod types;
pub mod walker;

pub use config::Config;
pub use simulation::{Simulation, Stats, StepReport};
