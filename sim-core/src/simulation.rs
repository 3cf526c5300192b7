//! The aggregation engine: owns every particle collection and runs the
//! per-frame phases.

use crate::{
    config::Config,
    instance_buffer::InstanceBuffer,
    phases,
    rng::{SimRng, create_rng},
    structure::Structure,
    walker::WalkerSet,
};
use glam::Vec3;

/// What a single [`Simulation::step`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub spawned: usize,
    pub promoted: usize,
    pub appended: usize,
    pub dropped: usize,
    /// New structure entries were written to the instance buffer.
    pub structure_changed: bool,
    /// The structure reached capacity during this step.
    pub became_full: bool,
}

/// Snapshot of counters for status displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub structure: usize,
    pub walkers: usize,
    pub capacity: usize,
    pub steps: u64,
    pub is_full: bool,
}

/// Diffusion-limited aggregation with eight-fold mirror symmetry.
///
/// The structure starts as a single seed at the origin. Each [`step`]
/// spawns walkers on a sphere, walks them toward the centre, sticks the
/// ones that touch the structure (plus their mirror images) and refreshes
/// the instance buffer.
///
/// [`step`]: Simulation::step
#[derive(Debug)]
pub struct Simulation {
    cfg: Config,
    seed: u64,
    rng: SimRng,
    structure: Structure,
    walkers: WalkerSet,
    instances: InstanceBuffer,
    steps: u64,
}

impl Simulation {
    /// Builds a fresh simulation.
    ///
    /// ### Errors
    /// Fails if `cfg` does not pass [`Config::validate`].
    pub fn new(cfg: Config, seed: u64) -> anyhow::Result<Self> {
        cfg.validate()?;
        let mut sim = Self {
            cfg,
            seed,
            rng: create_rng(seed),
            structure: Structure::new(Vec3::ZERO, cfg.max_particles),
            walkers: WalkerSet::with_capacity(cfg.max_active),
            instances: InstanceBuffer::with_capacity(cfg.max_particles),
            steps: 0,
        };
        phases::sync_phase(&mut sim.structure, &sim.walkers, &mut sim.instances);
        log::info!(
            "simulation ready: capacity {}, {} walkers, seed {}",
            cfg.max_particles,
            cfg.max_active,
            seed
        );
        Ok(sim)
    }

    /// Advances the simulation by one frame.
    pub fn step(&mut self) -> StepReport {
        let was_full = self.structure.is_full();

        let spawned =
            phases::replenish_phase(&self.structure, &mut self.walkers, &self.cfg, &mut self.rng);
        phases::advance_phase(&mut self.walkers, &self.cfg, &mut self.rng);
        let promotion = phases::promotion_phase(&mut self.structure, &mut self.walkers, &self.cfg);
        let structure_changed =
            phases::sync_phase(&mut self.structure, &self.walkers, &mut self.instances);

        self.steps += 1;
        let became_full = !was_full && self.structure.is_full();
        if became_full {
            log::info!(
                "structure full at {} particles after {} steps",
                self.structure.len(),
                self.steps
            );
        }
        log::trace!(
            "step {}: +{} walkers, {} promoted, {} appended",
            self.steps,
            spawned,
            promotion.promoted,
            promotion.appended
        );

        StepReport {
            spawned,
            promoted: promotion.promoted,
            appended: promotion.appended,
            dropped: promotion.dropped,
            structure_changed,
            became_full,
        }
    }

    /// Restarts from a lone seed, replaying the same random stream.
    pub fn reset(&mut self) {
        self.rng = create_rng(self.seed);
        self.structure = Structure::new(Vec3::ZERO, self.cfg.max_particles);
        self.walkers = WalkerSet::with_capacity(self.cfg.max_active);
        if self.instances.capacity() == self.cfg.max_particles {
            self.instances.clear();
        } else {
            self.instances = InstanceBuffer::with_capacity(self.cfg.max_particles);
        }
        self.steps = 0;
        phases::sync_phase(&mut self.structure, &self.walkers, &mut self.instances);
        log::info!("simulation reset (seed {})", self.seed);
    }

    /// Resets with a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.reset();
    }

    /// Replaces the config and resets.
    ///
    /// ### Errors
    /// Fails, leaving the simulation untouched, if `cfg` is invalid.
    pub fn reconfigure(&mut self, cfg: Config) -> anyhow::Result<()> {
        cfg.validate()?;
        self.cfg = cfg;
        self.reset();
        Ok(())
    }

    pub fn stats(&self) -> Stats {
        Stats {
            structure: self.structure.len(),
            walkers: self.walkers.len(),
            capacity: self.cfg.max_particles,
            steps: self.steps,
            is_full: self.structure.is_full(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn walkers(&self) -> &WalkerSet {
        &self.walkers
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    /// Mutable access for renderers that clear the update flag.
    pub fn instances_mut(&mut self) -> &mut InstanceBuffer {
        &mut self.instances
    }
}
