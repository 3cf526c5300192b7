//! Per-frame phases of the aggregation process.
//!
//! One simulation step runs them in order:
//! 1. [`replenish_phase`] — spawn walkers up to the active target.
//! 2. [`advance_phase`] — move every walker one biased random step.
//! 3. [`promotion_phase`] — stick colliding walkers to the structure,
//!    with mirror symmetry.
//! 4. [`sync_phase`] — lay the structure and walkers out in the
//!    [`InstanceBuffer`] for rendering.

use crate::{
    config::Config,
    instance_buffer::InstanceBuffer,
    structure::Structure,
    walker::{WalkerSet, walk_delta},
};
use rand::Rng;

/// Outcome of a [`promotion_phase`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Promotion {
    /// Walkers that collided and left the walker set.
    pub promoted: usize,
    /// Structure entries appended, mirrors included.
    pub appended: usize,
    /// Walkers dropped because the structure has no room left for them.
    pub dropped: usize,
}

/// Tops the walker set up so the next steps have particles to move.
///
/// For the current structure:
///
/// 1. Compute the target as `cfg.max_active`, capped by
///    [`Structure::remaining`] so walkers plus structure never exceed
///    `cfg.max_particles`.
/// 2. Spawn walkers on the sphere of radius `cfg.spawn_radius` via
///    [`WalkerSet::top_up`] until the set reaches the target.
///
/// Existing walkers keep their positions; nothing is spawned if the set is
/// already at or above the target.
///
/// ### Parameters
/// - `structure` - The current aggregate; only its free capacity is read.
/// - `walkers` - Walker set to fill up.
/// - `cfg` - Global configuration, providing `max_active` and the spawn
///   radius.
/// - `rng` - Random source for the spawn positions.
///
/// ### Returns
/// The number of walkers spawned.
pub fn replenish_phase(
    structure: &Structure,
    walkers: &mut WalkerSet,
    cfg: &Config,
    rng: &mut impl Rng,
) -> usize {
    // Never hold more walkers than the structure could still absorb.
    let target = cfg.max_active.min(structure.remaining());
    walkers.top_up(target, cfg.spawn_radius, rng)
}

/// Moves every walker one biased random step.
///
/// For each walker:
///
/// 1. Take the unit vector toward the origin and scale it by
///    `cfg.step_size`.
/// 2. Add an independent jitter in `[-cfg.jitter / 2, cfg.jitter / 2)` on
///    each axis.
///
/// Walkers may overshoot the origin or get pushed outward; nothing clamps
/// them.
///
/// ### Parameters
/// - `walkers` - Walker set whose positions are advanced in place.
/// - `cfg` - Global configuration, providing step size and jitter width.
/// - `rng` - Random source for the jitter.
pub fn advance_phase(walkers: &mut WalkerSet, cfg: &Config, rng: &mut impl Rng) {
    for p in walkers.points.iter_mut() {
        *p += walk_delta(*p, cfg.step_size, cfg.jitter, rng);
    }
}

/// Sticks walkers that touch the structure and removes them from the set.
///
/// For each walker, in order:
///
/// 1. Test it with [`Structure::collides`] against the structure as it
///    currently stands, so a walker can stick to mirrors appended earlier
///    in the same phase.
/// 2. If it collides, append it and its mirror images via
///    [`Structure::append_symmetric`] (the batch may be cut short at
///    capacity) and drop it from `walkers`.
/// 3. Otherwise keep it, at its current position, for the next step.
///
/// Afterwards, walkers beyond the remaining capacity are dropped from the
/// tail of the set.
///
/// ### Parameters
/// - `structure` - The aggregate; new entries are appended to it.
/// - `walkers` - Walker set; promoted and surplus walkers are removed.
/// - `cfg` - Global configuration, providing the contact distance
///   (`2 * particle_radius`).
///
/// ### Returns
/// A [`Promotion`] with the walkers promoted, entries appended and walkers
/// dropped.
pub fn promotion_phase(structure: &mut Structure, walkers: &mut WalkerSet, cfg: &Config) -> Promotion {
    let contact = cfg.contact_distance();
    let mut out = Promotion::default();

    walkers.points.retain(|&p| {
        if !structure.collides(p, contact) {
            return true;
        }

        // Stuck: the walker becomes part of the structure with its mirrors.
        let added = structure.append_symmetric(p);
        log::debug!(
            "walker stuck at ({:.3}, {:.3}, {:.3}), {} entries appended",
            p.x,
            p.y,
            p.z,
            added
        );
        out.promoted += 1;
        out.appended += added;
        false
    });

    // Keep structure plus walkers within max_particles.
    let room = structure.remaining();
    if walkers.points.len() > room {
        out.dropped = walkers.points.len() - room;
        walkers.points.truncate(room);
    }

    out
}

/// Lays the particles out in the instance buffer for rendering.
///
/// Structure entries come first, in insertion order, followed by the
/// walkers. Slots past the live count are parked at the sentinel by
/// [`InstanceBuffer::sync`].
///
/// ### Parameters
/// - `structure` - The aggregate; its stale flag is consumed.
/// - `walkers` - Current walker set; only read access is required.
/// - `instances` - Render buffer to overwrite.
///
/// ### Returns
/// `true` if the structure gained entries since the previous sync.
pub fn sync_phase(structure: &mut Structure, walkers: &WalkerSet, instances: &mut InstanceBuffer) -> bool {
    instances.sync(&[structure.positions(), &walkers.points]);
    structure.take_dirty()
}
