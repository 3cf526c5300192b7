use glam::Vec3;

/// A point in simulation space.
///
/// Positions carry no identity beyond their coordinates; the slot a
/// structure entry occupies is its index in [`crate::structure::Structure`].
pub type Position = Vec3;

/// Index of an entry in a [`crate::structure::Structure`].
pub type ParticleId = usize;

/// Where unused instance slots are parked so they fall outside any
/// sensible view frustum.
pub const SENTINEL: Position = Vec3::splat(999.0);
