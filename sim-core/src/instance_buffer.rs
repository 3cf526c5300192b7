use crate::types::{Position, SENTINEL};

/// Fixed-size arena of render instance positions.
///
/// The buffer always holds exactly `capacity` slots. The first
/// [`InstanceBuffer::live_count`] slots carry real particle positions,
/// every other slot is parked at [`SENTINEL`] so the renderer can draw the
/// whole arena without knowing which entries are in use.
///
/// Nothing is reallocated after construction; a sync only overwrites slots.
#[derive(Debug, Clone)]
pub struct InstanceBuffer {
    /// Position for each instance slot.
    slots: Vec<Position>,
    /// Number of leading slots in use.
    live: usize,
    /// Set on every sync, cleared by the renderer once it has uploaded.
    needs_update: bool,
}

impl InstanceBuffer {
    /// Creates a buffer of `capacity` slots, all parked at [`SENTINEL`].
    ///
    /// ### Parameters
    /// - `capacity` - Number of drawable instances, normally `max_particles`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![SENTINEL; capacity],
            live: 0,
            needs_update: true,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of leading slots holding real positions.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// All slots, live ones first.
    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.slots
    }

    /// Only the slots holding real positions.
    #[inline]
    pub fn live_positions(&self) -> &[Position] {
        &self.slots[..self.live]
    }

    /// Rewrites the buffer from the given position groups, in order.
    ///
    /// Groups are written back to back; anything past capacity is dropped.
    /// Slots that were live before but are not written now go back to
    /// [`SENTINEL`].
    ///
    /// ### Parameters
    /// - `groups` - Position slices to lay out, e.g. structure then walkers.
    pub fn sync(&mut self, groups: &[&[Position]]) {
        let cap = self.slots.len();
        let mut n = 0;
        for group in groups {
            let take = group.len().min(cap - n);
            self.slots[n..n + take].copy_from_slice(&group[..take]);
            n += take;
            if n == cap {
                break;
            }
        }

        // Only slots that were live last time can hold stale data.
        if n < self.live {
            self.slots[n..self.live].fill(SENTINEL);
        }
        self.live = n;
        self.needs_update = true;
    }

    /// Parks every slot at [`SENTINEL`].
    pub fn clear(&mut self) {
        self.slots.fill(SENTINEL);
        self.live = 0;
        self.needs_update = true;
    }

    /// Returns `true` if the renderer has not picked up the last sync.
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Marks the current contents as uploaded and returns the previous flag.
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::take(&mut self.needs_update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn with_capacity_parks_every_slot() {
        let buf = InstanceBuffer::with_capacity(5);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.live_count(), 0);
        assert!(buf.positions().iter().all(|p| *p == SENTINEL));
    }

    #[test]
    fn sync_lays_out_groups_in_order() {
        let mut buf = InstanceBuffer::with_capacity(6);
        let structure = [Vec3::ZERO, Vec3::X];
        let walkers = [Vec3::Y, Vec3::Z];

        buf.sync(&[&structure, &walkers]);

        assert_eq!(buf.live_count(), 4);
        assert_eq!(buf.live_positions(), &[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z]);
        assert_eq!(buf.positions()[4], SENTINEL);
        assert_eq!(buf.positions()[5], SENTINEL);
    }

    #[test]
    fn sync_truncates_past_capacity() {
        let mut buf = InstanceBuffer::with_capacity(3);
        let structure = [Vec3::ZERO, Vec3::X];
        let walkers = [Vec3::Y, Vec3::Z];

        buf.sync(&[&structure, &walkers]);

        assert_eq!(buf.live_count(), 3);
        assert_eq!(buf.positions(), &[Vec3::ZERO, Vec3::X, Vec3::Y]);
    }

    #[test]
    fn shrinking_sync_parks_stale_slots() {
        let mut buf = InstanceBuffer::with_capacity(4);
        buf.sync(&[&[Vec3::ONE, Vec3::ONE, Vec3::ONE]]);
        buf.sync(&[&[Vec3::X]]);

        assert_eq!(buf.live_count(), 1);
        assert_eq!(buf.positions(), &[Vec3::X, SENTINEL, SENTINEL, SENTINEL]);
    }

    #[test]
    fn needs_update_is_set_by_sync_and_taken_once() {
        let mut buf = InstanceBuffer::with_capacity(2);
        assert!(buf.take_needs_update());
        assert!(!buf.needs_update());

        buf.sync(&[&[Vec3::X]]);
        assert!(buf.take_needs_update());
        assert!(!buf.take_needs_update());
    }

    #[test]
    fn clear_parks_everything() {
        let mut buf = InstanceBuffer::with_capacity(2);
        buf.sync(&[&[Vec3::X, Vec3::Y]]);
        buf.clear();
        assert_eq!(buf.live_count(), 0);
        assert!(buf.positions().iter().all(|p| *p == SENTINEL));
    }

    #[test]
    fn zero_capacity_buffer_accepts_sync() {
        let mut buf = InstanceBuffer::with_capacity(0);
        buf.sync(&[&[Vec3::X]]);
        assert_eq!(buf.live_count(), 0);
    }
}
