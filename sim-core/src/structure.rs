use crate::{
    symmetry::mirror_images,
    types::{ParticleId, Position},
};
/// Append-only set of particles that have stuck to the aggregate.
///
/// Holds at most `capacity` entries. Pushes past capacity are ignored.
#[derive(Debug, Clone)]
pub struct Structure {
    points: Vec<Position>,
    capacity: usize,
    dirty: bool,
}

impl Structure {
    /// A structure holding a single seed at `seed`.
    pub fn new(seed: Position, capacity: usize) -> Self {
        let mut s = Self::empty(capacity);
        s.push(seed);
        s
    }

    pub fn empty(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            capacity,
            dirty: false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.points.len() >= self.capacity
    }

    /// Slots still free before the structure is full.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.points.len())
    }

    pub fn positions(&self) -> &[Position] {
        &self.points
    }

    /// Appends one entry, returning its id, or `None` when full.
    pub fn push(&mut self, pos: Position) -> Option<ParticleId> {
        if self.is_full() {
            return None;
        }
        let id = self.points.len();
        self.points.push(pos);
        self.dirty = true;
        Some(id)
    }

    /// Appends `pos` and its seven mirror images, in order, until full.
    ///
    /// A batch cut short by capacity is kept as-is, so a full structure may
    /// hold a point without all of its mirrors.
    ///
    /// ### Returns
    /// The number of entries actually appended (0..=8).
    pub fn append_symmetric(&mut self, pos: Position) -> usize {
        let mut added = 0;
        for img in mirror_images(pos) {
            if self.push(img).is_none() {
                break;
            }
            added += 1;
        }
        added
    }

    /// Returns `true` if `pos` is strictly closer than `contact` to any entry.
    ///
    /// Linear scan, stops at the first hit.
    pub fn collides(&self, pos: Position, contact: f32) -> bool {
        let r2 = contact * contact;
        self.points.iter().any(|p| (*p - pos).length_squared() < r2)
    }

    /// Largest distance of any entry from the origin.
    pub fn extent(&self) -> f32 {
        self.points
            .iter()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }

    /// Whether entries were added since the last [`Structure::take_dirty`].
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears and returns the stale flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
