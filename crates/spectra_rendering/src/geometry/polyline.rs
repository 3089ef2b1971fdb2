//! Anchor points and the fixed-size trail history that stores them.

use spectra_core::Vec2;

/// Hard upper bound on points per trail history.
pub const MAX_TRAIL_POINTS: usize = 64;

/// One recorded sample of a moving source.
///
/// Immutable once recorded, except for `age`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnchorPoint {
    /// World position.
    pub position: Vec2,
    /// Source facing at record time, in radians.
    pub rotation: f32,
    /// Normalized age: 0 when recorded, evicted at 1.
    pub age: f32,
}

impl AnchorPoint {
    const EMPTY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        age: 0.0,
    };
}

/// Returns false for points the ribbon builder must skip.
///
/// `(0, 0)` is the "unset" sentinel of position-history buffers, so it is
/// filtered along with non-finite coordinates.
#[inline]
#[must_use]
pub fn is_valid_point(point: Vec2) -> bool {
    point.is_finite() && point != Vec2::ZERO
}

/// Ring buffer of the most recent anchor points, newest first.
///
/// Storage is inline so trails can sit in a pool and be reset without
/// touching the heap.
#[derive(Clone, Debug)]
pub struct TrailHistory {
    points: [AnchorPoint; MAX_TRAIL_POINTS],
    capacity: usize,
    /// Slot of the newest point.
    head: usize,
    len: usize,
}

impl Default for TrailHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_TRAIL_POINTS)
    }
}

impl TrailHistory {
    /// History keeping at most `capacity` points, clamped to
    /// `2..=MAX_TRAIL_POINTS`.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: [AnchorPoint::EMPTY; MAX_TRAIL_POINTS],
            capacity: capacity.clamp(2, MAX_TRAIL_POINTS),
            head: 0,
            len: 0,
        }
    }

    /// Maximum points kept.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Points currently kept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no points are kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Records a new head point. When full, the oldest point is overwritten.
    pub fn push(&mut self, position: Vec2, rotation: f32) {
        self.head = (self.head + self.capacity - 1) % self.capacity;
        self.points[self.head] = AnchorPoint {
            position,
            rotation,
            age: 0.0,
        };
        self.len = (self.len + 1).min(self.capacity);
    }

    /// Point `index` steps back from the head.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AnchorPoint> {
        (index < self.len).then(|| &self.points[(self.head + index) % self.capacity])
    }

    /// Newest point.
    #[must_use]
    pub fn head(&self) -> Option<&AnchorPoint> {
        self.get(0)
    }

    /// Points from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &AnchorPoint> + '_ {
        (0..self.len).map(move |i| &self.points[(self.head + i) % self.capacity])
    }

    /// Ages every point by `step` and drops points that reached age 1.
    ///
    /// Returns the number of points dropped.
    pub fn advance_age(&mut self, step: f32) -> usize {
        let step = if step.is_finite() { step.max(0.0) } else { 1.0 };
        for i in 0..self.len {
            let slot = (self.head + i) % self.capacity;
            let point = &mut self.points[slot];
            point.age = (point.age + step).min(1.0);
        }

        // Ages grow towards the tail, so expiry only ever trims the end.
        let before = self.len;
        while self.len > 0 {
            let tail = (self.head + self.len - 1) % self.capacity;
            if self.points[tail].age < 1.0 {
                break;
            }
            self.len -= 1;
        }
        before - self.len
    }

    /// Appends positions newest first to `out`, skipping degenerate points.
    pub fn write_positions(&self, out: &mut Vec<Vec2>) {
        out.extend(
            self.iter()
                .map(|p| p.position)
                .filter(|p| is_valid_point(*p)),
        );
    }

    /// Forgets every point.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
