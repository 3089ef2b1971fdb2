//! # Effect Pool
//!
//! Fixed-capacity arena with a free-index stack and a spawn-ordered active
//! list.
//!
//! ## Eviction
//!
//! When every slot is taken, `acquire` evicts the **oldest** active instance
//! (smallest spawn tick) and reuses its slot. Freshly triggered effects are
//! more important to the player than long-running ambient ones, so the newest
//! spawn always wins.
//!
//! ## Handles
//!
//! Handles carry a generation counter. Releasing or evicting a slot bumps its
//! generation, so a stale handle resolves to `None` instead of aliasing the
//! slot's next occupant.

use std::collections::VecDeque;

/// Handle to an instance stored in an [`EffectPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    /// Index into the pool.
    index: u32,
    /// Generation of the slot when the handle was issued.
    generation: u32,
}

impl PoolHandle {
    /// Sentinel handle that never resolves.
    pub const NULL: Self = Self {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Returns true for the sentinel handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.index == u32::MAX
    }

    /// Slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Slot generation at issue time.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl Default for PoolHandle {
    fn default() -> Self {
        Self::NULL
    }
}

/// Result of [`EffectPool::acquire`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Acquired {
    /// Handle to the new instance (`PoolHandle::NULL` if the pool has no slots).
    pub handle: PoolHandle,
    /// Handle of the instance evicted to make room, now invalid.
    pub evicted: Option<PoolHandle>,
}

/// Lifetime counters for a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances acquired.
    pub acquired: u64,
    /// Instances released normally.
    pub released: u64,
    /// Instances evicted because the pool was full.
    pub evicted: u64,
    /// Highest simultaneous active count seen.
    pub high_water: usize,
}

struct Slot<T> {
    value: T,
    generation: u32,
    spawn_tick: u64,
    active: bool,
}

impl<T: Default> Slot<T> {
    fn reset(&mut self) {
        self.value = T::default();
        self.generation = self.generation.wrapping_add(1);
        self.spawn_tick = 0;
        self.active = false;
    }
}

/// A capacity-bounded pool of reusable instances.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is owned by the effect manager and only
/// touched from the main update/render passes.
///
/// # Example
///
/// ```rust
/// use spectra_core::EffectPool;
///
/// let mut pool: EffectPool<u32> = EffectPool::new(2);
/// let a = pool.acquire(0, |v| *v = 1).handle;
/// let _b = pool.acquire(1, |v| *v = 2);
/// let c = pool.acquire(2, |v| *v = 3);
///
/// // `a` was the oldest, so it made room for `c`.
/// assert_eq!(c.evicted, Some(a));
/// assert!(pool.get(a).is_none());
/// ```
pub struct EffectPool<T> {
    /// The storage array.
    slots: Box<[Slot<T>]>,
    /// Free list - indices of available slots.
    free_list: Vec<u32>,
    /// Active indices, oldest spawn first.
    order: VecDeque<u32>,
    /// Lifetime counters.
    stats: PoolStats,
}

impl<T: Default> EffectPool<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// All memory is pre-allocated upfront. A zero-capacity pool is legal and
    /// hands out `PoolHandle::NULL` for every acquire.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let slots: Vec<Slot<T>> = (0..capacity)
            .map(|_| Slot {
                value: T::default(),
                generation: 0,
                spawn_tick: 0,
                active: false,
            })
            .collect();

        // Lowest index on top so slots fill front to back.
        let free_list: Vec<u32> = (0..capacity as u32).rev().collect();

        Self {
            slots: slots.into_boxed_slice(),
            free_list,
            order: VecDeque::with_capacity(capacity),
            stats: PoolStats::default(),
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of active instances.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.order.len()
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Returns lifetime counters.
    #[inline]
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Claims a slot, evicting the oldest active instance if necessary, and
    /// runs `init` on the freshly reset value.
    ///
    /// This is a **O(1)** operation with **zero heap allocations**.
    pub fn acquire(&mut self, spawn_tick: u64, init: impl FnOnce(&mut T)) -> Acquired {
        let mut evicted = None;

        if self.free_list.is_empty() {
            let Some(oldest) = self.order.pop_front() else {
                return Acquired {
                    handle: PoolHandle::NULL,
                    evicted: None,
                };
            };
            let slot = &mut self.slots[oldest as usize];
            evicted = Some(PoolHandle {
                index: oldest,
                generation: slot.generation,
            });
            slot.reset();
            self.free_list.push(oldest);
            self.stats.evicted += 1;
        }

        let Some(index) = self.free_list.pop() else {
            return Acquired {
                handle: PoolHandle::NULL,
                evicted,
            };
        };

        let slot = &mut self.slots[index as usize];
        slot.active = true;
        slot.spawn_tick = spawn_tick;
        init(&mut slot.value);
        let handle = PoolHandle {
            index,
            generation: slot.generation,
        };

        self.order.push_back(index);
        self.stats.acquired += 1;
        self.stats.high_water = self.stats.high_water.max(self.order.len());

        Acquired { handle, evicted }
    }

    /// Releases an instance back to the free list.
    ///
    /// Returns false if the handle is stale or null.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        if !self.contains(handle) {
            return false;
        }
        self.slots[handle.index as usize].reset();
        self.free_list.push(handle.index);
        if let Some(pos) = self.order.iter().position(|&i| i == handle.index) {
            self.order.remove(pos);
        }
        self.stats.released += 1;
        true
    }

    /// Returns true if the handle refers to a live instance.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: PoolHandle) -> bool {
        self.slots
            .get(handle.index as usize)
            .is_some_and(|slot| slot.active && slot.generation == handle.generation)
    }

    /// Gets a reference to a live instance.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        (slot.active && slot.generation == handle.generation).then_some(&slot.value)
    }

    /// Gets a mutable reference to a live instance.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.active && slot.generation == handle.generation {
            Some(&mut slot.value)
        } else {
            None
        }
    }

    /// Spawn tick of a live instance.
    #[must_use]
    pub fn spawn_tick(&self, handle: PoolHandle) -> Option<u64> {
        let slot = self.slots.get(handle.index as usize)?;
        (slot.active && slot.generation == handle.generation).then_some(slot.spawn_tick)
    }

    /// Handle of the oldest active instance (the next eviction victim).
    #[must_use]
    pub fn oldest(&self) -> Option<PoolHandle> {
        let &index = self.order.front()?;
        Some(PoolHandle {
            index,
            generation: self.slots[index as usize].generation,
        })
    }

    /// Iterates over active instances, oldest spawn first.
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.order.iter().map(move |&index| {
            let slot = &self.slots[index as usize];
            (
                PoolHandle {
                    index,
                    generation: slot.generation,
                },
                &slot.value,
            )
        })
    }

    /// Visits every active instance mutably and releases those for which
    /// `keep` returns false. Returns the number released.
    ///
    /// Visit order is slot order, not spawn order.
    pub fn retain_mut(&mut self, mut keep: impl FnMut(PoolHandle, &mut T) -> bool) -> usize {
        let mut released = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.active {
                continue;
            }
            let handle = PoolHandle {
                index: index as u32,
                generation: slot.generation,
            };
            if !keep(handle, &mut slot.value) {
                slot.reset();
                self.free_list.push(index as u32);
                released += 1;
            }
        }
        if released > 0 {
            let slots = &self.slots;
            self.order.retain(|&i| slots[i as usize].active);
            self.stats.released += released as u64;
        }
        released
    }

    /// Releases every instance.
    ///
    /// This is a **zero-heap-allocation** operation - memory is not freed.
    pub fn clear(&mut self) {
        for &index in &self.order {
            self.slots[index as usize].reset();
        }
        self.order.clear();
        self.free_list.clear();
        self.free_list.extend((0..self.slots.len() as u32).rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_acquire_release() {
        let mut pool: EffectPool<u32> = EffectPool::new(10);

        let h1 = pool.acquire(0, |v| *v = 42).handle;
        assert_eq!(pool.get(h1), Some(&42));
        assert_eq!(pool.active_count(), 1);

        assert!(pool.release(h1));
        assert_eq!(pool.active_count(), 0);
        assert!(pool.get(h1).is_none());
        assert!(!pool.release(h1), "double release must be rejected");
    }

    #[test]
    fn test_released_value_is_reset() {
        let mut pool: EffectPool<u32> = EffectPool::new(1);

        let h1 = pool.acquire(0, |v| *v = 7).handle;
        pool.release(h1);

        let h2 = pool.acquire(1, |v| assert_eq!(*v, 0)).handle;
        assert_eq!(h1.index(), h2.index()); // Same slot reused
        assert_ne!(h1.generation(), h2.generation());
    }

    #[test]
    fn test_full_pool_evicts_oldest() {
        let mut pool: EffectPool<char> = EffectPool::new(3);

        let a = pool.acquire(0, |v| *v = 'a').handle;
        let b = pool.acquire(1, |v| *v = 'b').handle;
        let c = pool.acquire(2, |v| *v = 'c').handle;
        let d = pool.acquire(3, |v| *v = 'd');

        assert_eq!(d.evicted, Some(a));
        assert_eq!(pool.active_count(), 3);
        let live: Vec<char> = pool.iter().map(|(_, v)| *v).collect();
        assert_eq!(live, vec!['b', 'c', 'd']);
        assert!(pool.contains(b) && pool.contains(c) && pool.contains(d.handle));
        assert_eq!(pool.stats().evicted, 1);
    }

    #[test]
    fn test_zero_capacity_returns_null() {
        let mut pool: EffectPool<u8> = EffectPool::new(0);
        let acquired = pool.acquire(0, |_| {});
        assert!(acquired.handle.is_null());
        assert!(acquired.evicted.is_none());
        assert!(pool.get(PoolHandle::NULL).is_none());
    }

    #[test]
    fn test_retain_mut_releases_and_keeps_order() {
        let mut pool: EffectPool<u32> = EffectPool::new(4);
        for i in 0..4 {
            pool.acquire(u64::from(i), |v| *v = i);
        }

        let released = pool.retain_mut(|_, v| *v % 2 == 1);
        assert_eq!(released, 2);
        let live: Vec<u32> = pool.iter().map(|(_, v)| *v).collect();
        assert_eq!(live, vec![1, 3]);
        assert_eq!(pool.free_count(), 2);
    }

    #[test]
    fn test_oldest_tracks_spawn_order_after_release() {
        let mut pool: EffectPool<u32> = EffectPool::new(3);
        let a = pool.acquire(0, |_| {}).handle;
        let b = pool.acquire(1, |_| {}).handle;
        pool.release(a);
        assert_eq!(pool.oldest(), Some(b));
        assert_eq!(pool.spawn_tick(b), Some(1));
    }
}
