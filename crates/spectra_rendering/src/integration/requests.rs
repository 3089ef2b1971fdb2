//! Effect Request Queue - spawns and expiries from other threads
//!
//! Gameplay, networking and audio threads never touch the effect pools.
//! They post requests here; the main update pass applies them at the start
//! of its tick.
//!
//! ## Flow
//!
//! ```text
//! Gameplay thread ──► EffectRequestSender ──┐
//! Network thread  ──► EffectRequestSender ──┼──► EffectRequestQueue ──► EffectManager::apply_requests
//! Audio thread    ──► EffectRequestSender ──┘        (bounded)              (main thread, per tick)
//! ```
//!
//! The queue is bounded. When it is full, new requests are dropped and
//! counted; a missing spark is better than a stalled gameplay thread.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use spectra_core::EntityId;
use spectra_shared::FxConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::effects::{EffectHandle, EffectManager, SpawnRequest};

/// A change to apply to the effect manager.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectRequest {
    /// Start an effect. Fire-and-forget: no handle comes back.
    Spawn(SpawnRequest),
    /// End one effect early.
    ForceExpire(EffectHandle),
    /// End every effect attached to an entity (the entity died).
    ExpireAttached(EntityId),
}

/// Receiving side, owned by the main thread.
pub struct EffectRequestQueue {
    sender: Sender<EffectRequest>,
    receiver: Receiver<EffectRequest>,
    capacity: usize,
    dropped: Arc<AtomicU64>,
}

/// Cloneable posting side for other threads.
#[derive(Clone)]
pub struct EffectRequestSender {
    inner: Sender<EffectRequest>,
    dropped: Arc<AtomicU64>,
}

impl EffectRequestQueue {
    /// Queue holding at most `capacity` pending requests.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Queue sized from `config.request_queue_capacity`.
    #[must_use]
    pub fn from_config(config: &FxConfig) -> Self {
        Self::new(config.request_queue_capacity)
    }

    /// A new posting handle.
    #[must_use]
    pub fn sender(&self) -> EffectRequestSender {
        EffectRequestSender {
            inner: self.sender.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// Maximum pending requests.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pending requests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Requests dropped because the queue was full, since the last call.
    pub fn take_dropped(&self) -> u64 {
        self.dropped.swap(0, Ordering::Relaxed)
    }

    /// Pending requests, at most one queue's worth so producers cannot
    /// keep the main thread here forever.
    pub fn drain(&self) -> impl Iterator<Item = EffectRequest> + '_ {
        self.receiver.try_iter().take(self.capacity)
    }
}

impl EffectRequestSender {
    /// Posts a request. Returns false if it was dropped.
    pub fn send(&self, request: EffectRequest) -> bool {
        match self.inner.try_send(request) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::trace!("effect request queue full, request dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Posts a spawn.
    pub fn spawn(&self, request: SpawnRequest) -> bool {
        self.send(EffectRequest::Spawn(request))
    }

    /// Posts a force-expire.
    pub fn force_expire(&self, handle: EffectHandle) -> bool {
        self.send(EffectRequest::ForceExpire(handle))
    }

    /// Posts an expire-everything-attached-to-`entity`.
    pub fn expire_attached(&self, entity: EntityId) -> bool {
        self.send(EffectRequest::ExpireAttached(entity))
    }
}

impl EffectManager {
    /// Applies pending cross-thread requests. Returns how many were applied.
    ///
    /// Call once per tick, before [`EffectManager::tick`].
    pub fn apply_requests(&mut self, queue: &EffectRequestQueue) -> usize {
        let mut applied = 0;
        for request in queue.drain() {
            match request {
                EffectRequest::Spawn(spawn) => {
                    self.spawn(spawn);
                }
                EffectRequest::ForceExpire(handle) => {
                    self.force_expire(handle);
                }
                EffectRequest::ExpireAttached(entity) => {
                    self.force_expire_attached(entity);
                }
            }
            applied += 1;
        }

        let dropped = queue.take_dropped();
        if dropped > 0 {
            tracing::debug!(dropped, "effect requests dropped, queue was full");
        }
        applied
    }
}
