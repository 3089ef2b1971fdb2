//! # Effect Manager
//!
//! Owns one fixed-capacity pool per effect kind and drives every instance
//! through its lifecycle once per simulation tick.
//!
//! ## Rules
//! - Single-threaded: spawn, tick and render-collection all happen on the
//!   main update/render passes. Other threads go through
//!   [`EffectRequestQueue`](crate::integration::EffectRequestQueue).
//! - A full pool evicts its oldest instance; spawning never fails while the
//!   pool has any capacity.
//! - Stale handles are harmless: every lookup checks the slot generation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use spectra_core::{Color, EffectPool, EntityId, Transform, TransformSource};
use spectra_shared::{FxConfig, StyleDescriptor, StyleTable, ThemeId};

use super::aura::Aura;
use super::behavior::{EffectBehavior, RenderView, SpawnContext};
use super::death::DeathSpectacle;
use super::fog::FogCloud;
use super::lifecycle::{EffectCore, Phase};
use super::spawn::{EffectHandle, EffectKind, SpawnRequest};
use super::strokes::StrokeBuffer;
use super::telegraph::Telegraph;
use super::trail::Trail;

/// Read-only view of one live instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// Handle of the instance.
    pub handle: EffectHandle,
    /// Simulated (or attached-entity) transform at the requested sub-tick.
    pub transform: Transform,
    /// Opacity at the requested sub-tick.
    pub opacity: f32,
    /// Theme primary color with opacity applied.
    pub color: Color,
    /// Lifecycle phase after the last tick.
    pub phase: Phase,
    /// Ticks lived.
    pub elapsed: u32,
    /// Lifetime in ticks.
    pub max_lifetime: u32,
    /// Size multiplier.
    pub scale: f32,
    /// Theme.
    pub theme: ThemeId,
}

/// Counters since construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManagerStats {
    /// Instances spawned.
    pub spawned: u64,
    /// Instances evicted to make room.
    pub evicted: u64,
    /// Instances released at the end of their lifetime.
    pub released: u64,
    /// Force-expire calls that hit a live instance.
    pub force_expired: u64,
    /// Spawns dropped because the pool has zero capacity.
    pub rejected: u64,
    /// Spawns whose theme id was unknown and fell back to the default.
    pub theme_fallbacks: u64,
    /// Ticks run.
    pub ticks: u64,
}

/// What one tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Instances released this tick.
    pub released: usize,
    /// Instances still alive.
    pub active: usize,
}

/// Pools and lifecycle driver for every timed effect.
///
/// # Example
///
/// ```rust
/// use spectra_core::Vec2;
/// use spectra_rendering::effects::{EffectKind, EffectManager, SpawnRequest};
///
/// let mut fx = EffectManager::with_defaults();
/// let handle = fx.spawn(SpawnRequest::new(EffectKind::Death, Vec2::new(5.0, 5.0)).with_lifetime(2));
/// assert!(fx.is_alive(handle));
///
/// fx.tick();
/// fx.tick();
/// assert!(!fx.is_alive(handle));
/// ```
pub struct EffectManager {
    config: FxConfig,
    styles: StyleTable,
    fog: EffectPool<FogCloud>,
    telegraphs: EffectPool<Telegraph>,
    auras: EffectPool<Aura>,
    deaths: EffectPool<DeathSpectacle>,
    trails: EffectPool<Trail>,
    tick: u64,
    rng: ChaCha8Rng,
    stats: ManagerStats,
}

/// Runs `$body` with `$pool` bound to the pool for `$kind`.
macro_rules! with_pool {
    ($self:expr, $kind:expr, |$pool:ident| $body:expr) => {
        match $kind {
            EffectKind::Fog => {
                let $pool = &$self.fog;
                $body
            }
            EffectKind::Telegraph => {
                let $pool = &$self.telegraphs;
                $body
            }
            EffectKind::Aura => {
                let $pool = &$self.auras;
                $body
            }
            EffectKind::Death => {
                let $pool = &$self.deaths;
                $body
            }
            EffectKind::Trail => {
                let $pool = &$self.trails;
                $body
            }
        }
    };
}

impl EffectManager {
    /// Manager with pools sized from `config` and themes from `styles`.
    #[must_use]
    pub fn new(config: FxConfig, styles: StyleTable) -> Self {
        let pools = config.pools;
        tracing::info!(
            capacity = pools.total(),
            themes = styles.len(),
            "effect pools allocated"
        );
        Self {
            config,
            styles,
            fog: EffectPool::new(pools.fog),
            telegraphs: EffectPool::new(pools.telegraph),
            auras: EffectPool::new(pools.aura),
            deaths: EffectPool::new(pools.death),
            trails: EffectPool::new(pools.trail),
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            stats: ManagerStats::default(),
        }
    }

    /// Manager with default configuration and only the default theme.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FxConfig::default(), StyleTable::new())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    /// Theme table in use.
    #[must_use]
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Simulation ticks run so far.
    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Counters since construction.
    #[must_use]
    pub fn stats(&self) -> ManagerStats {
        self.stats
    }

    /// Starts an effect. A full pool evicts its oldest instance first.
    ///
    /// Returns [`EffectHandle::NULL`] only if the kind's pool has zero
    /// capacity.
    pub fn spawn(&mut self, request: SpawnRequest) -> EffectHandle {
        if !self.styles.contains(request.theme) {
            self.stats.theme_fallbacks += 1;
            tracing::debug!(theme = request.theme.0, "unknown theme, using default");
        }
        let style = *self.styles.resolve(request.theme);

        let mut ctx = SpawnCall {
            request: &request,
            style: &style,
            config: &self.config,
            rng: &mut self.rng,
            stats: &mut self.stats,
            tick: self.tick,
        };
        match request.kind {
            EffectKind::Fog => ctx.spawn_into(&mut self.fog),
            EffectKind::Telegraph => ctx.spawn_into(&mut self.telegraphs),
            EffectKind::Aura => ctx.spawn_into(&mut self.auras),
            EffectKind::Death => ctx.spawn_into(&mut self.deaths),
            EffectKind::Trail => ctx.spawn_into(&mut self.trails),
        }
    }

    /// Ends an effect early; it is released on the next tick.
    ///
    /// Returns false for stale or null handles.
    pub fn force_expire(&mut self, handle: EffectHandle) -> bool {
        let hit = match handle.kind {
            EffectKind::Fog => expire_in(&mut self.fog, handle),
            EffectKind::Telegraph => expire_in(&mut self.telegraphs, handle),
            EffectKind::Aura => expire_in(&mut self.auras, handle),
            EffectKind::Death => expire_in(&mut self.deaths, handle),
            EffectKind::Trail => expire_in(&mut self.trails, handle),
        };
        if hit {
            self.stats.force_expired += 1;
        }
        hit
    }

    /// Force-expires every effect attached to `entity`. Returns how many.
    pub fn force_expire_attached(&mut self, entity: EntityId) -> usize {
        let count = expire_attached(&mut self.fog, entity)
            + expire_attached(&mut self.telegraphs, entity)
            + expire_attached(&mut self.auras, entity)
            + expire_attached(&mut self.deaths, entity)
            + expire_attached(&mut self.trails, entity);
        self.stats.force_expired += count as u64;
        count
    }

    /// Records a trail's source transform for this tick.
    ///
    /// Returns false if `handle` is stale or not a trail.
    pub fn push_trail_point(&mut self, handle: EffectHandle, transform: Transform) -> bool {
        if handle.kind != EffectKind::Trail {
            return false;
        }
        match self.trails.get_mut(handle.slot) {
            Some(trail) => {
                trail.record(transform);
                true
            }
            None => false,
        }
    }

    /// Advances every instance one simulation tick and releases the ones
    /// whose lifetime ended.
    pub fn tick(&mut self) -> TickReport {
        self.tick += 1;
        self.stats.ticks += 1;

        let released = tick_pool(&mut self.fog)
            + tick_pool(&mut self.telegraphs)
            + tick_pool(&mut self.auras)
            + tick_pool(&mut self.deaths)
            + tick_pool(&mut self.trails);
        self.stats.released += released as u64;

        TickReport {
            released,
            active: self.total_active(),
        }
    }

    /// True while `handle` refers to a live instance.
    #[must_use]
    pub fn is_alive(&self, handle: EffectHandle) -> bool {
        with_pool!(self, handle.kind, |pool| pool.contains(handle.slot))
    }

    /// Lifecycle phase of a live instance.
    #[must_use]
    pub fn phase(&self, handle: EffectHandle) -> Option<Phase> {
        with_pool!(self, handle.kind, |pool| pool
            .get(handle.slot)
            .map(|e| e.core().phase))
    }

    /// Live instances of `kind`.
    #[must_use]
    pub fn active_count(&self, kind: EffectKind) -> usize {
        with_pool!(self, kind, |pool| pool.active_count())
    }

    /// Live instances of every kind.
    #[must_use]
    pub fn total_active(&self) -> usize {
        EffectKind::ALL.iter().map(|&k| self.active_count(k)).sum()
    }

    /// Handles of live `kind` instances, oldest first.
    pub fn handles(&self, kind: EffectKind) -> impl Iterator<Item = EffectHandle> + '_ {
        pool_handles(&self.fog, kind)
            .chain(pool_handles(&self.telegraphs, kind))
            .chain(pool_handles(&self.auras, kind))
            .chain(pool_handles(&self.deaths, kind))
            .chain(pool_handles(&self.trails, kind))
    }

    /// Snapshot of one live instance at `sub_tick`.
    #[must_use]
    pub fn snapshot(&self, handle: EffectHandle, sub_tick: f32) -> Option<EffectSnapshot> {
        with_pool!(self, handle.kind, |pool| pool
            .get(handle.slot)
            .map(|e| snapshot_of(e, handle, sub_tick)))
    }

    /// Snapshots of every live instance of `kind`, oldest first.
    pub fn snapshots(
        &self,
        kind: EffectKind,
        sub_tick: f32,
    ) -> impl Iterator<Item = EffectSnapshot> + '_ {
        self.handles(kind)
            .filter_map(move |handle| self.snapshot(handle, sub_tick))
    }

    /// Appends every live instance's strokes for this frame.
    ///
    /// Kinds draw back to front: fog, auras, telegraphs, trails, deaths.
    /// Within a kind, oldest first. Attached effects follow their entity
    /// while `transforms` still knows it.
    pub fn collect_strokes<T: TransformSource>(
        &self,
        sub_tick: f32,
        transforms: &T,
        out: &mut StrokeBuffer,
    ) {
        emit_pool(&self.fog, sub_tick, transforms, out);
        emit_pool(&self.auras, sub_tick, transforms, out);
        emit_pool(&self.telegraphs, sub_tick, transforms, out);
        emit_pool(&self.trails, sub_tick, transforms, out);
        emit_pool(&self.deaths, sub_tick, transforms, out);
    }

    /// Releases every instance of every kind.
    pub fn clear(&mut self) {
        self.fog.clear();
        self.telegraphs.clear();
        self.auras.clear();
        self.deaths.clear();
        self.trails.clear();
    }
}

/// Borrowed inputs for one spawn.
struct SpawnCall<'a> {
    request: &'a SpawnRequest,
    style: &'a StyleDescriptor,
    config: &'a FxConfig,
    rng: &'a mut ChaCha8Rng,
    stats: &'a mut ManagerStats,
    tick: u64,
}

impl SpawnCall<'_> {
    fn spawn_into<B: EffectBehavior>(&mut self, pool: &mut EffectPool<B>) -> EffectHandle {
        let request = self.request;
        let style = self.style;
        let config = self.config;
        let rng = &mut *self.rng;

        let acquired = pool.acquire(self.tick, |instance| {
            *instance.core_mut() = EffectCore::spawn(request, style);
            instance.on_spawn(&mut SpawnContext {
                request,
                config,
                rng,
            });
        });

        if let Some(evicted) = acquired.evicted {
            self.stats.evicted += 1;
            tracing::debug!(
                kind = B::KIND.name(),
                slot = evicted.index(),
                "pool full, evicted oldest effect"
            );
        }
        if acquired.handle.is_null() {
            self.stats.rejected += 1;
            tracing::trace!(kind = B::KIND.name(), "pool has no capacity, spawn dropped");
            return EffectHandle::NULL;
        }
        self.stats.spawned += 1;
        EffectHandle {
            kind: B::KIND,
            slot: acquired.handle,
        }
    }
}

/// Handles of `pool` if it holds `wanted`, otherwise nothing.
fn pool_handles<B: EffectBehavior>(
    pool: &EffectPool<B>,
    wanted: EffectKind,
) -> impl Iterator<Item = EffectHandle> + '_ {
    let take = if B::KIND == wanted { usize::MAX } else { 0 };
    pool.iter().take(take).map(|(slot, _)| EffectHandle {
        kind: B::KIND,
        slot,
    })
}

fn expire_in<B: EffectBehavior>(pool: &mut EffectPool<B>, handle: EffectHandle) -> bool {
    match pool.get_mut(handle.slot) {
        Some(effect) => {
            effect.core_mut().force_expire();
            true
        }
        None => false,
    }
}

fn expire_attached<B: EffectBehavior>(pool: &mut EffectPool<B>, entity: EntityId) -> usize {
    let mut count = 0;
    pool.retain_mut(|_, effect| {
        let core = effect.core_mut();
        if core.attach == Some(entity) && core.elapsed < core.max_lifetime {
            core.force_expire();
            count += 1;
        }
        true
    });
    count
}

fn tick_pool<B: EffectBehavior>(pool: &mut EffectPool<B>) -> usize {
    pool.retain_mut(|_, effect| {
        if !effect.core_mut().advance() {
            return false;
        }
        effect.on_tick();
        true
    })
}

fn render_view<B: EffectBehavior, T: TransformSource>(
    effect: &B,
    sub_tick: f32,
    transforms: &T,
) -> RenderView {
    let core = effect.core();
    let mut transform = core.transform.sample(sub_tick);
    if let Some(attached) = core.attach.and_then(|e| transforms.interpolated_transform(e)) {
        transform.position = attached.position;
    }
    RenderView {
        transform,
        sub_tick,
        ratio: core.visual_ratio(sub_tick),
        opacity: core.visual_opacity(sub_tick),
    }
}

fn emit_pool<B: EffectBehavior, T: TransformSource>(
    pool: &EffectPool<B>,
    sub_tick: f32,
    transforms: &T,
    out: &mut StrokeBuffer,
) {
    for (_, effect) in pool.iter() {
        let view = render_view(effect, sub_tick, transforms);
        if view.opacity <= 0.0 {
            continue;
        }
        effect.emit(&view, out);
    }
}

fn snapshot_of<B: EffectBehavior>(effect: &B, handle: EffectHandle, sub_tick: f32) -> EffectSnapshot {
    let core = effect.core();
    let opacity = core.visual_opacity(sub_tick);
    EffectSnapshot {
        handle,
        transform: core.transform.sample(sub_tick),
        opacity,
        color: core.style.palette.primary * opacity,
        phase: core.phase,
        elapsed: core.elapsed,
        max_lifetime: core.max_lifetime,
        scale: core.scale,
        theme: core.theme,
    }
}
