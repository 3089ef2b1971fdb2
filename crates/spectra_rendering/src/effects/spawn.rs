//! Effect kinds, handles and spawn requests.

use spectra_core::{EntityId, PoolHandle, Vec2};
use spectra_shared::ThemeId;

/// The families of timed effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EffectKind {
    /// Slow drifting atmospheric puff.
    Fog = 0,
    /// Attack warning line that grows from its origin.
    Telegraph = 1,
    /// Ring and orbiting sparkles around an entity.
    Aura = 2,
    /// Expanding rays and shockwave ring.
    Death = 3,
    /// Ribbon following a weapon or projectile.
    Trail = 4,
}

impl EffectKind {
    /// Every kind, in pool order.
    pub const ALL: [Self; 5] = [
        Self::Fog,
        Self::Telegraph,
        Self::Aura,
        Self::Death,
        Self::Trail,
    ];

    /// Lifetime in ticks when a request does not set one.
    #[must_use]
    pub const fn default_lifetime(self) -> u32 {
        match self {
            Self::Fog => 180,
            Self::Telegraph => 60,
            Self::Aura => 600,
            Self::Death => 90,
            Self::Trail => 240,
        }
    }

    /// Short lowercase name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fog => "fog",
            Self::Telegraph => "telegraph",
            Self::Aura => "aura",
            Self::Death => "death",
            Self::Trail => "trail",
        }
    }
}

/// Identifies one live effect instance.
///
/// Handles go stale when the instance is released or evicted; every
/// operation taking a handle tolerates stale ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EffectHandle {
    /// Which pool the instance lives in.
    pub kind: EffectKind,
    /// Slot within that pool.
    pub slot: PoolHandle,
}

impl EffectHandle {
    /// Handle returned when nothing was spawned.
    pub const NULL: Self = Self {
        kind: EffectKind::Fog,
        slot: PoolHandle::NULL,
    };

    /// True for [`EffectHandle::NULL`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.slot.is_null()
    }
}

impl Default for EffectHandle {
    fn default() -> Self {
        Self::NULL
    }
}

/// Ribbon shape for trails.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TrailStyle {
    /// Wide at the head, tapering to nothing (weapon swings).
    #[default]
    Swing,
    /// Soft head and tail, centered behind a projectile sprite of `size`.
    Projectile {
        /// Projectile sprite length in world units.
        size: f32,
    },
}

/// Everything needed to start an effect.
///
/// ```rust
/// use spectra_core::{EntityId, Vec2};
/// use spectra_rendering::effects::{EffectKind, SpawnRequest};
///
/// let request = SpawnRequest::new(EffectKind::Telegraph, Vec2::new(100.0, 40.0))
///     .with_rotation(1.2)
///     .with_length(320.0)
///     .attached_to(EntityId(7));
/// assert_eq!(request.max_lifetime, EffectKind::Telegraph.default_lifetime());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Effect family.
    pub kind: EffectKind,
    /// Spawn position.
    pub position: Vec2,
    /// Spawn facing in radians.
    pub rotation: f32,
    /// Initial drift in world units per tick.
    pub velocity: Vec2,
    /// Visual theme.
    pub theme: ThemeId,
    /// Lifetime in ticks (at least 1).
    pub max_lifetime: u32,
    /// Size multiplier.
    pub scale: f32,
    /// Telegraph reach in world units.
    pub length: f32,
    /// Entity to follow while rendering.
    pub attach: Option<EntityId>,
    /// Trail ribbon shape.
    pub trail_style: TrailStyle,
}

impl SpawnRequest {
    /// Request with the kind's default lifetime and the default theme.
    #[must_use]
    pub fn new(kind: EffectKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            rotation: 0.0,
            velocity: Vec2::ZERO,
            theme: ThemeId::DEFAULT,
            max_lifetime: kind.default_lifetime(),
            scale: 1.0,
            length: 200.0,
            attach: None,
            trail_style: TrailStyle::Swing,
        }
    }

    /// Sets the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: ThemeId) -> Self {
        self.theme = theme;
        self
    }

    /// Sets the lifetime in ticks.
    #[must_use]
    pub fn with_lifetime(mut self, ticks: u32) -> Self {
        self.max_lifetime = ticks;
        self
    }

    /// Sets the facing.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the initial drift.
    #[must_use]
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the size multiplier.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the telegraph reach.
    #[must_use]
    pub fn with_length(mut self, length: f32) -> Self {
        self.length = length;
        self
    }

    /// Follows `entity` while rendering.
    #[must_use]
    pub fn attached_to(mut self, entity: EntityId) -> Self {
        self.attach = Some(entity);
        self
    }

    /// Sets the trail ribbon shape.
    #[must_use]
    pub fn with_trail_style(mut self, style: TrailStyle) -> Self {
        self.trail_style = style;
        self
    }
}
