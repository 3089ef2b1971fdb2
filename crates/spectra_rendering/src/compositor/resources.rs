//! # Glow Texture Cache
//!
//! The radial glow texture is created lazily, once, on the render thread.
//! The update path may ask for it from anywhere; it never creates GPU
//! resources itself. Until the texture exists, ribbons draw with the
//! flat-color material.

use parking_lot::Mutex;
use std::thread::ThreadId;

use super::draw::Material;

/// Opaque handle to a host-owned texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Host renderer hook that creates GPU textures.
pub trait TextureProvider {
    /// Creates the glow texture. `None` means it could not be created.
    fn create_glow_texture(&mut self) -> Option<TextureHandle>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GlowState {
    /// Nobody asked yet.
    Idle,
    /// The update path asked; the render thread will create it.
    Requested,
    Ready(TextureHandle),
    /// Creation failed; stays flat until invalidated.
    Unavailable,
}

/// Lazily created, render-thread-owned glow texture.
///
/// # Thread Safety
///
/// `request` and `get` are safe from any thread. Creation only happens in
/// [`GlowTextureCache::ensure_initialized`] on the thread the cache was
/// bound to.
#[derive(Debug)]
pub struct GlowTextureCache {
    state: Mutex<GlowState>,
    render_thread: ThreadId,
}

impl GlowTextureCache {
    /// Cache bound to the calling thread as the render thread.
    #[must_use]
    pub fn new() -> Self {
        Self::for_render_thread(std::thread::current().id())
    }

    /// Cache bound to `render_thread`.
    #[must_use]
    pub fn for_render_thread(render_thread: ThreadId) -> Self {
        Self {
            state: Mutex::new(GlowState::Idle),
            render_thread,
        }
    }

    /// Marks the texture as wanted. Cheap; callable every frame from any thread.
    pub fn request(&self) {
        let mut state = self.state.lock();
        if *state == GlowState::Idle {
            *state = GlowState::Requested;
        }
    }

    /// True once something asked for the texture.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        !matches!(*self.state.lock(), GlowState::Idle)
    }

    /// Creates the texture if needed and returns it.
    ///
    /// Idempotent and safe to call every frame. Off the render thread it
    /// only reports what already exists.
    pub fn ensure_initialized<P: TextureProvider>(&self, provider: &mut P) -> Option<TextureHandle> {
        let mut state = self.state.lock();
        match *state {
            GlowState::Ready(handle) => Some(handle),
            GlowState::Unavailable => None,
            GlowState::Idle | GlowState::Requested => {
                if std::thread::current().id() != self.render_thread {
                    tracing::warn!("glow texture creation attempted off the render thread");
                    return None;
                }
                if let Some(handle) = provider.create_glow_texture() {
                    tracing::info!(texture = handle.0, "glow texture created");
                    *state = GlowState::Ready(handle);
                    Some(handle)
                } else {
                    tracing::warn!("glow texture unavailable, using flat-color ribbons");
                    *state = GlowState::Unavailable;
                    None
                }
            }
        }
    }

    /// The texture, if it exists.
    #[must_use]
    pub fn get(&self) -> Option<TextureHandle> {
        match *self.state.lock() {
            GlowState::Ready(handle) => Some(handle),
            _ => None,
        }
    }

    /// Material ribbons should use right now.
    #[must_use]
    pub fn material(&self) -> Material {
        self.get().map_or(Material::FlatColor, Material::Textured)
    }

    /// Forgets the texture (device loss, resize). The next
    /// `ensure_initialized` on the render thread recreates it.
    pub fn invalidate(&self) {
        *self.state.lock() = GlowState::Requested;
    }
}

impl Default for GlowTextureCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingProvider {
        created: u32,
        fail: bool,
    }

    impl TextureProvider for CountingProvider {
        fn create_glow_texture(&mut self) -> Option<TextureHandle> {
            self.created += 1;
            (!self.fail).then_some(TextureHandle(42))
        }
    }

    #[test]
    fn test_created_once() {
        let cache = GlowTextureCache::new();
        let mut provider = CountingProvider {
            created: 0,
            fail: false,
        };
        assert_eq!(cache.material(), Material::FlatColor);
        for _ in 0..5 {
            assert_eq!(cache.ensure_initialized(&mut provider), Some(TextureHandle(42)));
        }
        assert_eq!(provider.created, 1);
        assert_eq!(cache.material(), Material::Textured(TextureHandle(42)));
    }

    #[test]
    fn test_failure_falls_back_to_flat() {
        let cache = GlowTextureCache::new();
        let mut provider = CountingProvider {
            created: 0,
            fail: true,
        };
        assert_eq!(cache.ensure_initialized(&mut provider), None);
        assert_eq!(cache.ensure_initialized(&mut provider), None);
        assert_eq!(provider.created, 1);
        assert_eq!(cache.material(), Material::FlatColor);

        cache.invalidate();
        provider.fail = false;
        assert_eq!(cache.ensure_initialized(&mut provider), Some(TextureHandle(42)));
    }

    #[test]
    fn test_off_thread_never_creates() {
        let cache = GlowTextureCache::new();
        std::thread::scope(|scope| {
            scope.spawn(|| {
                cache.request();
                let mut provider = CountingProvider {
                    created: 0,
                    fail: false,
                };
                assert_eq!(cache.ensure_initialized(&mut provider), None);
                assert_eq!(provider.created, 0);
            });
        });
        assert!(cache.is_requested());
        assert!(cache.get().is_none());
    }
}
