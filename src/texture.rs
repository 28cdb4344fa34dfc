//! Opaque texture references.
//!
//! Bound texture properties do not own texture resources; they hold an opaque
//! reference to whatever the graphics backend considers a texture. Engine-side
//! texture handles unwrap themselves into that reference through
//! [`TextureSource`] at write time, so the effect never depends on the
//! engine's asset model.

/// Opaque reference to a backend texture resource.
///
/// Cheap to clone and compare; the effect stores it but never dereferences
/// it. Lifetime of the underlying resource is owned elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef(u64);

impl TextureRef {
    /// Wrap a raw backend identifier.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw backend identifier.
    #[must_use]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Unwrap capability for engine texture handles.
///
/// Implemented by whatever handle type the engine hands to
/// [`Effect::set_property`](crate::Effect::set_property); the effect stores
/// the returned [`TextureRef`], not the handle itself.
pub trait TextureSource {
    /// The backend resource this handle currently resolves to.
    fn backend_texture(&self) -> TextureRef;
}
