//! The resolved effect façade.
//!
//! An [`Effect`] is the long-lived object a material binds each frame. It
//! owns the three tables produced by resolution — bound properties, bound
//! defines, capability dependencies — plus the technique list, and exposes
//! the mutation surface over them.
//!
//! Runtime misuse (unknown names, length-mismatched writes, shape mismatches)
//! is never an error or a panic: the write is dropped and a warning is
//! logged. This keeps per-frame parameter updates total.
//!
//! An optional [`NativeMirror`] observer can be attached to shadow every
//! local mutation into an out-of-process backend. It is fire-and-forget and
//! the local tables stay authoritative.

use rustc_hash::FxHashMap;

use crate::program::{Dependency, StageRegistry};
use crate::technique::Technique;
use crate::texture::TextureSource;
use crate::value::{DefineValue, UniformType, UniformValue};

/// A resolved property: declared type plus current value, keyed by uniform
/// name in the effect's property table.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundProperty {
    pub ty: UniformType,
    pub value: UniformValue,
}

/// In-place extraction capability for engine math types.
///
/// Values implementing this write their components straight into the bound
/// buffer, so a per-frame `set_property` never allocates.
pub trait WriteFloats {
    /// Number of floats this value produces.
    fn float_len(&self) -> usize;
    /// Write the components into `out`, whose length equals [`float_len`].
    ///
    /// [`float_len`]: WriteFloats::float_len
    fn write_floats(&self, out: &mut [f32]);
}

/// A property write, tagged by shape.
///
/// Scalars and float slices convert with `.into()`; texture handles and
/// in-place writers are passed through the explicit variants.
#[derive(Clone, Copy)]
pub enum PropertyInput<'a> {
    Scalar(f32),
    Floats(&'a [f32]),
    Write(&'a dyn WriteFloats),
    Texture(&'a dyn TextureSource),
}

impl From<f32> for PropertyInput<'_> {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl<'a> From<&'a [f32]> for PropertyInput<'a> {
    fn from(v: &'a [f32]) -> Self {
        Self::Floats(v)
    }
}

impl<'a, const N: usize> From<&'a [f32; N]> for PropertyInput<'a> {
    fn from(v: &'a [f32; N]) -> Self {
        Self::Floats(v)
    }
}

impl<'a> From<&'a Vec<f32>> for PropertyInput<'a> {
    fn from(v: &'a Vec<f32>) -> Self {
        Self::Floats(v)
    }
}

/// Shadow-state observer for an out-of-process backend.
///
/// Notified after every local mutation; never consulted on read. All hooks
/// are fire-and-forget: there is no acknowledgment and no rollback, and the
/// effect behaves identically whether or not a mirror is attached.
pub trait NativeMirror {
    /// Full-table snapshot, sent once when the mirror is attached.
    fn init(
        &mut self,
        properties: &FxHashMap<String, BoundProperty>,
        defines: &FxHashMap<String, DefineValue>,
    );
    fn clear(&mut self);
    fn set_property(&mut self, name: &str, value: &UniformValue);
    fn define(&mut self, name: &str, value: DefineValue);
    fn update_hash(&mut self, hash: u32);
}

/// A resolved, runtime-bindable shader configuration.
pub struct Effect {
    name: String,
    techniques: Vec<Technique>,
    properties: FxHashMap<String, BoundProperty>,
    defines: FxHashMap<String, DefineValue>,
    dependencies: Vec<Dependency>,
    mirror: Option<Box<dyn NativeMirror>>,
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("name", &self.name)
            .field("techniques", &self.techniques)
            .field("properties", &self.properties)
            .field("defines", &self.defines)
            .field("dependencies", &self.dependencies)
            .field("mirror", &self.mirror.is_some())
            .finish()
    }
}

impl Effect {
    pub(crate) fn new(
        name: String,
        techniques: Vec<Technique>,
        properties: FxHashMap<String, BoundProperty>,
        defines: FxHashMap<String, DefineValue>,
        dependencies: Vec<Dependency>,
    ) -> Self {
        Self {
            name,
            techniques,
            properties,
            defines,
            dependencies,
            mirror: None,
        }
    }

    /// The authored effect name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All techniques, in declaration order.
    #[must_use]
    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    /// The append-only dependency list (one entry per involved-program
    /// extension, duplicates preserved).
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Attach a native mirror and send it the current tables.
    pub fn attach_mirror(&mut self, mut mirror: Box<dyn NativeMirror>) {
        mirror.init(&self.properties, &self.defines);
        self.mirror = Some(mirror);
    }

    // ─── Technique lookup ────────────────────────────────────────────────────

    /// The first technique in declaration order, if any.
    #[must_use]
    pub fn default_technique(&self) -> Option<&Technique> {
        self.techniques.first()
    }

    /// The first technique whose stage mask intersects the named stage.
    /// Unknown stage names and empty intersections both yield `None`.
    #[must_use]
    pub fn technique_for_stage(&self, stage: &str, stages: &StageRegistry) -> Option<&Technique> {
        let stage_id = stages.stage_id(stage)?;
        self.techniques.iter().find(|t| t.stage_ids() & stage_id != 0)
    }

    // ─── Properties ──────────────────────────────────────────────────────────

    /// Current value of a bound property. Unknown names warn and yield
    /// `None`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&UniformValue> {
        match self.properties.get(name) {
            Some(prop) => Some(&prop.value),
            None => {
                log::warn!("{}: failed to get property '{name}', property not found", self.name);
                None
            }
        }
    }

    /// Write a bound property.
    ///
    /// Unknown names, shape mismatches against the bound variant, and
    /// length-mismatched buffer writes are all dropped with a warning and
    /// leave the stored value untouched. Buffer writes fill the existing
    /// storage in place; scalar and texture writes replace the slot, and a
    /// one-element numeric value is accepted on a scalar slot. Texture
    /// handles are unwrapped to their backend resource before storing.
    pub fn set_property<'a>(&mut self, name: &str, value: impl Into<PropertyInput<'a>>) {
        let Some(prop) = self.properties.get_mut(name) else {
            log::warn!("{}: failed to set property '{name}', property not found", self.name);
            return;
        };

        match (value.into(), &mut prop.value) {
            (PropertyInput::Scalar(v), UniformValue::Scalar(slot)) => *slot = v,
            // One-element numeric values are interchangeable with scalars.
            (PropertyInput::Floats(src), UniformValue::Scalar(slot)) => {
                if src.len() != 1 {
                    log::warn!(
                        "{}: failed to set property '{name}', expected 1 float, got {}",
                        self.name,
                        src.len()
                    );
                    return;
                }
                *slot = src[0];
            }
            (PropertyInput::Write(writer), UniformValue::Scalar(slot)) => {
                if writer.float_len() != 1 {
                    log::warn!(
                        "{}: failed to set property '{name}', expected 1 float, got {}",
                        self.name,
                        writer.float_len()
                    );
                    return;
                }
                writer.write_floats(std::slice::from_mut(slot));
            }
            (PropertyInput::Floats(src), UniformValue::Buffer(buf)) => {
                if src.len() != buf.len() {
                    log::warn!(
                        "{}: failed to set property '{name}', expected {} floats, got {}",
                        self.name,
                        buf.len(),
                        src.len()
                    );
                    return;
                }
                buf.copy_from_slice(src);
            }
            (PropertyInput::Write(writer), UniformValue::Buffer(buf)) => {
                if writer.float_len() != buf.len() {
                    log::warn!(
                        "{}: failed to set property '{name}', expected {} floats, got {}",
                        self.name,
                        buf.len(),
                        writer.float_len()
                    );
                    return;
                }
                writer.write_floats(buf);
            }
            (PropertyInput::Texture(handle), UniformValue::Texture(slot)) => {
                *slot = Some(handle.backend_texture());
            }
            _ => {
                log::warn!(
                    "{}: failed to set property '{name}', value shape does not match bound type",
                    self.name
                );
                return;
            }
        }

        if let Some(mirror) = self.mirror.as_deref_mut() {
            mirror.set_property(name, &prop.value);
        }
    }

    // ─── Defines ─────────────────────────────────────────────────────────────

    /// Current value of a define. Unknown names warn and yield `None`.
    #[must_use]
    pub fn define_value(&self, name: &str) -> Option<DefineValue> {
        let value = self.defines.get(name).copied();
        if value.is_none() {
            log::warn!("{}: failed to get define '{name}', define not found", self.name);
        }
        value
    }

    /// Overwrite a define. Unknown names warn and mutate nothing.
    pub fn define(&mut self, name: &str, value: impl Into<DefineValue>) {
        let Some(slot) = self.defines.get_mut(name) else {
            log::warn!("{}: failed to set define '{name}', define not found", self.name);
            return;
        };
        let value = value.into();
        *slot = value;

        if let Some(mirror) = self.mirror.as_deref_mut() {
            mirror.define(name, value);
        }
    }

    // ─── Extraction ──────────────────────────────────────────────────────────

    /// Additively merge the property table into `out`.
    pub fn extract_properties(&self, out: &mut FxHashMap<String, BoundProperty>) {
        for (name, prop) in &self.properties {
            out.insert(name.clone(), prop.clone());
        }
    }

    /// Additively merge the define table into `out`.
    pub fn extract_defines(&self, out: &mut FxHashMap<String, DefineValue>) {
        for (name, value) in &self.defines {
            out.insert(name.clone(), *value);
        }
    }

    /// Flatten the dependency list into `out` as define → extension. Later
    /// duplicates overwrite earlier ones.
    pub fn extract_dependencies(&self, out: &mut FxHashMap<String, String>) {
        for dep in &self.dependencies {
            out.insert(dep.define.clone(), dep.extension.clone());
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────────

    /// Forward an externally computed pipeline-compatibility hash to the
    /// mirror. No local state is touched.
    pub fn update_hash(&mut self, hash: u32) {
        if let Some(mirror) = self.mirror.as_deref_mut() {
            mirror.update_hash(hash);
        }
    }

    /// Truncate the technique list and replace both tables with fresh empty
    /// ones. Program and texture resources are owned elsewhere and are not
    /// released.
    pub fn clear(&mut self) {
        self.techniques.clear();
        self.properties = FxHashMap::default();
        self.defines = FxHashMap::default();

        if let Some(mirror) = self.mirror.as_deref_mut() {
            mirror.clear();
        }
    }
}
