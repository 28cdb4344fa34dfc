//! Program reflection and the injected lookup registries.
//!
//! Resolution consumes two name-keyed lookups, both passed in by reference
//! rather than reached through globals:
//!
//! - [`ProgramRegistry`] — program name → [`ProgramReflection`], the
//!   read-only metadata reflected from a compiled shader template (declared
//!   uniforms, defines and extension requirements).
//! - [`StageRegistry`] — render-stage name → bit in a `u32` stage mask.
//!
//! Reflection records deserialize with serde so a program library can be
//! loaded from JSON shipped next to the effect assets.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::errors::Result;
use crate::value::{DefineType, UniformType};

/// A uniform declared by a shader program.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: UniformType,
    /// Authored default, as a flat float list. Absent means zero-filled.
    #[serde(default)]
    pub value: Option<Vec<f32>>,
    /// Defines gating this uniform's relevance. Carried for callers that
    /// inspect reflection; resolution itself does not consult it.
    #[serde(default)]
    pub defines: Vec<String>,
}

/// A compile-time define declared by a shader program.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefineDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: DefineType,
}

/// A capability requirement: enabling `define` requires `extension`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub define: String,
    pub extension: String,
}

/// Reflected metadata for one shader program template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramReflection {
    pub name: String,
    #[serde(default)]
    pub uniforms: Vec<UniformDecl>,
    #[serde(default)]
    pub defines: Vec<DefineDecl>,
    #[serde(default)]
    pub extensions: Vec<Dependency>,
}

impl ProgramReflection {
    /// The declared uniform with the given name, if any.
    #[must_use]
    pub fn uniform(&self, name: &str) -> Option<&UniformDecl> {
        self.uniforms.iter().find(|u| u.name == name)
    }
}

/// Read-only library of program reflection records, keyed by program name.
#[derive(Debug, Default)]
pub struct ProgramRegistry {
    templates: FxHashMap<String, ProgramReflection>,
}

impl ProgramRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON array of reflection records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ProgramReflection> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for record in records {
            registry.insert(record);
        }
        Ok(registry)
    }

    /// Register a reflection record under its program name. Re-inserting a
    /// name replaces the previous record.
    pub fn insert(&mut self, reflection: ProgramReflection) {
        self.templates.insert(reflection.name.clone(), reflection);
    }

    /// Look up a program by name.
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&ProgramReflection> {
        self.templates.get(name)
    }
}

/// Maps render-stage names to bits of a `u32` stage mask.
///
/// Stages are registered in first-come order, each taking the next free bit.
/// Lookup of an unregistered stage returns `None`, which callers treat as
/// "matches nothing".
#[derive(Debug, Default)]
pub struct StageRegistry {
    ids: FxHashMap<String, u32>,
    next_shift: u32,
}

impl StageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stage name and return its bit. Registering an existing
    /// name returns the bit it already holds.
    pub fn register(&mut self, name: &str) -> u32 {
        if let Some(&bit) = self.ids.get(name) {
            return bit;
        }
        if self.next_shift >= u32::BITS {
            log::warn!("stage registry full, cannot register stage '{name}'");
            return 0;
        }
        let bit = 1 << self.next_shift;
        self.next_shift += 1;
        self.ids.insert(name.to_owned(), bit);
        bit
    }

    /// The bit assigned to a stage name, or `None` if never registered.
    #[must_use]
    pub fn stage_id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }
}
