//! Authored shader-effect resolution.
//!
//! Resolves a deserialized effect asset (techniques / passes / properties)
//! against reflected program metadata into a runtime-bindable [`Effect`]
//! owning three independently keyed tables — bound properties, bound defines
//! and capability dependencies — plus the technique list, and exposes the
//! per-frame mutation surface over them.
//!
//! ```rust,ignore
//! use shader_effect::{resolve, EffectAsset, ProgramRegistry, StageRegistry};
//!
//! let programs = ProgramRegistry::from_json(reflection_json)?;
//! let mut stages = StageRegistry::new();
//! stages.register("opaque");
//!
//! let asset = EffectAsset::from_json(effect_json)?;
//! let mut effect = resolve(&asset, &programs, &stages)?;
//! effect.set_property("u_color", &[1.0, 0.0, 0.0, 1.0]);
//! ```

pub mod asset;
pub mod effect;
pub mod errors;
pub mod program;
pub mod resolve;
pub mod state;
pub mod technique;
pub mod texture;
pub mod value;

pub use asset::{EffectAsset, PassDesc, PropertyDesc, TechniqueDesc};
pub use effect::{BoundProperty, Effect, NativeMirror, PropertyInput, WriteFloats};
pub use errors::{EffectError, Result};
pub use program::{
    DefineDecl, Dependency, ProgramReflection, ProgramRegistry, StageRegistry, UniformDecl,
};
pub use resolve::resolve;
pub use state::{
    BlendFactor, BlendOp, BlendState, CompareFunc, CullMode, DepthState, PassState, StencilOp,
    StencilSide,
};
pub use technique::{Pass, Technique};
pub use texture::{TextureRef, TextureSource};
pub use value::{DefineType, DefineValue, FloatBuffer, UniformType, UniformValue};
