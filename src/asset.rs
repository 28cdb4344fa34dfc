//! Authored effect descriptor.
//!
//! The serde data model for the JSON effect asset:
//!
//! ```json
//! {
//!   "name": "builtin-sprite",
//!   "techniques": [{
//!     "stages": ["transparent"],
//!     "layer": 0,
//!     "passes": [{
//!       "program": "sprite",
//!       "properties": { "mainTexture": { "type": "texture2D" } },
//!       "rasterizerState": { "cullMode": "none" },
//!       "blendState": { "targets": [{ "blend": true }] },
//!       "depthStencilState": { "depthTest": true, "depthWrite": false }
//!     }]
//!   }]
//! }
//! ```
//!
//! The descriptor is transient: it is consumed once by
//! [`resolve`](crate::resolve::resolve) and plays no further role at runtime.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::errors::Result;
use crate::state::{BlendFactor, BlendOp, CompareFunc, CullMode, StencilOp};
use crate::value::UniformType;

/// Top-level authored effect description.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectAsset {
    pub name: String,
    #[serde(default)]
    pub techniques: Vec<TechniqueDesc>,
}

impl EffectAsset {
    /// Deserialize an effect asset from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One authored technique.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechniqueDesc {
    /// Stage names this technique serves. Absent defaults to `["opaque"]`.
    #[serde(default)]
    pub stages: Option<Vec<String>>,
    #[serde(default)]
    pub layer: i32,
    pub passes: Vec<PassDesc>,
}

/// One authored pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassDesc {
    pub program: String,
    /// Per-pass property overrides, keyed by uniform name.
    #[serde(default)]
    pub properties: FxHashMap<String, PropertyDesc>,
    #[serde(default)]
    pub rasterizer_state: Option<RasterizerDesc>,
    #[serde(default)]
    pub blend_state: Option<BlendDesc>,
    #[serde(default)]
    pub depth_stencil_state: Option<DepthStencilDesc>,
}

/// An authored property override: a declared type plus a raw default encoded
/// per that type (flat float list; absent or null for textures).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDesc {
    #[serde(rename = "type")]
    pub ty: UniformType,
    #[serde(default)]
    pub value: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterizerDesc {
    #[serde(default)]
    pub cull_mode: CullMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendDesc {
    /// Only the first target is consumed; multi-target authoring is
    /// unsupported.
    #[serde(default)]
    pub targets: Vec<BlendTargetDesc>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendTargetDesc {
    #[serde(default)]
    pub blend: bool,
    #[serde(default)]
    pub blend_eq: BlendOp,
    #[serde(default = "default_blend_src")]
    pub blend_src: BlendFactor,
    #[serde(default = "default_blend_dst")]
    pub blend_dst: BlendFactor,
    #[serde(default)]
    pub blend_alpha_eq: BlendOp,
    #[serde(default = "default_blend_src")]
    pub blend_src_alpha: BlendFactor,
    #[serde(default = "default_blend_dst")]
    pub blend_dst_alpha: BlendFactor,
    #[serde(default)]
    pub blend_color: [f32; 4],
}

fn default_blend_src() -> BlendFactor {
    BlendFactor::SrcAlpha
}

fn default_blend_dst() -> BlendFactor {
    BlendFactor::OneMinusSrcAlpha
}

fn default_stencil_mask() -> u32 {
    0xff
}

/// Combined depth and two-sided stencil descriptor.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthStencilDesc {
    #[serde(default)]
    pub depth_test: bool,
    #[serde(default)]
    pub depth_write: bool,
    #[serde(default)]
    pub depth_func: CompareFunc,

    #[serde(default)]
    pub stencil_test: bool,

    #[serde(default = "CompareFunc::always")]
    pub stencil_func_front: CompareFunc,
    #[serde(default)]
    pub stencil_ref_front: u32,
    #[serde(default = "default_stencil_mask")]
    pub stencil_mask_front: u32,
    #[serde(default)]
    pub stencil_fail_op_front: StencilOp,
    #[serde(default)]
    pub stencil_z_fail_op_front: StencilOp,
    #[serde(default)]
    pub stencil_z_pass_op_front: StencilOp,
    #[serde(default = "default_stencil_mask")]
    pub stencil_write_mask_front: u32,

    #[serde(default = "CompareFunc::always")]
    pub stencil_func_back: CompareFunc,
    #[serde(default)]
    pub stencil_ref_back: u32,
    #[serde(default = "default_stencil_mask")]
    pub stencil_mask_back: u32,
    #[serde(default)]
    pub stencil_fail_op_back: StencilOp,
    #[serde(default)]
    pub stencil_z_fail_op_back: StencilOp,
    #[serde(default)]
    pub stencil_z_pass_op_back: StencilOp,
    #[serde(default = "default_stencil_mask")]
    pub stencil_write_mask_back: u32,
}
