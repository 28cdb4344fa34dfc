//! Fixed-function pass state.
//!
//! Plain-data mirrors of the backend's rasterizer, blend and depth/stencil
//! state, with the setter surface the pass builder drives. The enums derive
//! `Deserialize` so authored state descriptors map straight onto them.
//!
//! State is written once while a pass is constructed and is read-only
//! afterwards; the setters are therefore crate-private.

use serde::Deserialize;

// ─── State Enums ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CullMode {
    None,
    Front,
    #[default]
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendOp {
    #[default]
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareFunc {
    Never,
    #[default]
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

impl CompareFunc {
    /// serde default for stencil functions, which start at `always`.
    pub(crate) fn always() -> Self {
        Self::Always
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StencilOp {
    #[default]
    Keep,
    Zero,
    Replace,
    Invert,
    Incr,
    Decr,
    IncrWrap,
    DecrWrap,
}

// ─── State Bundles ───────────────────────────────────────────────────────────

/// Blend state for the first color target. Multi-target authoring is not
/// supported; additional targets in the descriptor are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendState {
    pub enabled: bool,
    pub color_eq: BlendOp,
    pub src_factor: BlendFactor,
    pub dst_factor: BlendFactor,
    pub alpha_eq: BlendOp,
    pub src_alpha_factor: BlendFactor,
    pub dst_alpha_factor: BlendFactor,
    pub constant_color: [f32; 4],
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enabled: false,
            color_eq: BlendOp::Add,
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::Zero,
            alpha_eq: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::Zero,
            constant_color: [0.0; 4],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DepthState {
    pub test: bool,
    pub write: bool,
    pub func: CompareFunc,
}

/// Stencil state for one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilSide {
    pub test: bool,
    pub func: CompareFunc,
    pub reference: u32,
    pub read_mask: u32,
    pub fail_op: StencilOp,
    pub z_fail_op: StencilOp,
    pub z_pass_op: StencilOp,
    pub write_mask: u32,
}

impl Default for StencilSide {
    fn default() -> Self {
        Self {
            test: false,
            func: CompareFunc::Always,
            reference: 0,
            read_mask: 0xff,
            fail_op: StencilOp::Keep,
            z_fail_op: StencilOp::Keep,
            z_pass_op: StencilOp::Keep,
            write_mask: 0xff,
        }
    }
}

/// The full fixed-function state bundle of one pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PassState {
    pub cull_mode: CullMode,
    pub blend: BlendState,
    pub depth: DepthState,
    pub stencil_front: StencilSide,
    pub stencil_back: StencilSide,
}

impl PassState {
    pub(crate) fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    pub(crate) fn set_blend(
        &mut self,
        enabled: bool,
        color_eq: BlendOp,
        src_factor: BlendFactor,
        dst_factor: BlendFactor,
        alpha_eq: BlendOp,
        src_alpha_factor: BlendFactor,
        dst_alpha_factor: BlendFactor,
        constant_color: [f32; 4],
    ) {
        self.blend = BlendState {
            enabled,
            color_eq,
            src_factor,
            dst_factor,
            alpha_eq,
            src_alpha_factor,
            dst_alpha_factor,
            constant_color,
        };
    }

    pub(crate) fn set_depth(&mut self, test: bool, write: bool, func: CompareFunc) {
        self.depth = DepthState { test, write, func };
    }

    pub(crate) fn set_stencil_front(&mut self, side: StencilSide) {
        self.stencil_front = side;
    }

    pub(crate) fn set_stencil_back(&mut self, side: StencilSide) {
        self.stencil_back = side;
    }
}
