//! Runtime technique and pass objects.
//!
//! Both are immutable after construction: the pass builder writes the
//! fixed-function state exactly once while resolving, and from then on the
//! renderer only reads.

use crate::state::{BlendFactor, BlendOp, CompareFunc, CullMode, PassState, StencilSide};

/// One fixed-function state bundle bound to a program reference.
#[derive(Debug, Clone)]
pub struct Pass {
    program: String,
    state: PassState,
}

impl Pass {
    pub(crate) fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            state: PassState::default(),
        }
    }

    /// Name of the program this pass binds.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The pass's fixed-function state.
    #[must_use]
    pub fn state(&self) -> &PassState {
        &self.state
    }

    pub(crate) fn set_cull_mode(&mut self, mode: CullMode) {
        self.state.set_cull_mode(mode);
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
        self.state.set_blend(
            enabled,
            color_eq,
            src_factor,
            dst_factor,
            alpha_eq,
            src_alpha_factor,
            dst_alpha_factor,
            constant_color,
        );
    }

    pub(crate) fn set_depth(&mut self, test: bool, write: bool, func: CompareFunc) {
        self.state.set_depth(test, write, func);
    }

    pub(crate) fn set_stencil_front(&mut self, side: StencilSide) {
        self.state.set_stencil_front(side);
    }

    pub(crate) fn set_stencil_back(&mut self, side: StencilSide) {
        self.state.set_stencil_back(side);
    }
}

/// An ordered group of passes serving a set of render stages.
#[derive(Debug, Clone)]
pub struct Technique {
    stage_ids: u32,
    passes: Vec<Pass>,
    layer: i32,
}

impl Technique {
    pub(crate) fn new(stage_ids: u32, passes: Vec<Pass>, layer: i32) -> Self {
        Self {
            stage_ids,
            passes,
            layer,
        }
    }

    /// Bitmask of the stages this technique serves.
    #[must_use]
    pub fn stage_ids(&self) -> u32 {
        self.stage_ids
    }

    /// The passes, in authored order.
    #[must_use]
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    #[must_use]
    pub fn layer(&self) -> i32 {
        self.layer
    }
}
