//! Effect resolution.
//!
//! Turns a transient authored descriptor into a runtime [`Effect`] in four
//! ordered steps:
//!
//! 1. **Discovery** — walk the techniques technique-major, pass-minor and
//!    collect each pass's program reflection. The traversal order matters:
//!    it is the tie-break when several programs declare the same uniform.
//! 2. **Property merge** — union of every pass's overrides (later pass wins
//!    on a name collision), each validated against the discovered programs.
//! 3. **Bind** — build the bound-property, bound-define and dependency
//!    tables from the programs' declarations, overrides winning.
//! 4. **Technique build** — construct passes with their fixed-function state
//!    and assemble the techniques.
//!
//! The only fatal condition is an unresolvable program name; every other
//! authoring problem warns and degrades.

use rustc_hash::FxHashMap;

use crate::asset::{EffectAsset, PassDesc, TechniqueDesc};
use crate::effect::{BoundProperty, Effect};
use crate::errors::{EffectError, Result};
use crate::program::{Dependency, ProgramReflection, ProgramRegistry, StageRegistry};
use crate::state::StencilSide;
use crate::technique::{Pass, Technique};
use crate::value::DefineValue;

/// Stage list applied when a technique declares none.
const DEFAULT_STAGES: &[&str] = &["opaque"];

/// Resolve an authored effect against the program library.
///
/// Fails only with [`EffectError::ProgramNotFound`]; no partial effect is
/// ever produced.
pub fn resolve(
    asset: &EffectAsset,
    programs: &ProgramRegistry,
    stages: &StageRegistry,
) -> Result<Effect> {
    let involved = involved_programs(asset, programs)?;
    let overrides = merge_properties(asset, &involved);
    let (properties, defines, dependencies) = bind(&involved, &overrides);
    let techniques = build_techniques(asset, stages);

    log::debug!(
        "resolved effect '{}': {} techniques, {} properties, {} defines, {} dependencies",
        asset.name,
        techniques.len(),
        properties.len(),
        defines.len(),
        dependencies.len(),
    );

    Ok(Effect::new(
        asset.name.clone(),
        techniques,
        properties,
        defines,
        dependencies,
    ))
}

/// Collect the reflection record of every referenced program, in traversal
/// order (technique-major, pass-minor). Duplicates are kept: a program used
/// by several passes appears once per use.
fn involved_programs<'a>(
    asset: &EffectAsset,
    programs: &'a ProgramRegistry,
) -> Result<Vec<&'a ProgramReflection>> {
    let mut involved = Vec::new();
    for tech in &asset.techniques {
        for pass in &tech.passes {
            let reflection =
                programs
                    .template(&pass.program)
                    .ok_or_else(|| EffectError::ProgramNotFound {
                        effect: asset.name.clone(),
                        program: pass.program.clone(),
                    })?;
            involved.push(reflection);
        }
    }
    Ok(involved)
}

/// Merge every pass's property overrides (later pass wins on collision) and
/// validate each name against the involved programs. Overrides that match no
/// declared uniform are dropped with one warning.
fn merge_properties(
    asset: &EffectAsset,
    involved: &[&ProgramReflection],
) -> FxHashMap<String, BoundProperty> {
    let mut merged = FxHashMap::default();
    for tech in &asset.techniques {
        for pass in &tech.passes {
            for (name, desc) in &pass.properties {
                merged.insert(name.clone(), desc.clone());
            }
        }
    }

    let mut overrides = FxHashMap::default();
    for (name, desc) in merged {
        if involved.iter().any(|p| p.uniform(&name).is_some()) {
            let value = desc.ty.instantiate(desc.value.as_deref());
            overrides.insert(name, BoundProperty { ty: desc.ty, value });
        } else {
            log::warn!("{}: illegal property '{name}'", asset.name);
        }
    }
    overrides
}

/// Build the three bound tables from the involved programs' declarations.
///
/// Per uniform, the last program in traversal order to declare a name wins —
/// unless an override exists for it, which always wins and is reapplied
/// unchanged at every program that declares the name (idempotent). Defines
/// have no override mechanism; extension lists are concatenated without
/// deduplication.
#[allow(clippy::type_complexity)]
fn bind(
    involved: &[&ProgramReflection],
    overrides: &FxHashMap<String, BoundProperty>,
) -> (
    FxHashMap<String, BoundProperty>,
    FxHashMap<String, DefineValue>,
    Vec<Dependency>,
) {
    let mut properties = FxHashMap::default();
    let mut defines = FxHashMap::default();
    let mut dependencies = Vec::new();

    for program in involved {
        for uniform in &program.uniforms {
            let bound = match overrides.get(&uniform.name) {
                Some(over) => over.clone(),
                None => BoundProperty {
                    ty: uniform.ty,
                    value: uniform.ty.instantiate(uniform.value.as_deref()),
                },
            };
            properties.insert(uniform.name.clone(), bound);
        }

        for define in &program.defines {
            defines.insert(define.name.clone(), define.ty.default_value());
        }

        dependencies.extend(program.extensions.iter().cloned());
    }

    (properties, defines, dependencies)
}

fn build_techniques(asset: &EffectAsset, stages: &StageRegistry) -> Vec<Technique> {
    asset
        .techniques
        .iter()
        .map(|tech| build_technique(&asset.name, tech, stages))
        .collect()
}

fn build_technique(effect: &str, tech: &TechniqueDesc, stages: &StageRegistry) -> Technique {
    let mut stage_ids = 0;
    match &tech.stages {
        Some(names) => {
            for name in names {
                match stages.stage_id(name) {
                    Some(bit) => stage_ids |= bit,
                    None => log::warn!("{effect}: unknown stage '{name}'"),
                }
            }
        }
        None => {
            for name in DEFAULT_STAGES {
                match stages.stage_id(name) {
                    Some(bit) => stage_ids |= bit,
                    None => log::warn!("{effect}: unknown stage '{name}'"),
                }
            }
        }
    }

    let passes = tech.passes.iter().map(build_pass).collect();
    Technique::new(stage_ids, passes, tech.layer)
}

/// Construct one pass and apply its authored fixed-function state, in order:
/// cull mode, blend (first target only), depth, stencil front, stencil back.
/// Absent sub-descriptors leave the default state untouched.
fn build_pass(desc: &PassDesc) -> Pass {
    let mut pass = Pass::new(&desc.program);

    if let Some(rs) = &desc.rasterizer_state {
        pass.set_cull_mode(rs.cull_mode);
    }

    if let Some(target) = desc.blend_state.as_ref().and_then(|bs| bs.targets.first()) {
        pass.set_blend(
            target.blend,
            target.blend_eq,
            target.blend_src,
            target.blend_dst,
            target.blend_alpha_eq,
            target.blend_src_alpha,
            target.blend_dst_alpha,
            target.blend_color,
        );
    }

    if let Some(ds) = &desc.depth_stencil_state {
        pass.set_depth(ds.depth_test, ds.depth_write, ds.depth_func);
        pass.set_stencil_front(StencilSide {
            test: ds.stencil_test,
            func: ds.stencil_func_front,
            reference: ds.stencil_ref_front,
            read_mask: ds.stencil_mask_front,
            fail_op: ds.stencil_fail_op_front,
            z_fail_op: ds.stencil_z_fail_op_front,
            z_pass_op: ds.stencil_z_pass_op_front,
            write_mask: ds.stencil_write_mask_front,
        });
        pass.set_stencil_back(StencilSide {
            test: ds.stencil_test,
            func: ds.stencil_func_back,
            reference: ds.stencil_ref_back,
            read_mask: ds.stencil_mask_back,
            fail_op: ds.stencil_fail_op_back,
            z_fail_op: ds.stencil_z_fail_op_back,
            z_pass_op: ds.stencil_z_pass_op_back,
            write_mask: ds.stencil_write_mask_back,
        });
    }

    pass
}
