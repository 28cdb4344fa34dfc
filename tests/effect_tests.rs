//! Effect Façade Tests
//!
//! Tests for:
//! - Property reads/writes: scalar, buffer (exact-length, in-place), texture
//! - Write rejection: unknown names, length mismatch, shape mismatch
//! - Define get/set contract
//! - Stage-keyed technique lookup and the unknown-stage sentinel
//! - clear() lifecycle and extract_* non-destructive merges
//! - NativeMirror observation and update_hash forwarding

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use shader_effect::{
    resolve, BoundProperty, DefineValue, Effect, EffectAsset, NativeMirror, ProgramRegistry,
    PropertyInput, StageRegistry, TextureRef, TextureSource, UniformValue, WriteFloats,
};

// ============================================================================
// Fixtures
// ============================================================================

fn stage_registry() -> StageRegistry {
    let mut stages = StageRegistry::new();
    stages.register("opaque");
    stages.register("transparent");
    stages.register("shadow");
    stages
}

fn program_library() -> ProgramRegistry {
    ProgramRegistry::from_json(
        r#"[
            {
                "name": "sprite",
                "uniforms": [
                    { "name": "u_color", "type": "color4", "value": [1, 1, 1, 1] },
                    { "name": "u_intensity", "type": "float", "value": [1] },
                    { "name": "mainTexture", "type": "texture2D" }
                ],
                "defines": [
                    { "name": "USE_TINT", "type": "bool" }
                ],
                "extensions": [
                    { "define": "USE_DERIVATIVES", "extension": "OES_standard_derivatives" }
                ]
            }
        ]"#,
    )
    .expect("valid reflection json")
}

fn sprite_effect(stages: &StageRegistry) -> Effect {
    let asset = EffectAsset::from_json(
        r#"{ "name": "sprite-fx", "techniques": [
            { "stages": ["opaque"], "passes": [{ "program": "sprite" }] },
            { "stages": ["transparent"], "passes": [{ "program": "sprite" }] }
        ] }"#,
    )
    .expect("valid effect json");
    resolve(&asset, &program_library(), stages).expect("resolves")
}

fn floats(value: &UniformValue) -> &[f32] {
    value.as_floats().expect("numeric value")
}

struct FakeTexture(u64);

impl TextureSource for FakeTexture {
    fn backend_texture(&self) -> TextureRef {
        TextureRef::new(self.0)
    }
}

// ============================================================================
// Property writes
// ============================================================================

#[test]
fn buffer_write_replaces_contents() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    assert_eq!(
        floats(effect.property("u_color").unwrap()),
        &[1.0, 1.0, 1.0, 1.0]
    );
    effect.set_property("u_color", &[0.0, 0.0, 0.0, 1.0]);
    assert_eq!(
        floats(effect.property("u_color").unwrap()),
        &[0.0, 0.0, 0.0, 1.0]
    );
}

#[test]
fn length_mismatch_leaves_buffer_unchanged() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    effect.set_property("u_color", &[0.5, 0.5]);
    assert_eq!(
        floats(effect.property("u_color").unwrap()),
        &[1.0, 1.0, 1.0, 1.0]
    );
}

#[test]
fn scalar_write_replaces_slot() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    effect.set_property("u_intensity", 0.25_f32);
    assert_eq!(
        effect.property("u_intensity"),
        Some(&UniformValue::Scalar(0.25))
    );
}

#[test]
fn one_element_slice_writes_scalar_slot() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    effect.set_property("u_intensity", &[0.5]);
    assert_eq!(
        effect.property("u_intensity"),
        Some(&UniformValue::Scalar(0.5))
    );
}

#[test]
fn multi_element_slice_on_scalar_slot_is_rejected() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    effect.set_property("u_intensity", &[0.5, 0.6]);
    assert_eq!(
        effect.property("u_intensity"),
        Some(&UniformValue::Scalar(1.0))
    );
}

#[test]
fn shape_mismatch_is_rejected() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    // A scalar write against a 4-component buffer mutates nothing.
    effect.set_property("u_color", 0.5_f32);
    assert_eq!(
        floats(effect.property("u_color").unwrap()),
        &[1.0, 1.0, 1.0, 1.0]
    );
}

#[test]
fn unknown_property_write_is_a_noop() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    effect.set_property("u_unknown", 1.0_f32);
    assert!(effect.property("u_unknown").is_none());
}

#[test]
fn texture_write_unwraps_backend_resource() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    assert_eq!(
        effect.property("mainTexture").unwrap().as_texture(),
        Some(None)
    );

    let texture = FakeTexture(42);
    effect.set_property("mainTexture", PropertyInput::Texture(&texture));
    assert_eq!(
        effect.property("mainTexture").unwrap().as_texture(),
        Some(Some(TextureRef::new(42)))
    );
}

#[test]
fn in_place_writer_fills_existing_buffer() {
    struct Tint([f32; 4]);

    impl WriteFloats for Tint {
        fn float_len(&self) -> usize {
            4
        }
        fn write_floats(&self, out: &mut [f32]) {
            out.copy_from_slice(&self.0);
        }
    }

    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    let tint = Tint([0.1, 0.2, 0.3, 1.0]);
    effect.set_property("u_color", PropertyInput::Write(&tint));
    assert_eq!(
        floats(effect.property("u_color").unwrap()),
        &[0.1, 0.2, 0.3, 1.0]
    );
}

// ============================================================================
// Defines
// ============================================================================

#[test]
fn define_overwrites_known_name() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    assert_eq!(effect.define_value("USE_TINT"), Some(DefineValue::Bool(false)));
    effect.define("USE_TINT", true);
    assert_eq!(effect.define_value("USE_TINT"), Some(DefineValue::Bool(true)));
}

#[test]
fn unknown_define_is_a_noop() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    effect.define("USE_UNKNOWN", true);
    assert_eq!(effect.define_value("USE_UNKNOWN"), None);
}

// ============================================================================
// Technique lookup
// ============================================================================

#[test]
fn technique_lookup_matches_stage_masks() {
    let stages = stage_registry();
    let effect = sprite_effect(&stages);

    let opaque = effect.technique_for_stage("opaque", &stages).unwrap();
    let transparent = effect.technique_for_stage("transparent", &stages).unwrap();
    assert_eq!(opaque.stage_ids(), stages.stage_id("opaque").unwrap());
    assert_eq!(
        transparent.stage_ids(),
        stages.stage_id("transparent").unwrap()
    );

    // Registered stage that no technique serves.
    assert!(effect.technique_for_stage("shadow", &stages).is_none());
    // Stage name the registry has never seen.
    assert!(effect.technique_for_stage("ui", &stages).is_none());
}

#[test]
fn default_technique_is_first_declared() {
    let stages = stage_registry();
    let effect = sprite_effect(&stages);

    let first = effect.default_technique().unwrap();
    assert_eq!(first.stage_ids(), stages.stage_id("opaque").unwrap());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn clear_empties_techniques_and_tables() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    effect.clear();

    for stage in ["opaque", "transparent", "shadow", "ui"] {
        assert!(effect.technique_for_stage(stage, &stages).is_none());
    }
    assert!(effect.default_technique().is_none());
    assert!(effect.property("u_color").is_none());
    assert_eq!(effect.define_value("USE_TINT"), None);
}

#[test]
fn extract_merges_are_additive() {
    let stages = stage_registry();
    let effect = sprite_effect(&stages);

    let mut props: FxHashMap<String, BoundProperty> = FxHashMap::default();
    props.insert(
        "pre_existing".into(),
        BoundProperty {
            ty: shader_effect::UniformType::Float,
            value: UniformValue::Scalar(7.0),
        },
    );
    effect.extract_properties(&mut props);
    assert!(props.contains_key("pre_existing"));
    assert!(props.contains_key("u_color"));

    let mut defines: FxHashMap<String, DefineValue> = FxHashMap::default();
    defines.insert("KEPT".into(), DefineValue::Int(3));
    effect.extract_defines(&mut defines);
    assert_eq!(defines.get("KEPT"), Some(&DefineValue::Int(3)));
    assert_eq!(defines.get("USE_TINT"), Some(&DefineValue::Bool(false)));
}

#[test]
fn update_hash_does_not_alter_tables() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    let mut props_before = FxHashMap::default();
    let mut defines_before = FxHashMap::default();
    effect.extract_properties(&mut props_before);
    effect.extract_defines(&mut defines_before);

    effect.update_hash(0xdead_beef);

    let mut props_after = FxHashMap::default();
    let mut defines_after = FxHashMap::default();
    effect.extract_properties(&mut props_after);
    effect.extract_defines(&mut defines_after);

    assert_eq!(props_before, props_after);
    assert_eq!(defines_before, defines_after);
}

// ============================================================================
// Native mirror
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Init { properties: usize, defines: usize },
    Clear,
    SetProperty(String),
    Define(String, DefineValue),
    UpdateHash(u32),
}

struct RecordingMirror {
    events: Rc<RefCell<Vec<Event>>>,
}

impl NativeMirror for RecordingMirror {
    fn init(
        &mut self,
        properties: &FxHashMap<String, BoundProperty>,
        defines: &FxHashMap<String, DefineValue>,
    ) {
        self.events.borrow_mut().push(Event::Init {
            properties: properties.len(),
            defines: defines.len(),
        });
    }

    fn clear(&mut self) {
        self.events.borrow_mut().push(Event::Clear);
    }

    fn set_property(&mut self, name: &str, _value: &UniformValue) {
        self.events.borrow_mut().push(Event::SetProperty(name.into()));
    }

    fn define(&mut self, name: &str, value: DefineValue) {
        self.events.borrow_mut().push(Event::Define(name.into(), value));
    }

    fn update_hash(&mut self, hash: u32) {
        self.events.borrow_mut().push(Event::UpdateHash(hash));
    }
}

#[test]
fn mirror_observes_every_local_mutation() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    let events = Rc::new(RefCell::new(Vec::new()));
    effect.attach_mirror(Box::new(RecordingMirror {
        events: Rc::clone(&events),
    }));

    effect.set_property("u_color", &[0.0, 0.0, 0.0, 1.0]);
    effect.define("USE_TINT", true);
    effect.update_hash(7);
    effect.clear();

    assert_eq!(
        *events.borrow(),
        vec![
            Event::Init {
                properties: 3,
                defines: 1
            },
            Event::SetProperty("u_color".into()),
            Event::Define("USE_TINT".into(), DefineValue::Bool(true)),
            Event::UpdateHash(7),
            Event::Clear,
        ]
    );
}

#[test]
fn mirror_is_not_notified_of_rejected_writes() {
    let stages = stage_registry();
    let mut effect = sprite_effect(&stages);

    let events = Rc::new(RefCell::new(Vec::new()));
    effect.attach_mirror(Box::new(RecordingMirror {
        events: Rc::clone(&events),
    }));

    effect.set_property("u_color", &[1.0]); // length mismatch
    effect.set_property("u_unknown", 1.0_f32); // unknown name
    effect.define("USE_UNKNOWN", true); // unknown define

    assert_eq!(
        *events.borrow(),
        vec![Event::Init {
            properties: 3,
            defines: 1
        }]
    );
}
