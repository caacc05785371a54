//! Tests for the dependency context
//!
//! Covers registration-table resolution (priority, ambiguity, memoization),
//! config-key interception and member injection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use latch_domain::error::{Error, Result};
use latch_host::context::{ContextBuilder, DependencyContext, Injectable};
use latch_host::module::{Module, RegistrationDecl};
use latch_providers::MemoryProvider;

trait Codec: Send + Sync {
    fn format(&self) -> &'static str;
}

struct JsonCodec;

impl Codec for JsonCodec {
    fn format(&self) -> &'static str {
        "json"
    }
}

struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> &'static str {
        "yaml"
    }
}

fn context_with(values: &[(&str, &str)]) -> DependencyContext {
    let mut provider = MemoryProvider::new();
    for (key, value) in values {
        provider.insert(*key, *value);
    }
    ContextBuilder::new()
        .with_provider(Arc::new(provider), 0)
        .build()
}

#[test]
fn test_unregistered_contract_is_a_soft_miss() {
    let ctx = context_with(&[]);
    assert!(ctx.try_resolve::<dyn Codec>(None).unwrap().is_none());
    assert!(matches!(
        ctx.resolve::<dyn Codec>(None).err().unwrap(),
        Error::NotFound { .. }
    ));
}

#[test]
fn test_highest_priority_registration_wins() {
    let ctx = context_with(&[]);
    ctx.register_type::<dyn Codec, _>("json-codec", None, 0, |_, _| Ok(Arc::new(JsonCodec)));
    ctx.register_type::<dyn Codec, _>("yaml-codec", None, 5, |_, _| Ok(Arc::new(YamlCodec)));

    let codec = ctx.resolve::<dyn Codec>(None).unwrap();
    assert_eq!(codec.format(), "yaml");
}

#[test]
fn test_equal_priority_distinct_candidates_are_ambiguous() {
    let ctx = context_with(&[]);
    ctx.register_type::<dyn Codec, _>("json-codec", None, 0, |_, _| Ok(Arc::new(JsonCodec)));
    ctx.register_type::<dyn Codec, _>("yaml-codec", None, 0, |_, _| Ok(Arc::new(YamlCodec)));

    let err = ctx.resolve::<dyn Codec>(None).err().unwrap();
    match err {
        Error::Ambiguous { candidates, .. } => {
            assert_eq!(candidates.len(), 2);
            let joined = candidates.join(", ");
            assert!(joined.contains("json-codec"));
            assert!(joined.contains("yaml-codec"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_same_label_reregistration_latest_wins() {
    struct Fixed(u32);

    let ctx = context_with(&[]);
    ctx.register_type::<Fixed, _>("fixed", None, 0, |_, _| Ok(Arc::new(Fixed(1))));
    ctx.register_type::<Fixed, _>("fixed", None, 0, |_, _| Ok(Arc::new(Fixed(2))));

    assert_eq!(ctx.resolve::<Fixed>(None).unwrap().0, 2);
}

#[test]
fn test_resolution_is_memoized_as_singleton() {
    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    let ctx = context_with(&[]);
    ctx.register_type::<dyn Codec, _>("json-codec", None, 0, |_, _| {
        BUILDS.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(JsonCodec))
    });

    let first = ctx.resolve::<dyn Codec>(None).unwrap();
    let second = ctx.resolve::<dyn Codec>(None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cached_resolution_ignores_later_registration() {
    let ctx = context_with(&[]);
    ctx.register_type::<dyn Codec, _>("json-codec", None, 0, |_, _| Ok(Arc::new(JsonCodec)));

    // Pin the resolution, then register a better candidate.
    assert_eq!(ctx.resolve::<dyn Codec>(None).unwrap().format(), "json");
    ctx.register_type::<dyn Codec, _>("yaml-codec", None, 10, |_, _| Ok(Arc::new(YamlCodec)));
    assert_eq!(ctx.resolve::<dyn Codec>(None).unwrap().format(), "json");

    // A sibling contract resolved only now does observe its registration.
    trait Renderer: Send + Sync {
        fn target(&self) -> &'static str;
    }
    struct TextRenderer;
    impl Renderer for TextRenderer {
        fn target(&self) -> &'static str {
            "text"
        }
    }
    ctx.register_type::<dyn Renderer, _>("text-renderer", None, 0, |_, _| {
        Ok(Arc::new(TextRenderer))
    });
    assert_eq!(ctx.resolve::<dyn Renderer>(None).unwrap().target(), "text");
}

#[test]
fn test_registration_order_only_matters_before_first_resolve() {
    // Same registrations as above, but nothing resolved in between: the
    // higher priority added later wins, showing the pinning is what made
    // the previous test stick to json.
    let ctx = context_with(&[]);
    ctx.register_type::<dyn Codec, _>("json-codec", None, 0, |_, _| Ok(Arc::new(JsonCodec)));
    ctx.register_type::<dyn Codec, _>("yaml-codec", None, 10, |_, _| Ok(Arc::new(YamlCodec)));
    assert_eq!(ctx.resolve::<dyn Codec>(None).unwrap().format(), "yaml");
}

#[test]
fn test_named_registrations_resolve_independently() {
    let ctx = context_with(&[]);
    ctx.register_instance::<dyn Codec>("json-codec", Some("primary"), 0, Arc::new(JsonCodec));
    ctx.register_instance::<dyn Codec>("yaml-codec", Some("secondary"), 0, Arc::new(YamlCodec));

    assert_eq!(
        ctx.resolve::<dyn Codec>(Some("primary")).unwrap().format(),
        "json"
    );
    assert_eq!(
        ctx.resolve::<dyn Codec>(Some("secondary")).unwrap().format(),
        "yaml"
    );
    // No unnamed registration exists.
    assert!(ctx.try_resolve::<dyn Codec>(None).unwrap().is_none());
}

#[test]
fn test_constructor_resolves_nested_dependencies() {
    struct Pipeline {
        codec: Arc<dyn Codec>,
    }

    let ctx = context_with(&[]);
    ctx.register_instance::<dyn Codec>("json-codec", None, 0, Arc::new(JsonCodec));
    ctx.register_type::<Pipeline, _>("pipeline", None, 0, |ctx, _| {
        Ok(Arc::new(Pipeline {
            codec: ctx.resolve::<dyn Codec>(None)?,
        }))
    });

    let pipeline = ctx.resolve::<Pipeline>(None).unwrap();
    assert_eq!(pipeline.codec.format(), "json");
}

// ============================================================================
// Configuration keys and injection
// ============================================================================

#[test]
fn test_config_key_routing_and_defaults() {
    let ctx = context_with(&[("timeout", "15")]);

    assert_eq!(ctx.resolve_key::<u64>("cfg:timeout").unwrap(), 15);
    // Chain value beats the inline default.
    assert_eq!(ctx.resolve_key::<u64>("cfg:timeout=99").unwrap(), 15);
    // Inline default applies only when the chain misses.
    assert_eq!(ctx.resolve_key::<u64>("cfg:retries=3").unwrap(), 3);
    // No value, no default: unresolved.
    assert!(ctx.try_resolve_key::<u64>("cfg:retries").unwrap().is_none());
    assert!(matches!(
        ctx.resolve_key::<u64>("cfg:retries").unwrap_err(),
        Error::KeyRequired { .. }
    ));
}

#[derive(Debug)]
struct PoolSettings {
    size: u32,
    label: String,
    motd: String,
}

impl Injectable for PoolSettings {
    fn build_up(&mut self, ctx: &DependencyContext) -> Result<()> {
        ctx.inject_required(&mut self.size, "cfg:pool.size")?;
        ctx.inject(&mut self.label, "cfg:pool.label=primary")?;
        ctx.inject(&mut self.motd, "cfg:pool.motd")?;
        Ok(())
    }
}

fn fresh_settings() -> PoolSettings {
    PoolSettings {
        size: 0,
        label: String::new(),
        motd: "unchanged".to_string(),
    }
}

#[test]
fn test_build_up_populates_members() {
    let ctx = context_with(&[("pool.size", "8")]);
    let mut settings = fresh_settings();
    ctx.build_up(&mut settings).unwrap();

    assert_eq!(settings.size, 8);
    assert_eq!(settings.label, "primary");
    // Unresolved optional member keeps its existing value.
    assert_eq!(settings.motd, "unchanged");
}

#[test]
fn test_build_up_mandatory_member_missing_is_an_error() {
    let ctx = context_with(&[]);
    let mut settings = fresh_settings();
    let err = ctx.build_up(&mut settings).unwrap_err();
    match err {
        Error::KeyRequired { key } => assert_eq!(key, "pool.size"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_build_up_chain_value_beats_inline_default() {
    let ctx = context_with(&[("pool.size", "2"), ("pool.label", "custom")]);
    let mut settings = fresh_settings();
    ctx.build_up(&mut settings).unwrap();
    assert_eq!(settings.label, "custom");
}

// ============================================================================
// Module scanning
// ============================================================================

static SCAN_JSON: RegistrationDecl = RegistrationDecl {
    module: "context-tests",
    name: "json-codec",
    register: |ctx| {
        ctx.register_type::<dyn Codec, _>("json-codec", None, 0, |_, _| Ok(Arc::new(JsonCodec)));
        Ok(())
    },
};

static SCAN_YAML: RegistrationDecl = RegistrationDecl {
    module: "context-tests",
    name: "yaml-codec",
    register: |ctx| {
        ctx.register_type::<dyn Codec, _>("yaml-codec", None, 5, |_, _| Ok(Arc::new(YamlCodec)));
        Ok(())
    },
};

#[test]
fn test_scan_module_applies_declarations() {
    let mut module = Module::empty("context-tests");
    module.push_registration(&SCAN_JSON).push_registration(&SCAN_YAML);

    let ctx = ContextBuilder::new()
        .scan_module(&module, |_| true)
        .unwrap()
        .build();
    assert_eq!(ctx.resolve::<dyn Codec>(None).unwrap().format(), "yaml");
}

#[test]
fn test_scan_module_filter_skips_declarations() {
    let mut module = Module::empty("context-tests");
    module.push_registration(&SCAN_JSON).push_registration(&SCAN_YAML);

    let ctx = ContextBuilder::new()
        .scan_module(&module, |decl| decl.name == "json-codec")
        .unwrap()
        .build();
    assert_eq!(ctx.resolve::<dyn Codec>(None).unwrap().format(), "json");
}
