//! Tests for linkme-backed module collection
//!
//! Declarations registered into the distributed slices from this test crate
//! must surface through `Module::collect`, exactly like declarations linked
//! in from any other crate.

use std::sync::Arc;

use latch_domain::ports::plugin::{Plugin, PluginState};
use latch_host::context::ContextBuilder;
use latch_host::host::{PluginDecl, PluginHost};
use latch_host::module::{Module, RegistrationDecl, PLUGIN_DECLS, REGISTRATION_DECLS};
use linkme::distributed_slice;

#[distributed_slice(REGISTRATION_DECLS)]
static MARKER_DECL: RegistrationDecl = RegistrationDecl {
    module: "module-tests",
    name: "marker",
    register: |ctx| {
        ctx.register_instance::<String>("marker", None, 0, Arc::new("collected".to_string()));
        Ok(())
    },
};

struct NullPlugin;

impl Plugin for NullPlugin {
    fn plugin_name(&self) -> &str {
        "null"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[distributed_slice(PLUGIN_DECLS)]
static NULL_PLUGIN_DECL: PluginDecl = PluginDecl {
    module: "module-tests",
    id: Some("null-plugin"),
    name: "Null",
    initialise_on_start: false,
    requires: &[],
    construct: |_| Ok(Arc::new(NullPlugin)),
    handlers: &[],
};

#[test]
fn test_collect_gathers_this_modules_declarations() {
    let module = Module::collect("module-tests");
    assert_eq!(module.registrations().len(), 1);
    assert_eq!(module.plugins().len(), 1);
    assert_eq!(module.plugins()[0].ident(), "null-plugin");
}

#[test]
fn test_collect_ignores_other_modules() {
    let module = Module::collect("some-other-module");
    assert!(module.registrations().is_empty());
    assert!(module.plugins().is_empty());
}

#[test]
fn test_collected_module_drives_context_and_host() {
    let module = Module::collect("module-tests");
    let ctx = Arc::new(
        ContextBuilder::new()
            .scan_module(&module, |_| true)
            .unwrap()
            .build(),
    );
    assert_eq!(*ctx.resolve::<String>(None).unwrap(), "collected");

    let host = PluginHost::new(ctx);
    host.start(&module).unwrap();
    assert_eq!(host.plugin_state("null-plugin"), Some(PluginState::Active));
}
