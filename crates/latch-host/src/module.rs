//! Declaration modules
//!
//! A [`Module`] is a named collection of declarations: contract
//! registrations for the dependency context and plugin descriptors for the
//! host. Declarations are plain static records with function pointers, the
//! same shape as the provider registry entries, and are collected either
//! from the linkme distributed slices or pushed explicitly (tests, embedded
//! hosts).
//!
//! ```ignore
//! #[distributed_slice(REGISTRATION_DECLS)]
//! static CODEC: RegistrationDecl = RegistrationDecl {
//!     module: "core",
//!     name: "json-codec",
//!     register: |ctx| {
//!         ctx.register_type::<dyn Codec, _>("json-codec", None, 0, |_, _| {
//!             Ok(Arc::new(JsonCodec))
//!         });
//!         Ok(())
//!     },
//! };
//!
//! let module = Module::collect("core");
//! let context = ContextBuilder::new().scan_module(&module, |_| true)?.build();
//! ```

use latch_domain::error::Result;
use tracing::debug;

use crate::context::DependencyContext;
use crate::host::PluginDecl;

/// Declarative contract registration applied during a module scan
pub struct RegistrationDecl {
    /// Module this declaration belongs to
    pub module: &'static str,
    /// Declaration name for diagnostics and scan filters
    pub name: &'static str,
    /// Registrar invoked against the context being built
    pub register: fn(&DependencyContext) -> Result<()>,
}

// Auto-collection via linkme distributed slices - declarations submit
// entries at compile time.
#[linkme::distributed_slice]
pub static REGISTRATION_DECLS: [RegistrationDecl] = [..];

#[linkme::distributed_slice]
pub static PLUGIN_DECLS: [PluginDecl] = [..];

/// A named collection of registration and plugin declarations
pub struct Module {
    name: String,
    registrations: Vec<&'static RegistrationDecl>,
    plugins: Vec<&'static PluginDecl>,
}

impl Module {
    /// Create an empty module
    pub fn empty(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            registrations: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Gather every declaration the linkme slices hold for `name`
    pub fn collect(name: &str) -> Self {
        let mut module = Module::empty(name);
        for decl in REGISTRATION_DECLS.iter().filter(|d| d.module == name) {
            module.registrations.push(decl);
        }
        for decl in PLUGIN_DECLS.iter().filter(|d| d.module == name) {
            module.plugins.push(decl);
        }
        debug!(
            module = name,
            registrations = module.registrations.len(),
            plugins = module.plugins.len(),
            "collected module declarations"
        );
        module
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a registration declaration
    pub fn push_registration(&mut self, decl: &'static RegistrationDecl) -> &mut Self {
        self.registrations.push(decl);
        self
    }

    /// Append a plugin declaration
    pub fn push_plugin(&mut self, decl: &'static PluginDecl) -> &mut Self {
        self.plugins.push(decl);
        self
    }

    /// Registration declarations in declaration order
    pub fn registrations(&self) -> &[&'static RegistrationDecl] {
        &self.registrations
    }

    /// Plugin declarations in declaration order
    pub fn plugins(&self) -> &[&'static PluginDecl] {
        &self.plugins
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("registrations", &self.registrations.len())
            .field("plugins", &self.plugins.len())
            .finish()
    }
}
