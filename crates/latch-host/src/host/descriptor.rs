//! Plugin declarations and descriptors
//!
//! A [`PluginDecl`] is the static record an implementer writes: metadata,
//! requirement edges, a constructor function pointer and explicit handler
//! bindings. The host builds a [`PluginDescriptor`] per declaration at
//! discovery time and drives the lifecycle from there.

use std::sync::Arc;

use latch_domain::error::Result;
use latch_domain::ports::plugin::{EventKind, LifecycleEvent, Plugin};

use crate::context::DependencyContext;

/// Binding of one handler on a plugin to an event kind
///
/// The `invoke` pointer downcasts the plugin through [`Plugin::as_any`] and
/// calls the concrete method. Declaration order inside
/// [`PluginDecl::handlers`] is the dispatch order within one plugin.
pub struct EventHandlerDecl {
    /// Event kind this handler is interested in
    pub event: EventKind,
    /// Handler name for diagnostics
    pub name: &'static str,
    /// Invocation shim calling the concrete method
    pub invoke: fn(&dyn Plugin, &LifecycleEvent) -> Result<()>,
}

/// Directed requirement edge: this plugin needs another initialized first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginRequirement {
    /// Canonical identifier of the required plugin
    pub target: &'static str,
    /// Optional human-readable name for log lines
    pub display_name: Option<&'static str>,
}

impl PluginRequirement {
    /// Requirement on the plugin with the given canonical identifier
    pub const fn on(target: &'static str) -> Self {
        PluginRequirement {
            target,
            display_name: None,
        }
    }
}

/// Static plugin declaration
pub struct PluginDecl {
    /// Module this plugin belongs to
    pub module: &'static str,
    /// Optional stable identifier; unset is legal and means "unnamed"
    pub id: Option<&'static str>,
    /// Display name
    pub name: &'static str,
    /// Whether the host raises the initialise event for this plugin
    pub initialise_on_start: bool,
    /// Plugins that must be initialized before this one
    pub requires: &'static [PluginRequirement],
    /// Constructor run through the dependency context
    pub construct: fn(&DependencyContext) -> Result<Arc<dyn Plugin>>,
    /// Handler bindings in dispatch order
    pub handlers: &'static [EventHandlerDecl],
}

impl PluginDecl {
    /// Canonical identifier: the id when set, else the display name
    ///
    /// Requirement edges match against this value only; display names with
    /// an id set are purely cosmetic.
    pub fn ident(&self) -> &'static str {
        self.id.unwrap_or(self.name)
    }
}

/// Runtime descriptor the host builds per discovered declaration
#[derive(Clone)]
pub struct PluginDescriptor {
    decl: &'static PluginDecl,
}

impl PluginDescriptor {
    /// Build the descriptor for a declaration
    pub fn from_decl(decl: &'static PluginDecl) -> Self {
        PluginDescriptor { decl }
    }

    /// Canonical identifier used for requirement matching
    pub fn ident(&self) -> &'static str {
        self.decl.ident()
    }

    /// Display name for log lines and error text
    pub fn display_name(&self) -> &'static str {
        self.decl.name
    }

    /// Whether the initialise event is raised for this plugin
    pub fn initialise_on_start(&self) -> bool {
        self.decl.initialise_on_start
    }

    /// Requirement edges
    pub fn requirements(&self) -> &'static [PluginRequirement] {
        self.decl.requires
    }

    pub(crate) fn decl(&self) -> &'static PluginDecl {
        self.decl
    }
}

impl std::fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("ident", &self.ident())
            .field("name", &self.display_name())
            .field("initialise_on_start", &self.initialise_on_start())
            .field("requires", &self.requirements())
            .finish()
    }
}
