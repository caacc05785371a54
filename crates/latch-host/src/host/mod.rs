//! Plugin host
//!
//! Discovers plugin declarations from a module, orders them by their
//! requirement edges, constructs each instance through the dependency
//! context and dispatches lifecycle events to bound handlers.
//!
//! ## Startup algorithm
//!
//! ```text
//! start(module)
//!   1. discovery      module decls ──▶ PluginDescriptor per plugin
//!   2. ordering       requirement graph ──▶ topological order
//!   3. construction   per plugin: construct via context, register instance
//!   4. broadcast      initialise event per flagged plugin, in order
//! ```
//!
//! Each constructed instance is registered with the context before the next
//! plugin is constructed, so later plugins resolve earlier ones through
//! ordinary dependency resolution. A constructor or handler failure aborts
//! startup and names the originating plugin; plugins not yet reached are
//! never initialised.

mod descriptor;
mod graph;

use std::sync::{Arc, RwLock};

use latch_domain::error::{Error, Result};
use latch_domain::ports::plugin::{EventKind, LifecycleEvent, Plugin, PluginState};
use tracing::{debug, info};

use crate::context::{read_lock, write_lock, DependencyContext};
use crate::module::Module;

pub use descriptor::{EventHandlerDecl, PluginDecl, PluginDescriptor, PluginRequirement};

/// One handler bound into the host's dispatch table
///
/// Bindings are appended in construction order during startup, so iterating
/// the table front to back yields the host-defined dispatch order:
/// construction order across plugins, declaration order within one.
#[derive(Clone)]
struct HandlerBinding {
    plugin: String,
    handler: &'static str,
    event: EventKind,
    instance: Arc<dyn Plugin>,
    invoke: fn(&dyn Plugin, &LifecycleEvent) -> Result<()>,
}

/// Lifecycle record for one discovered plugin
struct PluginRecord {
    descriptor: PluginDescriptor,
    state: PluginState,
    instance: Option<Arc<dyn Plugin>>,
}

#[derive(Default)]
struct HostState {
    plugins: Vec<PluginRecord>,
    bindings: Vec<HandlerBinding>,
    started: bool,
}

/// Dependency-ordered plugin lifecycle manager
pub struct PluginHost {
    context: Arc<DependencyContext>,
    state: RwLock<HostState>,
}

impl PluginHost {
    /// Create a host over a dependency context
    pub fn new(context: Arc<DependencyContext>) -> Self {
        PluginHost {
            context,
            state: RwLock::new(HostState::default()),
        }
    }

    /// The context plugins are constructed through
    pub fn context(&self) -> &Arc<DependencyContext> {
        &self.context
    }

    /// Discover, order, construct and initialise a module's plugins
    pub fn start(&self, module: &Module) -> Result<()> {
        {
            let mut state = write_lock(&self.state);
            if state.started {
                return Err(Error::invalid_argument("plugin host already started"));
            }
            state.started = true;
        }
        info!(module = module.name(), "starting plugin host");

        // Discovery
        let descriptors: Vec<PluginDescriptor> = module
            .plugins()
            .iter()
            .copied()
            .map(PluginDescriptor::from_decl)
            .collect();

        // Ordering
        let order = graph::initialisation_order(&descriptors)?;
        debug!(
            order = ?order
                .iter()
                .map(|&index| descriptors[index].ident())
                .collect::<Vec<_>>(),
            "computed plugin initialisation order"
        );

        // Construction
        for &index in &order {
            let descriptor = descriptors[index].clone();
            let ident = descriptor.ident().to_string();
            match (descriptor.decl().construct)(self.context.as_ref()) {
                Ok(instance) => {
                    debug!(plugin = %ident, "constructed plugin");
                    // Available to every later plugin's own resolution.
                    self.context.register_instance::<dyn Plugin>(
                        descriptor.display_name(),
                        Some(&ident),
                        0,
                        instance.clone(),
                    );
                    let mut state = write_lock(&self.state);
                    for handler in descriptor.decl().handlers {
                        state.bindings.push(HandlerBinding {
                            plugin: ident.clone(),
                            handler: handler.name,
                            event: handler.event,
                            instance: instance.clone(),
                            invoke: handler.invoke,
                        });
                    }
                    state.plugins.push(PluginRecord {
                        descriptor,
                        state: PluginState::Constructed,
                        instance: Some(instance),
                    });
                }
                Err(err) => {
                    write_lock(&self.state).plugins.push(PluginRecord {
                        descriptor,
                        state: PluginState::Failed,
                        instance: None,
                    });
                    return Err(Error::construction(ident, err));
                }
            }
        }

        // Initialisation broadcast
        let flagged: Vec<String> = {
            let state = read_lock(&self.state);
            state
                .plugins
                .iter()
                .filter(|record| record.descriptor.initialise_on_start())
                .map(|record| record.descriptor.ident().to_string())
                .collect()
        };
        for ident in flagged {
            self.raise(&LifecycleEvent::initialise(&ident))?;
            self.set_state(&ident, PluginState::Active);
        }

        // Plugins without the start flag are live once the broadcast ran.
        let mut state = write_lock(&self.state);
        for record in &mut state.plugins {
            if record.state == PluginState::Constructed {
                record.state = PluginState::Active;
            }
        }
        info!(plugins = state.plugins.len(), "plugin host started");
        Ok(())
    }

    /// Dispatch a lifecycle event to every interested handler
    ///
    /// Handlers run in the host-defined order; the first failure aborts
    /// dispatch, marks the owning plugin failed and surfaces the cause.
    pub fn raise(&self, event: &LifecycleEvent) -> Result<()> {
        let interested: Vec<HandlerBinding> = read_lock(&self.state)
            .bindings
            .iter()
            .filter(|binding| binding.event == event.kind)
            .cloned()
            .collect();
        for binding in interested {
            debug!(
                plugin = %binding.plugin,
                handler = binding.handler,
                event = %event.kind,
                "dispatching lifecycle event"
            );
            if let Err(err) = (binding.invoke)(binding.instance.as_ref(), event) {
                self.set_state(&binding.plugin, PluginState::Failed);
                return Err(Error::handler(binding.plugin, event.kind.label(), err));
            }
        }
        Ok(())
    }

    /// Instance of a plugin by canonical identifier
    pub fn plugin(&self, ident: &str) -> Option<Arc<dyn Plugin>> {
        read_lock(&self.state)
            .plugins
            .iter()
            .find(|record| record.descriptor.ident() == ident)
            .and_then(|record| record.instance.clone())
    }

    /// Lifecycle state of a plugin by canonical identifier
    pub fn plugin_state(&self, ident: &str) -> Option<PluginState> {
        read_lock(&self.state)
            .plugins
            .iter()
            .find(|record| record.descriptor.ident() == ident)
            .map(|record| record.state)
    }

    /// Canonical identifiers in construction order
    pub fn plugin_idents(&self) -> Vec<String> {
        read_lock(&self.state)
            .plugins
            .iter()
            .map(|record| record.descriptor.ident().to_string())
            .collect()
    }

    fn set_state(&self, ident: &str, state: PluginState) {
        let mut host_state = write_lock(&self.state);
        if let Some(record) = host_state
            .plugins
            .iter_mut()
            .find(|record| record.descriptor.ident() == ident)
        {
            record.state = state;
        }
    }
}

impl std::fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = read_lock(&self.state);
        f.debug_struct("PluginHost")
            .field("started", &state.started)
            .field("plugins", &state.plugins.len())
            .field("bindings", &state.bindings.len())
            .finish()
    }
}
