//! Plugin component port and lifecycle events
//!
//! A plugin is any component the host constructs, tracks through its
//! lifecycle states and dispatches events to. Handler bindings downcast
//! through [`Plugin::as_any`] to reach their concrete receiver.

use std::any::Any;

/// A plugin component instance managed by the host
///
/// Instances are constructed once per host (singleton) and stay alive for
/// the process lifetime; there is no teardown.
pub trait Plugin: Any + Send + Sync {
    /// Plugin name for diagnostics
    fn plugin_name(&self) -> &str;

    /// Upcast for handler bindings that need the concrete type
    fn as_any(&self) -> &dyn Any;
}

/// Lifecycle state of a plugin inside the host
///
/// `Failed` is terminal and reachable from any transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginState {
    /// Descriptor built, instance not yet constructed
    Discovered,
    /// Instance constructed and registered with the dependency context
    Constructed,
    /// Initialisation broadcast completed, plugin live for the process
    Active,
    /// A construction or handler failure stopped this plugin
    Failed,
}

impl std::fmt::Display for PluginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PluginState::Discovered => "discovered",
            PluginState::Constructed => "constructed",
            PluginState::Active => "active",
            PluginState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Kind of a host-level lifecycle event
///
/// Kinds are compared by their static label; plugins bind handlers per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub &'static str);

impl EventKind {
    /// Raised once per `initialise_on_start` plugin during host startup
    pub const INITIALISE: EventKind = EventKind("initialise");

    /// The static label of this kind
    pub fn label(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// A host-broadcast lifecycle notification
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// What kind of event this is
    pub kind: EventKind,
    /// Structured payload, `Null` when the kind alone carries the meaning
    pub payload: serde_json::Value,
}

impl LifecycleEvent {
    /// Create an event with no payload
    pub fn new(kind: EventKind) -> Self {
        LifecycleEvent {
            kind,
            payload: serde_json::Value::Null,
        }
    }

    /// Create an event with a payload
    pub fn with_payload(kind: EventKind, payload: serde_json::Value) -> Self {
        LifecycleEvent { kind, payload }
    }

    /// The initialise event raised for one starting plugin
    pub fn initialise(plugin: &str) -> Self {
        LifecycleEvent::with_payload(
            EventKind::INITIALISE,
            serde_json::json!({ "plugin": plugin }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_equality() {
        assert_eq!(EventKind::INITIALISE, EventKind("initialise"));
        assert_ne!(EventKind::INITIALISE, EventKind("shutdown"));
    }

    #[test]
    fn test_initialise_event_names_plugin() {
        let event = LifecycleEvent::initialise("storage");
        assert_eq!(event.kind, EventKind::INITIALISE);
        assert_eq!(event.payload["plugin"], "storage");
    }
}
