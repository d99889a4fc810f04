//! The host's table of renderable widget implementations.

use std::collections::HashMap;

/// Append-only mapping from component name to the host's renderable type.
///
/// Populated once at bootstrap (built-ins plus host-supplied extensions)
/// and read for the rest of the process lifetime; there is no
/// unregistration path. The registry is constructed explicitly and handed
/// to consumers rather than living as ambient global state, so every test
/// gets a fresh one.
#[derive(Debug, Clone)]
pub struct WidgetRegistry<C> {
    components: HashMap<String, C>,
    /// First-registration order, backing `names()`.
    order: Vec<String>,
}

impl<C> Default for WidgetRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> WidgetRegistry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            components: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registers one component.
    ///
    /// Re-registering a name replaces the implementation (last write wins)
    /// without changing its position in [`WidgetRegistry::names`].
    pub fn register(&mut self, name: impl Into<String>, component: C) {
        let name = name.into();
        if !self.components.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.components.insert(name, component);
    }

    /// Bulk registration; last write wins on name collisions.
    pub fn register_many<I, N>(&mut self, components: I)
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
    {
        for (name, component) in components {
            self.register(name, component);
        }
    }

    /// Looks up a component by name.
    pub fn get(&self, name: &str) -> Option<&C> {
        self.components.get(name)
    }

    /// True when a component is registered under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names in first-registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut registry = WidgetRegistry::new();
        registry.register("status-card", "status implementation");

        assert!(registry.has("status-card"));
        assert_eq!(Some(&"status implementation"), registry.get("status-card"));
        assert_eq!(None, registry.get("missing"));
        assert!(!registry.has("missing"));
    }

    #[test]
    fn names_preserve_first_registration_order() {
        let mut registry = WidgetRegistry::new();
        registry.register("zeta", 1);
        registry.register("alpha", 2);
        registry.register("mid", 3);

        assert_eq!(
            vec!["zeta", "alpha", "mid"],
            registry.names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn reregistering_replaces_without_reordering() {
        let mut registry = WidgetRegistry::new();
        registry.register("a", 1);
        registry.register("b", 2);
        registry.register("a", 3);

        assert_eq!(Some(&3), registry.get("a"));
        assert_eq!(vec!["a", "b"], registry.names().collect::<Vec<_>>());
        assert_eq!(2, registry.len());
    }

    #[test]
    fn register_many_applies_last_write_wins() {
        let mut registry = WidgetRegistry::new();
        registry.register_many([("a", 1), ("b", 2), ("a", 3)]);

        assert_eq!(Some(&3), registry.get("a"));
        assert_eq!(Some(&2), registry.get("b"));
        assert_eq!(2, registry.len());
    }

    #[test]
    fn empty_registry_reports_empty() {
        let registry: WidgetRegistry<&str> = WidgetRegistry::new();

        assert!(registry.is_empty());
        assert_eq!(0, registry.names().count());
    }
}
