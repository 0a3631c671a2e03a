//! Node listeners and scene-wide broadcast bindings.
//!
//! Handler lists are cloned before a dispatch, so a handler may bind or
//! unbind (itself included) without affecting the dispatch in progress.

use std::sync::Arc;

use crate::event::{Action, Event, EventOrigin, EventType};
use crate::scene::Scene;
use crate::widget::NodeId;

use super::KeyStroke;

impl Scene {
    /// Binds `action` to each event type in `kinds` on a node.
    pub fn bind(&mut self, id: NodeId, action: Action, kinds: &[EventType]) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        for &kind in kinds {
            node.listeners.entry(kind).or_default().push(Arc::clone(&action));
        }
        true
    }

    /// Removes one binding of `action` from every event type it is bound to.
    ///
    /// Returns the number of bindings removed.
    pub fn unbind(&mut self, id: NodeId, action: &Action) -> usize {
        let Some(node) = self.nodes.get_mut(&id) else {
            return 0;
        };
        let mut removed = 0;
        for list in node.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|a| Arc::ptr_eq(a, action)) {
                list.remove(pos);
                removed += 1;
            }
        }
        node.listeners.retain(|_, list| !list.is_empty());
        removed
    }

    /// Removes one binding of `action` from each event type in `kinds`.
    ///
    /// Returns the number of bindings removed.
    pub fn unbind_from(&mut self, id: NodeId, action: &Action, kinds: &[EventType]) -> usize {
        let Some(node) = self.nodes.get_mut(&id) else {
            return 0;
        };
        let mut removed = 0;
        for kind in kinds {
            let Some(list) = node.listeners.get_mut(kind) else {
                continue;
            };
            if let Some(pos) = list.iter().position(|a| Arc::ptr_eq(a, action)) {
                list.remove(pos);
                removed += 1;
            }
            if list.is_empty() {
                node.listeners.remove(kind);
            }
        }
        removed
    }

    /// Removes every listener from a node.
    pub fn unbind_all(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.listeners.clear();
        }
    }

    /// Removes every listener for the event types in `kinds`.
    pub fn unbind_all_of(&mut self, id: NodeId, kinds: &[EventType]) {
        if let Some(node) = self.nodes.get_mut(&id) {
            for kind in kinds {
                node.listeners.remove(kind);
            }
        }
    }

    /// True if the node has a listener for `kind`.
    #[must_use]
    pub fn has_listener(&self, id: NodeId, kind: EventType) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.has_listener(kind))
    }

    /// Calls `action` directly on a node with an `Action`-origin event.
    pub fn call_action(&mut self, id: NodeId, action: &Action) {
        let event = Event::new(EventOrigin::Action, EventType::Unknown, Some(id)).with_modifiers(self.router.modifiers);
        action(self, &event);
    }

    /// Fires a scene-origin event of type `kind` on an attached node.
    ///
    /// Returns true if a listener received it.
    pub fn fire_event(&mut self, id: NodeId, kind: EventType) -> bool {
        if !self.is_attached(id) {
            return false;
        }
        let event = Event::new(EventOrigin::Gui, kind, Some(id)).with_modifiers(self.router.modifiers);
        self.dispatch(id, &event)
    }

    pub(crate) fn dispatch(&mut self, id: NodeId, event: &Event) -> bool {
        let handlers = match self.nodes.get(&id).and_then(|node| node.listeners.get(&event.kind)) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => return false,
        };
        for handler in handlers {
            handler(self, event);
        }
        true
    }

    /// Binds `action` to an exact keystroke, regardless of focus.
    pub fn bind_broadcast(&mut self, stroke: KeyStroke, action: Action) {
        tracing::debug!(%stroke, "broadcast bound");
        self.broadcast.entry(stroke).or_default().push(action);
    }

    /// Removes one binding of `action` from `stroke`.
    pub fn unbind_broadcast(&mut self, stroke: KeyStroke, action: &Action) -> bool {
        let Some(list) = self.broadcast.get_mut(&stroke) else {
            return false;
        };
        let Some(pos) = list.iter().position(|a| Arc::ptr_eq(a, action)) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.broadcast.remove(&stroke);
        }
        tracing::debug!(%stroke, "broadcast unbound");
        true
    }

    /// Removes every binding of `stroke`.
    pub fn unbind_all_broadcast(&mut self, stroke: KeyStroke) -> bool {
        self.broadcast.remove(&stroke).is_some()
    }

    /// Removes every broadcast binding.
    pub fn clear_broadcast(&mut self) {
        tracing::debug!(strokes = self.broadcast.len(), "broadcast cleared");
        self.broadcast.clear();
    }

    /// True if `stroke` has a broadcast binding.
    #[must_use]
    pub fn has_broadcast(&self, stroke: KeyStroke) -> bool {
        self.broadcast.get(&stroke).is_some_and(|list| !list.is_empty())
    }

    pub(crate) fn dispatch_broadcast(&mut self, stroke: KeyStroke, event: &Event) -> bool {
        let handlers = match self.broadcast.get(&stroke) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => return false,
        };
        for handler in handlers {
            handler(self, event);
        }
        true
    }
}
