//! Visibility, color, theme and widget-state operations.
//!
//! ## Inheritance
//!
//! | value     | effective                                                  |
//! |-----------|------------------------------------------------------------|
//! | opacity   | local × parent effective                                   |
//! | color rgb | local × parent effective, unless parent has `COLOR_NOT_INHERITED` |
//! | alpha     | local × effective opacity × parent effective alpha (same rule) |
//! | visible   | local, local opacity > 0, parent effective visible         |
//! | enabled   | local and parent effective enabled                         |
//! | inert     | local only                                                 |
//!
//! A node that holds focus and stops being able to hold it (hidden, disabled
//! or inert, directly or through an ancestor) loses focus immediately.

use std::sync::Arc;

use crate::event::EventType;
use crate::scene::Scene;
use crate::style::{Color, ScaleMode, SkinId, Theme};

use super::{NodeFlags, NodeId, WidgetValue};

impl Scene {
    fn flag(&self, id: NodeId, flag: u32) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.flags.has(flag))
    }

    /// Sets a local flag; on an actual change releases focus if needed and
    /// fires `event` (when given) on attached nodes.
    fn change_flag(&mut self, id: NodeId, flag: u32, on: bool, event: Option<EventType>) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if !node.flags.assign(flag, on) {
            return false;
        }
        self.release_focus_if_unusable(id);
        if let Some(kind) = event {
            self.fire_event(id, kind);
        }
        true
    }

    /// Local visibility.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.flag(id, NodeFlags::VISIBLE)
    }

    /// Shows or hides the node. Fires `ChangeVisibleState` on change.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> bool {
        self.change_flag(id, NodeFlags::VISIBLE, visible, Some(EventType::ChangeVisibleState))
    }

    /// Local enabled state.
    #[must_use]
    pub fn is_enabled(&self, id: NodeId) -> bool {
        self.flag(id, NodeFlags::ENABLED)
    }

    /// Enables or disables the node. Fires `ChangeEnableState` on change.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> bool {
        self.change_flag(id, NodeFlags::ENABLED, enabled, Some(EventType::ChangeEnableState))
    }

    /// Whether the node is ignored by hit testing and focus.
    #[must_use]
    pub fn is_inert(&self, id: NodeId) -> bool {
        self.flag(id, NodeFlags::INERT)
    }

    /// Makes the node inert (or not). Not inherited by children.
    pub fn set_inert(&mut self, id: NodeId, inert: bool) -> bool {
        self.change_flag(id, NodeFlags::INERT, inert, None)
    }

    /// Whether children ignore this node's color.
    #[must_use]
    pub fn is_color_not_inherited(&self, id: NodeId) -> bool {
        self.flag(id, NodeFlags::COLOR_NOT_INHERITED)
    }

    /// Stops (or restarts) children from inheriting this node's color.
    pub fn set_color_not_inherited(&mut self, id: NodeId, value: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flags.assign(NodeFlags::COLOR_NOT_INHERITED, value);
        }
    }

    /// Local opacity.
    #[must_use]
    pub fn opacity(&self, id: NodeId) -> f32 {
        self.nodes.get(&id).map_or(0.0, |node| node.opacity)
    }

    /// Sets the local opacity. Not range-checked.
    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.opacity = opacity;
        self.release_focus_if_unusable(id);
    }

    /// Local color.
    #[must_use]
    pub fn color(&self, id: NodeId) -> Color {
        self.nodes.get(&id).map_or(Color::TRANSPARENT, |node| node.color)
    }

    /// Sets the local color.
    pub fn set_color(&mut self, id: NodeId, color: Color) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.color = color;
        }
    }

    /// Opacity after multiplying in every ancestor's.
    #[must_use]
    pub fn effective_opacity(&self, id: NodeId) -> f32 {
        let mut opacity = 1.0;
        let mut current = Some(id);
        while let Some(n) = current {
            let Some(node) = self.nodes.get(&n) else {
                break;
            };
            opacity *= node.opacity;
            current = node.parent;
        }
        opacity
    }

    /// Color after inheritance, alpha premultiplied by effective opacity.
    #[must_use]
    pub fn effective_color(&self, id: NodeId) -> Color {
        let Some(node) = self.nodes.get(&id) else {
            return Color::TRANSPARENT;
        };
        let c = node.color;
        let alpha = c.a * self.effective_opacity(id);
        match node.parent.filter(|&p| !self.is_color_not_inherited(p)) {
            Some(parent) => {
                let inherited = self.effective_color(parent);
                c.modulate_rgb(inherited).with_alpha(alpha * inherited.a)
            }
            None => c.with_alpha(alpha),
        }
    }

    /// Visible, non-transparent, and every ancestor visible too.
    #[must_use]
    pub fn effective_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            let Some(node) = self.nodes.get(&n) else {
                return false;
            };
            if !node.flags.has(NodeFlags::VISIBLE) || node.opacity <= 0.0 {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Enabled, and every ancestor enabled too.
    #[must_use]
    pub fn effective_enabled(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            let Some(node) = self.nodes.get(&n) else {
                return false;
            };
            if !node.flags.has(NodeFlags::ENABLED) {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Eligible for hit testing: effectively visible and enabled, not
    /// inert, and painted in the last paint pass.
    #[must_use]
    pub fn is_live(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.paint_order >= 0)
            && !self.is_inert(id)
            && self.effective_visible(id)
            && self.effective_enabled(id)
    }

    /// True if the viewport reports the node's absolute rectangle on screen.
    #[must_use]
    pub fn is_on_screen(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .is_some_and(|node| self.viewport.is_on_screen(&node.absolute))
    }

    /// Skin scale mode.
    #[must_use]
    pub fn scale_mode(&self, id: NodeId) -> ScaleMode {
        self.nodes.get(&id).map_or(ScaleMode::Normal, |node| node.scale_mode)
    }

    /// Sets the skin scale mode.
    pub fn set_scale_mode(&mut self, id: NodeId, mode: ScaleMode) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.scale_mode = mode;
        }
    }

    /// Sets or clears the node's own theme.
    pub fn set_theme(&mut self, id: NodeId, theme: Option<Arc<Theme>>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.theme = theme;
        }
    }

    /// Theme in effect: the node's, else the nearest ancestor's, else the
    /// scene's.
    #[must_use]
    pub fn theme(&self, id: NodeId) -> Option<&Arc<Theme>> {
        let mut current = Some(id);
        while let Some(n) = current {
            let node = self.nodes.get(&n)?;
            if let Some(theme) = &node.theme {
                return Some(theme);
            }
            current = node.parent;
        }
        self.theme.as_ref()
    }

    /// Theme key of the node's widget; `None` for plain nodes.
    #[must_use]
    pub fn theme_key(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id)?.widget.as_ref().map(|w| w.theme_key())
    }

    /// Sets or clears the skin override.
    pub fn set_skin(&mut self, id: NodeId, skin: Option<SkinId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.skin = skin;
        }
    }

    /// Skin in effect: the override, else the theme's skin for the widget's
    /// theme key.
    #[must_use]
    pub fn skin(&self, id: NodeId) -> Option<SkinId> {
        let node = self.nodes.get(&id)?;
        node.skin.or_else(|| {
            let key = node.widget.as_ref()?.theme_key();
            self.theme(id)?.skin(key)
        })
    }

    /// Adds a selection name.
    pub fn add_name(&mut self, id: NodeId, name: impl Into<String>) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let name = name.into();
        if node.names.insert(name.clone()) {
            self.names.entry(name).or_default().insert(id);
        }
    }

    /// Removes a selection name.
    pub fn remove_name(&mut self, id: NodeId, name: &str) -> bool {
        if !self.nodes.get_mut(&id).is_some_and(|node| node.names.remove(name)) {
            return false;
        }
        self.unindex_name(id, name);
        true
    }

    pub(crate) fn unindex_name(&mut self, id: NodeId, name: &str) {
        if let Some(holders) = self.names.get_mut(name) {
            holders.remove(&id);
            if holders.is_empty() {
                self.names.remove(name);
            }
        }
    }

    /// True if the node carries `name`.
    #[must_use]
    pub fn has_name(&self, id: NodeId, name: &str) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.has_name(name))
    }

    /// Toggle state, `false` for widgets that cannot toggle.
    #[must_use]
    pub fn toggle_state(&self, id: NodeId) -> bool {
        self.nodes
            .get(&id)
            .and_then(|node| node.widget.as_deref())
            .and_then(|w| w.as_toggleable())
            .is_some_and(|t| t.is_set())
    }

    /// Sets the toggle state, firing `ValueChange` if it changed.
    ///
    /// Returns false if the node's widget cannot toggle.
    pub fn set_toggle_state(&mut self, id: NodeId, state: bool) -> bool {
        let toggle = self
            .nodes
            .get_mut(&id)
            .and_then(|node| node.widget.as_deref_mut())
            .and_then(|w| w.as_toggleable_mut());
        let Some(toggle) = toggle else {
            return false;
        };
        let changed = toggle.is_set() != state;
        toggle.set_state(state);
        if changed {
            self.fire_event(id, EventType::ValueChange);
        }
        true
    }

    /// Flips the toggle state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        let state = self.toggle_state(id);
        self.set_toggle_state(id, !state)
    }

    /// Value of a value-holding widget.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<WidgetValue> {
        self.nodes
            .get(&id)
            .and_then(|node| node.widget.as_deref())
            .and_then(|w| w.as_value_holder())
            .map(|v| v.value())
    }

    /// Offers a value to a value-holding widget, firing `ValueChange` if it
    /// was accepted and differs from the previous one.
    pub fn set_value(&mut self, id: NodeId, value: WidgetValue) -> bool {
        let holder = self
            .nodes
            .get_mut(&id)
            .and_then(|node| node.widget.as_deref_mut())
            .and_then(|w| w.as_value_holder_mut());
        let Some(holder) = holder else {
            return false;
        };
        let before = holder.value();
        if !holder.set_value(value) {
            return false;
        }
        let changed = holder.value() != before;
        if changed {
            self.fire_event(id, EventType::ValueChange);
        }
        true
    }

    /// Text of a text-holding widget.
    #[must_use]
    pub fn text(&self, id: NodeId) -> Option<String> {
        self.nodes
            .get(&id)
            .and_then(|node| node.widget.as_deref())
            .and_then(|w| w.as_text_holder())
            .map(|t| t.text().to_owned())
    }

    /// Replaces the text of a text-holding widget.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let holder = self
            .nodes
            .get_mut(&id)
            .and_then(|node| node.widget.as_deref_mut())
            .and_then(|w| w.as_text_holder_mut());
        match holder {
            Some(holder) => {
                holder.set_text(text.into());
                true
            }
            None => false,
        }
    }

    /// One-line description of a node, as used by [`Scene::dump`].
    #[must_use]
    pub fn describe(&self, id: NodeId) -> String {
        self.nodes.get(&id).map(ToString::to_string).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::event::{action, EventType};
    use crate::paint::CanvasViewport;
    use crate::scene::Scene;
    use crate::style::{Color, SkinId, Theme};
    use crate::widget::{Toggleable, Widget};

    struct Check {
        on: bool,
    }

    impl Toggleable for Check {
        fn is_set(&self) -> bool {
            self.on
        }
        fn set_state(&mut self, state: bool) {
            self.on = state;
        }
    }

    impl Widget for Check {
        fn theme_key(&self) -> &str {
            "check"
        }
        fn as_toggleable(&self) -> Option<&dyn Toggleable> {
            Some(self)
        }
        fn as_toggleable_mut(&mut self) -> Option<&mut dyn Toggleable> {
            Some(self)
        }
    }

    fn scene() -> Scene {
        Scene::new(CanvasViewport::new(640.0, 480.0))
    }

    #[test]
    fn test_color_and_opacity_inheritance() {
        let mut scene = scene();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        scene.set_color(parent, Color::rgba(0.5, 0.5, 0.5, 1.0));
        scene.set_opacity(child, 0.5);

        let c = scene.effective_color(child);
        assert!((c.r - 0.5).abs() < 1e-6);
        assert!((c.g - 0.5).abs() < 1e-6);
        assert!((c.b - 0.5).abs() < 1e-6);
        assert!((c.a - 0.5).abs() < 1e-6);

        scene.set_color_not_inherited(parent, true);
        let c = scene.effective_color(child);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_visibility_inherits() {
        let mut scene = scene();
        let parent = scene.create_node();
        let child = scene.create_node();
        scene.add_child(parent, child);
        assert!(scene.effective_visible(child));
        scene.set_opacity(parent, 0.0);
        assert!(!scene.effective_visible(child));
        scene.set_opacity(parent, 1.0);
        scene.set_enabled(parent, false);
        assert!(!scene.effective_enabled(child));
        assert!(scene.is_enabled(child));
        scene.set_inert(parent, true);
        assert!(!scene.is_inert(child));
    }

    #[test]
    fn test_visible_event_is_edge_triggered() {
        let mut scene = scene();
        let node = scene.create_node();
        scene.add_root(node);
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        scene.bind(
            node,
            action(move |_, _| *counter.lock() += 1),
            &[EventType::ChangeVisibleState],
        );

        assert!(!scene.set_visible(node, true));
        assert!(scene.set_visible(node, false));
        assert!(!scene.set_visible(node, false));
        assert!(scene.set_visible(node, true));
        assert_eq!(*fired.lock(), 2);
    }

    #[test]
    fn test_theme_and_skin_resolution() {
        let mut scene = scene();
        let panel = scene.create_node();
        let check = scene.create_widget(Check { on: false });
        scene.add_child(panel, check);

        scene.set_scene_theme(Some(Arc::new(Theme::new("base").with_skin("check", SkinId(1)))));
        assert_eq!(scene.skin(check), Some(SkinId(1)));

        scene.set_theme(panel, Some(Arc::new(Theme::new("panel").with_skin("check", SkinId(2)))));
        assert_eq!(scene.theme(check).map(|t| t.name().to_owned()), Some("panel".to_owned()));
        assert_eq!(scene.skin(check), Some(SkinId(2)));

        scene.set_skin(check, Some(SkinId(9)));
        assert_eq!(scene.skin(check), Some(SkinId(9)));
        assert_eq!(scene.skin(panel), None);
    }

    #[test]
    fn test_toggle_fires_value_change() {
        let mut scene = scene();
        let check = scene.create_widget(Check { on: false });
        let plain = scene.create_node();
        scene.add_root(check);
        let fired = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&fired);
        scene.bind(check, action(move |_, _| *counter.lock() += 1), &[EventType::ValueChange]);

        assert!(scene.toggle(check));
        assert!(scene.toggle_state(check));
        assert!(scene.set_toggle_state(check, true));
        assert_eq!(*fired.lock(), 1);
        assert!(!scene.toggle(plain));
    }

    #[test]
    fn test_names() {
        let mut scene = scene();
        let node = scene.create_node();
        scene.add_name(node, "ok");
        assert!(scene.has_name(node, "ok"));
        assert!(scene.remove_name(node, "ok"));
        assert!(!scene.remove_name(node, "ok"));
    }
}
