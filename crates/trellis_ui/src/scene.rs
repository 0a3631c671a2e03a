//! The scene: node store, router state, animation queues and bindings.
//!
//! ```text
//! ┌──────────────────────────── Scene ────────────────────────────┐
//! │ nodes: NodeId → Node     roots: [NodeId]     theme            │
//! │ names: name → {NodeId}   (every node carrying the name)       │
//! │ router: hover / press / drag / focus / modifiers              │
//! │ broadcast: KeyStroke → [Action]                               │
//! │ animations: NodeId → AnimationQueue   (present while non-empty)│
//! │ viewport: Box<dyn Viewport>                                   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations on the scene are split across modules by concern: tree
//! structure in `widget::tree`, geometry in `widget::geometry`, inherited
//! appearance in `widget::appearance`, routing in `input::router`,
//! animation stepping in `animation::engine` and painting in `paint`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::animation::AnimationQueue;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::event::Action;
use crate::input::{KeyStroke, RouterState};
use crate::paint::Viewport;
use crate::style::Theme;
use crate::widget::{Node, NodeId};

/// A scene shared with other threads.
///
/// The tick thread locks it for routing, animation and painting; another
/// thread may lock it between those phases to add or remove nodes.
pub type SharedScene = Arc<Mutex<Scene>>;

/// A retained-mode UI scene.
pub struct Scene {
    pub(crate) nodes: HashMap<NodeId, Node>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) names: HashMap<String, HashSet<NodeId>>,
    next_id: u64,
    pub(crate) theme: Option<Arc<Theme>>,
    pub(crate) router: RouterState,
    pub(crate) broadcast: HashMap<KeyStroke, Vec<Action>>,
    pub(crate) animations: HashMap<NodeId, AnimationQueue>,
    pub(crate) laying_out: HashSet<NodeId>,
    pub(crate) errors: Vec<SceneError>,
    pub(crate) viewport: Box<dyn Viewport>,
    pub(crate) config: SceneConfig,
}

impl Scene {
    /// Creates a scene with default configuration.
    #[must_use]
    pub fn new(viewport: impl Viewport + 'static) -> Self {
        Self::with_config(viewport, SceneConfig::default())
    }

    /// Creates a scene with the given configuration.
    #[must_use]
    pub fn with_config(viewport: impl Viewport + 'static, config: SceneConfig) -> Self {
        tracing::debug!(
            accepts_input = config.accepts_input,
            animate_during_paint = config.animate_during_paint,
            "scene created"
        );
        Self {
            nodes: HashMap::with_capacity(config.initial_capacity),
            roots: Vec::with_capacity(16),
            names: HashMap::new(),
            next_id: 1,
            theme: None,
            router: RouterState::new(config.accepts_input),
            broadcast: HashMap::with_capacity(config.broadcast_bindings.len()),
            animations: HashMap::new(),
            laying_out: HashSet::new(),
            errors: Vec::new(),
            viewport: Box::new(viewport),
            config,
        }
    }

    /// Wraps the scene for sharing across threads.
    #[must_use]
    pub fn into_shared(self) -> SharedScene {
        Arc::new(Mutex::new(self))
    }

    /// Scene configuration.
    #[must_use]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Turns automatic animation stepping in [`Scene::paint_pass`] on or off.
    pub fn set_animate_during_paint(&mut self, value: bool) {
        self.config.animate_during_paint = value;
    }

    pub(crate) fn allocate_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Returns true if the node exists (attached or not).
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes in the store, attached or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Top-level nodes in paint order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Scene-wide theme.
    #[must_use]
    pub fn scene_theme(&self) -> Option<&Arc<Theme>> {
        self.theme.as_ref()
    }

    /// Sets the scene-wide theme.
    pub fn set_scene_theme(&mut self, theme: Option<Arc<Theme>>) {
        self.theme = theme;
    }

    /// Injected coordinate mapping.
    #[must_use]
    pub fn viewport(&self) -> &dyn Viewport {
        self.viewport.as_ref()
    }

    /// Replaces the coordinate mapping.
    pub fn set_viewport(&mut self, viewport: impl Viewport + 'static) {
        self.viewport = Box::new(viewport);
    }

    /// Drains errors reported since the last call.
    pub fn take_errors(&mut self) -> Vec<SceneError> {
        std::mem::take(&mut self.errors)
    }

    pub(crate) fn report(&mut self, error: SceneError) {
        tracing::error!(%error, "scene error");
        self.errors.push(error);
    }

    /// Binds `action` to every keystroke the configuration maps to `command`.
    ///
    /// Returns the number of bindings made.
    pub fn bind_command(&mut self, command: &str, action: &Action) -> usize {
        let strokes: Vec<KeyStroke> = self
            .config
            .broadcast_bindings
            .iter()
            .filter(|(_, name)| name.as_str() == command)
            .filter_map(|(descriptor, _)| KeyStroke::parse(descriptor).ok())
            .collect();
        for stroke in &strokes {
            self.bind_broadcast(*stroke, action.clone());
        }
        tracing::debug!(command, bindings = strokes.len(), "command bound");
        strokes.len()
    }

    /// Renders the attached tree, one node per line, indented by depth.
    #[must_use]
    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.iter_dfs() {
            if let Some(node) = self.nodes.get(&id) {
                let depth = self.generation(id);
                writeln!(f, "{:indent$}{node}", "", indent = depth * 2)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .field("router", &self.router)
            .field("animating", &self.animations.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::CanvasViewport;
    use crate::layout::Rect;

    #[test]
    fn test_dump_indents_children() {
        let mut scene = Scene::new(CanvasViewport::new(100.0, 100.0));
        let root = scene.create_node();
        let child = scene.create_node();
        scene.add_root(root);
        scene.add_child(root, child);
        scene.add_name(child, "ok");
        scene.set_bounds(child, Rect::new(1.0, 2.0, 3.0, 4.0));

        let dump = scene.dump();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("node #1 (UNNAMED)"));
        assert!(lines[1].starts_with("  node #2 [ok] R[1.000, 2.000, 3.000, 4.000]"));
    }

    #[test]
    fn test_shared_scene_is_lockable() {
        let shared = Scene::new(CanvasViewport::new(10.0, 10.0)).into_shared();
        let id = shared.lock().create_node();
        assert!(shared.lock().contains(id));
    }

    #[test]
    fn test_take_errors_drains() {
        let mut scene = Scene::new(CanvasViewport::new(10.0, 10.0));
        scene.report(SceneError::InvalidConfig("x".into()));
        assert_eq!(scene.take_errors().len(), 1);
        assert!(scene.take_errors().is_empty());
    }
}
