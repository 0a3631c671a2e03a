//! Ordered node sets for selecting and bulk-editing nodes.
//!
//! A [`Query`] is an insertion-ordered set of node ids. Derivations (filters,
//! structure walks, set algebra, slicing, sampling) always return a new
//! query and never touch the tree. Bulk mutators apply to every member in
//! order and return the query for chaining. Single-value getters read the
//! first member and return a neutral value (`false`, `0.0` or `None`) when
//! the query is empty.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::animation::{Animation, Easing};
use crate::error::{SceneError, SceneResult};
use crate::event::{Action, EventType};
use crate::layout::{LayoutAttr, Rect};
use crate::scene::Scene;
use crate::style::{Color, SkinId, Theme};
use crate::widget::{Capability, Node, NodeId, WidgetValue};

/// An ordered set of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    nodes: Vec<NodeId>,
    members: HashSet<NodeId>,
}

impl FromIterator<NodeId> for Query {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut query = Self::new();
        for id in iter {
            query.push(id);
        }
        query
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

impl Query {
    /// Empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps ids in a query, dropping duplicates.
    #[must_use]
    pub fn wrap(ids: impl IntoIterator<Item = NodeId>) -> Self {
        ids.into_iter().collect()
    }

    /// Appends a node. Returns false if it is already a member.
    pub fn push(&mut self, id: NodeId) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.nodes.push(id);
        true
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True if `id` is a member.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.members.contains(&id)
    }

    /// Member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Node behind the member at `index`.
    #[must_use]
    pub fn node<'s>(&self, scene: &'s Scene, index: usize) -> Option<&'s Node> {
        self.get(index).and_then(|id| scene.node(id))
    }

    /// First member.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Last member.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Members in order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Members as a slice.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.nodes
    }

    // Slicing

    /// Members in `start..end`, clamped to the query.
    #[must_use]
    pub fn sub_query(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len());
        let start = start.min(end);
        Self::wrap(self.nodes[start..end].iter().copied())
    }

    /// Members whose index `i` satisfies `(i - offset) % modulo == 0`.
    /// A zero modulo selects nothing.
    #[must_use]
    pub fn offset_modulo(&self, offset: i64, modulo: i64) -> Self {
        if modulo == 0 {
            return Self::new();
        }
        self.nodes
            .iter()
            .zip(0_i64..)
            .filter(|&(_, i)| (i - offset) % modulo == 0)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Every `n`-th member, starting with the first.
    #[must_use]
    pub fn every_nth(&self, n: usize) -> Self {
        self.offset_modulo(0, i64::try_from(n).unwrap_or(0))
    }

    /// Members at even indices.
    #[must_use]
    pub fn evens(&self) -> Self {
        self.offset_modulo(0, 2)
    }

    /// Members at odd indices.
    #[must_use]
    pub fn odds(&self) -> Self {
        self.offset_modulo(1, 2)
    }

    // Filters

    /// Members for which `predicate` holds.
    #[must_use]
    pub fn filter(&self, scene: &Scene, predicate: impl Fn(&Scene, NodeId) -> bool) -> Self {
        self.iter().filter(|&id| predicate(scene, id)).collect()
    }

    /// Members carrying every one of `names`.
    #[must_use]
    pub fn by_name(&self, scene: &Scene, names: &[&str]) -> Self {
        self.filter(scene, |scene, id| names.iter().all(|name| scene.has_name(id, name)))
    }

    /// Members with a name fully matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidPattern`] if `pattern` is not a valid
    /// regular expression.
    pub fn by_pattern(&self, scene: &Scene, pattern: &str) -> SceneResult<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| SceneError::InvalidPattern(e.to_string()))?;
        Ok(self.by_regex(scene, &regex))
    }

    /// Members with a name matched by `regex`.
    #[must_use]
    pub fn by_regex(&self, scene: &Scene, regex: &Regex) -> Self {
        self.filter(scene, |scene, id| {
            scene
                .node(id)
                .is_some_and(|node| node.names().any(|name| regex.is_match(name)))
        })
    }

    /// Members whose layout attribute equals `attr` (`None` matches unset).
    #[must_use]
    pub fn by_attr(&self, scene: &Scene, attr: Option<&LayoutAttr>) -> Self {
        self.filter(scene, |scene, id| scene.layout_attr(id) == attr)
    }

    /// Members whose widget offers `capability`.
    #[must_use]
    pub fn with_capability(&self, scene: &Scene, capability: Capability) -> Self {
        self.filter(scene, |scene, id| {
            scene
                .node(id)
                .and_then(Node::widget)
                .is_some_and(|widget| capability.offered_by(widget))
        })
    }

    /// Effectively visible members.
    #[must_use]
    pub fn visible(&self, scene: &Scene) -> Self {
        self.filter(scene, Scene::effective_visible)
    }

    /// Members the viewport reports on screen.
    #[must_use]
    pub fn on_screen(&self, scene: &Scene) -> Self {
        self.filter(scene, Scene::is_on_screen)
    }

    /// Members with queued animations.
    #[must_use]
    pub fn animating(&self, scene: &Scene) -> Self {
        self.filter(scene, Scene::is_animating)
    }

    /// Toggleable members whose state equals `state`.
    #[must_use]
    pub fn having_state(&self, scene: &Scene, state: bool) -> Self {
        self.with_capability(scene, Capability::Toggle)
            .filter(scene, |scene, id| scene.toggle_state(id) == state)
    }

    // Structure

    /// Children of every member.
    #[must_use]
    pub fn children(&self, scene: &Scene) -> Self {
        self.iter().flat_map(|id| scene.children(id).iter().copied()).collect()
    }

    /// Every member followed by its descendants, pre-order.
    #[must_use]
    pub fn descendants(&self, scene: &Scene) -> Self {
        self.iter().flat_map(|id| scene.subtree(id)).collect()
    }

    /// Siblings of every member, excluding the member itself. Parentless
    /// members have none.
    #[must_use]
    pub fn siblings(&self, scene: &Scene) -> Self {
        self.iter()
            .flat_map(|id| {
                scene
                    .parent(id)
                    .map(|parent| scene.children(parent))
                    .unwrap_or_default()
                    .iter()
                    .copied()
                    .filter(move |&sibling| sibling != id)
            })
            .collect()
    }

    /// Parents of every member.
    #[must_use]
    pub fn parents(&self, scene: &Scene) -> Self {
        self.iter().filter_map(|id| scene.parent(id)).collect()
    }

    // Set algebra

    /// Members of either query.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.iter().chain(other.iter()).collect()
    }

    /// Members of both queries.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter().filter(|&id| other.contains(id)).collect()
    }

    /// Members of this query not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.iter().filter(|&id| !other.contains(id)).collect()
    }

    /// Members of exactly one query.
    #[must_use]
    pub fn xor(&self, other: &Self) -> Self {
        self.difference(other).union(&other.difference(self))
    }

    // Sampling

    /// Each member kept independently with probability `chance`.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R, chance: f32) -> Self {
        if chance <= 0.0 {
            return Self::new();
        }
        if chance >= 1.0 {
            return self.clone();
        }
        self.iter().filter(|_| rng.gen::<f32>() < chance).collect()
    }

    /// Exactly `count` members (or all, if fewer), chosen uniformly.
    #[must_use]
    pub fn random_count<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Self {
        if count == 0 {
            return Self::new();
        }
        let count = count.min(self.len());
        let mut shuffled = self.nodes.clone();
        shuffled.shuffle(rng);
        let start = rng.gen_range(0..=shuffled.len() - count);
        Self::wrap(shuffled[start..start + count].iter().copied())
    }

    /// Reorders the query itself. The tree is not affected.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.nodes.shuffle(rng);
    }

    // Bulk mutators

    fn each(&self, scene: &mut Scene, mut f: impl FnMut(&mut Scene, NodeId)) -> &Self {
        for &id in &self.nodes {
            f(scene, id);
        }
        self
    }

    /// Focuses the first member.
    pub fn focus(&self, scene: &mut Scene) -> &Self {
        if let Some(first) = self.first() {
            scene.request_focus(Some(first));
        }
        self
    }

    /// Releases focus held by any member.
    pub fn release_focus(&self, scene: &mut Scene) -> &Self {
        self.each(scene, |scene, id| {
            scene.request_unfocus(id);
        })
    }

    /// Enables or disables every member.
    pub fn set_enabled(&self, scene: &mut Scene, enabled: bool) -> &Self {
        self.each(scene, |scene, id| {
            scene.set_enabled(id, enabled);
        })
    }

    /// Shows or hides every member.
    pub fn set_visible(&self, scene: &mut Scene, visible: bool) -> &Self {
        self.each(scene, |scene, id| {
            scene.set_visible(id, visible);
        })
    }

    /// Sets every member's theme.
    pub fn set_theme(&self, scene: &mut Scene, theme: Option<&Arc<Theme>>) -> &Self {
        self.each(scene, |scene, id| scene.set_theme(id, theme.cloned()))
    }

    /// Sets every member's skin override.
    pub fn set_skin(&self, scene: &mut Scene, skin: Option<SkinId>) -> &Self {
        self.each(scene, |scene, id| scene.set_skin(id, skin))
    }

    /// Sets every member's color.
    pub fn set_color(&self, scene: &mut Scene, color: Color) -> &Self {
        self.each(scene, |scene, id| scene.set_color(id, color))
    }

    /// Sets every member's opacity.
    pub fn set_opacity(&self, scene: &mut Scene, opacity: f32) -> &Self {
        self.each(scene, |scene, id| scene.set_opacity(id, opacity))
    }

    /// Sets every member's bounds.
    pub fn set_bounds(&self, scene: &mut Scene, bounds: Rect) -> &Self {
        self.each(scene, |scene, id| scene.set_bounds(id, bounds))
    }

    /// Moves every member to `(x, y)`.
    pub fn set_position(&self, scene: &mut Scene, x: f32, y: f32) -> &Self {
        self.each(scene, |scene, id| scene.set_position(id, x, y))
    }

    /// Resizes every member.
    pub fn set_dimensions(&self, scene: &mut Scene, width: f32, height: f32) -> &Self {
        self.each(scene, |scene, id| scene.set_dimensions(id, width, height))
    }

    /// Moves every member by an offset.
    pub fn translate(&self, scene: &mut Scene, dx: f32, dy: f32) -> &Self {
        self.each(scene, |scene, id| scene.translate(id, dx, dy))
    }

    /// Grows every member by a size delta.
    pub fn stretch(&self, scene: &mut Scene, dw: f32, dh: f32) -> &Self {
        self.each(scene, |scene, id| scene.stretch(id, dw, dh))
    }

    /// Sets every member's rotation.
    pub fn set_rotation(&self, scene: &mut Scene, degrees: f32) -> &Self {
        self.each(scene, |scene, id| scene.set_rotation(id, degrees))
    }

    /// Rotates every member.
    pub fn rotate(&self, scene: &mut Scene, degrees: f32) -> &Self {
        self.each(scene, |scene, id| scene.rotate(id, degrees))
    }

    /// Adds a name to every member.
    pub fn add_name(&self, scene: &mut Scene, name: &str) -> &Self {
        self.each(scene, |scene, id| scene.add_name(id, name))
    }

    /// Removes a name from every member.
    pub fn remove_name(&self, scene: &mut Scene, name: &str) -> &Self {
        self.each(scene, |scene, id| {
            scene.remove_name(id, name);
        })
    }

    /// Queues the same animations on every member.
    pub fn animate(&self, scene: &mut Scene, duration: f32, animations: &[Animation]) -> &Self {
        self.each(scene, |scene, id| {
            scene.animate(id, duration, animations.to_vec());
        })
    }

    /// Queues the same animations with an explicit easing.
    pub fn animate_eased(&self, scene: &mut Scene, duration: f32, easing: Easing, animations: &[Animation]) -> &Self {
        self.each(scene, |scene, id| {
            scene.animate_eased(id, duration, easing, animations.to_vec());
        })
    }

    /// Queues a pause on every member.
    pub fn animate_delay(&self, scene: &mut Scene, duration: f32) -> &Self {
        self.each(scene, |scene, id| {
            scene.animate_delay(id, duration);
        })
    }

    /// Queues the same animations on every member, each starting `step` ms
    /// after the previous one.
    pub fn animate_staggered(
        &self,
        scene: &mut Scene,
        step: f32,
        duration: f32,
        easing: Easing,
        animations: &[Animation],
    ) -> &Self {
        let mut delay = 0.0;
        for &id in &self.nodes {
            if delay > 0.0 {
                scene.animate_delay(id, delay);
            }
            scene.animate_eased(id, duration, easing, animations.to_vec());
            delay += step;
        }
        self
    }

    /// Aborts every member's animations.
    pub fn abort(&self, scene: &mut Scene) -> &Self {
        self.each(scene, |scene, id| {
            scene.abort(id);
        })
    }

    /// Finishes every member's animations.
    pub fn finish(&self, scene: &mut Scene) -> &Self {
        self.each(scene, Scene::finish)
    }

    /// Binds `action` on every member.
    pub fn bind(&self, scene: &mut Scene, action: &Action, kinds: &[EventType]) -> &Self {
        self.each(scene, |scene, id| {
            scene.bind(id, Arc::clone(action), kinds);
        })
    }

    /// Unbinds `action` from every member.
    pub fn unbind(&self, scene: &mut Scene, action: &Action) -> &Self {
        self.each(scene, |scene, id| {
            scene.unbind(id, action);
        })
    }

    /// Unbinds `action` from the event types in `kinds` on every member.
    pub fn unbind_from(&self, scene: &mut Scene, action: &Action, kinds: &[EventType]) -> &Self {
        self.each(scene, |scene, id| {
            scene.unbind_from(id, action, kinds);
        })
    }

    /// Removes every listener for the event types in `kinds` from every
    /// member.
    pub fn unbind_all_of(&self, scene: &mut Scene, kinds: &[EventType]) -> &Self {
        self.each(scene, |scene, id| scene.unbind_all_of(id, kinds))
    }

    /// Calls `action` on every member.
    pub fn call_action(&self, scene: &mut Scene, action: &Action) -> &Self {
        self.each(scene, |scene, id| scene.call_action(id, action))
    }

    /// Sets the text of every text-holding member.
    pub fn set_text(&self, scene: &mut Scene, text: &str) -> &Self {
        self.each(scene, |scene, id| {
            scene.set_text(id, text);
        })
    }

    /// Offers a value to every value-holding member.
    pub fn set_value(&self, scene: &mut Scene, value: &WidgetValue) -> &Self {
        self.each(scene, |scene, id| {
            scene.set_value(id, value.clone());
        })
    }

    /// Sets the state of every toggleable member.
    pub fn set_state(&self, scene: &mut Scene, state: bool) -> &Self {
        self.each(scene, |scene, id| {
            scene.set_toggle_state(id, state);
        })
    }

    /// Flips every toggleable member.
    pub fn toggle(&self, scene: &mut Scene) -> &Self {
        self.each(scene, |scene, id| {
            scene.toggle(id);
        })
    }

    // Getters (first member)

    /// Local enabled state of the first member.
    #[must_use]
    pub fn is_enabled(&self, scene: &Scene) -> bool {
        self.first().is_some_and(|id| scene.is_enabled(id))
    }

    /// Local visibility of the first member.
    #[must_use]
    pub fn is_visible(&self, scene: &Scene) -> bool {
        self.first().is_some_and(|id| scene.is_visible(id))
    }

    /// Whether the first member holds focus.
    #[must_use]
    pub fn is_focused(&self, scene: &Scene) -> bool {
        self.first().is_some_and(|id| scene.is_focused(id))
    }

    /// Whether the first member is animating.
    #[must_use]
    pub fn is_animating(&self, scene: &Scene) -> bool {
        self.first().is_some_and(|id| scene.is_animating(id))
    }

    /// Toggle state of the first member.
    #[must_use]
    pub fn is_set(&self, scene: &Scene) -> bool {
        self.first().is_some_and(|id| scene.toggle_state(id))
    }

    /// Whether the first member carries `name`.
    #[must_use]
    pub fn has_name(&self, scene: &Scene, name: &str) -> bool {
        self.first().is_some_and(|id| scene.has_name(id, name))
    }

    /// Opacity of the first member.
    #[must_use]
    pub fn opacity(&self, scene: &Scene) -> f32 {
        self.first().map_or(0.0, |id| scene.opacity(id))
    }

    /// Rotation of the first member.
    #[must_use]
    pub fn rotation(&self, scene: &Scene) -> f32 {
        self.first().map_or(0.0, |id| scene.rotation(id))
    }

    /// Bounds of the first member.
    #[must_use]
    pub fn bounds(&self, scene: &Scene) -> Option<Rect> {
        self.first().map(|id| scene.bounds(id))
    }

    /// Scene-space bounds of the first member.
    #[must_use]
    pub fn absolute_bounds(&self, scene: &Scene) -> Option<Rect> {
        self.first().map(|id| scene.absolute_bounds(id))
    }

    /// Color of the first member.
    #[must_use]
    pub fn color(&self, scene: &Scene) -> Option<Color> {
        self.first().map(|id| scene.color(id))
    }

    /// Inherited color of the first member. Channels are read off the
    /// returned [`Color`].
    #[must_use]
    pub fn effective_color(&self, scene: &Scene) -> Option<Color> {
        self.first().map(|id| scene.effective_color(id))
    }

    /// Theme in effect for the first member.
    #[must_use]
    pub fn theme(&self, scene: &Scene) -> Option<Arc<Theme>> {
        self.first().and_then(|id| scene.theme(id).cloned())
    }

    /// Widget theme key of the first member.
    #[must_use]
    pub fn theme_key<'s>(&self, scene: &'s Scene) -> Option<&'s str> {
        self.first().and_then(|id| scene.theme_key(id))
    }

    /// Skin in effect for the first member.
    #[must_use]
    pub fn skin(&self, scene: &Scene) -> Option<SkinId> {
        self.first().and_then(|id| scene.skin(id))
    }

    /// Text of the first member.
    #[must_use]
    pub fn text(&self, scene: &Scene) -> Option<String> {
        self.first().and_then(|id| scene.text(id))
    }

    /// Value of the first member.
    #[must_use]
    pub fn value(&self, scene: &Scene) -> Option<WidgetValue> {
        self.first().and_then(|id| scene.value(id))
    }
}

impl Scene {
    /// Every attached node, pre-order.
    #[must_use]
    pub fn all(&self) -> Query {
        self.iter_dfs().collect()
    }

    /// Wraps ids in a query.
    #[must_use]
    pub fn query(&self, ids: impl IntoIterator<Item = NodeId>) -> Query {
        Query::wrap(ids)
    }

    /// Attached nodes carrying every one of `names`, in pre-order.
    ///
    /// Looks candidates up in the name index, starting from the rarest name.
    #[must_use]
    pub fn by_name(&self, names: &[&str]) -> Query {
        let mut holders = Vec::with_capacity(names.len());
        for name in names {
            match self.names.get(*name) {
                Some(set) => holders.push(set),
                None => return Query::new(),
            }
        }
        holders.sort_by_key(|set| set.len());
        let Some((rarest, rest)) = holders.split_first() else {
            return self.all();
        };
        self.in_tree_order(
            rarest
                .iter()
                .copied()
                .filter(|id| rest.iter().all(|set| set.contains(id))),
        )
    }

    /// Attached nodes with a name fully matching `pattern`, in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidPattern`] for an invalid expression.
    pub fn by_pattern(&self, pattern: &str) -> SceneResult<Query> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| SceneError::InvalidPattern(e.to_string()))?;
        let hits: HashSet<NodeId> = self
            .names
            .iter()
            .filter(|(name, _)| regex.is_match(name))
            .flat_map(|(_, holders)| holders.iter().copied())
            .collect();
        Ok(self.in_tree_order(hits))
    }

    /// Attached members of `ids`, sorted into pre-order.
    fn in_tree_order(&self, ids: impl IntoIterator<Item = NodeId>) -> Query {
        let mut keyed: Vec<(Vec<usize>, NodeId)> = ids
            .into_iter()
            .filter(|&id| self.is_attached(id))
            .map(|id| (self.tree_path(id), id))
            .collect();
        keyed.sort_unstable();
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    /// Attached nodes whose widget offers `capability`.
    #[must_use]
    pub fn by_capability(&self, capability: Capability) -> Query {
        self.all().with_capability(self, capability)
    }

    /// Attached nodes for which `predicate` holds.
    #[must_use]
    pub fn matching(&self, predicate: impl Fn(&Scene, NodeId) -> bool) -> Query {
        self.all().filter(self, predicate)
    }

    /// Attached nodes with queued animations.
    #[must_use]
    pub fn animating(&self) -> Query {
        self.all().animating(self)
    }

    /// Attached nodes the viewport reports on screen.
    #[must_use]
    pub fn on_screen(&self) -> Query {
        self.all().on_screen(self)
    }
}
