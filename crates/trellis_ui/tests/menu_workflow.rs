//! # Menu Workflow Tests
//!
//! Drives a small options menu the way an application would: configuration
//! from TOML, widgets with capabilities, groups, queries and the paint pass.
//!
//! Run with: cargo test --package trellis_ui --test menu_workflow

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use trellis_ui::{
    action, Animation, CanvasViewport, Capability, Direction, Easing, EventType, FocusOrderGroup,
    KeyCode, MouseButton, NodeId, Point, Rect, Scene, SceneConfig, TextHolder, ToggleGroup,
    Toggleable, Widget,
};

// ============================================================================
// FIXTURES
// ============================================================================

struct OptionButton {
    label: String,
    on: bool,
}

impl Toggleable for OptionButton {
    fn is_set(&self) -> bool {
        self.on
    }

    fn set_state(&mut self, state: bool) {
        self.on = state;
    }
}

impl TextHolder for OptionButton {
    fn text(&self) -> &str {
        &self.label
    }

    fn set_text(&mut self, text: String) {
        self.label = text;
    }
}

impl Widget for OptionButton {
    fn theme_key(&self) -> &str {
        "option"
    }

    fn as_toggleable(&self) -> Option<&dyn Toggleable> {
        Some(self)
    }

    fn as_toggleable_mut(&mut self) -> Option<&mut dyn Toggleable> {
        Some(self)
    }

    fn as_text_holder(&self) -> Option<&dyn TextHolder> {
        Some(self)
    }

    fn as_text_holder_mut(&mut self) -> Option<&mut dyn TextHolder> {
        Some(self)
    }
}

const CONFIG: &str = r#"
default_easing = "cubic_out"

[broadcast_bindings]
"ctrl+s" = "save"
"escape" = "close"
"pad start" = "close"
"#;

/// A panel with three stacked option buttons.
fn menu() -> (Scene, NodeId, Vec<NodeId>) {
    let config = SceneConfig::from_toml_str(CONFIG).expect("valid config");
    let mut scene = Scene::with_config(CanvasViewport::new(400.0, 300.0), config);

    let panel = scene.create_node();
    scene.add_root(panel);
    scene.add_name(panel, "panel");
    scene.set_layout(
        panel,
        Some(Arc::new(|scene: &mut Scene, _: NodeId, child: NodeId, index: usize, _: usize| {
            #[allow(clippy::cast_precision_loss)]
            let y = 10.0 + 30.0 * index as f32;
            scene.set_bounds(child, Rect::new(10.0, y, 180.0, 24.0));
        })),
    );

    let options: Vec<NodeId> = ["Sound", "Music", "Subtitles"]
        .iter()
        .map(|label| {
            let node = scene.create_widget(OptionButton {
                label: (*label).to_string(),
                on: false,
            });
            scene.add_child(panel, node);
            scene.add_name(node, "option");
            scene.add_name(node, label.to_lowercase());
            node
        })
        .collect();

    scene.set_bounds(panel, Rect::new(100.0, 50.0, 200.0, 120.0));
    (scene, panel, options)
}

// ============================================================================
// LAYOUT & QUERIES
// ============================================================================

/// Test: the panel layout stacks options and queries find them.
#[test]
fn layout_and_queries() {
    let (scene, panel, options) = menu();

    assert_eq!(scene.absolute_bounds(options[1]), Rect::new(110.0, 90.0, 180.0, 24.0));
    assert_eq!(scene.by_name(&["option"]).ids(), options.as_slice());
    assert_eq!(scene.by_name(&["option", "music"]).ids(), &[options[1]]);
    assert_eq!(scene.by_pattern("s.*").expect("valid pattern").ids(), &[options[0], options[2]]);
    assert_eq!(scene.by_capability(Capability::Text).len(), 3);
    assert_eq!(scene.query([panel]).children(&scene).ids(), options.as_slice());
    assert_eq!(scene.query([options[0]]).text(&scene).as_deref(), Some("Sound"));
}

/// Test: bulk edits through a query and first-member getters.
#[test]
fn bulk_edits() {
    let (mut scene, _, options) = menu();
    let all = scene.by_name(&["option"]);

    all.set_state(&mut scene, true).set_text(&mut scene, "On");
    assert!(options.iter().all(|&o| scene.toggle_state(o)));
    assert_eq!(all.having_state(&scene, true).len(), 3);
    assert_eq!(all.text(&scene).as_deref(), Some("On"));

    all.odds().set_visible(&mut scene, false);
    assert_eq!(all.visible(&scene).ids(), &[options[0], options[2]]);
}

// ============================================================================
// GROUPS
// ============================================================================

/// Test: options behave as a radio set and arrow keys walk the focus.
#[test]
fn groups_drive_focus_and_selection() {
    let (mut scene, _, options) = menu();
    FocusOrderGroup::bind(&mut scene, Direction::Vertical, false, &options);
    let radio = ToggleGroup::bind(&mut scene, &options);

    scene.request_focus(Some(options[0]));
    scene.key_press(KeyCode::DOWN);
    scene.key_press(KeyCode::DOWN);
    assert_eq!(scene.focused(), Some(options[2]));
    scene.key_press(KeyCode::DOWN);
    assert_eq!(scene.focused(), Some(options[2]));

    scene.set_toggle_state(options[0], true);
    scene.set_toggle_state(options[1], true);
    assert_eq!(radio.current(), Some(options[1]));
    assert!(!scene.toggle_state(options[0]));
}

// ============================================================================
// CONFIGURED COMMANDS
// ============================================================================

/// Test: commands from the config fire for every bound keystroke.
#[test]
fn configured_commands() {
    let (mut scene, panel, _) = menu();
    let close = action(move |scene: &mut Scene, _| {
        scene.set_visible(panel, false);
    });
    assert_eq!(scene.bind_command("close", &close), 2);
    assert_eq!(scene.bind_command("missing", &close), 0);

    assert!(scene.key_press(KeyCode::ESCAPE));
    assert!(!scene.is_visible(panel));

    scene.set_visible(panel, true);
    assert!(scene.gamepad_press(0, 7));
    assert!(!scene.is_visible(panel));
}

/// Test: a modified key only matches the binding with that modifier.
#[test]
fn modifier_bindings() {
    let (mut scene, _, _) = menu();
    let saves = Arc::new(Mutex::new(0_u32));
    let sink = Arc::clone(&saves);
    scene.bind_command("save", &action(move |_, _| *sink.lock() += 1));

    assert!(!scene.key_press(KeyCode::S));
    scene.key_press(KeyCode::CONTROL);
    assert!(scene.key_press(KeyCode::S));
    scene.key_release(KeyCode::CONTROL);
    assert_eq!(*saves.lock(), 1);
}

// ============================================================================
// PAINT & POINTER
// ============================================================================

/// Test: the paint pass orders the tree and feeds hover tracking.
#[test]
fn paint_pass_and_click() {
    let (mut scene, panel, options) = menu();
    let clicks = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&clicks);
    for &option in &options {
        let sink = Arc::clone(&sink);
        scene.bind(option, action(move |_, event| sink.lock().extend(event.target)), &[EventType::MouseClick]);
    }

    let items = scene.paint_pass(16.0);
    assert_eq!(items.len(), 4);
    assert_eq!(items[0].node_id(), panel);

    scene.pointer_move(Point::new(150.0, 100.0), Point::ZERO);
    assert_eq!(scene.hovered(), Some(options[1]));
    scene.pointer_press(MouseButton::Left);
    scene.pointer_release(MouseButton::Left);
    assert_eq!(*clicks.lock(), vec![options[1]]);

    scene.pointer_move(Point::new(5.0, 5.0), Point::ZERO);
    assert_eq!(scene.hovered(), None);
}

/// Test: a staggered fade runs member by member and finish settles it.
#[test]
fn staggered_fade_out() {
    let (mut scene, _, options) = menu();
    let all = scene.by_name(&["option"]);
    all.animate_staggered(&mut scene, 100.0, 100.0, Easing::Linear, &[Animation::opacity(0.0)]);

    scene.update_animations(150.0);
    assert!(scene.opacity(options[0]).abs() < 1e-4);
    assert!((scene.opacity(options[1]) - 0.5).abs() < 1e-4);
    assert!((scene.opacity(options[2]) - 1.0).abs() < 1e-4);

    all.finish(&mut scene);
    assert!(scene.animating().is_empty());
    assert!(all.iter().all(|o| scene.opacity(o).abs() < 1e-4));
}

/// Test: another thread can add nodes between ticks.
#[test]
fn shared_scene_across_threads() {
    let (scene, panel, _) = menu();
    let shared = scene.into_shared();

    let worker = {
        let shared = Arc::clone(&shared);
        thread::spawn(move || {
            let mut scene = shared.lock();
            let extra = scene.create_node();
            scene.add_child(panel, extra)
        })
    };
    assert!(worker.join().expect("worker finished"));

    let mut scene = shared.lock();
    assert_eq!(scene.children(panel).len(), 4);
    assert_eq!(scene.paint_pass(16.0).len(), 5);
}
