//! Widget behavior and optional capabilities.
//!
//! Concrete widgets (checkboxes, sliders, text fields) live outside this
//! crate and plug into a node through [`Widget`]. Queries that only make
//! sense for some widgets ask for a capability instead of inspecting the
//! concrete type.

/// Handle to a renderer-owned mesh or visual description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId(pub u64);

/// A value held by a [`ValueHolder`].
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetValue {
    /// Boolean state.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// Text value.
    Text(String),
}

/// Behavior attached to a node.
pub trait Widget: Send + Sync {
    /// Key used to look up this widget's skin in a theme.
    fn theme_key(&self) -> &str;

    /// Mesh or visual handle for the renderer.
    fn visual(&self) -> Option<VisualId> {
        None
    }

    /// Toggle capability.
    fn as_toggleable(&self) -> Option<&dyn Toggleable> {
        None
    }

    /// Mutable toggle capability.
    fn as_toggleable_mut(&mut self) -> Option<&mut dyn Toggleable> {
        None
    }

    /// Value capability.
    fn as_value_holder(&self) -> Option<&dyn ValueHolder> {
        None
    }

    /// Mutable value capability.
    fn as_value_holder_mut(&mut self) -> Option<&mut dyn ValueHolder> {
        None
    }

    /// Text capability.
    fn as_text_holder(&self) -> Option<&dyn TextHolder> {
        None
    }

    /// Mutable text capability.
    fn as_text_holder_mut(&mut self) -> Option<&mut dyn TextHolder> {
        None
    }
}

/// A widget with an on/off state.
pub trait Toggleable {
    /// Current state.
    fn is_set(&self) -> bool;

    /// Sets the state.
    fn set_state(&mut self, state: bool);

    /// Flips the state.
    fn toggle(&mut self) {
        let state = self.is_set();
        self.set_state(!state);
    }
}

/// A widget holding an editable value.
pub trait ValueHolder {
    /// Current value.
    fn value(&self) -> WidgetValue;

    /// Replaces the value. Returns false if the widget rejected it.
    fn set_value(&mut self, value: WidgetValue) -> bool;
}

/// A widget displaying text.
pub trait TextHolder {
    /// Current text.
    fn text(&self) -> &str;

    /// Replaces the text.
    fn set_text(&mut self, text: String);
}

/// Widget capabilities a query can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// [`Toggleable`].
    Toggle,
    /// [`ValueHolder`].
    Value,
    /// [`TextHolder`].
    Text,
}

impl Capability {
    /// Returns true if `widget` offers this capability.
    #[must_use]
    pub fn offered_by(self, widget: &dyn Widget) -> bool {
        match self {
            Self::Toggle => widget.as_toggleable().is_some(),
            Self::Value => widget.as_value_holder().is_some(),
            Self::Text => widget.as_text_holder().is_some(),
        }
    }
}
