//! Mock DOM for exercising the web front end without a browser

use std::collections::HashMap;

/// Element IDs shared by the renderer and tests
pub mod ids {
    /// Root container
    pub const ROOT: &str = "calculator";
    /// Display showing the current value
    pub const DISPLAY: &str = "calc-display";
    /// Current mode label
    pub const MODE: &str = "calc-mode";
    /// History list
    pub const HISTORY: &str = "calc-history";
    /// Toast area for notifications
    pub const TOAST: &str = "calc-toast";
    /// Keypad container
    pub const KEYPAD: &str = "calc-keypad";
    /// Copy display button
    pub const COPY: &str = "btn-copy";
    /// Clear history button
    pub const CLEAR_HISTORY: &str = "btn-clear-history";
    /// Theme toggle
    pub const THEME: &str = "btn-theme";
    /// Mode toggle
    pub const MODE_TOGGLE: &str = "btn-mode";

    /// ID of the history row at `index` (0 = newest)
    #[must_use]
    pub fn history_item(index: usize) -> String {
        format!("history-{index}")
    }
}

/// A DOM element
#[derive(Debug, Clone, PartialEq)]
pub struct DomElement {
    /// Element ID
    pub id: String,
    /// Tag name
    pub tag: String,
    /// Text content
    pub text_content: String,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Child elements
    pub children: Vec<DomElement>,
}

impl Default for DomElement {
    fn default() -> Self {
        Self::new("div")
    }
}

impl DomElement {
    /// Creates an element with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            id: String::new(),
            tag: tag.to_string(),
            text_content: String::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Sets the text content
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_content = text.to_string();
        self
    }

    /// Adds a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Sets an attribute
    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    /// Adds a class once
    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    /// Removes a class
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Checks for a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Gets an attribute value
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// User interactions the front end reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// Click on an element
    Click {
        /// Clicked element
        element_id: String,
    },
    /// Keyboard key
    KeyPress {
        /// Key name as reported by the browser (`"7"`, `"Enter"`, ...)
        key: String,
    },
}

impl DomEvent {
    /// Creates a click event
    #[must_use]
    pub fn click(element_id: &str) -> Self {
        Self::Click {
            element_id: element_id.to_string(),
        }
    }

    /// Creates a key press event
    #[must_use]
    pub fn key_press(key: &str) -> Self {
        Self::KeyPress {
            key: key.to_string(),
        }
    }
}

/// Flat element registry with an event log
#[derive(Debug, Default)]
pub struct MockDom {
    elements: HashMap<String, DomElement>,
    event_history: Vec<DomEvent>,
}

impl MockDom {
    /// Creates an empty DOM
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the calculator page skeleton (keypad excluded)
    #[must_use]
    pub fn calculator() -> Self {
        let mut dom = Self::new();

        let skeleton = [
            DomElement::new("div")
                .with_id(ids::DISPLAY)
                .with_class("display")
                .with_attr("aria-live", "polite")
                .with_text("0"),
            DomElement::new("span").with_id(ids::MODE).with_class("mode-label"),
            DomElement::new("ul").with_id(ids::HISTORY).with_class("history-list"),
            DomElement::new("div").with_id(ids::TOAST).with_class("toast"),
            DomElement::new("button").with_id(ids::COPY).with_text("Copy"),
            DomElement::new("button")
                .with_id(ids::CLEAR_HISTORY)
                .with_text("Clear history"),
            DomElement::new("button").with_id(ids::THEME).with_text("Theme"),
            DomElement::new("button").with_id(ids::MODE_TOGGLE).with_text("Mode"),
            DomElement::new("div").with_id(ids::KEYPAD).with_class("keypad"),
        ];

        let mut root = DomElement::new("div").with_id(ids::ROOT).with_class("calculator-app");
        for element in skeleton {
            root.children.push(element.clone());
            dom.register_element(element);
        }
        dom.register_element(root);
        dom
    }

    /// Registers an element for ID lookup; elements without an ID are ignored
    pub fn register_element(&mut self, element: DomElement) {
        if !element.id.is_empty() {
            self.elements.insert(element.id.clone(), element);
        }
    }

    /// Gets an element by ID
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<&DomElement> {
        self.elements.get(id)
    }

    /// Gets a mutable element by ID
    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut DomElement> {
        self.elements.get_mut(id)
    }

    /// Records an event
    pub fn dispatch_event(&mut self, event: DomEvent) {
        self.event_history.push(event);
    }

    /// Events dispatched so far
    #[must_use]
    pub fn event_history(&self) -> &[DomEvent] {
        &self.event_history
    }

    /// Updates element text by ID
    pub fn set_element_text(&mut self, id: &str, text: &str) {
        if let Some(elem) = self.elements.get_mut(id) {
            elem.text_content = text.to_string();
        }
    }

    /// Gets element text by ID
    #[must_use]
    pub fn get_element_text(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|e| e.text_content.as_str())
    }

    /// Appends a child and registers it
    pub fn append_child(&mut self, parent_id: &str, child: DomElement) {
        if let Some(parent) = self.elements.get_mut(parent_id) {
            parent.children.push(child.clone());
        }
        self.register_element(child);
    }

    /// Removes all children of an element and unregisters them
    pub fn clear_children(&mut self, id: &str) {
        let children = self
            .elements
            .get_mut(id)
            .map(|elem| std::mem::take(&mut elem.children))
            .unwrap_or_default();
        for child in children {
            self.elements.remove(&child.id);
        }
    }
}
