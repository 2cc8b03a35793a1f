//! Element Builder - Declarative construction of element subtrees.
//!
//! Mirrors the component primitives pattern: allocate an index, bind the
//! props, push a parent context while the `children` closure runs so nested
//! `element()` calls attach to this element.
//!
//! # Example
//!
//! ```ignore
//! use spark_widgets::dom::{element, ElementProps};
//!
//! let carousel = element(ElementProps::new("div").class("carousel").children(|| {
//!     for title in ["One", "Two", "Three"] {
//!         element(ElementProps::new("div").class("carousel__slide").text(title));
//!     }
//!     element(ElementProps::new("button").class("carousel__prev"));
//!     element(ElementProps::new("button").class("carousel__next"));
//! }));
//! ```

use super::arrays::{attributes, classes, core, text};
use super::registry::{create_element, pop_parent_context, push_parent_context};

/// Props for [`element`].
pub struct ElementProps<'a> {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub hidden: bool,
    pub disabled: bool,
    pub children: Option<Box<dyn FnOnce() + 'a>>,
}

impl Default for ElementProps<'_> {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            id: None,
            classes: Vec::new(),
            attributes: Vec::new(),
            text: None,
            hidden: false,
            disabled: false,
            children: None,
        }
    }
}

impl<'a> ElementProps<'a> {
    /// Props for an element with the given tag.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, content: &str) -> Self {
        self.text = Some(content.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Nested children, created with this element as the parent context.
    pub fn children(mut self, children: impl FnOnce() + 'a) -> Self {
        self.children = Some(Box::new(children));
        self
    }
}

/// Create an element (and its children) under the current parent context.
///
/// Returns the element index.
pub fn element(props: ElementProps<'_>) -> usize {
    let index = create_element(&props.tag);

    if let Some(id) = &props.id {
        attributes::set_attribute(index, "id", id);
    }
    for class in &props.classes {
        classes::add_class(index, class);
    }
    for (name, value) in &props.attributes {
        attributes::set_attribute(index, name, value);
    }
    if let Some(content) = &props.text {
        text::set_text_content(index, content);
    }
    core::set_hidden(index, props.hidden);
    core::set_disabled(index, props.disabled);

    if let Some(children) = props.children {
        push_parent_context(index);
        children();
        pop_parent_context();
    }

    index
}
