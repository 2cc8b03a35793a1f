//! Accordion - Single-expand disclosure group
//!
//! Each `.accordion__header` controls the element right after it (its
//! content panel). Expanding one section collapses the others. The state
//! machine ([`AccordionState::transition`]) is pure; [`Accordion`] renders
//! every state change back onto the headers and panels:
//!
//! - header `aria-expanded="true"|"false"` and `accordion__header--expanded`
//! - panel `hidden` exactly when its header is not expanded
//! - `accordion__item--expanded` on the header's `.accordion__item` wrapper
//!
//! Keyboard: `ArrowDown`/`ArrowUp` move between headers (wrapping),
//! `Home`/`End` jump, `Enter`/`Space` toggle the focused header.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::dom::arrays::{attributes, classes, core};
use crate::dom::query::{closest_by_class, contains, next_element_sibling, parent, query_all_by_class};
use crate::dom::{dispatch_custom, is_allocated};
use crate::error::WidgetError;
use crate::state::focus;
use crate::state::keyboard::{self, KeyboardEvent};
use crate::state::pointer::{self, PointerHandlers};
use crate::types::{aria_bool, parse_aria_bool, Cleanup};

pub const ACCORDION_CLASS: &str = "accordion";
pub const HEADER_CLASS: &str = "accordion__header";
pub const HEADER_EXPANDED_CLASS: &str = "accordion__header--expanded";
pub const ITEM_CLASS: &str = "accordion__item";
pub const ITEM_EXPANDED_CLASS: &str = "accordion__item--expanded";

/// Custom event dispatched on a header after it toggles. Detail: section id.
pub const TOGGLE_EVENT: &str = "accordion:toggle";

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Expanded flag per section, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccordionState {
    expanded: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccordionAction {
    /// Flip one section; expanding it collapses every other section.
    Toggle(usize),
    ExpandAll,
    CollapseAll,
}

impl AccordionState {
    pub fn new(expanded: Vec<bool>) -> Self {
        Self { expanded }
    }

    /// `len` sections, all collapsed.
    pub fn collapsed(len: usize) -> Self {
        Self::new(vec![false; len])
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn is_expanded(&self, section: usize) -> bool {
        self.expanded.get(section).copied().unwrap_or(false)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.iter().filter(|&&e| e).count()
    }

    /// Index of the expanded section when exactly one is expanded.
    pub fn expanded_section(&self) -> Option<usize> {
        match self.expanded_count() {
            1 => self.expanded.iter().position(|&e| e),
            _ => None,
        }
    }

    /// Next state. Out-of-range toggles leave the state unchanged.
    pub fn transition(&self, action: AccordionAction) -> Self {
        let mut next = self.clone();
        match action {
            AccordionAction::Toggle(section) => {
                let Some(&was_expanded) = self.expanded.get(section) else {
                    return next;
                };
                if !was_expanded {
                    next.expanded.iter_mut().for_each(|e| *e = false);
                }
                next.expanded[section] = !was_expanded;
            }
            AccordionAction::ExpandAll => next.expanded.iter_mut().for_each(|e| *e = true),
            AccordionAction::CollapseAll => next.expanded.iter_mut().for_each(|e| *e = false),
        }
        next
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// A header and the panel it controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: usize,
    /// The header's next sibling. Missing panels are tolerated.
    pub content: Option<usize>,
    /// The header's `id`.
    pub id: String,
}

struct AccordionInner {
    container: usize,
    sections: Vec<Section>,
    state: Signal<AccordionState>,
    cleanups: RefCell<Vec<Cleanup>>,
}

/// Controller for one `.accordion` container.
pub struct Accordion {
    inner: Rc<AccordionInner>,
}

impl Accordion {
    /// Wire up every `.accordion__header` under `container`. Headers of a
    /// nested `.accordion` belong to that accordion, not this one.
    ///
    /// Ids and ARIA attributes are only added where missing, so markup that
    /// already carries them keeps its values. The first header already marked
    /// `aria-expanded="true"` starts expanded; later ones are collapsed.
    pub fn init(container: usize) -> Result<Self, WidgetError> {
        if !is_allocated(container) {
            tracing::warn!(container, "accordion container not found");
            return Err(WidgetError::missing("accordion container"));
        }

        let headers: Vec<usize> = query_all_by_class(container, HEADER_CLASS)
            .into_iter()
            .filter(|&header| belongs_to(header, container))
            .collect();
        if headers.is_empty() {
            tracing::warn!(container, "accordion has no headers");
            return Err(WidgetError::missing("accordion header"));
        }

        let base = attributes::get_attribute(container, "id")
            .unwrap_or_else(|| format!("accordion-{container}"));

        let sections: Vec<Section> = headers
            .iter()
            .enumerate()
            .map(|(i, &header)| wire_section(&base, i, header))
            .collect();

        let preset = sections
            .iter()
            .position(|s| parse_aria_bool(attributes::get_attribute(s.header, "aria-expanded").as_deref()));
        let mut initial = AccordionState::collapsed(sections.len());
        if let Some(section) = preset {
            initial = initial.transition(AccordionAction::Toggle(section));
        }

        let inner = Rc::new(AccordionInner {
            container,
            sections,
            state: signal(initial),
            cleanups: RefCell::new(Vec::new()),
        });
        inner.render();

        let accordion = Self { inner };
        accordion.attach_listeners();
        tracing::debug!(container, sections = accordion.inner.sections.len(), "accordion mounted");
        Ok(accordion)
    }

    fn attach_listeners(&self) {
        let mut cleanups: Vec<Cleanup> = Vec::new();

        for (i, section) in self.inner.sections.iter().enumerate() {
            let weak = Rc::downgrade(&self.inner);
            let on_click = pointer::on_element(section.header, PointerHandlers {
                on_click: Some(Rc::new(move |_| {
                    if let Some(inner) = weak.upgrade() {
                        inner.toggle_section(i);
                    }
                })),
                ..Default::default()
            });
            cleanups.push(Box::new(on_click));

            let weak = Rc::downgrade(&self.inner);
            let on_key = keyboard::on_element(section.header, move |event| {
                weak.upgrade()
                    .is_some_and(|inner| inner.handle_key(i, event))
            });
            cleanups.push(Box::new(on_key));
        }

        self.inner.cleanups.borrow_mut().extend(cleanups);
    }

    /// Toggle the section whose header is `header`.
    ///
    /// Headers outside this accordion are ignored with a warning.
    pub fn toggle(&self, header: usize) {
        match self.section_of(header) {
            Some(i) => self.inner.toggle_section(i),
            None => tracing::warn!(header, "toggle on element that is not a header of this accordion"),
        }
    }

    /// Toggle by section position.
    pub fn toggle_section(&self, section: usize) {
        self.inner.toggle_section(section);
    }

    /// Expand every section (overrides single-expand).
    pub fn expand_all(&self) {
        self.inner.apply(AccordionAction::ExpandAll);
    }

    pub fn collapse_all(&self) {
        self.inner.apply(AccordionAction::CollapseAll);
    }

    pub fn state(&self) -> AccordionState {
        self.inner.state.get()
    }

    /// The state register, for reactive readers.
    pub fn state_signal(&self) -> Signal<AccordionState> {
        self.inner.state.clone()
    }

    pub fn sections(&self) -> &[Section] {
        &self.inner.sections
    }

    pub fn container(&self) -> usize {
        self.inner.container
    }

    fn section_of(&self, header: usize) -> Option<usize> {
        self.inner.sections.iter().position(|s| s.header == header)
    }

    /// Detach every listener. The markup keeps its last rendered state.
    pub fn destroy(self) {
        let cleanups = std::mem::take(&mut *self.inner.cleanups.borrow_mut());
        for cleanup in cleanups {
            cleanup();
        }
        tracing::debug!(container = self.inner.container, "accordion destroyed");
    }
}

/// True unless a `.accordion` nested inside `container` sits between
/// `header` and `container`.
fn belongs_to(header: usize, container: usize) -> bool {
    match parent(header).and_then(|p| closest_by_class(p, ACCORDION_CLASS)) {
        Some(owner) => owner == container || !contains(container, owner),
        None => true,
    }
}

/// Assign missing ids and ARIA wiring for one header/panel pair.
fn wire_section(base: &str, i: usize, header: usize) -> Section {
    attributes::set_attribute_if_absent(header, "id", &format!("{base}-header-{i}"));
    attributes::set_attribute_if_absent(header, "role", "button");
    attributes::set_attribute_if_absent(header, "tabindex", "0");
    attributes::set_attribute_if_absent(header, "aria-expanded", "false");
    let id = attributes::get_attribute(header, "id").unwrap_or_default();

    let content = next_element_sibling(header);
    match content {
        Some(content) => {
            attributes::set_attribute_if_absent(content, "id", &format!("{base}-panel-{i}"));
            attributes::set_attribute_if_absent(content, "role", "region");
            attributes::set_attribute_if_absent(content, "aria-labelledby", &id);
            let content_id = attributes::get_attribute(content, "id").unwrap_or_default();
            attributes::set_attribute_if_absent(header, "aria-controls", &content_id);
        }
        None => tracing::warn!(header, "accordion header has no content panel"),
    }

    Section { header, content, id }
}

impl AccordionInner {
    fn apply(&self, action: AccordionAction) {
        let next = self.state.get().transition(action);
        tracing::debug!(container = self.container, ?action, expanded = next.expanded_count(), "accordion transition");
        self.state.set(next);
        self.render();
    }

    fn toggle_section(&self, section: usize) {
        let Some(target) = self.sections.get(section) else {
            tracing::warn!(container = self.container, section, "accordion section out of range");
            return;
        };
        self.apply(AccordionAction::Toggle(section));
        dispatch_custom(target.header, TOGGLE_EVENT, &target.id);
    }

    fn render(&self) {
        let state = self.state.get();
        for (i, section) in self.sections.iter().enumerate() {
            let expanded = state.is_expanded(i);
            attributes::set_attribute(section.header, "aria-expanded", aria_bool(expanded));
            classes::toggle_class(section.header, HEADER_EXPANDED_CLASS, expanded);

            if let Some(content) = section.content {
                core::set_hidden(content, !expanded);
            }
            if let Some(item) = parent(section.header).filter(|&p| classes::has_class(p, ITEM_CLASS)) {
                classes::toggle_class(item, ITEM_EXPANDED_CLASS, expanded);
            }
        }
    }

    fn handle_key(&self, i: usize, event: &KeyboardEvent) -> bool {
        let n = self.sections.len();
        let target = match event.key.as_str() {
            "ArrowDown" => (i + 1) % n,
            "ArrowUp" => (i + n - 1) % n,
            "Home" => 0,
            "End" => n - 1,
            "Enter" | " " => {
                self.toggle_section(i);
                return true;
            }
            _ => return false,
        };
        focus::focus(self.sections[target].header);
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================
