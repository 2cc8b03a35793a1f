//! Modal - Dialog with focus trap and focus restoration
//!
//! Two states, `Closed` and `Open`. `open` only acts from Closed (the first
//! content shown wins) and `close` only from Open.
//!
//! Structure (reused when an element with the configured id already exists):
//!
//! ```text
//! #modal.modal                          overlay root, click closes
//! └── .modal__dialog  role="dialog" aria-modal="true" aria-labelledby
//!     ├── button.modal__close
//!     ├── img.modal__image
//!     ├── h2.modal__title
//!     └── .modal__body
//! ```
//!
//! While open, Tab and Shift+Tab cycle inside the dialog, Escape closes, and
//! the page body is hidden from assistive tech and cannot scroll. The body
//! stays hidden until the last open modal of the page closes. Closing
//! returns focus to the element that opened the dialog when it is still in
//! the document.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Deserialize;
use spark_signals::{signal, Signal};

use crate::config::ModalOptions;
use crate::dom::arrays::{attributes, classes, core, text};
use crate::dom::query::{get_element_by_id, query_by_class};
use crate::dom::{
    body, element, is_allocated, on_destroy, pop_parent_context, push_parent_context,
    release_index, ElementProps, ElementRef,
};
use crate::error::WidgetError;
use crate::state::focus;
use crate::state::keyboard::{self, KeyboardEvent};
use crate::state::pointer::{self, PointerHandlers};
use crate::types::{aria_bool, Cleanup};

pub const MODAL_CLASS: &str = "modal";
pub const OPEN_CLASS: &str = "modal--open";
pub const DIALOG_CLASS: &str = "modal__dialog";
pub const CLOSE_CLASS: &str = "modal__close";
pub const IMAGE_CLASS: &str = "modal__image";
pub const TITLE_CLASS: &str = "modal__title";
pub const BODY_CLASS: &str = "modal__body";

// =============================================================================
// STATE MACHINE
// =============================================================================

/// What the dialog shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModalContent {
    pub title: String,
    pub body: String,
    /// Image source, hidden when absent.
    pub image: Option<String>,
}

impl ModalContent {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            image: None,
        }
    }

    pub fn with_image(mut self, src: &str) -> Self {
        self.image = Some(src.to_string());
        self
    }

    /// Content declared on a trigger: `data-modal-title` (required),
    /// `data-modal-body`, `data-modal-image`.
    pub fn from_dataset(trigger: usize) -> Option<Self> {
        let title = attributes::get_data(trigger, "modal-title")?;
        Some(Self {
            title,
            body: attributes::get_data(trigger, "modal-body").unwrap_or_default(),
            image: attributes::get_data(trigger, "modal-image"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalState {
    pub open: bool,
    pub content: Option<ModalContent>,
    /// Where focus returns on close. Kept after close until the next open.
    pub trigger: Option<ElementRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalAction {
    Open {
        content: ModalContent,
        trigger: Option<ElementRef>,
    },
    Close,
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn transition(&self, action: ModalAction) -> Self {
        match action {
            ModalAction::Open { content, trigger } if !self.open => Self {
                open: true,
                content: Some(content),
                trigger,
            },
            ModalAction::Close if self.open => Self {
                open: false,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }
}

/// Decide where Tab should move focus inside a trap.
///
/// Returns `Some(target)` when the key must be intercepted and focus moved
/// to `target`; `None` lets the native Tab order proceed.
///
/// - one element: focus stays pinned on it
/// - Shift+Tab on the first wraps to the last, Tab on the last to the first
/// - focus outside the set is pulled back to the first (Tab) or last
///   (Shift+Tab) element
pub fn trap_tab(focusable: &[usize], active: Option<usize>, shift: bool) -> Option<usize> {
    let (&first, &last) = (focusable.first()?, focusable.last()?);
    if focusable.len() == 1 {
        return Some(first);
    }

    match active {
        Some(current) if focusable.contains(&current) => {
            if shift && current == first {
                Some(last)
            } else if !shift && current == last {
                Some(first)
            } else {
                None
            }
        }
        _ => Some(if shift { last } else { first }),
    }
}

// =============================================================================
// OPEN MODALS (page-wide)
// =============================================================================

thread_local! {
    /// Roots of the modals currently open, in opening order.
    static OPEN_MODALS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Number of modals open on the page.
pub fn open_modal_count() -> usize {
    OPEN_MODALS.with(|open| open.borrow().len())
}

fn set_modal_open(root: usize, open: bool) {
    OPEN_MODALS.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.retain(|&r| r != root);
        if open {
            stack.push(root);
        }
    });
}

/// Hide the page body from assistive tech and lock scrolling while any
/// modal is open.
fn sync_page() {
    let page = body();
    if open_modal_count() > 0 {
        attributes::set_attribute(page, "aria-hidden", "true");
        attributes::set_style(page, "overflow", "hidden");
    } else {
        attributes::remove_attribute(page, "aria-hidden");
        attributes::remove_style(page, "overflow");
    }
}

/// Reset the open-modal register (for testing)
pub(crate) fn reset_open_modals() {
    OPEN_MODALS.with(|stack| stack.borrow_mut().clear());
}

// =============================================================================
// CONTROLLER
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct Parts {
    root: usize,
    dialog: usize,
    close: usize,
    image: usize,
    title: usize,
    body: usize,
}

struct ModalInner {
    id: String,
    parts: Parts,
    state: Signal<ModalState>,
    /// Tab order inside the dialog, computed on each open.
    focusable: RefCell<Vec<usize>>,
    /// The dialog was given `tabindex="-1"` as the only focus target.
    dialog_fallback: Cell<bool>,
    key_listener: RefCell<Option<Cleanup>>,
    cleanups: RefCell<Vec<Cleanup>>,
}

/// Controller for one modal root.
pub struct Modal {
    inner: Rc<ModalInner>,
}

impl Modal {
    /// Reuse the element with `options.id` or build the modal under the
    /// body. Missing parts of a reused root are created.
    pub fn init(options: ModalOptions) -> Result<Self, WidgetError> {
        if options.id.is_empty() {
            return Err(WidgetError::InvalidOption {
                name: "id",
                value: options.id,
            });
        }

        let parts = build_parts(&options.id);
        let inner = Rc::new(ModalInner {
            id: options.id,
            parts,
            state: signal(ModalState::default()),
            focusable: RefCell::new(Vec::new()),
            dialog_fallback: Cell::new(false),
            key_listener: RefCell::new(None),
            cleanups: RefCell::new(Vec::new()),
        });
        inner.render();

        // A root released while open must not keep the page hidden
        let root = parts.root;
        on_destroy(root, move || {
            set_modal_open(root, false);
            sync_page();
        });

        let modal = Self { inner };
        modal.attach_listeners();
        tracing::debug!(id = %modal.inner.id, root = parts.root, "modal mounted");
        Ok(modal)
    }

    fn attach_listeners(&self) {
        let parts = self.inner.parts;

        let weak = Rc::downgrade(&self.inner);
        let on_overlay = pointer::on_element(parts.root, PointerHandlers {
            on_click: Some(Rc::new(move |event| {
                if event.target != parts.root {
                    return;
                }
                if let Some(inner) = weak.upgrade() {
                    inner.close();
                }
            })),
            ..Default::default()
        });

        let weak = Rc::downgrade(&self.inner);
        let on_close = pointer::on_element(parts.close, PointerHandlers {
            on_click: Some(Rc::new(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.close();
                }
            })),
            ..Default::default()
        });

        self.inner
            .cleanups
            .borrow_mut()
            .extend([Box::new(on_overlay) as Cleanup, Box::new(on_close)]);
    }

    /// Show `content`. `trigger` defaults to the active element.
    ///
    /// Ignored while already open.
    pub fn open(&self, content: ModalContent, trigger: Option<usize>) {
        self.inner.open(content, trigger);
    }

    pub fn close(&self) {
        self.inner.close();
    }

    /// Open with the content declared on `trigger`'s `data-modal-*` attributes
    /// whenever it is clicked. Returns the cleanup function.
    pub fn bind_trigger(&self, trigger: usize) -> Result<Cleanup, WidgetError> {
        if !is_allocated(trigger) {
            return Err(WidgetError::StaleElement { index: trigger });
        }
        if ModalContent::from_dataset(trigger).is_none() {
            return Err(WidgetError::missing("data-modal-title"));
        }

        let weak = Rc::downgrade(&self.inner);
        let cleanup = pointer::on_element(trigger, PointerHandlers {
            on_click: Some(Rc::new(move |_| {
                let Some(inner) = weak.upgrade() else { return };
                if let Some(content) = ModalContent::from_dataset(trigger) {
                    inner.open(content, Some(trigger));
                }
            })),
            ..Default::default()
        });
        Ok(Box::new(cleanup))
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.get().open
    }

    pub fn state(&self) -> ModalState {
        self.inner.state.get()
    }

    /// The state register, for reactive readers.
    pub fn state_signal(&self) -> Signal<ModalState> {
        self.inner.state.clone()
    }

    /// Current Tab order inside the dialog (empty while closed).
    pub fn focusable_elements(&self) -> Vec<usize> {
        self.inner.focusable.borrow().clone()
    }

    pub fn root(&self) -> usize {
        self.inner.parts.root
    }

    pub fn dialog(&self) -> usize {
        self.inner.parts.dialog
    }

    pub fn close_button(&self) -> usize {
        self.inner.parts.close
    }

    /// Force-close, detach listeners and remove the modal from the document.
    pub fn destroy(self) {
        self.inner.close();
        let cleanups = std::mem::take(&mut *self.inner.cleanups.borrow_mut());
        for cleanup in cleanups {
            cleanup();
        }
        release_index(self.inner.parts.root);
        tracing::debug!(id = %self.inner.id, "modal destroyed");
    }
}

/// Find or create the modal structure.
fn build_parts(id: &str) -> Parts {
    let page = body();
    let root = get_element_by_id(id).unwrap_or_else(|| {
        push_parent_context(page);
        let root = element(ElementProps::new("div").id(id));
        pop_parent_context();
        root
    });
    classes::add_class(root, MODAL_CLASS);

    let dialog = ensure_part(root, DIALOG_CLASS, "div");
    attributes::set_attribute(dialog, "role", "dialog");
    attributes::set_attribute(dialog, "aria-modal", "true");

    let close = ensure_part(dialog, CLOSE_CLASS, "button");
    attributes::set_attribute_if_absent(close, "type", "button");
    attributes::set_attribute_if_absent(close, "aria-label", "Close");

    let image = ensure_part(dialog, IMAGE_CLASS, "img");
    let title = ensure_part(dialog, TITLE_CLASS, "h2");
    let body = ensure_part(dialog, BODY_CLASS, "div");

    attributes::set_attribute_if_absent(title, "id", &format!("{id}-title"));
    if let Some(title_id) = attributes::get_attribute(title, "id") {
        attributes::set_attribute(dialog, "aria-labelledby", &title_id);
    }

    Parts { root, dialog, close, image, title, body }
}

fn ensure_part(parent: usize, class: &str, tag: &str) -> usize {
    query_by_class(parent, class).unwrap_or_else(|| {
        push_parent_context(parent);
        let part = element(ElementProps::new(tag).class(class));
        pop_parent_context();
        part
    })
}

impl ModalInner {
    fn open(self: &Rc<Self>, content: ModalContent, trigger: Option<usize>) {
        let state = self.state.get();
        if state.open {
            tracing::debug!(id = %self.id, "modal already open, ignoring open");
            return;
        }

        let trigger = trigger.or_else(focus::active_element).and_then(ElementRef::new);
        self.fill(&content);
        self.state.set(state.transition(ModalAction::Open { content, trigger }));
        set_modal_open(self.parts.root, true);
        self.render();

        let dialog = self.parts.dialog;
        let mut focusable = focus::tabbable_within(dialog);
        if focusable.is_empty() {
            attributes::set_attribute(dialog, "tabindex", "-1");
            self.dialog_fallback.set(true);
            focusable.push(dialog);
        }
        let initial = if focusable.contains(&self.parts.close) {
            self.parts.close
        } else {
            focusable[0]
        };
        *self.focusable.borrow_mut() = focusable;

        focus::push_focus_trap(dialog);
        focus::focus(initial);

        let weak = Rc::downgrade(self);
        let listener = keyboard::on(move |event| {
            weak.upgrade().is_some_and(|inner| inner.handle_key(event))
        });
        *self.key_listener.borrow_mut() = Some(Box::new(listener));

        tracing::debug!(id = %self.id, "modal opened");
    }

    fn close(&self) {
        let state = self.state.get();
        if !state.open {
            tracing::debug!(id = %self.id, "modal already closed, ignoring close");
            return;
        }

        self.state.set(state.transition(ModalAction::Close));
        set_modal_open(self.parts.root, false);
        self.render();

        if let Some(listener) = self.key_listener.borrow_mut().take() {
            listener();
        }
        focus::remove_focus_trap(self.parts.dialog);
        if self.dialog_fallback.replace(false) {
            attributes::remove_attribute(self.parts.dialog, "tabindex");
        }
        self.focusable.borrow_mut().clear();

        match state.trigger.filter(ElementRef::is_connected).and_then(|t| t.resolve()) {
            Some(trigger) => {
                if !focus::focus(trigger) {
                    tracing::debug!(id = %self.id, trigger, "trigger cannot take focus");
                }
            }
            None => {
                tracing::debug!(id = %self.id, "trigger gone, focus not restored");
                if self.contains_focus() {
                    focus::blur();
                }
            }
        }

        tracing::debug!(id = %self.id, "modal closed");
    }

    fn contains_focus(&self) -> bool {
        focus::active_element().is_some_and(|a| crate::dom::query::contains(self.parts.root, a))
    }

    fn fill(&self, content: &ModalContent) {
        text::set_text_content(self.parts.title, &content.title);
        text::set_text_content(self.parts.body, &content.body);
        match &content.image {
            Some(src) => {
                attributes::set_attribute(self.parts.image, "src", src);
                attributes::set_attribute(self.parts.image, "alt", &content.title);
                core::set_hidden(self.parts.image, false);
            }
            None => {
                attributes::remove_attribute(self.parts.image, "src");
                core::set_hidden(self.parts.image, true);
            }
        }
    }

    fn render(&self) {
        let open = self.state.get().open;
        classes::toggle_class(self.parts.root, OPEN_CLASS, open);
        attributes::set_attribute(self.parts.root, "aria-hidden", aria_bool(!open));
        sync_page();
    }

    fn handle_key(&self, event: &KeyboardEvent) -> bool {
        match event.key.as_str() {
            "Escape" => {
                self.close();
                true
            }
            "Tab" => {
                let focusable = self.focusable.borrow().clone();
                match trap_tab(&focusable, focus::active_element(), event.modifiers.shift) {
                    Some(target) => {
                        focus::focus(target);
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::reset_document;
    use crate::state::keyboard::Modifiers;
    use crate::state::pointer::PointerEvent;

    fn setup() -> usize {
        reset_document();
        push_parent_context(body());
        let trigger = element(ElementProps::new("button").text("Open project"));
        pop_parent_context();
        trigger
    }

    fn content(title: &str) -> ModalContent {
        ModalContent::new(title, &format!("{title} body"))
    }

    fn tab() -> KeyboardEvent {
        KeyboardEvent::new("Tab")
    }

    fn shift_tab() -> KeyboardEvent {
        KeyboardEvent::with_modifiers("Tab", Modifiers::shift())
    }

    #[test]
    fn test_trap_tab_rules() {
        let set = [10, 11, 12];
        assert_eq!(trap_tab(&set, Some(10), true), Some(12));
        assert_eq!(trap_tab(&set, Some(12), false), Some(10));
        assert_eq!(trap_tab(&set, Some(10), false), None);
        assert_eq!(trap_tab(&set, Some(11), true), None);
        assert_eq!(trap_tab(&set, Some(99), false), Some(10));
        assert_eq!(trap_tab(&set, None, true), Some(12));
        assert_eq!(trap_tab(&[7], Some(7), false), Some(7));
        assert_eq!(trap_tab(&[7], Some(7), true), Some(7));
        assert_eq!(trap_tab(&[], None, false), None);
    }

    #[test]
    fn test_transition_rules() {
        let closed = ModalState::default();
        let a = closed.transition(ModalAction::Open { content: content("A"), trigger: None });
        assert!(a.open);

        let still_a = a.transition(ModalAction::Open { content: content("B"), trigger: None });
        assert_eq!(still_a.content, Some(content("A")));

        let closed_again = a.transition(ModalAction::Close);
        assert!(!closed_again.open);
        assert_eq!(closed_again.transition(ModalAction::Close), closed_again);
    }

    #[test]
    fn test_init_builds_structure_once() {
        setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();

        let dialog = modal.dialog();
        assert_eq!(get_element_by_id("modal"), Some(modal.root()));
        assert_eq!(attributes::get_attribute(dialog, "role").as_deref(), Some("dialog"));
        assert_eq!(attributes::get_attribute(dialog, "aria-modal").as_deref(), Some("true"));
        assert_eq!(attributes::get_attribute(dialog, "aria-labelledby").as_deref(), Some("modal-title"));
        assert_eq!(attributes::get_attribute(modal.root(), "aria-hidden").as_deref(), Some("true"));
        assert!(!classes::has_class(modal.root(), OPEN_CLASS));

        // A second init reuses the same nodes
        let again = Modal::init(ModalOptions::default()).unwrap();
        assert_eq!(again.root(), modal.root());
        assert_eq!(again.dialog(), dialog);
        assert_eq!(again.close_button(), modal.close_button());
    }

    #[test]
    fn test_open_close_mirrors_state() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();
        let page = body();

        modal.open(content("Atlas").with_image("/img/atlas.webp"), Some(trigger));
        assert!(modal.is_open());
        assert!(classes::has_class(modal.root(), OPEN_CLASS));
        assert_eq!(attributes::get_attribute(modal.root(), "aria-hidden").as_deref(), Some("false"));
        assert_eq!(attributes::get_attribute(page, "aria-hidden").as_deref(), Some("true"));
        assert_eq!(attributes::get_style(page, "overflow").as_deref(), Some("hidden"));
        assert_eq!(focus::active_element(), Some(modal.close_button()));

        let image = query_by_class(modal.dialog(), IMAGE_CLASS).unwrap();
        assert_eq!(attributes::get_attribute(image, "src").as_deref(), Some("/img/atlas.webp"));
        assert!(!core::is_hidden(image));

        modal.close();
        assert!(!modal.is_open());
        assert!(!classes::has_class(modal.root(), OPEN_CLASS));
        assert_eq!(attributes::get_attribute(modal.root(), "aria-hidden").as_deref(), Some("true"));
        assert_eq!(attributes::get_attribute(page, "aria-hidden"), None);
        assert_eq!(attributes::get_style(page, "overflow"), None);
        assert_eq!(focus::active_element(), Some(trigger));
        assert!(!focus::is_focus_trapped());

        // Trigger is remembered after close
        assert_eq!(modal.state().trigger.and_then(|t| t.resolve()), Some(trigger));
    }

    #[test]
    fn test_escape_returns_focus_to_trigger() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();

        // No explicit trigger: the focused element is remembered
        focus::focus(trigger);
        modal.open(content("Atlas"), None);
        assert!(modal.is_open());

        assert!(keyboard::dispatch(KeyboardEvent::new("Escape")));
        assert!(!modal.is_open());
        assert_eq!(focus::active_element(), Some(trigger));

        // Listener removed: Escape is no longer consumed
        assert!(!keyboard::dispatch(KeyboardEvent::new("Escape")));
    }

    #[test]
    fn test_open_is_idempotent() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();
        let title = query_by_class(modal.dialog(), TITLE_CLASS).unwrap();

        modal.open(content("First"), Some(trigger));
        modal.open(content("Second"), Some(modal.root()));
        assert_eq!(text::get_text_content(title), "First");
        assert_eq!(modal.state().content, Some(content("First")));

        modal.close();
        modal.close();
        assert_eq!(focus::active_element(), Some(trigger));
    }

    #[test]
    fn test_focus_trap_cycles() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();

        // Two extra controls inside the dialog body
        let body_part = query_by_class(modal.dialog(), BODY_CLASS).unwrap();
        push_parent_context(body_part);
        let link = element(ElementProps::new("a").attr("href", "/work/atlas"));
        let disabled = element(ElementProps::new("button").disabled());
        let cta = element(ElementProps::new("button"));
        pop_parent_context();

        modal.open(content("Atlas"), Some(trigger));
        let set = modal.focusable_elements();
        assert_eq!(set, vec![modal.close_button(), link, cta]);
        assert!(!set.contains(&disabled));

        // Any mix of Tab / Shift+Tab keeps focus inside the set
        let presses = [true, true, true, false, false, true, false, false, false, true, true];
        for forward in presses {
            keyboard::dispatch(if forward { tab() } else { shift_tab() });
            let active = focus::active_element().unwrap();
            assert!(set.contains(&active), "focus escaped to {active}");
        }

        // Wrap points
        focus::focus(cta);
        keyboard::dispatch(tab());
        assert_eq!(focus::active_element(), Some(modal.close_button()));
        keyboard::dispatch(shift_tab());
        assert_eq!(focus::active_element(), Some(cta));

        // Focus outside is pulled back in
        focus::focus(trigger);
        keyboard::dispatch(tab());
        assert_eq!(focus::active_element(), Some(modal.close_button()));
    }

    #[test]
    fn test_dialog_fallback_when_nothing_focusable() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();
        core::set_hidden(modal.close_button(), true);

        modal.open(content("Quiet"), Some(trigger));
        assert_eq!(modal.focusable_elements(), vec![modal.dialog()]);
        assert_eq!(attributes::get_attribute(modal.dialog(), "tabindex").as_deref(), Some("-1"));
        assert_eq!(focus::active_element(), Some(modal.dialog()));

        keyboard::dispatch(tab());
        keyboard::dispatch(shift_tab());
        assert_eq!(focus::active_element(), Some(modal.dialog()));

        modal.close();
        assert_eq!(attributes::get_attribute(modal.dialog(), "tabindex"), None);
    }

    #[test]
    fn test_overlay_and_close_button_clicks() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();

        modal.open(content("Atlas"), Some(trigger));
        pointer::dispatch(PointerEvent::click(modal.dialog()));
        assert!(modal.is_open());

        pointer::dispatch(PointerEvent::click(modal.root()));
        assert!(!modal.is_open());

        modal.open(content("Atlas"), Some(trigger));
        pointer::dispatch(PointerEvent::click(modal.close_button()));
        assert!(!modal.is_open());
        assert_eq!(focus::active_element(), Some(trigger));
    }

    #[test]
    fn test_removed_trigger_is_skipped() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();

        modal.open(content("Atlas"), Some(trigger));
        release_index(trigger);

        // Recycle the index for an unrelated element
        push_parent_context(body());
        let other = element(ElementProps::new("button"));
        pop_parent_context();
        assert_eq!(other, trigger);

        modal.close();
        assert!(!modal.is_open());
        assert_eq!(focus::active_element(), None);
    }

    #[test]
    fn test_bind_trigger_from_dataset() {
        reset_document();
        push_parent_context(body());
        let tile = element(
            ElementProps::new("button")
                .attr("data-modal-title", "Atlas")
                .attr("data-modal-body", "Brand system"),
        );
        let plain = element(ElementProps::new("button"));
        pop_parent_context();

        let modal = Modal::init(ModalOptions::default()).unwrap();
        let _cleanup = modal.bind_trigger(tile).unwrap();
        assert!(modal.bind_trigger(plain).is_err());
        release_index(plain);
        assert!(matches!(
            modal.bind_trigger(plain),
            Err(WidgetError::StaleElement { .. })
        ));

        pointer::dispatch(PointerEvent::click(tile));
        assert!(modal.is_open());
        assert_eq!(modal.state().content, Some(ModalContent::new("Atlas", "Brand system")));

        keyboard::dispatch(KeyboardEvent::new("Escape"));
        assert_eq!(focus::active_element(), Some(tile));
    }

    #[test]
    fn test_keyboard_activation_opens_and_closes() {
        reset_document();
        push_parent_context(body());
        let tile = element(ElementProps::new("button").attr("data-modal-title", "Atlas"));
        pop_parent_context();

        let modal = Modal::init(ModalOptions::default()).unwrap();
        let _cleanup = modal.bind_trigger(tile).unwrap();

        focus::focus(tile);
        keyboard::dispatch(KeyboardEvent::new("Enter"));
        assert!(modal.is_open());
        assert_eq!(focus::active_element(), Some(modal.close_button()));

        keyboard::dispatch(KeyboardEvent::new(" "));
        assert!(!modal.is_open());
        assert_eq!(focus::active_element(), Some(tile));
    }

    #[test]
    fn test_body_stays_hidden_while_another_modal_is_open() {
        let trigger = setup();
        let first = Modal::init(ModalOptions::default()).unwrap();
        let second = Modal::init(ModalOptions { id: "gallery".into() }).unwrap();
        let page = body();

        first.open(content("Atlas"), Some(trigger));
        second.open(content("Gallery"), None);
        assert_eq!(open_modal_count(), 2);

        second.close();
        assert!(first.is_open());
        assert_eq!(attributes::get_attribute(page, "aria-hidden").as_deref(), Some("true"));
        assert_eq!(attributes::get_style(page, "overflow").as_deref(), Some("hidden"));

        first.close();
        assert_eq!(open_modal_count(), 0);
        assert_eq!(attributes::get_attribute(page, "aria-hidden"), None);
        assert_eq!(attributes::get_style(page, "overflow"), None);
    }

    #[test]
    fn test_released_open_root_unhides_body() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions::default()).unwrap();

        modal.open(content("Atlas"), Some(trigger));
        release_index(modal.root());
        assert_eq!(open_modal_count(), 0);
        assert_eq!(attributes::get_attribute(body(), "aria-hidden"), None);
    }

    #[test]
    fn test_destroy_removes_root() {
        let trigger = setup();
        let modal = Modal::init(ModalOptions { id: "project-modal".into() }).unwrap();
        let root = modal.root();

        modal.open(content("Atlas"), Some(trigger));
        modal.destroy();

        assert!(!is_allocated(root));
        assert_eq!(get_element_by_id("project-modal"), None);
        assert_eq!(attributes::get_attribute(body(), "aria-hidden"), None);
        assert_eq!(focus::active_element(), Some(trigger));
        assert!(!keyboard::dispatch(KeyboardEvent::new("Escape")));
    }

    #[test]
    fn test_reuses_existing_markup() {
        reset_document();
        push_parent_context(body());
        let mut close = 0;
        let root = element(ElementProps::new("div").id("modal").children(|| {
            element(ElementProps::new("div").class(DIALOG_CLASS).children(|| {
                close = element(ElementProps::new("button").class(CLOSE_CLASS).attr("aria-label", "Dismiss"));
            }));
        }));
        pop_parent_context();

        let modal = Modal::init(ModalOptions::default()).unwrap();
        assert_eq!(modal.root(), root);
        assert_eq!(modal.close_button(), close);
        assert_eq!(attributes::get_attribute(close, "aria-label").as_deref(), Some("Dismiss"));
        assert!(query_by_class(modal.dialog(), TITLE_CLASS).is_some());
    }

    #[test]
    fn test_empty_id_rejected() {
        reset_document();
        assert!(matches!(
            Modal::init(ModalOptions { id: String::new() }),
            Err(WidgetError::InvalidOption { name: "id", .. })
        ));
    }
}
